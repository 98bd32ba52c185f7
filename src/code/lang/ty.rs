//! C++ types and constructors of declared variables.

use super::config::ScalarTy;

/// Derives the type of a variable with the given dimensions (outermost first),
/// and the constructor arguments giving it that shape.
///
/// E.g. `[N, M]` gives `vector<vector<int> >` and `(N, vector<int>(M))`.
/// Scalars have an empty constructor.
pub fn type_and_ctor(dims: &[String], scalar: ScalarTy, std: &str) -> (String, String) {
    let mut ty = scalar.name().to_string();
    let mut ctor = String::new();
    for dim in dims.iter().rev() {
        ctor = if ctor.is_empty() {
            format!("({})", dim)
        } else {
            format!("({}, {}{})", dim, ty, ctor)
        };
        ty = vector_of(&ty, std);
    }
    (ty, ctor)
}

/// Type of a function parameter receiving the variable: arrays are passed by const reference.
pub fn param_type(dims: &[String], scalar: ScalarTy, std: &str) -> String {
    let (ty, _) = type_and_ctor(dims, scalar, std);
    if dims.is_empty() {
        ty
    } else {
        format!("const {} &", ty)
    }
}

fn vector_of(item: &str, std: &str) -> String {
    // `> >` rather than `>>`, which older standards parse as a shift.
    let space = if item.ends_with('>') { " " } else { "" };
    format!("{}vector<{}{}>", std, item, space)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dims(dims: &[&str]) -> Vec<String> {
        dims.iter().map(|d| d.to_string()).collect()
    }

    #[test]
    fn scalar() {
        assert_eq!(
            type_and_ctor(&[], ScalarTy::Int, ""),
            ("int".to_string(), String::new())
        );
        assert_eq!(param_type(&[], ScalarTy::Int64, ""), "int64_t");
    }

    #[test]
    fn nested_vectors() {
        assert_eq!(
            type_and_ctor(&dims(&["N"]), ScalarTy::Int, ""),
            ("vector<int>".to_string(), "(N)".to_string())
        );
        assert_eq!(
            type_and_ctor(&dims(&["N", "M"]), ScalarTy::Int, "std::"),
            (
                "std::vector<std::vector<int> >".to_string(),
                "(N, std::vector<int>(M))".to_string()
            )
        );
        assert_eq!(
            type_and_ctor(&dims(&["A", "B", "C"]), ScalarTy::Int64, "").1,
            "(A, vector<vector<int64_t> >(B, vector<int64_t>(C)))"
        );
    }

    #[test]
    fn params_by_const_reference() {
        assert_eq!(
            param_type(&dims(&["N", "M"]), ScalarTy::Int, ""),
            "const vector<vector<int> > &"
        );
    }
}
