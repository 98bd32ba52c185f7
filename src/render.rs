//! Text fragments consumed by the template renderer.

use tracing::debug;

use crate::code::build::build_tree;
use crate::code::indent::join_with_indent;
use crate::code::lang::config::EmitConfig;
use crate::code::lang::cpp::Emitter;
use crate::code::lang::ty::param_type;
use crate::code::peephole::optimize;
use crate::code::tree::CNode;
use crate::error::Result;
use crate::format::{DeclTable, FormatNode};

/// Name of the variable holding the answer in the output stub.
pub const ANSWER: &str = "ans";

const FILL_IN: &str = "  // TODO: edit here";

/// Declares the variables of `table` and reads them as `format` describes,
/// indented at nesting level `nest`.
pub fn render_input_reading(
    format: &FormatNode,
    table: &DeclTable,
    config: &EmitConfig,
    nest: usize,
) -> Result<String> {
    let emitter = Emitter::new(config)?;
    let tree = build_tree(format, table)?;
    let tree = optimize(tree);
    debug!(?tree, "optimized code tree");
    emitter.render(&tree, nest)
}

/// Writes the answer, marked as the place to edit.
pub fn render_output_stub(config: &EmitConfig, nest: usize) -> Result<String> {
    let emitter = Emitter::new(config)?;
    let mut lines = emitter.lines(&CNode::write(ANSWER))?;
    if let Some(last) = lines.last_mut() {
        last.push_str(FILL_IN);
    }
    Ok(join_with_indent(&lines, &config.indent, nest))
}

/// Parameters of a function receiving all the variables, e.g. `int N, const vector<int> &A`.
pub fn render_parameter_types(table: &DeclTable, config: &EmitConfig) -> String {
    table
        .iter()
        .map(|decl| {
            let ty = param_type(decl.dims(), config.scalar, config.std_prefix());
            if ty.ends_with('&') {
                format!("{}{}", ty, decl.name())
            } else {
                format!("{} {}", ty, decl.name())
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Arguments passing all the variables, e.g. `N, A`.
pub fn render_parameter_names(table: &DeclTable) -> String {
    table
        .iter()
        .map(|decl| decl.name())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Return type of the solving function.
pub fn render_return_type() -> String {
    "auto".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::VarDecl;

    fn table() -> DeclTable {
        let a = VarDecl::new(
            "A",
            vec!["N".into()],
            vec!["1".into()],
            std::iter::once("N".to_string()).collect(),
        )
        .unwrap();
        DeclTable::from_decls(vec![VarDecl::scalar("N"), a]).unwrap()
    }

    #[test]
    fn parameters() {
        let config = EmitConfig::default();
        assert_eq!(
            render_parameter_types(&table(), &config),
            "int N, const vector<int> &A"
        );
        assert_eq!(
            render_parameter_types(&table(), &config.with_qualified_std()),
            "int N, const std::vector<int> &A"
        );
        assert_eq!(render_parameter_names(&table()), "N, A");
        assert_eq!(render_parameter_names(&DeclTable::new()), "");
    }

    #[test]
    fn output_stub() {
        assert_eq!(
            render_output_stub(&EmitConfig::default(), 1).unwrap(),
            "    printf(\"%d\\n\", ans);  // TODO: edit here"
        );
        assert_eq!(
            render_output_stub(&EmitConfig::default().with_printer("cout"), 0).unwrap(),
            "cout << ans << endl;  // TODO: edit here"
        );
    }

    #[test]
    fn return_type() {
        assert_eq!(render_return_type(), "auto");
    }
}
