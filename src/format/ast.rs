//! Structure of an input format, and the declarations derived from it.

use std::collections::BTreeSet;
use std::fmt;

use crate::error::FormatError;

/// A node of the input format tree.
///
/// Expressions (subscripts and loop bounds) are kept as canonical text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatNode {
    /// A single scalar, possibly subscripted.
    Item { name: String, indices: Vec<String> },
    /// End of a line. Produces no code.
    Newline,
    Sequence { items: Vec<FormatNode> },
    /// Repeats `body` for `name` in `0..size`. `name` is only in scope within `body`.
    Loop {
        name: String,
        size: String,
        body: Box<FormatNode>,
    },
}

impl FormatNode {
    pub fn item<S: Into<String>>(name: &str, indices: impl IntoIterator<Item = S>) -> Self {
        FormatNode::Item {
            name: name.to_string(),
            indices: indices.into_iter().map(Into::into).collect(),
        }
    }

    pub fn scalar(name: &str) -> Self {
        FormatNode::Item {
            name: name.to_string(),
            indices: Vec::new(),
        }
    }

    pub fn sequence(items: Vec<FormatNode>) -> Self {
        FormatNode::Sequence { items }
    }

    pub fn repeat(name: &str, size: &str, body: FormatNode) -> Self {
        FormatNode::Loop {
            name: name.to_string(),
            size: size.to_string(),
            body: Box::new(body),
        }
    }
}

/// What is needed to declare one variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VarDecl {
    name: String,
    dims: Vec<String>,
    bases: Vec<String>,
    depending: BTreeSet<String>,
}

impl VarDecl {
    /// `dims` are the sizes, outermost first, and `bases` the smallest index of each dimension.
    /// The declaration cannot be emitted before every variable in `depending` has been read.
    pub fn new(
        name: &str,
        dims: Vec<String>,
        bases: Vec<String>,
        depending: BTreeSet<String>,
    ) -> Result<Self, FormatError> {
        if dims.len() != bases.len() {
            return Err(FormatError::DimsBasesMismatch {
                name: name.to_string(),
                dims: dims.len(),
                bases: bases.len(),
            });
        }
        Ok(VarDecl {
            name: name.to_string(),
            dims,
            bases,
            depending,
        })
    }

    pub fn scalar(name: &str) -> Self {
        VarDecl {
            name: name.to_string(),
            dims: Vec::new(),
            bases: Vec::new(),
            depending: BTreeSet::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dims(&self) -> &[String] {
        &self.dims
    }

    pub fn bases(&self) -> &[String] {
        &self.bases
    }

    pub fn depending(&self) -> &BTreeSet<String> {
        &self.depending
    }
}

impl fmt::Display for VarDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        for (dim, base) in self.dims.iter().zip(&self.bases) {
            if base == "0" {
                write!(f, "[{}]", dim)?;
            } else {
                write!(f, "[{}; from {}]", dim, base)?;
            }
        }
        if !self.depending.is_empty() {
            let deps: Vec<&str> = self.depending.iter().map(String::as_str).collect();
            write!(f, " after {}", deps.join(", "))?;
        }
        Ok(())
    }
}

/// Declarations in first-use order, unique by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeclTable {
    decls: Vec<VarDecl>,
}

impl DeclTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_decls(decls: impl IntoIterator<Item = VarDecl>) -> Result<Self, FormatError> {
        let mut table = DeclTable::new();
        for decl in decls {
            table.insert(decl)?;
        }
        Ok(table)
    }

    pub fn insert(&mut self, decl: VarDecl) -> Result<(), FormatError> {
        if self.contains(decl.name()) {
            return Err(FormatError::DuplicateDecl {
                name: decl.name().to_string(),
            });
        }
        self.decls.push(decl);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&VarDecl> {
        self.decls.iter().find(|d| d.name() == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, VarDecl> {
        self.decls.iter()
    }

    pub fn len(&self) -> usize {
        self.decls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }
}

impl<'a> IntoIterator for &'a DeclTable {
    type Item = &'a VarDecl;
    type IntoIter = std::slice::Iter<'a, VarDecl>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dims_and_bases_must_match() {
        let err = VarDecl::new("A", vec!["N".into()], vec![], BTreeSet::new()).unwrap_err();
        assert_eq!(
            err,
            FormatError::DimsBasesMismatch {
                name: "A".into(),
                dims: 1,
                bases: 0
            }
        );
    }

    #[test]
    fn table_keeps_insertion_order_and_rejects_duplicates() {
        let mut table = DeclTable::new();
        table.insert(VarDecl::scalar("N")).unwrap();
        table.insert(VarDecl::scalar("M")).unwrap();
        assert!(table.insert(VarDecl::scalar("N")).is_err());

        let names: Vec<&str> = table.iter().map(VarDecl::name).collect();
        assert_eq!(names, ["N", "M"]);
    }

    #[test]
    fn display() {
        let decl = VarDecl::new(
            "A",
            vec!["N".into(), "M".into()],
            vec!["1".into(), "0".into()],
            ["M", "N"].iter().map(|s| s.to_string()).collect(),
        )
        .unwrap();
        assert_eq!(decl.to_string(), "A[N; from 1][M] after M, N");
    }
}
