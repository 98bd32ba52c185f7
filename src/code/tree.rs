//! Code tree, the intermediate representation used for code generation.
//!
//! The code tree is meant to be directly translated into statements of the target language.
//! It is plain data, without references to the format it was built from.
//! Thus, it can be easily rewritten and traversed structurally.

use crate::format::VarDecl;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CNode {
    /// Declares the variables, in order. Never empty.
    Decl { decls: Vec<VarDecl> },
    /// Reads the lvalues, in order. Never empty.
    Read { exprs: Vec<String> },
    /// Writes the expressions, in order. Never empty.
    Write { exprs: Vec<String> },
    Block { nodes: Vec<CNode> },
    /// Runs `body` for `name` in `0..size`.
    Loop {
        name: String,
        size: String,
        body: Box<CNode>,
    },
    /// A line emitted verbatim.
    Opaque { line: String },
}

impl CNode {
    pub fn decl(decl: VarDecl) -> Self {
        CNode::Decl { decls: vec![decl] }
    }

    pub fn read(expr: impl Into<String>) -> Self {
        CNode::Read {
            exprs: vec![expr.into()],
        }
    }

    pub fn write(expr: impl Into<String>) -> Self {
        CNode::Write {
            exprs: vec![expr.into()],
        }
    }

    pub fn block(nodes: Vec<CNode>) -> Self {
        CNode::Block { nodes }
    }

    pub fn empty() -> Self {
        CNode::Block { nodes: Vec::new() }
    }

    /// Appends the payload of `next` to this node if both are declarations, reads or writes.
    /// Otherwise gives `next` back.
    pub fn try_merge(&mut self, next: CNode) -> Result<(), CNode> {
        match (self, next) {
            (CNode::Decl { decls }, CNode::Decl { decls: more }) => decls.extend(more),
            (CNode::Read { exprs }, CNode::Read { exprs: more }) => exprs.extend(more),
            (CNode::Write { exprs }, CNode::Write { exprs: more }) => exprs.extend(more),
            (_, next) => return Err(next),
        }
        Ok(())
    }
}
