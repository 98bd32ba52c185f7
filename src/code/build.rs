//! Build a code tree from a format, declaring each variable just before it is needed.

use std::collections::BTreeSet;
use std::ops::{Deref, DerefMut};

use tracing::{debug, trace};

use super::tree::CNode;
use crate::error::{Result, SchedulingError};
use crate::expr::simplify;
use crate::format::{DeclTable, FormatNode, VarDecl};

/// Walks `format`, reading each item into its variable.
///
/// A variable is declared at the earliest point where all the variables its sizes depend on
/// have been read, and exactly once.
pub fn build_tree(format: &FormatNode, table: &DeclTable) -> Result<CNode> {
    let mut builder = Builder {
        table,
        declared: BTreeSet::new(),
        initialized: BTreeSet::new(),
    };
    builder.visit(format)
}

struct Builder<'a> {
    table: &'a DeclTable,
    /// Variables already declared, including the counters of the enclosing loops.
    declared: BTreeSet<String>,
    /// Variables already read at least once.
    initialized: BTreeSet<String>,
}

impl<'a> Builder<'a> {
    fn visit(&mut self, node: &FormatNode) -> Result<CNode> {
        let ready = self.declare_ready();
        let code = self.visit_node(node)?;

        if ready.is_empty() {
            Ok(code)
        } else {
            Ok(CNode::block(vec![CNode::Decl { decls: ready }, code]))
        }
    }

    /// Marks as declared, and returns in table order, the pending declarations
    /// whose dependencies are all initialized.
    fn declare_ready(&mut self) -> Vec<VarDecl> {
        let table = self.table;
        let ready: Vec<VarDecl> = table
            .iter()
            .filter(|decl| !self.declared.contains(decl.name()))
            .filter(|decl| decl.depending().is_subset(&self.initialized))
            .cloned()
            .collect();

        for decl in &ready {
            debug!(name = decl.name(), "declaring");
            self.declared.insert(decl.name().to_string());
        }
        ready
    }

    fn visit_node(&mut self, node: &FormatNode) -> Result<CNode> {
        match node {
            FormatNode::Item { name, indices } => {
                if !self.declared.contains(name) {
                    return Err(SchedulingError::Undeclared { name: name.clone() }.into());
                }
                let decl = self
                    .table
                    .get(name)
                    .ok_or_else(|| SchedulingError::NotInTable { name: name.clone() })?;

                let mut lvalue = name.clone();
                for (index, base) in indices.iter().zip(decl.bases()) {
                    let offset = simplify(&format!("{} - ({})", index, base))?;
                    lvalue = format!("{}[{}]", lvalue, offset);
                }
                trace!(lvalue = lvalue.as_str(), "reading");

                self.initialized.insert(name.clone());
                Ok(CNode::read(lvalue))
            }
            FormatNode::Newline => Ok(CNode::empty()),
            FormatNode::Sequence { items } => Ok(CNode::block(
                items
                    .iter()
                    .map(|item| self.visit(item))
                    .collect::<Result<_>>()?,
            )),
            FormatNode::Loop { name, size, body } => {
                let mut scope = self.enter_loop(name);
                let body = scope.visit(body)?;
                Ok(CNode::Loop {
                    name: name.clone(),
                    size: size.clone(),
                    body: Box::new(body),
                })
            }
        }
    }

    fn enter_loop<'s>(&'s mut self, name: &str) -> LoopScope<'s, 'a> {
        let pushed = self.declared.insert(name.to_string());
        LoopScope {
            builder: self,
            name: if pushed { Some(name.to_string()) } else { None },
        }
    }
}

/// Keeps a loop counter declared while the loop body is visited.
/// The counter is removed when the scope is dropped, on every exit path.
struct LoopScope<'s, 'a> {
    builder: &'s mut Builder<'a>,
    /// `None` if the name was already declared outside of the loop.
    name: Option<String>,
}

impl<'a> Deref for LoopScope<'_, 'a> {
    type Target = Builder<'a>;

    fn deref(&self) -> &Self::Target {
        &*self.builder
    }
}

impl<'a> DerefMut for LoopScope<'_, 'a> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.builder
    }
}

impl Drop for LoopScope<'_, '_> {
    fn drop(&mut self) {
        if let Some(name) = self.name.take() {
            self.builder.declared.remove(&name);
        }
    }
}
