//! Derive the declaration table from the items a format reads.

use std::collections::BTreeSet;

use tracing::debug;

use super::ast::*;
use crate::error::{ExprError, Result};
use crate::expr::{free_vars, offset_from};

/// Lists the variables read by `format`, in order of first use.
///
/// Each subscript must be an enclosing loop variable plus an offset not depending on other
/// loop variables: the dimension is the size of that loop, and the offset is its base.
pub fn list_used_items(format: &FormatNode) -> Result<DeclTable> {
    let mut collector = Collector::default();
    collector.visit(format)?;
    Ok(collector.table)
}

#[derive(Default)]
struct Collector {
    /// Enclosing loops, outermost first, as `(var, size)`.
    loops: Vec<(String, String)>,
    table: DeclTable,
}

impl Collector {
    fn visit(&mut self, node: &FormatNode) -> Result<()> {
        match node {
            FormatNode::Item { name, indices } => {
                if self.table.contains(name) || self.is_loop_var(name) {
                    return Ok(());
                }
                let decl = self.declare(name, indices)?;
                debug!(decl = %decl, "derived declaration");
                self.table.insert(decl)?;
            }
            FormatNode::Newline => (),
            FormatNode::Sequence { items } => {
                for item in items {
                    self.visit(item)?;
                }
            }
            FormatNode::Loop { name, size, body } => {
                self.loops.push((name.clone(), size.clone()));
                let result = self.visit(body);
                self.loops.pop();
                result?;
            }
        }
        Ok(())
    }

    fn is_loop_var(&self, name: &str) -> bool {
        self.loops.iter().any(|(var, _)| var == name)
    }

    fn declare(&self, name: &str, indices: &[String]) -> Result<VarDecl> {
        let unsupported = |index: &str| ExprError::UnsupportedIndex {
            name: name.to_string(),
            index: index.to_string(),
        };

        let mut dims = Vec::new();
        let mut bases = Vec::new();
        for index in indices {
            let vars = free_vars(index)?;
            let (var, size) = self
                .loops
                .iter()
                .rev()
                .find(|(var, _)| vars.contains(var))
                .ok_or_else(|| unsupported(index))?;

            // Sizes must be known before the loop is entered, as the array is declared there.
            if free_vars(size)?.iter().any(|v| self.is_loop_var(v)) {
                return Err(unsupported(index).into());
            }

            let base = offset_from(index, var)?.ok_or_else(|| unsupported(index))?;
            if free_vars(&base)?.iter().any(|v| self.is_loop_var(v)) {
                return Err(unsupported(index).into());
            }

            dims.push(size.clone());
            bases.push(base);
        }

        let mut depending = BTreeSet::new();
        for dim in &dims {
            depending.extend(free_vars(dim)?);
        }

        Ok(VarDecl::new(name, dims, bases, depending)?)
    }
}
