//! Load a format from its textual description.

use std::fs::read_to_string;
use std::path::Path;

use codemap::CodeMap;
use tracing::debug;

use super::ast::FormatNode;
use super::sess::Sess;
use super::syntax::*;
use crate::error::{FormatError, Result};
use crate::expr::canonicalize;

/// Loads the format description at the given path.
/// Parse errors are rendered against the source, with colors if `color` is set.
pub fn load_format(path: &Path, color: bool) -> Result<FormatNode> {
    let source = read_to_string(path).map_err(|e| FormatError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    parse_format(&path.display().to_string(), &source, color)
}

/// Parses a format description. `name` is only used in diagnostics.
pub fn parse_format(name: &str, source: &str, color: bool) -> Result<FormatNode> {
    let mut code_map = CodeMap::new();
    let file = code_map.add_file(name.to_string(), source.to_string());
    let sess = Sess::new(&file, color);

    let format = syn::parse_str::<AFormat>(file.source())
        .and_then(|format| lower_block(&format.stmts))
        .map_err(|error| FormatError::Parse {
            rendered: sess.error(
                &error.to_string(),
                vec![sess.error_ann("here", error.span())],
            ),
        })?;

    debug!(file = name, "loaded format");
    Ok(format)
}

fn lower_block(stmts: &[AStmt]) -> syn::Result<FormatNode> {
    Ok(FormatNode::Sequence {
        items: stmts.iter().map(lower_stmt).collect::<syn::Result<_>>()?,
    })
}

fn lower_stmt(stmt: &AStmt) -> syn::Result<FormatNode> {
    match stmt {
        AStmt::Read { items, .. } => {
            let mut nodes = items
                .iter()
                .map(lower_item)
                .collect::<syn::Result<Vec<_>>>()?;
            nodes.push(FormatNode::Newline);
            Ok(FormatNode::Sequence { items: nodes })
        }
        AStmt::For {
            index, bound, body, ..
        } => Ok(FormatNode::Loop {
            name: index.to_string(),
            size: lower_expr(bound)?,
            body: Box::new(lower_block(body)?),
        }),
    }
}

fn lower_item(item: &AItem) -> syn::Result<FormatNode> {
    Ok(FormatNode::Item {
        name: item.name.to_string(),
        indices: item
            .indices
            .iter()
            .map(|(_, index)| lower_expr(index))
            .collect::<syn::Result<_>>()?,
    })
}

fn lower_expr(expr: &syn::Expr) -> syn::Result<String> {
    canonicalize(expr).map_err(|e| syn::Error::new_spanned(expr, e))
}
