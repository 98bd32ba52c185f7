//! Peephole optimization of a code tree: flattens blocks and merges adjacent statements.

use std::collections::VecDeque;

use tracing::trace;

use super::tree::CNode;

/// Rewrites `node` bottom-up, in a single pass.
///
/// In the result, no block directly contains another block, and no two adjacent statements
/// in a block are both declarations, both reads or both writes.
/// Optimizing the result again leaves it unchanged.
pub fn optimize(node: CNode) -> CNode {
    match node {
        CNode::Decl { .. } | CNode::Read { .. } | CNode::Write { .. } | CNode::Opaque { .. } => {
            node
        }
        CNode::Block { nodes } => CNode::Block {
            nodes: merge_block(nodes),
        },
        CNode::Loop { name, size, body } => CNode::Loop {
            name,
            size,
            body: Box::new(optimize(*body)),
        },
    }
}

fn merge_block(nodes: Vec<CNode>) -> Vec<CNode> {
    let before = nodes.len();
    let mut queue: VecDeque<CNode> = nodes.into_iter().map(optimize).collect();
    let mut merged: Vec<CNode> = Vec::with_capacity(queue.len());

    while let Some(node) = queue.pop_front() {
        let node = match merged.last_mut() {
            Some(last) => match last.try_merge(node) {
                Ok(()) => continue,
                Err(node) => node,
            },
            None => node,
        };

        match node {
            // Inner blocks are already optimized: their children go through this same pass.
            CNode::Block { nodes } => {
                for inner in nodes.into_iter().rev() {
                    queue.push_front(inner);
                }
            }
            node => merged.push(node),
        }
    }

    trace!(before, after = merged.len(), "merged block");
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::VarDecl;

    #[test]
    fn flattens_and_merges() {
        let tree = CNode::block(vec![
            CNode::decl(VarDecl::scalar("N")),
            CNode::block(vec![
                CNode::read("N"),
                CNode::block(vec![CNode::decl(VarDecl::scalar("M")), CNode::empty()]),
                CNode::decl(VarDecl::scalar("K")),
                CNode::read("M"),
            ]),
            CNode::read("K"),
        ]);

        assert_eq!(
            optimize(tree),
            CNode::block(vec![
                CNode::decl(VarDecl::scalar("N")),
                CNode::read("N"),
                CNode::Decl {
                    decls: vec![VarDecl::scalar("M"), VarDecl::scalar("K")],
                },
                CNode::Read {
                    exprs: vec!["M".into(), "K".into()],
                },
            ])
        );
    }

    #[test]
    fn optimizes_loop_bodies_but_never_merges_across_them() {
        let tree = CNode::block(vec![
            CNode::read("N"),
            CNode::Loop {
                name: "i".into(),
                size: "N".into(),
                body: Box::new(CNode::block(vec![
                    CNode::block(vec![CNode::read("A[i]")]),
                    CNode::read("B[i]"),
                ])),
            },
            CNode::read("M"),
        ]);

        assert_eq!(
            optimize(tree),
            CNode::block(vec![
                CNode::read("N"),
                CNode::Loop {
                    name: "i".into(),
                    size: "N".into(),
                    body: Box::new(CNode::block(vec![CNode::Read {
                        exprs: vec!["A[i]".into(), "B[i]".into()],
                    }])),
                },
                CNode::read("M"),
            ])
        );
    }

    #[test]
    fn opaque_lines_separate_statements() {
        let tree = CNode::block(vec![
            CNode::write("a"),
            CNode::Opaque {
                line: "// between".into(),
            },
            CNode::write("b"),
            CNode::write("c"),
        ]);

        assert_eq!(
            optimize(tree),
            CNode::block(vec![
                CNode::write("a"),
                CNode::Opaque {
                    line: "// between".into(),
                },
                CNode::Write {
                    exprs: vec!["b".into(), "c".into()],
                },
            ])
        );
    }

    #[test]
    fn second_pass_is_a_no_op() {
        let tree = CNode::block(vec![
            CNode::empty(),
            CNode::block(vec![CNode::block(vec![CNode::read("a")]), CNode::read("b")]),
            CNode::block(vec![CNode::read("c")]),
        ]);
        let once = optimize(tree);
        assert_eq!(
            once,
            CNode::block(vec![CNode::Read {
                exprs: vec!["a".into(), "b".into(), "c".into()],
            }])
        );
        assert_eq!(optimize(once.clone()), once);
    }
}
