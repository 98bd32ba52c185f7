use std::collections::BTreeSet;

use proptest::prelude::*;

use iotemplate_cpp::code::build::build_tree;
use iotemplate_cpp::code::indent::join_with_indent;
use iotemplate_cpp::code::lang::cpp::Emitter;
use iotemplate_cpp::code::peephole::optimize;
use iotemplate_cpp::code::tree::CNode;
use iotemplate_cpp::format::{list_used_items, FormatNode, VarDecl};
use iotemplate_cpp::EmitConfig;

fn arb_leaf() -> impl Strategy<Value = CNode> {
    prop_oneof![
        "[a-c]".prop_map(|name| CNode::decl(VarDecl::scalar(&name))),
        "[a-c]".prop_map(|name| CNode::read(name)),
        "[a-c]".prop_map(|name| CNode::write(name)),
        "// [a-c]".prop_map(|line| CNode::Opaque { line }),
        Just(CNode::empty()),
    ]
}

fn arb_tree() -> impl Strategy<Value = CNode> {
    arb_leaf().prop_recursive(4, 48, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(CNode::block),
            ("[i-k]", inner).prop_map(|(name, body)| CNode::Loop {
                name,
                size: "N".into(),
                body: Box::new(body),
            }),
        ]
    })
}

fn kind(node: &CNode) -> Option<u8> {
    match node {
        CNode::Decl { .. } => Some(0),
        CNode::Read { .. } => Some(1),
        CNode::Write { .. } => Some(2),
        _ => None,
    }
}

fn check_blocks(node: &CNode) -> Result<(), TestCaseError> {
    match node {
        CNode::Block { nodes } => {
            for node in nodes {
                prop_assert!(!matches!(node, CNode::Block { .. }), "nested block");
                check_blocks(node)?;
            }
            for pair in nodes.windows(2) {
                let (a, b) = (kind(&pair[0]), kind(&pair[1]));
                prop_assert!(a.is_none() || a != b, "unmerged {:?}", pair);
            }
        }
        CNode::Loop { body, .. } => check_blocks(body)?,
        _ => (),
    }
    Ok(())
}

/// Lines forming balanced blocks, e.g. `f();` or `for (;;) {`, ..., `}`.
fn arb_balanced() -> impl Strategy<Value = Vec<String>> {
    let leaf = "[a-z]{1,3}\\(\\);".prop_map(|line| vec![line]);
    leaf.prop_recursive(4, 32, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(|parts| parts.concat()),
            inner.prop_map(|body| {
                let mut lines = vec!["while (x) {".to_string()];
                lines.extend(body);
                lines.push("}".to_string());
                lines
            }),
        ]
    })
}

/// A format reading scalars, and arrays in loops over the scalars already read.
/// `None` reads the next scalar, `Some(k)` reads a new array sized by the `k`-th scalar.
fn format_of(steps: &[Option<usize>]) -> FormatNode {
    let mut scalars = 0;
    let mut arrays = 0;
    let mut items = Vec::new();
    for step in steps {
        match step {
            Some(k) if scalars > 0 => {
                let size = format!("S{}", k % scalars);
                let body = FormatNode::sequence(vec![
                    FormatNode::item(&format!("A{}", arrays), vec!["i"]),
                    FormatNode::Newline,
                ]);
                items.push(FormatNode::repeat("i", &size, body));
                arrays += 1;
            }
            _ => {
                items.push(FormatNode::sequence(vec![
                    FormatNode::scalar(&format!("S{}", scalars)),
                    FormatNode::Newline,
                ]));
                scalars += 1;
            }
        }
    }
    FormatNode::sequence(items)
}

/// Visits declarations and reads in emission order.
fn walk(node: &CNode, declared: &mut Vec<String>, reads: &mut Vec<(usize, String)>) {
    match node {
        CNode::Decl { decls } => declared.extend(decls.iter().map(|d| d.name().to_string())),
        CNode::Read { exprs } => {
            for expr in exprs {
                let name = expr.split('[').next().unwrap_or_default().to_string();
                reads.push((declared.len(), name));
            }
        }
        CNode::Block { nodes } => {
            for node in nodes {
                walk(node, declared, reads);
            }
        }
        CNode::Loop { body, .. } => walk(body, declared, reads),
        CNode::Write { .. } | CNode::Opaque { .. } => (),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn optimize_is_idempotent(tree in arb_tree()) {
        let once = optimize(tree);
        let twice = optimize(once.clone());
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn optimized_blocks_are_flat_and_merged(tree in arb_tree()) {
        check_blocks(&optimize(tree))?;
    }

    #[test]
    fn optimize_keeps_statement_order(tree in arb_tree()) {
        let emitter = Emitter::new(&EmitConfig::default()).unwrap();
        let tokens = |node: &CNode| -> Vec<String> {
            emitter
                .lines(node)
                .unwrap()
                .iter()
                .flat_map(|line| line.split(|c: char| !c.is_alphanumeric()).map(String::from))
                .filter(|token| token.len() == 1 && "abc".contains(token.as_str()))
                .collect()
        };
        let optimized = optimize(tree.clone());
        prop_assert_eq!(tokens(&tree), tokens(&optimized));
    }

    #[test]
    fn indentation_returns_to_base(lines in arb_balanced(), nest in 0usize..4) {
        let mut lines = lines;
        lines.push("end();".to_string());
        let text = join_with_indent(&lines, "  ", nest);
        let last = text.lines().last().unwrap();
        prop_assert_eq!(last, format!("{}end();", "  ".repeat(nest)));
    }

    #[test]
    fn each_variable_declared_once_before_reading(
        steps in prop::collection::vec(prop::option::of(0usize..4), 0..10),
    ) {
        let format = format_of(&steps);
        let table = list_used_items(&format).unwrap();
        let tree = optimize(build_tree(&format, &table).unwrap());

        let mut declared = Vec::new();
        let mut reads = Vec::new();
        walk(&tree, &mut declared, &mut reads);

        let unique: BTreeSet<&String> = declared.iter().collect();
        prop_assert_eq!(unique.len(), declared.len(), "declared twice: {:?}", declared);
        prop_assert_eq!(declared.len(), table.len());
        for (seen, name) in reads {
            prop_assert!(declared[..seen].contains(&name), "`{}` read before declaration", name);
        }
    }

    #[test]
    fn grouping_preserves_declaration_order(dims in prop::collection::vec(0usize..3, 1..8)) {
        let decls: Vec<VarDecl> = dims
            .iter()
            .enumerate()
            .map(|(k, &n)| {
                let sizes = vec!["N".to_string(); n];
                VarDecl::new(&format!("v{}", k), sizes, vec!["0".to_string(); n], Default::default())
                    .unwrap()
            })
            .collect();
        let emitter = Emitter::new(&EmitConfig::default()).unwrap();
        let lines = emitter.lines(&CNode::Decl { decls }).unwrap();

        let types: Vec<&str> = lines.iter().map(|l| l.split(" v").next().unwrap()).collect();
        for pair in types.windows(2) {
            prop_assert_ne!(pair[0], pair[1]);
        }
        let runs = 1 + dims.windows(2).filter(|w| w[0] != w[1]).count();
        prop_assert_eq!(lines.len(), runs);

        let text = lines.join("\n");
        let mut from = 0;
        for k in 0..dims.len() {
            let pos = text[from..].find(&format!("v{}", k));
            prop_assert!(pos.is_some(), "v{} missing or out of order in {}", k, text);
            from += pos.unwrap_or_default();
        }
    }
}
