//! Re-indentation of flat lines of code, driven by the braces they open and close.

pub const BLOCK_OPEN: char = '{';
pub const BLOCK_CLOSE: char = '}';

/// Indents each line by `indent` repeated by the current nesting, starting at `nest`,
/// and joins them with newlines.
///
/// A line starting with `}` is indented one level less; after a line ending with `{`
/// the nesting increases by one.
pub fn join_with_indent<I>(lines: I, indent: &str, nest: usize) -> String
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut nest = nest;
    let mut buf = Vec::new();
    for line in lines {
        let line = line.as_ref();
        if line.starts_with(BLOCK_CLOSE) {
            nest = nest.saturating_sub(1);
        }
        buf.push(format!("{}{}", indent.repeat(nest), line));
        if line.ends_with(BLOCK_OPEN) {
            nest += 1;
        }
    }
    buf.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nests_blocks() {
        let lines = vec!["int N;", "for (;;) {", "f();", "if (x) {", "g();", "}", "}", "h();"];
        assert_eq!(
            join_with_indent(lines, "  ", 1),
            "  int N;\n  for (;;) {\n    f();\n    if (x) {\n      g();\n    }\n  }\n  h();"
        );
    }

    #[test]
    fn close_and_open_on_the_same_line() {
        let lines = vec!["if (a) {", "f();", "} else {", "g();", "}"];
        assert_eq!(
            join_with_indent(lines, "\t", 0),
            "if (a) {\n\tf();\n} else {\n\tg();\n}"
        );
    }

    #[test]
    fn unbalanced_close_does_not_underflow() {
        assert_eq!(join_with_indent(vec!["}", "}"], "    ", 1), "}\n}");
    }

    #[test]
    fn empty() {
        assert_eq!(join_with_indent(Vec::<String>::new(), "    ", 2), "");
    }
}
