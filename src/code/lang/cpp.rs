//! Emission of C++ code from a code tree.

use genco::prelude::*;
use tracing::debug;

use super::config::*;
use super::ty::type_and_ctor;
use crate::code::indent::{join_with_indent, BLOCK_CLOSE, BLOCK_OPEN};
use crate::code::tree::CNode;
use crate::error::{ConfigurationError, Result};
use crate::format::VarDecl;

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CppLang;

impl Lang for CppLang {
    type Config = ();
    type Format = ();
    type Item = ();
}

/// Written inside format strings, which are quoted verbatim.
const NEWLINE_ESCAPE: &str = r"\n";

enum LoopStyle {
    For,
    Macro(String),
    Custom(LoopFn),
}

enum ScanStyle {
    Scanf,
    Cin,
    Custom(StmtFn),
}

enum PrintStyle {
    Printf,
    Cout,
    Custom(StmtFn),
}

/// Turns code trees into C++ lines, with the strategies chosen by an `EmitConfig`.
pub struct Emitter {
    loop_style: LoopStyle,
    scan_style: ScanStyle,
    print_style: PrintStyle,
    std: &'static str,
    scalar: ScalarTy,
    indent: String,
}

impl Emitter {
    /// Resolves the named strategies of `config`. Fails if any name is not recognized.
    pub fn new(config: &EmitConfig) -> Result<Emitter, ConfigurationError> {
        debug!(?config, "building emitter");
        Ok(Emitter {
            loop_style: match &config.loop_construct {
                Strategy::Default => LoopStyle::For,
                Strategy::Named(name) if is_identifier(name) => LoopStyle::Macro(name.clone()),
                Strategy::Named(name) => {
                    return Err(ConfigurationError::InvalidLoopMacro { name: name.clone() })
                }
                Strategy::Custom(f) => LoopStyle::Custom(f.clone()),
            },
            scan_style: match &config.scanner {
                Strategy::Default => ScanStyle::Scanf,
                Strategy::Named(name) => match name.as_str() {
                    "scanf" => ScanStyle::Scanf,
                    "cin" | "std::cin" => ScanStyle::Cin,
                    _ => return Err(ConfigurationError::UnknownScanner { name: name.clone() }),
                },
                Strategy::Custom(f) => ScanStyle::Custom(f.clone()),
            },
            print_style: match &config.printer {
                Strategy::Default => PrintStyle::Printf,
                Strategy::Named(name) => match name.as_str() {
                    "printf" => PrintStyle::Printf,
                    "cout" | "std::cout" => PrintStyle::Cout,
                    _ => return Err(ConfigurationError::UnknownPrinter { name: name.clone() }),
                },
                Strategy::Custom(f) => PrintStyle::Custom(f.clone()),
            },
            std: config.std_prefix(),
            scalar: config.scalar,
            indent: config.indent.clone(),
        })
    }

    /// Emits `node` as indented text, starting at nesting level `nest`.
    pub fn render(&self, node: &CNode, nest: usize) -> Result<String> {
        let lines = self.lines(node)?;
        debug!(lines = lines.len(), nest, "emitted");
        Ok(join_with_indent(&lines, &self.indent, nest))
    }

    /// Emits `node` as unindented lines.
    pub fn lines(&self, node: &CNode) -> Result<Vec<String>> {
        let mut lines = Vec::new();
        self.emit(node, &mut lines)?;
        Ok(lines)
    }

    fn emit(&self, node: &CNode, lines: &mut Vec<String>) -> Result<()> {
        match node {
            CNode::Decl { decls } => {
                for (ty, vars) in self.group_by_type(decls) {
                    lines.push(line(DeclStmt { ty: &ty, vars })?);
                }
            }
            CNode::Read { exprs } => lines.push(self.read_line(exprs)?),
            CNode::Write { exprs } => lines.push(self.write_line(exprs)?),
            CNode::Block { nodes } => {
                for node in nodes {
                    self.emit(node, lines)?;
                }
            }
            CNode::Loop { name, size, body } => {
                lines.push(format!("{} {}", self.loop_line(name, size)?, BLOCK_OPEN));
                self.emit(body, lines)?;
                lines.push(BLOCK_CLOSE.to_string());
            }
            CNode::Opaque { line } => lines.push(line.clone()),
        }
        Ok(())
    }

    /// Splits declarations into maximal runs of the same type, keeping their order.
    /// Each variable comes with its constructor.
    fn group_by_type<'d>(&self, decls: &'d [VarDecl]) -> Vec<(String, Vec<(&'d str, String)>)> {
        let mut groups: Vec<(String, Vec<(&'d str, String)>)> = Vec::new();
        for decl in decls {
            let (ty, ctor) = type_and_ctor(decl.dims(), self.scalar, self.std);
            if let Some((last_ty, vars)) = groups.last_mut() {
                if *last_ty == ty {
                    vars.push((decl.name(), ctor));
                    continue;
                }
            }
            groups.push((ty, vec![(decl.name(), ctor)]));
        }
        groups
    }

    fn read_line(&self, exprs: &[String]) -> Result<String> {
        match &self.scan_style {
            ScanStyle::Scanf => line(ScanfCall {
                spec: self.scalar.format_spec(),
                exprs,
            }),
            ScanStyle::Cin => line(CinChain {
                std: self.std,
                exprs,
            }),
            ScanStyle::Custom(f) => Ok(f(exprs)),
        }
    }

    fn write_line(&self, exprs: &[String]) -> Result<String> {
        match &self.print_style {
            PrintStyle::Printf => line(PrintfCall {
                spec: self.scalar.format_spec(),
                exprs,
            }),
            PrintStyle::Cout => line(CoutChain {
                std: self.std,
                exprs,
            }),
            PrintStyle::Custom(f) => Ok(f(exprs)),
        }
    }

    fn loop_line(&self, var: &str, size: &str) -> Result<String> {
        match &self.loop_style {
            LoopStyle::For => line(ForHeader { var, size }),
            LoopStyle::Macro(name) => line(MacroHeader { name, var, size }),
            LoopStyle::Custom(f) => Ok(f(var, size)),
        }
    }
}

fn line(code: impl FormatInto<CppLang>) -> Result<String> {
    let tokens: Tokens<CppLang> = quote!(#code);
    Ok(tokens.to_string()?)
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

/// E.g., `vector<int> A(N), B(N);`.
struct DeclStmt<'a> {
    ty: &'a str,
    vars: Vec<(&'a str, String)>,
}

impl FormatInto<CppLang> for DeclStmt<'_> {
    fn format_into(self, tokens: &mut Tokens<CppLang>) {
        let DeclStmt { ty, vars } = self;
        quote_in! { *tokens =>
            #ty #(for (name, ctor) in vars join (, ) => #name#ctor);
        }
    }
}

/// E.g., `scanf("%d%d", &N, &A[i]);`.
struct ScanfCall<'a> {
    spec: &'static str,
    exprs: &'a [String],
}

impl FormatInto<CppLang> for ScanfCall<'_> {
    fn format_into(self, tokens: &mut Tokens<CppLang>) {
        let ScanfCall { spec, exprs } = self;
        let specs = spec.repeat(exprs.len());
        quote_in! { *tokens =>
            scanf(#(quoted(specs)), #(for e in exprs join (, ) => &#e));
        }
    }
}

/// E.g., `cin >> N >> A[i];`.
struct CinChain<'a> {
    std: &'static str,
    exprs: &'a [String],
}

impl FormatInto<CppLang> for CinChain<'_> {
    fn format_into(self, tokens: &mut Tokens<CppLang>) {
        let CinChain { std: prefix, exprs } = self;
        quote_in! { *tokens =>
            #(prefix)cin #(for e in exprs join ( ) => >> #e);
        }
    }
}

/// E.g., `printf("%d %d\n", a, b);`.
struct PrintfCall<'a> {
    spec: &'static str,
    exprs: &'a [String],
}

impl FormatInto<CppLang> for PrintfCall<'_> {
    fn format_into(self, tokens: &mut Tokens<CppLang>) {
        let PrintfCall { spec, exprs } = self;
        let specs = format!("{}{}", vec![spec; exprs.len()].join(" "), NEWLINE_ESCAPE);
        quote_in! { *tokens =>
            printf(#(quoted(specs)), #(for e in exprs join (, ) => #e));
        }
    }
}

/// E.g., `cout << a << ' ' << b << endl;`.
struct CoutChain<'a> {
    std: &'static str,
    exprs: &'a [String],
}

impl FormatInto<CppLang> for CoutChain<'_> {
    fn format_into(self, tokens: &mut Tokens<CppLang>) {
        let CoutChain { std: prefix, exprs } = self;
        quote_in! { *tokens =>
            #(prefix)cout << #(for e in exprs join ( << ' ' << ) => #e) << #(prefix)endl;
        }
    }
}

/// E.g., `for (int i = 0; i < N; ++i)`.
struct ForHeader<'a> {
    var: &'a str,
    size: &'a str,
}

impl FormatInto<CppLang> for ForHeader<'_> {
    fn format_into(self, tokens: &mut Tokens<CppLang>) {
        let ForHeader { var, size } = self;
        quote_in! { *tokens =>
            for (int #var = 0; #var < #size; ++#var)
        }
    }
}

/// E.g., `REP (i, N)`.
struct MacroHeader<'a> {
    name: &'a str,
    var: &'a str,
    size: &'a str,
}

impl FormatInto<CppLang> for MacroHeader<'_> {
    fn format_into(self, tokens: &mut Tokens<CppLang>) {
        let MacroHeader { name, var, size } = self;
        quote_in! { *tokens =>
            #name (#var, #size)
        }
    }
}
