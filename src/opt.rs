use std::path::PathBuf;

use structopt::StructOpt;

use iotemplate_cpp::{EmitConfig, ScalarTy};

#[derive(Debug, StructOpt)]
#[structopt(
    name = "iotemplate-cpp",
    about = "Generate C++ code reading the input of a competitive programming problem."
)]
pub enum Opt {
    #[structopt(about = "Checks that a format file is correct, and lists its variables")]
    Lint {
        #[structopt(long, parse(from_os_str), default_value = "./format")]
        format_file: PathBuf,
    },
    #[structopt(about = "Generates the code fragments of a template")]
    Code {
        #[structopt(long, parse(from_os_str), default_value = "./format")]
        format_file: PathBuf,
        #[structopt(flatten)]
        emit: EmitOpt,
    },
}

#[derive(Debug, StructOpt)]
pub struct EmitOpt {
    /// Indentation unit
    #[structopt(long, default_value = "    ")]
    indent: String,
    /// Reading style: `scanf` or `cin`
    #[structopt(long)]
    scanner: Option<String>,
    /// Writing style: `printf` or `cout`
    #[structopt(long)]
    printer: Option<String>,
    /// Macro used for loops, invoked as `MACRO (i, n)`
    #[structopt(long)]
    rep_macro: Option<String>,
    /// Qualify library names with `std::`
    #[structopt(long)]
    qualify_std: bool,
    /// Read 64-bit integers
    #[structopt(long)]
    int64: bool,
    /// Nesting level of the generated statements
    #[structopt(long, default_value = "1")]
    pub nest: usize,
}

impl EmitOpt {
    pub fn config(&self) -> EmitConfig {
        let mut config = EmitConfig::default().with_indent(&self.indent);
        if let Some(scanner) = &self.scanner {
            config = config.with_scanner(scanner);
        }
        if let Some(printer) = &self.printer {
            config = config.with_printer(printer);
        }
        if let Some(name) = &self.rep_macro {
            config = config.with_rep_macro(name);
        }
        if self.qualify_std {
            config = config.with_qualified_std();
        }
        if self.int64 {
            config = config.with_scalar(ScalarTy::Int64);
        }
        config
    }
}
