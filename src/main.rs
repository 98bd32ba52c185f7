extern crate structopt;

use std::path::Path;
use std::process::exit;

use structopt::StructOpt;
use tracing_subscriber::EnvFilter;

use iotemplate_cpp::code::build::build_tree;
use iotemplate_cpp::format::{list_used_items, load_format};
use iotemplate_cpp::*;

use crate::opt::*;

mod opt;

fn lint(format_file: &Path) -> Result<String> {
    let format = load_format(format_file, true)?;
    let table = list_used_items(&format)?;
    build_tree(&format, &table)?;

    let mut out = String::new();
    for decl in &table {
        out.push_str(&format!("{}\n", decl));
    }
    Ok(out)
}

fn code(format_file: &Path, emit: &EmitOpt) -> Result<String> {
    let config = emit.config();
    let format = load_format(format_file, true)?;
    let table = list_used_items(&format)?;

    let fragments = [
        ("return type", render_return_type()),
        ("parameter types", render_parameter_types(&table, &config)),
        ("parameter names", render_parameter_names(&table)),
        (
            "input reading",
            render_input_reading(&format, &table, &config, emit.nest)?,
        ),
        ("output stub", render_output_stub(&config, emit.nest)?),
    ];

    let mut out = String::new();
    for (label, text) in fragments.iter() {
        out.push_str(&format!("// {}\n{}\n\n", label, text));
    }
    Ok(out)
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let result = match Opt::from_args() {
        Opt::Lint { format_file } => lint(&format_file),
        Opt::Code { format_file, emit } => code(&format_file, &emit),
    };

    match result {
        Ok(content) => print!("{}", content),
        Err(e) => {
            eprintln!("{}", e);
            exit(1)
        }
    }
}
