//! Grammar compiler CLI: reads grammar source from stdin, compiles it against a given
//! main rule, and writes the linked table as Rust source to stdout.

use std::io::{Read, Write};
use std::process::ExitCode;

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let main_rule = match parse_args(&args) {
        Some(name) => name,
        None => {
            eprintln!("usage: parsegen-compile [--] <main-rule>");
            return ExitCode::FAILURE;
        }
    };

    let mut source = String::new();
    if let Err(err) = std::io::stdin().read_to_string(&mut source) {
        eprintln!("parsegen-compile: error reading standard input: {}", err);
        return ExitCode::FAILURE;
    }

    let grammar = match parsegen::compile(&source, &main_rule) {
        Ok(grammar) => grammar,
        Err(err) => {
            eprintln!("parsegen-compile: {}", err);
            return ExitCode::FAILURE;
        }
    };

    let rendered = parsegen::render_rust_source(&grammar);
    if let Err(err) = std::io::stdout().write_all(rendered.as_bytes()) {
        eprintln!("parsegen-compile: error writing standard output: {}", err);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn parse_args(args: &[String]) -> Option<String> {
    match args {
        [name] if !name.starts_with('@') => Some(name.clone()),
        [dash, name] if dash == "--" && !name.starts_with('@') => Some(name.clone()),
        _ => None,
    }
}
