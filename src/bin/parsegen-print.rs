//! Debug pretty-printer CLI: reads grammar source from stdin, compiles it, and writes it
//! back out fully parenthesized in the same grammar dialect.

use std::io::Read;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let main_rule = match parse_args(&args) {
        Some(name) => name,
        None => {
            eprintln!("usage: parsegen-print [--] <main-rule>");
            return ExitCode::FAILURE;
        }
    };

    let mut source = String::new();
    if let Err(err) = std::io::stdin().read_to_string(&mut source) {
        eprintln!("parsegen-print: error reading standard input: {}", err);
        return ExitCode::FAILURE;
    }

    let grammar = match parsegen::compile(&source, &main_rule) {
        Ok(grammar) => grammar,
        Err(err) => {
            eprintln!("parsegen-print: {}", err);
            return ExitCode::FAILURE;
        }
    };

    print!("{}", parsegen::render_grammar(&grammar));
    ExitCode::SUCCESS
}

fn parse_args(args: &[String]) -> Option<String> {
    match args {
        [name] if !name.starts_with('@') => Some(name.clone()),
        [dash, name] if dash == "--" && !name.starts_with('@') => Some(name.clone()),
        _ => None,
    }
}
