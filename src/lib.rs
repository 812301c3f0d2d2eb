//! `parsegen` is a small toolkit for building recursive-descent parsers from an EBNF-style
//! grammar: a grammar compiler that turns grammar source text into a linked, `'static`
//! rule table, and a backtracking parse runtime that matches that table against an input
//! buffer and produces a parse tree annotated with span offsets and rule names.
//!
//! # Overview
//!
//! A grammar is written as a sequence of rules:
//!
//! ```text
//! value = number | string ;
//! number = { <"0", "9"> } ;
//! string = "\"", { !( "\"" ), <0x00, 0xFF> }, "\"" ;
//! ```
//!
//! [compile] turns grammar source like this into a [CompiledGrammar]; [parse] then matches
//! that grammar against an input buffer.
//!
//! # Example
//!
//! ```
//! use parsegen::{compile, parse};
//!
//! let grammar = compile(r#"digits = { <"0", "9"> } ;"#, "digits").unwrap();
//! let outcome = parse(&grammar, b"42");
//! let root = outcome.root.unwrap();
//! assert_eq!(root.end, 2);
//! ```
//!
//! # License
//! [parsegen](crate) is provided under the MIT license. See
//! [LICENSE](https://github.com/creative-forest/parsegen/blob/main/LICENSE).

mod emit;
mod error;
mod escape;
mod log;
mod parser;
pub mod position;
mod print;
mod runtime;
mod sentence;
mod token;

pub use emit::render_rust_source;
pub use error::{CompileError, GrammarError, ValidationError};
pub use log::Log;
pub use print::render_grammar;
pub use runtime::{parse, MatchOutcome, ParseOutcome, ParseTree};
pub use sentence::{CompiledGrammar, Rule, Sentence, SentenceId};

/// Compile grammar source text into a linked, in-process [CompiledGrammar] rooted at
/// `main_rule`. This runs the whole pipeline (lexer, parser, flattener, emitter) and is
/// the entry point used both by tests and by [bin/parsegen-compile] before it renders the
/// result as Rust source instead of keeping it in-process.
pub fn compile(source: &str, main_rule: &str) -> Result<CompiledGrammar, GrammarError> {
    compile_with_log(source, main_rule, Log::None)
}

/// Like [compile], but traces each pipeline stage through `log` (a no-op at [Log::None],
/// and compiled out entirely outside debug builds).
pub fn compile_with_log(source: &str, main_rule: &str, log: Log<&'static str>) -> Result<CompiledGrammar, GrammarError> {
    let code = position::Code::new(source);

    log.trace(&code, 0, "tokenizing grammar source");
    let tokens = token::tokenize(source)?;

    log.trace(&code, 0, "parsing token stream into rule bodies");
    let rules = parser::parse_grammar(&tokens)?;

    log.trace(&code, 0, "emitting linked sentence arena");
    let grammar = emit::emit(rules, main_rule)?;

    log.trace_verbose(&code, 0, "grammar compiled");
    Ok(grammar)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compile_then_parse_round_trip() {
        let grammar = compile(r#"r = "a" ;"#, "r").unwrap();
        let outcome = parse(&grammar, b"a");
        assert!(outcome.root.is_some());
    }

    #[test]
    fn compile_reports_lexical_errors_with_position() {
        let err = compile(r#"r = "" ;"#, "r");
        assert!(err.is_err());
    }
}
