//! Emitter (component D): walks each rule's flattened [Expr] tree, links it into a shared
//! sentence arena, cross-checks rule references, appends the synthetic `@eof`/`@noeof`/
//! `@start` rules, and can render the result either as an in-process [CompiledGrammar] or
//! as Rust source text for `include!`-ing into another crate.

use crate::error::{GrammarError, ValidationError};
use crate::parser::Expr;
use crate::sentence::{CompiledGrammar, Rule, Sentence, SentenceId, EOF_RULE, NOEOF_RULE, START_RULE};
use std::collections::HashSet;
use std::fmt::Write as _;

/// Emit `rules` (in source order, as produced by [crate::parser::parse_grammar]) into a
/// linked, `'static` [CompiledGrammar] rooted at `main_rule`.
///
/// Leaks the backing arenas and every name/byte-string they reference: this mirrors the
/// original design's intent of producing a static table meant to live for the process's
/// whole lifetime, and lets the in-process path share exactly the same [CompiledGrammar]
/// type the emitted-source path produces.
pub fn emit(rules: Vec<(String, Expr)>, main_rule: &str) -> Result<CompiledGrammar, GrammarError> {
    validate_references(&rules, main_rule)?;

    let mut sentences: Vec<Sentence> = Vec::new();
    let mut table: Vec<Rule> = Vec::new();

    for (name, body) in &rules {
        let body_id = emit_expr(body, &mut sentences);
        table.push(Rule {
            name: leak_str(name),
            body: body_id,
        });
    }

    let eof_body = push(&mut sentences, Sentence::Eof);
    let noeof_body = push(&mut sentences, Sentence::Exception);
    table.push(Rule { name: EOF_RULE, body: eof_body });
    table.push(Rule { name: NOEOF_RULE, body: noeof_body });

    let ref_main = push(&mut sentences, Sentence::Rule { name: leak_str(main_rule) });
    let ref_eof = push(&mut sentences, Sentence::Rule { name: EOF_RULE });
    let ref_noeof = push(&mut sentences, Sentence::Rule { name: NOEOF_RULE });
    let alt = push(
        &mut sentences,
        Sentence::Alternation { left: ref_eof, right: ref_noeof },
    );
    let start_body = push(
        &mut sentences,
        Sentence::Concatenation { left: ref_main, right: alt },
    );
    table.push(Rule { name: START_RULE, body: start_body });

    Ok(CompiledGrammar {
        sentences: Box::leak(sentences.into_boxed_slice()),
        rules: Box::leak(table.into_boxed_slice()),
    })
}

fn validate_references(rules: &[(String, Expr)], main_rule: &str) -> Result<(), ValidationError> {
    let defined: HashSet<&str> = rules.iter().map(|(name, _)| name.as_str()).collect();
    if !defined.contains(main_rule) {
        return Err(ValidationError::new(
            "UndefinedMainRule",
            format!("main rule '{}' is not defined", main_rule),
        ));
    }

    let mut referenced: HashSet<&str> = HashSet::new();
    for (_, body) in rules {
        collect_references(body, &mut referenced);
    }

    let mut undefined: Vec<&str> = referenced.difference(&defined).copied().collect();
    undefined.sort_unstable();
    if !undefined.is_empty() {
        return Err(ValidationError::new(
            "UndefinedReference",
            format!("undefined rule(s) referenced: {}", undefined.join(", ")),
        ));
    }

    let mut unused: Vec<&str> = defined
        .iter()
        .copied()
        .filter(|name| *name != main_rule && !referenced.contains(name))
        .collect();
    unused.sort_unstable();
    if !unused.is_empty() {
        return Err(ValidationError::new(
            "UnusedRule",
            format!("rule(s) defined but never referenced: {}", unused.join(", ")),
        ));
    }

    Ok(())
}

fn collect_references<'e>(expr: &'e Expr, out: &mut HashSet<&'e str>) {
    match expr {
        Expr::Concat(l, r) | Expr::Alt(l, r) => {
            collect_references(l, out);
            collect_references(r, out);
        }
        Expr::Optional(inner) | Expr::Repeated(inner) | Expr::Rejection(inner) => {
            collect_references(inner, out);
        }
        Expr::Rule(name) => {
            out.insert(name.as_str());
        }
        Expr::StringLiteral(_) | Expr::CharRange(_, _) | Expr::Exception => {}
    }
}

fn emit_expr(expr: &Expr, sentences: &mut Vec<Sentence>) -> SentenceId {
    let sentence = match expr {
        Expr::Concat(l, r) => {
            let left = emit_expr(l, sentences);
            let right = emit_expr(r, sentences);
            Sentence::Concatenation { left, right }
        }
        Expr::Alt(l, r) => {
            let left = emit_expr(l, sentences);
            let right = emit_expr(r, sentences);
            Sentence::Alternation { left, right }
        }
        Expr::Optional(inner) => {
            let inner = emit_expr(inner, sentences);
            Sentence::Optional { inner }
        }
        Expr::Repeated(inner) => {
            let inner = emit_expr(inner, sentences);
            Sentence::Repeated { inner }
        }
        Expr::Rejection(inner) => {
            let inner = emit_expr(inner, sentences);
            Sentence::Rejection { inner }
        }
        Expr::StringLiteral(bytes) => Sentence::String { bytes: leak_bytes(bytes) },
        Expr::CharRange(low, high) => Sentence::CharRange { low: *low, high: *high },
        Expr::Rule(name) => Sentence::Rule { name: leak_str(name) },
        Expr::Exception => Sentence::Exception,
    };
    push(sentences, sentence)
}

fn push(sentences: &mut Vec<Sentence>, sentence: Sentence) -> SentenceId {
    sentences.push(sentence);
    SentenceId(sentences.len() - 1)
}

fn leak_str(s: &str) -> &'static str {
    Box::leak(s.to_owned().into_boxed_str())
}

fn leak_bytes(b: &[u8]) -> &'static [u8] {
    Box::leak(b.to_vec().into_boxed_slice())
}

/// Render `grammar` as Rust source text defining `pub static GRAMMAR: parsegen::CompiledGrammar`,
/// suitable for writing to a file and `include!`-ing from a consumer crate.
pub fn render_rust_source(grammar: &CompiledGrammar) -> String {
    let mut out = String::new();
    writeln!(out, "// Generated by parsegen-compile. Do not edit by hand.").unwrap();
    writeln!(out, "static SENTENCES: &[parsegen::Sentence] = &[").unwrap();
    for sentence in grammar.sentences {
        writeln!(out, "    {},", render_sentence(sentence)).unwrap();
    }
    writeln!(out, "];").unwrap();

    writeln!(out, "static RULES: &[parsegen::Rule] = &[").unwrap();
    for rule in grammar.rules {
        writeln!(
            out,
            "    parsegen::Rule {{ name: {:?}, body: parsegen::SentenceId({}) }},",
            rule.name, rule.body.0
        )
        .unwrap();
    }
    writeln!(out, "];").unwrap();

    writeln!(
        out,
        "pub static GRAMMAR: parsegen::CompiledGrammar = parsegen::CompiledGrammar {{ sentences: SENTENCES, rules: RULES }};"
    )
    .unwrap();
    out
}

fn render_sentence(sentence: &Sentence) -> String {
    match sentence {
        Sentence::Concatenation { left, right } => {
            format!("parsegen::Sentence::Concatenation {{ left: parsegen::SentenceId({}), right: parsegen::SentenceId({}) }}", left.0, right.0)
        }
        Sentence::Alternation { left, right } => {
            format!("parsegen::Sentence::Alternation {{ left: parsegen::SentenceId({}), right: parsegen::SentenceId({}) }}", left.0, right.0)
        }
        Sentence::Optional { inner } => {
            format!("parsegen::Sentence::Optional {{ inner: parsegen::SentenceId({}) }}", inner.0)
        }
        Sentence::Repeated { inner } => {
            format!("parsegen::Sentence::Repeated {{ inner: parsegen::SentenceId({}) }}", inner.0)
        }
        Sentence::Rejection { inner } => {
            format!("parsegen::Sentence::Rejection {{ inner: parsegen::SentenceId({}) }}", inner.0)
        }
        Sentence::String { bytes } => format!("parsegen::Sentence::String {{ bytes: &{:?} }}", bytes),
        Sentence::CharRange { low, high } => {
            format!("parsegen::Sentence::CharRange {{ low: {}, high: {} }}", low, high)
        }
        Sentence::Rule { name } => format!("parsegen::Sentence::Rule {{ name: {:?} }}", name),
        Sentence::Exception => "parsegen::Sentence::Exception".to_string(),
        Sentence::Eof => "parsegen::Sentence::Eof".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_grammar;
    use crate::token::tokenize;

    fn compile(src: &str, main: &str) -> Result<CompiledGrammar, GrammarError> {
        let tokens = tokenize(src).unwrap();
        let rules = parse_grammar(&tokens).unwrap();
        emit(rules, main)
    }

    #[test]
    fn appends_synthetic_rules() {
        let grammar = compile(r#"r = "a" ;"#, "r").unwrap();
        assert!(grammar.rule("@eof").is_some());
        assert!(grammar.rule("@noeof").is_some());
        assert!(grammar.rule("@start").is_some());
    }

    #[test]
    fn rejects_undefined_reference() {
        assert!(compile(r#"r = missing ;"#, "r").is_err());
    }

    #[test]
    fn rejects_unused_rule() {
        assert!(compile(r#"r = "a" ; unused = "b" ;"#, "r").is_err());
    }

    #[test]
    fn rejects_undefined_main_rule() {
        assert!(compile(r#"r = "a" ;"#, "missing").is_err());
    }
}
