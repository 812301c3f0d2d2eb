//! Debug pretty-printer: renders a compiled grammar back into its EBNF surface syntax,
//! fully parenthesized so precedence never needs to be inferred by the reader. Used by the
//! `parsegen-print` binary.

use crate::sentence::{CompiledGrammar, Sentence, SentenceId};
use std::fmt::Write;

pub fn render_grammar(grammar: &CompiledGrammar) -> String {
    let mut out = String::new();
    let mut first = true;
    for rule in grammar.rules {
        if rule.name.starts_with('@') {
            continue;
        }
        if !first {
            out.push('\n');
        }
        first = false;
        write!(out, "{} = ", rule.name).unwrap();
        render_sentence(grammar, rule.body, &mut out);
        out.push_str(" ;\n");
    }
    out
}

fn render_sentence(grammar: &CompiledGrammar, id: SentenceId, out: &mut String) {
    match grammar.sentence(id) {
        Sentence::Concatenation { left, right } => {
            out.push('(');
            render_sentence(grammar, *left, out);
            out.push_str(", ");
            render_sentence(grammar, *right, out);
            out.push(')');
        }
        Sentence::Alternation { left, right } => {
            out.push('(');
            render_sentence(grammar, *left, out);
            out.push_str(" | ");
            render_sentence(grammar, *right, out);
            out.push(')');
        }
        Sentence::Rejection { inner } => {
            out.push_str("!(");
            render_sentence(grammar, *inner, out);
            out.push(')');
        }
        Sentence::Optional { inner } => {
            out.push('[');
            render_sentence(grammar, *inner, out);
            out.push(']');
        }
        Sentence::Repeated { inner } => {
            out.push('{');
            render_sentence(grammar, *inner, out);
            out.push('}');
        }
        Sentence::String { bytes } => {
            out.push('"');
            for &b in *bytes {
                render_byte_escaped(b, out);
            }
            out.push('"');
        }
        Sentence::CharRange { low, high } => {
            out.push('<');
            render_bound(*low, out);
            out.push_str(", ");
            render_bound(*high, out);
            out.push('>');
        }
        Sentence::Rule { name } => out.push_str(name),
        Sentence::Exception => out.push('-'),
        Sentence::Eof => out.push_str("!<0x00, 0xFF>"),
    }
}

fn render_bound(b: u8, out: &mut String) {
    if is_printable(b) {
        out.push('"');
        render_byte_escaped(b, out);
        out.push('"');
    } else {
        write!(out, "0x{:02x}", b).unwrap();
    }
}

fn render_byte_escaped(b: u8, out: &mut String) {
    match b {
        b'"' => out.push_str("\\\""),
        b'\\' => out.push_str("\\\\"),
        b'\n' => out.push_str("\\n"),
        b'\t' => out.push_str("\\t"),
        b if is_printable(b) => out.push(b as char),
        b => {
            write!(out, "\\x{:02x}", b).unwrap();
        }
    }
}

fn is_printable(b: u8) -> bool {
    (0x20..=0x7e).contains(&b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emit::emit;
    use crate::parser::parse_grammar;
    use crate::token::tokenize;

    #[test]
    fn renders_each_non_synthetic_rule_once() {
        let tokens = tokenize(r#"r = "a", "b" ;"#).unwrap();
        let rules = parse_grammar(&tokens).unwrap();
        let grammar = emit(rules, "r").unwrap();
        let rendered = render_grammar(&grammar);
        assert_eq!(rendered.matches("r =").count(), 1);
        assert!(!rendered.contains('@'));
    }
}
