mod context;
mod matcher;
mod unit;

pub use matcher::MatchOutcome;
pub use unit::UnitId;

use context::Context;
use matcher::try_match;
use crate::sentence::{CompiledGrammar, START_RULE};

/// A consumer-facing node of a completed parse: an owned tree, with no arena indices or
/// free lists to manage. Built once, after matching finishes, by walking the internal
/// first-child/next-sibling unit chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTree {
    pub rule: Option<&'static str>,
    pub start: usize,
    pub end: usize,
    pub children: Vec<ParseTree>,
}

/// The result of a [parse] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOutcome {
    pub root: Option<ParseTree>,
    pub terminated_normally: bool,
}

/// Parse `input` against `grammar`, starting from the synthetic `@start` rule.
///
/// `root` is `None` when the grammar's main rule could not match anything at all, or
/// (never observable through Rust's own allocator) on an allocation failure. Otherwise the
/// tree is returned even when it only covers a prefix of `input` — compare
/// `root.end` against `input.len()` to detect a partial parse.
pub fn parse(grammar: &CompiledGrammar, input: &[u8]) -> ParseOutcome {
    let mut ctx = Context::new(grammar, input);
    let start_rule = grammar
        .rule(START_RULE)
        .unwrap_or_else(|| unreachable!("every compiled grammar carries a synthetic @start rule"));

    match try_match(&mut ctx, Some(start_rule.name), start_rule.body) {
        MatchOutcome::Matched(id) => ParseOutcome {
            root: Some(build_tree(&ctx, id)),
            terminated_normally: !ctx.exception,
        },
        MatchOutcome::Mismatched => ParseOutcome {
            root: None,
            terminated_normally: false,
        },
        MatchOutcome::Errored => ParseOutcome {
            root: None,
            terminated_normally: false,
        },
    }
}

impl ptree::TreeItem for ParseTree {
    type Child = Self;

    fn write_self<W: std::io::Write>(&self, f: &mut W, _: &ptree::Style) -> std::io::Result<()> {
        write!(f, "{} # {}-{}", self.rule.unwrap_or("<anon>"), self.start, self.end)
    }

    fn children(&self) -> std::borrow::Cow<[Self::Child]> {
        std::borrow::Cow::from(&self.children)
    }
}

impl ParseTree {
    /// Pretty-print the tree to stdout, one line per node, indented by nesting depth.
    pub fn print(&self) -> std::io::Result<()> {
        ptree::print_tree(self)
    }
}

fn build_tree(ctx: &Context, id: UnitId) -> ParseTree {
    let unit = ctx.unit(id);
    let mut children = Vec::new();
    let mut next = unit.first_child;
    while let Some(child_id) = next {
        children.push(build_tree(ctx, child_id));
        next = ctx.unit(child_id).next_sibling;
    }
    ParseTree {
        rule: unit.rule,
        start: unit.start,
        end: unit.end,
        children,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emit::emit;
    use crate::parser::parse_grammar;
    use crate::token::tokenize;

    fn compile(src: &str, main: &str) -> CompiledGrammar {
        let tokens = tokenize(src).unwrap();
        let rules = parse_grammar(&tokens).unwrap();
        emit(rules, main).unwrap()
    }

    #[test]
    fn matches_a_literal_string() {
        let grammar = compile(r#"r = "a" ;"#, "r");
        let outcome = parse(&grammar, b"a");
        let root = outcome.root.unwrap();
        assert_eq!(root.end, 1);
        assert!(outcome.terminated_normally);
    }

    #[test]
    fn matches_repeated_char_range() {
        let grammar = compile(r#"digits = { <"0", "9"> } ;"#, "digits");
        let outcome = parse(&grammar, b"42");
        let root = outcome.root.unwrap();
        assert_eq!(root.end, 2);
    }

    #[test]
    fn exception_marks_premature_end() {
        let grammar = compile(r#"x = "a", -, "b" ;"#, "x");
        let outcome = parse(&grammar, b"a");
        assert!(!outcome.terminated_normally);
    }

    #[test]
    fn rejection_forbids_a_production() {
        let grammar = compile(r#"x = !( "a" ), <0x00, 0xFF> ;"#, "x");

        // "a" is the forbidden pattern: the rejection fails, so the whole rule fails.
        let forbidden = parse(&grammar, b"a");
        assert!(forbidden.root.is_none());

        // "b" does not match the forbidden pattern: the rejection succeeds with a
        // zero-width match, and the char range then consumes the byte.
        let allowed = parse(&grammar, b"b");
        let root = allowed.root.unwrap();
        assert_eq!(root.end, 1);
    }

    #[test]
    fn completely_unmatched_main_rule_returns_no_root() {
        let grammar = compile(r#"r = "a" ;"#, "r");
        let outcome = parse(&grammar, b"z");
        assert!(outcome.root.is_none());
    }

    #[test]
    fn underscore_prefixed_rules_splice_into_parent() {
        let grammar = compile(r#"main = "(", _inner, ")" ; _inner = "x" ;"#, "main");
        let outcome = parse(&grammar, b"(x)");
        let root = outcome.root.unwrap();
        assert!(root.children.iter().all(|c| c.rule != Some("_inner")));
    }

    #[test]
    fn repeated_optional_terminates_instead_of_looping_forever() {
        let grammar = compile(r#"x = { [ "a" ] } ;"#, "x");
        let outcome = parse(&grammar, b"b");
        let root = outcome.root.unwrap();
        assert_eq!(root.end, 0);
    }
}
