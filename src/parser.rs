//! Grammar parser (component B) and operator flattener (component C).
//!
//! Parsing and precedence-flattening are interleaved scope by scope: each bracketed group
//! (or the top-level rule body) is read into a flat operand/operator sequence and
//! immediately folded into a single [Expr] before its enclosing scope continues, since
//! EBNF's `,`/`|` precedence only ever needs to be resolved within one bracket level.

use crate::error::CompileError;
use crate::escape::{decode_bytes, decode_range_bound_identifier, decode_range_bound_string};
use crate::token::{Token, TokenKind};
use std::collections::HashSet;

/// The flattened expression tree for one grammar rule's body, or for one bracketed
/// sub-scope within it. This is exactly [crate::sentence::Sentence]'s shape, just owned
/// and recursive rather than arena-indexed; the emitter (component D) walks it once to
/// build the arena.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Concat(Box<Expr>, Box<Expr>),
    Alt(Box<Expr>, Box<Expr>),
    Optional(Box<Expr>),
    Repeated(Box<Expr>),
    Rejection(Box<Expr>),
    StringLiteral(Vec<u8>),
    CharRange(u8, u8),
    Rule(String),
    Exception,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OpKind {
    Comma,
    Pipe,
}

impl OpKind {
    fn precedence(self) -> u8 {
        match self {
            OpKind::Comma => 2,
            OpKind::Pipe => 1,
        }
    }
}

enum Item {
    Operand(Expr),
    Op(OpKind),
}

struct Cursor<'t> {
    tokens: &'t [Token],
    position: usize,
}

impl<'t> Cursor<'t> {
    fn current(&self) -> &Token {
        &self.tokens[self.position]
    }

    fn advance(&mut self) -> &Token {
        let token = &self.tokens[self.position];
        if self.position + 1 < self.tokens.len() {
            self.position += 1;
        }
        token
    }

    fn expect_symbol(&mut self, c: char) -> Result<(), CompileError> {
        if self.current().is_symbol(c) {
            self.advance();
            Ok(())
        } else {
            Err(CompileError::new(
                self.current().position,
                format!("expected '{}'", c),
            ))
        }
    }
}

/// Parse every `name = expression ;` rule in `tokens` into an ordered list of
/// `(name, Expr)` pairs, in source order. Does not validate cross-references between
/// rules; that is the emitter's job (component D) once every rule's body is known.
pub fn parse_grammar(tokens: &[Token]) -> Result<Vec<(String, Expr)>, CompileError> {
    let mut cursor = Cursor { tokens, position: 0 };
    let mut rules = Vec::new();
    let mut seen = HashSet::new();

    loop {
        match &cursor.current().kind {
            TokenKind::Eof => break,
            TokenKind::Identifier(name) => {
                let name = name.clone();
                let name_position = cursor.current().position;
                if name.starts_with('@') {
                    return Err(CompileError::new(name_position, "rule names starting with '@' are reserved"));
                }
                if !seen.insert(name.clone()) {
                    return Err(CompileError::new(name_position, format!("duplicate rule name '{}'", name)));
                }
                cursor.advance();
                cursor.expect_symbol('=')?;
                let body = parse_scope(&mut cursor, ';')?;
                cursor.expect_symbol(';')?;
                rules.push((name, body));
            }
            _ => {
                return Err(CompileError::new(
                    cursor.current().position,
                    "expected a rule name or end of file",
                ))
            }
        }
    }

    Ok(rules)
}

fn parse_scope(cursor: &mut Cursor, stop: char) -> Result<Expr, CompileError> {
    let mut items = Vec::new();

    loop {
        if cursor.current().is_symbol(stop) {
            break;
        }
        if matches!(cursor.current().kind, TokenKind::Eof) {
            return Err(CompileError::new(cursor.current().position, "premature end of file"));
        }

        if items.len() % 2 == 1 {
            match cursor.current().kind {
                TokenKind::Symbol(',') => {
                    cursor.advance();
                    items.push(Item::Op(OpKind::Comma));
                }
                TokenKind::Symbol('|') => {
                    cursor.advance();
                    items.push(Item::Op(OpKind::Pipe));
                }
                _ => {
                    return Err(CompileError::new(
                        cursor.current().position,
                        "expected ',', '|' or a closing bracket",
                    ))
                }
            }
        } else {
            items.push(Item::Operand(parse_operand(cursor)?));
        }
    }

    if items.is_empty() {
        return Err(CompileError::new(cursor.current().position, "empty expression"));
    }
    if items.len() % 2 == 0 {
        return Err(CompileError::new(cursor.current().position, "expression ends with a trailing operator"));
    }

    Ok(flatten(items))
}

fn parse_operand(cursor: &mut Cursor) -> Result<Expr, CompileError> {
    let token = cursor.current().clone();
    match token.kind {
        TokenKind::Symbol('(') => {
            cursor.advance();
            let inner = parse_scope(cursor, ')')?;
            cursor.expect_symbol(')')?;
            Ok(inner)
        }
        TokenKind::Symbol('[') => {
            cursor.advance();
            let inner = parse_scope(cursor, ']')?;
            cursor.expect_symbol(']')?;
            Ok(Expr::Optional(Box::new(inner)))
        }
        TokenKind::Symbol('{') => {
            cursor.advance();
            let inner = parse_scope(cursor, '}')?;
            cursor.expect_symbol('}')?;
            Ok(Expr::Repeated(Box::new(inner)))
        }
        TokenKind::Symbol('!') => {
            cursor.advance();
            let inner = parse_operand(cursor)?;
            Ok(Expr::Rejection(Box::new(inner)))
        }
        TokenKind::Symbol('-') => {
            cursor.advance();
            Ok(Expr::Exception)
        }
        TokenKind::Symbol('<') => {
            cursor.advance();
            let low = parse_range_bound(cursor)?;
            cursor.expect_symbol(',')?;
            let high = parse_range_bound(cursor)?;
            cursor.expect_symbol('>')?;
            if low > high {
                return Err(CompileError::new(token.position, "character range is inverted (low > high)"));
            }
            Ok(Expr::CharRange(low, high))
        }
        TokenKind::Identifier(name) => {
            cursor.advance();
            Ok(Expr::Rule(name))
        }
        TokenKind::StringLiteral(raw) => {
            cursor.advance();
            let bytes = decode_bytes(&raw, token.position)?;
            Ok(Expr::StringLiteral(bytes))
        }
        _ => Err(CompileError::new(token.position, "expected an operand")),
    }
}

fn parse_range_bound(cursor: &mut Cursor) -> Result<u8, CompileError> {
    let token = cursor.current().clone();
    match token.kind {
        TokenKind::Identifier(text) => {
            cursor.advance();
            decode_range_bound_identifier(&text, token.position)
        }
        TokenKind::StringLiteral(raw) => {
            cursor.advance();
            decode_range_bound_string(&raw, token.position)
        }
        _ => Err(CompileError::new(token.position, "expected a range bound")),
    }
}

/// Shunting-yard over an already-tokenized alternating operand/operator sequence,
/// collapsing it into a single left-associative, precedence-correct [Expr].
fn flatten(items: Vec<Item>) -> Expr {
    let mut output: Vec<Expr> = Vec::new();
    let mut ops: Vec<OpKind> = Vec::new();
    let mut iter = items.into_iter();

    match iter.next() {
        Some(Item::Operand(e)) => output.push(e),
        _ => unreachable!("parse_scope guarantees the sequence starts with an operand"),
    }

    while let Some(op_item) = iter.next() {
        let op = match op_item {
            Item::Op(op) => op,
            Item::Operand(_) => unreachable!("parse_scope guarantees operands and operators alternate"),
        };
        let operand = match iter.next() {
            Some(Item::Operand(e)) => e,
            _ => unreachable!("parse_scope guarantees the sequence ends with an operand"),
        };

        while let Some(top) = ops.last() {
            if top.precedence() >= op.precedence() {
                let right = output.pop().unwrap();
                let left = output.pop().unwrap();
                let top = ops.pop().unwrap();
                output.push(combine(top, left, right));
            } else {
                break;
            }
        }
        ops.push(op);
        output.push(operand);
    }

    while let Some(top) = ops.pop() {
        let right = output.pop().unwrap();
        let left = output.pop().unwrap();
        output.push(combine(top, left, right));
    }

    output.pop().expect("flatten always produces exactly one expression")
}

fn combine(op: OpKind, left: Expr, right: Expr) -> Expr {
    match op {
        OpKind::Comma => Expr::Concat(Box::new(left), Box::new(right)),
        OpKind::Pipe => Expr::Alt(Box::new(left), Box::new(right)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::tokenize;

    fn parse(src: &str) -> Vec<(String, Expr)> {
        parse_grammar(&tokenize(src).unwrap()).unwrap()
    }

    #[test]
    fn concatenation_binds_tighter_than_alternation() {
        let rules = parse(r#"r = "a", "b" | "c" ;"#);
        let (_, body) = &rules[0];
        match body {
            Expr::Alt(left, right) => {
                assert!(matches!(**left, Expr::Concat(_, _)));
                assert!(matches!(**right, Expr::StringLiteral(_)));
            }
            other => panic!("expected alternation at the top, got {:?}", other),
        }
    }

    #[test]
    fn same_operator_is_left_associative() {
        let rules = parse(r#"r = "a", "b", "c" ;"#);
        let (_, body) = &rules[0];
        match body {
            Expr::Concat(left, right) => {
                assert!(matches!(**left, Expr::Concat(_, _)));
                assert!(matches!(**right, Expr::StringLiteral(_)));
            }
            other => panic!("expected a concatenation at the top, got {:?}", other),
        }
    }

    #[test]
    fn rejects_duplicate_rule_names() {
        let err = parse_grammar(&tokenize(r#"r = "a" ; r = "b" ;"#).unwrap());
        assert!(err.is_err());
    }

    #[test]
    fn rejects_inverted_range() {
        let err = parse_grammar(&tokenize(r#"r = <"9", "0"> ;"#).unwrap());
        assert!(err.is_err());
    }

    #[test]
    fn rejects_reserved_rule_name() {
        let err = parse_grammar(&tokenize(r#"@start = "a" ;"#).unwrap());
        assert!(err.is_err());
    }
}
