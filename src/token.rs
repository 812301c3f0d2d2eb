//! Grammar lexer (component A): splits grammar source into a flat token stream with
//! line/column/character position attached to each token.

use crate::error::CompileError;
use crate::position::Position;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    Identifier(String),
    /// Raw bytes between the quotes, escapes not yet decoded.
    StringLiteral(String),
    Symbol(char),
    Eof,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub position: Position,
}

impl Token {
    pub fn is_symbol(&self, c: char) -> bool {
        matches!(&self.kind, TokenKind::Symbol(s) if *s == c)
    }
}

const SYMBOLS: &[char] = &['=', '(', ')', '[', ']', '{', '}', '<', '>', '|', ',', ';', '-', '!'];

/// Tokenize grammar source text into a vector of [Token], followed by one [TokenKind::Eof].
///
/// Block comments `(* ... *)` are recognized here rather than as a later pass: a comment
/// begins only when a `*` immediately follows a `(` with no intervening character (matching
/// the adjacency rule that distinguishes a comment opener from grouping followed by a
/// repetition-operand), and is skipped like whitespace.
pub fn tokenize(source: &str) -> Result<Vec<Token>, CompileError> {
    let mut tokens = Vec::new();
    let mut chars: Vec<(usize, char)> = source.char_indices().collect();
    chars.push((source.len(), '\0'));

    let mut position = Position::new(1, 0, 0);
    let mut i = 0;

    while i < chars.len() {
        let (_, c) = chars[i];
        if c == '\0' {
            break;
        }

        if c == '\r' {
            return Err(CompileError::new(position, "carriage return is not allowed in grammar source"));
        }
        if c.is_control() && c != '\n' && c != '\t' {
            return Err(CompileError::new(position, "control character is not allowed in grammar source"));
        }
        if c == '\u{7f}' {
            return Err(CompileError::new(position, "DEL is not allowed in grammar source"));
        }

        if c.is_whitespace() {
            position.advance(c);
            i += 1;
            continue;
        }

        if c == '(' && chars[i + 1].1 == '*' {
            let comment_start = position;
            position.advance(c);
            position.advance('*');
            i += 2;
            loop {
                if i + 1 >= chars.len() || chars[i].1 == '\0' {
                    return Err(CompileError::new(comment_start, "unterminated block comment"));
                }
                if chars[i].1 == '*' && chars[i + 1].1 == ')' {
                    position.advance('*');
                    position.advance(')');
                    i += 2;
                    break;
                }
                position.advance(chars[i].1);
                i += 1;
            }
            continue;
        }

        let start_position = position;

        if c == '"' {
            let mut text = String::new();
            position.advance(c);
            i += 1;
            loop {
                let (_, ch) = chars[i];
                if ch == '\0' {
                    return Err(CompileError::new(start_position, "unterminated string literal"));
                }
                if ch == '\n' || ch == '\t' {
                    return Err(CompileError::new(position, "tab or newline is not allowed inside a string literal"));
                }
                if ch == '"' {
                    position.advance(ch);
                    i += 1;
                    break;
                }
                if ch == '\\' {
                    text.push(ch);
                    position.advance(ch);
                    i += 1;
                    let (_, escaped) = chars[i];
                    if escaped == '\0' {
                        return Err(CompileError::new(start_position, "unterminated string literal"));
                    }
                    text.push(escaped);
                    position.advance(escaped);
                    i += 1;
                    continue;
                }
                text.push(ch);
                position.advance(ch);
                i += 1;
            }
            if text.is_empty() {
                return Err(CompileError::new(start_position, "empty string literal is not allowed"));
            }
            tokens.push(Token {
                kind: TokenKind::StringLiteral(text),
                position: start_position,
            });
            continue;
        }

        if SYMBOLS.contains(&c) {
            position.advance(c);
            i += 1;
            tokens.push(Token {
                kind: TokenKind::Symbol(c),
                position: start_position,
            });
            continue;
        }

        // Identifier: alphanumeric/underscore/non-ASCII to start, then also '-'.
        let mut text = String::new();
        text.push(c);
        position.advance(c);
        i += 1;
        loop {
            let (_, ch) = chars[i];
            if ch.is_alphanumeric() || ch == '_' || ch == '-' || (!ch.is_ascii() && ch != '\0') {
                text.push(ch);
                position.advance(ch);
                i += 1;
            } else {
                break;
            }
        }
        tokens.push(Token {
            kind: TokenKind::Identifier(text),
            position: start_position,
        });
    }

    tokens.push(Token {
        kind: TokenKind::Eof,
        position,
    });

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenizes_a_simple_rule() {
        let tokens = tokenize(r#"r = "a" ;"#).unwrap();
        let kinds: Vec<&TokenKind> = tokens.iter().map(|t| &t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                &TokenKind::Identifier("r".into()),
                &TokenKind::Symbol('='),
                &TokenKind::StringLiteral("a".into()),
                &TokenKind::Symbol(';'),
                &TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn rejects_empty_string_literal() {
        assert!(tokenize(r#"r = "" ;"#).is_err());
    }

    #[test]
    fn skips_block_comments() {
        let tokens = tokenize(r#"r = (* a comment *) "a" ;"#).unwrap();
        assert_eq!(tokens.len(), 5);
    }

    #[test]
    fn rejects_carriage_return() {
        assert!(tokenize("r = \"a\" ;\r").is_err());
    }
}
