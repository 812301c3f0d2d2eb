//! Shared escape-sequence decoding used for both plain string sentences and single-byte
//! character-range bounds.
//!
//! Both string sentences and range bounds decode through this one function at emission
//! time, since there is no later compilation pass to defer decoding to: the compiled
//! grammar is either used in-process right away or emitted as already-evaluated Rust
//! source.

use crate::error::CompileError;
use crate::position::Position;

/// Decode `\\, \", \', \a, \b, \f, \n, \r, \v, \xHH` and `\ooo` (octal) escapes in `raw`,
/// which must not include the surrounding quotes. `position` anchors any reported error to
/// the start of the literal.
pub fn decode_bytes(raw: &str, position: Position) -> Result<Vec<u8>, CompileError> {
    let mut out = Vec::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            let mut buf = [0u8; 4];
            out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
            continue;
        }
        match chars.next() {
            Some('\\') => out.push(b'\\'),
            Some('"') => out.push(b'"'),
            Some('\'') => out.push(b'\''),
            Some('a') => out.push(0x07),
            Some('b') => out.push(0x08),
            Some('f') => out.push(0x0c),
            Some('n') => out.push(b'\n'),
            Some('r') => out.push(b'\r'),
            Some('v') => out.push(0x0b),
            Some('x') => {
                let mut hex = String::new();
                for _ in 0..2 {
                    match chars.peek() {
                        Some(h) if h.is_ascii_hexdigit() => hex.push(chars.next().unwrap()),
                        _ => break,
                    }
                }
                if hex.is_empty() {
                    return Err(CompileError::new(position, "\\x escape requires at least one hex digit"));
                }
                out.push(u8::from_str_radix(&hex, 16).unwrap());
            }
            Some(d) if d.is_digit(8) => {
                let mut oct = String::new();
                oct.push(d);
                for _ in 0..2 {
                    match chars.peek() {
                        Some(o) if o.is_digit(8) => oct.push(chars.next().unwrap()),
                        _ => break,
                    }
                }
                let value = u32::from_str_radix(&oct, 8).unwrap();
                if value > 255 {
                    return Err(CompileError::new(position, "octal escape out of byte range"));
                }
                out.push(value as u8);
            }
            Some(other) => {
                return Err(CompileError::new(
                    position,
                    format!("unrecognized escape sequence \\{}", other),
                ));
            }
            None => return Err(CompileError::new(position, "trailing backslash in string literal")),
        }
    }

    Ok(out)
}

/// Decode a single-byte range bound, either a bare decimal/hex integer token (`0`..`255`
/// or `0x00`..`0xFF`) or a one-byte string literal.
pub fn decode_range_bound_identifier(text: &str, position: Position) -> Result<u8, CompileError> {
    let value = if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        u32::from_str_radix(hex, 16)
    } else {
        text.parse::<u32>()
    }
    .map_err(|_| CompileError::new(position, format!("'{}' is not a valid range bound", text)))?;

    if value > 255 {
        return Err(CompileError::new(position, "range bound must be in 0..=255"));
    }
    Ok(value as u8)
}

pub fn decode_range_bound_string(raw: &str, position: Position) -> Result<u8, CompileError> {
    let bytes = decode_bytes(raw, position)?;
    if bytes.len() != 1 {
        return Err(CompileError::new(position, "a string range bound must decode to exactly one byte"));
    }
    Ok(bytes[0])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos() -> Position {
        Position::new(1, 0, 0)
    }

    #[test]
    fn decodes_common_escapes() {
        assert_eq!(decode_bytes(r"a\nb", pos()).unwrap(), b"a\nb");
        assert_eq!(decode_bytes(r#"\""#, pos()).unwrap(), b"\"");
    }

    #[test]
    fn decodes_hex_escape() {
        assert_eq!(decode_bytes(r"\x41", pos()).unwrap(), b"A");
    }

    #[test]
    fn decodes_octal_escape() {
        assert_eq!(decode_bytes(r"\101", pos()).unwrap(), b"A");
    }

    #[test]
    fn rejects_unknown_escape() {
        assert!(decode_bytes(r"\q", pos()).is_err());
    }

    #[test]
    fn range_bound_accepts_hex_and_decimal() {
        assert_eq!(decode_range_bound_identifier("0x41", pos()).unwrap(), 0x41);
        assert_eq!(decode_range_bound_identifier("65", pos()).unwrap(), 65);
    }
}
