use once_cell::unsync::OnceCell;
use std::fmt::{Display, Formatter};

/// Line, column and character-index of a byte offset in some source text.
///
/// `column` counts display columns, advancing to the next multiple of 8 on a tab.
/// `character` counts Unicode scalar values rather than bytes, so it stays meaningful
/// once the source contains multi-byte UTF-8 sequences.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub column: usize,
    pub character: usize,
}

impl Position {
    pub fn new(line: usize, column: usize, character: usize) -> Self {
        Self {
            line,
            column,
            character,
        }
    }

    pub(crate) fn advance(&mut self, ch: char) {
        match ch {
            '\n' => {
                self.line += 1;
                self.column = 0;
                self.character = 0;
            }
            '\t' => {
                self.column += 8 - (self.column % 8);
                self.character += 1;
            }
            _ => {
                self.column += 1;
                self.character += 1;
            }
        }
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// A wrapper around grammar source text which caches line-break offsets so that
/// `obtain_position` can recover a [Position] for any byte offset without re-scanning
/// from the start of the source each time.
pub struct Code<'c> {
    pub value: &'c str,
    line_breaks: OnceCell<Vec<usize>>,
}

impl<'c> From<&'c str> for Code<'c> {
    fn from(value: &'c str) -> Self {
        Code::new(value)
    }
}

impl<'c> Code<'c> {
    pub fn new(value: &'c str) -> Self {
        Self {
            value,
            line_breaks: OnceCell::new(),
        }
    }

    fn obtain_line_breaks(&self) -> &Vec<usize> {
        self.line_breaks.get_or_init(|| {
            self.value
                .char_indices()
                .filter_map(|(index, c)| if c == '\n' { Some(index) } else { None })
                .collect()
        })
    }

    /// Recover the [Position] of the byte offset `pointer` within `self.value`.
    ///
    /// Walks from the start of the containing line only (found via a binary search over
    /// cached line-break offsets), applying tab-stop and character-count rules along the way.
    pub fn obtain_position(&self, pointer: usize) -> Position {
        let line_breaks = self.obtain_line_breaks();
        let line_index = match line_breaks.binary_search(&pointer) {
            Ok(index) | Err(index) => index,
        };

        let (line_start, line_number) = if line_index == 0 {
            (0, 1)
        } else {
            (line_breaks[line_index - 1] + 1, line_index + 1)
        };

        let mut position = Position::new(line_number, 0, 0);
        for c in self.value[line_start..pointer].chars() {
            position.advance(c);
        }
        position
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_line_reports_one_indexed_column() {
        let code = Code::new("abc");
        assert_eq!(code.obtain_position(0), Position::new(1, 0, 0));
        assert_eq!(code.obtain_position(2), Position::new(1, 2, 2));
    }

    #[test]
    fn newline_resets_column_and_character() {
        let code = Code::new("ab\ncd");
        let pos = code.obtain_position(4);
        assert_eq!(pos, Position::new(2, 1, 1));
    }

    #[test]
    fn tab_advances_to_next_multiple_of_eight() {
        let code = Code::new("a\tb");
        let pos = code.obtain_position(2);
        assert_eq!(pos.column, 8);
        assert_eq!(pos.character, 2);
    }
}
