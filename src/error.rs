use crate::position::Position;
use std::fmt::{Display, Formatter};

/// An error raised while lexing, parsing, flattening or emitting a grammar.
///
/// Every variant carries the [Position] at which the problem was detected so the CLI
/// can report it the way a compiler diagnostic normally reads.
#[derive(Debug, Clone)]
pub struct CompileError {
    pub position: Position,
    pub message: String,
}

impl CompileError {
    pub fn new(position: Position, message: impl Into<String>) -> Self {
        Self {
            position,
            message: message.into(),
        }
    }
}

impl Display for CompileError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at {}", self.message, self.position)
    }
}

impl std::error::Error for CompileError {}

/// An error returned because the grammar itself is structurally invalid, independent of
/// any particular source position (duplicate names, dangling references, an unused rule).
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub what: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(what: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            what: what.into(),
            message: message.into(),
        }
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "ValidationError: {} - {}", self.what, self.message)
    }
}

impl std::error::Error for ValidationError {}

#[derive(Debug, Clone)]
pub enum GrammarError {
    Compile(CompileError),
    Validation(ValidationError),
}

impl Display for GrammarError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            GrammarError::Compile(e) => Display::fmt(e, f),
            GrammarError::Validation(e) => Display::fmt(e, f),
        }
    }
}

impl std::error::Error for GrammarError {}

impl From<CompileError> for GrammarError {
    fn from(e: CompileError) -> Self {
        GrammarError::Compile(e)
    }
}

impl From<ValidationError> for GrammarError {
    fn from(e: ValidationError) -> Self {
        GrammarError::Validation(e)
    }
}
