use std::fmt::{Debug, Display, Formatter};

use crate::position::Code;

/// Tiered debug-tracing marker attached to a compiler or runtime stage.
///
/// Each tier carries a label identifying the call site in trace output. Tracing is
/// compiled out entirely in release builds; see [Log::trace].
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Log<T> {
    None,
    Default(T),
    Success(T),
    Result(T),
    Verbose(T),
}

impl<T: Display> Display for Log<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Log::None => Ok(()),
            Log::Default(s) | Log::Success(s) | Log::Result(s) | Log::Verbose(s) => {
                write!(f, "{}", s)
            }
        }
    }
}

impl<T> Log<T> {
    fn order(&self) -> u8 {
        match self {
            Log::None => 0,
            Log::Default(_) => 1,
            Log::Success(_) => 2,
            Log::Result(_) => 3,
            Log::Verbose(_) => 4,
        }
    }
}

impl<T: Display + Copy> Log<T> {
    /// Print a trace line if `self`'s tier is at least `Log::Default`. A no-op when
    /// `self` is `Log::None`, and compiled out entirely outside debug builds.
    pub fn trace(&self, code: &Code, pointer: usize, message: &str) {
        #[cfg(debug_assertions)]
        if self.order() >= Log::Default(()).order() {
            println!("[{}] {} at {}", self, message, code.obtain_position(pointer));
        }
        #[cfg(not(debug_assertions))]
        let _ = (code, pointer, message);
    }

    /// Print a trace line only at `Log::Verbose` tier or above.
    pub fn trace_verbose(&self, code: &Code, pointer: usize, message: &str) {
        #[cfg(debug_assertions)]
        if self.order() >= Log::Verbose(()).order() {
            println!("[{}] {} at {}", self, message, code.obtain_position(pointer));
        }
        #[cfg(not(debug_assertions))]
        let _ = (code, pointer, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_tier_suppresses_everything() {
        assert_eq!(Log::<&str>::None.order(), 0);
        assert!(Log::<&str>::None.order() < Log::Default("x").order());
    }
}
