//! Compiled grammar model (component E): the rule table and sentence arena produced by
//! the emitter and consumed by the parse runtime.

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub struct SentenceId(pub usize);

/// One node of a grammar's compiled expression tree. Binary and unary variants reference
/// their children by [SentenceId] into the grammar's shared sentence arena rather than by
/// pointer, so the whole table is plain `'static` data with no lifetime to thread through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sentence {
    Concatenation { left: SentenceId, right: SentenceId },
    Alternation { left: SentenceId, right: SentenceId },
    Optional { inner: SentenceId },
    Repeated { inner: SentenceId },
    Rejection { inner: SentenceId },
    String { bytes: &'static [u8] },
    CharRange { low: u8, high: u8 },
    Rule { name: &'static str },
    Exception,
    Eof,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
    pub name: &'static str,
    pub body: SentenceId,
}

/// A fully compiled, linked grammar: a sentence arena plus a rule table naming entry
/// points into it. Built once by the emitter (or by `include!`-ing emitted Rust source)
/// and then only ever read by the parse runtime — `Sync` because every field is
/// `'static` and immutable.
#[derive(Debug, Clone, Copy)]
pub struct CompiledGrammar {
    pub sentences: &'static [Sentence],
    pub rules: &'static [Rule],
}

impl CompiledGrammar {
    pub fn sentence(&self, id: SentenceId) -> &Sentence {
        &self.sentences[id.0]
    }

    pub fn rule(&self, name: &str) -> Option<&Rule> {
        self.rules.iter().find(|r| r.name == name)
    }
}

pub const EOF_RULE: &str = "@eof";
pub const NOEOF_RULE: &str = "@noeof";
pub const START_RULE: &str = "@start";
