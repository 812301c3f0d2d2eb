//! Per-parse state: the input buffer, current position, the sticky control flags, and the
//! parse-unit arena with its free list of recyclable ids.

use super::unit::{is_anonymous, ParseUnit, UnitId};
use crate::sentence::CompiledGrammar;

pub struct Context<'g, 'i> {
    pub grammar: &'g CompiledGrammar,
    pub input: &'i [u8],
    pub position: usize,
    pub done: bool,
    pub exception: bool,
    arena: Vec<ParseUnit>,
    free: Vec<UnitId>,
}

impl<'g, 'i> Context<'g, 'i> {
    pub fn new(grammar: &'g CompiledGrammar, input: &'i [u8]) -> Self {
        Self {
            grammar,
            input,
            position: 0,
            done: false,
            exception: false,
            arena: Vec::new(),
            free: Vec::new(),
        }
    }

    pub fn unit(&self, id: UnitId) -> &ParseUnit {
        &self.arena[id.0]
    }

    pub fn alloc(&mut self, rule: Option<&'static str>, start: usize) -> UnitId {
        let unit = ParseUnit {
            rule,
            first_child: None,
            next_sibling: None,
            start,
            end: start,
        };
        match self.free.pop() {
            Some(id) => {
                self.arena[id.0] = unit;
                id
            }
            None => {
                self.arena.push(unit);
                UnitId(self.arena.len() - 1)
            }
        }
    }

    pub fn set_end(&mut self, id: UnitId, end: usize) {
        self.arena[id.0].end = end;
    }

    pub fn set_first_child(&mut self, id: UnitId, child: Option<UnitId>) {
        self.arena[id.0].first_child = child;
    }

    pub fn set_next_sibling(&mut self, id: UnitId, sibling: Option<UnitId>) {
        self.arena[id.0].next_sibling = sibling;
    }

    pub fn set_rule(&mut self, id: UnitId, rule: Option<&'static str>) {
        self.arena[id.0].rule = rule;
    }

    /// Recycle `id` and its whole subtree (first-child chain, recursively) onto the free
    /// list, for a unit that mismatched or is being discarded (e.g. a rejected match).
    pub fn recycle(&mut self, id: UnitId) {
        self.recycle_chain(Some(id));
    }

    pub fn recycle_chain(&mut self, mut head: Option<UnitId>) {
        while let Some(id) = head {
            let next = self.arena[id.0].next_sibling;
            let first_child = self.arena[id.0].first_child;
            self.recycle_chain(first_child);
            self.free.push(id);
            head = next;
        }
    }

    /// If `id`'s unit is anonymous, free it and return its child chain (which becomes the
    /// caller's children in its place); otherwise keep `id` itself as a single-node chain.
    pub fn splice_if_anonymous(&mut self, id: UnitId) -> Option<UnitId> {
        if is_anonymous(self.arena[id.0].rule) {
            let first_child = self.arena[id.0].first_child;
            self.free.push(id);
            first_child
        } else {
            Some(id)
        }
    }

    /// Walk `head`'s `next_sibling` chain to its end and return the last id.
    pub fn last_in_chain(&self, mut head: UnitId) -> UnitId {
        while let Some(next) = self.arena[head.0].next_sibling {
            head = next;
        }
        head
    }

    /// Backtrack: return `ctx.position` to `start`, recycle the in-progress `id`, report a
    /// mismatch.
    pub fn mismatch(&mut self, id: UnitId, start: usize) -> super::matcher::MatchOutcome {
        self.position = start;
        self.free.push(id);
        super::matcher::MatchOutcome::Mismatched
    }
}
