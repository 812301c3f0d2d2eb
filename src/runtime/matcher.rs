//! Parse runtime (component F): a backtracking recursive-descent matcher over the
//! compiled sentence arena, producing a tree of parse units threaded through the per-parse
//! [Context].

use super::context::Context;
use super::unit::{is_anonymous, UnitId};
use crate::sentence::{Sentence, SentenceId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome {
    Matched(UnitId),
    Mismatched,
    Errored,
}

use MatchOutcome::*;

/// Attempt to match `sentence_id` at `ctx.position`, creating a unit tagged `rule` for the
/// attempt. `rule` is `Some(name)` only when `sentence_id` is itself a rule's body being
/// entered through a `Sentence::Rule` reference (or the initial `@start` call); every
/// structural recursion into a sub-sentence passes `None`, which is what allows
/// [Context::splice_if_anonymous] to later flatten purely structural wrapper nodes out of
/// the public tree.
pub fn try_match(ctx: &mut Context, rule: Option<&'static str>, sentence_id: SentenceId) -> MatchOutcome {
    let start = ctx.position;
    let unit_id = ctx.alloc(rule, start);
    let sentence = ctx.grammar.sentence(sentence_id).clone();

    match sentence {
        Sentence::Concatenation { left, right } => {
            if let Some(outcome) = match_concatenation(ctx, unit_id, start, left, right) {
                return outcome;
            }
        }
        Sentence::Alternation { left, right } => match match_alternation(ctx, left, right) {
            Ok(child) => ctx.set_first_child(unit_id, child),
            Err(outcome) => return finish_failure(ctx, unit_id, start, outcome),
        },
        Sentence::Optional { inner } => match try_match(ctx, None, inner) {
            Matched(id) => {
                let spliced = ctx.splice_if_anonymous(id);
                ctx.set_first_child(unit_id, spliced);
            }
            Mismatched => ctx.set_first_child(unit_id, None),
            Errored => return Errored,
        },
        Sentence::Repeated { inner } => {
            if let Errored = match_repeated(ctx, unit_id, inner) {
                return Errored;
            }
        }
        Sentence::Rejection { inner } => {
            if let Some(outcome) = match_rejection(ctx, unit_id, inner, start) {
                return outcome;
            }
            ctx.set_rule(unit_id, None);
        }
        Sentence::String { bytes } => {
            if ctx.position + bytes.len() > ctx.input.len()
                || &ctx.input[ctx.position..ctx.position + bytes.len()] != bytes
            {
                return ctx.mismatch(unit_id, start);
            }
            ctx.position += bytes.len();
        }
        Sentence::CharRange { low, high } => {
            if ctx.position == ctx.input.len() {
                return ctx.mismatch(unit_id, start);
            }
            let c = ctx.input[ctx.position];
            if c < low || c > high {
                return ctx.mismatch(unit_id, start);
            }
            ctx.position += 1;
        }
        Sentence::Rule { name } => {
            let rule_def = ctx
                .grammar
                .rule(name)
                .unwrap_or_else(|| unreachable!("compiled grammar invariant violated: rule '{}' is undefined", name));
            match try_match(ctx, Some(rule_def.name), rule_def.body) {
                Matched(id) => {
                    let spliced = ctx.splice_if_anonymous(id);
                    ctx.set_first_child(unit_id, spliced);
                }
                Mismatched => return ctx.mismatch(unit_id, start),
                Errored => return Errored,
            }
        }
        Sentence::Exception => {
            ctx.done = true;
            ctx.exception = true;
        }
        Sentence::Eof => {
            if ctx.position != ctx.input.len() {
                return ctx.mismatch(unit_id, start);
            }
            ctx.done = true;
        }
    }

    ctx.set_end(unit_id, ctx.position);
    Matched(unit_id)
}

fn finish_failure(ctx: &mut Context, unit_id: UnitId, start: usize, outcome: MatchOutcome) -> MatchOutcome {
    match outcome {
        Mismatched => ctx.mismatch(unit_id, start),
        Errored => Errored,
        Matched(_) => unreachable!("finish_failure is only called with a non-matched outcome"),
    }
}

fn match_concatenation(
    ctx: &mut Context,
    unit_id: UnitId,
    start: usize,
    left: SentenceId,
    right: SentenceId,
) -> Option<MatchOutcome> {
    let left_id = match try_match(ctx, None, left) {
        Matched(id) => id,
        Mismatched => return Some(ctx.mismatch(unit_id, start)),
        Errored => return Some(Errored),
    };

    if ctx.done {
        ctx.set_first_child(unit_id, Some(left_id));
        return None;
    }

    let right_id = match try_match(ctx, None, right) {
        Matched(id) => id,
        Mismatched => {
            ctx.recycle(left_id);
            return Some(ctx.mismatch(unit_id, start));
        }
        Errored => return Some(Errored),
    };

    ctx.set_next_sibling(left_id, Some(right_id));

    // Splice the right operand out if it is a purely structural wrapper.
    if is_anonymous(ctx.unit(right_id).rule) {
        let right_children = ctx.unit(right_id).first_child;
        detach(ctx, right_id);
        ctx.set_next_sibling(left_id, right_children);
    }

    // Splice the left operand out if it is a purely structural wrapper, re-attaching
    // whatever now follows it (the right operand or its spliced children) at the tail of
    // the left operand's own children.
    let first_child = if is_anonymous(ctx.unit(left_id).rule) {
        let left_children = ctx.unit(left_id).first_child;
        let after = ctx.unit(left_id).next_sibling;
        detach(ctx, left_id);
        match left_children {
            Some(head) => {
                let tail = ctx.last_in_chain(head);
                ctx.set_next_sibling(tail, after);
                Some(head)
            }
            None => after,
        }
    } else {
        Some(left_id)
    };

    ctx.set_first_child(unit_id, first_child);
    None
}

/// Free exactly one unit's own slot onto the free list; its children and sibling link have
/// already been detached and re-linked elsewhere by the caller before this is called.
fn detach(ctx: &mut Context, id: UnitId) {
    ctx.set_first_child(id, None);
    ctx.set_next_sibling(id, None);
    ctx.recycle(id);
}

fn match_alternation(ctx: &mut Context, left: SentenceId, right: SentenceId) -> Result<Option<UnitId>, MatchOutcome> {
    let id = match try_match(ctx, None, left) {
        Matched(id) => id,
        Mismatched => match try_match(ctx, None, right) {
            Matched(id) => id,
            Mismatched => return Err(Mismatched),
            Errored => return Err(Errored),
        },
        Errored => return Err(Errored),
    };
    Ok(ctx.splice_if_anonymous(id))
}

fn match_repeated(ctx: &mut Context, unit_id: UnitId, inner: SentenceId) -> MatchOutcome {
    let mut head: Option<UnitId> = None;
    let mut tail: Option<UnitId> = None;

    loop {
        let before = ctx.position;
        match try_match(ctx, None, inner) {
            Matched(id) => {
                if let Some(chain_head) = ctx.splice_if_anonymous(id) {
                    let chain_tail = ctx.last_in_chain(chain_head);
                    match tail {
                        Some(t) => ctx.set_next_sibling(t, Some(chain_head)),
                        None => head = Some(chain_head),
                    }
                    tail = Some(chain_tail);
                }
                if ctx.done {
                    break;
                }
                // A zero-width iteration (e.g. an `Optional` whose inner sentence mismatched)
                // would otherwise repeat forever at the same position without ever setting
                // `ctx.done` or mismatching.
                if ctx.position == before && !ctx.exception {
                    break;
                }
            }
            Mismatched => break,
            Errored => {
                ctx.set_first_child(unit_id, head);
                return Errored;
            }
        }
    }

    ctx.set_first_child(unit_id, head);
    Matched(unit_id)
}

/// Returns `Some(outcome)` to short-circuit with an already-finalized result, or `None` to
/// continue (the rejection succeeded and the caller should finish building `unit_id` as an
/// anonymous, zero-width match at `start`).
fn match_rejection(ctx: &mut Context, unit_id: UnitId, inner: SentenceId, start: usize) -> Option<MatchOutcome> {
    match try_match(ctx, None, inner) {
        Matched(id) => {
            ctx.recycle(id);
            if !ctx.exception {
                return Some(ctx.mismatch(unit_id, start));
            }
            ctx.exception = false;
        }
        Mismatched => {}
        Errored => return Some(Errored),
    }
    ctx.position = start;
    None
}
