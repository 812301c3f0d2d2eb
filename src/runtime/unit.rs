//! The internal parse-unit arena: a backing `Vec` indexed by [UnitId], with children and
//! siblings linked through `first_child`/`next_sibling` rather than owned, so that
//! splicing (§4.F) only ever rewrites a handful of links instead of moving subtrees.

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub struct UnitId(pub usize);

#[derive(Debug, Clone, Copy)]
pub struct ParseUnit {
    pub rule: Option<&'static str>,
    pub first_child: Option<UnitId>,
    pub next_sibling: Option<UnitId>,
    pub start: usize,
    pub end: usize,
}

/// A name beginning with `_` or absent entirely marks a unit as a bookkeeping node whose
/// children should be spliced into its parent rather than kept as a node of their own.
pub fn is_anonymous(rule: Option<&str>) -> bool {
    match rule {
        None => true,
        Some(name) => name.starts_with('_'),
    }
}
