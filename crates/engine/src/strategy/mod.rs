// Resolution strategies and their fixed per-kind ordering.
//
// Each strategy inspects a `ResolveContext` and either proposes a
// `Candidate` or declines with `None`. The coordinator walks `chain_for`
// and stops at the first candidate; ordering never depends on the data.

use crate::config::ResolverConfig;
use crate::document::Document;
use crate::types::{EditOperation, OperationKind, Selection, Strategy};

pub mod anchor;
pub mod context;
pub mod exact;
pub mod fallback;
pub mod fuzzy;
pub mod selection;

/// Everything a strategy may read. Strategies never mutate it.
#[derive(Debug, Clone, Copy)]
pub struct ResolveContext<'a> {
    pub doc: Document<'a>,
    pub op: &'a EditOperation,
    pub selection: Option<Selection>,
    /// Offset believed to be near the user's current position.
    pub cursor: Option<usize>,
    pub config: &'a ResolverConfig,
}

/// A proposed range before the frontmatter guard runs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub start: usize,
    pub end: usize,
    pub confidence: f64,
    pub strategy: Strategy,
}

impl Candidate {
    pub fn span(start: usize, end: usize, confidence: f64, strategy: Strategy) -> Self {
        Self { start, end, confidence, strategy }
    }

    /// Zero-width insertion point.
    pub fn point(offset: usize, confidence: f64, strategy: Strategy) -> Self {
        Self::span(offset, offset, confidence, strategy)
    }
}

pub type StrategyFn = fn(&ResolveContext<'_>) -> Option<Candidate>;

/// A named step in a chain, so declines can be traced.
#[derive(Clone, Copy)]
pub struct Step {
    pub name: &'static str,
    pub run: StrategyFn,
}

const REPLACE_CHAIN: &[Step] = &[
    Step { name: "selection", run: selection::selection_override },
    Step { name: "exact", run: exact::exact_occurrence },
    Step { name: "context", run: context::context_bracketing },
    Step { name: "normalized_whitespace", run: fuzzy::normalized_whitespace },
    Step { name: "edge_anchor", run: fuzzy::edge_anchor },
    Step { name: "window_similarity", run: fuzzy::window_similarity },
    Step { name: "fallback", run: fallback::terminal_fallback },
];

const DELETE_CHAIN: &[Step] = &[
    Step { name: "exact", run: exact::exact_occurrence },
    Step { name: "context", run: context::context_bracketing },
    Step { name: "normalized_whitespace", run: fuzzy::normalized_whitespace },
    Step { name: "edge_anchor", run: fuzzy::edge_anchor },
    Step { name: "window_similarity", run: fuzzy::window_similarity },
    Step { name: "fallback", run: fallback::terminal_fallback },
];

const INSERT_CHAIN: &[Step] = &[
    Step { name: "anchor", run: anchor::anchor_insertion },
    Step { name: "context", run: context::context_bracketing },
    Step { name: "fallback", run: fallback::terminal_fallback },
];

/// The ordered strategies tried for `kind`.
pub fn chain_for(kind: OperationKind) -> &'static [Step] {
    match kind {
        OperationKind::ReplaceRange => REPLACE_CHAIN,
        OperationKind::DeleteRange => DELETE_CHAIN,
        OperationKind::InsertAfter | OperationKind::InsertAfterHeading => INSERT_CHAIN,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(kind: OperationKind) -> Vec<&'static str> {
        chain_for(kind).iter().map(|step| step.name).collect()
    }

    #[test]
    fn replace_chain_order_is_fixed() {
        assert_eq!(
            names(OperationKind::ReplaceRange),
            vec![
                "selection",
                "exact",
                "context",
                "normalized_whitespace",
                "edge_anchor",
                "window_similarity",
                "fallback",
            ]
        );
    }

    #[test]
    fn delete_chain_skips_selection_override() {
        let delete = names(OperationKind::DeleteRange);
        assert_eq!(delete.first(), Some(&"exact"));
        assert!(!delete.contains(&"selection"));
        assert_eq!(delete.last(), Some(&"fallback"));
    }

    #[test]
    fn insert_kinds_share_the_anchor_chain() {
        assert_eq!(names(OperationKind::InsertAfter), vec!["anchor", "context", "fallback"]);
        assert_eq!(names(OperationKind::InsertAfterHeading), names(OperationKind::InsertAfter));
    }
}
