// Strategy chain coordinator.
//
// `resolve` runs the fixed chain for the operation kind, takes the first
// candidate, clamps it with the frontmatter guard and turns it into a
// `ResolutionResult`. When the chain is exhausted the failure sentinel is
// returned. The function holds no state and never panics on bad input.

use tracing::{debug, trace};

use crate::config::ResolverConfig;
use crate::document::Document;
use crate::strategy::{chain_for, Candidate, ResolveContext};
use crate::types::{EditOperation, ResolutionResult, Selection};

/// Resolve one operation against a text snapshot.
pub fn resolve(
    text: &str,
    op: &EditOperation,
    selection: Option<Selection>,
    cursor: Option<usize>,
    config: &ResolverConfig,
) -> ResolutionResult {
    resolve_in(Document::new(text), op, selection, cursor, config)
}

/// Like [`resolve`], for callers that already hold a [`Document`].
pub fn resolve_in(
    doc: Document<'_>,
    op: &EditOperation,
    selection: Option<Selection>,
    cursor: Option<usize>,
    config: &ResolverConfig,
) -> ResolutionResult {
    let ctx = ResolveContext { doc, op, selection, cursor, config };

    let found = chain_for(op.kind).iter().find_map(|step| {
        let candidate = (step.run)(&ctx);
        if candidate.is_none() {
            trace!(strategy = step.name, kind = ?op.kind, "strategy declined");
        }
        candidate
    });

    match found {
        Some(candidate) => {
            let result = finish(&doc, op, candidate);
            debug!(
                kind = ?op.kind,
                strategy = %candidate.strategy,
                start = result.start,
                end = result.end,
                confidence = result.confidence,
                "operation resolved"
            );
            result
        }
        None => {
            debug!(kind = ?op.kind, "operation could not be placed");
            ResolutionResult::failure(op.text.clone())
        }
    }
}

fn finish(doc: &Document<'_>, op: &EditOperation, candidate: Candidate) -> ResolutionResult {
    let (start, end) = doc.guard(candidate.start, candidate.end);
    ResolutionResult {
        start: start as i64,
        end: end as i64,
        text: op.text.clone(),
        confidence: candidate.confidence.clamp(0.0, 1.0),
        strategy: Some(candidate.strategy),
    }
}
