// Terminal fallback, reached only when every other strategy declined.

use super::{Candidate, ResolveContext};
use crate::types::{OperationKind, Strategy};

/// Anchorless inserts get a well-defined home right after the frontmatter;
/// everything else declines so the coordinator emits the failure sentinel.
///
/// - empty body, any insert kind: `frontmatter_end` at the empty-body confidence
/// - non-empty body, `InsertAfterHeading`: `frontmatter_end`, degraded
/// - an insert whose anchor text was given but not found: decline
/// - replace/delete: decline
pub fn terminal_fallback(ctx: &ResolveContext<'_>) -> Option<Candidate> {
    if !ctx.op.kind.is_insert() || ctx.op.anchor().is_some() {
        return None;
    }
    let point = ctx.doc.frontmatter_end();
    let confidence = &ctx.config.confidence;

    if ctx.doc.body_is_empty() {
        return Some(Candidate::point(point, confidence.empty_body_insert, Strategy::Fallback));
    }
    if ctx.op.kind == OperationKind::InsertAfterHeading {
        return Some(Candidate::point(point, confidence.degraded_insert, Strategy::Fallback));
    }
    None
}
