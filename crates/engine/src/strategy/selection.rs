// Selection override: a live, non-empty user selection wins outright.

use super::{Candidate, ResolveContext};
use crate::search::snap_range;
use crate::types::{OperationKind, Strategy};

/// Replace exactly what the user has selected.
///
/// Only applies to `ReplaceRange`. Offsets past the end of the document are
/// clamped; a selection lying wholly beyond it declines.
pub fn selection_override(ctx: &ResolveContext<'_>) -> Option<Candidate> {
    if ctx.op.kind != OperationKind::ReplaceRange {
        return None;
    }
    let selection = ctx.selection.filter(|selection| !selection.is_empty())?;
    let range = snap_range(ctx.doc.text(), selection.start..selection.end);
    if range.is_empty() {
        return None;
    }
    Some(Candidate::span(
        range.start,
        range.end,
        ctx.config.confidence.selection,
        Strategy::Selection,
    ))
}
