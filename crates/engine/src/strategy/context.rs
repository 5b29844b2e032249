// Context bracketing: captures the shortest bounded gap between
// `left_context` and `right_context`.

use regex::Regex;

use super::{Candidate, ResolveContext};
use crate::types::Strategy;

/// Target the text between the two context strings.
///
/// Span kinds get the captured gap as their range; insert kinds get a point
/// at the start of the gap (immediately after `left_context`). The first
/// bracket in the body wins.
pub fn context_bracketing(ctx: &ResolveContext<'_>) -> Option<Candidate> {
    let (left, right) = ctx.op.context()?;
    let pattern = bracket_pattern(left, right, ctx.config.context_span_max)?;

    let floor = ctx.doc.frontmatter_end();
    let captures = pattern.captures(ctx.doc.body())?;
    let gap = captures.get(1)?;
    let (start, end) = (floor + gap.start(), floor + gap.end());
    let confidence = ctx.config.confidence.context;

    if ctx.op.kind.is_insert() {
        Some(Candidate::point(start, confidence, Strategy::Context))
    } else {
        Some(Candidate::span(start, end, confidence, Strategy::Context))
    }
}

fn bracket_pattern(left: &str, right: &str, span_max: usize) -> Option<Regex> {
    let pattern =
        format!("(?s){}(.{{0,{span_max}}}?){}", regex::escape(left), regex::escape(right));
    match Regex::new(&pattern) {
        Ok(regex) => Some(regex),
        Err(error) => {
            tracing::debug!(%error, "context bracket pattern rejected");
            None
        }
    }
}
