// Anchor resolver: turns `anchor_text` into a zero-width insertion point.
//
// The last usable occurrence of the anchor wins. An anchor on a heading
// line inserts at the end of that heading's section (before the next heading
// of the same or a shallower level); a prose anchor inserts at the end of its
// paragraph. A match that stops short of its heading line's end is part of a
// longer heading (`## Ch 1` inside `## Ch 10`) and is skipped.

use std::sync::OnceLock;

use regex::Regex;

use super::{Candidate, ResolveContext};
use crate::outline::{outline, Heading};
use crate::search::match_offsets;
use crate::types::Strategy;

pub fn anchor_insertion(ctx: &ResolveContext<'_>) -> Option<Candidate> {
    if !ctx.op.kind.is_insert() {
        return None;
    }
    let anchor = ctx.op.anchor()?;
    let text = ctx.doc.text();
    let headings = outline(&ctx.doc);
    let lead = anchor.len() - anchor.trim_start().len();
    let span = anchor.trim_end().len();

    let point = match_offsets(text, anchor, ctx.doc.frontmatter_end()..text.len())
        .into_iter()
        .rev()
        .find_map(|at| {
            // Leading whitespace may belong to the previous line.
            let first = at + lead;
            let end = at + span;
            match headings.iter().position(|heading| heading.contains(first)) {
                Some(index) if end >= headings[index].content_end(text) => {
                    Some(section_end(text, &headings, index))
                }
                Some(_) => None,
                None => Some(paragraph_end(text, end, &headings)),
            }
        })?;

    Some(Candidate::point(point, ctx.config.confidence.anchor, Strategy::Anchor))
}

/// Start of the next heading at the same or a shallower level, or the end
/// of the text.
pub fn section_end(text: &str, headings: &[Heading], index: usize) -> usize {
    let level = headings[index].level;
    headings[index + 1..]
        .iter()
        .find(|heading| heading.level <= level)
        .map(|heading| heading.start)
        .unwrap_or(text.len())
}

/// End of the paragraph containing `from`: the next blank line or heading,
/// whichever comes first, or the end of the text.
pub fn paragraph_end(text: &str, from: usize, headings: &[Heading]) -> usize {
    let blank_line = paragraph_break().find_at(text, from).map(|found| found.start());
    let heading =
        headings.iter().find(|heading| heading.start >= from).map(|heading| heading.start);

    match (blank_line, heading) {
        (Some(blank), Some(heading)) => blank.min(heading),
        (Some(offset), None) | (None, Some(offset)) => offset,
        (None, None) => text.len(),
    }
}

fn paragraph_break() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\r?\n[ \t]*\r?\n").expect("paragraph break pattern should compile")
    })
}
