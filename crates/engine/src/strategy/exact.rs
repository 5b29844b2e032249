// Exact/occurrence matcher: literal, case-sensitive search for
// `original_text` in the document body.
//
// With a cursor hint the window around the cursor is searched first and the
// occurrence index is clamped within it. The whole-body search is strict:
// asking for an occurrence that does not exist declines.

use super::{Candidate, ResolveContext};
use crate::search::{match_offsets, nth_match, window_around};
use crate::types::Strategy;

pub fn exact_occurrence(ctx: &ResolveContext<'_>) -> Option<Candidate> {
    if !ctx.op.kind.targets_span() {
        return None;
    }
    let needle = ctx.op.original()?;
    let text = ctx.doc.text();
    let floor = ctx.doc.frontmatter_end();
    let confidence = ctx.config.confidence.exact;
    let occurrence = ctx.op.occurrence_index;

    if let Some(cursor) = ctx.cursor {
        let window = window_around(text, cursor, ctx.config.cursor_window_radius, floor);
        let local = match_offsets(text, needle, window);
        if let Some(last) = local.len().checked_sub(1) {
            let start = local[occurrence.min(last)];
            return Some(Candidate::span(start, start + needle.len(), confidence, Strategy::Exact));
        }
    }

    let start = nth_match(text, needle, floor..text.len(), occurrence)?;
    Some(Candidate::span(start, start + needle.len(), confidence, Strategy::Exact))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ResolverConfig;
    use crate::document::Document;
    use crate::types::EditOperation;

    fn run_with(
        text: &str,
        op: &EditOperation,
        cursor: Option<usize>,
        config: &ResolverConfig,
    ) -> Option<Candidate> {
        let ctx = ResolveContext { doc: Document::new(text), op, selection: None, cursor, config };
        exact_occurrence(&ctx)
    }

    fn run(text: &str, op: &EditOperation, cursor: Option<usize>) -> Option<Candidate> {
        run_with(text, op, cursor, &ResolverConfig::default())
    }

    #[test]
    fn unique_match_covers_the_snippet() {
        let text = "alpha beta gamma";
        let candidate = run(text, &EditOperation::replace("beta", "B"), None).expect("match");
        assert_eq!((candidate.start, candidate.end), (6, 10));
        assert_eq!(candidate.confidence, 1.0);
    }

    #[test]
    fn occurrence_index_selects_left_to_right() {
        let text = "x-item x-item x-item";
        let op = EditOperation::replace("item", "thing").with_occurrence(1);
        let candidate = run(text, &op, None).expect("second occurrence");
        assert_eq!(candidate.start, 9);
    }

    #[test]
    fn occurrence_past_the_last_match_declines() {
        let op = EditOperation::replace("ab", "x").with_occurrence(5);
        assert!(run("ab ab", &op, None).is_none());
    }

    #[test]
    fn search_is_case_sensitive() {
        assert!(run("Hello", &EditOperation::replace("hello", "x"), None).is_none());
    }

    #[test]
    fn frontmatter_matches_are_invisible() {
        let text = "---\ntitle: beta\n---\nbeta body";
        let candidate = run(text, &EditOperation::replace("beta", "B"), None).expect("body match");
        assert_eq!(candidate.start, text.rfind("beta").unwrap());
    }

    #[test]
    fn cursor_window_prefers_nearby_occurrence() {
        let config = ResolverConfig { cursor_window_radius: 10, ..ResolverConfig::default() };
        let text = format!("needle{}needle{}", " ".repeat(40), " ".repeat(40));
        let second = text.rfind("needle").unwrap();
        let op = EditOperation::replace("needle", "pin");

        let candidate = run_with(&text, &op, Some(second + 2), &config).expect("local match");
        assert_eq!(candidate.start, second);
    }

    #[test]
    fn cursor_window_clamps_occurrence_index() {
        let config = ResolverConfig { cursor_window_radius: 10, ..ResolverConfig::default() };
        let text = format!("{}word word", " ".repeat(50));
        let op = EditOperation::replace("word", "w").with_occurrence(7);

        let candidate = run_with(&text, &op, Some(55), &config).expect("clamped to last local");
        assert_eq!(candidate.start, text.rfind("word").unwrap());
    }

    #[test]
    fn cursor_window_without_matches_falls_back_to_whole_body() {
        let config = ResolverConfig { cursor_window_radius: 5, ..ResolverConfig::default() };
        let text = format!("target{}", " ".repeat(100));
        let op = EditOperation::replace("target", "t");

        let candidate = run_with(&text, &op, Some(90), &config).expect("global match");
        assert_eq!(candidate.start, 0);
    }

    #[test]
    fn insert_kinds_and_missing_snippets_decline() {
        assert!(run("abc", &EditOperation::insert_after("abc", "x"), None).is_none());
        assert!(run("abc", &EditOperation::replace("", "x"), None).is_none());
    }
}
