// Drift recovery for replace/delete when the snippet is no longer present
// verbatim.
//
// Three independent steps, tried in order by the chain:
//   1. whitespace/compatibility-folded search       (fixed confidence)
//   2. unique prefix/suffix probes of the snippet     (0.6-0.7)
//   3. sliding-window similarity around a hint        (threshold-gated)
//
// None of these run when the snippet does occur literally: that case is an
// occurrence-index problem, not drift, and must stay a visible failure.

use unicode_normalization::UnicodeNormalization;

use super::{Candidate, ResolveContext};
use crate::config::ResolverConfig;
use crate::search::{
    advance_chars, char_prefix, char_suffix, retreat_chars, unique_match, window_around,
};
use crate::types::Strategy;

/// Step 1: search with whitespace runs collapsed and characters NFKC-folded.
pub fn normalized_whitespace(ctx: &ResolveContext<'_>) -> Option<Candidate> {
    let needle = drifted_snippet(ctx)?;
    let folded_needle = Folded::new(needle.trim(), 0).text;
    if folded_needle.is_empty() {
        return None;
    }

    let body = Folded::new(ctx.doc.body(), ctx.doc.frontmatter_end());
    let (at, _) = body.text.match_indices(&folded_needle).nth(ctx.op.occurrence_index)?;
    let start = body.starts[at];
    let end = body.ends[at + folded_needle.len() - 1];

    Some(Candidate::span(
        start,
        end,
        ctx.config.confidence.normalized_whitespace,
        Strategy::NormalizedWhitespace,
    ))
}

/// Step 2: locate the snippet by a unique prefix and/or suffix probe.
pub fn edge_anchor(ctx: &ResolveContext<'_>) -> Option<Candidate> {
    let needle = drifted_snippet(ctx)?;
    let probe_chars = ctx.config.edge_probe_chars;
    let needle_chars = needle.chars().count();
    // A probe covering the whole snippet is just the exact search again.
    if needle_chars <= probe_chars {
        return None;
    }

    let text = ctx.doc.text();
    let floor = ctx.doc.frontmatter_end();
    let body = floor..text.len();
    let prefix = char_prefix(needle, probe_chars);
    let suffix = char_suffix(needle, probe_chars);
    let prefix_at = unique_match(text, prefix, body.clone());
    let suffix_end = unique_match(text, suffix, body).map(|at| at + suffix.len());
    let confidence = &ctx.config.confidence;

    match (prefix_at, suffix_end) {
        (Some(start), Some(end))
            if end >= start + prefix.len() && end - start <= needle.len() * 2 =>
        {
            Some(Candidate::span(start, end, confidence.edge_both, Strategy::EdgeAnchor))
        }
        (Some(start), _) => {
            let end = advance_chars(text, start, needle_chars);
            Some(Candidate::span(start, end, confidence.edge_prefix, Strategy::EdgeAnchor))
        }
        (None, Some(end)) => {
            let start = retreat_chars(text, end, needle_chars, floor);
            Some(Candidate::span(start, end, confidence.edge_suffix, Strategy::EdgeAnchor))
        }
        (None, None) => None,
    }
}

/// Step 3: slide a snippet-sized window across the neighborhood of the hint
/// and keep the best positional match, if it clears the threshold.
pub fn window_similarity(ctx: &ResolveContext<'_>) -> Option<Candidate> {
    let needle = drifted_snippet(ctx)?;
    let hint = ctx.op.hint_start.or(ctx.cursor)?;
    let config = ctx.config;
    let text = ctx.doc.text();

    let needle_chars: Vec<char> = needle.chars().collect();
    let width = needle_chars.len();
    let region =
        window_around(text, hint, config.fuzzy_neighborhood_radius, ctx.doc.frontmatter_end());
    let starts_in_region = text[region.clone()].chars().count();
    let scan: Vec<(usize, char)> = text[region.start..]
        .char_indices()
        .map(|(index, ch)| (region.start + index, ch))
        .take(starts_in_region + width)
        .collect();
    if scan.len() < width {
        return None;
    }
    let scan_chars: Vec<char> = scan.iter().map(|(_, ch)| *ch).collect();

    let mut best: Option<(f64, usize)> = None;
    for offset in 0..=(scan.len() - width).min(starts_in_region) {
        let score =
            positional_similarity(&needle_chars, &scan_chars[offset..offset + width], config);
        if best.map_or(true, |(top, _)| score > top) {
            best = Some((score, offset));
        }
    }

    let (score, offset) = best?;
    tracing::trace!(score, offset, "best similarity window");
    let confidence = similarity_confidence(score, config)?;
    let start = scan[offset].0;
    let (last_at, last_char) = scan[offset + width - 1];
    Some(Candidate::span(
        start,
        last_at + last_char.len_utf8(),
        confidence,
        Strategy::WindowSimilarity,
    ))
}

/// Fraction of positions holding the same character, plus a bonus for each
/// matching window end. Capped at 1.0.
pub fn positional_similarity(needle: &[char], window: &[char], config: &ResolverConfig) -> f64 {
    if needle.is_empty() || needle.len() != window.len() {
        return 0.0;
    }
    let len = needle.len();
    let same = needle.iter().zip(window).filter(|(a, b)| a == b).count();
    let mut score = same as f64 / len as f64;

    let edge = config.edge_bonus_chars.min(len);
    if edge > 0 {
        if needle[..edge] == window[..edge] {
            score += config.edge_bonus;
        }
        if needle[len - edge..] == window[len - edge..] {
            score += config.edge_bonus;
        }
    }
    score.min(1.0)
}

/// Map an accepted similarity linearly onto the fuzzy confidence band;
/// `None` below the threshold.
pub fn similarity_confidence(score: f64, config: &ResolverConfig) -> Option<f64> {
    let threshold = config.similarity_threshold;
    if score.is_nan() || score < threshold {
        return None;
    }
    let (floor, ceiling) = (config.fuzzy_confidence_floor, config.fuzzy_confidence_ceiling);
    if threshold >= 1.0 {
        return Some(ceiling);
    }
    let t = ((score - threshold) / (1.0 - threshold)).clamp(0.0, 1.0);
    Some(floor + t * (ceiling - floor))
}

/// The replace/delete snippet, only when it is absent from the body.
fn drifted_snippet<'a>(ctx: &ResolveContext<'a>) -> Option<&'a str> {
    if !ctx.op.kind.targets_span() {
        return None;
    }
    let needle = ctx.op.original()?;
    if ctx.doc.body().contains(needle) {
        return None;
    }
    Some(needle)
}

/// Folded text plus, for every byte of it, the original span it came from.
#[derive(Debug, Default)]
struct Folded {
    text: String,
    starts: Vec<usize>,
    ends: Vec<usize>,
}

impl Folded {
    fn new(source: &str, base: usize) -> Self {
        let mut folded = Self::default();
        let mut chars = source.char_indices().peekable();

        while let Some((index, ch)) = chars.next() {
            let start = base + index;
            if ch.is_whitespace() {
                let mut end = start + ch.len_utf8();
                while let Some(&(next, next_ch)) = chars.peek() {
                    if !next_ch.is_whitespace() {
                        break;
                    }
                    end = base + next + next_ch.len_utf8();
                    chars.next();
                }
                folded.push(' ', start, end);
            } else {
                let end = start + ch.len_utf8();
                for folded_ch in std::iter::once(ch).nfkc() {
                    folded.push(folded_ch, start, end);
                }
            }
        }
        folded
    }

    fn push(&mut self, ch: char, start: usize, end: usize) {
        self.text.push(ch);
        for _ in 0..ch.len_utf8() {
            self.starts.push(start);
            self.ends.push(end);
        }
    }
}
