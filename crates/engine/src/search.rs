// Substring search primitives shared by every strategy.
//
// All offsets are byte offsets into the full document text and always land
// on char boundaries.

use std::ops::Range;

/// Start offsets of every non-overlapping match of `needle` fully inside
/// `scope`, left to right.
pub fn match_offsets(text: &str, needle: &str, scope: Range<usize>) -> Vec<usize> {
    if needle.is_empty() {
        return Vec::new();
    }
    let scope = snap_range(text, scope);
    text[scope.clone()].match_indices(needle).map(|(index, _)| scope.start + index).collect()
}

/// The `index`-th match in `scope`, or `None` when there are fewer.
pub fn nth_match(text: &str, needle: &str, scope: Range<usize>, index: usize) -> Option<usize> {
    if needle.is_empty() {
        return None;
    }
    let scope = snap_range(text, scope);
    text[scope.clone()].match_indices(needle).nth(index).map(|(offset, _)| scope.start + offset)
}

/// Start of the match when `needle` occurs exactly once in `scope`.
pub fn unique_match(text: &str, needle: &str, scope: Range<usize>) -> Option<usize> {
    if needle.is_empty() {
        return None;
    }
    let scope = snap_range(text, scope);
    let mut matches = text[scope.clone()].match_indices(needle);
    let (first, _) = matches.next()?;
    if matches.next().is_some() {
        return None;
    }
    Some(scope.start + first)
}

/// `[center - radius, center + radius]` clipped to `floor..text.len()`.
pub fn window_around(text: &str, center: usize, radius: usize, floor: usize) -> Range<usize> {
    let start = center.saturating_sub(radius).max(floor);
    let end = center.saturating_add(radius).min(text.len());
    snap_range(text, start..end.max(start))
}

/// Clamp `range` into the text and onto char boundaries (start rounds down,
/// end rounds up).
pub fn snap_range(text: &str, range: Range<usize>) -> Range<usize> {
    let start = floor_char_boundary(text, range.start.min(text.len()));
    let end = ceil_char_boundary(text, range.end.min(text.len())).max(start);
    start..end
}

pub fn floor_char_boundary(text: &str, index: usize) -> usize {
    let mut index = index.min(text.len());
    while !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}

pub fn ceil_char_boundary(text: &str, index: usize) -> usize {
    let mut index = index.min(text.len());
    while !text.is_char_boundary(index) {
        index += 1;
    }
    index
}

/// Offset reached by advancing `chars` characters from `from`, stopping at
/// the end of the text.
pub fn advance_chars(text: &str, from: usize, chars: usize) -> usize {
    text[from..].char_indices().nth(chars).map(|(index, _)| from + index).unwrap_or(text.len())
}

/// Offset reached by stepping back `chars` characters from `from`, stopping
/// at `floor`.
pub fn retreat_chars(text: &str, from: usize, chars: usize, floor: usize) -> usize {
    if chars == 0 {
        return from;
    }
    text[floor..from]
        .char_indices()
        .rev()
        .nth(chars - 1)
        .map(|(index, _)| floor + index)
        .unwrap_or(floor)
}

/// The first `chars` characters of `value`.
pub fn char_prefix(value: &str, chars: usize) -> &str {
    &value[..advance_chars(value, 0, chars)]
}

/// The last `chars` characters of `value`.
pub fn char_suffix(value: &str, chars: usize) -> &str {
    &value[retreat_chars(value, value.len(), chars, 0)..]
}
