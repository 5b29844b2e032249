// Core domain types: operations in, resolutions out.

use std::ops::Range;

use serde::{Deserialize, Serialize};

/// The four edit shapes an agent may propose.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    ReplaceRange,
    DeleteRange,
    InsertAfter,
    InsertAfterHeading,
}

impl OperationKind {
    /// Replace and delete target an existing span of text.
    pub fn targets_span(self) -> bool {
        matches!(self, Self::ReplaceRange | Self::DeleteRange)
    }

    /// Insert kinds resolve to a zero-width point.
    pub fn is_insert(self) -> bool {
        matches!(self, Self::InsertAfter | Self::InsertAfterHeading)
    }
}

/// An edit operation as proposed by the agent layer.
///
/// Only `kind` is mandatory on the wire. Fields that a kind needs but does
/// not carry make the owning strategy decline rather than fail.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EditOperation {
    pub kind: OperationKind,
    /// Replacement or insertion payload. Empty for deletes.
    #[serde(default)]
    pub text: String,
    /// Exact snippet expected at the target (replace/delete).
    #[serde(default)]
    pub original_text: Option<String>,
    /// Phrase marking an insertion point (insert kinds).
    #[serde(default)]
    pub anchor_text: Option<String>,
    #[serde(default)]
    pub left_context: Option<String>,
    #[serde(default)]
    pub right_context: Option<String>,
    /// Zero-based selector among repeated matches.
    #[serde(default)]
    pub occurrence_index: usize,
    /// Offsets from proposal time. Locality bias only.
    #[serde(default)]
    pub hint_start: Option<usize>,
    #[serde(default)]
    pub hint_end: Option<usize>,
}

impl EditOperation {
    pub fn new(kind: OperationKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            original_text: None,
            anchor_text: None,
            left_context: None,
            right_context: None,
            occurrence_index: 0,
            hint_start: None,
            hint_end: None,
        }
    }

    pub fn replace(original: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(OperationKind::ReplaceRange, text).with_original(original)
    }

    pub fn delete(original: impl Into<String>) -> Self {
        Self::new(OperationKind::DeleteRange, "").with_original(original)
    }

    pub fn insert_after(anchor: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(OperationKind::InsertAfter, text).with_anchor(anchor)
    }

    pub fn insert_after_heading(anchor: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(OperationKind::InsertAfterHeading, text).with_anchor(anchor)
    }

    pub fn with_original(mut self, original: impl Into<String>) -> Self {
        self.original_text = Some(original.into());
        self
    }

    pub fn with_anchor(mut self, anchor: impl Into<String>) -> Self {
        self.anchor_text = Some(anchor.into());
        self
    }

    pub fn with_context(mut self, left: impl Into<String>, right: impl Into<String>) -> Self {
        self.left_context = Some(left.into());
        self.right_context = Some(right.into());
        self
    }

    pub fn with_occurrence(mut self, index: usize) -> Self {
        self.occurrence_index = index;
        self
    }

    pub fn with_hint(mut self, start: usize, end: usize) -> Self {
        self.hint_start = Some(start);
        self.hint_end = Some(end);
        self
    }

    /// `original_text`, treating an empty string as absent.
    pub fn original(&self) -> Option<&str> {
        non_empty(self.original_text.as_deref())
    }

    /// `anchor_text`, treating an empty string as absent.
    pub fn anchor(&self) -> Option<&str> {
        non_empty(self.anchor_text.as_deref())
    }

    /// Both context strings, only when both are non-empty.
    pub fn context(&self) -> Option<(&str, &str)> {
        Some((non_empty(self.left_context.as_deref())?, non_empty(self.right_context.as_deref())?))
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.is_empty())
}

/// A user's current text selection, as byte offsets.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Selection {
    pub start: usize,
    pub end: usize,
}

impl Selection {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

/// Which strategy produced a resolution.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    Selection,
    Exact,
    Anchor,
    Context,
    NormalizedWhitespace,
    EdgeAnchor,
    WindowSimilarity,
    Fallback,
}

impl Strategy {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Selection => "selection",
            Self::Exact => "exact",
            Self::Anchor => "anchor",
            Self::Context => "context",
            Self::NormalizedWhitespace => "normalized_whitespace",
            Self::EdgeAnchor => "edge_anchor",
            Self::WindowSimilarity => "window_similarity",
            Self::Fallback => "fallback",
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output of one resolution call.
///
/// `start == end == -1` with `confidence == 0.0` is the failure sentinel.
/// Successful results always satisfy `0 <= start <= end`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResolutionResult {
    pub start: i64,
    pub end: i64,
    pub text: String,
    pub confidence: f64,
    #[serde(default)]
    pub strategy: Option<Strategy>,
}

impl ResolutionResult {
    pub fn failure(text: impl Into<String>) -> Self {
        Self { start: -1, end: -1, text: text.into(), confidence: 0.0, strategy: None }
    }

    pub fn is_failure(&self) -> bool {
        self.start < 0 || self.end < 0
    }

    /// Byte range to splice, or `None` for the sentinel.
    pub fn range(&self) -> Option<Range<usize>> {
        if self.is_failure() {
            return None;
        }
        Some(self.start as usize..self.end as usize)
    }

    pub fn is_insertion(&self) -> bool {
        !self.is_failure() && self.start == self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operation_deserializes_with_defaults() {
        let op: EditOperation =
            serde_json::from_str(r#"{"kind":"replace_range","original_text":"foo","text":"bar"}"#)
                .expect("operation should parse");
        assert_eq!(op.kind, OperationKind::ReplaceRange);
        assert_eq!(op.original(), Some("foo"));
        assert_eq!(op.occurrence_index, 0);
        assert!(op.anchor().is_none());
        assert!(op.hint_start.is_none());
    }

    #[test]
    fn operation_ignores_unknown_fields() {
        let op: EditOperation =
            serde_json::from_str(r#"{"kind":"delete_range","original_text":"x","note":"hi"}"#)
                .expect("unknown fields should be ignored");
        assert_eq!(op.kind, OperationKind::DeleteRange);
        assert_eq!(op.text, "");
    }

    #[test]
    fn empty_strings_count_as_missing() {
        let op = EditOperation::replace("", "x").with_context("", "right");
        assert!(op.original().is_none());
        assert!(op.context().is_none());
    }

    #[test]
    fn failure_sentinel_has_no_range() {
        let result = ResolutionResult::failure("payload");
        assert!(result.is_failure());
        assert_eq!(result.range(), None);
        assert_eq!(result.confidence, 0.0);
        assert_eq!(result.text, "payload");
    }

    #[test]
    fn result_serializes_strategy_in_snake_case() {
        let result = ResolutionResult {
            start: 4,
            end: 9,
            text: "new".into(),
            confidence: 0.85,
            strategy: Some(Strategy::NormalizedWhitespace),
        };
        let json = serde_json::to_value(&result).expect("result should serialize");
        assert_eq!(json["strategy"], "normalized_whitespace");
        assert_eq!(json["start"], 4);
    }

    #[test]
    fn selection_emptiness() {
        assert!(Selection::new(5, 5).is_empty());
        assert!(Selection::new(6, 5).is_empty());
        assert!(!Selection::new(1, 5).is_empty());
    }
}
