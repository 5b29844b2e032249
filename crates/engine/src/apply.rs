// Applying resolutions to a text buffer.
//
// The resolver only answers "where". This module is the reference consumer:
// it gates results on confidence, splices accepted ones into a buffer and
// implements both batch ordering policies. Sequential is the default:
// each operation is resolved against the text produced by the previous one.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::ResolverConfig;
use crate::resolver::resolve;
use crate::types::{EditOperation, ResolutionResult};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ApplyError {
    #[error("operation could not be placed")]
    Unresolved,

    #[error("range {start}..{end} is outside the document (length {len})")]
    OutOfBounds { start: usize, end: usize, len: usize },

    #[error("offset {0} is not on a character boundary")]
    NotCharBoundary(usize),

    #[error("range {start}..{end} overlaps an edit applied earlier in the batch")]
    Overlap { start: usize, end: usize },
}

/// Splice `result.text` into `buffer` over the resolved range.
pub fn apply_resolution(buffer: &str, result: &ResolutionResult) -> Result<String, ApplyError> {
    let range = result.range().ok_or(ApplyError::Unresolved)?;
    if range.start > range.end || range.end > buffer.len() {
        return Err(ApplyError::OutOfBounds {
            start: range.start,
            end: range.end,
            len: buffer.len(),
        });
    }
    for offset in [range.start, range.end] {
        if !buffer.is_char_boundary(offset) {
            return Err(ApplyError::NotCharBoundary(offset));
        }
    }

    let mut out = String::with_capacity(buffer.len() - range.len() + result.text.len());
    out.push_str(&buffer[..range.start]);
    out.push_str(&result.text);
    out.push_str(&buffer[range.end..]);
    Ok(out)
}

/// How a consumer should treat a result.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Acceptance {
    Accepted,
    /// Placed, but below the confidence threshold.
    NeedsConfirmation,
    /// The failure sentinel. Kept distinct from low confidence.
    Unplaced,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct AcceptancePolicy {
    pub min_confidence: f64,
}

impl Default for AcceptancePolicy {
    fn default() -> Self {
        Self { min_confidence: 0.5 }
    }
}

impl AcceptancePolicy {
    pub fn classify(&self, result: &ResolutionResult) -> Acceptance {
        if result.is_failure() {
            Acceptance::Unplaced
        } else if result.confidence >= self.min_confidence {
            Acceptance::Accepted
        } else {
            Acceptance::NeedsConfirmation
        }
    }
}

/// Ordering policy for a batch of operations against one document.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BatchPolicy {
    /// Resolve and apply one at a time against the progressively updated text.
    #[default]
    Sequential,
    /// Resolve everything against the original snapshot, then apply in
    /// descending offset order.
    SnapshotDescending,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BatchOutcome {
    /// Position of the operation in the submitted batch.
    pub index: usize,
    pub result: ResolutionResult,
    pub acceptance: Acceptance,
    pub applied: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BatchReport {
    pub text: String,
    pub outcomes: Vec<BatchOutcome>,
}

impl BatchReport {
    pub fn applied_count(&self) -> usize {
        self.outcomes.iter().filter(|outcome| outcome.applied).count()
    }

    pub fn count(&self, acceptance: Acceptance) -> usize {
        self.outcomes.iter().filter(|outcome| outcome.acceptance == acceptance).count()
    }
}

/// Resolve and apply `ops` in order under `policy`.
///
/// Unplaced and below-threshold results are reported but never applied.
pub fn apply_batch(
    text: &str,
    ops: &[EditOperation],
    policy: BatchPolicy,
    config: &ResolverConfig,
    acceptance: &AcceptancePolicy,
) -> BatchReport {
    match policy {
        BatchPolicy::Sequential => apply_sequential(text, ops, config, acceptance),
        BatchPolicy::SnapshotDescending => apply_snapshot(text, ops, config, acceptance),
    }
}

fn apply_sequential(
    text: &str,
    ops: &[EditOperation],
    config: &ResolverConfig,
    acceptance: &AcceptancePolicy,
) -> BatchReport {
    let mut current = text.to_string();
    let mut outcomes = Vec::with_capacity(ops.len());

    for (index, op) in ops.iter().enumerate() {
        let result = resolve(&current, op, None, None, config);
        let mut outcome = pending(index, result, acceptance);
        if outcome.acceptance == Acceptance::Accepted {
            match apply_resolution(&current, &outcome.result) {
                Ok(next) => {
                    current = next;
                    outcome.applied = true;
                }
                Err(error) => outcome.error = Some(error.to_string()),
            }
        }
        outcomes.push(outcome);
    }

    BatchReport { text: current, outcomes }
}

fn apply_snapshot(
    text: &str,
    ops: &[EditOperation],
    config: &ResolverConfig,
    acceptance: &AcceptancePolicy,
) -> BatchReport {
    let mut outcomes: Vec<BatchOutcome> = ops
        .iter()
        .enumerate()
        .map(|(index, op)| pending(index, resolve(text, op, None, None, config), acceptance))
        .collect();

    // On equal starts spans go before inserts, so an insert at p never blocks
    // a span starting at p. Later inserts go first so they keep batch order.
    let mut order: Vec<usize> = outcomes
        .iter()
        .filter(|outcome| outcome.acceptance == Acceptance::Accepted)
        .map(|outcome| outcome.index)
        .collect();
    order.sort_by_key(|&index| {
        let result = &outcomes[index].result;
        (std::cmp::Reverse(result.start), result.is_insertion(), std::cmp::Reverse(index))
    });

    let mut current = text.to_string();
    let mut floor = text.len();
    for index in order {
        let outcome = &mut outcomes[index];
        let Some(range) = outcome.result.range() else {
            continue;
        };
        if range.end > floor {
            outcome.error =
                Some(ApplyError::Overlap { start: range.start, end: range.end }.to_string());
            continue;
        }
        match apply_resolution(&current, &outcome.result) {
            Ok(next) => {
                current = next;
                floor = range.start;
                outcome.applied = true;
            }
            Err(error) => outcome.error = Some(error.to_string()),
        }
    }

    BatchReport { text: current, outcomes }
}

fn pending(index: usize, result: ResolutionResult, policy: &AcceptancePolicy) -> BatchOutcome {
    let acceptance = policy.classify(&result);
    BatchOutcome { index, result, acceptance, applied: false, error: None }
}
