// Resolver tunables.
//
// Every radius, threshold and confidence the strategies use lives here so
// the engine stays pure and can be exercised with varied settings.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Named constants passed into every resolution call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ResolverConfig {
    /// Radius (bytes) of the cursor-local exact search window.
    pub cursor_window_radius: usize,
    /// Radius (bytes) of the sliding-window neighborhood around a hint.
    pub fuzzy_neighborhood_radius: usize,
    /// Minimum window similarity accepted by the sliding-window matcher.
    pub similarity_threshold: f64,
    /// Confidence assigned to a window scoring exactly `similarity_threshold`.
    pub fuzzy_confidence_floor: f64,
    /// Confidence assigned to a perfect window score.
    pub fuzzy_confidence_ceiling: f64,
    /// Maximum characters captured between left and right context.
    pub context_span_max: usize,
    /// Characters taken from each end of `original_text` for edge anchoring.
    pub edge_probe_chars: usize,
    /// Characters compared at each window end for the similarity bonus.
    pub edge_bonus_chars: usize,
    /// Score added per matching window end.
    pub edge_bonus: f64,
    pub confidence: ConfidenceConfig,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            cursor_window_radius: 10_000,
            fuzzy_neighborhood_radius: 1_000,
            similarity_threshold: 0.7,
            fuzzy_confidence_floor: 0.7,
            fuzzy_confidence_ceiling: 0.85,
            context_span_max: 400,
            edge_probe_chars: 30,
            edge_bonus_chars: 20,
            edge_bonus: 0.05,
            confidence: ConfidenceConfig::default(),
        }
    }
}

impl ResolverConfig {
    /// Check that thresholds and confidences are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_unit("similarity_threshold", self.similarity_threshold)?;
        check_unit("fuzzy_confidence_floor", self.fuzzy_confidence_floor)?;
        check_unit("fuzzy_confidence_ceiling", self.fuzzy_confidence_ceiling)?;
        check_unit("edge_bonus", self.edge_bonus)?;
        if self.fuzzy_confidence_floor > self.fuzzy_confidence_ceiling {
            return Err(ConfigError::InvertedRange {
                low: "fuzzy_confidence_floor",
                high: "fuzzy_confidence_ceiling",
            });
        }
        if self.context_span_max == 0 {
            return Err(ConfigError::Zero("context_span_max"));
        }
        if self.edge_probe_chars == 0 {
            return Err(ConfigError::Zero("edge_probe_chars"));
        }
        self.confidence.validate()
    }
}

/// Fixed confidences reported by each strategy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ConfidenceConfig {
    pub selection: f64,
    pub exact: f64,
    pub anchor: f64,
    pub context: f64,
    pub normalized_whitespace: f64,
    /// Edge anchoring when both the prefix and suffix probes agree.
    pub edge_both: f64,
    /// Edge anchoring from the prefix probe alone.
    pub edge_prefix: f64,
    /// Edge anchoring from the suffix probe alone.
    pub edge_suffix: f64,
    /// Anchorless insert into a document whose body is empty.
    pub empty_body_insert: f64,
    /// Anchorless heading insert into a non-empty body.
    pub degraded_insert: f64,
}

impl Default for ConfidenceConfig {
    fn default() -> Self {
        Self {
            selection: 1.0,
            exact: 1.0,
            anchor: 0.9,
            context: 0.8,
            normalized_whitespace: 0.85,
            edge_both: 0.7,
            edge_prefix: 0.65,
            edge_suffix: 0.6,
            empty_body_insert: 0.8,
            degraded_insert: 0.5,
        }
    }
}

impl ConfidenceConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("confidence.selection", self.selection),
            ("confidence.exact", self.exact),
            ("confidence.anchor", self.anchor),
            ("confidence.context", self.context),
            ("confidence.normalized_whitespace", self.normalized_whitespace),
            ("confidence.edge_both", self.edge_both),
            ("confidence.edge_prefix", self.edge_prefix),
            ("confidence.edge_suffix", self.edge_suffix),
            ("confidence.empty_body_insert", self.empty_body_insert),
            ("confidence.degraded_insert", self.degraded_insert),
        ] {
            check_unit(name, value)?;
            if value == 0.0 {
                // 0.0 is reserved for the failure sentinel.
                return Err(ConfigError::Zero(name));
            }
        }
        Ok(())
    }
}

fn check_unit(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfUnitRange { name, value })
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{name} must be within [0, 1], got {value}")]
    OutOfUnitRange { name: &'static str, value: f64 },

    #[error("{low} must not exceed {high}")]
    InvertedRange { low: &'static str, high: &'static str },

    #[error("{0} must be greater than zero")]
    Zero(&'static str),
}
