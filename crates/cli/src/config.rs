// CLI configuration.
//
// Global config: `~/.docplace/config.toml`, with `[resolver]` and `[apply]`
// tables. A missing global file means defaults; an explicit `--config` path
// must exist and parse.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use docplace_engine::apply::{AcceptancePolicy, BatchPolicy};
use docplace_engine::ResolverConfig;

/// Root directory for docplace global state: `~/.docplace/`.
pub fn global_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".docplace"))
}

/// Path to the global config file: `~/.docplace/config.toml`.
pub fn global_config_path() -> Option<PathBuf> {
    global_dir().map(|d| d.join("config.toml"))
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
    pub resolver: ResolverConfig,
    pub apply: ApplyConfig,
}

/// Defaults for `docplace apply` and the acceptance gate of `resolve`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ApplyConfig {
    pub min_confidence: f64,
    pub policy: BatchPolicy,
}

impl Default for ApplyConfig {
    fn default() -> Self {
        Self {
            min_confidence: AcceptancePolicy::default().min_confidence,
            policy: BatchPolicy::default(),
        }
    }
}

impl CliConfig {
    /// Load from `explicit` when given, otherwise from the global config
    /// file. A global file that is missing yields defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load_from(path);
        }
        match global_config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load and validate a specific file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
        let config: Self = toml::from_str(&contents).map_err(|error| ConfigError::Parse {
            path: path.to_path_buf(),
            message: error.message().to_string(),
        })?;
        config.validate()?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.resolver.validate()?;
        let min = self.apply.min_confidence;
        if !(0.0..=1.0).contains(&min) {
            return Err(ConfigError::MinConfidence(min));
        }
        Ok(())
    }

    /// Acceptance gate, with an optional command-line override.
    pub fn acceptance(&self, min_confidence: Option<f64>) -> AcceptancePolicy {
        AcceptancePolicy { min_confidence: min_confidence.unwrap_or(self.apply.min_confidence) }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config `{}`: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config `{}`: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("invalid resolver config: {0}")]
    Invalid(#[from] docplace_engine::config::ConfigError),

    #[error("apply.min_confidence must be within [0, 1], got {0}")]
    MinConfidence(f64),
}
