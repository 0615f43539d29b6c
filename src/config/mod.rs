//! Runtime configuration.
//!
//! The pipeline stages stand in for model and dataset calls, so each one
//! waits for a fixed simulated latency. The latencies are configurable so
//! the binaries can run instantly (`--no-delay`) and tests never sleep.
//!
//! Configuration is read from a JSON file. Missing fields fall back to the
//! defaults below.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid JSON for `StudyConfig`
    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Simulated per-stage latency, in milliseconds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SimulatedLatency {
    pub embedding_ms: u64,
    pub retrieval_ms: u64,
    pub notes_ms: u64,
    pub explanation_ms: u64,
    pub code_ms: u64,
    pub examples_ms: u64,
    pub quiz_ms: u64,
}

impl Default for SimulatedLatency {
    fn default() -> Self {
        Self {
            embedding_ms: 500,
            retrieval_ms: 800,
            notes_ms: 300,
            explanation_ms: 300,
            code_ms: 400,
            examples_ms: 300,
            quiz_ms: 300,
        }
    }
}

impl SimulatedLatency {
    /// No latency at all.
    pub fn none() -> Self {
        Self {
            embedding_ms: 0,
            retrieval_ms: 0,
            notes_ms: 0,
            explanation_ms: 0,
            code_ms: 0,
            examples_ms: 0,
            quiz_ms: 0,
        }
    }

    /// Sum of all stage latencies, saturating at `u64::MAX` milliseconds.
    pub fn total(&self) -> Duration {
        let ms = [
            self.embedding_ms,
            self.retrieval_ms,
            self.notes_ms,
            self.explanation_ms,
            self.code_ms,
            self.examples_ms,
            self.quiz_ms,
        ]
        .into_iter()
        .fold(0u64, u64::saturating_add);

        Duration::from_millis(ms)
    }
}

/// Sleep for `ms` milliseconds, skipping the timer entirely for zero.
pub(crate) async fn simulate(ms: u64) {
    if ms > 0 {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct StudyConfig {
    /// Simulated latency of each stage
    pub latency: SimulatedLatency,
}

impl StudyConfig {
    /// Configuration without any simulated latency.
    pub fn instant() -> Self {
        Self {
            latency: SimulatedLatency::none(),
        }
    }

    /// Load configuration from a JSON file.
    ///
    /// # Errors
    /// Returns `ConfigError` if the file cannot be read or parsed
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load from `path` if given, otherwise from the default location if a
    /// file exists there, otherwise fall back to defaults.
    ///
    /// # Errors
    /// Returns `ConfigError` if a file exists but cannot be read or parsed
    pub fn load_or_default(path: Option<&Path>) -> ConfigResult<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }

        match Self::default_path() {
            Some(path) if path.exists() => Self::load(path),
            _ => Ok(Self::default()),
        }
    }

    /// Default config file location, e.g. `~/.config/study-forge/config.json`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("study-forge").join("config.json"))
    }
}
