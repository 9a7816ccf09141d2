//! Error types for insight synthesis and configuration loading
//!
//! Insight errors never reach the presentation layer: the coordinator turns
//! every one of them into the locale fallback insight. They exist so the
//! failure can be classified and logged.

use std::path::PathBuf;
use thiserror::Error;

/// Failures talking to the external insight provider
#[derive(Debug, Error)]
pub enum InsightError {
    #[error("No API key configured for the insight provider")]
    MissingApiKey,

    #[error("Invalid provider endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Insight provider returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Insight request timed out after {0} seconds")]
    Timeout(u64),

    #[error("Malformed insight payload: {0}")]
    Malformed(String),
}

impl InsightError {
    /// Short machine-readable class used in log lines
    pub fn kind(&self) -> &'static str {
        match self {
            InsightError::MissingApiKey => "missing_api_key",
            InsightError::InvalidEndpoint(_) => "invalid_endpoint",
            InsightError::Network(_) => "network",
            InsightError::Status { .. } => "status",
            InsightError::Timeout(_) => "timeout",
            InsightError::Malformed(_) => "malformed",
        }
    }
}

impl From<reqwest::Error> for InsightError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            InsightError::Malformed(err.to_string())
        } else {
            InsightError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for InsightError {
    fn from(err: serde_json::Error) -> Self {
        InsightError::Malformed(err.to_string())
    }
}

/// Failures reading `~/.genesis/config.json` or a locale override file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not find home directory")]
    NoHomeDir,

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
