//! Error types.
//!
//! Only configuration problems are fatal, and they surface from
//! [`InputManager::start_tracking`](crate::InputManager::start_tracking).
//! Detector failures are recovered inside the loop; a missing capture
//! source selects pointer mode instead of failing.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, InputError>;

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum InputError {
    #[error("invalid configuration: `{field}` {reason}")]
    InvalidConfig {
        field:  &'static str,
        reason: String,
    },

    #[error("cannot read config {path}: {source}")]
    ConfigIo {
        path:   PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("detector error: {0}")]
    Detector(#[from] DetectorError),

    #[error("asset '{key}' did not load within {waited_ms} ms")]
    AssetTimeout {
        key:       String,
        waited_ms: u64,
    },

    #[error("no scene registered as '{0}'")]
    UnknownScene(String),
}

impl InputError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        InputError::InvalidConfig { field, reason: reason.into() }
    }
}

/// Failures reported by a landmark detector.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DetectorError {
    /// A single recognition call failed; the next cycle retries.
    #[error("recognition failed: {0}")]
    Recognition(String),

    /// The capture device went away or was never there.
    #[error("capture source unavailable")]
    Unavailable,
}
