//! Error types
//!
//! The simulation itself never fails: rejected transitions and empty sweeps are
//! normal outcomes. Only configuration loading can go wrong.

use std::path::PathBuf;

/// Failure loading or validating [`crate::Settings`]
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Settings file could not be read
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Settings file is not valid JSON for `Settings`
    #[error("invalid settings JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// A value is out of its allowed range
    #[error("invalid setting `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}
