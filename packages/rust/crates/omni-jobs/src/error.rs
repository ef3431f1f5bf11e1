//! Error types for the ambient surfaces of `omni-jobs`.
//!
//! Job failures are never wrapped here: they stay `anyhow::Error` and only
//! surface through the error cache.

use std::path::PathBuf;

use thiserror::Error;

/// Settings and argument errors.
#[derive(Error, Debug)]
pub enum JobsError {
    /// Settings file could not be read.
    #[error("Failed to read settings {path}: {source}")]
    SettingsIo {
        /// File that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Settings file is not valid YAML for `JobsSettings`.
    #[error("Failed to parse settings {path}: {source}")]
    SettingsParse {
        /// File that failed.
        path: PathBuf,
        /// Underlying YAML error.
        #[source]
        source: serde_yaml::Error,
    },

    /// Invalid argument or configuration value.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for `omni-jobs` operations.
pub type Result<T> = std::result::Result<T, JobsError>;
