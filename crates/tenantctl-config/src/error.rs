//! Error types for configuration loading.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result alias used across the configuration crate.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors produced while loading or validating the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("could not read config at {}: {source}", path.display())]
    Io {
        /// Path that was requested.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// The configuration file is not a valid configuration document.
    #[error("config at {} is not valid: {source}", path.display())]
    Parse {
        /// Path that was parsed.
        path: PathBuf,
        /// Underlying JSON error.
        source: serde_json::Error,
    },
    /// A field was present but held an unusable value.
    #[error("invalid value for '{field}' in '{section}': {reason}")]
    InvalidField {
        /// Section containing the field.
        section: &'static str,
        /// Field that failed validation.
        field: &'static str,
        /// Static reason for the failure.
        reason: &'static str,
        /// Offending value when it is safe to echo.
        value: Option<String>,
    },
}

impl ConfigError {
    pub(crate) fn invalid(
        section: &'static str,
        field: &'static str,
        reason: &'static str,
        value: Option<String>,
    ) -> Self {
        Self::InvalidField {
            section,
            field,
            reason,
            value,
        }
    }
}
