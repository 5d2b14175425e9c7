//! Reads the configuration file from disk.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{ConfigError, ConfigResult};
use crate::model::AppConfig;
use crate::validate::validate_config;

/// Load, parse, and validate the configuration at `path`.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] when the file cannot be read,
/// [`ConfigError::Parse`] when it is not a valid document, and
/// [`ConfigError::InvalidField`] when validation fails.
pub fn load_config(path: &Path) -> ConfigResult<AppConfig> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config = parse_config(path, &raw)?;
    debug!(
        path = %path.display(),
        template_fields = config.datasource_template.fields().len(),
        "configuration loaded"
    );
    Ok(config)
}

/// Parse and validate an in-memory configuration document.
///
/// `origin` is only used for error reporting.
///
/// # Errors
///
/// Returns [`ConfigError::Parse`] or [`ConfigError::InvalidField`].
pub fn parse_config(origin: &Path, raw: &str) -> ConfigResult<AppConfig> {
    let config: AppConfig = serde_json::from_str(raw).map_err(|source| ConfigError::Parse {
        path: origin.to_path_buf(),
        source,
    })?;
    validate_config(&config)?;
    Ok(config)
}
