//! Validation helpers for the configuration document.

use url::Url;

use crate::defaults::DEFAULT_SCHEME;
use crate::error::{ConfigError, ConfigResult};
use crate::model::{AppConfig, ServiceCredentials};

/// Check every field the workflows rely on.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidField`] for the first field that fails.
pub fn validate_config(config: &AppConfig) -> ConfigResult<()> {
    let creds = &config.service_credentials;
    if creds.username.trim().is_empty() {
        return Err(ConfigError::invalid(
            "serviceCredentials",
            "username",
            "must not be empty",
            None,
        ));
    }
    service_base_url(creds)?;

    if config.provisioning.max_attempts == 0 {
        return Err(ConfigError::invalid(
            "provisioning",
            "maxAttempts",
            "must be at least 1",
            Some("0".to_string()),
        ));
    }
    if config
        .provisioning
        .transient_messages
        .iter()
        .any(|message| message.trim().is_empty())
    {
        return Err(ConfigError::invalid(
            "provisioning",
            "transientMessages",
            "entries must not be empty",
            None,
        ));
    }
    Ok(())
}

/// Resolve the configured service location into an absolute base URL.
///
/// `host[:port]` values get the `http` scheme. Any user-info embedded in the
/// URL is removed because credentials travel separately.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidField`] when the value is empty, does not
/// parse, or has no host.
pub fn service_base_url(creds: &ServiceCredentials) -> ConfigResult<Url> {
    let raw = creds.url.trim();
    if raw.is_empty() {
        return Err(ConfigError::invalid(
            "serviceCredentials",
            "url",
            "must not be empty",
            None,
        ));
    }

    let candidate = if raw.contains("://") {
        raw.to_string()
    } else {
        format!("{DEFAULT_SCHEME}://{raw}")
    };

    let mut url = Url::parse(&candidate).map_err(|_| {
        ConfigError::invalid(
            "serviceCredentials",
            "url",
            "must be host[:port] or an absolute URL",
            Some(raw.to_string()),
        )
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::invalid(
            "serviceCredentials",
            "url",
            "scheme must be http or https",
            Some(url.scheme().to_string()),
        ));
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(ConfigError::invalid(
            "serviceCredentials",
            "url",
            "must include a host",
            Some(raw.to_string()),
        ));
    }

    // Both setters only fail for cannot-be-a-base URLs, which http(s) never are.
    let _ = url.set_username("");
    let _ = url.set_password(None);
    Ok(url)
}
