//! Typed configuration document.
//!
//! # Design
//! - Pure data carriers; IO lives in `loader.rs`, checks in `validate.rs`.
//! - Keys are camelCase on disk to match the operator-facing file format.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::defaults::{
    DEFAULT_BACKOFF_STEP_MS, DEFAULT_MAX_ATTEMPTS, DEFAULT_MAX_BACKOFF_MS,
    DEFAULT_TRANSIENT_MESSAGES,
};

/// Complete configuration loaded once at startup.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    /// Control-plane endpoint and credentials.
    pub service_credentials: ServiceCredentials,
    /// Fields merged into every create-datasource request.
    pub datasource_template: DatasourceTemplate,
    /// Retry and verification tuning for datasource provisioning.
    #[serde(default)]
    pub provisioning: ProvisioningSettings,
}

/// Endpoint and basic credentials for the control-plane API.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServiceCredentials {
    /// Account name sent with every request.
    pub username: String,
    /// Account password sent with every request.
    pub password: String,
    /// Service location, either `host[:port]` or a full `http(s)://` URL.
    pub url: String,
}

impl fmt::Debug for ServiceCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("url", &self.url)
            .finish()
    }
}

/// Operator-supplied datasource fields (type, access mode, connection details).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct DatasourceTemplate(Map<String, Value>);

impl DatasourceTemplate {
    /// Wrap an existing JSON object.
    #[must_use]
    pub const fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Borrow the template fields.
    #[must_use]
    pub const fn fields(&self) -> &Map<String, Value> {
        &self.0
    }
}

/// Delay growth between provisioning attempts.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BackoffStrategy {
    /// `attempt * step`.
    #[default]
    Linear,
    /// `step * 2^(attempt - 1)`, capped at `maxBackoffMs`; no delay before attempt 0.
    Exponential,
}

/// Tuning for the datasource retry-and-verify loop.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct ProvisioningSettings {
    /// Total create attempts, including the first.
    pub max_attempts: u32,
    /// Backoff step in milliseconds.
    pub backoff_step_ms: u64,
    /// How the delay grows with the attempt index.
    pub backoff: BackoffStrategy,
    /// Ceiling applied to exponential delays, in milliseconds.
    pub max_backoff_ms: u64,
    /// Read-back messages treated as "not propagated yet".
    pub transient_messages: Vec<String>,
    /// Treat non-success read-back statuses as verified.
    pub accept_error_responses: bool,
}

impl ProvisioningSettings {
    /// Backoff step as a [`Duration`].
    #[must_use]
    pub const fn backoff_step(&self) -> Duration {
        Duration::from_millis(self.backoff_step_ms)
    }

    /// Exponential ceiling as a [`Duration`].
    #[must_use]
    pub const fn max_backoff(&self) -> Duration {
        Duration::from_millis(self.max_backoff_ms)
    }
}

impl Default for ProvisioningSettings {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            backoff_step_ms: DEFAULT_BACKOFF_STEP_MS,
            backoff: BackoffStrategy::Linear,
            max_backoff_ms: DEFAULT_MAX_BACKOFF_MS,
            transient_messages: DEFAULT_TRANSIENT_MESSAGES
                .iter()
                .map(ToString::to_string)
                .collect(),
            accept_error_responses: false,
        }
    }
}
