//! Classification of datasource read-backs.
//!
//! A freshly created datasource can briefly answer `Not Found` or
//! `Permission denied` while it propagates; those answers are retryable.

use serde::Serialize;
use tenantctl_config::ProvisioningSettings;
use tenantctl_config::defaults::DEFAULT_TRANSIENT_MESSAGES;

use crate::api::ApiResponse;

/// Result of checking one provisioning attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Verification {
    /// The datasource is reachable.
    Verified,
    /// Not visible yet; worth another attempt.
    Transient {
        /// Message returned by the service.
        message: String,
    },
    /// The service refused in a way retrying will not fix.
    Rejected {
        /// HTTP status returned by the service.
        status: u16,
        /// Service message, or the status when none was given.
        message: String,
    },
}

impl Verification {
    /// Whether the attempt confirmed the datasource.
    #[must_use]
    pub const fn is_verified(&self) -> bool {
        matches!(self, Self::Verified)
    }

    /// Whether another attempt may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Transient { .. })
    }
}

/// Decides whether a provisioning attempt succeeded.
pub trait VerificationPolicy: Send + Sync {
    /// Classify the read-back of a created datasource.
    fn classify(&self, read_back: &ApiResponse) -> Verification;

    /// Classify a create response that carried no datasource id.
    ///
    /// Transient answers stay retryable; anything else is a rejection, since
    /// there is nothing to read back.
    fn classify_unidentified(&self, created: &ApiResponse) -> Verification {
        match self.classify(created) {
            transient @ Verification::Transient { .. } => transient,
            _ => Verification::Rejected {
                status: created.status,
                message: created.describe(),
            },
        }
    }
}

/// Matches the body's `message` against a list of transient messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageClassifier {
    transient_messages: Vec<String>,
    accept_error_responses: bool,
}

impl Default for MessageClassifier {
    fn default() -> Self {
        Self::new(
            DEFAULT_TRANSIENT_MESSAGES
                .iter()
                .map(ToString::to_string)
                .collect(),
            false,
        )
    }
}

impl MessageClassifier {
    /// Build a classifier.
    ///
    /// With `accept_error_responses`, any non-transient answer is treated as
    /// verified regardless of status.
    #[must_use]
    pub fn new(transient_messages: Vec<String>, accept_error_responses: bool) -> Self {
        Self {
            transient_messages,
            accept_error_responses,
        }
    }

    /// Build the classifier described by the provisioning settings.
    #[must_use]
    pub fn from_settings(settings: &ProvisioningSettings) -> Self {
        Self::new(
            settings.transient_messages.clone(),
            settings.accept_error_responses,
        )
    }
}

impl VerificationPolicy for MessageClassifier {
    fn classify(&self, read_back: &ApiResponse) -> Verification {
        if let Some(message) = read_back.message()
            && self.transient_messages.iter().any(|known| known == message)
        {
            return Verification::Transient {
                message: message.to_string(),
            };
        }
        if read_back.is_success() || self.accept_error_responses {
            Verification::Verified
        } else {
            Verification::Rejected {
                status: read_back.status,
                message: read_back.describe(),
            }
        }
    }
}
