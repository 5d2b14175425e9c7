//! Error types for the provisioning workflows.

use thiserror::Error;

use crate::api::Method;
use crate::model::OrgId;

/// Boxed error used to carry transport-specific failures across the seam.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Result alias for workflow operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Failures raised by a [`RestTransport`](crate::api::RestTransport) implementation.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The request never produced a response (connect, TLS, timeout).
    #[error("{method} {path} failed: {source}")]
    Request {
        /// HTTP method of the failed request.
        method: Method,
        /// Request path relative to the service base URL.
        path: String,
        /// Underlying client error.
        source: BoxError,
    },
    /// A response arrived but its body was not JSON.
    #[error("{method} {path} returned status {status} with a non-JSON body: {source}")]
    Decode {
        /// HTTP method of the request.
        method: Method,
        /// Request path relative to the service base URL.
        path: String,
        /// HTTP status of the response.
        status: u16,
        /// Underlying decode error.
        source: BoxError,
    },
}

/// Errors surfaced by the workflow engine.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The transport could not complete a request.
    #[error(transparent)]
    Transport(#[from] TransportError),
    /// The service answered with a non-success status where one was required.
    #[error("{operation} was rejected with status {status}: {message}")]
    Rejected {
        /// Operation that was attempted.
        operation: &'static str,
        /// HTTP status returned by the service.
        status: u16,
        /// Service message, or the status when none was given.
        message: String,
    },
    /// A success response did not have the expected shape.
    #[error("unexpected response to {operation}: {source}")]
    Decode {
        /// Operation whose response failed to decode.
        operation: &'static str,
        /// Underlying JSON error.
        source: serde_json::Error,
    },
    /// Operator input failed a precondition.
    #[error("invalid {field}: {reason}")]
    InvalidInput {
        /// Name of the offending input.
        field: &'static str,
        /// Static reason for the failure.
        reason: &'static str,
    },
    /// The create-organization call returned no id.
    #[error("no organization was created; server said: {message}")]
    OrganizationNotCreated {
        /// Requested organization name.
        name: String,
        /// Service message, verbatim.
        message: String,
    },
    /// No organization carries the requested name.
    #[error("organization '{name}' was not found")]
    OrganizationNotFound {
        /// Requested organization name.
        name: String,
    },
    /// The service refused to bind the session to an organization.
    #[error("could not switch to organization {org_id}: {message}")]
    SwitchRejected {
        /// Organization that was requested.
        org_id: OrgId,
        /// HTTP status returned by the service.
        status: u16,
        /// Service message, or the status when none was given.
        message: String,
    },
    /// Operator input ended before a question was answered.
    #[error("input closed before answering \"{question}\"")]
    PromptClosed {
        /// Question that was pending.
        question: String,
    },
    /// Reading operator input failed.
    #[error("failed to read operator input: {source}")]
    Prompt {
        /// Underlying IO error.
        source: std::io::Error,
    },
}
