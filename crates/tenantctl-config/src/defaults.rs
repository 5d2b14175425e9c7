//! Default values applied when the configuration omits optional settings.

/// Attempts made by the datasource provisioner before giving up.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;
/// Backoff step between provisioning attempts, in milliseconds.
pub const DEFAULT_BACKOFF_STEP_MS: u64 = 1_000;
/// Upper bound for exponential backoff delays, in milliseconds.
pub const DEFAULT_MAX_BACKOFF_MS: u64 = 30_000;
/// Read-back messages that indicate the datasource has not propagated yet.
pub const DEFAULT_TRANSIENT_MESSAGES: &[&str] = &["Not Found", "Permission denied"];
/// Scheme assumed when the service URL is given as `host[:port]`.
pub const DEFAULT_SCHEME: &str = "http";
