#![forbid(unsafe_code)]
#![deny(unused_must_use, rustdoc::broken_intra_doc_links, rustdoc::bare_urls)]
#![warn(
    dead_code,
    unused,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs
)]
#![allow(clippy::module_name_repetitions)]

//! Provisioning workflow engine for tenant organizations, datasources, and API keys.
//!
//! Layout:
//! - `api.rs`: transport seam (`RestTransport`) and the typed `ControlPlane` client
//! - `org.rs`: organization resolution and the active-organization switch
//! - `datasource.rs`: datasource request building and the retry-and-verify loop
//! - `retry.rs` / `verify.rs`: retry policy, sleeper seam, verification policy
//! - `keys.rs`: interactive API key session
//! - `prompt.rs`: operator prompt seam and confirmation policy
//! - `workflow.rs`: the create / delete / keys / test operations

pub mod api;
pub mod datasource;
pub mod error;
pub mod keys;
pub mod model;
pub mod org;
pub mod prompt;
pub mod retry;
pub mod verify;
pub mod workflow;

pub use api::{ApiRequest, ApiResponse, ControlPlane, Method, RestTransport};
pub use datasource::{
    DatasourceProvisioner, DatasourceRequest, ProvisionAttempt, ProvisionOutcome, ProvisionReport,
};
pub use error::{BoxError, CoreError, CoreResult, TransportError};
pub use keys::{CreatedKey, DeletedKey, KeySession, KeySessionSummary};
pub use model::{ApiKey, ApiKeyId, DatasourceId, KeyRole, OrgId, Organization};
pub use org::{ActiveOrganization, OrgScope, OrganizationResolver, ResolvedOrganization};
pub use prompt::{Confirmation, Prompt};
pub use retry::{Backoff, RetryPolicy, Sleeper, TokioSleeper};
pub use verify::{MessageClassifier, Verification, VerificationPolicy};
pub use workflow::{CreateReport, DIAGNOSTIC_ORG_ID, DeleteOutcome, Workflow};
