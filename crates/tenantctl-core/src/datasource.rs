//! Datasource provisioning with bounded retry and read-back verification.
//!
//! # Design
//! - The service's create and read paths are not atomically consistent, so a
//!   create is only reported as successful after a read-back verifies it.
//! - Attempt count, delays, and the verification predicate are injected; the
//!   loop itself only sequences calls.
//! - Exhausting the attempts is a reported outcome, not an error; nothing is
//!   rolled back.

use std::sync::Arc;

use serde::Serialize;
use serde_json::{Map, Value};
use tenantctl_config::DatasourceTemplate;
use tracing::{info, instrument, warn};

use crate::api::ControlPlane;
use crate::error::CoreResult;
use crate::model::{DatasourceId, OrgId};
use crate::org::OrgScope;
use crate::retry::{RetryPolicy, Sleeper};
use crate::verify::{Verification, VerificationPolicy};

/// Body of a create-datasource call.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasourceRequest {
    /// Datasource name, `<tenant>_ds` unless the template overrides it.
    pub name: String,
    /// Organization the datasource belongs to.
    pub org_id: OrgId,
    /// Database name, `cus_<tenant>` unless the template overrides it.
    pub database: String,
    extra: Map<String, Value>,
}

impl DatasourceRequest {
    /// Apply the naming convention for `tenant`, then merge the template.
    ///
    /// Template fields win over `name` and `database`; `orgId` always comes
    /// from the scope.
    #[must_use]
    pub fn for_tenant(tenant: &str, scope: &OrgScope, template: &DatasourceTemplate) -> Self {
        Self::assemble(tenant, scope.org_id().clone(), template)
    }

    fn assemble(tenant: &str, org_id: OrgId, template: &DatasourceTemplate) -> Self {
        let mut extra = template.fields().clone();
        let name = take_string(&mut extra, "name").unwrap_or_else(|| format!("{tenant}_ds"));
        let database =
            take_string(&mut extra, "database").unwrap_or_else(|| format!("cus_{tenant}"));
        extra.remove("orgId");
        Self {
            name,
            org_id,
            database,
            extra,
        }
    }

    /// JSON body sent to the service.
    #[must_use]
    pub fn to_body(&self) -> Value {
        let mut body = self.extra.clone();
        body.insert("name".into(), Value::String(self.name.clone()));
        body.insert("orgId".into(), self.org_id.to_json());
        body.insert("database".into(), Value::String(self.database.clone()));
        Value::Object(body)
    }
}

fn take_string(fields: &mut Map<String, Value>, key: &str) -> Option<String> {
    match fields.remove(key) {
        Some(Value::String(text)) => Some(text),
        Some(other) => Some(other.to_string()),
        None => None,
    }
}

/// One pass through create + verify.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProvisionAttempt {
    /// Zero-based attempt index.
    pub attempt: u32,
    /// Id returned by the create call, when there was one.
    pub created_id: Option<DatasourceId>,
    /// Classification of the attempt.
    pub verification: Verification,
}

/// Final state of a provisioning run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ProvisionOutcome {
    /// The datasource was created and verified.
    Succeeded {
        /// Verified datasource id.
        id: DatasourceId,
    },
    /// Every attempt ended in a transient failure.
    Exhausted {
        /// Attempts made.
        attempts: u32,
    },
    /// The service rejected the datasource outright.
    Rejected {
        /// HTTP status of the rejecting response.
        status: u16,
        /// Service message.
        message: String,
    },
}

/// Everything the operator needs to judge a provisioning run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProvisionReport {
    /// Datasource name that was requested.
    pub datasource: String,
    /// Database name that was requested.
    pub database: String,
    /// Attempts in order.
    pub attempts: Vec<ProvisionAttempt>,
    /// Final state.
    pub outcome: ProvisionOutcome,
}

impl ProvisionReport {
    /// Whether the datasource was verified.
    #[must_use]
    pub const fn succeeded(&self) -> bool {
        matches!(self.outcome, ProvisionOutcome::Succeeded { .. })
    }
}

/// Creates a tenant datasource and waits for it to become reachable.
#[derive(Clone)]
pub struct DatasourceProvisioner {
    api: ControlPlane,
    template: DatasourceTemplate,
    policy: RetryPolicy,
    verifier: Arc<dyn VerificationPolicy>,
    sleeper: Arc<dyn Sleeper>,
}

impl std::fmt::Debug for DatasourceProvisioner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatasourceProvisioner")
            .field("template", &self.template)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl DatasourceProvisioner {
    /// Assemble a provisioner from its collaborators.
    #[must_use]
    pub fn new(
        api: ControlPlane,
        template: DatasourceTemplate,
        policy: RetryPolicy,
        verifier: Arc<dyn VerificationPolicy>,
        sleeper: Arc<dyn Sleeper>,
    ) -> Self {
        Self {
            api,
            template,
            policy,
            verifier,
            sleeper,
        }
    }

    /// Retry policy in effect.
    #[must_use]
    pub const fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Create the datasource for `tenant` inside `scope` and verify it.
    ///
    /// Before attempt `n` the sleeper is asked to wait `policy.delay_before(n)`.
    /// The loop stops at the first attempt that is not transient.
    ///
    /// # Errors
    ///
    /// Transport failures abort the run. Service-side failures are reported
    /// through [`ProvisionReport::outcome`].
    #[instrument(skip(self, scope), fields(org_id = %scope.org_id()))]
    pub async fn provision(&self, tenant: &str, scope: &OrgScope) -> CoreResult<ProvisionReport> {
        let request = DatasourceRequest::for_tenant(tenant, scope, &self.template);
        let body = request.to_body();
        let mut attempts = Vec::new();

        for attempt in self.policy.attempts() {
            self.sleeper.sleep(self.policy.delay_before(attempt)).await;

            let created = self.api.create_datasource(body.clone()).await?;
            let Some(id) = created.body.get("id").and_then(DatasourceId::from_json) else {
                let verification = self.verifier.classify_unidentified(&created);
                warn!(
                    attempt,
                    status = created.status,
                    message = %created.describe(),
                    "datasource create returned no id"
                );
                let retry = verification.is_retryable();
                attempts.push(ProvisionAttempt {
                    attempt,
                    created_id: None,
                    verification,
                });
                if retry {
                    continue;
                }
                break;
            };

            info!(attempt, datasource_id = %id, "datasource created, verifying");
            let read_back = self.api.datasource(&id).await?;
            let verification = self.verifier.classify(&read_back);
            let retry = verification.is_retryable();
            if retry {
                warn!(
                    attempt,
                    datasource_id = %id,
                    message = %read_back.describe(),
                    "datasource not reachable yet"
                );
            }
            attempts.push(ProvisionAttempt {
                attempt,
                created_id: Some(id),
                verification,
            });
            if !retry {
                break;
            }
        }

        let outcome = outcome_of(&attempts);
        match &outcome {
            ProvisionOutcome::Succeeded { id } => info!(datasource_id = %id, "datasource verified"),
            ProvisionOutcome::Exhausted { attempts } => {
                warn!(attempts, "datasource could not be verified");
            }
            ProvisionOutcome::Rejected { status, message } => {
                warn!(status, %message, "datasource rejected");
            }
        }

        Ok(ProvisionReport {
            datasource: request.name,
            database: request.database,
            attempts,
            outcome,
        })
    }
}

fn outcome_of(attempts: &[ProvisionAttempt]) -> ProvisionOutcome {
    match attempts.last() {
        Some(ProvisionAttempt {
            created_id: Some(id),
            verification: Verification::Verified,
            ..
        }) => ProvisionOutcome::Succeeded { id: id.clone() },
        Some(ProvisionAttempt {
            verification: Verification::Rejected { status, message },
            ..
        }) => ProvisionOutcome::Rejected {
            status: *status,
            message: message.clone(),
        },
        _ => ProvisionOutcome::Exhausted {
            attempts: u32::try_from(attempts.len()).unwrap_or(u32::MAX),
        },
    }
}
