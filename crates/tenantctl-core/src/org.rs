//! Organization resolution and the active-organization switch.

use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::api::ControlPlane;
use crate::error::{CoreError, CoreResult};
use crate::model::{OrgId, Organization};

/// Organization id chosen for a create run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedOrganization {
    /// Organization the run operates on.
    pub id: OrgId,
    /// `true` when this run created the organization.
    pub created: bool,
    /// Message returned by the create call, if one was made.
    pub message: Option<String>,
}

/// Finds or creates organizations by name.
#[derive(Debug, Clone)]
pub struct OrganizationResolver {
    api: ControlPlane,
}

impl OrganizationResolver {
    /// Resolver backed by `api`.
    #[must_use]
    pub const fn new(api: ControlPlane) -> Self {
        Self { api }
    }

    /// Use `explicit` when given, otherwise create an organization called `name`.
    ///
    /// Creation is never retried: a repeated create could leave a duplicate.
    ///
    /// # Errors
    ///
    /// [`CoreError::OrganizationNotCreated`] when the service returns no id,
    /// carrying its message verbatim; transport failures otherwise.
    #[instrument(skip(self, explicit), fields(explicit = explicit.is_some()))]
    pub async fn resolve_for_create(
        &self,
        name: &str,
        explicit: Option<OrgId>,
    ) -> CoreResult<ResolvedOrganization> {
        if let Some(id) = explicit {
            info!(org_id = %id, "using operator-supplied organization");
            return Ok(ResolvedOrganization {
                id,
                created: false,
                message: None,
            });
        }

        let response = self.api.create_organization(name).await?;
        let message = response.message().map(ToString::to_string);
        let Some(id) = response.body.get("orgId").and_then(OrgId::from_json) else {
            let message = response.describe();
            warn!(status = response.status, %message, "organization was not created");
            return Err(CoreError::OrganizationNotCreated {
                name: name.to_string(),
                message,
            });
        };

        info!(org_id = %id, "organization created");
        Ok(ResolvedOrganization {
            id,
            created: true,
            message,
        })
    }

    /// Look up an organization by exact name.
    ///
    /// # Errors
    ///
    /// Transport failures, or a non-404 error status from the lookup.
    #[instrument(skip(self))]
    pub async fn lookup(&self, name: &str) -> CoreResult<Option<Organization>> {
        self.api.organization_by_name(name).await
    }
}

/// Proof that the authenticated session is bound to an organization.
///
/// Only [`ActiveOrganization::switch`] creates one, so anything that needs a
/// scope has to go through the switch first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrgScope {
    org_id: OrgId,
    message: Option<String>,
}

impl OrgScope {
    /// Organization the session is bound to.
    #[must_use]
    pub const fn org_id(&self) -> &OrgId {
        &self.org_id
    }

    /// Message the service returned for the switch.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

/// Binds the remote session to an organization.
#[derive(Debug, Clone)]
pub struct ActiveOrganization {
    api: ControlPlane,
}

impl ActiveOrganization {
    /// Switch backed by `api`.
    #[must_use]
    pub const fn new(api: ControlPlane) -> Self {
        Self { api }
    }

    /// Make `org_id` the session's active organization.
    ///
    /// # Errors
    ///
    /// [`CoreError::SwitchRejected`] on a non-success status; transport
    /// failures otherwise. Either way later writes would land in the wrong
    /// organization, so callers must stop.
    #[instrument(skip(self, org_id), fields(org_id = %org_id))]
    pub async fn switch(&self, org_id: &OrgId) -> CoreResult<OrgScope> {
        let response = self.api.switch_organization(org_id).await?;
        if !response.is_success() {
            return Err(CoreError::SwitchRejected {
                org_id: org_id.clone(),
                status: response.status,
                message: response.describe(),
            });
        }
        info!("active organization switched");
        Ok(OrgScope {
            org_id: org_id.clone(),
            message: response.message().map(ToString::to_string),
        })
    }
}
