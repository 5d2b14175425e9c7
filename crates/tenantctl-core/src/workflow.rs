//! The operator-facing operations: create, delete, keys, and the diagnostic switch.
//!
//! # Design
//! - One `Workflow` per process, built from the loaded configuration.
//! - Each operation is a strictly ordered sequence of remote calls and prompt
//!   reads; nothing runs concurrently.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tenantctl_config::AppConfig;
use tracing::{info, instrument, warn};

use crate::api::{ControlPlane, RestTransport};
use crate::datasource::{DatasourceProvisioner, ProvisionReport};
use crate::error::{CoreError, CoreResult};
use crate::keys::{KeySession, KeySessionSummary};
use crate::model::{OrgId, Organization};
use crate::org::{ActiveOrganization, OrgScope, OrganizationResolver, ResolvedOrganization};
use crate::prompt::{Confirmation, Prompt};
use crate::retry::{RetryPolicy, Sleeper};
use crate::verify::MessageClassifier;

/// Organization the diagnostic switch targets by default (the service's main organization).
pub const DIAGNOSTIC_ORG_ID: &str = "1";

/// Result of a create run that got past organization resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateReport {
    /// Organization the datasource was provisioned in.
    pub organization: ResolvedOrganization,
    /// Scope established by the switch.
    pub scope: OrgScope,
    /// Datasource provisioning result.
    pub provisioning: ProvisionReport,
}

/// Result of a delete run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DeleteOutcome {
    /// The operator did not confirm; nothing was deleted.
    Declined {
        /// Organization that was found.
        organization: Organization,
    },
    /// The delete call was issued.
    Deleted {
        /// Organization that was targeted.
        organization: Organization,
        /// HTTP status of the delete call.
        status: u16,
        /// Raw service response.
        response: Value,
    },
}

/// Composes resolver, switch, provisioner, and key session.
#[derive(Debug, Clone)]
pub struct Workflow {
    api: ControlPlane,
    resolver: OrganizationResolver,
    switch: ActiveOrganization,
    provisioner: DatasourceProvisioner,
    delete_confirmation: Confirmation,
    key_confirmation: Confirmation,
}

impl Workflow {
    /// Build every component from `config`, sending requests through `transport`.
    #[must_use]
    pub fn new(
        config: &AppConfig,
        transport: Arc<dyn RestTransport>,
        sleeper: Arc<dyn Sleeper>,
    ) -> Self {
        let api = ControlPlane::new(transport);
        let provisioner = DatasourceProvisioner::new(
            api.clone(),
            config.datasource_template.clone(),
            RetryPolicy::from_settings(&config.provisioning),
            Arc::new(MessageClassifier::from_settings(&config.provisioning)),
            sleeper,
        );
        Self::from_parts(api, provisioner)
    }

    /// Build a workflow around a preassembled provisioner.
    #[must_use]
    pub fn from_parts(api: ControlPlane, provisioner: DatasourceProvisioner) -> Self {
        Self {
            resolver: OrganizationResolver::new(api.clone()),
            switch: ActiveOrganization::new(api.clone()),
            api,
            provisioner,
            delete_confirmation: Confirmation::DESTRUCTIVE,
            key_confirmation: Confirmation::CASUAL,
        }
    }

    /// Replace the confirmation policies.
    #[must_use]
    pub fn with_confirmations(mut self, delete: Confirmation, keys: Confirmation) -> Self {
        self.delete_confirmation = delete;
        self.key_confirmation = keys;
        self
    }

    /// Resolve or create the organization, switch to it, then provision the datasource.
    ///
    /// # Errors
    ///
    /// [`CoreError::OrganizationNotCreated`] when creation yields no id (no
    /// further calls are made), [`CoreError::SwitchRejected`] when the switch
    /// fails, transport failures otherwise. Provisioning failures are part of
    /// the report, not errors.
    #[instrument(skip(self, explicit_org))]
    pub async fn create(
        &self,
        name: &str,
        explicit_org: Option<OrgId>,
    ) -> CoreResult<CreateReport> {
        let name = require_name(name)?;
        let organization = self.resolver.resolve_for_create(name, explicit_org).await?;
        let scope = self.switch.switch(&organization.id).await?;
        let provisioning = self.provisioner.provision(name, &scope).await?;
        Ok(CreateReport {
            organization,
            scope,
            provisioning,
        })
    }

    /// Find the organization called `name`, confirm, then delete it.
    ///
    /// `assume_yes` skips the confirmation question.
    ///
    /// # Errors
    ///
    /// [`CoreError::OrganizationNotFound`] when no organization has that name;
    /// transport and prompt failures otherwise.
    #[instrument(skip(self, prompt))]
    pub async fn delete(
        &self,
        name: &str,
        prompt: &mut dyn Prompt,
        assume_yes: bool,
    ) -> CoreResult<DeleteOutcome> {
        let name = require_name(name)?;
        let organization =
            self.resolver
                .lookup(name)
                .await?
                .ok_or_else(|| CoreError::OrganizationNotFound {
                    name: name.to_string(),
                })?;

        if !assume_yes {
            let question = format!(
                "Are you sure you want to delete {} with id {} (y/N)",
                organization.name, organization.id
            );
            let answer = prompt.ask(&question).await?;
            if !self.delete_confirmation.accepts(&answer) {
                info!(org_id = %organization.id, "deletion declined");
                return Ok(DeleteOutcome::Declined { organization });
            }
        }

        let response = self.api.delete_organization(&organization.id).await?;
        if response.is_success() {
            info!(org_id = %organization.id, "organization deleted");
        } else {
            warn!(
                org_id = %organization.id,
                status = response.status,
                message = %response.describe(),
                "organization delete rejected"
            );
        }
        Ok(DeleteOutcome::Deleted {
            organization,
            status: response.status,
            response: response.body,
        })
    }

    /// Run the key session, switching to `org` first when given.
    ///
    /// # Errors
    ///
    /// [`CoreError::SwitchRejected`], transport, and prompt failures.
    #[instrument(skip(self, prompt))]
    pub async fn keys(
        &self,
        prompt: &mut dyn Prompt,
        org: Option<OrgId>,
    ) -> CoreResult<KeySessionSummary> {
        if let Some(org_id) = org {
            let scope = self.switch.switch(&org_id).await?;
            prompt.tell(&format!("managing keys of organization {}", scope.org_id()));
        }
        KeySession::new(self.api.clone(), self.key_confirmation)
            .run(prompt)
            .await
    }

    /// Switch the session to `org` (default [`DIAGNOSTIC_ORG_ID`]) to check
    /// connectivity and credentials.
    ///
    /// # Errors
    ///
    /// [`CoreError::SwitchRejected`] or transport failures.
    #[instrument(skip(self))]
    pub async fn diagnose(&self, org: Option<OrgId>) -> CoreResult<OrgScope> {
        let org_id = match org {
            Some(org_id) => org_id,
            None => OrgId::new(DIAGNOSTIC_ORG_ID).ok_or(CoreError::InvalidInput {
                field: "organization id",
                reason: "must not be empty",
            })?,
        };
        self.switch.switch(&org_id).await
    }
}

fn require_name(name: &str) -> CoreResult<&str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CoreError::InvalidInput {
            field: "organization name",
            reason: "must not be empty",
        });
    }
    Ok(trimmed)
}
