//! Interactive API key session: list, bulk delete, optionally create one key.

use serde::Serialize;
use tracing::{info, instrument};

use crate::api::ControlPlane;
use crate::error::CoreResult;
use crate::model::{ApiKey, ApiKeyId, KeyRole};
use crate::prompt::{Confirmation, Prompt};

/// Question asked before each deletion.
pub const DELETE_QUESTION: &str = "enter id to delete (blank to continue)";
/// Question asked once after the delete loop.
pub const CREATE_QUESTION: &str = "create new key (y/N)";
/// Question asked for the new key's name.
pub const NAME_QUESTION: &str = "key name";

/// A deletion issued during the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeletedKey {
    /// Id the operator entered.
    pub id: ApiKeyId,
    /// HTTP status of the delete call.
    pub status: u16,
    /// Service message.
    pub message: String,
}

/// The key created at the end of the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreatedKey {
    /// Requested key name.
    pub name: String,
    /// HTTP status of the create call.
    pub status: u16,
    /// Secret returned by the service; it is only ever shown once.
    pub key: Option<String>,
    /// Service message when no secret came back.
    pub message: Option<String>,
}

/// What happened during a key session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeySessionSummary {
    /// Keys present when the session started.
    pub listed: Vec<ApiKey>,
    /// Deletions in the order they were issued.
    pub deleted: Vec<DeletedKey>,
    /// Key created at the end, if any.
    pub created: Option<CreatedKey>,
}

/// Prompt-driven key management for the active organization.
#[derive(Debug, Clone)]
pub struct KeySession {
    api: ControlPlane,
    confirmation: Confirmation,
}

impl KeySession {
    /// Session using `confirmation` for the create-key question.
    #[must_use]
    pub const fn new(api: ControlPlane, confirmation: Confirmation) -> Self {
        Self { api, confirmation }
    }

    /// Run the session to completion.
    ///
    /// Deletions are not confirmed individually. New keys always get the
    /// `Admin` role.
    ///
    /// # Errors
    ///
    /// Transport failures, a failed key listing, or closed operator input.
    #[instrument(skip_all)]
    pub async fn run(&self, prompt: &mut dyn Prompt) -> CoreResult<KeySessionSummary> {
        let listed = self.api.api_keys().await?;
        show_keys(prompt, &listed);

        let mut deleted = Vec::new();
        loop {
            let answer = prompt.ask(DELETE_QUESTION).await?;
            let Some(id) = ApiKeyId::new(&answer) else {
                break;
            };
            let response = self.api.delete_api_key(&id).await?;
            let message = response.describe();
            info!(key_id = %id, status = response.status, "api key delete issued");
            prompt.tell(&format!("{id}: {message}"));
            deleted.push(DeletedKey {
                id,
                status: response.status,
                message,
            });
        }

        let answer = prompt.ask(CREATE_QUESTION).await?;
        let created = if self.confirmation.accepts(&answer) {
            self.create_key(prompt).await?
        } else {
            None
        };

        Ok(KeySessionSummary {
            listed,
            deleted,
            created,
        })
    }

    async fn create_key(&self, prompt: &mut dyn Prompt) -> CoreResult<Option<CreatedKey>> {
        let name = prompt.ask(NAME_QUESTION).await?;
        let name = name.trim();
        if name.is_empty() {
            prompt.tell("key name is required; no key created");
            return Ok(None);
        }

        let response = self.api.create_api_key(name, &KeyRole::Admin).await?;
        let key = response
            .body
            .get("key")
            .and_then(serde_json::Value::as_str)
            .map(ToString::to_string);
        match &key {
            Some(secret) => prompt.tell(&format!("created key '{name}': {secret}")),
            None => prompt.tell(&format!("key '{name}' not created: {}", response.describe())),
        }
        info!(status = response.status, created = key.is_some(), "api key create issued");

        Ok(Some(CreatedKey {
            name: name.to_string(),
            status: response.status,
            message: response.message().map(ToString::to_string),
            key,
        }))
    }
}

fn show_keys(prompt: &mut dyn Prompt, keys: &[ApiKey]) {
    if keys.is_empty() {
        prompt.tell("no API keys");
        return;
    }
    prompt.tell(&format!("{:<8} {:<10} NAME", "ID", "ROLE"));
    for key in keys {
        prompt.tell(&format!("{:<8} {:<10} {}", key.id, key.role, key.name));
    }
}
