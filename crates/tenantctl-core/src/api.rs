//! Transport seam and typed control-plane operations.
//!
//! # Design
//! - `RestTransport` is the only place HTTP happens; implementations return the
//!   parsed body for every status so callers can inspect error messages.
//! - `ControlPlane` names each remote operation the workflows use and owns the
//!   request paths; it does not retry.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Value, json};
use tracing::debug;

use crate::error::{CoreError, CoreResult, TransportError};
use crate::model::{ApiKey, ApiKeyId, DatasourceId, KeyRole, OrgId, Organization};

const ORGS_PATH: &str = "/api/orgs";
const SWITCH_ORG_PATH: &str = "/api/user/using";
const DATASOURCES_PATH: &str = "/api/datasources";
const API_KEYS_PATH: &str = "/api/auth/keys";

/// HTTP methods used against the control plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    /// `GET`
    Get,
    /// `POST`
    Post,
    /// `DELETE`
    Delete,
}

impl Method {
    /// Upper-case wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single call against the control-plane API.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    /// HTTP method.
    pub method: Method,
    /// Path relative to the service base URL, starting with `/`.
    pub path: String,
    /// Optional JSON body.
    pub body: Option<Value>,
}

impl ApiRequest {
    /// Build a request whose method follows the body: `POST` with one, `GET` without.
    #[must_use]
    pub fn new(path: impl Into<String>, body: Option<Value>) -> Self {
        let method = if body.is_some() {
            Method::Post
        } else {
            Method::Get
        };
        Self {
            method,
            path: path.into(),
            body,
        }
    }

    /// `GET` without a body.
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(path, None)
    }

    /// `POST` with a JSON body.
    #[must_use]
    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self::new(path, Some(body))
    }

    /// `DELETE` without a body.
    #[must_use]
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(path, None).with_method(Method::Delete)
    }

    /// Override the defaulted method.
    #[must_use]
    pub const fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }
}

/// Status and parsed body of a control-plane response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiResponse {
    /// HTTP status code.
    pub status: u16,
    /// Parsed JSON body; `null` when the body was empty.
    pub body: Value,
}

impl ApiResponse {
    /// Build a response from parts.
    #[must_use]
    pub const fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    /// Whether the status is in the 2xx range.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// The `message` field of the body, if present.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.body.get("message").and_then(Value::as_str)
    }

    /// The service message, or the status when the body carries none.
    #[must_use]
    pub fn describe(&self) -> String {
        self.message()
            .map_or_else(|| format!("HTTP {}", self.status), ToString::to_string)
    }

    fn rejected(&self, operation: &'static str) -> CoreError {
        CoreError::Rejected {
            operation,
            status: self.status,
            message: self.describe(),
        }
    }
}

/// Issues authenticated requests against the control-plane API.
#[async_trait]
pub trait RestTransport: Send + Sync {
    /// Send `request` and return the status plus parsed body, whatever the status.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] when no response arrives or the body is not JSON.
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError>;
}

/// Typed operations over a [`RestTransport`].
#[derive(Clone)]
pub struct ControlPlane {
    transport: Arc<dyn RestTransport>,
}

impl fmt::Debug for ControlPlane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControlPlane").finish_non_exhaustive()
    }
}

impl ControlPlane {
    /// Wrap a transport.
    #[must_use]
    pub fn new(transport: Arc<dyn RestTransport>) -> Self {
        Self { transport }
    }

    /// Send a raw request.
    ///
    /// # Errors
    ///
    /// Propagates transport failures as [`CoreError::Transport`].
    pub async fn send(&self, request: ApiRequest) -> CoreResult<ApiResponse> {
        debug!(method = %request.method, path = %request.path, "control plane request");
        let response = self.transport.send(request).await?;
        debug!(status = response.status, "control plane response");
        Ok(response)
    }

    /// `POST /api/orgs`.
    ///
    /// # Errors
    ///
    /// Transport failures only; the caller inspects the response.
    pub async fn create_organization(&self, name: &str) -> CoreResult<ApiResponse> {
        self.send(ApiRequest::post(ORGS_PATH, json!({ "name": name })))
            .await
    }

    /// `GET /api/orgs/name/<name>`; `None` when the service does not know the name.
    ///
    /// # Errors
    ///
    /// Transport failures, non-404 error statuses, or an undecodable organization.
    pub async fn organization_by_name(&self, name: &str) -> CoreResult<Option<Organization>> {
        let path = format!("{ORGS_PATH}/name/{}", urlencoding::encode(name));
        let response = self.send(ApiRequest::get(path)).await?;
        if response.status == 404 {
            return Ok(None);
        }
        if !response.is_success() {
            return Err(response.rejected("organization lookup"));
        }
        if response.body.get("id").and_then(OrgId::from_json).is_none() {
            return Ok(None);
        }
        serde_json::from_value(response.body)
            .map(Some)
            .map_err(|source| CoreError::Decode {
                operation: "organization lookup",
                source,
            })
    }

    /// `POST /api/user/using/<id>`.
    ///
    /// # Errors
    ///
    /// Transport failures only.
    pub async fn switch_organization(&self, org_id: &OrgId) -> CoreResult<ApiResponse> {
        let path = format!("{SWITCH_ORG_PATH}/{}", urlencoding::encode(org_id.as_str()));
        self.send(ApiRequest::new(path, None).with_method(Method::Post))
            .await
    }

    /// `DELETE /api/orgs/<id>`.
    ///
    /// # Errors
    ///
    /// Transport failures only.
    pub async fn delete_organization(&self, org_id: &OrgId) -> CoreResult<ApiResponse> {
        let path = format!("{ORGS_PATH}/{}", urlencoding::encode(org_id.as_str()));
        self.send(ApiRequest::delete(path)).await
    }

    /// `POST /api/datasources`.
    ///
    /// # Errors
    ///
    /// Transport failures only.
    pub async fn create_datasource(&self, body: Value) -> CoreResult<ApiResponse> {
        self.send(ApiRequest::post(DATASOURCES_PATH, body)).await
    }

    /// `GET /api/datasources/<id>`.
    ///
    /// # Errors
    ///
    /// Transport failures only.
    pub async fn datasource(&self, id: &DatasourceId) -> CoreResult<ApiResponse> {
        let path = format!("{DATASOURCES_PATH}/{}", urlencoding::encode(id.as_str()));
        self.send(ApiRequest::get(path)).await
    }

    /// `GET /api/auth/keys` for the active organization.
    ///
    /// # Errors
    ///
    /// Transport failures, error statuses, or an undecodable key list.
    pub async fn api_keys(&self) -> CoreResult<Vec<ApiKey>> {
        let response = self.send(ApiRequest::get(API_KEYS_PATH)).await?;
        if !response.is_success() {
            return Err(response.rejected("API key listing"));
        }
        serde_json::from_value(response.body).map_err(|source| CoreError::Decode {
            operation: "API key listing",
            source,
        })
    }

    /// `DELETE /api/auth/keys/<id>`.
    ///
    /// # Errors
    ///
    /// Transport failures only.
    pub async fn delete_api_key(&self, id: &ApiKeyId) -> CoreResult<ApiResponse> {
        let path = format!("{API_KEYS_PATH}/{}", urlencoding::encode(id.as_str()));
        self.send(ApiRequest::delete(path)).await
    }

    /// `POST /api/auth/keys`.
    ///
    /// # Errors
    ///
    /// Transport failures only.
    pub async fn create_api_key(&self, name: &str, role: &KeyRole) -> CoreResult<ApiResponse> {
        self.send(ApiRequest::post(
            API_KEYS_PATH,
            json!({ "name": name, "role": role.as_str() }),
        ))
        .await
    }
}
