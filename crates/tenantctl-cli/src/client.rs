//! HTTP transport, application context, and the CLI error type.

use std::fmt::{self, Display, Formatter};
use std::sync::Arc;
use std::time::Duration;

use anyhow::anyhow;
use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Client, Url};
use serde_json::Value;
use tenantctl_config::validate::service_base_url;
use tenantctl_config::{AppConfig, ConfigError};
use tenantctl_core::{
    ApiRequest, ApiResponse, BoxError, CoreError, Method, RestTransport, Sleeper, TokioSleeper,
    TransportError, Workflow,
};
use tracing::debug;

use crate::cli::OutputFormat;

pub(crate) const HEADER_REQUEST_ID: &str = "x-request-id";

/// CLI-level error type; the variant selects the exit code.
#[derive(Debug)]
pub(crate) enum CliError {
    Validation(String),
    Aborted(String),
    Failure(anyhow::Error),
}

/// Convenience alias for functions returning a `CliError`.
pub(crate) type CliResult<T> = Result<T, CliError>;

impl CliError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn failure(error: impl Into<anyhow::Error>) -> Self {
        Self::Failure(error.into())
    }

    pub(crate) const fn exit_code(&self) -> i32 {
        match self {
            Self::Aborted(_) => 1,
            Self::Validation(_) => 2,
            Self::Failure(_) => 3,
        }
    }

    pub(crate) fn display_message(&self) -> String {
        match self {
            Self::Validation(message) | Self::Aborted(message) => message.clone(),
            Self::Failure(error) => format!("{error:#}"),
        }
    }
}

impl Display for CliError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str("cli error")
    }
}

impl std::error::Error for CliError {}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::OrganizationNotCreated { .. } => Self::Aborted(err.to_string()),
            CoreError::InvalidInput { .. } => Self::Validation(err.to_string()),
            other => Self::Failure(other.into()),
        }
    }
}

/// [`RestTransport`] over `reqwest` with basic credentials from the configuration.
pub(crate) struct HttpTransport {
    client: Client,
    base_url: Url,
    username: String,
    password: String,
}

impl HttpTransport {
    /// Build a transport for the configured service.
    ///
    /// Every request carries `trace_id` as `x-request-id` and is bounded by `timeout`.
    pub(crate) fn new(config: &AppConfig, trace_id: &str, timeout: Duration) -> CliResult<Self> {
        let base_url = service_base_url(&config.service_credentials)?;

        let mut default_headers = HeaderMap::new();
        let request_id = HeaderValue::from_str(trace_id).map_err(|_| {
            CliError::failure(anyhow!("trace identifier contains invalid characters"))
        })?;
        default_headers.insert(HEADER_REQUEST_ID, request_id);
        default_headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(timeout)
            .default_headers(default_headers)
            .build()
            .map_err(|err| CliError::failure(anyhow!("failed to build HTTP client: {err}")))?;

        Ok(Self {
            client,
            base_url,
            username: config.service_credentials.username.clone(),
            password: config.service_credentials.password.clone(),
        })
    }

    /// Append `path` to the base URL, keeping any path prefix the base carries.
    fn url_for(&self, path: &str) -> Result<Url, url::ParseError> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Url::parse(&format!("{base}{path}"))
    }
}

const fn to_reqwest(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Delete => reqwest::Method::DELETE,
    }
}

#[async_trait]
impl RestTransport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        let ApiRequest { method, path, body } = request;
        let request_failed = |source: BoxError| TransportError::Request {
            method,
            path: path.clone(),
            source,
        };

        let url = self
            .url_for(&path)
            .map_err(|err| request_failed(err.into()))?;
        let mut builder = self
            .client
            .request(to_reqwest(method), url)
            .basic_auth(&self.username, Some(&self.password));
        if let Some(body) = &body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|err| request_failed(err.into()))?;
        let status = response.status().as_u16();
        let bytes = response
            .bytes()
            .await
            .map_err(|err| request_failed(err.into()))?;
        debug!(%method, path = %path, status, bytes = bytes.len(), "control plane call");

        let body = if bytes.iter().all(u8::is_ascii_whitespace) {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).map_err(|err| TransportError::Decode {
                method,
                path: path.clone(),
                status,
                source: err.into(),
            })?
        };
        Ok(ApiResponse::new(status, body))
    }
}

/// Application context passed to command handlers.
pub(crate) struct AppContext {
    pub(crate) workflow: Workflow,
    pub(crate) output: OutputFormat,
}

impl AppContext {
    /// Wire the workflow to the configured service over HTTP.
    pub(crate) fn connect(
        config: &AppConfig,
        trace_id: &str,
        timeout: Duration,
        output: OutputFormat,
    ) -> CliResult<Self> {
        let transport = HttpTransport::new(config, trace_id, timeout)?;
        Ok(Self::with_transport(
            config,
            Arc::new(transport),
            Arc::new(TokioSleeper),
            output,
        ))
    }

    pub(crate) fn with_transport(
        config: &AppConfig,
        transport: Arc<dyn RestTransport>,
        sleeper: Arc<dyn Sleeper>,
        output: OutputFormat,
    ) -> Self {
        Self {
            workflow: Workflow::new(config, transport, sleeper),
            output,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use anyhow::Result;
    use httpmock::prelude::*;
    use serde_json::json;
    use tenantctl_test_support::fixtures::sample_config;
    use tenantctl_test_support::mocks::RecordingSleeper;

    pub(crate) const BASIC_AUTH: &str = "Basic YWRtaW46YWRtaW4tcGFzc3dvcmQ=";

    pub(crate) fn context_for(server: &MockServer, output: OutputFormat) -> Result<AppContext> {
        let config = sample_config(&server.base_url());
        let transport = HttpTransport::new(&config, "trace-123", Duration::from_secs(5))
            .map_err(|err| anyhow!(err.display_message()))?;
        Ok(AppContext::with_transport(
            &config,
            Arc::new(transport),
            Arc::new(RecordingSleeper::new()),
            output,
        ))
    }

    fn transport_for(server: &MockServer) -> Result<HttpTransport> {
        HttpTransport::new(
            &sample_config(&server.base_url()),
            "trace-123",
            Duration::from_secs(5),
        )
        .map_err(|err| anyhow!(err.display_message()))
    }

    #[tokio::test]
    async fn post_carries_credentials_trace_id_and_json_body() -> Result<()> {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/api/orgs")
                .header("authorization", BASIC_AUTH)
                .header("x-request-id", "trace-123")
                .header("content-type", "application/json")
                .json_body(json!({"name": "acme"}));
            then.status(200)
                .json_body(json!({"orgId": 5, "message": "Organization created"}));
        });

        let response = transport_for(&server)?
            .send(ApiRequest::post("/api/orgs", json!({"name": "acme"})))
            .await?;

        mock.assert();
        assert_eq!(response.status, 200);
        assert_eq!(response.body["orgId"], json!(5));
        Ok(())
    }

    #[tokio::test]
    async fn bodyless_request_defaults_to_get() -> Result<()> {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET).path("/api/datasources/3");
            then.status(200).json_body(json!({"id": 3}));
        });

        transport_for(&server)?
            .send(ApiRequest::new("/api/datasources/3", None))
            .await?;

        mock.assert();
        Ok(())
    }

    #[tokio::test]
    async fn error_status_bodies_are_returned() -> Result<()> {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/api/datasources/9");
            then.status(404).json_body(json!({"message": "Not Found"}));
        });

        let response = transport_for(&server)?
            .send(ApiRequest::get("/api/datasources/9"))
            .await?;

        assert_eq!(response.status, 404);
        assert_eq!(response.message(), Some("Not Found"));
        Ok(())
    }

    #[tokio::test]
    async fn empty_body_becomes_null() -> Result<()> {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(DELETE).path("/api/orgs/4");
            then.status(204);
        });

        let response = transport_for(&server)?
            .send(ApiRequest::delete("/api/orgs/4"))
            .await?;

        assert_eq!(response.status, 204);
        assert_eq!(response.body, Value::Null);
        Ok(())
    }

    #[tokio::test]
    async fn non_json_body_is_a_decode_failure() -> Result<()> {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/api/auth/keys");
            then.status(502).body("<html>bad gateway</html>");
        });

        let err = transport_for(&server)?
            .send(ApiRequest::get("/api/auth/keys"))
            .await
            .expect_err("html body must not decode");

        assert!(matches!(err, TransportError::Decode { status: 502, .. }));
        Ok(())
    }

    #[tokio::test]
    async fn base_url_path_prefix_is_kept() -> Result<()> {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST).path("/grafana/api/user/using/1");
            then.status(200).json_body(json!({}));
        });
        let config = sample_config(&server.url("/grafana/"));
        let transport = HttpTransport::new(&config, "trace", Duration::from_secs(5))
            .map_err(|err| anyhow!(err.display_message()))?;

        transport
            .send(ApiRequest::get("/api/user/using/1").with_method(tenantctl_core::Method::Post))
            .await?;

        mock.assert();
        Ok(())
    }

    #[tokio::test]
    async fn unreachable_service_is_a_request_failure() -> Result<()> {
        let config = sample_config("127.0.0.1:9");
        let transport = HttpTransport::new(&config, "trace", Duration::from_secs(2))
            .map_err(|err| anyhow!(err.display_message()))?;

        let err = transport
            .send(ApiRequest::get("/api/orgs/name/acme"))
            .await
            .expect_err("nothing listens on the discard port");

        assert!(matches!(err, TransportError::Request { .. }));
        Ok(())
    }

    #[test]
    fn invalid_service_url_is_a_validation_error() {
        let config = sample_config("ftp://grafana.test");
        let err = HttpTransport::new(&config, "trace", Duration::from_secs(1))
            .err()
            .expect("ftp is not accepted");
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn core_errors_map_to_exit_codes() {
        let not_created = CliError::from(CoreError::OrganizationNotCreated {
            name: "acme".into(),
            message: "quota exceeded".into(),
        });
        assert_eq!(not_created.exit_code(), 1);
        assert!(not_created.display_message().contains("quota exceeded"));

        let not_found = CliError::from(CoreError::OrganizationNotFound {
            name: "acme".into(),
        });
        assert_eq!(not_found.exit_code(), 3);

        let invalid = CliError::from(CoreError::InvalidInput {
            field: "organization name",
            reason: "must not be empty",
        });
        assert_eq!(invalid.exit_code(), 2);
    }
}
