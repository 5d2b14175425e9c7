//! Configuration fixtures.

use serde_json::{Value, json};
use tenantctl_config::{AppConfig, DatasourceTemplate, ProvisioningSettings, ServiceCredentials};

/// Template fields used by [`sample_config`].
#[must_use]
pub fn sample_template() -> Value {
    json!({
        "type": "postgres",
        "access": "proxy",
        "url": "tenants-db:5432",
        "user": "grafana_reader"
    })
}

/// A valid configuration pointing at `url` with default provisioning settings.
#[must_use]
pub fn sample_config(url: &str) -> AppConfig {
    let template = match sample_template() {
        Value::Object(fields) => DatasourceTemplate::new(fields),
        _ => DatasourceTemplate::default(),
    };
    AppConfig {
        service_credentials: ServiceCredentials {
            username: "admin".to_string(),
            password: "admin-password".to_string(),
            url: url.to_string(),
        },
        datasource_template: template,
        provisioning: ProvisioningSettings::default(),
    }
}

/// [`sample_config`] serialised the way operators write it on disk.
#[must_use]
pub fn sample_config_json(url: &str) -> String {
    json!({
        "serviceCredentials": {
            "username": "admin",
            "password": "admin-password",
            "url": url
        },
        "datasourceTemplate": sample_template()
    })
    .to_string()
}
