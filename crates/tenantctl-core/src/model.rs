//! Remote resources as seen by the workflows.
//!
//! # Design
//! - The service hands out numeric ids; ids are kept as text so the tool never
//!   has to guess integer widths, and numeric ids are sent back as numbers.
//! - Everything here is a transient view of remote state; nothing is cached.

use std::fmt;
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

macro_rules! resource_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name(String);

        impl $name {
            /// Build an identifier from text; blank input yields `None`.
            #[must_use]
            pub fn new(raw: impl AsRef<str>) -> Option<Self> {
                let trimmed = raw.as_ref().trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(Self(trimmed.to_string()))
                }
            }

            /// Read an identifier from a JSON number or non-empty string.
            #[must_use]
            pub fn from_json(value: &Value) -> Option<Self> {
                match value {
                    Value::Number(number) => Some(Self(number.to_string())),
                    Value::String(text) => Self::new(text),
                    _ => None,
                }
            }

            /// JSON form: a number when the text is a canonical integer, a string otherwise.
            #[must_use]
            pub fn to_json(&self) -> Value {
                self.as_number()
                    .map_or_else(|| Value::String(self.0.clone()), Value::from)
            }

            /// The id as an integer, only when printing it back gives the same text.
            fn as_number(&self) -> Option<i64> {
                self.0
                    .parse::<i64>()
                    .ok()
                    .filter(|number| number.to_string() == self.0)
            }

            /// Textual form of the identifier.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.pad(&self.0)
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                Self::new(value).ok_or_else(|| "identifier must not be empty".to_string())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                match self.as_number() {
                    Some(number) => serializer.serialize_i64(number),
                    None => serializer.serialize_str(&self.0),
                }
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let value = Value::deserialize(deserializer)?;
                Self::from_json(&value).ok_or_else(|| {
                    D::Error::custom("expected a number or non-empty string identifier")
                })
            }
        }
    };
}

resource_id!(
    /// Identifier of an organization.
    OrgId
);
resource_id!(
    /// Identifier of a datasource.
    DatasourceId
);
resource_id!(
    /// Identifier of an API key.
    ApiKeyId
);

/// Tenant-scoping entity under which datasources and keys live.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    /// Service-assigned identifier.
    pub id: OrgId,
    /// Unique organization name.
    pub name: String,
}

/// Role attached to an API key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum KeyRole {
    /// Full administrative access to the organization.
    Admin,
    /// May edit dashboards and datasources.
    Editor,
    /// Read-only access.
    Viewer,
    /// Role name this tool does not know about, kept verbatim.
    Other(String),
}

impl KeyRole {
    /// Wire name of the role.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Admin => "Admin",
            Self::Editor => "Editor",
            Self::Viewer => "Viewer",
            Self::Other(name) => name,
        }
    }
}

impl From<String> for KeyRole {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Admin" => Self::Admin,
            "Editor" => Self::Editor,
            "Viewer" => Self::Viewer,
            _ => Self::Other(value),
        }
    }
}

impl From<KeyRole> for String {
    fn from(role: KeyRole) -> Self {
        match role {
            KeyRole::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for KeyRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Credential scoped to an organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiKey {
    /// Service-assigned identifier.
    pub id: ApiKeyId,
    /// Operator-chosen key name.
    pub name: String,
    /// Role granted to the key.
    pub role: KeyRole,
}
