//! Auth provider configuration model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{ProjectId, ProviderId, UserId};
use crate::traits::ProjectScoped;

/// Provider type tag stored with every configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderType {
    Google,
    Oidc,
    Password,
}

impl ProviderType {
    /// Every known tag, in declaration order.
    pub const ALL: [ProviderType; 3] = [ProviderType::Google, ProviderType::Oidc, ProviderType::Password];

    /// The stored string form of this tag.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderType::Google => "google",
            ProviderType::Oidc => "oidc",
            ProviderType::Password => "password",
        }
    }
}

impl std::fmt::Display for ProviderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a provider tag is not one of the known variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownProviderTag(pub String);

impl std::fmt::Display for UnknownProviderTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Unknown provider type: {}", self.0)
    }
}

impl std::error::Error for UnknownProviderTag {}

impl std::str::FromStr for ProviderType {
    type Err = UnknownProviderTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "google" => Ok(ProviderType::Google),
            "oidc" => Ok(ProviderType::Oidc),
            "password" => Ok(ProviderType::Password),
            _ => Err(UnknownProviderTag(s.to_string())),
        }
    }
}

/// One configuration entry of a provider.
///
/// Keys are namespaced by provider, e.g. `GOOGLE_CLIENT_ID`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthProviderParam {
    pub key: String,
    pub value: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub is_secret: bool,
}

impl AuthProviderParam {
    /// A plain (non-secret) parameter.
    pub fn plain(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            label: String::new(),
            is_secret: false,
        }
    }

    /// A parameter that must be encrypted at rest.
    pub fn secret(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            is_secret: true,
            ..Self::plain(key, value)
        }
    }

    /// Attach a human-readable label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }
}

impl std::fmt::Debug for AuthProviderParam {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let value: &dyn std::fmt::Debug = if self.is_secret {
            &"[REDACTED]"
        } else {
            &self.value
        };
        f.debug_struct("AuthProviderParam")
            .field("key", &self.key)
            .field("value", value)
            .field("label", &self.label)
            .field("is_secret", &self.is_secret)
            .finish()
    }
}

/// A stored identity provider configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthProvider {
    pub id: ProviderId,
    pub name: String,
    #[serde(default)]
    pub icon: String,
    pub provider: ProviderType,
    pub project_id: ProjectId,
    #[serde(default)]
    pub params: Vec<AuthProviderParam>,
    pub enabled: bool,
    pub created_at: DateTime<Utc>,
    pub created_by: UserId,
    pub updated_at: DateTime<Utc>,
    pub updated_by: UserId,
}

impl AuthProvider {
    /// Value of the first parameter named `key`.
    #[must_use]
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|p| p.key == key)
            .map(|p| p.value.as_str())
    }

    /// Value of `key`, or an empty string when it is not configured.
    #[must_use]
    pub fn param_or_empty(&self, key: &str) -> String {
        self.param(key).unwrap_or_default().to_string()
    }

    /// Parameters flagged as secret.
    pub fn secret_params(&self) -> impl Iterator<Item = &AuthProviderParam> {
        self.params.iter().filter(|p| p.is_secret)
    }
}

impl ProjectScoped for AuthProvider {
    fn project_id(&self) -> ProjectId {
        self.project_id
    }
}

/// Input for creating a provider. Id, audit fields and `enabled` are assigned
/// on creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAuthProvider {
    pub name: String,
    #[serde(default)]
    pub icon: String,
    pub provider: ProviderType,
    pub project_id: ProjectId,
    #[serde(default)]
    pub params: Vec<AuthProviderParam>,
}
