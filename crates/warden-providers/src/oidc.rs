//! Generic OpenID Connect provider adapter.
//!
//! Every endpoint is configured explicitly; there is no discovery.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::instrument;
use warden_core::{AuthProvider, ProviderType};

use crate::error::ProviderResult;
use crate::http::{authorization_url, fetch_userinfo, request_token, TokenGrant};
use crate::identity::AuthIdentity;
use crate::provider::OAuthProvider;
use crate::token::AuthToken;

pub const OIDC_CLIENT_ID: &str = "OIDC_CLIENT_ID";
pub const OIDC_CLIENT_SECRET: &str = "OIDC_CLIENT_SECRET";
pub const OIDC_REDIRECT_URL: &str = "OIDC_REDIRECT_URL";
pub const OIDC_AUTH_URL: &str = "OIDC_AUTH_URL";
pub const OIDC_TOKEN_URL: &str = "OIDC_TOKEN_URL";
pub const OIDC_USERINFO_URL: &str = "OIDC_USERINFO_URL";
pub const OIDC_SCOPES: &str = "OIDC_SCOPES";

/// Scopes requested when `OIDC_SCOPES` is absent or blank.
pub const DEFAULT_OIDC_SCOPES: &str = "openid profile email";

/// Connection settings for one OIDC identity provider.
#[derive(Clone, PartialEq, Eq)]
pub struct OidcSettings {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_url: String,
    pub auth_url: String,
    pub token_url: String,
    pub userinfo_url: String,
    pub scopes: String,
}

impl OidcSettings {
    /// Read settings from decrypted provider params.
    #[must_use]
    pub fn from_config(config: &AuthProvider) -> Self {
        let scopes = config
            .param(OIDC_SCOPES)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_OIDC_SCOPES)
            .to_string();

        Self {
            client_id: config.param_or_empty(OIDC_CLIENT_ID),
            client_secret: config.param_or_empty(OIDC_CLIENT_SECRET),
            redirect_url: config.param_or_empty(OIDC_REDIRECT_URL),
            auth_url: config.param_or_empty(OIDC_AUTH_URL),
            token_url: config.param_or_empty(OIDC_TOKEN_URL),
            userinfo_url: config.param_or_empty(OIDC_USERINFO_URL),
            scopes,
        }
    }
}

impl std::fmt::Debug for OidcSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OidcSettings")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("redirect_url", &self.redirect_url)
            .field("auth_url", &self.auth_url)
            .field("token_url", &self.token_url)
            .field("userinfo_url", &self.userinfo_url)
            .field("scopes", &self.scopes)
            .finish()
    }
}

/// Standard OIDC userinfo claims (OpenID Connect Core §5.1).
#[derive(Debug, Default, Deserialize)]
struct OidcUserInfo {
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    given_name: Option<String>,
    #[serde(default)]
    family_name: Option<String>,
    #[serde(default)]
    preferred_username: Option<String>,
    #[serde(default)]
    picture: Option<String>,
}

impl OidcUserInfo {
    /// `name`, else `given_name family_name`, else `given_name`, else
    /// `preferred_username`.
    fn display_name(&self) -> Option<String> {
        fn present(v: &Option<String>) -> Option<&str> {
            v.as_deref().map(str::trim).filter(|s| !s.is_empty())
        }

        present(&self.name)
            .map(str::to_string)
            .or_else(|| match (present(&self.given_name), present(&self.family_name)) {
                (Some(given), Some(family)) => Some(format!("{given} {family}")),
                (Some(given), None) => Some(given.to_string()),
                _ => None,
            })
            .or_else(|| present(&self.preferred_username).map(str::to_string))
    }

    fn into_identities(self) -> Vec<AuthIdentity> {
        let mut identities = Vec::with_capacity(3);

        if let Some(email) = self.email.as_deref().filter(|e| !e.is_empty()) {
            identities.push(AuthIdentity::email(email));
        }
        if let Some(name) = self.display_name() {
            identities.push(AuthIdentity::name(name));
        }
        if let Some(picture) = self.picture.as_deref().filter(|p| !p.is_empty()) {
            identities.push(AuthIdentity::profile_pic(picture));
        }

        identities
    }
}

/// Generic OIDC provider.
#[derive(Debug, Clone)]
pub struct OidcProvider {
    settings: OidcSettings,
    http_client: Client,
}

impl OidcProvider {
    #[must_use]
    pub fn new(settings: OidcSettings, http_client: Client) -> Self {
        Self {
            settings,
            http_client,
        }
    }

    /// Create a provider from a stored configuration with decrypted params.
    #[must_use]
    pub fn from_config(config: &AuthProvider, http_client: Client) -> Self {
        Self::new(OidcSettings::from_config(config), http_client)
    }

    #[must_use]
    pub fn settings(&self) -> &OidcSettings {
        &self.settings
    }
}

#[async_trait]
impl OAuthProvider for OidcProvider {
    fn provider_type(&self) -> ProviderType {
        ProviderType::Oidc
    }

    fn has_refresh_token_flow(&self) -> bool {
        true
    }

    fn auth_code_url(&self, state: &str) -> ProviderResult<String> {
        let s = &self.settings;
        authorization_url(
            &s.auth_url,
            &[
                ("client_id", s.client_id.as_str()),
                ("redirect_uri", s.redirect_url.as_str()),
                ("response_type", "code"),
                ("scope", s.scopes.as_str()),
                ("state", state),
                ("access_type", "offline"),
                ("prompt", "consent"),
            ],
        )
    }

    #[instrument(skip(self, code), fields(token_url = %self.settings.token_url))]
    async fn verify_code(&self, code: &str) -> ProviderResult<AuthToken> {
        let s = &self.settings;
        let form = [
            ("client_id", s.client_id.as_str()),
            ("client_secret", s.client_secret.as_str()),
            ("code", code),
            ("grant_type", "authorization_code"),
            ("redirect_uri", s.redirect_url.as_str()),
        ];
        request_token(
            &self.http_client,
            ProviderType::Oidc,
            TokenGrant::AuthorizationCode,
            &s.token_url,
            &form,
            None,
        )
        .await
    }

    #[instrument(skip(self, refresh_token), fields(token_url = %self.settings.token_url))]
    async fn refresh_token(&self, refresh_token: &str) -> ProviderResult<AuthToken> {
        let s = &self.settings;
        let form = [
            ("client_id", s.client_id.as_str()),
            ("client_secret", s.client_secret.as_str()),
            ("refresh_token", refresh_token),
            ("grant_type", "refresh_token"),
        ];
        request_token(
            &self.http_client,
            ProviderType::Oidc,
            TokenGrant::RefreshToken,
            &s.token_url,
            &form,
            Some(refresh_token),
        )
        .await
    }

    #[instrument(skip(self, access_token), fields(userinfo_url = %self.settings.userinfo_url))]
    async fn get_identity(&self, access_token: &str) -> ProviderResult<Vec<AuthIdentity>> {
        let info: OidcUserInfo = fetch_userinfo(
            &self.http_client,
            ProviderType::Oidc,
            &self.settings.userinfo_url,
            access_token,
        )
        .await?;

        Ok(info.into_identities())
    }
}
