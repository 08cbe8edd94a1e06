//! Google OAuth2 provider adapter.

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

pub const GOOGLE_CLIENT_ID: &str = "GOOGLE_CLIENT_ID";
pub const GOOGLE_CLIENT_SECRET: &str = "GOOGLE_CLIENT_SECRET";
pub const GOOGLE_REDIRECT_URL: &str = "GOOGLE_REDIRECT_URL";

const SCOPES: &str =
    "https://www.googleapis.com/auth/userinfo.email https://www.googleapis.com/auth/userinfo.profile";

/// Google `OAuth2` endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoogleEndpoints {
    pub authorization: String,
    pub token: String,
    pub userinfo: String,
}

impl Default for GoogleEndpoints {
    fn default() -> Self {
        Self {
            authorization: "https://accounts.google.com/o/oauth2/v2/auth".to_string(),
            token: "https://oauth2.googleapis.com/token".to_string(),
            userinfo: "https://www.googleapis.com/oauth2/v2/userinfo".to_string(),
        }
    }
}

/// Google userinfo response.
#[derive(Debug, Default, Deserialize)]
struct GoogleUserInfo {
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    given_name: Option<String>,
    #[serde(default)]
    picture: Option<String>,
}

/// Google `OAuth2` provider.
#[derive(Clone)]
pub struct GoogleProvider {
    client_id: String,
    client_secret: String,
    redirect_url: String,
    endpoints: GoogleEndpoints,
    http_client: Client,
}

impl GoogleProvider {
    /// Create a provider from explicit credentials.
    #[must_use]
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        redirect_url: impl Into<String>,
        http_client: Client,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            redirect_url: redirect_url.into(),
            endpoints: GoogleEndpoints::default(),
            http_client,
        }
    }

    /// Create a provider from a stored configuration with decrypted params.
    ///
    /// Missing keys become empty strings; the failure surfaces at call time.
    #[must_use]
    pub fn from_config(config: &AuthProvider, http_client: Client) -> Self {
        Self::new(
            config.param_or_empty(GOOGLE_CLIENT_ID),
            config.param_or_empty(GOOGLE_CLIENT_SECRET),
            config.param_or_empty(GOOGLE_REDIRECT_URL),
            http_client,
        )
    }

    /// Point the adapter at different endpoints.
    #[must_use]
    pub fn with_endpoints(mut self, endpoints: GoogleEndpoints) -> Self {
        self.endpoints = endpoints;
        self
    }
}

impl std::fmt::Debug for GoogleProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleProvider")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("redirect_url", &self.redirect_url)
            .field("endpoints", &self.endpoints)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl OAuthProvider for GoogleProvider {
    fn provider_type(&self) -> ProviderType {
        ProviderType::Google
    }

    fn has_refresh_token_flow(&self) -> bool {
        true
    }

    fn auth_code_url(&self, state: &str) -> ProviderResult<String> {
        authorization_url(
            &self.endpoints.authorization,
            &[
                ("client_id", self.client_id.as_str()),
                ("redirect_uri", self.redirect_url.as_str()),
                ("response_type", "code"),
                ("scope", SCOPES),
                ("state", state),
                ("access_type", "offline"),
                ("prompt", "consent"),
            ],
        )
    }

    #[instrument(skip(self, code))]
    async fn verify_code(&self, code: &str) -> ProviderResult<AuthToken> {
        let form = [
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("code", code),
            ("grant_type", "authorization_code"),
            ("redirect_uri", self.redirect_url.as_str()),
        ];
        request_token(
            &self.http_client,
            ProviderType::Google,
            TokenGrant::AuthorizationCode,
            &self.endpoints.token,
            &form,
            None,
        )
        .await
    }

    #[instrument(skip(self, refresh_token))]
    async fn refresh_token(&self, refresh_token: &str) -> ProviderResult<AuthToken> {
        let form = [
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("refresh_token", refresh_token),
            ("grant_type", "refresh_token"),
        ];
        request_token(
            &self.http_client,
            ProviderType::Google,
            TokenGrant::RefreshToken,
            &self.endpoints.token,
            &form,
            Some(refresh_token),
        )
        .await
    }

    #[instrument(skip(self, access_token))]
    async fn get_identity(&self, access_token: &str) -> ProviderResult<Vec<AuthIdentity>> {
        let info: GoogleUserInfo = fetch_userinfo(
            &self.http_client,
            ProviderType::Google,
            &self.endpoints.userinfo,
            access_token,
        )
        .await?;

        Ok(google_identities(info))
    }
}

// Always three entries, in a fixed order, even when fields are empty.
fn google_identities(info: GoogleUserInfo) -> Vec<AuthIdentity> {
    vec![
        AuthIdentity::email(info.email.unwrap_or_default()),
        AuthIdentity::name(info.given_name.unwrap_or_default()),
        AuthIdentity::profile_pic(info.picture.unwrap_or_default()),
    ]
}
