//! The capability contract every external identity provider satisfies.

use async_trait::async_trait;
use warden_core::ProviderType;

use crate::error::ProviderResult;
use crate::identity::AuthIdentity;
use crate::token::AuthToken;

/// An OAuth2-style identity provider adapter.
///
/// Implementations hold only immutable configuration and a shared HTTP
/// client, so one instance may serve concurrent calls. Dropping a returned
/// future aborts the in-flight request.
#[async_trait]
pub trait OAuthProvider: Send + Sync {
    /// Get the provider type.
    fn provider_type(&self) -> ProviderType;

    /// Whether tokens from this provider can be refreshed.
    fn has_refresh_token_flow(&self) -> bool;

    /// Authorization endpoint URL to redirect the user to.
    ///
    /// # Arguments
    ///
    /// * `state` - Opaque CSRF value echoed back on the callback
    fn auth_code_url(&self, state: &str) -> ProviderResult<String>;

    /// Exchange a one-time authorization code for tokens.
    async fn verify_code(&self, code: &str) -> ProviderResult<AuthToken>;

    /// Obtain a fresh access token.
    async fn refresh_token(&self, refresh_token: &str) -> ProviderResult<AuthToken>;

    /// Fetch the user's identity claims.
    async fn get_identity(&self, access_token: &str) -> ProviderResult<Vec<AuthIdentity>>;
}
