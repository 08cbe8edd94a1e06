//! Shared OAuth2 HTTP plumbing: client construction, token endpoint calls
//! and bearer-authenticated userinfo fetches.

use std::time::Duration;

use chrono::Utc;
use reqwest::header::ACCEPT;
use reqwest::Client;
use serde::de::DeserializeOwned;
use url::Url;
use warden_core::ProviderType;

use crate::error::{ProviderError, ProviderResult, UpstreamFailure};
use crate::token::{AuthToken, TokenEndpointResponse};

/// Timeouts applied to every outbound provider request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpConfig {
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(10),
            connect_timeout: Duration::from_secs(5),
        }
    }
}

/// Build the client shared by all adapters.
///
/// Falls back to a default client, with a warning, if the builder is
/// rejected; the fallback has no request timeout.
#[must_use]
pub fn build_http_client(config: &HttpConfig) -> Client {
    Client::builder()
        .timeout(config.request_timeout)
        .connect_timeout(config.connect_timeout)
        .build()
        .unwrap_or_else(|e| {
            tracing::warn!(
                error = %e,
                request_timeout_ms = config.request_timeout.as_millis() as u64,
                "HTTP client builder failed, falling back to a client without timeouts"
            );
            Client::new()
        })
}

/// Which token-endpoint grant is being performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TokenGrant {
    AuthorizationCode,
    RefreshToken,
}

impl TokenGrant {
    fn fail(self, provider: ProviderType, failure: UpstreamFailure) -> ProviderError {
        match self {
            TokenGrant::AuthorizationCode => ProviderError::CodeExchangeFailed { provider, failure },
            TokenGrant::RefreshToken => ProviderError::RefreshFailed { provider, failure },
        }
    }

    fn label(self) -> &'static str {
        match self {
            TokenGrant::AuthorizationCode => "authorization_code",
            TokenGrant::RefreshToken => "refresh_token",
        }
    }
}

/// Build an authorization URL from `endpoint` plus query `params`.
pub(crate) fn authorization_url(endpoint: &str, params: &[(&str, &str)]) -> ProviderResult<String> {
    let mut url = Url::parse(endpoint).map_err(|e| {
        ProviderError::Configuration(format!("Invalid authorization endpoint '{endpoint}': {e}"))
    })?;
    url.query_pairs_mut().extend_pairs(params);
    Ok(url.into())
}

/// POST a form to a token endpoint and turn the response into an [`AuthToken`].
///
/// Any transport error, non-2xx status, unparsable body or empty access
/// token is an error.
pub(crate) async fn request_token(
    client: &Client,
    provider: ProviderType,
    grant: TokenGrant,
    token_endpoint: &str,
    form: &[(&str, &str)],
    previous_refresh: Option<&str>,
) -> ProviderResult<AuthToken> {
    let response = client
        .post(token_endpoint)
        .header(ACCEPT, "application/json")
        .form(form)
        .send()
        .await
        .map_err(|e| {
            tracing::warn!(provider = %provider, grant = grant.label(), error = %e, "Token request failed");
            grant.fail(provider, UpstreamFailure::transport(e))
        })?;

    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| grant.fail(provider, UpstreamFailure::transport(e)))?;

    if !status.is_success() {
        let failure = UpstreamFailure::status(status.as_u16(), &body);
        tracing::warn!(
            provider = %provider,
            grant = grant.label(),
            status = status.as_u16(),
            body = %failure.detail,
            "Token endpoint returned an error"
        );
        return Err(grant.fail(provider, failure));
    }

    let parsed: TokenEndpointResponse = serde_json::from_str(&body)
        .map_err(|e| grant.fail(provider, UpstreamFailure::malformed(status.as_u16(), e)))?;

    if parsed.access_token.is_empty() {
        return Err(grant.fail(
            provider,
            UpstreamFailure::malformed(status.as_u16(), "empty access_token"),
        ));
    }

    Ok(parsed.into_token(Utc::now(), previous_refresh))
}

/// GET `userinfo_endpoint` with a bearer token and decode the JSON body.
pub(crate) async fn fetch_userinfo<T: DeserializeOwned>(
    client: &Client,
    provider: ProviderType,
    userinfo_endpoint: &str,
    access_token: &str,
) -> ProviderResult<T> {
    let fail = |failure| ProviderError::IdentityFetchFailed { provider, failure };

    let response = client
        .get(userinfo_endpoint)
        .header(ACCEPT, "application/json")
        .bearer_auth(access_token)
        .send()
        .await
        .map_err(|e| {
            tracing::warn!(provider = %provider, error = %e, "Userinfo request failed");
            fail(UpstreamFailure::transport(e))
        })?;

    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| fail(UpstreamFailure::transport(e)))?;

    if !status.is_success() {
        let failure = UpstreamFailure::status(status.as_u16(), &body);
        tracing::warn!(
            provider = %provider,
            status = status.as_u16(),
            body = %failure.detail,
            "Userinfo endpoint returned an error"
        );
        return Err(fail(failure));
    }

    serde_json::from_str(&body).map_err(|e| fail(UpstreamFailure::malformed(status.as_u16(), e)))
}
