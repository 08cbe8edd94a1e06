//! Tokens returned by a provider's token endpoint.

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;

/// Tokens obtained from a code exchange or refresh.
///
/// Never persisted by warden; the caller decides what to keep.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken {
    pub access_token: String,
    /// Empty when the provider issued none.
    pub refresh_token: String,
    /// Absolute expiry, when the provider reported a lifetime.
    pub expires_at: Option<DateTime<Utc>>,
}

impl AuthToken {
    /// Whether the access token has expired at `now`.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|exp| exp <= now)
    }

    /// Whether a refresh token is available.
    #[must_use]
    pub fn has_refresh_token(&self) -> bool {
        !self.refresh_token.is_empty()
    }
}

impl std::fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthToken")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Token endpoint response body (RFC 6749 §5.1).
#[derive(Debug, Deserialize)]
pub(crate) struct TokenEndpointResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
}

impl TokenEndpointResponse {
    /// Convert to an [`AuthToken`], stamping `expires_at` relative to `now`.
    ///
    /// `previous_refresh` is kept when the endpoint does not rotate the
    /// refresh token.
    pub(crate) fn into_token(self, now: DateTime<Utc>, previous_refresh: Option<&str>) -> AuthToken {
        let refresh_token = self
            .refresh_token
            .filter(|t| !t.is_empty())
            .or_else(|| previous_refresh.map(str::to_string))
            .unwrap_or_default();

        AuthToken {
            access_token: self.access_token,
            refresh_token,
            expires_at: self
                .expires_in
                .filter(|secs| *secs > 0)
                .and_then(Duration::try_seconds)
                .and_then(|lifetime| now.checked_add_signed(lifetime)),
        }
    }
}
