//! Provider error types.

use thiserror::Error;
use warden_core::ProviderType;

/// Result type for provider operations.
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Upstream bodies are cut to this many bytes before they are kept or logged.
const MAX_UPSTREAM_BODY: usize = 500;

/// What went wrong talking to an identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamFailure {
    /// HTTP status, or `None` when no response was received.
    pub status: Option<u16>,
    /// Truncated response body or transport error description.
    pub detail: String,
}

impl UpstreamFailure {
    /// A non-success HTTP response.
    pub fn status(status: u16, body: &str) -> Self {
        Self {
            status: Some(status),
            detail: truncate_body(body),
        }
    }

    /// A 2xx response whose body could not be used.
    pub fn malformed(status: u16, reason: impl std::fmt::Display) -> Self {
        Self {
            status: Some(status),
            detail: truncate_body(&format!("malformed response: {reason}")),
        }
    }

    /// The request never produced a response (DNS, TLS, timeout, bad URL).
    pub fn transport(reason: impl std::fmt::Display) -> Self {
        Self {
            status: None,
            detail: truncate_body(&reason.to_string()),
        }
    }
}

impl std::fmt::Display for UpstreamFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.status {
            Some(status) => write!(f, "HTTP {status}: {}", self.detail),
            None => write!(f, "no response: {}", self.detail),
        }
    }
}

/// Identity provider errors.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("Code exchange with {provider} failed ({failure})")]
    CodeExchangeFailed {
        provider: ProviderType,
        failure: UpstreamFailure,
    },

    #[error("Token refresh with {provider} failed ({failure})")]
    RefreshFailed {
        provider: ProviderType,
        failure: UpstreamFailure,
    },

    #[error("Identity fetch from {provider} failed ({failure})")]
    IdentityFetchFailed {
        provider: ProviderType,
        failure: UpstreamFailure,
    },

    #[error("Unknown provider type: {0}")]
    UnknownProviderType(String),

    #[error("Provider configuration error: {0}")]
    Configuration(String),
}

impl ProviderError {
    /// Get the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            ProviderError::CodeExchangeFailed { .. } => "code_exchange_failed",
            ProviderError::RefreshFailed { .. } => "refresh_failed",
            ProviderError::IdentityFetchFailed { .. } => "identity_fetch_failed",
            ProviderError::UnknownProviderType(_) => "unknown_provider_type",
            ProviderError::Configuration(_) => "configuration_error",
        }
    }

    /// The upstream failure, for errors produced by an HTTP round trip.
    #[must_use]
    pub fn upstream(&self) -> Option<&UpstreamFailure> {
        match self {
            ProviderError::CodeExchangeFailed { failure, .. }
            | ProviderError::RefreshFailed { failure, .. }
            | ProviderError::IdentityFetchFailed { failure, .. } => Some(failure),
            _ => None,
        }
    }

    /// Upstream HTTP status, if a response was received.
    #[must_use]
    pub fn upstream_status(&self) -> Option<u16> {
        self.upstream().and_then(|f| f.status)
    }
}

/// Truncate on a char boundary so multi-byte UTF-8 never panics.
pub(crate) fn truncate_body(body: &str) -> String {
    if body.len() <= MAX_UPSTREAM_BODY {
        return body.to_string();
    }
    let safe_end = body
        .char_indices()
        .take_while(|(i, _)| *i < MAX_UPSTREAM_BODY)
        .last()
        .map_or(0, |(i, c)| i + c.len_utf8());
    format!("{}... (truncated)", &body[..safe_end])
}
