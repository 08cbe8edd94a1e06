//! Common test utilities and fixtures for provider integration tests

#![allow(dead_code)]

use std::sync::Once;
use std::time::Duration;

use chrono::Utc;
use warden_core::{AuthProvider, AuthProviderParam, ProjectId, ProviderId, ProviderType, UserId};
use warden_providers::{build_http_client, HttpConfig};

pub const TEST_STATE: &str = "csrf-state-token-123";
pub const TEST_AUTH_CODE: &str = "4/0AY0e-test-auth-code";
pub const TEST_ACCESS_TOKEN: &str = "ya29.test-access-token";
pub const TEST_REFRESH_TOKEN: &str = "1//test-refresh-token";
pub const TEST_CLIENT_ID: &str = "test-client-id.apps.example.com";
pub const TEST_CLIENT_SECRET: &str = "test-client-secret";
pub const TEST_REDIRECT_URL: &str = "https://app.example.com/auth/callback";

static INIT: Once = Once::new();

/// Install a test subscriber when `RUST_LOG` is set.
pub fn init_test_logging() {
    INIT.call_once(|| {
        if std::env::var("RUST_LOG").is_ok() {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
                .with_test_writer()
                .try_init();
        }
    });
}

/// Client with a short timeout so timeout tests stay fast.
pub fn test_client() -> reqwest::Client {
    build_http_client(&HttpConfig {
        request_timeout: Duration::from_secs(2),
        connect_timeout: Duration::from_secs(2),
    })
}

/// A stored provider configuration with the given (plaintext) params.
pub fn provider_config(provider: ProviderType, params: Vec<AuthProviderParam>) -> AuthProvider {
    let now = Utc::now();
    let actor = UserId::new();
    AuthProvider {
        id: ProviderId::new(),
        name: format!("{provider} test"),
        icon: String::new(),
        provider,
        project_id: ProjectId::new(),
        params,
        enabled: true,
        created_at: now,
        created_by: actor,
        updated_at: now,
        updated_by: actor,
    }
}
