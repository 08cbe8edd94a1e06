//! Error Scenario Tests for Provider Adapters
//!
//! Non-success statuses, malformed bodies, timeouts and unreachable
//! endpoints must all surface as errors, never as empty tokens.

use std::time::Duration;

use warden_core::ProviderType;
use warden_providers::{GoogleEndpoints, GoogleProvider, OAuthProvider, ProviderError};
use wiremock::MockServer;

use super::common::{
    test_client, TEST_ACCESS_TOKEN, TEST_AUTH_CODE, TEST_CLIENT_ID, TEST_CLIENT_SECRET,
    TEST_REDIRECT_URL, TEST_REFRESH_TOKEN,
};
use super::mock_server::{
    setup_token_endpoint_error, setup_token_endpoint_raw, setup_token_endpoint_slow,
    setup_userinfo_error, setup_userinfo_raw, AUTHORIZE_PATH, TOKEN_PATH, USERINFO_PATH,
};

fn provider_for(base: &str) -> GoogleProvider {
    GoogleProvider::new(TEST_CLIENT_ID, TEST_CLIENT_SECRET, TEST_REDIRECT_URL, test_client())
        .with_endpoints(GoogleEndpoints {
            authorization: format!("{base}{AUTHORIZE_PATH}"),
            token: format!("{base}{TOKEN_PATH}"),
            userinfo: format!("{base}{USERINFO_PATH}"),
        })
}

#[tokio::test]
async fn test_code_exchange_invalid_grant() {
    let server = MockServer::start().await;
    setup_token_endpoint_error(&server, 400, "invalid_grant").await;

    let err = provider_for(&server.uri())
        .verify_code(TEST_AUTH_CODE)
        .await
        .unwrap_err();

    assert_eq!(err.error_code(), "code_exchange_failed");
    assert_eq!(err.upstream_status(), Some(400));
    assert!(err.upstream().unwrap().detail.contains("invalid_grant"));
    assert!(!err.to_string().contains(TEST_CLIENT_SECRET));
}

#[tokio::test]
async fn test_refresh_server_error() {
    let server = MockServer::start().await;
    setup_token_endpoint_error(&server, 503, "temporarily_unavailable").await;

    let err = provider_for(&server.uri())
        .refresh_token(TEST_REFRESH_TOKEN)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ProviderError::RefreshFailed {
            provider: ProviderType::Google,
            ..
        }
    ));
    assert_eq!(err.upstream_status(), Some(503));
}

#[tokio::test]
async fn test_refresh_malformed_body_is_error() {
    let server = MockServer::start().await;
    setup_token_endpoint_raw(&server, "<html>not json</html>").await;

    let err = provider_for(&server.uri())
        .refresh_token(TEST_REFRESH_TOKEN)
        .await
        .unwrap_err();

    assert_eq!(err.error_code(), "refresh_failed");
    assert!(err.upstream().unwrap().detail.starts_with("malformed response"));
}

#[tokio::test]
async fn test_empty_access_token_is_error() {
    let server = MockServer::start().await;
    setup_token_endpoint_raw(&server, r#"{"access_token":"","token_type":"Bearer"}"#).await;

    let err = provider_for(&server.uri())
        .verify_code(TEST_AUTH_CODE)
        .await
        .unwrap_err();

    assert_eq!(err.error_code(), "code_exchange_failed");
}

#[tokio::test]
async fn test_userinfo_unauthorized() {
    let server = MockServer::start().await;
    setup_userinfo_error(&server, 401, r#"{"error":"invalid_token"}"#).await;

    let err = provider_for(&server.uri())
        .get_identity(TEST_ACCESS_TOKEN)
        .await
        .unwrap_err();

    assert_eq!(err.error_code(), "identity_fetch_failed");
    assert_eq!(err.upstream_status(), Some(401));
}

#[tokio::test]
async fn test_userinfo_malformed_body_is_error() {
    let server = MockServer::start().await;
    setup_userinfo_raw(&server, "<html>sign in again</html>").await;

    let err = provider_for(&server.uri())
        .get_identity(TEST_ACCESS_TOKEN)
        .await
        .unwrap_err();

    assert_eq!(err.error_code(), "identity_fetch_failed");
    assert_eq!(err.upstream_status(), Some(200));
    assert!(err.upstream().unwrap().detail.starts_with("malformed response"));
}

#[tokio::test]
async fn test_long_error_body_is_truncated() {
    let server = MockServer::start().await;
    setup_userinfo_error(&server, 500, &"x".repeat(5000)).await;

    let err = provider_for(&server.uri())
        .get_identity(TEST_ACCESS_TOKEN)
        .await
        .unwrap_err();

    let detail = &err.upstream().unwrap().detail;
    assert!(detail.len() < 600);
    assert!(detail.ends_with("... (truncated)"));
}

#[tokio::test]
async fn test_slow_token_endpoint_times_out() {
    let server = MockServer::start().await;
    setup_token_endpoint_slow(&server, Duration::from_secs(5)).await;

    let err = provider_for(&server.uri())
        .verify_code(TEST_AUTH_CODE)
        .await
        .unwrap_err();

    assert_eq!(err.error_code(), "code_exchange_failed");
    assert_eq!(err.upstream_status(), None);
}

#[tokio::test]
async fn test_dropped_call_is_cancelled() {
    let server = MockServer::start().await;
    setup_token_endpoint_slow(&server, Duration::from_secs(5)).await;
    let provider = provider_for(&server.uri());

    let outcome = tokio::time::timeout(
        Duration::from_millis(200),
        provider.verify_code(TEST_AUTH_CODE),
    )
    .await;

    assert!(outcome.is_err());
}

#[tokio::test]
async fn test_unreachable_endpoint() {
    // Port 9 (discard) on localhost is closed in test environments.
    let err = provider_for("http://127.0.0.1:9")
        .get_identity(TEST_ACCESS_TOKEN)
        .await
        .unwrap_err();

    assert_eq!(err.error_code(), "identity_fetch_failed");
    assert_eq!(err.upstream_status(), None);
}

#[tokio::test]
async fn test_empty_endpoint_fails_at_call_time() {
    let provider = provider_for("");
    let err = provider.verify_code(TEST_AUTH_CODE).await.unwrap_err();
    assert_eq!(err.upstream_status(), None);
}
