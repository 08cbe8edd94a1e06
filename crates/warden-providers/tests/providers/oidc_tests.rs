//! Generic OIDC Integration Tests

use serde_json::json;
use warden_core::{AuthProviderParam, ProviderType};
use warden_providers::oidc::{
    OIDC_AUTH_URL, OIDC_CLIENT_ID, OIDC_CLIENT_SECRET, OIDC_REDIRECT_URL, OIDC_SCOPES,
    OIDC_TOKEN_URL, OIDC_USERINFO_URL,
};
use warden_providers::{
    IdentityClaim, IdentityType, OAuthProvider, OidcProvider, ProviderError, ProviderFactory,
};
use wiremock::MockServer;

use super::common::{
    init_test_logging, provider_config, test_client, TEST_ACCESS_TOKEN, TEST_AUTH_CODE,
    TEST_CLIENT_ID, TEST_CLIENT_SECRET, TEST_REDIRECT_URL, TEST_REFRESH_TOKEN, TEST_STATE,
};
use super::mock_server::{
    setup_token_endpoint_error, setup_token_endpoint_raw, setup_token_endpoint_success,
    setup_userinfo, setup_userinfo_error, setup_userinfo_raw, token_body, AUTHORIZE_PATH,
    TOKEN_PATH, USERINFO_PATH,
};

fn oidc_params(server: &MockServer) -> Vec<AuthProviderParam> {
    vec![
        AuthProviderParam::plain(OIDC_CLIENT_ID, TEST_CLIENT_ID),
        AuthProviderParam::secret(OIDC_CLIENT_SECRET, TEST_CLIENT_SECRET),
        AuthProviderParam::plain(OIDC_REDIRECT_URL, TEST_REDIRECT_URL),
        AuthProviderParam::plain(OIDC_AUTH_URL, format!("{}{AUTHORIZE_PATH}", server.uri())),
        AuthProviderParam::plain(OIDC_TOKEN_URL, format!("{}{TOKEN_PATH}", server.uri())),
        AuthProviderParam::plain(OIDC_USERINFO_URL, format!("{}{USERINFO_PATH}", server.uri())),
    ]
}

fn oidc_against(server: &MockServer) -> OidcProvider {
    OidcProvider::from_config(
        &provider_config(ProviderType::Oidc, oidc_params(server)),
        test_client(),
    )
}

#[tokio::test]
async fn test_oidc_auth_code_url() {
    let server = MockServer::start().await;
    let mut params = oidc_params(&server);
    params.push(AuthProviderParam::plain(OIDC_SCOPES, "openid email groups"));

    let factory = ProviderFactory::with_defaults(&Default::default());
    let adapter = factory
        .build(&provider_config(ProviderType::Oidc, params))
        .unwrap();

    let url = adapter.auth_code_url(TEST_STATE).unwrap();
    assert!(url.starts_with(&format!("{}{AUTHORIZE_PATH}?", server.uri())));
    assert!(url.contains("scope=openid+email+groups"));
    assert!(url.contains("response_type=code"));
    assert!(url.contains(&format!("state={TEST_STATE}")));
}

#[tokio::test]
async fn test_oidc_verify_code_and_refresh() {
    init_test_logging();
    let server = MockServer::start().await;
    setup_token_endpoint_success(&server, "authorization_code", token_body(Some(TEST_REFRESH_TOKEN)))
        .await;
    setup_token_endpoint_success(&server, "refresh_token", token_body(Some("rotated-refresh"))).await;

    let provider = oidc_against(&server);

    let token = provider.verify_code(TEST_AUTH_CODE).await.unwrap();
    assert_eq!(token.refresh_token, TEST_REFRESH_TOKEN);

    let refreshed = provider.refresh_token(&token.refresh_token).await.unwrap();
    assert_eq!(refreshed.access_token, TEST_ACCESS_TOKEN);
    assert_eq!(refreshed.refresh_token, "rotated-refresh");
}

#[tokio::test]
async fn test_oidc_identity_full_claims() {
    let server = MockServer::start().await;
    setup_userinfo(
        &server,
        json!({
            "sub": "248289761001",
            "email": "jane@acme.test",
            "given_name": "Jane",
            "family_name": "Doe",
            "preferred_username": "jdoe",
            "picture": "https://acme.test/jane.jpg"
        }),
    )
    .await;

    let identities = oidc_against(&server)
        .get_identity(TEST_ACCESS_TOKEN)
        .await
        .unwrap();

    assert_eq!(identities.len(), 3);
    assert_eq!(identities[1].identity_type, IdentityType::Name);
    match &identities[1].metadata {
        IdentityClaim::Name(claim) => assert_eq!(claim.name, "Jane Doe"),
        other => panic!("unexpected claim: {other:?}"),
    }
}

#[tokio::test]
async fn test_oidc_identity_username_only() {
    let server = MockServer::start().await;
    setup_userinfo(&server, json!({ "sub": "1", "preferred_username": "jdoe" })).await;

    let identities = oidc_against(&server)
        .get_identity(TEST_ACCESS_TOKEN)
        .await
        .unwrap();

    assert_eq!(identities.len(), 1);
    assert_eq!(identities[0].identity_type, IdentityType::Name);
}

#[tokio::test]
async fn test_oidc_identity_no_claims_is_not_an_error() {
    let server = MockServer::start().await;
    setup_userinfo(&server, json!({ "sub": "1" })).await;

    let identities = oidc_against(&server)
        .get_identity(TEST_ACCESS_TOKEN)
        .await
        .unwrap();

    assert!(identities.is_empty());
}

#[tokio::test]
async fn test_oidc_verify_code_rejected() {
    let server = MockServer::start().await;
    setup_token_endpoint_error(&server, 400, "invalid_grant").await;

    let err = oidc_against(&server).verify_code(TEST_AUTH_CODE).await.unwrap_err();

    assert!(matches!(
        err,
        ProviderError::CodeExchangeFailed {
            provider: ProviderType::Oidc,
            ..
        }
    ));
    assert_eq!(err.upstream_status(), Some(400));
    assert!(!err.to_string().contains(TEST_CLIENT_SECRET));
}

#[tokio::test]
async fn test_oidc_refresh_server_error() {
    let server = MockServer::start().await;
    setup_token_endpoint_error(&server, 502, "bad_gateway").await;

    let err = oidc_against(&server)
        .refresh_token(TEST_REFRESH_TOKEN)
        .await
        .unwrap_err();

    assert_eq!(err.error_code(), "refresh_failed");
    assert_eq!(err.upstream_status(), Some(502));
}

#[tokio::test]
async fn test_oidc_refresh_malformed_body() {
    let server = MockServer::start().await;
    setup_token_endpoint_raw(&server, "not json").await;

    let err = oidc_against(&server)
        .refresh_token(TEST_REFRESH_TOKEN)
        .await
        .unwrap_err();

    assert_eq!(err.error_code(), "refresh_failed");
    assert!(err.upstream().unwrap().detail.starts_with("malformed response"));
}

#[tokio::test]
async fn test_oidc_userinfo_forbidden() {
    let server = MockServer::start().await;
    setup_userinfo_error(&server, 403, r#"{"error":"insufficient_scope"}"#).await;

    let err = oidc_against(&server)
        .get_identity(TEST_ACCESS_TOKEN)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ProviderError::IdentityFetchFailed {
            provider: ProviderType::Oidc,
            ..
        }
    ));
    assert_eq!(err.upstream_status(), Some(403));
}

#[tokio::test]
async fn test_oidc_userinfo_malformed_body() {
    let server = MockServer::start().await;
    setup_userinfo_raw(&server, "[1, 2").await;

    let err = oidc_against(&server)
        .get_identity(TEST_ACCESS_TOKEN)
        .await
        .unwrap_err();

    assert_eq!(err.error_code(), "identity_fetch_failed");
    assert_eq!(err.upstream_status(), Some(200));
}
