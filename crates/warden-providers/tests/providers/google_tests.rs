//! Google OAuth2 Integration Tests
//!
//! Token exchange, refresh and userinfo retrieval against a mock server.

use serde_json::json;
use warden_core::{AuthProviderParam, ProviderType};
use warden_providers::google::{GOOGLE_CLIENT_ID, GOOGLE_CLIENT_SECRET, GOOGLE_REDIRECT_URL};
use warden_providers::{
    GoogleEndpoints, GoogleProvider, IdentityClaim, IdentityType, OAuthProvider, ProviderFactory,
};
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::common::{
    init_test_logging, provider_config, test_client, TEST_ACCESS_TOKEN, TEST_AUTH_CODE,
    TEST_CLIENT_ID, TEST_CLIENT_SECRET, TEST_REDIRECT_URL, TEST_REFRESH_TOKEN, TEST_STATE,
};
use super::mock_server::{
    setup_token_endpoint_success, setup_userinfo, token_body, AUTHORIZE_PATH, TOKEN_PATH,
    USERINFO_PATH,
};

fn google_against(server: &MockServer) -> GoogleProvider {
    GoogleProvider::new(TEST_CLIENT_ID, TEST_CLIENT_SECRET, TEST_REDIRECT_URL, test_client())
        .with_endpoints(GoogleEndpoints {
            authorization: format!("{}{AUTHORIZE_PATH}", server.uri()),
            token: format!("{}{TOKEN_PATH}", server.uri()),
            userinfo: format!("{}{USERINFO_PATH}", server.uri()),
        })
}

#[tokio::test]
async fn test_google_verify_code_happy_path() {
    init_test_logging();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .and(body_string_contains("grant_type=authorization_code"))
        .and(body_string_contains("code=4%2F0AY0e-test-auth-code"))
        .and(body_string_contains("client_secret=test-client-secret"))
        .and(body_string_contains("redirect_uri=https%3A%2F%2Fapp.example.com%2Fauth%2Fcallback"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body(Some(TEST_REFRESH_TOKEN))))
        .expect(1)
        .mount(&server)
        .await;

    let token = google_against(&server).verify_code(TEST_AUTH_CODE).await.unwrap();

    assert_eq!(token.access_token, TEST_ACCESS_TOKEN);
    assert_eq!(token.refresh_token, TEST_REFRESH_TOKEN);
    assert!(token.expires_at.is_some());
}

#[tokio::test]
async fn test_google_refresh_token_posts_grant() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .and(body_string_contains("grant_type=refresh_token"))
        .and(body_string_contains("refresh_token=1%2F%2Ftest-refresh-token"))
        .and(body_string_contains("client_id=test-client-id.apps.example.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body(None)))
        .expect(1)
        .mount(&server)
        .await;

    let token = google_against(&server)
        .refresh_token(TEST_REFRESH_TOKEN)
        .await
        .unwrap();

    assert_eq!(token.access_token, TEST_ACCESS_TOKEN);
    // Google does not rotate refresh tokens; the caller's one is kept.
    assert_eq!(token.refresh_token, TEST_REFRESH_TOKEN);
}

#[tokio::test]
async fn test_google_get_identity_returns_three_entries() {
    let server = MockServer::start().await;
    setup_userinfo(
        &server,
        json!({
            "id": "117730572023847612345",
            "email": "testuser@gmail.com",
            "verified_email": true,
            "name": "Google Test User",
            "given_name": "Google",
            "family_name": "User",
            "picture": "https://example.com/avatar.jpg"
        }),
    )
    .await;

    let identities = google_against(&server)
        .get_identity(TEST_ACCESS_TOKEN)
        .await
        .unwrap();

    assert_eq!(identities.len(), 3);
    assert_eq!(identities[0].identity_type, IdentityType::Email);
    assert_eq!(identities[1].identity_type, IdentityType::Name);
    assert_eq!(identities[2].identity_type, IdentityType::ProfilePic);
    match &identities[1].metadata {
        IdentityClaim::Name(claim) => assert_eq!(claim.name, "Google"),
        other => panic!("unexpected claim: {other:?}"),
    }
}

#[tokio::test]
async fn test_google_get_identity_with_sparse_payload_still_three() {
    let server = MockServer::start().await;
    setup_userinfo(&server, json!({ "id": "1" })).await;

    let identities = google_against(&server)
        .get_identity(TEST_ACCESS_TOKEN)
        .await
        .unwrap();

    assert_eq!(identities.len(), 3);
}

#[tokio::test]
async fn test_google_from_factory_uses_stored_params() {
    let server = MockServer::start().await;
    setup_token_endpoint_success(&server, "authorization_code", token_body(None)).await;

    let config = provider_config(
        ProviderType::Google,
        vec![
            AuthProviderParam::plain(GOOGLE_CLIENT_ID, TEST_CLIENT_ID),
            AuthProviderParam::secret(GOOGLE_CLIENT_SECRET, TEST_CLIENT_SECRET),
            AuthProviderParam::plain(GOOGLE_REDIRECT_URL, TEST_REDIRECT_URL),
        ],
    );
    let factory = ProviderFactory::with_defaults(&Default::default());
    let adapter = factory.build(&config).unwrap();

    assert_eq!(adapter.provider_type(), ProviderType::Google);
    assert!(adapter.has_refresh_token_flow());

    let url = adapter.auth_code_url(TEST_STATE).unwrap();
    assert!(url.starts_with("https://accounts.google.com/o/oauth2/v2/auth"));
    assert!(url.contains(&format!("state={TEST_STATE}")));
    assert!(url.contains("access_type=offline"));
    assert!(url.contains("prompt=consent"));

    // The factory-built adapter talks to the real Google endpoints, so only
    // the directly-constructed one is pointed at the mock server.
    let token = google_against(&server).verify_code(TEST_AUTH_CODE).await.unwrap();
    assert_eq!(token.refresh_token, "");
}
