//! Mock `OAuth2` Server Infrastructure
//!
//! Provides mock token and userinfo endpoints for exercising the adapters
//! without external dependencies.

#![allow(dead_code)]

use std::time::Duration;

use serde_json::{json, Value};
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::common::TEST_ACCESS_TOKEN;

pub const TOKEN_PATH: &str = "/token";
pub const USERINFO_PATH: &str = "/userinfo";
pub const AUTHORIZE_PATH: &str = "/authorize";

/// Standard token endpoint success body.
#[must_use]
pub fn token_body(refresh_token: Option<&str>) -> Value {
    json!({
        "access_token": TEST_ACCESS_TOKEN,
        "token_type": "Bearer",
        "expires_in": 3599,
        "refresh_token": refresh_token,
        "scope": "openid email profile"
    })
}

/// Token endpoint that only answers the given grant type.
pub async fn setup_token_endpoint_success(server: &MockServer, grant_type: &str, body: Value) {
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .and(body_string_contains(format!("grant_type={grant_type}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(1)
        .mount(server)
        .await;
}

/// Token endpoint returning an `OAuth2` error document.
pub async fn setup_token_endpoint_error(server: &MockServer, status: u16, error: &str) {
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(status).set_body_json(json!({
            "error": error,
            "error_description": "The request was rejected by the test server"
        })))
        .mount(server)
        .await;
}

/// Token endpoint returning a raw body with status 200.
pub async fn setup_token_endpoint_raw(server: &MockServer, body: &str) {
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

/// Token endpoint that answers after `delay`.
pub async fn setup_token_endpoint_slow(server: &MockServer, delay: Duration) {
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(token_body(None))
                .set_delay(delay),
        )
        .mount(server)
        .await;
}

/// Userinfo endpoint that requires the test bearer token.
pub async fn setup_userinfo(server: &MockServer, claims: Value) {
    Mock::given(method("GET"))
        .and(path(USERINFO_PATH))
        .and(header("authorization", format!("Bearer {TEST_ACCESS_TOKEN}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(claims))
        .expect(1)
        .mount(server)
        .await;
}

/// Userinfo endpoint returning an error status.
pub async fn setup_userinfo_error(server: &MockServer, status: u16, body: &str) {
    Mock::given(method("GET"))
        .and(path(USERINFO_PATH))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(server)
        .await;
}

/// Userinfo endpoint returning a raw body with status 200.
pub async fn setup_userinfo_raw(server: &MockServer, body: &str) {
    Mock::given(method("GET"))
        .and(path(USERINFO_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}
