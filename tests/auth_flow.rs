//! Integration tests for token acquisition using wiremock.
//!
//! The token endpoint and the management API are served by the same mock
//! server: the authority points at its root and the workspace base URL at
//! `/sentinel`.

use std::collections::HashMap;

use sentinel_mgmt::auth::{Credentials, TokenProvider};
use sentinel_mgmt::bookmarks::list_bookmarks;
use sentinel_mgmt::client::SentinelClient;
use sentinel_mgmt::error::SentinelError;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN_PATH: &str = "/tenant-1/oauth2/v2.0/token";

fn credentials() -> Credentials {
    Credentials {
        tenant_id: "tenant-1".to_string(),
        client_id: "client-1".to_string(),
        client_secret: "s3cr3t".to_string(),
        audience: "https://management.azure.com".to_string(),
    }
}

fn client_with_authority(server: &MockServer) -> SentinelClient {
    let tp = TokenProvider::with_authority(credentials(), &server.uri()).unwrap();
    SentinelClient::new(tp, &format!("{}/sentinel", server.uri()), "2020-01-01").unwrap()
}

fn token_response(token: &str, expires_in: u64) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(serde_json::json!({
        "token_type": "Bearer",
        "expires_in": expires_in,
        "ext_expires_in": expires_in,
        "access_token": token
    }))
}

async fn mount_bookmarks_listing(server: &MockServer, token: &str, times: u64) {
    Mock::given(method("GET"))
        .and(path("/sentinel/bookmarks"))
        .and(header("authorization", format!("Bearer {token}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"value":[]}"#))
        .expect(times)
        .mount(server)
        .await;
}

#[tokio::test]
async fn client_credentials_form_is_posted() {
    let server = MockServer::start().await;
    let client = client_with_authority(&server);

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .respond_with(token_response("tok-1", 3599))
        .expect(1)
        .mount(&server)
        .await;
    mount_bookmarks_listing(&server, "tok-1", 1).await;

    list_bookmarks(&client).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let token_request = requests
        .iter()
        .find(|r| r.url.path() == TOKEN_PATH)
        .expect("token endpoint should have been called");
    let form: HashMap<String, String> = serde_urlencoded::from_bytes(&token_request.body).unwrap();
    assert_eq!(form["grant_type"], "client_credentials");
    assert_eq!(form["client_id"], "client-1");
    assert_eq!(form["client_secret"], "s3cr3t");
    assert_eq!(form["scope"], "https://management.azure.com/.default");
}

#[tokio::test]
async fn cached_token_is_reused_across_calls() {
    let server = MockServer::start().await;
    let client = client_with_authority(&server);

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(token_response("tok-cached", 3599))
        .expect(1)
        .mount(&server)
        .await;
    mount_bookmarks_listing(&server, "tok-cached", 3).await;

    for _ in 0..3 {
        list_bookmarks(&client).await.unwrap();
    }
}

#[tokio::test]
async fn token_inside_expiry_buffer_is_refreshed() {
    let server = MockServer::start().await;
    let client = client_with_authority(&server);

    // 30 seconds is inside the refresh buffer, so every call acquires.
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(token_response("tok-short", 30))
        .expect(2)
        .mount(&server)
        .await;
    mount_bookmarks_listing(&server, "tok-short", 2).await;

    list_bookmarks(&client).await.unwrap();
    list_bookmarks(&client).await.unwrap();
}

#[tokio::test]
async fn rejected_credentials_stop_before_the_api_call() {
    let server = MockServer::start().await;
    let client = client_with_authority(&server);

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "error": "invalid_client",
            "error_description": "AADSTS7000215: Invalid client secret provided."
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/sentinel/bookmarks"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = list_bookmarks(&client).await.unwrap_err();
    match &err {
        SentinelError::Auth { message, .. } => {
            assert!(message.contains("401"), "status should be reported: {message}");
            assert!(message.contains("AADSTS7000215"), "AAD body should be kept: {message}");
        }
        other => panic!("expected Auth, got {other:?}"),
    }
}

#[tokio::test]
async fn failed_acquisition_is_not_cached() {
    let server = MockServer::start().await;
    let client = client_with_authority(&server);

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(token_response("tok-2", 3599))
        .mount(&server)
        .await;
    mount_bookmarks_listing(&server, "tok-2", 1).await;

    let first = list_bookmarks(&client).await.unwrap_err();
    assert!(matches!(first, SentinelError::Auth { .. }));

    // No retry happened inside the first call; the second call acquires anew.
    list_bookmarks(&client).await.unwrap();
}

#[tokio::test]
async fn malformed_token_response_is_auth_error() {
    let server = MockServer::start().await;
    let client = client_with_authority(&server);

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>proxy</html>"))
        .mount(&server)
        .await;

    let err = list_bookmarks(&client).await.unwrap_err();
    assert!(matches!(err, SentinelError::Auth { .. }));
}

#[tokio::test]
async fn zero_lifetime_token_is_rejected() {
    let server = MockServer::start().await;
    let client = client_with_authority(&server);

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(token_response("tok-dead", 0))
        .mount(&server)
        .await;

    let err = list_bookmarks(&client).await.unwrap_err();
    assert!(err.to_string().contains("already-expired"), "got: {err}");
}

#[tokio::test]
async fn oversized_token_lifetime_is_auth_error_not_panic() {
    let server = MockServer::start().await;
    let client = client_with_authority(&server);

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(token_response("tok-forever", u64::MAX))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/sentinel/bookmarks"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = list_bookmarks(&client).await.unwrap_err();
    match &err {
        SentinelError::Auth { message, .. } => {
            assert!(message.contains("lifetime"), "got: {message}");
        }
        other => panic!("expected Auth, got {other:?}"),
    }
}
