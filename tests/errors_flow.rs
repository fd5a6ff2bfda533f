//! Response classification and reference tracking across resource kinds.
//!
//! Verifies that non-2xx bodies of any shape are normalized without
//! failing, that 404 is kept apart from other statuses, and that implicit
//! references behave the same way for every kind.

use std::sync::Arc;

use sentinel_mgmt::actions::{delete_action, get_action};
use sentinel_mgmt::alert_rules::{delete_alert_rule, get_alert_rule};
use sentinel_mgmt::auth::TokenProvider;
use sentinel_mgmt::bookmarks::{BookmarkProperties, create_bookmark, delete_bookmark, get_bookmark};
use sentinel_mgmt::client::SentinelClient;
use sentinel_mgmt::data_connectors::{delete_data_connector, get_data_connector};
use sentinel_mgmt::error::SentinelError;
use sentinel_mgmt::incidents::{
    delete_incident, delete_incident_comment, get_incident, get_incident_comment,
};
use sentinel_mgmt::resource::{ResourceKind, ResourceRef};
use sentinel_mgmt::tracker::ResourceTracker;
use wiremock::matchers::{any, method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn mock_client(server: &MockServer) -> SentinelClient {
    let tp = TokenProvider::with_token("mock-token");
    SentinelClient::new(tp, &format!("{}/sentinel", server.uri()), "2020-01-01").unwrap()
}

fn bookmark(name: &str) -> BookmarkProperties {
    BookmarkProperties {
        display_name: name.to_string(),
        query: "SecurityEvent".to_string(),
        labels: Vec::new(),
        query_result: None,
        notes: None,
    }
}

// ── classification ─────────────────────────────────────────────────────

#[tokio::test]
async fn server_error_is_api_not_not_found() {
    let server = MockServer::start().await;
    let client = mock_client(&server);

    Mock::given(method("GET"))
        .and(path("/sentinel/alertRules/r1"))
        .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({
            "error": {"code": "InternalServerError", "message": "boom"}
        })))
        .mount(&server)
        .await;

    let err = get_alert_rule(&client, ResourceRef::Id("r1")).await.unwrap_err();
    assert!(!err.is_not_found());
    match err {
        SentinelError::Api { status, error } => {
            assert_eq!(status.as_u16(), 500);
            assert!(!error.is_parse_failure);
            assert_eq!(error.code.as_deref(), Some("InternalServerError"));
            assert!(error.message.contains('\n'), "JSON bodies are pretty-printed");
        }
        other => panic!("expected Api, got {other:?}"),
    }
}

#[tokio::test]
async fn non_json_failure_body_is_preserved_verbatim() {
    let server = MockServer::start().await;
    let client = mock_client(&server);

    let html = "<html><body>502 Bad Gateway</body></html>";
    Mock::given(method("DELETE"))
        .and(path("/sentinel/alertRules/r1"))
        .respond_with(ResponseTemplate::new(502).set_body_string(html))
        .mount(&server)
        .await;

    let err = delete_alert_rule(&client, ResourceRef::Id("r1")).await.unwrap_err();
    match err {
        SentinelError::Api { status, error } => {
            assert_eq!(status.as_u16(), 502);
            assert!(error.is_parse_failure);
            assert_eq!(error.message, html);
            assert_eq!(error.raw_body.as_deref(), Some(html));
        }
        other => panic!("expected Api, got {other:?}"),
    }
}

#[tokio::test]
async fn empty_failure_body_yields_empty_message() {
    let server = MockServer::start().await;
    let client = mock_client(&server);

    Mock::given(method("GET"))
        .and(path("/sentinel/dataConnectors/dc"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let err = get_data_connector(&client, ResourceRef::Id("dc")).await.unwrap_err();
    match err {
        SentinelError::Api { status, error } => {
            assert_eq!(status.as_u16(), 403);
            assert!(error.message.is_empty());
            assert!(!error.is_parse_failure);
            assert!(error.raw_body.is_none());
        }
        other => panic!("expected Api, got {other:?}"),
    }
}

#[tokio::test]
async fn unreachable_host_is_transport_error() {
    // Nothing listens on port 9 of localhost in the test environment.
    let client = SentinelClient::new(
        TokenProvider::with_token("mock-token"),
        "http://127.0.0.1:9/sentinel",
        "2020-01-01",
    )
    .unwrap();

    let err = get_incident(&client, ResourceRef::Id("i1")).await.unwrap_err();
    assert!(matches!(err, SentinelError::Transport(_)), "got {err:?}");
}

// ── implicit references ────────────────────────────────────────────────

#[tokio::test]
async fn implicit_get_and_delete_require_a_prior_create_for_every_kind() {
    let server = MockServer::start().await;
    let client = mock_client(&server);

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let results = [
        (ResourceKind::AlertRule, get_alert_rule(&client, ResourceRef::LastCreated).await),
        (ResourceKind::Bookmark, get_bookmark(&client, ResourceRef::LastCreated).await),
        (
            ResourceKind::DataConnector,
            get_data_connector(&client, ResourceRef::LastCreated).await,
        ),
        (ResourceKind::Incident, get_incident(&client, ResourceRef::LastCreated).await),
        (
            ResourceKind::Action,
            get_action(&client, ResourceRef::Id("r"), ResourceRef::LastCreated).await,
        ),
        (
            ResourceKind::IncidentComment,
            get_incident_comment(&client, ResourceRef::Id("i"), ResourceRef::LastCreated).await,
        ),
        (ResourceKind::AlertRule, delete_alert_rule(&client, ResourceRef::LastCreated).await),
        (ResourceKind::Bookmark, delete_bookmark(&client, ResourceRef::LastCreated).await),
        (
            ResourceKind::DataConnector,
            delete_data_connector(&client, ResourceRef::LastCreated).await,
        ),
        (ResourceKind::Incident, delete_incident(&client, ResourceRef::LastCreated).await),
        (
            ResourceKind::Action,
            delete_action(&client, ResourceRef::Id("r"), ResourceRef::LastCreated).await,
        ),
        (
            ResourceKind::IncidentComment,
            delete_incident_comment(&client, ResourceRef::Id("i"), ResourceRef::LastCreated)
                .await,
        ),
    ];

    for (expected, result) in results {
        match result {
            Err(SentinelError::NoPriorResource { kind }) => assert_eq!(kind, expected),
            other => panic!("{expected}: expected NoPriorResource, got {other:?}"),
        }
    }
}

#[tokio::test]
async fn concurrent_creates_leave_one_of_the_ids() {
    let server = MockServer::start().await;
    let client = mock_client(&server);

    Mock::given(method("PUT"))
        .and(path_regex(r"^/sentinel/bookmarks/[0-9a-f-]{36}$"))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({})))
        .expect(2)
        .mount(&server)
        .await;

    let (first, second) = (bookmark("first"), bookmark("second"));
    let (a, b) = tokio::join!(
        create_bookmark(&client, &first),
        create_bookmark(&client, &second),
    );
    let (a, b) = (a.unwrap(), b.unwrap());
    assert_ne!(a.id, b.id);

    let last = client.tracker().last_created(ResourceKind::Bookmark).unwrap();
    assert!(last == a.id || last == b.id, "tracker holds {last}");
}

#[tokio::test]
async fn separate_trackers_do_not_share_ids() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path_regex(r"^/sentinel/bookmarks/.+$"))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({"name": "b-a"})))
        .mount(&server)
        .await;

    let session_a = mock_client(&server).with_tracker(Arc::new(ResourceTracker::new()));
    let session_b = mock_client(&server).with_tracker(Arc::new(ResourceTracker::new()));

    create_bookmark(&session_a, &bookmark("a")).await.unwrap();
    assert_eq!(
        session_a.tracker().last_created(ResourceKind::Bookmark).unwrap(),
        "b-a"
    );
    assert!(session_b.tracker().last_created(ResourceKind::Bookmark).is_err());
}

#[tokio::test]
async fn shared_tracker_sees_creates_from_both_clients() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path_regex(r"^/sentinel/bookmarks/.+$"))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({"name": "shared"})))
        .mount(&server)
        .await;

    let tracker = Arc::new(ResourceTracker::new());
    let writer = mock_client(&server).with_tracker(Arc::clone(&tracker));
    let reader = mock_client(&server).with_tracker(tracker);

    create_bookmark(&writer, &bookmark("x")).await.unwrap();
    assert_eq!(
        reader.tracker().last_created(ResourceKind::Bookmark).unwrap(),
        "shared"
    );
}
