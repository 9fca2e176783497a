//! End-to-end tests for the login exchange and session persistence.
//!
//! The HTTP side runs against a local wiremock server; the store side runs
//! against the in-memory and file backends.

use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use bissoy_tui::api::{AuthClient, AuthOutcome, Credentials};
use bissoy_tui::session::{FilePrefs, MemoryPrefs, SessionStore};

fn credentials(email: &str, password: &str) -> Credentials {
    Credentials {
        email: email.to_string(),
        password: password.to_string(),
    }
}

async fn mock_login_response(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(response)
        .mount(server)
        .await;
}

#[tokio::test]
async fn sends_exact_wire_request_and_reads_username() {
    let server = MockServer::start().await;

    // Only a request with the exact body and content type matches; anything
    // else falls through to wiremock's default 404 and would fail the assert.
    Mock::given(method("POST"))
        .and(path("/login"))
        .and(header("content-type", "application/json; charset=utf-8"))
        .and(body_json(
            serde_json::json!({"email": "a@b.com", "password": "x"}),
        ))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"username": "alice"})),
        )
        .mount(&server)
        .await;

    let client = AuthClient::with_base_url(server.uri()).expect("build client");
    let outcome = client.login(&credentials("a@b.com", "x")).await;

    assert_eq!(
        outcome,
        AuthOutcome::Success {
            username: "alice".to_string()
        }
    );
}

#[tokio::test]
async fn name_field_used_when_username_missing() {
    let server = MockServer::start().await;
    mock_login_response(
        &server,
        ResponseTemplate::new(200).set_body_json(serde_json::json!({"name": "Alice Rahman"})),
    )
    .await;

    let client = AuthClient::with_base_url(server.uri()).expect("build client");
    let outcome = client.login(&credentials("a@b.com", "x")).await;

    assert_eq!(
        outcome,
        AuthOutcome::Success {
            username: "Alice Rahman".to_string()
        }
    );
}

#[tokio::test]
async fn placeholder_when_success_body_names_nobody() {
    let server = MockServer::start().await;
    mock_login_response(
        &server,
        ResponseTemplate::new(200).set_body_json(serde_json::json!({"status": "ok"})),
    )
    .await;

    let client = AuthClient::with_base_url(server.uri()).expect("build client");
    let outcome = client.login(&credentials("a@b.com", "x")).await;

    assert_eq!(
        outcome,
        AuthOutcome::Success {
            username: "User".to_string()
        }
    );
}

#[tokio::test]
async fn malformed_success_body_still_logs_in() {
    let server = MockServer::start().await;
    mock_login_response(
        &server,
        ResponseTemplate::new(200).set_body_string("<html>not json</html>"),
    )
    .await;

    let client = AuthClient::with_base_url(server.uri()).expect("build client");
    let outcome = client.login(&credentials("a@b.com", "x")).await;

    assert_eq!(
        outcome,
        AuthOutcome::Success {
            username: "User".to_string()
        }
    );
}

#[tokio::test]
async fn any_error_status_reads_as_invalid_credentials() {
    for status in [401u16, 404, 500] {
        let server = MockServer::start().await;
        mock_login_response(
            &server,
            ResponseTemplate::new(status)
                .set_body_json(serde_json::json!({"error": "something specific"})),
        )
        .await;

        let client = AuthClient::with_base_url(server.uri()).expect("build client");
        let outcome = client.login(&credentials("a@b.com", "wrong")).await;

        assert_eq!(
            outcome,
            AuthOutcome::Failure {
                message: "Invalid credentials".to_string()
            },
            "status {} should map to the generic failure",
            status
        );
    }
}

#[tokio::test]
async fn transport_failure_reports_network_error() {
    // Bind an ephemeral port and release it so the connection is refused.
    let dead_uri = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind probe port");
        let addr = listener.local_addr().expect("probe addr");
        format!("http://{}", addr)
    };

    let client = AuthClient::with_base_url(dead_uri).expect("build client");
    let outcome = client.login(&credentials("a@b.com", "x")).await;

    match outcome {
        AuthOutcome::Failure { message } => {
            assert!(
                message.starts_with("Network error: "),
                "unexpected message: {}",
                message
            );
        }
        AuthOutcome::Success { .. } => panic!("connection refused must not log in"),
    }
}

#[tokio::test]
async fn successful_login_lands_in_the_store() {
    let server = MockServer::start().await;
    mock_login_response(
        &server,
        ResponseTemplate::new(200).set_body_json(serde_json::json!({"username": "alice"})),
    )
    .await;

    let client = AuthClient::with_base_url(server.uri()).expect("build client");
    let mut store = SessionStore::new(Box::new(MemoryPrefs::default()));

    match client.login(&credentials("a@b.com", "x")).await {
        AuthOutcome::Success { username } => store.login(&username).expect("persist session"),
        AuthOutcome::Failure { message } => panic!("login should succeed, got: {}", message),
    }

    assert!(store.is_logged_in());
    assert_eq!(store.username(), "alice");
}

#[tokio::test]
async fn rejected_login_leaves_the_store_untouched() {
    let server = MockServer::start().await;
    mock_login_response(
        &server,
        ResponseTemplate::new(401).set_body_json(serde_json::json!({})),
    )
    .await;

    let client = AuthClient::with_base_url(server.uri()).expect("build client");
    let store = SessionStore::new(Box::new(MemoryPrefs::default()));

    let outcome = client.login(&credentials("a@b.com", "wrong")).await;

    assert_eq!(
        outcome,
        AuthOutcome::Failure {
            message: "Invalid credentials".to_string()
        }
    );
    assert!(!store.is_logged_in());
    assert_eq!(store.username(), "");
}

#[test]
fn session_survives_reload_until_logout() {
    let dir = tempfile::tempdir().expect("create temp dir");

    {
        let mut store = SessionStore::new(Box::new(FilePrefs::new(dir.path().to_path_buf())));
        store.login("alice").expect("persist session");
    }

    // Fresh store over the same directory sees the persisted session
    {
        let mut store = SessionStore::new(Box::new(FilePrefs::new(dir.path().to_path_buf())));
        assert!(store.is_logged_in());
        assert_eq!(store.username(), "alice");

        store.logout().expect("clear session");
    }

    // And after logout the next start is logged out with no stale name
    let store = SessionStore::new(Box::new(FilePrefs::new(dir.path().to_path_buf())));
    assert!(!store.is_logged_in());
    assert_eq!(store.username(), "");
}
