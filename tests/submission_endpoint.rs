//! `WebFormsClient` against a local forms endpoint
//!
//! Each test binds an axum server on an ephemeral port and scripts the body
//! it answers with, so the whole response interpretation path runs over HTTP.

use std::sync::{Arc, Mutex};

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use serde_json::Value;
use tokio::net::TcpListener;

use enclosure_quote::config::SubmissionConfig;
use enclosure_quote::quote::SelectionState;
use enclosure_quote::submission::{ContactForm, LeadPayload, LeadSink, SubmitError, WebFormsClient};

// ─── Test Server ──────────────────────────────────────────────────────────────

#[derive(Clone)]
struct Endpoint {
    status: StatusCode,
    body: &'static str,
    received: Arc<Mutex<Vec<Value>>>,
}

async fn handle(State(endpoint): State<Endpoint>, Json(lead): Json<Value>) -> (StatusCode, &'static str) {
    endpoint.received.lock().unwrap().push(lead);
    (endpoint.status, endpoint.body)
}

/// Start a server answering every POST /submit with `status` and `body`
async fn serve(status: StatusCode, body: &'static str) -> (String, Arc<Mutex<Vec<Value>>>) {
    let received = Arc::new(Mutex::new(Vec::new()));
    let endpoint = Endpoint {
        status,
        body,
        received: received.clone(),
    };
    let app = Router::new().route("/submit", post(handle)).with_state(endpoint);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}/submit", addr), received)
}

fn client_for(endpoint: &str) -> WebFormsClient {
    let config = SubmissionConfig {
        endpoint: endpoint.to_string(),
        access_key: "test-key".to_string(),
        timeout_secs: 5,
    };
    WebFormsClient::new(&config).unwrap()
}

fn payload() -> LeadPayload {
    let mut state = SelectionState::default();
    state.select_enclosure("Warm glazing", 4500.0, false);
    state.set_dimensions(3.0, 1.2, 2.6);
    let form = ContactForm::new("Ann", "+7 900 000-00-00");
    LeadPayload::build("test-key", &form, &state)
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_success_response() {
    let (url, received) = serve(StatusCode::OK, r#"{"success": true, "message": "Email sent"}"#).await;
    let client = client_for(&url);

    assert_eq!(client.submit(&payload()).await, Ok(()));

    let received = received.lock().unwrap();
    assert_eq!(received.len(), 1);
    let lead = &received[0];
    assert_eq!(lead["access_key"], "test-key");
    assert_eq!(lead["name"], "Ann");
    assert_eq!(lead["type"], "Warm glazing");
    assert_eq!(lead["size"], "3 x 1.2 x 2.6");
    assert_eq!(lead["extras"], "none");
    assert_eq!(lead["walls"], "not selected");
    assert!(lead["total"].is_i64());
}

#[tokio::test]
async fn test_rejection_is_a_server_error() {
    let (url, _) = serve(
        StatusCode::BAD_REQUEST,
        r#"{"success": false, "message": "Invalid access key"}"#,
    )
    .await;

    let err = client_for(&url).submit(&payload()).await.unwrap_err();
    assert_eq!(err, SubmitError::Rejected("Invalid access key".to_string()));
    assert_eq!(err.user_message(), "Server error");
}

#[tokio::test]
async fn test_success_flag_wins_over_status() {
    let (url, _) = serve(StatusCode::INTERNAL_SERVER_ERROR, r#"{"success": true}"#).await;
    assert_eq!(client_for(&url).submit(&payload()).await, Ok(()));
}

#[tokio::test]
async fn test_garbage_body_is_a_client_error() {
    let (url, _) = serve(StatusCode::OK, "<html>Bad gateway</html>").await;

    let err = client_for(&url).submit(&payload()).await.unwrap_err();
    assert!(matches!(err, SubmitError::Transport(_)));
    assert_eq!(err.user_message(), "Client error");
}

#[tokio::test]
async fn test_unreachable_endpoint_is_a_client_error() {
    // Bind then drop to get a port nobody listens on
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client_for(&format!("http://{}/submit", addr))
        .submit(&payload())
        .await
        .unwrap_err();
    assert!(matches!(err, SubmitError::Transport(_)));
}
