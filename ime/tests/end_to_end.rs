use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use redact_core::{RedactConfig, RedactionClient};
use redact_ime::{
    InMemoryConnection, KeyCode, KeyboardSession, RecordingStatus, Status, TextAdapter,
    TriggerResult,
};
use serde_json::{json, Value};

type Session = KeyboardSession<InMemoryConnection, RecordingStatus>;

async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

/// Redaction service stub: waits `delay`, then answers with `status` and `body`
async fn stub(delay: Duration, status: StatusCode, body: Value) -> (String, Arc<AtomicUsize>) {
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();
    let router = Router::new().route(
        "/redact",
        post(move || {
            let counter = counter.clone();
            let body = body.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(delay).await;
                (status, Json(body))
            }
        }),
    );
    (serve(router).await, hits)
}

fn session_for(base_url: &str, timeout_ms: u64, text: &str) -> Session {
    let config = RedactConfig {
        timeout_ms: Some(timeout_ms),
        ..RedactConfig::with_base_url(base_url)
    };
    let client = RedactionClient::new(&config).unwrap();
    KeyboardSession::new(
        TextAdapter::with_connection(InMemoryConnection::with_text(text), config.lookback_chars()),
        Arc::new(client),
        RecordingStatus::new(),
    )
}

fn buffer(session: &Session) -> &str {
    session.adapter().connection().unwrap().text()
}

#[tokio::test]
async fn redacts_phone_number_in_place() {
    let (url, hits) = stub(
        Duration::ZERO,
        StatusCode::OK,
        json!({ "redacted": "call me at [PHONE]" }),
    )
    .await;
    let mut session = session_for(&url, 10_000, "call me at 555-123-4567");

    session.handle_key(KeyCode::Redact);
    session.settle().await;

    assert_eq!(buffer(&session), "call me at [PHONE]");
    assert_eq!(session.status().current(), Some(&Status::Complete));
    assert!(session.status().trigger_enabled());
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn timeout_leaves_text_intact() {
    let (url, _) = stub(
        Duration::from_secs(5),
        StatusCode::OK,
        json!({ "redacted": "too late" }),
    )
    .await;
    let mut session = session_for(&url, 300, "hello");

    session.handle_key(KeyCode::Redact);
    assert!(!session.status().trigger_enabled());
    session.settle().await;

    assert_eq!(buffer(&session), "hello");
    assert!(matches!(
        session.status().current(),
        Some(Status::Failed(redact_core::FailureKind::NetworkTimeout))
    ));
    assert_eq!(
        session.status().current().unwrap().to_string(),
        "Redaction failed. Try again."
    );
    assert!(session.status().trigger_enabled());
}

#[tokio::test]
async fn server_error_leaves_text_intact() {
    let (url, _) = stub(
        Duration::ZERO,
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({ "error": "boom" }),
    )
    .await;
    let mut session = session_for(&url, 10_000, "my email is a@b.io");

    session.handle_key(KeyCode::Redact);
    session.settle().await;

    assert_eq!(buffer(&session), "my email is a@b.io");
    assert_eq!(
        session.status().current(),
        Some(&Status::Failed(redact_core::FailureKind::HttpError))
    );
}

#[tokio::test]
async fn rapid_triggers_send_one_request() {
    let (url, hits) = stub(
        Duration::from_millis(200),
        StatusCode::OK,
        json!({ "redacted": "ssn [SSN]" }),
    )
    .await;
    let mut session = session_for(&url, 10_000, "ssn 123-45-6789");

    assert!(matches!(
        session.handle_key(KeyCode::Redact),
        Some(TriggerResult::Started(_))
    ));
    assert_eq!(
        session.handle_key(KeyCode::Redact),
        Some(TriggerResult::AlreadyPending)
    );
    assert_eq!(
        session.status().current(),
        Some(&Status::AlreadyProcessing)
    );
    session.settle().await;

    assert_eq!(hits.load(Ordering::SeqCst), 1);
    assert_eq!(buffer(&session), "ssn [SSN]");
}

#[tokio::test]
async fn null_redacted_field_is_a_failure() {
    let (url, _) = stub(Duration::ZERO, StatusCode::OK, json!({ "redacted": null })).await;
    let mut session = session_for(&url, 10_000, "hello");

    session.handle_key(KeyCode::Redact);
    session.settle().await;

    assert_eq!(buffer(&session), "hello");
    assert_eq!(
        session.status().current(),
        Some(&Status::Failed(redact_core::FailureKind::InvalidResponse))
    );
}
