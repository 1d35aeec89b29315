//! Headless runner against a real backend
//!
//! Asserts the NDJSON event sequence a script would see on stdout.

use std::time::Duration;

use super::mock_backend::{dead_endpoint, MockBackend, Step};
use crate::{warning_frame, wire_transfer_warning};
use scam_sentinel::headless::runner::run_with_writer;
use sentinel_app::config::Settings;
use sentinel_app::Engine;
use sentinel_core::Endpoint;
use sentinel_transport::{ReconnectPolicy, WebSocketTransport};
use serde_json::Value;

/// Run the headless loop to completion and return the parsed lines.
async fn run_headless(endpoint: Endpoint, policy: ReconnectPolicy) -> Vec<Value> {
    let engine = Engine::new(
        WebSocketTransport::new(policy),
        endpoint,
        Settings::default(),
    );
    let mut output = Vec::new();

    tokio::time::timeout(Duration::from_secs(10), run_with_writer(engine, &mut output))
        .await
        .expect("headless run timed out")
        .expect("headless run failed");

    String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).expect("every line is JSON"))
        .collect()
}

fn event_names(lines: &[Value]) -> Vec<&str> {
    lines
        .iter()
        .map(|line| line["event"].as_str().unwrap_or_default())
        .collect()
}

// ─────────────────────────────────────────────────────────
// Alert flow
// ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_wire_transfer_alert_then_remote_close() {
    let backend = MockBackend::bind().await;
    let endpoint = backend.endpoint();
    let server = backend.serve(vec![
        Step::Send(r#"{"type":"heartbeat"}"#.to_string()),
        Step::Send(wire_transfer_warning()),
        Step::Close,
    ]);

    let lines = run_headless(endpoint.clone(), ReconnectPolicy::disabled()).await;
    server.await.unwrap();

    assert_eq!(
        event_names(&lines),
        vec!["connecting", "connected", "alert", "disconnected", "idle"]
    );
    assert_eq!(lines[0]["endpoint"], endpoint.as_str());
    assert_eq!(lines[2]["text"], "You must wire $5000 immediately");
    assert_eq!(lines[2]["reasoning"], "Urgency + financial request pattern");
    assert_eq!(lines[3]["reason"], "remote_closed");
    assert!(lines.iter().all(|line| line["timestamp"].is_i64()));
}

#[tokio::test]
async fn test_malformed_frames_do_not_change_output() {
    let backend = MockBackend::bind().await;
    let endpoint = backend.endpoint();
    let server = backend.serve(vec![
        Step::Send("not json at all".to_string()),
        Step::Send(r#"["warning"]"#.to_string()),
        Step::Send(r#"{"type":"warning","reasoning":"no text"}"#.to_string()),
        Step::Close,
    ]);

    let lines = run_headless(endpoint, ReconnectPolicy::disabled()).await;
    server.await.unwrap();

    assert_eq!(
        event_names(&lines),
        vec!["connecting", "connected", "disconnected"]
    );
}

#[tokio::test]
async fn test_latest_alert_wins() {
    let backend = MockBackend::bind().await;
    let endpoint = backend.endpoint();
    let server = backend.serve(vec![
        Step::Send(warning_frame("M1", "first")),
        Step::Send(warning_frame("M2", "second")),
        Step::Close,
    ]);

    let lines = run_headless(endpoint, ReconnectPolicy::disabled()).await;
    server.await.unwrap();

    let alerts: Vec<&Value> = lines
        .iter()
        .filter(|line| line["event"] == "alert")
        .collect();
    assert!(!alerts.is_empty());
    assert_eq!(alerts.last().unwrap()["text"], "M2");
    assert_eq!(lines.last().unwrap()["event"], "idle");
}

// ─────────────────────────────────────────────────────────
// Failures
// ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_refused_connection_reports_handshake_failure() {
    let lines = run_headless(dead_endpoint().await, ReconnectPolicy::disabled()).await;

    assert_eq!(
        event_names(&lines),
        vec!["connecting", "error", "disconnected"]
    );
    assert_eq!(lines[1]["fatal"], false);
    assert_eq!(lines[2]["reason"], "handshake_failed");
}

#[tokio::test]
async fn test_refused_connection_retries_then_gives_up() {
    let policy = ReconnectPolicy {
        enabled: true,
        max_attempts: 2,
        initial_backoff: Duration::from_millis(10),
        max_backoff: Duration::from_millis(20),
    };

    let lines = run_headless(dead_endpoint().await, policy).await;
    let names = event_names(&lines);

    assert_eq!(names.first(), Some(&"connecting"));
    assert!(names.contains(&"reconnecting"));
    assert_eq!(names.last(), Some(&"disconnected"));
    assert_eq!(lines.last().unwrap()["reason"], "retries_exhausted");

    let attempts: Vec<&Value> = lines
        .iter()
        .filter(|line| line["event"] == "reconnecting")
        .collect();
    assert!(attempts.iter().all(|line| line["max_attempts"] == 2));
}
