//! Engine mount/unmount against a real backend

use std::time::Duration;

use super::mock_backend::{MockBackend, Step};
use crate::wire_transfer_warning;
use sentinel_app::config::Settings;
use sentinel_app::{AlertView, Engine};
use sentinel_core::ConnectionPhase;
use sentinel_transport::{ReconnectPolicy, WebSocketTransport};

/// Process messages until `done` holds for the engine.
async fn run_until<F>(engine: &mut Engine<WebSocketTransport>, done: F)
where
    F: Fn(&Engine<WebSocketTransport>) -> bool,
{
    tokio::time::timeout(Duration::from_secs(5), async {
        while !done(&*engine) {
            let Some(msg) = engine.next_message().await else {
                break;
            };
            engine.process_message(msg);
        }
    })
    .await
    .expect("engine never reached the expected state");
}

#[tokio::test]
async fn test_unmount_sends_close_frame() {
    let backend = MockBackend::bind().await;
    let endpoint = backend.endpoint();
    let server = backend.serve(vec![Step::AwaitClientClose]);

    let mut engine = Engine::new(
        WebSocketTransport::new(ReconnectPolicy::disabled()),
        endpoint,
        Settings::default(),
    );
    engine.mount();
    run_until(&mut engine, |e| e.state.connection == ConnectionPhase::Open).await;

    engine.unmount();

    let report = tokio::time::timeout(Duration::from_secs(5), server)
        .await
        .expect("backend never saw the close")
        .unwrap();
    assert!(report.client_closed);
    assert!(!engine.is_mounted());
}

#[tokio::test]
async fn test_alert_presented_until_backend_closes() {
    let backend = MockBackend::bind().await;
    let endpoint = backend.endpoint();
    let server = backend.serve(vec![
        Step::Send(wire_transfer_warning()),
        Step::Pause(Duration::from_millis(50)),
        Step::Close,
    ]);

    let mut engine = Engine::new(
        WebSocketTransport::new(ReconnectPolicy::disabled()),
        endpoint,
        Settings::default(),
    );
    engine.mount();

    run_until(&mut engine, |e| e.current_view().is_alert()).await;
    assert_eq!(
        engine.current_view(),
        AlertView::Alert {
            detected_text: "You must wire $5000 immediately".to_string(),
            reasoning: "Urgency + financial request pattern".to_string(),
        }
    );

    run_until(&mut engine, |e| e.state.connection.is_closed()).await;
    assert_eq!(engine.current_view(), AlertView::Listening);
    assert!(!engine.has_session());

    server.await.unwrap();
}

#[tokio::test]
async fn test_drop_closes_connection() {
    let backend = MockBackend::bind().await;
    let endpoint = backend.endpoint();
    let server = backend.serve(vec![Step::AwaitClientClose]);

    let mut engine = Engine::new(
        WebSocketTransport::new(ReconnectPolicy::disabled()),
        endpoint,
        Settings::default(),
    );
    engine.mount();
    run_until(&mut engine, |e| e.state.connection.is_open()).await;

    drop(engine);

    let report = tokio::time::timeout(Duration::from_secs(5), server)
        .await
        .expect("backend never saw the close")
        .unwrap();
    assert!(report.client_closed);
}
