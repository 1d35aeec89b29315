//! WebSocket transport for the monitoring backend.
//!
//! Each [`Session`] opened through [`WebSocketTransport`] is served by one
//! background Tokio task that owns the socket.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     session task                             │
//! │                                                              │
//! │  connect_async ──▶ Open ──▶ select! {                        │
//! │                               close signal  → Close frame    │
//! │                               text frame    → decode → event │
//! │                               close/err/EOF → lost           │
//! │                             }                                │
//! │                                                              │
//! │  lost ──▶ ReconnectPolicy? ──yes──▶ backoff, reconnect        │
//! │                 │                                            │
//! │                 └──no──▶ Closed (terminal)                   │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! The close signal is polled first on every iteration: once it fires no new
//! frame is read, while a frame already being decoded still finishes.

use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::protocol::Message as WsMessage;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::{debug, error, info, warn};

use sentinel_core::prelude::*;
use sentinel_core::{CloseReason, ConnectionPhase, Endpoint};

use crate::protocol::{decode_message, preview};
use crate::reconnect::ReconnectPolicy;
use crate::session::{Session, SessionDriver, SessionEvent, Transport};

type WsStream = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

/// How one connected stretch of a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IoOutcome {
    /// The owner asked to close, or dropped the session.
    CloseRequested,
    /// The connection went away for `reason`.
    Lost(CloseReason),
}

// ---------------------------------------------------------------------------
// WebSocketTransport
// ---------------------------------------------------------------------------

/// [`Transport`] backed by tokio-tungstenite.
#[derive(Debug, Clone, Default)]
pub struct WebSocketTransport {
    policy: ReconnectPolicy,
}

impl WebSocketTransport {
    pub fn new(policy: ReconnectPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &ReconnectPolicy {
        &self.policy
    }
}

impl Transport for WebSocketTransport {
    fn open(&self, endpoint: &Endpoint) -> Session {
        let (session, driver) = Session::pair(endpoint.clone());

        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                runtime.spawn(run_session_task(driver, self.policy.clone()));
            }
            Err(err) => {
                error!("Cannot open session to {}: {}", endpoint, err);
                driver.fail_now(format!("no async runtime available: {err}"));
            }
        }

        session
    }
}

// ---------------------------------------------------------------------------
// Background task
// ---------------------------------------------------------------------------

/// Drive one session from `Connecting` to `Closed`.
async fn run_session_task(mut driver: SessionDriver, policy: ReconnectPolicy) {
    let endpoint = driver.endpoint().clone();
    info!("Session {}: connecting to {}", driver.id(), endpoint);

    let mut outcome = match connect_or_close(&mut driver, &endpoint).await {
        None => IoOutcome::CloseRequested,
        Some(Ok(ws_stream)) => serve_connection(ws_stream, &mut driver).await,
        Some(Err(err)) => {
            warn!("Session {}: handshake failed: {}", driver.id(), err);
            if !driver.emit(SessionEvent::Error(err.to_string())).await {
                IoOutcome::CloseRequested
            } else {
                IoOutcome::Lost(CloseReason::HandshakeFailed)
            }
        }
    };

    let mut attempt: u32 = 1;
    loop {
        let reason = match outcome {
            IoOutcome::CloseRequested => {
                driver.finish(CloseReason::Requested).await;
                break;
            }
            IoOutcome::Lost(reason) => reason,
        };

        if !policy.enabled {
            driver.finish(reason).await;
            break;
        }

        if !policy.allows(attempt) {
            error!(
                "Session {}: exceeded {} reconnection attempts, giving up",
                driver.id(),
                policy.max_attempts
            );
            driver.finish(CloseReason::RetriesExhausted).await;
            break;
        }

        driver.set_phase(ConnectionPhase::Reconnecting { attempt });
        let announced = driver
            .emit(SessionEvent::Reconnecting {
                attempt,
                max_attempts: policy.max_attempts,
            })
            .await;
        if !announced {
            outcome = IoOutcome::CloseRequested;
            continue;
        }

        let backoff = policy.backoff(attempt);
        warn!(
            "Session {}: connection lost ({}), retrying in {:?} (attempt {}/{})",
            driver.id(),
            reason,
            backoff,
            attempt,
            policy.max_attempts
        );

        tokio::select! {
            biased;
            _ = driver.wait_for_close() => {
                outcome = IoOutcome::CloseRequested;
                continue;
            }
            _ = tokio::time::sleep(backoff) => {}
        }

        outcome = match connect_or_close(&mut driver, &endpoint).await {
            None => IoOutcome::CloseRequested,
            Some(Ok(ws_stream)) => {
                info!("Session {}: reconnected (attempt {})", driver.id(), attempt);
                attempt = 1;
                serve_connection(ws_stream, &mut driver).await
            }
            Some(Err(err)) => {
                warn!(
                    "Session {}: reconnection attempt {} failed: {}",
                    driver.id(),
                    attempt,
                    err
                );
                attempt += 1;
                IoOutcome::Lost(CloseReason::HandshakeFailed)
            }
        };
    }

    debug!("Session task exiting");
}

/// Connect, unless the owner closes first (`None`).
async fn connect_or_close(
    driver: &mut SessionDriver,
    endpoint: &Endpoint,
) -> Option<Result<WsStream>> {
    tokio::select! {
        biased;
        _ = driver.wait_for_close() => None,
        result = connect_ws(endpoint) => Some(result),
    }
}

/// Announce the open connection, then pump frames until it ends.
async fn serve_connection(ws_stream: WsStream, driver: &mut SessionDriver) -> IoOutcome {
    driver.set_phase(ConnectionPhase::Open);
    info!("Session {}: connected to {}", driver.id(), driver.endpoint());
    if !driver.emit(SessionEvent::Opened).await {
        return IoOutcome::CloseRequested;
    }
    run_io_loop(ws_stream, driver).await
}

async fn run_io_loop(ws_stream: WsStream, driver: &mut SessionDriver) -> IoOutcome {
    let (mut ws_sink, mut ws_stream) = ws_stream.split();

    loop {
        tokio::select! {
            biased;

            // ── Owner requested close ────────────────────────────────────
            _ = driver.wait_for_close() => {
                send_close(&mut ws_sink).await;
                return IoOutcome::CloseRequested;
            }

            // ── Incoming WebSocket frame ─────────────────────────────────
            frame = ws_stream.next() => {
                match frame {
                    Some(Ok(WsMessage::Text(text))) => {
                        if !handle_ws_text(text.as_str(), driver).await {
                            send_close(&mut ws_sink).await;
                            return IoOutcome::CloseRequested;
                        }
                    }
                    Some(Ok(WsMessage::Close(frame))) => {
                        debug!("Session {}: received Close frame {:?}", driver.id(), frame);
                        return IoOutcome::Lost(CloseReason::Remote);
                    }
                    Some(Ok(_)) => {
                        // Ping/Pong/Binary are not part of the alert protocol
                    }
                    Some(Err(err)) => {
                        warn!("Session {}: WebSocket read error: {}", driver.id(), err);
                        if !driver.emit(SessionEvent::Error(err.to_string())).await {
                            return IoOutcome::CloseRequested;
                        }
                        return IoOutcome::Lost(CloseReason::TransportError);
                    }
                    None => {
                        debug!("Session {}: WebSocket stream ended", driver.id());
                        return IoOutcome::Lost(CloseReason::Remote);
                    }
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Helper functions
// ---------------------------------------------------------------------------

/// Establish a new WebSocket connection to `endpoint`.
async fn connect_ws(endpoint: &Endpoint) -> Result<WsStream> {
    let (ws_stream, _response) = connect_async(endpoint.as_str())
        .await
        .map_err(|err| Error::transport(format!("failed to connect to {endpoint}: {err}")))?;
    Ok(ws_stream)
}

/// Decode a text frame and forward it. Malformed frames are logged and
/// dropped; they never end the session.
///
/// Returns `false` if the session owner is gone.
async fn handle_ws_text(text: &str, driver: &SessionDriver) -> bool {
    match decode_message(text) {
        Ok(message) => {
            trace!(
                "Session {}: decoded '{}' message",
                driver.id(),
                message.kind()
            );
            driver.emit(SessionEvent::Message(message)).await
        }
        Err(err) => {
            warn!(
                "Session {}: dropping undecodable frame ({}): {}",
                driver.id(),
                err,
                preview(text)
            );
            true
        }
    }
}

/// Send a WebSocket Close frame, ignoring any write errors.
async fn send_close(ws_sink: &mut SplitSink<WsStream, WsMessage>) {
    let _ = ws_sink.send(WsMessage::Close(None)).await;
    let _ = ws_sink.close().await;
}
