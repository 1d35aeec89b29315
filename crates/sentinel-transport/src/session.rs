//! Session handle and the session-factory seam.
//!
//! A [`Session`] is the presenter-side handle of one transport connection. It
//! is created together with a [`SessionDriver`], the transport-side half that
//! publishes [`SessionEvent`]s, updates the shared phase, and observes the
//! close signal.
//!
//! ```text
//!   Transport::open(endpoint)
//!          │
//!          ▼
//!  ┌──────────────┐   events (bounded mpsc)   ┌──────────────────┐
//!  │ SessionDriver │ ───────────────────────▶ │     Session       │
//!  │ (I/O task)    │ ◀─────────────────────── │ (owned by engine) │
//!  └──────────────┘   close (oneshot)         └──────────────────┘
//! ```
//!
//! Closing is idempotent and dropping a `Session` closes it, so the transport
//! is released on every exit path of its owner.

use std::sync::{Arc, RwLock};

use tokio::sync::mpsc::error::TryRecvError;
use tokio::sync::{mpsc, oneshot};
use tracing::debug;

use sentinel_core::{CloseReason, ConnectionPhase, Endpoint, InboundMessage, SessionId};

/// Capacity of a session's event channel. The driver awaits on a full
/// channel, so frames are never dropped or reordered.
pub const EVENT_CHANNEL_CAPACITY: usize = 256;

// ---------------------------------------------------------------------------
// SessionEvent
// ---------------------------------------------------------------------------

/// Typed lifecycle and data events published by a transport session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// Handshake completed (also sent after a successful reconnect).
    Opened,
    /// A successfully decoded backend message.
    Message(InboundMessage),
    /// A transport failure. Always followed by `Reconnecting` or `Closed`.
    Error(String),
    /// The reconnect policy is about to retry.
    Reconnecting {
        /// Current attempt number (1-based).
        attempt: u32,
        /// Maximum attempts before giving up.
        max_attempts: u32,
    },
    /// The session reached its terminal phase. No events follow.
    Closed { reason: CloseReason },
}

// ---------------------------------------------------------------------------
// Transport
// ---------------------------------------------------------------------------

/// Session factory.
///
/// `open` must return immediately with a session in
/// [`ConnectionPhase::Connecting`]; connection progress and any failure
/// (including failure to start at all) arrive later as [`SessionEvent`]s.
pub trait Transport: Send + Sync {
    fn open(&self, endpoint: &Endpoint) -> Session;
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// Presenter-side handle of one transport connection.
pub struct Session {
    id: SessionId,
    endpoint: Endpoint,
    phase: Arc<RwLock<ConnectionPhase>>,
    event_rx: mpsc::Receiver<SessionEvent>,
    /// `None` once close has been requested.
    close_tx: Option<oneshot::Sender<()>>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("endpoint", &self.endpoint.as_str())
            .field("phase", &self.phase())
            .field("close_requested", &self.is_close_requested())
            .finish()
    }
}

impl Session {
    /// Create a connected session/driver pair for `endpoint`.
    ///
    /// Transports call this from [`Transport::open`] and hand the driver to
    /// whatever performs the I/O.
    pub fn pair(endpoint: Endpoint) -> (Session, SessionDriver) {
        let id = SessionId::next();
        let phase = Arc::new(RwLock::new(ConnectionPhase::Connecting));
        let (event_tx, event_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let (close_tx, close_rx) = oneshot::channel();

        let session = Session {
            id,
            endpoint: endpoint.clone(),
            phase: Arc::clone(&phase),
            event_rx,
            close_tx: Some(close_tx),
        };
        let driver = SessionDriver {
            id,
            endpoint,
            phase,
            event_tx,
            close_rx,
            close_seen: false,
        };
        (session, driver)
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Current phase as last published by the driver.
    pub fn phase(&self) -> ConnectionPhase {
        *self.phase.read().unwrap_or_else(|e| e.into_inner())
    }

    /// Return `true` once [`close`](Self::close) has been called.
    pub fn is_close_requested(&self) -> bool {
        self.close_tx.is_none()
    }

    /// Take the next pending event without waiting.
    pub fn try_next_event(&mut self) -> Option<SessionEvent> {
        self.event_rx.try_recv().ok()
    }

    /// Like [`try_next_event`](Self::try_next_event), but tells an empty
    /// channel (`Empty`) apart from a driver that is gone (`Disconnected`).
    pub fn try_recv_event(&mut self) -> Result<SessionEvent, TryRecvError> {
        self.event_rx.try_recv()
    }

    /// Wait for the next event. Returns `None` once the driver is gone and
    /// every buffered event has been consumed.
    pub async fn next_event(&mut self) -> Option<SessionEvent> {
        self.event_rx.recv().await
    }

    /// Request the session to close.
    ///
    /// Idempotent: the close signal is sent at most once; later calls (and
    /// the implicit call on drop) do nothing.
    pub fn close(&mut self) {
        if let Some(close_tx) = self.close_tx.take() {
            debug!("Session {}: close requested", self.id);
            // The driver may already have finished; nothing to signal then.
            let _ = close_tx.send(());
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.close();
    }
}

// ---------------------------------------------------------------------------
// SessionDriver
// ---------------------------------------------------------------------------

/// Transport-side half of a [`Session`].
pub struct SessionDriver {
    id: SessionId,
    endpoint: Endpoint,
    phase: Arc<RwLock<ConnectionPhase>>,
    event_tx: mpsc::Sender<SessionEvent>,
    close_rx: oneshot::Receiver<()>,
    close_seen: bool,
}

impl std::fmt::Debug for SessionDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionDriver")
            .field("id", &self.id)
            .field("endpoint", &self.endpoint.as_str())
            .field("close_seen", &self.close_seen)
            .finish()
    }
}

impl SessionDriver {
    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn phase(&self) -> ConnectionPhase {
        *self.phase.read().unwrap_or_else(|e| e.into_inner())
    }

    pub fn set_phase(&self, phase: ConnectionPhase) {
        let mut guard = self.phase.write().unwrap_or_else(|e| e.into_inner());
        if *guard != phase {
            debug!("Session {}: {:?} -> {:?}", self.id, *guard, phase);
            *guard = phase;
        }
    }

    /// Publish an event, waiting for room in the channel.
    ///
    /// Returns `false` if the [`Session`] has been dropped.
    pub async fn emit(&self, event: SessionEvent) -> bool {
        self.event_tx.send(event).await.is_ok()
    }

    /// Publish an event without waiting. Used where no runtime is available.
    pub fn try_emit(&self, event: SessionEvent) -> bool {
        self.event_tx.try_send(event).is_ok()
    }

    /// Resolve once the owner has requested close (or dropped the session).
    ///
    /// Cancel-safe; resolves immediately on every call after the first.
    pub async fn wait_for_close(&mut self) {
        if self.close_seen {
            return;
        }
        // Err means the sender was dropped without sending, which only
        // happens when the Session itself is gone.
        let _ = (&mut self.close_rx).await;
        self.close_seen = true;
    }

    /// Non-blocking check of the close signal.
    pub fn is_close_requested(&mut self) -> bool {
        if self.close_seen {
            return true;
        }
        match self.close_rx.try_recv() {
            Ok(()) | Err(oneshot::error::TryRecvError::Closed) => {
                self.close_seen = true;
                true
            }
            Err(oneshot::error::TryRecvError::Empty) => false,
        }
    }

    /// Move to the terminal phase and publish the final event.
    pub async fn finish(self, reason: CloseReason) {
        self.set_phase(ConnectionPhase::Closed);
        debug!("Session {}: closed ({})", self.id, reason);
        let _ = self.emit(SessionEvent::Closed { reason }).await;
    }

    /// Fail a session that could not even be started.
    pub fn fail_now(self, message: impl Into<String>) {
        self.set_phase(ConnectionPhase::Closed);
        self.try_emit(SessionEvent::Error(message.into()));
        self.try_emit(SessionEvent::Closed {
            reason: CloseReason::HandshakeFailed,
        });
    }
}
