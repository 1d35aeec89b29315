//! Connection lifecycle types shared by the transport and the presenter

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use url::Url;

use crate::error::{Error, Result};

/// Host of the reference backend deployment.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Port of the reference backend deployment.
pub const DEFAULT_PORT: u16 = 8765;

// ---------------------------------------------------------------------------
// SessionId
// ---------------------------------------------------------------------------

/// Global monotonically-increasing counter for session IDs.
static SESSION_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Process-unique identifier of one transport session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(u64);

impl SessionId {
    /// Allocate the next session ID.
    pub fn next() -> Self {
        Self(SESSION_ID_COUNTER.fetch_add(1, Ordering::SeqCst))
    }

    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// ConnectionPhase
// ---------------------------------------------------------------------------

/// Lifecycle phase of a transport session.
///
/// `Connecting → Open → Closed`, or `Connecting → Closed` when the handshake
/// fails. `Closed` is terminal for a session. `Reconnecting` is only entered
/// when a reconnect policy is enabled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConnectionPhase {
    /// Handshake in progress.
    #[default]
    Connecting,
    /// Handshake complete; frames are flowing.
    Open,
    /// Connection lost; waiting to retry.
    Reconnecting {
        /// The current reconnection attempt number (1-indexed).
        attempt: u32,
    },
    /// Terminal: closed on request, by the peer, or after a failure.
    Closed,
}

impl ConnectionPhase {
    pub fn is_open(&self) -> bool {
        matches!(self, ConnectionPhase::Open)
    }

    pub fn is_closed(&self) -> bool {
        matches!(self, ConnectionPhase::Closed)
    }

    /// Short human-readable label for status displays.
    pub fn label(&self) -> String {
        match self {
            ConnectionPhase::Connecting => "Connecting".to_string(),
            ConnectionPhase::Open => "Connected".to_string(),
            ConnectionPhase::Reconnecting { attempt } => format!("Reconnecting ({attempt})"),
            ConnectionPhase::Closed => "Disconnected".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// CloseReason
// ---------------------------------------------------------------------------

/// Why a session reached [`ConnectionPhase::Closed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    /// The owner called `close()` or dropped the session.
    Requested,
    /// The backend sent a Close frame or ended the stream.
    Remote,
    /// A read error on an open connection.
    TransportError,
    /// The connection could never be established.
    HandshakeFailed,
    /// The reconnect policy gave up.
    RetriesExhausted,
}

impl CloseReason {
    /// `true` for every reason except an explicit close by the owner.
    pub fn is_failure(&self) -> bool {
        !matches!(self, CloseReason::Requested)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CloseReason::Requested => "requested",
            CloseReason::Remote => "remote_closed",
            CloseReason::TransportError => "transport_error",
            CloseReason::HandshakeFailed => "handshake_failed",
            CloseReason::RetriesExhausted => "retries_exhausted",
        }
    }
}

impl fmt::Display for CloseReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Endpoint
// ---------------------------------------------------------------------------

/// A validated WebSocket address of the monitoring backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    url: Url,
}

impl Endpoint {
    /// Parse a full `ws://` or `wss://` URL.
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        let url = Url::parse(trimmed)
            .map_err(|e| Error::invalid_endpoint(trimmed, e.to_string()))?;

        match url.scheme() {
            "ws" | "wss" => {}
            other => {
                return Err(Error::invalid_endpoint(
                    trimmed,
                    format!("unsupported scheme '{other}', expected ws or wss"),
                ))
            }
        }

        if url.host_str().map(str::is_empty).unwrap_or(true) {
            return Err(Error::invalid_endpoint(trimmed, "missing host"));
        }

        Ok(Self { url })
    }

    /// Build a plain `ws://` endpoint from its parts.
    pub fn from_parts(host: &str, port: u16, path: &str) -> Result<Self> {
        let host = host.trim();
        if host.is_empty() {
            return Err(Error::invalid_endpoint("", "missing host"));
        }

        // Bare IPv6 literals need brackets inside a URL
        let host = if host.contains(':') && !host.starts_with('[') {
            format!("[{host}]")
        } else {
            host.to_string()
        };

        let path = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{path}")
        };

        Self::parse(&format!("ws://{host}:{port}{path}"))
    }

    /// The reference deployment, `ws://127.0.0.1:8765`.
    pub fn reference() -> Result<Self> {
        Self::from_parts(DEFAULT_HOST, DEFAULT_PORT, "/")
    }

    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn host(&self) -> &str {
        self.url.host_str().unwrap_or_default()
    }

    /// Explicit port, or the scheme default (80 for ws, 443 for wss).
    pub fn port(&self) -> Option<u16> {
        self.url.port_or_known_default()
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url.as_str())
    }
}
