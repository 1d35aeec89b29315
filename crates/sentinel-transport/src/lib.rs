//! # sentinel-transport - Backend Connection Management
//!
//! Owns the transport session to the monitoring backend: opening it, decoding
//! pushed frames, publishing typed lifecycle events, optional supervised
//! reconnection, and deterministic teardown.
//!
//! Depends on [`sentinel_core`] for domain types and error handling.
//!
//! ## Public API
//!
//! ### Sessions
//! - [`Transport`] - Session factory injected into the presenter
//! - [`Session`] - Owner-side handle (events, phase, idempotent close, close on drop)
//! - [`SessionDriver`] - Transport-side half used by implementations
//! - [`SessionEvent`] - Opened / Message / Error / Reconnecting / Closed
//!
//! ### WebSocket
//! - [`WebSocketTransport`] - tokio-tungstenite implementation
//! - [`ReconnectPolicy`] - Opt-in retry with exponential backoff
//!
//! ### Protocol
//! - [`decode_message()`] - Decode one text frame into an [`InboundMessage`](sentinel_core::InboundMessage)
//! - [`DecodeError`] - Why a frame was dropped

pub mod protocol;
pub mod reconnect;
pub mod session;
#[cfg(any(test, feature = "test-helpers"))]
pub mod test_utils;
pub mod websocket;

// Public API re-exports
pub use protocol::{decode_message, DecodeError};
pub use reconnect::{ReconnectPolicy, INITIAL_BACKOFF, MAX_BACKOFF, MAX_RECONNECT_ATTEMPTS};
pub use session::{Session, SessionDriver, SessionEvent, Transport, EVENT_CHANNEL_CAPACITY};
pub use websocket::WebSocketTransport;
