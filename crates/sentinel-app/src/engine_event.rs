//! Domain events emitted by the Engine for external consumers
//!
//! Events are broadcast after each message processing cycle via
//! `Engine::subscribe()`. The headless runner turns them into NDJSON.

use sentinel_core::{CloseReason, ConnectionPhase};

use crate::view::AlertView;

/// Domain events emitted by the Engine for external consumers.
///
/// Derived from before/after state snapshots, so one is emitted only when
/// the connection phase, the projected view, or the last error changes.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// Connection phase of the mounted session changed
    ConnectionChanged {
        phase: ConnectionPhase,
        /// Set when `phase` is `Reconnecting`
        max_attempts: Option<u32>,
        /// Set when `phase` is `Closed`
        reason: Option<CloseReason>,
    },

    /// The projected view changed (alert arrived, replaced, or cleared)
    ViewChanged(AlertView),

    /// The active session reported a transport error
    TransportError { message: String },

    /// The engine unmounted and is shutting down
    Shutdown,
}
