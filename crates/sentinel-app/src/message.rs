//! Message types for the application (TEA pattern)

use crate::input_key::InputKey;
use sentinel_core::SessionId;
use sentinel_transport::SessionEvent;

/// All possible messages/actions in the application
#[derive(Debug, Clone)]
pub enum Message {
    /// Keyboard event from the terminal
    Key(InputKey),

    /// Tick event for periodic updates
    Tick,

    /// Request to quit (signal handler, `q`, Esc, Ctrl+C)
    Quit,

    /// Lifecycle or data event from a transport session, tagged with the
    /// session it came from so stale sessions can be ignored
    Session {
        session_id: SessionId,
        event: SessionEvent,
    },
}
