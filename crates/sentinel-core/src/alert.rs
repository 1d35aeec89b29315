//! Alert domain model
//!
//! The client only ever holds the most recent alert. [`AlertState`] is a
//! single slot that is either idle or holds one complete [`Alert`]; it is
//! replaced wholesale, never merged, and keeps no history.

use serde::Serialize;

/// Discriminator value the backend uses for scam warnings.
pub const WARNING_KIND: &str = "warning";

/// A flagged utterance and the backend's explanation for flagging it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Alert {
    /// The transcribed text that was classified as suspicious.
    pub detected_text: String,
    /// Free-form rationale, kept verbatim (may be empty, may span lines).
    pub reasoning: String,
}

impl Alert {
    pub fn new(detected_text: impl Into<String>, reasoning: impl Into<String>) -> Self {
        Self {
            detected_text: detected_text.into(),
            reasoning: reasoning.into(),
        }
    }
}

/// A decoded message from the backend.
///
/// Transient: produced by the transport's decoder, applied to [`AlertState`],
/// then dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundMessage {
    /// `type == "warning"` with both `text` and `reasoning` present.
    Warning(Alert),
    /// Any other discriminator. Ignored by the presenter so the backend can
    /// add message kinds without breaking older clients.
    Other { kind: String },
}

impl InboundMessage {
    /// The wire discriminator this message was decoded from.
    pub fn kind(&self) -> &str {
        match self {
            InboundMessage::Warning(_) => WARNING_KIND,
            InboundMessage::Other { kind } => kind,
        }
    }
}

/// Latest-known alert state held by the presenter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AlertState {
    /// No alert; the view shows the listening indicator.
    #[default]
    Idle,
    /// The most recent warning received.
    Alert(Alert),
}

impl AlertState {
    pub fn is_present(&self) -> bool {
        matches!(self, AlertState::Alert(_))
    }

    pub fn alert(&self) -> Option<&Alert> {
        match self {
            AlertState::Alert(alert) => Some(alert),
            AlertState::Idle => None,
        }
    }

    /// Apply a decoded message. Warnings replace the slot (last write wins);
    /// every other kind leaves it untouched.
    ///
    /// Returns `true` if the state was replaced.
    pub fn apply(&mut self, message: &InboundMessage) -> bool {
        match message {
            InboundMessage::Warning(alert) => {
                *self = AlertState::Alert(alert.clone());
                true
            }
            InboundMessage::Other { .. } => false,
        }
    }

    /// Drop back to idle.
    pub fn clear(&mut self) {
        *self = AlertState::Idle;
    }
}
