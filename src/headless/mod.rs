//! Headless mode - JSON event output for scripting and E2E testing
//!
//! Instead of drawing the alert panel, headless mode writes one structured
//! JSON event per presenter change to stdout. Scripts can follow the alert
//! state without parsing ANSI escape codes.
//!
//! # Event Format
//!
//! Events are output as NDJSON (newline-delimited JSON), one event per line.
//! Each event has an "event" field indicating its type and a "timestamp" in
//! epoch milliseconds.
//!
//! # Example Output
//!
//! ```json
//! {"event":"connecting","endpoint":"ws://127.0.0.1:8765/","timestamp":1704700001000}
//! {"event":"connected","endpoint":"ws://127.0.0.1:8765/","timestamp":1704700001020}
//! {"event":"alert","text":"You must wire $5000 immediately","reasoning":"Urgency + financial request pattern","timestamp":1704700004000}
//! {"event":"disconnected","reason":"remote_closed","timestamp":1704700009000}
//! {"event":"idle","timestamp":1704700009000}
//! ```

pub mod runner;

use std::io::{self, Write};

use chrono::Utc;
use serde::Serialize;
use tracing::error;

use sentinel_app::{AlertView, EngineEvent};
use sentinel_core::ConnectionPhase;

/// Events emitted in headless mode
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum HeadlessEvent {
    /// Session opened; handshake in progress
    Connecting { endpoint: String, timestamp: i64 },

    /// Handshake complete
    Connected { endpoint: String, timestamp: i64 },

    /// The backend flagged an utterance
    Alert {
        text: String,
        reasoning: String,
        timestamp: i64,
    },

    /// Back to the listening indicator
    Idle { timestamp: i64 },

    /// Connection lost, retry scheduled
    Reconnecting {
        attempt: u32,
        max_attempts: Option<u32>,
        timestamp: i64,
    },

    /// Session closed
    Disconnected {
        reason: Option<String>,
        timestamp: i64,
    },

    /// Error occurred
    Error {
        message: String,
        fatal: bool,
        timestamp: i64,
    },
}

impl HeadlessEvent {
    /// Emit this event to stdout as JSON
    pub fn emit(&self) {
        let mut stdout = io::stdout().lock();
        self.write_to(&mut stdout);
    }

    /// Write this event as one NDJSON line and flush.
    ///
    /// Failures are logged, never returned: a broken pipe must not take the
    /// session down with it.
    pub fn write_to<W: Write>(&self, out: &mut W) {
        let json = match serde_json::to_string(self) {
            Ok(json) => json,
            Err(e) => {
                error!("Failed to serialize headless event: {}", e);
                return;
            }
        };

        if let Err(e) = writeln!(out, "{}", json) {
            error!("Failed to write headless event: {}", e);
            return;
        }

        // Flush to ensure immediate output
        if let Err(e) = out.flush() {
            error!("Failed to flush headless output: {}", e);
        }
    }

    /// Get current timestamp in milliseconds
    fn now() -> i64 {
        Utc::now().timestamp_millis()
    }

    /// Translate an engine event into its headless line, if it has one.
    pub fn from_engine_event(event: &EngineEvent, endpoint: &str) -> Option<Self> {
        match event {
            EngineEvent::ConnectionChanged {
                phase,
                max_attempts,
                reason,
            } => Some(match phase {
                ConnectionPhase::Connecting => Self::connecting(endpoint),
                ConnectionPhase::Open => Self::connected(endpoint),
                ConnectionPhase::Reconnecting { attempt } => {
                    Self::reconnecting(*attempt, *max_attempts)
                }
                ConnectionPhase::Closed => {
                    Self::disconnected(reason.map(|r| r.as_str().to_string()))
                }
            }),
            EngineEvent::ViewChanged(AlertView::Alert {
                detected_text,
                reasoning,
            }) => Some(Self::alert(detected_text, reasoning)),
            EngineEvent::ViewChanged(AlertView::Listening) => Some(Self::idle()),
            EngineEvent::TransportError { message } => Some(Self::error(message, false)),
            EngineEvent::Shutdown => None,
        }
    }

    // ─────────────────────────────────────────────────────────
    // Convenience constructors
    // ─────────────────────────────────────────────────────────

    pub fn connecting(endpoint: &str) -> Self {
        Self::Connecting {
            endpoint: endpoint.to_string(),
            timestamp: Self::now(),
        }
    }

    pub fn connected(endpoint: &str) -> Self {
        Self::Connected {
            endpoint: endpoint.to_string(),
            timestamp: Self::now(),
        }
    }

    pub fn alert(text: &str, reasoning: &str) -> Self {
        Self::Alert {
            text: text.to_string(),
            reasoning: reasoning.to_string(),
            timestamp: Self::now(),
        }
    }

    pub fn idle() -> Self {
        Self::Idle {
            timestamp: Self::now(),
        }
    }

    pub fn reconnecting(attempt: u32, max_attempts: Option<u32>) -> Self {
        Self::Reconnecting {
            attempt,
            max_attempts,
            timestamp: Self::now(),
        }
    }

    pub fn disconnected(reason: Option<String>) -> Self {
        Self::Disconnected {
            reason,
            timestamp: Self::now(),
        }
    }

    pub fn error(message: &str, fatal: bool) -> Self {
        Self::Error {
            message: message.to_string(),
            fatal,
            timestamp: Self::now(),
        }
    }
}
