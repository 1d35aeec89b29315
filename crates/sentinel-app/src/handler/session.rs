//! Session event handling
//!
//! Applies transport events of the active session to the presenter state.
//! Events tagged with any other session id arrive after that session was
//! unmounted or replaced and are dropped.

use sentinel_core::prelude::*;
use sentinel_core::{ConnectionPhase, InboundMessage, SessionId};
use sentinel_transport::SessionEvent;

use crate::state::AppState;

use super::{UpdateAction, UpdateResult};

pub fn handle_session_event(
    state: &mut AppState,
    session_id: SessionId,
    event: SessionEvent,
) -> UpdateResult {
    if !state.is_active_session(session_id) {
        debug!(
            "Ignoring {} event from inactive session {}",
            event_name(&event),
            session_id
        );
        return UpdateResult::none();
    }

    match event {
        SessionEvent::Opened => {
            info!("Connected to {}", state.endpoint);
            state.connection = ConnectionPhase::Open;
            state.last_error = None;
            state.reconnect_max_attempts = None;
            UpdateResult::none()
        }

        SessionEvent::Message(message) => {
            handle_inbound_message(state, &message);
            UpdateResult::none()
        }

        SessionEvent::Error(message) => {
            warn!("Session {}: {}", session_id, message);
            state.last_error = Some(message);
            state.alert.clear();
            UpdateResult::none()
        }

        SessionEvent::Reconnecting {
            attempt,
            max_attempts,
        } => {
            info!("Reconnecting ({}/{})", attempt, max_attempts);
            state.connection = ConnectionPhase::Reconnecting { attempt };
            state.reconnect_max_attempts = Some(max_attempts);
            state.last_error = None;
            state.alert.clear();
            UpdateResult::none()
        }

        SessionEvent::Closed { reason } => {
            if reason.is_failure() {
                info!("Disconnected from {} ({})", state.endpoint, reason);
            } else {
                debug!("Session {} closed ({})", session_id, reason);
            }
            state.connection = ConnectionPhase::Closed;
            state.close_reason = Some(reason);
            state.alert.clear();
            UpdateResult::action(UpdateAction::ReleaseSession { session_id })
        }
    }
}

fn handle_inbound_message(state: &mut AppState, message: &InboundMessage) {
    match message {
        InboundMessage::Warning(alert) => {
            state.alert.apply(message);
            info!("Scam alert: {:?}", alert.detected_text);
        }
        InboundMessage::Other { kind } => {
            trace!("Ignoring message of type '{}'", kind);
        }
    }
}

fn event_name(event: &SessionEvent) -> &'static str {
    match event {
        SessionEvent::Opened => "opened",
        SessionEvent::Message(_) => "message",
        SessionEvent::Error(_) => "error",
        SessionEvent::Reconnecting { .. } => "reconnecting",
        SessionEvent::Closed { .. } => "closed",
    }
}
