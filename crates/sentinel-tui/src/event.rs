//! Terminal event polling

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use sentinel_app::input_key::InputKey;
use sentinel_app::message::Message;
use sentinel_core::prelude::*;
use std::time::Duration;

/// Poll interval; a timeout becomes a `Tick`.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Convert crossterm KeyEvent to InputKey
pub fn key_event_to_input(key: crossterm::event::KeyEvent) -> InputKey {
    match key.code {
        KeyCode::Char(c) if key.modifiers.contains(KeyModifiers::CONTROL) => {
            InputKey::CharCtrl(c)
        }
        KeyCode::Char(c) => InputKey::Char(c),
        KeyCode::Esc => InputKey::Esc,
        _ => InputKey::Other,
    }
}

/// Poll for terminal events with timeout
pub fn poll() -> Result<Option<Message>> {
    if !event::poll(POLL_INTERVAL)? {
        return Ok(Some(Message::Tick));
    }

    match event::read()? {
        Event::Key(key) if key.kind == KeyEventKind::Press => {
            Ok(Some(Message::Key(key_event_to_input(key))))
        }
        // Resize is picked up by the next draw
        _ => Ok(None),
    }
}
