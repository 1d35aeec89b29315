//! Application state (Model in TEA pattern)

use sentinel_core::{AlertState, AppPhase, CloseReason, ConnectionPhase, SessionId};

use crate::config::Settings;

/// Complete application state (the Model in TEA)
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application lifecycle phase
    pub phase: AppPhase,

    /// Latest alert pushed by the backend, or idle
    pub alert: AlertState,

    /// Phase of the mounted session as seen through its events
    pub connection: ConnectionPhase,

    /// Session whose events are applied. `None` while unmounted.
    pub active_session: Option<SessionId>,

    /// Display form of the configured endpoint
    pub endpoint: String,

    /// Most recent transport error of the active session
    pub last_error: Option<String>,

    /// Why the active session closed, once it has
    pub close_reason: Option<CloseReason>,

    /// Retry budget announced by the last `Reconnecting` event
    pub reconnect_max_attempts: Option<u32>,

    pub settings: Settings,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::with_settings(Settings::default())
    }

    pub fn with_settings(settings: Settings) -> Self {
        Self {
            phase: AppPhase::Initializing,
            alert: AlertState::Idle,
            connection: ConnectionPhase::Connecting,
            active_session: None,
            endpoint: String::new(),
            last_error: None,
            close_reason: None,
            reconnect_max_attempts: None,
            settings,
        }
    }

    pub fn should_quit(&self) -> bool {
        self.phase == AppPhase::Quitting
    }

    pub fn is_mounted(&self) -> bool {
        self.active_session.is_some()
    }

    pub fn is_active_session(&self, session_id: SessionId) -> bool {
        self.active_session == Some(session_id)
    }

    /// Start presenting a freshly opened session.
    pub fn begin_session(&mut self, session_id: SessionId, endpoint: impl Into<String>) {
        self.active_session = Some(session_id);
        self.endpoint = endpoint.into();
        self.alert = AlertState::Idle;
        self.connection = ConnectionPhase::Connecting;
        self.last_error = None;
        self.close_reason = None;
        self.reconnect_max_attempts = None;
        if self.phase == AppPhase::Initializing {
            self.phase = AppPhase::Running;
        }
    }

    /// Stop presenting. The alert is discarded and later events are ignored.
    pub fn end_session(&mut self) {
        self.active_session = None;
        self.alert = AlertState::Idle;
        self.connection = ConnectionPhase::Closed;
        if self.close_reason.is_none() {
            self.close_reason = Some(CloseReason::Requested);
        }
    }
}
