//! Test helpers: an in-memory [`Transport`] whose sessions are driven by hand.
//!
//! Available to this crate's tests and, via the `test-helpers` feature, to
//! downstream crates.

use std::sync::{Arc, Mutex};

use sentinel_core::{CloseReason, ConnectionPhase, Endpoint, InboundMessage};

use crate::session::{Session, SessionDriver, SessionEvent, Transport};

/// Transport that performs no I/O. Every `open` records the driver so the
/// test can inject events and inspect close requests.
#[derive(Clone, Default)]
pub struct FakeTransport {
    drivers: Arc<Mutex<Vec<SessionDriver>>>,
    endpoints: Arc<Mutex<Vec<Endpoint>>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of sessions opened so far.
    pub fn open_count(&self) -> usize {
        self.endpoints.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Endpoints passed to `open`, in order.
    pub fn opened_endpoints(&self) -> Vec<Endpoint> {
        self.endpoints
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Take the driver of the most recently opened session.
    pub fn take_driver(&self) -> Option<SessionDriver> {
        self.drivers.lock().unwrap_or_else(|e| e.into_inner()).pop()
    }
}

impl Transport for FakeTransport {
    fn open(&self, endpoint: &Endpoint) -> Session {
        let (session, driver) = Session::pair(endpoint.clone());
        self.endpoints
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(endpoint.clone());
        self.drivers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(driver);
        session
    }
}

/// Synchronous conveniences for scripting a fake session.
pub trait FakeDriverExt {
    fn send_opened(&self);
    fn send_message(&self, message: InboundMessage);
    fn send_error(&self, message: &str);
    fn send_closed(&self, reason: CloseReason);
}

impl FakeDriverExt for SessionDriver {
    fn send_opened(&self) {
        self.set_phase(ConnectionPhase::Open);
        self.try_emit(SessionEvent::Opened);
    }

    fn send_message(&self, message: InboundMessage) {
        self.try_emit(SessionEvent::Message(message));
    }

    fn send_error(&self, message: &str) {
        self.try_emit(SessionEvent::Error(message.to_string()));
    }

    fn send_closed(&self, reason: CloseReason) {
        self.set_phase(ConnectionPhase::Closed);
        self.try_emit(SessionEvent::Closed { reason });
    }
}
