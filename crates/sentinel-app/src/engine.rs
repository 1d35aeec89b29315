//! Engine - shared orchestration for the TUI and headless runners
//!
//! The Engine owns the presenter state, the injected [`Transport`], the one
//! [`Session`] opened at mount, and the unified message channel. Session
//! events and input messages are both funnelled through
//! [`Engine::process_message`], so `handler::update()` is the only writer of
//! the alert state.

use tokio::sync::mpsc::error::TryRecvError;
use tokio::sync::{broadcast, mpsc};

use sentinel_core::prelude::*;
use sentinel_core::{CloseReason, ConnectionPhase, Endpoint, SessionId};
use sentinel_transport::{Session, SessionEvent, Transport};

use crate::config::Settings;
use crate::engine_event::EngineEvent;
use crate::handler::{self, UpdateAction};
use crate::message::Message;
use crate::state::AppState;
use crate::view::AlertView;

const MESSAGE_CHANNEL_CAPACITY: usize = 256;
const EVENT_BROADCAST_CAPACITY: usize = 256;

/// Lightweight snapshot of state for change detection.
///
/// Captured before message processing, compared after to decide which
/// EngineEvents to emit.
#[derive(Debug, Clone, PartialEq)]
struct StateSnapshot {
    connection: ConnectionPhase,
    view: AlertView,
    last_error: Option<String>,
}

impl StateSnapshot {
    fn capture(state: &AppState) -> Self {
        Self {
            connection: state.connection,
            view: AlertView::from(&state.alert),
            last_error: state.last_error.clone(),
        }
    }
}

/// Which source `next_message` heard from first.
enum Next {
    Message(Option<Message>),
    Session(SessionId, Option<SessionEvent>),
}

/// Orchestration engine for Scam Sentinel.
pub struct Engine<T: Transport> {
    /// TEA application state (the Model)
    pub state: AppState,

    /// Sender half of the unified message channel.
    /// Clone this to give to input sources (signal handler, terminal).
    pub msg_tx: mpsc::Sender<Message>,

    /// Receiver half of the unified message channel.
    pub msg_rx: mpsc::Receiver<Message>,

    transport: T,
    endpoint: Endpoint,

    /// Session opened at mount; `None` before mount, after unmount, and
    /// once the session has reported `Closed`
    session: Option<Session>,

    event_tx: broadcast::Sender<EngineEvent>,
}

impl<T: Transport> Engine<T> {
    /// Create an unmounted engine. No connection is made until [`mount`](Self::mount).
    pub fn new(transport: T, endpoint: Endpoint, settings: Settings) -> Self {
        let mut state = AppState::with_settings(settings);
        state.endpoint = endpoint.to_string();

        let (msg_tx, msg_rx) = mpsc::channel::<Message>(MESSAGE_CHANNEL_CAPACITY);
        let (event_tx, _) = broadcast::channel(EVENT_BROADCAST_CAPACITY);

        Self {
            state,
            msg_tx,
            msg_rx,
            transport,
            endpoint,
            session: None,
            event_tx,
        }
    }

    /// Subscribe to engine events.
    ///
    /// Slow subscribers lose the oldest events (`RecvError::Lagged`).
    pub fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.event_tx.subscribe()
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn is_mounted(&self) -> bool {
        self.state.is_mounted()
    }

    /// Whether the session handle opened at mount is still held.
    pub fn has_session(&self) -> bool {
        self.session.is_some()
    }

    /// Open the one session this engine presents.
    ///
    /// Calling `mount` while mounted returns the current session id without
    /// opening another.
    pub fn mount(&mut self) -> SessionId {
        if let Some(session_id) = self.state.active_session {
            warn!("Engine already mounted with session {}", session_id);
            return session_id;
        }

        let session = self.transport.open(&self.endpoint);
        let session_id = session.id();
        info!("Mounted session {} for {}", session_id, self.endpoint);

        let pre = StateSnapshot::capture(&self.state);
        self.state.begin_session(session_id, self.endpoint.to_string());
        self.session = Some(session);

        self.emit(EngineEvent::ConnectionChanged {
            phase: self.state.connection,
            max_attempts: None,
            reason: None,
        });
        let post = StateSnapshot::capture(&self.state);
        if pre.view != post.view {
            self.emit(EngineEvent::ViewChanged(post.view));
        }
        session_id
    }

    /// Close the mounted session and stop applying its events.
    ///
    /// Safe to call repeatedly; only the first call after a mount does
    /// anything.
    pub fn unmount(&mut self) {
        let Some(session_id) = self.state.active_session else {
            return;
        };

        let pre = StateSnapshot::capture(&self.state);
        if let Some(mut session) = self.session.take() {
            session.close();
        }
        self.state.end_session();
        info!("Unmounted session {}", session_id);

        let post = StateSnapshot::capture(&self.state);
        self.emit_events(&pre, &post);
    }

    /// Unmount and tell subscribers the engine is done.
    pub fn shutdown(&mut self) {
        self.unmount();
        self.emit(EngineEvent::Shutdown);
    }

    /// Process a single message through the TEA update cycle.
    ///
    /// Follow-up messages are processed in the same cycle; EngineEvents are
    /// emitted from the before/after difference.
    pub fn process_message(&mut self, msg: Message) {
        let pre = StateSnapshot::capture(&self.state);

        let mut next = Some(msg);
        while let Some(msg) = next.take() {
            let result = handler::update(&mut self.state, msg);
            if let Some(action) = result.action {
                self.handle_action(action);
            }
            next = result.message;
        }

        let post = StateSnapshot::capture(&self.state);
        self.emit_events(&pre, &post);
    }

    /// Drain and process all pending messages from the channel.
    ///
    /// Returns the number of messages processed.
    pub fn drain_pending_messages(&mut self) -> usize {
        let mut count = 0;
        while let Ok(msg) = self.msg_rx.try_recv() {
            self.process_message(msg);
            count += 1;
        }
        count
    }

    /// Drain and process every event the session has buffered so far.
    ///
    /// Returns the number of events processed, including the `Closed`
    /// stand-in for a session whose driver vanished.
    pub fn drain_session_events(&mut self) -> usize {
        let mut count = 0;
        while let Some(session) = self.session.as_mut() {
            let session_id = session.id();
            match session.try_recv_event() {
                Ok(event) => {
                    self.process_message(Message::Session { session_id, event });
                    count += 1;
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    if let Some(msg) = self.session_stream_ended(session_id) {
                        self.process_message(msg);
                        count += 1;
                    }
                    break;
                }
            }
        }
        count
    }

    /// Wait for the next message from either the channel or the session.
    ///
    /// The returned message has not been processed yet. Returns `None` only
    /// if the message channel is closed and no session is held.
    pub async fn next_message(&mut self) -> Option<Message> {
        loop {
            let next = match self.session.as_mut() {
                Some(session) => {
                    let session_id = session.id();
                    tokio::select! {
                        msg = self.msg_rx.recv() => Next::Message(msg),
                        event = session.next_event() => Next::Session(session_id, event),
                    }
                }
                None => Next::Message(self.msg_rx.recv().await),
            };

            match next {
                Next::Message(msg) => return msg,
                Next::Session(session_id, Some(event)) => {
                    return Some(Message::Session { session_id, event })
                }
                Next::Session(session_id, None) => {
                    if let Some(msg) = self.session_stream_ended(session_id) {
                        return Some(msg);
                    }
                }
            }
        }
    }

    /// Get a clone of the message sender for spawning input sources.
    pub fn msg_sender(&self) -> mpsc::Sender<Message> {
        self.msg_tx.clone()
    }

    /// Check if the application should quit.
    pub fn should_quit(&self) -> bool {
        self.state.should_quit()
    }

    /// Render-ready projection of the current alert state.
    pub fn current_view(&self) -> AlertView {
        AlertView::from(&self.state.alert)
    }

    /// Drop a session whose event stream ended.
    ///
    /// A driver that goes away without reporting `Closed` (its task panicked
    /// or was cancelled) is treated as a transport failure, so the presenter
    /// still falls back to idle and the phase reaches `Closed`.
    fn session_stream_ended(&mut self, session_id: SessionId) -> Option<Message> {
        self.session = None;
        if self.state.connection.is_closed() {
            debug!("Session {} event stream ended", session_id);
            return None;
        }

        warn!(
            "Session {} event stream ended without a close, treating as transport error",
            session_id
        );
        Some(Message::Session {
            session_id,
            event: SessionEvent::Closed {
                reason: CloseReason::TransportError,
            },
        })
    }

    fn handle_action(&mut self, action: UpdateAction) {
        match action {
            UpdateAction::ReleaseSession { session_id } => {
                if self.session.as_ref().map(Session::id) == Some(session_id) {
                    debug!("Releasing closed session {}", session_id);
                    self.session = None;
                }
            }
        }
    }

    /// Emit EngineEvents based on state changes after processing.
    fn emit_events(&self, pre: &StateSnapshot, post: &StateSnapshot) {
        if pre.last_error != post.last_error {
            if let Some(message) = &post.last_error {
                self.emit(EngineEvent::TransportError {
                    message: message.clone(),
                });
            }
        }

        if pre.connection != post.connection {
            let max_attempts = match post.connection {
                ConnectionPhase::Reconnecting { .. } => self.state.reconnect_max_attempts,
                _ => None,
            };
            let reason: Option<CloseReason> = match post.connection {
                ConnectionPhase::Closed => self.state.close_reason,
                _ => None,
            };
            self.emit(EngineEvent::ConnectionChanged {
                phase: post.connection,
                max_attempts,
                reason,
            });
        }

        if pre.view != post.view {
            self.emit(EngineEvent::ViewChanged(post.view.clone()));
        }
    }

    /// Emit a single EngineEvent to all subscribers.
    ///
    /// Having no subscribers is not an error.
    fn emit(&self, event: EngineEvent) {
        let _ = self.event_tx.send(event);
    }
}

impl<T: Transport> Drop for Engine<T> {
    fn drop(&mut self) {
        self.unmount();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sentinel_core::{Alert, AppPhase, InboundMessage};
    use sentinel_transport::test_utils::{FakeDriverExt, FakeTransport};
    use sentinel_transport::SessionDriver;

    fn engine() -> Engine<FakeTransport> {
        Engine::new(
            FakeTransport::new(),
            Endpoint::reference().unwrap(),
            Settings::default(),
        )
    }

    fn mounted() -> (Engine<FakeTransport>, SessionDriver) {
        let mut engine = engine();
        engine.mount();
        let driver = engine.transport().take_driver().unwrap();
        (engine, driver)
    }

    fn warning(text: &str, reasoning: &str) -> InboundMessage {
        InboundMessage::Warning(Alert::new(text, reasoning))
    }

    fn drain_events(rx: &mut broadcast::Receiver<EngineEvent>) -> Vec<EngineEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    #[test]
    fn test_new_engine_is_unmounted() {
        let engine = engine();
        assert!(!engine.is_mounted());
        assert!(!engine.should_quit());
        assert_eq!(engine.transport().open_count(), 0);
        assert_eq!(engine.current_view(), AlertView::Listening);
    }

    #[test]
    fn test_mount_opens_exactly_one_session() {
        let mut engine = engine();

        let first = engine.mount();
        let second = engine.mount();

        assert_eq!(first, second);
        assert_eq!(engine.transport().open_count(), 1);
        assert_eq!(
            engine.transport().opened_endpoints(),
            vec![Endpoint::reference().unwrap()]
        );
        assert_eq!(engine.state.phase, AppPhase::Running);
    }

    #[test]
    fn test_mount_then_unmount_closes_session() {
        let (mut engine, mut driver) = mounted();

        engine.unmount();
        engine.unmount();

        assert!(driver.is_close_requested());
        assert!(!engine.is_mounted());
        assert_eq!(engine.transport().open_count(), 1);
    }

    #[test]
    fn test_no_updates_after_unmount() {
        let (mut engine, driver) = mounted();
        let session_id = driver.id();
        engine.unmount();

        // The session handle is gone, so the transport can no longer deliver
        driver.send_message(warning("late", "late"));
        assert_eq!(engine.drain_session_events(), 0);

        // An event that was already queued before unmount is stale
        engine
            .msg_tx
            .try_send(Message::Session {
                session_id,
                event: SessionEvent::Message(warning("queued", "queued")),
            })
            .unwrap();
        assert_eq!(engine.drain_pending_messages(), 1);

        assert_eq!(engine.current_view(), AlertView::Listening);
    }

    #[test]
    fn test_drop_closes_session() {
        let (engine, mut driver) = mounted();
        drop(engine);
        assert!(driver.is_close_requested());
    }

    #[test]
    fn test_wire_transfer_alert_is_presented() {
        let (mut engine, driver) = mounted();

        driver.send_opened();
        driver.send_message(warning(
            "You must wire $5000 immediately",
            "Urgency + financial request pattern",
        ));

        assert_eq!(engine.drain_session_events(), 2);
        assert_eq!(
            engine.current_view(),
            AlertView::Alert {
                detected_text: "You must wire $5000 immediately".to_string(),
                reasoning: "Urgency + financial request pattern".to_string(),
            }
        );
    }

    #[test]
    fn test_heartbeat_keeps_listening() {
        let (mut engine, driver) = mounted();
        driver.send_opened();
        driver.send_message(InboundMessage::Other {
            kind: "heartbeat".into(),
        });

        engine.drain_session_events();

        assert_eq!(engine.current_view(), AlertView::Listening);
        assert_eq!(engine.state.connection, ConnectionPhase::Open);
    }

    #[test]
    fn test_latest_alert_wins() {
        let (mut engine, driver) = mounted();
        driver.send_message(warning("M1", "first"));
        driver.send_message(warning("M2", "second"));

        engine.drain_session_events();

        assert_eq!(
            engine.current_view(),
            AlertView::Alert {
                detected_text: "M2".to_string(),
                reasoning: "second".to_string(),
            }
        );
    }

    #[test]
    fn test_unexpected_close_while_idle() {
        let (mut engine, driver) = mounted();
        driver.send_opened();
        driver.send_closed(CloseReason::Remote);

        engine.drain_session_events();

        assert_eq!(engine.current_view(), AlertView::Listening);
        assert_eq!(engine.state.connection, ConnectionPhase::Closed);
        assert!(!engine.has_session());
        // Still mounted: one session per mount, no new one is opened
        assert!(engine.is_mounted());
        assert_eq!(engine.transport().open_count(), 1);
    }

    #[test]
    fn test_transport_error_clears_alert() {
        let (mut engine, driver) = mounted();
        driver.send_opened();
        driver.send_message(warning("text", "reason"));
        driver.send_error("connection reset by peer");
        driver.send_closed(CloseReason::TransportError);

        engine.drain_session_events();

        assert_eq!(engine.current_view(), AlertView::Listening);
        assert_eq!(
            engine.state.last_error.as_deref(),
            Some("connection reset by peer")
        );
    }

    #[test]
    fn test_engine_events_follow_state_changes() {
        let mut engine = engine();
        let mut rx = engine.subscribe();

        engine.mount();
        let driver = engine.transport().take_driver().unwrap();
        driver.send_opened();
        driver.send_message(warning("text", "reason"));
        driver.send_message(InboundMessage::Other {
            kind: "heartbeat".into(),
        });
        driver.send_closed(CloseReason::Remote);
        engine.drain_session_events();

        assert_eq!(
            drain_events(&mut rx),
            vec![
                EngineEvent::ConnectionChanged {
                    phase: ConnectionPhase::Connecting,
                    max_attempts: None,
                    reason: None,
                },
                EngineEvent::ConnectionChanged {
                    phase: ConnectionPhase::Open,
                    max_attempts: None,
                    reason: None,
                },
                EngineEvent::ViewChanged(AlertView::Alert {
                    detected_text: "text".to_string(),
                    reasoning: "reason".to_string(),
                }),
                EngineEvent::ConnectionChanged {
                    phase: ConnectionPhase::Closed,
                    max_attempts: None,
                    reason: Some(CloseReason::Remote),
                },
                EngineEvent::ViewChanged(AlertView::Listening),
            ]
        );
    }

    #[test]
    fn test_reconnecting_event_carries_budget() {
        let (mut engine, driver) = mounted();
        let mut rx = engine.subscribe();
        driver.try_emit(SessionEvent::Reconnecting {
            attempt: 1,
            max_attempts: 4,
        });

        engine.drain_session_events();

        assert_eq!(
            drain_events(&mut rx),
            vec![EngineEvent::ConnectionChanged {
                phase: ConnectionPhase::Reconnecting { attempt: 1 },
                max_attempts: Some(4),
                reason: None,
            }]
        );
    }

    #[test]
    fn test_shutdown_emits_closed_then_shutdown() {
        let (mut engine, _driver) = mounted();
        let mut rx = engine.subscribe();

        engine.shutdown();

        assert_eq!(
            drain_events(&mut rx),
            vec![
                EngineEvent::ConnectionChanged {
                    phase: ConnectionPhase::Closed,
                    max_attempts: None,
                    reason: Some(CloseReason::Requested),
                },
                EngineEvent::Shutdown,
            ]
        );
    }

    #[test]
    fn test_quit_message() {
        let mut engine = engine();
        engine.process_message(Message::Quit);
        assert!(engine.should_quit());
    }

    #[test]
    fn test_next_message_waits_for_session() {
        let (mut engine, driver) = mounted();
        let mut next = tokio_test::task::spawn(engine.next_message());

        tokio_test::assert_pending!(next.poll());
        driver.send_opened();

        assert!(next.is_woken());
        let msg = tokio_test::assert_ready!(next.poll());
        assert!(matches!(
            msg,
            Some(Message::Session {
                event: SessionEvent::Opened,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_next_message_prefers_available_source() {
        let (mut engine, driver) = mounted();
        driver.send_opened();

        let msg = engine.next_message().await;
        assert!(matches!(
            msg,
            Some(Message::Session {
                event: SessionEvent::Opened,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_next_message_reports_driver_loss_as_close() {
        let (mut engine, driver) = mounted();
        driver.send_opened();
        driver.send_message(warning("text", "reason"));
        drop(driver);

        while engine.has_session() {
            let msg = engine.next_message().await.unwrap();
            engine.process_message(msg);
        }

        assert_eq!(engine.state.connection, ConnectionPhase::Closed);
        assert_eq!(engine.state.close_reason, Some(CloseReason::TransportError));
        assert_eq!(engine.current_view(), AlertView::Listening);

        // The channel keeps working once the session is gone
        engine.msg_sender().send(Message::Quit).await.unwrap();
        assert!(matches!(engine.next_message().await, Some(Message::Quit)));
    }

    #[test]
    fn test_drain_reports_driver_loss_as_close() {
        let (mut engine, driver) = mounted();
        let mut rx = engine.subscribe();
        driver.send_opened();
        driver.send_message(warning("text", "reason"));
        drop(driver);

        assert_eq!(engine.drain_session_events(), 3);

        assert!(!engine.has_session());
        assert_eq!(engine.current_view(), AlertView::Listening);
        assert_eq!(
            drain_events(&mut rx),
            vec![
                EngineEvent::ConnectionChanged {
                    phase: ConnectionPhase::Open,
                    max_attempts: None,
                    reason: None,
                },
                EngineEvent::ViewChanged(AlertView::Alert {
                    detected_text: "text".to_string(),
                    reasoning: "reason".to_string(),
                }),
                EngineEvent::ConnectionChanged {
                    phase: ConnectionPhase::Closed,
                    max_attempts: None,
                    reason: Some(CloseReason::TransportError),
                },
                EngineEvent::ViewChanged(AlertView::Listening),
            ]
        );
    }

    #[test]
    fn test_driver_loss_after_close_adds_nothing() {
        let (mut engine, driver) = mounted();
        driver.send_opened();
        driver.send_closed(CloseReason::Remote);
        drop(driver);

        assert_eq!(engine.drain_session_events(), 2);
        assert_eq!(engine.state.close_reason, Some(CloseReason::Remote));
    }
}
