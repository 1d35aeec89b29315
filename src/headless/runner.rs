//! Headless mode runner - main event loop without TUI
//!
//! Mounts the engine's session, feeds session events and shutdown signals
//! through the engine, and writes a [`HeadlessEvent`] line for every engine
//! event. Exits when a quit is requested or the session has closed for good.

use std::io::{self, Write};

use tokio::sync::broadcast::{self, error::TryRecvError};

use sentinel_app::{signals, Engine, EngineEvent};
use sentinel_core::prelude::*;
use sentinel_transport::Transport;

use super::HeadlessEvent;

/// Run in headless mode - output JSON events to stdout instead of the TUI
pub async fn run_headless<T: Transport>(engine: Engine<T>) -> Result<()> {
    let mut stdout = io::stdout();
    run_with_writer(engine, &mut stdout).await
}

/// Headless loop writing NDJSON to `out`.
pub async fn run_with_writer<T: Transport, W: Write>(
    mut engine: Engine<T>,
    out: &mut W,
) -> Result<()> {
    info!("Headless mode on {}", engine.endpoint());

    let endpoint = engine.endpoint().to_string();
    let mut events = engine.subscribe();
    let signal_task = signals::spawn_signal_handler(engine.msg_sender());

    engine.mount();
    flush_events(&mut events, &endpoint, out);

    let result = headless_event_loop(&mut engine, &mut events, &endpoint, out).await;

    engine.shutdown();
    flush_events(&mut events, &endpoint, out);
    signal_task.abort();

    info!("Headless mode exiting");
    result
}

/// Main headless event loop
async fn headless_event_loop<T: Transport, W: Write>(
    engine: &mut Engine<T>,
    events: &mut broadcast::Receiver<EngineEvent>,
    endpoint: &str,
    out: &mut W,
) -> Result<()> {
    loop {
        if engine.should_quit() {
            info!("Quit requested");
            break;
        }

        // One session per mount: once it is closed and released there is
        // nothing left to report
        if engine.state.connection.is_closed() && !engine.has_session() {
            info!("Session closed, nothing left to present");
            break;
        }

        match engine.next_message().await {
            Some(msg) => {
                engine.process_message(msg);
                flush_events(events, endpoint, out);
            }
            None => {
                error!("Message channel closed");
                return Err(Error::ChannelClosed);
            }
        }
    }

    Ok(())
}

/// Write every engine event received so far.
fn flush_events<W: Write>(
    events: &mut broadcast::Receiver<EngineEvent>,
    endpoint: &str,
    out: &mut W,
) {
    loop {
        match events.try_recv() {
            Ok(event) => {
                if let Some(line) = HeadlessEvent::from_engine_event(&event, endpoint) {
                    line.write_to(out);
                }
            }
            Err(TryRecvError::Lagged(skipped)) => {
                warn!("Headless output lagged, skipped {} events", skipped);
            }
            Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
        }
    }
}
