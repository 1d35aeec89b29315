//! Main TUI runner - entry point and event loop

use ratatui::DefaultTerminal;
use sentinel_app::{signals, Engine};
use sentinel_core::prelude::*;
use sentinel_transport::Transport;

use crate::{event, render, terminal};

/// Run the TUI until the user quits or a shutdown signal arrives.
///
/// Mounts the engine's session on entry and unmounts it on every exit
/// path, including errors from the terminal.
pub async fn run<T: Transport>(mut engine: Engine<T>) -> Result<()> {
    terminal::install_panic_hook();
    let mut term = ratatui::try_init().map_err(|e| Error::TerminalInit(e.to_string()))?;

    let signal_task = signals::spawn_signal_handler(engine.msg_sender());
    engine.mount();

    let result = run_loop(&mut term, &mut engine);

    engine.shutdown();
    signal_task.abort();
    ratatui::restore();

    if let Err(e) = &result {
        error!("TUI loop failed: {}", e);
    }
    result
}

/// Main event loop: drain, draw, poll.
fn run_loop<T: Transport>(term: &mut DefaultTerminal, engine: &mut Engine<T>) -> Result<()> {
    while !engine.should_quit() {
        engine.drain_pending_messages();
        engine.drain_session_events();

        term.draw(|frame| render::view(frame, &engine.state))?;

        if let Some(message) = event::poll()? {
            engine.process_message(message);
        }
    }
    info!("Quit requested");
    Ok(())
}
