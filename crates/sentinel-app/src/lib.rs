//! sentinel-app - Alert presenter state and orchestration for Scam Sentinel
//!
//! This crate implements the TEA (The Elm Architecture) pattern for the alert
//! presenter: a single `update()` writer over [`AppState`], an [`Engine`] that
//! mounts and unmounts the backend session, settings loading, and signal
//! handling shared by the TUI and headless frontends.

pub mod config;
pub mod engine;
pub mod engine_event;
pub mod handler;
pub mod input_key;
pub mod message;
pub mod signals;
pub mod state;
pub mod view;

// Re-export primary types
pub use engine::Engine;
pub use engine_event::EngineEvent;
pub use handler::{UpdateAction, UpdateResult};
pub use message::Message;
pub use state::AppState;
pub use view::AlertView;
