//! # sentinel-core - Core Domain Types
//!
//! Foundation crate for Scam Sentinel. Provides the alert domain model,
//! connection phase types, endpoint validation, error handling, and logging
//! setup.
//!
//! This crate has **zero internal dependencies** -- it only depends on external
//! crates (serde, thiserror, tracing, url).
//!
//! ## Public API
//!
//! ### Alerts (`alert`)
//! - [`AlertState`] - Latest-only alert slot (idle, or one alert)
//! - [`Alert`] - Detected text plus the backend's reasoning
//! - [`InboundMessage`] - Decoded backend payload (warning or other discriminator)
//!
//! ### Connection (`connection`)
//! - [`ConnectionPhase`] - Session lifecycle phase (Connecting, Open, Reconnecting, Closed)
//! - [`CloseReason`] - Why a session reached `Closed`
//! - [`Endpoint`] - Validated `ws://` / `wss://` backend address
//! - [`SessionId`] - Process-unique session identifier
//!
//! ### Error Handling (`error`)
//! - [`Error`] - Custom error enum with `is_fatal` classification
//! - [`Result`] - Type alias for `std::result::Result<T, Error>`
//! - [`ResultExt`] - Extension trait for adding error context
//!
//! ## Prelude
//!
//! Import commonly used types with:
//! ```rust
//! use sentinel_core::prelude::*;
//! ```

pub mod alert;
pub mod connection;
pub mod error;
pub mod logging;
pub mod prelude;
pub mod types;

// Re-export commonly used types at crate root for convenience
pub use alert::{Alert, AlertState, InboundMessage, WARNING_KIND};
pub use connection::{
    CloseReason, ConnectionPhase, Endpoint, SessionId, DEFAULT_HOST, DEFAULT_PORT,
};
pub use error::{Error, Result, ResultExt};
pub use types::AppPhase;
