//! Application-wide lifecycle types

/// Lifecycle phase of the application itself (not of a transport session).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AppPhase {
    /// Created, session not yet mounted
    #[default]
    Initializing,
    /// Session mounted, reacting to events
    Running,
    /// Shutting down; the event loop exits on the next iteration
    Quitting,
}
