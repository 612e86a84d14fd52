//! Error type for the live-reload broadcaster.

use thiserror::Error;

/// Failures surfaced by [`Broadcaster`](crate::Broadcaster) handles.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum LiveReloadError {
    /// The broadcaster actor has shut down and no longer accepts commands
    #[error("live-reload broadcaster has shut down")]
    Closed,
}

/// Result alias for broadcaster operations.
pub type Result<T, E = LiveReloadError> = std::result::Result<T, E>;
