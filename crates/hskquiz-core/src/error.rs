//! Engine error types.
//!
//! Only configuration-resolution failures are hard errors. Everything the
//! player can trigger mid-session (late clicks, out-of-range choices,
//! undersized vocabulary) degrades gracefully and is reported through the
//! diagnostics channel instead.

use thiserror::Error;

/// Errors that can abort a `start_level` call. The session state is left
/// unchanged when any of these is returned.
#[derive(Debug, Error)]
pub enum QuizError {
    /// The requested level id is not in the catalog.
    #[error("unknown level: {0}")]
    UnknownLevel(u32),

    /// A level references a vocabulary set that is not configured.
    #[error("unknown vocabulary set: {0}")]
    UnknownSet(String),

    /// A level references a vocabulary set with no entries.
    #[error("vocabulary set '{0}' is empty")]
    EmptySet(String),
}
