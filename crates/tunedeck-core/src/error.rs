// ── Core error types ──
//
// Only validation failures are user-correctable. Persistence failures
// are reported by the store implementation as a message; the core does
// not retry them.

use thiserror::Error;

use crate::validate::ValidationError;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Failed to persist connection profile: {message}")]
    Persist { message: String },

    #[error("Settings session already finished")]
    SessionFinished,
}
