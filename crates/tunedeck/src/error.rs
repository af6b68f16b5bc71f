//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` variants into user-facing errors with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use tunedeck_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(
        code(tunedeck::validation),
        help("Ports must be base-10 numbers. Pass an empty value (--port \"\") to unset one.")
    )]
    Validation { field: String, reason: String },

    // ── Persistence ──────────────────────────────────────────────────

    #[error("Could not save the connection profile: {message}")]
    #[diagnostic(
        code(tunedeck::persist),
        help(
            "Check that the profile directory is writable.\n\
             Run: tunedeck settings path"
        )
    )]
    Persist { message: String },

    #[error("Settings session already finished")]
    #[diagnostic(code(tunedeck::session))]
    SessionFinished,

    // ── Interactive ──────────────────────────────────────────────────

    #[error("Interactive editing requires a terminal")]
    #[diagnostic(
        code(tunedeck::not_interactive),
        help("Use: tunedeck settings set --address <HOST> --port <PORT> ...")
    )]
    NotInteractive,

    #[error("Prompt failed: {0}")]
    #[diagnostic(code(tunedeck::prompt))]
    Prompt(String),

    // ── IO ───────────────────────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Validation { .. } | Self::NotInteractive => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(e) => CliError::Validation {
                field: e.field(),
                reason: e.to_string(),
            },
            CoreError::Persist { message } => CliError::Persist { message },
            CoreError::SessionFinished => CliError::SessionFinished,
        }
    }
}

impl From<dialoguer::Error> for CliError {
    fn from(err: dialoguer::Error) -> Self {
        Self::Prompt(err.to_string())
    }
}
