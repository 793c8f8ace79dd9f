//! Error types for the live-room protocol library.
//!
//! Decoding failures carry the normalized command name so that callers can
//! label metrics and log lines without holding on to the raw command.

use crate::command::PayloadField;
use thiserror::Error;

/// Convenience type alias for Results using [`ProtocolError`].
pub type Result<T, E = ProtocolError> = std::result::Result<T, E>;

/// Top-level protocol errors.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProtocolError {
    /// The command text was not valid JSON.
    #[error("invalid command json: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// The command was valid JSON but not an object.
    #[error("command is not a json object")]
    NotAnObject,

    /// The payload field this command kind reads from is absent.
    #[error("{cmd}: missing `{field}` payload")]
    MissingPayload {
        /// Normalized command name.
        cmd: &'static str,
        /// Field the payload was expected under.
        field: PayloadField,
    },

    /// The payload exists but does not match the message model.
    #[error("{cmd}: malformed payload: {reason}")]
    MalformedPayload {
        /// Normalized command name.
        cmd: &'static str,
        /// Human readable description of what did not match.
        reason: String,
    },
}

impl ProtocolError {
    /// Static error code for metrics labeling.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidJson(_) => "invalid_json",
            Self::NotAnObject => "not_an_object",
            Self::MissingPayload { .. } => "missing_payload",
            Self::MalformedPayload { .. } => "malformed_payload",
        }
    }
}
