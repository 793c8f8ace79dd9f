//! The untyped command envelope.

use crate::error::{ProtocolError, Result};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Where a command kind carries its payload.
///
/// Chat messages put a positional array under `info`; everything else uses
/// an object under `data`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PayloadField {
    /// `command["data"]`
    Data,
    /// `command["info"]`
    Info,
}

impl PayloadField {
    /// JSON key of this field.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Data => "data",
            Self::Info => "info",
        }
    }
}

impl fmt::Display for PayloadField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A command exactly as pushed by the live-room server.
///
/// The envelope is kept as a JSON object so that unknown kinds can be logged
/// verbatim for offline debugging.
#[derive(Debug, Clone, PartialEq)]
pub struct RawCommand {
    body: Map<String, Value>,
}

impl RawCommand {
    /// Parse a command from its JSON text.
    pub fn from_json(text: &str) -> Result<Self> {
        Self::from_value(serde_json::from_str(text)?)
    }

    /// Wrap an already parsed JSON value. Fails unless it is an object.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(body) => Ok(Self { body }),
            _ => Err(ProtocolError::NotAnObject),
        }
    }

    /// Build a command with a single payload field.
    pub fn with_payload(cmd: impl Into<String>, field: PayloadField, payload: Value) -> Self {
        let mut body = Map::new();
        body.insert("cmd".to_owned(), Value::String(cmd.into()));
        body.insert(field.as_str().to_owned(), payload);
        Self { body }
    }

    /// The command name as sent, including any `:`-separated suffix.
    ///
    /// Returns an empty string when `cmd` is absent or not a string.
    pub fn cmd(&self) -> &str {
        self.body.get("cmd").and_then(Value::as_str).unwrap_or("")
    }

    /// The payload stored under `field`, if any.
    pub fn payload(&self, field: PayloadField) -> Option<&Value> {
        self.body.get(field.as_str())
    }

    /// The whole envelope.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.body
    }
}

impl FromStr for RawCommand {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_json(s)
    }
}

impl fmt::Display for RawCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = serde_json::to_string(&self.body).map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}
