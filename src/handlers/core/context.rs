//! Per-dispatch context passed to every callback.

use std::fmt;

/// Identifies the live room a command arrived from.
///
/// Room ids appear in diagnostics and are copied into queued messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RoomContext {
    /// Numeric live room id.
    pub room_id: u64,
}

impl RoomContext {
    pub fn new(room_id: u64) -> Self {
        Self { room_id }
    }
}

impl fmt::Display for RoomContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "room={}", self.room_id)
    }
}
