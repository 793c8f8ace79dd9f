//! Telemetry utilities for dispatch timing and span construction.

use std::time::Instant;

/// Guard for timing a dispatch and recording metrics.
///
/// Records command latency when dropped.
pub struct CommandTimer {
    command: &'static str,
    start: Instant,
}

impl CommandTimer {
    /// Start timing a command.
    pub fn new(command: &'static str) -> Self {
        Self {
            command,
            start: Instant::now(),
        }
    }
}

impl Drop for CommandTimer {
    fn drop(&mut self) {
        let duration = self.start.elapsed().as_secs_f64();
        crate::metrics::record_command(self.command, duration);
    }
}

/// Standardized span constructors.
pub mod spans {
    use tracing::{Span, debug_span, info_span};

    /// Span for one room's ingest task.
    pub fn room(room_id: u64) -> Span {
        info_span!("room", room = room_id)
    }

    /// Span for a single command dispatch.
    pub fn command(room_id: u64, cmd: &str) -> Span {
        debug_span!("live.command", room = room_id, cmd = %cmd)
    }

    /// Span for the consumer handling one insight message.
    pub fn insight(id: &uuid::Uuid, kind: &str, user_name: &str) -> Span {
        debug_span!("insight", id = %id, kind = %kind, user = %user_name)
    }
}
