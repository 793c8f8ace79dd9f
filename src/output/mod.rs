//! Output collaborators used by the insight consumer.

mod format;
mod mirror;

pub use format::{ChatTextFormatter, TextFormatter};
pub use mirror::{BroadcastMirror, RealtimeMessage, RealtimeMirror, spawn_log_subscriber};
