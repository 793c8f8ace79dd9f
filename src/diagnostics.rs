//! Process-wide command diagnostics.
//!
//! Unrecognized command kinds are logged once per process, no matter how many
//! rooms send them. The set of kinds seen so far lives here. It only grows;
//! its size is bounded by the number of distinct command names the live-room
//! server actually emits, which is a small finite set.

use dashmap::DashSet;
use std::sync::{Arc, OnceLock};

/// Set of command kinds that have already been reported as unknown.
#[derive(Debug, Default)]
pub struct UnknownCommandLog {
    seen: DashSet<String>,
}

impl UnknownCommandLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `kind` and report whether this is the first time it was seen.
    ///
    /// Exactly one caller observes `true` for a given kind, even when many
    /// rooms race on it.
    pub fn first_sighting(&self, kind: &str) -> bool {
        if self.seen.contains(kind) {
            return false;
        }
        self.seen.insert(kind.to_owned())
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.seen.contains(kind)
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

static UNKNOWN_COMMANDS: OnceLock<Arc<UnknownCommandLog>> = OnceLock::new();

/// Initialize the process-wide diagnostics state.
///
/// Called once at startup. Safe to call again; later calls are no-ops.
pub fn init() {
    unknown_commands();
}

/// The process-wide unknown command log.
pub fn unknown_commands() -> Arc<UnknownCommandLog> {
    Arc::clone(UNKNOWN_COMMANDS.get_or_init(|| Arc::new(UnknownCommandLog::new())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn first_sighting_only_once() {
        let log = UnknownCommandLog::new();
        assert!(log.first_sighting("UNKNOWN_KIND_X"));
        assert!(!log.first_sighting("UNKNOWN_KIND_X"));
        assert!(log.first_sighting("UNKNOWN_KIND_Y"));
        assert_eq!(log.len(), 2);
        assert!(log.contains("UNKNOWN_KIND_X"));
    }

    #[test]
    fn racing_threads_see_one_first_sighting() {
        let log = Arc::new(UnknownCommandLog::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let log = Arc::clone(&log);
                thread::spawn(move || log.first_sighting("RACE"))
            })
            .collect();
        let firsts = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|first| *first)
            .count();
        assert_eq!(firsts, 1);
    }

    #[test]
    fn global_instance_is_shared() {
        init();
        let a = unknown_commands();
        let b = unknown_commands();
        assert!(Arc::ptr_eq(&a, &b));
    }
}
