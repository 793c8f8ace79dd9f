//! Command dispatch.
//!
//! The `Dispatcher` classifies each raw command through the fixed kind table
//! in `blive-proto`, decodes the payload and awaits the matching
//! [`LiveHandler`] callback. One call to [`Dispatcher::dispatch`] is one unit
//! of work: it returns only after the callback has completed.

use super::context::RoomContext;
use super::traits::LiveHandler;
use crate::diagnostics::{self, UnknownCommandLog};
use crate::error::DispatchError;
use crate::telemetry::{CommandTimer, spans};
use blive_proto::{CommandKind, Event, RawCommand, Route, normalize_cmd, route};
use std::sync::Arc;
use tracing::{Instrument, debug, warn};

/// What a dispatch did with a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatched {
    /// Decoded and delivered to the callback for this kind.
    Handled(CommandKind),
    /// On the ignore list; dropped without logging.
    Ignored,
    /// Not in the kind table. `first_sighting` is true for the single call
    /// that logged it.
    Unknown { first_sighting: bool },
}

/// Routes raw commands to a [`LiveHandler`].
pub struct Dispatcher<H> {
    handler: H,
    unknown: Arc<UnknownCommandLog>,
}

impl<H: LiveHandler> Dispatcher<H> {
    /// Create a dispatcher that reports unknown kinds to the process-wide log.
    pub fn new(handler: H) -> Self {
        Self::with_unknown_log(handler, diagnostics::unknown_commands())
    }

    /// Create a dispatcher with its own unknown-kind log.
    pub fn with_unknown_log(handler: H, unknown: Arc<UnknownCommandLog>) -> Self {
        Self { handler, unknown }
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    /// Dispatch one command from `room`.
    ///
    /// Unknown and ignored kinds succeed. A payload that does not decode is
    /// returned as [`DispatchError::Decode`]; the caller decides whether to
    /// skip the command or drop the connection.
    pub async fn dispatch(
        &self,
        room: &RoomContext,
        raw: &RawCommand,
    ) -> Result<Dispatched, DispatchError> {
        // Since 2019 the server appends version parameters: "DANMU_MSG:4:0:2:2:2:0".
        let cmd = normalize_cmd(raw.cmd());

        let kind = match route(cmd) {
            Some(Route::Decode(kind)) => kind,
            Some(Route::Ignored) => {
                crate::metrics::record_ignored();
                return Ok(Dispatched::Ignored);
            }
            None => {
                crate::metrics::record_command_error("unknown", "unknown_command");
                let first_sighting = self.unknown.first_sighting(cmd);
                if first_sighting {
                    warn!(
                        room = room.room_id,
                        cmd = %cmd,
                        command = %raw,
                        "Unknown command"
                    );
                }
                return Ok(Dispatched::Unknown { first_sighting });
            }
        };

        let event = Event::decode(kind, raw).map_err(|source| {
            crate::metrics::record_command_error(kind.name(), source.error_code());
            debug!(room = room.room_id, cmd = %kind, error = %source, "Command decode failed");
            DispatchError::Decode {
                cmd: kind.name(),
                source,
            }
        })?;

        let _timer = CommandTimer::new(kind.name());
        self.handler
            .handle_event(room, &event)
            .instrument(spans::command(room.room_id, kind.name()))
            .await;

        Ok(Dispatched::Handled(kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use blive_proto::{DanmakuMessage, PayloadField};
    use parking_lot::Mutex;
    use serde_json::json;

    #[derive(Default)]
    struct Recorder {
        chats: Mutex<Vec<(u64, DanmakuMessage)>>,
        calls: Mutex<usize>,
    }

    #[async_trait]
    impl LiveHandler for Recorder {
        async fn handle_event(&self, room: &RoomContext, event: &Event) {
            *self.calls.lock() += 1;
            if let Event::Danmaku(m) = event {
                self.chats.lock().push((room.room_id, m.clone()));
            }
        }
    }

    fn dispatcher() -> Dispatcher<Recorder> {
        Dispatcher::with_unknown_log(Recorder::default(), Arc::new(UnknownCommandLog::new()))
    }

    fn chat(cmd: &str) -> RawCommand {
        RawCommand::with_payload(
            cmd,
            PayloadField::Info,
            json!([[0, 1, 25], "hello", [1001, "Alice"]]),
        )
    }

    #[tokio::test]
    async fn suffix_is_stripped_before_lookup() {
        let d = dispatcher();
        let room = RoomContext::new(5);

        let a = d.dispatch(&room, &chat("DANMU_MSG")).await.unwrap();
        let b = d.dispatch(&room, &chat("DANMU_MSG:4:0:2:2:2:0")).await.unwrap();

        assert_eq!(a, Dispatched::Handled(CommandKind::Danmaku));
        assert_eq!(b, a);
        let chats = d.handler().chats.lock();
        assert_eq!(chats.len(), 2);
        assert_eq!(chats[0], chats[1]);
        assert_eq!(chats[0].1.uname, "Alice");
    }

    #[tokio::test]
    async fn unknown_kind_is_reported_once() {
        let d = dispatcher();
        let raw = RawCommand::from_json(r#"{"cmd":"UNKNOWN_KIND_X"}"#).unwrap();

        let first = d.dispatch(&RoomContext::new(123), &raw).await.unwrap();
        let second = d.dispatch(&RoomContext::new(123), &raw).await.unwrap();
        let other_room = d.dispatch(&RoomContext::new(456), &raw).await.unwrap();

        assert_eq!(first, Dispatched::Unknown { first_sighting: true });
        assert_eq!(second, Dispatched::Unknown { first_sighting: false });
        assert_eq!(other_room, Dispatched::Unknown { first_sighting: false });
        assert_eq!(*d.handler().calls.lock(), 0);
    }

    #[tokio::test]
    async fn unknown_suffixes_share_one_entry() {
        let d = dispatcher();
        let room = RoomContext::new(1);
        let a = RawCommand::from_json(r#"{"cmd":"NEW_THING:1"}"#).unwrap();
        let b = RawCommand::from_json(r#"{"cmd":"NEW_THING:2"}"#).unwrap();

        assert_eq!(
            d.dispatch(&room, &a).await.unwrap(),
            Dispatched::Unknown { first_sighting: true }
        );
        assert_eq!(
            d.dispatch(&room, &b).await.unwrap(),
            Dispatched::Unknown { first_sighting: false }
        );
    }

    #[tokio::test]
    async fn ignored_kind_never_reaches_handler_or_log() {
        let d = dispatcher();
        let raw = RawCommand::from_json(r#"{"cmd":"ONLINE_RANK_COUNT","data":{"count":3}}"#)
            .unwrap();

        let outcome = d.dispatch(&RoomContext::new(1), &raw).await.unwrap();

        assert_eq!(outcome, Dispatched::Ignored);
        assert_eq!(*d.handler().calls.lock(), 0);
        assert!(d.unknown.is_empty());
    }

    #[tokio::test]
    async fn decode_failure_propagates() {
        let d = dispatcher();
        let raw = RawCommand::from_json(r#"{"cmd":"SEND_GIFT","data":{"num":1}}"#).unwrap();

        let err = d.dispatch(&RoomContext::new(1), &raw).await.unwrap_err();

        assert_eq!(err.cmd(), "SEND_GIFT");
        assert_eq!(err.error_code(), "malformed_payload");
        assert_eq!(*d.handler().calls.lock(), 0);
    }

    #[tokio::test]
    async fn missing_cmd_is_unknown_empty_kind() {
        let d = dispatcher();
        let raw = RawCommand::from_json(r#"{"data":{}}"#).unwrap();
        let outcome = d.dispatch(&RoomContext::new(1), &raw).await.unwrap();
        assert_eq!(outcome, Dispatched::Unknown { first_sighting: true });
        assert!(d.unknown.contains(""));
    }

    #[derive(Clone, Default)]
    struct CapturedLog(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLog {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl CapturedLog {
        fn lines(&self) -> Vec<String> {
            String::from_utf8_lossy(&self.0.lock())
                .lines()
                .map(str::to_owned)
                .collect()
        }
    }

    #[tokio::test]
    async fn unknown_kind_warning_carries_room_and_raw_command() {
        let log = CapturedLog::default();
        let writer = log.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let d = dispatcher();
        let room = RoomContext::new(123);
        let raw = RawCommand::from_json(r#"{"cmd":"UNKNOWN_KIND_X"}"#).unwrap();
        d.dispatch(&room, &raw).await.unwrap();
        d.dispatch(&room, &raw).await.unwrap();

        let lines: Vec<String> = log
            .lines()
            .into_iter()
            .filter(|l| l.contains("UNKNOWN_KIND_X"))
            .collect();
        assert_eq!(lines.len(), 1, "{lines:?}");
        assert!(lines[0].contains("Unknown command"));
        assert!(lines[0].contains("room=123"));
        assert!(lines[0].contains(r#"{"cmd":"UNKNOWN_KIND_X"}"#));
    }
}
