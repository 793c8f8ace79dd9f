//! Replay ingest: newline-delimited JSON commands per room.
//!
//! Stands in for the live-room network client. Each room reads its source
//! line by line and dispatches commands one at a time; rooms run
//! concurrently as separate tasks sharing one [`Dispatcher`].

use crate::config::RoomConfig;
use crate::handlers::{Dispatched, Dispatcher, LiveHandler, RoomContext};
use crate::telemetry::spans;
use blive_proto::RawCommand;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::task::JoinSet;
use tracing::{Instrument, info, warn};

/// Per-room ingest counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestStats {
    /// Non-blank lines read.
    pub lines: u64,
    /// Commands delivered to a callback.
    pub handled: u64,
    /// Commands on the ignore list.
    pub ignored: u64,
    /// Commands of an unrecognized kind.
    pub unknown: u64,
    /// Lines that were not JSON objects or whose payload did not decode.
    pub rejected: u64,
}

/// Dispatch every command read from `reader` as coming from `room`.
///
/// Returns when the reader reaches end of input. Bad lines are logged and
/// skipped; only a read error ends the replay early.
pub async fn replay_room<H, R>(
    dispatcher: &Dispatcher<H>,
    room: RoomContext,
    reader: R,
) -> std::io::Result<IngestStats>
where
    H: LiveHandler,
    R: AsyncBufRead + Unpin,
{
    let mut stats = IngestStats::default();
    let mut lines = reader.lines();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        stats.lines += 1;

        let raw = match RawCommand::from_json(line) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(%room, error = %e, line = stats.lines, "Skipping invalid command line");
                stats.rejected += 1;
                continue;
            }
        };

        match dispatcher.dispatch(&room, &raw).await {
            Ok(Dispatched::Handled(_)) => stats.handled += 1,
            Ok(Dispatched::Ignored) => stats.ignored += 1,
            Ok(Dispatched::Unknown { .. }) => stats.unknown += 1,
            Err(e) => {
                warn!(%room, cmd = e.cmd(), error = %e, "Skipping undecodable command");
                stats.rejected += 1;
            }
        }
    }

    Ok(stats)
}

/// Open a replay source. `"-"` is stdin.
///
/// Stdin is read through tokio's blocking pool. A read that is parked
/// waiting for input cannot be cancelled, so after ctrl-c the runtime only
/// finishes shutting down once stdin delivers another line or reaches EOF.
pub async fn open_source(path: &str) -> std::io::Result<Box<dyn AsyncBufRead + Send + Unpin>> {
    if path == "-" {
        Ok(Box::new(BufReader::new(tokio::io::stdin())))
    } else {
        let file = tokio::fs::File::open(path).await?;
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Spawn one replay task per room.
///
/// Each task yields the room id with its stats or the I/O error that ended it.
pub fn spawn_rooms<H>(
    dispatcher: Arc<Dispatcher<H>>,
    rooms: &[RoomConfig],
) -> JoinSet<(u64, std::io::Result<IngestStats>)>
where
    H: LiveHandler + 'static,
{
    let mut set = JoinSet::new();
    for room in rooms {
        let dispatcher = Arc::clone(&dispatcher);
        let source = room.replay.clone();
        let room_id = room.id;
        set.spawn(
            async move {
                info!(source = %source, "Room ingest started");
                let result = match open_source(&source).await {
                    Ok(reader) => replay_room(&dispatcher, RoomContext::new(room_id), reader).await,
                    Err(e) => Err(e),
                };
                (room_id, result)
            }
            .instrument(spans::room(room_id)),
        );
    }
    set
}
