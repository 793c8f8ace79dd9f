//! Realtime side-channel for UI mirroring.

use serde::Serialize;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::insight::InsightKind;

/// What the mirror publishes for each forwarded message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RealtimeMessage {
    #[serde(rename = "type")]
    pub kind: InsightKind,
    pub user_name: String,
    pub content: String,
}

/// Fire-and-forget sink for realtime messages.
pub trait RealtimeMirror: Send + Sync {
    fn put_message(&self, message: RealtimeMessage);
}

/// Mirror backed by a tokio broadcast channel.
///
/// Each subscriber keeps its own buffer of `capacity` messages. Slow
/// subscribers lose the oldest messages; the publisher never waits.
#[derive(Debug, Clone)]
pub struct BroadcastMirror {
    tx: broadcast::Sender<RealtimeMessage>,
}

impl BroadcastMirror {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RealtimeMessage> {
        self.tx.subscribe()
    }
}

impl RealtimeMirror for BroadcastMirror {
    fn put_message(&self, message: RealtimeMessage) {
        // No subscribers is fine.
        let _ = self.tx.send(message);
    }
}

/// Spawn a subscriber that logs every mirrored message.
pub fn spawn_log_subscriber(mirror: &BroadcastMirror) -> JoinHandle<()> {
    let mut rx = mirror.subscribe();
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(message) => match serde_json::to_string(&message) {
                    Ok(json) => info!(target: "realtime", message = %json, "Mirrored"),
                    Err(e) => warn!(error = %e, "Failed to serialize realtime message"),
                },
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Realtime log subscriber lagged");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(content: &str) -> RealtimeMessage {
        RealtimeMessage {
            kind: InsightKind::Chat,
            user_name: "Alice".into(),
            content: content.into(),
        }
    }

    #[test]
    fn serializes_kind_as_type() {
        let json = serde_json::to_value(message("hello")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"type": "chat", "user_name": "Alice", "content": "hello"})
        );
    }

    #[test]
    fn put_without_subscribers_is_silent() {
        BroadcastMirror::new(4).put_message(message("nobody listens"));
    }

    #[tokio::test]
    async fn subscribers_receive_in_order() {
        let mirror = BroadcastMirror::new(4);
        let mut rx = mirror.subscribe();
        mirror.put_message(message("one"));
        mirror.put_message(message("two"));
        assert_eq!(rx.recv().await.unwrap().content, "one");
        assert_eq!(rx.recv().await.unwrap().content, "two");
    }

    #[tokio::test]
    async fn log_subscriber_ends_when_mirror_drops() {
        let mirror = BroadcastMirror::new(4);
        let task = spawn_log_subscriber(&mirror);
        mirror.put_message(message("logged"));
        drop(mirror);
        task.await.unwrap();
    }
}
