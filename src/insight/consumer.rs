//! The single background consumer of the insight queue.
//!
//! Messages are processed strictly one at a time in FIFO order. A failing or
//! panicking message is logged and skipped; the loop only ends when every
//! producer handle is gone and the queue has drained.

use super::message::{InsightKind, InsightMessage};
use super::queue::InsightReceiver;
use crate::engine::ConversationEngine;
use crate::output::{RealtimeMessage, RealtimeMirror, TextFormatter};
use crate::telemetry::spans;
use futures_util::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinHandle;
use tracing::{Instrument, debug, error, info};

/// What happened to one dequeued message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Processed {
    /// Mirrored and sent to the engine.
    Forwarded,
    /// Not a chat message; dropped without touching any collaborator.
    Skipped,
}

impl Processed {
    fn as_str(self) -> &'static str {
        match self {
            Self::Forwarded => "forwarded",
            Self::Skipped => "skipped",
        }
    }
}

/// Drains the insight queue into the mirror and the conversational engine.
pub struct InsightConsumer {
    formatter: Arc<dyn TextFormatter>,
    mirror: Arc<dyn RealtimeMirror>,
    engine: Arc<dyn ConversationEngine>,
}

impl InsightConsumer {
    pub fn new(
        formatter: Arc<dyn TextFormatter>,
        mirror: Arc<dyn RealtimeMirror>,
        engine: Arc<dyn ConversationEngine>,
    ) -> Self {
        Self {
            formatter,
            mirror,
            engine,
        }
    }

    /// Start the consumer task. Call once per queue.
    pub fn spawn(self, receiver: InsightReceiver) -> JoinHandle<()> {
        tokio::spawn(self.run(receiver))
    }

    async fn run(self, mut receiver: InsightReceiver) {
        info!("Insight consumer started");
        let mut processed: u64 = 0;

        while let Some(message) = receiver.recv().await {
            let kind = message.kind.as_str();
            let span = spans::insight(&message.id, kind, &message.user_name);
            let outcome = AssertUnwindSafe(self.process(&message))
                .catch_unwind()
                .instrument(span)
                .await;

            let label = match outcome {
                Ok(Ok(done)) => done.as_str(),
                Ok(Err(e)) => {
                    error!(id = %message.id, kind, user = %message.user_name, error = ?e, "Insight processing failed");
                    "failed"
                }
                Err(panic) => {
                    error!(id = %message.id, kind, user = %message.user_name, panic = %panic_message(&*panic), "Insight processing panicked");
                    "failed"
                }
            };
            crate::metrics::record_processed(kind, label);
            processed += 1;
        }

        info!(processed, "Insight queue closed; consumer stopped");
    }

    /// Handle one message.
    ///
    /// Chat messages are formatted and mirrored, then the original text is
    /// sent to the engine. The engine reply is discarded.
    pub async fn process(&self, message: &InsightMessage) -> anyhow::Result<Processed> {
        if message.kind != InsightKind::Chat {
            debug!(kind = %message.kind, "Dropping non-chat insight message");
            return Ok(Processed::Skipped);
        }

        let formatted = self.formatter.format(&message.content);
        self.mirror.put_message(RealtimeMessage {
            kind: message.kind,
            user_name: message.user_name.clone(),
            content: formatted,
        });

        let start = Instant::now();
        let reply = self.engine.chat(&message.user_name, &message.content).await;
        crate::metrics::record_engine_call(start.elapsed().as_secs_f64());

        let reply = reply?;
        debug!(reply = %reply, "Engine replied");
        Ok(Processed::Forwarded)
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(s) = panic.downcast_ref::<&'static str>() {
        s
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.as_str()
    } else {
        "non-string panic payload"
    }
}
