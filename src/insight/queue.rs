//! The insight queue: many producers, one consumer.
//!
//! Producers hold cloneable [`InsightQueue`] handles; the single consumer
//! owns the [`InsightReceiver`]. Enqueueing never blocks and never waits:
//! the channel is unbounded. Memory is watched instead of bounded: the depth
//! is tracked, exported as a gauge, and a warning is logged each time it
//! climbs past the configured high-water mark. The upstream network client
//! is never slowed down and no message is dropped while the consumer lives.

use super::message::InsightMessage;
use crate::error::PipelineError;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::mpsc;
use tracing::{error, info, warn};

#[derive(Debug)]
struct Depth {
    current: AtomicUsize,
    high_water_mark: usize,
    above_mark: AtomicBool,
}

impl Depth {
    fn push(&self) -> usize {
        let depth = self.current.fetch_add(1, Ordering::AcqRel) + 1;
        if depth >= self.high_water_mark && !self.above_mark.swap(true, Ordering::AcqRel) {
            warn!(
                depth,
                high_water_mark = self.high_water_mark,
                "Insight queue above high-water mark; consumer is falling behind"
            );
        }
        depth
    }

    fn pop(&self) -> usize {
        let depth = self.current.fetch_sub(1, Ordering::AcqRel).saturating_sub(1);
        if depth <= self.high_water_mark / 2 && self.above_mark.swap(false, Ordering::AcqRel) {
            info!(depth, "Insight queue drained below half the high-water mark");
        }
        depth
    }

    fn get(&self) -> usize {
        self.current.load(Ordering::Acquire)
    }
}

/// Producer handle for the insight queue.
#[derive(Debug, Clone)]
pub struct InsightQueue {
    tx: mpsc::UnboundedSender<InsightMessage>,
    depth: Arc<Depth>,
}

/// Consumer end of the insight queue. There is exactly one.
#[derive(Debug)]
pub struct InsightReceiver {
    rx: mpsc::UnboundedReceiver<InsightMessage>,
    depth: Arc<Depth>,
}

/// Read-only view of the queue depth that does not keep the queue open.
#[derive(Debug, Clone)]
pub struct DepthProbe {
    depth: Arc<Depth>,
}

impl DepthProbe {
    pub fn get(&self) -> usize {
        self.depth.get()
    }
}

impl InsightQueue {
    /// Create a queue. `high_water_mark` must be non-zero.
    pub fn new(high_water_mark: usize) -> (Self, InsightReceiver) {
        let (tx, rx) = mpsc::unbounded_channel();
        let depth = Arc::new(Depth {
            current: AtomicUsize::new(0),
            high_water_mark: high_water_mark.max(1),
            above_mark: AtomicBool::new(false),
        });
        (
            Self {
                tx,
                depth: Arc::clone(&depth),
            },
            InsightReceiver { rx, depth },
        )
    }

    /// Append a message to the tail of the queue.
    ///
    /// Fails only when the consumer has exited, in which case the message is
    /// dropped and logged.
    pub fn enqueue(&self, message: InsightMessage) -> Result<(), PipelineError> {
        let kind = message.kind;
        // Count before sending so the consumer can never observe a negative depth.
        let depth = self.depth.push();
        if let Err(mpsc::error::SendError(message)) = self.tx.send(message) {
            self.depth.pop();
            error!(
                id = %message.id,
                kind = %message.kind,
                user = %message.user_name,
                "Insight consumer is gone; message dropped"
            );
            return Err(PipelineError::ConsumerGone);
        }
        crate::metrics::record_enqueued(kind.as_str(), depth);
        Ok(())
    }

    /// Messages currently waiting for the consumer.
    pub fn depth(&self) -> usize {
        self.depth.get()
    }

    pub fn depth_probe(&self) -> DepthProbe {
        DepthProbe {
            depth: Arc::clone(&self.depth),
        }
    }
}

impl InsightReceiver {
    /// Wait for the next message. Returns `None` once every producer handle
    /// has been dropped and the queue is empty.
    pub async fn recv(&mut self) -> Option<InsightMessage> {
        let message = self.rx.recv().await?;
        let depth = self.depth.pop();
        crate::metrics::set_queue_depth(depth);
        Some(message)
    }

    pub fn depth(&self) -> usize {
        self.depth.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::insight::InsightKind;

    #[tokio::test]
    async fn fifo_order_and_depth() {
        let (queue, mut rx) = InsightQueue::new(8);
        for i in 0..3 {
            queue
                .enqueue(InsightMessage::chat(1, "u", format!("m{i}")))
                .unwrap();
        }
        assert_eq!(queue.depth(), 3);

        for i in 0..3 {
            let m = rx.recv().await.unwrap();
            assert_eq!(m.content, format!("m{i}"));
        }
        assert_eq!(rx.depth(), 0);
    }

    #[tokio::test]
    async fn receiver_ends_when_producers_drop() {
        let (queue, mut rx) = InsightQueue::new(8);
        let second = queue.clone();
        queue
            .enqueue(InsightMessage::new(InsightKind::Gift, 1, "u", "x"))
            .unwrap();
        drop(queue);
        drop(second);

        assert!(rx.recv().await.is_some());
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn enqueue_after_consumer_exit_fails() {
        let (queue, rx) = InsightQueue::new(8);
        drop(rx);
        let err = queue.enqueue(InsightMessage::chat(1, "u", "late")).unwrap_err();
        assert_eq!(err, PipelineError::ConsumerGone);
        assert_eq!(queue.depth(), 0);
    }

    #[tokio::test]
    async fn high_water_mark_does_not_block_or_drop() {
        let (queue, mut rx) = InsightQueue::new(2);
        let probe = queue.depth_probe();
        for i in 0..10 {
            queue
                .enqueue(InsightMessage::chat(1, "u", i.to_string()))
                .unwrap();
        }
        assert_eq!(probe.get(), 10);
        drop(queue);

        let mut drained = 0;
        while rx.recv().await.is_some() {
            drained += 1;
        }
        assert_eq!(drained, 10);
        assert_eq!(probe.get(), 0);
    }

    #[tokio::test]
    async fn depth_probe_does_not_keep_queue_open() {
        let (queue, mut rx) = InsightQueue::new(4);
        let _probe = queue.depth_probe();
        drop(queue);
        assert!(rx.recv().await.is_none());
    }
}
