//! Integration test common infrastructure.
//!
//! Recording collaborators for the insight consumer and a helper that wires a
//! full dispatcher-to-engine pipeline.

#![allow(dead_code)]

use async_trait::async_trait;
use livechat_insight::config::InsightConfig;
use livechat_insight::diagnostics::UnknownCommandLog;
use livechat_insight::engine::ConversationEngine;
use livechat_insight::handlers::{Dispatcher, InsightHandler};
use livechat_insight::insight::{InsightConsumer, InsightQueue};
use livechat_insight::output::{ChatTextFormatter, RealtimeMessage, RealtimeMirror};
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::task::JoinHandle;

/// Mirror that keeps everything it is given.
#[derive(Default)]
pub struct RecordingMirror {
    pub messages: Mutex<Vec<RealtimeMessage>>,
}

impl RealtimeMirror for RecordingMirror {
    fn put_message(&self, message: RealtimeMessage) {
        self.messages.lock().push(message);
    }
}

/// Engine that records calls. Queries "fail" and "panic" misbehave.
#[derive(Default)]
pub struct RecordingEngine {
    pub calls: Mutex<Vec<(String, String)>>,
}

#[async_trait]
impl ConversationEngine for RecordingEngine {
    async fn chat(&self, user_name: &str, query: &str) -> anyhow::Result<String> {
        self.calls.lock().push((user_name.to_string(), query.to_string()));
        match query {
            "fail" => Err(anyhow::anyhow!("backend unavailable").context("chat failed")),
            "panic" => panic!("engine blew up on {user_name}"),
            _ => Ok(format!("reply to {user_name}")),
        }
    }
}

impl RecordingEngine {
    pub fn queries(&self) -> Vec<String> {
        self.calls.lock().iter().map(|(_, q)| q.clone()).collect()
    }
}

/// Engine that holds each call open for a while and tracks overlap.
#[derive(Default)]
pub struct SlowEngine {
    in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
    pub calls: AtomicUsize,
}

#[async_trait]
impl ConversationEngine for SlowEngine {
    async fn chat(&self, user_name: &str, _query: &str) -> anyhow::Result<String> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(2)).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(format!("reply to {user_name}"))
    }
}

/// A running pipeline: dispatcher in front, consumer task behind.
pub struct Pipeline {
    pub dispatcher: Dispatcher<InsightHandler>,
    pub unknown: Arc<UnknownCommandLog>,
    pub mirror: Arc<RecordingMirror>,
    pub engine: Arc<RecordingEngine>,
    pub consumer: JoinHandle<()>,
}

impl Pipeline {
    pub fn start(config: InsightConfig) -> Self {
        let mirror = Arc::new(RecordingMirror::default());
        let engine = Arc::new(RecordingEngine::default());
        let unknown = Arc::new(UnknownCommandLog::new());

        let (queue, receiver) = InsightQueue::new(config.high_water_mark);
        let consumer = InsightConsumer::new(
            Arc::new(ChatTextFormatter::new(config.max_chat_chars)),
            mirror.clone(),
            engine.clone(),
        )
        .spawn(receiver);
        let dispatcher =
            Dispatcher::with_unknown_log(InsightHandler::new(queue, config), unknown.clone());

        Self {
            dispatcher,
            unknown,
            mirror,
            engine,
            consumer,
        }
    }

    /// Drop every producer and wait for the consumer to drain.
    pub async fn finish(self) -> (Arc<RecordingMirror>, Arc<RecordingEngine>) {
        drop(self.dispatcher);
        self.consumer.await.expect("consumer task panicked");
        (self.mirror, self.engine)
    }
}
