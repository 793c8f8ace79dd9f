//! Handler that feeds chat-shaped events into the insight queue.

use super::core::{LiveHandler, RoomContext};
use crate::config::InsightConfig;
use crate::insight::{InsightKind, InsightMessage, InsightQueue};
use async_trait::async_trait;
use blive_proto::{
    DanmakuMessage, GiftMessage, InteractWordMessage, Interaction, SuperChatMessage,
    WelcomeMessage,
};
use tracing::{debug, error};

/// Production [`LiveHandler`]: chats, super chats and, when enabled, gifts and
/// room entries become [`InsightMessage`]s.
pub struct InsightHandler {
    queue: InsightQueue,
    config: InsightConfig,
}

impl InsightHandler {
    pub fn new(queue: InsightQueue, config: InsightConfig) -> Self {
        Self { queue, config }
    }

    pub fn queue(&self) -> &InsightQueue {
        &self.queue
    }

    fn put(&self, room: &RoomContext, message: InsightMessage) {
        if let Err(e) = self.queue.enqueue(message) {
            error!(%room, error = %e, "Failed to enqueue insight message");
        }
    }

    fn put_enter(&self, room: &RoomContext, uname: &str) {
        if self.config.forward_enter {
            self.put(
                room,
                InsightMessage::new(InsightKind::Enter, room.room_id, uname, ""),
            );
        }
    }
}

#[async_trait]
impl LiveHandler for InsightHandler {
    async fn on_danmaku(&self, room: &RoomContext, message: &DanmakuMessage) {
        if message.msg.trim().is_empty() {
            debug!(%room, user = %message.uname, "Skipping blank chat");
            return;
        }
        self.put(
            room,
            InsightMessage::chat(room.room_id, message.uname.as_str(), message.msg.as_str()),
        );
    }

    async fn on_super_chat(&self, room: &RoomContext, message: &SuperChatMessage) {
        if !self.config.forward_super_chat || message.message.trim().is_empty() {
            return;
        }
        self.put(
            room,
            InsightMessage::chat(room.room_id, message.uname.as_str(), message.message.as_str())
                .with_expand(format!("super_chat:{}", message.price)),
        );
    }

    async fn on_gift(&self, room: &RoomContext, message: &GiftMessage) {
        if !self.config.forward_gifts {
            return;
        }
        self.put(
            room,
            InsightMessage::new(
                InsightKind::Gift,
                room.room_id,
                message.uname.as_str(),
                format!("{} x{}", message.gift_name, message.num),
            ),
        );
    }

    async fn on_interact_word(&self, room: &RoomContext, message: &InteractWordMessage) {
        if message.interaction() == Interaction::Enter {
            self.put_enter(room, &message.uname);
        }
    }

    async fn on_welcome(&self, room: &RoomContext, message: &WelcomeMessage) {
        self.put_enter(room, &message.uname);
    }
}
