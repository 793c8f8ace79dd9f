//! Typed event callbacks.
//!
//! [`LiveHandler`] has one callback per event kind, each a no-op by default.
//! Implementors override only the kinds they react to; every other kind is
//! accepted and dropped. There is no runtime registration: the set of
//! callbacks is fixed by this trait.
//!
//! ## Example
//!
//! ```ignore
//! struct GiftLogger;
//!
//! #[async_trait]
//! impl LiveHandler for GiftLogger {
//!     async fn on_gift(&self, room: &RoomContext, message: &GiftMessage) {
//!         tracing::info!(%room, gift = %message.gift_name, "gift");
//!     }
//! }
//! ```

use super::context::RoomContext;
use async_trait::async_trait;
use blive_proto::{
    DanmakuMessage, EntryEffectMessage, Event, GiftMessage, GuardBuyMessage, HeartbeatMessage,
    InteractWordMessage, LikeClickMessage, SuperChatDeleteMessage, SuperChatMessage,
    WelcomeMessage,
};

/// Callbacks for decoded live-room events.
///
/// Callbacks return nothing: a failure inside a callback is the callback's
/// own concern and never fails the dispatch that invoked it.
#[async_trait]
pub trait LiveHandler: Send + Sync {
    /// Heartbeat reply with the room popularity.
    async fn on_heartbeat(&self, _room: &RoomContext, _message: &HeartbeatMessage) {}

    /// Chat message.
    async fn on_danmaku(&self, _room: &RoomContext, _message: &DanmakuMessage) {}

    /// Gift.
    async fn on_gift(&self, _room: &RoomContext, _message: &GiftMessage) {}

    /// Guard membership purchase.
    async fn on_buy_guard(&self, _room: &RoomContext, _message: &GuardBuyMessage) {}

    /// Super chat.
    async fn on_super_chat(&self, _room: &RoomContext, _message: &SuperChatMessage) {}

    /// Super chat taken down.
    async fn on_super_chat_delete(&self, _room: &RoomContext, _message: &SuperChatDeleteMessage) {}

    /// Viewer liked the stream.
    async fn on_like_click(&self, _room: &RoomContext, _message: &LikeClickMessage) {}

    /// Legacy welcome notice.
    async fn on_welcome(&self, _room: &RoomContext, _message: &WelcomeMessage) {}

    /// Guard or high-rank viewer entered with an effect.
    async fn on_entry_effect(&self, _room: &RoomContext, _message: &EntryEffectMessage) {}

    /// Viewer entered, followed or shared.
    async fn on_interact_word(&self, _room: &RoomContext, _message: &InteractWordMessage) {}

    /// Route a decoded event to its callback.
    async fn handle_event(&self, room: &RoomContext, event: &Event) {
        match event {
            Event::Heartbeat(m) => self.on_heartbeat(room, m).await,
            Event::Danmaku(m) => self.on_danmaku(room, m).await,
            Event::Gift(m) => self.on_gift(room, m).await,
            Event::GuardBuy(m) => self.on_buy_guard(room, m).await,
            Event::SuperChat(m) => self.on_super_chat(room, m).await,
            Event::SuperChatDelete(m) => self.on_super_chat_delete(room, m).await,
            Event::LikeClick(m) => self.on_like_click(room, m).await,
            Event::Welcome(m) => self.on_welcome(room, m).await,
            Event::EntryEffect(m) => self.on_entry_effect(room, m).await,
            Event::InteractWord(m) => self.on_interact_word(room, m).await,
        }
    }
}

/// A handler that accepts every event and does nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopHandler;

#[async_trait]
impl LiveHandler for NoopHandler {}

#[cfg(test)]
mod tests {
    use super::*;
    use blive_proto::{CommandKind, PayloadField, RawCommand};
    use parking_lot::Mutex;
    use serde_json::json;

    #[derive(Default)]
    struct OnlyGifts {
        seen: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl LiveHandler for OnlyGifts {
        async fn on_gift(&self, _room: &RoomContext, message: &GiftMessage) {
            self.seen.lock().push(message.gift_name.clone());
        }
    }

    #[tokio::test]
    async fn overridden_callback_runs_and_others_are_noops() {
        let handler = OnlyGifts::default();
        let room = RoomContext::new(1);

        let gift = RawCommand::with_payload(
            "SEND_GIFT",
            PayloadField::Data,
            json!({"giftName": "小心心", "uname": "Ivan", "uid": 3, "num": 1}),
        );
        let heartbeat =
            RawCommand::with_payload("_HEARTBEAT", PayloadField::Data, json!({"popularity": 9}));

        for (kind, raw) in [
            (CommandKind::Gift, &gift),
            (CommandKind::Heartbeat, &heartbeat),
        ] {
            let event = Event::decode(kind, raw).unwrap();
            handler.handle_event(&room, &event).await;
        }

        assert_eq!(*handler.seen.lock(), vec!["小心心".to_string()]);
    }

    #[tokio::test]
    async fn noop_handler_accepts_everything() {
        let room = RoomContext::new(2);
        let event = Event::SuperChatDelete(SuperChatDeleteMessage { ids: vec![1] });
        NoopHandler.handle_event(&room, &event).await;
    }
}
