//! Typed live-room messages.

mod danmaku;
mod paid;
mod room;

pub use danmaku::{DanmakuMessage, FansMedal};
pub use paid::{GiftMessage, GuardBuyMessage, SuperChatDeleteMessage, SuperChatMessage};
pub use room::{
    EntryEffectMessage, HeartbeatMessage, Interaction, InteractWordMessage, LikeClickMessage,
    WelcomeMessage,
};

use crate::command::RawCommand;
use crate::error::{ProtocolError, Result};
use crate::kind::CommandKind;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// A decoded command. One variant per [`CommandKind`].
#[derive(Debug, Clone, PartialEq)]
#[allow(missing_docs)]
pub enum Event {
    Heartbeat(HeartbeatMessage),
    Danmaku(DanmakuMessage),
    Gift(GiftMessage),
    GuardBuy(GuardBuyMessage),
    SuperChat(SuperChatMessage),
    SuperChatDelete(SuperChatDeleteMessage),
    LikeClick(LikeClickMessage),
    Welcome(WelcomeMessage),
    EntryEffect(EntryEffectMessage),
    InteractWord(InteractWordMessage),
}

fn from_object<T: DeserializeOwned>(payload: &Value) -> std::result::Result<T, String> {
    T::deserialize(payload).map_err(|e| e.to_string())
}

impl Event {
    /// Decode the payload of `raw` as a message of `kind`.
    ///
    /// The payload is read from the field `kind` declares; the command name
    /// inside `raw` is not consulted.
    pub fn decode(kind: CommandKind, raw: &RawCommand) -> Result<Self> {
        let field = kind.payload_field();
        let payload = raw.payload(field).ok_or(ProtocolError::MissingPayload {
            cmd: kind.name(),
            field,
        })?;

        let decoded = match kind {
            CommandKind::Heartbeat => from_object(payload).map(Self::Heartbeat),
            CommandKind::Danmaku => DanmakuMessage::from_info(payload).map(Self::Danmaku),
            CommandKind::Gift => from_object(payload).map(Self::Gift),
            CommandKind::GuardBuy => from_object(payload).map(Self::GuardBuy),
            CommandKind::SuperChat => from_object(payload).map(Self::SuperChat),
            CommandKind::SuperChatDelete => from_object(payload).map(Self::SuperChatDelete),
            CommandKind::LikeClick => from_object(payload).map(Self::LikeClick),
            CommandKind::Welcome => from_object(payload).map(Self::Welcome),
            CommandKind::EntryEffect => from_object(payload).map(Self::EntryEffect),
            CommandKind::InteractWord => from_object(payload).map(Self::InteractWord),
        };

        decoded.map_err(|reason| ProtocolError::MalformedPayload {
            cmd: kind.name(),
            reason,
        })
    }

    /// The kind this event was decoded as.
    pub fn kind(&self) -> CommandKind {
        match self {
            Self::Heartbeat(_) => CommandKind::Heartbeat,
            Self::Danmaku(_) => CommandKind::Danmaku,
            Self::Gift(_) => CommandKind::Gift,
            Self::GuardBuy(_) => CommandKind::GuardBuy,
            Self::SuperChat(_) => CommandKind::SuperChat,
            Self::SuperChatDelete(_) => CommandKind::SuperChatDelete,
            Self::LikeClick(_) => CommandKind::LikeClick,
            Self::Welcome(_) => CommandKind::Welcome,
            Self::EntryEffect(_) => CommandKind::EntryEffect,
            Self::InteractWord(_) => CommandKind::InteractWord,
        }
    }
}
