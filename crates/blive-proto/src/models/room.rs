//! Room presence: heartbeats, likes, entries and follows.

use crate::de::{lenient_i64, lenient_string};
use serde::Deserialize;

/// `_HEARTBEAT`: popularity reported by the heartbeat reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct HeartbeatMessage {
    /// Room popularity value.
    #[serde(deserialize_with = "lenient_i64")]
    pub popularity: i64,
}

/// `LIKE_INFO_V3_CLICK`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LikeClickMessage {
    /// Viewer uid.
    #[serde(deserialize_with = "lenient_i64")]
    pub uid: i64,
    /// Viewer display name.
    pub uname: String,
    /// Text shown in the room, e.g. "为主播点赞了".
    #[serde(default)]
    pub like_text: String,
}

/// `WELCOME`: legacy entry notice for VIP viewers.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WelcomeMessage {
    /// Viewer uid.
    #[serde(deserialize_with = "lenient_i64")]
    pub uid: i64,
    /// Viewer display name.
    pub uname: String,
    /// Viewer is a room admin.
    #[serde(default)]
    pub is_admin: bool,
    /// Monthly VIP flag.
    #[serde(default, deserialize_with = "lenient_i64")]
    pub vip: i64,
    /// Yearly VIP flag.
    #[serde(default, deserialize_with = "lenient_i64")]
    pub svip: i64,
}

/// `ENTRY_EFFECT`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EntryEffectMessage {
    /// Effect id.
    #[serde(default, deserialize_with = "lenient_i64")]
    pub id: i64,
    /// Viewer uid.
    #[serde(deserialize_with = "lenient_i64")]
    pub uid: i64,
    /// Streamer uid.
    #[serde(default, deserialize_with = "lenient_i64")]
    pub target_id: i64,
    /// Guard level of the viewer.
    #[serde(default, deserialize_with = "lenient_i64")]
    pub privilege_type: i64,
    /// Banner text, names wrapped in `<% %>`.
    #[serde(default, deserialize_with = "lenient_string")]
    pub copy_writing: String,
    /// Viewer avatar URL.
    #[serde(default)]
    pub face: String,
}

impl EntryEffectMessage {
    /// Banner text with the `<%` `%>` emphasis markers removed.
    pub fn plain_copy_writing(&self) -> String {
        self.copy_writing.replace("<%", "").replace("%>", "")
    }
}

/// What an `INTERACT_WORD` notice reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interaction {
    /// Viewer entered the room.
    Enter,
    /// Viewer followed the streamer.
    Follow,
    /// Viewer shared the room.
    Share,
    /// Viewer added the streamer to special follows.
    SpecialFollow,
    /// Viewer and streamer now follow each other.
    MutualFollow,
    /// Anything newer than this list.
    Other(i64),
}

/// `INTERACT_WORD`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InteractWordMessage {
    /// Viewer uid.
    #[serde(deserialize_with = "lenient_i64")]
    pub uid: i64,
    /// Viewer display name.
    pub uname: String,
    /// Raw interaction code, see [`InteractWordMessage::interaction`].
    #[serde(default, deserialize_with = "lenient_i64")]
    pub msg_type: i64,
    /// Room id.
    #[serde(default, deserialize_with = "lenient_i64")]
    pub roomid: i64,
    /// Time in seconds.
    #[serde(default, deserialize_with = "lenient_i64")]
    pub timestamp: i64,
}

impl InteractWordMessage {
    /// Decoded interaction code.
    pub fn interaction(&self) -> Interaction {
        match self.msg_type {
            1 => Interaction::Enter,
            2 => Interaction::Follow,
            3 => Interaction::Share,
            4 => Interaction::SpecialFollow,
            5 => Interaction::MutualFollow,
            other => Interaction::Other(other),
        }
    }
}
