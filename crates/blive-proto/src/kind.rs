//! Command kind table.
//!
//! Every command name the server sends falls in one of three buckets:
//! decoded into an [`Event`](crate::Event), explicitly ignored, or unknown.
//! The table is built once on first use and never changes afterwards.

use crate::command::PayloadField;
use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

/// Command kinds that are decoded into typed events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    /// `_HEARTBEAT`: synthesized by the client from the heartbeat reply.
    Heartbeat,
    /// `DANMU_MSG`: a chat message.
    Danmaku,
    /// `SEND_GIFT`
    Gift,
    /// `GUARD_BUY`: someone bought a guard membership.
    GuardBuy,
    /// `SUPER_CHAT_MESSAGE`: paid pinned message.
    SuperChat,
    /// `SUPER_CHAT_MESSAGE_DELETE`
    SuperChatDelete,
    /// `LIKE_INFO_V3_CLICK`: a viewer liked the stream.
    LikeClick,
    /// `WELCOME`: legacy room-entry notice.
    Welcome,
    /// `ENTRY_EFFECT`: guard or high-rank viewer entered with an effect.
    EntryEffect,
    /// `INTERACT_WORD`: viewer entered, followed or shared.
    InteractWord,
}

impl CommandKind {
    /// All decoded kinds, in table order.
    pub const ALL: [CommandKind; 10] = [
        Self::Heartbeat,
        Self::Danmaku,
        Self::Gift,
        Self::GuardBuy,
        Self::SuperChat,
        Self::SuperChatDelete,
        Self::LikeClick,
        Self::Welcome,
        Self::EntryEffect,
        Self::InteractWord,
    ];

    /// Wire name of this kind (without any version suffix).
    pub fn name(self) -> &'static str {
        match self {
            Self::Heartbeat => "_HEARTBEAT",
            Self::Danmaku => "DANMU_MSG",
            Self::Gift => "SEND_GIFT",
            Self::GuardBuy => "GUARD_BUY",
            Self::SuperChat => "SUPER_CHAT_MESSAGE",
            Self::SuperChatDelete => "SUPER_CHAT_MESSAGE_DELETE",
            Self::LikeClick => "LIKE_INFO_V3_CLICK",
            Self::Welcome => "WELCOME",
            Self::EntryEffect => "ENTRY_EFFECT",
            Self::InteractWord => "INTERACT_WORD",
        }
    }

    /// Field of the envelope that holds this kind's payload.
    pub fn payload_field(self) -> PayloadField {
        match self {
            Self::Danmaku => PayloadField::Info,
            _ => PayloadField::Data,
        }
    }

    /// Exact lookup of a normalized name among the decoded kinds.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Commands that are common on the wire but carry nothing of interest.
pub const IGNORED_COMMANDS: &[&str] = &[
    "WATCHED_CHANGE",
    "COMBO_SEND",
    "HOT_RANK_CHANGED",
    "HOT_RANK_CHANGED_V2",
    "LIVE",
    "LIVE_INTERACTIVE_GAME",
    "NOTICE_MSG",
    "ONLINE_RANK_COUNT",
    "ONLINE_RANK_TOP3",
    "ONLINE_RANK_V2",
    "PK_BATTLE_END",
    "PK_BATTLE_FINAL_PROCESS",
    "PK_BATTLE_PROCESS",
    "PK_BATTLE_PROCESS_NEW",
    "PK_BATTLE_SETTLE",
    "PK_BATTLE_SETTLE_USER",
    "PK_BATTLE_SETTLE_V2",
    "PREPARING",
    "STOP_LIVE_ROOM_LIST",
    "SUPER_CHAT_MESSAGE_JPN",
    "WIDGET_BANNER",
];

/// What to do with a command of a known name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Decode the payload and deliver the typed event.
    Decode(CommandKind),
    /// Known but uninteresting; drop silently.
    Ignored,
}

fn table() -> &'static HashMap<&'static str, Route> {
    static TABLE: OnceLock<HashMap<&'static str, Route>> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut table = HashMap::with_capacity(CommandKind::ALL.len() + IGNORED_COMMANDS.len());
        for kind in CommandKind::ALL {
            table.insert(kind.name(), Route::Decode(kind));
        }
        // A decoded kind always wins over the ignore list.
        for &name in IGNORED_COMMANDS {
            table.entry(name).or_insert(Route::Ignored);
        }
        table
    })
}

/// Look up a normalized command name. `None` means the name is unknown.
pub fn route(name: &str) -> Option<Route> {
    table().get(name).copied()
}

/// Strip the protocol version suffix: everything from the first `:` on.
///
/// ```rust
/// assert_eq!(blive_proto::normalize_cmd("DANMU_MSG:4:0:2:2:2:0"), "DANMU_MSG");
/// assert_eq!(blive_proto::normalize_cmd("SEND_GIFT"), "SEND_GIFT");
/// ```
pub fn normalize_cmd(cmd: &str) -> &str {
    cmd.split_once(':').map_or(cmd, |(head, _)| head)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn every_kind_routes_to_itself() {
        for kind in CommandKind::ALL {
            assert_eq!(route(kind.name()), Some(Route::Decode(kind)));
            assert_eq!(CommandKind::from_name(kind.name()), Some(kind));
        }
    }

    #[test]
    fn ignored_commands_route_to_ignored() {
        for &name in IGNORED_COMMANDS {
            assert_eq!(route(name), Some(Route::Ignored), "{name}");
        }
    }

    #[test]
    fn unknown_names_have_no_route() {
        assert_eq!(route("UNKNOWN_KIND_X"), None);
        assert_eq!(route(""), None);
        // Lookup is exact, suffixes must be stripped first.
        assert_eq!(route("DANMU_MSG:2"), None);
        assert_eq!(route("danmu_msg"), None);
    }

    #[test]
    fn only_chat_reads_info() {
        for kind in CommandKind::ALL {
            let expected = if kind == CommandKind::Danmaku {
                PayloadField::Info
            } else {
                PayloadField::Data
            };
            assert_eq!(kind.payload_field(), expected, "{kind}");
        }
    }

    #[test]
    fn normalize_keeps_text_before_first_colon() {
        assert_eq!(normalize_cmd("DANMU_MSG:2"), "DANMU_MSG");
        assert_eq!(normalize_cmd("A:B:C"), "A");
        assert_eq!(normalize_cmd(":x"), "");
        assert_eq!(normalize_cmd("PLAIN"), "PLAIN");
    }

    proptest! {
        #[test]
        fn suffix_never_changes_the_route(
            head in "[A-Z_]{1,24}",
            suffix in "[0-9:A-Za-z]{0,12}",
        ) {
            let cmd = format!("{head}:{suffix}");
            prop_assert_eq!(normalize_cmd(&cmd), head.as_str());
            prop_assert_eq!(route(normalize_cmd(&cmd)), route(&head));
        }
    }
}
