//! # blive-proto
//!
//! Protocol types for bilibili live-room commands.
//!
//! The live-room server pushes JSON commands of the shape
//! `{"cmd": "DANMU_MSG:4:0:2:2:2:0", "info": [...]}` or
//! `{"cmd": "SEND_GIFT", "data": {...}}`. This crate owns:
//!
//! - [`RawCommand`]: the untyped command envelope as received from the wire
//! - [`CommandKind`] and [`route`]: the fixed table deciding whether a command
//!   name is decoded, explicitly ignored, or unknown
//! - [`Event`]: the closed set of typed messages and their payload decoders
//!
//! ## Quick Start
//!
//! ```rust
//! use blive_proto::{route, normalize_cmd, Event, RawCommand, Route};
//!
//! let raw = RawCommand::from_json(
//!     r#"{"cmd":"SUPER_CHAT_MESSAGE_DELETE","data":{"ids":[7,8]}}"#,
//! ).expect("valid command");
//!
//! if let Some(Route::Decode(kind)) = route(normalize_cmd(raw.cmd())) {
//!     let event = Event::decode(kind, &raw).expect("valid payload");
//!     assert_eq!(event.kind(), kind);
//! }
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod command;
mod de;
pub mod error;
pub mod kind;
pub mod models;

pub use self::command::{PayloadField, RawCommand};
pub use self::error::{ProtocolError, Result};
pub use self::kind::{normalize_cmd, route, CommandKind, Route, IGNORED_COMMANDS};
pub use self::models::{
    DanmakuMessage, EntryEffectMessage, Event, FansMedal, GiftMessage, GuardBuyMessage,
    HeartbeatMessage, Interaction, InteractWordMessage, LikeClickMessage,
    SuperChatDeleteMessage, SuperChatMessage, WelcomeMessage,
};
