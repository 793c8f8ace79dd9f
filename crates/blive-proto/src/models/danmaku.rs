//! `DANMU_MSG` chat messages.
//!
//! Unlike every other command, chat messages carry a positional array under
//! `info` instead of an object under `data`:
//!
//! ```text
//! info[0]  [_, mode, font_size, color, timestamp, rnd, _, uid_crc32, _, msg_type, bubble, ...]
//! info[1]  message text
//! info[2]  [uid, uname, admin, vip, svip, urank, mobile_verify, uname_color]
//! info[3]  [medal_level, medal_name, anchor_name, room_id, color, ...] or []
//! info[4]  [user_level, _, level_color, level_rank]
//! info[5]  [old_title, title]
//! info[7]  privilege (guard) type
//! ```

use crate::de::value_to_i64;
use serde_json::Value;

/// Fan medal shown next to the sender's name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FansMedal {
    /// Medal level.
    pub level: i64,
    /// Medal label.
    pub name: String,
    /// Name of the streamer the medal belongs to.
    pub anchor_name: String,
    /// Room of that streamer.
    pub room_id: i64,
    /// Medal color as a packed RGB integer.
    pub color: i64,
}

/// A chat message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DanmakuMessage {
    /// Display mode (scrolling, top, bottom).
    pub mode: i64,
    /// Font size.
    pub font_size: i64,
    /// Text color as a packed RGB integer.
    pub color: i64,
    /// Send time in milliseconds.
    pub timestamp: i64,
    /// Client-side random nonce.
    pub rnd: String,
    /// CRC32 of the sender uid, hex encoded.
    pub uid_crc32: String,
    /// 0 for text, 1 for emoticon.
    pub msg_type: i64,
    /// Chat bubble id.
    pub bubble: i64,

    /// Message text.
    pub msg: String,

    /// Sender uid.
    pub uid: i64,
    /// Sender display name.
    pub uname: String,
    /// Sender is a room admin.
    pub admin: bool,
    /// Sender is a monthly VIP.
    pub vip: bool,
    /// Sender is a yearly VIP.
    pub svip: bool,
    /// Sender rank.
    pub urank: i64,
    /// Sender has a verified phone number.
    pub mobile_verify: bool,
    /// Name color as sent.
    pub uname_color: String,

    /// Fan medal, when the sender wears one.
    pub medal: Option<FansMedal>,

    /// User level.
    pub user_level: i64,

    /// Old style title id.
    pub old_title: String,
    /// Title id.
    pub title: String,

    /// Guard level: 0 none, 1 governor, 2 admiral, 3 captain.
    pub privilege_type: i64,
}

fn at<'a>(value: &'a Value, path: &[usize]) -> &'a Value {
    path.iter().fold(value, |v, &i| &v[i])
}

fn int(value: &Value, path: &[usize]) -> i64 {
    value_to_i64(at(value, path)).unwrap_or(0)
}

fn flag(value: &Value, path: &[usize]) -> bool {
    int(value, path) != 0
}

fn text(value: &Value, path: &[usize]) -> String {
    match at(value, path) {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

impl DanmakuMessage {
    /// Decode from the `info` array.
    ///
    /// The message text, sender uid and sender name are required; every other
    /// position falls back to an empty value when absent.
    pub fn from_info(info: &Value) -> Result<Self, String> {
        if !info.is_array() {
            return Err("`info` is not an array".to_owned());
        }
        let msg = at(info, &[1])
            .as_str()
            .ok_or("info[1] (message text) is not a string")?
            .to_owned();
        let uid = value_to_i64(at(info, &[2, 0]))
            .filter(|_| !at(info, &[2, 0]).is_null())
            .ok_or("info[2][0] (sender uid) is not an integer")?;
        let uname = at(info, &[2, 1])
            .as_str()
            .ok_or("info[2][1] (sender name) is not a string")?
            .to_owned();

        let medal = match at(info, &[3]) {
            Value::Array(m) if !m.is_empty() => Some(FansMedal {
                level: int(info, &[3, 0]),
                name: text(info, &[3, 1]),
                anchor_name: text(info, &[3, 2]),
                room_id: int(info, &[3, 3]),
                color: int(info, &[3, 4]),
            }),
            _ => None,
        };

        Ok(Self {
            mode: int(info, &[0, 1]),
            font_size: int(info, &[0, 2]),
            color: int(info, &[0, 3]),
            timestamp: int(info, &[0, 4]),
            rnd: text(info, &[0, 5]),
            uid_crc32: text(info, &[0, 7]),
            msg_type: int(info, &[0, 9]),
            bubble: int(info, &[0, 10]),
            msg,
            uid,
            uname,
            admin: flag(info, &[2, 2]),
            vip: flag(info, &[2, 3]),
            svip: flag(info, &[2, 4]),
            urank: int(info, &[2, 5]),
            mobile_verify: flag(info, &[2, 6]),
            uname_color: text(info, &[2, 7]),
            medal,
            user_level: int(info, &[4, 0]),
            old_title: text(info, &[5, 0]),
            title: text(info, &[5, 1]),
            privilege_type: int(info, &[7]),
        })
    }
}
