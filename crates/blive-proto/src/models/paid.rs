//! Paid interactions: gifts, guard purchases and super chats.

use crate::de::{lenient_i64, lenient_string};
use serde::Deserialize;

/// `SEND_GIFT`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GiftMessage {
    /// Gift display name.
    #[serde(rename = "giftName")]
    pub gift_name: String,
    /// Number of gifts sent.
    #[serde(default, deserialize_with = "lenient_i64")]
    pub num: i64,
    /// Sender display name.
    pub uname: String,
    /// Sender avatar URL.
    #[serde(default)]
    pub face: String,
    /// Sender guard level.
    #[serde(default, deserialize_with = "lenient_i64")]
    pub guard_level: i64,
    /// Sender uid.
    #[serde(deserialize_with = "lenient_i64")]
    pub uid: i64,
    /// Send time in seconds.
    #[serde(default, deserialize_with = "lenient_i64")]
    pub timestamp: i64,
    /// Gift id.
    #[serde(default, rename = "giftId", deserialize_with = "lenient_i64")]
    pub gift_id: i64,
    /// Gift type.
    #[serde(default, rename = "giftType", deserialize_with = "lenient_i64")]
    pub gift_type: i64,
    /// Action verb shown in the room, usually "投喂".
    #[serde(default)]
    pub action: String,
    /// Unit price in coins (1000 gold coins = 1 CNY).
    #[serde(default, deserialize_with = "lenient_i64")]
    pub price: i64,
    /// Client-side random nonce.
    #[serde(default, deserialize_with = "lenient_string")]
    pub rnd: String,
    /// "silver" or "gold".
    #[serde(default)]
    pub coin_type: String,
    /// Total coins spent.
    #[serde(default, deserialize_with = "lenient_i64")]
    pub total_coin: i64,
}

impl GiftMessage {
    /// Whether the gift was paid for with gold coins.
    pub fn is_paid(&self) -> bool {
        self.coin_type == "gold"
    }
}

/// `GUARD_BUY`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GuardBuyMessage {
    /// Buyer uid.
    #[serde(deserialize_with = "lenient_i64")]
    pub uid: i64,
    /// Buyer display name.
    pub username: String,
    /// 1 governor, 2 admiral, 3 captain.
    #[serde(default, deserialize_with = "lenient_i64")]
    pub guard_level: i64,
    /// Number of months bought.
    #[serde(default, deserialize_with = "lenient_i64")]
    pub num: i64,
    /// Price in gold coins.
    #[serde(default, deserialize_with = "lenient_i64")]
    pub price: i64,
    /// Gift id.
    #[serde(default, deserialize_with = "lenient_i64")]
    pub gift_id: i64,
    /// Gift display name.
    #[serde(default)]
    pub gift_name: String,
    /// Start time in seconds.
    #[serde(default, deserialize_with = "lenient_i64")]
    pub start_time: i64,
    /// End time in seconds.
    #[serde(default, deserialize_with = "lenient_i64")]
    pub end_time: i64,
}

#[derive(Debug, Deserialize)]
struct SuperChatGift {
    #[serde(default, deserialize_with = "lenient_i64")]
    gift_id: i64,
    #[serde(default)]
    gift_name: String,
}

#[derive(Debug, Deserialize)]
struct SuperChatUser {
    uname: String,
    #[serde(default)]
    face: String,
    #[serde(default, deserialize_with = "lenient_i64")]
    guard_level: i64,
    #[serde(default, deserialize_with = "lenient_i64")]
    user_level: i64,
}

#[derive(Debug, Deserialize)]
struct SuperChatWire {
    #[serde(deserialize_with = "lenient_i64")]
    id: i64,
    #[serde(deserialize_with = "lenient_i64")]
    uid: i64,
    #[serde(default, deserialize_with = "lenient_i64")]
    price: i64,
    message: String,
    #[serde(default)]
    message_trans: String,
    #[serde(default, deserialize_with = "lenient_i64")]
    start_time: i64,
    #[serde(default, deserialize_with = "lenient_i64")]
    end_time: i64,
    #[serde(default, deserialize_with = "lenient_i64")]
    time: i64,
    #[serde(default)]
    background_color: String,
    gift: Option<SuperChatGift>,
    user_info: SuperChatUser,
}

/// `SUPER_CHAT_MESSAGE`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "SuperChatWire")]
pub struct SuperChatMessage {
    /// Super chat id, referenced by deletions.
    pub id: i64,
    /// Sender uid.
    pub uid: i64,
    /// Price in CNY.
    pub price: i64,
    /// Message text.
    pub message: String,
    /// Machine translation of the message (Japanese rooms).
    pub message_trans: String,
    /// Start time in seconds.
    pub start_time: i64,
    /// End time in seconds.
    pub end_time: i64,
    /// Remaining pinned time in seconds.
    pub time: i64,
    /// Gift id.
    pub gift_id: i64,
    /// Gift display name.
    pub gift_name: String,
    /// Sender display name.
    pub uname: String,
    /// Sender avatar URL.
    pub face: String,
    /// Sender guard level.
    pub guard_level: i64,
    /// Sender user level.
    pub user_level: i64,
    /// Background color as a CSS hex string.
    pub background_color: String,
}

impl From<SuperChatWire> for SuperChatMessage {
    fn from(w: SuperChatWire) -> Self {
        let (gift_id, gift_name) = w
            .gift
            .map(|g| (g.gift_id, g.gift_name))
            .unwrap_or_default();
        Self {
            id: w.id,
            uid: w.uid,
            price: w.price,
            message: w.message,
            message_trans: w.message_trans,
            start_time: w.start_time,
            end_time: w.end_time,
            time: w.time,
            gift_id,
            gift_name,
            uname: w.user_info.uname,
            face: w.user_info.face,
            guard_level: w.user_info.guard_level,
            user_level: w.user_info.user_level,
            background_color: w.background_color,
        }
    }
}

/// `SUPER_CHAT_MESSAGE_DELETE`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SuperChatDeleteMessage {
    /// Ids of the super chats that were taken down.
    #[serde(default)]
    pub ids: Vec<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn gift_accepts_string_numbers() {
        let gift: GiftMessage = serde_json::from_value(json!({
            "giftName": "辣条",
            "num": "3",
            "uname": "Carol",
            "uid": 42,
            "rnd": 1690000001,
            "coin_type": "silver",
            "total_coin": 300
        }))
        .unwrap();
        assert_eq!(gift.num, 3);
        assert_eq!(gift.rnd, "1690000001");
        assert!(!gift.is_paid());
        assert_eq!(gift.total_coin, 300);
    }

    #[test]
    fn gift_requires_sender() {
        let res: Result<GiftMessage, _> =
            serde_json::from_value(json!({"giftName": "x", "num": 1}));
        assert!(res.is_err());
    }

    #[test]
    fn super_chat_flattens_nested_objects() {
        let sc: SuperChatMessage = serde_json::from_value(json!({
            "id": "55",
            "uid": 9,
            "price": 30,
            "message": "keep going",
            "time": 60,
            "gift": {"gift_id": 12000, "gift_name": "醒目留言"},
            "user_info": {"uname": "Dave", "guard_level": 3, "user_level": 20}
        }))
        .unwrap();
        assert_eq!(sc.id, 55);
        assert_eq!(sc.uname, "Dave");
        assert_eq!(sc.gift_name, "醒目留言");
        assert_eq!(sc.guard_level, 3);
        assert_eq!(sc.message_trans, "");
    }

    #[test]
    fn super_chat_without_user_info_is_rejected() {
        let res: Result<SuperChatMessage, _> =
            serde_json::from_value(json!({"id": 1, "uid": 2, "message": "m"}));
        assert!(res.is_err());
    }
}
