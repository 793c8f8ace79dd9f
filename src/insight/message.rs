//! Messages carried by the insight queue.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use uuid::Uuid;

/// What a queued message represents.
///
/// Only [`InsightKind::Chat`] is forwarded downstream today. Other kinds are
/// drained and dropped by the consumer so that new producers can be added
/// before the consumer learns about them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    Chat,
    Gift,
    Enter,
}

impl InsightKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Chat => "chat",
            Self::Gift => "gift",
            Self::Enter => "enter",
        }
    }
}

impl fmt::Display for InsightKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One unit of work for the insight consumer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsightMessage {
    /// Correlates log lines for this message.
    pub id: Uuid,
    pub kind: InsightKind,
    pub user_name: String,
    pub content: String,
    /// Kind-specific extra data, e.g. the price of a super chat.
    pub expand: Option<String>,
    pub room_id: u64,
    pub received_at: DateTime<Utc>,
}

impl InsightMessage {
    pub fn new(
        kind: InsightKind,
        room_id: u64,
        user_name: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            user_name: user_name.into(),
            content: content.into(),
            expand: None,
            room_id,
            received_at: Utc::now(),
        }
    }

    /// Shorthand for a chat message.
    pub fn chat(room_id: u64, user_name: impl Into<String>, content: impl Into<String>) -> Self {
        Self::new(InsightKind::Chat, room_id, user_name, content)
    }

    pub fn with_expand(mut self, expand: impl Into<String>) -> Self {
        self.expand = Some(expand.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&InsightKind::Chat).unwrap(), "\"chat\"");
        assert_eq!(InsightKind::Enter.to_string(), "enter");
    }

    #[test]
    fn chat_builder() {
        let m = InsightMessage::chat(123, "Alice", "hello").with_expand("super_chat:30");
        assert_eq!(m.kind, InsightKind::Chat);
        assert_eq!(m.user_name, "Alice");
        assert_eq!(m.content, "hello");
        assert_eq!(m.expand.as_deref(), Some("super_chat:30"));
        assert_eq!(m.room_id, 123);
    }
}
