//! Engine that accepts every chat and never answers.
//!
//! Used when `engine.backend = "none"`.

use super::ConversationEngine;
use async_trait::async_trait;
use tracing::debug;

pub struct NoopEngine;

#[async_trait]
impl ConversationEngine for NoopEngine {
    async fn chat(&self, user_name: &str, query: &str) -> anyhow::Result<String> {
        debug!(user = %user_name, query = %query, "No engine configured; chat dropped");
        Ok(String::new())
    }
}
