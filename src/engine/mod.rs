//! Conversational engine abstraction.

use crate::config::{EngineBackend, EngineConfig};
use anyhow::Context;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

pub mod noop;
pub mod text_generation;

pub use noop::NoopEngine;
pub use text_generation::TextGenerationEngine;

/// Downstream conversational engine that answers chat messages.
#[async_trait]
pub trait ConversationEngine: Send + Sync {
    /// Ask the engine to respond to `query` from `user_name`.
    async fn chat(&self, user_name: &str, query: &str) -> anyhow::Result<String>;
}

/// Build the engine selected by `config.backend`.
pub fn build(config: &EngineConfig) -> anyhow::Result<Arc<dyn ConversationEngine>> {
    match config.backend {
        EngineBackend::TextGeneration => {
            let tg = config
                .text_generation
                .clone()
                .context("engine.backend = \"text-generation\" without [engine.text-generation]")?;
            let engine = TextGenerationEngine::new(tg)?;
            info!(endpoint = %engine.endpoint(), "Using text-generation engine");
            Ok(Arc::new(engine))
        }
        EngineBackend::None => {
            info!("No conversational engine configured. Using NoOp.");
            Ok(Arc::new(NoopEngine))
        }
    }
}
