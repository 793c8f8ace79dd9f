//! Configuration loading and management.
//!
//! This module is split into logical submodules:
//! - [`types`]: Config struct definitions and TOML loading
//! - [`defaults`]: serde default functions
//! - [`validation`]: startup checks that TOML alone cannot express

mod defaults;
mod types;
mod validation;

pub use types::{
    Config, ConfigError, EngineBackend, EngineConfig, InsightConfig, LogFormat, LoggingConfig,
    RoomConfig, ServerConfig, TextGenerationConfig,
};
pub use validation::{MAX_TEXT_GENERATION_RETRIES, ValidationError, validate};
