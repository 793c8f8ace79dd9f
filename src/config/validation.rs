//! Configuration validation.
//!
//! Validates configuration at startup to catch common errors early.

use super::{Config, EngineBackend};
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

/// Upper bound for `engine.text-generation.max_retries`.
pub const MAX_TEXT_GENERATION_RETRIES: u32 = 10;

/// Validation errors for configuration.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("at least one [[rooms]] entry is required")]
    NoRooms,
    #[error("room {0} is configured more than once")]
    DuplicateRoom(u64),
    #[error("only one room may replay from stdin, got {0}")]
    SharedStdin(usize),
    #[error("room {room} replay file does not exist: {path}")]
    ReplayNotFound { room: u64, path: String },
    #[error("insight.high_water_mark must be greater than zero")]
    ZeroHighWaterMark,
    #[error("insight.max_chat_chars must be greater than zero")]
    ZeroMaxChatChars,
    #[error("insight.mirror_capacity must be greater than zero")]
    ZeroMirrorCapacity,
    #[error("engine.backend = \"text-generation\" requires an [engine.text-generation] section")]
    MissingTextGeneration,
    #[error("engine.text-generation.api_url must be an http(s) URL, got '{0}'")]
    InvalidApiUrl(String),
    #[error("engine.text-generation.max_retries must be at most {max}, got {got}")]
    TooManyRetries { got: u32, max: u32 },
}

/// Validate a configuration, returning all errors found.
pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    // Rooms
    if config.rooms.is_empty() {
        errors.push(ValidationError::NoRooms);
    }
    let mut seen = HashSet::new();
    for room in &config.rooms {
        if !seen.insert(room.id) {
            errors.push(ValidationError::DuplicateRoom(room.id));
        }
        if room.replay != "-" && !Path::new(&room.replay).exists() {
            errors.push(ValidationError::ReplayNotFound {
                room: room.id,
                path: room.replay.clone(),
            });
        }
    }
    let stdin_rooms = config.rooms.iter().filter(|r| r.replay == "-").count();
    if stdin_rooms > 1 {
        errors.push(ValidationError::SharedStdin(stdin_rooms));
    }

    // Insight pipeline
    if config.insight.high_water_mark == 0 {
        errors.push(ValidationError::ZeroHighWaterMark);
    }
    if config.insight.max_chat_chars == 0 {
        errors.push(ValidationError::ZeroMaxChatChars);
    }
    if config.insight.mirror_capacity == 0 {
        errors.push(ValidationError::ZeroMirrorCapacity);
    }

    // Engine
    if config.engine.backend == EngineBackend::TextGeneration {
        match &config.engine.text_generation {
            None => errors.push(ValidationError::MissingTextGeneration),
            Some(tg) => {
                if !(tg.api_url.starts_with("http://") || tg.api_url.starts_with("https://")) {
                    errors.push(ValidationError::InvalidApiUrl(tg.api_url.clone()));
                }
                if tg.max_retries > MAX_TEXT_GENERATION_RETRIES {
                    errors.push(ValidationError::TooManyRetries {
                        got: tg.max_retries,
                        max: MAX_TEXT_GENERATION_RETRIES,
                    });
                }
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
