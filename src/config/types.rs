//! Core configuration types and loading.

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

use super::defaults::*;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Daemon configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Process identity and metrics endpoint.
    #[serde(default)]
    pub server: ServerConfig,
    /// Log output.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Insight queue and insight handler behavior.
    #[serde(default)]
    pub insight: InsightConfig,
    /// Conversational engine selection.
    #[serde(default)]
    pub engine: EngineConfig,
    /// Rooms to ingest commands for.
    #[serde(default)]
    pub rooms: Vec<RoomConfig>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

/// Process identity configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Name used in the startup banner.
    #[serde(default = "default_server_name")]
    pub name: String,
    /// Prometheus metrics HTTP port. Metrics are not served when unset.
    pub metrics_port: Option<u16>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: default_server_name(),
            metrics_port: None,
        }
    }
}

/// Log line format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Logging configuration. `RUST_LOG` takes precedence over `filter`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub format: LogFormat,
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            filter: default_log_filter(),
        }
    }
}

/// Insight pipeline configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct InsightConfig {
    /// Queue depth at which a warning is logged. The queue itself is unbounded.
    #[serde(default = "default_high_water_mark")]
    pub high_water_mark: usize,
    /// Forward super chats to the engine as chat messages.
    #[serde(default = "default_true")]
    pub forward_super_chat: bool,
    /// Queue gifts (dequeued but not sent to the engine).
    #[serde(default)]
    pub forward_gifts: bool,
    /// Queue room entries (dequeued but not sent to the engine).
    #[serde(default)]
    pub forward_enter: bool,
    /// Longest chat text mirrored to the realtime channel, in characters.
    #[serde(default = "default_max_chat_chars")]
    pub max_chat_chars: usize,
    /// Buffered realtime messages per mirror subscriber.
    #[serde(default = "default_mirror_capacity")]
    pub mirror_capacity: usize,
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self {
            high_water_mark: default_high_water_mark(),
            forward_super_chat: true,
            forward_gifts: false,
            forward_enter: false,
            max_chat_chars: default_max_chat_chars(),
            mirror_capacity: default_mirror_capacity(),
        }
    }
}

/// Which conversational engine receives chat messages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EngineBackend {
    #[default]
    None,
    TextGeneration,
}

/// Engine configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub backend: EngineBackend,
    #[serde(default, rename = "text-generation")]
    pub text_generation: Option<TextGenerationConfig>,
}

/// Settings for a text-generation-webui style HTTP backend.
#[derive(Debug, Clone, Deserialize)]
pub struct TextGenerationConfig {
    /// Base URL, e.g. "http://127.0.0.1:5000". `/api/v1/generate` is appended.
    pub api_url: String,
    /// Persona prompt prepended to every request.
    #[serde(default)]
    pub persona_prompt: String,
    #[serde(default = "default_max_new_tokens")]
    pub max_new_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_top_p")]
    pub top_p: f32,
    /// Extra attempts after a failed or empty reply.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Number of (query, reply) pairs sent back as short-term history.
    #[serde(default = "default_short_history_len")]
    pub short_history_len: usize,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

/// One live room.
#[derive(Debug, Clone, Deserialize)]
pub struct RoomConfig {
    /// Room id, used in logs.
    pub id: u64,
    /// Newline-delimited JSON command source: a file path or "-" for stdin.
    #[serde(default = "default_replay_source")]
    pub replay: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.name, "insightd");
        assert_eq!(config.server.metrics_port, None);
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert_eq!(config.insight.high_water_mark, 256);
        assert!(config.insight.forward_super_chat);
        assert!(!config.insight.forward_gifts);
        assert_eq!(config.engine.backend, EngineBackend::None);
        assert!(config.rooms.is_empty());
    }

    #[test]
    fn text_generation_section() {
        let config: Config = toml::from_str(
            r#"
[engine]
backend = "text-generation"

[engine.text-generation]
api_url = "http://127.0.0.1:5000"
temperature = 0.5

[[rooms]]
id = 123

[[rooms]]
id = 456
replay = "room456.jsonl"
"#,
        )
        .unwrap();
        assert_eq!(config.engine.backend, EngineBackend::TextGeneration);
        let tg = config.engine.text_generation.unwrap();
        assert_eq!(tg.api_url, "http://127.0.0.1:5000");
        assert_eq!(tg.temperature, 0.5);
        assert_eq!(tg.max_retries, 3);
        assert_eq!(tg.max_new_tokens, 2048);
        assert_eq!(config.rooms.len(), 2);
        assert_eq!(config.rooms[0].replay, "-");
        assert_eq!(config.rooms[1].replay, "room456.jsonl");
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[logging]\nformat = \"json\"\nfilter = \"debug\"").unwrap();
        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.logging.filter, "debug");
    }

    #[test]
    fn load_reports_missing_file() {
        let err = Config::load("/nonexistent/insightd.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn load_reports_parse_errors() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[engine]\nbackend = \"carrier-pigeon\"").unwrap();
        let err = Config::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
