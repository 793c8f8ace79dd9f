//! Default value functions for configuration.
//!
//! Separated into its own module for clarity and reuse.

/// Returns `true` (for serde defaults).
pub fn default_true() -> bool {
    true
}

// =============================================================================
// Server / Logging Defaults
// =============================================================================

pub fn default_server_name() -> String {
    "insightd".to_string()
}

pub fn default_log_filter() -> String {
    "info".to_string()
}

// =============================================================================
// Insight Queue Defaults
// =============================================================================

pub fn default_high_water_mark() -> usize {
    256
}

pub fn default_max_chat_chars() -> usize {
    200
}

pub fn default_mirror_capacity() -> usize {
    1024
}

// =============================================================================
// Text Generation Defaults
// =============================================================================

pub fn default_max_new_tokens() -> u32 {
    2048
}

pub fn default_temperature() -> f32 {
    0.7
}

pub fn default_top_p() -> f32 {
    0.9
}

pub fn default_max_retries() -> u32 {
    3
}

pub fn default_short_history_len() -> usize {
    8
}

pub fn default_request_timeout_secs() -> u64 {
    120
}

// =============================================================================
// Room Defaults
// =============================================================================

pub fn default_replay_source() -> String {
    "-".to_string()
}
