//! livechat-insight: live-room command dispatch and insight pipeline.
//!
//! Raw live-room commands are classified and decoded by the
//! [`handlers::Dispatcher`], delivered to a [`handlers::LiveHandler`], and
//! chat-shaped events flow through the [`insight`] queue to a single consumer
//! that mirrors them and forwards them to a conversational [`engine`].

pub mod config;
pub mod diagnostics;
pub mod engine;
pub mod error;
pub mod handlers;
pub mod http;
pub mod ingest;
pub mod insight;
pub mod metrics;
pub mod output;
pub mod telemetry;
