//! Prometheus metrics collection for livechat-insight.
//!
//! Exposed on the HTTP endpoint in [`crate::http`] when a metrics port is
//! configured.
//!
//! - `livechat_command_total{command}` - Commands dispatched by kind
//! - `livechat_command_duration_seconds{command}` - Dispatch latency including the callback
//! - `livechat_command_errors_total{command,error}` - Unknown kinds and decode failures
//! - `livechat_insight_queue_depth` - Messages waiting for the consumer
//! - `livechat_insight_processed_total{kind,outcome}` - Consumer outcomes

use prometheus::{
    Encoder, Histogram, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts,
    Registry, TextEncoder,
};
use std::sync::OnceLock;

/// Global Prometheus registry for all metrics.
pub static REGISTRY: OnceLock<Registry> = OnceLock::new();

pub fn registry() -> &'static Registry {
    REGISTRY.get_or_init(Registry::new)
}

// ========================================================================
// Dispatch
// ========================================================================

/// Commands dispatched to a callback, by kind.
pub static COMMAND_COUNTER: OnceLock<IntCounterVec> = OnceLock::new();

/// Dispatch latency by kind, including the awaited callback.
pub static COMMAND_LATENCY: OnceLock<HistogramVec> = OnceLock::new();

/// Dispatch errors by command and error kind.
pub static COMMAND_ERRORS: OnceLock<IntCounterVec> = OnceLock::new();

/// Commands dropped because their kind is on the ignore list.
pub static COMMANDS_IGNORED: OnceLock<IntCounter> = OnceLock::new();

// ========================================================================
// Insight pipeline
// ========================================================================

/// Messages accepted into the insight queue, by kind.
pub static INSIGHT_ENQUEUED: OnceLock<IntCounterVec> = OnceLock::new();

/// Messages waiting for the consumer.
pub static INSIGHT_QUEUE_DEPTH: OnceLock<IntGauge> = OnceLock::new();

/// Consumer outcomes by kind: forwarded, skipped, failed.
pub static INSIGHT_PROCESSED: OnceLock<IntCounterVec> = OnceLock::new();

/// Conversational engine call latency.
pub static ENGINE_LATENCY: OnceLock<Histogram> = OnceLock::new();

/// Initialize the Prometheus metrics registry.
///
/// Must be called once at startup before any metrics are recorded.
pub fn init() {
    let r = registry();

    // Helper macro to register metric
    macro_rules! register {
        ($metric:ident, $init:expr) => {
            let m = $init.expect(concat!(stringify!($metric), " creation failed"));
            if let Err(e) = r.register(Box::new(m.clone())) {
                tracing::warn!(error = %e, concat!("Failed to register metric ", stringify!($metric)));
            }
            let _ = $metric.set(m);
        };
    }

    register!(COMMAND_COUNTER, IntCounterVec::new(Opts::new("livechat_command_total", "Live-room commands dispatched by kind"), &["command"]));
    register!(COMMAND_LATENCY, HistogramVec::new(
        HistogramOpts::new("livechat_command_duration_seconds", "Dispatch latency by kind")
            .buckets(vec![0.00005, 0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5]),
        &["command"]));
    register!(COMMAND_ERRORS, IntCounterVec::new(Opts::new("livechat_command_errors_total", "Dispatch errors by command and kind"), &["command", "error"]));
    register!(COMMANDS_IGNORED, IntCounter::new("livechat_commands_ignored_total", "Commands dropped by the ignore list"));

    register!(INSIGHT_ENQUEUED, IntCounterVec::new(Opts::new("livechat_insight_enqueued_total", "Insight messages enqueued by kind"), &["kind"]));
    register!(INSIGHT_QUEUE_DEPTH, IntGauge::new("livechat_insight_queue_depth", "Insight messages waiting for the consumer"));
    register!(INSIGHT_PROCESSED, IntCounterVec::new(Opts::new("livechat_insight_processed_total", "Insight consumer outcomes"), &["kind", "outcome"]));
    register!(ENGINE_LATENCY, Histogram::with_opts(
        HistogramOpts::new("livechat_engine_duration_seconds", "Conversational engine call latency")
            .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0])));
}

/// Gather all metrics and encode them in Prometheus text format.
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = registry().gather();
    let mut buffer = vec![];
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!(error = %e, "Failed to encode Prometheus metrics");
        return String::new();
    }
    match String::from_utf8(buffer) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "Prometheus metrics were not valid UTF-8");
            String::new()
        }
    }
}

// ============================================================================
// Helper functions for metric updates
// ============================================================================

/// Record a dispatched command with latency.
#[inline]
pub fn record_command(command: &str, duration_secs: f64) {
    if let Some(c) = COMMAND_COUNTER.get() {
        c.with_label_values(&[command]).inc();
    }
    if let Some(h) = COMMAND_LATENCY.get() {
        h.with_label_values(&[command]).observe(duration_secs);
    }
}

/// Record a dispatch error.
#[inline]
pub fn record_command_error(command: &str, error: &str) {
    if let Some(c) = COMMAND_ERRORS.get() {
        c.with_label_values(&[command, error]).inc();
    }
}

/// Record a command dropped by the ignore list.
#[inline]
pub fn record_ignored() {
    if let Some(c) = COMMANDS_IGNORED.get() {
        c.inc();
    }
}

/// Record an enqueue and the resulting queue depth.
#[inline]
pub fn record_enqueued(kind: &str, depth: usize) {
    if let Some(c) = INSIGHT_ENQUEUED.get() {
        c.with_label_values(&[kind]).inc();
    }
    set_queue_depth(depth);
}

/// Update the queue depth gauge.
#[inline]
pub fn set_queue_depth(depth: usize) {
    if let Some(g) = INSIGHT_QUEUE_DEPTH.get() {
        g.set(i64::try_from(depth).unwrap_or(i64::MAX));
    }
}

/// Record a consumer outcome.
#[inline]
pub fn record_processed(kind: &str, outcome: &str) {
    if let Some(c) = INSIGHT_PROCESSED.get() {
        c.with_label_values(&[kind, outcome]).inc();
    }
}

/// Record an engine call.
#[inline]
pub fn record_engine_call(duration_secs: f64) {
    if let Some(h) = ENGINE_LATENCY.get() {
        h.observe(duration_secs);
    }
}
