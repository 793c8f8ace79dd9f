//! insightd - live-room chat insight daemon
//!
//! Replays live-room commands per room, dispatches them, and forwards chat
//! to a conversational engine through the insight queue.

use livechat_insight::config::{self, Config, LogFormat, LoggingConfig};
use livechat_insight::handlers::{Dispatcher, InsightHandler};
use livechat_insight::insight::{InsightConsumer, InsightQueue};
use livechat_insight::output::{BroadcastMirror, ChatTextFormatter, spawn_log_subscriber};
use livechat_insight::{diagnostics, engine, http, ingest, metrics};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.filter));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);
    match logging.format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string());

    let config = match Config::load(&config_path) {
        Ok(config) => config,
        Err(e) => {
            // Tracing is configured from the file, so this goes to stderr.
            eprintln!("Failed to load config {config_path}: {e}");
            return Err(e.into());
        }
    };

    init_tracing(&config.logging);
    info!(server = %config.server.name, rooms = config.rooms.len(), "Starting insightd");

    if let Err(errors) = config::validate(&config) {
        for e in &errors {
            error!(error = %e, "Invalid configuration");
        }
        anyhow::bail!("configuration has {} error(s)", errors.len());
    }

    diagnostics::init();
    metrics::init();
    info!("Metrics initialized");

    // Output side: formatter, mirror, engine, consumer.
    let engine = engine::build(&config.engine)?;
    let mirror = BroadcastMirror::new(config.insight.mirror_capacity);
    let mirror_log = spawn_log_subscriber(&mirror);
    let formatter = ChatTextFormatter::new(config.insight.max_chat_chars);

    let (queue, receiver) = InsightQueue::new(config.insight.high_water_mark);
    let depth = queue.depth_probe();
    let consumer = InsightConsumer::new(Arc::new(formatter), Arc::new(mirror), engine)
        .spawn(receiver);

    if let Some(port) = config.server.metrics_port {
        let depth = depth.clone();
        tokio::spawn(async move {
            http::run_http_server(port, depth).await;
        });
        info!(port, "Prometheus HTTP server started");
    } else {
        info!("Metrics endpoint disabled");
    }

    // Input side: one replay task per room.
    let dispatcher = Arc::new(Dispatcher::new(InsightHandler::new(
        queue,
        config.insight.clone(),
    )));
    let mut rooms = ingest::spawn_rooms(Arc::clone(&dispatcher), &config.rooms);
    drop(dispatcher);

    loop {
        tokio::select! {
            joined = rooms.join_next() => match joined {
                Some(Ok((room, Ok(stats)))) => info!(
                    room,
                    lines = stats.lines,
                    handled = stats.handled,
                    ignored = stats.ignored,
                    unknown = stats.unknown,
                    rejected = stats.rejected,
                    "Room ingest finished"
                ),
                Some(Ok((room, Err(e)))) => error!(room, error = %e, "Room ingest failed"),
                Some(Err(e)) => error!(error = %e, "Room ingest task panicked"),
                None => break,
            },
            _ = tokio::signal::ctrl_c() => {
                warn!("Interrupted; stopping room ingest");
                rooms.shutdown().await;
                break;
            }
        }
    }

    // Every producer handle is gone once the room tasks end; the consumer
    // drains what is left and exits.
    info!(pending = depth.get(), "Waiting for insight consumer to drain");
    if let Err(e) = consumer.await {
        error!(error = %e, "Insight consumer task failed");
    }
    if let Err(e) = mirror_log.await {
        error!(error = %e, "Realtime log subscriber failed");
    }

    info!("insightd stopped");
    Ok(())
}
