//! Insight queue pipeline.
//!
//! Handlers enqueue [`InsightMessage`]s through cloneable [`InsightQueue`]
//! handles; one [`InsightConsumer`] task drains them in order into the
//! realtime mirror and the conversational engine.

mod consumer;
mod message;
mod queue;

pub use consumer::{InsightConsumer, Processed};
pub use message::{InsightKind, InsightMessage};
pub use queue::{DepthProbe, InsightQueue, InsightReceiver};
