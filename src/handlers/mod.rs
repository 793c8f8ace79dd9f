//! Live-room command handlers.
//!
//! Commands arrive as [`RawCommand`](blive_proto::RawCommand)s from the
//! network client, are routed by the [`Dispatcher`] and end up in a
//! [`LiveHandler`] callback. [`InsightHandler`] is the production handler: it
//! turns chat-shaped events into insight queue messages.

mod core;
mod insight;

pub use self::core::{Dispatched, Dispatcher, LiveHandler, NoopHandler, RoomContext};
pub use self::insight::InsightHandler;
