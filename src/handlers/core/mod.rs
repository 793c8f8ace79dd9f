//! Core handler infrastructure.
//!
//! This module contains the dispatcher, the per-dispatch context type and the
//! typed callback trait that concrete handlers implement.
//!
//! - [`Dispatcher`]: normalizes the command name, classifies it through the
//!   fixed kind table, decodes the payload and awaits the callback
//! - [`LiveHandler`]: one default no-op callback per event kind
//! - [`RoomContext`]: identifies the room a command came from

pub mod context;
pub mod registry;
pub mod traits;

pub use context::RoomContext;
pub use registry::{Dispatched, Dispatcher};
pub use traits::{LiveHandler, NoopHandler};
