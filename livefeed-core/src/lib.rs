#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![forbid(unsafe_code)]

pub mod config;
pub mod events;
pub mod render;
pub mod scheduler;
pub mod source;

pub use livefeed_sdk::objects::{Event, EventId, EventKind};
