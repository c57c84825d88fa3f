//! Shared helpers for livefeed-core integration tests.
#![allow(dead_code)]

pub mod mock_renderer;

use livefeed_core::{Event, EventKind};
use time::OffsetDateTime;

pub fn gift(id: &str) -> Event {
    Event::new(id, EventKind::AnimatedGift, OffsetDateTime::now_utc())
}

pub fn message(id: &str) -> Event {
    Event::new(id, EventKind::Message, OffsetDateTime::now_utc())
}

pub fn message_aged(id: &str, age: time::Duration) -> Event {
    Event::new(id, EventKind::Message, OffsetDateTime::now_utc() - age)
}
