//! Ordered, deduplicated event buffer.
//!
//! Entries keep arrival order. The only reordering happens inside a freshly
//! ingested batch, where animated gifts are moved ahead of everything else
//! before the batch is appended. Entries already queued never move.
//!
//! Each id appears at most once. The id set mirrors the queue contents, so a
//! drained or expired id can be queued again by a later delivery.

use super::MESSAGE_EXPIRY;
use livefeed_sdk::objects::{Event, EventId};
use std::collections::{HashSet, VecDeque};
use time::OffsetDateTime;
use tracing::debug;

/// Counts for one ingested batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestReport {
    /// Entries appended to the queue.
    pub queued: usize,
    /// Entries dropped because their id was already queued.
    pub duplicates: usize,
}

#[derive(Debug, Default)]
pub struct EventQueue {
    entries: VecDeque<Event>,
    ids: HashSet<EventId>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a batch: animated gifts first, then the rest, each group in
    /// batch order. An entry whose id is already queued is dropped, which
    /// keeps the first occurrence in queue order.
    pub fn ingest(&mut self, batch: Vec<Event>) -> IngestReport {
        let mut report = IngestReport::default();
        let (gifts, others): (Vec<Event>, Vec<Event>) =
            batch.into_iter().partition(Event::is_animated_gift);

        for event in gifts.into_iter().chain(others) {
            if self.ids.insert(event.id.clone()) {
                self.entries.push_back(event);
                report.queued += 1;
            } else {
                debug!(event_id = %event.id, "Dropped duplicate event");
                report.duplicates += 1;
            }
        }

        report
    }

    /// Drop stale messages from the head of the queue.
    ///
    /// Stops at the first entry that is not a message or not older than
    /// [`MESSAGE_EXPIRY`]. Returns how many entries were dropped.
    pub fn expire_stale_messages(&mut self, now: OffsetDateTime) -> usize {
        let mut expired = 0;
        while let Some(front) = self.entries.front() {
            if !is_stale_message(front, now) {
                break;
            }
            if let Some(event) = self.pop_front() {
                debug!(
                    event_id = %event.id,
                    age = %event.age_at(now),
                    "Dropped stale message"
                );
            }
            expired += 1;
        }
        expired
    }

    pub fn pop_front(&mut self) -> Option<Event> {
        let event = self.entries.pop_front()?;
        self.ids.remove(&event.id);
        Some(event)
    }

    /// Remove the first entry that is not an animated gift, wherever it sits.
    pub fn take_first_ordinary(&mut self) -> Option<Event> {
        let index = self.entries.iter().position(|e| !e.is_animated_gift())?;
        let event = self.entries.remove(index)?;
        self.ids.remove(&event.id);
        Some(event)
    }

    pub fn front(&self) -> Option<&Event> {
        self.entries.front()
    }

    pub fn contains(&self, id: &EventId) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        self.entries.iter()
    }
}

/// Strictly older than the expiry threshold; exactly at the threshold is
/// still fresh.
fn is_stale_message(event: &Event, now: OffsetDateTime) -> bool {
    event.is_message() && event.age_at(now) > MESSAGE_EXPIRY
}
