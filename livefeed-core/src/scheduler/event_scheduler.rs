//! EventScheduler.
//!
//! The EventScheduler is responsible for:
//! - Ingesting event batches into its `EventQueue`
//! - Tracking whether the drain timer should run (`DrainState`)
//! - Releasing at most one event per drain tick to the `Renderer`
//! - Holding animated gifts back while another animation is busy, letting
//!   ordinary events overtake them
//!
//! The scheduler is synchronous and owns its queue outright. Timing lives in
//! `SchedulerRunner`, which calls [`EventScheduler::tick`] on every drain tick.

use super::queue::{EventQueue, IngestReport};
use crate::render::Renderer;
use livefeed_sdk::objects::{Event, EventId};
use time::OffsetDateTime;
use tracing::debug;

/// Drain timer lifecycle.
///
/// `Idle -> Draining` on an ingest that leaves the queue non-empty.
/// `Draining -> Idle` on a tick that finds or leaves the queue empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DrainState {
    #[default]
    Idle,
    Draining,
}

/// How a released event was forwarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmissionKind {
    /// `display_message` only.
    Ordinary,
    /// `display_message`, then `trigger_gift_animation`.
    Animated,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Emission {
    pub event_id: EventId,
    pub kind: EmissionKind,
}

/// Result of one drain tick.
///
/// `expired` counts stale messages dropped from the head of the queue
/// before anything was emitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// The queue is empty; the drain timer should stop.
    Idle { expired: usize },
    /// One event was released.
    Emitted { emission: Emission, expired: usize },
    /// Only animated gifts are queued and an animation is busy.
    Held { expired: usize },
}

impl TickOutcome {
    pub fn is_idle(&self) -> bool {
        matches!(self, TickOutcome::Idle { .. })
    }

    pub fn expired(&self) -> usize {
        match self {
            TickOutcome::Idle { expired }
            | TickOutcome::Emitted { expired, .. }
            | TickOutcome::Held { expired } => *expired,
        }
    }

    pub fn emission(&self) -> Option<&Emission> {
        match self {
            TickOutcome::Emitted { emission, .. } => Some(emission),
            _ => None,
        }
    }
}

pub struct EventScheduler<R> {
    queue: EventQueue,
    state: DrainState,
    renderer: R,
}

impl<R: Renderer> EventScheduler<R> {
    /// Create a scheduler with an empty queue in the `Idle` state.
    pub fn new(renderer: R) -> Self {
        Self {
            queue: EventQueue::new(),
            state: DrainState::Idle,
            renderer,
        }
    }

    pub fn state(&self) -> DrainState {
        self.state
    }

    /// Number of queued events.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Ids of the queued events, in release order.
    pub fn queued_ids(&self) -> Vec<EventId> {
        self.queue.iter().map(|e| e.id.clone()).collect()
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    /// Ingest a batch.
    ///
    /// Gifts are moved ahead within the batch, duplicates of queued ids are
    /// dropped, and the drain timer is activated if it was idle. An empty
    /// batch changes nothing.
    pub fn ingest(&mut self, batch: Vec<Event>) -> IngestReport {
        if batch.is_empty() {
            return IngestReport::default();
        }

        let report = self.queue.ingest(batch);
        debug!(
            queued = report.queued,
            duplicates = report.duplicates,
            pending = self.queue.len(),
            "Ingested batch"
        );

        if self.state == DrainState::Idle && !self.queue.is_empty() {
            self.state = DrainState::Draining;
            debug!("Drain timer activated");
        }

        report
    }

    /// Run one drain tick against the wall clock.
    pub fn tick(&mut self) -> TickOutcome {
        self.tick_at(OffsetDateTime::now_utc())
    }

    /// Run one drain tick as of `now`.
    pub fn tick_at(&mut self, now: OffsetDateTime) -> TickOutcome {
        if self.queue.is_empty() {
            self.go_idle();
            return TickOutcome::Idle { expired: 0 };
        }

        let expired = self.queue.expire_stale_messages(now);
        let front_is_gift = match self.queue.front() {
            Some(front) => front.is_animated_gift(),
            None => {
                debug!(expired, "Queue emptied by expiry");
                self.go_idle();
                return TickOutcome::Idle { expired };
            }
        };

        let released = if !front_is_gift {
            self.queue
                .pop_front()
                .map(|event| self.emit(event, EmissionKind::Ordinary))
        } else if self.renderer.is_animation_idle() {
            self.queue
                .pop_front()
                .map(|event| self.emit(event, EmissionKind::Animated))
        } else {
            // Gift at the head must wait; let the first ordinary event overtake it.
            self.queue
                .take_first_ordinary()
                .map(|event| self.emit(event, EmissionKind::Ordinary))
        };

        match released {
            Some(emission) => TickOutcome::Emitted { emission, expired },
            None => {
                debug!(
                    pending = self.queue.len(),
                    "Animation busy and only gifts queued, holding"
                );
                TickOutcome::Held { expired }
            }
        }
    }

    fn emit(&mut self, event: Event, kind: EmissionKind) -> Emission {
        debug!(event_id = %event.id, event_kind = %event.kind, ?kind, "Releasing event");
        self.renderer.display_message(&event);
        if kind == EmissionKind::Animated {
            self.renderer.trigger_gift_animation(&event);
        }
        Emission {
            event_id: event.id,
            kind,
        }
    }

    fn go_idle(&mut self) {
        if self.state == DrainState::Draining {
            self.state = DrainState::Idle;
            debug!("Drain timer deactivated");
        }
    }
}
