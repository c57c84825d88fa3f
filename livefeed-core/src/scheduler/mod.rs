//! Event scheduling.
//!
//! - `EventQueue`: ordered, deduplicated buffer with the ingest priority rule
//!   and message expiry
//! - `EventScheduler`: releases one event per drain tick to a `Renderer`,
//!   tracking whether the drain timer should run
//! - `SchedulerRunner`: async loop that owns a scheduler, feeds it batches
//!   and drives the drain timer

pub mod event_scheduler;
pub mod queue;
pub mod runner;

pub use event_scheduler::{DrainState, Emission, EmissionKind, EventScheduler, TickOutcome};
pub use queue::{EventQueue, IngestReport};
pub use runner::SchedulerRunner;

/// Period of the drain timer.
pub const DRAIN_TICK_PERIOD: std::time::Duration = std::time::Duration::from_millis(500);

/// Messages older than this at the head of the queue are dropped unrendered.
pub const MESSAGE_EXPIRY: time::Duration = time::Duration::seconds(20);
