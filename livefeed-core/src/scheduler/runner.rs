//! SchedulerRunner.
//!
//! Owns one `EventScheduler` and drives it from a single task:
//! - Receives `EventBatch` deliveries and ingests them
//! - Starts the drain timer when the scheduler becomes `Draining`
//! - Calls `tick()` on every drain tick and drops the timer once the
//!   scheduler reports `Idle`
//!
//! Ingest and tick are never interleaved because both run inside the same
//! `select!` loop.

use super::event_scheduler::{DrainState, EventScheduler};
use super::DRAIN_TICK_PERIOD;
use crate::events::{EventBatch, EventBatchReceiver};
use crate::render::Renderer;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::{Instant, Interval, MissedTickBehavior};
use tracing::{debug, info};

pub struct SchedulerRunner<R> {
    scheduler: EventScheduler<R>,
    tick_period: Duration,
}

impl<R: Renderer> SchedulerRunner<R> {
    /// Create a runner around a fresh scheduler.
    pub fn new(renderer: R) -> Self {
        Self::from_scheduler(EventScheduler::new(renderer))
    }

    pub fn from_scheduler(scheduler: EventScheduler<R>) -> Self {
        Self {
            scheduler,
            tick_period: DRAIN_TICK_PERIOD,
        }
    }

    /// Run until shutdown is signaled, or until the batch channel is closed
    /// and everything queued has been drained.
    ///
    /// Returns the scheduler so the caller can inspect what is left.
    pub async fn run(
        mut self,
        mut shutdown_rx: watch::Receiver<bool>,
        mut batch_rx: EventBatchReceiver,
    ) -> EventScheduler<R> {
        let mut drain_timer: Option<Interval> = None;
        let mut source_open = true;

        info!(
            tick_period_ms = self.tick_period.as_millis() as u64,
            pending = self.scheduler.len(),
            "SchedulerRunner started"
        );

        // A resumed scheduler may already hold queued events.
        if self.scheduler.state() == DrainState::Draining {
            drain_timer = Some(new_drain_timer(self.tick_period));
            debug!("Drain timer started");
        }

        loop {
            tokio::select! {
                biased;

                // Shutdown has highest priority. A dropped sender counts as shutdown.
                changed = shutdown_rx.changed() => {
                    if changed.is_err() || *shutdown_rx.borrow() {
                        info!(
                            pending = self.scheduler.len(),
                            "SchedulerRunner received shutdown signal"
                        );
                        break;
                    }
                }

                batch = batch_rx.recv(), if source_open => {
                    match batch {
                        Some(batch) => self.handle_batch(batch, &mut drain_timer),
                        None => {
                            info!(
                                pending = self.scheduler.len(),
                                "EventBatch channel closed"
                            );
                            source_open = false;
                            if drain_timer.is_none() {
                                break;
                            }
                        }
                    }
                }

                _ = next_drain_tick(&mut drain_timer) => {
                    let outcome = self.scheduler.tick();
                    if outcome.expired() > 0 {
                        debug!(expired = outcome.expired(), "Dropped stale messages");
                    }
                    if outcome.is_idle() {
                        drain_timer = None;
                        debug!("Drain timer stopped");
                        if !source_open {
                            break;
                        }
                    }
                }
            }
        }

        info!("SchedulerRunner shutdown complete");
        self.scheduler
    }

    fn handle_batch(&mut self, batch: EventBatch, drain_timer: &mut Option<Interval>) {
        self.scheduler.ingest(batch.events);

        if self.scheduler.state() == DrainState::Draining && drain_timer.is_none() {
            *drain_timer = Some(new_drain_timer(self.tick_period));
            debug!("Drain timer started");
        }
    }
}

/// First tick fires one full period after creation.
fn new_drain_timer(period: Duration) -> Interval {
    let mut interval = tokio::time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval
}

/// Resolves on the next drain tick, or never when the timer is stopped.
async fn next_drain_tick(drain_timer: &mut Option<Interval>) -> Instant {
    match drain_timer {
        Some(interval) => interval.tick().await,
        None => std::future::pending().await,
    }
}
