//! Batch delivery between the event source and the scheduler.
//!
//! # Event Flow
//!
//! 1. An `EventSource` hands each decoded batch to its `BatchHandler`
//! 2. The handler pushes an `EventBatch` into the batch channel
//! 3. `SchedulerRunner` receives the batch and ingests it
//! 4. The drain timer releases queued events to the `Renderer`, one per tick

pub mod channels;
pub mod types;

pub use channels::{
    event_batch_channel, EventBatchReceiver, EventBatchSender, DEFAULT_CHANNEL_BUFFER,
};

pub use types::EventBatch;
