//! Event batch channel factory and handles.

use super::types::EventBatch;
use tokio::sync::mpsc;

/// Default buffer size for the batch channel.
///
/// This provides enough buffer to handle bursts while keeping memory bounded.
pub const DEFAULT_CHANNEL_BUFFER: usize = 256;

/// Sender handle for EventBatch deliveries.
pub type EventBatchSender = mpsc::Sender<EventBatch>;
/// Receiver handle for EventBatch deliveries.
pub type EventBatchReceiver = mpsc::Receiver<EventBatch>;

/// Create a new EventBatch channel.
///
/// Returns a (sender, receiver) pair. Each scheduler owns exactly one
/// receiver; the sender side is wrapped in a `BatchHandler`.
pub fn event_batch_channel() -> (EventBatchSender, EventBatchReceiver) {
    mpsc::channel(DEFAULT_CHANNEL_BUFFER)
}
