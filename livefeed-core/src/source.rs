//! Event source interface.
//!
//! An [`EventSource`] wraps the push API. The scheduler side registers a
//! single [`BatchHandler`] with it; the source then hands over every batch
//! it receives, in delivery order.

use crate::events::{EventBatch, EventBatchSender};
use kanau::processor::Processor;
use livefeed_sdk::objects::Event;
use thiserror::Error;
use tokio::sync::mpsc::error::TrySendError;
use tracing::warn;

/// Errors returned when a batch cannot be handed to the scheduler.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DeliveryError {
    /// The batch channel is full; the batch was not delivered.
    #[error("batch channel is full, dropped batch of {0} events")]
    Full(usize),

    /// The scheduler has stopped.
    #[error("scheduler is no longer receiving batches")]
    Closed,
}

/// Push-API side of the pipeline.
pub trait EventSource {
    /// Register the handler that receives every batch.
    ///
    /// Called exactly once per source.
    fn set_event_handler(&mut self, handler: BatchHandler);
}

/// Handle through which an event source delivers batches.
#[derive(Debug, Clone)]
pub struct BatchHandler {
    sender: EventBatchSender,
}

impl BatchHandler {
    pub fn new(sender: EventBatchSender) -> Self {
        Self { sender }
    }

    /// Deliver a batch without waiting.
    ///
    /// Suitable for synchronous callbacks. When the channel is full the batch
    /// is dropped and reported.
    pub fn deliver(&self, events: Vec<Event>) -> Result<(), DeliveryError> {
        match self.sender.try_send(EventBatch::new(events)) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(batch)) => {
                warn!(events = batch.len(), "Batch channel full, dropping batch");
                Err(DeliveryError::Full(batch.len()))
            }
            Err(TrySendError::Closed(_)) => Err(DeliveryError::Closed),
        }
    }

    /// The receiving scheduler has stopped.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

impl Processor<EventBatch> for BatchHandler {
    type Output = ();
    type Error = DeliveryError;

    /// Deliver a batch, waiting for channel capacity.
    async fn process(&self, batch: EventBatch) -> Result<(), DeliveryError> {
        self.sender
            .send(batch)
            .await
            .map_err(|_| DeliveryError::Closed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::event_batch_channel;
    use livefeed_sdk::objects::EventKind;
    use time::OffsetDateTime;
    use tokio::sync::mpsc;

    fn message(id: &str) -> Event {
        Event::new(id, EventKind::Message, OffsetDateTime::UNIX_EPOCH)
    }

    #[tokio::test]
    async fn test_deliver_forwards_batches_in_order() {
        let (tx, mut rx) = event_batch_channel();
        let handler = BatchHandler::new(tx);

        handler.deliver(vec![message("a")]).unwrap();
        handler.deliver(vec![message("b"), message("c")]).unwrap();

        assert_eq!(rx.recv().await.unwrap().len(), 1);
        assert_eq!(rx.recv().await.unwrap().events[1].id.as_str(), "c");
    }

    #[test]
    fn test_deliver_reports_full_channel() {
        let (tx, _rx) = mpsc::channel(1);
        let handler = BatchHandler::new(tx);

        handler.deliver(vec![message("a")]).unwrap();
        assert_eq!(
            handler.deliver(vec![message("b"), message("c")]),
            Err(DeliveryError::Full(2))
        );
    }

    #[tokio::test]
    async fn test_closed_scheduler_is_reported() {
        let (tx, rx) = event_batch_channel();
        let handler = BatchHandler::new(tx);
        drop(rx);

        assert!(handler.is_closed());
        assert_eq!(handler.deliver(vec![]), Err(DeliveryError::Closed));
        assert_eq!(
            handler.process(EventBatch::default()).await,
            Err(DeliveryError::Closed)
        );
    }
}
