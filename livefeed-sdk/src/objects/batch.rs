//! Batch decoding.
//!
//! A batch is a JSON array of event objects. Decoding validates every entry
//! on its own: a malformed event is rejected and reported, its valid
//! siblings are kept. Only input that is not a JSON array fails as a whole.

use super::event::{Event, EventError, RawEvent};
use serde_json::Value;
use thiserror::Error;

/// Errors that make a whole batch unusable.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("batch is not a JSON array")]
    NotAnArray,
}

/// An entry of a batch that failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedEvent {
    /// Position of the entry in the wire array.
    pub index: usize,
    pub error: EventError,
}

/// Result of decoding one batch.
#[derive(Debug, Clone, Default)]
pub struct DecodedBatch {
    /// Valid events, in wire order.
    pub events: Vec<Event>,
    pub rejected: Vec<RejectedEvent>,
}

impl DecodedBatch {
    pub fn is_empty(&self) -> bool {
        self.events.is_empty() && self.rejected.is_empty()
    }
}

/// Decode a batch from its JSON text.
pub fn decode_batch(input: &str) -> Result<DecodedBatch, BatchError> {
    let Value::Array(items) = serde_json::from_str::<Value>(input)? else {
        return Err(BatchError::NotAnArray);
    };

    let mut decoded = DecodedBatch {
        events: Vec::with_capacity(items.len()),
        rejected: Vec::new(),
    };

    for (index, item) in items.into_iter().enumerate() {
        match decode_event(item) {
            Ok(event) => decoded.events.push(event),
            Err(error) => decoded.rejected.push(RejectedEvent { index, error }),
        }
    }

    Ok(decoded)
}

fn decode_event(item: Value) -> Result<Event, EventError> {
    if !item.is_object() {
        return Err(EventError::NotAnObject);
    }
    let raw: RawEvent = serde_json::from_value(item).map_err(|_| EventError::NotAnObject)?;
    Event::try_from(raw)
}
