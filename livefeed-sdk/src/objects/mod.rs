pub mod batch;
pub mod event;

pub use batch::{BatchError, DecodedBatch, RejectedEvent, decode_batch};
pub use event::{Event, EventError, EventId, EventKind, RawEvent};
