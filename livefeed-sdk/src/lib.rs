//! Wire objects for the livefeed push API.
//!
//! The push API delivers batches of events as JSON arrays. This crate holds
//! the typed [`Event`](objects::Event) model and the decoding rules that turn
//! a raw batch into accepted and rejected entries.

pub mod objects;
