//! Shared configuration plumbing.
//!
//! Scheduler timing is fixed; what changes at runtime is host-side settings
//! such as renderer timings. `ConfigStore` carries those to running
//! components without restarting them.

mod config_store;

pub use config_store::{ConfigStore, ConfigWatcher};
