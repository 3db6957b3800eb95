//! FILENAME: core/persistence/src/lib.rs
//! Table Engine Persistence Module
//!
//! The outside end of the edit pipeline: sinks that record committed edits
//! (JSON-lines log, in-memory recorder, channel) and helpers that move
//! datasets and edit logs between disk and the engine.

mod error;
mod files;
mod sinks;

pub use error::PersistenceError;
pub use files::{load_dataset, read_events, save_dataset};
pub use sinks::{channel, ChannelSink, JsonLinesSink, RecordingSink};
