//! FILENAME: core/persistence/src/error.rs

use table_engine::EngineError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid dataset: {0}")]
    Engine(#[from] EngineError),

    #[error("Invalid event log line {line}: {message}")]
    InvalidEventLog { line: usize, message: String },

    #[error("Event receiver disconnected")]
    Disconnected,
}
