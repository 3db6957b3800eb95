//! FILENAME: core/table-engine/src/error.rs

use thiserror::Error;

use crate::record::RowId;

/// Failures while loading or reshaping a dataset.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid dataset: {0}")]
    InvalidDataset(String),

    #[error("Record {index} has no usable value for key field '{field}'")]
    MissingRowKey { index: usize, field: String },

    #[error("Duplicate row id: {0}")]
    DuplicateRowId(RowId),
}

/// Raw editor input that cannot become a value of the column's type.
/// Recovered locally: the edit is rejected and the prior value kept.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoercionError {
    #[error("'{0}' is not a number")]
    NotANumber(String),

    #[error("'{0}' is not a boolean")]
    NotABoolean(String),

    #[error("'{0}' is not a date")]
    NotADate(String),

    #[error("Toggle input is only valid for boolean columns")]
    ToggleUnsupported,

    #[error("Column '{0}' is read-only")]
    ReadOnly(String),

    #[error("No column named '{0}'")]
    UnknownColumn(String),
}

/// Commit failures reported by the row store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Row not found: {0}")]
    RowNotFound(RowId),

    #[error("Key field '{0}' cannot be edited")]
    KeyFieldImmutable(String),
}
