//! FILENAME: core/table-engine/src/pipeline.rs
//! PURPOSE: Validates and commits single-cell edits.
//! CONTEXT: Editors hand a (row id, field, raw input) triple to the pipeline.
//! The pipeline checks the row exists, checks the column accepts edits,
//! coerces the input through the column's behavior and commits it to the
//! store. Successful commits are announced to an `EditSink` as an
//! `EditEvent`; delivery failures are logged and otherwise ignored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::columns::ColumnRegistry;
use crate::editor::RawInput;
use crate::error::{CoercionError, StoreError};
use crate::logging::{log_debug, log_enter, log_warn};
use crate::record::{RowId, Value};
use crate::schema::ColumnDefinition;
use crate::store::RowStore;

const CATEGORY: &str = "EDIT";

// ============================================================================
// EVENTS & SINKS
// ============================================================================

/// Notification of one committed edit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditEvent {
    pub row_id: RowId,
    pub field: String,
    pub previous: Value,
    pub value: Value,
    pub timestamp: DateTime<Utc>,
}

pub type DeliveryError = Box<dyn std::error::Error + Send + Sync>;

/// Receiver of committed edits (the persistence side).
pub trait EditSink: Send {
    fn deliver(&mut self, event: EditEvent) -> Result<(), DeliveryError>;
}

/// Drops every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiscardSink;

impl EditSink for DiscardSink {
    fn deliver(&mut self, _event: EditEvent) -> Result<(), DeliveryError> {
        Ok(())
    }
}

/// Collects events in memory.
impl EditSink for Vec<EditEvent> {
    fn deliver(&mut self, event: EditEvent) -> Result<(), DeliveryError> {
        self.push(event);
        Ok(())
    }
}

// ============================================================================
// PIPELINE
// ============================================================================

/// Outcome of a submitted edit.
#[derive(Debug, Clone, PartialEq)]
pub enum CommitResult {
    /// The value now stored in the cell.
    Committed { value: Value },
    /// Input refused; the cell keeps `previous`.
    Rejected { previous: Value, reason: CoercionError },
    NotFound { row_id: RowId },
}

impl CommitResult {
    pub fn is_committed(&self) -> bool {
        matches!(self, CommitResult::Committed { .. })
    }
}

pub struct EditPipeline<'a> {
    store: &'a mut RowStore,
    columns: &'a [ColumnDefinition],
    registry: &'a ColumnRegistry,
    sink: &'a mut dyn EditSink,
}

impl<'a> EditPipeline<'a> {
    pub fn new(
        store: &'a mut RowStore,
        columns: &'a [ColumnDefinition],
        registry: &'a ColumnRegistry,
        sink: &'a mut dyn EditSink,
    ) -> Self {
        EditPipeline {
            store,
            columns,
            registry,
            sink,
        }
    }

    /// Validate, coerce and commit one cell edit.
    ///
    /// An edit that leaves the value unchanged reports `Committed` without
    /// touching the store or notifying the sink.
    pub fn submit(&mut self, row_id: &RowId, field: &str, input: &RawInput) -> CommitResult {
        log_enter!(CATEGORY, "submit", "row={} field={}", row_id, field);

        let previous = match self.store.get(row_id) {
            Some(record) => record.get(field).cloned().unwrap_or(Value::Null),
            None => {
                log_debug!(CATEGORY, "row {} not found", row_id);
                return CommitResult::NotFound { row_id: row_id.clone() };
            }
        };

        let column = match self.columns.iter().find(|c| c.field == field) {
            Some(column) => column,
            None => return reject(previous, CoercionError::UnknownColumn(field.to_string())),
        };
        if !column.editable {
            return reject(previous, CoercionError::ReadOnly(field.to_string()));
        }

        let value = match self.registry.resolve_column(column).coerce(&previous, input) {
            Ok(value) => value,
            Err(reason) => return reject(previous, reason),
        };

        if value == previous {
            log_debug!(CATEGORY, "row {} field '{}' unchanged", row_id, field);
            return CommitResult::Committed { value };
        }

        match self.store.commit(row_id, field, value.clone()) {
            Ok(_) => {}
            Err(StoreError::RowNotFound(id)) => return CommitResult::NotFound { row_id: id },
            Err(StoreError::KeyFieldImmutable(name)) => {
                return reject(previous, CoercionError::ReadOnly(name));
            }
        }

        let event = EditEvent {
            row_id: row_id.clone(),
            field: field.to_string(),
            previous,
            value: value.clone(),
            timestamp: Utc::now(),
        };
        if let Err(err) = self.sink.deliver(event) {
            log_warn!(CATEGORY, "edit event for row {} not delivered: {}", row_id, err);
        }

        CommitResult::Committed { value }
    }
}

fn reject(previous: Value, reason: CoercionError) -> CommitResult {
    log_debug!(CATEGORY, "rejected: {}", reason);
    CommitResult::Rejected { previous, reason }
}
