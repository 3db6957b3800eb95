//! FILENAME: core/table-engine/src/store.rs
//! PURPOSE: The canonical row collection, replaced wholesale on every commit.
//! CONTEXT: Rows are shared through `Arc`. A commit builds a new record and a
//! new collection in which only the edited row's pointer differs; every other
//! row is the very same allocation as before. Snapshots handed out earlier
//! stay valid and unchanged, and consumers can detect changed rows with
//! `Arc::ptr_eq`.

use rustc_hash::FxHashMap;
use std::sync::Arc;

use crate::error::{EngineError, StoreError};
use crate::logging::{log_debug, log_info};
use crate::record::{Record, RowId, Value};

const CATEGORY: &str = "STORE";

// ============================================================================
// SNAPSHOT
// ============================================================================

/// Immutable snapshot of the row collection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowSet {
    rows: Arc<Vec<Arc<Record>>>,
}

impl RowSet {
    pub fn from_records(records: Vec<Record>) -> Self {
        RowSet {
            rows: Arc::new(records.into_iter().map(Arc::new).collect()),
        }
    }

    pub fn rows(&self) -> &[Arc<Record>] {
        &self.rows
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Record>> {
        self.rows.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Arc<Record>> {
        self.rows.get(index)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// True when both snapshots are the same collection object.
    pub fn ptr_eq(&self, other: &RowSet) -> bool {
        Arc::ptr_eq(&self.rows, &other.rows)
    }
}

// ============================================================================
// STORE
// ============================================================================

#[derive(Debug, Clone)]
pub struct RowStore {
    key_field: String,
    rows: RowSet,
    /// RowId -> position in `rows`. Positions never move on commit.
    index: FxHashMap<RowId, usize>,
}

impl RowStore {
    pub fn empty(key_field: impl Into<String>) -> Self {
        RowStore {
            key_field: key_field.into(),
            rows: RowSet::default(),
            index: FxHashMap::default(),
        }
    }

    /// Build a store, validating that every record carries a unique key.
    pub fn new(key_field: impl Into<String>, records: Vec<Record>) -> Result<Self, EngineError> {
        let key_field = key_field.into();
        let index = build_index(&key_field, &records)?;
        log_info!(CATEGORY, "loaded {} rows keyed by '{}'", records.len(), key_field);
        Ok(RowStore {
            key_field,
            rows: RowSet::from_records(records),
            index,
        })
    }

    /// Swap in a new collection. On error the store is left unchanged.
    pub fn replace(&mut self, key_field: impl Into<String>, records: Vec<Record>) -> Result<(), EngineError> {
        *self = RowStore::new(key_field, records)?;
        Ok(())
    }

    pub fn key_field(&self) -> &str {
        &self.key_field
    }

    /// The current snapshot.
    pub fn current(&self) -> RowSet {
        self.rows.clone()
    }

    pub fn get(&self, id: &RowId) -> Option<&Arc<Record>> {
        self.index.get(id).and_then(|&pos| self.rows.get(pos))
    }

    pub fn contains(&self, id: &RowId) -> bool {
        self.index.contains_key(id)
    }

    pub fn row_id_of(&self, record: &Record) -> Option<RowId> {
        record.get(&self.key_field).and_then(RowId::from_value)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Replace one field of one row, producing a new snapshot.
    ///
    /// Only the edited row gets a new `Arc`; the rest are shared with the
    /// previous snapshot. Repeated commits to the same row apply in call
    /// order (last write wins).
    pub fn commit(&mut self, id: &RowId, field: &str, value: Value) -> Result<RowSet, StoreError> {
        if field == self.key_field {
            return Err(StoreError::KeyFieldImmutable(field.to_string()));
        }
        let pos = match self.index.get(id) {
            Some(&pos) => pos,
            None => {
                log_debug!(CATEGORY, "commit to missing row {}", id);
                return Err(StoreError::RowNotFound(id.clone()));
            }
        };

        let mut next: Vec<Arc<Record>> = self.rows.rows.as_ref().clone();
        next[pos] = Arc::new(next[pos].with_field(field, value));
        self.rows = RowSet { rows: Arc::new(next) };

        log_debug!(CATEGORY, "committed row {} field '{}'", id, field);
        Ok(self.rows.clone())
    }
}

fn build_index(key_field: &str, records: &[Record]) -> Result<FxHashMap<RowId, usize>, EngineError> {
    let mut index = FxHashMap::default();
    index.reserve(records.len());
    for (pos, record) in records.iter().enumerate() {
        let id = record
            .get(key_field)
            .and_then(RowId::from_value)
            .ok_or_else(|| EngineError::MissingRowKey {
                index: pos,
                field: key_field.to_string(),
            })?;
        if index.insert(id.clone(), pos).is_some() {
            return Err(EngineError::DuplicateRowId(id));
        }
    }
    Ok(index)
}
