//! FILENAME: core/table-engine/src/engine.rs
//! Table Engine - ties inference, behaviors, storage, grouping and edits
//! together behind one owner.
//!
//! The engine holds the current row snapshot, the column definitions for
//! the current sample shape, the expand state of every group and the sink
//! that receives committed edits. All operations are synchronous; hosts
//! that share an engine between threads use `SharedEngine`.

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::buckets::SingleGroup;
use crate::columns::ColumnRegistry;
use crate::config::EngineConfig;
use crate::dataset::{resolve_key_field, Dataset};
use crate::editor::{CellEditor, RawInput};
use crate::error::EngineError;
use crate::grouping::{ExpandState, Group, GroupKeyFn, GroupingEngine};
use crate::logging::{log_debug, log_enter, log_exit, log_info};
use crate::pipeline::{CommitResult, DiscardSink, EditPipeline, EditSink};
use crate::record::{RowId, Value};
use crate::schema::{ColumnDefinition, SchemaInferencer, Shape};
use crate::store::{RowSet, RowStore};
use crate::view::{build_view, TableView};

const CATEGORY: &str = "ENGINE";

pub type BoxedKeyFn = Box<dyn GroupKeyFn + Send + Sync>;

pub struct TableEngine {
    config: EngineConfig,
    inferencer: SchemaInferencer,
    registry: ColumnRegistry,
    store: RowStore,
    columns: Vec<ColumnDefinition>,
    /// Shape the current columns were inferred from
    shape: Option<Shape>,
    grouping: GroupingEngine,
    key_fn: BoxedKeyFn,
    sink: Box<dyn EditSink>,
}

impl TableEngine {
    pub fn new(config: EngineConfig) -> Self {
        let mut inferencer = SchemaInferencer::new().with_actions_column(config.actions_column);
        if let Some(field) = &config.key_field {
            inferencer = inferencer.with_key_field(field.clone());
        }
        let key_field = resolve_key_field(None, config.key_field.as_deref());

        TableEngine {
            inferencer,
            registry: ColumnRegistry::new(&config),
            store: RowStore::empty(key_field),
            columns: Vec::new(),
            shape: None,
            grouping: GroupingEngine::with_default_state(config.default_expand_state),
            key_fn: Box::new(SingleGroup::default()),
            sink: Box::new(DiscardSink),
            config,
        }
    }

    /// Group rows with `key_fn` instead of a single "All" group.
    pub fn with_key_fn(mut self, key_fn: impl GroupKeyFn + Send + Sync + 'static) -> Self {
        self.set_key_fn(key_fn);
        self
    }

    pub fn with_sink(mut self, sink: impl EditSink + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    /// Switch grouping. Expand states belong to the old keys and are dropped.
    pub fn set_key_fn(&mut self, key_fn: impl GroupKeyFn + Send + Sync + 'static) {
        self.key_fn = Box::new(key_fn);
        self.grouping.clear();
        self.refresh_groups();
    }

    pub fn set_sink(&mut self, sink: impl EditSink + 'static) {
        self.sink = Box::new(sink);
    }

    // ========================================================================
    // LOADING
    // ========================================================================

    /// Replace the data and start over: expand states are cleared.
    pub fn load(&mut self, dataset: Dataset) -> Result<(), EngineError> {
        self.install(dataset)?;
        self.grouping.clear();
        self.refresh_groups();
        Ok(())
    }

    /// Replace the data, keeping the expand state of groups that still
    /// exist. Columns are re-inferred only when the sample shape changed.
    pub fn reload(&mut self, dataset: Dataset) -> Result<(), EngineError> {
        self.install(dataset)?;
        self.refresh_groups();
        Ok(())
    }

    /// Swap in a dataset. On error nothing changes.
    fn install(&mut self, dataset: Dataset) -> Result<(), EngineError> {
        log_enter!(CATEGORY, "install", "records={}", dataset.len());

        let shape = dataset.sample().map(Shape::of);
        let columns = if shape != self.shape {
            Some(self.inferencer.infer_collection(dataset.records()))
        } else {
            None
        };
        let key_field = resolve_key_field(dataset.sample(), self.config.key_field.as_deref());

        self.store.replace(key_field, dataset.into_records())?;
        if let Some(columns) = columns {
            log_info!(CATEGORY, "sample shape changed, {} columns inferred", columns.len());
            self.columns = columns;
            self.shape = shape;
        }

        log_exit!(CATEGORY, "install", "rows={}", self.store.len());
        Ok(())
    }

    fn refresh_groups(&mut self) -> Vec<Group> {
        let rows = self.store.current();
        self.grouping.refresh(&rows, self.key_fn.as_ref())
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn columns(&self) -> &[ColumnDefinition] {
        &self.columns
    }

    pub fn column(&self, field: &str) -> Option<&ColumnDefinition> {
        self.columns.iter().find(|c| c.field == field)
    }

    /// Current row snapshot.
    pub fn rows(&self) -> RowSet {
        self.store.current()
    }

    pub fn store(&self) -> &RowStore {
        &self.store
    }

    pub fn key_field(&self) -> &str {
        self.store.key_field()
    }

    pub fn registry(&self) -> &ColumnRegistry {
        &self.registry
    }

    /// For registering field overrides (currency, fixed decimals, ...).
    pub fn registry_mut(&mut self) -> &mut ColumnRegistry {
        &mut self.registry
    }

    pub fn grouping(&self) -> &GroupingEngine {
        &self.grouping
    }

    // ========================================================================
    // GROUPS
    // ========================================================================

    /// Current groups, re-partitioned from the current snapshot.
    pub fn groups(&mut self) -> Vec<Group> {
        self.refresh_groups()
    }

    pub fn toggle(&mut self, key: &str) -> ExpandState {
        self.grouping.toggle(key)
    }

    pub fn expand_state(&self, key: &str) -> ExpandState {
        self.grouping.state_of(key)
    }

    pub fn expand_all(&mut self) {
        self.grouping.expand_all();
    }

    pub fn collapse_all(&mut self) {
        self.grouping.collapse_all();
    }

    pub fn view(&mut self) -> TableView {
        let groups = self.refresh_groups();
        build_view(&groups, &self.columns, &self.registry, self.store.key_field())
    }

    // ========================================================================
    // EDITING
    // ========================================================================

    /// Editing handle for one cell, or `None` when the row is unknown or
    /// the column is not editable.
    pub fn begin_edit(&self, row_id: &RowId, field: &str) -> Option<CellEditor> {
        let column = self.column(field).filter(|c| c.editable)?;
        let record = self.store.get(row_id)?;
        let current = record.get(field).cloned().unwrap_or(Value::Null);
        Some(self.registry.resolve_column(column).begin_edit(&current))
    }

    pub fn submit(&mut self, row_id: &RowId, field: &str, input: impl Into<RawInput>) -> CommitResult {
        let input = input.into();
        let result = EditPipeline::new(&mut self.store, &self.columns, &self.registry, self.sink.as_mut())
            .submit(row_id, field, &input);

        if result.is_committed() {
            self.refresh_groups();
        }
        log_debug!(CATEGORY, "submit row={} field={} -> {:?}", row_id, field, result);
        result
    }
}

impl Default for TableEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

// ============================================================================
// SHARED ENGINE
// ============================================================================

/// A `TableEngine` behind a mutex, for hosts that call in from several
/// threads. A poisoned lock is recovered, since every engine operation
/// leaves the engine consistent before it can panic.
pub struct SharedEngine {
    inner: Mutex<TableEngine>,
}

impl SharedEngine {
    pub fn new(engine: TableEngine) -> Self {
        SharedEngine {
            inner: Mutex::new(engine),
        }
    }

    pub fn lock(&self) -> MutexGuard<'_, TableEngine> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `f` with exclusive access.
    pub fn with<R>(&self, f: impl FnOnce(&mut TableEngine) -> R) -> R {
        f(&mut self.lock())
    }

    pub fn submit(&self, row_id: &RowId, field: &str, input: impl Into<RawInput>) -> CommitResult {
        self.lock().submit(row_id, field, input)
    }

    pub fn toggle(&self, key: &str) -> ExpandState {
        self.lock().toggle(key)
    }

    pub fn reload(&self, dataset: Dataset) -> Result<(), EngineError> {
        self.lock().reload(dataset)
    }

    pub fn view(&self) -> TableView {
        self.lock().view()
    }

    pub fn into_inner(self) -> TableEngine {
        self.inner.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}
