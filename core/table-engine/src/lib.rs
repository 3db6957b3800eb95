//! FILENAME: core/table-engine/src/lib.rs
//! Tabular data engine.
//!
//! Takes an in-memory collection of loosely structured records and turns it
//! into an editable, grouped table: column types are inferred from a sample
//! record, each column gets a display/edit behavior, rows are grouped by a
//! derived key with per-group expand state, and cell edits produce new
//! immutable row snapshots.
//!
//! Layers:
//! - `record`, `dataset`: Raw input (WHAT was loaded)
//! - `schema`, `columns`: Column definitions and behaviors (HOW cells look and edit)
//! - `store`, `pipeline`: Snapshots and validated commits (HOW data changes)
//! - `grouping`, `buckets`: Partitioning and expand state
//! - `view`: Renderable output (WHAT we display)
//! - `engine`: The facade owning all of the above

pub mod logging;

pub mod buckets;
pub mod columns;
pub mod config;
pub mod dataset;
pub mod dates;
pub mod editor;
pub mod engine;
pub mod error;
pub mod grouping;
pub mod number_format;
pub mod pipeline;
pub mod record;
pub mod schema;
pub mod store;
pub mod view;

pub use buckets::{DateBucketer, FieldValueKey, SingleGroup};
pub use columns::{
    BooleanBehavior, ColumnBehavior, ColumnRegistry, CurrencyBehavior, DateBehavior, FixedDecimalBehavior,
    NumberBehavior, TextBehavior,
};
pub use config::{EngineConfig, Locale};
pub use dataset::Dataset;
pub use editor::{CellEditor, CellState, CommitMode, RawInput};
pub use engine::{SharedEngine, TableEngine};
pub use error::{CoercionError, EngineError, StoreError};
pub use grouping::{ExpandState, Group, GroupKey, GroupKeyFn, GroupingEngine};
pub use number_format::CurrencyPosition;
pub use pipeline::{CommitResult, DeliveryError, DiscardSink, EditEvent, EditPipeline, EditSink};
pub use record::{Record, RowId, Value, ValueKind};
pub use schema::{ColumnDefinition, ColumnRole, FilterKind, SchemaInferencer, SemanticType, Shape};
pub use store::{RowSet, RowStore};
pub use view::{ColumnHeader, GroupView, RowView, TableView};
