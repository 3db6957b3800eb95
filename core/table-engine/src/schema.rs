//! FILENAME: core/table-engine/src/schema.rs
//! Schema inference - column definitions derived from a sample record.
//!
//! The first record of a dataset is taken as representative of the whole
//! collection. Each of its fields becomes one column, in source order, with
//! a semantic type picked from the value's shape:
//! - boolean values -> `Boolean`
//! - numeric values -> `Number`
//! - text parseable as a calendar date -> `Date` (checked last, so
//!   numeric-looking strings never become dates)
//! - any other text -> `Text`
//! - null, arrays and objects -> `Unknown` (pass-through, read-only)

use serde::{Deserialize, Serialize};

use crate::dataset::resolve_key_field;
use crate::dates::parse_date;
use crate::logging::log_debug;
use crate::record::{Record, Value};

const CATEGORY: &str = "SCHEMA";

/// Field name of the trailing actions column.
pub const ACTIONS_FIELD: &str = "actions";

// ============================================================================
// TYPES
// ============================================================================

/// Inferred logical category of a field's values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SemanticType {
    Text,
    Number,
    Boolean,
    Date,
    Unknown,
}

/// Filter widget hint for the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterKind {
    None,
    Text,
    Number,
    Date,
}

impl SemanticType {
    pub fn filter_kind(self) -> FilterKind {
        match self {
            SemanticType::Text => FilterKind::Text,
            SemanticType::Number => FilterKind::Number,
            SemanticType::Date => FilterKind::Date,
            SemanticType::Boolean | SemanticType::Unknown => FilterKind::None,
        }
    }
}

/// What a column stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ColumnRole {
    /// Shows a field of the record.
    #[default]
    Data,
    /// The synthetic row-actions column; has no backing field.
    Actions,
}

/// Describes one column of the table. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnDefinition {
    pub field: String,
    pub display_name: String,
    pub semantic_type: SemanticType,
    pub editable: bool,
    /// Suggested width in characters.
    pub size_hint: u16,
    pub filter: FilterKind,
    #[serde(default)]
    pub role: ColumnRole,
}

/// Ordered (field, semantic type) pairs of a record, as `classify` sees
/// them. Two samples with the same shape infer identical columns.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Shape(Vec<(String, SemanticType)>);

impl Shape {
    pub fn of(record: &Record) -> Self {
        Shape(
            record
                .iter()
                .map(|(name, value)| (name.to_string(), classify(value)))
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// ============================================================================
// CLASSIFICATION
// ============================================================================

/// Classify a single value.
pub fn classify(value: &Value) -> SemanticType {
    match value {
        Value::Bool(_) => SemanticType::Boolean,
        Value::Number(_) => SemanticType::Number,
        Value::Text(s) if parse_date(s).is_some() => SemanticType::Date,
        Value::Text(_) => SemanticType::Text,
        Value::Null | Value::Composite(_) => SemanticType::Unknown,
    }
}

/// Header text: field name with its first character upper-cased.
pub fn display_name(field: &str) -> String {
    let mut chars = field.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Width hint in characters. Depends only on the shape, never on the
/// sample's content.
fn size_hint(semantic_type: SemanticType, display_name: &str) -> u16 {
    match semantic_type {
        SemanticType::Number => 10,
        SemanticType::Boolean => 6,
        SemanticType::Date => 12,
        SemanticType::Unknown => 16,
        SemanticType::Text => display_name.chars().count().clamp(16, 40) as u16,
    }
}

// ============================================================================
// INFERENCER
// ============================================================================

/// Derives column definitions from a representative record.
#[derive(Debug, Clone, Default)]
pub struct SchemaInferencer {
    key_field: Option<String>,
    actions_column: bool,
}

impl SchemaInferencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use an explicit identity field instead of `id` / first field.
    pub fn with_key_field(mut self, field: impl Into<String>) -> Self {
        self.key_field = Some(field.into());
        self
    }

    /// Append a read-only "Actions" column after the inferred ones.
    pub fn with_actions_column(mut self, enabled: bool) -> Self {
        self.actions_column = enabled;
        self
    }

    /// Infer one column per field of `sample`, in field order.
    /// The identity column is never editable.
    pub fn infer(&self, sample: &Record) -> Vec<ColumnDefinition> {
        let key_field = resolve_key_field(Some(sample), self.key_field.as_deref());

        let mut columns: Vec<ColumnDefinition> = sample
            .iter()
            .map(|(field, value)| {
                let semantic_type = classify(value);
                let display_name = display_name(field);
                ColumnDefinition {
                    field: field.to_string(),
                    size_hint: size_hint(semantic_type, &display_name),
                    display_name,
                    semantic_type,
                    editable: semantic_type != SemanticType::Unknown && field != key_field,
                    filter: semantic_type.filter_kind(),
                    role: ColumnRole::Data,
                }
            })
            .collect();

        if self.actions_column && !sample.contains(ACTIONS_FIELD) {
            columns.push(actions_column());
        }

        log_debug!(
            CATEGORY,
            "inferred {} columns (key field '{}')",
            columns.len(),
            key_field
        );
        columns
    }

    /// Infer from the first record of a collection. An empty collection
    /// yields no columns.
    pub fn infer_collection(&self, records: &[Record]) -> Vec<ColumnDefinition> {
        match records.first() {
            Some(sample) => self.infer(sample),
            None => Vec::new(),
        }
    }
}

/// Infer with default settings.
pub fn infer(sample: &Record) -> Vec<ColumnDefinition> {
    SchemaInferencer::new().infer(sample)
}

fn actions_column() -> ColumnDefinition {
    ColumnDefinition {
        field: ACTIONS_FIELD.to_string(),
        display_name: "Actions".to_string(),
        semantic_type: SemanticType::Unknown,
        editable: false,
        size_hint: 16,
        filter: FilterKind::None,
        role: ColumnRole::Actions,
    }
}
