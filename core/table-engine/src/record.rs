//! FILENAME: core/table-engine/src/record.rs
//! PURPOSE: Scalar values, rows and row identities.
//! CONTEXT: A `Record` is one row of the dataset: an ordered list of named
//! values, kept in the order the source object declared them. Records are
//! never edited in place; `with_field` returns a fresh record.

use serde::de::Deserializer;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::Number;
use std::fmt;

/// Largest integer an `f64` holds exactly (2^53).
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

// ============================================================================
// VALUE
// ============================================================================

/// A single field value as delivered by the data-loading collaborator.
/// Numbers keep their JSON form, so integers stay integers on the way out.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Number(Number),
    Text(String),
    /// Arrays and objects. Kept verbatim, never interpreted.
    Composite(serde_json::Value),
}

/// Shape of a value, without its content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueKind {
    Null,
    Bool,
    Number,
    Text,
    Composite,
}

impl Value {
    pub fn text(s: impl Into<String>) -> Self {
        Value::Text(s.into())
    }

    /// Number from a float. Whole values within the exact `f64` range are
    /// stored as integers; NaN and infinities become `Null`.
    pub fn number(n: f64) -> Self {
        if n.fract() == 0.0 && n.abs() < MAX_SAFE_INTEGER {
            Value::Number(Number::from(n as i64))
        } else {
            Number::from_f64(n).map(Value::Number).unwrap_or(Value::Null)
        }
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Bool,
            Value::Number(_) => ValueKind::Number,
            Value::Text(_) => ValueKind::Text,
            Value::Composite(_) => ValueKind::Composite,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<&Number> {
        match self {
            Value::Number(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Unformatted text form of the value.
    /// Used as the initial draft of an editor and for group labels.
    pub fn display_raw(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => format_plain_number(n),
            Value::Text(s) => s.clone(),
            Value::Composite(v) => v.to_string(),
        }
    }
}

/// Format without unnecessary decimal places. Integers print exactly.
fn format_plain_number(n: &Number) -> String {
    if n.is_i64() || n.is_u64() {
        return n.to_string();
    }
    match n.as_f64() {
        Some(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{:.0}", f),
        Some(f) => format!("{}", f),
        None => n.to_string(),
    }
}

/// Integers compare exactly; anything involving a float compares as `f64`,
/// so `30` and `30.0` are equal.
fn numbers_equal(a: &Number, b: &Number) -> bool {
    if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
        return x == y;
    }
    if let (Some(x), Some(y)) = (a.as_u64(), b.as_u64()) {
        return x == y;
    }
    if a.is_f64() || b.is_f64() {
        return a.as_f64() == b.as_f64();
    }
    // one negative i64, one u64 above i64::MAX
    false
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => numbers_equal(a, b),
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Composite(a), Value::Composite(b)) => a == b,
            _ => false,
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n),
            serde_json::Value::String(s) => Value::Text(s),
            other => Value::Composite(other),
        }
    }
}

impl From<&Value> for serde_json::Value {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Number(n) => serde_json::Value::Number(n.clone()),
            Value::Text(s) => serde_json::Value::String(s.clone()),
            Value::Composite(v) => v.clone(),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::number(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Number(Number::from(value))
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Value::Number(Number::from(value))
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

// ============================================================================
// ROW IDENTITY
// ============================================================================

/// Stable identity of a row: the canonical text form of its key field.
/// Numeric keys `1` and `1.0` map to the same id (`"1"`); integer keys keep
/// every digit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowId(String);

impl RowId {
    pub fn new(id: impl Into<String>) -> Self {
        RowId(id.into())
    }

    /// Derive an identity from a key value. Null and composite values
    /// cannot identify a row.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Null | Value::Composite(_) => None,
            other => Some(RowId(other.display_raw())),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RowId {
    fn from(value: &str) -> Self {
        RowId(value.to_string())
    }
}

impl From<String> for RowId {
    fn from(value: String) -> Self {
        RowId(value)
    }
}

impl From<i64> for RowId {
    fn from(value: i64) -> Self {
        RowId(value.to_string())
    }
}

// ============================================================================
// RECORD
// ============================================================================

/// One row of the dataset.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    fields: Vec<(String, Value)>,
}

impl Record {
    pub fn new() -> Self {
        Record { fields: Vec::new() }
    }

    /// Builder-style insert. A repeated field name replaces the earlier value
    /// but keeps its original position.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(field.into(), value.into());
        self
    }

    pub fn from_fields<I, K>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        let mut record = Record::new();
        for (name, value) in fields {
            record.set(name.into(), value);
        }
        record
    }

    pub fn from_json_object(object: serde_json::Map<String, serde_json::Value>) -> Self {
        Record::from_fields(object.into_iter().map(|(k, v)| (k, Value::from(v))))
    }

    fn set(&mut self, field: String, value: Value) {
        match self.fields.iter_mut().find(|(name, _)| *name == field) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((field, value)),
        }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    /// Name of the first field, in source order.
    pub fn first_field(&self) -> Option<&str> {
        self.fields.first().map(|(name, _)| name.as_str())
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Copy of this record with one field replaced (or appended when absent).
    pub fn with_field(&self, field: &str, value: Value) -> Record {
        let mut next = self.clone();
        next.set(field.to_string(), value);
        next
    }

    pub fn to_json(&self) -> serde_json::Value {
        let object: serde_json::Map<String, serde_json::Value> = self
            .fields
            .iter()
            .map(|(name, value)| (name.clone(), serde_json::Value::from(value)))
            .collect();
        serde_json::Value::Object(object)
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Record {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let object = serde_json::Map::<String, serde_json::Value>::deserialize(deserializer)?;
        Ok(Record::from_json_object(object))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_preserves_source_order() {
        let json = r#"{"zeta": 1, "alpha": "a", "mid": true}"#;
        let record: Record = serde_json::from_str(json).unwrap();
        let names: Vec<&str> = record.field_names().collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_with_field_leaves_original_untouched() {
        let original = Record::new().with("id", 1i64).with("name", "Ann");
        let updated = original.with_field("name", Value::text("Bob"));

        assert_eq!(original.get("name"), Some(&Value::text("Ann")));
        assert_eq!(updated.get("name"), Some(&Value::text("Bob")));
        assert_eq!(updated.first_field(), Some("id"));
    }

    #[test]
    fn test_with_field_appends_missing_field() {
        let record = Record::new().with("id", 1i64);
        let updated = record.with_field("note", Value::text("x"));
        assert_eq!(updated.len(), 2);
        assert_eq!(updated.field_names().last(), Some("note"));
    }

    #[test]
    fn test_json_values_map_to_kinds() {
        assert_eq!(Value::from(json!(null)).kind(), ValueKind::Null);
        assert_eq!(Value::from(json!(3)).kind(), ValueKind::Number);
        assert_eq!(Value::from(json!("x")).kind(), ValueKind::Text);
        assert_eq!(Value::from(json!(false)).kind(), ValueKind::Bool);
        assert_eq!(Value::from(json!([1, 2])).kind(), ValueKind::Composite);
        assert_eq!(Value::from(json!({"a": 1})).kind(), ValueKind::Composite);
    }

    #[test]
    fn test_row_id_canonical_numbers() {
        assert_eq!(RowId::from_value(&Value::from(json!(1.0))), Some(RowId::from(1)));
        assert_eq!(RowId::from_value(&Value::from(json!(1))), Some(RowId::from(1)));
        assert_eq!(RowId::from_value(&Value::number(1.5)).unwrap().as_str(), "1.5");
        assert_eq!(RowId::from_value(&Value::text("abc")), Some(RowId::from("abc")));
        assert_eq!(RowId::from_value(&Value::Null), None);
    }

    #[test]
    fn test_record_serializes_as_object() {
        let record = Record::new().with("id", 7i64).with("active", true);
        let text = serde_json::to_string(&record).unwrap();
        assert_eq!(text, r#"{"id":7,"active":true}"#);
    }

    #[test]
    fn test_numbers_keep_their_json_form() {
        let json = r#"{"id":1,"age":30,"score":0.5,"ratio":2.0}"#;
        let record: Record = serde_json::from_str(json).unwrap();
        assert_eq!(serde_json::to_string(&record).unwrap(), json);
        assert_eq!(record.to_json().to_string(), json);
    }

    #[test]
    fn test_large_integer_ids_stay_distinct() {
        let a = Value::from(json!(9007199254740992u64));
        let b = Value::from(json!(9007199254740993u64));
        assert_ne!(a, b);
        assert_eq!(RowId::from_value(&b).unwrap().as_str(), "9007199254740993");
        assert_ne!(RowId::from_value(&a), RowId::from_value(&b));
    }

    #[test]
    fn test_integer_and_float_forms_are_equal() {
        assert_eq!(Value::from(json!(30)), Value::from(json!(30.0)));
        assert_eq!(Value::number(31.0), Value::from(31i64));
        assert_ne!(Value::number(31.5), Value::from(31i64));
        assert_eq!(Value::number(f64::NAN), Value::Null);
    }
}
