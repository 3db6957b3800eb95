//! FILENAME: core/table-engine/src/dataset.rs
//! PURPOSE: Raw record collections as handed over by the data-loading side.
//! CONTEXT: A dataset is a JSON array of objects. Field order inside each
//! object is preserved, since column order follows it.

use crate::error::EngineError;
use crate::record::Record;

/// Conventional identity field name.
pub const ID_FIELD: &str = "id";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    records: Vec<Record>,
}

impl Dataset {
    pub fn new(records: Vec<Record>) -> Self {
        Dataset { records }
    }

    pub fn from_json_str(json: &str) -> Result<Self, EngineError> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        Self::from_json_value(value)
    }

    pub fn from_json_value(value: serde_json::Value) -> Result<Self, EngineError> {
        let items = match value {
            serde_json::Value::Array(items) => items,
            other => {
                return Err(EngineError::InvalidDataset(format!(
                    "expected an array of records, found {}",
                    json_kind(&other)
                )))
            }
        };

        let mut records = Vec::with_capacity(items.len());
        for (index, item) in items.into_iter().enumerate() {
            match item {
                serde_json::Value::Object(object) => records.push(Record::from_json_object(object)),
                other => {
                    return Err(EngineError::InvalidDataset(format!(
                        "record {} is {}, expected an object",
                        index,
                        json_kind(&other)
                    )))
                }
            }
        }
        Ok(Dataset { records })
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn into_records(self) -> Vec<Record> {
        self.records
    }

    /// The representative record used for schema inference.
    pub fn sample(&self) -> Option<&Record> {
        self.records.first()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl From<Vec<Record>> for Dataset {
    fn from(records: Vec<Record>) -> Self {
        Dataset::new(records)
    }
}

/// Pick the identity field: an explicit override, else `id` when the sample
/// has one, else the sample's first field.
pub fn resolve_key_field(sample: Option<&Record>, explicit: Option<&str>) -> String {
    if let Some(field) = explicit {
        return field.to_string();
    }
    match sample {
        Some(record) if record.contains(ID_FIELD) => ID_FIELD.to_string(),
        Some(record) => record.first_field().unwrap_or(ID_FIELD).to_string(),
        None => ID_FIELD.to_string(),
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
