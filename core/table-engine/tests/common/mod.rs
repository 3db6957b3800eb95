//! FILENAME: core/table-engine/tests/common/mod.rs
//! Test harness and fixtures for table-engine integration tests.

#![allow(dead_code)]

use chrono::NaiveDate;
use std::sync::{Arc, Mutex};

use table_engine::{
    CurrencyBehavior, Dataset, DateBucketer, DeliveryError, EditEvent, EditSink, EngineConfig, FixedDecimalBehavior,
    RowId, TableEngine, Value,
};

/// Reference day used by every date-bucket test.
pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 15).unwrap()
}

/// Eight people, one per date bucket (two in "This Week").
pub const PEOPLE_JSON: &str = r#"[
    {"id": 1, "name": "Alice",   "age": 30, "isActive": true,  "joined": "2024-05-15", "balance": 1234.5,  "email": "alice@example.com",   "score": 0.876},
    {"id": 2, "name": "Bob",     "age": 25, "isActive": true,  "joined": "2024-05-16", "balance": -20,     "email": "bob@example.com",     "score": 0.5},
    {"id": 3, "name": "Charlie", "age": 35, "isActive": false, "joined": "2024-05-20", "balance": 0,       "email": "charlie@example.com", "score": 0.91},
    {"id": 4, "name": "Diana",   "age": 28, "isActive": true,  "joined": "2024-05-01", "balance": 980,     "email": "diana@example.com",   "score": 0.7},
    {"id": 5, "name": "Eve",     "age": 32, "isActive": true,  "joined": "2024-05-27", "balance": 15000,   "email": "eve@example.com",     "score": 0.66},
    {"id": 6, "name": "Frank",   "age": 45, "isActive": false, "joined": "2024-06-20", "balance": 75.25,   "email": "frank@example.com",   "score": 0.42},
    {"id": 7, "name": "Grace",   "age": 29, "isActive": true,  "joined": "2024-05-31", "balance": 310,     "email": "grace@example.com",   "score": 0.95},
    {"id": 8, "name": "Henry",   "age": 51, "isActive": false, "joined": "2024-09-01", "balance": 5,       "email": "henry@example.com",   "score": 0.12}
]"#;

pub fn people() -> Dataset {
    Dataset::from_json_str(PEOPLE_JSON).unwrap()
}

/// Sink that can be inspected after being moved into an engine.
#[derive(Clone, Default)]
pub struct RecordedEvents(pub Arc<Mutex<Vec<EditEvent>>>);

impl RecordedEvents {
    pub fn events(&self) -> Vec<EditEvent> {
        self.0.lock().unwrap().clone()
    }
}

impl EditSink for RecordedEvents {
    fn deliver(&mut self, event: EditEvent) -> Result<(), DeliveryError> {
        self.0.lock().unwrap().push(event);
        Ok(())
    }
}

/// Test harness for creating and driving an engine.
pub struct TestHarness {
    pub engine: TableEngine,
    pub events: RecordedEvents,
}

impl TestHarness {
    /// Engine with default config, single group, recording sink.
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        let events = RecordedEvents::default();
        TestHarness {
            engine: TableEngine::new(config).with_sink(events.clone()),
            events,
        }
    }

    /// People loaded, grouped by `joined` date bucket.
    pub fn with_sample_data() -> Self {
        let mut harness = Self::new();
        harness.engine.set_key_fn(DateBucketer::new("joined", today()));
        harness.engine.load(people()).unwrap();
        harness
    }

    /// Sample data with the hand-tuned column set: currency balance,
    /// two-decimal score.
    pub fn with_formatted_columns() -> Self {
        let mut harness = Self::with_sample_data();
        let locale = harness.engine.config().locale.clone();
        let registry = harness.engine.registry_mut();
        registry.register_field("balance", CurrencyBehavior::dollars(locale.clone()));
        registry.register_field("score", FixedDecimalBehavior::new(2, locale));
        harness
    }

    pub fn value(&self, id: i64, field: &str) -> Option<Value> {
        self.engine
            .store()
            .get(&RowId::from(id))
            .and_then(|record| record.get(field).cloned())
    }

    pub fn group_keys(&mut self) -> Vec<String> {
        self.engine.groups().into_iter().map(|g| g.key).collect()
    }
}
