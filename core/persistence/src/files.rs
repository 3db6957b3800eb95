//! FILENAME: core/persistence/src/files.rs
//! PURPOSE: Datasets and edit logs on disk.
//! CONTEXT: A dataset file is a JSON array of objects; field order inside
//! each object is preserved. An edit log is the JSON-lines output of
//! `JsonLinesSink`.

use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use table_engine::log_info;
use table_engine::{Dataset, EditEvent, RowSet};

use crate::PersistenceError;

const CATEGORY: &str = "SINK";

pub fn load_dataset(path: &Path) -> Result<Dataset, PersistenceError> {
    let text = fs::read_to_string(path)?;
    let dataset = Dataset::from_json_str(&text)?;
    log_info!(CATEGORY, "loaded {} records from {}", dataset.len(), path.display());
    Ok(dataset)
}

/// Write a snapshot as a pretty-printed JSON array.
pub fn save_dataset(path: &Path, rows: &RowSet) -> Result<(), PersistenceError> {
    let records: Vec<serde_json::Value> = rows.iter().map(|record| record.to_json()).collect();

    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, &records)?;
    writer.write_all(b"\n")?;
    writer.flush()?;

    log_info!(CATEGORY, "saved {} records to {}", records.len(), path.display());
    Ok(())
}

/// Read every event of an edit log, in file order. Blank lines are skipped.
pub fn read_events(path: &Path) -> Result<Vec<EditEvent>, PersistenceError> {
    let reader = BufReader::new(File::open(path)?);
    let mut events = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let event = serde_json::from_str(&line).map_err(|e| PersistenceError::InvalidEventLog {
            line: index + 1,
            message: e.to_string(),
        })?;
        events.push(event);
    }
    Ok(events)
}
