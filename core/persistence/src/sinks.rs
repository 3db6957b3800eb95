//! FILENAME: core/persistence/src/sinks.rs
//! PURPOSE: Concrete receivers for committed edit events.
//! CONTEXT: The engine hands every committed edit to an `EditSink` and
//! never waits for the outcome beyond the call itself. These sinks cover
//! the usual hosts: an append-only JSON-lines log, an in-memory recorder
//! and a channel to another thread.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use table_engine::{log_debug, log_info};
use table_engine::{DeliveryError, EditEvent, EditSink};

use crate::PersistenceError;

const CATEGORY: &str = "SINK";

// ============================================================================
// JSON LINES
// ============================================================================

/// Writes one JSON object per event, one event per line, flushing after
/// each so a crash loses at most the event being written.
pub struct JsonLinesSink<W: Write + Send> {
    writer: W,
    written: usize,
}

impl JsonLinesSink<BufWriter<File>> {
    /// Start a new log at `path`, truncating any existing file.
    pub fn create(path: &Path) -> Result<Self, PersistenceError> {
        let file = File::create(path)?;
        log_info!(CATEGORY, "writing edit log to {}", path.display());
        Ok(Self::new(BufWriter::new(file)))
    }

    /// Continue an existing log (created if missing).
    pub fn append(path: &Path) -> Result<Self, PersistenceError> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        log_info!(CATEGORY, "appending edit log to {}", path.display());
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write + Send> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        JsonLinesSink { writer, written: 0 }
    }

    /// Events written so far.
    pub fn written(&self) -> usize {
        self.written
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    pub fn write_event(&mut self, event: &EditEvent) -> Result<(), PersistenceError> {
        serde_json::to_writer(&mut self.writer, event)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        self.written += 1;
        Ok(())
    }
}

impl<W: Write + Send> EditSink for JsonLinesSink<W> {
    fn deliver(&mut self, event: EditEvent) -> Result<(), DeliveryError> {
        self.write_event(&event)?;
        log_debug!(CATEGORY, "logged edit of row {} field '{}'", event.row_id, event.field);
        Ok(())
    }
}

// ============================================================================
// RECORDING
// ============================================================================

/// Keeps every event in memory. Clones share the same buffer, so a host
/// can hand one clone to the engine and read from another.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    events: Arc<Mutex<Vec<EditEvent>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<EditEvent>> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn events(&self) -> Vec<EditEvent> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Remove and return everything recorded so far.
    pub fn drain(&self) -> Vec<EditEvent> {
        std::mem::take(&mut *self.lock())
    }
}

impl EditSink for RecordingSink {
    fn deliver(&mut self, event: EditEvent) -> Result<(), DeliveryError> {
        self.lock().push(event);
        Ok(())
    }
}

// ============================================================================
// CHANNEL
// ============================================================================

/// Forwards events over an unbounded channel; never blocks.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    sender: Sender<EditEvent>,
}

impl ChannelSink {
    pub fn new(sender: Sender<EditEvent>) -> Self {
        ChannelSink { sender }
    }
}

impl EditSink for ChannelSink {
    fn deliver(&mut self, event: EditEvent) -> Result<(), DeliveryError> {
        self.sender
            .send(event)
            .map_err(|_| PersistenceError::Disconnected)?;
        Ok(())
    }
}

/// A connected sink/receiver pair.
pub fn channel() -> (ChannelSink, Receiver<EditEvent>) {
    let (sender, receiver) = mpsc::channel();
    (ChannelSink::new(sender), receiver)
}
