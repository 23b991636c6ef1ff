//! In-memory capture for deterministic logging assertions
//!
//! `capture()` returns a sink that appends every record to a shared buffer,
//! plus a `Capture` handle that reads the buffer back as parsed records.
//! Records are parsed from the JSON encoding; console lines are available
//! through `Capture::lines`.

use crate::sink::Sink;
use crate::{Config, Logger, Result};
use atom_log_types::schema::{FIELD_LEVEL, FIELD_MSG, FIELD_TARGET, FIELD_TS};
use atom_log_types::Level;
use serde_json::{Map, Value as JsonValue};
use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError};

#[derive(Clone, Default)]
struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// A captured record with its structured fields
#[derive(Clone, Debug)]
pub struct CapturedRecord {
    pub level: Option<Level>,
    pub ts: Option<String>,
    pub message: String,
    pub target: Option<String>,
    pub fields: Map<String, JsonValue>,
}

impl CapturedRecord {
    fn parse(line: &str) -> Option<Self> {
        let JsonValue::Object(mut object) = serde_json::from_str::<JsonValue>(line).ok()? else {
            return None;
        };
        let mut take_str = |key: &str| match object.remove(key) {
            Some(JsonValue::String(s)) => Some(s),
            _ => None,
        };
        let level = take_str(FIELD_LEVEL).and_then(|l| l.parse().ok());
        let ts = take_str(FIELD_TS);
        let message = take_str(FIELD_MSG).unwrap_or_default();
        let target = take_str(FIELD_TARGET);
        Some(Self {
            level,
            ts,
            message,
            target,
            fields: object,
        })
    }

    /// String form of a field, if present
    pub fn field(&self, key: &str) -> Option<String> {
        self.fields.get(key).map(|v| match v {
            JsonValue::String(s) => s.clone(),
            other => other.to_string(),
        })
    }
}

/// Handle for reading back captured records
#[derive(Clone)]
pub struct Capture {
    buffer: SharedBuffer,
}

impl Capture {
    /// Everything written so far
    pub fn text(&self) -> String {
        let bytes = self
            .buffer
            .0
            .lock()
            .map(|b| b.clone())
            .unwrap_or_default();
        String::from_utf8_lossy(&bytes).into_owned()
    }

    pub fn lines(&self) -> Vec<String> {
        self.text().lines().map(str::to_string).collect()
    }

    /// Get all captured records that parse as JSON
    pub fn records(&self) -> Vec<CapturedRecord> {
        self.text().lines().filter_map(CapturedRecord::parse).collect()
    }

    /// Assert that a record exists with the given level and message
    ///
    /// # Panics
    ///
    /// Panics if the record is not found
    pub fn assert_record_exists(&self, level: Level, message: &str) {
        let records = self.records();
        let found = records
            .iter()
            .any(|r| r.level == Some(level) && r.message == message);
        assert!(
            found,
            "Expected record level={} msg={:?} not found in {} captured records",
            level,
            message,
            records.len()
        );
    }

    /// Count records matching a predicate
    pub fn count_records<F>(&self, predicate: F) -> usize
    where
        F: Fn(&CapturedRecord) -> bool,
    {
        self.records().iter().filter(|r| predicate(r)).count()
    }

    /// Clear all captured output
    pub fn clear(&self) {
        self.buffer.0.lock().map(|mut b| b.clear()).ok();
    }
}

/// Create a capturing sink and its reader
pub fn capture() -> (Sink, Capture) {
    let buffer = SharedBuffer::default();
    let sink = Sink::from_writer("capture", buffer.clone());
    (sink, Capture { buffer })
}

/// Build a logger from `config` that writes only to a fresh capture
///
/// Write failures are reported to stderr.
pub fn logger(config: &Config) -> Result<(Logger, Capture)> {
    let (sink, capture) = capture();
    let logger = Logger::with_sinks(config, vec![sink], vec![Sink::stderr()])?;
    Ok((logger, capture))
}
