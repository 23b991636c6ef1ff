//! Record encoding layer
//!
//! `RecordLayer` is the last layer of every logger's subscriber. It turns
//! each tracing event into one encoded line and writes it to the logger's
//! sinks. Events emitted through the logger API carry their severity and
//! structured fields in two reserved event fields; events from any other
//! callsite are encoded from their own metadata and fields.

use crate::config::{from_tracing_level, Encoding};
use crate::sink::Sink;
use atom_log_types::schema::{
    EVENT_FIELD_MESSAGE, EVENT_FIELD_SEVERITY, EVENT_FIELD_STRUCTURED, FIELD_LEVEL, FIELD_MSG,
    FIELD_TARGET, FIELD_TS, LOGGER_TARGET,
};
use atom_log_types::Level;
use chrono::{SecondsFormat, Utc};
use serde_json::{Map, Value as JsonValue};
use std::collections::BTreeMap;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::Layer;

#[derive(Default)]
struct FieldVisitor {
    message: String,
    severity: Option<Level>,
    fields: Map<String, JsonValue>,
}

impl FieldVisitor {
    fn insert(&mut self, field: &Field, value: JsonValue) {
        self.fields.insert(field.name().to_string(), value);
    }
}

impl Visit for FieldVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        let rendered = format!("{:?}", value);
        if field.name() == EVENT_FIELD_MESSAGE {
            self.message = rendered;
        } else {
            self.insert(field, JsonValue::String(rendered));
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            EVENT_FIELD_MESSAGE => self.message = value.to_string(),
            EVENT_FIELD_SEVERITY => self.severity = value.parse().ok(),
            EVENT_FIELD_STRUCTURED => {
                if let Ok(JsonValue::Object(map)) = serde_json::from_str(value) {
                    self.fields.extend(map);
                }
            }
            _ => self.insert(field, JsonValue::String(value.to_string())),
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.insert(field, JsonValue::from(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.insert(field, JsonValue::from(value));
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.insert(field, JsonValue::from(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.insert(field, JsonValue::Bool(value));
    }
}

/// A record ready to be encoded
pub(crate) struct Record<'a> {
    pub level: Level,
    pub ts: String,
    pub message: &'a str,
    pub target: Option<&'a str>,
    pub fields: Map<String, JsonValue>,
}

impl Record<'_> {
    pub fn encode(&self, encoding: Encoding) -> String {
        match encoding {
            Encoding::Json => self.encode_json(),
            Encoding::Console => self.encode_console(),
        }
    }

    fn encode_json(&self) -> String {
        let mut object = Map::with_capacity(self.fields.len() + 4);
        object.insert(FIELD_LEVEL.to_string(), JsonValue::from(self.level.as_str()));
        object.insert(FIELD_TS.to_string(), JsonValue::from(self.ts.as_str()));
        object.insert(FIELD_MSG.to_string(), JsonValue::from(self.message));
        if let Some(target) = self.target {
            object.insert(FIELD_TARGET.to_string(), JsonValue::from(target));
        }
        for (key, value) in &self.fields {
            // Reserved keys always describe the record itself
            if !object.contains_key(key) {
                object.insert(key.clone(), value.clone());
            }
        }
        let mut line = JsonValue::Object(object).to_string();
        line.push('\n');
        line
    }

    fn encode_console(&self) -> String {
        let mut line = format!(
            "{}\t{}\t{}",
            self.ts,
            self.level.as_upper_str(),
            self.message
        );
        if let Some(target) = self.target {
            line.push('\t');
            line.push_str(target);
        }
        if !self.fields.is_empty() {
            line.push('\t');
            line.push_str(&JsonValue::Object(self.fields.clone()).to_string());
        }
        line.push('\n');
        line
    }
}

pub(crate) fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Encodes events and writes them to the logger's sinks
pub(crate) struct RecordLayer {
    encoding: Encoding,
    initial_fields: Map<String, JsonValue>,
    outputs: Vec<Sink>,
    error_outputs: Vec<Sink>,
}

impl RecordLayer {
    pub fn new(
        encoding: Encoding,
        initial_fields: &BTreeMap<String, String>,
        outputs: Vec<Sink>,
        error_outputs: Vec<Sink>,
    ) -> Self {
        let initial_fields = initial_fields
            .iter()
            .map(|(k, v)| (k.clone(), JsonValue::String(v.clone())))
            .collect();
        Self {
            encoding,
            initial_fields,
            outputs,
            error_outputs,
        }
    }

    fn write(&self, line: &str) {
        for sink in &self.outputs {
            if let Err(err) = sink.write_record(line.as_bytes()) {
                self.report_write_failure(sink, &err);
            }
        }
    }

    // Failures here are dropped: there is nowhere left to report them.
    fn report_write_failure(&self, sink: &Sink, err: &std::io::Error) {
        let notice = format!(
            "{}\twrite error: sink {}: {}\n",
            timestamp(),
            sink.label(),
            err
        );
        for fallback in &self.error_outputs {
            let _ = fallback.write_record(notice.as_bytes());
        }
    }
}

impl<S> Layer<S> for RecordLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);

        let mut fields = self.initial_fields.clone();
        fields.extend(visitor.fields);

        let target = metadata.target();
        let record = Record {
            level: visitor
                .severity
                .unwrap_or_else(|| from_tracing_level(*metadata.level())),
            ts: timestamp(),
            message: &visitor.message,
            target: (target != LOGGER_TARGET).then_some(target),
            fields,
        };

        self.write(&record.encode(self.encoding));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(fields: Map<String, JsonValue>) -> Record<'static> {
        Record {
            level: Level::Warn,
            ts: "2026-01-02T03:04:05.678Z".to_string(),
            message: "disk almost full",
            target: None,
            fields,
        }
    }

    #[test]
    fn test_json_record_key_order() {
        let mut fields = Map::new();
        fields.insert("free_mb".to_string(), JsonValue::from(12));
        let line = sample(fields).encode(Encoding::Json);

        assert_eq!(
            line,
            "{\"level\":\"warn\",\"ts\":\"2026-01-02T03:04:05.678Z\",\"msg\":\"disk almost full\",\"free_mb\":12}\n"
        );
    }

    #[test]
    fn test_reserved_keys_not_overwritten() {
        let mut fields = Map::new();
        fields.insert("msg".to_string(), JsonValue::from("spoofed"));
        let line = sample(fields).encode(Encoding::Json);
        let parsed: JsonValue = serde_json::from_str(&line).unwrap();

        assert_eq!(parsed["msg"], "disk almost full");
    }

    #[test]
    fn test_console_record_layout() {
        let mut fields = Map::new();
        fields.insert("free_mb".to_string(), JsonValue::from(12));
        let line = sample(fields).encode(Encoding::Console);

        assert_eq!(
            line,
            "2026-01-02T03:04:05.678Z\tWARN\tdisk almost full\t{\"free_mb\":12}\n"
        );
    }

    #[test]
    fn test_console_without_fields_has_no_trailing_tab() {
        let line = sample(Map::new()).encode(Encoding::Console);
        assert!(line.ends_with("disk almost full\n"));
    }
}
