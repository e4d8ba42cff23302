//! `tracing-subscriber` event formatter backed by [`Record`].

use std::fmt;
use std::sync::Arc;

use chrono::Local;
use serde_json::Value;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

use crate::encoder::{EncoderConfig, Encoding, Record};
use crate::level::Severity;

/// Field carrying the facade severity (`DPanic` and above share `ERROR`).
pub const SEVERITY_FIELD: &str = "severity";
pub const CALLER_FILE_FIELD: &str = "caller.file";
pub const CALLER_LINE_FIELD: &str = "caller.line";
/// Pre-encoded JSON object of structured fields.
pub const FIELDS_FIELD: &str = "fields";
pub const STACK_FIELD: &str = "stack";

/// Formats every event as one console or JSON line.
#[derive(Debug, Clone)]
pub struct RecordFormat {
    config: Arc<EncoderConfig>,
    encoding: Encoding,
    caller: bool,
    name: Option<String>,
}

impl RecordFormat {
    pub fn new(config: Arc<EncoderConfig>, encoding: Encoding) -> Self {
        Self {
            config,
            encoding,
            caller: true,
            name: None,
        }
    }

    /// Toggle caller reporting.
    pub fn with_caller(mut self, caller: bool) -> Self {
        self.caller = caller;
        self
    }

    pub fn with_name(mut self, name: Option<String>) -> Self {
        self.name = name;
        self
    }

    /// Collect an event into a record.
    ///
    /// Events that carry no explicit call site fall back to the location of
    /// the `tracing` macro that produced them.
    pub fn record_for(&self, event: &Event<'_>) -> Record {
        let metadata = event.metadata();
        let mut visitor = RecordVisitor::default();
        event.record(&mut visitor);

        let caller = if self.caller {
            match (visitor.file.take(), visitor.line.take()) {
                (Some(file), Some(line)) => Some((file, line)),
                _ => metadata
                    .file()
                    .map(|file| (file.to_string(), metadata.line().unwrap_or(0))),
            }
        } else {
            None
        };

        Record {
            time: Local::now(),
            severity: visitor
                .severity
                .unwrap_or_else(|| Severity::from(*metadata.level())),
            name: self.name.clone(),
            caller,
            message: visitor.message,
            fields: visitor.fields,
            stack: visitor.stack,
        }
    }
}

impl<S, N> FormatEvent<S, N> for RecordFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let record = self.record_for(event);
        writer.write_str(&record.render(&self.config, self.encoding))
    }
}

#[derive(Default)]
struct RecordVisitor {
    message: String,
    severity: Option<Severity>,
    file: Option<String>,
    line: Option<u32>,
    stack: Option<String>,
    fields: Vec<(String, Value)>,
}

impl RecordVisitor {
    fn push(&mut self, field: &Field, value: Value) {
        self.fields.push((field.name().to_string(), value));
    }

    fn merge_encoded(&mut self, encoded: &str) {
        match serde_json::from_str::<Value>(encoded) {
            Ok(Value::Object(map)) => self.fields.extend(map),
            _ => self
                .fields
                .push((FIELDS_FIELD.to_string(), Value::String(encoded.to_string()))),
        }
    }
}

impl Visit for RecordVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            "message" => self.message = value.to_string(),
            SEVERITY_FIELD => self.severity = value.parse().ok(),
            CALLER_FILE_FIELD => self.file = Some(value.to_string()),
            STACK_FIELD => self.stack = Some(value.to_string()),
            FIELDS_FIELD => self.merge_encoded(value),
            _ => self.push(field, Value::String(value.to_string())),
        }
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        if field.name() == CALLER_LINE_FIELD {
            self.line = u32::try_from(value).ok();
        } else {
            self.push(field, Value::from(value));
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.push(field, Value::from(value));
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.push(field, Value::from(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.push(field, Value::from(value));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        match field.name() {
            "message" => self.message = format!("{value:?}"),
            _ => self.push(field, Value::String(format!("{value:?}"))),
        }
    }
}
