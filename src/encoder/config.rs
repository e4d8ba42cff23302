//! Encoder configuration.

use std::fmt::{self, Write as _};
use std::path::{Component, Path};
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::level::Severity;

/// Default timestamp layout, millisecond precision.
pub const DEFAULT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// True when `format` renders a timestamp without error.
pub fn is_time_format(format: &str) -> bool {
    let mut out = String::new();
    write!(out, "{}", DateTime::<Utc>::default().format(format)).is_ok()
}

/// Output layout of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    /// Tab separated, human readable.
    #[default]
    Console,
    /// One JSON object per line.
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LevelCase {
    #[default]
    Capital,
    Lower,
}

/// How duration values inside fields are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DurationEncoding {
    /// Human string, e.g. `1s 500ms`.
    #[default]
    String,
    /// Floating point seconds.
    Seconds,
    /// Floating point milliseconds.
    Millis,
    /// Integer nanoseconds.
    Nanos,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CallerEncoding {
    /// Last directory and file name: `facade/logger.rs:42`.
    #[default]
    Short,
    /// Path as recorded at the call site.
    Full,
}

/// Formatting rules for each record field.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct EncoderConfig {
    pub time_key: String,
    pub level_key: String,
    pub name_key: String,
    pub caller_key: String,
    pub message_key: String,
    pub stacktrace_key: String,
    pub line_ending: String,

    /// strftime layout for timestamps.
    pub time_format: String,
    pub level_case: LevelCase,
    pub duration: DurationEncoding,
    pub caller: CallerEncoding,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            time_key: "time".to_string(),
            level_key: "level".to_string(),
            name_key: "name".to_string(),
            caller_key: "call".to_string(),
            message_key: "msg".to_string(),
            stacktrace_key: "stack".to_string(),
            line_ending: "\n".to_string(),
            time_format: DEFAULT_TIME_FORMAT.to_string(),
            level_case: LevelCase::Capital,
            duration: DurationEncoding::String,
            caller: CallerEncoding::Short,
        }
    }
}

impl EncoderConfig {
    /// Render a timestamp with `time_format`, or with
    /// [`DEFAULT_TIME_FORMAT`] when `time_format` is not a usable pattern.
    pub fn encode_time<Tz>(&self, time: &DateTime<Tz>) -> String
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        let mut out = String::new();
        if write!(out, "{}", time.format(&self.time_format)).is_err() {
            out.clear();
            let _ = write!(out, "{}", time.format(DEFAULT_TIME_FORMAT));
        }
        out
    }

    pub fn encode_level(&self, severity: Severity) -> &'static str {
        match self.level_case {
            LevelCase::Capital => severity.capital(),
            LevelCase::Lower => severity.as_str(),
        }
    }

    pub fn encode_duration(&self, duration: Duration) -> Value {
        match self.duration {
            DurationEncoding::String => {
                Value::String(humantime::format_duration(duration).to_string())
            }
            DurationEncoding::Seconds => Value::from(duration.as_secs_f64()),
            DurationEncoding::Millis => Value::from(duration.as_secs_f64() * 1_000.0),
            DurationEncoding::Nanos => {
                Value::from(u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX))
            }
        }
    }

    /// Render a `file:line` call site.
    pub fn encode_caller(&self, file: &str, line: u32) -> String {
        match self.caller {
            CallerEncoding::Full => format!("{file}:{line}"),
            CallerEncoding::Short => format!("{}:{line}", trim_path(file)),
        }
    }
}

/// Keep the last directory and the file name of a path.
fn trim_path(file: &str) -> String {
    let parts: Vec<&str> = Path::new(file)
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => part.to_str(),
            _ => None,
        })
        .collect();

    match parts.as_slice() {
        [] => file.to_string(),
        [only] => (*only).to_string(),
        [.., dir, name] => format!("{dir}/{name}"),
    }
}
