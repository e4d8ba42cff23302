//! A single log record and its rendered forms.

use chrono::{DateTime, Local};
use serde_json::{Map, Value};

use crate::encoder::{EncoderConfig, Encoding};
use crate::level::Severity;

/// Everything the encoder needs to render one line.
#[derive(Debug, Clone)]
pub struct Record {
    pub time: DateTime<Local>,
    pub severity: Severity,
    /// Logger name, if any.
    pub name: Option<String>,
    /// Raw `file:line` call site.
    pub caller: Option<(String, u32)>,
    pub message: String,
    /// Extra structured fields, in insertion order.
    pub fields: Vec<(String, Value)>,
    pub stack: Option<String>,
}

impl Record {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            time: Local::now(),
            severity,
            name: None,
            caller: None,
            message: message.into(),
            fields: Vec::new(),
            stack: None,
        }
    }

    pub fn render(&self, config: &EncoderConfig, encoding: Encoding) -> String {
        match encoding {
            Encoding::Console => self.render_console(config),
            Encoding::Json => self.render_json(config),
        }
    }

    /// Tab separated: time, level, name, caller, msg, then a JSON object of
    /// extra fields and the stack on its own line.
    pub fn render_console(&self, config: &EncoderConfig) -> String {
        let mut elements: Vec<String> = Vec::with_capacity(6);

        if !config.time_key.is_empty() {
            elements.push(config.encode_time(&self.time));
        }
        if !config.level_key.is_empty() {
            elements.push(config.encode_level(self.severity).to_string());
        }
        if let Some(name) = self.name.as_deref().filter(|n| !n.is_empty()) {
            if !config.name_key.is_empty() {
                elements.push(name.to_string());
            }
        }
        if let Some((file, line)) = &self.caller {
            if !config.caller_key.is_empty() {
                elements.push(config.encode_caller(file, *line));
            }
        }
        if !config.message_key.is_empty() {
            elements.push(self.message.clone());
        }
        if !self.fields.is_empty() {
            elements.push(fields_object(&self.fields).to_string());
        }

        let mut line = elements.join("\t");
        if let Some(stack) = self.stack.as_deref().filter(|s| !s.is_empty()) {
            if !config.stacktrace_key.is_empty() {
                line.push('\n');
                line.push_str(stack);
            }
        }
        line.push_str(&config.line_ending);
        line
    }

    /// One JSON object; keys follow the encoder configuration.
    ///
    /// A field whose key is taken by a record element, such as `msg`, is
    /// written as `fields.<key>`.
    pub fn render_json(&self, config: &EncoderConfig) -> String {
        let mut object = Map::new();

        if !config.time_key.is_empty() {
            object.insert(
                config.time_key.clone(),
                Value::String(config.encode_time(&self.time)),
            );
        }
        if !config.level_key.is_empty() {
            object.insert(
                config.level_key.clone(),
                Value::String(config.encode_level(self.severity).to_string()),
            );
        }
        if let Some(name) = self.name.as_deref().filter(|n| !n.is_empty()) {
            if !config.name_key.is_empty() {
                object.insert(config.name_key.clone(), Value::String(name.to_string()));
            }
        }
        if let Some((file, line)) = &self.caller {
            if !config.caller_key.is_empty() {
                object.insert(
                    config.caller_key.clone(),
                    Value::String(config.encode_caller(file, *line)),
                );
            }
        }
        if !config.message_key.is_empty() {
            object.insert(config.message_key.clone(), Value::String(self.message.clone()));
        }

        let stack = self
            .stack
            .as_deref()
            .filter(|s| !s.is_empty() && !config.stacktrace_key.is_empty());
        for (key, value) in &self.fields {
            let reserved = object.contains_key(key)
                || (stack.is_some() && *key == config.stacktrace_key);
            let key = if reserved {
                format!("fields.{key}")
            } else {
                key.clone()
            };
            object.insert(key, value.clone());
        }
        if let Some(stack) = stack {
            object.insert(config.stacktrace_key.clone(), Value::String(stack.to_string()));
        }

        let mut line = Value::Object(object).to_string();
        line.push_str(&config.line_ending);
        line
    }
}

fn fields_object(fields: &[(String, Value)]) -> Value {
    let mut map = Map::new();
    for (key, value) in fields {
        map.insert(key.clone(), value.clone());
    }
    Value::Object(map)
}
