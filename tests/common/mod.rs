//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use rslog::{Logger, LoggerBuilder, Severity, Sink};

/// An in-memory sink whose contents can be read back.
#[derive(Clone, Default)]
pub struct Captured(Arc<Mutex<Vec<u8>>>);

impl Captured {
    pub fn sink(&self) -> Sink {
        Sink::Shared(self.0.clone())
    }

    pub fn text(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }

    pub fn lines(&self) -> Vec<String> {
        self.text().lines().map(str::to_string).collect()
    }
}

/// A logger at `level` writing only to the returned capture.
pub fn capturing_logger(level: Severity) -> (Logger, Captured) {
    capturing(Logger::builder().level(level))
}

pub fn capturing(builder: LoggerBuilder) -> (Logger, Captured) {
    let captured = Captured::default();
    let logger = builder.sink(captured.sink()).build();
    (logger, captured)
}

/// Split a console line into its tab-separated elements.
pub fn elements(line: &str) -> Vec<&str> {
    line.split('\t').collect()
}
