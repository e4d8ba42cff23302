//! Logger construction.

use std::sync::Arc;

use tracing_appender::non_blocking::WorkerGuard;

use crate::config::LogConfig;
use crate::encoder::{EncoderConfig, Encoding};
use crate::error::LogResult;
use crate::facade::backend::Settings;
use crate::facade::logger::{Logger, DEFAULT_DEPTH};
use crate::level::Severity;
use crate::sink::{RotatingFileWriter, Sink, SinkSet};

/// Builder for [`Logger`].
///
/// Without any explicit sink the logger writes to standard output.
pub struct LoggerBuilder {
    name: Option<String>,
    level: Severity,
    caller: bool,
    depth: usize,
    encoder: EncoderConfig,
    encoding: Encoding,
    sinks: Vec<Sink>,
    guards: Vec<WorkerGuard>,
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self {
            name: None,
            level: Severity::Info,
            caller: true,
            depth: DEFAULT_DEPTH,
            encoder: EncoderConfig::default(),
            encoding: Encoding::Console,
            sinks: Vec::new(),
            guards: Vec::new(),
        }
    }
}

impl LoggerBuilder {
    /// Start from a loaded configuration, opening the rotating file if one is
    /// configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the log file cannot be created.
    pub fn from_config(config: &LogConfig) -> LogResult<Self> {
        let mut builder = LoggerBuilder::default()
            .level_name(&config.level)
            .caller(config.caller)
            .depth(config.depth)
            .encoder(config.encoder.clone())
            .encoding(config.encoding);

        if let Some(name) = &config.name {
            builder = builder.name(name.clone());
        }
        if config.stdout {
            builder = builder.sink(Sink::Stdout);
        }
        if let Some(file) = &config.file {
            let writer = RotatingFileWriter::new(&file.filename, file.rotate_options())?;
            builder = builder.rotating_file(writer);
        }
        Ok(builder)
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn level(mut self, level: Severity) -> Self {
        self.level = level;
        self
    }

    /// Set the level by name; unknown names mean info.
    pub fn level_name(self, name: &str) -> Self {
        self.level(Severity::from_name(name))
    }

    pub fn caller(mut self, caller: bool) -> Self {
        self.caller = caller;
        self
    }

    pub fn depth(mut self, depth: usize) -> Self {
        self.depth = depth;
        self
    }

    pub fn encoder(mut self, encoder: EncoderConfig) -> Self {
        self.encoder = encoder;
        self
    }

    pub fn encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn sink(mut self, sink: Sink) -> Self {
        self.sinks.push(sink);
        self
    }

    /// Write to a rotating file through a non-blocking worker owned by the
    /// logger.
    pub fn rotating_file(mut self, writer: RotatingFileWriter) -> Self {
        let (sink, guard) = Sink::non_blocking(writer);
        self.sinks.push(sink);
        self.guards.push(guard);
        self
    }

    pub fn build(self) -> Logger {
        let sinks = if self.sinks.is_empty() {
            vec![Sink::Stdout]
        } else {
            self.sinks
        };

        let settings = Settings {
            name: self.name,
            caller: self.caller,
            encoder: Arc::new(self.encoder),
            encoding: self.encoding,
            sinks: SinkSet::new(sinks),
        };
        Logger::from_parts(settings, self.level, self.depth, self.guards)
    }
}
