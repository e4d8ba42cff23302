//! The logger handle callers write through.

use std::any::Any;
use std::fmt;
use std::panic::Location;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use arc_swap::ArcSwap;
use tracing::{Dispatch, Level};
use tracing_appender::non_blocking::WorkerGuard;

use crate::config::LogConfig;
use crate::error::{LogError, LogResult};
use crate::facade::backend::{Backend, Settings};
use crate::facade::builder::LoggerBuilder;
use crate::facade::field::{encode_fields, Field};
use crate::level::Severity;

/// Default number of frames skipped when attributing a caller.
pub const DEFAULT_DEPTH: usize = 4;

/// Target of every event the facade emits.
const TARGET: &str = "rslog";

/// A leveled logger with a hot-swappable backend.
///
/// Writes never fail observably. `set_level` and `reset_log` replace the
/// backend atomically, so a concurrent writer uses either the old or the new
/// one for its whole record.
pub struct Logger {
    backend: ArcSwap<Backend>,
    settings: Mutex<Settings>,
    depth: AtomicUsize,
    _guards: Vec<WorkerGuard>,
}

impl Logger {
    /// Info level, caller reporting on, console lines on stdout.
    pub fn new() -> Self {
        LoggerBuilder::default().build()
    }

    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::default()
    }

    /// # Errors
    ///
    /// Returns an error if the configured log file cannot be created.
    pub fn from_config(config: &LogConfig) -> LogResult<Self> {
        Ok(LoggerBuilder::from_config(config)?.build())
    }

    pub(crate) fn from_parts(
        settings: Settings,
        level: Severity,
        depth: usize,
        guards: Vec<WorkerGuard>,
    ) -> Self {
        Self {
            backend: ArcSwap::from_pointee(settings.backend(level)),
            settings: Mutex::new(settings),
            depth: AtomicUsize::new(depth),
            _guards: guards,
        }
    }

    fn settings(&self) -> MutexGuard<'_, Settings> {
        self.settings.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current minimum severity.
    pub fn level(&self) -> Severity {
        self.backend.load().threshold()
    }

    pub fn enabled(&self, severity: Severity) -> bool {
        self.backend.load().enabled(severity)
    }

    /// Snapshot of the active backend.
    pub fn backend(&self) -> Arc<Backend> {
        self.backend.load_full()
    }

    pub fn dispatch(&self) -> Dispatch {
        self.backend.load().dispatch().clone()
    }

    /// Rebuild the backend with the minimum level `name`.
    ///
    /// Unknown names select info. Records already written are unaffected.
    pub fn set_level(&self, name: &str) {
        self.set_severity(Severity::from_name(name));
    }

    pub fn set_severity(&self, severity: Severity) {
        let settings = self.settings();
        self.backend.store(Arc::new(settings.backend(severity)));
    }

    /// Apply a reloaded configuration.
    ///
    /// Level, name, caller reporting, encoding and depth take effect
    /// immediately. Sinks are fixed at construction.
    pub fn apply(&self, config: &LogConfig) {
        let mut settings = self.settings();
        settings.name = config.name.clone();
        settings.caller = config.caller;
        settings.encoder = Arc::new(config.encoder.clone());
        settings.encoding = config.encoding;
        self.backend
            .store(Arc::new(settings.backend(Severity::from_name(&config.level))));
        self.depth.store(config.depth, Ordering::SeqCst);
    }

    pub fn depth(&self) -> usize {
        self.depth.load(Ordering::SeqCst)
    }

    /// Set the caller depth, returning the previous value.
    pub fn set_depth(&self, depth: usize) -> usize {
        self.depth.swap(depth, Ordering::SeqCst)
    }

    /// Override the depth until the guard is dropped.
    pub fn scoped_depth(&self, depth: usize) -> DepthGuard<'_> {
        DepthGuard {
            previous: self.set_depth(depth),
            logger: self,
        }
    }

    /// Install an externally built backend.
    pub fn reset_log(&self, backend: impl Into<Backend>) {
        self.backend.store(Arc::new(backend.into()));
    }

    /// Install `candidate` if it is a [`Backend`] or a [`Dispatch`].
    ///
    /// # Errors
    ///
    /// Returns [`LogError::UnsupportedLogger`] for any other type; the active
    /// backend is left untouched.
    pub fn try_reset_log(&self, candidate: Box<dyn Any + Send>) -> LogResult<()> {
        let candidate = match candidate.downcast::<Backend>() {
            Ok(backend) => {
                self.reset_log(*backend);
                return Ok(());
            }
            Err(other) => other,
        };
        match candidate.downcast::<Dispatch>() {
            Ok(dispatch) => {
                self.reset_log(*dispatch);
                Ok(())
            }
            Err(_) => Err(LogError::UnsupportedLogger),
        }
    }

    #[track_caller]
    pub fn debug(&self, values: &[&dyn fmt::Display]) {
        self.emit(Severity::Debug, Location::caller(), format_args!("{}", Joined(values)), None);
    }

    #[track_caller]
    pub fn debugf(&self, args: fmt::Arguments<'_>) {
        self.emit(Severity::Debug, Location::caller(), args, None);
    }

    #[track_caller]
    pub fn info(&self, values: &[&dyn fmt::Display]) {
        self.emit(Severity::Info, Location::caller(), format_args!("{}", Joined(values)), None);
    }

    #[track_caller]
    pub fn infof(&self, args: fmt::Arguments<'_>) {
        self.emit(Severity::Info, Location::caller(), args, None);
    }

    #[track_caller]
    pub fn warn(&self, values: &[&dyn fmt::Display]) {
        self.emit(Severity::Warn, Location::caller(), format_args!("{}", Joined(values)), None);
    }

    #[track_caller]
    pub fn warnf(&self, args: fmt::Arguments<'_>) {
        self.emit(Severity::Warn, Location::caller(), args, None);
    }

    #[track_caller]
    pub fn error(&self, values: &[&dyn fmt::Display]) {
        self.emit(Severity::Error, Location::caller(), format_args!("{}", Joined(values)), None);
    }

    #[track_caller]
    pub fn errorf(&self, args: fmt::Arguments<'_>) {
        self.emit(Severity::Error, Location::caller(), args, None);
    }

    /// Write at any severity. Nothing here panics or exits, whatever the level.
    #[track_caller]
    pub fn log(&self, severity: Severity, args: fmt::Arguments<'_>) {
        self.emit(severity, Location::caller(), args, None);
    }

    /// Write a message with structured fields.
    #[track_caller]
    pub fn log_with(&self, severity: Severity, message: &str, fields: &[Field<'_>]) {
        let location = Location::caller();
        let backend = self.backend.load();
        if !backend.enabled(severity) {
            return;
        }
        let encoded = (!fields.is_empty()).then(|| encode_fields(fields, backend.encoder()));
        emit_on(
            &backend,
            severity,
            location,
            format_args!("{message}"),
            encoded.as_deref(),
        );
    }

    fn emit(
        &self,
        severity: Severity,
        location: &'static Location<'static>,
        message: fmt::Arguments<'_>,
        fields: Option<&str>,
    ) {
        let backend = self.backend.load();
        if backend.enabled(severity) {
            emit_on(&backend, severity, location, message, fields);
        }
    }
}

fn emit_on(
    backend: &Backend,
    severity: Severity,
    location: &'static Location<'static>,
    message: fmt::Arguments<'_>,
    fields: Option<&str>,
) {
    let file = location.file();
    let line = location.line();

    tracing::dispatcher::with_default(backend.dispatch(), || {
        macro_rules! record {
            ($level:expr) => {
                tracing::event!(
                    target: TARGET,
                    $level,
                    severity = severity.as_str(),
                    caller.file = file,
                    caller.line = line,
                    fields = fields,
                    "{}",
                    message
                )
            };
        }

        match severity {
            Severity::Debug => record!(Level::DEBUG),
            Severity::Info => record!(Level::INFO),
            Severity::Warn => record!(Level::WARN),
            Severity::Error | Severity::DPanic | Severity::Panic | Severity::Fatal => {
                record!(Level::ERROR)
            }
        }
    });
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("level", &self.level())
            .field("depth", &self.depth())
            .finish_non_exhaustive()
    }
}

/// Restores the previous depth when dropped.
pub struct DepthGuard<'a> {
    logger: &'a Logger,
    previous: usize,
}

impl DepthGuard<'_> {
    pub fn previous(&self) -> usize {
        self.previous
    }
}

impl Drop for DepthGuard<'_> {
    fn drop(&mut self) {
        self.logger.set_depth(self.previous);
    }
}

/// Print-style values separated by single spaces.
struct Joined<'a, 'b>(&'a [&'b dyn fmt::Display]);

impl fmt::Display for Joined<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, value) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{value}")?;
        }
        Ok(())
    }
}
