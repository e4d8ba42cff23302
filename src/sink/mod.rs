//! Output sinks.
//!
//! # Responsibilities
//! - Name the destinations a logger writes to (stdout, stderr, files, buffers)
//! - Fan every formatted record out to all configured sinks
//! - Provide the daily-rotating file writer
//!
//! # Design Decisions
//! - Sinks are cheap to clone so a backend can be rebuilt with the same set
//! - A failing sink does not stop delivery to the others; a write fails
//!   only when no sink took the record
//! - File sinks go through tracing-appender's non-blocking worker

pub mod rotate;

use std::fmt;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::fmt::MakeWriter;

pub use rotate::{get_writer, Clock, RotateOptions, RotatingFileWriter};

/// A destination for formatted records.
#[derive(Clone)]
pub enum Sink {
    Stdout,
    Stderr,
    /// Writer drained by a background worker thread.
    NonBlocking(NonBlocking),
    /// Any writer behind a mutex, e.g. an in-memory buffer.
    Shared(Arc<Mutex<dyn Write + Send>>),
}

impl Sink {
    /// Move `writer` onto a background worker.
    ///
    /// The guard flushes pending records when dropped and must outlive every
    /// backend that writes to the sink.
    pub fn non_blocking<W>(writer: W) -> (Self, WorkerGuard)
    where
        W: Write + Send + 'static,
    {
        let (non_blocking, guard) = tracing_appender::non_blocking(writer);
        (Sink::NonBlocking(non_blocking), guard)
    }

    pub fn shared<W>(writer: W) -> Self
    where
        W: Write + Send + 'static,
    {
        Sink::Shared(Arc::new(Mutex::new(writer)))
    }

    fn write_all(&self, buf: &[u8]) -> io::Result<()> {
        match self {
            Sink::Stdout => io::stdout().lock().write_all(buf),
            Sink::Stderr => io::stderr().lock().write_all(buf),
            Sink::NonBlocking(writer) => writer.clone().write_all(buf),
            Sink::Shared(writer) => writer
                .lock()
                .map_err(|_| io::Error::other("sink mutex poisoned"))?
                .write_all(buf),
        }
    }

    fn flush(&self) -> io::Result<()> {
        match self {
            Sink::Stdout => io::stdout().flush(),
            Sink::Stderr => io::stderr().flush(),
            Sink::NonBlocking(writer) => writer.clone().flush(),
            Sink::Shared(writer) => writer
                .lock()
                .map_err(|_| io::Error::other("sink mutex poisoned"))?
                .flush(),
        }
    }
}

impl fmt::Debug for Sink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sink::Stdout => f.write_str("Stdout"),
            Sink::Stderr => f.write_str("Stderr"),
            Sink::NonBlocking(_) => f.write_str("NonBlocking"),
            Sink::Shared(_) => f.write_str("Shared"),
        }
    }
}

/// The full set of sinks a backend writes to.
#[derive(Debug, Clone)]
pub struct SinkSet {
    sinks: Arc<[Sink]>,
}

impl SinkSet {
    pub fn new(sinks: Vec<Sink>) -> Self {
        Self {
            sinks: sinks.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Sink> {
        self.sinks.iter()
    }
}

impl Default for SinkSet {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl From<Vec<Sink>> for SinkSet {
    fn from(sinks: Vec<Sink>) -> Self {
        Self::new(sinks)
    }
}

impl<'a> MakeWriter<'a> for SinkSet {
    type Writer = MultiWriter<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        MultiWriter {
            sinks: &self.sinks,
        }
    }
}

/// Writes each buffer to every sink.
///
/// A write succeeds once any sink took the whole buffer, so callers never
/// retry a record that already reached a healthy sink. An empty set accepts
/// everything.
pub struct MultiWriter<'a> {
    sinks: &'a [Sink],
}

impl Write for MultiWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut first_error = None;
        let mut delivered = self.sinks.is_empty();
        for sink in self.sinks {
            match sink.write_all(buf) {
                Ok(()) => delivered = true,
                Err(e) => {
                    first_error.get_or_insert(e);
                }
            }
        }
        match first_error {
            Some(e) if !delivered => Err(not_interrupted(e)),
            _ => Ok(buf.len()),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut first_error = None;
        for sink in self.sinks {
            if let Err(e) = sink.flush() {
                first_error.get_or_insert(e);
            }
        }
        match first_error {
            Some(e) => Err(not_interrupted(e)),
            None => Ok(()),
        }
    }
}

/// `Interrupted` would make `write_all` repeat the record on every sink.
fn not_interrupted(e: io::Error) -> io::Error {
    if e.kind() == io::ErrorKind::Interrupted {
        io::Error::other(e)
    } else {
        e
    }
}
