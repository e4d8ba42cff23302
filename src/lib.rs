//! Structured logging facade.
//!
//! A leveled [`Logger`] over `tracing`, with a bitmask level registry for
//! callers that enable message classes individually, console and JSON record
//! encoders, and a time-rotating file writer with retention.
//!
//! ```no_run
//! use rslog::{get_writer, infof, Logger, Severity};
//!
//! # fn main() -> rslog::LogResult<()> {
//! let logger = Logger::builder()
//!     .name("worker")
//!     .level(Severity::Debug)
//!     .rotating_file(get_writer("logs/worker.log", 7)?)
//!     .build();
//!
//! infof!(logger, "started with {} threads", 4);
//! logger.set_level("error");
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod encoder;
pub mod error;
pub mod facade;
pub mod level;
mod macros;
pub mod sink;

pub use config::{load_config, LogConfig};
pub use encoder::{EncoderConfig, Encoding};
pub use error::{LogError, LogResult};
pub use facade::{global, init_global, Backend, Field, Logger, LoggerBuilder};
pub use level::{LogLevel, LogType, Severity};
pub use sink::{get_writer, RotatingFileWriter, Sink};
