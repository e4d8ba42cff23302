//! Record encoding.
//!
//! # Data Flow
//! ```text
//! tracing Event
//!     → format.rs (RecordFormat: collect fields into a Record)
//!     → record.rs (render console or JSON line)
//!     → config.rs (EncoderConfig: keys, time, level, duration, caller rules)
//! ```
//!
//! # Design Decisions
//! - EncoderConfig is plain data, rebuilt identically for every backend
//! - Rendering is a pure function of Record + EncoderConfig
//! - An empty key drops its element from the output

pub mod config;
pub mod format;
pub mod record;

pub use config::{
    is_time_format, CallerEncoding, DurationEncoding, Encoding, EncoderConfig, LevelCase,
};
pub use format::RecordFormat;
pub use record::Record;
