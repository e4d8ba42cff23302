//! Logger facade.
//!
//! # Responsibilities
//! - Own the active backend and swap it atomically on level changes
//! - Expose print-style, format-style and structured writes per severity
//! - Attribute each record to the caller of the facade
//! - Provide a process-wide logger for code that cannot take one by reference
//!
//! # Data Flow
//! ```text
//! Logger::infof(..)
//!     → threshold check against the loaded Backend
//!     → tracing event on the Backend's Dispatch
//!     → RecordFormat → SinkSet → stdout / files / buffers
//!
//! Logger::set_level(..)
//!     → Settings::backend(threshold) builds a fresh Dispatch
//!     → ArcSwap::store (writers see the old or the new backend)
//! ```
//!
//! # Design Decisions
//! - Backends are replaced, never mutated
//! - Unknown level names fall back to info instead of failing
//! - Externally built backends are accepted as typed values; the dynamic
//!   variant reports a wrong type instead of ignoring it

pub mod backend;
pub mod builder;
pub mod field;
pub mod global;
pub mod logger;

pub use backend::Backend;
pub use builder::LoggerBuilder;
pub use field::{Field, FieldValue};
pub use global::{global, init_global};
pub use logger::{DepthGuard, Logger, DEFAULT_DEPTH};
