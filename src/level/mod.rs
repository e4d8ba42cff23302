//! Level registry.
//!
//! # Data Flow
//! ```text
//! level name ("info", "warn", ...)
//!     → mask.rs     (cumulative LogLevel bitmask, unknown → NONE)
//!     → severity.rs (ordered Severity enum, unknown → Info)
//! ```
//!
//! # Design Decisions
//! - Two independent tables: the bitmask answers "is this class enabled",
//!   the enum drives minimum-level filtering in the backend
//! - Unknown names map to `NONE` in the mask and to `Info` in the enum
//! - Name matching is exact; strict parsing lives in `Severity::from_str`

pub mod mask;
pub mod severity;

pub use mask::{LogLevel, LogType};
pub use severity::Severity;
