//! Logger configuration.
//!
//! # Data Flow
//! ```text
//! log.toml
//!     → loader::parse_config   (toml → LogConfig, serde defaults fill gaps)
//!     → validation             (every problem reported at once)
//!     → Logger::from_config    (sinks opened once)
//!
//! file edited
//!     → ConfigWatcher          (parent dir watch, unchanged reloads dropped)
//!     → Logger::apply          (level, name, encoding, depth; sinks kept)
//! ```
//!
//! # Design Decisions
//! - Every field has a default, so an empty file is a valid config
//! - Loading rejects level names that `Logger::set_level` would quietly
//!   treat as info

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{FileConfig, LogConfig};
pub use validation::{validate_config, ValidationError};
pub use watcher::ConfigWatcher;
