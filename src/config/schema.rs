//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::encoder::{EncoderConfig, Encoding};
use crate::sink::rotate::{self, Clock, RotateOptions, DEFAULT_PATTERN};

/// Root configuration for a logger.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LogConfig {
    /// Minimum level name (debug, info, warn, error, dpanic, panic, fatal).
    pub level: String,

    /// Logger name printed in every record.
    pub name: Option<String>,

    /// Report the call site of each record.
    pub caller: bool,

    /// Stack frames skipped when attributing a caller.
    pub depth: usize,

    /// Write records to standard output.
    pub stdout: bool,

    /// Console or JSON lines.
    pub encoding: Encoding,

    /// Field formatting rules.
    pub encoder: EncoderConfig,

    /// Optional rotating log file.
    pub file: Option<FileConfig>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            name: None,
            caller: true,
            depth: 4,
            stdout: true,
            encoding: Encoding::Console,
            encoder: EncoderConfig::default(),
            file: None,
        }
    }
}

/// Rotating file configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct FileConfig {
    /// Base file name; rotated files get the pattern appended.
    pub filename: PathBuf,

    /// Days to keep rotated files (0 = keep forever).
    pub max_days: u32,

    /// Hours per file.
    pub rotation_hours: u32,

    /// strftime suffix of rotated files.
    pub pattern: String,

    /// Keep `filename` as a link to the current file.
    pub link: bool,

    /// Cut periods on UTC instead of local time.
    pub utc: bool,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            filename: PathBuf::from("logs/app.log"),
            max_days: 7,
            rotation_hours: 24,
            pattern: DEFAULT_PATTERN.to_string(),
            link: true,
            utc: false,
        }
    }
}

impl FileConfig {
    pub fn rotate_options(&self) -> RotateOptions {
        RotateOptions {
            pattern: self.pattern.clone(),
            link_name: self.link.then(|| self.filename.clone()),
            max_age: rotate::retention(self.max_days),
            rotation_time: Duration::from_secs(u64::from(self.rotation_hours) * 3600),
            clock: if self.utc { Clock::Utc } else { Clock::Local },
        }
    }
}
