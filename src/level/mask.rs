//! Bitmask log levels.
//!
//! Each message class owns one bit. A level is the union of its own class and
//! every more severe class, so enabling `WARN` also enables `ERROR` and `FATAL`.

use std::ops::BitOr;

use crate::level::Severity;

/// A single message class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LogType(u8);

impl LogType {
    pub const FATAL: Self = Self(0x1);
    pub const ERROR: Self = Self(0x2);
    pub const WARN: Self = Self(0x4);
    pub const INFO: Self = Self(0x8);
    pub const DEBUG: Self = Self(0x10);

    pub const fn bits(self) -> u8 {
        self.0
    }
}

impl From<Severity> for LogType {
    /// Severities above `Error` share the `FATAL` class.
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::Debug => LogType::DEBUG,
            Severity::Info => LogType::INFO,
            Severity::Warn => LogType::WARN,
            Severity::Error => LogType::ERROR,
            Severity::DPanic | Severity::Panic | Severity::Fatal => LogType::FATAL,
        }
    }
}

/// A cumulative threshold: the set of enabled message classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct LogLevel(u8);

impl LogLevel {
    pub const NONE: Self = Self(0x0);
    pub const FATAL: Self = Self(Self::NONE.0 | LogType::FATAL.0);
    pub const ERROR: Self = Self(Self::FATAL.0 | LogType::ERROR.0);
    pub const WARN: Self = Self(Self::ERROR.0 | LogType::WARN.0);
    pub const INFO: Self = Self(Self::WARN.0 | LogType::INFO.0);
    pub const DEBUG: Self = Self(Self::INFO.0 | LogType::DEBUG.0);
    pub const ALL: Self = Self::DEBUG;

    /// Map a level name to its bitmask.
    ///
    /// Only `info`, `debug`, `warn` and `error` are recognized. Anything else,
    /// the empty string included, disables every class.
    pub fn from_name(name: &str) -> Self {
        match name {
            "info" => Self::INFO,
            "debug" => Self::DEBUG,
            "error" => Self::ERROR,
            "warn" => Self::WARN,
            _ => Self::NONE,
        }
    }

    /// Build a level from raw bits, dropping bits outside `ALL`.
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & Self::ALL.0)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// True when every class enabled in `other` is enabled here.
    pub const fn contains(self, other: LogLevel) -> bool {
        self.0 & other.0 == other.0
    }

    /// True when messages of `class` pass this level.
    pub const fn allows(self, class: LogType) -> bool {
        self.0 & class.0 != 0
    }
}

impl From<LogType> for LogLevel {
    fn from(class: LogType) -> Self {
        Self(class.0)
    }
}

impl From<Severity> for LogLevel {
    /// The down-closed set of classes a `Severity` threshold lets through.
    fn from(threshold: Severity) -> Self {
        match threshold {
            Severity::Debug => LogLevel::DEBUG,
            Severity::Info => LogLevel::INFO,
            Severity::Warn => LogLevel::WARN,
            Severity::Error => LogLevel::ERROR,
            Severity::DPanic | Severity::Panic | Severity::Fatal => LogLevel::FATAL,
        }
    }
}

impl BitOr for LogLevel {
    type Output = LogLevel;

    fn bitor(self, rhs: LogLevel) -> LogLevel {
        LogLevel(self.0 | rhs.0)
    }
}

impl BitOr<LogType> for LogLevel {
    type Output = LogLevel;

    fn bitor(self, rhs: LogType) -> LogLevel {
        LogLevel(self.0 | rhs.0)
    }
}
