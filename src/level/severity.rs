//! Ordered severities used for minimum-level filtering.

use std::fmt;
use std::str::FromStr;

use tracing::Level;
use tracing_subscriber::filter::LevelFilter;

use crate::error::LogError;

/// Discrete severity, ascending from `Debug` to `Fatal`.
#[repr(i8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Severity {
    Debug = -1,
    #[default]
    Info = 0,
    Warn = 1,
    Error = 2,
    DPanic = 3,
    Panic = 4,
    Fatal = 5,
}

impl Severity {
    pub const ALL: [Severity; 7] = [
        Severity::Debug,
        Severity::Info,
        Severity::Warn,
        Severity::Error,
        Severity::DPanic,
        Severity::Panic,
        Severity::Fatal,
    ];

    /// Map a level name to a severity, falling back to `Info`.
    pub fn from_name(name: &str) -> Self {
        name.parse().unwrap_or(Severity::Info)
    }

    /// Lower-case name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Severity::Debug => "debug",
            Severity::Info => "info",
            Severity::Warn => "warn",
            Severity::Error => "error",
            Severity::DPanic => "dpanic",
            Severity::Panic => "panic",
            Severity::Fatal => "fatal",
        }
    }

    /// Upper-case name.
    pub const fn capital(self) -> &'static str {
        match self {
            Severity::Debug => "DEBUG",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
            Severity::DPanic => "DPANIC",
            Severity::Panic => "PANIC",
            Severity::Fatal => "FATAL",
        }
    }

    pub const fn value(self) -> i8 {
        self as i8
    }

    /// Whether a record at this severity passes `threshold`.
    pub fn is_enabled(self, threshold: Severity) -> bool {
        self >= threshold
    }

    /// The `tracing` level records of this severity are emitted at.
    pub const fn tracing_level(self) -> Level {
        match self {
            Severity::Debug => Level::DEBUG,
            Severity::Info => Level::INFO,
            Severity::Warn => Level::WARN,
            Severity::Error | Severity::DPanic | Severity::Panic | Severity::Fatal => Level::ERROR,
        }
    }

    /// Backend filter for a logger whose threshold is this severity.
    pub fn level_filter(self) -> LevelFilter {
        LevelFilter::from_level(self.tracing_level())
    }
}

impl FromStr for Severity {
    type Err = LogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "info" => Ok(Severity::Info),
            "debug" => Ok(Severity::Debug),
            "warn" => Ok(Severity::Warn),
            "error" => Ok(Severity::Error),
            "panic" => Ok(Severity::Panic),
            "fatal" => Ok(Severity::Fatal),
            "dpanic" => Ok(Severity::DPanic),
            other => Err(LogError::UnknownLevel(other.to_string())),
        }
    }
}

impl From<Level> for Severity {
    fn from(level: Level) -> Self {
        match level {
            Level::TRACE | Level::DEBUG => Severity::Debug,
            Level::INFO => Severity::Info,
            Level::WARN => Severity::Warn,
            _ => Severity::Error,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("debug", Severity::Debug)]
    #[case("info", Severity::Info)]
    #[case("warn", Severity::Warn)]
    #[case("error", Severity::Error)]
    #[case("dpanic", Severity::DPanic)]
    #[case("panic", Severity::Panic)]
    #[case("fatal", Severity::Fatal)]
    fn test_known_names(#[case] name: &str, #[case] expected: Severity) {
        assert_eq!(Severity::from_name(name), expected);
        assert_eq!(expected.as_str(), name);
    }

    #[rstest]
    #[case("")]
    #[case("garbage")]
    #[case("WARN")]
    #[case("trace")]
    fn test_unknown_name_is_info(#[case] name: &str) {
        assert_eq!(Severity::from_name(name), Severity::from_name("info"));
    }

    #[test]
    fn test_strict_parse_rejects_unknown() {
        let err = "verbose".parse::<Severity>().unwrap_err();
        assert!(matches!(err, LogError::UnknownLevel(name) if name == "verbose"));
        assert_eq!("panic".parse::<Severity>().unwrap(), Severity::Panic);
    }

    #[test]
    fn test_values_ascend() {
        let values: Vec<i8> = Severity::ALL.iter().map(|s| s.value()).collect();
        assert_eq!(values, vec![-1, 0, 1, 2, 3, 4, 5]);
        assert!(Severity::ALL.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(Severity::default(), Severity::Info);
    }

    #[test]
    fn test_is_enabled() {
        assert!(Severity::Error.is_enabled(Severity::Warn));
        assert!(Severity::Warn.is_enabled(Severity::Warn));
        assert!(!Severity::Info.is_enabled(Severity::Warn));
        assert!(Severity::Debug.is_enabled(Severity::Debug));
    }

    #[test]
    fn test_tracing_mapping() {
        assert_eq!(Severity::Debug.tracing_level(), Level::DEBUG);
        assert_eq!(Severity::Fatal.tracing_level(), Level::ERROR);
        assert_eq!(Severity::Warn.level_filter(), LevelFilter::WARN);
        assert_eq!(Severity::from(Level::TRACE), Severity::Debug);
        assert_eq!(Severity::from(Level::ERROR), Severity::Error);
    }

    #[test]
    fn test_display() {
        assert_eq!(Severity::DPanic.to_string(), "dpanic");
        assert_eq!(Severity::DPanic.capital(), "DPANIC");
    }
}
