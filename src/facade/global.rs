//! Process-wide logger.

use std::sync::OnceLock;

use crate::error::{LogError, LogResult};
use crate::facade::logger::Logger;

static GLOBAL: OnceLock<Logger> = OnceLock::new();

/// The process-wide logger, created with defaults on first use.
pub fn global() -> &'static Logger {
    GLOBAL.get_or_init(Logger::new)
}

/// Install `logger` as the process-wide logger.
///
/// # Errors
///
/// Returns [`LogError::AlreadyInitialized`] if a logger was installed or
/// [`global`] was already called.
pub fn init_global(logger: Logger) -> LogResult<&'static Logger> {
    GLOBAL
        .set(logger)
        .map_err(|_| LogError::AlreadyInitialized)?;
    Ok(global())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::Severity;
    use crate::sink::Sink;

    // One test owns the static; ordering between several would be racy.
    #[test]
    fn test_init_once() {
        let logger = Logger::builder()
            .level(Severity::Warn)
            .sink(Sink::shared(std::io::sink()))
            .build();
        let installed = init_global(logger).unwrap();
        assert_eq!(installed.level(), Severity::Warn);
        assert!(std::ptr::eq(installed, global()));

        let second = Logger::builder().sink(Sink::shared(std::io::sink())).build();
        assert!(matches!(init_global(second), Err(LogError::AlreadyInitialized)));
    }
}
