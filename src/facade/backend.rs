//! The live, swappable part of a logger.

use std::sync::Arc;

use tracing::Dispatch;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::Layer;

use crate::encoder::{EncoderConfig, Encoding, RecordFormat};
use crate::level::Severity;
use crate::sink::SinkSet;

/// A dispatch plus the threshold the facade checks before emitting.
#[derive(Debug, Clone)]
pub struct Backend {
    dispatch: Dispatch,
    threshold: Severity,
    encoder: Arc<EncoderConfig>,
}

impl Backend {
    /// Wrap an externally built dispatch.
    ///
    /// The facade lets every severity through and leaves filtering to the
    /// dispatch's own subscriber.
    pub fn new(dispatch: Dispatch) -> Self {
        Self {
            dispatch,
            threshold: Severity::Debug,
            encoder: Arc::new(EncoderConfig::default()),
        }
    }

    pub fn with_threshold(mut self, threshold: Severity) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn dispatch(&self) -> &Dispatch {
        &self.dispatch
    }

    pub fn threshold(&self) -> Severity {
        self.threshold
    }

    /// Encoder used for structured field values.
    pub fn encoder(&self) -> &EncoderConfig {
        &self.encoder
    }

    pub fn enabled(&self, severity: Severity) -> bool {
        severity.is_enabled(self.threshold)
    }
}

impl From<Dispatch> for Backend {
    fn from(dispatch: Dispatch) -> Self {
        Backend::new(dispatch)
    }
}

/// Everything needed to build a backend except the threshold.
#[derive(Debug, Clone)]
pub(crate) struct Settings {
    pub(crate) name: Option<String>,
    pub(crate) caller: bool,
    pub(crate) encoder: Arc<EncoderConfig>,
    pub(crate) encoding: Encoding,
    pub(crate) sinks: SinkSet,
}

impl Settings {
    /// Build a registry with one formatting layer over every sink.
    pub(crate) fn backend(&self, threshold: Severity) -> Backend {
        let format = RecordFormat::new(self.encoder.clone(), self.encoding)
            .with_caller(self.caller)
            .with_name(self.name.clone());

        let layer = tracing_subscriber::fmt::layer()
            .event_format(format)
            .with_ansi(false)
            .with_writer(self.sinks.clone())
            .with_filter(threshold.level_filter());

        Backend {
            dispatch: Dispatch::new(tracing_subscriber::registry().with(layer)),
            threshold,
            encoder: self.encoder.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_external_backend_passes_everything() {
        let backend = Backend::from(Dispatch::none());
        assert_eq!(backend.threshold(), Severity::Debug);
        assert!(backend.enabled(Severity::Debug));
    }

    #[test]
    fn test_threshold() {
        let backend = Backend::new(Dispatch::none()).with_threshold(Severity::Warn);
        assert!(!backend.enabled(Severity::Info));
        assert!(backend.enabled(Severity::Warn));
        assert!(backend.enabled(Severity::Fatal));
    }

    #[test]
    fn test_settings_build_filtered_backend() {
        let settings = Settings {
            name: None,
            caller: true,
            encoder: Arc::new(EncoderConfig::default()),
            encoding: Encoding::Console,
            sinks: SinkSet::default(),
        };
        let backend = settings.backend(Severity::Error);
        assert_eq!(backend.threshold(), Severity::Error);
        assert!(!backend.enabled(Severity::Warn));
    }
}
