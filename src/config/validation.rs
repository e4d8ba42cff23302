//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Reject level names the registry would silently default
//! - Validate value ranges and formats
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: LogConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use thiserror::Error;

use crate::config::schema::LogConfig;
use crate::encoder::is_time_format;
use crate::level::Severity;
use crate::sink::rotate::validate_pattern;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("unknown level {0:?}")]
    UnknownLevel(String),

    #[error("time format {0:?} is not a valid strftime pattern")]
    InvalidTimeFormat(String),

    #[error("file.filename must not be empty")]
    EmptyFilename,

    #[error("file.pattern {0:?} is not a valid strftime pattern")]
    InvalidPattern(String),

    #[error("file.rotation_hours must be greater than zero")]
    ZeroRotation,

    #[error("no output: stdout is disabled and no file is configured")]
    NoSinks,
}

pub fn validate_config(config: &LogConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.level.parse::<Severity>().is_err() {
        errors.push(ValidationError::UnknownLevel(config.level.clone()));
    }
    if !is_time_format(&config.encoder.time_format) {
        errors.push(ValidationError::InvalidTimeFormat(
            config.encoder.time_format.clone(),
        ));
    }

    match &config.file {
        Some(file) => {
            if file.filename.as_os_str().is_empty() {
                errors.push(ValidationError::EmptyFilename);
            }
            if validate_pattern(&file.pattern).is_err() {
                errors.push(ValidationError::InvalidPattern(file.pattern.clone()));
            }
            if file.rotation_hours == 0 {
                errors.push(ValidationError::ZeroRotation);
            }
        }
        None if !config.stdout => errors.push(ValidationError::NoSinks),
        None => {}
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
