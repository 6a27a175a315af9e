//! Configuration validation.
//!
//! Validates configuration at startup to catch common errors early.

use super::Config;
use thiserror::Error;

/// Validation errors for configuration.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("server.name is required")]
    MissingServerName,
    #[error("mpd.max_connections must be at least 1")]
    NoConnections,
    #[error("mpd.max_line_length must be at least 64, got {0}")]
    LineLengthTooSmall(usize),
    #[error("mpd.max_command_list_size must be at least 1")]
    NoCommandListSpace,
    #[error("mpd.password must not be empty")]
    EmptyPassword,
}

/// Validate a configuration, returning all errors found.
pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.server.name.is_empty() {
        errors.push(ValidationError::MissingServerName);
    }

    let mpd = &config.mpd;
    if mpd.max_connections == 0 {
        errors.push(ValidationError::NoConnections);
    }
    if mpd.max_line_length < 64 {
        errors.push(ValidationError::LineLengthTooSmall(mpd.max_line_length));
    }
    if mpd.max_command_list_size == 0 {
        errors.push(ValidationError::NoCommandListSpace);
    }
    if mpd.password.as_deref() == Some("") {
        errors.push(ValidationError::EmptyPassword);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
