//! Error types for the logging subsystem

use std::fmt;

/// Errors that can occur in the logging subsystem
#[derive(Debug, Clone)]
pub enum LoggingError {
    /// Failed to initialize the logging system
    InitializationFailed(String),
    /// Invalid configuration provided
    InvalidConfiguration(String),
}

impl fmt::Display for LoggingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoggingError::InitializationFailed(msg) => {
                write!(f, "Failed to initialize logging: {}", msg)
            }
            LoggingError::InvalidConfiguration(msg) => {
                write!(f, "Invalid logging configuration: {}", msg)
            }
        }
    }
}

impl std::error::Error for LoggingError {}
