//! Unified error hierarchy for raceday
//!
//! Structured error types for the store, replay import, and plan/metric
//! calculations, with a severity mapping into the tracing system.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for all raceday operations
#[derive(Debug, Error)]
pub enum RaceDayError {
    /// Preference store errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Replay file import errors
    #[error("Import error: {0}")]
    Import(#[from] ImportError),

    /// Calculation errors
    #[error("Calculation error: {0}")]
    Calculation(#[from] CalculationError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Preference store errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// Store file could not be written
    #[error("Write failed for {path}: {reason}")]
    WriteFailed { path: PathBuf, reason: String },

    /// Stored value exists but cannot be interpreted
    #[error("Invalid value for key {key}: {reason}")]
    InvalidValue { key: String, reason: String },
}

/// Replay file import errors
#[derive(Debug, Error)]
pub enum ImportError {
    /// File not found at specified path
    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Unsupported replay format
    #[error("Unsupported format: {format}")]
    UnsupportedFormat { format: String },

    /// Format-specific parsing error
    #[error("Parse error in {format}: {reason}")]
    ParseError { format: String, reason: String },

    /// Missing required data
    #[error("Missing required data: {field}")]
    MissingData { field: String },
}

/// Calculation errors
#[derive(Debug, Error)]
pub enum CalculationError {
    /// Insufficient data for calculation
    #[error("Insufficient data for {calculation}: {reason}")]
    InsufficientData { calculation: String, reason: String },

    /// Invalid parameter
    #[error("Invalid parameter for {calculation}: {parameter}={value}")]
    InvalidParameter {
        calculation: String,
        parameter: String,
        value: String,
    },
}

/// Result type alias for raceday operations
pub type Result<T> = std::result::Result<T, RaceDayError>;

impl RaceDayError {
    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            RaceDayError::Import(ImportError::FileNotFound { .. }) => ErrorSeverity::Warning,
            RaceDayError::Store(_) => ErrorSeverity::Warning,
            RaceDayError::Calculation(_) => ErrorSeverity::Warning,
            RaceDayError::Internal(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::Error,
        }
    }

    /// Get user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            RaceDayError::Import(ImportError::FileNotFound { path }) => {
                format!("Could not find replay file: {}", path.display())
            }
            RaceDayError::Import(ImportError::UnsupportedFormat { format }) => {
                format!("Replay format '{}' is not supported. Use GPX or CSV.", format)
            }
            RaceDayError::Calculation(CalculationError::InsufficientData { calculation, .. }) => {
                format!(
                    "Not enough data to calculate {}. Record a longer run and try again.",
                    calculation
                )
            }
            _ => self.to_string(),
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Critical system error requiring immediate attention
    Critical,
    /// Error that prevents operation but system can continue
    Error,
    /// Warning that doesn't prevent operation
    Warning,
}

impl ErrorSeverity {
    /// Convert to tracing level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            ErrorSeverity::Critical => tracing::Level::ERROR,
            ErrorSeverity::Error => tracing::Level::ERROR,
            ErrorSeverity::Warning => tracing::Level::WARN,
        }
    }
}
