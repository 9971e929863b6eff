use std::io;
use thiserror::Error;

/// Errors raised at the batch/API boundary. Classification itself never fails.
#[derive(Debug, Error)]
pub enum CalibrationError {
    #[error("due-soon threshold must be non-negative (got {0})")]
    InvalidThreshold(i64),
    #[error("unknown calibration status '{0}'")]
    InvalidStatus(String),
    #[error("invalid date range: start {start} is after end {end}")]
    InvalidDateRange {
        start: chrono::NaiveDate,
        end: chrono::NaiveDate,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("invalid data: {0}")]
    InvalidData(String),
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;

#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("delivery to {email} failed: {reason}")]
    Delivery { email: String, reason: String },
}
