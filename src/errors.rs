use std::result::Result as StdResult;

use thiserror::Error;

use crate::{config::ConfigError, storage::StoreError};

/// Unified error type for the reporting, storage and configuration layers.
#[derive(Debug, Error)]
pub enum IncomeError {
    #[error("Fetch failed: {0}")]
    FetchFailed(#[from] StoreError),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Persistence error: {0}")]
    Storage(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = StdResult<T, IncomeError>;

impl From<std::io::Error> for IncomeError {
    fn from(err: std::io::Error) -> Self {
        IncomeError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for IncomeError {
    fn from(err: serde_json::Error) -> Self {
        IncomeError::Storage(err.to_string())
    }
}

impl From<ConfigError> for IncomeError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Io(io) => IncomeError::Storage(io.to_string()),
            ConfigError::Serde(message) | ConfigError::Invalid(message) => {
                IncomeError::Config(message)
            }
        }
    }
}
