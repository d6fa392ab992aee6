use std::result::Result as StdResult;

use thiserror::Error;
use uuid::Uuid;

/// Unified error type for domain, storage, and configuration layers.
#[derive(Debug, Error)]
pub enum BudgetError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid category name: {0}")]
    InvalidName(String),
    #[error("Category already exists: {0}")]
    CategoryExists(String),
    #[error("Transaction not found: {0}")]
    TransactionNotFound(Uuid),
    #[error("Persistence error: {0}")]
    StorageError(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = StdResult<T, BudgetError>;

impl From<std::io::Error> for BudgetError {
    fn from(err: std::io::Error) -> Self {
        BudgetError::StorageError(err.to_string())
    }
}

impl From<serde_json::Error> for BudgetError {
    fn from(err: serde_json::Error) -> Self {
        BudgetError::StorageError(err.to_string())
    }
}

impl From<crate::domain::DateWindowError> for BudgetError {
    fn from(err: crate::domain::DateWindowError) -> Self {
        BudgetError::InvalidInput(err.to_string())
    }
}

impl From<crate::domain::MonthKeyError> for BudgetError {
    fn from(err: crate::domain::MonthKeyError) -> Self {
        BudgetError::InvalidInput(err.to_string())
    }
}
