//! Error types for query generation and execution

use thiserror::Error;

/// Errors that can occur while generating or executing queries
#[derive(Debug, Error)]
pub enum QueryGenError {
    #[error("cannot build an INSERT statement from an empty record set")]
    EmptyInsert,

    #[error("table not found in metadata: {0}")]
    TableNotFound(String),

    #[error("metadata error: {0}")]
    Metadata(String),

    #[error("connection error: {0}")]
    Connection(String),

    #[error("SQL error: {0}")]
    Sql(#[from] sqlx::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl QueryGenError {
    pub fn table_not_found(msg: impl Into<String>) -> Self {
        Self::TableNotFound(msg.into())
    }

    pub fn metadata(msg: impl Into<String>) -> Self {
        Self::Metadata(msg.into())
    }

    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, QueryGenError>;
