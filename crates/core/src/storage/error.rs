use thiserror::Error;

use crate::model::EntityType;

/// Errors converting between entities and their stored attribute maps.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EncodingError {
    #[error("Missing field: {0}")]
    MissingField(String),
    #[error("Invalid field {field}: {reason}")]
    InvalidField { field: String, reason: String },
    #[error("Unknown entity type: {0}")]
    UnknownEntityType(String),
    #[error("Expected {expected} record, found {found}")]
    TypeMismatch {
        expected: EntityType,
        found: EntityType,
    },
    #[error("Partition {partition_key} has no metadata record")]
    MissingMetadata { partition_key: String },
}

/// Errors reported by the underlying ordered store.
///
/// The message is carried verbatim from the backend; nothing here is
/// classified as retryable.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Query failed: {0}")]
    QueryFailed(String),
    #[error("Write failed: {0}")]
    WriteFailed(String),
    #[error("Item has no string {0} attribute")]
    InvalidKey(&'static str),
}

/// Errors that can occur during aggregate store operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error(transparent)]
    Encoding(#[from] EncodingError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result type for aggregate store operations.
pub type Result<T> = std::result::Result<T, RepositoryError>;
