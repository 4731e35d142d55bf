//! Error types for sqlclause-pg

use sqlclause::MetadataError;
use thiserror::Error;

/// Result type for catalog introspection and cache operations.
pub type PgMetaResult<T> = Result<T, PgMetaError>;

/// Error type for catalog introspection and cache operations.
#[derive(Debug, Error)]
pub enum PgMetaError {
    /// Database error from tokio-postgres.
    #[error("Database error: {0}")]
    Database(#[from] tokio_postgres::Error),
    /// Decode error when reading a column.
    #[error("Decode error for column '{column}': {message}")]
    Decode { column: String, message: String },
    /// Cache file could not be (de)serialized.
    #[error("Serialization error: {0}")]
    Serialization(String),
    /// Cache file could not be read or written.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Other(String),
}

impl PgMetaError {
    /// Create a decode error.
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        PgMetaError::Decode {
            column: column.into(),
            message: message.into(),
        }
    }
}

impl From<PgMetaError> for MetadataError {
    fn from(err: PgMetaError) -> Self {
        MetadataError::unavailable(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_converts_to_metadata_error() {
        let err: MetadataError = PgMetaError::decode("relkind", "bad type").into();
        assert_eq!(
            err,
            MetadataError::unavailable("Decode error for column 'relkind': bad type")
        );
    }
}
