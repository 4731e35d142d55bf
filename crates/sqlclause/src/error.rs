//! Error types for sqlclause

use thiserror::Error;

/// Result type alias for sqlclause operations
pub type SqlResult<T> = Result<T, SqlError>;

/// Failure reported by a [`MetadataProvider`](crate::MetadataProvider).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MetadataError {
    /// The table is not known to the provider.
    #[error("Unknown table: {}", qualified(.schema.as_deref(), .table))]
    UnknownTable {
        schema: Option<String>,
        table: String,
    },

    /// The provider could not be reached or failed while looking up columns.
    #[error("Metadata unavailable: {0}")]
    Unavailable(String),
}

impl MetadataError {
    /// Create an unknown table error
    pub fn unknown_table(schema: Option<&str>, table: impl Into<String>) -> Self {
        Self::UnknownTable {
            schema: schema.map(str::to_string),
            table: table.into(),
        }
    }

    /// Create an unavailable error
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable(message.into())
    }
}

fn qualified(schema: Option<&str>, table: &str) -> String {
    match schema {
        Some(schema) => format!("{schema}.{table}"),
        None => table.to_string(),
    }
}

/// Error types for building and rendering statements
#[derive(Debug, Error)]
pub enum SqlError {
    /// Column lookup failed
    #[error("Metadata error: {0}")]
    Metadata(#[from] MetadataError),

    /// A predicate or placeholder referenced a parameter that is not bound
    #[error("Unknown parameter: {0}")]
    UnknownParameter(String),

    /// DELETE rendered without a WHERE clause
    #[error("WHERE clause required for DELETE FROM {table}")]
    MissingWhere { table: String },

    /// JOIN rendered without any ON condition
    #[error("ON condition required for JOIN {table}")]
    MissingJoinCondition { table: String },

    /// Operation not supported by the active statement
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// A statement resolved to no columns
    #[error("No columns resolved for {table}")]
    EmptyColumnList { table: String },

    /// `build` called before a statement was configured
    #[error("No statement configured")]
    NoStatement,

    /// Invalid paging parameters
    #[error("Invalid paging: {0}")]
    InvalidPaging(String),

    /// Invalid configuration value or document
    #[error("Configuration error: {0}")]
    Config(String),
}

impl SqlError {
    /// Create an unknown parameter error
    pub fn unknown_parameter(name: impl Into<String>) -> Self {
        Self::UnknownParameter(name.into())
    }

    /// Create a missing WHERE error
    pub fn missing_where(table: impl Into<String>) -> Self {
        Self::MissingWhere {
            table: table.into(),
        }
    }

    /// Create a missing JOIN condition error
    pub fn missing_join_condition(table: impl Into<String>) -> Self {
        Self::MissingJoinCondition {
            table: table.into(),
        }
    }

    /// Create an unsupported operation error
    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::UnsupportedOperation(message.into())
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Check if this is a metadata error
    pub fn is_metadata(&self) -> bool {
        matches!(self, Self::Metadata(_))
    }

    /// Check if this is an unknown parameter error
    pub fn is_unknown_parameter(&self) -> bool {
        matches!(self, Self::UnknownParameter(_))
    }

    /// Check if this is a missing WHERE error
    pub fn is_missing_where(&self) -> bool {
        matches!(self, Self::MissingWhere { .. })
    }

    /// Check if this is a missing JOIN condition error
    pub fn is_missing_join_condition(&self) -> bool {
        matches!(self, Self::MissingJoinCondition { .. })
    }

    /// Check if this is an unsupported operation error
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::UnsupportedOperation(_))
    }
}
