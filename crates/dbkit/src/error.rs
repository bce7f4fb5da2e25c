//! Error types for dbkit

use thiserror::Error;

/// Result type alias for dbkit operations
pub type OrmResult<T> = Result<T, OrmError>;

/// Error types for statement building, execution and row conversion
#[derive(Debug, Error)]
pub enum OrmError {
    /// Database connection error
    #[error("Connection error: {0}")]
    Connection(String),

    /// Query execution error
    #[error("Query error: {0}")]
    Query(#[from] tokio_postgres::Error),

    /// The query returned no rows where one was required
    #[error("Not found: {0}")]
    NotFound(String),

    /// Statement configuration error (empty table, empty values, unsupported dialect feature)
    #[error("Validation error: {0}")]
    Validation(String),

    /// UPDATE or DELETE without WHERE and without `unsafe_()`
    #[error("{0}")]
    UnsafeMutation(String),

    /// A bound value that cannot be written as a SQL literal
    #[error("invalid sql argument type: {type_name} => {value} (sql: {sql})")]
    InvalidLiteral {
        type_name: &'static str,
        value: String,
        sql: String,
    },

    /// Two record fields bound to the same column
    #[error("column `{column}` is bound to more than one field of {record}")]
    DuplicateBinding {
        record: &'static str,
        column: String,
    },

    /// Pool error
    #[cfg(feature = "pool")]
    #[error("Pool error: {0}")]
    Pool(String),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl OrmError {
    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create an unsafe mutation error
    pub fn unsafe_mutation(message: impl Into<String>) -> Self {
        Self::UnsafeMutation(message.into())
    }

    /// Create an invalid literal error for the statement `sql`
    pub fn invalid_literal(
        type_name: &'static str,
        value: impl Into<String>,
        sql: impl Into<String>,
    ) -> Self {
        Self::InvalidLiteral {
            type_name,
            value: value.into(),
            sql: sql.into(),
        }
    }

    /// Check if this is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Check if this is an unsafe mutation error
    pub fn is_unsafe(&self) -> bool {
        matches!(self, Self::UnsafeMutation(_))
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Wrap a driver error, keeping the database message when there is one.
    pub fn from_db_error(err: tokio_postgres::Error) -> Self {
        if err.is_closed() {
            return Self::Connection(err.to_string());
        }
        Self::Query(err)
    }
}

#[cfg(feature = "pool")]
impl From<deadpool_postgres::PoolError> for OrmError {
    fn from(err: deadpool_postgres::PoolError) -> Self {
        Self::Pool(err.to_string())
    }
}
