//! Connection trait and the raw result shapes a driver hands back.

use crate::dialect::Dialect;
use crate::error::{OrmError, OrmResult};
use crate::value::Value;
use std::future::Future;
use std::sync::Arc;

/// Value category a driver reports for a result column.
///
/// Generic map conversion picks its coercion rule from this category, not
/// from a caller-declared schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnCategory {
    /// Date/time columns, delivered as text.
    Time,
    /// Columns scanned as raw bytes (text, blobs, decimals).
    RawBytes,
    /// Nullable text columns.
    NullString,
    Float,
    NullFloat,
    Int,
    NullInt,
    Unsigned,
    /// Anything else; the payload is the driver's own name for it.
    Other(String),
}

/// Name, declared database type and value category of one result column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMeta {
    pub name: String,
    /// Declared type as reported by the database, upper-case (e.g. `DECIMAL`).
    pub database_type: String,
    pub category: ColumnCategory,
}

impl ColumnMeta {
    pub fn new(
        name: impl Into<String>,
        database_type: impl Into<String>,
        category: ColumnCategory,
    ) -> Self {
        Self {
            name: name.into(),
            database_type: database_type.into(),
            category,
        }
    }

    /// Whether the column is a fixed-point decimal (`DECIMAL`/`NUMERIC`).
    pub fn is_decimal(&self) -> bool {
        self.database_type.eq_ignore_ascii_case("DECIMAL")
            || self.database_type.eq_ignore_ascii_case("NUMERIC")
    }
}

/// A fully fetched result set.
///
/// Each row holds one raw cell per column; `Value::Null` is SQL `NULL`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowSet {
    pub columns: Vec<ColumnMeta>,
    pub rows: Vec<Vec<Value>>,
}

impl RowSet {
    pub fn new(columns: Vec<ColumnMeta>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Append a row. Panics if the cell count differs from the column count.
    pub fn push_row(&mut self, row: Vec<Value>) {
        assert_eq!(
            row.len(),
            self.columns.len(),
            "row has {} cells for {} columns",
            row.len(),
            self.columns.len()
        );
        self.rows.push(row);
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Outcome of a mutating statement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecOutcome {
    pub rows_affected: u64,
    /// Auto-increment id generated by the statement, if the driver reports one.
    pub last_insert_id: Option<i64>,
}

/// A database connection that can run statements with positional `?` arguments.
///
/// Implement this for a driver to use it with statements, raw queries and the
/// background queue. Implementations for `tokio_postgres::Client` (and
/// `deadpool_postgres::Pool` with the `pool` feature) live in [`crate::pg`].
pub trait Connection: Send + Sync {
    /// Family used when rendering statements for this connection.
    fn dialect(&self) -> Dialect {
        Dialect::MySql
    }

    /// Execute a statement and report affected rows / last insert id.
    fn execute(
        &self,
        sql: &str,
        args: &[Value],
    ) -> impl Future<Output = OrmResult<ExecOutcome>> + Send;

    /// Run a query and return every row with column metadata.
    fn query(&self, sql: &str, args: &[Value]) -> impl Future<Output = OrmResult<RowSet>> + Send;

    /// Run a query and return only the first row.
    ///
    /// Semantics:
    /// - 0 rows: returns [`OrmError::NotFound`]
    /// - 1 or more rows: returns a set holding just the first row
    fn query_first(
        &self,
        sql: &str,
        args: &[Value],
    ) -> impl Future<Output = OrmResult<RowSet>> + Send {
        async move {
            let mut set = self.query(sql, args).await?;
            if set.rows.is_empty() {
                return Err(OrmError::not_found("query returned no rows"));
            }
            set.rows.truncate(1);
            Ok(set)
        }
    }
}

impl<C: Connection> Connection for &C {
    fn dialect(&self) -> Dialect {
        (**self).dialect()
    }

    fn execute(
        &self,
        sql: &str,
        args: &[Value],
    ) -> impl Future<Output = OrmResult<ExecOutcome>> + Send {
        (**self).execute(sql, args)
    }

    fn query(&self, sql: &str, args: &[Value]) -> impl Future<Output = OrmResult<RowSet>> + Send {
        (**self).query(sql, args)
    }

    fn query_first(
        &self,
        sql: &str,
        args: &[Value],
    ) -> impl Future<Output = OrmResult<RowSet>> + Send {
        (**self).query_first(sql, args)
    }
}

impl<C: Connection> Connection for Arc<C> {
    fn dialect(&self) -> Dialect {
        (**self).dialect()
    }

    fn execute(
        &self,
        sql: &str,
        args: &[Value],
    ) -> impl Future<Output = OrmResult<ExecOutcome>> + Send {
        (**self).execute(sql, args)
    }

    fn query(&self, sql: &str, args: &[Value]) -> impl Future<Output = OrmResult<RowSet>> + Send {
        (**self).query(sql, args)
    }

    fn query_first(
        &self,
        sql: &str,
        args: &[Value],
    ) -> impl Future<Output = OrmResult<RowSet>> + Send {
        (**self).query_first(sql, args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Answers `query_first` itself and counts how often it does.
    #[derive(Default)]
    struct SingleRowDriver {
        first_calls: AtomicUsize,
    }

    impl Connection for SingleRowDriver {
        async fn execute(&self, _sql: &str, _args: &[Value]) -> OrmResult<ExecOutcome> {
            Ok(ExecOutcome::default())
        }

        async fn query(&self, _sql: &str, _args: &[Value]) -> OrmResult<RowSet> {
            Ok(RowSet::default())
        }

        async fn query_first(&self, _sql: &str, _args: &[Value]) -> OrmResult<RowSet> {
            self.first_calls.fetch_add(1, Ordering::SeqCst);
            let mut set = RowSet::new(vec![ColumnMeta::new("n", "INT", ColumnCategory::Int)]);
            set.push_row(vec![Value::Int(1)]);
            Ok(set)
        }
    }

    #[tokio::test]
    async fn wrappers_keep_driver_query_first() {
        let driver = Arc::new(SingleRowDriver::default());

        let set = driver.query_first("SELECT 1", &[]).await.unwrap();
        assert_eq!(set.len(), 1);
        let by_ref = &*driver;
        let set = Connection::query_first(&by_ref, "SELECT 1", &[]).await.unwrap();
        assert_eq!(set.len(), 1);

        assert_eq!(driver.first_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn default_query_first_reports_not_found() {
        let conn = Arc::new(EmptyDriver);
        let err = conn.query_first("SELECT 1", &[]).await.unwrap_err();
        assert!(err.is_not_found());
    }

    struct EmptyDriver;

    impl Connection for EmptyDriver {
        async fn execute(&self, _sql: &str, _args: &[Value]) -> OrmResult<ExecOutcome> {
            Ok(ExecOutcome::default())
        }

        async fn query(&self, _sql: &str, _args: &[Value]) -> OrmResult<RowSet> {
            Ok(RowSet::default())
        }
    }
}
