//! Lightweight query builder for hand-written SQL

use crate::client::{Connection, ExecOutcome, RowSet};
use crate::error::{OrmError, OrmResult};
use crate::materialize::{self, OneRow};
use crate::record::Record;
use crate::value::{Value, Values};

/// Hand-written SQL with `?` placeholders plus its positional arguments.
///
/// # Example
///
/// ```ignore
/// use dbkit::query;
///
/// let user: User = query("SELECT * FROM user WHERE id = ?")
///     .bind(user_id)
///     .fetch_one_as(&conn)
///     .await?;
/// ```
#[derive(Debug, Clone)]
#[must_use]
pub struct Query {
    sql: String,
    args: Vec<Value>,
}

/// Create a new query with the given SQL
pub fn query(sql: impl Into<String>) -> Query {
    Query::new(sql, Vec::new())
}

impl Query {
    pub fn new(sql: impl Into<String>, args: Vec<Value>) -> Self {
        Self {
            sql: sql.into(),
            args,
        }
    }

    /// Bind the next positional argument
    pub fn bind(mut self, value: impl Into<Value>) -> Self {
        self.args.push(value.into());
        self
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn args(&self) -> &[Value] {
        &self.args
    }

    /// The statement with every argument inlined as a MySQL literal.
    pub fn to_full_sql(&self) -> OrmResult<String> {
        crate::inline::inline(&self.sql, &self.args)
    }

    /// Execute the statement
    pub async fn execute(&self, conn: &impl Connection) -> OrmResult<ExecOutcome> {
        conn.execute(&self.sql, &self.args).await
    }

    /// Execute an INSERT and return the generated id
    pub async fn insert_id(&self, conn: &impl Connection) -> OrmResult<i64> {
        self.execute(conn)
            .await?
            .last_insert_id
            .ok_or_else(|| OrmError::Other("driver did not report a last insert id".to_string()))
    }

    /// Execute an UPDATE/DELETE and return the number of affected rows
    pub async fn affected(&self, conn: &impl Connection) -> OrmResult<u64> {
        Ok(self.execute(conn).await?.rows_affected)
    }

    /// Execute the query and return the raw row set
    pub async fn fetch_rows(&self, conn: &impl Connection) -> OrmResult<RowSet> {
        conn.query(&self.sql, &self.args).await
    }

    /// Every row as text
    pub async fn fetch_strings(&self, conn: &impl Connection) -> OrmResult<Vec<OneRow>> {
        Ok(materialize::to_string_rows(self.fetch_rows(conn).await?))
    }

    /// The first row as text; [`OrmError::NotFound`] when there is none
    pub async fn fetch_string_row(&self, conn: &impl Connection) -> OrmResult<OneRow> {
        let set = conn.query_first(&self.sql, &self.args).await?;
        materialize::to_string_rows(set)
            .into_iter()
            .next()
            .ok_or_else(|| OrmError::not_found("query returned no rows"))
    }

    /// Every row as a typed map
    pub async fn fetch_maps(&self, conn: &impl Connection) -> OrmResult<Vec<Values>> {
        Ok(materialize::to_maps(self.fetch_rows(conn).await?))
    }

    /// The first row as a typed map; [`OrmError::NotFound`] when there is none
    pub async fn fetch_map(&self, conn: &impl Connection) -> OrmResult<Values> {
        materialize::to_map(conn.query_first(&self.sql, &self.args).await?)
    }

    /// Every row mapped to `T`
    pub async fn fetch_all_as<T: Record>(&self, conn: &impl Connection) -> OrmResult<Vec<T>> {
        materialize::materialize_all(self.fetch_rows(conn).await?)
    }

    /// The first row mapped to `T`; [`OrmError::NotFound`] when there is none
    pub async fn fetch_one_as<T: Record>(&self, conn: &impl Connection) -> OrmResult<T> {
        materialize::materialize_one(conn.query_first(&self.sql, &self.args).await?)
    }
}
