use super::render::Rendered;
use super::{Statement, StatementKind};
use crate::client::{Connection, RowSet};
use crate::dialect::Dialect;
use crate::error::{OrmError, OrmResult};
use crate::materialize::OneRow;
use crate::query::Query;
use crate::queue::SqlQueue;
use crate::record::Record;
use crate::value::{Value, Values};

/// Summary of an executed INSERT/DELETE/UPDATE/upsert.
#[derive(Debug, Default)]
pub struct ExecResult {
    /// Whether the statement rendered and executed without error.
    pub success: bool,
    pub error: Option<OrmError>,
    /// Generated id (INSERT only).
    pub last_id: i64,
    /// Affected rows (DELETE/UPDATE/upsert only).
    pub affected: u64,
    /// The rendered SQL, with placeholders.
    pub sql: String,
}

impl ExecResult {
    fn failed(sql: String, error: OrmError) -> Self {
        Self {
            success: false,
            error: Some(error),
            sql,
            ..Self::default()
        }
    }

    /// Turn the summary into a `Result`, surfacing the error if there is one.
    pub fn into_result(self) -> OrmResult<Self> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self),
        }
    }
}

impl Statement {
    fn effective_dialect(&self, conn: &impl Connection) -> Dialect {
        self.dialect.unwrap_or_else(|| conn.dialect())
    }

    /// Render for `dialect`, record the args, log if requested and wrap the
    /// result as a [`Query`] (inlined when `full_sql` is set).
    fn prepare(&mut self, dialect: Dialect) -> OrmResult<(Rendered, Query)> {
        let rendered = self.render(dialect)?;
        self.args = rendered.args.clone();

        if self.debug {
            let (args, binds) = self.split_args(&rendered);
            tracing::info!(
                target: "dbkit.sql",
                kind = ?self.kind,
                sql = %rendered.sql,
                args = ?args,
                binds = ?binds,
                "prepared statement"
            );
        }

        let query = if self.full_sql {
            let full = crate::inline::inline_with(dialect, &rendered.sql, &rendered.args)?;
            Query::new(full, Vec::new())
        } else {
            Query::new(rendered.sql.clone(), rendered.args.clone())
        };
        Ok((rendered, query))
    }

    /// Split rendered args into the builder's own values and the extra binds.
    pub(super) fn split_args<'r>(&self, rendered: &'r Rendered) -> (&'r [Value], &'r [Value]) {
        let own = rendered.args.len().saturating_sub(self.binds.len());
        rendered.args.split_at(own)
    }

    /// Prepare a single-row fetch: SELECTs are limited to the first row.
    fn prepare_one(&mut self, conn: &impl Connection) -> OrmResult<Query> {
        if self.kind == StatementKind::Select {
            self.limit = "0,1".to_string();
        }
        let dialect = self.effective_dialect(conn);
        Ok(self.prepare(dialect)?.1)
    }

    fn prepare_for(&mut self, conn: &impl Connection) -> OrmResult<Query> {
        let dialect = self.effective_dialect(conn);
        Ok(self.prepare(dialect)?.1)
    }

    /// Execute an INSERT / DELETE / UPDATE / upsert.
    ///
    /// A DELETE/UPDATE/upsert without a table renders nothing and succeeds
    /// without touching the connection.
    pub async fn execute(&mut self, conn: &impl Connection) -> ExecResult {
        let dialect = self.effective_dialect(conn);
        let (rendered, query) = match self.prepare(dialect) {
            Ok(prepared) => prepared,
            Err(err) => return ExecResult::failed(String::new(), err),
        };
        if rendered.is_empty() {
            return ExecResult {
                success: true,
                ..ExecResult::default()
            };
        }

        match query.execute(conn).await {
            Ok(outcome) => {
                let mut result = ExecResult {
                    success: true,
                    sql: rendered.sql,
                    ..ExecResult::default()
                };
                match self.kind {
                    StatementKind::Insert => {
                        result.last_id = outcome.last_insert_id.unwrap_or_default();
                    }
                    StatementKind::Delete
                    | StatementKind::Update
                    | StatementKind::InsertOrUpdate => {
                        result.affected = outcome.rows_affected;
                    }
                    StatementKind::Select => {}
                }
                result
            }
            Err(err) => ExecResult::failed(rendered.sql, err),
        }
    }

    /// Render and hand the statement to the background queue.
    ///
    /// Errors from its execution are not reported back.
    pub fn enqueue<C: Connection + 'static>(&mut self, queue: &SqlQueue<C>) -> OrmResult<()> {
        let dialect = self.dialect.unwrap_or_else(|| queue.dialect());
        let (rendered, query) = self.prepare(dialect)?;
        if rendered.is_empty() {
            return Ok(());
        }
        queue.push(query.sql(), query.args().to_vec());
        Ok(())
    }

    /// Every row as raw cells.
    pub async fn fetch_rows(&mut self, conn: &impl Connection) -> OrmResult<RowSet> {
        self.prepare_for(conn)?.fetch_rows(conn).await
    }

    /// Every row as text.
    pub async fn fetch_strings(&mut self, conn: &impl Connection) -> OrmResult<Vec<OneRow>> {
        self.prepare_for(conn)?.fetch_strings(conn).await
    }

    /// The first row as text; [`OrmError::NotFound`] when there is none.
    pub async fn fetch_string_row(&mut self, conn: &impl Connection) -> OrmResult<OneRow> {
        self.prepare_one(conn)?.fetch_string_row(conn).await
    }

    /// Every row as a typed map.
    pub async fn fetch_maps(&mut self, conn: &impl Connection) -> OrmResult<Vec<Values>> {
        self.prepare_for(conn)?.fetch_maps(conn).await
    }

    /// The first row as a typed map; [`OrmError::NotFound`] when there is none.
    pub async fn fetch_map(&mut self, conn: &impl Connection) -> OrmResult<Values> {
        self.prepare_one(conn)?.fetch_map(conn).await
    }

    /// Every row mapped to `T`.
    pub async fn fetch_all_as<T: Record>(&mut self, conn: &impl Connection) -> OrmResult<Vec<T>> {
        self.prepare_for(conn)?.fetch_all_as(conn).await
    }

    /// The first row mapped to `T`; [`OrmError::NotFound`] when there is none.
    pub async fn fetch_one_as<T: Record>(&mut self, conn: &impl Connection) -> OrmResult<T> {
        self.prepare_one(conn)?.fetch_one_as(conn).await
    }
}
