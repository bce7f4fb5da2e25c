//! In-memory `Connection` used by the integration tests.

#![allow(dead_code)]

use dbkit::{
    ColumnCategory, ColumnMeta, Connection, Dialect, ExecOutcome, OrmError, OrmResult, RowSet,
    Value,
};
use std::collections::VecDeque;
use std::sync::Mutex;

/// Records every statement it receives and answers queries from a FIFO of
/// canned row sets.
#[derive(Debug, Default)]
pub struct MemoryConnection {
    dialect: Dialect,
    outcome: ExecOutcome,
    fail_on: Option<String>,
    results: Mutex<VecDeque<RowSet>>,
    log: Mutex<Vec<(String, Vec<Value>)>>,
}

impl MemoryConnection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    /// Outcome reported by every `execute`.
    pub fn with_outcome(mut self, rows_affected: u64, last_insert_id: Option<i64>) -> Self {
        self.outcome = ExecOutcome {
            rows_affected,
            last_insert_id,
        };
        self
    }

    /// Fail any statement containing `needle`.
    pub fn failing_on(mut self, needle: &str) -> Self {
        self.fail_on = Some(needle.to_string());
        self
    }

    /// Queue a row set for the next `query`.
    pub fn with_rows(self, set: RowSet) -> Self {
        self.results.lock().unwrap().push_back(set);
        self
    }

    /// Every statement received so far, in order.
    pub fn log(&self) -> Vec<(String, Vec<Value>)> {
        self.log.lock().unwrap().clone()
    }

    pub fn statements(&self) -> Vec<String> {
        self.log().into_iter().map(|(sql, _)| sql).collect()
    }

    fn record(&self, sql: &str, args: &[Value]) -> OrmResult<()> {
        self.log.lock().unwrap().push((sql.to_string(), args.to_vec()));
        match &self.fail_on {
            Some(needle) if sql.contains(needle.as_str()) => {
                Err(OrmError::Other(format!("refused: {sql}")))
            }
            _ => Ok(()),
        }
    }
}

impl Connection for MemoryConnection {
    fn dialect(&self) -> Dialect {
        self.dialect
    }

    async fn execute(&self, sql: &str, args: &[Value]) -> OrmResult<ExecOutcome> {
        self.record(sql, args)?;
        Ok(self.outcome)
    }

    async fn query(&self, sql: &str, args: &[Value]) -> OrmResult<RowSet> {
        self.record(sql, args)?;
        Ok(self.results.lock().unwrap().pop_front().unwrap_or_default())
    }
}

/// Raw byte cell, the way a MySQL driver hands back most columns.
pub fn raw(text: &str) -> Value {
    Value::Bytes(text.as_bytes().to_vec())
}

/// `id BIGINT, name VARCHAR, price DECIMAL, score DOUBLE, created DATETIME`
pub fn user_rows() -> RowSet {
    let mut set = RowSet::new(vec![
        ColumnMeta::new("id", "BIGINT", ColumnCategory::Int),
        ColumnMeta::new("name", "VARCHAR", ColumnCategory::RawBytes),
        ColumnMeta::new("price", "DECIMAL", ColumnCategory::RawBytes),
        ColumnMeta::new("score", "DOUBLE", ColumnCategory::Float),
        ColumnMeta::new("created", "DATETIME", ColumnCategory::Time),
    ]);
    set.push_row(vec![
        raw("1"),
        raw("Tom"),
        raw("9.50"),
        Value::Float(88.5),
        raw("2024-01-02 03:04:05"),
    ]);
    set.push_row(vec![
        raw("2"),
        Value::Null,
        Value::Null,
        Value::Null,
        Value::Null,
    ]);
    set
}
