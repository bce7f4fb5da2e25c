//! Statement builder for INSERT / DELETE / UPDATE / SELECT / upsert.
//!
//! ```ignore
//! use dbkit::{select, update, values};
//!
//! let users = select("id,name")
//!     .from("user")
//!     .where_("age > ?")
//!     .bind(18)
//!     .limit(10)
//!     .fetch_maps(&conn)
//!     .await?;
//!
//! let res = update()
//!     .table("user")
//!     .values(values! { "name" => "Tom" })
//!     .where_("id = ?")
//!     .bind(1)
//!     .execute(&conn)
//!     .await;
//! ```
//!
//! Clause fragments (`where_`, `group_by`, `order_by`, the select field list)
//! are written into the statement verbatim. Only the column names of
//! INSERT/UPDATE value maps are quoted by the builder.

mod exec;
mod render;


pub use exec::ExecResult;
pub use render::Rendered;

use crate::dialect::Dialect;
use crate::value::{Value, Values};

/// The kind of statement a [`Statement`] renders to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    Insert,
    Delete,
    Update,
    Select,
    /// `INSERT ... ON DUPLICATE KEY UPDATE`
    InsertOrUpdate,
}

/// Mutable description of one SQL statement.
///
/// Created by [`insert`], [`delete`], [`update`], [`select`] or
/// [`insert_or_update`], configured with chained setters and rendered by
/// [`Statement::to_sql`] or one of the execution methods.
#[derive(Debug, Clone)]
#[must_use]
pub struct Statement {
    kind: StatementKind,
    dialect: Option<Dialect>,
    field: String,
    table: String,
    where_: String,
    group: String,
    order: String,
    limit: String,
    values: Values,
    update_values: Values,
    binds: Vec<Value>,
    ignore: bool,
    unsafe_: bool,
    debug: bool,
    full_sql: bool,
    args: Vec<Value>,
}

/// Start an `INSERT INTO` statement.
pub fn insert() -> Statement {
    Statement::new(StatementKind::Insert)
}

/// Start an `INSERT IGNORE INTO` statement.
pub fn insert_ignore() -> Statement {
    Statement::new(StatementKind::Insert).ignore(true)
}

/// Start a `DELETE FROM` statement.
pub fn delete() -> Statement {
    Statement::new(StatementKind::Delete)
}

/// Start an `UPDATE` statement.
pub fn update() -> Statement {
    Statement::new(StatementKind::Update)
}

/// Start an `INSERT ... ON DUPLICATE KEY UPDATE` statement.
pub fn insert_or_update() -> Statement {
    Statement::new(StatementKind::InsertOrUpdate)
}

/// Start a `SELECT fields` statement.
pub fn select(fields: &str) -> Statement {
    let mut stmt = Statement::new(StatementKind::Select);
    stmt.field = fields.to_string();
    stmt
}

/// Start a `SELECT *` statement.
pub fn select_all() -> Statement {
    select("*")
}

impl Statement {
    /// Create an empty statement of `kind`.
    pub fn new(kind: StatementKind) -> Self {
        Self {
            kind,
            dialect: None,
            field: "*".to_string(),
            table: String::new(),
            where_: String::new(),
            group: String::new(),
            order: String::new(),
            limit: String::new(),
            values: Values::new(),
            update_values: Values::new(),
            binds: Vec::new(),
            ignore: false,
            unsafe_: false,
            debug: false,
            full_sql: false,
            args: Vec::new(),
        }
    }

    pub fn kind(&self) -> StatementKind {
        self.kind
    }

    /// Render for `dialect` instead of the executing connection's dialect.
    pub fn dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = Some(dialect);
        self
    }

    /// Set the target table.
    pub fn table(mut self, table: &str) -> Self {
        self.table = table.to_string();
        self
    }

    /// Alias of [`Statement::table`].
    pub fn from(self, table: &str) -> Self {
        self.table(table)
    }

    /// Set the select field list.
    pub fn fields(mut self, fields: &str) -> Self {
        self.field = if fields.is_empty() {
            "*".to_string()
        } else {
            fields.to_string()
        };
        self
    }

    /// Set the WHERE fragment (without the keyword).
    pub fn where_(mut self, fragment: &str) -> Self {
        self.where_ = fragment.to_string();
        self
    }

    /// Set the GROUP BY fragment (without the keyword).
    pub fn group_by(mut self, fragment: &str) -> Self {
        self.group = fragment.to_string();
        self
    }

    /// Set the ORDER BY fragment (without the keyword).
    pub fn order_by(mut self, fragment: &str) -> Self {
        self.order = fragment.to_string();
        self
    }

    /// `LIMIT count`
    pub fn limit(mut self, count: u64) -> Self {
        self.limit = count.to_string();
        self
    }

    /// `LIMIT offset,count`
    pub fn limit_offset(mut self, count: u64, offset: u64) -> Self {
        self.limit = format!("{offset},{count}");
        self
    }

    /// Replace the column values of an INSERT/UPDATE (the VALUES part of an upsert).
    pub fn values(mut self, values: Values) -> Self {
        self.values = values;
        self
    }

    /// Replace the values of the `ON DUPLICATE KEY UPDATE` clause.
    pub fn update_values(mut self, values: Values) -> Self {
        self.update_values = values;
        self
    }

    /// Add (or replace) one column value.
    pub fn add_value(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.values.add(column, value);
        self
    }

    /// Add (or replace) one value of the `ON DUPLICATE KEY UPDATE` clause.
    pub fn add_update_value(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.update_values.add(column, value);
        self
    }

    /// Bind a value for a `?` inside a caller fragment.
    ///
    /// Bound values follow the builder's own column values in the argument list.
    pub fn bind(mut self, value: impl Into<Value>) -> Self {
        self.binds.push(value.into());
        self
    }

    /// Bind several values, in order.
    pub fn bind_all<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.binds.extend(values.into_iter().map(Into::into));
        self
    }

    /// `INSERT IGNORE`
    pub fn ignore(mut self, ignore: bool) -> Self {
        self.ignore = ignore;
        self
    }

    /// Allow UPDATE/DELETE without a WHERE fragment.
    pub fn unsafe_(mut self, allow: bool) -> Self {
        self.unsafe_ = allow;
        self
    }

    /// Log the rendered statement and its arguments before execution.
    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Execute the fully inlined statement instead of binding arguments.
    pub fn full_sql(mut self, full_sql: bool) -> Self {
        self.full_sql = full_sql;
        self
    }

    /// Positional arguments produced by the last render.
    pub fn args(&self) -> &[Value] {
        &self.args
    }

    /// Render with `?` placeholders, keeping the argument list for [`Statement::args`].
    pub fn to_sql(&mut self) -> crate::OrmResult<String> {
        let Rendered { sql, args } = self.render(self.dialect.unwrap_or_default())?;
        self.args = args;
        Ok(sql)
    }

    /// Render with every argument inlined as a literal.
    pub fn to_full_sql(&mut self) -> crate::OrmResult<String> {
        let dialect = self.dialect.unwrap_or_default();
        let Rendered { sql, args } = self.render(dialect)?;
        let full = crate::inline::inline_with(dialect, &sql, &args)?;
        self.args = args;
        Ok(full)
    }
}
