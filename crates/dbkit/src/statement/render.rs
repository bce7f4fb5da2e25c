use super::{Statement, StatementKind};
use crate::dialect::Dialect;
use crate::error::{OrmError, OrmResult};
use crate::value::{Value, Values};

/// Rendered SQL with `?` placeholders and its positional arguments.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Rendered {
    pub sql: String,
    pub args: Vec<Value>,
}

impl Rendered {
    /// Whether nothing was rendered (DELETE/UPDATE/upsert without a table).
    pub fn is_empty(&self) -> bool {
        self.sql.is_empty()
    }
}

impl Statement {
    /// Render the statement for `dialect`.
    ///
    /// The column list and the argument list are produced together on every
    /// call, so they always line up.
    pub fn render(&self, dialect: Dialect) -> OrmResult<Rendered> {
        let mut sql = String::new();
        let mut args = Vec::new();

        match self.kind {
            StatementKind::Insert => {
                if self.table.is_empty() {
                    return Err(OrmError::validation("table cannot be empty"));
                }
                if self.values.is_empty() {
                    return Err(OrmError::validation("values cannot be empty"));
                }
                sql.push_str(if self.ignore {
                    "INSERT IGNORE INTO "
                } else {
                    "INSERT INTO "
                });
                sql.push_str(&self.table);
                write_insert_values(dialect, &mut sql, &mut args, &self.values);
            }
            StatementKind::Delete => {
                if !self.table.is_empty() {
                    if self.where_.is_empty() && !self.unsafe_ {
                        return Err(OrmError::unsafe_mutation("deleting all data is not safe"));
                    }
                    sql.push_str("DELETE FROM ");
                    sql.push_str(&self.table);
                    self.write_where(&mut sql);
                    self.write_limit(dialect, &mut sql);
                }
            }
            StatementKind::Update => {
                if !self.table.is_empty() {
                    if self.where_.is_empty() && !self.unsafe_ {
                        return Err(OrmError::unsafe_mutation("updating all data is not safe"));
                    }
                    if self.values.is_empty() {
                        return Err(OrmError::validation("values cannot be empty"));
                    }
                    sql.push_str("UPDATE ");
                    sql.push_str(&self.table);
                    sql.push_str(" SET ");
                    write_assignments(dialect, &mut sql, &mut args, &self.values);
                    self.write_where(&mut sql);
                    self.write_limit(dialect, &mut sql);
                }
            }
            StatementKind::InsertOrUpdate => {
                if !self.table.is_empty() {
                    if !dialect.supports_upsert() {
                        return Err(OrmError::validation(format!(
                            "ON DUPLICATE KEY UPDATE is not supported by {dialect:?}"
                        )));
                    }
                    if self.values.is_empty() {
                        return Err(OrmError::validation("values cannot be empty"));
                    }
                    if self.update_values.is_empty() {
                        return Err(OrmError::validation("update values cannot be empty"));
                    }
                    sql.push_str("INSERT INTO ");
                    sql.push_str(&self.table);
                    write_insert_values(dialect, &mut sql, &mut args, &self.values);
                    sql.push_str(" ON DUPLICATE KEY UPDATE ");
                    write_assignments(dialect, &mut sql, &mut args, &self.update_values);
                    self.write_limit(dialect, &mut sql);
                }
            }
            StatementKind::Select => {
                sql.push_str("SELECT ");
                sql.push_str(&self.field);
                if !self.table.is_empty() {
                    sql.push_str(" FROM ");
                    sql.push_str(&self.table);
                }
                self.write_where(&mut sql);
                if !self.group.is_empty() {
                    sql.push_str(" GROUP BY ");
                    sql.push_str(&self.group);
                }
                if !self.order.is_empty() {
                    sql.push_str(" ORDER BY ");
                    sql.push_str(&self.order);
                }
                self.write_limit(dialect, &mut sql);
            }
        }

        if !sql.is_empty() {
            args.extend(self.binds.iter().cloned());
        }
        Ok(Rendered { sql, args })
    }

    fn write_where(&self, sql: &mut String) {
        if !self.where_.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&self.where_);
        }
    }

    fn write_limit(&self, dialect: Dialect, sql: &mut String) {
        if !self.limit.is_empty() && dialect.renders_limit() {
            sql.push_str(" LIMIT ");
            sql.push_str(&self.limit);
        }
    }
}

/// ` (`a`,`b`) VALUES (?,?)`
fn write_insert_values(dialect: Dialect, sql: &mut String, args: &mut Vec<Value>, values: &Values) {
    sql.push_str(" (");
    for (i, (column, value)) in values.iter().enumerate() {
        if i > 0 {
            sql.push(',');
        }
        dialect.write_ident(sql, column);
        args.push(value.clone());
    }
    sql.push_str(") VALUES (");
    for i in 0..values.len() {
        if i > 0 {
            sql.push(',');
        }
        sql.push('?');
    }
    sql.push(')');
}

/// `` `a`=?,`b`=? ``
fn write_assignments(dialect: Dialect, sql: &mut String, args: &mut Vec<Value>, values: &Values) {
    for (i, (column, value)) in values.iter().enumerate() {
        if i > 0 {
            sql.push(',');
        }
        dialect.write_ident(sql, column);
        sql.push_str("=?");
        args.push(value.clone());
    }
}
