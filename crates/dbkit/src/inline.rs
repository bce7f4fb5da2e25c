//! Literal inlining of positional `?` arguments.
//!
//! Produces a fully inlined statement for logging and for drivers that cannot
//! take bound parameters.
//!
//! String arguments have embedded single quotes *removed* (not doubled) and
//! backslashes escaped before being wrapped in single quotes, so `O'Brien`
//! becomes `'OBrien'`. Postgres literals take the `E` prefix so the escaped
//! backslashes are read back as one.

use crate::dialect::Dialect;
use crate::error::{OrmError, OrmResult};
use crate::value::Value;
use std::fmt::Write;

/// Placeholder character.
pub const PLACEHOLDER: char = '?';

/// Inline `args` into `sql` using MySQL literal syntax.
///
/// Placeholders beyond the last argument are left in place; arguments beyond
/// the last placeholder are ignored.
///
/// ```ignore
/// let sql = dbkit::inline("age > ?", &[18.into()])?;
/// assert_eq!(sql, "age > 18");
/// ```
pub fn inline(sql: &str, args: &[Value]) -> OrmResult<String> {
    inline_with(Dialect::MySql, sql, args)
}

/// Inline `args` into `sql` using the literal syntax of `dialect`.
pub fn inline_with(dialect: Dialect, sql: &str, args: &[Value]) -> OrmResult<String> {
    if !sql.contains(PLACEHOLDER) {
        return Ok(sql.to_string());
    }

    let mut out = String::with_capacity(sql.len() + args.len() * 8);
    let mut args = args.iter();
    let mut segments = sql.split(PLACEHOLDER).peekable();

    while let Some(segment) = segments.next() {
        out.push_str(segment);
        if segments.peek().is_none() {
            break;
        }
        match args.next() {
            Some(arg) => write_literal(dialect, &mut out, arg, sql)?,
            None => out.push(PLACEHOLDER),
        }
    }

    Ok(out)
}

/// Append `value` as a SQL literal.
///
/// `sql` is only used to describe the statement in errors.
pub fn write_literal(dialect: Dialect, out: &mut String, value: &Value, sql: &str) -> OrmResult<()> {
    match value {
        Value::Null => out.push_str("NULL"),
        Value::Bool(true) => out.push_str("true"),
        Value::Bool(false) => out.push_str("false"),
        Value::Int(v) => {
            let _ = write!(out, "{v}");
        }
        Value::UInt(v) => {
            let _ = write!(out, "{v}");
        }
        Value::Float(v) => {
            if !v.is_finite() {
                return Err(OrmError::invalid_literal("f64", v.to_string(), sql));
            }
            let _ = write!(out, "{v}");
        }
        Value::BigInt(v) => {
            let _ = write!(out, "{v}");
        }
        Value::String(s) => write_quoted(dialect, out, s),
        Value::Bytes(b) => dialect.write_bytes(out, b),
    }
    Ok(())
}

fn write_quoted(dialect: Dialect, out: &mut String, s: &str) {
    out.reserve(s.len() + 3);
    out.push_str(dialect.string_prefix());
    out.push('\'');
    for c in s.chars() {
        match c {
            '\'' => {}
            '\\' => out.push_str("\\\\"),
            c => out.push(c),
        }
    }
    out.push('\'');
}
