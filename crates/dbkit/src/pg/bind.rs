//! Binary parameter binding between [`Value`] and Postgres types.
//!
//! Outgoing values are encoded for whatever type the server inferred for
//! the parameter, converting between numbers and text where needed. Incoming
//! cells are decoded into the closest [`Value`] variant; temporal, uuid and
//! json cells arrive as their text form.

use crate::error::{OrmError, OrmResult};
use crate::inline::PLACEHOLDER;
use crate::value::Value;
use bytes::BytesMut;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rust_decimal::Decimal;
use std::error::Error;
use std::str::FromStr;
use tokio_postgres::types::{FromSql, IsNull, ToSql, Type};
use uuid::Uuid;

type BoxError = Box<dyn Error + Sync + Send>;

const TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// Rewrite `?` placeholders as `$1..$n`.
///
/// Every `?` counts, the same as when inlining. Fails when the statement has
/// more placeholders than `arg_count`; surplus arguments are dropped by the
/// caller.
pub fn number_placeholders(sql: &str, arg_count: usize) -> OrmResult<(String, usize)> {
    let mut out = String::with_capacity(sql.len() + 8);
    let mut count = 0;
    for c in sql.chars() {
        if c == PLACEHOLDER {
            count += 1;
            out.push('$');
            out.push_str(&count.to_string());
        } else {
            out.push(c);
        }
    }
    if count > arg_count {
        return Err(OrmError::validation(format!(
            "statement has {count} placeholders but {arg_count} arguments"
        )));
    }
    Ok((out, count))
}

impl ToSql for Value {
    fn to_sql(&self, ty: &Type, out: &mut BytesMut) -> Result<IsNull, BoxError> {
        match self {
            Value::Null => Ok(IsNull::Yes),
            Value::Bool(b) => match *ty {
                Type::BOOL => b.to_sql(ty, out),
                Type::INT2 | Type::INT4 | Type::INT8 => encode_int(i64::from(*b), ty, out),
                _ => encode_text(if *b { "true" } else { "false" }, ty, out),
            },
            Value::Int(v) => encode_int(*v, ty, out),
            Value::UInt(v) => match i64::try_from(*v) {
                Ok(v) => encode_int(v, ty, out),
                Err(_) => encode_text(&v.to_string(), ty, out),
            },
            Value::BigInt(v) => match i64::try_from(v) {
                Ok(v) => encode_int(v, ty, out),
                Err(_) => encode_text(&v.to_string(), ty, out),
            },
            Value::Float(v) => encode_float(*v, ty, out),
            Value::String(s) => encode_text(s, ty, out),
            Value::Bytes(b) => {
                if *ty == Type::BYTEA {
                    out.extend_from_slice(b);
                    return Ok(IsNull::No);
                }
                encode_text(std::str::from_utf8(b)?, ty, out)
            }
        }
    }

    fn accepts(_ty: &Type) -> bool {
        true
    }

    tokio_postgres::types::to_sql_checked!();
}

fn encode_int(v: i64, ty: &Type, out: &mut BytesMut) -> Result<IsNull, BoxError> {
    match *ty {
        Type::INT2 => i16::try_from(v)?.to_sql(ty, out),
        Type::INT4 => i32::try_from(v)?.to_sql(ty, out),
        Type::INT8 => v.to_sql(ty, out),
        Type::OID => u32::try_from(v)?.to_sql(ty, out),
        Type::FLOAT4 => (v as f32).to_sql(ty, out),
        Type::FLOAT8 => (v as f64).to_sql(ty, out),
        Type::NUMERIC => Decimal::from(v).to_sql(ty, out),
        Type::BOOL => (v != 0).to_sql(ty, out),
        _ => encode_text(&v.to_string(), ty, out),
    }
}

fn encode_float(v: f64, ty: &Type, out: &mut BytesMut) -> Result<IsNull, BoxError> {
    match *ty {
        Type::FLOAT4 => (v as f32).to_sql(ty, out),
        Type::FLOAT8 => v.to_sql(ty, out),
        Type::NUMERIC => Decimal::from_f64_retain(v)
            .ok_or_else(|| format!("{v} cannot be stored as numeric"))?
            .to_sql(ty, out),
        Type::INT2 | Type::INT4 | Type::INT8 | Type::OID => {
            if v.fract() != 0.0 || v.abs() >= i64::MAX as f64 {
                return Err(format!("{v} is not an integer").into());
            }
            encode_int(v as i64, ty, out)
        }
        _ => encode_text(&v.to_string(), ty, out),
    }
}

/// Encode text for `ty`, parsing it first when the type has a binary form.
/// Text-like and unrecognized types (enums, citext) take the raw UTF-8.
fn encode_text(s: &str, ty: &Type, out: &mut BytesMut) -> Result<IsNull, BoxError> {
    match *ty {
        Type::BOOL => parse_bool(s)?.to_sql(ty, out),
        Type::INT2 => s.trim().parse::<i16>()?.to_sql(ty, out),
        Type::INT4 => s.trim().parse::<i32>()?.to_sql(ty, out),
        Type::INT8 => s.trim().parse::<i64>()?.to_sql(ty, out),
        Type::OID => s.trim().parse::<u32>()?.to_sql(ty, out),
        Type::FLOAT4 => s.trim().parse::<f32>()?.to_sql(ty, out),
        Type::FLOAT8 => s.trim().parse::<f64>()?.to_sql(ty, out),
        Type::NUMERIC => Decimal::from_str(s.trim())?.to_sql(ty, out),
        Type::TIMESTAMP => parse_timestamp(s)?.to_sql(ty, out),
        Type::TIMESTAMPTZ => match DateTime::parse_from_rfc3339(s) {
            Ok(at) => at.with_timezone(&Utc).to_sql(ty, out),
            Err(_) => parse_timestamp(s)?.and_utc().to_sql(ty, out),
        },
        Type::DATE => NaiveDate::parse_from_str(s, "%Y-%m-%d")?.to_sql(ty, out),
        Type::TIME => NaiveTime::parse_from_str(s, "%H:%M:%S%.f")?.to_sql(ty, out),
        Type::UUID => Uuid::parse_str(s)?.to_sql(ty, out),
        Type::JSON | Type::JSONB => serde_json::from_str::<serde_json::Value>(s)?.to_sql(ty, out),
        _ => {
            out.extend_from_slice(s.as_bytes());
            Ok(IsNull::No)
        }
    }
}

fn parse_bool(s: &str) -> Result<bool, String> {
    match s.trim().to_ascii_lowercase().as_str() {
        "true" | "t" | "1" | "yes" | "on" => Ok(true),
        "false" | "f" | "0" | "no" | "off" => Ok(false),
        other => Err(format!("invalid boolean: {other}")),
    }
}

fn parse_timestamp(s: &str) -> Result<NaiveDateTime, BoxError> {
    for format in TIMESTAMP_FORMATS {
        if let Ok(at) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(at);
        }
    }
    Err(format!("invalid timestamp: {s}").into())
}

impl<'a> FromSql<'a> for Value {
    fn from_sql(ty: &Type, raw: &'a [u8]) -> Result<Self, BoxError> {
        let value = match *ty {
            Type::BOOL => Value::Bool(bool::from_sql(ty, raw)?),
            Type::INT2 => Value::Int(i16::from_sql(ty, raw)?.into()),
            Type::INT4 => Value::Int(i32::from_sql(ty, raw)?.into()),
            Type::INT8 => Value::Int(i64::from_sql(ty, raw)?),
            Type::OID => Value::Int(u32::from_sql(ty, raw)?.into()),
            Type::FLOAT4 => Value::Float(f32::from_sql(ty, raw)?.into()),
            Type::FLOAT8 => Value::Float(f64::from_sql(ty, raw)?),
            Type::NUMERIC => Value::String(Decimal::from_sql(ty, raw)?.to_string()),
            Type::BYTEA => Value::Bytes(raw.to_vec()),
            Type::TIMESTAMP => Value::String(
                NaiveDateTime::from_sql(ty, raw)?
                    .format("%Y-%m-%d %H:%M:%S%.f")
                    .to_string(),
            ),
            Type::TIMESTAMPTZ => Value::String(DateTime::<Utc>::from_sql(ty, raw)?.to_rfc3339()),
            Type::DATE => Value::String(NaiveDate::from_sql(ty, raw)?.to_string()),
            Type::TIME => Value::String(NaiveTime::from_sql(ty, raw)?.to_string()),
            Type::UUID => Value::String(Uuid::from_sql(ty, raw)?.to_string()),
            Type::JSON | Type::JSONB => {
                Value::String(serde_json::Value::from_sql(ty, raw)?.to_string())
            }
            _ => match std::str::from_utf8(raw) {
                Ok(text) => Value::String(text.to_string()),
                Err(_) => Value::Bytes(raw.to_vec()),
            },
        };
        Ok(value)
    }

    fn from_sql_null(_ty: &Type) -> Result<Self, BoxError> {
        Ok(Value::Null)
    }

    fn accepts(_ty: &Type) -> bool {
        true
    }
}
