//! Cell coercion rules.
//!
//! Two entry points:
//! - [`coerce_into`] writes one raw cell into a typed record field, chosen by
//!   the field's kind.
//! - [`coerce_generic`] turns one raw cell into a typed [`Value`], chosen by
//!   the column's reported category.
//!
//! Parse failures never raise an error. The field (or value) falls back to the
//! rule's default and conversion of the row continues.

use crate::client::{ColumnCategory, ColumnMeta};
use crate::record::FieldSlot;
use crate::value::Value;
use std::str::FromStr;

/// Write `cell` into `slot`.
///
/// | field kind | non-null cell | null cell |
/// |---|---|---|
/// | bool | `true` unless the text is `"false"` | `false` |
/// | string | text | `""` |
/// | float | parsed; unchanged on failure | `0.0` |
/// | bytes | raw bytes | unchanged |
/// | integer | parsed base-10; unchanged on failure | `0` |
pub fn coerce_into(slot: FieldSlot<'_>, cell: &Value) {
    match slot {
        FieldSlot::Bool(f) => *f = !cell.is_null() && cell.to_text() != "false",
        FieldSlot::String(f) => *f = cell.to_text().into_owned(),
        FieldSlot::F32(f) => match cell {
            Value::Null => *f = 0.0,
            _ => {
                if let Some(v) = parse_f64(cell) {
                    *f = v as f32;
                }
            }
        },
        FieldSlot::F64(f) => match cell {
            Value::Null => *f = 0.0,
            _ => {
                if let Some(v) = parse_f64(cell) {
                    *f = v;
                }
            }
        },
        FieldSlot::Bytes(f) => match cell {
            Value::Null => {}
            Value::Bytes(b) => f.clone_from(b),
            other => *f = other.to_text().into_owned().into_bytes(),
        },
        FieldSlot::I8(f) => set_int(f, cell),
        FieldSlot::I16(f) => set_int(f, cell),
        FieldSlot::I32(f) => set_int(f, cell),
        FieldSlot::I64(f) => set_int(f, cell),
        FieldSlot::Isize(f) => set_int(f, cell),
        FieldSlot::U8(f) => set_int(f, cell),
        FieldSlot::U16(f) => set_int(f, cell),
        FieldSlot::U32(f) => set_int(f, cell),
        FieldSlot::U64(f) => set_int(f, cell),
        FieldSlot::Usize(f) => set_int(f, cell),
    }
}

/// Integers are parsed straight into the field's width, so an out-of-range
/// value counts as a parse failure.
fn set_int<T: FromStr + Default>(field: &mut T, cell: &Value) {
    if cell.is_null() {
        *field = T::default();
        return;
    }
    if let Some(v) = parse_int(cell) {
        *field = v;
    }
}

fn parse_int<T: FromStr>(cell: &Value) -> Option<T> {
    match cell.as_bytes() {
        Some(raw) => std::str::from_utf8(raw).ok()?.parse().ok(),
        None => cell.to_string().parse().ok(),
    }
}

fn parse_f64(cell: &Value) -> Option<f64> {
    match cell {
        Value::Null => None,
        Value::Float(v) => Some(*v),
        Value::Int(v) => Some(*v as f64),
        Value::UInt(v) => Some(*v as f64),
        other => other.to_text().parse().ok(),
    }
}

/// Convert `cell` by the category `column` reports.
///
/// - time / raw bytes / nullable string: `DECIMAL` columns become floats,
///   everything else text (`""` for null)
/// - float categories: float, `0.0` for null or unparsable
/// - integer categories: integer, `0` for null or unparsable
/// - anything else: the cell's text (`""` for null), with a warning
pub fn coerce_generic(column: &ColumnMeta, cell: &Value) -> Value {
    match &column.category {
        ColumnCategory::Time | ColumnCategory::RawBytes | ColumnCategory::NullString => {
            if column.is_decimal() {
                Value::Float(parse_f64(cell).unwrap_or(0.0))
            } else {
                Value::String(cell.to_text().into_owned())
            }
        }
        ColumnCategory::Float | ColumnCategory::NullFloat => {
            Value::Float(parse_f64(cell).unwrap_or(0.0))
        }
        ColumnCategory::Int | ColumnCategory::NullInt | ColumnCategory::Unsigned => {
            if cell.is_null() {
                return Value::Int(0);
            }
            if let Some(v) = parse_int::<i64>(cell) {
                return Value::Int(v);
            }
            match parse_int::<u64>(cell) {
                Some(v) => Value::UInt(v),
                None => Value::Int(0),
            }
        }
        ColumnCategory::Other(kind) => {
            tracing::warn!(
                target: "dbkit.convert",
                column = %column.name,
                database_type = %column.database_type,
                category = %kind,
                "unhandled column category, falling back to text"
            );
            Value::String(cell.to_text().into_owned())
        }
    }
}
