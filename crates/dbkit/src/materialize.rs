//! Row set -> records / maps.

use crate::client::RowSet;
use crate::coerce::{coerce_generic, coerce_into};
use crate::error::{OrmError, OrmResult};
use crate::record::{FieldBindings, Record};
use crate::value::{Value, Values};
use serde::Serialize;
use std::collections::HashMap;

/// Materialize the first row of `set` into a `T`.
///
/// Returns [`OrmError::NotFound`] when the set is empty.
pub fn materialize_one<T: Record>(set: RowSet) -> OrmResult<T> {
    let bindings = FieldBindings::resolve::<T>()?;
    let names = set.column_names();
    let plan = bindings.plan(&names);
    let row = set
        .rows
        .first()
        .ok_or_else(|| OrmError::not_found("query returned no rows"))?;
    Ok(fill::<T>(&plan, row))
}

/// Materialize every row of `set`, preserving row order.
///
/// An empty set yields an empty vec.
pub fn materialize_all<T: Record>(set: RowSet) -> OrmResult<Vec<T>> {
    let bindings = FieldBindings::resolve::<T>()?;
    let plan = bindings.plan(&set.column_names());
    Ok(set.rows.iter().map(|row| fill::<T>(&plan, row)).collect())
}

fn fill<T: Record>(plan: &[Option<usize>], row: &[Value]) -> T {
    let mut record = T::default();
    for (field, cell) in plan.iter().zip(row) {
        let Some(index) = *field else { continue };
        if let Some(slot) = record.field(index) {
            coerce_into(slot, cell);
        }
    }
    record
}

/// Convert every row to a typed map, choosing coercions from column categories.
pub fn to_maps(set: RowSet) -> Vec<Values> {
    let RowSet { columns, rows } = set;
    rows.iter()
        .map(|row| {
            let mut map = Values::with_capacity(columns.len());
            for (column, cell) in columns.iter().zip(row) {
                map.add(column.name.as_str(), coerce_generic(column, cell));
            }
            map
        })
        .collect()
}

/// Convert the first row to a typed map.
///
/// Returns [`OrmError::NotFound`] when the set is empty.
pub fn to_map(mut set: RowSet) -> OrmResult<Values> {
    if set.rows.is_empty() {
        return Err(OrmError::not_found("query returned no rows"));
    }
    set.rows.truncate(1);
    Ok(to_maps(set).remove(0))
}

/// One row with every cell rendered as text (`NULL` as `""`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct OneRow(HashMap<String, String>);

impl OneRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the row has `field`.
    pub fn exist(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Text of `field`, or `""` when missing.
    pub fn get(&self, field: &str) -> &str {
        self.0.get(field).map(String::as_str).unwrap_or("")
    }

    /// `field` parsed as an integer; `0` when missing or unparsable.
    pub fn get_int(&self, field: &str) -> i32 {
        self.get(field).parse().unwrap_or(0)
    }

    /// `field` parsed as a 64-bit integer; `0` when missing or unparsable.
    pub fn get_i64(&self, field: &str) -> i64 {
        self.get(field).parse().unwrap_or(0)
    }

    /// `field` parsed as a float; `0.0` when missing or unparsable.
    pub fn get_f64(&self, field: &str) -> f64 {
        self.get(field).parse().unwrap_or(0.0)
    }

    pub fn set(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.0.insert(field.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl std::ops::Index<&str> for OneRow {
    type Output = str;

    fn index(&self, field: &str) -> &str {
        self.get(field)
    }
}

/// Convert every row to a text row.
pub fn to_string_rows(set: RowSet) -> Vec<OneRow> {
    let RowSet { columns, rows } = set;
    rows.into_iter()
        .map(|row| {
            let mut out = HashMap::with_capacity(columns.len());
            for (column, cell) in columns.iter().zip(row) {
                out.insert(column.name.clone(), cell.to_text().into_owned());
            }
            OneRow(out)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{ColumnCategory, ColumnMeta};
    use crate::record::{AsSlot, FieldSlot};

    #[derive(Debug, Default, PartialEq)]
    struct User {
        id: i64,
        name: String,
        score: f64,
        active: bool,
        avatar: Vec<u8>,
    }

    impl Record for User {
        const COLUMNS: &'static [&'static str] = &["id", "name", "score", "active", "avatar"];

        fn field(&mut self, index: usize) -> Option<FieldSlot<'_>> {
            match index {
                0 => Some(self.id.as_slot()),
                1 => Some(self.name.as_slot()),
                2 => Some(self.score.as_slot()),
                3 => Some(self.active.as_slot()),
                4 => Some(self.avatar.as_slot()),
                _ => None,
            }
        }
    }

    fn b(s: &str) -> Value {
        Value::Bytes(s.as_bytes().to_vec())
    }

    fn users_set() -> RowSet {
        let mut set = RowSet::new(vec![
            ColumnMeta::new("id", "BIGINT", ColumnCategory::Int),
            ColumnMeta::new("name", "VARCHAR", ColumnCategory::NullString),
            ColumnMeta::new("extra", "VARCHAR", ColumnCategory::RawBytes),
            ColumnMeta::new("score", "DECIMAL", ColumnCategory::RawBytes),
            ColumnMeta::new("active", "TINYINT", ColumnCategory::Int),
        ]);
        set.push_row(vec![b("1"), b("Tom"), b("x"), b("9.5"), b("1")]);
        set.push_row(vec![b("2"), Value::Null, Value::Null, Value::Null, b("false")]);
        set
    }

    #[test]
    fn one_record_from_first_row() {
        let user: User = materialize_one(users_set()).unwrap();
        assert_eq!(
            user,
            User {
                id: 1,
                name: "Tom".into(),
                score: 9.5,
                active: true,
                ..User::default()
            }
        );
    }

    #[test]
    fn one_record_on_empty_set_is_not_found() {
        let set = RowSet::new(users_set().columns);
        let err = materialize_one::<User>(set).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn all_records_keep_row_order() {
        let users: Vec<User> = materialize_all(users_set()).unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].id, 1);
        assert_eq!(users[1].id, 2);
        assert_eq!(users[1].name, "");
        assert_eq!(users[1].score, 0.0);
        assert!(!users[1].active);
    }

    #[test]
    fn all_records_on_empty_set_is_empty() {
        let set = RowSet::new(users_set().columns);
        let users: Vec<User> = materialize_all(set).unwrap();
        assert!(users.is_empty());
    }

    #[test]
    fn maps_use_column_categories() {
        let maps = to_maps(users_set());
        assert_eq!(maps[0].get("id"), Some(&Value::Int(1)));
        assert_eq!(maps[0].get("score"), Some(&Value::Float(9.5)));
        assert_eq!(maps[1].get("name"), Some(&Value::String(String::new())));
        assert_eq!(maps[1].get("score"), Some(&Value::Float(0.0)));
        assert_eq!(
            maps[0].keys().collect::<Vec<_>>(),
            vec!["id", "name", "extra", "score", "active"]
        );
    }

    #[test]
    fn single_map_on_empty_set_is_not_found() {
        let set = RowSet::new(users_set().columns);
        assert!(to_map(set).unwrap_err().is_not_found());
    }

    #[test]
    fn string_rows_render_null_as_empty() {
        let rows = to_string_rows(users_set());
        assert_eq!(rows[0].get("name"), "Tom");
        assert_eq!(rows[1].get("name"), "");
        assert!(rows[1].exist("name"));
        assert_eq!(rows[1].get_i64("id"), 2);
        assert_eq!(&rows[0]["score"], "9.5");
    }
}
