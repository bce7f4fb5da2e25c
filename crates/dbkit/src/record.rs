//! Statically declared column bindings for structured records.

use crate::error::{OrmError, OrmResult};
use std::collections::HashMap;

/// Mutable view of one record field, tagged with its kind.
///
/// The coercion rule applied to a cell is chosen by the variant.
#[derive(Debug)]
pub enum FieldSlot<'a> {
    Bool(&'a mut bool),
    String(&'a mut String),
    F32(&'a mut f32),
    F64(&'a mut f64),
    Bytes(&'a mut Vec<u8>),
    I8(&'a mut i8),
    I16(&'a mut i16),
    I32(&'a mut i32),
    I64(&'a mut i64),
    Isize(&'a mut isize),
    U8(&'a mut u8),
    U16(&'a mut u16),
    U32(&'a mut u32),
    U64(&'a mut u64),
    Usize(&'a mut usize),
}

/// Field types that can receive a column value.
pub trait AsSlot {
    fn as_slot(&mut self) -> FieldSlot<'_>;
}

macro_rules! impl_as_slot {
    ($($t:ty => $variant:ident),* $(,)?) => {
        $(impl AsSlot for $t {
            fn as_slot(&mut self) -> FieldSlot<'_> {
                FieldSlot::$variant(self)
            }
        })*
    };
}

impl_as_slot! {
    bool => Bool,
    String => String,
    f32 => F32,
    f64 => F64,
    Vec<u8> => Bytes,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    isize => Isize,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    usize => Usize,
}

/// A structured record that rows can be materialized into.
///
/// `COLUMNS` lists the bound column names in field order; `field(i)` returns
/// the slot for `COLUMNS[i]`. Fields without a binding are simply not listed
/// and keep their `Default` value.
///
/// This trait should typically be derived with `#[derive(Record)]`:
///
/// ```ignore
/// use dbkit::Record;
///
/// #[derive(Debug, Default, Record)]
/// struct User {
///     id: i64,
///     #[orm(column = "user_name")]
///     name: String,
///     #[orm(skip)]
///     cached: bool,
/// }
/// ```
pub trait Record: Default {
    /// Bound column names, in field order.
    const COLUMNS: &'static [&'static str];

    /// Slot for the field bound to `COLUMNS[index]`.
    fn field(&mut self, index: usize) -> Option<FieldSlot<'_>>;
}

/// Column name -> field ordinal for one record type.
#[derive(Debug, Clone)]
pub struct FieldBindings {
    by_column: HashMap<&'static str, usize>,
}

impl FieldBindings {
    /// Build the binding map for `T`.
    ///
    /// Two fields bound to the same column is a configuration error.
    pub fn resolve<T: Record>() -> OrmResult<Self> {
        let mut by_column = HashMap::with_capacity(T::COLUMNS.len());
        for (index, column) in T::COLUMNS.iter().enumerate() {
            if by_column.insert(*column, index).is_some() {
                return Err(OrmError::DuplicateBinding {
                    record: std::any::type_name::<T>(),
                    column: (*column).to_string(),
                });
            }
        }
        Ok(Self { by_column })
    }

    /// Field ordinal bound to `column`.
    pub fn field_for(&self, column: &str) -> Option<usize> {
        self.by_column.get(column).copied()
    }

    /// For each result column, the field it feeds (if any).
    pub fn plan(&self, columns: &[&str]) -> Vec<Option<usize>> {
        columns.iter().map(|c| self.field_for(c)).collect()
    }

    pub fn len(&self) -> usize {
        self.by_column.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_column.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Pair {
        a: i32,
        b: String,
    }

    impl Record for Pair {
        const COLUMNS: &'static [&'static str] = &["a", "b"];

        fn field(&mut self, index: usize) -> Option<FieldSlot<'_>> {
            match index {
                0 => Some(self.a.as_slot()),
                1 => Some(self.b.as_slot()),
                _ => None,
            }
        }
    }

    #[derive(Default)]
    struct Clash {
        x: i32,
        y: i32,
    }

    impl Record for Clash {
        const COLUMNS: &'static [&'static str] = &["v", "v"];

        fn field(&mut self, index: usize) -> Option<FieldSlot<'_>> {
            match index {
                0 => Some(self.x.as_slot()),
                1 => Some(self.y.as_slot()),
                _ => None,
            }
        }
    }

    #[test]
    fn plan_skips_unknown_columns() {
        let bindings = FieldBindings::resolve::<Pair>().unwrap();
        assert_eq!(bindings.plan(&["b", "zzz", "a"]), vec![Some(1), None, Some(0)]);
    }

    #[test]
    fn duplicate_columns_are_rejected() {
        let err = FieldBindings::resolve::<Clash>().unwrap_err();
        assert!(matches!(err, OrmError::DuplicateBinding { ref column, .. } if column == "v"));
    }

    #[test]
    fn slots_point_at_fields() {
        let mut p = Pair::default();
        if let Some(FieldSlot::I32(a)) = p.field(0) {
            *a = 7;
        }
        assert_eq!(p.a, 7);
        assert!(p.field(2).is_none());
    }
}
