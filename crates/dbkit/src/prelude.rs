//! Convenient imports for typical `dbkit` usage.
//!
//! ```ignore
//! use dbkit::prelude::*;
//! ```

pub use crate::{
    Connection, Dialect, ExecResult, OneRow, OrmError, OrmResult, Query, Record, Statement, Value,
    Values, delete, insert, insert_ignore, insert_or_update, query, select, select_all, update,
    values,
};
