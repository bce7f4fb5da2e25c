//! # dbkit
//!
//! A small SQL toolkit: a statement builder for MySQL-style SQL, a literal
//! inliner, record materialization, typed map conversion and a
//! fire-and-forget statement queue.
//!
//! ## Features
//!
//! - **SQL explicit**: WHERE / GROUP BY / ORDER BY fragments are written verbatim
//! - **Positional arguments**: statements render with `?` placeholders and an ordered argument list
//! - **Safe defaults**: UPDATE and DELETE require a WHERE fragment unless marked unsafe
//! - **Record mapping**: rows map onto structs by column name via the `Record` trait
//! - **Driver agnostic**: anything implementing [`Connection`] can execute statements
//!
//! ## Statements
//!
//! ```ignore
//! use dbkit::{insert, select, values};
//!
//! let res = insert()
//!     .table("user")
//!     .values(values! { "name" => "Tom", "age" => 20 })
//!     .execute(&conn)
//!     .await;
//!
//! let users: Vec<User> = select("id,name")
//!     .from("user")
//!     .where_("age > ?")
//!     .bind(18)
//!     .fetch_all_as(&conn)
//!     .await?;
//! ```
//!
//! ## Inlining
//!
//! ```ignore
//! let sql = dbkit::inline("age > ? AND name = ?", &[18.into(), "Tom".into()])?;
//! assert_eq!(sql, "age > 18 AND name = 'Tom'");
//! ```

pub mod cache;
pub mod client;
pub mod coerce;
pub mod config;
pub mod dialect;
pub mod error;
pub mod inline;
pub mod materialize;
pub mod pg;
pub mod query;
pub mod queue;
pub mod record;
pub mod statement;
pub mod value;

pub mod prelude;

pub use cache::Cache;
pub use client::{ColumnCategory, ColumnMeta, Connection, ExecOutcome, RowSet};
pub use config::QueueConfig;
pub use dialect::Dialect;
pub use error::{OrmError, OrmResult};
pub use inline::{inline, inline_with};
pub use materialize::OneRow;
pub use query::{Query, query};
pub use queue::{QueueItem, SqlQueue};
pub use record::{FieldBindings, FieldSlot, Record};
pub use statement::{
    ExecResult, Rendered, Statement, StatementKind, delete, insert, insert_ignore,
    insert_or_update, select, select_all, update,
};
pub use value::{Value, Values};

#[cfg(feature = "derive")]
pub use dbkit_derive::Record;
