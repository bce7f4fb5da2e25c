//! Derive macros for dbkit
//!
//! Provides `#[derive(Record)]`.

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod record;

/// Derive the `Record` trait for a struct.
///
/// # Example
///
/// ```ignore
/// use dbkit::Record;
///
/// #[derive(Default, Record)]
/// struct User {
///     id: i64,
///     #[orm(column = "user_name")]
///     name: String,
///     #[orm(skip)]
///     loaded_at: Option<std::time::Instant>,
/// }
/// ```
///
/// # Attributes
///
/// - `#[orm(column = "name")]` - Bind the field to a different column name
/// - `#[orm(skip)]` - Leave the field unbound; it keeps its `Default` value
///
/// Every bound field must implement `dbkit::record::AsSlot`. Binding two
/// fields to the same column is a compile error.
#[proc_macro_derive(Record, attributes(orm))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    record::expand(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
