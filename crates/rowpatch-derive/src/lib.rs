//! Derive macros for rowpatch
//!
//! Provides `#[derive(Entity)]`.

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod entity;

/// Derive the `Entity` trait for a struct.
///
/// # Example
///
/// ```ignore
/// use rowpatch::Entity;
///
/// #[derive(Entity)]
/// #[orm(table = "books", schema = "library")]
/// struct Book {
///     #[orm(id)]
///     id: i64,
///     #[orm(column = "book_title")]
///     title: String,
///     price: f64,
///     #[orm(skip)]
///     cached_summary: String,
/// }
/// ```
///
/// # Attributes
///
/// - `#[orm(table = "name")]` - Table name (defaults to the snake_case struct name)
/// - `#[orm(schema = "name")]` - Schema name
/// - `#[orm(id)]` - Identity column, exposed as `Entity::IDENTITY`
/// - `#[orm(column = "name")]` - Map the field to a different physical column
/// - `#[orm(skip)]` - Leave the field out of `COLUMNS`
///
/// # Generated
///
/// - `impl rowpatch::Entity` with `TABLE`, `SCHEMA`, `IDENTITY`, `COLUMNS`,
///   `COLUMN_MAPPINGS` and `column_value`
/// - `COL_<FIELD>: &'static str` constants holding each logical column name
#[proc_macro_derive(Entity, attributes(orm))]
pub fn derive_entity(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    entity::expand(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
