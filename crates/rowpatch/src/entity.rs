//! The row source of an UPDATE.

use crate::value::Value;

/// A type whose instances supply SET-clause values.
///
/// Usually derived:
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
/// }
/// ```
pub trait Entity {
    /// Default table name.
    const TABLE: &'static str;
    /// Default schema, if declared.
    const SCHEMA: Option<&'static str> = None;
    /// Property marked `#[orm(id)]`, if any.
    const IDENTITY: Option<&'static str> = None;
    /// Logical property names, in declaration order.
    const COLUMNS: &'static [&'static str];
    /// Property → physical column pairs declared on the type.
    const COLUMN_MAPPINGS: &'static [(&'static str, &'static str)] = &[];

    /// Current value of the logical property `column`.
    fn column_value(&self, column: &str) -> Option<Value>;
}
