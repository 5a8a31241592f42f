//! SQL identifier handling.
//!
//! Table, schema and column names flow into generated SQL as text, so every
//! name is parsed into an [`Ident`] first:
//!
//! - Unquoted names are validated against `[A-Za-z_][A-Za-z0-9_$]*`
//! - Quoted names (`"Book Title"`) allow any characters except NUL and escape `"` as `""`
//!
//! Qualification (`db.schema.table`) is built from separate idents by
//! [`QualifiedTable`], so a single ident never contains a dot.

use crate::error::{PatchError, PatchResult};
use std::fmt;

/// A single SQL identifier (database, schema, table or column).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Ident {
    /// Unquoted identifier: must match `[A-Za-z_][A-Za-z0-9_$]*`.
    Unquoted(String),
    /// Quoted identifier: allows any characters except NUL.
    Quoted(String),
}

impl Ident {
    /// Parse a caller-supplied name.
    ///
    /// - `users` stays unquoted
    /// - `"User Table"` is kept quoted, with `""` unescaped to `"`
    pub fn parse(s: &str) -> PatchResult<Self> {
        if s.is_empty() {
            return Err(PatchError::validation("Identifier cannot be empty"));
        }
        if s.contains('\0') {
            return Err(PatchError::validation(
                "Identifier cannot contain NUL character",
            ));
        }

        if let Some(inner) = s.strip_prefix('"') {
            let mut name = String::with_capacity(inner.len());
            let mut chars = inner.chars().peekable();
            loop {
                match chars.next() {
                    Some('"') => {
                        if chars.peek() == Some(&'"') {
                            chars.next();
                            name.push('"');
                        } else {
                            break;
                        }
                    }
                    Some(c) => name.push(c),
                    None => return Err(PatchError::validation("Unclosed quoted identifier")),
                }
            }
            if chars.next().is_some() {
                return Err(PatchError::validation(format!(
                    "Unexpected text after quoted identifier: {s}"
                )));
            }
            return Self::quoted(&name);
        }

        let mut chars = s.chars();
        match chars.next() {
            Some(c) if c == '_' || c.is_ascii_alphabetic() => {}
            Some(c) => {
                return Err(PatchError::validation(format!(
                    "Invalid identifier start character: '{c}'"
                )));
            }
            None => unreachable!("checked non-empty above"),
        }
        if let Some(c) = chars.find(|&c| !(c == '_' || c == '$' || c.is_ascii_alphanumeric())) {
            return Err(PatchError::validation(format!(
                "Invalid character in identifier '{s}': '{c}'"
            )));
        }

        Ok(Self::Unquoted(s.to_string()))
    }

    /// Create a quoted identifier.
    pub fn quoted(name: &str) -> PatchResult<Self> {
        if name.is_empty() {
            return Err(PatchError::validation("Empty quoted identifier"));
        }
        if name.contains('\0') {
            return Err(PatchError::validation(
                "Identifier cannot contain NUL character",
            ));
        }
        Ok(Self::Quoted(name.to_string()))
    }

    /// Use `name` verbatim when it is a plain identifier, quote it otherwise.
    ///
    /// Meant for names reported by the server (the current database), which
    /// are not under the caller's control.
    pub fn quote_if_needed(name: &str) -> PatchResult<Self> {
        match Self::parse(name) {
            Ok(Self::Unquoted(s)) => Ok(Self::Unquoted(s)),
            _ => Self::quoted(name),
        }
    }

    /// The bare name, without quotes or escapes.
    pub fn name(&self) -> &str {
        match self {
            Self::Unquoted(s) | Self::Quoted(s) => s,
        }
    }

    pub(crate) fn write_sql(&self, out: &mut String) {
        match self {
            Self::Unquoted(s) => out.push_str(s),
            Self::Quoted(s) => {
                out.push('"');
                for ch in s.chars() {
                    if ch == '"' {
                        out.push('"');
                        out.push('"');
                    } else {
                        out.push(ch);
                    }
                }
                out.push('"');
            }
        }
    }

    /// Render the identifier as SQL.
    pub fn to_sql(&self) -> String {
        let mut out = String::with_capacity(self.name().len() + 2);
        self.write_sql(&mut out);
        out
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_sql())
    }
}

/// Convert an input into an [`Ident`].
pub trait IntoIdent {
    fn into_ident(self) -> PatchResult<Ident>;
}

impl IntoIdent for Ident {
    fn into_ident(self) -> PatchResult<Ident> {
        Ok(self)
    }
}

impl IntoIdent for &Ident {
    fn into_ident(self) -> PatchResult<Ident> {
        Ok(self.clone())
    }
}

impl IntoIdent for &str {
    fn into_ident(self) -> PatchResult<Ident> {
        Ident::parse(self)
    }
}

impl IntoIdent for String {
    fn into_ident(self) -> PatchResult<Ident> {
        Ident::parse(&self)
    }
}

/// `<database>.<schema>.<table>`, always fully qualified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualifiedTable {
    pub database: Ident,
    pub schema: Ident,
    pub table: Ident,
}

impl QualifiedTable {
    pub fn new(
        database: impl IntoIdent,
        schema: impl IntoIdent,
        table: impl IntoIdent,
    ) -> PatchResult<Self> {
        Ok(Self {
            database: database.into_ident()?,
            schema: schema.into_ident()?,
            table: table.into_ident()?,
        })
    }

    pub fn to_sql(&self) -> String {
        let mut out = String::new();
        self.database.write_sql(&mut out);
        out.push('.');
        self.schema.write_sql(&mut out);
        out.push('.');
        self.table.write_sql(&mut out);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ident_simple() {
        let ident = Ident::parse("users").unwrap();
        assert_eq!(ident.to_sql(), "users");
    }

    #[test]
    fn ident_quoted() {
        let ident = Ident::parse(r#""Book Title""#).unwrap();
        assert_eq!(ident.name(), "Book Title");
        assert_eq!(ident.to_sql(), r#""Book Title""#);
    }

    #[test]
    fn ident_quoted_with_escape() {
        let ident = Ident::parse(r#""has""quote""#).unwrap();
        assert_eq!(ident.name(), r#"has"quote"#);
        assert_eq!(ident.to_sql(), r#""has""quote""#);
    }

    #[test]
    fn ident_with_dollar() {
        let ident = Ident::parse("my_var$1").unwrap();
        assert_eq!(ident.to_sql(), "my_var$1");
    }

    #[test]
    fn ident_rejects_bad_input() {
        assert!(Ident::parse("").is_err());
        assert!(Ident::parse("1table").is_err());
        assert!(Ident::parse("my table").is_err());
        assert!(Ident::parse("schema.table").is_err());
        assert!(Ident::parse("name; DROP TABLE x").is_err());
        assert!(Ident::parse(r#""unclosed"#).is_err());
        assert!(Ident::parse(r#""a"b"#).is_err());
    }

    #[test]
    fn quote_if_needed_only_quotes_unusual_names() {
        assert_eq!(Ident::quote_if_needed("app").unwrap().to_sql(), "app");
        assert_eq!(
            Ident::quote_if_needed("app-db").unwrap().to_sql(),
            r#""app-db""#
        );
    }

    #[test]
    fn qualified_table() {
        let t = QualifiedTable {
            database: Ident::parse("db").unwrap(),
            schema: Ident::parse("dbo").unwrap(),
            table: Ident::parse(r#""Order Lines""#).unwrap(),
        };
        assert_eq!(t.to_sql(), r#"db.dbo."Order Lines""#);
    }
}
