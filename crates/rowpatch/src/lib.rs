//! # rowpatch
//!
//! Single-row UPDATE statements built from typed predicates.
//!
//! ## Features
//!
//! - **Parameterized**: every value is a bound parameter, nothing is spliced into SQL
//! - **Declaration order**: SET columns and WHERE/AND/OR predicates render in the order declared
//! - **Column mapping**: logical property names map to physical columns, derived or explicit
//! - **Blocking and async**: one request type, `commit` or `commit_async`
//! - **Tracing**: SQL logged on the `rowpatch.sql` target (feature `tracing`)
//!
//! ## Example
//!
//! ```ignore
//! use rowpatch::prelude::*;
//!
//! #[derive(Entity)]
//! #[orm(table = "people")]
//! struct Person {
//!     #[orm(id)]
//!     id: i64,
//!     name: String,
//!     age: i32,
//! }
//!
//! let mut conn = PgConnection::connect_url("postgres://app@localhost/shop")?;
//! let mut q = rowpatch::update(Some(&person));
//! q.add_columns([Person::COL_NAME, Person::COL_AGE])?
//!     .use_entity_identity()?
//!     .where_(col(Person::COL_ID).eq(person.id))?;
//! let rows = q.commit_async(&mut conn).await?;
//! ```

pub mod assemble;
pub mod client;
pub mod condition;
pub mod config;
pub mod entity;
pub mod error;
pub mod expr;
pub mod extract;
pub mod ident;
mod log;
pub mod mapping;
pub mod prelude;
pub mod update;
pub mod value;

pub use assemble::UpdateStatement;
pub use client::{AsyncConnection, BlockingPgConnection, Connection, PgConnection};
pub use condition::{BoundParam, Condition, Joiner, Op, ParamList};
pub use config::{DEFAULT_COMMAND_TIMEOUT_SECS, Dialect, UpdateConfig};
pub use entity::Entity;
pub use error::{PatchError, PatchResult};
pub use expr::{Column, CompareOp, Expr, col};
pub use extract::Predicates;
pub use ident::{Ident, IntoIdent, QualifiedTable};
pub use mapping::ColumnMapping;
pub use update::{UpdateQuery, update};
pub use value::Value;

#[cfg(feature = "derive")]
pub use rowpatch_derive::Entity;

// Re-export tokio-postgres so callers can build a `Config` without a direct dependency.
pub use tokio_postgres;
