//! Common imports.
//!
//! ```ignore
//! use rowpatch::prelude::*;
//! ```

pub use crate::{
    AsyncConnection, BlockingPgConnection, ColumnMapping, Connection, Dialect, Entity, Expr,
    PatchError, PatchResult, PgConnection, UpdateConfig, UpdateQuery, Value, col, update,
};
