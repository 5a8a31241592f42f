//! UPDATE statement assembly.
//!
//! Produces `UPDATE <db>.<schema>.<table> SET ... [WHERE ...]` plus the
//! parameters in placeholder order: SET values first, then WHERE values in
//! declaration order.

use crate::condition::{BoundParam, ParamList};
use crate::config::Dialect;
use crate::entity::Entity;
use crate::error::{PatchError, PatchResult};
use crate::extract::{Predicates, param_base};
use crate::ident::{Ident, QualifiedTable};
use crate::mapping::ColumnMapping;
use std::fmt::Write;
use tokio_postgres::types::ToSql;

/// A fully assembled UPDATE ready to execute.
#[derive(Debug, Clone)]
pub struct UpdateStatement {
    sql: String,
    params: Vec<BoundParam>,
    has_where: bool,
}

impl UpdateStatement {
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Parameters in placeholder order.
    pub fn params(&self) -> &[BoundParam] {
        &self.params
    }

    /// Parameter references for tokio-postgres.
    pub fn params_ref(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.params
            .iter()
            .map(|p| &p.value as &(dyn ToSql + Sync))
            .collect()
    }

    /// `false` when the statement updates every row of the table.
    pub fn has_where(&self) -> bool {
        self.has_where
    }
}

/// Everything the assembler reads. Conditions must already be mapped.
pub struct AssembleInput<'a, E: ?Sized> {
    pub table: &'a QualifiedTable,
    pub columns: &'a [String],
    pub identity: Option<&'a str>,
    pub mapping: &'a ColumnMapping,
    pub predicates: &'a Predicates,
    pub entity: &'a E,
    pub dialect: Dialect,
}

struct Placeholders {
    dialect: Dialect,
    next: usize,
}

impl Placeholders {
    fn write(&mut self, out: &mut String, name: &str) {
        self.next += 1;
        // Writing into a String cannot fail.
        let _ = match self.dialect {
            Dialect::Postgres => write!(out, "${}", self.next),
            Dialect::SqlServer => write!(out, "@{name}"),
        };
    }
}

/// Columns that end up in the SET clause, in insertion order.
pub fn set_columns<'a>(columns: &'a [String], identity: Option<&str>) -> Vec<&'a str> {
    columns
        .iter()
        .map(String::as_str)
        .filter(|c| Some(*c) != identity)
        .collect()
}

pub fn assemble<E: Entity + ?Sized>(input: AssembleInput<'_, E>) -> PatchResult<UpdateStatement> {
    let set = set_columns(input.columns, input.identity);
    if set.is_empty() {
        return Err(PatchError::EmptyColumnSet);
    }

    let mut sql = String::with_capacity(64 + 24 * (set.len() + input.predicates.len()));
    let mut set_params = ParamList::new();
    let mut suffix = 0u32;
    let mut placeholders = Placeholders {
        dialect: input.dialect,
        next: 0,
    };

    sql.push_str("UPDATE ");
    sql.push_str(&input.table.to_sql());
    sql.push_str(" SET ");

    for (i, property) in set.into_iter().enumerate() {
        Ident::parse(property)?;
        let column = Ident::parse(input.mapping.resolve(property))?;
        let base = param_base(property);
        let taken = |n: &str| set_params.contains(n) || input.predicates.params().contains(n);
        let mut name = base.clone();
        while taken(&name) {
            suffix += 1;
            name = format!("{base}_{suffix}");
        }
        let value = input
            .entity
            .column_value(property)
            .ok_or_else(|| PatchError::MissingValue(property.to_string()))?;

        if i > 0 {
            sql.push_str(", ");
        }
        column.write_sql(&mut sql);
        sql.push_str(" = ");
        placeholders.write(&mut sql, &name);
        set_params.push(name, value)?;
    }

    let mut params: Vec<BoundParam> = set_params.iter().cloned().collect();
    params.reserve(input.predicates.params().len());

    let conditions = input.predicates.ordered();
    for (i, condition) in conditions.iter().enumerate() {
        if i == 0 {
            sql.push_str(" WHERE ");
        } else {
            sql.push(' ');
            sql.push_str(condition.joiner().keyword());
            sql.push(' ');
        }
        Ident::parse(condition.column())?.write_sql(&mut sql);
        sql.push(' ');
        sql.push_str(condition.op().as_sql());

        if let Some(name) = condition.param_name() {
            let bound = input
                .predicates
                .params()
                .get(name)
                .ok_or_else(|| PatchError::Other(format!("unbound parameter @{name}")))?;
            sql.push(' ');
            placeholders.write(&mut sql, name);
            params.push(bound.clone());
        }
    }

    Ok(UpdateStatement {
        sql,
        params,
        has_where: !conditions.is_empty(),
    })
}
