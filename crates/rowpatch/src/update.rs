//! The UPDATE request: column set, identity, predicates, execution.

use crate::assemble::{AssembleInput, UpdateStatement, assemble, set_columns};
use crate::client::{AsyncConnection, Connection};
use crate::condition::Joiner;
use crate::config::{Dialect, UpdateConfig};
use crate::entity::Entity;
use crate::error::{PatchError, PatchResult};
use crate::expr::Expr;
use crate::extract::Predicates;
use crate::ident::{Ident, QualifiedTable};
use crate::log;
use crate::mapping::ColumnMapping;


/// Start an UPDATE for `entity`.
///
/// Shorthand for [`UpdateQuery::new`].
pub fn update<E: Entity>(entity: Option<&E>) -> UpdateQuery<'_, E> {
    UpdateQuery::new(entity)
}

/// A single UPDATE statement under construction.
///
/// Columns are written in the order they were added; predicates render in the
/// order they were declared, regardless of whether they came from
/// [`where_`](Self::where_), [`and`](Self::and) or [`or`](Self::or).
///
/// # Unrestricted updates
///
/// A query with no predicates renders without a WHERE clause and updates
/// every row of the table. This is not an error; a warning is logged on the
/// `rowpatch.sql` target when such a statement is committed.
///
/// ```ignore
/// let mut q = rowpatch::update(Some(&person));
/// q.add_columns(["Name", "Age"])?
///     .set_identity_column("Id")?
///     .where_(col("Id").eq(person.id))?;
/// let rows = q.commit_async(&mut conn).await?;
/// ```
pub struct UpdateQuery<'a, E> {
    entity: Option<&'a E>,
    table: String,
    schema: Option<String>,
    columns: Vec<String>,
    mapping: ColumnMapping,
    identity: Option<String>,
    predicates: Predicates,
    config: UpdateConfig,
}

impl<'a, E: Entity> UpdateQuery<'a, E> {
    /// A query targeting `E::TABLE` with `E`'s declared column mappings.
    pub fn new(entity: Option<&'a E>) -> Self {
        let mut mapping = ColumnMapping::new();
        for (property, column) in E::COLUMN_MAPPINGS {
            mapping.insert_default(property, column);
        }
        Self {
            entity,
            table: E::TABLE.to_string(),
            schema: E::SCHEMA.map(str::to_string),
            columns: Vec::new(),
            mapping,
            identity: None,
            predicates: Predicates::new(),
            config: UpdateConfig::default(),
        }
    }

    /// Override the target table.
    pub fn table(&mut self, table: impl Into<String>) -> PatchResult<&mut Self> {
        let table = table.into();
        Ident::parse(&table)?;
        self.table = table;
        Ok(self)
    }

    /// Override the schema. Without one the dialect's default is used.
    pub fn schema(&mut self, schema: impl Into<String>) -> PatchResult<&mut Self> {
        let schema = schema.into();
        Ident::parse(&schema)?;
        self.schema = Some(schema);
        Ok(self)
    }

    /// Add a column to the SET clause. Repeats are ignored.
    ///
    /// Fails if the name is not a valid identifier, if the entity cannot
    /// supply a value for it, or if the SET clause would hold nothing but
    /// the identity column.
    pub fn add_column(&mut self, column: impl Into<String>) -> PatchResult<&mut Self> {
        self.add_columns([column])
    }

    /// Add several columns. Either all of them are added or none are.
    pub fn add_columns<I, S>(&mut self, columns: I) -> PatchResult<&mut Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut staged = self.columns.clone();
        for column in columns {
            let column = column.into();
            if staged.contains(&column) {
                continue;
            }
            self.check_column(&column)?;
            staged.push(column);
        }
        if !staged.is_empty() && set_columns(&staged, self.identity.as_deref()).is_empty() {
            return Err(PatchError::EmptyColumnSet);
        }
        self.columns = staged;
        Ok(self)
    }

    /// Add every column declared by `E`.
    pub fn add_all_columns(&mut self) -> PatchResult<&mut Self> {
        self.add_columns(E::COLUMNS.iter().copied())
    }

    /// Merge caller mappings over the ones `E` declares.
    pub fn with_column_mapping(&mut self, mapping: ColumnMapping) -> PatchResult<&mut Self> {
        for (property, column) in mapping.iter() {
            Ident::parse(property)?;
            Ident::parse(column)?;
        }
        self.mapping.merge(mapping);
        Ok(self)
    }

    pub fn map_column(
        &mut self,
        property: impl Into<String>,
        column: impl Into<String>,
    ) -> PatchResult<&mut Self> {
        let (property, column) = (property.into(), column.into());
        Ident::parse(&property)?;
        Ident::parse(&column)?;
        self.mapping.insert(property, column);
        Ok(self)
    }

    pub fn with_config(&mut self, config: UpdateConfig) -> &mut Self {
        self.config = config;
        self
    }

    /// Command timeout in seconds; `0` waits indefinitely.
    pub fn with_timeout_secs(&mut self, secs: u64) -> &mut Self {
        self.config = self.config.clone().timeout_secs(secs);
        self
    }

    pub fn dialect(&mut self, dialect: Dialect) -> &mut Self {
        self.config.dialect = dialect;
        self
    }

    /// Designate the key column. It is kept out of the SET clause.
    ///
    /// Only one identity column may be set; a second call fails and leaves
    /// the first in place.
    pub fn set_identity_column(&mut self, column: impl Into<String>) -> PatchResult<&mut Self> {
        let column = column.into();
        if let Some(existing) = &self.identity {
            return Err(PatchError::DuplicateIdentity {
                existing: existing.clone(),
                attempted: column,
            });
        }
        Ident::parse(&column)?;
        if !self.columns.is_empty() && set_columns(&self.columns, Some(&column)).is_empty() {
            return Err(PatchError::EmptyColumnSet);
        }
        self.identity = Some(column);
        Ok(self)
    }

    /// Use `E::IDENTITY` as the identity column, if the type declares one.
    pub fn use_entity_identity(&mut self) -> PatchResult<&mut Self> {
        match E::IDENTITY {
            Some(identity) => self.set_identity_column(identity),
            None => Ok(self),
        }
    }

    /// Add a predicate. It starts the WHERE clause if it renders first.
    pub fn where_(&mut self, expr: Expr) -> PatchResult<&mut Self> {
        self.predicates.add(expr, Joiner::Where)?;
        Ok(self)
    }

    /// Add a predicate joined with `AND`.
    pub fn and(&mut self, expr: Expr) -> PatchResult<&mut Self> {
        self.predicates.add(expr, Joiner::And)?;
        Ok(self)
    }

    /// Add a predicate joined with `OR`.
    pub fn or(&mut self, expr: Expr) -> PatchResult<&mut Self> {
        self.predicates.add(expr, Joiner::Or)?;
        Ok(self)
    }

    fn check_column(&self, column: &str) -> PatchResult<()> {
        Ident::parse(column)?;
        Ident::parse(self.mapping.resolve(column))?;
        let known = match self.entity {
            Some(entity) => entity.column_value(column).is_some(),
            None => E::COLUMNS.contains(&column),
        };
        if known {
            Ok(())
        } else {
            Err(PatchError::MissingValue(column.to_string()))
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn identity_column(&self) -> Option<&str> {
        self.identity.as_deref()
    }

    pub fn predicates(&self) -> &Predicates {
        &self.predicates
    }

    pub fn config(&self) -> &UpdateConfig {
        &self.config
    }

    /// Render the statement against `database` without executing it.
    pub fn build(&self, database: &str) -> PatchResult<UpdateStatement> {
        let entity = self
            .entity
            .ok_or_else(|| PatchError::validation("no entity to read column values from"))?;

        let mut predicates = self.predicates.clone();
        for joiner in [Joiner::Where, Joiner::And, Joiner::Or] {
            self.mapping.apply(predicates.group_mut(joiner));
        }

        let dialect = self.config.dialect;
        let schema = self.schema.as_deref().unwrap_or(dialect.default_schema());
        let table =
            QualifiedTable::new(Ident::quote_if_needed(database)?, schema, self.table.as_str())?;

        assemble(AssembleInput {
            table: &table,
            columns: &self.columns,
            identity: self.identity.as_deref(),
            mapping: &self.mapping,
            predicates: &predicates,
            entity,
            dialect,
        })
    }

    /// Execute on a blocking connection, opening it first if needed.
    ///
    /// Returns the number of rows affected. With no entity this returns `0`
    /// without touching the connection.
    pub fn commit<C: Connection>(self, conn: &mut C) -> PatchResult<u64> {
        let Some(statement) = self.prepare(conn.database())? else {
            return Ok(0);
        };
        if !conn.is_open() {
            conn.open()?;
        }
        conn.execute(
            statement.sql(),
            &statement.params_ref(),
            self.config.command_timeout,
        )
    }

    /// Execute on an async connection, opening it first if needed.
    pub async fn commit_async<C: AsyncConnection>(self, conn: &mut C) -> PatchResult<u64> {
        let Some(statement) = self.prepare(conn.database())? else {
            return Ok(0);
        };
        if !conn.is_open() {
            conn.open().await?;
        }
        conn.execute(
            statement.sql(),
            &statement.params_ref(),
            self.config.command_timeout,
        )
        .await
    }

    fn prepare(&self, database: &str) -> PatchResult<Option<UpdateStatement>> {
        if self.entity.is_none() {
            log::absent_entity(&self.table);
            return Ok(None);
        }
        let statement = self.build(database)?;
        if !statement.has_where() {
            log::unrestricted(statement.sql());
        }
        log::statement(
            statement.sql(),
            statement.params().len(),
            self.config.command_timeout,
        );
        Ok(Some(statement))
    }
}
