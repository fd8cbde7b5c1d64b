//! Mapper entry points and their one-shot builders
//!
//! [`DatabaseManager`] begins an operation for an entity type. The returned
//! builder collects clauses and is consumed by its terminal call, which opens
//! a connection, runs exactly one statement and releases the connection
//! before returning.

use crate::{
    database::{
        helper::DatabaseHelper,
        mappers::map_row,
        plan::ColumnPlan,
        query_builders::{
            build_delete, build_insert, build_select, build_update, ConditionSet, Join, JoinKind,
            SelectClauses,
        },
    },
    error::{FastroidError, Result},
    schema::{Entity, EntitySchema},
    value::Value,
};
use rusqlite::params_from_iter;
use std::fmt;
use std::marker::PhantomData;
use tracing::{debug, instrument};

/// Returned by [`WriteBuilder::execute`] when there was nothing to write
pub const NOTHING_STAGED: i64 = -1;

/// Begins mapper operations against one database
#[derive(Clone, Copy)]
pub struct DatabaseManager<'h> {
    helper: &'h dyn DatabaseHelper,
}

impl fmt::Debug for DatabaseManager<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseManager")
            .field("naming", &self.helper.naming())
            .field("value_binding", &self.helper.value_binding())
            .finish()
    }
}

impl<'h> DatabaseManager<'h> {
    #[must_use]
    pub fn new(helper: &'h dyn DatabaseHelper) -> Self {
        Self { helper }
    }

    /// Begin a SELECT of `E` with no conditions
    #[must_use]
    pub fn select<E: Entity>(&self) -> SelectBuilder<'h, E> {
        SelectBuilder::new(self.helper)
    }

    /// Begin an INSERT of `entity`
    ///
    /// Every column field is staged as a write value except an
    /// auto-incremented identity.
    ///
    /// # Errors
    /// Returns an error if the entity cannot report one of its field values
    pub fn insert<E: Entity>(&self, entity: &E) -> Result<WriteBuilder<'h>> {
        WriteBuilder::stage(self.helper, WriteKind::Insert, entity)
    }

    /// Begin an UPDATE of `entity`
    ///
    /// Identity fields become equality conditions and the remaining column
    /// fields become write values.
    ///
    /// # Errors
    /// Returns an error if the entity cannot report one of its field values
    pub fn update<E: Entity>(&self, entity: &E) -> Result<WriteBuilder<'h>> {
        WriteBuilder::stage(self.helper, WriteKind::Update, entity)
    }

    /// Begin a DELETE of `entity`, conditioned on its identity fields
    ///
    /// # Errors
    /// Returns an error if the entity cannot report one of its field values
    pub fn delete<E: Entity>(&self, entity: &E) -> Result<WriteBuilder<'h>> {
        WriteBuilder::stage(self.helper, WriteKind::Delete, entity)
    }
}

/// Builder for a SELECT returning entities of type `E`
pub struct SelectBuilder<'h, E> {
    helper: &'h dyn DatabaseHelper,
    schema: EntitySchema,
    joins: Vec<Join>,
    clauses: SelectClauses,
    _entity: PhantomData<fn() -> E>,
}

impl<E> fmt::Debug for SelectBuilder<'_, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectBuilder")
            .field("entity", &self.schema.name)
            .field("joins", &self.joins)
            .field("clauses", &self.clauses)
            .finish_non_exhaustive()
    }
}

impl<'h, E: Entity> SelectBuilder<'h, E> {
    fn new(helper: &'h dyn DatabaseHelper) -> Self {
        Self {
            helper,
            schema: E::schema(),
            joins: Vec::new(),
            clauses: SelectClauses::default(),
            _entity: PhantomData,
        }
    }

    /// Set the WHERE clause; `?` placeholders are bound to `args` in order
    #[must_use]
    pub fn where_clause(
        mut self,
        clause: impl Into<String>,
        args: impl IntoIterator<Item = Value>,
    ) -> Self {
        let binding = self.helper.value_binding();
        let args = args.into_iter().map(|v| v.bound(binding)).collect();
        self.clauses.where_clause = Some((clause.into(), args));
        self
    }

    #[must_use]
    pub fn order_by(mut self, clause: impl Into<String>) -> Self {
        self.clauses.order_by = Some(clause.into());
        self
    }

    #[must_use]
    pub fn group_by(mut self, clause: impl Into<String>) -> Self {
        self.clauses.group_by = Some(clause.into());
        self
    }

    /// Set the HAVING clause; only written when a GROUP BY is also set
    #[must_use]
    pub fn having(mut self, clause: impl Into<String>) -> Self {
        self.clauses.having = Some(clause.into());
        self
    }

    /// Left outer join the entity behind `relation`
    ///
    /// # Errors
    /// Returns `FastroidError::UnknownRelation` if `E` has no such relation,
    /// or `FastroidError::Mapping` if its join column cannot be resolved
    pub fn left_outer_join(self, relation: &str) -> Result<Self> {
        self.join(JoinKind::LeftOuter, relation, None, Vec::new())
    }

    /// Left outer join with an extra condition appended to the ON clause
    ///
    /// # Errors
    /// See [`SelectBuilder::left_outer_join`]
    pub fn left_outer_join_with(
        self,
        relation: &str,
        clause: impl Into<String>,
        args: impl IntoIterator<Item = Value>,
    ) -> Result<Self> {
        self.join(
            JoinKind::LeftOuter,
            relation,
            Some(clause.into()),
            args.into_iter().collect(),
        )
    }

    /// Inner join the entity behind `relation`
    ///
    /// # Errors
    /// See [`SelectBuilder::left_outer_join`]
    pub fn inner_join(self, relation: &str) -> Result<Self> {
        self.join(JoinKind::Inner, relation, None, Vec::new())
    }

    /// Inner join with an extra condition appended to the ON clause
    ///
    /// # Errors
    /// See [`SelectBuilder::left_outer_join`]
    pub fn inner_join_with(
        self,
        relation: &str,
        clause: impl Into<String>,
        args: impl IntoIterator<Item = Value>,
    ) -> Result<Self> {
        self.join(
            JoinKind::Inner,
            relation,
            Some(clause.into()),
            args.into_iter().collect(),
        )
    }

    fn join(
        mut self,
        kind: JoinKind,
        relation: &str,
        clause: Option<String>,
        args: Vec<Value>,
    ) -> Result<Self> {
        let def = self
            .schema
            .find_relation(relation)
            .ok_or_else(|| FastroidError::unknown_relation(self.schema.name, relation))?;
        let naming = self.helper.naming();
        let binding = self.helper.value_binding();
        let join_column = naming.apply(def.join_column()?);
        let target = (def.target)();

        debug!(
            "Registered {} on {} via {}",
            kind.as_sql(),
            target.name,
            join_column
        );

        self.joins.push(Join {
            kind,
            relation: def.field,
            table: target.table_name(naming),
            join_column,
            clause: clause.filter(|c| !c.is_empty()),
            args: args.into_iter().map(|v| v.bound(binding)).collect(),
        });
        Ok(self)
    }

    /// Run the query and hydrate one entity per row
    ///
    /// # Errors
    /// Returns an error if the statement fails or a row cannot be hydrated
    #[instrument(skip(self), fields(entity = self.schema.name))]
    pub fn execute_query(self) -> Result<Vec<E>> {
        let naming = self.helper.naming();
        let mut plan = ColumnPlan::new(&self.schema, naming)?;
        for join in &self.joins {
            let target = self
                .schema
                .find_relation(join.relation)
                .map(|def| (def.target)())
                .ok_or_else(|| FastroidError::unknown_relation(self.schema.name, join.relation))?;
            plan.push_join(join.relation, &target, naming)?;
        }

        let base_table = self.schema.table_name(naming);
        let statement = build_select(&base_table, &plan, &self.joins, &self.clauses);
        debug!(sql = %statement.sql, args = statement.args.len(), "Executing query");

        let conn = self.helper.readable()?;
        let mut stmt = conn.prepare(&statement.sql)?;
        let mut rows = stmt.query(params_from_iter(statement.args.iter()))?;

        let mut entities = Vec::new();
        while let Some(row) = rows.next()? {
            entities.push(map_row::<E>(&plan, row)?);
        }

        debug!("Fetched {} rows", entities.len());
        Ok(entities)
    }
}

/// Kind of a staged write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteKind {
    Insert,
    Update,
    Delete,
}

/// Builder for an INSERT, UPDATE or DELETE of one entity
pub struct WriteBuilder<'h> {
    helper: &'h dyn DatabaseHelper,
    kind: WriteKind,
    entity: &'static str,
    table: String,
    values: Vec<(String, Value)>,
    conditions: ConditionSet,
    where_override: Option<(String, Vec<Value>)>,
}

impl fmt::Debug for WriteBuilder<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WriteBuilder")
            .field("kind", &self.kind)
            .field("table", &self.table)
            .field("values", &self.values)
            .field("conditions", &self.conditions)
            .field("where_override", &self.where_override)
            .finish_non_exhaustive()
    }
}

impl<'h> WriteBuilder<'h> {
    fn stage<E: Entity>(helper: &'h dyn DatabaseHelper, kind: WriteKind, entity: &E) -> Result<Self> {
        let schema = E::schema();
        let naming = helper.naming();
        let binding = helper.value_binding();

        let mut values = Vec::new();
        let mut conditions = ConditionSet::new();
        for field in schema.column_fields() {
            let write = match kind {
                WriteKind::Insert if field.identity && field.auto_increment => continue,
                WriteKind::Insert => true,
                WriteKind::Update => !field.identity,
                WriteKind::Delete if field.identity => false,
                WriteKind::Delete => continue,
            };
            let column = naming.apply(field.name);
            let value = entity.value(field.name)?.bound(binding);
            if write {
                values.push((column, value));
            } else {
                conditions.push(column, value);
            }
        }

        Ok(Self {
            helper,
            kind,
            entity: schema.name,
            table: schema.table_name(naming),
            values,
            conditions,
            where_override: None,
        })
    }

    #[must_use]
    pub fn kind(&self) -> WriteKind {
        self.kind
    }

    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Write values in staging order
    #[must_use]
    pub fn staged_values(&self) -> &[(String, Value)] {
        &self.values
    }

    /// Equality conditions taken from the identity fields
    #[must_use]
    pub fn conditions(&self) -> &[(String, Value)] {
        self.conditions.as_slice()
    }

    /// Replace the identity conditions with an explicit WHERE clause
    #[must_use]
    pub fn where_clause(
        mut self,
        clause: impl Into<String>,
        args: impl IntoIterator<Item = Value>,
    ) -> Self {
        let binding = self.helper.value_binding();
        let args = args.into_iter().map(|v| v.bound(binding)).collect();
        self.where_override = Some((clause.into(), args));
        self
    }

    /// Drop staged write values that are null
    ///
    /// Turns an UPDATE into a partial update that leaves null fields alone.
    #[must_use]
    pub fn excludes_null(mut self) -> Self {
        self.values.retain(|(_, value)| !value.is_null());
        self
    }

    fn resolved_where(&self) -> Option<(String, Vec<Value>)> {
        self.where_override
            .clone()
            .filter(|(clause, _)| !clause.is_empty())
            .or_else(|| self.conditions.to_clause())
    }

    /// Run the statement
    ///
    /// Returns the new row id for an INSERT and the number of affected rows
    /// for an UPDATE or DELETE. Returns [`NOTHING_STAGED`] without touching
    /// the database when an INSERT or UPDATE has no write values.
    ///
    /// # Errors
    /// Returns `FastroidError::Mapping` for a DELETE without any condition,
    /// and a database error if the statement fails
    #[instrument(skip(self), fields(table = %self.table, kind = ?self.kind))]
    pub fn execute(self) -> Result<i64> {
        let where_clause = self.resolved_where();

        let (sql, args) = match self.kind {
            WriteKind::Insert | WriteKind::Update if self.values.is_empty() => {
                debug!("Nothing staged, skipping write");
                return Ok(NOTHING_STAGED);
            }
            WriteKind::Insert => (
                build_insert(&self.table, &self.values),
                self.values.iter().map(|(_, v)| v.clone()).collect::<Vec<_>>(),
            ),
            WriteKind::Update => {
                let mut args: Vec<Value> = self.values.iter().map(|(_, v)| v.clone()).collect();
                let clause = where_clause.map(|(clause, where_args)| {
                    args.extend(where_args);
                    clause
                });
                (
                    build_update(&self.table, &self.values, clause.as_deref()),
                    args,
                )
            }
            WriteKind::Delete => {
                let (clause, args) = where_clause.ok_or_else(|| {
                    FastroidError::mapping(self.entity, "refusing to delete without conditions")
                })?;
                (build_delete(&self.table, &clause), args)
            }
        };

        debug!(sql = %sql, args = args.len(), "Executing write");

        let conn = self.helper.writable()?;
        let changed = conn.execute(&sql, params_from_iter(args.iter()))?;

        let result = match self.kind {
            WriteKind::Insert => conn.last_insert_rowid(),
            WriteKind::Update | WriteKind::Delete => i64::try_from(changed)
                .map_err(|_| FastroidError::unknown("affected row count out of range"))?,
        };
        debug!("Write returned {}", result);
        Ok(result)
    }
}
