//! Ordered column plan shared by SELECT assembly and row hydration
//!
//! The projection list of a SELECT and the order in which a row's columns are
//! read back must match exactly. Both are produced from the same
//! [`ColumnPlan`], so a column can only be read by the field it was projected
//! for.

use crate::{
    error::{FastroidError, Result},
    schema::{EntitySchema, FieldType, NamingStrategy},
};

/// One projected column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedColumn {
    pub field: &'static str,
    pub field_type: FieldType,
    pub column: String,
}

/// Entity a segment of the projection is hydrated into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentTarget {
    /// The entity the query was started for
    Base,
    /// The entity reached through the named relation of the base entity
    Relation(&'static str),
}

/// Columns of one table in projection order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub table: String,
    pub target: SegmentTarget,
    pub columns: Vec<PlannedColumn>,
}

impl Segment {
    fn for_schema(schema: &EntitySchema, naming: NamingStrategy, target: SegmentTarget) -> Result<Self> {
        let columns: Vec<PlannedColumn> = schema
            .column_fields()
            .into_iter()
            .map(|f| PlannedColumn {
                field: f.name,
                field_type: f.field_type,
                column: naming.apply(f.name),
            })
            .collect();

        if columns.is_empty() {
            return Err(FastroidError::mapping(schema.name, "no column fields"));
        }

        Ok(Self {
            table: schema.table_name(naming),
            target,
            columns,
        })
    }
}

/// The projection of a query, base table first, then joined tables in
/// registration order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnPlan {
    segments: Vec<Segment>,
}

impl ColumnPlan {
    /// Start a plan with the column fields of the base entity
    ///
    /// # Errors
    /// Returns `FastroidError::Mapping` if the entity has no column fields
    pub fn new(schema: &EntitySchema, naming: NamingStrategy) -> Result<Self> {
        Ok(Self {
            segments: vec![Segment::for_schema(schema, naming, SegmentTarget::Base)?],
        })
    }

    /// Append the columns of a joined entity
    ///
    /// # Errors
    /// Returns `FastroidError::Mapping` if the entity has no column fields
    pub fn push_join(
        &mut self,
        relation: &'static str,
        schema: &EntitySchema,
        naming: NamingStrategy,
    ) -> Result<()> {
        self.segments.push(Segment::for_schema(
            schema,
            naming,
            SegmentTarget::Relation(relation),
        )?);
        Ok(())
    }

    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Table-qualified column list, e.g. `EMPLOYEE.NAME, DEPARTMENT.NAME`
    #[must_use]
    pub fn projection(&self) -> String {
        self.segments
            .iter()
            .flat_map(|s| s.columns.iter().map(move |c| format!("{}.{}", s.table, c.column)))
            .collect::<Vec<_>>()
            .join(", ")
    }
}
