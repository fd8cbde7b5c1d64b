//! Row hydration
//!
//! Converts a result row into an entity by consuming columns in exactly the
//! order the [`ColumnPlan`] projected them.

use crate::{
    database::plan::{ColumnPlan, PlannedColumn, SegmentTarget},
    error::Result,
    schema::{Entity, Record},
    value::Value,
};
use rusqlite::Row;

/// Read the columns of one segment starting at `index` into `record`,
/// returning the index of the next unread column
fn read_segment(
    row: &Row<'_>,
    mut index: usize,
    columns: &[PlannedColumn],
    record: &mut dyn Record,
) -> Result<usize> {
    for column in columns {
        let raw = Value::from(row.get_ref(index)?);
        let value = column.field_type.coerce(column.field, raw)?;
        record.set_value(column.field, value)?;
        index += 1;
    }
    Ok(index)
}

/// Map a result row to a new entity
///
/// The base entity's columns are read first. Each joined segment then
/// prepares its relation slot (a new to-one instance, or a new element
/// appended to a to-many collection) and fills it from the following columns.
///
/// # Errors
/// Returns an error if a column is missing, a value does not convert to its
/// declared field type, or a relation is unknown to the entity
pub fn map_row<E: Entity>(plan: &ColumnPlan, row: &Row<'_>) -> Result<E> {
    let mut entity = E::default();
    let mut index = 0;

    for segment in plan.segments() {
        index = match segment.target {
            SegmentTarget::Base => read_segment(row, index, &segment.columns, &mut entity)?,
            SegmentTarget::Relation(relation) => {
                let slot = entity.relation_slot(relation)?;
                read_segment(row, index, &segment.columns, slot)?
            }
        };
    }

    Ok(entity)
}
