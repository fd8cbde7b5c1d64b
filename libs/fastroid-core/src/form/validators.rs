//! Required-field validation
//!
//! Validation failures are not errors: every violation becomes a message and
//! the whole object is checked before returning. `Err` is reserved for
//! schema wiring problems such as a condition naming a field that does not
//! exist.

use crate::{
    error::{FastroidError, Result},
    messages::MessageCatalog,
    schema::{Entity, EntitySchema, FieldDef, FieldType, Record, Required, When, WhenCondition},
};
use fastroid_common::is_empty;
use tracing::{debug, instrument};

fn text_value(record: &dyn Record, field: &str) -> Result<Option<String>> {
    record.value(field)?.into_text(field)
}

fn condition_holds(schema: &EntitySchema, record: &dyn Record, when: &When) -> Result<bool> {
    if schema.find_field(when.field).is_none() {
        return Err(FastroidError::unknown_field(schema.name, when.field));
    }
    let current = text_value(record, when.field)?;
    Ok(match &when.condition {
        WhenCondition::NotEmpty => !is_empty(current.as_deref()),
        WhenCondition::EqualsTo(expected) => current.as_deref() == Some(*expected),
    })
}

/// Whether the rule applies given the other fields' current values
fn applies(schema: &EntitySchema, record: &dyn Record, required: &Required) -> Result<bool> {
    if required.when.is_empty() {
        return Ok(true);
    }
    for when in &required.when {
        if condition_holds(schema, record, when)? {
            return Ok(true);
        }
    }
    Ok(false)
}

fn check_required(
    schema: &EntitySchema,
    record: &dyn Record,
    field: &FieldDef,
    required: &Required,
    catalog: &MessageCatalog,
) -> Result<Option<String>> {
    if !applies(schema, record, required)? {
        return Ok(None);
    }
    // Only text fields can be empty
    if field.field_type != FieldType::Text {
        return Ok(None);
    }
    if is_empty(text_value(record, field.name)?.as_deref()) {
        let name = required.label.unwrap_or(field.name);
        return Ok(Some(catalog.required(name)));
    }
    Ok(None)
}

/// Check every required field of `target` in field order
///
/// Returns one message per violated field; an empty list means the object
/// is valid.
///
/// # Errors
/// Returns `FastroidError::UnknownField` if a condition names a field the
/// type does not declare
#[instrument(skip(target, catalog))]
pub fn validate<F: Entity>(target: &F, catalog: &MessageCatalog) -> Result<Vec<String>> {
    let schema = F::schema();
    let mut messages = Vec::new();

    for field in schema.ordered_fields() {
        let Some(required) = &field.required else {
            continue;
        };
        if let Some(message) = check_required(&schema, target, field, required, catalog)? {
            messages.push(message);
        }
    }

    debug!("{} validation message(s) for {}", messages.len(), schema.name);
    Ok(messages)
}
