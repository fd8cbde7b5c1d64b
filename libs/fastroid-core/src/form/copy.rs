//! Copying between forms and entities

use crate::{
    error::{FastroidError, Result},
    form::{input::read_form, validators::validate, FormSource},
    messages::MessageCatalog,
    schema::{Entity, FieldDef},
    value::Value,
};
use fastroid_common::serialize_messages;
use tracing::{debug, instrument, warn};

/// Convert a source value to the type of the destination field
///
/// Text copied into an integer field must be a plain decimal integer;
/// surrounding whitespace is rejected.
fn convert(dst_field: &FieldDef, value: Value) -> Result<Value> {
    let value = match value {
        Value::Text(text) if dst_field.field_type.is_integral() => text
            .parse::<i64>()
            .map(Value::Integer)
            .map_err(|_| {
                FastroidError::type_mismatch(dst_field.name, "integer", format!("text '{text}'"))
            })?,
        other => other,
    };
    dst_field.field_type.coerce(dst_field.name, value)
}

/// Copy same-named fields of `src` into a new `D`
///
/// Null source values and fields without a counterpart on `D` are skipped.
/// Each value is converted to the destination field's declared type, so text
/// is parsed for integer fields. A value that does not convert is logged and
/// the destination field keeps its default. Values are copied as plain data;
/// relations are not followed.
///
/// # Errors
/// Returns an error only if `src` cannot report one of its own fields
#[instrument(skip(src))]
pub fn copy_entity<S: Entity, D: Entity>(src: &S) -> Result<D> {
    let src_schema = S::schema();
    let dst_schema = D::schema();
    let mut dst = D::default();

    for field in &src_schema.fields {
        let value = src.value(field.name)?;
        if value.is_null() {
            continue;
        }
        let Some(dst_field) = dst_schema.find_field(field.name) else {
            debug!("{} has no field {}, skipping", dst_schema.name, field.name);
            continue;
        };

        let converted = match convert(dst_field, value) {
            Ok(converted) => converted,
            Err(e) => {
                warn!("Failed to convert field value: {}: {}", field.name, e);
                continue;
            }
        };
        if let Err(e) = dst.set_value(field.name, converted) {
            warn!("Failed to set field value: {}: {}", field.name, e);
        }
    }

    Ok(dst)
}

/// Outcome of [`create_entity`]
#[derive(Debug, Clone, PartialEq)]
pub enum Submission<E> {
    /// The form passed validation and was copied into the entity
    Valid(E),
    /// Validation messages, in field order
    Invalid(Vec<String>),
}

impl<E> Submission<E> {
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }

    /// The entity, if the form was valid
    #[must_use]
    pub fn entity(self) -> Option<E> {
        match self {
            Self::Valid(entity) => Some(entity),
            Self::Invalid(_) => None,
        }
    }

    /// Messages joined one per line for display; empty when valid
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Valid(_) => String::new(),
            Self::Invalid(messages) => serialize_messages(messages),
        }
    }
}

/// Read a form of type `F` from `source`, validate it, and copy it into a new `E`
///
/// # Errors
/// Returns an error if the form cannot be read or its validation rules are
/// wired to unknown fields
#[instrument(skip(source, catalog))]
pub fn create_entity<F: Entity, E: Entity>(
    source: &dyn FormSource,
    catalog: &MessageCatalog,
) -> Result<Submission<E>> {
    let form: F = read_form(source)?;

    let messages = validate(&form, catalog)?;
    if !messages.is_empty() {
        debug!("Form rejected with {} message(s)", messages.len());
        return Ok(Submission::Invalid(messages));
    }

    Ok(Submission::Valid(copy_entity(&form)?))
}
