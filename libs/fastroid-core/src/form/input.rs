//! Reading form objects from input widgets

use crate::{
    error::{FastroidError, Result},
    schema::{Entity, FieldType, InputBinding},
    value::Value,
};
use std::collections::HashMap;
use tracing::{debug, instrument};

/// Source of widget values for [`read_form`]
///
/// Implemented over whatever UI toolkit holds the widgets. Both methods
/// return `None` when the widget does not exist.
pub trait FormSource {
    /// Content of the text box with `id`
    fn text(&self, id: &str) -> Option<String>;

    /// Id of the checked button in the radio group `group_id`, or `None` when
    /// nothing is checked
    fn checked(&self, group_id: &str) -> Option<String>;
}

/// In-memory [`FormSource`] keyed by widget id
#[derive(Debug, Clone, Default)]
pub struct MapFormSource {
    texts: HashMap<String, String>,
    checked: HashMap<String, String>,
}

impl MapFormSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_text(mut self, id: impl Into<String>, text: impl Into<String>) -> Self {
        self.texts.insert(id.into(), text.into());
        self
    }

    #[must_use]
    pub fn with_checked(mut self, group_id: impl Into<String>, button_id: impl Into<String>) -> Self {
        self.checked.insert(group_id.into(), button_id.into());
        self
    }
}

impl FormSource for MapFormSource {
    fn text(&self, id: &str) -> Option<String> {
        self.texts.get(id).cloned()
    }

    fn checked(&self, group_id: &str) -> Option<String> {
        self.checked.get(group_id).cloned()
    }
}

/// Build a default `F` and fill its input-bound text fields from `source`
///
/// A text binding copies the widget content. A radio binding stores the value
/// of the checked choice; with nothing checked, or a checked id that is not a
/// listed choice, the field keeps its default.
///
/// # Errors
/// Returns `FastroidError::Mapping` if an input binding is declared on a
/// non-text field, or any error raised while setting a field
#[instrument(skip(source))]
pub fn read_form<F: Entity>(source: &dyn FormSource) -> Result<F> {
    let schema = F::schema();
    let mut form = F::default();

    for field in &schema.fields {
        let Some(input) = &field.input else {
            continue;
        };
        if field.field_type != FieldType::Text {
            return Err(FastroidError::mapping(
                schema.name,
                format!("input binding on non-text field {}", field.name),
            ));
        }

        let value = match input {
            InputBinding::Text { id } => source.text(id),
            InputBinding::Radio { group_id, choices } => source.checked(group_id).and_then(|checked| {
                choices
                    .iter()
                    .find(|(id, _)| *id == checked)
                    .map(|(_, value)| (*value).to_string())
            }),
        };

        match value {
            Some(text) => form.set_value(field.name, Value::Text(text))?,
            None => debug!("No input for {}.{}", schema.name, field.name),
        }
    }

    Ok(form)
}
