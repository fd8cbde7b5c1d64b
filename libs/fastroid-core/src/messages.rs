//! Message templates for validation errors

use fastroid_common::{format_message, REQUIRED_MESSAGE_KEY, REQUIRED_TEMPLATE};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

static BUILTIN: Lazy<MessageCatalog> = Lazy::new(|| {
    let mut messages = HashMap::new();
    messages.insert(REQUIRED_MESSAGE_KEY.to_string(), REQUIRED_TEMPLATE.to_string());
    MessageCatalog { messages }
});

/// Message keys mapped to `{n}` templates
///
/// Keys missing from a loaded catalog fall back to the built-in templates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageCatalog {
    messages: HashMap<String, String>,
}

impl Default for MessageCatalog {
    fn default() -> Self {
        BUILTIN.clone()
    }
}

impl MessageCatalog {
    /// The built-in catalog
    #[must_use]
    pub fn builtin() -> &'static Self {
        &BUILTIN
    }

    /// Catalog with no entries; every lookup uses the built-in templates
    #[must_use]
    pub fn empty() -> Self {
        Self {
            messages: HashMap::new(),
        }
    }

    /// Add or replace a template
    #[must_use]
    pub fn with_message(mut self, key: impl Into<String>, template: impl Into<String>) -> Self {
        self.messages.insert(key.into(), template.into());
        self
    }

    /// Template for `key`, falling back to the built-in catalog
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.messages
            .get(key)
            .or_else(|| BUILTIN.messages.get(key))
            .map(String::as_str)
    }

    /// Format the message for `key`; an unknown key formats to the key itself
    #[must_use]
    pub fn format<S: AsRef<str>>(&self, key: &str, args: &[S]) -> String {
        self.get(key)
            .map_or_else(|| key.to_string(), |template| format_message(template, args))
    }

    /// Message for a missing required field
    #[must_use]
    pub fn required(&self, name: &str) -> String {
        self.format(REQUIRED_MESSAGE_KEY, &[name])
    }

    /// Entries of this catalog, not including built-in fallbacks
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.messages.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_required_message() {
        let catalog = MessageCatalog::default();
        assert_eq!(catalog.required("Name"), "Name is required.");
    }

    #[test]
    fn test_override_template() {
        let catalog = MessageCatalog::default().with_message(REQUIRED_MESSAGE_KEY, "{0}を入力してください。");
        assert_eq!(catalog.required("名前"), "名前を入力してください。");
    }

    #[test]
    fn test_empty_catalog_falls_back() {
        let catalog = MessageCatalog::empty();
        assert_eq!(catalog.entries().count(), 0);
        assert_eq!(catalog.get(REQUIRED_MESSAGE_KEY), Some(REQUIRED_TEMPLATE));
    }

    #[test]
    fn test_unknown_key_formats_to_key() {
        let catalog = MessageCatalog::default();
        assert_eq!(catalog.format("validation.max", &["Age", "65"]), "validation.max");
    }

    #[test]
    fn test_deserialize_from_map() {
        let catalog: MessageCatalog =
            serde_json::from_str(r#"{"validation.required": "Please enter {0}."}"#).unwrap();
        assert_eq!(catalog.required("a phone number"), "Please enter a phone number.");
    }

    #[test]
    fn test_builtin_is_shared() {
        assert!(std::ptr::eq(MessageCatalog::builtin(), MessageCatalog::builtin()));
        assert_eq!(MessageCatalog::builtin(), &MessageCatalog::default());
    }
}
