//! Constants shared by the fastroid crates

/// Message key of the "required" validation message
pub const REQUIRED_MESSAGE_KEY: &str = "validation.required";

/// Built-in template for the "required" validation message
pub const REQUIRED_TEMPLATE: &str = "{0} is required.";

/// Format of [`crate::current_date_string`]
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Separator used when joining validation messages for display
pub const MESSAGE_SEPARATOR: &str = "\n";

/// Default database file name used when no path is configured
pub const DEFAULT_DATABASE_FILENAME: &str = "fastroid.sqlite";
