//! Utility functions shared by the mapper and the form helpers

use crate::constants::{DATE_FORMAT, MESSAGE_SEPARATOR};
use chrono::Local;
use heck::ToShoutySnakeCase;

/// Convert a class or field name in camel case to a database name
///
/// Words are upper-cased and delimited by underscores. Acronyms stay together
/// and names that are already converted come back unchanged, so
/// `userID` becomes `USER_ID` and `USER_ID` stays `USER_ID`.
#[must_use]
pub fn to_db_name(name: &str) -> String {
    name.to_shouty_snake_case()
}

/// Convert a name to a database name the way early fastroid releases did
///
/// Every ASCII upper-case letter is prefixed with an underscore, the result is
/// upper-cased, and a single leading underscore (left by a class name) is
/// removed. Consecutive capitals are split one by one: `userID` becomes
/// `USER_I_D`. Only use this to talk to tables created with those names.
#[must_use]
pub fn to_legacy_db_name(name: &str) -> String {
    let mut db_name = String::with_capacity(name.len() + 4);
    for c in name.chars() {
        if c.is_ascii_uppercase() {
            db_name.push('_');
        }
        db_name.push(c.to_ascii_uppercase());
    }
    match db_name.strip_prefix('_') {
        Some(stripped) => stripped.to_string(),
        None => db_name,
    }
}

/// Returns true if the value is absent or zero-length
#[must_use]
pub fn is_empty(value: Option<&str>) -> bool {
    value.map_or(true, str::is_empty)
}

/// Fill the `{n}` placeholders (n = 0, 1, ...) of a message template
///
/// Placeholders are visited in order and the walk stops at the first index
/// that does not appear in the template. A placeholder without a matching
/// argument is left as-is.
#[must_use]
pub fn format_message<S: AsRef<str>>(template: &str, args: &[S]) -> String {
    let mut message = template.to_string();
    let mut n = 0;
    loop {
        let placeholder = format!("{{{n}}}");
        if !message.contains(&placeholder) {
            break;
        }
        if let Some(arg) = args.get(n) {
            message = message.replace(&placeholder, arg.as_ref());
        }
        n += 1;
    }
    message
}

/// Join validation messages into one displayable string, one per line
#[must_use]
pub fn serialize_messages<S: AsRef<str>>(messages: &[S]) -> String {
    messages
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(MESSAGE_SEPARATOR)
}

/// Returns today's local date as `yyyy-MM-dd`
#[must_use]
pub fn current_date_string() -> String {
    Local::now().format(DATE_FORMAT).to_string()
}
