//! Error types for the fastroid core library

use thiserror::Error;

/// Result type alias for fastroid operations
pub type Result<T> = std::result::Result<T, FastroidError>;

/// Main error type for fastroid operations
///
/// Schema wiring problems and storage failures are both reported here and
/// are not recovered internally. Validation failures are not errors; the
/// validator returns them as messages.
#[derive(Error, Debug)]
pub enum FastroidError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Mapping error on {entity}: {message}")]
    Mapping { entity: String, message: String },

    #[error("Unknown field {field} on {entity}")]
    UnknownField { entity: String, field: String },

    #[error("Unknown relation {field} on {entity}")]
    UnknownRelation { entity: String, field: String },

    #[error("Type mismatch on {field}: expected {expected}, found {found}")]
    TypeMismatch {
        field: String,
        expected: String,
        found: String,
    },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Unknown error: {message}")]
    Unknown { message: String },
}

impl FastroidError {
    /// Create a mapping error for an entity
    pub fn mapping(entity: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Mapping {
            entity: entity.into(),
            message: message.into(),
        }
    }

    /// Create an unknown field error
    pub fn unknown_field(entity: impl Into<String>, field: impl Into<String>) -> Self {
        Self::UnknownField {
            entity: entity.into(),
            field: field.into(),
        }
    }

    /// Create an unknown relation error
    pub fn unknown_relation(entity: impl Into<String>, field: impl Into<String>) -> Self {
        Self::UnknownRelation {
            entity: entity.into(),
            field: field.into(),
        }
    }

    /// Create a type mismatch error
    pub fn type_mismatch(
        field: impl Into<String>,
        expected: impl Into<String>,
        found: impl Into<String>,
    ) -> Self {
        Self::TypeMismatch {
            field: field.into(),
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create an unknown error
    pub fn unknown(message: impl Into<String>) -> Self {
        Self::Unknown {
            message: message.into(),
        }
    }
}
