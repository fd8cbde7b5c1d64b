//! Staged values exchanged between entities and SQLite
//!
//! A [`Value`] is what an entity hands to the mapper for a write or a
//! condition, and what the mapper hands back to an entity while hydrating a
//! row. Reads are lenient in the way a database cursor is: NULL reads as zero
//! for numeric fields and numeric text is parsed.

use crate::error::{FastroidError, Result};
use rusqlite::types::{ToSql, ToSqlOutput, Value as SqlValue, ValueRef};
use serde::{Deserialize, Serialize};

/// How staged values are bound to statements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueBinding {
    /// Every non-null, non-blob value is bound as its text form and numeric
    /// comparisons are left to SQLite's column affinity
    #[default]
    Text,
    /// Values are bound with their native SQLite storage class
    Typed,
}

impl std::str::FromStr for ValueBinding {
    type Err = FastroidError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "typed" => Ok(Self::Typed),
            other => Err(FastroidError::configuration(format!(
                "Invalid value binding: {other}. Must be one of: text, typed"
            ))),
        }
    }
}

/// A single column value
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl Value {
    /// Returns true for [`Value::Null`]
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Prepare the value for binding
    ///
    /// With [`ValueBinding::Text`] integers and reals become their decimal
    /// text. Blobs keep their bytes under both bindings.
    #[must_use]
    pub fn bound(self, binding: ValueBinding) -> Self {
        match (binding, self) {
            (ValueBinding::Text, Self::Integer(i)) => Self::Text(i.to_string()),
            (ValueBinding::Text, Self::Real(f)) => Self::Text(f.to_string()),
            (_, value) => value,
        }
    }

    /// Short description of the storage class, used in error messages
    #[must_use]
    pub fn kind(&self) -> String {
        match self {
            Self::Null => "null".to_string(),
            Self::Integer(i) => format!("integer {i}"),
            Self::Real(f) => format!("real {f}"),
            Self::Text(s) => format!("text '{s}'"),
            Self::Blob(b) => format!("blob of {} bytes", b.len()),
        }
    }

    /// Read as a 64-bit integer
    ///
    /// # Errors
    /// Returns `FastroidError::TypeMismatch` for blobs and non-numeric text
    #[allow(clippy::cast_possible_truncation)]
    pub fn as_i64(&self, field: &str) -> Result<i64> {
        match self {
            Self::Null => Ok(0),
            Self::Integer(i) => Ok(*i),
            Self::Real(f) => Ok(f.trunc() as i64),
            Self::Text(s) => s
                .trim()
                .parse::<i64>()
                .map_err(|_| FastroidError::type_mismatch(field, "integer", self.kind())),
            Self::Blob(_) => Err(FastroidError::type_mismatch(field, "integer", self.kind())),
        }
    }

    /// Read as a 32-bit integer
    ///
    /// # Errors
    /// Returns `FastroidError::TypeMismatch` if the value is not an integer or
    /// does not fit
    pub fn as_i32(&self, field: &str) -> Result<i32> {
        let wide = self.as_i64(field)?;
        i32::try_from(wide).map_err(|_| FastroidError::type_mismatch(field, "int", self.kind()))
    }

    /// Read as a 16-bit integer
    ///
    /// # Errors
    /// Returns `FastroidError::TypeMismatch` if the value is not an integer or
    /// does not fit
    pub fn as_i16(&self, field: &str) -> Result<i16> {
        let wide = self.as_i64(field)?;
        i16::try_from(wide).map_err(|_| FastroidError::type_mismatch(field, "short", self.kind()))
    }

    /// Read as a double
    ///
    /// # Errors
    /// Returns `FastroidError::TypeMismatch` for blobs and non-numeric text
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self, field: &str) -> Result<f64> {
        match self {
            Self::Null => Ok(0.0),
            Self::Integer(i) => Ok(*i as f64),
            Self::Real(f) => Ok(*f),
            Self::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| FastroidError::type_mismatch(field, "real", self.kind())),
            Self::Blob(_) => Err(FastroidError::type_mismatch(field, "real", self.kind())),
        }
    }

    /// Read as a float
    ///
    /// # Errors
    /// Returns `FastroidError::TypeMismatch` for blobs and non-numeric text
    #[allow(clippy::cast_possible_truncation)]
    pub fn as_f32(&self, field: &str) -> Result<f32> {
        self.as_f64(field).map(|f| f as f32)
    }

    /// Read as optional text; numbers are rendered in decimal
    ///
    /// # Errors
    /// Returns `FastroidError::TypeMismatch` for blobs
    pub fn into_text(self, field: &str) -> Result<Option<String>> {
        match self {
            Self::Null => Ok(None),
            Self::Integer(i) => Ok(Some(i.to_string())),
            Self::Real(f) => Ok(Some(f.to_string())),
            Self::Text(s) => Ok(Some(s)),
            other @ Self::Blob(_) => Err(FastroidError::type_mismatch(field, "text", other.kind())),
        }
    }

    /// Read as optional bytes; text is returned as its UTF-8 bytes
    ///
    /// # Errors
    /// Returns `FastroidError::TypeMismatch` for numbers
    pub fn into_blob(self, field: &str) -> Result<Option<Vec<u8>>> {
        match self {
            Self::Null => Ok(None),
            Self::Blob(b) => Ok(Some(b)),
            Self::Text(s) => Ok(Some(s.into_bytes())),
            other => Err(FastroidError::type_mismatch(field, "blob", other.kind())),
        }
    }
}

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Self::Null => ToSqlOutput::Owned(SqlValue::Null),
            Self::Integer(i) => ToSqlOutput::Owned(SqlValue::Integer(*i)),
            Self::Real(f) => ToSqlOutput::Owned(SqlValue::Real(*f)),
            Self::Text(s) => ToSqlOutput::Borrowed(ValueRef::Text(s.as_bytes())),
            Self::Blob(b) => ToSqlOutput::Borrowed(ValueRef::Blob(b)),
        })
    }
}

impl From<ValueRef<'_>> for Value {
    fn from(value: ValueRef<'_>) -> Self {
        match value {
            ValueRef::Null => Self::Null,
            ValueRef::Integer(i) => Self::Integer(i),
            ValueRef::Real(f) => Self::Real(f),
            ValueRef::Text(t) => Self::Text(String::from_utf8_lossy(t).into_owned()),
            ValueRef::Blob(b) => Self::Blob(b.to_vec()),
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<i16> for Value {
    fn from(value: i16) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Real(value)
    }
}

impl From<f32> for Value {
    // Widen through the shortest decimal form so 0.1f32 stages as 0.1
    fn from(value: f32) -> Self {
        Self::Real(
            value
                .to_string()
                .parse::<f64>()
                .unwrap_or_else(|_| f64::from(value)),
        )
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Self::Blob(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}
