//! Fastroid Core - Schema-driven row mapping, form validation and copying
//!
//! Entities describe their fields once with an [`EntitySchema`]. From that
//! description the mapper derives table and column names, builds
//! INSERT/UPDATE/DELETE statements and SELECTs with joins, and hydrates rows
//! back into entities. The same description drives required-field validation
//! of forms and copying of form values into entities.
//!
//! # Features
//!
//! - **Mapper**: one-shot builders over SQLite via `rusqlite`, one statement
//!   and one connection per call
//! - **Joins**: to-one and to-many relations, hydrated in projection order
//! - **Validation**: conditional required fields with templated messages
//! - **Forms**: reading widget values, validating, copying into entities
//! - **Configuration**: YAML/JSON files and `FASTROID_*` environment variables
//!
//! # Quick Start
//!
//! ```no_run
//! use fastroid_core::{
//!     DatabaseManager, Entity, EntitySchema, FastroidError, FieldDef, FieldType, Record,
//!     SqliteHelper, Value,
//! };
//!
//! #[derive(Debug, Default)]
//! struct Note {
//!     note_id: i64,
//!     body: Option<String>,
//! }
//!
//! impl Record for Note {
//!     fn value(&self, field: &str) -> Result<Value, FastroidError> {
//!         match field {
//!             "noteId" => Ok(self.note_id.into()),
//!             "body" => Ok(self.body.clone().into()),
//!             _ => Err(FastroidError::unknown_field("Note", field)),
//!         }
//!     }
//!
//!     fn set_value(&mut self, field: &str, value: Value) -> Result<(), FastroidError> {
//!         match field {
//!             "noteId" => self.note_id = value.as_i64(field)?,
//!             "body" => self.body = value.into_text(field)?,
//!             _ => return Err(FastroidError::unknown_field("Note", field)),
//!         }
//!         Ok(())
//!     }
//! }
//!
//! impl Entity for Note {
//!     fn schema() -> EntitySchema {
//!         EntitySchema::new("Note")
//!             .field(FieldDef::new("noteId", FieldType::Long).identity().auto_increment())
//!             .field(FieldDef::new("body", FieldType::Text).column())
//!     }
//! }
//!
//! # fn example() -> Result<(), FastroidError> {
//! let helper = SqliteHelper::new("notes.sqlite");
//! let db = DatabaseManager::new(&helper);
//!
//! let note = Note { note_id: 0, body: Some("hello".to_string()) };
//! let id = db.insert(&note)?.execute()?;
//!
//! let notes: Vec<Note> = db
//!     .select::<Note>()
//!     .where_clause("NOTE.NOTE_ID = ?", [Value::from(id)])
//!     .execute_query()?;
//! println!("Found {} notes", notes.len());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod config_loader;
pub mod database;
pub mod error;
pub mod form;
pub mod messages;
pub mod observability;
pub mod schema;
pub mod value;

pub use config::{ConfigOverrides, FastroidConfig, LoggingConfig, LoggingOverrides};
pub use config_loader::{load_config, load_config_from_env, load_config_with_paths, ConfigLoader};
pub use database::{
    ColumnPlan, DatabaseHelper, DatabaseManager, JoinKind, SelectBuilder, SqliteHelper,
    WriteBuilder, WriteKind, NOTHING_STAGED,
};
pub use error::{FastroidError, Result};
pub use form::{
    copy_entity, create_entity, read_form, validate, FormSource, MapFormSource, Submission,
};
pub use messages::MessageCatalog;
pub use observability::init_tracing;
pub use schema::{
    compare_fields, Entity, EntitySchema, FieldDef, FieldType, InputBinding, NamingStrategy,
    Record, RelationDef, RelationKind, Required, When, WhenCondition,
};
pub use value::{Value, ValueBinding};

// Re-export common helpers
pub use fastroid_common::{current_date_string, is_empty, serialize_messages};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_re_exports() {
        assert_eq!(NOTHING_STAGED, -1);
        assert_eq!(NamingStrategy::default().apply("HireDate"), "HIRE_DATE");
        assert_eq!(ValueBinding::default(), ValueBinding::Text);
        assert!(is_empty(Some("")));
    }
}
