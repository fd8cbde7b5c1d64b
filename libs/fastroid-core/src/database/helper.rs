//! Connection source for the mapper

use crate::{
    config::FastroidConfig,
    error::Result,
    schema::NamingStrategy,
    value::ValueBinding,
};
use rusqlite::{Connection, OpenFlags};
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

/// Opens connections for a single statement each
///
/// Every mapper call asks for a fresh connection and drops it before
/// returning, on the success and the error path alike.
pub trait DatabaseHelper {
    /// Open a connection for reading
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened
    fn readable(&self) -> Result<Connection>;

    /// Open a connection for writing
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened
    fn writable(&self) -> Result<Connection>;

    /// Naming strategy for table and column names
    fn naming(&self) -> NamingStrategy {
        NamingStrategy::default()
    }

    /// How staged values are bound
    fn value_binding(&self) -> ValueBinding {
        ValueBinding::default()
    }
}

/// [`DatabaseHelper`] over a SQLite database file
#[derive(Debug, Clone)]
pub struct SqliteHelper {
    path: PathBuf,
    naming: NamingStrategy,
    value_binding: ValueBinding,
}

impl SqliteHelper {
    /// Create a helper for the database at `path` with default settings
    #[must_use]
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            naming: NamingStrategy::default(),
            value_binding: ValueBinding::default(),
        }
    }

    /// Create a helper from loaded configuration
    #[must_use]
    pub fn from_config(config: &FastroidConfig) -> Self {
        Self {
            path: config.database_path.clone(),
            naming: config.naming,
            value_binding: config.value_binding,
        }
    }

    #[must_use]
    pub fn with_naming(mut self, naming: NamingStrategy) -> Self {
        self.naming = naming;
        self
    }

    #[must_use]
    pub fn with_value_binding(mut self, value_binding: ValueBinding) -> Self {
        self.value_binding = value_binding;
        self
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DatabaseHelper for SqliteHelper {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    fn readable(&self) -> Result<Connection> {
        debug!("Opening read-only connection");
        let conn = Connection::open_with_flags(
            &self.path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        Ok(conn)
    }

    #[instrument(skip(self), fields(path = %self.path.display()))]
    fn writable(&self) -> Result<Connection> {
        debug!("Opening read-write connection");
        let conn = Connection::open(&self.path)?;
        Ok(conn)
    }

    fn naming(&self) -> NamingStrategy {
        self.naming
    }

    fn value_binding(&self) -> ValueBinding {
        self.value_binding
    }
}
