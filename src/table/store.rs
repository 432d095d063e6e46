use super::error::Result;
use super::frame::Table;
use super::loader::{load_table, LoadOptions};
use super::schema::FileRole;
use crate::core::Error;
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

/// In-memory cache of the most recently loaded table per file role.
///
/// Loading a role again replaces the previous table. The store is owned by
/// whoever drives the computation; nothing here is process-global, and a
/// compute run only borrows the tables it needs.
#[derive(Debug, Default)]
pub struct TableStore {
    tables: HashMap<FileRole, Table>,
    options: LoadOptions,
}

impl TableStore {
    /// Creates an empty store using the default tokenizer settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty store with custom tokenizer settings.
    pub fn with_options(options: LoadOptions) -> Self {
        Self {
            tables: HashMap::new(),
            options,
        }
    }

    /// Loads `path` as `role`, replacing any table previously held for it.
    ///
    /// On error the previously held table (if any) is left untouched.
    pub fn load(&mut self, role: FileRole, path: impl AsRef<Path>) -> Result<&Table> {
        let table = load_table(path.as_ref(), role, &self.options)?;
        info!(%role, rows = table.len(), "file '{}' loaded successfully", role);
        self.tables.insert(role, table);
        Ok(&self.tables[&role])
    }

    /// Stores an already-built table under its own role.
    ///
    /// Returns the table it replaced.
    pub fn insert(&mut self, table: Table) -> Option<Table> {
        self.tables.insert(table.role(), table)
    }

    /// Returns the table for `role` if one has been loaded.
    pub fn get(&self, role: FileRole) -> Option<&Table> {
        self.tables.get(&role)
    }

    /// Returns the table for `role`, or a missing-input error.
    pub fn require(&self, role: FileRole) -> crate::core::Result<&Table> {
        self.get(role).ok_or(Error::MissingInput { role })
    }

    /// Returns true if a table is held for `role`.
    pub fn contains(&self, role: FileRole) -> bool {
        self.tables.contains_key(&role)
    }

    /// Drops the table held for `role`.
    pub fn remove(&mut self, role: FileRole) -> Option<Table> {
        self.tables.remove(&role)
    }
}
