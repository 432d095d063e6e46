//! In-memory representation of a loaded input table

use super::error::{LoadError, Result};
use super::schema::{FileRole, TableSchema};
use crate::SubbasinId;
use std::collections::HashMap;
use tracing::warn;

/// A table whose columns follow one [`TableSchema`]
///
/// The identifier column is held separately as typed ids; every other
/// column is numeric, with `None` marking a cell that was empty or failed
/// numeric coercion.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    role: FileRole,
    ids: Vec<SubbasinId>,
    values: Vec<Vec<Option<f64>>>,
    degraded_cells: usize,
}

impl Table {
    /// Builds a table from already-parsed rows.
    ///
    /// Each row must carry exactly one value per non-id column of the
    /// role's schema.
    pub fn from_rows(
        role: FileRole,
        rows: impl IntoIterator<Item = (SubbasinId, Vec<Option<f64>>)>,
    ) -> Result<Self> {
        let expected = role.schema().width();
        let mut table = Self::empty(role);
        for (line, (id, values)) in rows.into_iter().enumerate() {
            if values.len() + 1 != expected {
                return Err(LoadError::SchemaMismatch {
                    role,
                    line: line as u64 + 1,
                    expected,
                    found: values.len() + 1,
                });
            }
            table.push(id, values);
        }
        Ok(table)
    }

    pub(crate) fn empty(role: FileRole) -> Self {
        Self {
            role,
            ids: Vec::new(),
            values: Vec::new(),
            degraded_cells: 0,
        }
    }

    pub(crate) fn push(&mut self, id: SubbasinId, values: Vec<Option<f64>>) {
        self.degraded_cells += values.iter().filter(|v| v.is_none()).count();
        self.ids.push(id);
        self.values.push(values);
    }

    pub fn role(&self) -> FileRole {
        self.role
    }

    pub fn schema(&self) -> &'static TableSchema {
        self.role.schema()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Number of numeric cells that are missing
    pub fn degraded_cells(&self) -> usize {
        self.degraded_cells
    }

    /// The identifier column, in file order
    pub fn ids(&self) -> &[SubbasinId] {
        &self.ids
    }

    /// Iterates `(id, values)` rows in file order
    pub fn rows(&self) -> impl Iterator<Item = (SubbasinId, &[Option<f64>])> {
        self.ids
            .iter()
            .zip(self.values.iter())
            .map(|(&id, values)| (id, values.as_slice()))
    }

    /// Fails unless this table was loaded for `role`
    pub fn expect_role(&self, role: FileRole) -> Result<()> {
        if self.role == role {
            Ok(())
        } else {
            Err(LoadError::WrongRole {
                expected: role,
                found: self.role,
            })
        }
    }

    /// Position of a value column among the non-id columns
    pub fn column(&self, name: &str) -> Result<usize> {
        self.schema()
            .value_index(name)
            .ok_or_else(|| LoadError::MissingColumn {
                role: self.role,
                column: name.to_string(),
            })
    }

    /// Value of one cell
    pub fn value(&self, row: usize, column: usize) -> Option<f64> {
        self.values
            .get(row)
            .and_then(|values| values.get(column))
            .copied()
            .flatten()
    }

    /// Maps each id to its value in `column`.
    ///
    /// When an id occurs more than once the first row wins and the
    /// duplicate is logged.
    pub fn lookup(&self, column: &str) -> Result<HashMap<SubbasinId, Option<f64>>> {
        let col = self.column(column)?;
        let mut map = HashMap::with_capacity(self.len());
        for (row, &id) in self.ids.iter().enumerate() {
            if map.contains_key(&id) {
                warn!(role = %self.role, %id, "duplicate subbasin id, keeping first row");
                continue;
            }
            map.insert(id, self.value(row, col));
        }
        Ok(map)
    }
}
