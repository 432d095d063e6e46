use super::FileRole;
use std::path::PathBuf;
use thiserror::Error;

/// Error type for loading input tables.
///
/// A load error is fatal to that one file only; other files can still be
/// loaded and the caller decides whether to ask for a replacement.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LoadError {
    /// The file could not be read.
    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The delimited text could not be tokenized.
    #[error("malformed delimited text in {}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// A data row did not split into the schema's column count.
    #[error("{role}: line {line} has {found} columns, but {expected} were expected")]
    SchemaMismatch {
        role: FileRole,
        line: u64,
        expected: usize,
        found: usize,
    },

    /// The identifier column of a data row is not an integer.
    #[error("{role}: line {line} has an invalid subbasin id {value:?}")]
    InvalidIdentifier {
        role: FileRole,
        line: u64,
        value: String,
    },

    /// A column was requested that the table's schema does not declare.
    #[error("{role} has no column named {column}")]
    MissingColumn { role: FileRole, column: String },

    /// A table of one role was supplied where another was required.
    #[error("expected a {expected} table, got {found}")]
    WrongRole { expected: FileRole, found: FileRole },
}

pub type Result<T> = std::result::Result<T, LoadError>;
