//! Schema-Validated Loader
//!
//! This module hides how the tab-delimited `.dat` files are tokenized and
//! cleaned. Callers see only:
//!
//! - [`FileRole`] / [`TableSchema`]: the five recognized files and their
//!   fixed, ordered columns
//! - [`load_table`]: path + role → [`Table`]
//! - [`TableStore`]: the most recently loaded table per role
//!
//! # Cleaning
//!
//! Every column except the identifier is cleaned the same way: enclosing
//! quotes and whitespace are stripped, a comma decimal separator becomes a
//! period, and the text is parsed as `f64`. A cell that fails to parse is
//! kept as missing so one bad value degrades one cell, not the file.

mod error;
mod frame;
mod loader;
mod schema;
mod store;

pub use error::{LoadError, Result};
pub use frame::Table;
pub use loader::{clean_cell, load_table, parse_table, LoadOptions};
pub use schema::{columns, DecimalSeparator, FileRole, TableSchema};
pub use store::TableStore;
