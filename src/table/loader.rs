//! Schema-validated loading of delimited input files
//!
//! Files are read fully into memory and decoded as Latin-1, so no handle is
//! held past the call. Input files open with a title line and a row of
//! column names. Both are discarded, after which every remaining record
//! must split into exactly the schema's column count. Numeric cells go through [`clean_cell`]; a cell that still does
//! not parse becomes `None` and the load carries on.

use super::error::{LoadError, Result};
use super::frame::Table;
use super::schema::FileRole;
use crate::SubbasinId;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};

/// Tokenizer settings shared by every input schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadOptions {
    /// Field delimiter
    pub delimiter: u8,
    /// Physical lines discarded before the column-name row
    pub skip_lines: usize,
    /// Whether a column-name row follows the skipped lines. Its contents
    /// are not checked against the schema.
    pub has_header: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            delimiter: b'\t',
            skip_lines: 1,
            has_header: true,
        }
    }
}

/// Normalizes one numeric cell.
///
/// Strips enclosing quotes and whitespace, turns a comma decimal separator
/// into a period, and parses the result. Unparseable and NaN cells are
/// `None`.
///
/// ```
/// use damcascade::table::clean_cell;
///
/// assert_eq!(clean_cell(" \"1,25\" "), Some(1.25));
/// assert_eq!(clean_cell("n/a"), None);
/// ```
pub fn clean_cell(raw: &str) -> Option<f64> {
    let text = raw.trim().trim_matches('"').trim().replace(',', ".");
    match text.parse::<f64>() {
        Ok(value) if !value.is_nan() => Some(value),
        _ => None,
    }
}

/// Parses the identifier column. Integral floats such as `12.0` are accepted.
fn parse_id(raw: &str) -> Option<SubbasinId> {
    let text = raw.trim().trim_matches('"').trim();
    if let Ok(raw) = text.parse::<i64>() {
        return Some(SubbasinId::new(raw));
    }
    match text.parse::<f64>() {
        Ok(value) if value.is_finite() && value.fract() == 0.0 => SubbasinId::from_cell(value),
        _ => None,
    }
}

fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

/// Returns the text after the first `count` lines
fn skip_lines(content: &str, count: usize) -> &str {
    let mut rest = content;
    for _ in 0..count {
        match rest.find('\n') {
            Some(pos) => rest = &rest[pos + 1..],
            None => return "",
        }
    }
    rest
}

/// Loads a file for `role` from disk
pub fn load_table(path: impl AsRef<Path>, role: FileRole, options: &LoadOptions) -> Result<Table> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let table = parse_table(&decode_latin1(&bytes), role, options, path)?;

    debug!(%role, path = %path.display(), rows = table.len(), "table loaded");
    if table.degraded_cells() > 0 {
        warn!(
            %role,
            cells = table.degraded_cells(),
            "cells could not be read as numbers and are treated as missing"
        );
    }
    Ok(table)
}

/// Parses already-decoded file content for `role`.
///
/// `path` is only used in error messages.
pub fn parse_table(
    content: &str,
    role: FileRole,
    options: &LoadOptions,
    path: &Path,
) -> Result<Table> {
    let schema = role.schema();
    let body = skip_lines(content, options.skip_lines);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(options.has_header)
        .delimiter(options.delimiter)
        .quote(b'"')
        .flexible(true)
        .from_reader(body.as_bytes());

    let mut table = Table::empty(role);

    for record in reader.records() {
        let record = record.map_err(|source| LoadError::Csv {
            path: path.to_path_buf(),
            source,
        })?;

        if record.iter().all(|field| field.trim().is_empty()) {
            continue;
        }

        let line = record.position().map(|p| p.line()).unwrap_or(0) + options.skip_lines as u64;

        if record.len() != schema.width() {
            return Err(LoadError::SchemaMismatch {
                role,
                line,
                expected: schema.width(),
                found: record.len(),
            });
        }

        let raw_id = &record[0];
        let id = parse_id(raw_id).ok_or_else(|| LoadError::InvalidIdentifier {
            role,
            line,
            value: raw_id.to_string(),
        })?;

        let values = record.iter().skip(1).map(clean_cell).collect();
        table.push(id, values);
    }

    Ok(table)
}
