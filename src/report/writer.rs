//! Delimited-text result writer

use super::table::{ResultRow, ResultTable};
use crate::core::{Error, Result};
use std::io;
use std::path::Path;
use tracing::info;

const WATER_HEADER: [&str; 6] = [
    "subbasin_id",
    "volume_in",
    "volume_out",
    "peak_in",
    "peak_out",
    "breached",
];

const SEDIMENT_HEADER: [&str; 3] = ["eroded_volume", "sediment_in", "sediment_out"];

fn decimal(value: Option<f64>) -> String {
    value.map(|v| format!("{v:.2}")).unwrap_or_default()
}

fn integer(value: Option<i64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn record(row: &ResultRow, with_sediment: bool) -> Vec<String> {
    let mut fields = vec![
        row.subbasin_id.to_string(),
        integer(row.volume_in),
        integer(row.volume_out),
        decimal(row.peak_in),
        decimal(row.peak_out),
        row.breached.map(|b| b.to_string()).unwrap_or_default(),
    ];
    if with_sediment {
        fields.extend([
            decimal(row.eroded_volume),
            decimal(row.sediment_in),
            decimal(row.sediment_out),
        ]);
    }
    fields
}

impl ResultTable {
    /// Writes the table as comma-separated text with a header row.
    pub fn write_csv<W: io::Write>(&self, writer: W) -> csv::Result<()> {
        let mut out = csv::Writer::from_writer(writer);

        let mut header: Vec<&str> = WATER_HEADER.to_vec();
        if self.with_sediment() {
            header.extend(SEDIMENT_HEADER);
        }
        out.write_record(&header)?;

        for row in self.rows() {
            out.write_record(record(row, self.with_sediment()))?;
        }
        out.flush()?;
        Ok(())
    }

    /// Renders the table to a string
    pub fn to_csv_string(&self) -> csv::Result<String> {
        let mut buffer = Vec::new();
        self.write_csv(&mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }

    /// Writes the table to `path`.
    ///
    /// The whole table is rendered in memory first, so a failure while
    /// formatting leaves no file behind.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let to_error = |source: csv::Error| Error::Output {
            path: path.to_path_buf(),
            source,
        };

        let mut buffer = Vec::new();
        self.write_csv(&mut buffer).map_err(to_error)?;
        std::fs::write(path, buffer).map_err(|e| to_error(e.into()))?;

        info!(path = %path.display(), rows = self.len(), "result written");
        Ok(())
    }
}
