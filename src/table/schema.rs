//! Fixed column schemas for the five recognized input files

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Column names shared by the schemas and the graph builder
pub mod columns {
    pub const SUBBASIN_ID: &str = "subbasin_id";

    pub const STORAGE_CAPACITY: &str = "storage_capacity";
    pub const DAM_HEIGHT: &str = "dam_height";
    pub const SPILLWAY_CAPACITY: &str = "spillway_capacity";

    pub const UPSTREAM: &str = "upstream";
    pub const DOWNSTREAM: &str = "downstream";

    pub const RUNOFF_VOLUME: &str = "runoff_volume";
    pub const RUNOFF_PEAK_DISCHARGE: &str = "runoff_peak_discharge";

    pub const SEDIMENT_INFLOW: &str = "sediment_inflow";

    pub const SEDIMENT_DENSITY: &str = "sediment_density";
    pub const RETENTION_EFFICIENCY: &str = "retention_efficiency";
}

use columns::*;

/// Decimal separator a file type is declared to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecimalSeparator {
    Period,
    Comma,
}

/// The role an input file plays in the cascade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileRole {
    /// Reservoir geometry: storage capacity, dam height, spillway capacity
    Reservoir,
    /// Drainage edges: upstream and downstream subbasin
    Routing,
    /// Local runoff volume and peak discharge
    Runoff,
    /// Local sediment inflow volume
    SedimentYield,
    /// Per-subbasin sediment density and retention efficiency
    SedimentParams,
}

impl FileRole {
    pub const ALL: [FileRole; 5] = [
        FileRole::Reservoir,
        FileRole::Routing,
        FileRole::Runoff,
        FileRole::SedimentYield,
        FileRole::SedimentParams,
    ];

    /// Returns the schema for this role
    pub fn schema(self) -> &'static TableSchema {
        match self {
            FileRole::Reservoir => &RESERVOIR,
            FileRole::Routing => &ROUTING,
            FileRole::Runoff => &RUNOFF,
            FileRole::SedimentYield => &SEDIMENT_YIELD,
            FileRole::SedimentParams => &SEDIMENT_PARAMS,
        }
    }

    /// Conventional file name for this role
    pub fn file_name(self) -> &'static str {
        self.schema().file_name
    }
}

impl fmt::Display for FileRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

impl FromStr for FileRole {
    type Err = String;

    /// Accepts either the conventional file name or the snake_case role name
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reservoir" | "reservoir.dat" => Ok(FileRole::Reservoir),
            "routing" | "routing.dat" => Ok(FileRole::Routing),
            "runoff" | "runoff.dat" => Ok(FileRole::Runoff),
            "sediment_yield" | "sedyield" | "sedyield.dat" => Ok(FileRole::SedimentYield),
            "sediment_params" | "sed_param" | "sed_param.dat" => Ok(FileRole::SedimentParams),
            other => Err(format!("unknown file role: {other}")),
        }
    }
}

/// An ordered column list plus the declared decimal convention
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    pub role: FileRole,
    pub file_name: &'static str,
    /// Column names; the first is always the subbasin identifier
    pub names: &'static [&'static str],
    /// Separator the file type is documented to use. Informational only:
    /// the loader accepts `.` and `,` in every numeric cell.
    pub decimal: DecimalSeparator,
}

impl TableSchema {
    /// Number of fields every data row must have
    pub fn width(&self) -> usize {
        self.names.len()
    }

    /// Position of a value column, counting from the first column after the id
    pub fn value_index(&self, name: &str) -> Option<usize> {
        self.names.iter().skip(1).position(|&n| n == name)
    }
}

pub static RESERVOIR: TableSchema = TableSchema {
    role: FileRole::Reservoir,
    file_name: "reservoir.dat",
    names: &[SUBBASIN_ID, STORAGE_CAPACITY, DAM_HEIGHT, SPILLWAY_CAPACITY],
    decimal: DecimalSeparator::Comma,
};

pub static ROUTING: TableSchema = TableSchema {
    role: FileRole::Routing,
    file_name: "routing.dat",
    names: &[SUBBASIN_ID, UPSTREAM, DOWNSTREAM],
    decimal: DecimalSeparator::Period,
};

pub static RUNOFF: TableSchema = TableSchema {
    role: FileRole::Runoff,
    file_name: "runoff.dat",
    names: &[SUBBASIN_ID, RUNOFF_VOLUME, RUNOFF_PEAK_DISCHARGE],
    decimal: DecimalSeparator::Period,
};

pub static SEDIMENT_YIELD: TableSchema = TableSchema {
    role: FileRole::SedimentYield,
    file_name: "sedyield.dat",
    names: &[SUBBASIN_ID, SEDIMENT_INFLOW],
    decimal: DecimalSeparator::Period,
};

pub static SEDIMENT_PARAMS: TableSchema = TableSchema {
    role: FileRole::SedimentParams,
    file_name: "sed_param.dat",
    names: &[SUBBASIN_ID, SEDIMENT_DENSITY, RETENTION_EFFICIENCY],
    decimal: DecimalSeparator::Period,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_schema_starts_with_id() {
        for role in FileRole::ALL {
            let schema = role.schema();
            assert_eq!(schema.role, role);
            assert_eq!(schema.names[0], SUBBASIN_ID);
        }
    }

    #[test]
    fn test_value_index_skips_id() {
        assert_eq!(RESERVOIR.value_index(DAM_HEIGHT), Some(1));
        assert_eq!(RESERVOIR.value_index(SUBBASIN_ID), None);
        assert_eq!(RUNOFF.value_index(DAM_HEIGHT), None);
    }

    #[test]
    fn test_role_from_str() {
        assert_eq!("sedyield.dat".parse::<FileRole>(), Ok(FileRole::SedimentYield));
        assert_eq!("Routing".parse::<FileRole>(), Ok(FileRole::Routing));
        assert!("rainfall.dat".parse::<FileRole>().is_err());
    }
}
