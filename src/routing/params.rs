//! Sediment parameter resolution
//!
//! Density and retention efficiency either come per subbasin from the
//! parameter file or as one global pair. Both cases are one tagged variant
//! with a single resolution function, so the engine never branches on a
//! mode flag.

use crate::table::{columns, FileRole, Result, Table};
use crate::SubbasinId;
use std::collections::HashMap;

/// Dry bulk density used when no value is given (g/cm³)
pub const DEFAULT_DENSITY: f64 = 1.5;

/// Retention efficiency used when no value is given (fraction)
pub const DEFAULT_EFFICIENCY: f64 = 0.50;

/// Density and efficiency in effect at one node
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedParams {
    pub density: f64,
    pub efficiency: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SedimentParams {
    /// Values per subbasin; absent entries fall back to the defaults
    PerNode {
        density: HashMap<SubbasinId, f64>,
        efficiency: HashMap<SubbasinId, f64>,
    },
    /// One pair of values for every subbasin
    Global { density: f64, efficiency: f64 },
}

impl SedimentParams {
    /// Reads per-subbasin values from a sediment parameter table.
    ///
    /// Missing cells are left out of the maps and so resolve to the
    /// defaults. When an id repeats, its first row is used and the later
    /// rows are ignored with a warning, even where the first row's cell is
    /// missing. This matches the duplicate handling of the runoff and
    /// sediment yield lookups.
    pub fn per_node(table: &Table) -> Result<Self> {
        table.expect_role(FileRole::SedimentParams)?;
        let present = |column: &str| -> Result<HashMap<SubbasinId, f64>> {
            Ok(table
                .lookup(column)?
                .into_iter()
                .filter_map(|(id, value)| value.map(|v| (id, v)))
                .collect())
        };
        Ok(Self::PerNode {
            density: present(columns::SEDIMENT_DENSITY)?,
            efficiency: present(columns::RETENTION_EFFICIENCY)?,
        })
    }

    /// Builds global values. `efficiency` is a fraction.
    ///
    /// An absent or zero value means "not given" and falls back to the
    /// default.
    pub fn global(density: Option<f64>, efficiency: Option<f64>) -> Self {
        let given = |value: Option<f64>| value.filter(|v| *v != 0.0);
        Self::Global {
            density: given(density).unwrap_or(DEFAULT_DENSITY),
            efficiency: given(efficiency).unwrap_or(DEFAULT_EFFICIENCY),
        }
    }

    /// Density and efficiency in effect for `id`
    pub fn resolve(&self, id: SubbasinId) -> ResolvedParams {
        match self {
            SedimentParams::PerNode {
                density,
                efficiency,
            } => ResolvedParams {
                density: density.get(&id).copied().unwrap_or(DEFAULT_DENSITY),
                efficiency: efficiency.get(&id).copied().unwrap_or(DEFAULT_EFFICIENCY),
            },
            SedimentParams::Global {
                density,
                efficiency,
            } => ResolvedParams {
                density: *density,
                efficiency: *efficiency,
            },
        }
    }
}

impl Default for SedimentParams {
    fn default() -> Self {
        Self::global(None, None)
    }
}
