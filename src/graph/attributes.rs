//! Per-subbasin attributes merged from the reservoir and runoff tables
//!
//! A cell that failed numeric coercion, or a subbasin that had no matching
//! row in the runoff table, leaves the attribute as `None`. Nothing here
//! substitutes a default; the routing engines decide which attributes they
//! need and fail with a named attribute when one is missing.

use crate::SubbasinId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Attributes a routing engine may require at a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Attribute {
    StorageCapacity,
    DamHeight,
    SpillwayCapacity,
    RunoffVolume,
    RunoffPeakDischarge,
    SedimentInflow,
}

impl Attribute {
    /// Column name the attribute is loaded from
    pub fn column(self) -> &'static str {
        use crate::table::columns;
        match self {
            Attribute::StorageCapacity => columns::STORAGE_CAPACITY,
            Attribute::DamHeight => columns::DAM_HEIGHT,
            Attribute::SpillwayCapacity => columns::SPILLWAY_CAPACITY,
            Attribute::RunoffVolume => columns::RUNOFF_VOLUME,
            Attribute::RunoffPeakDischarge => columns::RUNOFF_PEAK_DISCHARGE,
            Attribute::SedimentInflow => columns::SEDIMENT_INFLOW,
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

/// One row of the reservoir ⟕ runoff join
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SubbasinAttributes {
    pub storage_capacity: Option<f64>,
    pub dam_height: Option<f64>,
    pub spillway_capacity: Option<f64>,
    pub runoff_volume: Option<f64>,
    pub runoff_peak_discharge: Option<f64>,
}

impl SubbasinAttributes {
    /// Returns the value of an attribute, `None` when missing.
    ///
    /// Sediment inflow is not part of the join and is always `None` here.
    pub fn get(&self, attribute: Attribute) -> Option<f64> {
        match attribute {
            Attribute::StorageCapacity => self.storage_capacity,
            Attribute::DamHeight => self.dam_height,
            Attribute::SpillwayCapacity => self.spillway_capacity,
            Attribute::RunoffVolume => self.runoff_volume,
            Attribute::RunoffPeakDischarge => self.runoff_peak_discharge,
            Attribute::SedimentInflow => None,
        }
    }
}

/// The merged attribute table, in reservoir-table order
///
/// Kept alongside the network because some formulas read attributes by
/// subbasin id rather than through a graph visit.
#[derive(Debug, Clone, Default)]
pub struct MergedAttributes {
    rows: Vec<(SubbasinId, SubbasinAttributes)>,
    index: HashMap<SubbasinId, usize>,
}

impl MergedAttributes {
    /// Creates an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a row. Returns false if the id is already present.
    pub fn push(&mut self, id: SubbasinId, attributes: SubbasinAttributes) -> bool {
        if self.index.contains_key(&id) {
            return false;
        }
        self.index.insert(id, self.rows.len());
        self.rows.push((id, attributes));
        true
    }

    /// Returns the attributes of a subbasin
    pub fn get(&self, id: SubbasinId) -> Option<&SubbasinAttributes> {
        self.index.get(&id).map(|&row| &self.rows[row].1)
    }

    /// Returns the dam height of a subbasin, `None` if absent or missing
    pub fn dam_height(&self, id: SubbasinId) -> Option<f64> {
        self.get(id).and_then(|a| a.dam_height)
    }

    /// Iterates rows in reservoir-table order
    pub fn iter(&self) -> impl Iterator<Item = (SubbasinId, &SubbasinAttributes)> {
        self.rows.iter().map(|(id, attrs)| (*id, attrs))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
