//! Result Assembler
//!
//! A pure left join: the runoff table's id column is the row set, and the
//! water and sediment states are looked up by id. Nothing is computed here
//! beyond the reporting rules of [`round2`] and [`whole_volume`].

use crate::core::{round2, whole_volume};
use crate::graph::DrainageNetwork;
use crate::routing::{NodeStates, SedimentState, WaterState};
use crate::table::Table;
use crate::SubbasinId;
use serde::Serialize;

/// One output row. `None` marks a subbasin the engines never visited.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ResultRow {
    pub subbasin_id: SubbasinId,
    pub volume_in: Option<i64>,
    pub volume_out: Option<i64>,
    pub peak_in: Option<f64>,
    pub peak_out: Option<f64>,
    pub breached: Option<bool>,
    pub eroded_volume: Option<f64>,
    pub sediment_in: Option<f64>,
    pub sediment_out: Option<f64>,
}

impl ResultRow {
    fn unrouted(subbasin_id: SubbasinId) -> Self {
        Self {
            subbasin_id,
            volume_in: None,
            volume_out: None,
            peak_in: None,
            peak_out: None,
            breached: None,
            eroded_volume: None,
            sediment_in: None,
            sediment_out: None,
        }
    }

    fn with_water(mut self, water: &WaterState) -> Self {
        self.volume_in = whole_volume(water.volume_in);
        self.volume_out = whole_volume(water.volume_out);
        self.peak_in = Some(round2(water.peak_in));
        self.peak_out = Some(round2(water.peak_out));
        self.breached = Some(water.breached);
        self
    }

    fn with_sediment(mut self, sediment: &SedimentState) -> Self {
        self.eroded_volume = Some(round2(sediment.eroded_volume));
        self.sediment_in = Some(round2(sediment.sediment_in));
        self.sediment_out = Some(round2(sediment.sediment_out));
        self
    }

    /// True if the water engine produced a state for this row
    pub fn is_routed(&self) -> bool {
        self.breached.is_some()
    }
}

/// The assembled result, one row per runoff row in runoff order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultTable {
    rows: Vec<ResultRow>,
    with_sediment: bool,
}

impl ResultTable {
    /// Joins the routing states onto the runoff id column.
    pub fn assemble(
        runoff: &Table,
        network: &DrainageNetwork,
        water: &NodeStates<WaterState>,
        sediment: Option<&NodeStates<SedimentState>>,
    ) -> Self {
        let rows = runoff
            .ids()
            .iter()
            .map(|&id| {
                let mut row = ResultRow::unrouted(id);
                if let Some(state) = water.get_by_id(network, id) {
                    row = row.with_water(state);
                }
                if let Some(state) = sediment.and_then(|s| s.get_by_id(network, id)) {
                    row = row.with_sediment(state);
                }
                row
            })
            .collect();

        Self {
            rows,
            with_sediment: sediment.is_some(),
        }
    }

    pub fn rows(&self) -> &[ResultRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Whether the sediment columns are part of this table
    pub fn with_sediment(&self) -> bool {
        self.with_sediment
    }

    /// Row for `id`, the first one if the runoff table repeats it
    pub fn get(&self, id: SubbasinId) -> Option<&ResultRow> {
        self.rows.iter().find(|row| row.subbasin_id == id)
    }

    /// Rows with no computed values
    pub fn unrouted(&self) -> impl Iterator<Item = &ResultRow> {
        self.rows.iter().filter(|row| !row.is_routed())
    }
}
