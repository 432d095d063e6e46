//! Sediment Routing Engine
//!
//! Runs over the same network and processing order as the water engine and
//! reads its breach decisions.
//!
//! For each node:
//!
//! - **Eroded volume**: `breached × m × (V_out × pm × dam_height)^n`, with
//!   the breach flag as a 0/1 multiplier, rounded to two decimals. `V_out`
//!   is the reported (integer) outbound water volume.
//! - **Inflow**: local sediment inflow plus the outflow of every upstream
//!   node
//! - **Breached**: eroded dam material is added, `in + eroded × density`
//! - **Not breached**: the reservoir retains the complement,
//!   `efficiency × in`

use super::error::{RoutingError, RoutingResult};
use super::fold::{fold_upstream, NodeStates};
use super::params::SedimentParams;
use super::water::WaterState;
use crate::core::round2;
use crate::graph::{Attribute, DrainageNetwork, MergedAttributes, ProcessingOrder};
use crate::table::{self, columns, FileRole, Table};
use crate::SubbasinId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info};

/// Fraction of the dam body mobilized by a breach
pub const BREACH_FRACTION: f64 = 0.842584358697712;

/// Coefficient of the eroded volume regression
pub const EROSION_COEFFICIENT: f64 = 0.0261;

/// Exponent of the eroded volume regression
pub const EROSION_EXPONENT: f64 = 0.769;

/// Local sediment inflow per subbasin
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SedimentYield {
    inflow: HashMap<SubbasinId, Option<f64>>,
}

impl SedimentYield {
    /// Reads the sediment yield table
    pub fn from_table(table: &Table) -> table::Result<Self> {
        table.expect_role(FileRole::SedimentYield)?;
        Ok(Self {
            inflow: table.lookup(columns::SEDIMENT_INFLOW)?,
        })
    }

    /// Local inflow of `id`, `None` if absent or missing
    pub fn get(&self, id: SubbasinId) -> Option<f64> {
        self.inflow.get(&id).copied().flatten()
    }
}

impl FromIterator<(SubbasinId, f64)> for SedimentYield {
    fn from_iter<I: IntoIterator<Item = (SubbasinId, f64)>>(iter: I) -> Self {
        Self {
            inflow: iter.into_iter().map(|(id, v)| (id, Some(v))).collect(),
        }
    }
}

/// Sediment balance of one subbasin after its visit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SedimentState {
    /// Eroded dam volume, already rounded to two decimals
    pub eroded_volume: f64,
    pub sediment_in: f64,
    pub sediment_out: f64,
}

/// Eroded dam volume for one node, rounded to two decimals
pub fn eroded_volume(breached: bool, volume_out: f64, dam_height: f64) -> f64 {
    let flag = if breached { 1.0 } else { 0.0 };
    round2(
        flag * EROSION_COEFFICIENT
            * (volume_out * BREACH_FRACTION * dam_height).powf(EROSION_EXPONENT),
    )
}

/// Everything the sediment engine reads besides the network itself
#[derive(Debug, Clone, Copy)]
pub struct SedimentInputs<'a> {
    pub water: &'a NodeStates<WaterState>,
    pub merged: &'a MergedAttributes,
    pub sediment_yield: &'a SedimentYield,
    pub params: &'a SedimentParams,
}

/// Routes sediment mass through the network.
pub fn route_sediment(
    network: &DrainageNetwork,
    order: &ProcessingOrder,
    inputs: SedimentInputs<'_>,
) -> RoutingResult<NodeStates<SedimentState>> {
    let states = fold_upstream(network, order, |node, idx, upstream: &[&SedimentState]| {
        let id = node.id();
        let water = inputs
            .water
            .get(idx)
            .ok_or(RoutingError::NotRouted { id })?;

        // Non-breached nodes erode nothing whatever their dam height
        let eroded = if water.breached {
            let height = inputs
                .merged
                .dam_height(id)
                .ok_or_else(|| RoutingError::missing(id, Attribute::DamHeight))?;
            eroded_volume(true, water.volume_out.trunc(), height)
        } else {
            0.0
        };

        let local = inputs
            .sediment_yield
            .get(id)
            .ok_or_else(|| RoutingError::missing(id, Attribute::SedimentInflow))?;
        let sediment_in = local + upstream.iter().map(|s| s.sediment_out).sum::<f64>();

        let params = inputs.params.resolve(id);
        let sediment_out = if water.breached {
            sediment_in + eroded * params.density
        } else {
            params.efficiency * sediment_in
        };

        debug!(
            subbasin = %id,
            eroded,
            sediment_in,
            sediment_out,
            density = params.density,
            efficiency = params.efficiency,
            "sediment routed"
        );

        Ok(SedimentState {
            eroded_volume: eroded,
            sediment_in,
            sediment_out,
        })
    })?;

    let eroded: f64 = states.iter().map(|(_, s)| s.eroded_volume).sum();
    info!(
        subbasins = states.visited(),
        eroded_volume = eroded,
        "sediment routing finished"
    );

    Ok(states)
}
