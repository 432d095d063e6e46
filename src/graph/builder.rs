//! Watershed graph builder
//!
//! Joins the reservoir and runoff tables into per-subbasin attributes and
//! turns the routing table into drainage edges.
//!
//! # Steps
//!
//! 1. Left-join reservoir ⟕ runoff on subbasin id: one row per reservoir,
//!    runoff ids without a reservoir are dropped from the node set
//! 2. Add one node per joined row, in reservoir order
//! 3. Add one edge per routing row whose downstream is neither the sentinel
//!    nor missing; ids that only appear in edges become attribute-less nodes
//!
//! The routing table is only read. Edge endpoints without a joined row are
//! not rejected here; the routing engines fail when they visit one.

use super::attributes::{MergedAttributes, SubbasinAttributes};
use super::error::GraphError;
use super::network::DrainageNetwork;
use super::SubbasinId;
use crate::core::Result;
use crate::table::{columns, FileRole, Table};
use tracing::{debug, info, warn};

/// The drainage network together with the merged attribute table
#[derive(Debug, Clone)]
pub struct Watershed {
    pub network: DrainageNetwork,
    pub merged: MergedAttributes,
}

/// Builds the drainage network from the three water-routing tables.
///
/// `sentinel` is the downstream value that marks a network outlet.
pub fn build_network(
    reservoir: &Table,
    routing: &Table,
    runoff: &Table,
    sentinel: i64,
) -> Result<Watershed> {
    reservoir.expect_role(FileRole::Reservoir)?;
    routing.expect_role(FileRole::Routing)?;
    runoff.expect_role(FileRole::Runoff)?;

    let merged = merge_attributes(reservoir, runoff)?;

    let mut network = DrainageNetwork::new();
    for (id, attributes) in merged.iter() {
        network.add_subbasin(id, Some(*attributes))?;
    }

    let upstream_col = routing.column(columns::UPSTREAM)?;
    let downstream_col = routing.column(columns::DOWNSTREAM)?;
    let mut outlets = 0usize;

    for (row, &row_id) in routing.ids().iter().enumerate() {
        let downstream = match routing
            .value(row, downstream_col)
            .and_then(SubbasinId::from_cell)
        {
            Some(id) if id.is_sentinel(sentinel) => {
                outlets += 1;
                continue;
            }
            Some(id) => id,
            None => {
                warn!(subbasin = %row_id, "routing row has no readable downstream id, no edge added");
                continue;
            }
        };
        let Some(upstream) = routing
            .value(row, upstream_col)
            .and_then(SubbasinId::from_cell)
        else {
            warn!(subbasin = %row_id, "routing row has no readable upstream id, no edge added");
            continue;
        };

        debug!(%upstream, %downstream, "drainage edge");
        network.add_drainage(upstream, downstream);
    }

    info!(
        subbasins = network.len(),
        edges = network.edge_count(),
        outlets,
        "drainage network built"
    );

    Ok(Watershed { network, merged })
}

/// Left-joins reservoir ⟕ runoff on subbasin id, in reservoir order.
fn merge_attributes(reservoir: &Table, runoff: &Table) -> Result<MergedAttributes> {
    let storage = reservoir.column(columns::STORAGE_CAPACITY)?;
    let height = reservoir.column(columns::DAM_HEIGHT)?;
    let spillway = reservoir.column(columns::SPILLWAY_CAPACITY)?;

    let volumes = runoff.lookup(columns::RUNOFF_VOLUME)?;
    let peaks = runoff.lookup(columns::RUNOFF_PEAK_DISCHARGE)?;

    let mut merged = MergedAttributes::new();
    for (row, &id) in reservoir.ids().iter().enumerate() {
        let attributes = SubbasinAttributes {
            storage_capacity: reservoir.value(row, storage),
            dam_height: reservoir.value(row, height),
            spillway_capacity: reservoir.value(row, spillway),
            runoff_volume: volumes.get(&id).copied().flatten(),
            runoff_peak_discharge: peaks.get(&id).copied().flatten(),
        };
        if !merged.push(id, attributes) {
            return Err(GraphError::duplicate_subbasin(id).into());
        }
    }
    Ok(merged)
}
