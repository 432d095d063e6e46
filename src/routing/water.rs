//! Water Routing Engine
//!
//! For each node, in processing order:
//!
//! 1. **Inflow**: local runoff plus the outflow of every upstream node
//! 2. **Breach test**: breached iff `K × peak_in > spillway_capacity`
//! 3. **Breached**: the stored volume is released on top of the inflow and
//!    the peak follows the dam-break regression `0.0344 × V^0.6527`
//! 4. **Not breached**: volume passes unchanged, peak is attenuated by `K`

use super::error::{RoutingError, RoutingResult};
use super::fold::{fold_upstream, NodeStates};
use crate::graph::{Attribute, DrainageNetwork, NetworkNode, ProcessingOrder};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Fraction of inbound peak discharge the outlet structure passes without
/// overtopping
pub const STRUCTURE_PASSAGE_FRACTION: f64 = 0.707121014402343;

/// Coefficient of the dam-break peak discharge regression
pub const DAM_BREAK_COEFFICIENT: f64 = 0.0344;

/// Exponent of the dam-break peak discharge regression
pub const DAM_BREAK_EXPONENT: f64 = 0.6527;

/// Water balance of one subbasin after its visit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaterState {
    pub volume_in: f64,
    pub volume_out: f64,
    pub peak_in: f64,
    pub peak_out: f64,
    pub breached: bool,
}

/// Returns true if a reservoir with this spillway capacity is overtopped
/// by this inbound peak discharge
pub fn is_breached(peak_in: f64, spillway_capacity: f64) -> bool {
    STRUCTURE_PASSAGE_FRACTION * peak_in > spillway_capacity
}

/// Peak discharge released by a dam break with this outflow volume
pub fn dam_break_peak(volume_out: f64) -> f64 {
    DAM_BREAK_COEFFICIENT * volume_out.powf(DAM_BREAK_EXPONENT)
}

/// Routes runoff through the network and decides which reservoirs breach.
pub fn route_water(
    network: &DrainageNetwork,
    order: &ProcessingOrder,
) -> RoutingResult<NodeStates<WaterState>> {
    let states = fold_upstream(network, order, |node, _, upstream| visit(node, upstream))?;

    let breached = states.iter().filter(|(_, s)| s.breached).count();
    info!(subbasins = states.visited(), breached, "water routing finished");

    Ok(states)
}

fn visit(node: &NetworkNode, upstream: &[&WaterState]) -> RoutingResult<WaterState> {
    let id = node.id();
    let require = |attribute: Attribute| {
        node.attributes()
            .and_then(|a| a.get(attribute))
            .ok_or_else(|| RoutingError::missing(id, attribute))
    };

    let volume_in =
        require(Attribute::RunoffVolume)? + upstream.iter().map(|s| s.volume_out).sum::<f64>();
    let peak_in =
        require(Attribute::RunoffPeakDischarge)? + upstream.iter().map(|s| s.peak_out).sum::<f64>();

    let breached = is_breached(peak_in, require(Attribute::SpillwayCapacity)?);

    let (volume_out, peak_out) = if breached {
        let volume_out = volume_in + require(Attribute::StorageCapacity)?;
        (volume_out, dam_break_peak(volume_out))
    } else {
        (volume_in, STRUCTURE_PASSAGE_FRACTION * peak_in)
    };

    debug!(
        subbasin = %id,
        volume_in,
        volume_out,
        peak_in,
        peak_out,
        breached,
        "water routed"
    );

    Ok(WaterState {
        volume_in,
        volume_out,
        peak_in,
        peak_out,
        breached,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::round2;
    use crate::graph::SubbasinAttributes;
    use crate::SubbasinId;

    fn id(raw: i64) -> SubbasinId {
        SubbasinId::new(raw)
    }

    fn attrs(volume: f64, peak: f64, spillway: f64, storage: f64) -> SubbasinAttributes {
        SubbasinAttributes {
            storage_capacity: Some(storage),
            dam_height: Some(5.0),
            spillway_capacity: Some(spillway),
            runoff_volume: Some(volume),
            runoff_peak_discharge: Some(peak),
        }
    }

    fn route(network: &DrainageNetwork) -> RoutingResult<NodeStates<WaterState>> {
        let order = network.topological_sort().unwrap();
        route_water(network, &order)
    }

    #[test]
    fn test_headwater_takes_local_runoff() {
        let mut network = DrainageNetwork::new();
        network
            .add_subbasin(id(1), Some(attrs(123.4, 6.7, 1000.0, 50.0)))
            .unwrap();

        let states = route(&network).unwrap();
        let one = states.get_by_id(&network, id(1)).unwrap();
        assert_eq!(one.volume_in, 123.4);
        assert_eq!(one.peak_in, 6.7);
        assert!(!one.breached);
    }

    #[test]
    fn test_two_node_chain_without_breach() {
        let mut network = DrainageNetwork::new();
        network
            .add_subbasin(id(1), Some(attrs(100.0, 5.0, 1000.0, 10.0)))
            .unwrap();
        network
            .add_subbasin(id(2), Some(attrs(50.0, 3.0, 1000.0, 10.0)))
            .unwrap();
        network.add_drainage(id(1), id(2));

        let states = route(&network).unwrap();
        let a = states.get_by_id(&network, id(1)).unwrap();
        let b = states.get_by_id(&network, id(2)).unwrap();

        assert_eq!(a.volume_out, 100.0);
        assert_eq!(round2(a.peak_out), 3.54);
        assert_eq!(b.volume_in, 150.0);
        assert_eq!(b.volume_out, 150.0);
        assert_eq!(round2(b.peak_in), 6.54);
        assert_eq!(round2(b.peak_out), 4.62);
    }

    #[test]
    fn test_forced_breach_applies_dam_break_formula() {
        let mut network = DrainageNetwork::new();
        network
            .add_subbasin(id(1), Some(attrs(100.0, 10.0, 1.0, 900.0)))
            .unwrap();

        let states = route(&network).unwrap();
        let one = states.get_by_id(&network, id(1)).unwrap();
        assert!(one.breached);
        assert_eq!(one.volume_out, 1000.0);
        assert_eq!(one.peak_out, 0.0344 * 1000f64.powf(0.6527));
    }

    #[test]
    fn test_breach_is_monotonic_in_peak() {
        let spillway = 10.0;
        let threshold = spillway / STRUCTURE_PASSAGE_FRACTION;
        let mut seen_breach = false;
        for step in 0..200 {
            let peak = threshold * (0.5 + step as f64 * 0.01);
            let breached = is_breached(peak, spillway);
            assert!(!(seen_breach && !breached), "breach flag flipped back at {peak}");
            seen_breach |= breached;
        }
        assert!(seen_breach);
        assert!(!is_breached(threshold * 0.999, spillway));
        assert!(is_breached(threshold * 1.001, spillway));
    }

    #[test]
    fn test_confluence_sums_upstream_outflow() {
        let mut network = DrainageNetwork::new();
        network
            .add_subbasin(id(1), Some(attrs(10.0, 1.0, 100.0, 0.0)))
            .unwrap();
        network
            .add_subbasin(id(2), Some(attrs(20.0, 2.0, 100.0, 0.0)))
            .unwrap();
        network
            .add_subbasin(id(3), Some(attrs(5.0, 0.5, 100.0, 0.0)))
            .unwrap();
        network.add_drainage(id(1), id(3));
        network.add_drainage(id(2), id(3));

        let states = route(&network).unwrap();
        let three = states.get_by_id(&network, id(3)).unwrap();
        assert_eq!(three.volume_in, 35.0);
        assert_eq!(
            three.peak_in,
            0.5 + (STRUCTURE_PASSAGE_FRACTION * 1.0 + STRUCTURE_PASSAGE_FRACTION * 2.0)
        );
    }

    #[test]
    fn test_breach_cascades_downstream() {
        // Upstream dam breaks and its release overtops the next one
        let mut network = DrainageNetwork::new();
        network
            .add_subbasin(id(1), Some(attrs(1000.0, 50.0, 1.0, 100_000.0)))
            .unwrap();
        network
            .add_subbasin(id(2), Some(attrs(10.0, 0.1, 5.0, 2000.0)))
            .unwrap();
        network.add_drainage(id(1), id(2));

        let states = route(&network).unwrap();
        let a = states.get_by_id(&network, id(1)).unwrap();
        let b = states.get_by_id(&network, id(2)).unwrap();
        assert!(a.breached);
        assert!(b.breached);
        assert_eq!(b.volume_out, 1000.0 + 100_000.0 + 10.0 + 2000.0);
    }

    #[test]
    fn test_edge_only_node_fails_at_visit() {
        let mut network = DrainageNetwork::new();
        network
            .add_subbasin(id(1), Some(attrs(10.0, 1.0, 100.0, 0.0)))
            .unwrap();
        network.add_drainage(id(1), id(2));

        let result = route(&network);
        assert_eq!(
            result.unwrap_err(),
            RoutingError::missing(id(2), Attribute::RunoffVolume)
        );
    }

    #[test]
    fn test_missing_spillway_is_flagged() {
        let mut network = DrainageNetwork::new();
        let mut a = attrs(10.0, 1.0, 100.0, 0.0);
        a.spillway_capacity = None;
        network.add_subbasin(id(1), Some(a)).unwrap();

        assert_eq!(
            route(&network).unwrap_err(),
            RoutingError::missing(id(1), Attribute::SpillwayCapacity)
        );
    }
}
