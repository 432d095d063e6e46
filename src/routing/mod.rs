//! Routing engines
//!
//! Water and sediment routing are two folds over the same drainage network
//! in the same processing order. Each visit reads the node's merged
//! attributes and the states of its upstream nodes and produces one state
//! for the node.
//!
//! - [`route_water`]: volume and peak discharge, breach decision
//! - [`route_sediment`]: eroded dam volume, sediment inflow and outflow
//! - [`SedimentParams`]: per-subbasin or global density and efficiency
//!
//! The first node that cannot be routed aborts the pass with a
//! [`RoutingError`] naming it.

mod error;
mod fold;
mod params;
mod sediment;
mod water;

pub use error::{RoutingError, RoutingResult};
pub use fold::{fold_upstream, NodeStates};
pub use params::{ResolvedParams, SedimentParams, DEFAULT_DENSITY, DEFAULT_EFFICIENCY};
pub use sediment::{
    eroded_volume, route_sediment, SedimentInputs, SedimentState, SedimentYield,
    BREACH_FRACTION, EROSION_COEFFICIENT, EROSION_EXPONENT,
};
pub use water::{
    dam_break_peak, is_breached, route_water, WaterState, DAM_BREAK_COEFFICIENT,
    DAM_BREAK_EXPONENT, STRUCTURE_PASSAGE_FRACTION,
};
