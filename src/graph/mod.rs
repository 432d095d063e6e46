//! Drainage network of subbasins
//!
//! This module provides the graph data structures and algorithms behind the
//! cascade. It enables:
//!
//! - Joining reservoir and runoff tables into per-subbasin attributes
//! - Building a directed network from upstream → downstream routing rows
//! - Topological sorting into a processing order
//! - Cycle detection to reject malformed routing data
//!
//! # Design Principles
//!
//! Following Parnas's information hiding principles:
//! - This module hides the graph representation (arena + adjacency lists)
//! - Exposes only abstract operations: add_subbasin, add_drainage,
//!   topological_sort, predecessors, etc.
//!
//! # Algorithm References
//!
//! - Kahn's algorithm for topological sort

mod attributes;
mod builder;
mod dot;
mod error;
mod network;
mod order;
mod subbasin_id;

pub use attributes::{Attribute, MergedAttributes, SubbasinAttributes};
pub use builder::{build_network, Watershed};
pub use error::{GraphError, GraphResult};
pub use network::{DrainageNetwork, NetworkNode, NodeIndex};
pub use order::ProcessingOrder;
pub use subbasin_id::SubbasinId;
