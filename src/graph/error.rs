//! Error types for drainage network operations
//!
//! This module hides error representation details and provides
//! a unified error type for network construction and sequencing.

use crate::SubbasinId;
use thiserror::Error;

/// Result type for graph operations
pub type GraphResult<T> = Result<T, GraphError>;

/// Errors that can occur while building or ordering a drainage network
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum GraphError {
    /// The routing data contains a cycle, so no processing order exists
    #[error("routing data is not acyclic: subbasins {} are part of or downstream of a cycle", format_ids(.nodes))]
    CyclicNetwork {
        /// Subbasins that could not be ordered
        nodes: Vec<SubbasinId>,
    },

    /// A subbasin was not found in the network
    #[error("subbasin not found in drainage network: {id}")]
    SubbasinNotFound {
        /// The id that was not found
        id: SubbasinId,
    },

    /// A subbasin id appears more than once in the reservoir table
    #[error("duplicate subbasin id in reservoir table: {id}")]
    DuplicateSubbasin {
        /// The duplicated id
        id: SubbasinId,
    },
}

impl GraphError {
    /// Creates a cyclic network error listing the unordered subbasins
    pub fn cyclic(nodes: Vec<SubbasinId>) -> Self {
        Self::CyclicNetwork { nodes }
    }

    /// Creates a subbasin not found error
    pub fn subbasin_not_found(id: SubbasinId) -> Self {
        Self::SubbasinNotFound { id }
    }

    /// Creates a duplicate subbasin error
    pub fn duplicate_subbasin(id: SubbasinId) -> Self {
        Self::DuplicateSubbasin { id }
    }
}

fn format_ids(ids: &[SubbasinId]) -> String {
    let parts: Vec<String> = ids.iter().map(|id| id.to_string()).collect();
    format!("[{}]", parts.join(", "))
}
