//! Error types for the routing engines

use crate::graph::Attribute;
use crate::SubbasinId;
use thiserror::Error;

/// Result type for routing operations
pub type RoutingResult<T> = Result<T, RoutingError>;

/// Errors raised while visiting a node. Any of them aborts the run, since
/// every node downstream of the failing one would be invalid too.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum RoutingError {
    /// A value the node's transition needs is absent from the merged inputs
    #[error("subbasin {id} has no value for {attribute}")]
    MissingAttributes { id: SubbasinId, attribute: Attribute },

    /// An upstream node had not been visited when its downstream node was
    #[error("subbasin {id} was visited before its upstream subbasin {upstream}")]
    UnvisitedUpstream { id: SubbasinId, upstream: SubbasinId },

    /// Sediment routing reached a node the water engine never routed
    #[error("subbasin {id} has no water routing state")]
    NotRouted { id: SubbasinId },
}

impl RoutingError {
    pub fn missing(id: SubbasinId, attribute: Attribute) -> Self {
        Self::MissingAttributes { id, attribute }
    }
}
