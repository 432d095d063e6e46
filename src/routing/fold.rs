//! Upstream-confluence fold
//!
//! Both engines share the same traversal: walk the processing order once,
//! hand each node the already-computed states of its upstream nodes, and
//! store whatever the node's transition returns. Because the order is
//! topological, every upstream state exists when a node is visited, so one
//! forward pass costs O(nodes + edges) and never revisits a node.
//!
//! State lives in an arena indexed by network position and is owned by the
//! run that produced it.

use super::error::{RoutingError, RoutingResult};
use crate::graph::{DrainageNetwork, NetworkNode, NodeIndex, ProcessingOrder};
use crate::SubbasinId;

/// Per-node states produced by one pass, indexed by network position
#[derive(Debug, Clone, PartialEq)]
pub struct NodeStates<S> {
    states: Vec<Option<S>>,
}

impl<S> NodeStates<S> {
    fn with_len(len: usize) -> Self {
        Self {
            states: std::iter::repeat_with(|| None).take(len).collect(),
        }
    }

    /// State of the node at `idx`, `None` if it was never visited
    pub fn get(&self, idx: NodeIndex) -> Option<&S> {
        self.states.get(idx).and_then(Option::as_ref)
    }

    /// State of a subbasin by id
    pub fn get_by_id(&self, network: &DrainageNetwork, id: SubbasinId) -> Option<&S> {
        network.index_of(id).and_then(|idx| self.get(idx))
    }

    /// Visited nodes and their states, in network order
    pub fn iter(&self) -> impl Iterator<Item = (NodeIndex, &S)> {
        self.states
            .iter()
            .enumerate()
            .filter_map(|(idx, state)| state.as_ref().map(|s| (idx, s)))
    }

    /// Number of visited nodes
    pub fn visited(&self) -> usize {
        self.states.iter().filter(|s| s.is_some()).count()
    }
}

impl<S> Default for NodeStates<S> {
    fn default() -> Self {
        Self { states: Vec::new() }
    }
}

/// Walks `order` and computes one state per node.
///
/// `transition` receives the node, its position, and the states of its
/// upstream nodes (empty for headwaters).
pub fn fold_upstream<S, F>(
    network: &DrainageNetwork,
    order: &ProcessingOrder,
    mut transition: F,
) -> RoutingResult<NodeStates<S>>
where
    F: FnMut(&NetworkNode, NodeIndex, &[&S]) -> RoutingResult<S>,
{
    let mut states = NodeStates::with_len(network.len());

    for &idx in order.indices() {
        let node = network.node(idx);
        let next = {
            let upstream = node
                .predecessors()
                .iter()
                .map(|&p| {
                    states.get(p).ok_or_else(|| RoutingError::UnvisitedUpstream {
                        id: node.id(),
                        upstream: network.node(p).id(),
                    })
                })
                .collect::<RoutingResult<Vec<&S>>>()?;
            transition(node, idx, &upstream)?
        };
        states.states[idx] = Some(next);
    }

    Ok(states)
}
