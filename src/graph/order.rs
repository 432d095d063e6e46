//! Processing order produced by the topological sequencer

use super::network::{DrainageNetwork, NodeIndex};
use super::SubbasinId;

/// An ordering of network positions in which every subbasin comes after
/// all of its upstream subbasins
///
/// Only [`DrainageNetwork::topological_sort`] constructs one, so the
/// positions always refer to the network that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessingOrder {
    indices: Vec<NodeIndex>,
}

impl ProcessingOrder {
    pub(crate) fn new(indices: Vec<NodeIndex>) -> Self {
        Self { indices }
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Network positions in processing order
    pub fn indices(&self) -> &[NodeIndex] {
        &self.indices
    }

    /// Subbasin ids in processing order
    pub fn ids<'a>(
        &'a self,
        network: &'a DrainageNetwork,
    ) -> impl Iterator<Item = SubbasinId> + 'a {
        self.indices.iter().map(move |&idx| network.node(idx).id())
    }
}
