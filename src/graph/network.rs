//! DrainageNetwork - directed graph of subbasins
//!
//! This module provides the core data structure for representing the
//! upstream → downstream connectivity of subbasins as a directed graph.
//!
//! # Design
//!
//! Nodes live in an arena (`Vec<NetworkNode>`) in insertion order and are
//! addressed by their position. Each node keeps a bidirectional adjacency
//! list:
//! - `predecessors`: subbasins that drain into this one (incoming edges)
//! - `successors`: subbasins this one drains into (outgoing edges)
//!
//! Upstream lookups during routing are O(1), and because positions follow
//! insertion order, ties in the topological sort are broken by comparing
//! positions rather than searching an insertion list.
//!
//! Acyclicity is not checked while edges are added. A cycle is a property
//! of the routing data as a whole and is reported once, by
//! [`DrainageNetwork::topological_sort`].
//!
//! # Algorithm Reference
//!
//! Kahn's algorithm (BFS over in-degrees), the same procedure used for
//! step scheduling DAGs.

use super::attributes::SubbasinAttributes;
use super::error::{GraphError, GraphResult};
use super::order::ProcessingOrder;
use super::SubbasinId;
use std::collections::{HashMap, VecDeque};

/// Position of a node in the network arena
pub type NodeIndex = usize;

/// A subbasin in the drainage network
///
/// Holds topology plus the merged attribute row. Routing state (volumes,
/// breach flags) is kept by the engines, not here.
#[derive(Debug, Clone)]
pub struct NetworkNode {
    /// Subbasin identifier
    id: SubbasinId,
    /// Merged reservoir/runoff attributes, `None` for ids only seen in edges
    attributes: Option<SubbasinAttributes>,
    /// Subbasins draining into this one (incoming edges)
    predecessors: Vec<NodeIndex>,
    /// Subbasins this one drains into (outgoing edges)
    successors: Vec<NodeIndex>,
}

impl NetworkNode {
    fn new(id: SubbasinId, attributes: Option<SubbasinAttributes>) -> Self {
        Self {
            id,
            attributes,
            predecessors: Vec::new(),
            successors: Vec::new(),
        }
    }

    /// Returns the subbasin id
    pub fn id(&self) -> SubbasinId {
        self.id
    }

    /// Returns the merged attributes if this subbasin had a reservoir row
    pub fn attributes(&self) -> Option<&SubbasinAttributes> {
        self.attributes.as_ref()
    }

    /// Returns the upstream node positions
    pub fn predecessors(&self) -> &[NodeIndex] {
        &self.predecessors
    }

    /// Returns the downstream node positions
    pub fn successors(&self) -> &[NodeIndex] {
        &self.successors
    }

    /// Returns true if nothing drains into this subbasin
    pub fn is_headwater(&self) -> bool {
        self.predecessors.is_empty()
    }

    /// Returns true if this subbasin drains to the network outlet
    pub fn is_outlet(&self) -> bool {
        self.successors.is_empty()
    }
}

/// A directed graph of subbasins ordered by drainage direction
///
/// # Example
///
/// ```
/// use damcascade::{DrainageNetwork, SubbasinId};
///
/// let mut network = DrainageNetwork::new();
/// network.add_subbasin(SubbasinId::new(1), None).unwrap();
/// network.add_subbasin(SubbasinId::new(2), None).unwrap();
///
/// // 1 drains into 2
/// network.add_drainage(SubbasinId::new(1), SubbasinId::new(2));
///
/// let order = network.topological_sort().unwrap();
/// assert_eq!(order.ids(&network).collect::<Vec<_>>(), vec![SubbasinId::new(1), SubbasinId::new(2)]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct DrainageNetwork {
    /// Map from subbasin id to arena position
    index: HashMap<SubbasinId, NodeIndex>,
    /// Node arena in insertion order
    nodes: Vec<NetworkNode>,
}

impl DrainageNetwork {
    /// Creates a new empty network
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of subbasins in the network
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the network has no subbasins
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the number of drainage edges
    pub fn edge_count(&self) -> usize {
        self.nodes.iter().map(|n| n.successors.len()).sum()
    }

    /// Adds a subbasin to the network
    ///
    /// Returns an error if a subbasin with the same id already exists.
    pub fn add_subbasin(
        &mut self,
        id: SubbasinId,
        attributes: Option<SubbasinAttributes>,
    ) -> GraphResult<NodeIndex> {
        if self.index.contains_key(&id) {
            return Err(GraphError::duplicate_subbasin(id));
        }
        Ok(self.insert(id, attributes))
    }

    /// Returns the position of a subbasin, inserting it without attributes
    /// if it is not yet part of the network
    pub fn ensure_subbasin(&mut self, id: SubbasinId) -> NodeIndex {
        match self.index.get(&id) {
            Some(&idx) => idx,
            None => self.insert(id, None),
        }
    }

    fn insert(&mut self, id: SubbasinId, attributes: Option<SubbasinAttributes>) -> NodeIndex {
        let idx = self.nodes.len();
        self.nodes.push(NetworkNode::new(id, attributes));
        self.index.insert(id, idx);
        idx
    }

    /// Adds a drainage edge: `upstream` drains into `downstream`
    ///
    /// Endpoints that are not yet in the network are added without
    /// attributes. Adding an existing edge again is a no-op.
    pub fn add_drainage(&mut self, upstream: SubbasinId, downstream: SubbasinId) {
        let from = self.ensure_subbasin(upstream);
        let to = self.ensure_subbasin(downstream);

        // Idempotent: already exists
        if self.nodes[to].predecessors.contains(&from) {
            return;
        }

        self.nodes[to].predecessors.push(from);
        self.nodes[from].successors.push(to);
    }

    /// Returns the arena position of a subbasin
    pub fn index_of(&self, id: SubbasinId) -> Option<NodeIndex> {
        self.index.get(&id).copied()
    }

    /// Returns the node at an arena position
    ///
    /// # Panics
    ///
    /// Panics if `idx` is out of bounds. Positions handed out by this
    /// network (including those in a [`ProcessingOrder`] it produced) are
    /// always valid.
    pub fn node(&self, idx: NodeIndex) -> &NetworkNode {
        &self.nodes[idx]
    }

    /// Returns a node by subbasin id
    pub fn get(&self, id: SubbasinId) -> Option<&NetworkNode> {
        self.index_of(id).map(|idx| &self.nodes[idx])
    }

    /// Returns true if the subbasin exists in the network
    pub fn contains(&self, id: SubbasinId) -> bool {
        self.index.contains_key(&id)
    }

    /// Returns an iterator over all subbasin ids in insertion order
    pub fn ids(&self) -> impl Iterator<Item = SubbasinId> + '_ {
        self.nodes.iter().map(|n| n.id)
    }

    /// Returns an iterator over all nodes in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = &NetworkNode> {
        self.nodes.iter()
    }

    /// Returns the upstream subbasins of `id`
    pub fn predecessors(&self, id: SubbasinId) -> GraphResult<Vec<SubbasinId>> {
        let node = self.get(id).ok_or_else(|| GraphError::subbasin_not_found(id))?;
        Ok(node.predecessors.iter().map(|&p| self.nodes[p].id).collect())
    }

    /// Returns the downstream subbasins of `id`
    pub fn successors(&self, id: SubbasinId) -> GraphResult<Vec<SubbasinId>> {
        let node = self.get(id).ok_or_else(|| GraphError::subbasin_not_found(id))?;
        Ok(node.successors.iter().map(|&s| self.nodes[s].id).collect())
    }

    /// Returns subbasins with nothing upstream (in-degree 0)
    pub fn headwaters(&self) -> Vec<SubbasinId> {
        self.nodes
            .iter()
            .filter(|node| node.is_headwater())
            .map(|node| node.id)
            .collect()
    }

    /// Returns subbasins that drain to the network outlet (out-degree 0)
    pub fn outlets(&self) -> Vec<SubbasinId> {
        self.nodes
            .iter()
            .filter(|node| node.is_outlet())
            .map(|node| node.id)
            .collect()
    }

    /// Returns a valid processing order of the subbasins
    ///
    /// Uses Kahn's algorithm (BFS-based) for deterministic ordering.
    ///
    /// Returns an error if the network contains a cycle.
    ///
    /// # Algorithm
    ///
    /// 1. Compute in-degree for all nodes
    /// 2. Add all nodes with in-degree 0 to queue
    /// 3. While queue is not empty:
    ///    a. Remove node from queue, add to result
    ///    b. For each successor, decrement in-degree
    ///    c. If in-degree becomes 0, add to queue
    /// 4. If result.len() != node_count, the network has a cycle
    pub fn topological_sort(&self) -> GraphResult<ProcessingOrder> {
        let mut in_degrees: Vec<usize> = self.nodes.iter().map(|n| n.predecessors.len()).collect();
        let mut queue: VecDeque<NodeIndex> = VecDeque::new();
        let mut result = Vec::with_capacity(self.nodes.len());

        // Arena positions follow insertion order
        for (idx, &degree) in in_degrees.iter().enumerate() {
            if degree == 0 {
                queue.push_back(idx);
            }
        }

        while let Some(idx) = queue.pop_front() {
            result.push(idx);

            let mut successors = self.nodes[idx].successors.clone();
            successors.sort_unstable();

            for successor in successors {
                let degree = &mut in_degrees[successor];
                *degree -= 1;
                if *degree == 0 {
                    queue.push_back(successor);
                }
            }
        }

        if result.len() != self.nodes.len() {
            let unordered = in_degrees
                .iter()
                .enumerate()
                .filter(|(_, degree)| **degree > 0)
                .map(|(idx, _)| self.nodes[idx].id)
                .collect();
            return Err(GraphError::cyclic(unordered));
        }

        Ok(ProcessingOrder::new(result))
    }
}
