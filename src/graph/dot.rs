//! Graphviz rendering of a drainage network

use super::network::DrainageNetwork;
use petgraph::dot::{Config, Dot};
use petgraph::graph::DiGraph;
use std::path::Path;

impl DrainageNetwork {
    /// Generates a DOT representation of the network for visualization
    ///
    /// Edges point downstream. Subbasins without a reservoir row are
    /// labelled with a trailing `?`.
    ///
    /// # Example
    ///
    /// ```
    /// use damcascade::{DrainageNetwork, SubbasinId};
    ///
    /// let mut network = DrainageNetwork::new();
    /// network.add_drainage(SubbasinId::new(1), SubbasinId::new(2));
    /// let dot = network.to_dot();
    /// assert!(dot.contains("digraph"));
    /// ```
    pub fn to_dot(&self) -> String {
        let mut graph =
            DiGraph::<String, &'static str>::with_capacity(self.len(), self.edge_count());

        // Arena positions and petgraph indices line up because both are
        // assigned in insertion order. Edge weights are empty strings so the
        // graph renders through `Display` with unquoted labels.
        let indices: Vec<_> = self
            .nodes()
            .map(|node| {
                let label = match node.attributes() {
                    Some(_) => node.id().to_string(),
                    None => format!("{}?", node.id()),
                };
                graph.add_node(label)
            })
            .collect();

        for (from, node) in self.nodes().enumerate() {
            for &to in node.successors() {
                graph.add_edge(indices[from], indices[to], "");
            }
        }

        format!("{}", Dot::with_config(&graph, &[Config::EdgeNoLabel]))
    }

    /// Saves the network visualization to a DOT file
    pub fn save_dot(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        std::fs::write(path, self.to_dot())
    }
}

#[cfg(test)]
mod tests {
    use crate::{DrainageNetwork, SubbasinAttributes, SubbasinId};

    #[test]
    fn test_to_dot_contains_nodes_and_edges() {
        let mut network = DrainageNetwork::new();
        network
            .add_subbasin(SubbasinId::new(1), Some(SubbasinAttributes::default()))
            .unwrap();
        network.add_drainage(SubbasinId::new(1), SubbasinId::new(2));

        let dot = network.to_dot();
        assert!(dot.contains("label = \"1\""));
        assert!(dot.contains("label = \"2?\""));
        assert!(dot.contains("0 -> 1"));
    }

    #[test]
    fn test_to_dot_labels_are_not_escaped() {
        let mut network = DrainageNetwork::new();
        network.add_drainage(SubbasinId::new(10), SubbasinId::new(30));
        network.add_drainage(SubbasinId::new(20), SubbasinId::new(30));

        let dot = network.to_dot();
        assert!(dot.starts_with("digraph"));
        assert!(!dot.contains("\\\""));
        assert!(dot.contains("label = \"30?\""));
        assert!(dot.contains("0 -> 1"));
        assert!(dot.contains("2 -> 1"));
    }
}
