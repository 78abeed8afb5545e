use petgraph::algo::toposort;
use petgraph::graph::{EdgeIndex, Graph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction::{Incoming, Outgoing};

/// custom node data structure for dag nodes (petgraph)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct NodeData {
    pub id: i64,
    pub name: String,
    pub execution_time: i64,
    /// false when the name carried no usable duration suffix
    pub has_valid_duration: bool,
}

impl NodeData {
    pub fn new(id: i64, name: &str, execution_time: i64) -> NodeData {
        NodeData {
            id,
            name: name.to_string(),
            execution_time,
            has_valid_duration: true,
        }
    }
}

pub trait GraphExtension {
    fn get_source_nodes(&self) -> Vec<NodeIndex>;
    fn get_suc_nodes(&self, node_i: NodeIndex) -> Vec<NodeIndex>;
    fn get_pre_node_count(&self, node_i: NodeIndex) -> usize;
    fn get_volume(&self) -> i64;
    fn get_critical_path_length(&self) -> Option<i64>;
}

impl GraphExtension for Graph<NodeData, ()> {
    fn get_source_nodes(&self) -> Vec<NodeIndex> {
        self.node_indices()
            .filter(|&i| self.edges_directed(i, Incoming).next().is_none())
            .collect()
    }

    /// Successors in the order their edges were added. A node linked twice appears twice.
    fn get_suc_nodes(&self, node_i: NodeIndex) -> Vec<NodeIndex> {
        let mut edges: Vec<(EdgeIndex, NodeIndex)> = self
            .edges_directed(node_i, Outgoing)
            .map(|edge| (edge.id(), edge.target()))
            .collect();
        // petgraph walks the outgoing list newest first
        edges.sort_by_key(|(edge_i, _)| *edge_i);
        edges.into_iter().map(|(_, target)| target).collect()
    }

    fn get_pre_node_count(&self, node_i: NodeIndex) -> usize {
        self.edges_directed(node_i, Incoming).count()
    }

    /// Sum of execution times, saturating at `i64::MAX`.
    fn get_volume(&self) -> i64 {
        self.node_weights()
            .fold(0, |volume: i64, node| volume.saturating_add(node.execution_time))
    }

    /// Longest execution-time-weighted path. None when the graph has a cycle.
    fn get_critical_path_length(&self) -> Option<i64> {
        let sorted_nodes = toposort(self, None).ok()?;
        let mut earliest_finish = vec![0i64; self.node_count()];
        for node_i in sorted_nodes {
            let earliest_start = self
                .neighbors_directed(node_i, Incoming)
                .map(|pre_i| earliest_finish[pre_i.index()])
                .max()
                .unwrap_or(0);
            earliest_finish[node_i.index()] =
                earliest_start.saturating_add(self[node_i].execution_time);
        }
        Some(earliest_finish.into_iter().max().unwrap_or(0))
    }
}
