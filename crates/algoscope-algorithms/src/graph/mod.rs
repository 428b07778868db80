//! Graph algorithms: traversal, shortest paths, topological order and
//! disjoint sets.

mod dijkstra;
mod topo;
mod traversal;
pub mod union_find;

pub use dijkstra::{dijkstra, DijkstraEvent, DijkstraOptions, DijkstraStep, DijkstraView};
pub use topo::{topological_sort, TaskNode, TaskStatus, TopoEvent, TopoStep};
pub use traversal::{bfs, dfs, TraversalEvent, TraversalStep, TraversalView};
pub use union_find::{DisjointSet, UnionFindEvent, UnionFindOp, UnionFindOptions, UnionFindStep};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rejected graph construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("edge {from} -> {to} names a node outside 0..{count}")]
    NodeOutOfRange { from: usize, to: usize, count: usize },
}

/// A weighted edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub from: usize,
    pub to: usize,
    #[serde(default = "unit_weight")]
    pub weight: u64,
}

fn unit_weight() -> u64 {
    1
}

/// Labelled nodes plus an edge list.
///
/// Adjacency follows edge insertion order, which fixes the order in which
/// every traversal discovers neighbours. An undirected edge appears in the
/// adjacency of both endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Graph {
    labels: Vec<String>,
    edges: Vec<Edge>,
    directed: bool,
}

impl Graph {
    pub fn new<S: Into<String>>(labels: impl IntoIterator<Item = S>, directed: bool) -> Self {
        Self {
            labels: labels.into_iter().map(Into::into).collect(),
            edges: Vec::new(),
            directed,
        }
    }

    /// Build a graph from `(from, to, weight)` triples.
    pub fn with_edges<S: Into<String>>(
        labels: impl IntoIterator<Item = S>,
        directed: bool,
        edges: &[(usize, usize, u64)],
    ) -> Result<Self, GraphError> {
        let mut graph = Self::new(labels, directed);
        for &(from, to, weight) in edges {
            graph.add_edge(from, to, weight)?;
        }
        Ok(graph)
    }

    pub fn add_edge(&mut self, from: usize, to: usize, weight: u64) -> Result<(), GraphError> {
        let count = self.labels.len();
        if from >= count || to >= count {
            return Err(GraphError::NodeOutOfRange { from, to, count });
        }
        self.edges.push(Edge { from, to, weight });
        Ok(())
    }

    pub fn node_count(&self) -> usize {
        self.labels.len()
    }

    pub fn is_directed(&self) -> bool {
        self.directed
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Label of `node`, or its index when out of range.
    pub fn label(&self, node: usize) -> String {
        self.labels
            .get(node)
            .cloned()
            .unwrap_or_else(|| node.to_string())
    }

    /// Outgoing `(neighbour, weight)` pairs in edge order.
    pub fn neighbors(&self, node: usize) -> Vec<(usize, u64)> {
        self.edges
            .iter()
            .filter_map(|e| {
                if e.from == node {
                    Some((e.to, e.weight))
                } else if !self.directed && e.to == node {
                    Some((e.from, e.weight))
                } else {
                    None
                }
            })
            .collect()
    }

    /// Incoming edge count per node, counting undirected edges both ways.
    pub fn indegrees(&self) -> Vec<usize> {
        let mut indegree = vec![0; self.labels.len()];
        for e in &self.edges {
            indegree[e.to] += 1;
            if !self.directed {
                indegree[e.from] += 1;
            }
        }
        indegree
    }

    /// Validate edges that arrived through deserialization.
    pub fn validate(&self) -> Result<(), GraphError> {
        let count = self.labels.len();
        match self.edges.iter().find(|e| e.from >= count || e.to >= count) {
            Some(e) => Err(GraphError::NodeOutOfRange {
                from: e.from,
                to: e.to,
                count,
            }),
            None => Ok(()),
        }
    }
}

/// Highlight applied to a graph node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeStatus {
    #[default]
    Unvisited,
    /// Waiting in the frontier.
    Frontier,
    /// Currently being expanded.
    Visiting,
    Visited,
    /// Final distance known.
    Settled,
    /// On the reconstructed path.
    Path,
}

/// One graph node as the renderer sees it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNode {
    pub label: String,
    pub status: NodeStatus,
    /// Depth for traversals, path cost for shortest paths.
    pub distance: Option<u64>,
    pub previous: Option<usize>,
}

pub(crate) fn graph_nodes(graph: &Graph) -> Vec<GraphNode> {
    graph
        .labels
        .iter()
        .map(|label| GraphNode {
            label: label.clone(),
            ..Default::default()
        })
        .collect()
}
