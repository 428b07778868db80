//! Dijkstra's shortest paths with an explicit, sorted frontier.

use algoscope_trace::{Snapshot, Trace, Tracer};
use serde::{Deserialize, Serialize};

use super::{graph_nodes, Graph, GraphNode, NodeStatus};

/// Options for [`dijkstra`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DijkstraOptions {
    /// Stop once this node settles and walk its path back to the source.
    pub target: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DijkstraEvent {
    Start { source: usize },
    InvalidSource { source: usize },
    InvalidTarget { target: usize },
    /// Minimum popped from the frontier.
    Visit { node: usize, distance: u64 },
    /// Shorter path found: `known` improved to `candidate`.
    Relax { from: usize, to: usize, known: Option<u64>, candidate: u64 },
    /// Candidate was not shorter than what is already known.
    Keep { from: usize, to: usize, known: u64, candidate: u64 },
    Settle { node: usize, distance: u64 },
    /// One hop of the walk back along `previous` pointers.
    PathHop { node: usize },
    /// Source-to-target path and its cost.
    Path { nodes: Vec<usize>, distance: u64 },
    /// The frontier emptied before the target settled.
    Unreachable { target: usize },
    /// Every reachable node settled.
    #[default]
    Done,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DijkstraView {
    pub nodes: Vec<GraphNode>,
    /// `(node, distance)` sorted by distance, ties in insertion order.
    pub frontier: Vec<(usize, u64)>,
    /// Nodes in the order they settled.
    pub settled: Vec<usize>,
    /// Path nodes collected so far, walking back from the target.
    pub path: Vec<usize>,
    pub current: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DijkstraStep {
    pub event: DijkstraEvent,
    pub view: DijkstraView,
}

impl DijkstraStep {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self.event,
            DijkstraEvent::Path { .. }
                | DijkstraEvent::Unreachable { .. }
                | DijkstraEvent::Done
                | DijkstraEvent::InvalidSource { .. }
                | DijkstraEvent::InvalidTarget { .. }
        )
    }
}

impl Snapshot for DijkstraStep {
    type State = DijkstraView;

    fn snapshot(&self) -> &DijkstraView {
        &self.view
    }
}

algoscope_trace::replay_by_snapshot!(DijkstraStep);

struct Run<'g> {
    graph: &'g Graph,
    tracer: Tracer<DijkstraStep>,
    view: DijkstraView,
}

impl Run<'_> {
    fn record(&mut self, description: String, event: DijkstraEvent) {
        self.tracer.record(
            description,
            DijkstraStep {
                event,
                view: self.view.clone(),
            },
        );
    }

    /// Queue `node` at `distance`, after any entries with an equal distance.
    fn push_frontier(&mut self, node: usize, distance: u64) {
        self.view.frontier.retain(|&(n, _)| n != node);
        let at = self.view.frontier.partition_point(|&(_, d)| d <= distance);
        self.view.frontier.insert(at, (node, distance));
    }

    fn walk_path(&mut self, target: usize) {
        let graph = self.graph;
        let distance = self.view.nodes[target].distance.unwrap_or(0);
        let mut node = Some(target);
        while let Some(current) = node {
            self.view.nodes[current].status = NodeStatus::Path;
            self.view.path.push(current);
            self.view.current = Some(current);
            let description = match self.view.nodes[current].previous {
                Some(previous) => format!(
                    "{} was reached from {}",
                    graph.label(current),
                    graph.label(previous)
                ),
                None => format!("{} is the source", graph.label(current)),
            };
            self.record(description, DijkstraEvent::PathHop { node: current });
            node = self.view.nodes[current].previous;
        }

        let nodes: Vec<usize> = self.view.path.iter().rev().copied().collect();
        let labels: Vec<String> = nodes.iter().map(|&n| graph.label(n)).collect();
        self.view.current = None;
        self.record(
            format!("Shortest path {} with cost {distance}", labels.join(" → ")),
            DijkstraEvent::Path { nodes, distance },
        );
    }
}

/// Trace Dijkstra's algorithm from `source`.
///
/// Each iteration pops the nearest frontier node, relaxes its unsettled
/// neighbours, then settles it. With a target configured the run stops as
/// soon as the target settles and walks `previous` pointers back to the
/// source one hop per step.
pub fn dijkstra(graph: &Graph, source: usize, options: &DijkstraOptions) -> Trace<DijkstraStep> {
    let mut run = Run {
        graph,
        tracer: Tracer::new("dijkstra"),
        view: DijkstraView {
            nodes: graph_nodes(graph),
            ..Default::default()
        },
    };
    let count = graph.node_count();

    if source >= count {
        let description = if count == 0 {
            "Graph is empty: no shortest paths".to_string()
        } else {
            format!("Source {source} is not a node (graph has {count})")
        };
        run.record(description, DijkstraEvent::InvalidSource { source });
        return run.tracer.finish();
    }
    if let Some(target) = options.target.filter(|&t| t >= count) {
        run.record(
            format!("Target {target} is not a node (graph has {count})"),
            DijkstraEvent::InvalidTarget { target },
        );
        return run.tracer.finish();
    }

    run.view.nodes[source].distance = Some(0);
    run.view.nodes[source].status = NodeStatus::Frontier;
    run.push_frontier(source, 0);
    run.record(
        format!("Distance to {} is 0; every other node is unknown", graph.label(source)),
        DijkstraEvent::Start { source },
    );

    while !run.view.frontier.is_empty() {
        let (node, distance) = run.view.frontier.remove(0);
        run.view.nodes[node].status = NodeStatus::Visiting;
        run.view.current = Some(node);
        run.record(
            format!("Visit {} at distance {distance}", graph.label(node)),
            DijkstraEvent::Visit { node, distance },
        );

        for (next, weight) in graph.neighbors(node) {
            if run.view.nodes[next].status == NodeStatus::Settled {
                continue;
            }
            let candidate = distance.saturating_add(weight);
            let known = run.view.nodes[next].distance;
            match known {
                Some(known) if candidate >= known => {
                    run.record(
                        format!(
                            "{} via {}: {candidate} is not shorter than {known}",
                            graph.label(next),
                            graph.label(node)
                        ),
                        DijkstraEvent::Keep {
                            from: node,
                            to: next,
                            known,
                            candidate,
                        },
                    );
                }
                _ => {
                    let entry = &mut run.view.nodes[next];
                    entry.distance = Some(candidate);
                    entry.previous = Some(node);
                    entry.status = NodeStatus::Frontier;
                    run.push_frontier(next, candidate);
                    let was = known.map_or_else(|| "∞".to_string(), |k| k.to_string());
                    run.record(
                        format!(
                            "Relax {} via {}: {was} → {candidate}",
                            graph.label(next),
                            graph.label(node)
                        ),
                        DijkstraEvent::Relax {
                            from: node,
                            to: next,
                            known,
                            candidate,
                        },
                    );
                }
            }
        }

        run.view.nodes[node].status = NodeStatus::Settled;
        run.view.settled.push(node);
        run.record(
            format!("Settle {} at distance {distance}", graph.label(node)),
            DijkstraEvent::Settle { node, distance },
        );

        if options.target == Some(node) {
            tracing::debug!(source, target = node, distance, "dijkstra reached target");
            run.walk_path(node);
            return run.tracer.finish();
        }
    }

    run.view.current = None;
    match options.target {
        Some(target) => {
            run.record(
                format!("Frontier is empty: {} is unreachable", graph.label(target)),
                DijkstraEvent::Unreachable { target },
            );
        }
        None => {
            let settled = run.view.settled.len();
            run.record(
                format!("Frontier is empty: {settled} nodes settled"),
                DijkstraEvent::Done,
            );
        }
    }
    tracing::debug!(source, settled = run.view.settled.len(), "dijkstra traced");
    run.tracer.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn roads() -> Graph {
        Graph::with_edges(
            ["a", "b", "c", "d", "e"],
            true,
            &[(0, 1, 4), (0, 2, 2), (2, 1, 1), (1, 3, 5), (2, 3, 8), (3, 4, 3)],
        )
        .unwrap()
    }

    #[test]
    fn shortest_path_is_walked_back_from_target() {
        let trace = dijkstra(&roads(), 0, &DijkstraOptions { target: Some(4) });

        let hops: Vec<_> = trace
            .iter()
            .filter_map(|s| match s.payload.event {
                DijkstraEvent::PathHop { node } => Some(node),
                _ => None,
            })
            .collect();
        assert_eq!(hops, vec![4, 3, 1, 2, 0]);

        assert_eq!(
            trace.last().payload.event,
            DijkstraEvent::Path {
                nodes: vec![0, 2, 1, 3, 4],
                distance: 11,
            }
        );
    }

    #[test]
    fn relaxation_requires_strict_improvement() {
        let trace = dijkstra(&roads(), 0, &DijkstraOptions::default());
        assert!(trace.iter().any(|s| s.payload.event
            == DijkstraEvent::Relax {
                from: 2,
                to: 1,
                known: Some(4),
                candidate: 3,
            }));
        assert!(trace.iter().any(|s| s.payload.event
            == DijkstraEvent::Relax {
                from: 1,
                to: 3,
                known: Some(10),
                candidate: 8,
            }));
        assert_eq!(trace.last().payload.view.settled, vec![0, 2, 1, 3, 4]);

        let detour = Graph::with_edges(["s", "x", "y"], true, &[(0, 1, 1), (0, 2, 5), (1, 2, 10)]).unwrap();
        let trace = dijkstra(&detour, 0, &DijkstraOptions::default());
        assert!(trace.iter().any(|s| s.payload.event
            == DijkstraEvent::Keep {
                from: 1,
                to: 2,
                known: 5,
                candidate: 11,
            }));
        assert_eq!(trace.last().payload.view.nodes[2].previous, Some(0));
    }

    #[test]
    fn early_exit_leaves_farther_nodes_unsettled() {
        let trace = dijkstra(&roads(), 0, &DijkstraOptions { target: Some(1) });
        let view = &trace.last().payload.view;
        assert_eq!(view.settled, vec![0, 2, 1]);
        assert_ne!(view.nodes[3].status, NodeStatus::Settled);
    }

    #[test]
    fn frontier_ties_keep_insertion_order() {
        let graph = Graph::with_edges(["s", "x", "y"], true, &[(0, 2, 1), (0, 1, 1)]).unwrap();
        let trace = dijkstra(&graph, 0, &DijkstraOptions::default());
        let settled = &trace.last().payload.view.settled;
        assert_eq!(settled, &vec![0, 2, 1]);
    }

    #[test]
    fn unreachable_target_is_terminal() {
        let trace = dijkstra(&roads(), 3, &DijkstraOptions { target: Some(0) });
        assert_eq!(trace.last().payload.event, DijkstraEvent::Unreachable { target: 0 });
        assert!(trace.last().payload.is_terminal());
    }

    #[test]
    fn invalid_endpoints_are_explained() {
        let source = dijkstra(&roads(), 10, &DijkstraOptions::default());
        assert_eq!(source.len(), 1);
        let target = dijkstra(&roads(), 0, &DijkstraOptions { target: Some(10) });
        assert_eq!(target.last().payload.event, DijkstraEvent::InvalidTarget { target: 10 });
    }

    fn bellman_ford(n: usize, edges: &[(usize, usize, u64)], source: usize) -> Vec<Option<u64>> {
        let mut dist = vec![None; n];
        dist[source] = Some(0);
        for _ in 0..n {
            for &(from, to, w) in edges {
                if let Some(d) = dist[from] {
                    if dist[to].map_or(true, |known| d + w < known) {
                        dist[to] = Some(d + w);
                    }
                }
            }
        }
        dist
    }

    proptest! {
        #[test]
        fn distances_match_bellman_ford(
            n in 1usize..8,
            raw in proptest::collection::vec((0usize..8, 0usize..8, 0u64..20), 0..20),
        ) {
            let edges: Vec<_> = raw.into_iter().map(|(a, b, w)| (a % n, b % n, w)).collect();
            let labels: Vec<String> = (0..n).map(|i| i.to_string()).collect();
            let graph = Graph::with_edges(labels, true, &edges).unwrap();

            let trace = dijkstra(&graph, 0, &DijkstraOptions::default());
            let found: Vec<_> = trace.last().payload.view.nodes.iter().map(|node| node.distance).collect();
            prop_assert_eq!(found, bellman_ford(n, &edges, 0));
        }
    }
}
