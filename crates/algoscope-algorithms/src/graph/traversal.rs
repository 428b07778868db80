//! Breadth-first and depth-first traversal.

use std::collections::VecDeque;

use algoscope_trace::{Snapshot, Trace, Tracer};
use serde::{Deserialize, Serialize};

use super::{graph_nodes, Graph, GraphNode, NodeStatus};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TraversalEvent {
    Start { source: usize },
    /// Source is not a node of the graph.
    InvalidSource { source: usize },
    /// BFS: node taken from the front of the queue.
    Dequeue { node: usize },
    /// BFS: unseen neighbour queued one level deeper.
    Discover { node: usize, parent: usize, depth: u64 },
    /// Neighbour skipped because it was reached before.
    AlreadySeen { node: usize, from: usize },
    /// DFS: recursion entered `node`.
    Enter { node: usize, depth: u64 },
    /// DFS: edge followed to an unseen neighbour.
    Explore { from: usize, to: usize },
    /// DFS: every neighbour of `node` handled.
    Finish { node: usize },
    #[default]
    Done,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraversalView {
    pub nodes: Vec<GraphNode>,
    /// BFS queue front to back, or DFS recursion stack bottom to top.
    pub frontier: Vec<usize>,
    /// Nodes in visit order.
    pub order: Vec<usize>,
    pub current: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraversalStep {
    pub event: TraversalEvent,
    pub view: TraversalView,
}

impl Snapshot for TraversalStep {
    type State = TraversalView;

    fn snapshot(&self) -> &TraversalView {
        &self.view
    }
}

algoscope_trace::replay_by_snapshot!(TraversalStep);

struct Walk<'g> {
    graph: &'g Graph,
    tracer: Tracer<TraversalStep>,
    view: TraversalView,
}

impl<'g> Walk<'g> {
    /// Set up the walk, or return the finished single-step trace when the
    /// source is not a node.
    fn start(algorithm: &'static str, graph: &'g Graph, source: usize) -> Result<Self, Trace<TraversalStep>> {
        let mut walk = Self {
            graph,
            tracer: Tracer::new(algorithm),
            view: TraversalView {
                nodes: graph_nodes(graph),
                ..Default::default()
            },
        };
        if source >= graph.node_count() {
            let description = if graph.node_count() == 0 {
                "Graph is empty: nothing to traverse".to_string()
            } else {
                format!("Source {source} is not a node (graph has {})", graph.node_count())
            };
            walk.record(description, TraversalEvent::InvalidSource { source });
            return Err(walk.tracer.finish());
        }
        Ok(walk)
    }

    fn record(&mut self, description: String, event: TraversalEvent) {
        self.tracer.record(
            description,
            TraversalStep {
                event,
                view: self.view.clone(),
            },
        );
    }

    fn finish(mut self) -> Trace<TraversalStep> {
        self.view.current = None;
        let order: Vec<String> = self.view.order.iter().map(|&n| self.graph.label(n)).collect();
        let description = format!("Done: visit order {}", order.join(" → "));
        self.record(description, TraversalEvent::Done);
        self.tracer.finish()
    }
}

/// Trace a breadth-first traversal from `source`.
///
/// Neighbours are discovered in adjacency order and queued with their depth.
/// A node is expanded when it leaves the front of the queue.
pub fn bfs(graph: &Graph, source: usize) -> Trace<TraversalStep> {
    let mut walk = match Walk::start("bfs", graph, source) {
        Ok(walk) => walk,
        Err(trace) => return trace,
    };

    let mut queue = VecDeque::from([source]);
    walk.view.nodes[source].status = NodeStatus::Frontier;
    walk.view.nodes[source].distance = Some(0);
    walk.view.frontier = vec![source];
    walk.record(
        format!("Queue source {} at depth 0", graph.label(source)),
        TraversalEvent::Start { source },
    );

    while let Some(node) = queue.pop_front() {
        let depth = walk.view.nodes[node].distance.unwrap_or(0);
        walk.view.nodes[node].status = NodeStatus::Visiting;
        walk.view.order.push(node);
        walk.view.current = Some(node);
        walk.view.frontier = queue.iter().copied().collect();
        walk.record(
            format!("Dequeue {} (depth {depth})", graph.label(node)),
            TraversalEvent::Dequeue { node },
        );

        for (next, _) in graph.neighbors(node) {
            if walk.view.nodes[next].status == NodeStatus::Unvisited {
                let node_view = &mut walk.view.nodes[next];
                node_view.status = NodeStatus::Frontier;
                node_view.distance = Some(depth + 1);
                node_view.previous = Some(node);
                queue.push_back(next);
                walk.view.frontier = queue.iter().copied().collect();
                walk.record(
                    format!(
                        "Discover {} from {}, depth {}",
                        graph.label(next),
                        graph.label(node),
                        depth + 1
                    ),
                    TraversalEvent::Discover {
                        node: next,
                        parent: node,
                        depth: depth + 1,
                    },
                );
            } else {
                walk.record(
                    format!("{} was already reached, skip", graph.label(next)),
                    TraversalEvent::AlreadySeen { node: next, from: node },
                );
            }
        }
        walk.view.nodes[node].status = NodeStatus::Visited;
    }

    tracing::debug!(nodes = graph.node_count(), visited = walk.view.order.len(), "bfs traced");
    walk.finish()
}

/// Trace a depth-first traversal from `source`.
///
/// Entering a node, following an edge to an unseen neighbour, and finishing
/// a node are separate steps. The recursion stack is kept on the heap, so
/// long paths do not exhaust the thread stack.
pub fn dfs(graph: &Graph, source: usize) -> Trace<TraversalStep> {
    let mut walk = match Walk::start("dfs", graph, source) {
        Ok(walk) => walk,
        Err(trace) => return trace,
    };
    walk.record(
        format!("Start depth-first search at {}", graph.label(source)),
        TraversalEvent::Start { source },
    );

    let mut stack = vec![enter(&mut walk, source, 0)];
    while let Some(frame) = stack.last_mut() {
        let Some(&next) = frame.neighbors.get(frame.next) else {
            let node = frame.node;
            stack.pop();
            walk.view.nodes[node].status = NodeStatus::Visited;
            walk.view.frontier.pop();
            walk.record(format!("Finish {}", graph.label(node)), TraversalEvent::Finish { node });
            walk.view.current = stack.last().map(|parent| parent.node);
            continue;
        };
        frame.next += 1;
        let (node, depth) = (frame.node, frame.depth);

        if walk.view.nodes[next].status == NodeStatus::Unvisited {
            walk.view.nodes[next].previous = Some(node);
            walk.record(
                format!("Follow {} → {}", graph.label(node), graph.label(next)),
                TraversalEvent::Explore { from: node, to: next },
            );
            let entered = enter(&mut walk, next, depth + 1);
            stack.push(entered);
        } else {
            walk.record(
                format!("{} was already reached, skip", graph.label(next)),
                TraversalEvent::AlreadySeen { node: next, from: node },
            );
        }
    }

    tracing::debug!(nodes = graph.node_count(), visited = walk.view.order.len(), "dfs traced");
    walk.finish()
}

/// A node on the DFS stack and the neighbours it has left to try.
struct Frame {
    node: usize,
    depth: u64,
    neighbors: Vec<usize>,
    next: usize,
}

fn enter(walk: &mut Walk<'_>, node: usize, depth: u64) -> Frame {
    walk.view.nodes[node].status = NodeStatus::Visiting;
    walk.view.nodes[node].distance = Some(depth);
    walk.view.order.push(node);
    walk.view.frontier.push(node);
    walk.view.current = Some(node);
    walk.record(
        format!("Enter {} at depth {depth}", walk.graph.label(node)),
        TraversalEvent::Enter { node, depth },
    );
    Frame {
        node,
        depth,
        neighbors: walk.graph.neighbors(node).into_iter().map(|(next, _)| next).collect(),
        next: 0,
    }
}
