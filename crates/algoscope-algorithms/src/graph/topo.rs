//! Kahn's topological sort.

use std::collections::VecDeque;

use algoscope_trace::{Snapshot, Trace, Tracer};
use serde::{Deserialize, Serialize};

use super::Graph;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Still has unprocessed prerequisites.
    #[default]
    Waiting,
    /// Indegree reached zero; sitting in the queue.
    Ready,
    Processing,
    Done,
    /// Left over when the queue ran dry: part of, or behind, a cycle.
    Blocked,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskNode {
    pub label: String,
    /// Prerequisites not yet emitted.
    pub indegree: usize,
    pub status: TaskStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TopoEvent {
    /// Queue seeded with every zero-indegree node.
    Start { ready: Vec<usize> },
    Dequeue { node: usize },
    /// Edge `from -> to` consumed; `enqueued` when `to` became ready.
    Decrement { from: usize, to: usize, indegree: usize, enqueued: bool },
    Complete,
    /// Queue emptied with `remaining` nodes never emitted.
    Cycle { remaining: Vec<usize> },
    #[default]
    Empty,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopoStep {
    pub event: TopoEvent,
    pub tasks: Vec<TaskNode>,
    pub queue: Vec<usize>,
    /// Emitted order so far.
    pub result: Vec<usize>,
    pub has_cycle: bool,
}

impl Snapshot for TopoStep {
    type State = TopoStep;

    fn snapshot(&self) -> &Self::State {
        self
    }
}

algoscope_trace::replay_by_snapshot!(TopoStep);

/// Trace Kahn's algorithm.
///
/// Edges are read as written, `from` before `to`, whether or not the graph
/// is flagged directed. Every dequeue and every edge decrement is one step,
/// so with the opening and closing steps a trace has at most `V + E + 2`
/// steps. If the queue empties before every node is emitted the run ends on
/// a cycle step with `has_cycle` set.
pub fn topological_sort(graph: &Graph) -> Trace<TopoStep> {
    let mut tracer = Tracer::new("topological_sort");
    let count = graph.node_count();
    if count == 0 {
        tracer.record("Graph is empty: the empty order is trivially valid", TopoStep::default());
        return tracer.finish();
    }

    let mut successors = vec![Vec::new(); count];
    let mut tasks: Vec<TaskNode> = graph
        .labels()
        .iter()
        .map(|label| TaskNode {
            label: label.clone(),
            ..Default::default()
        })
        .collect();
    for edge in graph.edges() {
        successors[edge.from].push(edge.to);
        tasks[edge.to].indegree += 1;
    }

    let mut queue: VecDeque<usize> = (0..count).filter(|&n| tasks[n].indegree == 0).collect();
    for &n in &queue {
        tasks[n].status = TaskStatus::Ready;
    }
    let mut result = Vec::with_capacity(count);

    let ready: Vec<usize> = queue.iter().copied().collect();
    let names: Vec<String> = ready.iter().map(|&n| graph.label(n)).collect();
    tracer.record(
        format!("Queue every node without prerequisites: [{}]", names.join(", ")),
        snapshot(TopoEvent::Start { ready }, &tasks, &queue, &result, false),
    );

    while let Some(node) = queue.pop_front() {
        tasks[node].status = TaskStatus::Processing;
        result.push(node);
        tracer.record(
            format!("Dequeue {} and append it to the order", graph.label(node)),
            snapshot(TopoEvent::Dequeue { node }, &tasks, &queue, &result, false),
        );

        for &next in &successors[node] {
            let task = &mut tasks[next];
            task.indegree -= 1;
            let indegree = task.indegree;
            let enqueued = indegree == 0;
            let description = if enqueued {
                task.status = TaskStatus::Ready;
                queue.push_back(next);
                format!("{} has no prerequisites left: enqueue it", graph.label(next))
            } else {
                format!("{} still waits on {indegree} prerequisite(s)", graph.label(next))
            };
            tracer.record(
                description,
                snapshot(
                    TopoEvent::Decrement {
                        from: node,
                        to: next,
                        indegree,
                        enqueued,
                    },
                    &tasks,
                    &queue,
                    &result,
                    false,
                ),
            );
        }
        tasks[node].status = TaskStatus::Done;
    }

    if result.len() == count {
        let names: Vec<String> = result.iter().map(|&n| graph.label(n)).collect();
        tracer.record(
            format!("Topological order: {}", names.join(" → ")),
            snapshot(TopoEvent::Complete, &tasks, &queue, &result, false),
        );
    } else {
        let remaining: Vec<usize> = (0..count).filter(|&n| tasks[n].status == TaskStatus::Waiting).collect();
        for &n in &remaining {
            tasks[n].status = TaskStatus::Blocked;
        }
        let names: Vec<String> = remaining.iter().map(|&n| graph.label(n)).collect();
        tracer.record(
            format!("Queue is empty but [{}] still wait: the graph has a cycle", names.join(", ")),
            snapshot(TopoEvent::Cycle { remaining }, &tasks, &queue, &result, true),
        );
    }

    tracing::debug!(nodes = count, emitted = result.len(), "topological sort traced");
    tracer.finish()
}

fn snapshot(
    event: TopoEvent,
    tasks: &[TaskNode],
    queue: &VecDeque<usize>,
    result: &[usize],
    has_cycle: bool,
) -> TopoStep {
    TopoStep {
        event,
        tasks: tasks.to_vec(),
        queue: queue.iter().copied().collect(),
        result: result.to_vec(),
        has_cycle,
    }
}
