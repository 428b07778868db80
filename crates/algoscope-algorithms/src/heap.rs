//! Binary heap with traced push, pop and build.

use algoscope_trace::{Snapshot, Trace, Tracer};
use serde::{Deserialize, Serialize};

/// Heap orientation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeapKind {
    #[default]
    Max,
    Min,
}

impl HeapKind {
    /// Whether `a` must sit strictly above `b`.
    #[inline]
    pub fn above(self, a: i64, b: i64) -> bool {
        match self {
            HeapKind::Max => a > b,
            HeapKind::Min => a < b,
        }
    }

    fn label(self) -> &'static str {
        match self {
            HeapKind::Max => "max",
            HeapKind::Min => "min",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeapNodeStatus {
    #[default]
    Default,
    Comparing,
    Swapping,
    /// Just appended or moved to the root.
    Active,
    /// Leaving the heap.
    Removed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeapNode {
    pub index: usize,
    pub value: i64,
    pub status: HeapNodeStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HeapEvent {
    /// Heap contents before the operation.
    #[default]
    Start,
    Append { index: usize, value: i64 },
    /// Sift-up: node compared with its direct parent.
    CompareParent { child: usize, parent: usize },
    /// Sift-down: node compared with its children; `chosen` is the more
    /// extreme child.
    CompareChildren { node: usize, left: usize, right: Option<usize>, chosen: usize },
    Swap { a: usize, b: usize },
    /// Heap order holds at `index`; sifting stops.
    InPlace { index: usize },
    TakeRoot { value: i64 },
    MoveLastToRoot { value: i64 },
    /// Build: sift down starting at `index`.
    Heapify { index: usize },
    /// Pop from an empty heap.
    Empty,
    Done,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeapStep {
    pub event: HeapEvent,
    pub kind: HeapKind,
    /// Array layout: children of `i` live at `2i + 1` and `2i + 2`.
    pub nodes: Vec<HeapNode>,
}

impl Snapshot for HeapStep {
    type State = HeapStep;

    fn snapshot(&self) -> &Self::State {
        self
    }
}

algoscope_trace::replay_by_snapshot!(HeapStep);

/// A binary heap whose operations return traces.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TracedHeap {
    kind: HeapKind,
    values: Vec<i64>,
}

impl TracedHeap {
    pub fn new(kind: HeapKind) -> Self {
        Self {
            kind,
            values: Vec::new(),
        }
    }

    /// Heapify `values` bottom-up.
    pub fn build(kind: HeapKind, values: &[i64]) -> (Self, Trace<HeapStep>) {
        let mut heap = Self {
            kind,
            values: values.to_vec(),
        };
        let mut tracer = Tracer::new("heap_build");
        heap.record(
            &mut tracer,
            format!("Build a {}-heap from {} values", kind.label(), values.len()),
            HeapEvent::Start,
            &[],
        );
        for index in (0..heap.values.len() / 2).rev() {
            heap.record(
                &mut tracer,
                format!("Heapify the subtree rooted at {index}"),
                HeapEvent::Heapify { index },
                &[(index, HeapNodeStatus::Active)],
            );
            heap.sift_down(index, &mut tracer);
        }
        heap.record(&mut tracer, format!("{}-heap built", kind.label()), HeapEvent::Done, &[]);
        tracing::debug!(n = values.len(), kind = kind.label(), "heap build traced");
        (heap, tracer.finish())
    }

    pub fn kind(&self) -> HeapKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn peek(&self) -> Option<i64> {
        self.values.first().copied()
    }

    pub fn values(&self) -> &[i64] {
        &self.values
    }

    /// Append `value` and sift it up.
    pub fn push(&mut self, value: i64) -> Trace<HeapStep> {
        let mut tracer = Tracer::new("heap_push");
        self.record(&mut tracer, format!("Push {value}"), HeapEvent::Start, &[]);
        self.values.push(value);
        let index = self.values.len() - 1;
        self.record(
            &mut tracer,
            format!("Append {value} at index {index}"),
            HeapEvent::Append { index, value },
            &[(index, HeapNodeStatus::Active)],
        );
        self.sift_up(index, &mut tracer);
        self.record(&mut tracer, format!("Pushed {value}"), HeapEvent::Done, &[]);
        tracer.finish()
    }

    /// Remove the root, move the last node up and sift it down.
    pub fn pop(&mut self) -> (Option<i64>, Trace<HeapStep>) {
        let mut tracer = Tracer::new("heap_pop");
        let Some(&top) = self.values.first() else {
            self.record(&mut tracer, "Heap is empty: nothing to pop".to_string(), HeapEvent::Empty, &[]);
            return (None, tracer.finish());
        };

        self.record(
            &mut tracer,
            format!("Take the root {top}"),
            HeapEvent::TakeRoot { value: top },
            &[(0, HeapNodeStatus::Removed)],
        );
        let last = self.values.pop();
        if let (Some(last), false) = (last, self.values.is_empty()) {
            self.values[0] = last;
            self.record(
                &mut tracer,
                format!("Move the last node {last} to the root"),
                HeapEvent::MoveLastToRoot { value: last },
                &[(0, HeapNodeStatus::Active)],
            );
            self.sift_down(0, &mut tracer);
        }
        self.record(&mut tracer, format!("Popped {top}"), HeapEvent::Done, &[]);
        (Some(top), tracer.finish())
    }

    fn sift_up(&mut self, mut index: usize, tracer: &mut Tracer<HeapStep>) {
        while index > 0 {
            let parent = (index - 1) / 2;
            self.record(
                tracer,
                format!(
                    "Compare {} at {index} with parent {} at {parent}",
                    self.values[index], self.values[parent]
                ),
                HeapEvent::CompareParent { child: index, parent },
                &[(index, HeapNodeStatus::Comparing), (parent, HeapNodeStatus::Comparing)],
            );
            if !self.kind.above(self.values[index], self.values[parent]) {
                self.record(
                    tracer,
                    format!("{} may sit under {}: stop", self.values[index], self.values[parent]),
                    HeapEvent::InPlace { index },
                    &[],
                );
                return;
            }
            self.values.swap(index, parent);
            self.record(
                tracer,
                format!("Swap {} up to {parent}", self.values[parent]),
                HeapEvent::Swap { a: index, b: parent },
                &[(index, HeapNodeStatus::Swapping), (parent, HeapNodeStatus::Swapping)],
            );
            index = parent;
        }
        self.record(
            tracer,
            format!("{} reached the root", self.values[0]),
            HeapEvent::InPlace { index: 0 },
            &[],
        );
    }

    fn sift_down(&mut self, mut index: usize, tracer: &mut Tracer<HeapStep>) {
        let n = self.values.len();
        loop {
            let left = 2 * index + 1;
            if left >= n {
                self.record(
                    tracer,
                    format!("{} at {index} is a leaf: stop", self.values[index]),
                    HeapEvent::InPlace { index },
                    &[],
                );
                return;
            }
            let right = (left + 1 < n).then_some(left + 1);
            // Left wins ties.
            let chosen = match right {
                Some(r) if self.kind.above(self.values[r], self.values[left]) => r,
                _ => left,
            };
            let mut highlight = vec![(index, HeapNodeStatus::Comparing), (left, HeapNodeStatus::Comparing)];
            if let Some(r) = right {
                highlight.push((r, HeapNodeStatus::Comparing));
            }
            self.record(
                tracer,
                format!(
                    "Compare {} at {index} with its children; {} at {chosen} is the {} child",
                    self.values[index],
                    self.values[chosen],
                    if self.kind == HeapKind::Max { "larger" } else { "smaller" }
                ),
                HeapEvent::CompareChildren {
                    node: index,
                    left,
                    right,
                    chosen,
                },
                &highlight,
            );

            if !self.kind.above(self.values[chosen], self.values[index]) {
                self.record(
                    tracer,
                    format!("{} may stay above its children: stop", self.values[index]),
                    HeapEvent::InPlace { index },
                    &[],
                );
                return;
            }
            self.values.swap(index, chosen);
            self.record(
                tracer,
                format!("Swap {} down to {chosen}", self.values[chosen]),
                HeapEvent::Swap { a: index, b: chosen },
                &[(index, HeapNodeStatus::Swapping), (chosen, HeapNodeStatus::Swapping)],
            );
            index = chosen;
        }
    }

    fn record(
        &self,
        tracer: &mut Tracer<HeapStep>,
        description: String,
        event: HeapEvent,
        highlight: &[(usize, HeapNodeStatus)],
    ) {
        let mut nodes: Vec<HeapNode> = self
            .values
            .iter()
            .enumerate()
            .map(|(index, &value)| HeapNode {
                index,
                value,
                status: HeapNodeStatus::Default,
            })
            .collect();
        for &(index, status) in highlight {
            if let Some(node) = nodes.get_mut(index) {
                node.status = status;
            }
        }
        tracer.record(
            description,
            HeapStep {
                event,
                kind: self.kind,
                nodes,
            },
        );
    }
}
