//! Disjoint-set forest with traced `find` and `union`.
//!
//! [`DisjointSet`] owns its `parent` and `rank` arrays and mutates them in
//! place; every call returns the trace of what it did. [`run`] replays a
//! whole operation list into one trace.

use algoscope_trace::{Snapshot, Trace, Tracer};
use serde::{Deserialize, Serialize};

/// Options for [`DisjointSet`] and [`run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnionFindOptions {
    /// Repoint every node visited by `find` at the root it found.
    pub path_compression: bool,
    /// Attach the shallower tree under the deeper one.
    pub union_by_rank: bool,
}

impl Default for UnionFindOptions {
    fn default() -> Self {
        Self {
            path_compression: true,
            union_by_rank: true,
        }
    }
}

/// One operation for [`run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum UnionFindOp {
    Find { node: usize },
    Union { a: usize, b: usize },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UnionFindEvent {
    /// Every node is its own root.
    #[default]
    Init,
    /// `find` reached `node` while walking up.
    Visit { node: usize },
    RootFound { node: usize, root: usize },
    /// `node` now points straight at `root`.
    Compress { node: usize, root: usize },
    /// Root `child` attached under root `parent`.
    Link { child: usize, parent: usize, rank_increased: bool },
    /// Both nodes already share `root`; nothing changes.
    SameSet { a: usize, b: usize, root: usize },
    OutOfRange { node: usize },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnionFindStep {
    pub event: UnionFindEvent,
    pub parent: Vec<usize>,
    pub rank: Vec<u32>,
    /// Nodes to draw highlighted.
    pub highlight: Vec<usize>,
}

impl Snapshot for UnionFindStep {
    type State = UnionFindStep;

    fn snapshot(&self) -> &Self::State {
        self
    }
}

algoscope_trace::replay_by_snapshot!(UnionFindStep);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisjointSet {
    parent: Vec<usize>,
    rank: Vec<u32>,
    options: UnionFindOptions,
}

impl DisjointSet {
    /// `size` singleton sets.
    pub fn new(size: usize, options: UnionFindOptions) -> Self {
        Self {
            parent: (0..size).collect(),
            rank: vec![0; size],
            options,
        }
    }

    pub fn len(&self) -> usize {
        self.parent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    pub fn parent(&self) -> &[usize] {
        &self.parent
    }

    pub fn rank(&self) -> &[u32] {
        &self.rank
    }

    /// Root of `node` without modifying the forest.
    pub fn root_of(&self, node: usize) -> Option<usize> {
        if node >= self.len() {
            return None;
        }
        let mut current = node;
        while self.parent[current] != current {
            current = self.parent[current];
        }
        Some(current)
    }

    /// Find the root of `node`, compressing its path when enabled.
    pub fn find(&mut self, node: usize) -> (Option<usize>, Trace<UnionFindStep>) {
        let mut tracer = Tracer::new("union_find");
        let root = self.traced_find(node, &mut tracer);
        (root, tracer.finish())
    }

    /// Merge the sets holding `a` and `b`. Returns whether anything changed.
    pub fn union(&mut self, a: usize, b: usize) -> (bool, Trace<UnionFindStep>) {
        let mut tracer = Tracer::new("union_find");
        let merged = self.traced_union(a, b, &mut tracer);
        (merged, tracer.finish())
    }

    fn record(&self, tracer: &mut Tracer<UnionFindStep>, description: String, event: UnionFindEvent, highlight: Vec<usize>) {
        tracer.record(
            description,
            UnionFindStep {
                event,
                parent: self.parent.clone(),
                rank: self.rank.clone(),
                highlight,
            },
        );
    }

    fn traced_find(&mut self, node: usize, tracer: &mut Tracer<UnionFindStep>) -> Option<usize> {
        if node >= self.len() {
            self.record(
                tracer,
                format!("Node {node} is outside 0..{}", self.len()),
                UnionFindEvent::OutOfRange { node },
                Vec::new(),
            );
            return None;
        }

        let mut path = vec![node];
        self.record(tracer, format!("find({node}): start at {node}"), UnionFindEvent::Visit { node }, path.clone());
        let mut current = node;
        while self.parent[current] != current {
            current = self.parent[current];
            path.push(current);
            self.record(
                tracer,
                format!("Follow parent pointer to {current}"),
                UnionFindEvent::Visit { node: current },
                path.clone(),
            );
        }
        let root = current;
        self.record(
            tracer,
            format!("{root} is its own parent: root of {node} is {root}"),
            UnionFindEvent::RootFound { node, root },
            vec![root],
        );

        if self.options.path_compression {
            for &visited in &path[..path.len() - 1] {
                if self.parent[visited] == root {
                    continue;
                }
                self.parent[visited] = root;
                self.record(
                    tracer,
                    format!("Compress: point {visited} straight at {root}"),
                    UnionFindEvent::Compress { node: visited, root },
                    vec![visited, root],
                );
            }
        }
        Some(root)
    }

    fn traced_union(&mut self, a: usize, b: usize, tracer: &mut Tracer<UnionFindStep>) -> bool {
        let (Some(root_a), Some(root_b)) = (self.traced_find(a, tracer), self.traced_find(b, tracer)) else {
            return false;
        };
        if root_a == root_b {
            self.record(
                tracer,
                format!("{a} and {b} already share root {root_a}: nothing to merge"),
                UnionFindEvent::SameSet { a, b, root: root_a },
                vec![root_a],
            );
            return false;
        }

        let (child, parent, rank_increased) = if !self.options.union_by_rank {
            (root_a, root_b, false)
        } else if self.rank[root_a] < self.rank[root_b] {
            (root_a, root_b, false)
        } else if self.rank[root_a] > self.rank[root_b] {
            (root_b, root_a, false)
        } else {
            (root_a, root_b, true)
        };
        self.parent[child] = parent;
        if rank_increased {
            self.rank[parent] += 1;
        }

        let description = if rank_increased {
            format!("Equal ranks: attach {child} under {parent}, rank of {parent} becomes {}", self.rank[parent])
        } else {
            format!("Attach root {child} under root {parent}")
        };
        self.record(
            tracer,
            description,
            UnionFindEvent::Link {
                child,
                parent,
                rank_increased,
            },
            vec![child, parent],
        );
        true
    }
}

/// Trace a sequence of operations on `size` singleton sets.
///
/// Out-of-range nodes produce an explanatory step and the operation is
/// skipped; later operations still run.
pub fn run(size: usize, ops: &[UnionFindOp], options: &UnionFindOptions) -> Trace<UnionFindStep> {
    let mut set = DisjointSet::new(size, *options);
    let mut tracer = Tracer::new("union_find");
    set.record(
        &mut tracer,
        format!("{size} singleton sets: every node is its own root"),
        UnionFindEvent::Init,
        Vec::new(),
    );

    let mut merges = 0;
    for op in ops {
        match *op {
            UnionFindOp::Find { node } => {
                set.traced_find(node, &mut tracer);
            }
            UnionFindOp::Union { a, b } => {
                if set.traced_union(a, b, &mut tracer) {
                    merges += 1;
                }
            }
        }
    }

    tracing::debug!(size, ops = ops.len(), merges, "union-find traced");
    tracer.finish()
}
