//! Binary search tree construction and depth-first traversals.

use algoscope_trace::{Fold, Trace, Tracer};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraversalOrder {
    #[default]
    InOrder,
    PreOrder,
    PostOrder,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BstOptions {
    pub order: TraversalOrder,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BstNode {
    pub value: i64,
    pub left: Option<usize>,
    pub right: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BstStep {
    /// New node appended to the arena, hung under `parent`.
    Insert { value: i64, parent: Option<(usize, Side)> },
    /// Value already present; the tree keeps one copy.
    Duplicate { value: i64 },
    /// Traversal entered `node`.
    Visit { node: usize },
    /// Traversal emitted `node`'s value.
    Process { node: usize },
    Done,
    #[default]
    Empty,
}

/// Tree and traversal progress rebuilt by folding [`BstStep`]s.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BstState {
    pub nodes: Vec<BstNode>,
    pub root: Option<usize>,
    pub visited: Vec<bool>,
    /// Values emitted so far.
    pub output: Vec<i64>,
    pub current: Option<usize>,
}

impl Fold for BstStep {
    type State = BstState;

    fn apply(&self, state: &mut BstState) {
        match *self {
            BstStep::Insert { value, parent } => {
                let index = state.nodes.len();
                state.nodes.push(BstNode {
                    value,
                    left: None,
                    right: None,
                });
                state.visited.push(false);
                match parent {
                    Some((p, Side::Left)) => state.nodes[p].left = Some(index),
                    Some((p, Side::Right)) => state.nodes[p].right = Some(index),
                    None => state.root = Some(index),
                }
                state.current = Some(index);
            }
            BstStep::Duplicate { .. } => {}
            BstStep::Visit { node } => {
                state.visited[node] = true;
                state.current = Some(node);
            }
            BstStep::Process { node } => {
                state.output.push(state.nodes[node].value);
                state.current = Some(node);
            }
            BstStep::Done | BstStep::Empty => state.current = None,
        }
    }
}

algoscope_trace::replay_by_fold!(BstStep);

struct Walker<'a> {
    nodes: &'a [BstNode],
    order: TraversalOrder,
    tracer: &'a mut Tracer<BstStep>,
    output: Vec<i64>,
}

/// Where a node on the walk stack is within its visit.
#[derive(Clone, Copy)]
enum Stage {
    Enter,
    BetweenChildren,
    Leave,
}

impl Walker<'_> {
    /// Depth-first walk from `root` with the stack on the heap, so a
    /// degenerate tree built from sorted input walks in constant thread stack.
    fn walk(&mut self, root: usize) {
        let mut stack = vec![(root, Stage::Enter)];
        while let Some((node, stage)) = stack.pop() {
            let BstNode { value, left, right } = self.nodes[node];
            match stage {
                Stage::Enter => {
                    self.tracer.record(format!("Visit {value}"), BstStep::Visit { node });
                    if self.order == TraversalOrder::PreOrder {
                        self.process(node);
                    }
                    stack.push((node, Stage::BetweenChildren));
                    if let Some(left) = left {
                        stack.push((left, Stage::Enter));
                    }
                }
                Stage::BetweenChildren => {
                    if self.order == TraversalOrder::InOrder {
                        self.process(node);
                    }
                    stack.push((node, Stage::Leave));
                    if let Some(right) = right {
                        stack.push((right, Stage::Enter));
                    }
                }
                Stage::Leave => {
                    if self.order == TraversalOrder::PostOrder {
                        self.process(node);
                    }
                }
            }
        }
    }

    fn process(&mut self, node: usize) {
        let value = self.nodes[node].value;
        self.output.push(value);
        self.tracer.record(
            format!("Output {value} (position {})", self.output.len()),
            BstStep::Process { node },
        );
    }
}

/// Trace building a BST by insertion, then one depth-first traversal.
///
/// Visiting a node and emitting its value are separate steps, so the three
/// orders differ only in where the emit step falls around the child visits.
pub fn bst_traversal(values: &[i64], options: &BstOptions) -> Trace<BstStep> {
    let mut tracer = Tracer::new("bst_traversal");
    if values.is_empty() {
        tracer.record("No values: the tree is empty", BstStep::Empty);
        return tracer.finish();
    }

    let mut nodes: Vec<BstNode> = Vec::with_capacity(values.len());
    for &value in values {
        let mut parent = None;
        let mut cursor = (!nodes.is_empty()).then_some(0);
        let mut duplicate = false;
        while let Some(at) = cursor {
            let node = nodes[at];
            if value == node.value {
                duplicate = true;
                break;
            }
            let side = if value < node.value { Side::Left } else { Side::Right };
            parent = Some((at, side));
            cursor = match side {
                Side::Left => node.left,
                Side::Right => node.right,
            };
        }

        if duplicate {
            tracer.record(format!("{value} is already in the tree: skip"), BstStep::Duplicate { value });
            continue;
        }
        let index = nodes.len();
        nodes.push(BstNode {
            value,
            left: None,
            right: None,
        });
        let description = match parent {
            None => format!("{value} becomes the root"),
            Some((p, side)) => {
                let parent_node = &mut nodes[p];
                let name = match side {
                    Side::Left => {
                        parent_node.left = Some(index);
                        "left"
                    }
                    Side::Right => {
                        parent_node.right = Some(index);
                        "right"
                    }
                };
                format!("Insert {value} as the {name} child of {}", parent_node.value)
            }
        };
        tracer.record(description, BstStep::Insert { value, parent });
    }

    let mut walker = Walker {
        nodes: &nodes,
        order: options.order,
        tracer: &mut tracer,
        output: Vec::with_capacity(nodes.len()),
    };
    walker.walk(0);
    let output = walker.output;

    tracer.record(format!("{:?} traversal: {output:?}", options.order), BstStep::Done);
    tracing::debug!(nodes = nodes.len(), order = ?options.order, "bst traversal traced");
    tracer.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use algoscope_trace::fold_to;
    use proptest::prelude::*;

    const VALUES: [i64; 7] = [50, 30, 70, 20, 40, 60, 80];

    fn output(order: TraversalOrder) -> Vec<i64> {
        let trace = bst_traversal(&VALUES, &BstOptions { order });
        fold_to(trace.steps(), trace.len() - 1).output
    }

    #[test]
    fn three_orders() {
        assert_eq!(output(TraversalOrder::InOrder), vec![20, 30, 40, 50, 60, 70, 80]);
        assert_eq!(output(TraversalOrder::PreOrder), vec![50, 30, 20, 40, 70, 60, 80]);
        assert_eq!(output(TraversalOrder::PostOrder), vec![20, 40, 30, 60, 80, 70, 50]);
    }

    #[test]
    fn tree_shape_is_rebuilt_by_folding() {
        let trace = bst_traversal(&VALUES, &BstOptions::default());
        let built = fold_to(trace.steps(), VALUES.len() - 1);
        assert_eq!(built.root, Some(0));
        assert_eq!(built.nodes[0].left, Some(1));
        assert_eq!(built.nodes[0].right, Some(2));
        assert_eq!(built.nodes[1].left, Some(3));
        assert!(built.visited.iter().all(|v| !v));
        assert!(built.output.is_empty());
    }

    #[test]
    fn visit_precedes_process() {
        let trace = bst_traversal(&VALUES, &BstOptions::default());
        let first_visit = trace.iter().position(|s| s.payload == BstStep::Visit { node: 3 }).unwrap();
        let first_process = trace.iter().position(|s| s.payload == BstStep::Process { node: 3 }).unwrap();
        assert!(first_visit < first_process);

        let state = fold_to(trace.steps(), first_visit);
        assert!(state.visited[0] && state.visited[1] && state.visited[3]);
        assert!(!state.visited[2]);
    }

    #[test]
    fn duplicates_are_skipped() {
        let trace = bst_traversal(&[5, 3, 5], &BstOptions::default());
        assert!(trace.iter().any(|s| s.payload == BstStep::Duplicate { value: 5 }));
        assert_eq!(fold_to(trace.steps(), trace.len() - 1).output, vec![3, 5]);
    }

    #[test]
    fn empty_input_is_one_step() {
        assert_eq!(bst_traversal(&[], &BstOptions::default()).len(), 1);
    }

    #[test]
    fn sorted_input_walks_a_degenerate_tree() {
        crate::on_small_stack(|| {
            let values: Vec<i64> = (0..5_000).collect();
            for order in [TraversalOrder::InOrder, TraversalOrder::PreOrder, TraversalOrder::PostOrder] {
                let trace = bst_traversal(&values, &BstOptions { order });
                let state = fold_to(trace.steps(), trace.len() - 1);
                let expected: Vec<i64> = match order {
                    TraversalOrder::PostOrder => values.iter().rev().copied().collect(),
                    _ => values.clone(),
                };
                assert_eq!(state.output, expected);
                assert_eq!(trace.len(), 3 * values.len() + 1);
            }
        });
    }

    proptest! {
        #[test]
        fn in_order_is_sorted_unique(values in proptest::collection::vec(-100i64..100, 1..40)) {
            let trace = bst_traversal(&values, &BstOptions::default());
            let mut expected = values.clone();
            expected.sort();
            expected.dedup();
            prop_assert_eq!(fold_to(trace.steps(), trace.len() - 1).output, expected);
        }
    }
}
