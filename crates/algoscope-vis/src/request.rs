//! JSON requests that pick a generator and its input.

use algoscope_algorithms::{
    activity_selection, bfs, binary_search, bst_traversal, bubble_sort, coin_change, dfs, dijkstra, frequencies,
    hash_table, huffman, insertion_sort, knapsack, maze, n_queens, quick_sort, sliding_window, topological_sort,
    two_pointers, union_find, Activity, ActivityOptions, BinarySearchOptions, BstOptions, BubbleOptions,
    DijkstraOptions, Graph, HashOp, HashTableOptions, HeapKind, InsertionOptions, Item, Maze, MazeOptions,
    NQueensOptions, QuickOptions, TracedHeap, UnionFindOp, UnionFindOptions,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::session::{session, PlaybackSession};

/// Operation traced on a heap built from the request's values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum HeapAction {
    /// Trace building the heap itself.
    #[default]
    Build,
    Push { value: i64 },
    Pop,
}

/// Which generator to run, with its input and options.
///
/// Every options field may be omitted and falls back to its default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "algorithm", rename_all = "snake_case")]
pub enum TraceRequest {
    BinarySearch {
        values: Vec<i64>,
        target: i64,
        #[serde(default)]
        options: BinarySearchOptions,
    },
    SlidingWindow {
        values: Vec<i64>,
        k: usize,
    },
    TwoPointers {
        values: Vec<i64>,
        target: i64,
    },
    BubbleSort {
        values: Vec<i64>,
        #[serde(default)]
        options: BubbleOptions,
    },
    InsertionSort {
        values: Vec<i64>,
        #[serde(default)]
        options: InsertionOptions,
    },
    QuickSort {
        values: Vec<i64>,
        #[serde(default)]
        options: QuickOptions,
        /// Seed for random pivots; drawn fresh when absent.
        #[serde(default)]
        seed: Option<u64>,
    },
    Bfs {
        graph: Graph,
        source: usize,
    },
    Dfs {
        graph: Graph,
        source: usize,
    },
    Dijkstra {
        graph: Graph,
        source: usize,
        #[serde(default)]
        options: DijkstraOptions,
    },
    TopologicalSort {
        graph: Graph,
    },
    UnionFind {
        size: usize,
        ops: Vec<UnionFindOp>,
        #[serde(default)]
        options: UnionFindOptions,
    },
    Heap {
        #[serde(default)]
        kind: HeapKind,
        values: Vec<i64>,
        #[serde(default)]
        action: HeapAction,
    },
    Huffman {
        text: String,
    },
    ActivitySelection {
        activities: Vec<Activity>,
        #[serde(default)]
        options: ActivityOptions,
    },
    CoinChange {
        denominations: Vec<u64>,
        amount: u64,
    },
    Knapsack {
        items: Vec<Item>,
        capacity: i64,
    },
    NQueens {
        #[serde(default)]
        options: NQueensOptions,
    },
    Maze {
        /// One string per row; `#` is a wall.
        grid: Vec<String>,
        #[serde(default)]
        options: MazeOptions,
    },
    HashTable {
        ops: Vec<HashOp>,
        #[serde(default)]
        options: HashTableOptions,
    },
    BstTraversal {
        values: Vec<i64>,
        #[serde(default)]
        options: BstOptions,
    },
}

impl TraceRequest {
    /// Parse a request from JSON text.
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| Error::InvalidCommand(e.to_string()))
    }

    /// Run the generator and open a paused session on its first step.
    ///
    /// Only a graph with dangling edges is rejected. Every other input,
    /// however degenerate, yields a trace that explains itself.
    pub fn generate(&self) -> Result<Box<dyn PlaybackSession>> {
        let session = match self {
            TraceRequest::BinarySearch { values, target, options } => {
                session(binary_search(values, *target, options))
            }
            TraceRequest::SlidingWindow { values, k } => session(sliding_window(values, *k)),
            TraceRequest::TwoPointers { values, target } => session(two_pointers(values, *target)),
            TraceRequest::BubbleSort { values, options } => session(bubble_sort(values, options)),
            TraceRequest::InsertionSort { values, options } => session(insertion_sort(values, options)),
            TraceRequest::QuickSort { values, options, seed } => {
                let mut rng = ChaCha8Rng::seed_from_u64(seed.unwrap_or_else(rand::random));
                session(quick_sort(values, options, &mut rng))
            }
            TraceRequest::Bfs { graph, source } => {
                graph.validate()?;
                session(bfs(graph, *source))
            }
            TraceRequest::Dfs { graph, source } => {
                graph.validate()?;
                session(dfs(graph, *source))
            }
            TraceRequest::Dijkstra { graph, source, options } => {
                graph.validate()?;
                session(dijkstra(graph, *source, options))
            }
            TraceRequest::TopologicalSort { graph } => {
                graph.validate()?;
                session(topological_sort(graph))
            }
            TraceRequest::UnionFind { size, ops, options } => session(union_find::run(*size, ops, options)),
            TraceRequest::Heap { kind, values, action } => match action {
                HeapAction::Build => session(TracedHeap::build(*kind, values).1),
                HeapAction::Push { value } => {
                    let (mut heap, _) = TracedHeap::build(*kind, values);
                    session(heap.push(*value))
                }
                HeapAction::Pop => {
                    let (mut heap, _) = TracedHeap::build(*kind, values);
                    session(heap.pop().1)
                }
            },
            TraceRequest::Huffman { text } => session(huffman(&frequencies(text))),
            TraceRequest::ActivitySelection { activities, options } => {
                session(activity_selection(activities, options))
            }
            TraceRequest::CoinChange { denominations, amount } => session(coin_change(denominations, *amount)),
            TraceRequest::Knapsack { items, capacity } => session(knapsack(items, *capacity)),
            TraceRequest::NQueens { options } => session(n_queens(options)),
            TraceRequest::Maze { grid, options } => session(maze(&Maze::parse(grid.as_slice()), options)),
            TraceRequest::HashTable { ops, options } => session(hash_table(ops, options)),
            TraceRequest::BstTraversal { values, options } => session(bst_traversal(values, options)),
        };
        let status = session.status();
        tracing::debug!(algorithm = %status.algorithm, steps = status.total_steps, "trace generated");
        Ok(session)
    }
}

impl Default for TraceRequest {
    fn default() -> Self {
        TraceRequest::BubbleSort {
            values: vec![5, 1, 4, 2, 8],
            options: BubbleOptions::default(),
        }
    }
}
