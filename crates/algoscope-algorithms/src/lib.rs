//! Algoscope Algorithms
//!
//! Trace generators for textbook algorithms. Each generator is a pure
//! function from its input (plus options, plus an injected RNG where the
//! algorithm is randomized) to a [`Trace`](algoscope_trace::Trace) whose
//! steps can be handed to a [`Playback`](algoscope_trace::Playback).
//!
//! # Families
//!
//! - **search**: binary search, sliding window, two pointers
//! - **sort**: bubble, insertion, quicksort
//! - **graph**: BFS, DFS, Dijkstra, Kahn's topological sort, union-find
//! - **heap**: binary heap insert / extract / heapify
//! - **greedy**: activity selection, coin change
//! - **dynamic programming**: 0/1 knapsack
//! - **trees**: Huffman coding, BST traversal
//! - **hashing**: open addressing with linear probing
//! - **backtracking**: N-Queens, maze solving
//!
//! Generators never panic on bad input. Out-of-range sources, empty arrays
//! and negative capacities produce a short trace whose final step explains
//! why nothing else happened.

mod backtrack;
mod bst;
mod element;
mod graph;
mod greedy;
mod hashing;
mod heap;
mod huffman;
mod knapsack;
mod order;
mod search;
mod sort;

pub use backtrack::*;
pub use bst::{bst_traversal, BstNode, BstOptions, BstState, BstStep, Side, TraversalOrder};
pub use element::{elements, values_of, Element, ElementStatus};
pub use graph::union_find;
pub use graph::{
    bfs, dfs, dijkstra, topological_sort, DijkstraEvent, DijkstraOptions, DijkstraStep, DijkstraView, DisjointSet,
    Edge, Graph, GraphError, GraphNode, NodeStatus, TaskNode, TaskStatus, TopoEvent, TopoStep, TraversalEvent,
    TraversalStep, TraversalView, UnionFindEvent, UnionFindOp, UnionFindOptions, UnionFindStep,
};
pub use greedy::*;
pub use hashing::{hash_table, HashOp, HashStep, HashTableOptions, HashTableState, ProbeOutcome, MAX_BUCKETS};
pub use heap::{HeapEvent, HeapKind, HeapNode, HeapNodeStatus, HeapStep, TracedHeap};
pub use huffman::{frequencies, huffman, HuffmanEvent, HuffmanNode, HuffmanStep};
pub use knapsack::{knapsack, DpCell, Item, KnapsackStep, KnapsackTable, MAX_KNAPSACK_CELLS};
pub use order::Order;
pub use search::*;
pub use sort::*;

/// Run `f` on a thread with a 64 KiB stack, so any recursion that scales
/// with the input overflows instead of passing.
#[cfg(test)]
pub(crate) fn on_small_stack<F: FnOnce() + Send + 'static>(f: F) {
    std::thread::Builder::new()
        .stack_size(64 * 1024)
        .spawn(f)
        .unwrap()
        .join()
        .unwrap();
}
