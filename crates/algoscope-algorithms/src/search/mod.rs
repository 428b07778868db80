//! Comparison search and selection: binary search, two pointers, sliding window.

mod binary_search;
mod sliding_window;
mod two_pointers;

pub use binary_search::{binary_search, BinarySearchOptions, BinarySearchStep, Comparison, SearchPhase};
pub use sliding_window::{sliding_window, SlidingWindowStep, WindowPhase};
pub use two_pointers::{two_pointers, PairPhase, TwoPointerStep};
