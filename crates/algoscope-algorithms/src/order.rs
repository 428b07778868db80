//! Comparison orientation shared by the search and sorting tracers.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// Which way "in order" points.
///
/// Every comparison a tracer narrates goes through [`Order::compare`], so a
/// descending run records the comparisons it actually made.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Order {
    #[default]
    Ascending,
    Descending,
}

impl Order {
    /// Compare `a` against `b` under this orientation.
    ///
    /// `Less` means `a` belongs before `b`.
    #[inline]
    pub fn compare(self, a: i64, b: i64) -> Ordering {
        match self {
            Order::Ascending => a.cmp(&b),
            Order::Descending => b.cmp(&a),
        }
    }

    /// Whether `a` placed before `b` violates the order.
    #[inline]
    pub fn out_of_order(self, a: i64, b: i64) -> bool {
        self.compare(a, b) == Ordering::Greater
    }

    /// Stable sort under this orientation.
    pub fn sort(self, values: &mut [i64]) {
        values.sort_by(|a, b| self.compare(*a, *b));
    }

    /// Whether `values` is already ordered.
    pub fn is_sorted(self, values: &[i64]) -> bool {
        values.windows(2).all(|w| !self.out_of_order(w[0], w[1]))
    }

    /// Short name for narration.
    pub fn label(self) -> &'static str {
        match self {
            Order::Ascending => "ascending",
            Order::Descending => "descending",
        }
    }
}
