//! Bubble sort.

use algoscope_trace::Trace;
use serde::{Deserialize, Serialize};

use super::{SortRecorder, SortStep};
use crate::order::Order;

/// Options for [`bubble_sort`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BubbleOptions {
    pub order: Order,
    /// Stop after the first pass that makes no swap.
    pub early_exit: bool,
}

/// Trace bubble sort.
///
/// Every adjacent pair in a pass is recorded as a compare step before its
/// swap (if any). Each finished pass fixes its last index, so the sorted
/// region grows from the right. Without early exit the number of compare
/// steps is exactly `n(n-1)/2`.
pub fn bubble_sort(values: &[i64], options: &BubbleOptions) -> Trace<SortStep> {
    let order = options.order;
    let mut rec = SortRecorder::new("bubble_sort", values, order);
    let n = rec.len();
    let mut passes = 0;

    for pass in 0..n.saturating_sub(1) {
        let mut swapped = false;
        for j in 0..n - 1 - pass {
            rec.compare(j, j + 1);
            if order.out_of_order(rec.values()[j], rec.values()[j + 1]) {
                rec.swap(j, j + 1);
                swapped = true;
            }
        }
        rec.pass_complete(n - 1 - pass);
        passes += 1;
        if options.early_exit && !swapped {
            break;
        }
    }

    tracing::debug!(n, passes, "bubble sort traced");
    rec.finish()
}
