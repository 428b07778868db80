//! Quicksort with Lomuto partitioning and a pluggable pivot rule.

use algoscope_trace::Trace;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{SortRecorder, SortStep};
use crate::order::Order;

/// How each partition picks its pivot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PivotRule {
    #[default]
    Last,
    First,
    Middle,
    /// Uniform over the partition, drawn from the caller's RNG.
    Random,
}

/// Options for [`quick_sort`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuickOptions {
    pub order: Order,
    pub pivot: PivotRule,
}

/// Trace quicksort.
///
/// The pivot is moved to the end of its range, every other element is
/// compared against it, and it is then swapped into its final place. The RNG
/// is only consulted under [`PivotRule::Random`]; pass a seeded generator to
/// make random-pivot traces reproducible.
pub fn quick_sort<R: Rng + ?Sized>(values: &[i64], options: &QuickOptions, rng: &mut R) -> Trace<SortStep> {
    let mut rec = SortRecorder::new("quick_sort", values, options.order);
    let n = rec.len();
    let mut partitions = 0;
    // Pending half-open ranges; the left part is pushed last so it is sorted first.
    let mut ranges = vec![(0, n)];
    while let Some((lo, hi)) = ranges.pop() {
        if let Some(boundary) = partition(&mut rec, lo, hi, options, rng) {
            partitions += 1;
            ranges.push((boundary + 1, hi));
            ranges.push((lo, boundary));
        }
    }
    tracing::debug!(n, partitions, pivot = ?options.pivot, "quicksort traced");
    rec.finish()
}

/// Partition `lo..hi` around a pivot and return where the pivot landed.
/// Ranges of one element are marked sorted and yield `None`.
fn partition<R: Rng + ?Sized>(
    rec: &mut SortRecorder,
    lo: usize,
    hi: usize,
    options: &QuickOptions,
    rng: &mut R,
) -> Option<usize> {
    if hi <= lo {
        return None;
    }
    if hi - lo == 1 {
        rec.mark_sorted(lo);
        return None;
    }

    let last = hi - 1;
    let chosen = match options.pivot {
        PivotRule::Last => last,
        PivotRule::First => lo,
        PivotRule::Middle => lo + (hi - lo) / 2,
        PivotRule::Random => rng.gen_range(lo..hi),
    };
    rec.select_pivot(chosen);
    if chosen != last {
        rec.swap(chosen, last);
    }

    let pivot = rec.values()[last];
    let mut boundary = lo;
    for j in lo..last {
        rec.compare_pivot(j, last);
        if !options.order.out_of_order(rec.values()[j], pivot) {
            if boundary != j {
                rec.swap(boundary, j);
            }
            boundary += 1;
        }
    }
    if boundary != last {
        rec.swap(boundary, last);
    }
    rec.pivot_placed(boundary);
    Some(boundary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ElementStatus;
    use crate::sort::SortAction;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn random_options() -> QuickOptions {
        QuickOptions {
            pivot: PivotRule::Random,
            ..Default::default()
        }
    }

    #[test]
    fn same_seed_same_trace() {
        let values = [9, 4, 7, 1, 8, 2, 6];
        let a = quick_sort(&values, &random_options(), &mut ChaCha8Rng::seed_from_u64(42));
        let b = quick_sort(&values, &random_options(), &mut ChaCha8Rng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn last_pivot_ignores_the_rng() {
        let values = [3, 1, 2];
        let a = quick_sort(&values, &QuickOptions::default(), &mut ChaCha8Rng::seed_from_u64(1));
        let b = quick_sort(&values, &QuickOptions::default(), &mut ChaCha8Rng::seed_from_u64(2));
        assert_eq!(a, b);
        assert_eq!(a.get(1).unwrap().payload.action, SortAction::SelectPivot { index: 2 });
    }

    #[test]
    fn pivot_is_highlighted_during_partition() {
        let trace = quick_sort(&[5, 3, 8, 4], &QuickOptions::default(), &mut ChaCha8Rng::seed_from_u64(0));
        let compare = trace
            .iter()
            .find(|s| matches!(s.payload.action, SortAction::ComparePivot { .. }))
            .unwrap();
        assert_eq!(compare.payload.view.elements[3].status, ElementStatus::Pivot);
        assert_eq!(compare.payload.view.elements[0].status, ElementStatus::Comparing);
    }

    #[test]
    fn sorted_input_with_last_pivot_does_not_recurse() {
        crate::on_small_stack(|| {
            let values: Vec<i64> = (0..128).collect();
            let trace = quick_sort(&values, &QuickOptions::default(), &mut ChaCha8Rng::seed_from_u64(0));
            let last = &trace.last().payload.view;
            assert!(last.elements.iter().map(|e| e.value).eq(values.iter().copied()));
            assert!(last.elements.iter().all(|e| e.status == ElementStatus::Sorted));
            let placed = trace
                .iter()
                .filter(|s| matches!(s.payload.action, SortAction::PivotPlaced { .. }))
                .count();
            assert_eq!(placed, values.len() - 1);
        });
    }

    #[test]
    fn descending_quicksort() {
        let options = QuickOptions {
            order: Order::Descending,
            pivot: PivotRule::Middle,
        };
        let trace = quick_sort(&[2, 9, 4, 4, 7], &options, &mut ChaCha8Rng::seed_from_u64(0));
        let values: Vec<_> = trace.last().payload.view.elements.iter().map(|e| e.value).collect();
        assert_eq!(values, vec![9, 7, 4, 4, 2]);
    }
}
