//! Insertion sort.

use algoscope_trace::Trace;
use serde::{Deserialize, Serialize};

use super::{SortRecorder, SortStep};
use crate::order::Order;

/// Options for [`insertion_sort`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InsertionOptions {
    pub order: Order,
}

/// Trace insertion sort.
///
/// The key lifted from position `i` is followed through `inserting_index`.
/// Each comparison against the key and each one-slot shift is its own step;
/// the key settles with an insert step.
pub fn insertion_sort(values: &[i64], options: &InsertionOptions) -> Trace<SortStep> {
    let order = options.order;
    let mut rec = SortRecorder::new("insertion_sort", values, order);
    let n = rec.len();
    let mut shifts = 0;

    for i in 1..n {
        rec.lift(i);
        let key = rec.values()[i];
        let mut hole = i;
        while hole > 0 {
            rec.key_compare(hole - 1, hole);
            if !order.out_of_order(rec.values()[hole - 1], key) {
                break;
            }
            rec.shift(hole - 1, hole);
            hole -= 1;
            shifts += 1;
        }
        rec.insert(hole, i);
    }

    tracing::debug!(n, shifts, "insertion sort traced");
    rec.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sort::SortAction;

    #[test]
    fn key_is_tracked_separately_from_comparisons() {
        let trace = insertion_sort(&[3, 1, 2], &InsertionOptions::default());
        let lift = trace
            .iter()
            .find(|s| s.payload.action == SortAction::Lift { index: 1 })
            .unwrap();
        assert_eq!(lift.payload.view.inserting_index, Some(1));

        // 1 shifts left past 3: the key now sits at 0.
        let shift = trace
            .iter()
            .find(|s| s.payload.action == SortAction::Shift { from: 0, to: 1 })
            .unwrap();
        assert_eq!(shift.payload.view.inserting_index, Some(0));
        assert_eq!(shift.payload.view.elements[0].value, 1);
        assert_eq!(shift.payload.view.elements[1].value, 3);
    }

    #[test]
    fn shifts_happen_one_position_at_a_time() {
        let trace = insertion_sort(&[2, 3, 4, 1], &InsertionOptions::default());
        let shifts: Vec<_> = trace
            .iter()
            .filter_map(|s| match s.payload.action {
                SortAction::Shift { from, to } => Some((from, to)),
                _ => None,
            })
            .collect();
        assert_eq!(shifts, vec![(2, 3), (1, 2), (0, 1)]);
        assert!(shifts.iter().all(|(from, to)| to - from == 1));
    }

    #[test]
    fn insert_clears_the_key() {
        let trace = insertion_sort(&[2, 1], &InsertionOptions::default());
        let insert = trace
            .iter()
            .find(|s| matches!(s.payload.action, SortAction::Insert { .. }))
            .unwrap();
        assert_eq!(insert.payload.action, SortAction::Insert { index: 0, sorted_through: 1 });
        assert_eq!(insert.payload.view.inserting_index, None);
    }

    #[test]
    fn already_sorted_needs_one_compare_per_key() {
        let trace = insertion_sort(&[1, 2, 3, 4], &InsertionOptions::default());
        let compares = trace
            .iter()
            .filter(|s| matches!(s.payload.action, SortAction::KeyCompare { .. }))
            .count();
        assert_eq!(compares, 3);
    }
}
