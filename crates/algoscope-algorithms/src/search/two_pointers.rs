//! Pair-sum search with converging pointers.

use algoscope_trace::{Snapshot, Trace, Tracer};
use serde::{Deserialize, Serialize};

use crate::element::{Element, ElementStatus};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PairPhase {
    #[default]
    Initialized,
    /// Sum too small: the left endpoint was excluded.
    MoveLeft,
    /// Sum too large: the right endpoint was excluded.
    MoveRight,
    Found,
    /// Pointers met without a match.
    Exhausted,
}

/// Pointer state after one step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TwoPointerStep {
    pub phase: PairPhase,
    pub target: i64,
    pub elements: Vec<Element>,
    pub left: usize,
    pub right: usize,
    /// Sum of the pair examined on this step, widened so no pair overflows.
    pub sum: Option<i128>,
    /// Endpoint excluded on this step.
    pub excluded: Option<usize>,
}

impl TwoPointerStep {
    /// The matching pair, when this is the `Found` step.
    pub fn pair(&self) -> Option<(i64, i64)> {
        match self.phase {
            PairPhase::Found => Some((self.elements[self.left].value, self.elements[self.right].value)),
            _ => None,
        }
    }
}

impl Snapshot for TwoPointerStep {
    type State = TwoPointerStep;

    fn snapshot(&self) -> &Self::State {
        self
    }
}

algoscope_trace::replay_by_snapshot!(TwoPointerStep);

/// Trace the search for two values summing to `target`.
///
/// Works on an ascending copy of the input. Each step examines the pair under
/// the pointers and excludes exactly one endpoint, until the sum matches or
/// the pointers meet.
pub fn two_pointers(values: &[i64], target: i64) -> Trace<TwoPointerStep> {
    let mut sorted = values.to_vec();
    sorted.sort();

    let mut tracer = Tracer::new("two_pointers");
    if sorted.is_empty() {
        tracer.record(
            format!("Array is empty: no pair can sum to {target}"),
            TwoPointerStep {
                phase: PairPhase::Exhausted,
                target,
                ..Default::default()
            },
        );
        return tracer.finish();
    }

    let mut statuses = vec![ElementStatus::Default; sorted.len()];
    let mut left = 0usize;
    let mut right = sorted.len() - 1;

    tracer.record(
        format!("Sorted copy, left = 0, right = {right}, looking for a pair summing to {target}"),
        TwoPointerStep {
            phase: PairPhase::Initialized,
            target,
            elements: render(&sorted, &statuses, left, right),
            left,
            right,
            ..Default::default()
        },
    );

    while left < right {
        let sum = i128::from(sorted[left]) + i128::from(sorted[right]);
        if sum == i128::from(target) {
            tracer.record(
                format!("a[{left}] + a[{right}] = {} + {} = {sum}: found", sorted[left], sorted[right]),
                TwoPointerStep {
                    phase: PairPhase::Found,
                    target,
                    elements: render(&sorted, &statuses, left, right),
                    left,
                    right,
                    sum: Some(sum),
                    excluded: None,
                },
            );
            tracing::debug!(target, left, right, "two pointers found pair");
            return tracer.finish();
        }

        let (phase, excluded, description) = if sum < i128::from(target) {
            let excluded = left;
            left += 1;
            (
                PairPhase::MoveLeft,
                excluded,
                format!("{sum} < {target}: exclude a[{excluded}] = {}, move left to {left}", sorted[excluded]),
            )
        } else {
            let excluded = right;
            right -= 1;
            (
                PairPhase::MoveRight,
                excluded,
                format!("{sum} > {target}: exclude a[{excluded}] = {}, move right to {right}", sorted[excluded]),
            )
        };
        statuses[excluded] = ElementStatus::Excluded;

        tracer.record(
            description,
            TwoPointerStep {
                phase,
                target,
                elements: render(&sorted, &statuses, left, right),
                left,
                right,
                sum: Some(sum),
                excluded: Some(excluded),
            },
        );
    }

    tracer.record(
        format!("Pointers met at {left}: no pair sums to {target}"),
        TwoPointerStep {
            phase: PairPhase::Exhausted,
            target,
            elements: render(&sorted, &statuses, left, right),
            left,
            right,
            ..Default::default()
        },
    );
    tracing::debug!(target, "two pointers exhausted");
    tracer.finish()
}

fn render(sorted: &[i64], statuses: &[ElementStatus], left: usize, right: usize) -> Vec<Element> {
    sorted
        .iter()
        .zip(statuses)
        .enumerate()
        .map(|(i, (&value, &status))| {
            let status = if status == ElementStatus::Default && (i == left || i == right) {
                ElementStatus::Comparing
            } else {
                status
            };
            Element::new(value, status)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn finds_pair_in_sorted_copy() {
        let trace = two_pointers(&[8, 1, 11, 4, 6], 10);
        let last = &trace.last().payload;

        assert_eq!(last.phase, PairPhase::Found);
        assert_eq!(last.pair(), Some((4, 6)));
    }

    #[test]
    fn each_move_excludes_one_endpoint() {
        let trace = two_pointers(&[1, 2, 3, 9, 10], 100);
        for pair in trace.steps().windows(2) {
            let before = &pair[0].payload;
            let after = &pair[1].payload;
            if after.phase == PairPhase::MoveLeft || after.phase == PairPhase::MoveRight {
                let excluded_before = before.elements.iter().filter(|e| e.status == ElementStatus::Excluded).count();
                let excluded_after = after.elements.iter().filter(|e| e.status == ElementStatus::Excluded).count();
                assert_eq!(excluded_after, excluded_before + 1);
                assert_eq!((after.right - after.left) + 1, (before.right - before.left));
            }
        }
        assert_eq!(trace.last().payload.phase, PairPhase::Exhausted);
    }

    #[test]
    fn single_element_is_exhausted_immediately() {
        let trace = two_pointers(&[5], 10);
        assert_eq!(trace.len(), 2);
        assert_eq!(trace.last().payload.phase, PairPhase::Exhausted);
    }

    #[test]
    fn empty_input_is_one_terminal_step() {
        let trace = two_pointers(&[], 3);
        assert_eq!(trace.len(), 1);
        assert_eq!(trace.last().payload.phase, PairPhase::Exhausted);
    }

    #[test]
    fn extreme_values_do_not_overflow() {
        let trace = two_pointers(&[i64::MAX, 1], 0);
        let first_move = &trace.get(1).unwrap().payload;
        assert_eq!(first_move.sum, Some(i128::from(i64::MAX) + 1));
        assert_eq!(first_move.phase, PairPhase::MoveRight);
        assert_eq!(trace.last().payload.phase, PairPhase::Exhausted);

        let trace = two_pointers(&[i64::MIN, i64::MAX, -1], -1);
        assert_eq!(trace.last().payload.pair(), Some((i64::MIN, i64::MAX)));
    }

    proptest! {
        #[test]
        fn outcome_matches_brute_force(values in proptest::collection::vec(-50i64..50, 0..30), target in -100i64..100) {
            let trace = two_pointers(&values, target);
            let exists = (0..values.len())
                .any(|i| (i + 1..values.len()).any(|j| values[i] + values[j] == target));
            prop_assert_eq!(trace.last().payload.phase == PairPhase::Found, exists);
            prop_assert!(trace.len() <= values.len() + 1);
        }
    }
}
