//! Maximum-sum window of fixed size.

use algoscope_trace::{Snapshot, Trace, Tracer};
use serde::{Deserialize, Serialize};

use crate::element::{Element, ElementStatus};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowPhase {
    /// First window summed directly.
    #[default]
    Initialized,
    /// Window moved right by one.
    Sliding,
    Done,
    /// Window size does not fit the array.
    Invalid,
}

/// Window state after one step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlidingWindowStep {
    pub phase: WindowPhase,
    pub elements: Vec<Element>,
    pub window_size: usize,
    /// Inclusive bounds of the current window.
    pub window: Option<(usize, usize)>,
    /// Sums are widened so no window of `i64`s overflows.
    pub sum: i128,
    pub max_sum: i128,
    /// Start index of the best window so far.
    pub best_start: usize,
    /// Value that left the window on this slide.
    pub removed: Option<i64>,
    /// Value that entered the window on this slide.
    pub added: Option<i64>,
    pub is_new_max: bool,
}

impl Snapshot for SlidingWindowStep {
    type State = SlidingWindowStep;

    fn snapshot(&self) -> &Self::State {
        self
    }
}

algoscope_trace::replay_by_snapshot!(SlidingWindowStep);

/// Trace the maximum sum over all windows of `k` consecutive values.
///
/// The first window is summed directly; each slide then subtracts the value
/// leaving and adds the value entering. A new maximum is only recorded when
/// the sum is strictly greater than the best so far.
pub fn sliding_window(values: &[i64], k: usize) -> Trace<SlidingWindowStep> {
    let mut tracer = Tracer::new("sliding_window");
    let n = values.len();

    if k == 0 || k > n {
        let description = if n == 0 {
            "Array is empty: there is no window to sum".to_string()
        } else if k == 0 {
            "Window size 0 is invalid: a window needs at least one element".to_string()
        } else {
            format!("Window size {k} is larger than the array ({n} elements): no window fits")
        };
        tracer.record(
            description,
            SlidingWindowStep {
                phase: WindowPhase::Invalid,
                elements: plain(values),
                window_size: k,
                ..Default::default()
            },
        );
        return tracer.finish();
    }

    let mut sum: i128 = values[..k].iter().copied().map(i128::from).sum();
    let mut max_sum = sum;
    let mut best_start = 0;

    tracer.record(
        format!("Sum the first window [0, {}] directly: {sum}", k - 1),
        SlidingWindowStep {
            phase: WindowPhase::Initialized,
            elements: render(values, 0, k),
            window_size: k,
            window: Some((0, k - 1)),
            sum,
            max_sum,
            best_start,
            ..Default::default()
        },
    );

    for end in k..n {
        let start = end + 1 - k;
        let removed = values[start - 1];
        let added = values[end];
        sum = sum - i128::from(removed) + i128::from(added);
        let is_new_max = sum > max_sum;
        if is_new_max {
            max_sum = sum;
            best_start = start;
        }

        let verdict = if is_new_max {
            format!("new maximum {max_sum}")
        } else {
            format!("maximum stays {max_sum}")
        };
        tracer.record(
            format!("Slide to [{start}, {end}]: -{removed} +{added} = {sum}, {verdict}"),
            SlidingWindowStep {
                phase: WindowPhase::Sliding,
                elements: render(values, start, k),
                window_size: k,
                window: Some((start, end)),
                sum,
                max_sum,
                best_start,
                removed: Some(removed),
                added: Some(added),
                is_new_max,
            },
        );
    }

    tracer.record(
        format!(
            "Done: maximum sum {max_sum} from window [{best_start}, {}]",
            best_start + k - 1
        ),
        SlidingWindowStep {
            phase: WindowPhase::Done,
            elements: render(values, best_start, k),
            window_size: k,
            window: Some((best_start, best_start + k - 1)),
            sum: max_sum,
            max_sum,
            best_start,
            ..Default::default()
        },
    );

    tracing::debug!(n, k, max_sum, "sliding window traced");
    tracer.finish()
}

fn plain(values: &[i64]) -> Vec<Element> {
    crate::element::elements(values)
}

fn render(values: &[i64], start: usize, k: usize) -> Vec<Element> {
    values
        .iter()
        .enumerate()
        .map(|(i, &value)| {
            let status = if (start..start + k).contains(&i) {
                ElementStatus::Comparing
            } else {
                ElementStatus::Default
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
    fn first_window_then_slides() {
        let trace = sliding_window(&[1, 2, 3, 4, 5, 6], 3);

        let first = &trace.first().payload;
        assert_eq!(first.sum, 6);
        assert_eq!(first.window, Some((0, 2)));

        let slide = &trace.get(1).unwrap().payload;
        assert_eq!(slide.removed, Some(1));
        assert_eq!(slide.added, Some(4));
        assert_eq!(slide.sum, 9);

        let last = &trace.last().payload;
        assert_eq!(last.phase, WindowPhase::Done);
        assert_eq!(last.max_sum, 15);
        assert_eq!(last.best_start, 3);
    }

    #[test]
    fn ties_are_not_new_maxima() {
        let trace = sliding_window(&[2, 1, 2, 1], 2);
        let new_max: Vec<_> = trace.iter().map(|s| s.payload.is_new_max).collect();
        assert_eq!(new_max, vec![false, false, false, false]);
        assert_eq!(trace.last().payload.best_start, 0);
    }

    #[test]
    fn oversized_window_is_explained() {
        let trace = sliding_window(&[1, 2], 3);
        assert_eq!(trace.len(), 1);
        assert_eq!(trace.first().payload.phase, WindowPhase::Invalid);
        assert!(trace.first().description.contains("larger"));
    }

    #[test]
    fn zero_window_and_empty_input_are_invalid() {
        assert_eq!(sliding_window(&[1, 2], 0).last().payload.phase, WindowPhase::Invalid);
        assert_eq!(sliding_window(&[], 1).last().payload.phase, WindowPhase::Invalid);
    }

    #[test]
    fn extreme_values_do_not_overflow() {
        let trace = sliding_window(&[i64::MAX, 1, 0], 2);
        assert_eq!(trace.first().payload.sum, i128::from(i64::MAX) + 1);
        let last = &trace.last().payload;
        assert_eq!(last.max_sum, i128::from(i64::MAX) + 1);
        assert_eq!(last.best_start, 0);

        let trace = sliding_window(&[i64::MIN, i64::MIN], 2);
        assert_eq!(trace.last().payload.max_sum, 2 * i128::from(i64::MIN));
    }

    proptest! {
        #[test]
        fn max_matches_brute_force(values in proptest::collection::vec(-100i64..100, 1..40), k in 1usize..10) {
            prop_assume!(k <= values.len());
            let trace = sliding_window(&values, k);
            let brute = values.windows(k).map(|w| w.iter().map(|&v| i128::from(v)).sum::<i128>()).max().unwrap();
            prop_assert_eq!(trace.last().payload.max_sum, brute);
        }

        #[test]
        fn each_slide_is_one_subtraction_and_one_addition(values in proptest::collection::vec(-100i64..100, 1..40), k in 1usize..10) {
            prop_assume!(k <= values.len());
            let trace = sliding_window(&values, k);
            let slides: Vec<_> = trace.iter().map(|s| &s.payload).filter(|p| p.phase != WindowPhase::Done).collect();
            prop_assert_eq!(slides.len(), values.len() - k + 1);
            for pair in slides.windows(2) {
                let (before, after) = (pair[0], pair[1]);
                let (removed, added) = (after.removed.unwrap(), after.added.unwrap());
                prop_assert_eq!(after.sum, before.sum - i128::from(removed) + i128::from(added));
            }
        }
    }
}
