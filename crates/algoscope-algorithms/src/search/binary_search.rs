//! Binary search over a sorted copy of the input.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use algoscope_trace::{Snapshot, Trace, Tracer};
use serde::{Deserialize, Serialize};

use crate::element::{Element, ElementStatus};
use crate::order::Order;

/// Outcome of comparing the middle element against the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparison {
    /// The middle element comes before the target.
    Less,
    /// The middle element comes after the target.
    Greater,
    Equal,
}

impl From<Ordering> for Comparison {
    fn from(ordering: Ordering) -> Self {
        match ordering {
            Ordering::Less => Comparison::Less,
            Ordering::Greater => Comparison::Greater,
            Ordering::Equal => Comparison::Equal,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchPhase {
    #[default]
    Initialized,
    Probing,
    Found,
    /// The range emptied. There is no separate terminal step: the last probe
    /// carries this phase, along with its `mid` and `comparison`. An empty
    /// array yields a lone `NotFound` step with no probe.
    NotFound,
}

/// Full search state after one step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinarySearchStep {
    pub phase: SearchPhase,
    pub target: i64,
    pub elements: Vec<Element>,
    pub low: i64,
    pub high: i64,
    pub mid: Option<usize>,
    pub comparison: Option<Comparison>,
    /// Every index ruled out so far, ascending.
    pub eliminated: Vec<usize>,
}

impl BinarySearchStep {
    /// Index of the target, when this is the `Found` step.
    pub fn found_at(&self) -> Option<usize> {
        match self.phase {
            SearchPhase::Found => self.mid,
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.phase, SearchPhase::Found | SearchPhase::NotFound)
    }
}

impl Snapshot for BinarySearchStep {
    type State = BinarySearchStep;

    fn snapshot(&self) -> &Self::State {
        self
    }
}

algoscope_trace::replay_by_snapshot!(BinarySearchStep);

/// Options for [`binary_search`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BinarySearchOptions {
    pub order: Order,
}

/// Trace a binary search for `target`.
///
/// The input is copied and sorted under `options.order` first. Step 0 sets up
/// `low` and `high`; every later step is one probe of `mid`. The search ends
/// on the probe that finds the target or on the probe that empties the range.
pub fn binary_search(values: &[i64], target: i64, options: &BinarySearchOptions) -> Trace<BinarySearchStep> {
    let order = options.order;
    let mut sorted = values.to_vec();
    order.sort(&mut sorted);

    let mut tracer = Tracer::new("binary_search");
    if sorted.is_empty() {
        tracer.record(
            format!("Array is empty: {target} cannot be present"),
            BinarySearchStep {
                phase: SearchPhase::NotFound,
                target,
                high: -1,
                ..Default::default()
            },
        );
        return tracer.finish();
    }

    let mut low: i64 = 0;
    let mut high: i64 = sorted.len() as i64 - 1;
    let mut eliminated = BTreeSet::new();

    tracer.record(
        format!(
            "Search for {target} in {} {} values: low = 0, high = {high}",
            sorted.len(),
            order.label()
        ),
        BinarySearchStep {
            phase: SearchPhase::Initialized,
            target,
            elements: render(&sorted, &eliminated, None),
            low,
            high,
            ..Default::default()
        },
    );

    let mut probes = 0usize;
    while low <= high {
        let mid = ((low + high) / 2) as usize;
        let value = sorted[mid];
        let comparison = Comparison::from(order.compare(value, target));
        probes += 1;

        let (phase, description) = match comparison {
            Comparison::Equal => (
                SearchPhase::Found,
                format!("low = {low}, high = {high}, mid = {mid}: a[{mid}] = {value} equals {target}, found"),
            ),
            Comparison::Less => {
                eliminated.extend(low as usize..=mid);
                low = mid as i64 + 1;
                let phase = if low > high { SearchPhase::NotFound } else { SearchPhase::Probing };
                let tail = if phase == SearchPhase::NotFound {
                    format!("range is empty, {target} not found")
                } else {
                    format!("search [{low}, {high}]")
                };
                (
                    phase,
                    format!(
                        "mid = {mid}: a[{mid}] = {value} {} {target}, discard left half; {tail}",
                        relation(order, comparison)
                    ),
                )
            }
            Comparison::Greater => {
                eliminated.extend(mid..=high as usize);
                high = mid as i64 - 1;
                let phase = if low > high { SearchPhase::NotFound } else { SearchPhase::Probing };
                let tail = if phase == SearchPhase::NotFound {
                    format!("range is empty, {target} not found")
                } else {
                    format!("search [{low}, {high}]")
                };
                (
                    phase,
                    format!(
                        "mid = {mid}: a[{mid}] = {value} {} {target}, discard right half; {tail}",
                        relation(order, comparison)
                    ),
                )
            }
        };

        tracer.record(
            description,
            BinarySearchStep {
                phase,
                target,
                elements: render(&sorted, &eliminated, Some(mid)),
                low,
                high,
                mid: Some(mid),
                comparison: Some(comparison),
                eliminated: eliminated.iter().copied().collect(),
            },
        );

        if phase != SearchPhase::Probing {
            break;
        }
    }

    tracing::debug!(n = sorted.len(), target, probes, "binary search traced");
    tracer.finish()
}

fn render(sorted: &[i64], eliminated: &BTreeSet<usize>, mid: Option<usize>) -> Vec<Element> {
    sorted
        .iter()
        .enumerate()
        .map(|(i, &value)| {
            let status = if Some(i) == mid {
                ElementStatus::Comparing
            } else if eliminated.contains(&i) {
                ElementStatus::Excluded
            } else {
                ElementStatus::Default
            };
            Element::new(value, status)
        })
        .collect()
}

fn relation(order: Order, comparison: Comparison) -> &'static str {
    match (order, comparison) {
        (_, Comparison::Equal) => "==",
        (Order::Ascending, Comparison::Less) | (Order::Descending, Comparison::Greater) => "<",
        (Order::Ascending, Comparison::Greater) | (Order::Descending, Comparison::Less) => ">",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const ARRAY: [i64; 8] = [5, 12, 18, 23, 31, 38, 45, 52];

    fn ceil_log2(n: usize) -> usize {
        (usize::BITS - (n - 1).leading_zeros()) as usize
    }

    fn mids(trace: &Trace<BinarySearchStep>) -> Vec<usize> {
        trace.iter().filter_map(|s| s.payload.mid).collect()
    }

    #[test]
    fn finds_38_via_mid_3_then_5() {
        let trace = binary_search(&ARRAY, 38, &BinarySearchOptions::default());

        assert_eq!(mids(&trace), vec![3, 5]);
        let last = &trace.last().payload;
        assert_eq!(last.phase, SearchPhase::Found);
        assert_eq!(last.comparison, Some(Comparison::Equal));
        assert_eq!(last.found_at(), Some(5));
    }

    #[test]
    fn first_probe_eliminates_left_half() {
        let trace = binary_search(&ARRAY, 38, &BinarySearchOptions::default());
        let probe = &trace.get(1).unwrap().payload;

        assert_eq!(probe.comparison, Some(Comparison::Less));
        assert_eq!(probe.eliminated, vec![0, 1, 2, 3]);
        assert_eq!((probe.low, probe.high), (4, 7));
        assert_eq!(probe.elements[0].status, ElementStatus::Excluded);
        assert_eq!(probe.elements[3].status, ElementStatus::Comparing);
    }

    #[test]
    fn eliminated_set_only_grows() {
        let trace = binary_search(&ARRAY, 4, &BinarySearchOptions::default());
        for pair in trace.steps().windows(2) {
            let before: BTreeSet<_> = pair[0].payload.eliminated.iter().collect();
            let after: BTreeSet<_> = pair[1].payload.eliminated.iter().collect();
            assert!(before.is_subset(&after));
        }
    }

    #[test]
    fn target_out_of_range_runs_to_not_found() {
        let trace = binary_search(&ARRAY, 1_000, &BinarySearchOptions::default());
        let last = &trace.last().payload;

        assert_eq!(last.phase, SearchPhase::NotFound);
        assert!(last.low > last.high);
        assert_eq!(last.eliminated.len(), ARRAY.len());
        assert_eq!(mids(&trace), vec![3, 5, 6, 7]);
    }

    #[test]
    fn last_probe_is_the_not_found_step() {
        let trace = binary_search(&ARRAY, 1_000, &BinarySearchOptions::default());
        // Initialized plus one step per probe, nothing after the last probe.
        assert_eq!(trace.len(), 1 + 4);
        let last = &trace.last().payload;
        assert_eq!(last.phase, SearchPhase::NotFound);
        assert_eq!(last.mid, Some(7));
        assert_eq!(last.comparison, Some(Comparison::Less));
        let terminal = trace.iter().filter(|s| s.payload.is_terminal()).count();
        assert_eq!(terminal, 1);
    }

    #[test]
    fn empty_array_is_a_single_terminal_step() {
        let trace = binary_search(&[], 7, &BinarySearchOptions::default());
        assert_eq!(trace.len(), 1);
        assert_eq!(trace.first().payload.phase, SearchPhase::NotFound);
    }

    #[test]
    fn descending_order_goes_the_other_way() {
        let options = BinarySearchOptions { order: Order::Descending };
        let trace = binary_search(&ARRAY, 45, &options);

        // Sorted copy: [52, 45, 38, 31, 23, 18, 12, 5]; mid 3 holds 31, which
        // comes after 45 in descending order.
        let probe = &trace.get(1).unwrap().payload;
        assert_eq!(probe.mid, Some(3));
        assert_eq!(probe.comparison, Some(Comparison::Greater));
        assert_eq!(trace.last().payload.found_at(), Some(1));
    }

    #[test]
    fn unsorted_input_is_sorted_first() {
        let trace = binary_search(&[9, 1, 5], 5, &BinarySearchOptions::default());
        let values: Vec<_> = trace.first().payload.elements.iter().map(|e| e.value).collect();
        assert_eq!(values, vec![1, 5, 9]);
        assert_eq!(trace.last().payload.found_at(), Some(1));
    }

    proptest! {
        #[test]
        fn length_is_logarithmic(mut values in proptest::collection::vec(-1_000i64..1_000, 1..200), target in -1_100i64..1_100) {
            values.sort();
            let trace = binary_search(&values, target, &BinarySearchOptions::default());
            prop_assert!(trace.len() <= ceil_log2(values.len()) + 2);
        }

        #[test]
        fn outcome_agrees_with_std(values in proptest::collection::vec(-50i64..50, 0..60), target in -60i64..60) {
            let trace = binary_search(&values, target, &BinarySearchOptions::default());
            let last = &trace.last().payload;
            prop_assert!(last.is_terminal());
            prop_assert_eq!(last.phase == SearchPhase::Found, values.contains(&target));
            if let Some(i) = last.found_at() {
                prop_assert_eq!(last.elements[i].value, target);
            }
        }

        #[test]
        fn deterministic(values in proptest::collection::vec(any::<i64>(), 0..40), target in any::<i64>()) {
            let a = binary_search(&values, target, &BinarySearchOptions::default());
            let b = binary_search(&values, target, &BinarySearchOptions::default());
            prop_assert_eq!(serde_json::to_string(&a).unwrap(), serde_json::to_string(&b).unwrap());
        }
    }
}
