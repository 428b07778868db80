//! Comparison sorting: bubble, insertion and quicksort.
//!
//! All three share one step vocabulary ([`SortAction`]). Every step stores a
//! full snapshot of the array, and because each action names exactly the
//! mutation it made, the same view can also be rebuilt by folding the
//! actions from the start. The two are cross-checked in tests.

mod bubble;
mod insertion;
mod quick;

pub use bubble::{bubble_sort, BubbleOptions};
pub use insertion::{insertion_sort, InsertionOptions};
pub use quick::{quick_sort, PivotRule, QuickOptions};

use algoscope_trace::{Fold, Snapshot, Trace, Tracer};
use serde::{Deserialize, Serialize};

use crate::element::{Element, ElementStatus};
use crate::order::Order;

/// What happened on one sorting step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SortAction {
    /// Input loaded.
    Start { values: Vec<i64> },
    /// Adjacent pair compared.
    Compare { left: usize, right: usize },
    /// Two positions exchanged.
    Swap { left: usize, right: usize },
    /// A bubble pass finished; `sorted` is now final.
    PassComplete { sorted: usize },
    /// Insertion key lifted out of `index`.
    Lift { index: usize },
    /// Key (sitting at `hole`) compared with `index`.
    KeyCompare { index: usize, hole: usize },
    /// Element at `from` moved one slot right to `to`; the key moves to `from`.
    Shift { from: usize, to: usize },
    /// Key settled at `index`; prefix `0..=sorted_through` is ordered.
    Insert { index: usize, sorted_through: usize },
    /// Pivot chosen for the current partition.
    SelectPivot { index: usize },
    /// Element compared against the pivot.
    ComparePivot { index: usize, pivot: usize },
    /// Pivot reached its final position.
    PivotPlaced { index: usize },
    /// Single-element range is trivially in place.
    MarkSorted { index: usize },
    Done,
}

impl Default for SortAction {
    fn default() -> Self {
        SortAction::Start { values: Vec::new() }
    }
}

/// What the renderer draws for a sorting step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortView {
    pub elements: Vec<Element>,
    /// Current position of the lifted insertion key.
    pub inserting_index: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortStep {
    pub action: SortAction,
    pub view: SortView,
}

impl Snapshot for SortStep {
    type State = SortView;

    fn snapshot(&self) -> &SortView {
        &self.view
    }
}

algoscope_trace::replay_by_snapshot!(SortStep);

/// Working array rebuilt purely from actions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortBoard {
    pub values: Vec<i64>,
    pub sorted: Vec<bool>,
    pub view: SortView,
}

impl Fold for SortStep {
    type State = SortBoard;

    fn apply(&self, board: &mut SortBoard) {
        match &self.action {
            SortAction::Start { values } => {
                board.values = values.clone();
                board.sorted = vec![false; values.len()];
            }
            SortAction::Swap { left, right } => board.values.swap(*left, *right),
            SortAction::Shift { from, to } => board.values.swap(*from, *to),
            SortAction::PassComplete { sorted: index }
            | SortAction::PivotPlaced { index }
            | SortAction::MarkSorted { index } => board.sorted[*index] = true,
            SortAction::Insert { sorted_through, .. } => {
                for flag in board.sorted.iter_mut().take(sorted_through + 1) {
                    *flag = true;
                }
            }
            SortAction::Done => board.sorted.iter_mut().for_each(|flag| *flag = true),
            SortAction::Compare { .. }
            | SortAction::Lift { .. }
            | SortAction::KeyCompare { .. }
            | SortAction::SelectPivot { .. }
            | SortAction::ComparePivot { .. } => {}
        }
        board.view = render(&board.values, &board.sorted, &self.action);
    }
}

/// Statuses for one step: sorted flags underneath, action highlights on top.
pub(crate) fn render(values: &[i64], sorted: &[bool], action: &SortAction) -> SortView {
    let mut elements: Vec<Element> = values
        .iter()
        .zip(sorted)
        .map(|(&value, &done)| {
            let status = if done { ElementStatus::Sorted } else { ElementStatus::Default };
            Element::new(value, status)
        })
        .collect();
    let mut inserting_index = None;

    let mut mark = |index: usize, status: ElementStatus| {
        if let Some(element) = elements.get_mut(index) {
            element.status = status;
        }
    };
    match *action {
        SortAction::Compare { left, right } | SortAction::Swap { left, right } => {
            mark(left, ElementStatus::Comparing);
            mark(right, ElementStatus::Comparing);
        }
        SortAction::Lift { index } => inserting_index = Some(index),
        SortAction::KeyCompare { index, hole } => {
            mark(index, ElementStatus::Comparing);
            inserting_index = Some(hole);
        }
        SortAction::Shift { from, to } => {
            mark(to, ElementStatus::Comparing);
            inserting_index = Some(from);
        }
        SortAction::SelectPivot { index } => mark(index, ElementStatus::Pivot),
        SortAction::ComparePivot { index, pivot } => {
            mark(index, ElementStatus::Comparing);
            mark(pivot, ElementStatus::Pivot);
        }
        _ => {}
    }

    SortView {
        elements,
        inserting_index,
    }
}

/// Runs the real algorithm's mutations and records each as a step.
pub(crate) struct SortRecorder {
    tracer: Tracer<SortStep>,
    values: Vec<i64>,
    sorted: Vec<bool>,
}

impl SortRecorder {
    pub(crate) fn new(algorithm: &'static str, values: &[i64], order: Order) -> Self {
        let mut recorder = Self {
            tracer: Tracer::new(algorithm),
            values: values.to_vec(),
            sorted: vec![false; values.len()],
        };
        let description = if values.is_empty() {
            "Array is empty: nothing to sort".to_string()
        } else {
            format!("Sort {} values in {} order", values.len(), order.label())
        };
        recorder.record(
            description,
            SortAction::Start {
                values: values.to_vec(),
            },
        );
        recorder
    }

    pub(crate) fn values(&self) -> &[i64] {
        &self.values
    }

    pub(crate) fn len(&self) -> usize {
        self.values.len()
    }

    fn record(&mut self, description: String, action: SortAction) {
        let view = render(&self.values, &self.sorted, &action);
        self.tracer.record(description, SortStep { action, view });
    }

    pub(crate) fn compare(&mut self, left: usize, right: usize) {
        let description = format!(
            "Compare a[{left}] = {} with a[{right}] = {}",
            self.values[left], self.values[right]
        );
        self.record(description, SortAction::Compare { left, right });
    }

    pub(crate) fn swap(&mut self, left: usize, right: usize) {
        let description = format!(
            "Swap a[{left}] = {} and a[{right}] = {}",
            self.values[left], self.values[right]
        );
        self.values.swap(left, right);
        self.record(description, SortAction::Swap { left, right });
    }

    pub(crate) fn pass_complete(&mut self, index: usize) {
        self.sorted[index] = true;
        let description = format!("Pass complete: {} is in its final place at {index}", self.values[index]);
        self.record(description, SortAction::PassComplete { sorted: index });
    }

    pub(crate) fn lift(&mut self, index: usize) {
        let description = format!("Lift key {} out of position {index}", self.values[index]);
        self.record(description, SortAction::Lift { index });
    }

    pub(crate) fn key_compare(&mut self, index: usize, hole: usize) {
        let description = format!(
            "Compare key {} with a[{index}] = {}",
            self.values[hole], self.values[index]
        );
        self.record(description, SortAction::KeyCompare { index, hole });
    }

    pub(crate) fn shift(&mut self, from: usize, to: usize) {
        let description = format!("Shift {} right from {from} to {to}", self.values[from]);
        self.values.swap(from, to);
        self.record(description, SortAction::Shift { from, to });
    }

    pub(crate) fn insert(&mut self, index: usize, sorted_through: usize) {
        for flag in self.sorted.iter_mut().take(sorted_through + 1) {
            *flag = true;
        }
        let description = format!(
            "Insert key {} at {index}; positions 0..={sorted_through} are ordered",
            self.values[index]
        );
        self.record(description, SortAction::Insert { index, sorted_through });
    }

    pub(crate) fn select_pivot(&mut self, index: usize) {
        let description = format!("Choose pivot a[{index}] = {}", self.values[index]);
        self.record(description, SortAction::SelectPivot { index });
    }

    pub(crate) fn compare_pivot(&mut self, index: usize, pivot: usize) {
        let description = format!(
            "Compare a[{index}] = {} with pivot {}",
            self.values[index], self.values[pivot]
        );
        self.record(description, SortAction::ComparePivot { index, pivot });
    }

    pub(crate) fn pivot_placed(&mut self, index: usize) {
        self.sorted[index] = true;
        let description = format!("Pivot {} is in its final place at {index}", self.values[index]);
        self.record(description, SortAction::PivotPlaced { index });
    }

    pub(crate) fn mark_sorted(&mut self, index: usize) {
        self.sorted[index] = true;
        let description = format!("Single element {} at {index} is in place", self.values[index]);
        self.record(description, SortAction::MarkSorted { index });
    }

    pub(crate) fn finish(mut self) -> Trace<SortStep> {
        if !self.values.is_empty() {
            self.sorted.iter_mut().for_each(|flag| *flag = true);
            let description = format!("Sorted: {:?}", self.values);
            self.record(description, SortAction::Done);
        }
        self.tracer.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use algoscope_trace::{fold_to, snapshot_at};
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn assert_round_trip(trace: &Trace<SortStep>) {
        for index in 0..trace.len() {
            let folded = fold_to(trace.steps(), index);
            assert_eq!(folded.view, snapshot_at(trace.steps(), index), "step {index}");
        }
    }

    #[test]
    fn fold_matches_snapshot_for_each_sorter() {
        let values = [5, 1, 4, 2, 8, 2];
        assert_round_trip(&bubble_sort(&values, &BubbleOptions::default()));
        assert_round_trip(&insertion_sort(&values, &InsertionOptions::default()));
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let options = QuickOptions {
            pivot: PivotRule::Random,
            ..Default::default()
        };
        assert_round_trip(&quick_sort(&values, &options, &mut rng));
    }

    #[test]
    fn empty_input_is_a_single_step() {
        for trace in [
            bubble_sort(&[], &BubbleOptions::default()),
            insertion_sort(&[], &InsertionOptions::default()),
        ] {
            assert_eq!(trace.len(), 1);
            assert!(trace.first().description.contains("empty"));
        }
    }

    proptest! {
        #[test]
        fn round_trip_holds(values in proptest::collection::vec(-20i64..20, 0..12), descending in any::<bool>()) {
            let order = if descending { Order::Descending } else { Order::Ascending };
            let bubble = bubble_sort(&values, &BubbleOptions { order, early_exit: descending });
            let insertion = insertion_sort(&values, &InsertionOptions { order });
            for trace in [bubble, insertion] {
                for index in 0..trace.len() {
                    let folded = fold_to(trace.steps(), index);
                    prop_assert_eq!(folded.view, snapshot_at(trace.steps(), index));
                }
            }
        }

        #[test]
        fn final_view_is_sorted(values in proptest::collection::vec(-20i64..20, 1..20), seed in any::<u64>()) {
            let mut expected = values.clone();
            expected.sort();
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let quick = quick_sort(&values, &QuickOptions { pivot: PivotRule::Random, ..Default::default() }, &mut rng);
            for trace in [
                bubble_sort(&values, &BubbleOptions::default()),
                insertion_sort(&values, &InsertionOptions::default()),
                quick,
            ] {
                let last = &trace.last().payload.view;
                let got: Vec<_> = last.elements.iter().map(|e| e.value).collect();
                prop_assert_eq!(&got, &expected);
                prop_assert!(last.elements.iter().all(|e| e.status == ElementStatus::Sorted));
            }
        }
    }
}
