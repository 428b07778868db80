//! Reconstructing the visible state at an arbitrary trace position.
//!
//! Two strategies exist:
//!
//! - **Snapshot**: every step carries a full copy of the working state, so
//!   seeking is a lookup. Used for arrays, small graphs and boards.
//! - **Fold**: steps carry only the change they made, and the state at step
//!   `k` is rebuilt by applying steps `0..=k` to an empty state. Used where
//!   state has cross-step relationships (probe history, visited sets, DP
//!   provenance) that are awkward to copy wholesale.

use serde::{Deserialize, Serialize};

use crate::step::Step;

/// Which strategy a payload type uses for seeking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reconstruction {
    Snapshot,
    Fold,
}

/// A payload that embeds a full copy of the working state.
pub trait Snapshot {
    type State;

    /// The state at this step.
    fn snapshot(&self) -> &Self::State;
}

/// A payload that describes a change to be applied to an accumulator.
///
/// `apply` must be deterministic and must only depend on the accumulator
/// and the payload, so folding the same prefix twice gives the same state.
pub trait Fold {
    type State: Default;

    /// Apply this step's change to `state`.
    fn apply(&self, state: &mut Self::State);
}

/// What the playback controller needs from a payload type.
pub trait Replay: Sized {
    type State: Clone + PartialEq + std::fmt::Debug;

    /// The strategy this payload uses.
    const RECONSTRUCTION: Reconstruction;

    /// The visible state after `steps[index]` has happened.
    ///
    /// Callers guarantee `index < steps.len()`.
    fn replay(steps: &[Step<Self>], index: usize) -> Self::State;
}

/// Read the state embedded in `steps[index]`.
pub fn snapshot_at<P>(steps: &[Step<P>], index: usize) -> P::State
where
    P: Snapshot,
    P::State: Clone,
{
    steps[index].payload.snapshot().clone()
}

/// Rebuild the state after `steps[index]` by folding `steps[0..=index]`.
pub fn fold_to<P: Fold>(steps: &[Step<P>], index: usize) -> P::State {
    let mut state = P::State::default();
    for step in steps.iter().take(index + 1) {
        step.payload.apply(&mut state);
    }
    state
}

/// Implement [`Replay`] by reading snapshots.
#[macro_export]
macro_rules! replay_by_snapshot {
    ($payload:ty) => {
        impl $crate::Replay for $payload {
            type State = <$payload as $crate::Snapshot>::State;

            const RECONSTRUCTION: $crate::Reconstruction =
                $crate::Reconstruction::Snapshot;

            fn replay(steps: &[$crate::Step<Self>], index: usize) -> Self::State {
                $crate::snapshot_at(steps, index)
            }
        }
    };
}

/// Implement [`Replay`] by folding.
#[macro_export]
macro_rules! replay_by_fold {
    ($payload:ty) => {
        impl $crate::Replay for $payload {
            type State = <$payload as $crate::Fold>::State;

            const RECONSTRUCTION: $crate::Reconstruction =
                $crate::Reconstruction::Fold;

            fn replay(steps: &[$crate::Step<Self>], index: usize) -> Self::State {
                $crate::fold_to(steps, index)
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::step::Tracer;

    /// A counter trace usable with both strategies.
    #[derive(Debug, Clone, Default, PartialEq)]
    struct Tick {
        delta: i64,
        total: i64,
    }

    impl Snapshot for Tick {
        type State = i64;

        fn snapshot(&self) -> &i64 {
            &self.total
        }
    }

    impl Fold for Tick {
        type State = i64;

        fn apply(&self, state: &mut i64) {
            *state += self.delta;
        }
    }

    fn ticks() -> Vec<Step<Tick>> {
        let mut tracer = Tracer::new("ticks");
        let mut total = 0;
        for delta in [3, -1, 4, -1, 5] {
            total += delta;
            tracer.record(format!("add {delta}"), Tick { delta, total });
        }
        tracer.finish().steps().to_vec()
    }

    #[test]
    fn fold_matches_snapshot_everywhere() {
        let steps = ticks();
        for index in 0..steps.len() {
            assert_eq!(fold_to(&steps, index), snapshot_at(&steps, index));
        }
    }

    #[test]
    fn folding_twice_is_identical() {
        let steps = ticks();
        assert_eq!(fold_to(&steps, 3), fold_to(&steps, 3));
        assert_eq!(fold_to(&steps, 3), 5);
    }
}
