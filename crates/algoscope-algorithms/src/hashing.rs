//! Open-addressing hash table with linear probing.
//!
//! Steps carry the single change they made; the bucket array and the probe
//! history of the current operation are rebuilt by folding.

use algoscope_trace::{Fold, Trace, Tracer};
use serde::{Deserialize, Serialize};

/// Largest table that is traced.
pub const MAX_BUCKETS: usize = 4096;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HashTableOptions {
    pub buckets: usize,
}

impl Default for HashTableOptions {
    fn default() -> Self {
        Self { buckets: 11 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum HashOp {
    Insert { key: i64 },
    Search { key: i64 },
}

impl HashOp {
    pub fn key(self) -> i64 {
        match self {
            HashOp::Insert { key } | HashOp::Search { key } => key,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeOutcome {
    Stored,
    Found,
    Duplicate,
    Missing,
    Full,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HashStep {
    Init { buckets: usize },
    /// An operation begins at its home bucket.
    Hash { op: HashOp, bucket: usize },
    Probe { bucket: usize, occupant: Option<i64> },
    /// Operation finished with `outcome` at `bucket`.
    Resolve { key: i64, bucket: Option<usize>, outcome: ProbeOutcome },
    /// Zero buckets.
    #[default]
    Invalid,
    /// More buckets than [`MAX_BUCKETS`].
    TooLarge { buckets: usize, limit: usize },
}

/// Table state rebuilt by folding [`HashStep`]s.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashTableState {
    pub buckets: Vec<Option<i64>>,
    pub current: Option<HashOp>,
    /// Buckets probed by the current operation, in order.
    pub probes: Vec<usize>,
    pub outcome: Option<ProbeOutcome>,
    /// Probes made across all operations.
    pub total_probes: usize,
}

impl Fold for HashStep {
    type State = HashTableState;

    fn apply(&self, state: &mut HashTableState) {
        match *self {
            HashStep::Init { buckets } => {
                *state = HashTableState {
                    buckets: vec![None; buckets],
                    ..Default::default()
                }
            }
            HashStep::Hash { op, .. } => {
                state.current = Some(op);
                state.probes.clear();
                state.outcome = None;
            }
            HashStep::Probe { bucket, .. } => {
                state.probes.push(bucket);
                state.total_probes += 1;
            }
            HashStep::Resolve { key, bucket, outcome } => {
                if let (ProbeOutcome::Stored, Some(slot)) = (outcome, bucket.and_then(|b| state.buckets.get_mut(b))) {
                    *slot = Some(key);
                }
                state.outcome = Some(outcome);
            }
            HashStep::Invalid | HashStep::TooLarge { .. } => *state = HashTableState::default(),
        }
    }
}

algoscope_trace::replay_by_fold!(HashStep);

/// Trace a sequence of inserts and searches.
///
/// A key's home bucket is `key mod buckets`; probing moves forward one bucket
/// per step and wraps. Inserting into a full table ends the trace with a
/// `Full` outcome.
pub fn hash_table(ops: &[HashOp], options: &HashTableOptions) -> Trace<HashStep> {
    let n = options.buckets;
    let mut tracer = Tracer::new("hash_table");
    if n == 0 {
        tracer.record("A table needs at least one bucket", HashStep::Invalid);
        return tracer.finish();
    }
    if n > MAX_BUCKETS {
        tracer.record(
            format!("{n} buckets is more than the {MAX_BUCKETS} that can be shown"),
            HashStep::TooLarge {
                buckets: n,
                limit: MAX_BUCKETS,
            },
        );
        return tracer.finish();
    }

    let mut buckets: Vec<Option<i64>> = vec![None; n];
    tracer.record(format!("{n} empty buckets"), HashStep::Init { buckets: n });

    let mut probes = 0usize;
    for &op in ops {
        let key = op.key();
        let home = key.rem_euclid(n as i64) as usize;
        let verb = match op {
            HashOp::Insert { .. } => "Insert",
            HashOp::Search { .. } => "Search for",
        };
        tracer.record(
            format!("{verb} {key}: {key} mod {n} = {home}"),
            HashStep::Hash { op, bucket: home },
        );

        let mut resolved = None;
        for offset in 0..n {
            let bucket = (home + offset) % n;
            let occupant = buckets[bucket];
            probes += 1;
            let description = match occupant {
                None => format!("Bucket {bucket} is empty"),
                Some(other) if other == key => format!("Bucket {bucket} holds {key}"),
                Some(other) => format!("Bucket {bucket} holds {other}: probe on"),
            };
            tracer.record(description, HashStep::Probe { bucket, occupant });

            resolved = match (op, occupant) {
                (HashOp::Insert { .. }, None) => Some((Some(bucket), ProbeOutcome::Stored)),
                (HashOp::Insert { .. }, Some(k)) if k == key => Some((Some(bucket), ProbeOutcome::Duplicate)),
                (HashOp::Search { .. }, None) => Some((None, ProbeOutcome::Missing)),
                (HashOp::Search { .. }, Some(k)) if k == key => Some((Some(bucket), ProbeOutcome::Found)),
                _ => None,
            };
            if resolved.is_some() {
                break;
            }
        }

        let (bucket, outcome) = resolved.unwrap_or(match op {
            HashOp::Insert { .. } => (None, ProbeOutcome::Full),
            HashOp::Search { .. } => (None, ProbeOutcome::Missing),
        });
        let description = match (outcome, bucket) {
            (ProbeOutcome::Stored, Some(b)) => format!("Store {key} in bucket {b}"),
            (ProbeOutcome::Duplicate, Some(b)) => format!("{key} is already in bucket {b}"),
            (ProbeOutcome::Found, Some(b)) => format!("Found {key} in bucket {b}"),
            (ProbeOutcome::Full, _) => format!("Every bucket is taken: the table is full, {key} cannot be inserted"),
            _ => format!("{key} is not in the table"),
        };
        if let (ProbeOutcome::Stored, Some(b)) = (outcome, bucket) {
            buckets[b] = Some(key);
        }
        tracer.record(description, HashStep::Resolve { key, bucket, outcome });
        if outcome == ProbeOutcome::Full {
            break;
        }
    }

    tracing::debug!(buckets = n, ops = ops.len(), probes, "hash table traced");
    tracer.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use algoscope_trace::fold_to;
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn final_state(trace: &Trace<HashStep>) -> HashTableState {
        fold_to(trace.steps(), trace.len() - 1)
    }

    fn insert(key: i64) -> HashOp {
        HashOp::Insert { key }
    }

    fn search(key: i64) -> HashOp {
        HashOp::Search { key }
    }

    #[test]
    fn collisions_probe_forward() {
        let options = HashTableOptions { buckets: 7 };
        let trace = hash_table(&[insert(10), insert(17), insert(24), search(24)], &options);
        let state = final_state(&trace);

        assert_eq!(state.buckets[3..6], [Some(10), Some(17), Some(24)]);
        assert_eq!(state.probes, vec![3, 4, 5]);
        assert_eq!(state.outcome, Some(ProbeOutcome::Found));
        assert_eq!(state.total_probes, 1 + 2 + 3 + 3);
    }

    #[test]
    fn search_stops_at_first_empty_bucket() {
        let options = HashTableOptions { buckets: 7 };
        let trace = hash_table(&[insert(10), insert(17), search(31)], &options);
        let state = final_state(&trace);
        assert_eq!(state.probes, vec![3, 4, 5]);
        assert_eq!(state.outcome, Some(ProbeOutcome::Missing));
    }

    #[test]
    fn probing_wraps_around() {
        let options = HashTableOptions { buckets: 5 };
        let trace = hash_table(&[insert(4), insert(9)], &options);
        let state = final_state(&trace);
        assert_eq!(state.buckets[0], Some(9));
        assert_eq!(state.probes, vec![4, 0]);
    }

    #[test]
    fn full_table_ends_the_trace() {
        let options = HashTableOptions { buckets: 2 };
        let trace = hash_table(&[insert(1), insert(2), insert(3), search(1)], &options);
        assert_eq!(
            trace.last().payload,
            HashStep::Resolve {
                key: 3,
                bucket: None,
                outcome: ProbeOutcome::Full,
            }
        );
    }

    #[test]
    fn duplicates_and_negative_keys() {
        let options = HashTableOptions { buckets: 5 };
        let trace = hash_table(&[insert(-1), insert(-1)], &options);
        let state = final_state(&trace);
        assert_eq!(state.buckets[4], Some(-1));
        assert_eq!(state.outcome, Some(ProbeOutcome::Duplicate));
    }

    #[test]
    fn probe_history_resets_per_operation() {
        let options = HashTableOptions { buckets: 7 };
        let trace = hash_table(&[insert(3), insert(10), insert(5)], &options);
        let hash_index = trace
            .iter()
            .rposition(|s| matches!(s.payload, HashStep::Hash { .. }))
            .unwrap();
        assert!(fold_to(trace.steps(), hash_index).probes.is_empty());
        assert_eq!(final_state(&trace).probes, vec![5]);
    }

    #[test]
    fn zero_buckets_is_explained() {
        let trace = hash_table(&[insert(1)], &HashTableOptions { buckets: 0 });
        assert_eq!(trace.len(), 1);
    }

    #[test]
    fn oversized_table_is_refused_without_allocating() {
        let trace = hash_table(&[insert(1)], &HashTableOptions { buckets: usize::MAX });
        assert_eq!(trace.len(), 1);
        assert_eq!(
            trace.first().payload,
            HashStep::TooLarge {
                buckets: usize::MAX,
                limit: MAX_BUCKETS,
            }
        );
        assert_eq!(final_state(&trace), HashTableState::default());

        let largest = hash_table(&[insert(1)], &HashTableOptions { buckets: MAX_BUCKETS });
        assert_eq!(final_state(&largest).buckets.len(), MAX_BUCKETS);
    }

    proptest! {
        #[test]
        fn searches_agree_with_a_set(
            inserts in proptest::collection::vec(-50i64..50, 0..10),
            probes in proptest::collection::vec(-50i64..50, 0..10),
        ) {
            let options = HashTableOptions { buckets: 13 };
            let mut ops: Vec<HashOp> = inserts.iter().map(|&k| insert(k)).collect();
            let set: HashSet<i64> = inserts.iter().copied().collect();

            for &key in &probes {
                ops.push(search(key));
                let trace = hash_table(&ops, &options);
                let expected = if set.contains(&key) { ProbeOutcome::Found } else { ProbeOutcome::Missing };
                prop_assert_eq!(final_state(&trace).outcome, Some(expected));
                ops.pop();
            }

            let trace = hash_table(&ops, &options);
            let stored: HashSet<i64> = final_state(&trace).buckets.iter().flatten().copied().collect();
            prop_assert_eq!(stored, set);
        }
    }
}
