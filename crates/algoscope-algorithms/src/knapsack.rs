//! 0/1 knapsack by dynamic programming.
//!
//! Steps carry only the cell they filled, so the visible table at any step is
//! rebuilt by folding. Each fill remembers the cells it read from, which the
//! renderer shows as sources; the backtrack marks the optimal path.

use algoscope_trace::{Fold, Trace, Tracer};
use serde::{Deserialize, Serialize};

/// Largest table, in cells, that is filled step by step.
pub const MAX_KNAPSACK_CELLS: usize = 100_000;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    pub weight: usize,
    pub value: u64,
}

impl Item {
    pub fn new(name: impl Into<String>, weight: usize, value: u64) -> Self {
        Self {
            name: name.into(),
            weight,
            value,
        }
    }
}

/// One table cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DpCell {
    /// Wider than item values so a sum of `u64` values cannot overflow.
    pub value: u128,
    pub computed: bool,
    /// Read by the most recent fill.
    pub is_source: bool,
    pub is_on_path: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum KnapsackStep {
    /// Table allocated; row 0 and column 0 are zero.
    Init { items: Vec<Item>, capacity: usize },
    /// `dp[item][weight]` computed from `sources`.
    Fill {
        item: usize,
        weight: usize,
        value: u128,
        took: bool,
        sources: Vec<(usize, usize)>,
    },
    /// Backtrack visited `dp[item][weight]`; `took` when the value differs
    /// from the row above.
    Backtrack { item: usize, weight: usize, took: bool },
    /// Walk reached row 0 at `weight`.
    Done { best: u128, chosen: Vec<usize>, weight: usize },
    /// Capacity is not positive.
    Invalid { capacity: i64 },
    /// The table would have more than `limit` cells.
    TooLarge { items: usize, capacity: usize, limit: usize },
}

impl Default for KnapsackStep {
    fn default() -> Self {
        KnapsackStep::Invalid { capacity: 0 }
    }
}

/// Table state rebuilt by folding [`KnapsackStep`]s.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnapsackTable {
    pub items: Vec<Item>,
    pub capacity: usize,
    /// `cells[i][w]` for `i` in `0..=items.len()`, `w` in `0..=capacity`.
    pub cells: Vec<Vec<DpCell>>,
    pub current: Option<(usize, usize)>,
    /// Item indices taken, in backtrack order.
    pub chosen: Vec<usize>,
    pub best: Option<u128>,
    sources: Vec<(usize, usize)>,
}

impl KnapsackTable {
    fn clear_sources(&mut self) {
        for (i, w) in self.sources.drain(..) {
            if let Some(cell) = self.cells.get_mut(i).and_then(|row| row.get_mut(w)) {
                cell.is_source = false;
            }
        }
    }

    fn cell_mut(&mut self, item: usize, weight: usize) -> Option<&mut DpCell> {
        self.cells.get_mut(item).and_then(|row| row.get_mut(weight))
    }
}

impl Fold for KnapsackStep {
    type State = KnapsackTable;

    fn apply(&self, table: &mut KnapsackTable) {
        match self {
            KnapsackStep::Init { items, capacity } => {
                *table = KnapsackTable {
                    items: items.clone(),
                    capacity: *capacity,
                    cells: (0..=items.len())
                        .map(|i| {
                            (0..=*capacity)
                                .map(|w| DpCell {
                                    computed: i == 0 || w == 0,
                                    ..Default::default()
                                })
                                .collect()
                        })
                        .collect(),
                    ..Default::default()
                };
            }
            KnapsackStep::Fill {
                item,
                weight,
                value,
                sources,
                ..
            } => {
                table.clear_sources();
                if let Some(cell) = table.cell_mut(*item, *weight) {
                    cell.value = *value;
                    cell.computed = true;
                }
                for &(i, w) in sources {
                    if let Some(cell) = table.cell_mut(i, w) {
                        cell.is_source = true;
                    }
                }
                table.sources = sources.clone();
                table.current = Some((*item, *weight));
            }
            KnapsackStep::Backtrack { item, weight, took } => {
                table.clear_sources();
                if let Some(cell) = table.cell_mut(*item, *weight) {
                    cell.is_on_path = true;
                }
                if *took {
                    table.chosen.push(item - 1);
                }
                table.current = Some((*item, *weight));
            }
            KnapsackStep::Done { best, weight, .. } => {
                if let Some(cell) = table.cell_mut(0, *weight) {
                    cell.is_on_path = true;
                }
                table.best = Some(*best);
                table.current = None;
            }
            KnapsackStep::Invalid { .. } | KnapsackStep::TooLarge { .. } => *table = KnapsackTable::default(),
        }
    }
}

algoscope_trace::replay_by_fold!(KnapsackStep);

/// Trace the 0/1 knapsack table fill and backtrack.
///
/// `dp[i][w]` is the best value using the first `i` items within weight `w`.
/// Taking item `i` only wins on a strictly larger value. The backtrack starts
/// at `dp[n][capacity]` and moves up one row per step, subtracting the
/// item's weight whenever the value differs from the row above. A table
/// over [`MAX_KNAPSACK_CELLS`] is refused with a single explanatory step.
pub fn knapsack(items: &[Item], capacity: i64) -> Trace<KnapsackStep> {
    let mut tracer = Tracer::new("knapsack");
    let Ok(capacity) = usize::try_from(capacity) else {
        tracer.record(
            format!("Capacity {capacity} is negative: nothing fits"),
            KnapsackStep::Invalid { capacity },
        );
        return tracer.finish();
    };
    if capacity == 0 {
        tracer.record(
            "Capacity 0: nothing fits, best value is 0",
            KnapsackStep::Invalid { capacity: 0 },
        );
        return tracer.finish();
    }

    let n = items.len();
    let cells = n.saturating_add(1).saturating_mul(capacity.saturating_add(1));
    if cells > MAX_KNAPSACK_CELLS {
        tracer.record(
            format!(
                "Table of {} × {} would exceed {MAX_KNAPSACK_CELLS} cells: too large to trace",
                n + 1,
                capacity.saturating_add(1)
            ),
            KnapsackStep::TooLarge {
                items: n,
                capacity,
                limit: MAX_KNAPSACK_CELLS,
            },
        );
        return tracer.finish();
    }
    let mut dp = vec![vec![0u128; capacity + 1]; n + 1];
    tracer.record(
        format!("Table of {} × {}: row 0 and column 0 are 0", n + 1, capacity + 1),
        KnapsackStep::Init {
            items: items.to_vec(),
            capacity,
        },
    );

    for i in 1..=n {
        let item = &items[i - 1];
        for w in 1..=capacity {
            let skip = dp[i - 1][w];
            let (value, took, sources, description) = if item.weight <= w {
                let take = dp[i - 1][w - item.weight] + u128::from(item.value);
                let took = take > skip;
                let description = format!(
                    "dp[{i}][{w}] = max({skip}, dp[{}][{}] + {} = {take}) = {}",
                    i - 1,
                    w - item.weight,
                    item.value,
                    skip.max(take)
                );
                (skip.max(take), took, vec![(i - 1, w), (i - 1, w - item.weight)], description)
            } else {
                let description = format!(
                    "{} (weight {}) does not fit in {w}: dp[{i}][{w}] = dp[{}][{w}] = {skip}",
                    item.name,
                    item.weight,
                    i - 1
                );
                (skip, false, vec![(i - 1, w)], description)
            };
            dp[i][w] = value;
            tracer.record(
                description,
                KnapsackStep::Fill {
                    item: i,
                    weight: w,
                    value,
                    took,
                    sources,
                },
            );
        }
    }

    let best = dp[n][capacity];
    let mut chosen = Vec::new();
    let mut w = capacity;
    for i in (1..=n).rev() {
        let took = dp[i][w] != dp[i - 1][w];
        let description = if took {
            format!(
                "dp[{i}][{w}] ≠ dp[{}][{w}]: take {}, weight {} → {}",
                i - 1,
                items[i - 1].name,
                w,
                w - items[i - 1].weight
            )
        } else {
            format!("dp[{i}][{w}] = dp[{}][{w}]: skip {}", i - 1, items[i - 1].name)
        };
        tracer.record(description, KnapsackStep::Backtrack { item: i, weight: w, took });
        if took {
            chosen.push(i - 1);
            w -= items[i - 1].weight;
        }
    }

    let names: Vec<&str> = chosen.iter().map(|&i| items[i].name.as_str()).collect();
    tracer.record(
        format!("Best value {best} using [{}]", names.join(", ")),
        KnapsackStep::Done {
            best,
            chosen: chosen.clone(),
            weight: w,
        },
    );
    tracing::debug!(items = n, capacity, best, "knapsack traced");
    tracer.finish()
}
