//! N-Queens by row-wise backtracking.

use algoscope_trace::{Snapshot, Trace, Tracer};
use serde::{Deserialize, Serialize};

use super::DEFAULT_STEP_LIMIT;

/// Largest board that is searched.
pub const MAX_BOARD_SIZE: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NQueensOptions {
    pub n: usize,
    /// Treat diagonals as attacks. Off gives the rooks puzzle.
    pub check_diagonals: bool,
    /// Keep searching after the first solution.
    pub find_all: bool,
    /// Stop with a limit step once this many steps are recorded.
    pub step_limit: Option<usize>,
}

impl Default for NQueensOptions {
    fn default() -> Self {
        Self {
            n: 8,
            check_diagonals: true,
            find_all: false,
            step_limit: Some(DEFAULT_STEP_LIMIT),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Conflict {
    Column,
    Diagonal,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NQueensEvent {
    Start,
    /// Candidate square attacked by the queen on `by_row`.
    Conflict { row: usize, col: usize, by_row: usize, conflict: Conflict },
    Place { row: usize, col: usize },
    /// Queen taken back while backtracking.
    Remove { row: usize, col: usize },
    Solution { number: usize },
    /// Search finished; `solutions` found in total.
    Finished { solutions: usize },
    LimitReached { limit: usize },
    /// Board size 0.
    #[default]
    Empty,
    /// Board wider than [`MAX_BOARD_SIZE`].
    TooLarge { n: usize, limit: usize },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NQueensStep {
    pub event: NQueensEvent,
    pub n: usize,
    /// Column of the queen in each row, if placed.
    pub queens: Vec<Option<usize>>,
    pub solutions: usize,
}

impl Snapshot for NQueensStep {
    type State = NQueensStep;

    fn snapshot(&self) -> &Self::State {
        self
    }
}

algoscope_trace::replay_by_snapshot!(NQueensStep);

struct Search {
    options: NQueensOptions,
    tracer: Tracer<NQueensStep>,
    queens: Vec<Option<usize>>,
    solutions: usize,
    halted: bool,
}

impl Search {
    fn record(&mut self, description: String, event: NQueensEvent) {
        self.tracer.record(
            description,
            NQueensStep {
                event,
                n: self.options.n,
                queens: self.queens.clone(),
                solutions: self.solutions,
            },
        );
        if let Some(limit) = self.options.step_limit {
            if !self.halted && self.tracer.len() >= limit {
                self.halted = true;
            }
        }
    }

    fn conflict(&self, row: usize, col: usize) -> Option<(usize, Conflict)> {
        self.queens[..row].iter().enumerate().find_map(|(r, placed)| {
            let c = (*placed)?;
            if c == col {
                Some((r, Conflict::Column))
            } else if self.options.check_diagonals && row - r == c.abs_diff(col) {
                Some((r, Conflict::Diagonal))
            } else {
                None
            }
        })
    }

    /// Returns true once the search should stop.
    fn solve(&mut self, row: usize) -> bool {
        let n = self.options.n;
        if row == n {
            self.solutions += 1;
            let number = self.solutions;
            self.record(format!("All {n} queens placed: solution {number}"), NQueensEvent::Solution { number });
            return self.halted || !self.options.find_all;
        }

        for col in 0..n {
            if self.halted {
                return true;
            }
            if let Some((by_row, conflict)) = self.conflict(row, col) {
                let why = match conflict {
                    Conflict::Column => "same column",
                    Conflict::Diagonal => "same diagonal",
                };
                self.record(
                    format!("({row}, {col}) is attacked by the queen in row {by_row}: {why}"),
                    NQueensEvent::Conflict {
                        row,
                        col,
                        by_row,
                        conflict,
                    },
                );
                continue;
            }

            self.queens[row] = Some(col);
            self.record(format!("Place a queen at ({row}, {col})"), NQueensEvent::Place { row, col });
            if self.halted || self.solve(row + 1) {
                return true;
            }
            self.queens[row] = None;
            let description = if row + 1 == n {
                format!("Take back the queen at ({row}, {col}) to look for more solutions")
            } else {
                format!("Row {} has no safe square left: remove the queen at ({row}, {col})", row + 1)
            };
            self.record(description, NQueensEvent::Remove { row, col });
        }
        self.halted
    }
}

/// Trace the N-Queens search.
///
/// Rows are filled top to bottom, columns tried left to right. Each attacked
/// candidate is a conflict step, each placement and each removal its own
/// step.
pub fn n_queens(options: &NQueensOptions) -> Trace<NQueensStep> {
    let n = options.n;
    if n > MAX_BOARD_SIZE {
        let mut tracer = Tracer::new("n_queens");
        tracer.record(
            format!("A {n} × {n} board is larger than {MAX_BOARD_SIZE} × {MAX_BOARD_SIZE}: too large to search"),
            NQueensStep {
                event: NQueensEvent::TooLarge { n, limit: MAX_BOARD_SIZE },
                n,
                ..Default::default()
            },
        );
        return tracer.finish();
    }

    let mut search = Search {
        options: *options,
        tracer: Tracer::new("n_queens"),
        queens: vec![None; n],
        solutions: 0,
        halted: false,
    };
    if n == 0 {
        search.record("Board size 0: nothing to place".to_string(), NQueensEvent::Empty);
        return search.tracer.finish();
    }

    search.record(format!("Place {n} queens on a {n} × {n} board"), NQueensEvent::Start);
    search.solve(0);

    let solutions = search.solutions;
    match options.step_limit {
        Some(limit) if search.halted => {
            search.record(
                format!("Stopped after {limit} steps with {solutions} solution(s)"),
                NQueensEvent::LimitReached { limit },
            );
        }
        _ => {
            let description = match solutions {
                0 => format!("No way to place {n} queens"),
                1 => "Found a solution".to_string(),
                s => format!("Found {s} solutions"),
            };
            search.record(description, NQueensEvent::Finished { solutions });
        }
    }
    tracing::debug!(n, solutions, steps = search.tracer.len(), "n-queens traced");
    search.tracer.finish()
}
