//! Maze solving by depth-first backtracking.

use algoscope_trace::{Snapshot, Trace, Tracer};
use serde::{Deserialize, Serialize};

use super::DEFAULT_STEP_LIMIT;

type Cell = (usize, usize);

/// Right, down, left, up.
const DIRECTIONS: [(isize, isize, &str); 4] = [(0, 1, "right"), (1, 0, "down"), (0, -1, "left"), (-1, 0, "up")];

/// A rectangular grid of walls and open cells.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Maze {
    rows: usize,
    cols: usize,
    walls: Vec<bool>,
}

impl Maze {
    /// Parse text rows: `#` is a wall, anything else is open. Short rows are
    /// padded with walls.
    pub fn parse<S: AsRef<str>>(lines: &[S]) -> Self {
        let rows = lines.len();
        let cols = lines.iter().map(|l| l.as_ref().chars().count()).max().unwrap_or(0);
        let mut walls = vec![true; rows * cols];
        for (r, line) in lines.iter().enumerate() {
            for (c, ch) in line.as_ref().chars().enumerate() {
                walls[r * cols + c] = ch == '#';
            }
        }
        Self { rows, cols, walls }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn is_wall(&self, (r, c): Cell) -> bool {
        self.walls[r * self.cols + c]
    }

    fn contains(&self, (r, c): Cell) -> bool {
        r < self.rows && c < self.cols
    }

    fn neighbor(&self, (r, c): Cell, dr: isize, dc: isize) -> Option<Cell> {
        let next = (r.checked_add_signed(dr)?, c.checked_add_signed(dc)?);
        self.contains(next).then_some(next)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MazeOptions {
    pub start: Cell,
    /// Bottom-right corner when unset.
    pub goal: Option<Cell>,
    pub step_limit: Option<usize>,
}

impl Default for MazeOptions {
    fn default() -> Self {
        Self {
            start: (0, 0),
            goal: None,
            step_limit: Some(DEFAULT_STEP_LIMIT),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellState {
    Wall,
    #[default]
    Unvisited,
    /// On the current path.
    Exploring,
    /// On the final path to the goal.
    Path,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockReason {
    Wall,
    /// Already on the current path.
    OnPath,
    /// Explored before and led nowhere.
    DeadEnd,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MazeEvent {
    Start,
    Enter { cell: Cell },
    Blocked { cell: Cell, reason: BlockReason },
    /// Dead end: `cell` goes from exploring back to unvisited.
    Backtrack { cell: Cell },
    Found { length: usize },
    NoPath,
    LimitReached { limit: usize },
    /// Empty grid, or start or goal outside it or on a wall.
    #[default]
    Invalid,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MazeStep {
    pub event: MazeEvent,
    pub rows: usize,
    pub cols: usize,
    /// Row-major cell states.
    pub cells: Vec<CellState>,
    pub path: Vec<Cell>,
    pub current: Option<Cell>,
}

impl MazeStep {
    pub fn cell(&self, (r, c): Cell) -> CellState {
        self.cells[r * self.cols + c]
    }
}

impl Snapshot for MazeStep {
    type State = MazeStep;

    fn snapshot(&self) -> &Self::State {
        self
    }
}

algoscope_trace::replay_by_snapshot!(MazeStep);

struct Solver<'m> {
    maze: &'m Maze,
    goal: Cell,
    limit: Option<usize>,
    tracer: Tracer<MazeStep>,
    cells: Vec<CellState>,
    dead: Vec<bool>,
    path: Vec<Cell>,
    halted: bool,
}

impl Solver<'_> {
    fn index(&self, (r, c): Cell) -> usize {
        r * self.maze.cols + c
    }

    fn record(&mut self, description: String, event: MazeEvent) {
        self.tracer.record(
            description,
            MazeStep {
                event,
                rows: self.maze.rows,
                cols: self.maze.cols,
                cells: self.cells.clone(),
                path: self.path.clone(),
                current: self.path.last().copied(),
            },
        );
        if let Some(limit) = self.limit {
            if self.tracer.len() >= limit {
                self.halted = true;
            }
        }
    }

    /// Step onto `cell`. Returns true when it is the goal or the search must stop.
    fn enter(&mut self, cell: Cell) -> bool {
        let at = self.index(cell);
        self.cells[at] = CellState::Exploring;
        self.path.push(cell);
        self.record(format!("Enter {cell:?}"), MazeEvent::Enter { cell });
        cell == self.goal || self.halted
    }

    fn retreat(&mut self, cell: Cell) {
        let at = self.index(cell);
        self.cells[at] = CellState::Unvisited;
        self.dead[at] = true;
        self.path.pop();
        self.record(
            format!("{cell:?} is a dead end: back up"),
            MazeEvent::Backtrack { cell },
        );
    }

    fn block_reason(&self, cell: Cell) -> Option<BlockReason> {
        if self.maze.is_wall(cell) {
            Some(BlockReason::Wall)
        } else if self.cells[self.index(cell)] == CellState::Exploring {
            Some(BlockReason::OnPath)
        } else if self.dead[self.index(cell)] {
            Some(BlockReason::DeadEnd)
        } else {
            None
        }
    }

    /// Depth-first search from `start`. Each stack entry is a cell on the
    /// path and the next direction to try from it.
    fn solve(&mut self, start: Cell) {
        if self.enter(start) {
            return;
        }
        let mut stack = vec![(start, 0)];
        while let Some(top) = stack.last_mut() {
            let (cell, dir) = *top;
            let Some(&(dr, dc, name)) = DIRECTIONS.get(dir) else {
                stack.pop();
                self.retreat(cell);
                if self.halted {
                    return;
                }
                continue;
            };
            top.1 += 1;

            let Some(next) = self.maze.neighbor(cell, dr, dc) else {
                continue;
            };
            match self.block_reason(next) {
                Some(reason) => {
                    let why = match reason {
                        BlockReason::Wall => "a wall",
                        BlockReason::OnPath => "already on the path",
                        BlockReason::DeadEnd => "a known dead end",
                    };
                    self.record(
                        format!("{name} of {cell:?}: {next:?} is {why}"),
                        MazeEvent::Blocked { cell: next, reason },
                    );
                    if self.halted {
                        return;
                    }
                }
                None => {
                    if self.enter(next) {
                        return;
                    }
                    stack.push((next, 0));
                }
            }
        }
    }
}

/// Trace a depth-first maze search.
///
/// Neighbours are tried right, down, left, up. A cell that leads nowhere is
/// reverted to unvisited by a backtrack step and remembered, so it is
/// reported as a dead end rather than explored twice.
pub fn maze(maze: &Maze, options: &MazeOptions) -> Trace<MazeStep> {
    let start = options.start;
    let goal = options
        .goal
        .unwrap_or((maze.rows.saturating_sub(1), maze.cols.saturating_sub(1)));

    let mut solver = Solver {
        maze,
        goal,
        limit: options.step_limit,
        tracer: Tracer::new("maze"),
        cells: maze
            .walls
            .iter()
            .map(|&wall| if wall { CellState::Wall } else { CellState::Unvisited })
            .collect(),
        dead: vec![false; maze.walls.len()],
        path: Vec::new(),
        halted: false,
    };

    let problem = if maze.rows == 0 || maze.cols == 0 {
        Some("Maze is empty: there is nowhere to go".to_string())
    } else if !maze.contains(start) || maze.is_wall(start) {
        Some(format!("Start {start:?} is not an open cell"))
    } else if !maze.contains(goal) || maze.is_wall(goal) {
        Some(format!("Goal {goal:?} is not an open cell"))
    } else {
        None
    };
    if let Some(description) = problem {
        solver.record(description, MazeEvent::Invalid);
        return solver.tracer.finish();
    }

    solver.record(
        format!("Find a path from {start:?} to {goal:?}"),
        MazeEvent::Start,
    );
    if !solver.halted {
        solver.solve(start);
    }

    if solver.path.last() == Some(&goal) {
        for cell in solver.path.clone() {
            let at = solver.index(cell);
            solver.cells[at] = CellState::Path;
        }
        let length = solver.path.len();
        solver.record(format!("Reached {goal:?} in {length} cells"), MazeEvent::Found { length });
    } else if solver.halted {
        let limit = options.step_limit.unwrap_or_default();
        solver.record(format!("Stopped after {limit} steps"), MazeEvent::LimitReached { limit });
    } else {
        solver.record(format!("Every route from {start:?} is blocked: no path"), MazeEvent::NoPath);
    }

    tracing::debug!(rows = maze.rows, cols = maze.cols, steps = solver.tracer.len(), "maze traced");
    solver.tracer.finish()
}
