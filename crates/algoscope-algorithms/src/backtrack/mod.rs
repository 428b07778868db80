//! Backtracking searches: N-Queens and maze solving.

mod maze;
mod n_queens;

pub use maze::{maze, BlockReason, CellState, Maze, MazeEvent, MazeOptions, MazeStep};
pub use n_queens::{n_queens, Conflict, NQueensEvent, NQueensOptions, NQueensStep, MAX_BOARD_SIZE};

/// Default cap on recorded steps for a backtracking search.
pub const DEFAULT_STEP_LIMIT: usize = 20_000;
