//! Error types for the 8-puzzle solver.

use thiserror::Error;

/// Everything that can go wrong between reading two boards and printing a solution.
#[derive(Debug, Error)]
pub enum PuzzleError {
    /// A board did not contain exactly nine labels.
    #[error("expected {expected} tiles, found {found}")]
    WrongTileCount { expected: usize, found: usize },

    /// A label outside `0..=8`.
    #[error("tile {0} is out of range (use 0-8, 0 for the blank)")]
    TileOutOfRange(i64),

    /// A label that appears twice, which also means another one is missing.
    #[error("tile {0} appears more than once")]
    DuplicateTile(u8),

    /// Text that is not an integer.
    #[error("could not read {0:?} as a tile number")]
    InvalidToken(String),

    /// Start and goal lie in different parity classes.
    #[error("start and goal have different inversion parity; this puzzle is not solvable")]
    Unsolvable,

    /// The frontier ran dry on a parity-matched pair. Should never happen.
    #[error("search exhausted every reachable state without reaching the goal")]
    SearchExhausted,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PuzzleError>;
