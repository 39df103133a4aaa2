// Error taxonomy for board and session construction

use thiserror::Error;

/// Raised when a game cannot be started with the requested parameters.
/// Nothing is allocated or mutated when one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("board must have at least one row and one column (got {rows}x{columns})")]
    EmptyBoard { rows: usize, columns: usize },

    #[error("board of {rows}x{columns} cells is too large")]
    BoardTooLarge { rows: usize, columns: usize },

    #[error("too many mines: {mines} requested for {cells} cells")]
    TooManyMines { mines: usize, cells: usize },

    #[error("unknown difficulty `{0}` (expected Easy, Medium or Hard)")]
    UnknownDifficulty(String),
}
