// Minesweeper board engine and game session.
// The terminal frontend in main.rs is one consumer; everything here is
// independent of how the board is drawn.

pub mod xtm_board;  // Cells, mine layout, flood-fill reveal, flags, victory
pub mod xtm_config; // TOML user configuration
pub mod xtm_error;  // ConfigError
pub mod xtm_game;   // Difficulty presets and GameSession
pub mod xtm_log;    // Opt-in file logging

pub use xtm_board::{Board, Cell, CellIcon, RenderState, RevealOutcome};
pub use xtm_error::ConfigError;
pub use xtm_game::{Difficulty, GameSession, GameStatus};
