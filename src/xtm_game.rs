// Difficulty profiles and the game session that owns the current board

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};
use tracing::{info, trace};

use crate::xtm_board::{Board, COUNTER_MAX, RenderState, RevealOutcome};
use crate::xtm_error::ConfigError;

/// Difficulty presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Difficulty {
    #[default]
    Easy,   // 9x9, 10 mines
    Medium, // 16x16, 40 mines
    Hard,   // 16 rows x 30 columns, 99 mines
}

impl Difficulty {
    /// All presets in selector order
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Board dimensions as (rows, columns, mines)
    pub fn params(&self) -> (usize, usize, usize) {
        match self {
            Difficulty::Easy => (9, 9, 10),
            Difficulty::Medium => (16, 16, 40),
            Difficulty::Hard => (16, 30, 99),
        }
    }

    /// Stable identifier, also used in the config file
    pub fn name(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn from_index(i: usize) -> Result<Difficulty, ConfigError> {
        Difficulty::ALL
            .get(i)
            .copied()
            .ok_or_else(|| ConfigError::UnknownDifficulty(i.to_string()))
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Difficulty {
    type Err = ConfigError;

    /// Case-insensitive match on the preset name
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Difficulty::ALL
            .into_iter()
            .find(|d| d.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ConfigError::UnknownDifficulty(s.to_string()))
    }
}

impl Serialize for Difficulty {
    /// Serialize as the preset name rather than an index
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for Difficulty {
    fn deserialize<D>(deserializer: D) -> Result<Difficulty, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Face shown next to the counters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    Playing,
    Won,
    Lost,
}

/// One game in progress. The frontend owns exactly one of these and routes
/// every click through it; restarting swaps the board in place.
pub struct GameSession {
    difficulty: Difficulty,
    board: Board,
    rng: StdRng,
    start_time: Instant,
    finished_after: Option<Duration>,
}

impl GameSession {
    /// Build a fresh board for `difficulty`
    pub fn start(difficulty: Difficulty, mut rng: StdRng) -> Result<Self, ConfigError> {
        let board = new_board(difficulty, &mut rng)?;
        Ok(GameSession {
            difficulty,
            board,
            rng,
            start_time: Instant::now(),
            finished_after: None,
        })
    }

    /// Parse a difficulty name, then start. Unknown names fail before any
    /// board exists.
    pub fn start_named(name: &str, rng: StdRng) -> Result<Self, ConfigError> {
        let difficulty = name.parse()?;
        GameSession::start(difficulty, rng)
    }

    /// Start with a fixed seed when given, OS entropy otherwise
    pub fn with_seed(difficulty: Difficulty, seed: Option<u64>) -> Result<Self, ConfigError> {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        GameSession::start(difficulty, rng)
    }

    /// Discard the current board and deal a new one at the same difficulty
    pub fn restart(&mut self) -> Result<(), ConfigError> {
        self.switch_difficulty(self.difficulty)
    }

    /// Deal a new board at another difficulty. The old board is kept if
    /// generation fails.
    pub fn switch_difficulty(&mut self, difficulty: Difficulty) -> Result<(), ConfigError> {
        let board = new_board(difficulty, &mut self.rng)?;
        self.difficulty = difficulty;
        self.board = board;
        self.start_time = Instant::now();
        self.finished_after = None;
        Ok(())
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Reveal (x, y); ignored once the game is over
    pub fn on_left_click(&mut self, x: isize, y: isize) -> RevealOutcome {
        if self.board.is_finished() {
            trace!(x, y, "left click after game end");
            return RevealOutcome::default();
        }
        let outcome = self.board.reveal(x, y);
        self.stop_clock_if_finished();
        outcome
    }

    /// Toggle the flag on (x, y); ignored once the game is over
    pub fn on_right_click(&mut self, x: isize, y: isize) {
        if self.board.is_finished() {
            trace!(x, y, "right click after game end");
            return;
        }
        self.board.toggle_flag(x, y);
    }

    fn stop_clock_if_finished(&mut self) {
        if self.board.is_finished() && self.finished_after.is_none() {
            let elapsed = self.start_time.elapsed();
            self.finished_after = Some(elapsed);
            info!(
                difficulty = %self.difficulty,
                won = self.board.is_won(),
                secs = elapsed.as_secs(),
                "game over"
            );
        }
    }

    pub fn render_state(&self, x: isize, y: isize) -> Option<RenderState> {
        self.board.render_state(x, y)
    }

    /// Remaining-mines counter as displayed, 0..=999
    pub fn remaining_flag_count(&self) -> isize {
        self.board.remaining_flags_display()
    }

    pub fn is_game_finished(&self) -> bool {
        self.board.is_finished()
    }

    pub fn did_win(&self) -> bool {
        self.board.is_won()
    }

    pub fn status(&self) -> GameStatus {
        match (self.board.is_finished(), self.board.is_won()) {
            (false, _) => GameStatus::Playing,
            (true, true) => GameStatus::Won,
            (true, false) => GameStatus::Lost,
        }
    }

    /// Seconds since the board was dealt, frozen at game end, capped at 999
    pub fn elapsed_secs(&self) -> u64 {
        let elapsed = self.finished_after.unwrap_or_else(|| self.start_time.elapsed());
        elapsed.as_secs().min(COUNTER_MAX as u64)
    }
}

fn new_board(difficulty: Difficulty, rng: &mut StdRng) -> Result<Board, ConfigError> {
    let (rows, columns, mines) = difficulty.params();
    let board = Board::generate(rows, columns, mines, rng)?;
    info!(difficulty = %difficulty, rows, columns, mines, "new game");
    Ok(board)
}
