// Board engine: mine layout, adjacency counts, flood-fill reveal, flags,
// victory detection and end-of-game handling

use rand::Rng;
use rand::seq::SliceRandom;
use tracing::{debug, info, trace};

use crate::xtm_error::ConfigError;

/// Display range of the remaining-mines counter
pub const COUNTER_MAX: isize = 999;

/// Offsets of the eight Moore neighbours, row-major
#[rustfmt::skip]
const NEIGHBOURS: [(isize, isize); 8] = [
    (-1, -1), (-1, 0), (-1, 1),
    (0, -1),           (0, 1),
    (1, -1),  (1, 0),  (1, 1),
];

/// A single position on the board
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cell {
    pub is_mine: bool,
    pub is_revealed: bool,
    pub is_flagged: bool,
    /// Mine neighbours (0-8). `None` for mines and before numbers are computed.
    pub adjacent_mines: Option<u8>,
}

/// What the frontend needs to draw one cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderState {
    pub revealed: bool,
    pub flagged: bool,
    pub is_mine: bool,
    pub adjacent_mines: Option<u8>,
    /// This is the mine that ended the game
    pub exploded: bool,
}

/// Icon choice derived from a `RenderState`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellIcon {
    Hidden,
    Flag,
    Number(u8),
    Mine,
    MineExploded,
}

impl RenderState {
    pub fn icon(&self) -> CellIcon {
        if !self.revealed {
            return if self.flagged { CellIcon::Flag } else { CellIcon::Hidden };
        }
        if self.is_mine {
            if self.exploded { CellIcon::MineExploded } else { CellIcon::Mine }
        } else {
            CellIcon::Number(self.adjacent_mines.unwrap_or(0))
        }
    }
}

/// Result of a top-level reveal
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RevealOutcome {
    /// Cells uncovered by this reveal as (row, column), in reveal order.
    /// Mines uncovered by the loss sweep are not listed.
    pub revealed: Vec<(usize, usize)>,
    pub triggered_mine: bool,
    pub won: bool,
}

/// The minefield and its play state
#[derive(Debug, Clone)]
pub struct Board {
    rows: usize,
    columns: usize,
    mine_count: usize,
    cells: Vec<Cell>,
    remaining_flags: isize,
    finished: bool,
    won: bool,
    triggered: Option<(usize, usize)>,
}

impl Board {
    /// Allocate an empty board: no mines, nothing revealed or flagged,
    /// every count unknown.
    pub fn new(rows: usize, columns: usize, mine_count: usize) -> Result<Self, ConfigError> {
        if rows == 0 || columns == 0 {
            return Err(ConfigError::EmptyBoard { rows, columns });
        }
        let cells = rows
            .checked_mul(columns)
            .ok_or(ConfigError::BoardTooLarge { rows, columns })?;
        if mine_count > cells {
            return Err(ConfigError::TooManyMines { mines: mine_count, cells });
        }
        Ok(Board {
            rows,
            columns,
            mine_count,
            cells: vec![Cell::default(); cells],
            remaining_flags: mine_count as isize,
            finished: false,
            won: false,
            triggered: None,
        })
    }

    /// New board with mines placed and numbers computed
    pub fn generate<R: Rng + ?Sized>(
        rows: usize,
        columns: usize,
        mine_count: usize,
        rng: &mut R,
    ) -> Result<Self, ConfigError> {
        let mut board = Board::new(rows, columns, mine_count)?;
        board.distribute_mines(rng);
        board.calculate_numbers();
        debug!(rows, columns, mine_count, "board generated");
        Ok(board)
    }

    /// Build a board from an explicit layout, `true` marking a mine.
    /// Numbers are computed; every row must have the same length.
    pub fn from_layout(layout: &[Vec<bool>]) -> Result<Self, ConfigError> {
        let rows = layout.len();
        let columns = layout.first().map_or(0, Vec::len);
        if columns == 0 || layout.iter().any(|r| r.len() != columns) {
            return Err(ConfigError::EmptyBoard { rows, columns });
        }
        let mine_count = layout.iter().flatten().filter(|m| **m).count();
        let mut board = Board::new(rows, columns, mine_count)?;
        for (cell, mine) in board.cells.iter_mut().zip(layout.iter().flatten()) {
            cell.is_mine = *mine;
        }
        board.calculate_numbers();
        Ok(board)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn mine_count(&self) -> usize {
        self.mine_count
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn is_won(&self) -> bool {
        self.won
    }

    /// Position of the mine that ended the game, if any
    pub fn triggered_mine(&self) -> Option<(usize, usize)> {
        self.triggered
    }

    /// Raw counter: mines minus flags placed. May go negative.
    pub fn remaining_flags(&self) -> isize {
        self.remaining_flags
    }

    /// Counter as shown to the player, clamped to 0..=999
    pub fn remaining_flags_display(&self) -> isize {
        self.remaining_flags.clamp(0, COUNTER_MAX)
    }

    fn index(&self, x: usize, y: usize) -> usize {
        x * self.columns + y
    }

    /// Map signed coordinates to (row, column), `None` when off the board
    fn checked(&self, x: isize, y: isize) -> Option<(usize, usize)> {
        match (usize::try_from(x), usize::try_from(y)) {
            (Ok(x), Ok(y)) if x < self.rows && y < self.columns => Some((x, y)),
            _ => None,
        }
    }

    pub fn cell(&self, x: isize, y: isize) -> Option<&Cell> {
        self.checked(x, y).map(|(x, y)| &self.cells[self.index(x, y)])
    }

    /// Iterate all cells with their (row, column)
    pub fn cells(&self) -> impl Iterator<Item = ((usize, usize), &Cell)> + '_ {
        let columns = self.columns;
        self.cells.iter().enumerate().map(move |(i, c)| ((i / columns, i % columns), c))
    }

    fn neighbours(&self, x: usize, y: usize) -> impl Iterator<Item = (usize, usize)> + '_ {
        NEIGHBOURS
            .iter()
            .filter_map(move |(dx, dy)| self.checked(x as isize + dx, y as isize + dy))
    }

    /// Pick `mine_count` distinct cells uniformly at random, replacing any
    /// previous layout. A partial shuffle of the flat index space always
    /// terminates, even when nearly every cell is a mine.
    pub fn distribute_mines<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for cell in self.cells.iter_mut() {
            cell.is_mine = false;
        }
        let mut indices: Vec<usize> = (0..self.cells.len()).collect();
        let (chosen, _) = indices.partial_shuffle(rng, self.mine_count);
        for &i in chosen.iter() {
            self.cells[i].is_mine = true;
        }
    }

    /// Recompute every cell's adjacent-mine count from the current layout
    pub fn calculate_numbers(&mut self) {
        for x in 0..self.rows {
            for y in 0..self.columns {
                let idx = self.index(x, y);
                self.cells[idx].adjacent_mines = self.count_at(x, y);
            }
        }
    }

    /// Adjacency count for one cell, `None` for a mine
    fn count_at(&self, x: usize, y: usize) -> Option<u8> {
        if self.cells[self.index(x, y)].is_mine {
            return None;
        }
        let n = self
            .neighbours(x, y)
            .filter(|&(nx, ny)| self.cells[self.index(nx, ny)].is_mine)
            .count();
        Some(n as u8)
    }

    /// Reveal a cell and flood through zero-count regions, then settle the
    /// game: a mine ends it as a loss, uncovering the last safe cell as a win.
    /// Out-of-bounds or already revealed targets change nothing.
    pub fn reveal(&mut self, x: isize, y: isize) -> RevealOutcome {
        if self.finished {
            trace!(x, y, "reveal ignored, game finished");
            return RevealOutcome::default();
        }
        let mut outcome = self.flood_fill(x, y);
        if outcome.triggered_mine {
            self.end_game(false);
        } else if !outcome.revealed.is_empty() && self.check_victory() {
            self.end_game(true);
            outcome.won = true;
        }
        outcome
    }

    /// Uncover from (x, y) using an explicit work stack. Never checks victory.
    fn flood_fill(&mut self, x: isize, y: isize) -> RevealOutcome {
        let mut outcome = RevealOutcome::default();
        let Some(start) = self.checked(x, y) else {
            trace!(x, y, "reveal out of bounds");
            return outcome;
        };
        let mut stack = vec![start];
        while let Some((cx, cy)) = stack.pop() {
            let idx = self.index(cx, cy);
            let cell = &mut self.cells[idx];
            if cell.is_revealed {
                continue;
            }
            cell.is_revealed = true;
            outcome.revealed.push((cx, cy));
            if cell.is_mine {
                // only the first cell can be a mine: zero cells have no mine neighbours
                self.triggered = Some((cx, cy));
                outcome.triggered_mine = true;
                continue;
            }
            // a board revealed before its numbers were computed still gets a real count
            if cell.adjacent_mines.is_none() {
                let count = self.count_at(cx, cy);
                self.cells[idx].adjacent_mines = count;
            }
            if self.cells[idx].adjacent_mines == Some(0) {
                let next: Vec<(usize, usize)> = self
                    .neighbours(cx, cy)
                    .filter(|&(nx, ny)| !self.cells[self.index(nx, ny)].is_revealed)
                    .collect();
                stack.extend(next);
            }
        }
        outcome
    }

    /// Flip the flag on a hidden cell and move the remaining counter
    pub fn toggle_flag(&mut self, x: isize, y: isize) {
        if self.finished {
            trace!(x, y, "flag ignored, game finished");
            return;
        }
        let Some((x, y)) = self.checked(x, y) else {
            trace!(x, y, "flag out of bounds");
            return;
        };
        let idx = self.index(x, y);
        let cell = &mut self.cells[idx];
        if cell.is_revealed {
            return;
        }
        cell.is_flagged = !cell.is_flagged;
        self.remaining_flags += if cell.is_flagged { -1 } else { 1 };
    }

    /// Every cell that is not a mine has been revealed
    pub fn check_victory(&self) -> bool {
        self.cells.iter().all(|c| c.is_mine || c.is_revealed)
    }

    /// Freeze the board. A loss uncovers every remaining mine; flags stay.
    pub fn end_game(&mut self, won: bool) {
        self.finished = true;
        self.won = won;
        if won {
            info!("game won");
            return;
        }
        let mut uncovered = 0usize;
        for cell in self.cells.iter_mut().filter(|c| c.is_mine && !c.is_revealed) {
            cell.is_revealed = true;
            uncovered += 1;
        }
        info!(triggered = ?self.triggered, uncovered, "game lost");
    }

    pub fn render_state(&self, x: isize, y: isize) -> Option<RenderState> {
        let (ux, uy) = self.checked(x, y)?;
        let cell = &self.cells[self.index(ux, uy)];
        Some(RenderState {
            revealed: cell.is_revealed,
            flagged: cell.is_flagged,
            is_mine: cell.is_mine,
            adjacent_mines: cell.adjacent_mines,
            exploded: self.triggered == Some((ux, uy)),
        })
    }
}
