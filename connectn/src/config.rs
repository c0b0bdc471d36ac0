use serde::{Deserialize, Serialize};

use crate::{Board, GameError};

const DEFAULT_ROWS: usize = 6;
const DEFAULT_COLS: usize = 7;
const DEFAULT_CONNECT: usize = 4;
/// Upper bound on either dimension for boards built from requests.
const MAX_DIMENSION: usize = 64;

/// Board shape for a game. Missing fields fall back to the classic 6x7
/// connect-four layout.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    #[serde(default = "default_rows")]
    pub rows: usize,
    #[serde(default = "default_cols")]
    pub cols: usize,
    #[serde(default = "default_connect")]
    pub connect: usize,
}

fn default_rows() -> usize {
    DEFAULT_ROWS
}

fn default_cols() -> usize {
    DEFAULT_COLS
}

fn default_connect() -> usize {
    DEFAULT_CONNECT
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
            connect: DEFAULT_CONNECT,
        }
    }
}

impl GameConfig {
    pub fn new(rows: usize, cols: usize, connect: usize) -> Self {
        Self {
            rows,
            cols,
            connect,
        }
    }

    /// Rejects empty boards, a zero connect length and oversized grids. A
    /// connect length longer than the board is allowed; such a game can only
    /// end in a draw.
    pub fn validate(&self) -> Result<(), GameError> {
        let empty = self.rows == 0 || self.cols == 0 || self.connect == 0;
        let oversized = self.rows > MAX_DIMENSION || self.cols > MAX_DIMENSION;
        if empty || oversized {
            return Err(GameError::InvalidDimensions {
                rows: self.rows,
                cols: self.cols,
                connect: self.connect,
            });
        }
        Ok(())
    }

    pub fn board(&self) -> Result<Board, GameError> {
        self.validate()?;
        Ok(Board::new(self.rows, self.cols, self.connect))
    }
}
