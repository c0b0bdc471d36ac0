//! Gravity grid with drop/undo primitives and last-move win detection.
//!
//! Row 0 is the top of the board; tokens fall towards row `rows - 1`.
use std::fmt;

use crate::{GameError, Token};

/// Line orientations checked by [`Board::is_winning_move`]. Each vector is
/// walked in both senses, so these four cover all eight neighbours.
const DIRECTIONS: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum Cell {
    #[default]
    Empty,
    Occupied(Token),
}

impl Cell {
    pub fn token(self) -> Option<Token> {
        match self {
            Cell::Empty => None,
            Cell::Occupied(token) => Some(token),
        }
    }

    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }
}

/// Undo record for a single drop.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Move {
    pub row: usize,
    pub col: usize,
    pub token: Token,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Board {
    rows: usize,
    cols: usize,
    connect: usize,
    cells: Vec<Cell>,
}

impl Board {
    /// Creates an empty board. The connect length is not checked against the
    /// dimensions: a board that can never hold a winning run is legal.
    pub fn new(rows: usize, cols: usize, connect: usize) -> Self {
        Self {
            rows,
            cols,
            connect,
            cells: vec![Cell::Empty; rows * cols],
        }
    }

    pub fn clear(&mut self) {
        self.cells.fill(Cell::Empty);
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn connect(&self) -> usize {
        self.connect
    }

    /// Cell at `(row, col)`; out-of-range coordinates read as empty.
    pub fn get(&self, row: usize, col: usize) -> Cell {
        self.index(row, col)
            .map(|idx| self.cells[idx])
            .unwrap_or(Cell::Empty)
    }

    /// True when the column has no empty cell. Columns outside the board
    /// count as full so callers never try to drop into them.
    pub fn is_column_full(&self, col: usize) -> bool {
        col >= self.cols || self.rows == 0 || !self.get(0, col).is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|cell| !cell.is_empty())
    }

    /// Non-full columns, left to right.
    pub fn legal_columns(&self) -> Vec<usize> {
        (0..self.cols)
            .filter(|&col| !self.is_column_full(col))
            .collect()
    }

    /// Number of occupied cells in `col`.
    pub fn column_height(&self, col: usize) -> usize {
        (0..self.rows)
            .rev()
            .take_while(|&row| !self.get(row, col).is_empty())
            .count()
    }

    /// Drops `token` into `col` and returns the landing row, or `None` when
    /// the column is full or off the board. The board is untouched on `None`.
    pub fn drop(&mut self, col: usize, token: Token) -> Option<usize> {
        if self.is_column_full(col) {
            return None;
        }
        let row = self.rows - 1 - self.column_height(col);
        let idx = self.index(row, col)?;
        self.cells[idx] = Cell::Occupied(token);
        Some(row)
    }

    /// Clears `(row, col)`, which must be the most recent drop into that
    /// column. Anything else would break the gravity invariant and is
    /// rejected without touching the grid.
    pub fn undo(&mut self, row: usize, col: usize) -> Result<(), GameError> {
        let idx = self
            .index(row, col)
            .ok_or_else(|| GameError::invariant(row, col, "cell is off the board"))?;
        if self.cells[idx].is_empty() {
            return Err(GameError::invariant(row, col, "cell is already empty"));
        }
        if row > 0 && !self.get(row - 1, col).is_empty() {
            return Err(GameError::invariant(
                row,
                col,
                "cell is not the top of its column",
            ));
        }
        self.cells[idx] = Cell::Empty;
        Ok(())
    }

    /// Whether the token at `(row, col)` is part of a run of at least
    /// `connect` cells. Only lines through this cell are examined, so it
    /// must be the last cell filled.
    pub fn is_winning_move(&self, row: usize, col: usize) -> bool {
        let Some(token) = self.get(row, col).token() else {
            return false;
        };
        DIRECTIONS.iter().any(|&(dr, dc)| {
            let run = self.count_direction(row, col, dr, dc, token)
                + self.count_direction(row, col, -dr, -dc, token)
                - 1;
            run >= self.connect
        })
    }

    /// Contiguous cells holding `token` starting at the origin (inclusive).
    fn count_direction(&self, row: usize, col: usize, dr: isize, dc: isize, token: Token) -> usize {
        let mut count = 0;
        let (mut r, mut c) = (row as isize, col as isize);
        while r >= 0 && c >= 0 && self.get(r as usize, c as usize) == Cell::Occupied(token) {
            count += 1;
            r += dr;
            c += dc;
        }
        count
    }

    fn index(&self, row: usize, col: usize) -> Option<usize> {
        (row < self.rows && col < self.cols).then(|| row * self.cols + col)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "   ")?;
        for col in 0..self.cols {
            write!(f, "{col:>2}")?;
        }
        writeln!(f)?;
        writeln!(f, "   {}", "--".repeat(self.cols))?;
        for row in 0..self.rows {
            write!(f, "{row:>2} ")?;
            for col in 0..self.cols {
                let mark = match self.get(row, col) {
                    Cell::Empty => '.',
                    Cell::Occupied(token) => token.mark(),
                };
                write!(f, " {mark}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
