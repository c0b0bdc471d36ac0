use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{Board, GameError, Token};

/// Two-ply safety check for the side to move: a column is unsafe when,
/// after playing it, the opponent has an immediately winning reply.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hint {
    safe: Vec<usize>,
    #[serde(rename = "unsafe")]
    unsafe_columns: Vec<usize>,
    recommended: Option<usize>,
}

impl Hint {
    /// Classifies every non-full column by simulating on `board` in place.
    /// Each simulated drop is undone before moving on, so the board is
    /// unchanged when this returns.
    pub fn new(board: &mut Board, current: Token, opponent: Token) -> Result<Self, GameError> {
        let mut safe = Vec::new();
        let mut unsafe_columns = Vec::new();

        for col in 0..board.cols() {
            let Some(row) = board.drop(col, current) else {
                continue;
            };
            let losing = Self::opponent_wins(board, opponent);
            board.undo(row, col)?;
            if losing? {
                unsafe_columns.push(col);
            } else {
                safe.push(col);
            }
        }

        let recommended = safe.first().copied();
        debug!(?safe, unsafe_columns = ?unsafe_columns, ?recommended, "hint");
        Ok(Self {
            safe,
            unsafe_columns,
            recommended,
        })
    }

    /// Whether any reply by `opponent` completes a run. Stops at the first
    /// winning reply.
    fn opponent_wins(board: &mut Board, opponent: Token) -> Result<bool, GameError> {
        for col in 0..board.cols() {
            let Some(row) = board.drop(col, opponent) else {
                continue;
            };
            let won = board.is_winning_move(row, col);
            board.undo(row, col)?;
            if won {
                return Ok(true);
            }
        }
        Ok(false)
    }

    pub fn safe_columns(&self) -> &[usize] {
        &self.safe
    }

    pub fn unsafe_columns(&self) -> &[usize] {
        &self.unsafe_columns
    }

    pub fn recommended(&self) -> Option<usize> {
        self.recommended
    }
}

impl fmt::Display for Hint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.recommended {
            Some(col) => write!(f, "Try column {col}.")?,
            None => write!(f, "No safe moves. Choose carefully!")?,
        }
        write!(
            f,
            " Safe: {:?}. Unsafe: {:?}.",
            self.safe, self.unsafe_columns
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_from(drops: &[(usize, Token)]) -> Board {
        let mut board = Board::new(6, 7, 4);
        for &(col, token) in drops {
            board.drop(col, token).unwrap();
        }
        board
    }

    #[test]
    fn empty_board_is_all_safe() {
        let mut board = Board::new(6, 7, 4);
        let hint = Hint::new(&mut board, Token::X, Token::O).unwrap();
        assert_eq!(hint.safe_columns(), &[0, 1, 2, 3, 4, 5, 6]);
        assert!(hint.unsafe_columns().is_empty());
        assert_eq!(hint.recommended(), Some(0));
        assert_eq!(board, Board::new(6, 7, 4));
    }

    #[test]
    fn column_under_a_threat_is_unsafe() {
        let mut board = board_from(&[
            (0, Token::O),
            (1, Token::X),
            (2, Token::O),
            (0, Token::X),
            (1, Token::X),
            (2, Token::X),
        ]);
        let before = board.clone();
        let hint = Hint::new(&mut board, Token::O, Token::X).unwrap();
        assert_eq!(hint.unsafe_columns(), &[3]);
        assert_eq!(hint.safe_columns(), &[0, 1, 2, 4, 5, 6]);
        assert_eq!(hint.recommended(), Some(0));
        assert_eq!(board, before);
    }

    #[test]
    fn no_recommendation_when_every_column_loses() {
        // X has an open three on the bottom row: whatever O does, X wins at
        // column 0 or 4.
        let mut board = board_from(&[(1, Token::X), (2, Token::X), (3, Token::X)]);
        let before = board.clone();
        let hint = Hint::new(&mut board, Token::O, Token::X).unwrap();
        assert!(hint.safe_columns().is_empty());
        assert_eq!(hint.unsafe_columns(), &[0, 1, 2, 3, 4, 5, 6]);
        assert_eq!(hint.recommended(), None);
        assert_eq!(board, before);
        assert!(hint.to_string().starts_with("No safe moves"));
    }

    #[test]
    fn partition_skips_full_columns() {
        let mut board = Board::new(2, 3, 3);
        board.drop(1, Token::X);
        board.drop(1, Token::O);
        let hint = Hint::new(&mut board, Token::X, Token::O).unwrap();
        let mut all: Vec<usize> = hint
            .safe_columns()
            .iter()
            .chain(hint.unsafe_columns())
            .copied()
            .collect();
        all.sort_unstable();
        assert_eq!(all, board.legal_columns());
    }

    #[test]
    fn serializes_for_clients() {
        let mut board = Board::new(6, 7, 4);
        let hint = Hint::new(&mut board, Token::X, Token::O).unwrap();
        let json = serde_json::to_value(&hint).unwrap();
        assert_eq!(json["recommended"], 0);
        assert_eq!(json["safe"].as_array().unwrap().len(), 7);
    }
}
