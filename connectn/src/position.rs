//! Move-history strings and the checked, turn-aware layer over [`Board`].
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::{Board, GameConfig, GameError, Move, Token};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypedMove {
    pub token: Token,
    pub column: usize,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "state", content = "winner")]
pub enum GameStatus {
    InProgress,
    Won(Token),
    Draw,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MoveOutcome {
    pub token: Token,
    pub row: usize,
    pub column: usize,
    pub won: bool,
    pub draw: bool,
}

impl MoveOutcome {
    pub fn as_move(&self) -> Move {
        Move {
            row: self.row,
            col: self.column,
            token: self.token,
        }
    }
}

/// Parses histories such as `X3O3X10`: a token mark followed by a decimal
/// column index, repeated. Column bounds are checked on replay, since they
/// depend on the board width.
pub fn parse_history(history: &str) -> Result<Vec<TypedMove>, GameError> {
    if history.trim().is_empty() {
        return Ok(Vec::new());
    }
    let mut moves = Vec::new();
    let chars: Vec<char> = history.trim().chars().collect();
    let mut idx = 0;
    while idx < chars.len() {
        let mark = chars[idx];
        let token = Token::from_mark(mark).ok_or_else(|| GameError::ParseMove {
            position: idx,
            reason: format!("expected X or O, found {mark}"),
        })?;
        idx += 1;
        let start = idx;
        while idx < chars.len() && chars[idx].is_ascii_digit() {
            idx += 1;
        }
        if start == idx {
            return Err(GameError::ParseMove {
                position: idx,
                reason: match chars.get(idx) {
                    Some(found) => format!("expected column digit, found {found}"),
                    None => "missing column number".to_string(),
                },
            });
        }
        let digits: String = chars[start..idx].iter().collect();
        let column = digits.parse::<usize>().map_err(|err| GameError::ParseMove {
            position: start,
            reason: format!("bad column {digits}: {err}"),
        })?;
        moves.push(TypedMove { token, column });
    }
    Ok(moves)
}

/// A board together with whose turn it is and whether the game is decided.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Position {
    board: Board,
    to_move: Token,
    status: GameStatus,
}

impl Position {
    pub fn new(config: GameConfig, first: Token) -> Result<Self, GameError> {
        Ok(Self {
            board: config.board()?,
            to_move: first,
            status: GameStatus::InProgress,
        })
    }

    /// Replays `moves` in order. Each move is played by the token it names,
    /// so histories need not alternate; the side to move afterwards is the
    /// opponent of the last mover (X on an empty history).
    pub fn from_history(config: GameConfig, moves: &[TypedMove]) -> Result<Self, GameError> {
        let first = moves.first().map(|mv| mv.token).unwrap_or(Token::X);
        let mut position = Self::new(config, first)?;
        for mv in moves {
            position.to_move = mv.token;
            position.play(mv.column)?;
        }
        Ok(position)
    }

    pub fn from_history_str(config: GameConfig, history: &str) -> Result<Self, GameError> {
        let moves = parse_history(history)?;
        Self::from_history(config, &moves)
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub(crate) fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub fn to_move(&self) -> Token {
        self.to_move
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn ensure_open(&self) -> Result<(), GameError> {
        match self.status {
            GameStatus::InProgress => Ok(()),
            _ => Err(GameError::GameOver),
        }
    }

    /// Drops the side to move's token into `column`, updates the status and
    /// hands the turn over.
    pub fn play(&mut self, column: usize) -> Result<MoveOutcome, GameError> {
        self.ensure_open()?;
        if column >= self.board.cols() {
            return Err(GameError::ColumnOutOfBounds { column });
        }
        let token = self.to_move;
        let row = self
            .board
            .drop(column, token)
            .ok_or(GameError::ColumnFull { column })?;
        let won = self.board.is_winning_move(row, column);
        let draw = !won && self.board.is_full();
        self.status = if won {
            GameStatus::Won(token)
        } else if draw {
            GameStatus::Draw
        } else {
            GameStatus::InProgress
        };
        self.to_move = token.opponent();
        trace!(?token, row, column, won, draw, "played");
        Ok(MoveOutcome {
            token,
            row,
            column,
            won,
            draw,
        })
    }

    /// Takes back `mv`, which must be the last move played. The mover gets
    /// the turn back and the game is open again.
    pub fn take_back(&mut self, mv: Move) -> Result<(), GameError> {
        self.board.undo(mv.row, mv.col)?;
        self.to_move = mv.token;
        self.status = GameStatus::InProgress;
        Ok(())
    }

    /// Empties the board and gives the first move to `first`.
    pub fn reset(&mut self, first: Token) {
        self.board.clear();
        self.to_move = first;
        self.status = GameStatus::InProgress;
    }
}
