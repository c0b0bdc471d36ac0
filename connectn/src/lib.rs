//! Connect-N engine: a configurable gravity board, three computer opponents
//! of increasing strength and a defensive hint advisor.
//!
//! The request API is stateless: callers feed a move history string
//! (e.g. `X3O3X2O4`) together with the board dimensions, and receive either
//! the column the chosen AI would play for the side to move or a hint for
//! that side. Interactive play goes through [`Game`].
use serde::{Deserialize, Serialize};
use thiserror::Error;

mod board;
mod config;
mod game;
mod hint;
mod position;
mod strategy;

pub use board::{Board, Cell, Move};
pub use config::GameConfig;
pub use game::Game;
pub use hint::Hint;
pub use position::{parse_history, GameStatus, MoveOutcome, Position, TypedMove};
pub use strategy::{
    Difficulty, HeuristicStrategy, MinimaxStrategy, RandomStrategy, Strategy, DEFAULT_DEPTH,
    MAX_DEPTH, MAX_SEARCH_NODES, MIN_DEPTH,
};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Token {
    X,
    O,
}

impl Token {
    pub fn opponent(self) -> Token {
        match self {
            Token::X => Token::O,
            Token::O => Token::X,
        }
    }

    pub fn mark(self) -> char {
        match self {
            Token::X => 'X',
            Token::O => 'O',
        }
    }

    pub fn from_mark(mark: char) -> Option<Token> {
        match mark {
            'X' | 'x' => Some(Token::X),
            'O' | 'o' => Some(Token::O),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum GameError {
    #[error("invalid move string at position {position}: {reason}")]
    ParseMove { position: usize, reason: String },
    #[error("column {column} is full")]
    ColumnFull { column: usize },
    #[error("column {column} is out of bounds")]
    ColumnOutOfBounds { column: usize },
    #[error("no legal moves remain")]
    NoMoves,
    #[error("depth {0} is out of range ({min}-{max})", min = MIN_DEPTH, max = MAX_DEPTH)]
    DepthOutOfRange(usize),
    #[error(
        "search over {cols} columns at depth {depth} exceeds {budget} nodes",
        budget = MAX_SEARCH_NODES
    )]
    SearchTooLarge { cols: usize, depth: usize },
    #[error("unknown AI difficulty {0:?} (expected easy, medium or hard)")]
    UnknownDifficulty(String),
    #[error("invalid board dimensions {rows}x{cols} connect {connect}")]
    InvalidDimensions {
        rows: usize,
        cols: usize,
        connect: usize,
    },
    #[error("invariant violated at ({row}, {col}): {reason}")]
    InvariantViolated {
        row: usize,
        col: usize,
        reason: &'static str,
    },
    #[error("there is nothing to undo")]
    NothingToUndo,
    #[error("the game is already over")]
    GameOver,
}

impl GameError {
    pub(crate) fn invariant(row: usize, col: usize, reason: &'static str) -> Self {
        GameError::InvariantViolated { row, col, reason }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRequest {
    pub position: String,
    #[serde(flatten)]
    pub config: GameConfig,
    pub difficulty: String,
    /// Seeds the random fallback so responses can be reproduced.
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveResponse {
    pub column: usize,
    pub row: usize,
    pub won: bool,
    pub status: GameStatus,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HintRequest {
    pub position: String,
    #[serde(flatten)]
    pub config: GameConfig,
}

/// Replays `request.position` and asks the requested AI for the side to
/// move.
pub fn best_move(request: MoveRequest) -> Result<MoveResponse, GameError> {
    let difficulty: Difficulty = request.difficulty.parse()?;
    let mut position = Position::from_history_str(request.config, &request.position)?;
    position.ensure_open()?;
    let mut strategy = match request.seed {
        Some(seed) => difficulty.seeded_strategy(seed),
        None => difficulty.strategy(),
    };
    let own = position.to_move();
    let column = strategy.choose_move(position.board(), own, own.opponent())?;
    let outcome = position.play(column)?;
    Ok(MoveResponse {
        column,
        row: outcome.row,
        won: outcome.won,
        status: position.status(),
    })
}

/// Replays `request.position` and classifies each column for the side to
/// move.
pub fn hint_for(request: HintRequest) -> Result<Hint, GameError> {
    let mut position = Position::from_history_str(request.config, &request.position)?;
    position.ensure_open()?;
    let current = position.to_move();
    Hint::new(position.board_mut(), current, current.opponent())
}
