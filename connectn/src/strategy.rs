//! Computer opponents. Every strategy works on `&Board` and simulates on
//! copies, so the caller's board is never touched.
use std::fmt;
use std::str::FromStr;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::{Board, GameError, Token};

const WIN_SCORE: i32 = 1_000;
/// Plies searched by the hard opponent, counting its own move.
pub const DEFAULT_DEPTH: usize = 5;
/// One ply only sees the searcher's own wins; two are needed to block.
pub const MIN_DEPTH: usize = 2;
/// Unpruned search grows as cols^depth, so deeper requests are refused.
pub const MAX_DEPTH: usize = 8;
/// Upper bound on cols^depth for a single search.
pub const MAX_SEARCH_NODES: u64 = 1_000_000;

pub trait Strategy: Send {
    /// Picks a non-full column for `own`. Fails with [`GameError::NoMoves`]
    /// when every column is full.
    fn choose_move(
        &mut self,
        board: &Board,
        own: Token,
        opponent: Token,
    ) -> Result<usize, GameError>;

    fn name(&self) -> &str;
}

/// Leftmost column where dropping `token` completes a run.
fn winning_column(board: &Board, token: Token) -> Option<usize> {
    board.legal_columns().into_iter().find(|&col| {
        let mut child = board.clone();
        child
            .drop(col, token)
            .is_some_and(|row| child.is_winning_move(row, col))
    })
}

/// Uniform choice among the non-full columns.
pub struct RandomStrategy {
    rng: StdRng,
}

impl RandomStrategy {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl Strategy for RandomStrategy {
    fn choose_move(
        &mut self,
        board: &Board,
        _own: Token,
        _opponent: Token,
    ) -> Result<usize, GameError> {
        let columns = board.legal_columns();
        if columns.is_empty() {
            return Err(GameError::NoMoves);
        }
        let column = columns[self.rng.random_range(0..columns.len())];
        debug!(column, "random pick");
        Ok(column)
    }

    fn name(&self) -> &str {
        "Random"
    }
}

/// One-ply lookahead: win if possible, otherwise block, otherwise random.
#[derive(Default)]
pub struct HeuristicStrategy {
    fallback: RandomStrategy,
}

impl HeuristicStrategy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            fallback: RandomStrategy::seeded(seed),
        }
    }
}

impl Strategy for HeuristicStrategy {
    fn choose_move(
        &mut self,
        board: &Board,
        own: Token,
        opponent: Token,
    ) -> Result<usize, GameError> {
        if let Some(column) = winning_column(board, own) {
            debug!(column, "heuristic takes the win");
            return Ok(column);
        }
        if let Some(column) = winning_column(board, opponent) {
            debug!(column, "heuristic blocks");
            return Ok(column);
        }
        self.fallback.choose_move(board, own, opponent)
    }

    fn name(&self) -> &str {
        "Heuristic"
    }
}

/// Fixed-depth minimax without pruning. Positions are scored only by wins:
/// +1000 when `own` completes a run, -1000 when the opponent does, 0 when
/// the depth runs out or the board fills up.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MinimaxStrategy {
    depth: usize,
}

impl Default for MinimaxStrategy {
    fn default() -> Self {
        Self {
            depth: DEFAULT_DEPTH,
        }
    }
}

impl MinimaxStrategy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_depth(depth: usize) -> Result<Self, GameError> {
        if !(MIN_DEPTH..=MAX_DEPTH).contains(&depth) {
            return Err(GameError::DepthOutOfRange(depth));
        }
        Ok(Self { depth })
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Refuses boards too wide for an unpruned search at this depth.
    pub fn check_budget(&self, cols: usize) -> Result<(), GameError> {
        let nodes = (cols as u64).checked_pow(self.depth as u32);
        match nodes {
            Some(nodes) if nodes <= MAX_SEARCH_NODES => Ok(()),
            _ => Err(GameError::SearchTooLarge {
                cols,
                depth: self.depth,
            }),
        }
    }

    fn search(
        &self,
        board: &Board,
        depth: usize,
        maximizing: bool,
        own: Token,
        opponent: Token,
    ) -> i32 {
        if depth == 0 || board.is_full() {
            return 0;
        }
        let (token, win) = if maximizing {
            (own, WIN_SCORE)
        } else {
            (opponent, -WIN_SCORE)
        };
        let mut best = if maximizing { i32::MIN } else { i32::MAX };
        for col in board.legal_columns() {
            let mut child = board.clone();
            let Some(row) = child.drop(col, token) else {
                continue;
            };
            if child.is_winning_move(row, col) {
                return win;
            }
            let score = self.search(&child, depth - 1, !maximizing, own, opponent);
            best = if maximizing {
                best.max(score)
            } else {
                best.min(score)
            };
        }
        best
    }
}

impl Strategy for MinimaxStrategy {
    fn choose_move(
        &mut self,
        board: &Board,
        own: Token,
        opponent: Token,
    ) -> Result<usize, GameError> {
        self.check_budget(board.cols())?;
        let mut best: Option<(usize, i32)> = None;
        for col in board.legal_columns() {
            let mut child = board.clone();
            let row = child
                .drop(col, own)
                .ok_or(GameError::ColumnFull { column: col })?;
            let score = if child.is_winning_move(row, col) {
                WIN_SCORE
            } else {
                self.search(&child, self.depth - 1, false, own, opponent)
            };
            debug!(col, score, "minimax root");
            if best.map_or(true, |(_, best_score)| score > best_score) {
                best = Some((col, score));
            }
        }
        let (column, score) = best.ok_or(GameError::NoMoves)?;
        debug!(column, score, depth = self.depth, "minimax pick");
        Ok(column)
    }

    fn name(&self) -> &str {
        "Minimax"
    }
}

/// AI strength tiers selectable by name.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn strategy(self) -> Box<dyn Strategy> {
        match self {
            Difficulty::Easy => Box::new(RandomStrategy::new()),
            Difficulty::Medium => Box::new(HeuristicStrategy::new()),
            Difficulty::Hard => Box::new(MinimaxStrategy::new()),
        }
    }

    /// Same as [`Difficulty::strategy`] with a reproducible random source.
    pub fn seeded_strategy(self, seed: u64) -> Box<dyn Strategy> {
        match self {
            Difficulty::Easy => Box::new(RandomStrategy::seeded(seed)),
            Difficulty::Medium => Box::new(HeuristicStrategy::seeded(seed)),
            Difficulty::Hard => Box::new(MinimaxStrategy::new()),
        }
    }
}

impl FromStr for Difficulty {
    type Err = GameError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name.trim().to_ascii_lowercase().as_str() {
            "easy" | "random" => Ok(Difficulty::Easy),
            "medium" | "med" | "heuristic" => Ok(Difficulty::Medium),
            "hard" | "minimax" => Ok(Difficulty::Hard),
            _ => Err(GameError::UnknownDifficulty(name.to_string())),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        };
        f.write_str(name)
    }
}
