//! Interactive game: a [`Position`] plus undo history and an optional
//! computer opponent that replies automatically.
use tracing::{debug, info};

use crate::{
    Board, Difficulty, GameConfig, GameError, GameStatus, Hint, Move, MoveOutcome, Position,
    Strategy, Token,
};

/// X always opens.
const FIRST: Token = Token::X;

struct Opponent {
    token: Token,
    strategy: Box<dyn Strategy>,
}

pub struct Game {
    position: Position,
    history: Vec<Move>,
    opponent: Option<Opponent>,
}

impl Game {
    /// Two humans sharing the board.
    pub fn new(config: GameConfig) -> Result<Self, GameError> {
        Ok(Self {
            position: Position::new(config, FIRST)?,
            history: Vec::new(),
            opponent: None,
        })
    }

    /// A human playing `human` against the AI tier `difficulty`.
    pub fn with_ai(
        config: GameConfig,
        difficulty: Difficulty,
        human: Token,
    ) -> Result<Self, GameError> {
        Self::with_strategy(config, difficulty.strategy(), human.opponent())
    }

    /// A human against `strategy`, which plays `ai`. If `ai` opens, its first
    /// move is made here.
    pub fn with_strategy(
        config: GameConfig,
        strategy: Box<dyn Strategy>,
        ai: Token,
    ) -> Result<Self, GameError> {
        let mut game = Self::new(config)?;
        info!(strategy = strategy.name(), ai = ?ai, "starting game against AI");
        game.opponent = Some(Opponent {
            token: ai,
            strategy,
        });
        game.ai_reply()?;
        Ok(game)
    }

    pub fn board(&self) -> &Board {
        self.position.board()
    }

    pub fn history(&self) -> &[Move] {
        &self.history
    }

    pub fn status(&self) -> GameStatus {
        self.position.status()
    }

    pub fn to_move(&self) -> Token {
        self.position.to_move()
    }

    pub fn ai_token(&self) -> Option<Token> {
        self.opponent.as_ref().map(|ai| ai.token)
    }

    /// Plays `column` for the side to move. Against an AI the reply follows
    /// immediately; the returned outcomes are in play order.
    pub fn play(&mut self, column: usize) -> Result<Vec<MoveOutcome>, GameError> {
        let mut outcomes = vec![self.apply(column)?];
        if let Some(reply) = self.ai_reply()? {
            outcomes.push(reply);
        }
        Ok(outcomes)
    }

    /// Takes back the last move. Against an AI, moves are taken back until
    /// the human is to move again; if that empties the board and the AI
    /// opens, it replays its opening.
    pub fn undo(&mut self) -> Result<Vec<Move>, GameError> {
        let mut undone = vec![self.take_back()?];
        while let Some(ai) = self.ai_token() {
            if self.to_move() != ai || self.history.is_empty() {
                break;
            }
            undone.push(self.take_back()?);
        }
        self.ai_reply()?;
        Ok(undone)
    }

    /// Clears the board and history; X opens again.
    pub fn restart(&mut self) -> Result<(), GameError> {
        self.position.reset(FIRST);
        self.history.clear();
        info!("board cleared, new game started");
        self.ai_reply()?;
        Ok(())
    }

    /// Safety hint for the side to move.
    pub fn hint(&mut self) -> Result<Hint, GameError> {
        self.position.ensure_open()?;
        let current = self.position.to_move();
        Hint::new(self.position.board_mut(), current, current.opponent())
    }

    fn apply(&mut self, column: usize) -> Result<MoveOutcome, GameError> {
        let outcome = self.position.play(column)?;
        self.history.push(outcome.as_move());
        debug!(token = ?outcome.token, column, row = outcome.row, "move");
        if outcome.won {
            info!(winner = ?outcome.token, moves = self.history.len(), "game won");
        } else if outcome.draw {
            info!(moves = self.history.len(), "game drawn");
        }
        Ok(outcome)
    }

    fn take_back(&mut self) -> Result<Move, GameError> {
        let last = self.history.pop().ok_or(GameError::NothingToUndo)?;
        if let Err(err) = self.position.take_back(last) {
            self.history.push(last);
            return Err(err);
        }
        debug!(token = ?last.token, row = last.row, col = last.col, "undo");
        Ok(last)
    }

    /// Lets the AI move if it is configured, the game is open and it is its
    /// turn.
    fn ai_reply(&mut self) -> Result<Option<MoveOutcome>, GameError> {
        let column = match self.opponent.as_mut() {
            Some(ai)
                if self.position.status() == GameStatus::InProgress
                    && self.position.to_move() == ai.token =>
            {
                ai.strategy
                    .choose_move(self.position.board(), ai.token, ai.token.opponent())?
            }
            _ => return Ok(None),
        };
        self.apply(column).map(Some)
    }
}
