use serde::Serialize;
use tracing::{debug, info, warn};

use super::board::{Board, Direction};
use super::rng::TileRng;
use crate::error::BoardError;
use crate::store::KeyValueStore;

/// Store key the high score is kept under.
pub const HIGH_SCORE_KEY: &str = "highScore";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    Playing,
    GameOver,
}

/// What happened to a single input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Not applied: the input was not a direction, or the game is over.
    Ignored,
    /// Nothing could slide in that direction; no tile was spawned.
    Unchanged,
    /// Tiles moved and a new tile was spawned.
    Moved { new_high_score: bool },
    /// Tiles moved and the resulting board has no moves left.
    GameOver { new_high_score: bool },
}

/// Plain data view of a session for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameSnapshot {
    pub board: Vec<Vec<u32>>,
    pub score: u64,
    pub high_score: u64,
    pub game_over: bool,
}

/// One player's game: the board, its score and the persisted high score.
///
/// The score is the sum of all tiles on the board, recomputed after every
/// move that changes the board (not the usual sum of merged tiles). It starts
/// at 0 for a fresh game.
///
/// Inputs are processed one at a time through `&mut self`; a host that shares
/// a session between threads should wrap the whole session in one `Mutex`.
pub struct GameSession<R, S> {
    board: Board,
    score: u64,
    high_score: u64,
    status: GameStatus,
    rng: R,
    store: S,
    high_score_key: String,
}

impl<R: TileRng, S: KeyValueStore> GameSession<R, S> {
    /// Start a new game on a `size` x `size` board.
    pub fn new(size: usize, rng: R, store: S) -> Result<Self, BoardError> {
        Self::with_key(size, rng, store, HIGH_SCORE_KEY)
    }

    /// Like [`GameSession::new`], storing the high score under `key`.
    pub fn with_key(
        size: usize,
        mut rng: R,
        store: S,
        key: impl Into<String>,
    ) -> Result<Self, BoardError> {
        let board = Board::initial(size, &mut rng)?;
        Ok(Self::from_board(board, rng, store, key))
    }

    /// Resume play from an existing position.
    pub fn from_board(board: Board, rng: R, store: S, key: impl Into<String>) -> Self {
        let high_score_key = key.into();
        let high_score = load_high_score(&store, &high_score_key);
        let status = if board.is_terminal() {
            GameStatus::GameOver
        } else {
            GameStatus::Playing
        };
        info!(size = board.size(), high_score, "new game");

        GameSession {
            board,
            score: 0,
            high_score,
            status,
            rng,
            store,
            high_score_key,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn high_score(&self) -> u64 {
        self.high_score
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_game_over(&self) -> bool {
        self.status == GameStatus::GameOver
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Slide the board in `direction`, spawn a tile if anything moved, then
    /// update the score, the high score and the game status.
    pub fn handle_input(&mut self, direction: Direction) -> MoveOutcome {
        if self.is_game_over() {
            return MoveOutcome::Ignored;
        }

        let (mut next, changed) = self.board.shift(direction);
        if !changed {
            debug!(direction = direction.name(), "move changed nothing");
            return MoveOutcome::Unchanged;
        }

        next.spawn_random_tile(&mut self.rng);
        self.score = next.score();
        self.board = next;

        let new_high_score = self.score > self.high_score;
        if new_high_score {
            self.record_high_score();
        }

        debug!(
            direction = direction.name(),
            score = self.score,
            highest_tile = self.board.highest_tile(),
            "move applied"
        );

        if self.board.is_terminal() {
            self.status = GameStatus::GameOver;
            info!(score = self.score, high_score = self.high_score, "game over");
            MoveOutcome::GameOver { new_high_score }
        } else {
            MoveOutcome::Moved { new_high_score }
        }
    }

    /// Apply a named key (`ArrowLeft`, `up`, ...). Unknown names are ignored.
    pub fn handle_key_name(&mut self, name: &str) -> MoveOutcome {
        match Direction::from_key_name(name) {
            Some(direction) => self.handle_input(direction),
            None => MoveOutcome::Ignored,
        }
    }

    /// Throw away the current game and start a fresh board. Allowed in any state.
    pub fn restart(&mut self) {
        self.board.reset(&mut self.rng);
        self.score = 0;
        self.status = GameStatus::Playing;
        info!(high_score = self.high_score, "game restarted");
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            board: self.board.rows(),
            score: self.score,
            high_score: self.high_score,
            game_over: self.is_game_over(),
        }
    }

    /// Raise the high score to the current score and persist it. A failed
    /// write keeps the new value for this session only.
    fn record_high_score(&mut self) {
        self.high_score = self.score;
        info!(high_score = self.high_score, "new high score");
        if let Err(e) = self
            .store
            .set(&self.high_score_key, &self.high_score.to_string())
        {
            warn!(error = %e, "failed to persist high score");
        }
    }
}

/// Stored high score, or 0 when it is missing, unreadable or malformed.
fn load_high_score<S: KeyValueStore>(store: &S, key: &str) -> u64 {
    match store.get(key) {
        Ok(Some(value)) => match value.trim().parse::<u64>() {
            Ok(score) => score,
            Err(e) => {
                warn!(value = %value, error = %e, "ignoring malformed high score");
                0
            }
        },
        Ok(None) => 0,
        Err(e) => {
            warn!(error = %e, "failed to load high score; starting from 0");
            0
        }
    }
}
