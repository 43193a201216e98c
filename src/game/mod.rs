//! Core 2048 game logic: the board engine, the random tile source, and the
//! session controller that turns directional input into board transitions.

mod board;
mod rng;
mod session;

pub use board::{slide_line, Board, Direction, DEFAULT_SIZE, FOUR_PROBABILITY, MAX_TILE};
pub use rng::{ScriptedTiles, StdTiles, TileRng};
pub use session::{GameSession, GameSnapshot, GameStatus, MoveOutcome, HIGH_SCORE_KEY};
