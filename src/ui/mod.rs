//! Terminal UI: the game board, score header and game-over dialog, driven by
//! keyboard input.

mod app;
pub mod board_widget;
mod game_view;

pub use app::{direction_for_key, App};
