//! # Terminal 2048
//!
//! The 2048 sliding-tile puzzle with a persisted high score, played in the
//! terminal through a Ratatui front end.
//!
//! ## Modules
//!
//! - [`game`] — Core game logic: board engine, tile randomness, session controller
//! - [`store`] — Key-value persistence for the high score
//! - [`ui`] — Terminal UI: board view, score header, game-over dialog
//! - [`config`] — TOML configuration loading and validation
//! - [`logging`] — Tracing subscriber setup
//! - [`error`] — Structured error types

pub mod config;
pub mod error;
pub mod game;
pub mod logging;
pub mod store;
pub mod ui;
