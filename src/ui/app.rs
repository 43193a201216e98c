use crate::game::{Direction, GameSession, MoveOutcome, TileRng};
use crate::store::KeyValueStore;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{backend::Backend, Terminal};
use std::io;

use super::game_view::{self, ViewState};

/// Map a key to a move. Arrows, WASD and vim keys are accepted.
pub fn direction_for_key(code: KeyCode) -> Option<Direction> {
    match code {
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('h') => Some(Direction::Left),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('l') => Some(Direction::Right),
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('k') => Some(Direction::Up),
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('j') => Some(Direction::Down),
        _ => None,
    }
}

pub struct App<R, S> {
    session: GameSession<R, S>,
    should_quit: bool,
    message: Option<String>,
}

impl<R: TileRng, S: KeyValueStore> App<R, S> {
    pub fn new(session: GameSession<R, S>) -> Self {
        App {
            session,
            should_quit: false,
            message: None,
        }
    }

    pub fn session(&self) -> &GameSession<R, S> {
        &self.session
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Main application loop
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()>
    where
        B::Error: Into<io::Error>,
    {
        loop {
            terminal
                .draw(|f| self.render(f))
                .map_err(Into::<io::Error>::into)?;

            if self.should_quit {
                break;
            }

            self.handle_events()?;
        }
        Ok(())
    }

    /// Handle keyboard events
    fn handle_events(&mut self) -> io::Result<()> {
        if event::poll(std::time::Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    self.handle_key(key);
                }
            }
        }
        Ok(())
    }

    /// Handle key press
    pub fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Char('r') | KeyCode::Char('R') => {
                self.session.restart();
                self.message = Some("New game started!".to_string());
            }
            code => {
                if let Some(direction) = direction_for_key(code) {
                    self.apply_move(direction);
                }
            }
        }
    }

    fn apply_move(&mut self, direction: Direction) {
        match self.session.handle_input(direction) {
            MoveOutcome::Ignored => {
                self.message = Some("Game over! Press 'r' to restart.".to_string());
            }
            MoveOutcome::Unchanged => {}
            MoveOutcome::Moved { new_high_score } => {
                self.message = if new_high_score {
                    Some(format!("New best: {}", self.session.high_score()))
                } else {
                    None
                };
            }
            MoveOutcome::GameOver { new_high_score } => {
                let score = self.session.score();
                self.message = Some(if new_high_score {
                    format!("Game over with a new best of {score}!")
                } else {
                    format!("Game over! Final score {score}.")
                });
            }
        }
    }

    /// Render the UI
    pub fn render(&self, frame: &mut ratatui::Frame) {
        let snapshot = self.session.snapshot();
        let view = ViewState {
            snapshot: &snapshot,
            board: self.session.board(),
            message: &self.message,
        };
        game_view::render(frame, &view);
    }
}
