use crate::game::{Board, GameSnapshot};
use crate::ui::board_widget;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

/// Everything the view needs from the app for one frame.
pub struct ViewState<'a> {
    pub snapshot: &'a GameSnapshot,
    pub board: &'a Board,
    pub message: &'a Option<String>,
}

pub fn render(frame: &mut Frame, view: &ViewState) {
    let area = frame.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(10),   // Board
            Constraint::Length(3), // Message
            Constraint::Length(3), // Controls
        ])
        .split(area);

    render_header(frame, view.snapshot, chunks[0]);
    render_board(frame, view, chunks[1]);
    render_message(frame, view.message, chunks[2]);
    render_controls(frame, chunks[3]);

    if view.snapshot.game_over {
        render_game_over(frame, view.snapshot, area);
    }
}

fn render_header(frame: &mut Frame, snapshot: &GameSnapshot, area: Rect) {
    let label = Style::default().fg(Color::Gray);
    let value = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);

    let line = Line::from(vec![
        Span::styled("Score: ", label),
        Span::styled(snapshot.score.to_string(), value),
        Span::raw("    "),
        Span::styled("Best: ", label),
        Span::styled(snapshot.high_score.to_string(), value),
    ]);

    let header = Paragraph::new(line)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("2048"));

    frame.render_widget(header, area);
}

fn render_board(frame: &mut Frame, view: &ViewState, area: Rect) {
    let (width, height) = board_widget::board_extent(view.board);
    // Room for the border around the grid.
    let [area] = Layout::horizontal([Constraint::Length(width + 4)])
        .flex(Flex::Center)
        .areas(area);
    let [area] = Layout::vertical([Constraint::Length(height + 2)])
        .flex(Flex::Center)
        .areas(area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Rgb(187, 173, 160)));
    let inner = block.inner(area);
    frame.render_widget(block, area);
    board_widget::render_board(frame, view.board, inner);
}

fn render_message(frame: &mut Frame, message: &Option<String>, area: Rect) {
    let text = message.as_deref().unwrap_or("");
    let msg_widget = Paragraph::new(text)
        .style(Style::default().fg(Color::Yellow))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(msg_widget, area);
}

fn render_controls(frame: &mut Frame, area: Rect) {
    let controls = Paragraph::new("←↑→↓ / WASD / hjkl: Move  |  R: Restart  |  Q: Quit")
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Controls"));

    frame.render_widget(controls, area);
}

/// Modal shown over the board once no moves are left.
fn render_game_over(frame: &mut Frame, snapshot: &GameSnapshot, area: Rect) {
    let [popup] = Layout::horizontal([Constraint::Length(36)])
        .flex(Flex::Center)
        .areas(area);
    let [popup] = Layout::vertical([Constraint::Length(7)])
        .flex(Flex::Center)
        .areas(popup);

    let lines = vec![
        Line::from(Span::styled(
            "Game Over",
            Style::default()
                .fg(Color::LightRed)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(format!("Final score: {}", snapshot.score)),
        Line::from(Span::styled(
            "Press R to play again",
            Style::default().fg(Color::Cyan),
        )),
    ];

    let dialog = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::LightRed)),
    );

    frame.render_widget(Clear, popup);
    frame.render_widget(dialog, popup);
}
