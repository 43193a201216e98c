use crate::game::Board;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Width of one tile in terminal columns.
pub const TILE_WIDTH: usize = 7;
/// Height of one tile in terminal rows.
pub const TILE_HEIGHT: usize = 3;

/// Background and foreground for a tile value.
pub fn tile_style(value: u32) -> Style {
    let (bg, fg) = match value {
        0 => (Color::Rgb(205, 193, 180), Color::Rgb(205, 193, 180)),
        2 => (Color::Rgb(238, 228, 218), Color::Rgb(119, 110, 101)),
        4 => (Color::Rgb(237, 224, 200), Color::Rgb(119, 110, 101)),
        8 => (Color::Rgb(242, 177, 121), Color::White),
        16 => (Color::Rgb(245, 149, 99), Color::White),
        32 => (Color::Rgb(246, 124, 95), Color::White),
        64 => (Color::Rgb(246, 94, 59), Color::White),
        128 => (Color::Rgb(237, 207, 114), Color::White),
        256 => (Color::Rgb(237, 204, 97), Color::White),
        512 => (Color::Rgb(237, 200, 80), Color::White),
        1024 => (Color::Rgb(237, 197, 63), Color::White),
        2048 => (Color::Rgb(237, 194, 46), Color::White),
        _ => (Color::Rgb(60, 58, 50), Color::White),
    };
    Style::default().bg(bg).fg(fg).add_modifier(Modifier::BOLD)
}

/// Text lines for the board: each tile is a `TILE_WIDTH` x `TILE_HEIGHT`
/// coloured block with its value centred.
pub fn board_lines(board: &Board) -> Vec<Line<'static>> {
    let size = board.size();
    let mut lines = Vec::with_capacity(size * (TILE_HEIGHT + 1));
    let blank = " ".repeat(TILE_WIDTH);

    for row in 0..size {
        for tile_line in 0..TILE_HEIGHT {
            let mut spans = Vec::with_capacity(size * 2);
            for col in 0..size {
                if col > 0 {
                    spans.push(Span::raw(" "));
                }
                let value = board.get(row, col);
                let text = if tile_line == TILE_HEIGHT / 2 && value != 0 {
                    format!("{:^width$}", value, width = TILE_WIDTH)
                } else {
                    blank.clone()
                };
                spans.push(Span::styled(text, tile_style(value)));
            }
            lines.push(Line::from(spans));
        }
        if row + 1 < size {
            lines.push(Line::from(""));
        }
    }
    lines
}

/// Terminal area the board needs, without borders.
pub fn board_extent(board: &Board) -> (u16, u16) {
    let size = board.size();
    let width = size * TILE_WIDTH + (size - 1);
    let height = size * TILE_HEIGHT + (size - 1);
    (width as u16, height as u16)
}

/// Render the board centred in the given area.
pub fn render_board(frame: &mut Frame, board: &Board, area: Rect) {
    let widget = Paragraph::new(board_lines(board)).alignment(Alignment::Center);
    frame.render_widget(widget, area);
}
