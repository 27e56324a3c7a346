pub mod board_view;
pub mod status_row;
pub mod timeline_view;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::Style;
use ratatui::widgets::Block;

use super::app::{App, View};

/// Main render function — dispatches to the active view
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    let bg_style = Style::default().bg(app.theme.background);
    frame.render_widget(Block::default().style(bg_style), area);

    // Layout: content | status row
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(area);

    match app.view {
        View::Board => board_view::render_board_view(frame, app, chunks[0]),
        View::Timeline => timeline_view::render_timeline_view(frame, app, chunks[0]),
    }

    status_row::render_status_row(frame, app, chunks[1]);
}
