use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::ops::tree;
use crate::tui::app::{App, ConfirmAction, Mode, View};

/// Render the one-line status row: mode tag, then a confirm prompt, a
/// notice, or key hints.
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let mut spans: Vec<Span> = Vec::new();

    let (tag, tag_color) = match app.mode {
        Mode::Navigate => match app.view {
            View::Board => (" BOARD ", theme.highlight),
            View::Timeline => (" TIMELINE ", theme.cyan),
        },
        Mode::Edit => (" EDIT ", theme.yellow),
        Mode::Move => (" MOVE ", theme.green),
        Mode::Confirm => (" CONFIRM ", theme.red),
    };
    spans.push(Span::styled(
        tag,
        Style::default()
            .fg(theme.background)
            .bg(tag_color)
            .add_modifier(Modifier::BOLD),
    ));
    spans.push(Span::styled(" ", Style::default().bg(theme.background)));

    if let Some(confirm) = &app.confirm {
        spans.push(Span::styled(
            confirm_prompt(app, confirm),
            Style::default().fg(theme.yellow).bg(theme.background),
        ));
    } else if let Some(notice) = &app.notice {
        spans.push(Span::styled(
            notice.clone(),
            Style::default().fg(theme.yellow).bg(theme.background),
        ));
    } else if app.show_key_hints {
        let hints = match (app.mode, app.view) {
            (Mode::Navigate, View::Board) => {
                "j/k move · space done · a add · A child · S section · e edit · D due · d delete · > indent · m grab · z fold · t timeline · q quit"
            }
            (Mode::Navigate, View::Timeline) => {
                "j/k select · h/l shift date · [/] scroll · b board · q quit"
            }
            (Mode::Edit, _) => "enter commit · esc cancel",
            (Mode::Move, _) => "J/K move · enter drop · esc done",
            (Mode::Confirm, _) => "y confirm · n cancel",
        };
        spans.push(Span::styled(
            hints,
            Style::default().fg(theme.dim).bg(theme.background),
        ));
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(theme.background));
    frame.render_widget(paragraph, area);
}

fn confirm_prompt(app: &App, confirm: &ConfirmAction) -> String {
    match confirm {
        ConfirmAction::DeleteTodo {
            section_id,
            todo_id,
        } => {
            let text = app
                .board
                .section(section_id)
                .and_then(|s| tree::find_by_id(&s.todos, todo_id))
                .map(|t| t.text.clone())
                .unwrap_or_default();
            format!("Delete \"{}\" and its subtasks? (y/n)", text)
        }
        ConfirmAction::DeleteSection { section_id } => {
            let title = app
                .board
                .section(section_id)
                .map(|s| s.title.clone())
                .unwrap_or_default();
            format!("Delete section \"{}\" and all its todos? (y/n)", title)
        }
    }
}
