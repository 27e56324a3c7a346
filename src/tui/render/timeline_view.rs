use chrono::{Days, NaiveDate};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::ops::timeline;
use crate::tui::app::{App, TimelineRow};
use crate::util::unicode::{display_width, truncate_to_width};

/// Width of the task label column
const LABEL_W: usize = 26;
/// Terminal cells per day column
const DAY_W: usize = 6;

/// Render the timeline view: a date axis header and one bar row per todo,
/// grouped under section labels.
pub fn render_timeline_view(frame: &mut Frame, app: &mut App, area: Rect) {
    let rows = app.build_timeline_rows();
    let range = app.timeline_range();

    // A None range means an empty projection, and vice versa
    let Some((start, end)) = range else {
        let empty = Paragraph::new(" No tasks.")
            .style(Style::default().fg(app.theme.dim).bg(app.theme.background));
        frame.render_widget(empty, area);
        return;
    };

    let total_days = (end - start).num_days().max(0) as usize + 1;
    let grid_width = (area.width as usize).saturating_sub(LABEL_W);
    let days_visible = (grid_width / DAY_W).max(1);
    let max_scroll = total_days.saturating_sub(days_visible);

    // First render centers today on the axis
    let today_idx = (app.today - start).num_days().max(0) as usize;
    let scroll = match app.timeline_scroll {
        Some(s) => s.min(max_scroll),
        None => today_idx.saturating_sub(days_visible / 2).min(max_scroll),
    };
    app.timeline_scroll = Some(scroll);

    app.clamp_timeline_cursor();

    let mut lines: Vec<Line> = Vec::new();
    lines.push(header_line(app, start, scroll, days_visible, today_idx, true));
    lines.push(header_line(app, start, scroll, days_visible, today_idx, false));

    // Keep the cursor row visible below the two header rows
    let body_height = (area.height as usize).saturating_sub(2).max(1);
    let row_scroll = if app.timeline_cursor >= body_height {
        app.timeline_cursor + 1 - body_height
    } else {
        0
    };

    let end_row = rows.len().min(row_scroll + body_height);
    for (row, idx) in rows[row_scroll..end_row].iter().zip(row_scroll..end_row) {
        let is_cursor = idx == app.timeline_cursor;
        match row {
            TimelineRow::SectionLabel { title } => {
                lines.push(section_label_line(app, title, area.width as usize));
            }
            TimelineRow::Bar { todo } => {
                lines.push(bar_line(
                    app,
                    todo,
                    start,
                    scroll,
                    days_visible,
                    today_idx,
                    is_cursor,
                ));
            }
        }
    }

    let paragraph = Paragraph::new(lines).style(Style::default().bg(app.theme.background));
    frame.render_widget(paragraph, area);
}

/// One of the two axis header rows: dates ("01-05") or weekdays ("Fri")
fn header_line<'a>(
    app: &App,
    start: NaiveDate,
    scroll: usize,
    days_visible: usize,
    today_idx: usize,
    dates: bool,
) -> Line<'a> {
    let theme = &app.theme;
    let mut spans: Vec<Span> = Vec::new();
    spans.push(Span::styled(
        " ".repeat(LABEL_W),
        Style::default().bg(theme.background),
    ));
    for offset in 0..days_visible {
        let day_idx = scroll + offset;
        let Some(date) = start.checked_add_days(Days::new(day_idx as u64)) else {
            break;
        };
        let label = if dates {
            format!("{:^width$}", date.format("%m-%d").to_string(), width = DAY_W)
        } else {
            format!("{:^width$}", date.format("%a").to_string(), width = DAY_W)
        };
        let style = if day_idx == today_idx {
            Style::default()
                .fg(theme.text_bright)
                .bg(theme.today_bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.dim).bg(theme.background)
        };
        spans.push(Span::styled(label, style));
    }
    Line::from(spans)
}

fn section_label_line<'a>(app: &App, title: &str, width: usize) -> Line<'a> {
    let theme = &app.theme;
    let text = truncate_to_width(title, width.saturating_sub(1));
    let pad = width.saturating_sub(display_width(&text));
    Line::from(vec![
        Span::styled(
            text,
            Style::default()
                .fg(theme.text_bright)
                .bg(theme.background)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(" ".repeat(pad), Style::default().bg(theme.background)),
    ])
}

/// A todo's bar row: label column plus a bar at its due-date cell.
/// Completed bars are dim, overdue bars red, undated stand-ins hollow.
fn bar_line<'a>(
    app: &App,
    todo: &timeline::VisualTodo,
    start: NaiveDate,
    scroll: usize,
    days_visible: usize,
    today_idx: usize,
    is_cursor: bool,
) -> Line<'a> {
    let theme = &app.theme;
    let label_bg = if is_cursor {
        theme.selection_bg
    } else {
        theme.background
    };

    let mut spans: Vec<Span> = Vec::new();
    let prefix = if todo.is_child { "    · " } else { "  " };
    let text = if todo.text.is_empty() {
        "(empty)"
    } else {
        &todo.text
    };
    let mut label = format!("{}{}", prefix, text);
    label = truncate_to_width(&label, LABEL_W);
    let pad = LABEL_W.saturating_sub(display_width(&label));
    let label_style = if todo.completed {
        Style::default().fg(theme.dim).bg(label_bg)
    } else {
        Style::default().fg(theme.text).bg(label_bg)
    };
    spans.push(Span::styled(label, label_style));
    spans.push(Span::styled(" ".repeat(pad), Style::default().bg(label_bg)));

    let bar_idx = (todo.due_date - start).num_days();
    let overdue = timeline::is_overdue(todo, app.today);

    for offset in 0..days_visible {
        let day_idx = scroll + offset;
        if bar_idx >= 0 && day_idx == bar_idx as usize {
            let bar_color = if todo.completed {
                theme.green
            } else if overdue {
                theme.red
            } else {
                theme.blue
            };
            let glyph = if todo.had_no_due_date {
                "░░░░░ "
            } else {
                "█████ "
            };
            spans.push(Span::styled(
                glyph,
                Style::default().fg(bar_color).bg(theme.background),
            ));
        } else {
            let bg = if day_idx == today_idx {
                theme.today_bg
            } else {
                theme.background
            };
            spans.push(Span::styled(" ".repeat(DAY_W), Style::default().bg(bg)));
        }
    }
    Line::from(spans)
}
