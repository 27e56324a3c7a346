use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::model::todo::Todo;
use crate::ops::tree;
use crate::tui::app::{App, EditTarget, FlatRow, Mode};
use crate::util::linkify::split_urls;
use crate::util::unicode::{byte_offset_to_display_col, display_width, truncate_to_width};

/// Render the board view content area
pub fn render_board_view(frame: &mut Frame, app: &mut App, area: Rect) {
    let rows = app.build_flat_rows();

    if rows.is_empty() {
        let empty = Paragraph::new(" No sections — press S to add one")
            .style(Style::default().fg(app.theme.dim).bg(app.theme.background));
        frame.render_widget(empty, area);
        return;
    }

    // Clamp cursor and adjust scroll to keep it visible
    let visible_height = area.height as usize;
    app.cursor = app.cursor.min(rows.len() - 1);
    if app.cursor < app.scroll_offset {
        app.scroll_offset = app.cursor;
    } else if visible_height > 0 && app.cursor >= app.scroll_offset + visible_height {
        app.scroll_offset = app.cursor + 1 - visible_height;
    }

    let end = rows.len().min(app.scroll_offset + visible_height);
    let mut lines: Vec<Line> = Vec::with_capacity(visible_height);
    let mut cursor_pos: Option<(u16, u16)> = None;

    for (row, idx) in rows[app.scroll_offset..end].iter().zip(app.scroll_offset..end) {
        let is_cursor = idx == app.cursor;
        let screen_y = area.y + (idx - app.scroll_offset) as u16;
        let (line, edit_col) = match row {
            FlatRow::SectionHeader { section_id } => {
                render_section_header(app, section_id, is_cursor, area.width as usize)
            }
            FlatRow::Todo {
                section_id,
                todo_id,
                depth,
                has_children,
                is_collapsed,
            } => render_todo_row(
                app,
                &RowInfo {
                    section_id,
                    todo_id,
                    depth: *depth,
                    has_children: *has_children,
                    is_collapsed: *is_collapsed,
                },
                is_cursor,
                area.width as usize,
            ),
        };
        if let Some(col) = edit_col {
            cursor_pos = Some((area.x + col, screen_y));
        }
        lines.push(line);
    }

    let paragraph = Paragraph::new(lines).style(Style::default().bg(app.theme.background));
    frame.render_widget(paragraph, area);

    if let Some((x, y)) = cursor_pos {
        frame.set_cursor_position((x.min(area.x + area.width.saturating_sub(1)), y));
    }
}

/// Build a section header line. Returns the line and, when the section
/// title is being edited on this row, the column where the terminal cursor
/// belongs.
fn render_section_header<'a>(
    app: &'a App,
    section_id: &str,
    is_cursor: bool,
    width: usize,
) -> (Line<'a>, Option<u16>) {
    let theme = &app.theme;
    let mut spans: Vec<Span> = Vec::new();
    let mut edit_col = None;

    let base_bg = if is_cursor {
        theme.selection_bg
    } else {
        theme.background
    };
    let marker_style = Style::default().fg(theme.highlight).bg(base_bg);
    spans.push(Span::styled("▌ ", marker_style));

    let editing_this = matches!(
        &app.edit,
        Some(edit) if matches!(
            &edit.target,
            EditTarget::SectionTitle { section_id: sid } if sid == section_id
        )
    );

    if editing_this {
        if let Some(edit) = &app.edit {
            spans.push(Span::styled(
                edit.buffer.clone(),
                Style::default().fg(theme.text_bright).bg(base_bg),
            ));
            edit_col = Some((2 + byte_offset_to_display_col(&edit.buffer, edit.cursor)) as u16);
        }
    } else {
        let section = app.board.section(section_id);
        let title = match section {
            Some(s) if !s.title.is_empty() => s.title.clone(),
            _ => "(untitled)".to_string(),
        };
        let count = section.map_or(0, |s| tree::count_todos(&s.todos));
        spans.push(Span::styled(
            truncate_to_width(&title, width.saturating_sub(8)),
            Style::default()
                .fg(theme.text_bright)
                .bg(base_bg)
                .add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::styled(
            format!("  {}", count),
            Style::default().fg(theme.dim).bg(base_bg),
        ));
    }

    (pad_line(spans, width, base_bg), edit_col)
}

/// A todo row's position in the tree (passed to the renderer)
struct RowInfo<'a> {
    section_id: &'a str,
    todo_id: &'a str,
    depth: usize,
    has_children: bool,
    is_collapsed: bool,
}

/// Build one todo row: indentation, collapse marker, checkbox, text (URLs
/// underlined), due date (red when overdue).
fn render_todo_row<'a>(
    app: &'a App,
    info: &RowInfo<'_>,
    is_cursor: bool,
    width: usize,
) -> (Line<'a>, Option<u16>) {
    let theme = &app.theme;
    let todo = app
        .board
        .section(info.section_id)
        .and_then(|s| tree::find_by_id(&s.todos, info.todo_id));
    let Some(todo) = todo else {
        return (Line::from(""), None);
    };

    let is_grabbed = app
        .move_state
        .as_ref()
        .is_some_and(|ms| ms.source.todo_id == info.todo_id);
    let base_bg = if is_cursor || is_grabbed {
        theme.selection_bg
    } else {
        theme.background
    };

    let mut spans: Vec<Span> = Vec::new();
    let indent = "  ".repeat(info.depth + 1);
    spans.push(Span::styled(indent.clone(), Style::default().bg(base_bg)));

    let marker = if info.has_children {
        if info.is_collapsed { "▸ " } else { "▾ " }
    } else {
        "  "
    };
    spans.push(Span::styled(
        marker,
        Style::default().fg(theme.dim).bg(base_bg),
    ));

    let checkbox = if todo.completed { "[x] " } else { "[ ] " };
    let checkbox_style = if todo.completed {
        Style::default().fg(theme.green).bg(base_bg)
    } else {
        Style::default().fg(theme.text).bg(base_bg)
    };
    spans.push(Span::styled(checkbox, checkbox_style));

    let prefix_width = (indent.len() + 2 + 4) as u16;

    let editing_this = matches!(
        &app.edit,
        Some(edit) if matches!(
            &edit.target,
            EditTarget::TodoText { todo_id: tid, .. } | EditTarget::DueDate { todo_id: tid, .. }
                if tid == info.todo_id
        )
    ) && app.mode == Mode::Edit;

    if editing_this {
        let edit = app.edit.as_ref().map(|e| (e.buffer.clone(), e.cursor, e.target.clone()));
        if let Some((buffer, cursor, target)) = edit {
            if matches!(target, EditTarget::DueDate { .. }) {
                spans.push(Span::styled(
                    "due: ",
                    Style::default().fg(theme.dim).bg(base_bg),
                ));
                spans.push(Span::styled(
                    buffer.clone(),
                    Style::default().fg(theme.yellow).bg(base_bg),
                ));
                let col = prefix_width as usize + 5 + byte_offset_to_display_col(&buffer, cursor);
                return (pad_line(spans, width, base_bg), Some(col as u16));
            }
            spans.push(Span::styled(
                buffer.clone(),
                Style::default().fg(theme.text_bright).bg(base_bg),
            ));
            let col = prefix_width as usize + byte_offset_to_display_col(&buffer, cursor);
            return (pad_line(spans, width, base_bg), Some(col as u16));
        }
    }

    push_text_spans(&mut spans, todo, app, base_bg);

    if let Some(date) = todo.due_date {
        let overdue = date < app.today && !todo.completed;
        let date_style = if overdue {
            Style::default().fg(theme.red).bg(base_bg)
        } else {
            Style::default().fg(theme.cyan).bg(base_bg)
        };
        spans.push(Span::styled(format!("  · {}", date), date_style));
    }

    if is_grabbed {
        spans.push(Span::styled(
            "  (moving)",
            Style::default().fg(theme.yellow).bg(base_bg),
        ));
    }

    (pad_line(spans, width, base_bg), None)
}

/// Todo text, dimmed when completed, URLs underlined
fn push_text_spans<'a>(
    spans: &mut Vec<Span<'a>>,
    todo: &Todo,
    app: &App,
    base_bg: ratatui::style::Color,
) {
    let theme = &app.theme;
    let base_style = if todo.completed {
        Style::default()
            .fg(theme.dim)
            .bg(base_bg)
            .add_modifier(Modifier::CROSSED_OUT)
    } else {
        Style::default().fg(theme.text).bg(base_bg)
    };
    let text = if todo.text.is_empty() {
        "(empty)".to_string()
    } else {
        todo.text.clone()
    };
    for piece in split_urls(&text) {
        let style = if piece.is_url {
            base_style
                .fg(theme.blue)
                .add_modifier(Modifier::UNDERLINED)
        } else {
            base_style
        };
        spans.push(Span::styled(piece.text.to_string(), style));
    }
}

/// Right-pad a line with background-styled spaces to the full width
fn pad_line(spans: Vec<Span<'_>>, width: usize, bg: ratatui::style::Color) -> Line<'_> {
    let used: usize = spans.iter().map(|s| display_width(&s.content)).sum();
    let mut spans = spans;
    if used < width {
        spans.push(Span::styled(
            " ".repeat(width - used),
            Style::default().bg(bg),
        ));
    }
    Line::from(spans)
}
