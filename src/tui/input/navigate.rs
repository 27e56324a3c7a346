use chrono::Days;
use crossterm::event::{KeyCode, KeyEvent};

use crate::ops::{section_ops, todo_ops, tree};
use crate::tui::app::{App, ConfirmAction, EditTarget, FlatRow, Mode, View};

use super::edit::start_edit;
use super::move_mode::enter_move_mode;

pub(super) fn handle_navigate(app: &mut App, key: KeyEvent) {
    match app.view {
        View::Board => handle_board(app, key),
        View::Timeline => handle_timeline(app, key),
    }
}

// ---------------------------------------------------------------------------
// Board view
// ---------------------------------------------------------------------------

fn handle_board(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char('t') => {
            app.view = View::Timeline;
            app.timeline_scroll = None;
            app.timeline_cursor = 0;
            app.clamp_timeline_cursor();
        }

        // Cursor movement
        KeyCode::Char('j') | KeyCode::Down => {
            let len = app.build_flat_rows().len();
            if len > 0 && app.cursor + 1 < len {
                app.cursor += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.cursor = app.cursor.saturating_sub(1);
        }
        KeyCode::Char('g') => app.cursor = 0,
        KeyCode::Char('G') => {
            app.cursor = app.build_flat_rows().len().saturating_sub(1);
        }

        // Completion toggle
        KeyCode::Char(' ') | KeyCode::Char('x') => toggle_cursor_todo(app),

        // Creation
        KeyCode::Char('a') => add_todo_at_cursor(app, false),
        KeyCode::Char('A') => add_todo_at_cursor(app, true),
        KeyCode::Char('S') => add_section(app),

        // Editing
        KeyCode::Char('e') | KeyCode::Enter => edit_at_cursor(app),
        KeyCode::Char('D') => edit_due_date_at_cursor(app),

        // Structure
        KeyCode::Char('d') => confirm_delete_at_cursor(app),
        KeyCode::Char('>') => promote_at_cursor(app),
        KeyCode::Char('m') => enter_move_mode(app),
        KeyCode::Char('z') => toggle_collapse_at_cursor(app),

        _ => {}
    }
}

fn toggle_cursor_todo(app: &mut App) {
    let Some(FlatRow::Todo {
        section_id,
        todo_id,
        ..
    }) = app.cursor_row()
    else {
        return;
    };
    if let Some(section) = app.board.section_mut(&section_id)
        && todo_ops::toggle_completed(section, &todo_id).is_some()
    {
        app.save_board();
    }
}

/// Create a provisional todo and open its edit session. With `as_child`,
/// the cursor todo becomes the parent; otherwise the todo lands at the
/// root of the cursor's section.
fn add_todo_at_cursor(app: &mut App, as_child: bool) {
    let Some(row) = app.cursor_row() else {
        return;
    };
    let section_id = row.section_id().to_string();
    let parent_id = if as_child {
        match row.todo_id() {
            Some(id) => Some(id.to_string()),
            None => return,
        }
    } else {
        None
    };

    let Some(section) = app.board.section_mut(&section_id) else {
        return;
    };
    let Some(new_id) = todo_ops::add_todo(section, parent_id.as_deref()) else {
        return;
    };
    if let Some(parent_id) = &parent_id {
        app.collapsed.remove(parent_id);
    }
    app.save_board();
    app.move_cursor_to_todo(&new_id);
    start_edit(
        app,
        EditTarget::TodoText {
            section_id,
            todo_id: new_id,
        },
        String::new(),
    );
}

fn add_section(app: &mut App) {
    let id = section_ops::add_section(&mut app.board, "");
    app.save_board();
    let rows = app.build_flat_rows();
    if let Some(idx) = rows.iter().position(
        |r| matches!(r, FlatRow::SectionHeader { section_id } if *section_id == id),
    ) {
        app.cursor = idx;
    }
    start_edit(app, EditTarget::SectionTitle { section_id: id }, String::new());
}

fn edit_at_cursor(app: &mut App) {
    match app.cursor_row() {
        Some(FlatRow::Todo {
            section_id,
            todo_id,
            ..
        }) => {
            let text = app
                .board
                .section(&section_id)
                .and_then(|s| tree::find_by_id(&s.todos, &todo_id))
                .map(|t| t.text.clone())
                .unwrap_or_default();
            start_edit(
                app,
                EditTarget::TodoText {
                    section_id,
                    todo_id,
                },
                text,
            );
        }
        Some(FlatRow::SectionHeader { section_id }) => {
            let title = app
                .board
                .section(&section_id)
                .map(|s| s.title.clone())
                .unwrap_or_default();
            start_edit(app, EditTarget::SectionTitle { section_id }, title);
        }
        None => {}
    }
}

fn edit_due_date_at_cursor(app: &mut App) {
    let Some(FlatRow::Todo {
        section_id,
        todo_id,
        ..
    }) = app.cursor_row()
    else {
        return;
    };
    let current = app
        .board
        .section(&section_id)
        .and_then(|s| tree::find_by_id(&s.todos, &todo_id))
        .and_then(|t| t.due_date)
        .map(|d| d.to_string())
        .unwrap_or_default();
    start_edit(
        app,
        EditTarget::DueDate {
            section_id,
            todo_id,
        },
        current,
    );
}

fn confirm_delete_at_cursor(app: &mut App) {
    match app.cursor_row() {
        Some(FlatRow::Todo {
            section_id,
            todo_id,
            ..
        }) => {
            app.confirm = Some(ConfirmAction::DeleteTodo {
                section_id,
                todo_id,
            });
            app.mode = Mode::Confirm;
        }
        Some(FlatRow::SectionHeader { section_id }) => {
            app.confirm = Some(ConfirmAction::DeleteSection { section_id });
            app.mode = Mode::Confirm;
        }
        None => {}
    }
}

fn promote_at_cursor(app: &mut App) {
    let Some(FlatRow::Todo {
        section_id,
        todo_id,
        ..
    }) = app.cursor_row()
    else {
        return;
    };
    match section_ops::promote_todo(&mut app.board, &section_id, &todo_id) {
        Ok(()) => {
            app.save_board();
            app.move_cursor_to_todo(&todo_id);
        }
        Err(e) => app.set_notice(e.to_string()),
    }
}

fn toggle_collapse_at_cursor(app: &mut App) {
    let Some(FlatRow::Todo {
        todo_id,
        has_children,
        ..
    }) = app.cursor_row()
    else {
        return;
    };
    if !has_children {
        return;
    }
    if !app.collapsed.remove(&todo_id) {
        app.collapsed.insert(todo_id);
    }
}

// ---------------------------------------------------------------------------
// Timeline view
// ---------------------------------------------------------------------------

fn handle_timeline(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char('b') | KeyCode::Char('t') | KeyCode::Esc => {
            app.view = View::Board;
        }
        KeyCode::Char('j') | KeyCode::Down => app.step_timeline_cursor(true),
        KeyCode::Char('k') | KeyCode::Up => app.step_timeline_cursor(false),
        KeyCode::Char('h') | KeyCode::Left => shift_bar_date(app, -1),
        KeyCode::Char('l') | KeyCode::Right => shift_bar_date(app, 1),
        KeyCode::Char('[') => {
            app.timeline_scroll = app.timeline_scroll.map(|s| s.saturating_sub(1));
        }
        KeyCode::Char(']') => {
            app.timeline_scroll = app.timeline_scroll.map(|s| s + 1);
        }
        _ => {}
    }
}

/// Drag the selected bar one day left or right: a direct due-date update
/// on the underlying todo, stored immediately.
fn shift_bar_date(app: &mut App, delta: i64) {
    let Some(bar) = app.timeline_cursor_bar() else {
        return;
    };
    let new_date = if delta < 0 {
        bar.due_date.checked_sub_days(Days::new(1))
    } else {
        bar.due_date.checked_add_days(Days::new(1))
    };
    let Some(new_date) = new_date else {
        return;
    };
    if todo_ops::update_due_date(&mut app.board, &bar.section_id, &bar.id, new_date) {
        app.save_board();
    }
}
