use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent};

use crate::ops::{section_ops, todo_ops};
use crate::tui::app::{App, EditState, EditTarget, Mode};
use crate::util::unicode::{next_grapheme_boundary, prev_grapheme_boundary};

/// Open an inline edit session with the cursor at the end of the buffer.
pub(super) fn start_edit(app: &mut App, target: EditTarget, buffer: String) {
    let cursor = buffer.len();
    app.edit = Some(EditState {
        target,
        buffer,
        cursor,
    });
    app.mode = Mode::Edit;
}

pub(super) fn handle_edit(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => commit(app),
        KeyCode::Esc => cancel(app),

        KeyCode::Char(c) => {
            if let Some(edit) = &mut app.edit {
                edit.buffer.insert(edit.cursor, c);
                edit.cursor += c.len_utf8();
            }
        }
        KeyCode::Backspace => {
            if let Some(edit) = &mut app.edit
                && let Some(prev) = prev_grapheme_boundary(&edit.buffer, edit.cursor)
            {
                edit.buffer.replace_range(prev..edit.cursor, "");
                edit.cursor = prev;
            }
        }
        KeyCode::Delete => {
            if let Some(edit) = &mut app.edit
                && edit.cursor < edit.buffer.len()
            {
                let end =
                    next_grapheme_boundary(&edit.buffer, edit.cursor).unwrap_or(edit.buffer.len());
                edit.buffer.replace_range(edit.cursor..end, "");
            }
        }
        KeyCode::Left => {
            if let Some(edit) = &mut app.edit
                && let Some(prev) = prev_grapheme_boundary(&edit.buffer, edit.cursor)
            {
                edit.cursor = prev;
            }
        }
        KeyCode::Right => {
            if let Some(edit) = &mut app.edit
                && let Some(next) = next_grapheme_boundary(&edit.buffer, edit.cursor)
            {
                edit.cursor = next;
            }
        }
        KeyCode::Home => {
            if let Some(edit) = &mut app.edit {
                edit.cursor = 0;
            }
        }
        KeyCode::End => {
            if let Some(edit) = &mut app.edit {
                edit.cursor = edit.buffer.len();
            }
        }
        _ => {}
    }
}

/// Enter: apply the buffer through the explicit edit-close policy.
fn commit(app: &mut App) {
    let Some(edit) = app.edit.take() else {
        app.mode = Mode::Navigate;
        return;
    };
    match edit.target {
        EditTarget::TodoText {
            section_id,
            todo_id,
        } => {
            if let Some(section) = app.board.section_mut(&section_id) {
                match todo_ops::commit_edit(section, &todo_id, &edit.buffer) {
                    todo_ops::EditOutcome::Committed
                    | todo_ops::EditOutcome::DeletedEmpty => app.save_board(),
                    todo_ops::EditOutcome::NotFound => {}
                }
            }
        }
        EditTarget::SectionTitle { section_id } => {
            if section_ops::rename_section(&mut app.board, &section_id, edit.buffer) {
                app.save_board();
            }
        }
        EditTarget::DueDate {
            section_id,
            todo_id,
        } => {
            let trimmed = edit.buffer.trim();
            let date = if trimmed.is_empty() {
                None
            } else {
                match NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
                    Ok(d) => Some(d),
                    Err(_) => {
                        // stay in edit mode so the input can be fixed
                        app.set_notice(format!("invalid date '{}' (YYYY-MM-DD)", trimmed));
                        app.edit = Some(EditState {
                            target: EditTarget::DueDate {
                                section_id,
                                todo_id,
                            },
                            buffer: edit.buffer,
                            cursor: edit.cursor,
                        });
                        return;
                    }
                }
            };
            if let Some(section) = app.board.section_mut(&section_id)
                && todo_ops::set_due_date(section, &todo_id, date)
            {
                app.save_board();
            }
        }
    }
    app.mode = Mode::Navigate;
    app.clamp_cursor();
}

/// Esc: discard the buffer. The delete-on-empty-close policy still
/// applies to todo text — a todo left with nothing typed does not survive
/// the session ending.
fn cancel(app: &mut App) {
    let Some(edit) = app.edit.take() else {
        app.mode = Mode::Navigate;
        return;
    };
    if let EditTarget::TodoText {
        section_id,
        todo_id,
    } = &edit.target
        && edit.buffer.trim().is_empty()
        && let Some(section) = app.board.section_mut(section_id)
        && todo_ops::delete_todo(section, todo_id)
    {
        app.save_board();
    }
    app.mode = Mode::Navigate;
    app.clamp_cursor();
}
