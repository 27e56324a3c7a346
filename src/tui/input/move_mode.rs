use crossterm::event::{KeyCode, KeyEvent};

use crate::ops::reorder::{self, DragSource};
use crate::ops::tree;
use crate::tui::app::{App, FlatRow, Mode, MoveState};

/// Grab the todo under the cursor (board view only).
pub(super) fn enter_move_mode(app: &mut App) {
    let Some(FlatRow::Todo {
        section_id,
        todo_id,
        ..
    }) = app.cursor_row()
    else {
        return;
    };
    app.move_state = Some(MoveState {
        source: DragSource {
            section_id,
            todo_id,
        },
    });
    app.mode = Mode::Move;
}

pub(super) fn handle_move(app: &mut App, key: KeyEvent) {
    match key.code {
        // Drop: the moves have already been applied live
        KeyCode::Enter | KeyCode::Char('m') | KeyCode::Esc => {
            if let Some(ms) = app.move_state.take() {
                app.move_cursor_to_todo(&ms.source.todo_id);
            }
            app.mode = Mode::Navigate;
        }
        KeyCode::Char('J') | KeyCode::Char('j') | KeyCode::Down => step_move(app, true),
        KeyCode::Char('K') | KeyCode::Char('k') | KeyCode::Up => step_move(app, false),
        _ => {}
    }
}

/// Move the grabbed todo one visible step down or up. Rows inside the
/// grabbed subtree are never drop targets; a section header resolves to a
/// move-to-root on the appropriate section.
fn step_move(app: &mut App, down: bool) {
    let Some(source) = app.move_state.as_ref().map(|ms| ms.source.clone()) else {
        return;
    };
    let rows = app.build_flat_rows();
    let Some(source_idx) = rows
        .iter()
        .position(|r| r.todo_id() == Some(source.todo_id.as_str()))
    else {
        return;
    };

    let changed = if down {
        step_down(app, &source, &rows, source_idx)
    } else {
        step_up(app, &source, &rows, source_idx)
    };

    if changed {
        app.save_board();
        app.move_cursor_to_todo(&source.todo_id);
    }
}

fn step_down(app: &mut App, source: &DragSource, rows: &[FlatRow], source_idx: usize) -> bool {
    // Skip past the grabbed subtree, then drop after the first todo below,
    // or onto the next section's root.
    for row in &rows[source_idx + 1..] {
        match row {
            FlatRow::Todo {
                section_id,
                todo_id,
                ..
            } => {
                if in_grabbed_subtree(app, source, todo_id) {
                    continue;
                }
                return reorder::move_todo(&mut app.board, source, todo_id, section_id, false);
            }
            FlatRow::SectionHeader { section_id } => {
                return reorder::move_to_root(&mut app.board, source, section_id);
            }
        }
    }
    false
}

fn step_up(app: &mut App, source: &DragSource, rows: &[FlatRow], source_idx: usize) -> bool {
    for row in rows[..source_idx].iter().rev() {
        match row {
            FlatRow::Todo {
                section_id,
                todo_id,
                ..
            } => {
                return reorder::move_todo(&mut app.board, source, todo_id, section_id, true);
            }
            FlatRow::SectionHeader { section_id } => {
                // The grabbed todo is first in its section; hop to the end
                // of the previous section if there is one.
                let Some(pos) = app
                    .board
                    .sections
                    .iter()
                    .position(|s| s.id == *section_id)
                else {
                    return false;
                };
                if pos == 0 {
                    return false;
                }
                let prev_id = app.board.sections[pos - 1].id.clone();
                return reorder::move_to_root(&mut app.board, source, &prev_id);
            }
        }
    }
    false
}

/// True when the row belongs to the grabbed todo itself or its subtree —
/// those rows can never receive the drop.
fn in_grabbed_subtree(app: &App, source: &DragSource, target_id: &str) -> bool {
    let Some(section) = app.board.section(&source.section_id) else {
        return false;
    };
    let Some(source_todo) = tree::find_by_id(&section.todos, &source.todo_id) else {
        return false;
    };
    tree::is_descendant(source_todo, target_id)
}
