use crossterm::event::{KeyCode, KeyEvent};

use crate::ops::{section_ops, todo_ops};
use crate::tui::app::{App, ConfirmAction, Mode};

pub(super) fn handle_confirm(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('y') => {
            let action = app.confirm.take();
            app.mode = Mode::Navigate;
            match action {
                Some(ConfirmAction::DeleteTodo {
                    section_id,
                    todo_id,
                }) => {
                    if let Some(section) = app.board.section_mut(&section_id)
                        && todo_ops::delete_todo(section, &todo_id)
                    {
                        app.save_board();
                    }
                }
                Some(ConfirmAction::DeleteSection { section_id }) => {
                    if section_ops::delete_section(&mut app.board, &section_id) {
                        app.save_board();
                    }
                }
                None => {}
            }
            app.clamp_cursor();
        }
        KeyCode::Char('n') | KeyCode::Esc => {
            app.confirm = None;
            app.mode = Mode::Navigate;
        }
        _ => {}
    }
}
