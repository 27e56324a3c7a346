//! The section registry: an ordered collection of named sections.

use crate::model::board::Board;
use crate::model::ident::new_id;
use crate::model::section::Section;
use crate::ops::tree::{self, ReorderError};

/// Append a new empty section. Returns its id.
pub fn add_section(board: &mut Board, title: impl Into<String>) -> String {
    let section = Section::new(new_id(), title);
    let id = section.id.clone();
    board.sections.push(section);
    id
}

/// Remove a section and all the todos it owns. Confirmation is the
/// caller's concern; once called the removal is unconditional.
/// Returns whether a section was removed.
pub fn delete_section(board: &mut Board, id: &str) -> bool {
    let before = board.sections.len();
    board.sections.retain(|s| s.id != id);
    board.sections.len() != before
}

/// Returns whether the section was found.
pub fn rename_section(board: &mut Board, id: &str, title: impl Into<String>) -> bool {
    match board.section_mut(id) {
        Some(section) => {
            section.title = title.into();
            true
        }
        None => false,
    }
}

/// Promote a todo to a child of its preceding sibling. An unknown section
/// or todo id is a no-op; a first sibling is a precondition failure.
pub fn promote_todo(board: &mut Board, section_id: &str, todo_id: &str) -> Result<(), ReorderError> {
    let Some(section) = board.section_mut(section_id) else {
        return Ok(());
    };
    tree::promote_to_child_of_previous(&mut section.todos, todo_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::todo::Todo;

    #[test]
    fn test_add_section_appends() {
        let mut board = Board::default();
        let first = add_section(&mut board, "Work");
        let second = add_section(&mut board, "");
        assert_eq!(board.sections.len(), 2);
        assert_eq!(board.sections[0].id, first);
        assert_eq!(board.sections[1].id, second);
        assert_eq!(board.sections[1].title, "");
    }

    #[test]
    fn test_add_then_delete_restores_prior_state() {
        let mut board = Board::seeded("Personal");
        let titles_before: Vec<String> =
            board.sections.iter().map(|s| s.title.clone()).collect();
        let id = add_section(&mut board, "Scratch");
        assert!(delete_section(&mut board, &id));
        let titles_after: Vec<String> =
            board.sections.iter().map(|s| s.title.clone()).collect();
        assert_eq!(titles_before, titles_after);
    }

    #[test]
    fn test_delete_section_cascades() {
        let mut board = Board::default();
        let id = add_section(&mut board, "Work");
        let section = board.section_mut(&id).unwrap();
        section.todos.push(Todo::with_text("a".into(), "A".into()));
        assert!(delete_section(&mut board, &id));
        assert!(board.sections.is_empty());
        assert!(!delete_section(&mut board, &id));
    }

    #[test]
    fn test_rename_section() {
        let mut board = Board::default();
        let id = add_section(&mut board, "");
        assert!(rename_section(&mut board, &id, "Errands"));
        assert_eq!(board.section(&id).unwrap().title, "Errands");
        assert!(!rename_section(&mut board, "missing", "x"));
    }

    #[test]
    fn test_promote_todo_missing_section_is_noop() {
        let mut board = Board::default();
        assert!(promote_todo(&mut board, "missing", "t").is_ok());
    }

    #[test]
    fn test_promote_todo_first_sibling_reports_failure() {
        let mut board = Board::default();
        let id = add_section(&mut board, "Work");
        let section = board.section_mut(&id).unwrap();
        section.todos.push(Todo::with_text("a".into(), "A".into()));
        assert_eq!(
            promote_todo(&mut board, &id, "a"),
            Err(ReorderError::NoPreviousSibling)
        );
    }
}
