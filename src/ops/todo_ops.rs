//! Operations on individual todos within a section.

use chrono::NaiveDate;

use crate::model::board::Board;
use crate::model::ident::new_id;
use crate::model::section::Section;
use crate::model::todo::Todo;
use crate::ops::tree;

/// Result of closing an edit session on a todo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    /// The new text was stored
    Committed,
    /// The text was empty after trimming, so the todo was deleted
    DeletedEmpty,
    /// The todo no longer exists
    NotFound,
}

/// Create a provisional (empty-text) todo at the section root, or appended
/// to the children of `parent_id`. Returns the new todo's id, or None when
/// the parent does not resolve (the todo is not created).
pub fn add_todo(section: &mut Section, parent_id: Option<&str>) -> Option<String> {
    let todo = Todo::new(new_id(), parent_id.map(str::to_string));
    let id = todo.id.clone();
    match parent_id {
        Some(pid) => match tree::insert_as_child(&mut section.todos, pid, todo) {
            Ok(()) => Some(id),
            Err(_) => None,
        },
        None => {
            tree::insert_root(&mut section.todos, todo);
            Some(id)
        }
    }
}

/// Create a todo with text already set, used by the CLI add path.
/// Same parent resolution as [`add_todo`].
pub fn add_todo_with_text(
    section: &mut Section,
    parent_id: Option<&str>,
    text: String,
    due_date: Option<NaiveDate>,
) -> Option<String> {
    let id = add_todo(section, parent_id)?;
    if let Some(todo) = tree::find_by_id_mut(&mut section.todos, &id) {
        todo.text = text;
        todo.due_date = due_date;
    }
    Some(id)
}

/// Close an edit session. Trimmed-empty text deletes the todo (provisional
/// todos never survive an empty edit close); anything else is stored
/// verbatim.
pub fn commit_edit(section: &mut Section, todo_id: &str, new_text: &str) -> EditOutcome {
    if tree::find_by_id(&section.todos, todo_id).is_none() {
        return EditOutcome::NotFound;
    }
    if new_text.trim().is_empty() {
        tree::remove_by_id(&mut section.todos, todo_id);
        return EditOutcome::DeletedEmpty;
    }
    if let Some(todo) = tree::find_by_id_mut(&mut section.todos, todo_id) {
        todo.text = new_text.to_string();
    }
    EditOutcome::Committed
}

/// Delete a todo and its entire subtree. Returns whether removal occurred.
pub fn delete_todo(section: &mut Section, todo_id: &str) -> bool {
    tree::remove_by_id(&mut section.todos, todo_id).is_some()
}

/// Flip the completed flag. Returns the new state, None if the id is gone.
pub fn toggle_completed(section: &mut Section, todo_id: &str) -> Option<bool> {
    let todo = tree::find_by_id_mut(&mut section.todos, todo_id)?;
    todo.completed = !todo.completed;
    Some(todo.completed)
}

/// Set or clear the due date. Returns whether the todo was found.
pub fn set_due_date(section: &mut Section, todo_id: &str, date: Option<NaiveDate>) -> bool {
    match tree::find_by_id_mut(&mut section.todos, todo_id) {
        Some(todo) => {
            todo.due_date = date;
            true
        }
        None => false,
    }
}

/// Timeline-bar drop target: unconditionally set the due date of a todo in
/// the given section, without re-validating tree position.
pub fn update_due_date(
    board: &mut Board,
    section_id: &str,
    todo_id: &str,
    new_date: NaiveDate,
) -> bool {
    let Some(section) = board.section_mut(section_id) else {
        return false;
    };
    set_due_date(section, todo_id, Some(new_date))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_section() -> Section {
        let mut section = Section::new("s1".into(), "Work");
        let mut a = Todo::with_text("a".into(), "A".into());
        a.children = vec![Todo::with_text("a1".into(), "A one".into())];
        section.todos = vec![a, Todo::with_text("b".into(), "B".into())];
        section
    }

    #[test]
    fn test_add_todo_at_root() {
        let mut section = sample_section();
        let id = add_todo(&mut section, None).unwrap();
        let added = section.todos.last().unwrap();
        assert_eq!(added.id, id);
        assert!(added.text.is_empty());
        assert!(added.parent_id.is_none());
    }

    #[test]
    fn test_add_todo_as_child() {
        let mut section = sample_section();
        let id = add_todo(&mut section, Some("a1")).unwrap();
        let parent = tree::find_by_id(&section.todos, "a1").unwrap();
        assert_eq!(parent.children[0].id, id);
        assert_eq!(parent.children[0].parent_id.as_deref(), Some("a1"));
    }

    #[test]
    fn test_add_todo_missing_parent_is_noop() {
        let mut section = sample_section();
        assert!(add_todo(&mut section, Some("nope")).is_none());
        assert_eq!(tree::count_todos(&section.todos), 3);
    }

    #[test]
    fn test_commit_edit_stores_text() {
        let mut section = sample_section();
        assert_eq!(commit_edit(&mut section, "b", "B updated"), EditOutcome::Committed);
        assert_eq!(tree::find_by_id(&section.todos, "b").unwrap().text, "B updated");
    }

    #[test]
    fn test_commit_edit_empty_deletes() {
        let mut section = sample_section();
        assert_eq!(commit_edit(&mut section, "b", "   "), EditOutcome::DeletedEmpty);
        assert!(tree::find_by_id(&section.todos, "b").is_none());
    }

    #[test]
    fn test_commit_edit_unknown_id() {
        let mut section = sample_section();
        assert_eq!(commit_edit(&mut section, "nope", "text"), EditOutcome::NotFound);
    }

    #[test]
    fn test_delete_todo_removes_subtree() {
        let mut section = sample_section();
        assert!(delete_todo(&mut section, "a"));
        assert!(tree::find_by_id(&section.todos, "a1").is_none());
        assert_eq!(section.todos.len(), 1);
        assert!(!delete_todo(&mut section, "a"));
    }

    #[test]
    fn test_toggle_completed() {
        let mut section = sample_section();
        assert_eq!(toggle_completed(&mut section, "b"), Some(true));
        assert_eq!(toggle_completed(&mut section, "b"), Some(false));
        assert_eq!(toggle_completed(&mut section, "nope"), None);
    }

    #[test]
    fn test_set_and_clear_due_date() {
        let mut section = sample_section();
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert!(set_due_date(&mut section, "a1", Some(date)));
        assert_eq!(
            tree::find_by_id(&section.todos, "a1").unwrap().due_date,
            Some(date)
        );
        assert!(set_due_date(&mut section, "a1", None));
        assert!(tree::find_by_id(&section.todos, "a1").unwrap().due_date.is_none());
        assert!(!set_due_date(&mut section, "nope", Some(date)));
    }

    #[test]
    fn test_update_due_date_through_board() {
        let mut board = Board {
            sections: vec![sample_section()],
        };
        let date = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
        assert!(update_due_date(&mut board, "s1", "b", date));
        let section = board.section("s1").unwrap();
        assert_eq!(tree::find_by_id(&section.todos, "b").unwrap().due_date, Some(date));
        assert!(!update_due_date(&mut board, "missing", "b", date));
        assert!(!update_due_date(&mut board, "s1", "missing", date));
    }
}
