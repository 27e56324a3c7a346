//! Pure structural operations over a section's todo tree.
//!
//! All functions operate on a root sequence (`Vec<Todo>`), searching
//! depth-first across every nesting level. Ids are unique across the board,
//! so first-match is well-defined.

use crate::model::todo::Todo;

/// Promoting the first sibling has no preceding sibling to become the
/// parent — a user-facing precondition failure, not a silent no-op.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ReorderError {
    #[error("there is no task above this one")]
    NoPreviousSibling,
}

/// Enough context to splice a todo out of or into its current position.
pub struct TodoInfo<'a> {
    /// The sequence (root or some todo's children) that holds the todo
    pub seq: &'a mut Vec<Todo>,
    /// Id of the parent todo, None at root level
    pub parent_id: Option<String>,
    /// Index of the todo within `seq`
    pub index: usize,
}

/// Position of a todo without holding a borrow: which parent's sequence it
/// sits in and at what index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoPosition {
    pub parent_id: Option<String>,
    pub index: usize,
}

/// Depth-first search across all levels; first match.
pub fn find_by_id<'a>(todos: &'a [Todo], id: &str) -> Option<&'a Todo> {
    for todo in todos {
        if todo.id == id {
            return Some(todo);
        }
        if let Some(found) = find_by_id(&todo.children, id) {
            return Some(found);
        }
    }
    None
}

/// Mutable variant of [`find_by_id`].
pub fn find_by_id_mut<'a>(todos: &'a mut [Todo], id: &str) -> Option<&'a mut Todo> {
    for todo in todos.iter_mut() {
        if todo.id == id {
            return Some(todo);
        }
        if let Some(found) = find_by_id_mut(&mut todo.children, id) {
            return Some(found);
        }
    }
    None
}

/// Find a todo together with its containing sequence, parent id, and index,
/// so the caller can splice it out of (or relative to) its current position.
pub fn find_info<'a>(todos: &'a mut Vec<Todo>, id: &str) -> Option<TodoInfo<'a>> {
    find_info_inner(todos, id, None)
}

fn find_info_inner<'a>(
    todos: &'a mut Vec<Todo>,
    id: &str,
    parent_id: Option<&str>,
) -> Option<TodoInfo<'a>> {
    if let Some(index) = todos.iter().position(|t| t.id == id) {
        return Some(TodoInfo {
            seq: todos,
            parent_id: parent_id.map(str::to_string),
            index,
        });
    }
    for todo in todos.iter_mut() {
        let tid = todo.id.clone();
        if let Some(info) = find_info_inner(&mut todo.children, id, Some(&tid)) {
            return Some(info);
        }
    }
    None
}

/// Borrow-free variant of [`find_info`]: where the todo sits, as data.
pub fn position_of(todos: &[Todo], id: &str) -> Option<TodoPosition> {
    position_of_inner(todos, id, None)
}

fn position_of_inner(todos: &[Todo], id: &str, parent_id: Option<&str>) -> Option<TodoPosition> {
    if let Some(index) = todos.iter().position(|t| t.id == id) {
        return Some(TodoPosition {
            parent_id: parent_id.map(str::to_string),
            index,
        });
    }
    for todo in todos {
        if let Some(pos) = position_of_inner(&todo.children, id, Some(&todo.id)) {
            return Some(pos);
        }
    }
    None
}

/// Depth-first search-and-splice. The whole subtree detaches as a unit
/// (children live inside the todo). Returns the detached todo, or None if
/// the id resolves nowhere.
pub fn remove_by_id(todos: &mut Vec<Todo>, id: &str) -> Option<Todo> {
    if let Some(index) = todos.iter().position(|t| t.id == id) {
        return Some(todos.remove(index));
    }
    for todo in todos.iter_mut() {
        if let Some(removed) = remove_by_id(&mut todo.children, id) {
            return Some(removed);
        }
    }
    None
}

/// Append a todo at the root level of the sequence.
pub fn insert_root(todos: &mut Vec<Todo>, mut todo: Todo) {
    todo.parent_id = None;
    todos.push(todo);
}

/// Append a todo to the children of `parent_id`. When the parent does not
/// resolve this is a no-op and the todo is handed back unchanged.
pub fn insert_as_child(todos: &mut [Todo], parent_id: &str, mut todo: Todo) -> Result<(), Todo> {
    match find_by_id_mut(todos, parent_id) {
        Some(parent) => {
            todo.parent_id = Some(parent.id.clone());
            parent.children.push(todo);
            Ok(())
        }
        None => Err(todo),
    }
}

/// True if `candidate_id` names `ancestor` itself or any todo reachable by
/// descending `children`. Used to forbid dropping a todo into its own
/// subtree, which would make it its own container.
pub fn is_descendant(ancestor: &Todo, candidate_id: &str) -> bool {
    if ancestor.id == candidate_id {
        return true;
    }
    ancestor
        .children
        .iter()
        .any(|child| is_descendant(child, candidate_id))
}

/// Detach the todo and append it to the children of its immediately
/// preceding sibling. Unknown ids are a no-op; a todo that is first in its
/// sequence has no previous sibling and the operation fails.
pub fn promote_to_child_of_previous(todos: &mut Vec<Todo>, id: &str) -> Result<(), ReorderError> {
    let Some(info) = find_info(todos, id) else {
        return Ok(());
    };
    if info.index == 0 {
        return Err(ReorderError::NoPreviousSibling);
    }
    let mut todo = info.seq.remove(info.index);
    let previous = &mut info.seq[info.index - 1];
    todo.parent_id = Some(previous.id.clone());
    previous.children.push(todo);
    Ok(())
}

/// Visit every todo in the sequence, parents before children.
pub fn for_each_todo(todos: &[Todo], f: &mut dyn FnMut(&Todo)) {
    for todo in todos {
        f(todo);
        for_each_todo(&todo.children, f);
    }
}

/// Total number of todos in the sequence, all levels included.
pub fn count_todos(todos: &[Todo]) -> usize {
    let mut count = 0;
    for_each_todo(todos, &mut |_| count += 1);
    count
}

#[cfg(test)]
mod tests {
    use super::*;

    /// a, b(b1, b2(b2x)), c
    fn sample_tree() -> Vec<Todo> {
        let mut b2 = Todo::with_text("b2".into(), "B two".into());
        b2.children = vec![Todo::with_text("b2x".into(), "B two x".into())];
        let mut b = Todo::with_text("b".into(), "B".into());
        b.children = vec![Todo::with_text("b1".into(), "B one".into()), b2];
        vec![
            Todo::with_text("a".into(), "A".into()),
            b,
            Todo::with_text("c".into(), "C".into()),
        ]
    }

    #[test]
    fn test_find_by_id_all_levels() {
        let todos = sample_tree();
        assert_eq!(find_by_id(&todos, "a").unwrap().text, "A");
        assert_eq!(find_by_id(&todos, "b2x").unwrap().text, "B two x");
        assert!(find_by_id(&todos, "nope").is_none());
    }

    #[test]
    fn test_find_info_reports_context() {
        let mut todos = sample_tree();

        let info = find_info(&mut todos, "c").unwrap();
        assert_eq!(info.parent_id, None);
        assert_eq!(info.index, 2);

        let info = find_info(&mut todos, "b2x").unwrap();
        assert_eq!(info.parent_id.as_deref(), Some("b2"));
        assert_eq!(info.index, 0);
        assert_eq!(info.seq.len(), 1);

        assert!(find_info(&mut todos, "nope").is_none());
    }

    #[test]
    fn test_position_of_matches_find_info() {
        let todos = sample_tree();
        let pos = position_of(&todos, "b1").unwrap();
        assert_eq!(pos.parent_id.as_deref(), Some("b"));
        assert_eq!(pos.index, 0);
    }

    #[test]
    fn test_remove_by_id_detaches_subtree() {
        let mut todos = sample_tree();
        let removed = remove_by_id(&mut todos, "b").unwrap();
        assert_eq!(removed.children.len(), 2);
        assert_eq!(todos.len(), 2);
        // the whole subtree is gone from the sequence
        assert!(find_by_id(&todos, "b1").is_none());
        assert!(find_by_id(&todos, "b2x").is_none());
    }

    #[test]
    fn test_remove_by_id_nested() {
        let mut todos = sample_tree();
        assert!(remove_by_id(&mut todos, "b2x").is_some());
        assert!(find_by_id(&todos, "b2x").is_none());
        // siblings and ancestors untouched
        assert!(find_by_id(&todos, "b2").is_some());
        assert_eq!(count_todos(&todos), 5);
    }

    #[test]
    fn test_remove_then_find_is_none() {
        let mut todos = sample_tree();
        assert!(remove_by_id(&mut todos, "b1").is_some());
        assert!(find_by_id(&todos, "b1").is_none());
        assert!(remove_by_id(&mut todos, "b1").is_none());
    }

    #[test]
    fn test_insert_root_clears_parent_ref() {
        let mut todos = sample_tree();
        let mut todo = Todo::with_text("d".into(), "D".into());
        todo.parent_id = Some("stale".into());
        insert_root(&mut todos, todo);
        assert_eq!(todos.last().unwrap().id, "d");
        assert!(todos.last().unwrap().parent_id.is_none());
    }

    #[test]
    fn test_insert_as_child() {
        let mut todos = sample_tree();
        let todo = Todo::with_text("b3".into(), "B three".into());
        assert!(insert_as_child(&mut todos, "b", todo).is_ok());
        let b = find_by_id(&todos, "b").unwrap();
        assert_eq!(b.children.last().unwrap().id, "b3");
        assert_eq!(b.children.last().unwrap().parent_id.as_deref(), Some("b"));
    }

    #[test]
    fn test_insert_as_child_missing_parent_returns_todo() {
        let mut todos = sample_tree();
        let todo = Todo::with_text("d".into(), "D".into());
        let result = insert_as_child(&mut todos, "nope", todo);
        assert_eq!(result.unwrap_err().id, "d");
        assert_eq!(count_todos(&todos), 6);
    }

    #[test]
    fn test_is_descendant_reflexive() {
        let todos = sample_tree();
        let b = find_by_id(&todos, "b").unwrap();
        assert!(is_descendant(b, "b"));
    }

    #[test]
    fn test_is_descendant_transitive() {
        let todos = sample_tree();
        let b = find_by_id(&todos, "b").unwrap();
        assert!(is_descendant(b, "b1"));
        assert!(is_descendant(b, "b2x"));
    }

    #[test]
    fn test_is_descendant_unrelated() {
        let todos = sample_tree();
        let b = find_by_id(&todos, "b").unwrap();
        assert!(!is_descendant(b, "a"));
        assert!(!is_descendant(b, "c"));
        assert!(!is_descendant(b, "nope"));
    }

    #[test]
    fn test_promote_appends_to_previous_sibling() {
        let mut todos = sample_tree();
        promote_to_child_of_previous(&mut todos, "c").unwrap();
        assert_eq!(todos.len(), 2);
        let b = find_by_id(&todos, "b").unwrap();
        assert_eq!(b.children.last().unwrap().id, "c");
        assert_eq!(b.children.last().unwrap().parent_id.as_deref(), Some("b"));
    }

    #[test]
    fn test_promote_nested_level() {
        let mut todos = sample_tree();
        promote_to_child_of_previous(&mut todos, "b2").unwrap();
        let b1 = find_by_id(&todos, "b1").unwrap();
        assert_eq!(b1.children.len(), 1);
        assert_eq!(b1.children[0].id, "b2");
        // b2's own child moved with it
        assert_eq!(b1.children[0].children[0].id, "b2x");
    }

    #[test]
    fn test_promote_first_sibling_fails_unchanged() {
        let mut todos = sample_tree();
        let before = todos.clone();
        let result = promote_to_child_of_previous(&mut todos, "a");
        assert_eq!(result, Err(ReorderError::NoPreviousSibling));
        assert_eq!(todos, before);
    }

    #[test]
    fn test_promote_unknown_id_is_noop() {
        let mut todos = sample_tree();
        let before = todos.clone();
        assert!(promote_to_child_of_previous(&mut todos, "nope").is_ok());
        assert_eq!(todos, before);
    }

    #[test]
    fn test_count_todos() {
        assert_eq!(count_todos(&sample_tree()), 6);
        assert_eq!(count_todos(&[]), 0);
    }
}
