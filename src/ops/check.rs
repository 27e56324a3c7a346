//! Structural integrity validation for a board.

use indexmap::IndexMap;
use serde::Serialize;

use crate::model::board::Board;
use crate::model::todo::Todo;

/// Structured result from `slate check`, suitable for --json output.
#[derive(Debug, Default, Serialize)]
pub struct CheckResult {
    pub valid: bool,
    pub errors: Vec<CheckError>,
    pub warnings: Vec<CheckWarning>,
}

/// A validation error (the board is structurally unsound).
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum CheckError {
    /// The same todo id appears more than once across the board
    #[serde(rename = "duplicate_id")]
    DuplicateId {
        todo_id: String,
        section_ids: Vec<String>,
    },
}

/// A validation warning (advisory metadata out of step with the tree).
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum CheckWarning {
    /// `parentId` disagrees with the positional parent
    #[serde(rename = "stale_parent_ref")]
    StaleParentRef {
        todo_id: String,
        recorded: Option<String>,
        actual: Option<String>,
    },
    /// A provisional (empty-text) todo made it to disk
    #[serde(rename = "empty_text")]
    EmptyText {
        todo_id: String,
        section_id: String,
    },
}

/// Validate a board and return structured results. Read-only.
///
/// Checks performed:
/// 1. Todo ids are unique across every section and depth
/// 2. `parentId` metadata matches the positional parent
/// 3. No persisted todo has empty text
pub fn check_board(board: &Board) -> CheckResult {
    let mut result = CheckResult::default();

    // id → sections it was seen in, insertion-ordered so report order
    // follows board order
    let mut seen: IndexMap<String, Vec<String>> = IndexMap::new();
    for section in &board.sections {
        collect_ids(&section.todos, &section.id, &mut seen);
    }
    for (todo_id, section_ids) in &seen {
        if section_ids.len() > 1 {
            result.errors.push(CheckError::DuplicateId {
                todo_id: todo_id.clone(),
                section_ids: section_ids.clone(),
            });
        }
    }

    for section in &board.sections {
        check_todos(&section.todos, &section.id, None, &mut result);
    }

    result.valid = result.errors.is_empty();
    result
}

fn collect_ids(todos: &[Todo], section_id: &str, seen: &mut IndexMap<String, Vec<String>>) {
    for todo in todos {
        seen.entry(todo.id.clone())
            .or_default()
            .push(section_id.to_string());
        collect_ids(&todo.children, section_id, seen);
    }
}

fn check_todos(
    todos: &[Todo],
    section_id: &str,
    parent_id: Option<&str>,
    result: &mut CheckResult,
) {
    for todo in todos {
        if todo.parent_id.as_deref() != parent_id {
            result.warnings.push(CheckWarning::StaleParentRef {
                todo_id: todo.id.clone(),
                recorded: todo.parent_id.clone(),
                actual: parent_id.map(str::to_string),
            });
        }
        if todo.text.trim().is_empty() {
            result.warnings.push(CheckWarning::EmptyText {
                todo_id: todo.id.clone(),
                section_id: section_id.to_string(),
            });
        }
        check_todos(&todo.children, section_id, Some(&todo.id), result);
    }
}
