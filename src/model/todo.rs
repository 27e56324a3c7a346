use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single todo. Children nest recursively and live inside their parent,
/// so a subtree detaches as a unit whenever the todo is spliced out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    /// Unique across the whole board (every section, every depth)
    pub id: String,
    /// Display text; empty text marks a provisional todo that is deleted
    /// when its edit session closes without input
    pub text: String,
    pub completed: bool,
    /// Optional due date. Undated todos are positioned at "today" on the
    /// timeline.
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub children: Vec<Todo>,
    /// Advisory only — the authoritative parent relation is positional
    /// (which `children` sequence holds this todo)
    #[serde(default)]
    pub parent_id: Option<String>,
}

impl Todo {
    /// Create a provisional (empty-text) todo.
    pub fn new(id: String, parent_id: Option<String>) -> Self {
        Todo {
            id,
            text: String::new(),
            completed: false,
            due_date: None,
            children: Vec::new(),
            parent_id,
        }
    }

    /// Create a todo with text already set (CLI add path).
    pub fn with_text(id: String, text: String) -> Self {
        Todo {
            text,
            ..Todo::new(id, None)
        }
    }
}
