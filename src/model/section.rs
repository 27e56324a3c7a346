use serde::{Deserialize, Serialize};

use super::todo::Todo;

/// A named grouping owning an ordered tree of root todos.
/// The title may be empty (sections start untitled).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub todos: Vec<Todo>,
}

impl Section {
    pub fn new(id: String, title: impl Into<String>) -> Self {
        Section {
            id,
            title: title.into(),
            todos: Vec::new(),
        }
    }
}
