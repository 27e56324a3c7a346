use serde::{Deserialize, Serialize};

use super::ident::new_id;
use super::section::Section;

/// The entire persisted state: an ordered sequence of sections, each owning
/// one todo tree. Loaded once at startup and held as a single mutable value
/// for the lifetime of the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Board {
    #[serde(default)]
    pub sections: Vec<Section>,
}

impl Board {
    /// The board seeded on first run: one empty section with the
    /// configured default title.
    pub fn seeded(default_title: &str) -> Self {
        Board {
            sections: vec![Section::new(new_id(), default_title)],
        }
    }

    pub fn section(&self, id: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == id)
    }

    pub fn section_mut(&mut self, id: &str) -> Option<&mut Section> {
        self.sections.iter_mut().find(|s| s.id == id)
    }
}
