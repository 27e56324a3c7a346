use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Configuration from config.toml in the data directory.
/// Every field has a default; a missing file means a default config.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BoardConfig {
    #[serde(default)]
    pub board: BoardSettings,
    #[serde(default)]
    pub timeline: TimelineSettings,
    #[serde(default)]
    pub ui: UiSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardSettings {
    /// Title given to the section seeded on first run
    #[serde(default = "default_section_title")]
    pub default_section_title: String,
}

impl Default for BoardSettings {
    fn default() -> Self {
        BoardSettings {
            default_section_title: default_section_title(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineSettings {
    /// Days shown past the latest due date on the timeline axis
    #[serde(default = "default_horizon_days")]
    pub horizon_days: u64,
}

impl Default for TimelineSettings {
    fn default() -> Self {
        TimelineSettings {
            horizon_days: default_horizon_days(),
        }
    }
}

fn default_section_title() -> String {
    "Personal".to_string()
}

fn default_horizon_days() -> u64 {
    7
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UiSettings {
    /// Hex color overrides, e.g. `background = "#0C001B"`
    #[serde(default)]
    pub colors: HashMap<String, String>,
    /// Show key hints in the status row
    #[serde(default)]
    pub show_key_hints: bool,
}
