use std::fs;
use std::path::{Path, PathBuf};

use crate::model::config::BoardConfig;

pub const CONFIG_FILE: &str = "config.toml";

/// Error type for config I/O
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse config.toml: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Load config.toml from the data directory. A missing file is the default
/// config; a malformed file is an error the caller should surface.
pub fn load_config(data_dir: &Path) -> Result<BoardConfig, ConfigError> {
    let path = data_dir.join(CONFIG_FILE);
    if !path.exists() {
        return Ok(BoardConfig::default());
    }
    let content = fs::read_to_string(&path).map_err(|e| ConfigError::Read {
        path: path.clone(),
        source: e,
    })?;
    Ok(toml::from_str(&content)?)
}
