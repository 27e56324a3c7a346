//! The persistence gateway: the whole board as one JSON blob.
//!
//! Every mutation is followed by a full save; the blob is replaced
//! atomically, never patched. A failed save is surfaced to the caller and
//! the serialized board is appended to a journal file first, so no edit is
//! silently lost.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::model::board::Board;

pub const BOARD_FILE: &str = "board.json";
pub const JOURNAL_FILE: &str = "journal.md";

/// Error type for store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("could not read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("could not write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not create data directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Resolve the data directory: explicit flag, then `SLATE_DIR`, then
/// `~/.slate`.
pub fn data_dir(flag: Option<&Path>) -> PathBuf {
    if let Some(dir) = flag {
        return dir.to_path_buf();
    }
    if let Ok(dir) = std::env::var("SLATE_DIR") {
        return PathBuf::from(dir);
    }
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    Path::new(&home).join(".slate")
}

pub fn board_path(data_dir: &Path) -> PathBuf {
    data_dir.join(BOARD_FILE)
}

/// Load the board blob. A missing file yields the default board (one empty
/// section with the given title); malformed JSON is an error.
pub fn load(data_dir: &Path, default_section_title: &str) -> Result<Board, StoreError> {
    let path = board_path(data_dir);
    if !path.exists() {
        return Ok(Board::seeded(default_section_title));
    }
    let content = fs::read_to_string(&path).map_err(|e| StoreError::Read {
        path: path.clone(),
        source: e,
    })?;
    serde_json::from_str(&content).map_err(|e| StoreError::Parse { path, source: e })
}

/// Serialize the entire board and replace the stored blob atomically.
pub fn save(data_dir: &Path, board: &Board) -> Result<(), StoreError> {
    fs::create_dir_all(data_dir).map_err(|e| StoreError::CreateDir {
        path: data_dir.to_path_buf(),
        source: e,
    })?;
    let content = serialize_board(board);
    let path = board_path(data_dir);
    if let Err(e) = atomic_write(&path, content.as_bytes()) {
        journal_failed_save(data_dir, &content, &e);
        return Err(StoreError::Write { path, source: e });
    }
    Ok(())
}

/// The canonical blob form: pretty JSON with a trailing newline. Stable
/// across load/save round-trips with no intervening mutation.
pub fn serialize_board(board: &Board) -> String {
    let mut content = serde_json::to_string_pretty(board).unwrap_or_else(|_| "{}".to_string());
    content.push('\n');
    content
}

/// Write via a temp file in the same directory, then rename over the
/// target, so readers never observe a partial blob.
fn atomic_write(path: &Path, content: &[u8]) -> std::io::Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Append the unsaved blob to the journal so the in-memory state can be
/// recovered by hand after a failed save.
fn journal_failed_save(data_dir: &Path, content: &str, err: &std::io::Error) {
    let mut entry = String::new();
    entry.push_str(&format!(
        "## {} — save failed: {}\n\n",
        chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
        err,
    ));
    entry.push_str("```json\n");
    entry.push_str(content);
    entry.push_str("```\n\n");

    let path = data_dir.join(JOURNAL_FILE);
    let _ = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .and_then(|mut f| f.write_all(entry.as_bytes()));
}
