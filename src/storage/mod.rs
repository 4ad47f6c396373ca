//! Storage layer for the prompt archive.
//!
//! The archive is an append-only JSON Lines file. Every record is one
//! self-contained line; the last line decides the next id.

pub mod archive;
pub mod lock;
pub mod models;

use std::env;
use std::path::PathBuf;

pub use archive::{Archive, MalformedPolicy};
pub use models::*;

/// Environment variable that relocates the archive directory.
pub const ARCHIVE_DIR_ENV: &str = "PROMPT_ARCHIVE_DIR";

/// File name of the archive inside the archive directory.
pub const ARCHIVE_FILE_NAME: &str = "prompts.jsonl";

/// Errors raised by archive operations.
///
/// Every variant names the archive path so the user can find a corrupted
/// or inaccessible file.
#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    /// The archive exists but could not be opened or read.
    #[error("Failed to read prompt archive {path}: {source}")]
    StoreUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A line does not hold a valid prompt record.
    #[error("Malformed record at {path}:{line}: {reason}")]
    MalformedRecord {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    /// No record carries the requested id.
    #[error("Prompt {id} not found")]
    NotFound { id: PromptId },

    /// The archive directory could not be created before an append.
    #[error("Failed to create archive directory {path}: {source}")]
    DirectoryCreateFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The record could not be written to the archive.
    #[error("Failed to append to prompt archive {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The archive lock could not be taken.
    #[error("Failed to lock prompt archive {path}: {source}")]
    LockFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The record could not be encoded as JSON.
    #[error("Failed to encode prompt record: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Returns the directory holding the archive and its config file.
///
/// `$PROMPT_ARCHIVE_DIR` wins when set and non-empty, otherwise
/// `~/.prompt-archive`. Nothing is created.
pub fn archive_dir() -> anyhow::Result<PathBuf> {
    if let Some(dir) = env::var_os(ARCHIVE_DIR_ENV).filter(|d| !d.is_empty()) {
        return Ok(PathBuf::from(dir));
    }

    let home = dirs::home_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not find home directory"))?;
    Ok(home.join(".prompt-archive"))
}

/// Get the default archive path.
///
/// Deterministic and free of side effects; the file is not created.
pub fn default_archive_path() -> anyhow::Result<PathBuf> {
    let path = archive_dir()?.join(ARCHIVE_FILE_NAME);
    tracing::debug!("Resolved prompt archive path: {}", path.display());
    Ok(path)
}
