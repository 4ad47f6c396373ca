//! JSON Lines archive of prompt records.
//!
//! All queries are full scans over the file; no index is kept. That is
//! fine for a personal log of thousands of prompts, and it means the file
//! stays the single source of truth: the next id is always derived from
//! its last line.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::lock;
use super::models::{PromptId, PromptRecord, RecordSource};
use super::{default_archive_path, ArchiveError};

/// What a read does when it meets a line that is not a valid record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MalformedPolicy {
    /// Fail the whole read with [`ArchiveError::MalformedRecord`].
    #[default]
    Abort,
    /// Log a warning and continue with the remaining lines.
    Skip,
}

impl FromStr for MalformedPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "abort" => Ok(MalformedPolicy::Abort),
            "skip" => Ok(MalformedPolicy::Skip),
            other => Err(format!(
                "unknown malformed-record policy '{other}' (expected 'abort' or 'skip')"
            )),
        }
    }
}

impl std::fmt::Display for MalformedPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MalformedPolicy::Abort => write!(f, "abort"),
            MalformedPolicy::Skip => write!(f, "skip"),
        }
    }
}

/// Handle to an archive file.
///
/// Holds only the resolved path and the read policy; every operation goes
/// back to the file.
#[derive(Debug, Clone)]
pub struct Archive {
    path: PathBuf,
    policy: MalformedPolicy,
}

impl Archive {
    /// Opens an archive at `path`. The file does not need to exist.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            policy: MalformedPolicy::default(),
        }
    }

    /// Opens the archive at the default location.
    pub fn open_default() -> anyhow::Result<Self> {
        Ok(Self::open(default_archive_path()?))
    }

    /// Sets how reads treat malformed lines.
    pub fn with_policy(mut self, policy: MalformedPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Path of the archive file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    // ==================== Writes ====================

    /// Returns the id the next appended record should carry.
    ///
    /// 1 for a missing or empty archive, otherwise the last record's id
    /// plus one. A malformed last line is always an error, whatever the
    /// read policy, because guessing here could reuse an id.
    pub fn next_id(&self) -> Result<PromptId, ArchiveError> {
        let Some(contents) = self.read_contents()? else {
            return Ok(PromptId::FIRST);
        };

        let Some((line_number, line)) = numbered_lines(&contents).last() else {
            return Ok(PromptId::FIRST);
        };

        let last = self.parse_line(line_number, line)?;
        last.id.next().ok_or_else(|| ArchiveError::MalformedRecord {
            path: self.path.clone(),
            line: line_number,
            reason: format!("id overflow: no id follows {}", last.id),
        })
    }

    /// Appends `record` as one line at the end of the archive.
    ///
    /// Creates the parent directory if needed. The file is opened in
    /// append mode and synced before returning, so existing lines are
    /// never rewritten and the record is on disk once this returns.
    pub fn append(&self, record: &PromptRecord) -> Result<(), ArchiveError> {
        self.ensure_parent_dir()?;

        let mut line = serde_json::to_string(record)?;
        line.push('\n');

        let write_failed = |source| ArchiveError::WriteFailed {
            path: self.path.clone(),
            source,
        };

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(write_failed)?;
        file.write_all(line.as_bytes()).map_err(write_failed)?;
        file.sync_data().map_err(write_failed)?;

        tracing::debug!("Appended prompt {} to {}", record.id, self.path.display());
        Ok(())
    }

    /// Records a new prompt with the next free id.
    ///
    /// Holds the archive lock from reading the last id until the line is
    /// written, so concurrent captures never share an id.
    pub fn record_prompt(
        &self,
        prompt: impl Into<String>,
        source: RecordSource,
    ) -> Result<PromptRecord, ArchiveError> {
        self.ensure_parent_dir()?;
        let _lock = lock::acquire(&self.path)?;

        let id = self.next_id()?;
        let record = PromptRecord::new(id, prompt, source);
        self.append(&record)?;

        Ok(record)
    }

    // ==================== Reads ====================

    /// Reads every record in file order.
    ///
    /// A missing archive reads as empty. Blank lines are ignored.
    pub fn read_all(&self) -> Result<Vec<PromptRecord>, ArchiveError> {
        let Some(contents) = self.read_contents()? else {
            return Ok(Vec::new());
        };

        let mut records = Vec::new();
        for (line_number, line) in numbered_lines(&contents) {
            match self.parse_line(line_number, line) {
                Ok(record) => records.push(record),
                Err(err) if self.policy == MalformedPolicy::Skip => {
                    tracing::warn!("Skipping {err}");
                }
                Err(err) => return Err(err),
            }
        }

        Ok(records)
    }

    /// Number of records in the archive.
    pub fn count(&self) -> Result<usize, ArchiveError> {
        Ok(self.read_all()?.len())
    }

    /// Case-insensitive substring search over prompt text, in file order.
    pub fn search(&self, keyword: &str) -> Result<Vec<PromptRecord>, ArchiveError> {
        let keyword = keyword.to_lowercase();
        Ok(self
            .read_all()?
            .into_iter()
            .filter(|record| record.prompt.to_lowercase().contains(&keyword))
            .collect())
    }

    /// Finds the record with the given id.
    pub fn get_by_id(&self, id: PromptId) -> Result<Option<PromptRecord>, ArchiveError> {
        Ok(self.read_all()?.into_iter().find(|record| record.id == id))
    }

    /// Like [`Archive::get_by_id`], but a missing record is an error.
    pub fn require(&self, id: PromptId) -> Result<PromptRecord, ArchiveError> {
        self.get_by_id(id)?.ok_or(ArchiveError::NotFound { id })
    }

    /// Returns the last `limit` records, oldest first.
    pub fn get_recent(&self, limit: usize) -> Result<Vec<PromptRecord>, ArchiveError> {
        let mut records = self.read_all()?;
        let start = records.len().saturating_sub(limit);
        Ok(records.split_off(start))
    }

    // ==================== Helpers ====================

    /// Reads the raw bytes of the file, or `None` if it does not exist.
    ///
    /// Decoding happens per line so one bad line cannot hide the rest.
    fn read_contents(&self) -> Result<Option<Vec<u8>>, ArchiveError> {
        match fs::read(&self.path) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(ArchiveError::StoreUnreadable {
                path: self.path.clone(),
                source,
            }),
        }
    }

    fn parse_line(&self, line_number: usize, line: &[u8]) -> Result<PromptRecord, ArchiveError> {
        let malformed = |reason: String| ArchiveError::MalformedRecord {
            path: self.path.clone(),
            line: line_number,
            reason,
        };

        let text =
            std::str::from_utf8(line).map_err(|e| malformed(format!("invalid UTF-8: {e}")))?;
        serde_json::from_str(text).map_err(|e| malformed(e.to_string()))
    }

    fn ensure_parent_dir(&self) -> Result<(), ArchiveError> {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => {
                fs::create_dir_all(parent).map_err(|source| ArchiveError::DirectoryCreateFailed {
                    path: parent.to_path_buf(),
                    source,
                })
            }
            _ => Ok(()),
        }
    }
}

/// Splits raw archive contents into `(1-based line number, line)` pairs,
/// dropping blank lines and a trailing `\r`.
fn numbered_lines(contents: &[u8]) -> impl Iterator<Item = (usize, &[u8])> {
    contents
        .split(|b| *b == b'\n')
        .enumerate()
        .map(|(index, line)| (index + 1, line.strip_suffix(b"\r").unwrap_or(line)))
        .filter(|(_, line)| !is_blank(line))
}

fn is_blank(line: &[u8]) -> bool {
    std::str::from_utf8(line).is_ok_and(|text| text.trim().is_empty())
}
