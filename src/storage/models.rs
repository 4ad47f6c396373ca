//! Core data models for the prompt archive.
//!
//! A [`PromptRecord`] is the only entity the archive knows about. Records
//! are immutable once written and are stored one JSON object per line.

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Numeric identifier of a prompt record.
///
/// Ids start at 1 and are displayed and persisted with a leading `#`
/// (e.g. `#7`). Parsing accepts both `#7` and `7`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PromptId(u64);

impl PromptId {
    /// The id given to the first record of an empty archive.
    pub const FIRST: PromptId = PromptId(1);

    /// Creates an id from its numeric value. Returns `None` for zero.
    pub fn new(value: u64) -> Option<Self> {
        (value > 0).then_some(Self(value))
    }

    /// Returns the numeric value of this id.
    pub fn get(self) -> u64 {
        self.0
    }

    /// Returns the id that follows this one, or `None` at `u64::MAX`.
    pub fn next(self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }
}

impl fmt::Display for PromptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&format!("#{}", self.0))
    }
}

/// Error returned when text cannot be parsed as a [`PromptId`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid prompt id '{0}': expected a positive integer like 7 or #7")]
pub struct InvalidPromptId(pub String);

impl FromStr for PromptId {
    type Err = InvalidPromptId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.trim().strip_prefix('#').unwrap_or(s.trim());
        digits
            .parse::<u64>()
            .ok()
            .and_then(PromptId::new)
            .ok_or_else(|| InvalidPromptId(s.to_string()))
    }
}

impl TryFrom<String> for PromptId {
    type Error = InvalidPromptId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PromptId> for String {
    fn from(id: PromptId) -> Self {
        id.to_string()
    }
}

/// How a record came to be written.
///
/// Only `one-shot` is produced today. Tags written by other tools are
/// kept verbatim so such records survive a read unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RecordSource {
    /// Captured from a single assistant invocation (also used by `use`).
    OneShot,
    /// Any tag this version does not produce.
    Other(String),
}

impl RecordSource {
    /// Returns the tag as persisted in the archive.
    pub fn as_str(&self) -> &str {
        match self {
            RecordSource::OneShot => "one-shot",
            RecordSource::Other(tag) => tag,
        }
    }
}

impl fmt::Display for RecordSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for RecordSource {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "one-shot" => RecordSource::OneShot,
            _ => RecordSource::Other(tag),
        }
    }
}

impl From<RecordSource> for String {
    fn from(source: RecordSource) -> Self {
        source.as_str().to_string()
    }
}

/// One captured prompt.
///
/// Field order matches the on-disk layout:
/// `{"id":"#1","timestamp":"...","prompt":"...","source":"one-shot","session_id":null}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptRecord {
    /// Unique, strictly increasing id.
    pub id: PromptId,

    /// Local wall-clock time the record was created.
    pub timestamp: NaiveDateTime,

    /// The captured text. May be empty.
    pub prompt: String,

    /// How the record was created.
    pub source: RecordSource,

    /// Reserved for multi-turn correlation. Always `None` today, but
    /// always written so the field is present on every line.
    #[serde(default)]
    pub session_id: Option<String>,
}

impl PromptRecord {
    /// Builds a record stamped with the current local time.
    pub fn new(id: PromptId, prompt: impl Into<String>, source: RecordSource) -> Self {
        Self {
            id,
            timestamp: Local::now().naive_local(),
            prompt: prompt.into(),
            source,
            session_id: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_id_display_has_hash_prefix() {
        let id = PromptId::new(7).unwrap();
        assert_eq!(id.to_string(), "#7");
        assert_eq!(format!("{id:<4}|"), "#7  |");
    }

    #[test]
    fn test_prompt_id_parses_with_and_without_hash() {
        assert_eq!("#12".parse::<PromptId>().unwrap().get(), 12);
        assert_eq!("12".parse::<PromptId>().unwrap().get(), 12);
        assert_eq!(" 3 ".parse::<PromptId>().unwrap().get(), 3);
    }

    #[test]
    fn test_prompt_id_rejects_zero_and_garbage() {
        assert!("0".parse::<PromptId>().is_err());
        assert!("#0".parse::<PromptId>().is_err());
        assert!("abc".parse::<PromptId>().is_err());
        assert!("#-1".parse::<PromptId>().is_err());
        assert!("".parse::<PromptId>().is_err());
    }

    #[test]
    fn test_prompt_id_next() {
        assert_eq!(PromptId::FIRST.next().map(PromptId::get), Some(2));
        assert_eq!(PromptId::new(u64::MAX).unwrap().next(), None);
    }

    #[test]
    fn test_record_source_known_and_unknown_tags() {
        assert_eq!(RecordSource::from("one-shot".to_string()), RecordSource::OneShot);
        assert_eq!(
            RecordSource::from("imported".to_string()),
            RecordSource::Other("imported".to_string())
        );
        assert_eq!(RecordSource::Other("imported".to_string()).as_str(), "imported");
    }

    #[test]
    fn test_record_serializes_in_archive_layout() {
        let record = PromptRecord {
            id: PromptId::new(1).unwrap(),
            timestamp: "2026-02-08T10:00:00".parse().unwrap(),
            prompt: "hello world".to_string(),
            source: RecordSource::OneShot,
            session_id: None,
        };

        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(
            json,
            r##"{"id":"#1","timestamp":"2026-02-08T10:00:00","prompt":"hello world","source":"one-shot","session_id":null}"##
        );
    }

    #[test]
    fn test_record_parses_fractional_timestamp() {
        let line = r##"{"id":"#4","timestamp":"2026-02-08T10:00:00.123456","prompt":"x","source":"one-shot","session_id":null}"##;
        let record: PromptRecord = serde_json::from_str(line).unwrap();
        assert_eq!(record.id.get(), 4);
        assert_eq!(record.timestamp.format("%H:%M:%S%.6f").to_string(), "10:00:00.123456");
    }

    #[test]
    fn test_record_missing_required_field_is_rejected() {
        let line = r##"{"id":"#4","timestamp":"2026-02-08T10:00:00","source":"one-shot"}"##;
        assert!(serde_json::from_str::<PromptRecord>(line).is_err());
    }

    #[test]
    fn test_record_escapes_newlines_in_prompt() {
        let record =
            PromptRecord::new(PromptId::FIRST, "line one\nline two", RecordSource::OneShot);
        let json = serde_json::to_string(&record).unwrap();
        assert!(!json.contains('\n'));

        let back: PromptRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}
