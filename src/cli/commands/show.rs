//! Show command - display one prompt in full.

use anyhow::Result;
use colored::Colorize;
use std::io::{self, Write};
use std::process::ExitCode;

use crate::cli::format::format_timestamp;
use crate::cli::OutputFormat;
use pclaude::config::Config;
use pclaude::storage::{Archive, ArchiveError, PromptId, PromptRecord};

/// Arguments for the show command.
#[derive(clap::Args)]
#[command(after_help = "EXAMPLES:\n    \
    pclaude show 7             Show prompt #7\n    \
    pclaude show '#7'          Same, with the hash\n    \
    pclaude show 7 -f json     Output as JSON")]
pub struct Args {
    /// Prompt ID, with or without the leading '#'
    #[arg(value_name = "ID")]
    pub id: PromptId,

    /// Output format: text (default), json
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

/// Executes the show command.
///
/// Exits with status 1 when the id is unknown.
pub fn run(args: Args, config: &Config) -> Result<ExitCode> {
    let archive = config.archive()?;
    let found = execute(&archive, args.id, args.format, &mut io::stdout().lock())?;
    Ok(if found { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

fn execute(
    archive: &Archive,
    id: PromptId,
    format: OutputFormat,
    out: &mut impl Write,
) -> Result<bool> {
    let record = match archive.require(id) {
        Ok(record) => record,
        Err(ArchiveError::NotFound { .. }) => {
            write_not_found(out, archive, id)?;
            return Ok(false);
        }
        Err(err) => return Err(err.into()),
    };

    match format {
        OutputFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(&record)?)?,
        OutputFormat::Text => write_record(out, &record)?,
    }

    Ok(true)
}

fn write_record(out: &mut impl Write, record: &PromptRecord) -> io::Result<()> {
    writeln!(
        out,
        "{}  {}",
        record.id.to_string().cyan(),
        format_timestamp(&record.timestamp)
    )?;
    writeln!(out)?;
    writeln!(out, "{}", record.prompt)
}

/// Reports an unknown id, with a hint when the archive is empty.
///
/// Shared with the use command.
pub fn write_not_found(out: &mut impl Write, archive: &Archive, id: PromptId) -> Result<()> {
    writeln!(out, "{}", format!("Prompt {id} not found").red())?;
    if archive.count()? == 0 {
        writeln!(out, "{}", "No prompts saved yet.".dimmed())?;
    } else {
        writeln!(out, "{}", "Run 'pclaude ls' to list saved prompts.".dimmed())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pclaude::storage::RecordSource;
    use tempfile::tempdir;

    fn id(n: u64) -> PromptId {
        PromptId::new(n).unwrap()
    }

    #[test]
    fn test_show_full_prompt() -> Result<()> {
        colored::control::set_override(false);
        let dir = tempdir()?;
        let archive = Archive::open(dir.path().join("prompts.jsonl"));
        archive.record_prompt("a", RecordSource::OneShot)?;
        archive.record_prompt("line one\nline two", RecordSource::OneShot)?;

        let mut out = Vec::new();
        let found = execute(&archive, id(2), OutputFormat::Text, &mut out)?;
        let text = String::from_utf8(out)?;

        assert!(found);
        assert!(text.starts_with("#2  "));
        assert!(text.ends_with("\nline one\nline two\n"));
        Ok(())
    }

    #[test]
    fn test_show_missing_id_on_empty_archive() -> Result<()> {
        colored::control::set_override(false);
        let dir = tempdir()?;
        let archive = Archive::open(dir.path().join("prompts.jsonl"));

        let mut out = Vec::new();
        let found = execute(&archive, id(5), OutputFormat::Text, &mut out)?;
        let text = String::from_utf8(out)?;

        assert!(!found);
        assert!(text.contains("Prompt #5 not found"));
        assert!(text.contains("No prompts saved yet."));
        Ok(())
    }

    #[test]
    fn test_show_missing_id_with_records() -> Result<()> {
        colored::control::set_override(false);
        let dir = tempdir()?;
        let archive = Archive::open(dir.path().join("prompts.jsonl"));
        archive.record_prompt("a", RecordSource::OneShot)?;

        let mut out = Vec::new();
        let found = execute(&archive, id(9), OutputFormat::Text, &mut out)?;
        let text = String::from_utf8(out)?;

        assert!(!found);
        assert!(text.contains("Prompt #9 not found"));
        assert!(text.contains("pclaude ls"));
        Ok(())
    }

    #[test]
    fn test_show_corrupt_archive_is_error_not_missing() -> Result<()> {
        let dir = tempdir()?;
        let archive = Archive::open(dir.path().join("prompts.jsonl"));
        std::fs::write(archive.path(), "not a record\n")?;

        let mut out = Vec::new();
        let err = execute(&archive, id(1), OutputFormat::Text, &mut out).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<ArchiveError>(),
            Some(ArchiveError::MalformedRecord { line: 1, .. })
        ));
        assert!(out.is_empty());
        Ok(())
    }

    #[test]
    fn test_show_json() -> Result<()> {
        let dir = tempdir()?;
        let archive = Archive::open(dir.path().join("prompts.jsonl"));
        let saved = archive.record_prompt("hello", RecordSource::OneShot)?;

        let mut out = Vec::new();
        execute(&archive, saved.id, OutputFormat::Json, &mut out)?;

        let parsed: PromptRecord = serde_json::from_slice(&out)?;
        assert_eq!(parsed, saved);
        Ok(())
    }
}
