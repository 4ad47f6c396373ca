//! Use command - send an earlier prompt to the assistant again.
//!
//! The reused text (plus any extra instructions) is recorded as a new
//! prompt before the assistant runs, exactly like a captured one.

use anyhow::{Context, Result};
use std::io::{self, Write};
use std::process::ExitCode;

use super::capture::write_saved;
use super::show::write_not_found;
use pclaude::capture;
use pclaude::config::Config;
use pclaude::storage::{Archive, ArchiveError, PromptId, PromptRecord, RecordSource};

/// Arguments for the use command.
#[derive(clap::Args)]
#[command(after_help = "EXAMPLES:\n    \
    pclaude use 7                         Re-run prompt #7\n    \
    pclaude use 7 \"but write it in Rust\"  Re-run #7 with extra instructions")]
pub struct Args {
    /// Prompt ID, with or without the leading '#'
    #[arg(value_name = "ID")]
    pub id: PromptId,

    /// Additional instructions appended to the prompt
    #[arg(value_name = "EXTRA")]
    pub extra: Option<String>,
}

/// Executes the use command.
///
/// Returns the assistant's exit code, or 1 when the id is unknown.
pub fn run(args: Args, config: &Config) -> Result<ExitCode> {
    let archive = config.archive()?;

    let record = {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        let record = execute(&archive, args.id, args.extra.as_deref(), &mut out)?;
        out.flush()?;
        record
    };

    let Some(record) = record else {
        return Ok(ExitCode::FAILURE);
    };

    let status = capture::forward(config, &[record.prompt])?;
    Ok(capture::exit_code(status))
}

/// Records the reused prompt. Returns `None` if `id` does not exist.
fn execute(
    archive: &Archive,
    id: PromptId,
    extra: Option<&str>,
    out: &mut impl Write,
) -> Result<Option<PromptRecord>> {
    let original = match archive.require(id) {
        Ok(record) => record,
        Err(ArchiveError::NotFound { .. }) => {
            write_not_found(out, archive, id)?;
            return Ok(None);
        }
        Err(err) => return Err(err.into()),
    };

    let prompt = capture::reuse_prompt(&original, extra);
    let record = archive
        .record_prompt(prompt, RecordSource::OneShot)
        .with_context(|| format!("Failed to record reuse of prompt {id}"))?;

    write_saved(out, &record)?;
    Ok(Some(record))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_reuse_records_new_prompt() -> Result<()> {
        colored::control::set_override(false);
        let dir = tempdir()?;
        let archive = Archive::open(dir.path().join("prompts.jsonl"));
        let original = archive.record_prompt("write a parser", RecordSource::OneShot)?;

        let mut out = Vec::new();
        let record = execute(&archive, original.id, Some("in Rust"), &mut out)?
            .expect("original exists");

        assert_eq!(record.id.get(), 2);
        assert_eq!(record.prompt, "write a parser in Rust");
        assert_eq!(record.source, RecordSource::OneShot);
        assert!(String::from_utf8(out)?.starts_with("[SAVED] #2 ("));

        // The original is untouched.
        assert_eq!(archive.get_by_id(original.id)?, Some(original));
        Ok(())
    }

    #[test]
    fn test_reuse_without_extra_copies_prompt() -> Result<()> {
        let dir = tempdir()?;
        let archive = Archive::open(dir.path().join("prompts.jsonl"));
        let original = archive.record_prompt("same again", RecordSource::OneShot)?;

        let mut out = Vec::new();
        let record = execute(&archive, original.id, None, &mut out)?.expect("original exists");

        assert_eq!(record.prompt, "same again");
        assert_eq!(archive.count()?, 2);
        Ok(())
    }

    #[test]
    fn test_reuse_unknown_id_records_nothing() -> Result<()> {
        colored::control::set_override(false);
        let dir = tempdir()?;
        let archive = Archive::open(dir.path().join("prompts.jsonl"));
        archive.record_prompt("only one", RecordSource::OneShot)?;

        let mut out = Vec::new();
        let result = execute(&archive, PromptId::new(42).unwrap(), None, &mut out)?;

        assert!(result.is_none());
        assert!(String::from_utf8(out)?.contains("Prompt #42 not found"));
        assert_eq!(archive.count()?, 1);
        Ok(())
    }
}
