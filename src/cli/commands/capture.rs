//! Proxy mode - record the prompt, then run the assistant.
//!
//! Any invocation that is not a pclaude subcommand lands here. The
//! arguments are archived first and then handed to the assistant exactly
//! as they were given.

use anyhow::{Context, Result};
use colored::Colorize;
use std::ffi::OsString;
use std::io::{self, Write};
use std::process::ExitCode;

use crate::cli::format::format_timestamp;
use pclaude::capture;
use pclaude::config::Config;
use pclaude::storage::{Archive, PromptRecord};

/// Flag that suppresses the save confirmation. It is still forwarded.
const QUIET_FLAG: &str = "--quiet";

/// Captures the prompt in `args` and forwards `args` to the assistant.
///
/// Returns the assistant's exit code. If the prompt cannot be saved the
/// assistant is not started. `args` reach the assistant byte for byte.
pub fn run(args: Vec<OsString>, config: &Config) -> Result<ExitCode> {
    let archive = config.archive()?;

    {
        let text = capture::lossy_args(&args);
        let stdout = io::stdout();
        let mut out = stdout.lock();
        let quiet = config.quiet || text.iter().any(|a| a == QUIET_FLAG);
        execute(&archive, &text, quiet, &mut out)?;
        out.flush()?;
    }

    let status = capture::forward(config, &args)?;
    Ok(capture::exit_code(status))
}

/// Saves the prompt and writes the confirmation to `out`.
fn execute(
    archive: &Archive,
    args: &[String],
    quiet: bool,
    out: &mut impl Write,
) -> Result<PromptRecord> {
    let record = capture::capture(archive, args).with_context(|| {
        format!(
            "Prompt was not saved to {}; not forwarding",
            archive.path().display()
        )
    })?;

    if !quiet {
        write_saved(out, &record)?;
    }

    Ok(record)
}

/// Writes the `[SAVED]` confirmation for a freshly recorded prompt.
pub fn write_saved(out: &mut impl Write, record: &PromptRecord) -> io::Result<()> {
    let n = record.id.get();
    writeln!(out, "[SAVED] {} ({})", record.id, format_timestamp(&record.timestamp))?;
    writeln!(
        out,
        "{}",
        format!("Use: pclaude show {n}    or    pclaude use {n}").dimmed()
    )
}
