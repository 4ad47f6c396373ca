//! List command - show recent prompts.
//!
//! Displays the most recent prompts (oldest of the window first) as a
//! compact table, or every prompt with `--all`.

use anyhow::Result;
use colored::Colorize;
use std::io::{self, Write};

use crate::cli::format::{preview, time_only};
use crate::cli::OutputFormat;
use pclaude::config::Config;
use pclaude::storage::{Archive, PromptRecord};

/// Arguments for the ls command.
#[derive(clap::Args)]
#[command(after_help = "EXAMPLES:\n    \
    pclaude ls                 Show the 10 most recent prompts\n    \
    pclaude ls -n 25           Show the 25 most recent prompts\n    \
    pclaude ls --all           Show every prompt\n    \
    pclaude ls --format json   Output as JSON")]
pub struct Args {
    /// Number of recent prompts to show (default from config, 10)
    #[arg(short = 'n', long = "recent", value_name = "N")]
    pub recent: Option<usize>,

    /// Show every prompt in the archive
    #[arg(long, conflicts_with = "recent")]
    pub all: bool,

    /// Output format: text (default), json
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

/// Executes the ls command.
pub fn run(args: Args, config: &Config) -> Result<()> {
    let archive = config.archive()?;
    let limit = args.recent.unwrap_or(config.recent_limit);
    execute(&archive, args.all, limit, args.format, &mut io::stdout().lock())
}

fn execute(
    archive: &Archive,
    all: bool,
    limit: usize,
    format: OutputFormat,
    out: &mut impl Write,
) -> Result<()> {
    let records = if all {
        archive.read_all()?
    } else {
        archive.get_recent(limit)?
    };

    match format {
        OutputFormat::Json => {
            writeln!(out, "{}", serde_json::to_string_pretty(&records)?)?;
        }
        OutputFormat::Text => {
            if records.is_empty() {
                writeln!(out, "{}", "No prompts saved yet.".dimmed())?;
                return Ok(());
            }
            write_table(out, &records)?;
        }
    }

    Ok(())
}

fn write_table(out: &mut impl Write, records: &[PromptRecord]) -> io::Result<()> {
    const ID_WIDTH: usize = 6;
    const TIME_WIDTH: usize = 6;
    const PROMPT_WIDTH: usize = 45;

    writeln!(
        out,
        "{}",
        format!("{:<ID_WIDTH$}  {:<TIME_WIDTH$}  {}", "ID", "TIME", "PROMPT").bold()
    )?;

    for record in records {
        writeln!(
            out,
            "{}  {:<TIME_WIDTH$}  {}",
            format!("{:<ID_WIDTH$}", record.id).cyan(),
            time_only(&record.timestamp),
            preview(&record.prompt, PROMPT_WIDTH)
        )?;
    }

    Ok(())
}
