//! Search command - find prompts by keyword.
//!
//! Matches are case-insensitive substring hits on the prompt text and
//! are listed in the order they were recorded.

use anyhow::Result;
use colored::Colorize;
use std::io::{self, Write};

use crate::cli::format::{format_timestamp, preview};
use crate::cli::OutputFormat;
use pclaude::config::Config;
use pclaude::storage::Archive;

/// Arguments for the search command.
#[derive(clap::Args)]
#[command(after_help = "EXAMPLES:\n    \
    pclaude search parser          Prompts mentioning 'parser'\n    \
    pclaude search \"unit test\"     Multi-word keyword\n    \
    pclaude search api -l 50       Show up to 50 matches")]
pub struct Args {
    /// Keyword to look for (case-insensitive)
    pub keyword: String,

    /// Maximum number of matches to display
    #[arg(short, long, default_value = "10", value_name = "N")]
    pub limit: usize,

    /// Output format: text (default), json
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

/// Executes the search command.
pub fn run(args: Args, config: &Config) -> Result<()> {
    let archive = config.archive()?;
    execute(&archive, &args, &mut io::stdout().lock())
}

fn execute(archive: &Archive, args: &Args, out: &mut impl Write) -> Result<()> {
    let results = archive.search(&args.keyword)?;
    let shown = &results[..results.len().min(args.limit)];

    if args.format == OutputFormat::Json {
        writeln!(out, "{}", serde_json::to_string_pretty(shown)?)?;
        return Ok(());
    }

    if results.is_empty() {
        writeln!(
            out,
            "{}",
            format!("No matches found for '{}'", args.keyword).dimmed()
        )?;
        return Ok(());
    }

    writeln!(out, "{}", format!("Found {} match(es):", results.len()).bold())?;
    writeln!(out)?;

    for record in shown {
        writeln!(
            out,
            "{}  {}",
            record.id.to_string().cyan(),
            format_timestamp(&record.timestamp)
        )?;
        writeln!(out, "  {}", preview(&record.prompt, 60))?;
        writeln!(out)?;
    }

    if results.len() > shown.len() {
        writeln!(
            out,
            "{}",
            format!(
                "... and {} more. Use --limit to see more.",
                results.len() - shown.len()
            )
            .dimmed()
        )?;
    }

    Ok(())
}
