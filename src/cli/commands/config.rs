//! Config command - view and edit configuration.

use anyhow::{bail, Result};
use clap::Subcommand;
use colored::Colorize;
use std::io::{self, Write};

use pclaude::config::{Config, CONFIG_KEYS};
use pclaude::storage::default_archive_path;

#[derive(clap::Args)]
#[command(after_help = "EXAMPLES:\n    \
    pclaude config                                  Show all settings\n    \
    pclaude config get on_malformed                 Print one setting\n    \
    pclaude config set assistant_command \"npx claude\"\n    \
    pclaude config set on_malformed skip            Skip corrupt lines when reading")]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<ConfigCommand>,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show,
    /// Get a configuration value
    Get { key: String },
    /// Set a configuration value
    Set { key: String, value: String },
}

pub fn run(args: Args, config: &Config) -> Result<()> {
    let mut out = io::stdout().lock();
    match args.command {
        Some(ConfigCommand::Show) | None => show_config(config, &mut out),
        Some(ConfigCommand::Get { key }) => get_config(config, &key, &mut out),
        Some(ConfigCommand::Set { key, value }) => set_config(&key, &value, &mut out),
    }
}

fn show_config(config: &Config, out: &mut impl Write) -> Result<()> {
    writeln!(out, "{}", "pclaude Configuration".bold())?;
    writeln!(out)?;
    writeln!(
        out,
        "  {}  {}",
        "Archive:".dimmed(),
        default_archive_path()?.display()
    )?;
    writeln!(
        out,
        "  {}  {}",
        "Config file:".dimmed(),
        Config::config_path()?.display()
    )?;
    writeln!(out)?;
    writeln!(out, "{}", "Settings:".bold())?;
    for key in CONFIG_KEYS {
        let value = config.get(key).unwrap_or_default();
        writeln!(out, "  {:<20} {}", format!("{key}:"), value)?;
    }
    Ok(())
}

fn get_config(config: &Config, key: &str, out: &mut impl Write) -> Result<()> {
    match config.get(key) {
        Some(value) => writeln!(out, "{value}")?,
        None => bail!(
            "Unknown config key '{key}'. Valid keys: {}",
            CONFIG_KEYS.join(", ")
        ),
    }
    Ok(())
}

/// Updates the file only; environment overrides are not written back.
fn set_config(key: &str, value: &str, out: &mut impl Write) -> Result<()> {
    let path = Config::config_path()?;
    let mut file_config = Config::load_from(&path)?;
    file_config.set(key, value)?;
    file_config.save_to(&path)?;

    writeln!(
        out,
        "{} {} = {}",
        "Set".green(),
        key,
        file_config.get(key).unwrap_or_default()
    )?;
    Ok(())
}
