//! Install-alias command - route `claude` through pclaude.
//!
//! Appends an alias to the user's shell startup file so every `claude`
//! invocation is captured automatically. Re-running it is harmless: an
//! existing alias is detected and left alone.

use anyhow::{Context, Result};
use colored::Colorize;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Marker comment written above the alias.
const ALIAS_MARKER: &str = "# pclaude - Automatic prompt capture";

/// Shell whose startup file receives the alias.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellKind {
    /// Bash (also the fallback for unknown shells).
    Bash,
    /// Zsh.
    Zsh,
    /// Windows PowerShell.
    PowerShell,
}

impl ShellKind {
    /// Picks the shell from `$SHELL`, or PowerShell on Windows.
    fn detect(shell_env: Option<&str>) -> Self {
        if cfg!(windows) {
            ShellKind::PowerShell
        } else if shell_env.is_some_and(|s| s.contains("zsh")) {
            ShellKind::Zsh
        } else {
            ShellKind::Bash
        }
    }

    /// Guesses the shell from the name of a startup file.
    fn from_config_path(path: &Path, shell_env: Option<&str>) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        if name.ends_with(".ps1") {
            ShellKind::PowerShell
        } else if name.contains("zsh") {
            ShellKind::Zsh
        } else if name.contains("bash") {
            ShellKind::Bash
        } else {
            Self::detect(shell_env)
        }
    }

    /// Default startup file under `home`.
    fn config_path(&self, home: &Path) -> PathBuf {
        match self {
            ShellKind::Bash => home.join(".bashrc"),
            ShellKind::Zsh => home.join(".zshrc"),
            ShellKind::PowerShell => home
                .join("Documents")
                .join("PowerShell")
                .join("Microsoft.PowerShell_profile.ps1"),
        }
    }

    /// The alias line for this shell.
    fn alias_line(&self) -> &'static str {
        match self {
            ShellKind::Bash | ShellKind::Zsh => r#"alias claude="pclaude""#,
            ShellKind::PowerShell => r#"Set-Alias -Name claude -Value "pclaude""#,
        }
    }

    /// Command that reloads the startup file.
    fn activate_hint(&self) -> &'static str {
        match self {
            ShellKind::Bash => "source ~/.bashrc",
            ShellKind::Zsh => "source ~/.zshrc",
            ShellKind::PowerShell => ". $PROFILE",
        }
    }
}

/// Arguments for the install-alias command.
#[derive(clap::Args)]
pub struct Args {
    /// Startup file to modify instead of the detected one
    #[arg(long, value_name = "PATH")]
    pub shell_config: Option<PathBuf>,
}

/// Outcome of an install attempt.
#[derive(Debug, PartialEq, Eq)]
enum InstallStatus {
    /// The alias was appended.
    Installed,
    /// The alias line was already present.
    AlreadyInstalled,
}

/// Executes the install-alias command.
pub fn run(args: Args) -> Result<()> {
    let shell_env = std::env::var("SHELL").ok();

    let (path, kind) = match args.shell_config {
        Some(path) => {
            let kind = ShellKind::from_config_path(&path, shell_env.as_deref());
            (path, kind)
        }
        None => {
            let home = dirs::home_dir().context("Could not find home directory")?;
            let kind = ShellKind::detect(shell_env.as_deref());
            (kind.config_path(&home), kind)
        }
    };

    execute(&path, kind, &mut io::stdout().lock())
}

fn execute(path: &Path, kind: ShellKind, out: &mut impl Write) -> Result<()> {
    writeln!(out, "{}", "pclaude Alias Installer".bold())?;
    writeln!(out)?;
    writeln!(out, "This will route the 'claude' command through pclaude.")?;
    writeln!(out, "All prompts will be captured automatically.")?;
    writeln!(out)?;

    match install_alias(path, kind)? {
        InstallStatus::AlreadyInstalled => {
            writeln!(
                out,
                "{}",
                format!("Alias already installed in {}", path.display()).green()
            )?;
        }
        InstallStatus::Installed => {
            writeln!(
                out,
                "{}",
                format!("Added alias to {}", path.display()).green()
            )?;
            writeln!(out)?;
            writeln!(out, "{}", "To activate, run:".bold())?;
            writeln!(out, "  {}", kind.activate_hint())?;
        }
    }

    writeln!(out)?;
    writeln!(
        out,
        "{}",
        "After activation, the 'claude' command will capture prompts automatically.".dimmed()
    )?;
    Ok(())
}

/// Appends the alias for `kind` to `path` unless it is already there.
///
/// Creates the file and its parent directory if missing.
fn install_alias(path: &Path, kind: ShellKind) -> Result<InstallStatus> {
    let alias_line = kind.alias_line();

    let existing = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == io::ErrorKind::NotFound => String::new(),
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to read {}", path.display()));
        }
    };

    if existing.lines().any(|line| line.trim() == alias_line) {
        return Ok(InstallStatus::AlreadyInstalled);
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;

    let mut block = String::new();
    if !existing.is_empty() && !existing.ends_with('\n') {
        block.push('\n');
    }
    block.push_str(&format!("\n{ALIAS_MARKER}\n{alias_line}\n"));

    file.write_all(block.as_bytes())
        .with_context(|| format!("Failed to write alias to {}", path.display()))?;

    tracing::debug!("Installed claude alias in {}", path.display());
    Ok(InstallStatus::Installed)
}
