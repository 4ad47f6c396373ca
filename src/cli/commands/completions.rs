//! Completions command - generate shell completion scripts.
//!
//! Completion only covers pclaude's own subcommands; proxied assistant
//! arguments are free-form.

use clap::Command;
use clap_complete::{generate, Shell};
use std::io;

/// Arguments for the completions command.
#[derive(clap::Args)]
#[command(after_help = "EXAMPLES:\n    \
    pclaude completions bash > ~/.local/share/bash-completion/completions/pclaude\n    \
    pclaude completions zsh > ~/.zfunc/_pclaude\n    \
    pclaude completions fish > ~/.config/fish/completions/pclaude.fish")]
pub struct Args {
    /// Shell to generate completions for
    #[arg(value_name = "SHELL")]
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Generates completions using a provided clap Command.
///
/// Called from main.rs, which owns the `Cli` definition.
pub fn generate_completions(cmd: &mut Command, shell: Shell) {
    generate(shell, cmd, "pclaude", &mut io::stdout());
}
