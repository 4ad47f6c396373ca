use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use std::env;
use std::ffi::{OsStr, OsString};
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;

use cli::commands;
use pclaude::config::Config;

/// First arguments that belong to pclaude itself. Anything else is
/// forwarded to the assistant.
const OWN_COMMANDS: &[&str] = &[
    "ls",
    "list",
    "search",
    "show",
    "use",
    "install-alias",
    "config",
    "completions",
    "help",
    "-h",
    "--help",
    "-V",
    "--version",
];

/// The main CLI command line interface.
#[derive(Parser)]
#[command(name = "pclaude")]
#[command(version)]
#[command(about = "Prompt archive for command-line AI assistants")]
#[command(long_about = "pclaude records every prompt you send to your AI assistant,\n\
    then runs the assistant with your arguments unchanged.\n\n\
    Any invocation that is not a pclaude subcommand is captured and\n\
    forwarded: 'pclaude -p \"explain this\"' saves the prompt and runs\n\
    'claude -p \"explain this\"'.")]
#[command(after_help = "EXAMPLES:\n    \
    pclaude \"fix the failing test\"   Capture and forward to claude\n    \
    pclaude ls                       List recent prompts\n    \
    pclaude search parser            Search prompts for text\n    \
    pclaude show 7                   View prompt #7\n    \
    pclaude use 7 \"in Rust\"          Re-run #7 with extra instructions\n    \
    pclaude install-alias            Capture every 'claude' call\n\n\
    For more information about a command, run 'pclaude <command> --help'.")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available CLI subcommands.
#[derive(Subcommand)]
enum Commands {
    /// List recent prompts
    #[command(visible_alias = "list")]
    Ls(commands::list::Args),

    /// Search prompts by keyword (case-insensitive)
    Search(commands::search::Args),

    /// Show a prompt in full
    Show(commands::show::Args),

    /// Reuse a prompt, optionally with additional instructions
    #[command(long_about = "Records the earlier prompt (plus any extra text) as a new\n\
        prompt and sends it to the assistant.")]
    Use(commands::reuse::Args),

    /// Install a 'claude' alias for automatic prompt capture
    InstallAlias(commands::install_alias::Args),

    /// View and manage configuration settings
    #[command(long_about = "Provides subcommands to show, get, and set configuration values.\n\
        Configuration is stored in config.yaml next to the archive\n\
        (~/.prompt-archive/config.yaml unless $PROMPT_ARCHIVE_DIR is set).")]
    Config(commands::config::Args),

    /// Generate shell completion scripts
    Completions(commands::completions::Args),
}

/// Whether the arguments (without the program name) are a pclaude
/// subcommand rather than an assistant invocation to capture.
fn is_own_invocation(args: &[impl AsRef<OsStr>]) -> bool {
    match args.first() {
        None => true,
        Some(first) => first
            .as_ref()
            .to_str()
            .is_some_and(|first| OWN_COMMANDS.contains(&first)),
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        "pclaude=debug"
    } else {
        "pclaude=warn"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();
}

fn main() -> Result<ExitCode> {
    let args: Vec<OsString> = env::args_os().skip(1).collect();

    if !is_own_invocation(&args) {
        init_logging(false);
        let config = Config::load_lenient()?;
        return commands::capture::run(args, &config);
    }

    if args.is_empty() {
        Cli::command().print_help()?;
        return Ok(ExitCode::SUCCESS);
    }

    let cli = Cli::parse();
    init_logging(cli.verbose);
    let config = Config::load()?;

    match cli.command {
        Commands::Ls(args) => commands::list::run(args, &config)?,
        Commands::Search(args) => commands::search::run(args, &config)?,
        Commands::Show(args) => return commands::show::run(args, &config),
        Commands::Use(args) => return commands::reuse::run(args, &config),
        Commands::InstallAlias(args) => commands::install_alias::run(args)?,
        Commands::Config(args) => commands::config::run(args, &config)?,
        Commands::Completions(args) => {
            commands::completions::generate_completions(&mut Cli::command(), args.shell)
        }
    }

    Ok(ExitCode::SUCCESS)
}
