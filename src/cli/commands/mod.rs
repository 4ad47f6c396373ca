//! CLI commands for pclaude.
//!
//! Each submodule implements a single CLI command with its argument
//! parsing and execution logic.

/// Proxy mode: capture a prompt and forward to the assistant.
pub mod capture;

/// Shell completion scripts.
pub mod completions;

/// Configuration viewing and management.
pub mod config;

/// Install the `claude` shell alias.
pub mod install_alias;

/// List recent prompts.
pub mod list;

/// Re-run an archived prompt.
pub mod reuse;

/// Search prompts by keyword.
pub mod search;

/// Display one prompt in full.
pub mod show;
