//! Command-line interface for pclaude.
//!
//! Provides the subcommands for browsing and reusing archived prompts,
//! plus the proxy path that captures a prompt and forwards it to the
//! assistant.

/// Individual CLI command implementations.
pub mod commands;

/// Output formatting utilities.
pub mod format;

pub use format::OutputFormat;
