//! pclaude - a prompt archive for command-line AI assistants
//!
//! pclaude records every prompt sent to an assistant in an append-only
//! JSON Lines archive, then forwards the invocation unchanged. Archived
//! prompts can be listed, searched, shown and reused.

pub mod capture;
pub mod config;
pub mod storage;
