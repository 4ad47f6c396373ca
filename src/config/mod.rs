//! Configuration management.
//!
//! Settings live in `config.yaml` next to the archive (by default
//! `~/.prompt-archive/config.yaml`). Every key is optional. Environment
//! variables take precedence over the file:
//!
//! - `PCLAUDE_ASSISTANT` overrides `assistant_command`
//! - `PCLAUDE_ON_MALFORMED` overrides `on_malformed`

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::storage::{archive_dir, Archive, MalformedPolicy};

/// Environment variable overriding the assistant command.
pub const ASSISTANT_ENV: &str = "PCLAUDE_ASSISTANT";

/// Environment variable overriding the malformed-record policy.
pub const ON_MALFORMED_ENV: &str = "PCLAUDE_ON_MALFORMED";

/// Keys accepted by `config get` and `config set`.
pub const CONFIG_KEYS: &[&str] = &["assistant_command", "on_malformed", "recent_limit", "quiet"];

/// User configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Command that receives forwarded invocations. Extra words are
    /// passed as leading arguments (e.g. `npx claude`).
    pub assistant_command: String,

    /// How reads treat lines that are not valid records.
    pub on_malformed: MalformedPolicy,

    /// Number of prompts `ls` shows without `-n`.
    pub recent_limit: usize,

    /// Suppress the `[SAVED]` line after a capture.
    pub quiet: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            assistant_command: "claude".to_string(),
            on_malformed: MalformedPolicy::Abort,
            recent_limit: 10,
            quiet: false,
        }
    }
}

impl Config {
    /// Loads the config file and applies environment overrides.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::config_path()?)?;
        config.apply_overrides(|key| env::var(key).ok());
        Ok(config)
    }

    /// Like [`Config::load`], but a config file that cannot be read or
    /// parsed falls back to the defaults with a warning. Used in proxy
    /// mode, where the assistant must still run.
    pub fn load_lenient() -> Result<Self> {
        Ok(Self::load_lenient_from(&Self::config_path()?, |key| {
            env::var(key).ok()
        }))
    }

    /// [`Config::load_lenient`] for an explicit path and override lookup.
    pub fn load_lenient_from(path: &Path, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::load_from(path).unwrap_or_else(|err| {
            tracing::warn!("Using default config: {err:#}");
            Self::default()
        });
        config.apply_overrides(lookup);
        config
    }

    /// Loads a config file without environment overrides.
    ///
    /// A missing or empty file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_saphyr::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Writes the config to `path`, creating the parent directory.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let yaml = serde_saphyr::to_string(self).context("Failed to serialize config")?;
        fs::write(path, yaml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }

    /// Path of the config file.
    pub fn config_path() -> Result<PathBuf> {
        Ok(archive_dir()?.join("config.yaml"))
    }

    /// Applies overrides from `lookup`, normally the process environment.
    ///
    /// Unparseable policy values are ignored with a warning.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(command) = lookup(ASSISTANT_ENV).filter(|c| !c.trim().is_empty()) {
            self.assistant_command = command;
        }

        if let Some(policy) = lookup(ON_MALFORMED_ENV) {
            match policy.parse() {
                Ok(policy) => self.on_malformed = policy,
                Err(e) => tracing::warn!("Ignoring {ON_MALFORMED_ENV}: {e}"),
            }
        }
    }

    /// Opens the default archive with this config's read policy.
    pub fn archive(&self) -> Result<Archive> {
        Ok(Archive::open_default()?.with_policy(self.on_malformed))
    }

    /// Splits `assistant_command` into program and leading arguments.
    pub fn assistant_argv(&self) -> Result<(String, Vec<String>)> {
        let mut words = self.assistant_command.split_whitespace().map(str::to_string);
        let Some(program) = words.next() else {
            bail!(
                "assistant_command is empty; \
                 set it with 'pclaude config set assistant_command claude'"
            );
        };
        Ok((program, words.collect()))
    }

    /// Returns the value of a config key as text.
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "assistant_command" => Some(self.assistant_command.clone()),
            "on_malformed" => Some(self.on_malformed.to_string()),
            "recent_limit" => Some(self.recent_limit.to_string()),
            "quiet" => Some(self.quiet.to_string()),
            _ => None,
        }
    }

    /// Sets a config key from text, validating the value.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "assistant_command" => {
                if value.trim().is_empty() {
                    bail!("assistant_command cannot be empty");
                }
                self.assistant_command = value.to_string();
            }
            "on_malformed" => {
                self.on_malformed = value.parse().map_err(|e: String| anyhow::anyhow!(e))?;
            }
            "recent_limit" => {
                self.recent_limit = value
                    .trim()
                    .parse()
                    .with_context(|| format!("recent_limit must be a number, got '{value}'"))?;
            }
            "quiet" => {
                self.quiet = value
                    .trim()
                    .parse()
                    .with_context(|| format!("quiet must be true or false, got '{value}'"))?;
            }
            _ => bail!(
                "Unknown config key '{key}'. Valid keys: {}",
                CONFIG_KEYS.join(", ")
            ),
        }
        Ok(())
    }
}
