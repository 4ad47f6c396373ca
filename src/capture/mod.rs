//! Prompt capture and forwarding.
//!
//! Capture pulls the prompt text out of an assistant invocation and
//! records it; forwarding then runs the real assistant with the arguments
//! untouched. A record is always on disk before the assistant starts.

use anyhow::{Context, Result};
use std::ffi::{OsStr, OsString};
use std::process::{Command, ExitCode, ExitStatus};

use crate::config::Config;
use crate::storage::{Archive, ArchiveError, PromptRecord, RecordSource};

/// Extracts the prompt from assistant arguments.
///
/// Every token starting with `-` is treated as a flag and dropped; the
/// rest are joined with single spaces. Flag values are kept, so
/// `-p "fix it" --model opus` yields `fix it opus`.
pub fn extract_prompt_from_args(args: &[String]) -> String {
    args.iter()
        .filter(|arg| !arg.starts_with('-'))
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Converts raw arguments to text for prompt extraction.
///
/// Invalid UTF-8 becomes U+FFFD. Only the archived copy is converted; the
/// assistant receives the raw arguments.
pub fn lossy_args(args: &[OsString]) -> Vec<String> {
    args.iter()
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect()
}

/// Records the prompt contained in `args` as a new `one-shot` record.
pub fn capture(archive: &Archive, args: &[String]) -> Result<PromptRecord, ArchiveError> {
    let prompt = extract_prompt_from_args(args);
    let record = archive.record_prompt(prompt, RecordSource::OneShot)?;
    tracing::debug!("Captured prompt {} ({} chars)", record.id, record.prompt.chars().count());
    Ok(record)
}

/// Builds a new prompt from an earlier one plus optional extra text.
pub fn reuse_prompt(original: &PromptRecord, extra: Option<&str>) -> String {
    match extra.map(str::trim).filter(|e| !e.is_empty()) {
        Some(extra) => format!("{} {}", original.prompt, extra),
        None => original.prompt.clone(),
    }
}

/// Builds the assistant command for `args` without running it.
pub fn assistant_command(config: &Config, args: &[impl AsRef<OsStr>]) -> Result<Command> {
    let (program, leading) = config.assistant_argv()?;
    let mut command = Command::new(program);
    command.args(leading).args(args);
    Ok(command)
}

/// Runs the assistant with `args`, inheriting stdin, stdout and stderr.
pub fn forward(config: &Config, args: &[impl AsRef<OsStr>]) -> Result<ExitStatus> {
    let mut command = assistant_command(config, args)?;
    tracing::debug!("Forwarding to {:?}", command);

    command.status().with_context(|| {
        format!(
            "Failed to run assistant '{}'. Set a different command with \
             'pclaude config set assistant_command <cmd>' or ${}",
            config.assistant_command,
            crate::config::ASSISTANT_ENV
        )
    })
}

/// Maps the assistant's exit status onto ours.
pub fn exit_code(status: ExitStatus) -> ExitCode {
    match status.code() {
        Some(code) => ExitCode::from((code & 0xff) as u8),
        None => ExitCode::FAILURE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;
    use tempfile::tempdir;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_extract_simple_prompt() {
        assert_eq!(extract_prompt_from_args(&args(&["hello world"])), "hello world");
    }

    #[test]
    fn test_extract_ignores_flags() {
        let input = args(&["-p", "test prompt", "--option", "value"]);
        assert_eq!(extract_prompt_from_args(&input), "test prompt value");
    }

    #[test]
    fn test_extract_joins_multiple_args() {
        let input = args(&["arg1", "arg2", "arg3"]);
        assert_eq!(extract_prompt_from_args(&input), "arg1 arg2 arg3");
    }

    #[test]
    fn test_extract_only_flags_is_empty() {
        assert_eq!(extract_prompt_from_args(&args(&["--flag1", "--flag2"])), "");
        assert_eq!(extract_prompt_from_args(&[]), "");
    }

    #[test]
    fn test_capture_records_one_shot() {
        let dir = tempdir().unwrap();
        let archive = Archive::open(dir.path().join("prompts.jsonl"));

        let record = capture(&archive, &args(&["-p", "explain lifetimes", "--quiet"])).unwrap();
        assert_eq!(record.id.get(), 1);
        assert_eq!(record.prompt, "explain lifetimes");
        assert_eq!(record.source, RecordSource::OneShot);
        assert_eq!(record.session_id, None);

        let second = capture(&archive, &args(&["again"])).unwrap();
        assert_eq!(second.id.get(), 2);
    }

    #[test]
    fn test_reuse_prompt_appends_extra() {
        let original = PromptRecord {
            id: crate::storage::PromptId::FIRST,
            timestamp: "2026-02-08T10:00:00".parse::<NaiveDateTime>().unwrap(),
            prompt: "write a parser".to_string(),
            source: RecordSource::OneShot,
            session_id: None,
        };

        assert_eq!(reuse_prompt(&original, None), "write a parser");
        assert_eq!(reuse_prompt(&original, Some("")), "write a parser");
        assert_eq!(
            reuse_prompt(&original, Some("in Rust")),
            "write a parser in Rust"
        );
    }

    #[test]
    fn test_assistant_command_keeps_args_unchanged() {
        let mut config = Config::default();
        config.assistant_command = "npx claude".to_string();

        let command = assistant_command(&config, &args(&["-p", "hi there"])).unwrap();
        assert_eq!(command.get_program(), "npx");
        let forwarded: Vec<_> = command.get_args().collect();
        assert_eq!(forwarded, vec!["claude", "-p", "hi there"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_args_forwarded_raw_and_archived_lossy() {
        use std::os::unix::ffi::OsStringExt;

        let raw = OsString::from_vec(b"caf\xe9".to_vec());
        let input = vec![OsString::from("-p"), raw.clone()];

        let command = assistant_command(&Config::default(), &input).unwrap();
        let forwarded: Vec<_> = command.get_args().collect();
        assert_eq!(forwarded, vec![OsStr::new("-p"), raw.as_os_str()]);

        let text = lossy_args(&input);
        assert_eq!(extract_prompt_from_args(&text), "caf\u{FFFD}");
    }

    #[cfg(unix)]
    #[test]
    fn test_forward_reports_exit_status() {
        let mut config = Config::default();
        config.assistant_command = "false".to_string();

        let status = forward(&config, &[] as &[&str]).unwrap();
        assert!(!status.success());
        assert_eq!(status.code(), Some(1));
    }

    #[test]
    fn test_forward_missing_program_is_error() {
        let mut config = Config::default();
        config.assistant_command = "pclaude-test-no-such-assistant".to_string();

        assert!(forward(&config, &[] as &[&str]).is_err());
    }
}
