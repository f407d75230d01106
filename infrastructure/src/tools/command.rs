//! Shell command execution shared by the builtin and external providers.
//!
//! Commands run through `sh -c` (or `cmd /C` on Windows) on the tokio
//! process API. A non-zero exit status is still a result: the caller gets
//! the exit code and both streams and decides what it means.

use relay_domain::ProviderError;
use serde_json::{Value, json};
use std::path::Path;
use std::process::Stdio;
use std::sync::LazyLock;
use std::time::Duration;
use tokio::process::Command;
use tracing::debug;

use regex::Regex;

/// Default command timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Maximum captured size per stream (1 MiB)
pub const MAX_OUTPUT_SIZE: usize = 1024 * 1024;

const TRUNCATION_MARKER: &str = "\n... (output truncated)";

static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([A-Za-z_][A-Za-z0-9_]*)\}").unwrap());

/// Captured result of a finished command
#[derive(Debug, Clone, PartialEq)]
pub struct CommandOutput {
    pub command: String,
    pub stdout: String,
    pub stderr: String,
    /// `None` when the process was killed by a signal
    pub exit_code: Option<i32>,
    pub truncated: bool,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    pub fn to_value(&self) -> Value {
        json!({
            "command": self.command,
            "stdout": self.stdout,
            "stderr": self.stderr,
            "exit_code": self.exit_code,
            "success": self.success(),
            "truncated": self.truncated,
        })
    }
}

/// Run `command` in a shell and capture its output.
///
/// Fails with `InvalidArguments` for a blank command or a missing working
/// directory, `Timeout` when the command outlives `timeout_secs`, and
/// `ExecutionFailed` when the shell cannot be spawned.
pub async fn run_shell(
    command: &str,
    working_dir: Option<&Path>,
    timeout_secs: u64,
) -> Result<CommandOutput, ProviderError> {
    if command.trim().is_empty() {
        return Err(ProviderError::InvalidArguments(
            "command must not be empty".to_string(),
        ));
    }

    let mut cmd = if cfg!(target_os = "windows") {
        let mut c = Command::new("cmd");
        c.args(["/C", command]);
        c
    } else {
        let mut c = Command::new("sh");
        c.args(["-c", command]);
        c
    };

    if let Some(dir) = working_dir {
        if !dir.is_dir() {
            return Err(ProviderError::InvalidArguments(format!(
                "Working directory does not exist: {}",
                dir.display()
            )));
        }
        cmd.current_dir(dir);
    }

    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    debug!(command, timeout_secs, "Running shell command");

    let output = match tokio::time::timeout(Duration::from_secs(timeout_secs), cmd.output()).await
    {
        Ok(Ok(output)) => output,
        Ok(Err(e)) => {
            return Err(ProviderError::ExecutionFailed(format!(
                "Failed to execute command: {}",
                e
            )));
        }
        Err(_) => return Err(ProviderError::Timeout(timeout_secs)),
    };

    let (stdout, stdout_cut) = capture(&output.stdout);
    let (stderr, stderr_cut) = capture(&output.stderr);

    Ok(CommandOutput {
        command: command.to_string(),
        stdout,
        stderr,
        exit_code: output.status.code(),
        truncated: stdout_cut || stderr_cut,
    })
}

/// Decode a stream lossily, cutting it at [`MAX_OUTPUT_SIZE`]
fn capture(bytes: &[u8]) -> (String, bool) {
    let text = String::from_utf8_lossy(bytes);
    if text.len() <= MAX_OUTPUT_SIZE {
        return (text.into_owned(), false);
    }
    let mut end = MAX_OUTPUT_SIZE;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    (format!("{}{}", &text[..end], TRUNCATION_MARKER), true)
}

/// Fill `{name}` placeholders in a command template.
///
/// Each lookup map is consulted in order; the first hit wins. Values are
/// shell-escaped. Placeholders with no value become empty strings; braces
/// around anything that is not an identifier (`{}`, `{print $1}`) are kept.
pub fn render_template(template: &str, lookups: &[&relay_domain::ParamMap]) -> String {
    PLACEHOLDER_RE
        .replace_all(template, |caps: &regex::Captures<'_>| {
            let key = &caps[1];
            lookups
                .iter()
                .find_map(|map| map.get(key))
                .filter(|value| !value.is_null())
                .map(|value| match value {
                    Value::String(s) => shell_escape(s),
                    other => shell_escape(&other.to_string()),
                })
                .unwrap_or_default()
        })
        .into_owned()
}

/// Escape a string for safe shell substitution.
///
/// Unix wraps in single quotes (`it's` → `'it'\''s'`); Windows wraps in
/// double quotes and escapes `"`, `%` and `!`.
pub fn shell_escape(s: &str) -> String {
    if !s.is_empty()
        && s.chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '.' | '/' | ':' | '='))
    {
        return s.to_string();
    }

    if cfg!(target_os = "windows") {
        let mut escaped = String::with_capacity(s.len() + 2);
        escaped.push('"');
        for ch in s.chars() {
            match ch {
                '"' => escaped.push_str("\\\""),
                '%' => escaped.push_str("%%"),
                '!' => escaped.push_str("^!"),
                _ => escaped.push(ch),
            }
        }
        escaped.push('"');
        escaped
    } else {
        format!("'{}'", s.replace('\'', r"'\''"))
    }
}
