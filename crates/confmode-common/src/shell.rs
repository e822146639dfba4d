//! Shell command execution utilities for configuration handlers.
//!
//! Commands run through `/bin/sh -c`, so every argument that comes from the
//! configuration tree must go through [`shellquote`] first.
//!
//! # Example
//!
//! ```ignore
//! use confmode_common::shell::{self, SYSTEMCTL_CMD, shellquote};
//!
//! let cmd = format!("{} restart {}", SYSTEMCTL_CMD, shellquote("igmpproxy.service"));
//! let result = shell::exec(&cmd).await?;
//! ```

use once_cell::sync::Lazy;
use regex::Regex;
use std::process::Stdio;
use tokio::process::Command;

use crate::error::{CfgMgrError, CfgMgrResult};

/// Path to `systemctl` for service lifecycle control.
pub const SYSTEMCTL_CMD: &str = "/bin/systemctl";

/// Path to `sudo` for privileged service control.
pub const SUDO_CMD: &str = "/usr/bin/sudo";

/// Path to the configuration session query tool.
pub const CLI_SHELL_API_CMD: &str = "/bin/cli-shell-api";

/// Regex for characters that need escaping in shell double-quotes.
/// Matches: $, `, ", \, and newline
static SHELL_ESCAPE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"([$`"\\\n])"#).expect("Invalid regex pattern"));

/// Quotes a string for safe use in shell commands.
///
/// Wraps the string in double quotes and escapes `$`, `` ` ``, `"`, `\` and
/// newline.
///
/// ```
/// use confmode_common::shell::shellquote;
///
/// assert_eq!(shellquote("eth0"), "\"eth0\"");
/// assert_eq!(shellquote("with$var"), "\"with\\$var\"");
/// ```
pub fn shellquote(s: &str) -> String {
    let escaped = SHELL_ESCAPE_RE.replace_all(s, r"\$1");
    format!("\"{}\"", escaped)
}

/// Result of a shell command execution.
#[derive(Debug, Clone)]
pub struct ExecResult {
    /// The exit code of the command (0 = success).
    pub exit_code: i32,
    /// The trimmed stdout output.
    pub stdout: String,
    /// The trimmed stderr output.
    pub stderr: String,
}

impl ExecResult {
    /// Returns true if the command succeeded (exit code 0).
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Returns the combined output (stdout + stderr) for error messages.
    pub fn combined_output(&self) -> String {
        if self.stderr.is_empty() {
            self.stdout.clone()
        } else if self.stdout.is_empty() {
            self.stderr.clone()
        } else {
            format!("{}\n{}", self.stdout, self.stderr)
        }
    }
}

/// Executes a shell command.
///
/// Returns `Err` only when the command could not be spawned; a non-zero exit
/// is reported through [`ExecResult::exit_code`].
pub async fn exec(cmd: &str) -> CfgMgrResult<ExecResult> {
    tracing::debug!(command = %cmd, "Executing shell command");

    let output = Command::new("/bin/sh")
        .arg("-c")
        .arg(cmd)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await
        .map_err(|e| CfgMgrError::ShellExec {
            command: cmd.to_string(),
            source: e,
        })?;

    let exit_code = output.status.code().unwrap_or(-1);
    let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();

    let result = ExecResult {
        exit_code,
        stdout,
        stderr,
    };

    if result.success() {
        tracing::trace!(command = %cmd, exit_code = exit_code, "Command succeeded");
    } else {
        tracing::debug!(
            command = %cmd,
            exit_code = exit_code,
            stderr = %result.stderr,
            "Command returned non-zero"
        );
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shellquote_simple() {
        assert_eq!(shellquote("eth0"), "\"eth0\"");
        assert_eq!(shellquote("igmpproxy.service"), "\"igmpproxy.service\"");
        assert_eq!(shellquote("10.0.0.0/8"), "\"10.0.0.0/8\"");
    }

    #[test]
    fn test_shellquote_special_chars() {
        assert_eq!(shellquote("$HOME"), "\"\\$HOME\"");
        assert_eq!(shellquote("`whoami`"), "\"\\`whoami\\`\"");
        assert_eq!(shellquote("say \"hi\""), "\"say \\\"hi\\\"\"");
        assert_eq!(shellquote("a\\b"), "\"a\\\\b\"");
    }

    #[test]
    fn test_shellquote_empty() {
        assert_eq!(shellquote(""), "\"\"");
    }

    #[test]
    fn test_exec_result_combined() {
        let result = ExecResult {
            exit_code: 1,
            stdout: "out".to_string(),
            stderr: "err".to_string(),
        };
        assert!(!result.success());
        assert_eq!(result.combined_output(), "out\nerr");

        let result = ExecResult {
            exit_code: 0,
            stdout: String::new(),
            stderr: "only err".to_string(),
        };
        assert!(result.success());
        assert_eq!(result.combined_output(), "only err");
    }

    #[tokio::test]
    async fn test_exec_echo() {
        let result = exec("echo hello").await.unwrap();
        assert!(result.success());
        assert_eq!(result.stdout, "hello");
    }

    #[tokio::test]
    async fn test_exec_failure_exit_code() {
        let result = exec("exit 42").await.unwrap();
        assert!(!result.success());
        assert_eq!(result.exit_code, 42);
    }
}
