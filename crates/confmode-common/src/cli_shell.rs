//! Config store backed by the live configuration session.
//!
//! Every query shells out to `cli-shell-api`, which answers against the
//! session being committed:
//!
//! | Store call | Command |
//! |---|---|
//! | `exists` | `cli-shell-api exists <path>` (exit status) |
//! | `list_nodes` | `cli-shell-api listNodes <path>` (`'a' 'b'`) |
//! | `return_value` | `cli-shell-api returnValue <path>` |
//! | `return_values` | `cli-shell-api returnValues <path>` (`'a' 'b'`) |

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::instrument;

use crate::error::{CfgMgrError, CfgMgrResult};
use crate::shell::{self, shellquote, CLI_SHELL_API_CMD};
use crate::store::{join_path, split_path, ConfigStore};

/// Matches one single-quoted item of a `listNodes`/`returnValues` answer.
static QUOTED_ITEM_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"'([^']*)'").expect("Invalid regex pattern"));

/// [`ConfigStore`] that queries `cli-shell-api`.
#[derive(Debug, Clone)]
pub struct CliShellStore {
    api_cmd: String,
    level: String,
}

impl CliShellStore {
    /// Creates a store using the default `cli-shell-api` path.
    pub fn new() -> Self {
        Self::with_command(CLI_SHELL_API_CMD)
    }

    /// Creates a store using a custom query command.
    pub fn with_command(api_cmd: impl Into<String>) -> Self {
        Self {
            api_cmd: api_cmd.into(),
            level: String::new(),
        }
    }

    /// Builds the shell command line for one query.
    pub fn build_query_cmd(&self, operation: &str, path: &str) -> String {
        let full = join_path(&self.level, path);
        let mut cmd = format!("{} {}", self.api_cmd, operation);
        for node in split_path(&full) {
            cmd.push(' ');
            cmd.push_str(&shellquote(node));
        }
        cmd
    }

    async fn query(&self, operation: &str, path: &str) -> CfgMgrResult<shell::ExecResult> {
        let cmd = self.build_query_cmd(operation, path);
        shell::exec(&cmd)
            .await
            .map_err(|e| CfgMgrError::store(operation, join_path(&self.level, path), e.to_string()))
    }
}

impl Default for CliShellStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Parses a `'a' 'b' 'c'` answer into its items.
pub fn parse_quoted_list(output: &str) -> Vec<String> {
    QUOTED_ITEM_RE
        .captures_iter(output)
        .map(|caps| caps[1].to_string())
        .collect()
}

#[async_trait]
impl ConfigStore for CliShellStore {
    fn level(&self) -> &str {
        &self.level
    }

    fn set_level(&mut self, path: &str) {
        self.level = join_path("", path);
    }

    #[instrument(skip(self))]
    async fn exists(&self, path: &str) -> CfgMgrResult<bool> {
        Ok(self.query("exists", path).await?.success())
    }

    #[instrument(skip(self))]
    async fn list_nodes(&self, path: &str) -> CfgMgrResult<Vec<String>> {
        let result = self.query("listNodes", path).await?;
        if !result.success() {
            return Ok(Vec::new());
        }
        Ok(parse_quoted_list(&result.stdout))
    }

    #[instrument(skip(self))]
    async fn return_value(&self, path: &str) -> CfgMgrResult<Option<String>> {
        let result = self.query("returnValue", path).await?;
        if !result.success() {
            return Ok(None);
        }
        Ok(Some(result.stdout))
    }

    #[instrument(skip(self))]
    async fn return_values(&self, path: &str) -> CfgMgrResult<Vec<String>> {
        let result = self.query("returnValues", path).await?;
        if !result.success() {
            return Ok(Vec::new());
        }
        Ok(parse_quoted_list(&result.stdout))
    }
}
