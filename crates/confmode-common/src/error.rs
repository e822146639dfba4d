//! Error types for configuration-mode handlers.
//!
//! All errors implement `std::error::Error` via `thiserror`. Only
//! [`CfgMgrError::Config`] is meant for the operator; everything else is a
//! fatal condition that propagates to the process boundary.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for handler operations.
pub type CfgMgrResult<T> = Result<T, CfgMgrError>;

/// Errors that can occur while reading, validating or applying configuration.
#[derive(Debug, Error)]
pub enum CfgMgrError {
    /// Domain rule violation found during verification.
    ///
    /// Displays as the bare message so it can be shown to the operator as-is.
    #[error("{message}")]
    Config {
        /// Human-readable message.
        message: String,
    },

    /// A value read from the configuration store is not usable.
    #[error("Invalid configuration for {field}: {message}")]
    InvalidConfig {
        /// The field that failed to convert.
        field: String,
        /// Error message.
        message: String,
    },

    /// Configuration store access failed.
    #[error("Config store operation failed: {operation} '{path}': {message}")]
    ConfigStore {
        /// The operation that failed (e.g., "exists", "listNodes").
        operation: String,
        /// The path the operation was applied to.
        path: String,
        /// Error message.
        message: String,
    },

    /// Configuration text could not be parsed into a tree.
    #[error("Config parse error at line {line}: {message}")]
    ConfigParse {
        /// 1-based line number.
        line: usize,
        /// Error message.
        message: String,
    },

    /// Filesystem operation on a generated file failed.
    #[error("I/O error on '{}': {source}", .path.display())]
    Io {
        /// The file involved.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: io::Error,
    },

    /// Failed to execute a shell command (spawn error).
    #[error("Failed to execute shell command '{command}': {source}")]
    ShellExec {
        /// The command that failed to execute.
        command: String,
        /// The underlying IO error.
        #[source]
        source: io::Error,
    },
}

impl CfgMgrError {
    /// Creates a domain configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates an invalid configuration error.
    pub fn invalid_config(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Creates a config store error.
    pub fn store(
        operation: impl Into<String>,
        path: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::ConfigStore {
            operation: operation.into(),
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a parse error.
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::ConfigParse {
            line,
            message: message.into(),
        }
    }

    /// Creates an I/O error bound to a path.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Returns true if this error is an operator-facing validation failure.
    pub fn is_config_error(&self) -> bool {
        matches!(self, CfgMgrError::Config { .. })
    }
}
