//! Common infrastructure for configuration-mode feature handlers.
//!
//! Each handler translates one subtree of the system configuration into a
//! daemon configuration file and keeps the daemon's running state in line
//! with it. This crate provides what all of them share:
//!
//! - [`store`]: the [`ConfigStore`] read interface
//! - [`tree`]: [`ConfigTree`], an in-memory store parsed from config text
//! - [`cli_shell`]: [`CliShellStore`], a store backed by the live session
//! - [`service`]: fire-and-forget [`ServiceControl`]
//! - [`file`]: atomic generated-file replacement
//! - [`handler`]: the [`ConfModeHandler`] trait and [`run_handler`] driver
//! - [`shell`]: quoted shell command execution
//! - [`error`]: error types
//!
//! # Example
//!
//! ```ignore
//! use confmode_common::{run_handler, CliShellStore};
//!
//! let mut store = CliShellStore::new();
//! run_handler(&my_handler, &mut store).await?;
//! ```

pub mod cli_shell;
pub mod error;
pub mod file;
pub mod handler;
pub mod service;
pub mod shell;
pub mod store;
pub mod tree;

// Re-export commonly used items at crate root
pub use cli_shell::CliShellStore;
pub use error::{CfgMgrError, CfgMgrResult};
pub use handler::{run_handler, ConfModeHandler};
pub use service::{RecordingServiceControl, ServiceControl, ServiceOp, SystemdServiceControl};
pub use store::ConfigStore;
pub use tree::{ConfigNode, ConfigTree};
