//! Test infrastructure for configuration-mode handlers
//!
//! Provides:
//! - Configuration tree fixtures built from `set`-style changes
//! - Scenario descriptions with expected file and service outcomes
//! - A parser for generated igmpproxy.conf files
//! - File and service-command verification helpers

pub mod fixtures;
mod verification;

pub use fixtures::*;
pub use verification::*;
