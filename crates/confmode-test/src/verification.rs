//! Verification helpers for testing configuration handlers
//!
//! Provides a parser for generated igmpproxy.conf text and assertion helpers
//! for the generated file and the service commands issued

use std::path::Path;
use thiserror::Error;

/// Verification error types
#[derive(Error, Debug, PartialEq, Eq)]
pub enum VerificationError {
    #[error("Unexpected line {line_no}: '{line}'")]
    UnexpectedLine { line_no: usize, line: String },

    #[error("Line {line_no}: '{line}' appears before any phyint")]
    OrphanSubnet { line_no: usize, line: String },

    #[error("Expected file '{path}' to exist")]
    FileMissing { path: String },

    #[error("Expected file '{path}' to be absent")]
    FileUnexpected { path: String },

    #[error("Service commands mismatch: expected {expected:?}, got {actual:?}")]
    ServiceMismatch {
        expected: Vec<String>,
        actual: Vec<String>,
    },
}

/// Result type for verification operations
pub type VerifyResult<T> = Result<T, VerificationError>;

/// One `phyint` block read back from a generated file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedPhyint {
    pub name: String,
    pub role: String,
    /// `None` for disabled interfaces
    pub threshold: Option<String>,
    pub altnets: Vec<String>,
    pub whitelist: Vec<String>,
}

/// Directives read back from a generated igmpproxy.conf
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedProxyConf {
    pub quickleave: bool,
    pub phyints: Vec<ParsedPhyint>,
}

/// Parses generated igmpproxy.conf text. Comments and blank lines are skipped.
pub fn parse_igmpproxy_conf(text: &str) -> VerifyResult<ParsedProxyConf> {
    let mut conf = ParsedProxyConf::default();

    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let words: Vec<&str> = line.split_whitespace().collect();
        let unexpected = || VerificationError::UnexpectedLine {
            line_no: idx + 1,
            line: raw.to_string(),
        };

        match words.as_slice() {
            ["quickleave"] => conf.quickleave = true,
            ["phyint", name, "disabled"] => conf.phyints.push(ParsedPhyint {
                name: name.to_string(),
                role: "disabled".to_string(),
                ..ParsedPhyint::default()
            }),
            ["phyint", name, role, "ratelimit", "0", "threshold", threshold] => {
                conf.phyints.push(ParsedPhyint {
                    name: name.to_string(),
                    role: role.to_string(),
                    threshold: Some(threshold.to_string()),
                    ..ParsedPhyint::default()
                })
            }
            [kind @ ("altnet" | "whitelist"), subnet] => {
                let phyint = conf
                    .phyints
                    .last_mut()
                    .ok_or_else(|| VerificationError::OrphanSubnet {
                        line_no: idx + 1,
                        line: raw.to_string(),
                    })?;
                if *kind == "altnet" {
                    phyint.altnets.push(subnet.to_string());
                } else {
                    phyint.whitelist.push(subnet.to_string());
                }
            }
            _ => return Err(unexpected()),
        }
    }

    Ok(conf)
}

/// Returns the `phyint` lines of a generated file, in order
pub fn phyint_lines(text: &str) -> Vec<String> {
    text.lines()
        .filter(|l| l.starts_with("phyint "))
        .map(str::to_string)
        .collect()
}

/// Verify that a generated file exists or not
pub fn assert_file_state(path: &Path, expected_present: bool) -> VerifyResult<()> {
    let display = path.display().to_string();
    match (path.exists(), expected_present) {
        (true, false) => Err(VerificationError::FileUnexpected { path: display }),
        (false, true) => Err(VerificationError::FileMissing { path: display }),
        _ => Ok(()),
    }
}

/// Verify the service commands issued, in order
pub fn assert_service_commands<S: AsRef<str>>(actual: &[String], expected: &[S]) -> VerifyResult<()> {
    let expected: Vec<String> = expected.iter().map(|s| s.as_ref().to_string()).collect();
    if actual == expected.as_slice() {
        Ok(())
    } else {
        Err(VerificationError::ServiceMismatch {
            expected,
            actual: actual.to_vec(),
        })
    }
}
