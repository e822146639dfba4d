//! Service lifecycle control.
//!
//! Handlers start, stop or restart the daemon they configure through
//! [`ServiceControl`]. Calls are fire-and-forget: a failing command is logged
//! and the handler carries on, it never inspects the resulting unit state.

use async_trait::async_trait;
use std::sync::Mutex;
use tracing::{info, instrument, warn};

use crate::shell::{self, shellquote, SUDO_CMD, SYSTEMCTL_CMD};

/// Lifecycle operation on a service unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceOp {
    /// Start the unit.
    Start,
    /// Stop the unit.
    Stop,
    /// Restart (or start) the unit.
    Restart,
}

impl ServiceOp {
    /// Returns the `systemctl` verb.
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceOp::Start => "start",
            ServiceOp::Stop => "stop",
            ServiceOp::Restart => "restart",
        }
    }
}

/// Capability to control a background service.
#[async_trait]
pub trait ServiceControl: Send + Sync {
    /// Runs one lifecycle operation on `service`.
    async fn control(&self, op: ServiceOp, service: &str);

    /// Starts `service`.
    async fn start(&self, service: &str) {
        self.control(ServiceOp::Start, service).await
    }

    /// Stops `service`.
    async fn stop(&self, service: &str) {
        self.control(ServiceOp::Stop, service).await
    }

    /// Restarts `service`.
    async fn restart(&self, service: &str) {
        self.control(ServiceOp::Restart, service).await
    }
}

/// [`ServiceControl`] through `systemctl`, optionally elevated with `sudo`.
#[derive(Debug, Clone)]
pub struct SystemdServiceControl {
    use_sudo: bool,
}

impl SystemdServiceControl {
    /// Creates a controller. `use_sudo` prefixes every command with `sudo`.
    pub fn new(use_sudo: bool) -> Self {
        Self { use_sudo }
    }

    /// Builds the command line for one operation.
    pub fn build_cmd(&self, op: ServiceOp, service: &str) -> String {
        let systemctl = format!("{} {} {}", SYSTEMCTL_CMD, op.as_str(), shellquote(service));
        if self.use_sudo {
            format!("{} {}", SUDO_CMD, systemctl)
        } else {
            systemctl
        }
    }
}

impl Default for SystemdServiceControl {
    fn default() -> Self {
        Self::new(true)
    }
}

#[async_trait]
impl ServiceControl for SystemdServiceControl {
    #[instrument(skip(self))]
    async fn control(&self, op: ServiceOp, service: &str) {
        let cmd = self.build_cmd(op, service);
        match shell::exec(&cmd).await {
            Ok(result) if result.success() => {
                info!("Service command succeeded: {}", cmd);
            }
            Ok(result) => {
                warn!(
                    "Service command failed: {} (exit code: {}): {}",
                    cmd,
                    result.exit_code,
                    result.combined_output()
                );
            }
            Err(e) => {
                warn!("Failed to execute service command: {}", e);
            }
        }
    }
}

/// [`ServiceControl`] that only records what it was asked to do.
///
/// Used by tests and by dry runs.
#[derive(Debug, Default)]
pub struct RecordingServiceControl {
    calls: Mutex<Vec<(ServiceOp, String)>>,
}

impl RecordingServiceControl {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the recorded operations in call order.
    pub fn calls(&self) -> Vec<(ServiceOp, String)> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    /// Returns the recorded operations rendered as `"<op> <service>"`.
    pub fn commands(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .map(|(op, service)| format!("{} {}", op.as_str(), service))
            .collect()
    }
}

#[async_trait]
impl ServiceControl for RecordingServiceControl {
    async fn control(&self, op: ServiceOp, service: &str) {
        info!("Recording service command: {} {}", op.as_str(), service);
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((op, service.to_string()));
        }
    }
}
