//! IgmpProxyMgr - IGMP proxy configuration handler implementation

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::{info, instrument, warn};

use confmode_common::{file, CfgMgrResult, ConfModeHandler, ConfigStore, ServiceControl};

use crate::constants::DISABLED_WARNING;
use crate::extract::extract;
use crate::template::render;
use crate::types::ProxyState;
use crate::verify::verify;
use crate::{CONFIG_FILE, SERVICE_NAME};

/// IgmpProxyMgr drives the igmpproxy daemon from the configuration tree
///
/// | State | generate | apply |
/// |---|---|---|
/// | absent | nothing | stop service, delete file |
/// | disabled | operator warning | stop service, delete file |
/// | enabled | write file | restart service |
pub struct IgmpProxyMgr {
    /// Generated daemon configuration file
    config_path: PathBuf,

    /// systemd unit of the daemon
    service_name: String,

    /// Service lifecycle backend
    service: Arc<dyn ServiceControl>,

    /// Messages shown to the operator during this run
    notices: Mutex<Vec<String>>,
}

impl IgmpProxyMgr {
    /// Creates a manager using the default file path and service name
    pub fn new(service: Arc<dyn ServiceControl>) -> Self {
        Self {
            config_path: PathBuf::from(CONFIG_FILE),
            service_name: SERVICE_NAME.to_string(),
            service,
            notices: Mutex::new(Vec::new()),
        }
    }

    /// Overrides the generated file path
    pub fn with_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = path.into();
        self
    }

    /// Overrides the service unit name
    pub fn with_service_name(mut self, name: impl Into<String>) -> Self {
        self.service_name = name.into();
        self
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    /// Returns the operator messages emitted so far
    pub fn notices(&self) -> Vec<String> {
        self.notices
            .lock()
            .map(|notices| notices.clone())
            .unwrap_or_default()
    }

    fn notify(&self, message: &str) {
        println!("{}", message);
        warn!("{}", message);
        if let Ok(mut notices) = self.notices.lock() {
            notices.push(message.to_string());
        }
    }
}

#[async_trait]
impl ConfModeHandler for IgmpProxyMgr {
    type Config = ProxyState;

    fn name(&self) -> &str {
        "igmp-proxy"
    }

    async fn get_config(&self, store: &mut dyn ConfigStore) -> CfgMgrResult<ProxyState> {
        extract(store).await
    }

    fn verify(&self, config: &ProxyState) -> CfgMgrResult<()> {
        verify(config)
    }

    #[instrument(skip_all)]
    async fn generate(&self, config: &ProxyState) -> CfgMgrResult<()> {
        match config {
            ProxyState::Absent => Ok(()),
            ProxyState::Present(config) if config.disabled => {
                self.notify(DISABLED_WARNING);
                Ok(())
            }
            ProxyState::Present(config) => {
                file::write_atomic(&self.config_path, &render(config))?;
                info!(
                    interfaces = config.interfaces.len(),
                    "Generated {}",
                    self.config_path.display()
                );
                Ok(())
            }
        }
    }

    #[instrument(skip_all)]
    async fn apply(&self, config: &ProxyState) -> CfgMgrResult<()> {
        if config.is_active() {
            self.service.restart(&self.service_name).await;
        } else {
            info!("IGMP proxy removed or disabled, stopping {}", self.service_name);
            self.service.stop(&self.service_name).await;
            file::remove_if_exists(&self.config_path)?;
        }
        Ok(())
    }
}
