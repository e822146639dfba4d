//! Type definitions for the IGMP proxy handler

use confmode_common::CfgMgrError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::DEFAULT_THRESHOLD;

/// Role of an interface in the proxy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterfaceRole {
    /// Multicast traffic arrives here
    Upstream,
    /// Multicast traffic is forwarded here to listeners
    #[default]
    Downstream,
    /// Interface is ignored by the proxy
    Disabled,
}

impl InterfaceRole {
    /// Returns the role keyword used in configuration and output
    pub fn as_str(&self) -> &'static str {
        match self {
            InterfaceRole::Upstream => "upstream",
            InterfaceRole::Downstream => "downstream",
            InterfaceRole::Disabled => "disabled",
        }
    }
}

impl fmt::Display for InterfaceRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InterfaceRole {
    type Err = CfgMgrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "upstream" => Ok(InterfaceRole::Upstream),
            "downstream" => Ok(InterfaceRole::Downstream),
            "disabled" => Ok(InterfaceRole::Disabled),
            other => Err(CfgMgrError::invalid_config(
                "role",
                format!("unknown interface role '{}'", other),
            )),
        }
    }
}

/// Per-interface proxy configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceConfig {
    /// Interface name (e.g. "eth0")
    pub name: String,

    /// Proxy role
    pub role: InterfaceRole,

    /// TTL threshold, passed through verbatim
    pub threshold: String,

    /// Additional legal multicast source subnets
    pub alt_subnets: Vec<String>,

    /// Allowed multicast group subnets
    pub whitelist: Vec<String>,
}

impl InterfaceConfig {
    /// Creates an interface with default settings
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            role: InterfaceRole::default(),
            threshold: DEFAULT_THRESHOLD.to_string(),
            alt_subnets: Vec::new(),
            whitelist: Vec::new(),
        }
    }

    /// Sets the role
    pub fn with_role(mut self, role: InterfaceRole) -> Self {
        self.role = role;
        self
    }

    /// Sets the threshold
    pub fn with_threshold(mut self, threshold: impl Into<String>) -> Self {
        self.threshold = threshold.into();
        self
    }

    /// Appends an alternative source subnet
    pub fn with_alt_subnet(mut self, subnet: impl Into<String>) -> Self {
        self.alt_subnets.push(subnet.into());
        self
    }

    /// Appends a whitelist entry
    pub fn with_whitelist(mut self, subnet: impl Into<String>) -> Self {
        self.whitelist.push(subnet.into());
        self
    }

    pub fn is_upstream(&self) -> bool {
        self.role == InterfaceRole::Upstream
    }
}

/// IGMP proxy feature configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyConfig {
    /// Feature kill-switch
    pub disabled: bool,

    /// Suppresses the `quickleave` directive
    pub disable_quickleave: bool,

    /// Interfaces in configuration order
    pub interfaces: Vec<InterfaceConfig>,
}

impl ProxyConfig {
    /// Creates an enabled configuration without interfaces
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an interface
    pub fn with_interface(mut self, interface: InterfaceConfig) -> Self {
        self.interfaces.push(interface);
        self
    }

    /// Number of interfaces with the upstream role
    pub fn upstream_count(&self) -> usize {
        self.interfaces.iter().filter(|i| i.is_upstream()).count()
    }
}

/// Result of reading the feature subtree
///
/// `Absent` means the subtree does not exist at all, which is different from
/// a present but disabled configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "config", rename_all = "lowercase")]
pub enum ProxyState {
    /// Feature is not configured
    Absent,
    /// Feature is configured
    Present(ProxyConfig),
}

impl ProxyState {
    /// Returns the configuration, if present
    pub fn config(&self) -> Option<&ProxyConfig> {
        match self {
            ProxyState::Absent => None,
            ProxyState::Present(config) => Some(config),
        }
    }

    /// Returns true if the daemon should be running
    pub fn is_active(&self) -> bool {
        self.config().is_some_and(|config| !config.disabled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interface_config_new() {
        let intf = InterfaceConfig::new("eth0");
        assert_eq!(intf.name, "eth0");
        assert_eq!(intf.role, InterfaceRole::Downstream);
        assert_eq!(intf.threshold, "1");
        assert!(intf.alt_subnets.is_empty());
        assert!(intf.whitelist.is_empty());
        assert!(!intf.is_upstream());
    }

    #[test]
    fn test_role_parse_and_display() {
        for role in [
            InterfaceRole::Upstream,
            InterfaceRole::Downstream,
            InterfaceRole::Disabled,
        ] {
            assert_eq!(role.as_str().parse::<InterfaceRole>().unwrap(), role);
            assert_eq!(role.to_string(), role.as_str());
        }
    }

    #[test]
    fn test_role_parse_unknown() {
        match "sideways".parse::<InterfaceRole>() {
            Err(CfgMgrError::InvalidConfig { field, message }) => {
                assert_eq!(field, "role");
                assert!(message.contains("sideways"));
            }
            other => panic!("Expected InvalidConfig, got {:?}", other),
        }
    }

    #[test]
    fn test_upstream_count() {
        let config = ProxyConfig::new()
            .with_interface(InterfaceConfig::new("eth0").with_role(InterfaceRole::Upstream))
            .with_interface(InterfaceConfig::new("eth1"))
            .with_interface(InterfaceConfig::new("eth2").with_role(InterfaceRole::Upstream));
        assert_eq!(config.upstream_count(), 2);
    }

    #[test]
    fn test_proxy_state_is_active() {
        assert!(!ProxyState::Absent.is_active());
        assert!(ProxyState::Present(ProxyConfig::new()).is_active());

        let disabled = ProxyConfig {
            disabled: true,
            ..ProxyConfig::default()
        };
        assert!(!ProxyState::Present(disabled).is_active());
    }

    #[test]
    fn test_proxy_state_json() {
        let state = ProxyState::Present(
            ProxyConfig::new()
                .with_interface(InterfaceConfig::new("eth0").with_role(InterfaceRole::Upstream)),
        );
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["state"], "present");
        assert_eq!(json["config"]["interfaces"][0]["role"], "upstream");
        assert_eq!(json["config"]["interfaces"][0]["threshold"], "1");

        let absent = serde_json::to_value(&ProxyState::Absent).unwrap();
        assert_eq!(absent["state"], "absent");
    }
}
