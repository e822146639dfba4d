//! Reads the `protocols igmp-proxy` subtree into a [`ProxyState`]

use confmode_common::{CfgMgrResult, ConfigStore};
use tracing::{debug, instrument};

use crate::nodes;
use crate::types::{InterfaceConfig, ProxyConfig, ProxyState};
use crate::BASE_PATH;

/// Extracts the IGMP proxy configuration from `store`.
///
/// Every field starts at its default and is only overridden when the matching
/// node exists. Interfaces keep the store's enumeration order. Leaves the
/// store level at [`BASE_PATH`] when the subtree exists.
#[instrument(skip(store))]
pub async fn extract(store: &mut dyn ConfigStore) -> CfgMgrResult<ProxyState> {
    store.set_level("");
    if !store.exists(BASE_PATH).await? {
        debug!("{} not configured", BASE_PATH);
        return Ok(ProxyState::Absent);
    }
    store.set_level(BASE_PATH);

    let mut config = ProxyConfig::new();
    if store.exists(nodes::DISABLE).await? {
        config.disabled = true;
    }
    if store.exists(nodes::DISABLE_QUICKLEAVE).await? {
        config.disable_quickleave = true;
    }

    for name in store.list_nodes(nodes::INTERFACE).await? {
        store.set_level(&format!("{} {} {}", BASE_PATH, nodes::INTERFACE, name));
        let interface = extract_interface(&*store, name).await?;
        debug!(
            interface = %interface.name,
            role = %interface.role,
            "Extracted interface"
        );
        config.interfaces.push(interface);
    }
    store.set_level(BASE_PATH);

    Ok(ProxyState::Present(config))
}

/// Reads one interface; `store` must be at the interface's level.
async fn extract_interface(store: &dyn ConfigStore, name: String) -> CfgMgrResult<InterfaceConfig> {
    let mut interface = InterfaceConfig::new(name);

    if store.exists(nodes::ALT_SUBNET).await? {
        interface.alt_subnets = store.return_values(nodes::ALT_SUBNET).await?;
    }

    if store.exists(nodes::ROLE).await? {
        if let Some(role) = store.return_value(nodes::ROLE).await? {
            interface.role = role.parse()?;
        }
    }

    if store.exists(nodes::THRESHOLD).await? {
        if let Some(threshold) = store.return_value(nodes::THRESHOLD).await? {
            interface.threshold = threshold;
        }
    }

    if store.exists(nodes::WHITELIST).await? {
        interface.whitelist = store.return_values(nodes::WHITELIST).await?;
    }

    Ok(interface)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::InterfaceRole;
    use confmode_common::{CfgMgrError, ConfigTree};
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_extract_absent() {
        let mut tree = ConfigTree::parse("protocols {\n    static {\n    }\n}\n").unwrap();
        assert_eq!(extract(&mut tree).await.unwrap(), ProxyState::Absent);
    }

    #[tokio::test]
    async fn test_extract_empty_subtree_uses_defaults() {
        let mut tree = ConfigTree::new();
        tree.set_node("protocols igmp-proxy");

        let state = extract(&mut tree).await.unwrap();
        assert_eq!(state, ProxyState::Present(ProxyConfig::new()));
    }

    #[tokio::test]
    async fn test_extract_full() {
        let mut tree = ConfigTree::parse(
            r#"
protocols {
    igmp-proxy {
        disable-quickleave
        interface eth1 {
            threshold 8
            whitelist 239.1.0.0/16
            whitelist 239.2.0.0/16
        }
        interface eth0 {
            alt-subnet 10.0.0.0/8
            alt-subnet 172.16.0.0/12
            role upstream
        }
        interface eth2 {
            role disabled
        }
    }
}
"#,
        )
        .unwrap();

        let state = extract(&mut tree).await.unwrap();
        let expected = ProxyConfig {
            disabled: false,
            disable_quickleave: true,
            interfaces: vec![
                InterfaceConfig::new("eth1")
                    .with_threshold("8")
                    .with_whitelist("239.1.0.0/16")
                    .with_whitelist("239.2.0.0/16"),
                InterfaceConfig::new("eth0")
                    .with_role(InterfaceRole::Upstream)
                    .with_alt_subnet("10.0.0.0/8")
                    .with_alt_subnet("172.16.0.0/12"),
                InterfaceConfig::new("eth2").with_role(InterfaceRole::Disabled),
            ],
        };
        assert_eq!(state, ProxyState::Present(expected));
    }

    #[tokio::test]
    async fn test_extract_disabled_flag() {
        let mut tree = ConfigTree::new();
        tree.set_node("protocols igmp-proxy disable");

        let state = extract(&mut tree).await.unwrap();
        let config = state.config().unwrap();
        assert!(config.disabled);
        assert!(!config.disable_quickleave);
        assert!(!state.is_active());
    }

    #[tokio::test]
    async fn test_extract_ignores_previous_level() {
        let mut tree = ConfigTree::new();
        tree.set_value("protocols igmp-proxy interface eth0 role", "upstream");
        tree.set_level("system");

        let state = extract(&mut tree).await.unwrap();
        assert_eq!(state.config().unwrap().interfaces.len(), 1);
        assert_eq!(tree.level(), BASE_PATH);
    }

    #[tokio::test]
    async fn test_extract_unknown_role() {
        let mut tree = ConfigTree::new();
        tree.set_value("protocols igmp-proxy interface eth0 role", "sideways");

        match extract(&mut tree).await {
            Err(CfgMgrError::InvalidConfig { field, .. }) => assert_eq!(field, "role"),
            other => panic!("Expected InvalidConfig, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_extract_threshold_is_verbatim() {
        let mut tree = ConfigTree::new();
        tree.set_value("protocols igmp-proxy interface eth0 threshold", "not-a-number");

        let state = extract(&mut tree).await.unwrap();
        assert_eq!(state.config().unwrap().interfaces[0].threshold, "not-a-number");
    }
}
