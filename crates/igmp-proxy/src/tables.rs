//! Configuration paths and constants for the IGMP proxy handler

/// Root of the feature subtree in the configuration store
pub const BASE_PATH: &str = "protocols igmp-proxy";

/// Generated daemon configuration file
pub const CONFIG_FILE: &str = "/etc/igmpproxy.conf";

/// systemd unit of the proxy daemon
pub const SERVICE_NAME: &str = "igmpproxy.service";

/// Node names under [`BASE_PATH`]
pub mod nodes {
    pub const DISABLE: &str = "disable";
    pub const DISABLE_QUICKLEAVE: &str = "disable-quickleave";
    pub const INTERFACE: &str = "interface";
    pub const ALT_SUBNET: &str = "alt-subnet";
    pub const ROLE: &str = "role";
    pub const THRESHOLD: &str = "threshold";
    pub const WHITELIST: &str = "whitelist";
}

/// Defaults and fixed messages
pub mod constants {
    /// TTL threshold used when none is configured
    pub const DEFAULT_THRESHOLD: &str = "1";

    /// Shown to the operator when the feature is switched off
    pub const DISABLED_WARNING: &str =
        "Warning: IGMP Proxy will be deactivated because it is disabled";
}
