//! igmpproxy.conf rendering
//!
//! Output layout:
//!
//! ```text
//! <banner>
//!
//! quickleave
//!
//! # Configuration for eth0 (upstream interface)
//! phyint eth0 upstream ratelimit 0 threshold 1
//!         altnet 10.0.0.0/8
//!
//! # Configuration for eth1 (downstream interface)
//! phyint eth1 downstream ratelimit 0 threshold 1
//!         whitelist 239.0.0.0/8
//! ```

use std::fmt;

use crate::types::{InterfaceConfig, InterfaceRole, ProxyConfig};

const BANNER: &str = "\
########################################################
#
# autogenerated by igmp-proxy
#
#   The configuration file must define one upstream
#   interface, and one or more downstream interfaces.
#
#   If multicast traffic originates outside the
#   upstream subnet, the \"altnet\" option can be
#   used in order to define legal multicast sources.
#
#   The \"quickleave\" should be used to avoid saturation
#   of the upstream link. The option should only
#   be used if it's absolutely necessary to
#   accurately imitate just one Client.
#
########################################################
";

/// Indent of `altnet` and `whitelist` lines under their `phyint`
const SUBNET_INDENT: &str = "        ";

/// Display adapter producing the igmpproxy.conf text of a configuration
pub struct IgmpProxyConf<'a>(pub &'a ProxyConfig);

impl fmt::Display for IgmpProxyConf<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let config = self.0;

        writeln!(f)?;
        f.write_str(BANNER)?;
        writeln!(f)?;

        if !config.disable_quickleave {
            writeln!(f, "quickleave")?;
        }

        for interface in &config.interfaces {
            write_interface(f, interface)?;
        }

        Ok(())
    }
}

fn write_interface(f: &mut fmt::Formatter<'_>, interface: &InterfaceConfig) -> fmt::Result {
    writeln!(f)?;
    writeln!(
        f,
        "# Configuration for {} ({} interface)",
        interface.name, interface.role
    )?;

    match interface.role {
        InterfaceRole::Disabled => writeln!(f, "phyint {} disabled", interface.name)?,
        role => writeln!(
            f,
            "phyint {} {} ratelimit 0 threshold {}",
            interface.name, role, interface.threshold
        )?,
    }

    for subnet in &interface.alt_subnets {
        writeln!(f, "{}altnet {}", SUBNET_INDENT, subnet)?;
    }
    for subnet in &interface.whitelist {
        writeln!(f, "{}whitelist {}", SUBNET_INDENT, subnet)?;
    }

    Ok(())
}

/// Renders the igmpproxy.conf text for `config`
pub fn render(config: &ProxyConfig) -> String {
    IgmpProxyConf(config).to_string()
}
