//! Domain rules for the IGMP proxy configuration

use confmode_common::{CfgMgrError, CfgMgrResult};
use tracing::debug;

use crate::types::ProxyState;

pub const ERR_TOO_FEW_INTERFACES: &str =
    "Must define an upstream and at least 1 downstream interface!";
pub const ERR_NO_UPSTREAM: &str = "At least 1 upstream interface is required!";
pub const ERR_MULTIPLE_UPSTREAM: &str = "Only 1 upstream interface allowed!";

/// Checks that an enabled configuration has at least two interfaces and
/// exactly one upstream.
///
/// Absent and disabled configurations always pass. Interface name uniqueness
/// and threshold values are not checked.
pub fn verify(state: &ProxyState) -> CfgMgrResult<()> {
    let config = match state {
        ProxyState::Absent => return Ok(()),
        ProxyState::Present(config) if config.disabled => {
            debug!("IGMP proxy disabled, skipping verification");
            return Ok(());
        }
        ProxyState::Present(config) => config,
    };

    if config.interfaces.len() < 2 {
        return Err(CfgMgrError::config(ERR_TOO_FEW_INTERFACES));
    }

    match config.upstream_count() {
        0 => Err(CfgMgrError::config(ERR_NO_UPSTREAM)),
        1 => Ok(()),
        _ => Err(CfgMgrError::config(ERR_MULTIPLE_UPSTREAM)),
    }
}
