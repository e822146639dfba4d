//! # igmp-proxy - IGMP Proxy Configuration Handler
//!
//! Translates the `protocols igmp-proxy` configuration subtree into
//! `/etc/igmpproxy.conf` and keeps the `igmpproxy` service in line with it.
//!
//! ## Pipeline
//! 1. [`extract`]: read the subtree into a [`ProxyState`]
//! 2. [`verify`]: at least two interfaces, exactly one upstream
//! 3. [`IgmpProxyMgr`]: render and write the file, then restart the
//!    service; or stop the service and delete the file when the feature is
//!    removed or disabled
//!
//! ## Configuration Source
//! ```text
//! protocols igmp-proxy
//!     disable
//!     disable-quickleave
//!     interface <name>
//!         alt-subnet <subnet>      (multi)
//!         role upstream|downstream|disabled
//!         threshold <ttl>
//!         whitelist <subnet>       (multi)
//! ```

mod extract;
mod igmp_proxy_mgr;
mod tables;
mod template;
mod types;
mod verify;

pub use extract::extract;
pub use igmp_proxy_mgr::IgmpProxyMgr;
pub use tables::*;
pub use template::{render, IgmpProxyConf};
pub use types::*;
pub use verify::{verify, ERR_MULTIPLE_UPSTREAM, ERR_NO_UPSTREAM, ERR_TOO_FEW_INTERFACES};
