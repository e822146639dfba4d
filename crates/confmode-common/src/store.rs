//! Configuration store abstraction.
//!
//! Handlers read the hierarchical configuration through [`ConfigStore`].
//! Paths are whitespace-separated node names (`"protocols igmp-proxy"`) and
//! are resolved relative to the store's current level.

use async_trait::async_trait;

use crate::error::CfgMgrResult;

/// Read access to a hierarchical configuration tree.
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Returns the current level as a space-separated path.
    fn level(&self) -> &str;

    /// Sets the current level. `path` is absolute.
    fn set_level(&mut self, path: &str);

    /// Checks whether a node exists under the current level.
    async fn exists(&self, path: &str) -> CfgMgrResult<bool>;

    /// Lists the names of the immediate children of a node, in tree order.
    ///
    /// Returns an empty list when the node does not exist.
    async fn list_nodes(&self, path: &str) -> CfgMgrResult<Vec<String>>;

    /// Returns the single value of a leaf node, if it has one.
    async fn return_value(&self, path: &str) -> CfgMgrResult<Option<String>>;

    /// Returns all values of a multi-value leaf node, in order.
    async fn return_values(&self, path: &str) -> CfgMgrResult<Vec<String>>;
}

/// Splits a path string into its node names.
pub fn split_path(path: &str) -> Vec<&str> {
    path.split_whitespace().collect()
}

/// Joins a level and a relative path into one normalized path string.
pub fn join_path(level: &str, path: &str) -> String {
    split_path(level)
        .into_iter()
        .chain(split_path(path))
        .collect::<Vec<_>>()
        .join(" ")
}
