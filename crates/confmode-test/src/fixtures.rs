//! Test fixtures for common confmode patterns
//!
//! Provides reusable configuration trees for handler testing

use confmode_common::ConfigTree;

/// One `set` command against the configuration tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigChange {
    /// Absolute node path (e.g., "protocols igmp-proxy disable")
    pub path: String,
    /// Leaf value, `None` for valueless nodes
    pub value: Option<String>,
}

impl ConfigChange {
    /// Create a valueless node (flag or container)
    pub fn node(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            value: None,
        }
    }

    /// Create a leaf value; repeating it on the same path builds a multi-value leaf
    pub fn value(path: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            value: Some(value.into()),
        }
    }

    /// Apply the change to a tree
    pub fn apply(&self, tree: &mut ConfigTree) {
        match &self.value {
            Some(value) => tree.set_value(&self.path, value.clone()),
            None => tree.set_node(&self.path),
        };
    }

    /// Render as a `set` command line
    pub fn to_set_command(&self) -> String {
        match &self.value {
            Some(value) => format!("set {} '{}'", self.path, value),
            None => format!("set {}", self.path),
        }
    }
}

/// Build a tree from a sequence of changes
pub fn build_tree<'a, I>(changes: I) -> ConfigTree
where
    I: IntoIterator<Item = &'a ConfigChange>,
{
    let mut tree = ConfigTree::new();
    for change in changes {
        change.apply(&mut tree);
    }
    tree
}

/// Common IGMP proxy configuration fixtures
pub mod igmp_fixtures {
    use super::*;

    /// Root of the IGMP proxy subtree
    pub const BASE: &str = "protocols igmp-proxy";

    fn interface_path(name: &str, leaf: &str) -> String {
        format!("{} interface {} {}", BASE, name, leaf)
    }

    /// Empty IGMP proxy subtree
    pub fn base() -> ConfigChange {
        ConfigChange::node(BASE)
    }

    /// Feature kill-switch
    pub fn disable() -> ConfigChange {
        ConfigChange::node(format!("{} disable", BASE))
    }

    /// Suppress the quickleave directive
    pub fn disable_quickleave() -> ConfigChange {
        ConfigChange::node(format!("{} disable-quickleave", BASE))
    }

    /// Interface without any settings (defaults to downstream)
    pub fn interface(name: &str) -> ConfigChange {
        ConfigChange::node(format!("{} interface {}", BASE, name))
    }

    /// Interface with an explicit role
    pub fn interface_role(name: &str, role: &str) -> ConfigChange {
        ConfigChange::value(interface_path(name, "role"), role)
    }

    /// Interface TTL threshold
    pub fn threshold(name: &str, threshold: &str) -> ConfigChange {
        ConfigChange::value(interface_path(name, "threshold"), threshold)
    }

    /// Alternative multicast source subnet
    pub fn alt_subnet(name: &str, subnet: &str) -> ConfigChange {
        ConfigChange::value(interface_path(name, "alt-subnet"), subnet)
    }

    /// Whitelisted multicast group subnet
    pub fn whitelist(name: &str, subnet: &str) -> ConfigChange {
        ConfigChange::value(interface_path(name, "whitelist"), subnet)
    }

    /// Minimal valid setup: one upstream, one downstream
    pub fn upstream_downstream(upstream: &str, downstream: &str) -> Vec<ConfigChange> {
        vec![
            interface_role(upstream, "upstream"),
            interface_role(downstream, "downstream"),
        ]
    }
}

/// Expected outcome of running a handler over a scenario
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpectedOutcome {
    /// Pipeline succeeds
    Success {
        /// Whether the generated file must exist afterwards
        file_present: bool,
        /// Service commands in call order, as `"<op> <service>"`
        service_commands: Vec<String>,
        /// Whether an operator notice is expected
        notice: bool,
    },
    /// Verification rejects the configuration with this message
    ConfigError(String),
}

/// Test scenario builder for multi-step tests
#[derive(Debug)]
pub struct TestScenario {
    /// Scenario name
    pub name: String,
    /// Sequence of configuration changes
    pub changes: Vec<ConfigChange>,
    /// Expected outcome
    pub expected: Option<ExpectedOutcome>,
    /// Expected `phyint` lines of the generated file, in order
    pub expected_phyints: Vec<String>,
}

impl TestScenario {
    /// Create a new test scenario
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            changes: Vec::new(),
            expected: None,
            expected_phyints: Vec::new(),
        }
    }

    /// Add a configuration change to the scenario
    pub fn add_change(mut self, change: ConfigChange) -> Self {
        self.changes.push(change);
        self
    }

    /// Add several configuration changes
    pub fn add_changes<I>(mut self, changes: I) -> Self
    where
        I: IntoIterator<Item = ConfigChange>,
    {
        self.changes.extend(changes);
        self
    }

    /// Set the expected outcome
    pub fn expect(mut self, outcome: ExpectedOutcome) -> Self {
        self.expected = Some(outcome);
        self
    }

    /// Add an expected `phyint` line
    pub fn expect_phyint(mut self, line: impl Into<String>) -> Self {
        self.expected_phyints.push(line.into());
        self
    }

    /// Build the configuration tree for this scenario
    pub fn tree(&self) -> ConfigTree {
        build_tree(&self.changes)
    }
}
