// Copyright (c) 2025 - Cowboy AI, Inc.
//! Runtime configuration

use std::path::PathBuf;

/// Default key holding the active topology
pub const DEFAULT_STATE_KEY: &str = "/active-network-topology";

/// Configuration for the reconciler's collaborators
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopologyConfig {
    /// Directory of the file-backed store
    pub state_dir: PathBuf,
    /// Key holding the active topology
    pub state_key: String,
    /// `xl` toolstack binary
    pub xl_binary: PathBuf,
    /// Hotplug script passed to `xl network-attach`
    pub vif_script: String,
}

impl Default for TopologyConfig {
    fn default() -> Self {
        Self {
            state_dir: PathBuf::from("/var/lib/cim-network-topology"),
            state_key: DEFAULT_STATE_KEY.to_string(),
            xl_binary: PathBuf::from("xl"),
            vif_script: "vif-route-nexus".to_string(),
        }
    }
}

impl TopologyConfig {
    /// Load configuration from environment variables, falling back to
    /// defaults for anything unset
    ///
    /// - `TOPOLOGY_STATE_DIR`
    /// - `TOPOLOGY_STATE_KEY`
    /// - `TOPOLOGY_XL_BINARY`
    /// - `TOPOLOGY_VIF_SCRIPT`
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        Self {
            state_dir: var("TOPOLOGY_STATE_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.state_dir),
            state_key: var("TOPOLOGY_STATE_KEY").unwrap_or(defaults.state_key),
            xl_binary: var("TOPOLOGY_XL_BINARY")
                .map(PathBuf::from)
                .unwrap_or(defaults.xl_binary),
            vif_script: var("TOPOLOGY_VIF_SCRIPT").unwrap_or(defaults.vif_script),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_when_unset() {
        let config = TopologyConfig::from_lookup(|_| None);
        assert_eq!(config, TopologyConfig::default());
        assert_eq!(config.state_key, DEFAULT_STATE_KEY);
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("TOPOLOGY_STATE_DIR", "/tmp/topology"),
            ("TOPOLOGY_XL_BINARY", "/usr/sbin/xl"),
            ("TOPOLOGY_VIF_SCRIPT", ""),
        ]
        .into_iter()
        .collect();

        let config = TopologyConfig::from_lookup(|name| vars.get(name).map(|v| v.to_string()));
        assert_eq!(config.state_dir, PathBuf::from("/tmp/topology"));
        assert_eq!(config.xl_binary, PathBuf::from("/usr/sbin/xl"));
        assert_eq!(config.vif_script, "vif-route-nexus");
    }
}
