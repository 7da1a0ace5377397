// Copyright (c) 2025 - Cowboy AI, Inc.
//! Durable Active Topology Store
//!
//! The active topology is the only state that survives a restart. It is kept
//! under one well-known key of a key-value store as UTF-8 JSON (see
//! [`crate::topology::wire`]).
//!
//! # Load Semantics
//!
//! - Absent key → empty topology
//! - Unparseable content → empty topology, with a warning
//! - Read failure → `PersistenceFailed`
//!
//! Writes are unconditional. There is no versioning, so two writers racing
//! on the same key lose updates; callers serialize access.

pub mod file;
pub mod memory;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::errors::{TopologyError, TopologyResult};
use crate::topology::TopologyMap;

pub use file::FileKeyValueStore;
pub use memory::MemoryKeyValueStore;

/// Byte-oriented key-value store
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read a key, `None` if absent
    async fn read(&self, key: &str) -> TopologyResult<Option<Vec<u8>>>;

    /// Write a key, replacing any previous value
    async fn write(&self, key: &str, value: &[u8]) -> TopologyResult<()>;
}

/// Loads and saves the active topology under a single key
#[derive(Debug, Clone)]
pub struct ActiveStore<S> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> ActiveStore<S> {
    /// Wrap `store`, using `key` for the active topology
    pub fn new(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// Key holding the active topology
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Underlying key-value store
    pub fn inner(&self) -> &S {
        &self.store
    }

    /// Load the active topology
    pub async fn load(&self) -> TopologyResult<TopologyMap> {
        let Some(bytes) = self.store.read(&self.key).await? else {
            debug!("No active topology stored under {}", self.key);
            return Ok(TopologyMap::new());
        };

        let decoded = std::str::from_utf8(&bytes)
            .map_err(|e| TopologyError::MalformedValue(e.to_string()))
            .and_then(|text| {
                if text.trim().is_empty() {
                    Ok(TopologyMap::new())
                } else {
                    TopologyMap::from_json(text)
                }
            });

        match decoded {
            Ok(topology) => Ok(topology),
            Err(e) => {
                warn!(
                    "Discarding unreadable active topology under {}: {}",
                    self.key, e
                );
                Ok(TopologyMap::new())
            }
        }
    }

    /// Persist the active topology
    pub async fn save(&self, topology: &TopologyMap) -> TopologyResult<()> {
        let json = topology.to_json()?;
        self.store.write(&self.key, json.as_bytes()).await?;
        debug!("Saved {} active edges under {}", topology.len(), self.key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Parameters;

    const KEY: &str = "/active-network-topology";

    #[tokio::test]
    async fn test_absent_key_loads_empty() {
        let store = ActiveStore::new(MemoryKeyValueStore::new(), KEY);
        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_content_loads_empty() {
        let cases: [&[u8]; 5] = [
            b"{not json",
            b"[1, 2]",
            b"{\"ab\": [\"\", null]}",
            b"\xff\xfe",
            b"",
        ];

        for content in cases {
            let memory = MemoryKeyValueStore::new();
            memory.write(KEY, content).await.unwrap();
            let store = ActiveStore::new(memory, KEY);
            assert!(store.load().await.unwrap().is_empty());
        }
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let store = ActiveStore::new(MemoryKeyValueStore::new(), KEY);
        let mut topology = TopologyMap::new();
        topology.conjoin("a", "b", Parameters::empty(), Some("2".to_string()));

        store.save(&topology).await.unwrap();
        assert_eq!(store.load().await.unwrap(), topology);
        assert_eq!(
            store.inner().get(KEY).as_deref(),
            Some(br#"{"a b":["","2"]}"#.as_slice())
        );
    }

    #[tokio::test]
    async fn test_read_failure_is_persistence_error() {
        let memory = MemoryKeyValueStore::new();
        memory.fail_reads(true);
        let store = ActiveStore::new(memory, KEY);
        assert!(matches!(
            store.load().await,
            Err(TopologyError::PersistenceFailed(_))
        ));
    }
}
