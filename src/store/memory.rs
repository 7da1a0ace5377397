// Copyright (c) 2025 - Cowboy AI, Inc.
//! In-memory key-value store with fault injection

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use super::KeyValueStore;
use crate::errors::{TopologyError, TopologyResult};

#[derive(Debug, Default)]
struct MemoryState {
    entries: HashMap<String, Vec<u8>>,
    fail_reads: bool,
    fail_writes: bool,
    writes: usize,
}

/// Process-local store; clones share contents
#[derive(Debug, Clone, Default)]
pub struct MemoryKeyValueStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryKeyValueStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Make reads fail (or succeed again)
    pub fn fail_reads(&self, fail: bool) {
        self.lock().fail_reads = fail;
    }

    /// Make writes fail (or succeed again)
    pub fn fail_writes(&self, fail: bool) {
        self.lock().fail_writes = fail;
    }

    /// Current value of `key`, bypassing fault injection
    pub fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.lock().entries.get(key).cloned()
    }

    /// Number of successful writes
    pub fn write_count(&self) -> usize {
        self.lock().writes
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl KeyValueStore for MemoryKeyValueStore {
    async fn read(&self, key: &str) -> TopologyResult<Option<Vec<u8>>> {
        let state = self.lock();
        if state.fail_reads {
            return Err(TopologyError::PersistenceFailed(format!(
                "injected read failure for {key}"
            )));
        }
        Ok(state.entries.get(key).cloned())
    }

    async fn write(&self, key: &str, value: &[u8]) -> TopologyResult<()> {
        let mut state = self.lock();
        if state.fail_writes {
            return Err(TopologyError::PersistenceFailed(format!(
                "injected write failure for {key}"
            )));
        }
        state.entries.insert(key.to_string(), value.to_vec());
        state.writes += 1;
        Ok(())
    }
}
