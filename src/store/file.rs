// Copyright (c) 2025 - Cowboy AI, Inc.
//! File-backed key-value store
//!
//! Each key is one file inside a state directory. Leading slashes are
//! stripped and remaining slashes flattened, so `/active-network-topology`
//! lives at `<dir>/active-network-topology`. Writes go to a temporary file
//! that is renamed over the target.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::KeyValueStore;
use crate::errors::{TopologyError, TopologyResult};

/// Key-value store rooted at a directory
#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    root: PathBuf,
}

impl FileKeyValueStore {
    /// Store files under `root`, created on first write
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory holding the files
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File backing `key`
    pub fn path_for(&self, key: &str) -> TopologyResult<PathBuf> {
        let name = key.trim_start_matches('/').replace('/', "_");
        if name.is_empty() || name == "." || name == ".." {
            return Err(TopologyError::PersistenceFailed(format!(
                "invalid store key {key:?}"
            )));
        }
        Ok(self.root.join(name))
    }
}

#[async_trait]
impl KeyValueStore for FileKeyValueStore {
    async fn read(&self, key: &str) -> TopologyResult<Option<Vec<u8>>> {
        let path = self.path_for(key)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(TopologyError::PersistenceFailed(format!(
                "reading {}: {}",
                path.display(),
                e
            ))),
        }
    }

    async fn write(&self, key: &str, value: &[u8]) -> TopologyResult<()> {
        let path = self.path_for(key)?;
        let staging = path.with_extension("tmp");
        let failed = |e: std::io::Error| {
            TopologyError::PersistenceFailed(format!("writing {}: {}", path.display(), e))
        };

        tokio::fs::create_dir_all(&self.root).await.map_err(failed)?;
        tokio::fs::write(&staging, value).await.map_err(failed)?;
        tokio::fs::rename(&staging, &path).await.map_err(failed)?;
        Ok(())
    }
}
