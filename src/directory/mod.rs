// Copyright (c) 2025 - Cowboy AI, Inc.
//! Domain Directory
//!
//! The reconciler asks the host which domains exist, whether they are running
//! and paused, and what attachment declaration each one carries. Liveness is
//! queried at apply time for every action, never cached.
//!
//! [`InMemoryDirectory`] is a shareable in-process implementation used by
//! tests and by the `topology-reconcile` binary, which loads it from a JSON
//! snapshot.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};

use crate::errors::{TopologyError, TopologyResult};

/// Observed run state of a domain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DomainState {
    pub running: bool,
    pub paused: bool,
}

impl DomainState {
    /// Running and not paused
    pub fn is_live(&self) -> bool {
        self.running && !self.paused
    }
}

/// Host view of domains and their declarations
#[async_trait]
pub trait DomainDirectory: Send + Sync {
    /// Run state of `name`, `None` if no such domain exists
    async fn domain_state(&self, name: &str) -> TopologyResult<Option<DomainState>>;

    /// Every domain with its raw attachment declaration, empty when it has none
    async fn declarations(&self) -> TopologyResult<Vec<(String, String)>>;

    /// Whether `name` exists, is running and is not paused
    async fn is_live(&self, name: &str) -> TopologyResult<bool> {
        Ok(self
            .domain_state(name)
            .await?
            .is_some_and(|state| state.is_live()))
    }
}

/// One domain entry of a directory snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainSnapshot {
    pub name: String,
    #[serde(default)]
    pub running: bool,
    #[serde(default)]
    pub paused: bool,
    #[serde(default)]
    pub declaration: Option<String>,
}

impl DomainSnapshot {
    /// A running, unpaused domain without declaration
    pub fn running(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            running: true,
            paused: false,
            declaration: None,
        }
    }

    /// Set the raw declaration
    pub fn declaring(mut self, declaration: impl Into<String>) -> Self {
        self.declaration = Some(declaration.into());
        self
    }
}

/// Shared in-memory directory
///
/// Clones share the same domain table, so a test can keep a handle and flip
/// domain states while the reconciler owns another.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDirectory {
    domains: Arc<RwLock<Vec<DomainSnapshot>>>,
}

impl InMemoryDirectory {
    /// Create an empty directory
    pub fn new() -> Self {
        Self::default()
    }

    /// Create from snapshot entries, keeping their order
    pub fn from_snapshot(domains: Vec<DomainSnapshot>) -> Self {
        Self {
            domains: Arc::new(RwLock::new(domains)),
        }
    }

    /// Parse a JSON array of [`DomainSnapshot`]
    pub fn from_json(json: &str) -> TopologyResult<Self> {
        let domains: Vec<DomainSnapshot> = serde_json::from_str(json)
            .map_err(|e| TopologyError::Directory(format!("invalid snapshot: {e}")))?;
        Ok(Self::from_snapshot(domains))
    }

    /// Add or replace a domain
    pub fn insert(&self, domain: DomainSnapshot) {
        let mut domains = self.write();
        match domains.iter_mut().find(|d| d.name == domain.name) {
            Some(existing) => *existing = domain,
            None => domains.push(domain),
        }
    }

    /// Remove a domain
    pub fn remove(&self, name: &str) {
        self.write().retain(|d| d.name != name);
    }

    /// Set the running flag of an existing domain
    pub fn set_running(&self, name: &str, running: bool) {
        self.update(name, |d| d.running = running);
    }

    /// Set the paused flag of an existing domain
    pub fn set_paused(&self, name: &str, paused: bool) {
        self.update(name, |d| d.paused = paused);
    }

    /// Replace the declaration of an existing domain
    pub fn set_declaration(&self, name: &str, declaration: Option<String>) {
        self.update(name, |d| d.declaration = declaration);
    }

    /// Names of all domains, in insertion order
    pub fn names(&self) -> Vec<String> {
        self.read().iter().map(|d| d.name.clone()).collect()
    }

    fn update(&self, name: &str, apply: impl FnOnce(&mut DomainSnapshot)) {
        if let Some(domain) = self.write().iter_mut().find(|d| d.name == name) {
            apply(domain);
        }
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Vec<DomainSnapshot>> {
        self.domains.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Vec<DomainSnapshot>> {
        self.domains.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl DomainDirectory for InMemoryDirectory {
    async fn domain_state(&self, name: &str) -> TopologyResult<Option<DomainState>> {
        Ok(self
            .read()
            .iter()
            .find(|d| d.name == name)
            .map(|d| DomainState {
                running: d.running,
                paused: d.paused,
            }))
    }

    async fn declarations(&self) -> TopologyResult<Vec<(String, String)>> {
        Ok(self
            .read()
            .iter()
            .map(|d| (d.name.clone(), d.declaration.clone().unwrap_or_default()))
            .collect())
    }
}
