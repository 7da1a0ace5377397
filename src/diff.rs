// Copyright (c) 2025 - Cowboy AI, Inc.
//! Diff Engine
//!
//! Pure computation of the actions that bring the active topology in line
//! with the desired one. Actions are returned as data; nothing here touches
//! a domain or the store.
//!
//! # Ordering
//!
//! 1. Edges only in desired, in desired order: `+` with the desired config
//! 2. Edges only in active, in active order: `-` with the active config
//! 3. Edges in both with a different canonical config, in desired order:
//!    `-` with the active config immediately followed by `+` with the
//!    desired config
//!
//! A live attachment cannot be reconfigured, so a config change is always a
//! teardown followed by a rebuild.
//!
//! When scoped to a domain, the full list is filtered to entries touching
//! that domain without reordering.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::{EdgeId, Parameters};
use crate::topology::TopologyMap;

/// Direction of a topology change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Attach the backend to the frontend
    Add,
    /// Detach the backend from the frontend
    Remove,
}

impl Action {
    /// Short symbol used in plans and logs
    pub fn symbol(&self) -> &'static str {
        match self {
            Action::Add => "+",
            Action::Remove => "-",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// One step of a reconciliation plan
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DiffEntry {
    pub action: Action,
    pub edge: EdgeId,
    pub config: Parameters,
}

impl DiffEntry {
    pub fn new(action: Action, edge: EdgeId, config: Parameters) -> Self {
        Self {
            action,
            edge,
            config,
        }
    }

    pub fn backend(&self) -> &str {
        self.edge.backend()
    }

    pub fn frontend(&self) -> &str {
        self.edge.frontend()
    }
}

impl fmt::Display for DiffEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.action, self.backend(), self.frontend())?;
        if !self.config.is_empty() {
            write!(f, " {}", self.config)?;
        }
        Ok(())
    }
}

/// Compute the ordered actions turning `active` into `desired`
pub fn diff(
    desired: &TopologyMap,
    active: &TopologyMap,
    limit_to_domain: Option<&str>,
) -> Vec<DiffEntry> {
    let mut entries = Vec::new();

    for (edge, record) in desired.iter() {
        if !active.contains(edge) {
            entries.push(DiffEntry::new(Action::Add, edge.clone(), record.config.clone()));
        }
    }

    for (edge, record) in active.iter() {
        if !desired.contains(edge) {
            entries.push(DiffEntry::new(
                Action::Remove,
                edge.clone(),
                record.config.clone(),
            ));
        }
    }

    for (edge, wanted) in desired.iter() {
        let Some(current) = active.get(edge) else {
            continue;
        };
        if wanted.config.canonical() != current.config.canonical() {
            entries.push(DiffEntry::new(
                Action::Remove,
                edge.clone(),
                current.config.clone(),
            ));
            entries.push(DiffEntry::new(Action::Add, edge.clone(), wanted.config.clone()));
        }
    }

    if let Some(domain) = limit_to_domain {
        entries.retain(|entry| entry.edge.touches(domain));
    }

    entries
}

impl TopologyMap {
    /// Actions that bring `active` in line with `self`
    pub fn diff(&self, active: &TopologyMap, limit_to_domain: Option<&str>) -> Vec<DiffEntry> {
        diff(self, active, limit_to_domain)
    }
}
