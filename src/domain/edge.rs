// Copyright (c) 2025 - Cowboy AI, Inc.
//! Edge Identity
//!
//! An edge is the directed `(backend, frontend)` pair naming one attachment.
//! The single-space joined form `"backend frontend"` only exists at the
//! persistence boundary; everywhere else the two names stay separate.

use std::fmt;

use crate::errors::{TopologyError, TopologyResult};

/// Directed attachment identity between two domains
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId {
    backend: String,
    frontend: String,
}

impl EdgeId {
    /// Create an edge from backend and frontend domain names
    pub fn new(backend: impl Into<String>, frontend: impl Into<String>) -> Self {
        Self {
            backend: backend.into(),
            frontend: frontend.into(),
        }
    }

    /// Domain supplying the network segment
    pub fn backend(&self) -> &str {
        &self.backend
    }

    /// Domain consuming the network segment
    pub fn frontend(&self) -> &str {
        &self.frontend
    }

    /// True if `domain` is either endpoint
    pub fn touches(&self, domain: &str) -> bool {
        self.backend == domain || self.frontend == domain
    }

    /// True if both endpoints name the same domain
    pub fn is_self_loop(&self) -> bool {
        self.backend == self.frontend
    }

    /// Persisted key form, `"backend frontend"`
    pub fn wire_key(&self) -> String {
        format!("{} {}", self.backend, self.frontend)
    }

    /// Parse the persisted key form, splitting at the first space
    pub fn from_wire_key(key: &str) -> TopologyResult<Self> {
        match key.split_once(' ') {
            Some((backend, frontend)) if !backend.is_empty() && !frontend.is_empty() => {
                Ok(Self::new(backend, frontend))
            }
            _ => Err(TopologyError::MalformedValue(format!(
                "edge key {key:?} is not \"backend frontend\""
            ))),
        }
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.backend, self.frontend)
    }
}
