// Copyright (c) 2025 - Cowboy AI, Inc.
//! Topology Map
//!
//! An insertion-ordered mapping from [`EdgeId`] to [`AttachmentRecord`].
//!
//! Two instances exist at runtime:
//!
//! - **Desired**: built from the declarations every domain carries
//! - **Active**: the last known real attachments, persisted between runs
//!
//! ```text
//! declarations ──parse──> Desired ──┐
//!                                   ├──diff──> [+/- actions] ──> Reconciler
//! store ──────────load──> Active ───┘                              │
//!   ▲                                                              │
//!   └──────────────────────────save─── Active (mutated) <──────────┘
//! ```
//!
//! Insertion order is kept so diff output is deterministic: overwriting an
//! edge keeps its position, removing and re-adding moves it to the end.
//! Lookups go through a backend → frontend index into the ordered entries,
//! so a diff is linear in the size of both maps. Removal shifts the entries
//! after it and is linear in the map size.

pub mod declaration;
pub mod wire;

use crate::domain::{EdgeId, Parameters};
use crate::errors::{TopologyError, TopologyResult};

use std::collections::HashMap;

pub use declaration::{
    parse_declaration, parse_declarations, DeclarationLine, DeclarationOverride,
    ParsedDeclarations, RejectedDeclaration,
};

/// Configuration and assigned interface of one attachment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentRecord {
    /// Requested parameters
    pub config: Parameters,

    /// Identifier returned by the attach tool, `None` before attaching
    pub interface_id: Option<String>,
}

impl AttachmentRecord {
    /// Create a record
    pub fn new(config: Parameters, interface_id: Option<String>) -> Self {
        Self {
            config,
            interface_id,
        }
    }
}

/// Ordered edge → attachment mapping
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopologyMap {
    entries: Vec<(EdgeId, AttachmentRecord)>,
    // backend -> frontend -> position in `entries`
    index: HashMap<String, HashMap<String, usize>>,
}

impl TopologyMap {
    /// Create an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the desired topology from `(domain, declaration)` pairs
    ///
    /// Fails on the first malformed declaration. Use
    /// [`parse_declarations`] to collect rejections instead.
    pub fn from_declarations<I, K, V>(table: I) -> TopologyResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let parsed = parse_declarations(table);
        match parsed.rejected.into_iter().next() {
            Some(rejected) => Err(rejected.error),
            None => Ok(parsed.topology),
        }
    }

    /// Insert or overwrite the record for `(backend, frontend)`
    pub fn conjoin(
        &mut self,
        backend: impl Into<String>,
        frontend: impl Into<String>,
        config: Parameters,
        interface_id: Option<String>,
    ) {
        let edge = EdgeId::new(backend, frontend);
        let record = AttachmentRecord::new(config, interface_id);
        match self.position(edge.backend(), edge.frontend()) {
            Some(index) => self.entries[index].1 = record,
            None => {
                self.index
                    .entry(edge.backend().to_string())
                    .or_default()
                    .insert(edge.frontend().to_string(), self.entries.len());
                self.entries.push((edge, record));
            }
        }
    }

    /// Remove the record for `(backend, frontend)`
    ///
    /// # Errors
    /// - `NotFound` if the edge is absent
    pub fn disjoin(&mut self, backend: &str, frontend: &str) -> TopologyResult<AttachmentRecord> {
        let index = self
            .position(backend, frontend)
            .ok_or_else(|| TopologyError::not_found(backend, frontend))?;
        let (_, record) = self.entries.remove(index);

        if let Some(frontends) = self.index.get_mut(backend) {
            frontends.remove(frontend);
            if frontends.is_empty() {
                self.index.remove(backend);
            }
        }
        for (shifted, (edge, _)) in self.entries.iter().enumerate().skip(index) {
            if let Some(slot) = self
                .index
                .get_mut(edge.backend())
                .and_then(|frontends| frontends.get_mut(edge.frontend()))
            {
                *slot = shifted;
            }
        }
        Ok(record)
    }

    /// Interface id of the edge, `None` if absent or not yet attached
    pub fn interface_id(&self, backend: &str, frontend: &str) -> Option<&str> {
        self.record(backend, frontend)
            .and_then(|record| record.interface_id.as_deref())
    }

    /// Configuration of the edge, `None` if absent
    pub fn config(&self, backend: &str, frontend: &str) -> Option<&Parameters> {
        self.record(backend, frontend).map(|record| &record.config)
    }

    /// Full record of the edge
    pub fn record(&self, backend: &str, frontend: &str) -> Option<&AttachmentRecord> {
        self.position(backend, frontend)
            .map(|index| &self.entries[index].1)
    }

    /// Lookup by edge identity
    pub fn get(&self, edge: &EdgeId) -> Option<&AttachmentRecord> {
        self.record(edge.backend(), edge.frontend())
    }

    /// True if the edge exists
    pub fn contains(&self, edge: &EdgeId) -> bool {
        self.position(edge.backend(), edge.frontend()).is_some()
    }

    /// All frontends attached to `backend`, in map order
    pub fn frontends(&self, backend: &str) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(edge, _)| edge.backend() == backend)
            .map(|(edge, _)| edge.frontend())
            .collect()
    }

    /// All backends serving `frontend`, in map order
    pub fn backends(&self, frontend: &str) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(edge, _)| edge.frontend() == frontend)
            .map(|(edge, _)| edge.backend())
            .collect()
    }

    /// Every edge touching `domain`: edges where it is the frontend first,
    /// then edges where it is the backend
    pub fn connections(&self, domain: &str) -> Vec<EdgeId> {
        let as_frontend = self
            .backends(domain)
            .into_iter()
            .map(|backend| EdgeId::new(backend, domain));
        let as_backend = self
            .frontends(domain)
            .into_iter()
            .map(|frontend| EdgeId::new(domain, frontend));
        as_frontend.chain(as_backend).collect()
    }

    /// Iterate edges in map order
    pub fn iter(&self) -> impl Iterator<Item = (&EdgeId, &AttachmentRecord)> {
        self.entries.iter().map(|(edge, record)| (edge, record))
    }

    /// Iterate edge identities in map order
    pub fn edges(&self) -> impl Iterator<Item = &EdgeId> {
        self.entries.iter().map(|(edge, _)| edge)
    }

    /// Number of edges
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if there are no edges
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, backend: &str, frontend: &str) -> Option<usize> {
        self.index.get(backend)?.get(frontend).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn two_frontends() -> TopologyMap {
        TopologyMap::from_declarations([("a", "b\nc")]).unwrap()
    }

    #[test]
    fn test_from_declarations() {
        let map = two_frontends();
        assert_eq!(map.len(), 2);
        for frontend in ["b", "c"] {
            let record = map.record("a", frontend).unwrap();
            assert_eq!(record.config, Parameters::empty());
            assert_eq!(record.interface_id, None);
        }
    }

    #[test]
    fn test_backends_and_frontends() {
        let map = two_frontends();
        assert_eq!(map.backends("b"), vec!["a"]);
        assert_eq!(map.backends("c"), vec!["a"]);
        assert!(map.backends("d").is_empty());
        assert_eq!(map.frontends("a"), vec!["b", "c"]);
    }

    #[test]
    fn test_disjoin_reconjoin_moves_edge_to_end() {
        let mut map = two_frontends();
        map.disjoin("a", "b").unwrap();
        assert_eq!(map.frontends("a"), vec!["c"]);
        map.conjoin("a", "b", Parameters::empty(), Some("1".to_string()));
        assert_eq!(map.frontends("a"), vec!["c", "b"]);
    }

    #[test]
    fn test_conjoin_overwrite_keeps_position() {
        let mut map = two_frontends();
        map.conjoin("a", "b", Parameters::empty(), Some("7".to_string()));
        assert_eq!(map.frontends("a"), vec!["b", "c"]);
        assert_eq!(map.interface_id("a", "b"), Some("7"));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_lookups_survive_removal_from_the_middle() {
        let mut map = TopologyMap::new();
        for i in 0..50 {
            map.conjoin("net", format!("vm{i}"), Parameters::empty(), Some(i.to_string()));
        }
        for i in (0..50).step_by(3) {
            map.disjoin("net", &format!("vm{i}")).unwrap();
        }

        assert_eq!(map.len(), 33);
        for i in 0..50 {
            let expected = (i % 3 != 0).then(|| i.to_string());
            assert_eq!(map.interface_id("net", &format!("vm{i}")), expected.as_deref());
        }

        map.conjoin("net", "vm1", Parameters::empty(), Some("overwritten".to_string()));
        assert_eq!(map.frontends("net")[0], "vm1");
        assert_eq!(map.interface_id("net", "vm1"), Some("overwritten"));
        map.disjoin("net", "vm2").unwrap();
        assert_eq!(map.interface_id("net", "vm49"), Some("49"));
        assert_eq!(map, {
            let mut rebuilt = TopologyMap::new();
            for (edge, record) in map.iter() {
                rebuilt.conjoin(
                    edge.backend(),
                    edge.frontend(),
                    record.config.clone(),
                    record.interface_id.clone(),
                );
            }
            rebuilt
        });
    }

    #[test]
    fn test_disjoin_missing_edge_is_not_found() {
        let mut map = two_frontends();
        let err = map.disjoin("a", "z").unwrap_err();
        assert!(matches!(
            err,
            TopologyError::NotFound {
                ref backend,
                ref frontend,
            } if backend == "a" && frontend == "z"
        ));
    }

    #[test]
    fn test_interface_id_of_missing_edge_is_none() {
        let map = two_frontends();
        assert_eq!(map.interface_id("x", "y"), None);
        assert_eq!(map.interface_id("a", "b"), None);
        assert_eq!(map.config("x", "y"), None);
    }

    #[test]
    fn test_connections_lists_backend_side_first() {
        let mut map = TopologyMap::new();
        map.conjoin("m", "x", Parameters::empty(), None);
        map.conjoin("net", "m", Parameters::empty(), None);
        map.conjoin("m", "y", Parameters::empty(), None);
        map.conjoin("vpn", "m", Parameters::empty(), None);

        assert_eq!(
            map.connections("m"),
            vec![
                EdgeId::new("net", "m"),
                EdgeId::new("vpn", "m"),
                EdgeId::new("m", "x"),
                EdgeId::new("m", "y"),
            ]
        );
        assert!(map.connections("nobody").is_empty());
    }
}
