// Copyright (c) 2025 - Cowboy AI, Inc.
//! Persisted Form of a Topology Map
//!
//! The active topology is stored as a JSON object keyed by `"backend frontend"`
//! with a two element array per edge:
//!
//! ```json
//! {
//!   "sys-net work": ["frontend_mac=00:16:3e:00:00:01", "3"],
//!   "sys-net vault": ["", null]
//! }
//! ```
//!
//! Entries are written and read back in map order.

use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use super::TopologyMap;
use crate::domain::{EdgeId, Parameters};
use crate::errors::TopologyResult;

impl Serialize for TopologyMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (edge, record) in self.iter() {
            let value = (record.config.canonical(), record.interface_id.as_deref());
            map.serialize_entry(&edge.wire_key(), &value)?;
        }
        map.end()
    }
}

struct TopologyMapVisitor;

impl<'de> Visitor<'de> for TopologyMapVisitor {
    type Value = TopologyMap;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map of \"backend frontend\" to [config, interface id]")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut topology = TopologyMap::new();
        while let Some((key, (config, interface_id))) =
            access.next_entry::<String, (String, Option<String>)>()?
        {
            let edge = EdgeId::from_wire_key(&key).map_err(de::Error::custom)?;
            let config = Parameters::parse(&config).map_err(de::Error::custom)?;
            topology.conjoin(edge.backend(), edge.frontend(), config, interface_id);
        }
        Ok(topology)
    }
}

impl<'de> Deserialize<'de> for TopologyMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(TopologyMapVisitor)
    }
}

impl TopologyMap {
    /// Encode as persisted JSON
    pub fn to_json(&self) -> TopologyResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode persisted JSON
    pub fn from_json(json: &str) -> TopologyResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
