// Copyright (c) 2025 - Cowboy AI, Inc.
//! Attachment Parameters
//!
//! Per-attachment configuration carried by every edge of a topology.
//!
//! # Canonical Encoding
//!
//! Parameters encode to a space-separated `key=value` list in a fixed field
//! order; absent fields are omitted and the empty value encodes to `""`.
//!
//! ```text
//! frontend_mac=00:16:3e:00:00:01
//! ```
//!
//! Equality and hashing are defined over this canonical string, so two values
//! parsed from differently spaced or differently ordered inputs compare equal
//! as long as they canonicalize to the same text. Unrecognized keys are
//! accepted and dropped.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use super::network::MacAddress;
use crate::errors::{TopologyError, TopologyResult};

const FRONTEND_MAC: &str = "frontend_mac";

/// Immutable per-attachment configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Parameters {
    frontend_mac: Option<MacAddress>,
}

impl Parameters {
    /// The empty parameters value
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse a `key=value` list
    ///
    /// # Errors
    /// - `MalformedValue` if a token has no `=`
    /// - `MalformedValue` if a recognized field fails its own validation
    pub fn parse(input: &str) -> TopologyResult<Self> {
        let mut params = Self::default();

        for token in input.split_whitespace() {
            let (key, value) = token.split_once('=').ok_or_else(|| {
                TopologyError::MalformedValue(format!("parameter {token:?} is not key=value"))
            })?;

            // Unknown keys are dropped.
            if key == FRONTEND_MAC {
                params.frontend_mac = Some(MacAddress::new(value)?);
            }
        }

        Ok(params)
    }

    /// Replace the frontend hardware address
    pub fn with_frontend_mac(mut self, mac: MacAddress) -> Self {
        self.frontend_mac = Some(mac);
        self
    }

    /// Hardware address to assign to the frontend interface
    pub fn frontend_mac(&self) -> Option<&MacAddress> {
        self.frontend_mac.as_ref()
    }

    /// True when no field is set
    pub fn is_empty(&self) -> bool {
        self.canonical().is_empty()
    }

    /// Canonical `key=value` encoding
    pub fn canonical(&self) -> String {
        let mut fields = Vec::new();
        if let Some(mac) = &self.frontend_mac {
            fields.push(format!("{FRONTEND_MAC}={mac}"));
        }
        fields.join(" ")
    }
}

impl fmt::Display for Parameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical())
    }
}

impl FromStr for Parameters {
    type Err = TopologyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl PartialEq for Parameters {
    fn eq(&self, other: &Self) -> bool {
        self.canonical() == other.canonical()
    }
}

impl Eq for Parameters {}

impl Hash for Parameters {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical().hash(state);
    }
}

impl TryFrom<String> for Parameters {
    type Error = TopologyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Parameters> for String {
    fn from(params: Parameters) -> Self {
        params.canonical()
    }
}
