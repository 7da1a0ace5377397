// Copyright (c) 2025 - Cowboy AI, Inc.
//! Network Value Objects with Validation Invariants

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::{TopologyError, TopologyResult};

/// MAC Address value object
///
/// Represents the 48-bit hardware address handed to a frontend interface.
/// Invariants:
/// - Exactly six colon-separated octets
/// - Each octet is two lowercase hexadecimal digits
///
/// Unlike a general purpose MAC parser this one accepts only the canonical
/// form, so the string a domain declares is the string that gets persisted.
///
/// # Examples
///
/// ```rust
/// use cim_network_topology::domain::MacAddress;
///
/// let mac = MacAddress::new("00:16:3e:5e:6c:00").unwrap();
/// assert_eq!(mac.as_str(), "00:16:3e:5e:6c:00");
/// assert!(MacAddress::new("00:16:3E:5E:6C:00").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MacAddress([u8; 6]);

impl MacAddress {
    /// Create a new MAC address with validation
    ///
    /// # Invariants
    /// - Six octets separated by `:`
    /// - Two lowercase hex digits per octet
    pub fn new(mac: impl AsRef<str>) -> TopologyResult<Self> {
        let mac = mac.as_ref();
        let malformed = || TopologyError::MalformedValue(format!("invalid MAC address: {mac:?}"));

        let mut octets = [0u8; 6];
        let mut count = 0;
        for part in mac.split(':') {
            if count == octets.len() {
                return Err(malformed());
            }
            let valid = part.len() == 2
                && part
                    .bytes()
                    .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));
            if !valid {
                return Err(malformed());
            }
            octets[count] = u8::from_str_radix(part, 16).map_err(|_| malformed())?;
            count += 1;
        }

        if count != octets.len() {
            return Err(malformed());
        }

        Ok(Self(octets))
    }

    /// Create from raw octets
    pub fn from_octets(octets: [u8; 6]) -> Self {
        Self(octets)
    }

    /// Get as canonical string (lowercase, colon-separated)
    pub fn as_str(&self) -> String {
        format!(
            "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
            self.0[0], self.0[1], self.0[2], self.0[3], self.0[4], self.0[5]
        )
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for MacAddress {
    type Err = TopologyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for MacAddress {
    type Error = TopologyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<MacAddress> for String {
    fn from(mac: MacAddress) -> Self {
        mac.as_str()
    }
}
