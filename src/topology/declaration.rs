// Copyright (c) 2025 - Cowboy AI, Inc.
//! Declaration Parsing
//!
//! A domain declares the frontends it serves as backend, one per line:
//!
//! ```text
//! work
//! personal frontend_mac=00:16:3e:00:00:01
//!
//! vault
//! ```
//!
//! Each non-blank line is a frontend name optionally followed by a single
//! space and a [`Parameters`] string. A line without parameters yields the
//! empty value.

use tracing::warn;

use super::TopologyMap;
use crate::domain::Parameters;
use crate::errors::{TopologyError, TopologyResult};

/// One parsed line of a declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclarationLine {
    /// Frontend domain name
    pub frontend: String,

    /// Requested attachment parameters
    pub config: Parameters,
}

/// A single domain's declaration value substituted into a rescan
///
/// `value: None` means the declaration was removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclarationOverride {
    /// Domain whose declaration changed
    pub domain: String,

    /// New raw declaration, `None` when deleted
    pub value: Option<String>,
}

impl DeclarationOverride {
    /// Override with a new declaration value
    pub fn set(domain: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            value: Some(value.into()),
        }
    }

    /// Override removing the declaration
    pub fn delete(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            value: None,
        }
    }
}

/// A declaration that failed to parse
#[derive(Debug)]
pub struct RejectedDeclaration {
    /// Backend domain owning the declaration
    pub domain: String,

    /// Why it was rejected
    pub error: TopologyError,
}

/// Result of parsing every domain's declaration
#[derive(Debug, Default)]
pub struct ParsedDeclarations {
    /// Edges contributed by well-formed declarations
    pub topology: TopologyMap,

    /// Declarations that contributed nothing because they were malformed
    pub rejected: Vec<RejectedDeclaration>,
}

impl ParsedDeclarations {
    /// Rejection recorded for `domain`, if any
    pub fn rejection_for(&self, domain: &str) -> Option<&RejectedDeclaration> {
        self.rejected.iter().find(|r| r.domain == domain)
    }

    /// Take the rejection recorded for `domain`, if any
    pub fn take_rejection(&mut self, domain: &str) -> Option<RejectedDeclaration> {
        let index = self.rejected.iter().position(|r| r.domain == domain)?;
        Some(self.rejected.remove(index))
    }
}

/// Parse one backend's raw declaration
///
/// # Errors
/// - `MalformedValue` if any line carries bad parameters
/// - `MalformedValue` if a line names the backend itself
pub fn parse_declaration(backend: &str, raw: &str) -> TopologyResult<Vec<DeclarationLine>> {
    let mut lines = Vec::new();

    for line in raw.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let (frontend, config) = match line.split_once(' ') {
            Some((frontend, rest)) => (frontend, Parameters::parse(rest)?),
            None => (line, Parameters::empty()),
        };

        if frontend == backend {
            return Err(TopologyError::MalformedValue(format!(
                "domain {backend} declares an attachment to itself"
            )));
        }

        lines.push(DeclarationLine {
            frontend: frontend.to_string(),
            config,
        });
    }

    Ok(lines)
}

/// Parse a `(domain, declaration)` table into a desired topology
///
/// A malformed declaration contributes no edges and is reported in
/// [`ParsedDeclarations::rejected`]; the other domains are still parsed.
pub fn parse_declarations<I, K, V>(table: I) -> ParsedDeclarations
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut parsed = ParsedDeclarations::default();

    for (domain, raw) in table {
        let (domain, raw) = (domain.as_ref(), raw.as_ref());
        if raw.trim().is_empty() {
            continue;
        }

        match parse_declaration(domain, raw) {
            Ok(lines) => {
                for line in lines {
                    parsed
                        .topology
                        .conjoin(domain, line.frontend, line.config, None);
                }
            }
            Err(error) => {
                warn!("Rejected declaration of domain {}: {}", domain, error);
                parsed.rejected.push(RejectedDeclaration {
                    domain: domain.to_string(),
                    error,
                });
            }
        }
    }

    parsed
}
