// Copyright (c) 2025 - Cowboy AI, Inc.
//! Host Events
//!
//! The host delivers one event at a time; each maps to a single reconciler
//! entry point:
//!
//! | Event | Reconciler action |
//! |---|---|
//! | `DeclarationChanging` | preview the desired topology, nothing committed |
//! | `DeclarationChanged` | rescan with the carried value, reconcile the domain |
//! | `DomainStarted` | reconcile the domain |
//! | `DomainUnpaused` | reconcile the domain |
//! | `DomainShutdown` | tear down the domain's active edges |

use crate::topology::{DeclarationOverride, TopologyMap};

use super::report::PassReport;

/// Event delivered by the host integration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopologyEvent {
    /// A declaration is about to be set (`Some`) or deleted (`None`)
    DeclarationChanging { domain: String, value: Option<String> },

    /// A declaration was set (`Some`) or deleted (`None`)
    DeclarationChanged { domain: String, value: Option<String> },

    /// A domain started running
    DomainStarted { domain: String },

    /// A paused domain resumed
    DomainUnpaused { domain: String },

    /// A domain shut down
    DomainShutdown { domain: String },
}

impl TopologyEvent {
    /// Domain the event concerns
    pub fn domain(&self) -> &str {
        match self {
            TopologyEvent::DeclarationChanging { domain, .. }
            | TopologyEvent::DeclarationChanged { domain, .. }
            | TopologyEvent::DomainStarted { domain }
            | TopologyEvent::DomainUnpaused { domain }
            | TopologyEvent::DomainShutdown { domain } => domain,
        }
    }

    /// Declaration override carried by the event, if any
    pub fn declaration_override(&self) -> Option<DeclarationOverride> {
        match self {
            TopologyEvent::DeclarationChanging { domain, value }
            | TopologyEvent::DeclarationChanged { domain, value } => Some(DeclarationOverride {
                domain: domain.clone(),
                value: value.clone(),
            }),
            _ => None,
        }
    }
}

/// What handling an event produced
#[derive(Debug, Clone)]
pub enum EventOutcome {
    /// Desired topology computed for validation only
    Previewed(TopologyMap),

    /// A reconciliation pass ran
    Reconciled(PassReport),
}

impl EventOutcome {
    /// The pass report, if a pass ran
    pub fn report(&self) -> Option<&PassReport> {
        match self {
            EventOutcome::Reconciled(report) => Some(report),
            EventOutcome::Previewed(_) => None,
        }
    }
}
