// Copyright (c) 2025 - Cowboy AI, Inc.
//! Network attachment topology reconciliation
//!
//! Domains declare which frontends they serve as network backend. This crate
//! turns those declarations into a desired topology, diffs it against the
//! last known active topology and drives an attach/detach tool until the two
//! agree.
//!
//! ```text
//! declarations → TopologyMap (desired) ─┐
//!                                       ├→ diff → Reconciler → xl attach/detach
//! store → TopologyMap (active) ─────────┘              │
//!   ▲                                                  │
//!   └──────────────── save ← TopologyMap (active) ←────┘
//! ```

pub mod config;
pub mod diff;
pub mod directory;
pub mod domain;
pub mod errors;
pub mod interface;
pub mod reconciler;
pub mod state_machine;
pub mod store;
pub mod topology;

// Re-export commonly used types
pub use config::TopologyConfig;
pub use diff::{diff, Action, DiffEntry};
pub use directory::{DomainDirectory, DomainSnapshot, DomainState, InMemoryDirectory};
pub use domain::{EdgeId, MacAddress, Parameters};
pub use errors::{TopologyError, TopologyResult};
pub use interface::{InterfaceOps, ScriptedInterfaceOps, XlInterfaceTool};
pub use reconciler::{
    ActionOutcome, ActionStatus, EventOutcome, PassReport, PassScope, Reconciler, TopologyEvent,
};
pub use store::{ActiveStore, FileKeyValueStore, KeyValueStore, MemoryKeyValueStore};
pub use topology::{AttachmentRecord, DeclarationOverride, TopologyMap};
