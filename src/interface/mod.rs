// Copyright (c) 2025 - Cowboy AI, Inc.
//! Network Interface Operations
//!
//! The reconciler never creates interfaces itself; it asks an external tool
//! to attach a backend to a frontend and remembers the interface id it gets
//! back, which is the only handle that can later detach it.
//!
//! Neither call is idempotent. Attaching an already attached pair may fail
//! or create a second interface, so callers guard with the active topology.
//!
//! # Implementations
//!
//! - [`XlInterfaceTool`] - drives the Xen `xl` command line tool
//! - [`ScriptedInterfaceOps`] - records calls and injects failures

pub mod scripted;
pub mod xl;

use async_trait::async_trait;

use crate::domain::Parameters;
use crate::errors::TopologyResult;

pub use scripted::{InterfaceCall, ScriptedInterfaceOps};
pub use xl::XlInterfaceTool;

/// Attach/detach collaborator
#[async_trait]
pub trait InterfaceOps: Send + Sync {
    /// Attach `backend` to `frontend`, returning the new interface id
    ///
    /// # Errors
    /// - `ExternalOperationFailed` if the tool reports failure
    async fn attach(&self, backend: &str, frontend: &str, config: &Parameters)
        -> TopologyResult<String>;

    /// Detach interface `interface_id` from `frontend`
    ///
    /// # Errors
    /// - `ExternalOperationFailed` if the tool reports failure
    async fn detach(&self, frontend: &str, interface_id: &str) -> TopologyResult<()>;
}
