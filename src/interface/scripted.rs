// Copyright (c) 2025 - Cowboy AI, Inc.
//! Scripted interface operations
//!
//! Records every call and hands out sequential interface ids. Failures can be
//! injected for all calls or for individual edges, which is how the
//! reconciler's partial-failure behavior is exercised.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use super::InterfaceOps;
use crate::domain::{EdgeId, Parameters};
use crate::errors::{TopologyError, TopologyResult};

/// A recorded collaborator call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InterfaceCall {
    Attach {
        backend: String,
        frontend: String,
        config: Parameters,
    },
    Detach {
        frontend: String,
        interface_id: String,
    },
}

#[derive(Debug, Default)]
struct ScriptState {
    next_id: u64,
    calls: Vec<InterfaceCall>,
    fail_all_attaches: bool,
    fail_all_detaches: bool,
    failing_attaches: HashSet<EdgeId>,
    failing_detaches: HashSet<String>,
}

/// Recording attach/detach double with failure injection
///
/// Clones share the same script and call log.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInterfaceOps {
    state: Arc<Mutex<ScriptState>>,
}

impl ScriptedInterfaceOps {
    /// Create a script where every call succeeds
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every attach fail (or succeed again)
    pub fn fail_attaches(&self, fail: bool) {
        self.lock().fail_all_attaches = fail;
    }

    /// Make every detach fail (or succeed again)
    pub fn fail_detaches(&self, fail: bool) {
        self.lock().fail_all_detaches = fail;
    }

    /// Make attaching this edge fail
    pub fn fail_attach_of(&self, backend: &str, frontend: &str) {
        self.lock()
            .failing_attaches
            .insert(EdgeId::new(backend, frontend));
    }

    /// Make detaching this interface id fail
    pub fn fail_detach_of(&self, interface_id: &str) {
        self.lock().failing_detaches.insert(interface_id.to_string());
    }

    /// Every call made so far, failed ones included
    pub fn calls(&self) -> Vec<InterfaceCall> {
        self.lock().calls.clone()
    }

    /// Number of detach calls made so far
    pub fn detach_count(&self) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|call| matches!(call, InterfaceCall::Detach { .. }))
            .count()
    }

    /// Forget recorded calls
    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    fn lock(&self) -> MutexGuard<'_, ScriptState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl InterfaceOps for ScriptedInterfaceOps {
    async fn attach(
        &self,
        backend: &str,
        frontend: &str,
        config: &Parameters,
    ) -> TopologyResult<String> {
        let mut state = self.lock();
        state.calls.push(InterfaceCall::Attach {
            backend: backend.to_string(),
            frontend: frontend.to_string(),
            config: config.clone(),
        });

        if state.fail_all_attaches
            || state
                .failing_attaches
                .contains(&EdgeId::new(backend, frontend))
        {
            return Err(TopologyError::external(
                "attach",
                format!("{backend} -> {frontend}"),
                "injected failure",
            ));
        }

        let id = state.next_id;
        state.next_id += 1;
        Ok(id.to_string())
    }

    async fn detach(&self, frontend: &str, interface_id: &str) -> TopologyResult<()> {
        let mut state = self.lock();
        state.calls.push(InterfaceCall::Detach {
            frontend: frontend.to_string(),
            interface_id: interface_id.to_string(),
        });

        if state.fail_all_detaches || state.failing_detaches.contains(interface_id) {
            return Err(TopologyError::external(
                "detach",
                format!("{frontend} interface {interface_id}"),
                "injected failure",
            ));
        }

        Ok(())
    }
}
