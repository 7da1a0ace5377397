// Copyright (c) 2025 - Cowboy AI, Inc.
//! Test Fixtures for cim-network-topology
//!
//! Builds a reconciler wired to in-memory collaborators. Every collaborator
//! is a shared handle, so tests keep a clone to flip domain states, inject
//! failures and inspect calls while the reconciler owns the other clone.

#![allow(dead_code)]

use std::io::Write;
use std::sync::{Arc, Mutex};

use tracing_subscriber::fmt::MakeWriter;

use cim_network_topology::config::DEFAULT_STATE_KEY;
use cim_network_topology::{
    ActiveStore, DomainSnapshot, InMemoryDirectory, MemoryKeyValueStore, Parameters, Reconciler,
    ScriptedInterfaceOps,
};

pub const MAC_1: &str = "12:12:12:12:12:12";

pub type TestReconciler = Reconciler<InMemoryDirectory, ScriptedInterfaceOps, MemoryKeyValueStore>;

/// Reconciler plus handles on its collaborators
pub struct Harness {
    pub directory: InMemoryDirectory,
    pub interfaces: ScriptedInterfaceOps,
    pub kv: MemoryKeyValueStore,
    pub reconciler: TestReconciler,
}

impl Harness {
    pub fn new(domains: Vec<DomainSnapshot>) -> Self {
        Self::with_store(domains, MemoryKeyValueStore::new())
    }

    pub fn with_store(domains: Vec<DomainSnapshot>, kv: MemoryKeyValueStore) -> Self {
        let directory = InMemoryDirectory::from_snapshot(domains);
        let interfaces = ScriptedInterfaceOps::new();
        let reconciler = Reconciler::new(
            directory.clone(),
            interfaces.clone(),
            ActiveStore::new(kv.clone(), DEFAULT_STATE_KEY),
        );
        Self {
            directory,
            interfaces,
            kv,
            reconciler,
        }
    }

    /// Persisted active topology as text
    pub fn persisted(&self) -> Option<String> {
        self.kv
            .get(DEFAULT_STATE_KEY)
            .map(|bytes| String::from_utf8(bytes).expect("persisted topology is not utf-8"))
    }

    /// Interface id recorded in the active topology
    pub fn interface_id(&self, backend: &str, frontend: &str) -> Option<String> {
        self.reconciler
            .active()
            .and_then(|active| active.interface_id(backend, frontend))
            .map(str::to_string)
    }

    pub fn has_active_edge(&self, backend: &str, frontend: &str) -> bool {
        self.reconciler
            .active()
            .is_some_and(|active| active.record(backend, frontend).is_some())
    }
}

/// `sys-net` serving `work`, both running
pub fn net_serving_work() -> Harness {
    Harness::new(vec![
        DomainSnapshot::running("sys-net").declaring("work"),
        DomainSnapshot::running("work"),
    ])
}

pub fn mac_parameters() -> Parameters {
    Parameters::parse(&format!("frontend_mac={MAC_1}")).expect("Invalid fixture parameters")
}

/// In-memory log sink for asserting on emitted events
#[derive(Clone, Default)]
pub struct LogCapture {
    buffer: Arc<Mutex<Vec<u8>>>,
}

pub struct LogCaptureGuard {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl LogCapture {
    /// Install as the thread's default subscriber until the guard drops
    pub fn install(&self) -> tracing::subscriber::DefaultGuard {
        let subscriber = tracing_subscriber::fmt()
            .with_writer(self.clone())
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    /// Captured lines containing `needle`
    pub fn lines_with(&self, needle: &str) -> Vec<String> {
        let bytes = self.buffer.lock().expect("log buffer").clone();
        String::from_utf8(bytes)
            .expect("utf8 logs")
            .lines()
            .filter(|line| line.contains(needle))
            .map(str::to_string)
            .collect()
    }
}

impl<'a> MakeWriter<'a> for LogCapture {
    type Writer = LogCaptureGuard;

    fn make_writer(&'a self) -> Self::Writer {
        LogCaptureGuard {
            buffer: self.buffer.clone(),
        }
    }
}

impl Write for LogCaptureGuard {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buffer
            .lock()
            .expect("log buffer")
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
