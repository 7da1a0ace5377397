// Copyright (c) 2025 - Cowboy AI, Inc.
//! Topology Reconciler
//!
//! The stateful driver that converges real attachments to declared intent.
//! It owns the desired and active topologies and runs one pass per host
//! event:
//!
//! ```text
//! idle → loading desired → loading active → applying diff → persisting → idle
//! ```
//!
//! # Apply Rules
//!
//! - Liveness is checked per action at apply time: both endpoints must exist,
//!   run and not be paused, otherwise the action is skipped silently.
//! - `+`: attach, then record the returned interface id. A failed attach
//!   leaves the active topology untouched; the next event for the domain
//!   computes the same `+` again.
//! - `-`: detach the recorded interface, then remove the edge whether or not
//!   the detach succeeded. A failed detach is logged as a warning about the
//!   optimistic removal so an edge can never get stuck in the active topology.
//!
//! # Teardown
//!
//! When a domain shuts down, edges where it is the frontend are only
//! deregistered: the toolstack already destroyed the interface together with
//! the frontend. Edges where it is the backend are detached and deregistered.
//!
//! # Persistence
//!
//! The active topology is saved after every pass, including passes where some
//! actions failed. A failed save is returned to the caller.
//!
//! # Concurrency
//!
//! Passes take `&mut self` and run to completion. Every collaborator call is
//! awaited before the next one starts. There is no timeout, so a hung
//! attach/detach blocks the pass.

pub mod events;
pub mod report;

use tracing::{debug, error, info, warn};

use crate::diff::{diff, Action};
use crate::directory::DomainDirectory;
use crate::domain::{EdgeId, Parameters};
use crate::errors::TopologyResult;
use crate::interface::InterfaceOps;
use crate::state_machine::{PassInput, PassPhase, StateMachine};
use crate::store::{ActiveStore, KeyValueStore};
use crate::topology::{
    parse_declaration, parse_declarations, DeclarationOverride, ParsedDeclarations, TopologyMap,
};

pub use events::{EventOutcome, TopologyEvent};
pub use report::{ActionOutcome, ActionStatus, PassReport, PassScope};

/// Reconciles declared attachments against active ones
pub struct Reconciler<D, I, S> {
    directory: D,
    interfaces: I,
    store: ActiveStore<S>,
    desired: Option<TopologyMap>,
    active: Option<TopologyMap>,
    phase: PassPhase,
}

impl<D, I, S> Reconciler<D, I, S>
where
    D: DomainDirectory,
    I: InterfaceOps,
    S: KeyValueStore,
{
    /// Create a reconciler; nothing is loaded until the first event
    pub fn new(directory: D, interfaces: I, store: ActiveStore<S>) -> Self {
        Self {
            directory,
            interfaces,
            store,
            desired: None,
            active: None,
            phase: PassPhase::Idle,
        }
    }

    pub fn directory(&self) -> &D {
        &self.directory
    }

    pub fn interfaces(&self) -> &I {
        &self.interfaces
    }

    pub fn store(&self) -> &ActiveStore<S> {
        &self.store
    }

    /// Committed desired topology, `None` before the first load
    pub fn desired(&self) -> Option<&TopologyMap> {
        self.desired.as_ref()
    }

    /// Active topology, `None` before the first load
    pub fn active(&self) -> Option<&TopologyMap> {
        self.active.as_ref()
    }

    /// Current pass phase
    pub fn phase(&self) -> PassPhase {
        self.phase
    }

    /// Dispatch a host event
    pub async fn handle_event(&mut self, event: TopologyEvent) -> TopologyResult<EventOutcome> {
        debug!("Handling {:?}", event);
        let override_ = event.declaration_override();

        match event {
            TopologyEvent::DeclarationChanging { .. } => {
                let preview = self.preview_desired(override_.as_ref()).await?;
                Ok(EventOutcome::Previewed(preview))
            }
            TopologyEvent::DeclarationChanged { domain, .. } => {
                let report = self
                    .run_pass(PassScope::Domain(domain), override_.as_ref())
                    .await?;
                Ok(EventOutcome::Reconciled(report))
            }
            TopologyEvent::DomainStarted { domain } | TopologyEvent::DomainUnpaused { domain } => {
                let report = self.run_pass(PassScope::Domain(domain), None).await?;
                Ok(EventOutcome::Reconciled(report))
            }
            TopologyEvent::DomainShutdown { domain } => {
                let report = self.run_pass(PassScope::Teardown(domain), None).await?;
                Ok(EventOutcome::Reconciled(report))
            }
        }
    }

    /// Reconcile every edge touching `domain`
    pub async fn conjoin_domain_with_peers(&mut self, domain: &str) -> TopologyResult<PassReport> {
        self.run_pass(PassScope::Domain(domain.to_string()), None)
            .await
    }

    /// Tear down every active edge of a domain that shut down
    pub async fn disjoin_domain_from_peers(&mut self, domain: &str) -> TopologyResult<PassReport> {
        self.run_pass(PassScope::Teardown(domain.to_string()), None)
            .await
    }

    /// Reconcile every edge regardless of domain
    pub async fn reconcile_all(&mut self) -> TopologyResult<PassReport> {
        self.run_pass(PassScope::All, None).await
    }

    /// Compute the desired topology without committing it
    ///
    /// The carried value is validated even when the directory does not list
    /// the domain yet.
    ///
    /// # Errors
    /// - `MalformedValue` if the overridden declaration does not parse
    /// - `Directory` if declarations cannot be enumerated
    pub async fn preview_desired(
        &self,
        override_: Option<&DeclarationOverride>,
    ) -> TopologyResult<TopologyMap> {
        if let Some(DeclarationOverride {
            domain,
            value: Some(value),
        }) = override_
        {
            parse_declaration(domain, value)?;
        }

        let mut parsed = self.scan_declarations(override_).await?;
        if let Some(rejected) = override_.and_then(|o| parsed.take_rejection(&o.domain)) {
            return Err(rejected.error);
        }
        Ok(parsed.topology)
    }

    /// Rebuild and commit the desired topology from every declaration
    ///
    /// Malformed declarations contribute nothing; the rest are kept.
    pub async fn rescan_desired(
        &mut self,
        override_: Option<&DeclarationOverride>,
    ) -> TopologyResult<&TopologyMap> {
        let parsed = self.scan_declarations(override_).await?;
        debug!("Loaded desired topology: {} edges", parsed.topology.len());
        let desired: &TopologyMap = self.desired.insert(parsed.topology);
        Ok(desired)
    }

    /// Load the active topology from the store unless already loaded
    pub async fn ensure_active_loaded(&mut self) -> TopologyResult<&TopologyMap> {
        if self.active.is_none() {
            let active = self.store.load().await?;
            info!(
                "Loaded active topology from {}: {} edges",
                self.store.key(),
                active.len()
            );
            self.active = Some(active);
        }
        let active: &TopologyMap = self.active_mut();
        Ok(active)
    }

    async fn scan_declarations(
        &self,
        override_: Option<&DeclarationOverride>,
    ) -> TopologyResult<ParsedDeclarations> {
        let mut table = self.directory.declarations().await?;

        if let Some(o) = override_ {
            for (domain, raw) in table.iter_mut() {
                if *domain == o.domain {
                    *raw = o.value.clone().unwrap_or_default();
                }
            }
        }

        Ok(parse_declarations(table))
    }

    async fn run_pass(
        &mut self,
        scope: PassScope,
        override_: Option<&DeclarationOverride>,
    ) -> TopologyResult<PassReport> {
        if !self.phase.is_idle() {
            warn!("Previous reconciliation pass stopped while {}", self.phase);
            self.advance(PassInput::Abort)?;
        }
        self.advance(PassInput::Begin)?;

        let mut report = PassReport::begin(scope);
        info!("Reconciliation pass {} started for {}", report.pass_id, report.scope);

        let result = self.drive_pass(&mut report, override_).await;
        if let Err(e) = &result {
            error!("Reconciliation pass {} aborted: {}", report.pass_id, e);
            self.advance(PassInput::Abort)?;
        }
        result?;

        report.finish();
        info!(
            "Reconciliation pass {} finished: {} actions, {} failed, {} skipped",
            report.pass_id,
            report.outcomes.len(),
            report.failures().count(),
            report.skipped()
        );
        Ok(report)
    }

    async fn drive_pass(
        &mut self,
        report: &mut PassReport,
        override_: Option<&DeclarationOverride>,
    ) -> TopologyResult<()> {
        if self.desired.is_none() || override_.is_some() {
            self.rescan_desired(override_).await?;
        }
        self.advance(PassInput::DesiredLoaded)?;

        self.ensure_active_loaded().await?;
        self.advance(PassInput::ActiveLoaded)?;

        match report.scope.clone() {
            PassScope::Domain(domain) => self.apply_diff(Some(&domain), report).await,
            PassScope::All => self.apply_diff(None, report).await,
            PassScope::Teardown(domain) => self.teardown(&domain, report).await,
        }
        self.advance(PassInput::Applied)?;

        self.persist().await?;
        self.advance(PassInput::Persisted)?;
        Ok(())
    }

    async fn apply_diff(&mut self, limit_to_domain: Option<&str>, report: &mut PassReport) {
        let plan = match (&self.desired, &self.active) {
            (Some(desired), Some(active)) => diff(desired, active, limit_to_domain),
            _ => Vec::new(),
        };
        debug!("Plan: {} actions", plan.len());

        for entry in plan {
            let status = match self.endpoints_live(&entry.edge).await {
                Ok(false) => ActionStatus::SkippedNotLive,
                Err(e) => {
                    warn!("Skipping {}: cannot query domain state: {}", entry, e);
                    ActionStatus::SkippedUnknownState {
                        error: e.to_string(),
                    }
                }
                Ok(true) => match entry.action {
                    Action::Add => self.attach_edge(&entry.edge, &entry.config).await,
                    Action::Remove => self.detach_edge(&entry.edge, &entry.config).await,
                },
            };
            report.record(entry.action, entry.edge, entry.config, status);
        }
    }

    async fn teardown(&mut self, domain: &str, report: &mut PassReport) {
        let connections = self.active_mut().connections(domain);

        for edge in connections {
            let config = self
                .active_mut()
                .config(edge.backend(), edge.frontend())
                .cloned()
                .unwrap_or_default();

            let status = match self.endpoints_exist(&edge).await {
                Ok(false) => ActionStatus::SkippedNotLive,
                Err(e) => {
                    warn!("Skipping teardown of {}: cannot query domain state: {}", edge, e);
                    ActionStatus::SkippedUnknownState {
                        error: e.to_string(),
                    }
                }
                Ok(true) if edge.frontend() == domain => self.deregister_edge(&edge),
                Ok(true) => self.detach_edge(&edge, &config).await,
            };
            report.record(Action::Remove, edge, config, status);
        }
    }

    async fn attach_edge(&mut self, edge: &EdgeId, config: &Parameters) -> ActionStatus {
        let (backend, frontend) = (edge.backend(), edge.frontend());

        if let Some(existing) = self.active_mut().interface_id(backend, frontend) {
            let interface_id = existing.to_string();
            debug!(
                "Backend {} already attached to frontend {} with interface {}",
                backend, frontend, interface_id
            );
            return ActionStatus::AlreadyAttached { interface_id };
        }

        match self.interfaces.attach(backend, frontend, config).await {
            Ok(interface_id) => {
                self.active_mut().conjoin(
                    backend,
                    frontend,
                    config.clone(),
                    Some(interface_id.clone()),
                );
                info!(
                    "Attached backend {} to frontend {} with interface {}",
                    backend, frontend, interface_id
                );
                ActionStatus::Attached { interface_id }
            }
            Err(e) => {
                error!(
                    "Could not attach backend {} to frontend {} (config {:?}): {}",
                    backend,
                    frontend,
                    config.canonical(),
                    e
                );
                ActionStatus::AttachFailed {
                    error: e.to_string(),
                }
            }
        }
    }

    async fn detach_edge(&mut self, edge: &EdgeId, config: &Parameters) -> ActionStatus {
        let (backend, frontend) = (edge.backend(), edge.frontend());
        let interface_id = self
            .active_mut()
            .interface_id(backend, frontend)
            .map(str::to_string);

        let Some(interface_id) = interface_id else {
            return self.deregister_edge(edge);
        };

        let status = match self.interfaces.detach(frontend, &interface_id).await {
            Ok(()) => {
                info!(
                    "Detached backend {} from frontend {} interface {}",
                    backend, frontend, interface_id
                );
                ActionStatus::Detached { interface_id }
            }
            Err(e) => {
                warn!(
                    "Detach of backend {} from frontend {} interface {} failed (config {:?}): {}; removing edge anyway",
                    backend,
                    frontend,
                    interface_id,
                    config.canonical(),
                    e
                );
                ActionStatus::RemovedAfterFailedDetach {
                    interface_id,
                    error: e.to_string(),
                }
            }
        };

        self.forget_edge(edge);
        status
    }

    fn deregister_edge(&mut self, edge: &EdgeId) -> ActionStatus {
        let interface_id = self
            .active_mut()
            .interface_id(edge.backend(), edge.frontend())
            .map(str::to_string);
        info!(
            "Unlinked already-detached backend {} from frontend {} interface {:?}",
            edge.backend(),
            edge.frontend(),
            interface_id
        );
        self.forget_edge(edge);
        ActionStatus::Deregistered { interface_id }
    }

    fn forget_edge(&mut self, edge: &EdgeId) {
        if let Err(e) = self.active_mut().disjoin(edge.backend(), edge.frontend()) {
            warn!("Edge {} vanished from the active topology: {}", edge, e);
        }
    }

    async fn endpoints_live(&self, edge: &EdgeId) -> TopologyResult<bool> {
        Ok(self.directory.is_live(edge.backend()).await?
            && self.directory.is_live(edge.frontend()).await?)
    }

    async fn endpoints_exist(&self, edge: &EdgeId) -> TopologyResult<bool> {
        Ok(self.directory.domain_state(edge.backend()).await?.is_some()
            && self.directory.domain_state(edge.frontend()).await?.is_some())
    }

    async fn persist(&self) -> TopologyResult<()> {
        let Some(active) = &self.active else {
            return Ok(());
        };
        if let Err(e) = self.store.save(active).await {
            error!("Could not persist active topology to {}: {}", self.store.key(), e);
            return Err(e);
        }
        Ok(())
    }

    fn active_mut(&mut self) -> &mut TopologyMap {
        self.active.get_or_insert_with(TopologyMap::new)
    }

    fn advance(&mut self, input: PassInput) -> TopologyResult<()> {
        let (next, ()) = self.phase.transition(&input)?;
        self.phase = next;
        Ok(())
    }
}
