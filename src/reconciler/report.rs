// Copyright (c) 2025 - Cowboy AI, Inc.
//! Reconciliation Pass Reports
//!
//! Attach and detach failures never abort a pass; they are logged and
//! recorded here so callers and tests can observe them.

use chrono::{DateTime, Utc};
use std::fmt;
use uuid::Uuid;

use crate::diff::Action;
use crate::domain::{EdgeId, Parameters};

/// What a pass was asked to reconcile
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PassScope {
    /// Diff limited to edges touching one domain
    Domain(String),
    /// Teardown of every active edge of a domain that shut down
    Teardown(String),
    /// Unscoped diff
    All,
}

impl fmt::Display for PassScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PassScope::Domain(domain) => write!(f, "domain {domain}"),
            PassScope::Teardown(domain) => write!(f, "teardown of {domain}"),
            PassScope::All => f.write_str("all domains"),
        }
    }
}

/// Result of one action of a pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionStatus {
    /// Attach succeeded and the edge was recorded
    Attached { interface_id: String },

    /// The edge already had an interface, attach was not attempted
    AlreadyAttached { interface_id: String },

    /// Attach failed; active topology unchanged for this edge
    AttachFailed { error: String },

    /// Detach succeeded and the edge was removed
    Detached { interface_id: String },

    /// Detach failed but the edge was removed anyway
    RemovedAfterFailedDetach { interface_id: String, error: String },

    /// Edge removed without calling detach
    Deregistered { interface_id: Option<String> },

    /// An endpoint is missing, stopped or paused
    SkippedNotLive,

    /// The directory could not answer for an endpoint
    SkippedUnknownState { error: String },
}

impl ActionStatus {
    /// True for outcomes that reflect a collaborator failure
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            ActionStatus::AttachFailed { .. }
                | ActionStatus::RemovedAfterFailedDetach { .. }
                | ActionStatus::SkippedUnknownState { .. }
        )
    }

    /// True for outcomes where nothing was attempted
    pub fn is_skipped(&self) -> bool {
        matches!(
            self,
            ActionStatus::SkippedNotLive | ActionStatus::SkippedUnknownState { .. }
        )
    }
}

/// One executed (or skipped) action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionOutcome {
    pub action: Action,
    pub edge: EdgeId,
    pub config: Parameters,
    pub status: ActionStatus,
}

/// Summary of one reconciliation pass
#[derive(Debug, Clone)]
pub struct PassReport {
    pub pass_id: Uuid,
    pub scope: PassScope,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub outcomes: Vec<ActionOutcome>,
}

impl PassReport {
    /// Start a report for a new pass
    pub fn begin(scope: PassScope) -> Self {
        Self {
            pass_id: Uuid::now_v7(),
            scope,
            started_at: Utc::now(),
            finished_at: None,
            outcomes: Vec::new(),
        }
    }

    pub(crate) fn record(
        &mut self,
        action: Action,
        edge: EdgeId,
        config: Parameters,
        status: ActionStatus,
    ) {
        self.outcomes.push(ActionOutcome {
            action,
            edge,
            config,
            status,
        });
    }

    pub(crate) fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// Outcomes that reflect a failure
    pub fn failures(&self) -> impl Iterator<Item = &ActionOutcome> {
        self.outcomes.iter().filter(|o| o.status.is_failure())
    }

    /// Outcome recorded for `edge`, last one wins
    pub fn outcome_for(&self, backend: &str, frontend: &str) -> Option<&ActionOutcome> {
        self.outcomes
            .iter()
            .rev()
            .find(|o| o.edge.backend() == backend && o.edge.frontend() == frontend)
    }

    /// True if no action failed
    pub fn is_clean(&self) -> bool {
        self.failures().next().is_none()
    }

    /// Number of actions that were not attempted
    pub fn skipped(&self) -> usize {
        self.outcomes.iter().filter(|o| o.status.is_skipped()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failures_and_skips() {
        let mut report = PassReport::begin(PassScope::Domain("a".to_string()));
        report.record(
            Action::Add,
            EdgeId::new("a", "b"),
            Parameters::empty(),
            ActionStatus::Attached {
                interface_id: "0".to_string(),
            },
        );
        assert!(report.is_clean());

        report.record(
            Action::Remove,
            EdgeId::new("a", "c"),
            Parameters::empty(),
            ActionStatus::RemovedAfterFailedDetach {
                interface_id: "1".to_string(),
                error: "boom".to_string(),
            },
        );
        report.record(
            Action::Add,
            EdgeId::new("a", "d"),
            Parameters::empty(),
            ActionStatus::SkippedNotLive,
        );
        report.finish();

        assert!(!report.is_clean());
        assert_eq!(report.failures().count(), 1);
        assert_eq!(report.skipped(), 1);
        assert!(report.finished_at.is_some());
        assert_eq!(
            report.outcome_for("a", "d").map(|o| &o.status),
            Some(&ActionStatus::SkippedNotLive)
        );
    }

    #[test]
    fn test_scope_display() {
        assert_eq!(PassScope::Domain("a".into()).to_string(), "domain a");
        assert_eq!(PassScope::Teardown("a".into()).to_string(), "teardown of a");
        assert_eq!(PassScope::All.to_string(), "all domains");
    }
}
