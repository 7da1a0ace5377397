// Copyright (c) 2025 - Cowboy AI, Inc.
//! Reconciliation Pass State Machine
//!
//! Every triggering event runs one pass to completion before the next event
//! is considered.
//!
//! # States
//!
//! - Idle: No pass in progress
//! - LoadingDesired: Rebuilding the desired topology from declarations
//! - LoadingActive: Loading the persisted active topology (once per process)
//! - Applying: Executing attach/detach actions
//! - Persisting: Writing the active topology back to the store
//!
//! # Inputs
//!
//! - Begin: Idle → LoadingDesired
//! - DesiredLoaded: LoadingDesired → LoadingActive
//! - ActiveLoaded: LoadingActive → Applying
//! - Applied: Applying → Persisting
//! - Persisted: Persisting → Idle
//! - Abort: Any busy state → Idle

use std::fmt;

use super::{StateMachine, TransitionError, TransitionResult};

/// Phase of a reconciliation pass (FSM state)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PassPhase {
    #[default]
    Idle,
    LoadingDesired,
    LoadingActive,
    Applying,
    Persisting,
}

impl PassPhase {
    /// True when no pass is in progress
    pub fn is_idle(&self) -> bool {
        matches!(self, PassPhase::Idle)
    }
}

impl fmt::Display for PassPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PassPhase::Idle => "idle",
            PassPhase::LoadingDesired => "loading desired",
            PassPhase::LoadingActive => "loading active",
            PassPhase::Applying => "applying diff",
            PassPhase::Persisting => "persisting",
        };
        f.write_str(name)
    }
}

/// Pass progress signal (FSM input)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassInput {
    Begin,
    DesiredLoaded,
    ActiveLoaded,
    Applied,
    Persisted,
    Abort,
}

impl StateMachine for PassPhase {
    type Input = PassInput;
    type Output = ();

    fn transition(&self, input: &Self::Input) -> TransitionResult<(Self, Self::Output)> {
        use PassInput::*;
        use PassPhase::*;

        let next = match (self, input) {
            (Idle, Begin) => LoadingDesired,
            (LoadingDesired, DesiredLoaded) => LoadingActive,
            (LoadingActive, ActiveLoaded) => Applying,
            (Applying, Applied) => Persisting,
            (Persisting, Persisted) => Idle,
            (phase, Abort) if !phase.is_idle() => Idle,
            (phase, input) => {
                return Err(TransitionError::InvalidTransition {
                    from: phase.to_string(),
                    input: format!("{input:?}"),
                })
            }
        };

        Ok((next, ()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_pass_returns_to_idle() {
        let mut phase = PassPhase::Idle;
        for input in [
            PassInput::Begin,
            PassInput::DesiredLoaded,
            PassInput::ActiveLoaded,
            PassInput::Applied,
            PassInput::Persisted,
        ] {
            phase = phase.transition(&input).unwrap().0;
        }
        assert_eq!(phase, PassPhase::Idle);
    }

    #[test]
    fn test_begin_is_rejected_mid_pass() {
        let phase = PassPhase::Applying;
        assert!(matches!(
            phase.transition(&PassInput::Begin),
            Err(TransitionError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn test_abort_from_any_busy_phase() {
        for phase in [
            PassPhase::LoadingDesired,
            PassPhase::LoadingActive,
            PassPhase::Applying,
            PassPhase::Persisting,
        ] {
            assert_eq!(phase.transition(&PassInput::Abort).unwrap().0, PassPhase::Idle);
        }
        assert!(!PassPhase::Idle.can_transition(&PassInput::Abort));
    }

    #[test]
    fn test_phases_cannot_be_skipped() {
        assert!(!PassPhase::LoadingDesired.can_transition(&PassInput::Applied));
        assert!(!PassPhase::Idle.can_transition(&PassInput::Persisted));
    }
}
