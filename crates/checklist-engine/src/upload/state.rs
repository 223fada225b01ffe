//! Upload state machine

use crate::error::WorkflowError;
use serde::{Deserialize, Serialize};

/// Stage of one file's upload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UploadState {
    /// File handle and target slot accepted
    Received,
    /// Canonical title computed
    TitleAssigned,
    /// Store holds the content under the canonical title
    Persisted,
    /// Status reset to PENDING
    StatusPending,
    /// Checklist recomputed from a fresh load
    Reloaded,
    /// A step failed; later steps did not run
    Failed,
}

impl UploadState {
    /// Whether no further transition is possible
    #[inline]
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Reloaded | Self::Failed)
    }
}

/// Legal successors of a state
pub fn allowed_transitions(from: UploadState) -> Vec<UploadState> {
    use UploadState::*;
    match from {
        Received => vec![TitleAssigned, Failed],
        TitleAssigned => vec![Persisted, Failed],
        Persisted => vec![StatusPending, Failed],
        StatusPending => vec![Reloaded, Failed],
        Reloaded => vec![],
        Failed => vec![],
    }
}

/// Validates a state transition
pub fn validate_transition(from: UploadState, to: UploadState) -> Result<(), WorkflowError> {
    if allowed_transitions(from).contains(&to) {
        Ok(())
    } else {
        Err(WorkflowError::IllegalTransition { from, to })
    }
}

/// State of a single upload with its visited history
#[derive(Debug, Clone)]
pub struct UploadStateMachine {
    history: Vec<UploadState>,
}

impl UploadStateMachine {
    /// Start in `Received`
    #[must_use]
    pub fn new() -> Self {
        Self {
            history: vec![UploadState::Received],
        }
    }

    /// Current state
    #[must_use]
    pub fn current(&self) -> UploadState {
        self.history
            .last()
            .copied()
            .unwrap_or(UploadState::Received)
    }

    /// States visited so far, oldest first
    #[must_use]
    pub fn history(&self) -> &[UploadState] {
        &self.history
    }

    /// Move to the next state
    pub fn advance(&mut self, to: UploadState) -> Result<(), WorkflowError> {
        let from = self.current();
        validate_transition(from, to)?;
        tracing::debug!(?from, ?to, "upload transition");
        self.history.push(to);
        Ok(())
    }

    /// Move to `Failed`, returning the state the failure happened in
    pub fn fail(&mut self) -> UploadState {
        let at = self.current();
        if !at.is_terminal() {
            self.history.push(UploadState::Failed);
        }
        at
    }
}

impl Default for UploadStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use UploadState::*;

    #[test]
    fn happy_path_is_legal() {
        let mut sm = UploadStateMachine::new();
        for next in [TitleAssigned, Persisted, StatusPending, Reloaded] {
            sm.advance(next).unwrap();
        }
        assert_eq!(
            sm.history(),
            &[Received, TitleAssigned, Persisted, StatusPending, Reloaded]
        );
        assert!(sm.current().is_terminal());
    }

    #[test]
    fn cannot_skip_persisted() {
        let mut sm = UploadStateMachine::new();
        sm.advance(TitleAssigned).unwrap();
        assert_eq!(
            sm.advance(StatusPending),
            Err(WorkflowError::IllegalTransition {
                from: TitleAssigned,
                to: StatusPending
            })
        );
    }

    #[test]
    fn fail_records_failing_stage() {
        let mut sm = UploadStateMachine::new();
        sm.advance(TitleAssigned).unwrap();

        assert_eq!(sm.fail(), TitleAssigned);
        assert_eq!(sm.current(), Failed);
        assert!(allowed_transitions(Failed).is_empty());
    }

    #[test]
    fn every_live_state_can_fail() {
        for state in [Received, TitleAssigned, Persisted, StatusPending] {
            assert!(validate_transition(state, Failed).is_ok());
        }
        assert!(validate_transition(Reloaded, Failed).is_err());
    }
}
