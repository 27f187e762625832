//! Per-panel submission state machine.
//!
//! ```text
//! AwaitingInput <-> Idle --begin--> Submitting --succeed--> Succeeded
//!                                        '------fail------> Failed
//! ```
//! An input edit re-evaluates readiness from any state except `Submitting`.

use crate::error::PanelError;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum WorkflowState {
    /// Inputs complete, nothing pending.
    Idle,
    /// A required input is missing or malformed.
    #[default]
    AwaitingInput,
    /// One request outstanding.
    Submitting,
    Succeeded(String),
    Failed(String),
}

impl WorkflowState {
    pub fn from_readiness(ready: bool) -> Self {
        if ready {
            WorkflowState::Idle
        } else {
            WorkflowState::AwaitingInput
        }
    }

    /// Apply an input edit.
    pub fn on_input(&mut self, ready: bool) {
        if !self.is_submitting() {
            *self = Self::from_readiness(ready);
        }
    }

    /// Enter `Submitting`. Fails with `Busy` while a request is outstanding
    /// and with `InvalidInput` when the inputs are not ready.
    pub fn begin(&mut self, ready: bool) -> Result<(), PanelError> {
        if self.is_submitting() {
            return Err(PanelError::Busy);
        }
        if !ready {
            return Err(PanelError::InvalidInput("required input missing".into()));
        }
        *self = WorkflowState::Submitting;
        Ok(())
    }

    pub fn succeed(&mut self, outcome: impl Into<String>) {
        *self = WorkflowState::Succeeded(outcome.into());
    }

    pub fn fail(&mut self, reason: impl Into<String>) {
        *self = WorkflowState::Failed(reason.into());
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self, WorkflowState::Submitting)
    }
}
