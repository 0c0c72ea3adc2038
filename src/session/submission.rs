//! Lifecycle of a report: editing, awaiting confirmation, completed.

use crate::form::FormState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmissionPhase {
    #[default]
    Editing,
    /// Validation passed; the confirmation prompt is open.
    PendingConfirm,
    /// Submitted and read-only.
    Completed,
}

/// Events that move the submission lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Submit pressed; carries whether validation passed.
    Submit { valid: bool },
    Confirm,
    /// Cancel button or a click outside the prompt.
    Cancel,
    /// Edit pressed on a completed report; carries the prompt answer.
    Resume { confirmed: bool },
}

impl SubmissionPhase {
    /// Phase a session starts in for a restored state. The prompt is never restored open.
    pub fn for_state(state: &FormState) -> Self {
        if state.completed || state.is_read_only {
            SubmissionPhase::Completed
        } else {
            SubmissionPhase::Editing
        }
    }

    /// Next phase, or `None` when the transition does not apply.
    pub fn next(self, transition: Transition) -> Option<Self> {
        use SubmissionPhase::*;
        match (self, transition) {
            (Editing, Transition::Submit { valid: true }) => Some(PendingConfirm),
            (Editing, Transition::Submit { valid: false }) => Some(Editing),
            (PendingConfirm, Transition::Confirm) => Some(Completed),
            (PendingConfirm, Transition::Cancel) => Some(Editing),
            (Completed, Transition::Resume { confirmed: true }) => Some(Editing),
            (Completed, Transition::Resume { confirmed: false }) => Some(Completed),
            _ => None,
        }
    }

    pub fn is_read_only(self) -> bool {
        self == SubmissionPhase::Completed
    }
}
