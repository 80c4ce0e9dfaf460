//! Effects produced by dialogue transitions

use super::state::PendingAction;

/// Work the caller performs after a turn. The core never executes these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// User confirmed; carry out the banking action
    ExecuteAction { action: PendingAction },

    /// User declined; the pending action is dropped
    DiscardAction { action: PendingAction },
}

impl Effect {
    pub fn execute(action: PendingAction) -> Self {
        Effect::ExecuteAction { action }
    }

    pub fn discard(action: PendingAction) -> Self {
        Effect::DiscardAction { action }
    }
}
