//! Conversation state types

use super::intent::Intent;
use super::slots::{is_valid_amount, is_valid_phone};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Slots
// ============================================================================

/// A parameter an action needs before it can be confirmed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotKey {
    Amount,
    Phone,
}

/// Slot values collected so far (`extractedData` on the wire)
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SlotValues {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl SlotValues {
    pub fn has(&self, slot: SlotKey) -> bool {
        match slot {
            SlotKey::Amount => self.amount.is_some(),
            SlotKey::Phone => self.phone.is_some(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.amount.is_none() && self.phone.is_none()
    }
}

// ============================================================================
// Actions
// ============================================================================

/// Intents that collect slots and require confirmation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Transfer,
    Withdraw,
    Recharge,
}

impl Action {
    /// Slots in the order they are requested
    pub fn required_slots(self) -> &'static [SlotKey] {
        match self {
            Action::Transfer => &[SlotKey::Amount, SlotKey::Phone],
            Action::Withdraw | Action::Recharge => &[SlotKey::Amount],
        }
    }

    pub fn requires(self, slot: SlotKey) -> bool {
        self.required_slots().contains(&slot)
    }

    pub fn intent(self) -> Intent {
        match self {
            Action::Transfer => Intent::Transfer,
            Action::Withdraw => Intent::Withdraw,
            Action::Recharge => Intent::Recharge,
        }
    }

    pub fn from_intent(intent: Intent) -> Option<Self> {
        match intent {
            Intent::Transfer => Some(Action::Transfer),
            Intent::Withdraw => Some(Action::Withdraw),
            Intent::Recharge => Some(Action::Recharge),
            Intent::Balance | Intent::Unknown | Intent::None => None,
        }
    }

    /// First required slot not yet collected
    pub fn next_missing(self, collected: &SlotValues) -> Option<SlotKey> {
        self.required_slots()
            .iter()
            .copied()
            .find(|slot| !collected.has(*slot))
    }

    /// Build the confirmable action once every required slot is present
    pub fn complete(self, collected: &SlotValues) -> Option<PendingAction> {
        let amount = collected.amount?;
        match self {
            Action::Transfer => Some(PendingAction::Transfer {
                amount,
                phone: collected.phone.clone()?,
            }),
            Action::Withdraw => Some(PendingAction::Withdraw { amount }),
            Action::Recharge => Some(PendingAction::Recharge { amount }),
        }
    }
}

/// A fully specified action awaiting a yes/no answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PendingAction {
    Transfer { amount: i64, phone: String },
    Withdraw { amount: i64 },
    Recharge { amount: i64 },
}

impl PendingAction {
    pub fn action(&self) -> Action {
        match self {
            PendingAction::Transfer { .. } => Action::Transfer,
            PendingAction::Withdraw { .. } => Action::Withdraw,
            PendingAction::Recharge { .. } => Action::Recharge,
        }
    }

    pub fn slots(&self) -> SlotValues {
        match self {
            PendingAction::Transfer { amount, phone } => SlotValues {
                amount: Some(*amount),
                phone: Some(phone.clone()),
            },
            PendingAction::Withdraw { amount } | PendingAction::Recharge { amount } => {
                SlotValues {
                    amount: Some(*amount),
                    phone: None,
                }
            }
        }
    }
}

// ============================================================================
// Conversation State
// ============================================================================

/// Dialogue state carried between turns
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "StateSnapshot", into = "StateSnapshot")]
pub enum ConversationState {
    /// No action in progress
    #[default]
    Idle,

    /// Action declared, next utterance should supply `slot`
    AwaitingSlot {
        action: Action,
        slot: SlotKey,
        collected: SlotValues,
    },

    /// All slots collected, waiting for yes/no
    AwaitingConfirmation(PendingAction),
}

impl ConversationState {
    /// Intent of the action in progress, `Intent::None` when idle
    pub fn intent(&self) -> Intent {
        match self {
            ConversationState::Idle => Intent::None,
            ConversationState::AwaitingSlot { action, .. } => action.intent(),
            ConversationState::AwaitingConfirmation(pending) => pending.action().intent(),
        }
    }

    #[cfg(test)]
    pub fn is_idle(&self) -> bool {
        matches!(self, ConversationState::Idle)
    }
}

// ============================================================================
// Wire Snapshot
// ============================================================================

/// What the next utterance is expected to supply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaitingFor {
    Amount,
    Phone,
    Confirmation,
}

impl WaitingFor {
    /// Slot being awaited, `None` for confirmation
    pub fn slot(self) -> Option<SlotKey> {
        match self {
            WaitingFor::Amount => Some(SlotKey::Amount),
            WaitingFor::Phone => Some(SlotKey::Phone),
            WaitingFor::Confirmation => None,
        }
    }
}

impl From<SlotKey> for WaitingFor {
    fn from(slot: SlotKey) -> Self {
        match slot {
            SlotKey::Amount => WaitingFor::Amount,
            SlotKey::Phone => WaitingFor::Phone,
        }
    }
}

/// Flat `{intent, waitingFor, extractedData}` form of the state
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateSnapshot {
    pub intent: Option<Action>,
    pub waiting_for: Option<WaitingFor>,
    #[serde(default)]
    pub extracted_data: SlotValues,
}

/// A snapshot that violates a state invariant
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StateError {
    #[error("waitingFor is set but no intent is in progress")]
    WaitingWithoutIntent,
    #[error("an intent is in progress but nothing is awaited")]
    IntentWithoutWaiting,
    #[error("idle state carries extracted data")]
    IdleWithData,
    #[error("{action:?} does not use the {slot:?} slot")]
    IrrelevantSlot { action: Action, slot: SlotKey },
    #[error("slot {0:?} is already filled")]
    SlotAlreadyFilled(SlotKey),
    #[error("slot {0:?} holds an invalid value")]
    InvalidSlotValue(SlotKey),
    #[error("confirmation requested before every slot was filled")]
    IncompleteConfirmation,
}

impl From<ConversationState> for StateSnapshot {
    fn from(state: ConversationState) -> Self {
        match state {
            ConversationState::Idle => StateSnapshot::default(),
            ConversationState::AwaitingSlot {
                action,
                slot,
                collected,
            } => StateSnapshot {
                intent: Some(action),
                waiting_for: Some(slot.into()),
                extracted_data: collected,
            },
            ConversationState::AwaitingConfirmation(pending) => StateSnapshot {
                intent: Some(pending.action()),
                waiting_for: Some(WaitingFor::Confirmation),
                extracted_data: pending.slots(),
            },
        }
    }
}

impl TryFrom<StateSnapshot> for ConversationState {
    type Error = StateError;

    fn try_from(snapshot: StateSnapshot) -> Result<Self, Self::Error> {
        let StateSnapshot {
            intent,
            waiting_for,
            extracted_data,
        } = snapshot;

        let (action, waiting_for) = match (intent, waiting_for) {
            (None, None) if extracted_data.is_empty() => return Ok(ConversationState::Idle),
            (None, None) => return Err(StateError::IdleWithData),
            (None, Some(_)) => return Err(StateError::WaitingWithoutIntent),
            (Some(_), None) => return Err(StateError::IntentWithoutWaiting),
            (Some(action), Some(waiting_for)) => (action, waiting_for),
        };

        check_slots(action, &extracted_data)?;

        match waiting_for.slot() {
            None => action
                .complete(&extracted_data)
                .map(ConversationState::AwaitingConfirmation)
                .ok_or(StateError::IncompleteConfirmation),
            Some(slot) => {
                if !action.requires(slot) {
                    return Err(StateError::IrrelevantSlot { action, slot });
                }
                if extracted_data.has(slot) {
                    return Err(StateError::SlotAlreadyFilled(slot));
                }
                Ok(ConversationState::AwaitingSlot {
                    action,
                    slot,
                    collected: extracted_data,
                })
            }
        }
    }
}

/// Collected values must be relevant to the action and valid
fn check_slots(action: Action, data: &SlotValues) -> Result<(), StateError> {
    if let Some(amount) = data.amount {
        if !is_valid_amount(amount) {
            return Err(StateError::InvalidSlotValue(SlotKey::Amount));
        }
    }
    if let Some(phone) = &data.phone {
        if !action.requires(SlotKey::Phone) {
            return Err(StateError::IrrelevantSlot {
                action,
                slot: SlotKey::Phone,
            });
        }
        if !is_valid_phone(phone) {
            return Err(StateError::InvalidSlotValue(SlotKey::Phone));
        }
    }
    Ok(())
}
