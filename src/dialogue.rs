//! Core banking dialogue state machine
//!
//! Pure slot-filling transitions: `(transcript, state) -> (response, state, intent)`.
//! All state is explicit; the caller persists it between turns.

pub mod config;
mod effect;
pub mod intent;
pub mod response;
pub mod slots;
pub mod state;
mod transition;

#[cfg(test)]
mod proptests;

pub use config::DialogueConfig;
pub use effect::Effect;
pub use intent::Intent;
#[allow(unused_imports)] // Public API re-exports
pub use state::{Action, ConversationState, PendingAction, SlotKey, SlotValues, StateSnapshot};
#[allow(unused_imports)] // Public API re-exports
pub use transition::{transition, TurnResult};
