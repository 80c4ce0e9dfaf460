//! Property-based tests for the dialogue state machine
//!
//! These tests verify key invariants hold across all possible inputs.

use super::slots::{is_valid_amount, is_valid_phone};
use super::state::*;
use super::*;
use proptest::prelude::*;

// ============================================================================
// Test Helpers
// ============================================================================

fn test_config() -> DialogueConfig {
    DialogueConfig::default()
}

/// Tokens mixing every keyword family with digits and filler
const VOCABULARY: &[&str] = &[
    "حول",
    "ارسل",
    "سحب",
    "نسحب",
    "زيني",
    "الإنترنت",
    "رصيدي",
    "كم عندي",
    "نعم",
    "لا",
    "تمام",
    "إلغاء",
    "ok",
    "no",
    "خمسة",
    "عشرين",
    "ألف",
    "صفر",
    "-5",
    "0",
    "500",
    "12345678",
    "123456789",
    "87654321",
    "من",
    "فضلك",
    "hello",
    "",
];

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_transcript() -> impl Strategy<Value = String> {
    proptest::collection::vec(proptest::sample::select(VOCABULARY), 0..6)
        .prop_map(|tokens| tokens.join(" "))
}

/// Text that contains none of the intent keywords (all Arabic)
fn arb_neutral_text() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 .,!?]{0,40}"
}

fn arb_action() -> impl Strategy<Value = Action> {
    prop_oneof![
        Just(Action::Transfer),
        Just(Action::Withdraw),
        Just(Action::Recharge),
    ]
}

fn arb_amount() -> impl Strategy<Value = i64> {
    1i64..1_000_000
}

fn arb_phone() -> impl Strategy<Value = String> {
    "[0-9]{8}"
}

fn arb_pending_action() -> impl Strategy<Value = PendingAction> {
    prop_oneof![
        (arb_amount(), arb_phone())
            .prop_map(|(amount, phone)| PendingAction::Transfer { amount, phone }),
        arb_amount().prop_map(|amount| PendingAction::Withdraw { amount }),
        arb_amount().prop_map(|amount| PendingAction::Recharge { amount }),
    ]
}

fn arb_awaiting_slot_state() -> impl Strategy<Value = ConversationState> {
    prop_oneof![
        Just(ConversationState::AwaitingSlot {
            action: Action::Transfer,
            slot: SlotKey::Amount,
            collected: SlotValues::default(),
        }),
        arb_phone().prop_map(|phone| ConversationState::AwaitingSlot {
            action: Action::Transfer,
            slot: SlotKey::Amount,
            collected: SlotValues {
                amount: None,
                phone: Some(phone),
            },
        }),
        arb_amount().prop_map(|amount| ConversationState::AwaitingSlot {
            action: Action::Transfer,
            slot: SlotKey::Phone,
            collected: SlotValues {
                amount: Some(amount),
                phone: None,
            },
        }),
        arb_action()
            .prop_filter("single-slot actions", |a| *a != Action::Transfer)
            .prop_map(|action| ConversationState::AwaitingSlot {
                action,
                slot: SlotKey::Amount,
                collected: SlotValues::default(),
            }),
    ]
}

fn arb_state() -> impl Strategy<Value = ConversationState> {
    prop_oneof![
        Just(ConversationState::Idle),
        arb_awaiting_slot_state(),
        arb_pending_action().prop_map(ConversationState::AwaitingConfirmation),
    ]
}

// ============================================================================
// State Validity Checkers
// ============================================================================

fn is_valid_state(state: &ConversationState) -> bool {
    match state {
        ConversationState::Idle => true,
        ConversationState::AwaitingSlot {
            action,
            slot,
            collected,
        } => {
            action.requires(*slot)
                && !collected.has(*slot)
                && (collected.phone.is_none() || action.requires(SlotKey::Phone))
                && collected.amount.is_none_or(is_valid_amount)
                && collected.phone.as_deref().is_none_or(is_valid_phone)
        }
        ConversationState::AwaitingConfirmation(pending) => {
            let slots = pending.slots();
            slots.amount.is_some_and(is_valid_amount)
                && slots.phone.as_deref().is_none_or(is_valid_phone)
        }
    }
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    // Invariant 1: Every reachable state satisfies the state invariants
    #[test]
    fn prop_transitions_preserve_validity(
        transcripts in proptest::collection::vec(arb_transcript(), 0..12)
    ) {
        let config = test_config();
        let mut state = ConversationState::Idle;

        for transcript in transcripts {
            let result = transition(&state, &config, &transcript);
            prop_assert!(
                is_valid_state(&result.new_state),
                "Invalid state: {:?}",
                result.new_state
            );
            prop_assert!(!result.response.is_empty());
            state = result.new_state;
        }
    }

    // Invariant 2: Reachable states survive the wire snapshot round trip
    #[test]
    fn prop_states_survive_snapshot(state in arb_state()) {
        let snapshot = StateSnapshot::from(state.clone());
        prop_assert_eq!(ConversationState::try_from(snapshot), Ok(state));
    }

    // Invariant 3: Text with no keywords is rejected from idle
    #[test]
    fn prop_idle_rejects_unrecognized(text in arb_neutral_text()) {
        let result = transition(&ConversationState::Idle, &test_config(), &text);
        prop_assert_eq!(result.intent, Intent::Unknown);
        prop_assert_eq!(result.new_state, ConversationState::Idle);
    }

    // Invariant 4: Balance completes in one turn regardless of extra words
    #[test]
    fn prop_balance_is_single_turn(before in arb_neutral_text(), after in arb_neutral_text()) {
        let config = test_config();
        let transcript = format!("{before} رصيدي {after}");
        let result = transition(&ConversationState::Idle, &config, &transcript);
        prop_assert_eq!(result.intent, Intent::Balance);
        prop_assert_eq!(result.new_state, ConversationState::Idle);
        prop_assert!(result.response.contains(&config.mock_balance.to_string()));
    }

    // Invariant 5: Transition is deterministic
    #[test]
    fn prop_transition_is_deterministic(state in arb_state(), transcript in arb_transcript()) {
        let config = test_config();
        let first = transition(&state, &config, &transcript);
        let second = transition(&state, &config, &transcript);
        prop_assert_eq!(first, second);
    }

    // Invariant 6: Unanswered confirmation leaves the state untouched
    #[test]
    fn prop_ambiguous_confirmation_keeps_state(
        pending in arb_pending_action(),
        text in "[0-9 .,!?]{0,20}"
    ) {
        let state = ConversationState::AwaitingConfirmation(pending.clone());
        let result = transition(&state, &test_config(), &text);
        prop_assert_eq!(result.new_state, state);
        prop_assert_eq!(result.intent, pending.action().intent());
        prop_assert!(result.effects.is_empty());
    }

    // Invariant 7: A yes or no answer always returns to idle
    #[test]
    fn prop_answer_returns_to_idle(
        pending in arb_pending_action(),
        answer in prop_oneof![Just("نعم"), Just("لا"), Just("ok"), Just("cancel")]
    ) {
        let state = ConversationState::AwaitingConfirmation(pending.clone());
        let result = transition(&state, &test_config(), answer);
        prop_assert_eq!(result.new_state, ConversationState::Idle);
        prop_assert_eq!(result.intent, pending.action().intent());
        prop_assert_eq!(result.effects.len(), 1);
    }

    // Invariant 8: Bad input while awaiting a slot retries in place
    #[test]
    fn prop_slot_retry_keeps_state(
        state in arb_awaiting_slot_state(),
        text in "[a-z .,!?-]{0,20}"
    ) {
        let result = transition(&state, &test_config(), &text);
        prop_assert_eq!(result.new_state, state);
    }

    // Invariant 9: Only confirmations produce effects
    #[test]
    fn prop_effects_only_from_confirmation(state in arb_state(), transcript in arb_transcript()) {
        let result = transition(&state, &test_config(), &transcript);
        if !result.effects.is_empty() {
            prop_assert!(matches!(state, ConversationState::AwaitingConfirmation(_)));
            prop_assert!(result.new_state.is_idle());
        }
    }
}
