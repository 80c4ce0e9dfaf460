//! Pure dialogue transition function
//!
//! Dispatch priority: awaiting confirmation, awaiting a slot, idle.

use super::config::DialogueConfig;
use super::effect::Effect;
use super::intent::{Answer, Intent};
use super::response::ResponseKey;
use super::slots::{extract_amount, extract_phone, is_valid_amount, is_valid_phone};
use super::state::{Action, ConversationState, PendingAction, SlotKey, SlotValues};

/// Outcome of processing one transcript
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnResult {
    pub response: String,
    pub new_state: ConversationState,
    pub intent: Intent,
    pub effects: Vec<Effect>,
}

impl TurnResult {
    pub fn new(response: String, new_state: ConversationState, intent: Intent) -> Self {
        Self {
            response,
            new_state,
            intent,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Pure transition: same transcript, state and config always give the same
/// result. Never fails; every input maps to a response and a next state.
pub fn transition(
    state: &ConversationState,
    config: &DialogueConfig,
    transcript: &str,
) -> TurnResult {
    match state {
        ConversationState::AwaitingConfirmation(pending) => {
            handle_confirmation(state, pending, config, transcript)
        }
        ConversationState::AwaitingSlot {
            action,
            slot,
            collected,
        } => handle_slot(state, *action, *slot, collected, config, transcript),
        ConversationState::Idle => handle_idle(config, transcript),
    }
}

// ============================================================
// Awaiting Confirmation
// ============================================================

fn handle_confirmation(
    state: &ConversationState,
    pending: &PendingAction,
    config: &DialogueConfig,
    transcript: &str,
) -> TurnResult {
    let templates = &config.templates;
    let intent = pending.action().intent();

    match config.confirmation.answer(transcript) {
        Some(Answer::No) => {
            let response = templates.plain(ResponseKey::ConfirmCancelled);
            TurnResult::new(response, ConversationState::Idle, intent)
                .with_effect(Effect::discard(pending.clone()))
        }

        Some(Answer::Yes) => {
            let response = templates.plain(ResponseKey::done(pending.action()));
            TurnResult::new(response, ConversationState::Idle, intent)
                .with_effect(Effect::execute(pending.clone()))
        }

        // Re-prompt and keep waiting
        None => TurnResult::new(
            templates.plain(ResponseKey::ConfirmPrompt),
            state.clone(),
            intent,
        ),
    }
}

// ============================================================
// Awaiting Slot (retry in place on bad input)
// ============================================================

fn handle_slot(
    state: &ConversationState,
    action: Action,
    slot: SlotKey,
    collected: &SlotValues,
    config: &DialogueConfig,
    transcript: &str,
) -> TurnResult {
    // The awaited slot is never already filled, so an empty merge means bad input
    let mut merged = collected.clone();
    match slot {
        SlotKey::Amount => {
            merged.amount = extract_amount(transcript, &config.number_words)
                .filter(|amount| is_valid_amount(*amount));
        }
        SlotKey::Phone => {
            merged.phone = extract_phone(transcript).filter(|phone| is_valid_phone(phone));
        }
    }

    if !merged.has(slot) {
        return TurnResult::new(
            config.templates.plain(ResponseKey::invalid(slot)),
            state.clone(),
            action.intent(),
        );
    }

    advance(action, merged, config)
}

// ============================================================
// Idle (classify, then fill from the same utterance)
// ============================================================

fn handle_idle(config: &DialogueConfig, transcript: &str) -> TurnResult {
    let templates = &config.templates;

    let Some(intent) = config.keywords.classify(transcript) else {
        return TurnResult::new(
            templates.plain(ResponseKey::Unknown),
            ConversationState::Idle,
            Intent::Unknown,
        );
    };

    let Some(action) = Action::from_intent(intent) else {
        // Balance: single turn, no slots, no confirmation
        return TurnResult::new(
            templates.balance(config.mock_balance),
            ConversationState::Idle,
            Intent::Balance,
        );
    };

    let mut collected = SlotValues::default();
    for slot in action.required_slots() {
        match slot {
            SlotKey::Amount => collected.amount = extract_amount(transcript, &config.number_words),
            SlotKey::Phone => collected.phone = extract_phone(transcript),
        }
    }

    // A volunteered value that fails validation drops the whole attempt
    if let Some(invalid) = first_invalid(&collected) {
        return TurnResult::new(
            templates.plain(ResponseKey::invalid(invalid)),
            ConversationState::Idle,
            intent,
        );
    }

    advance(action, collected, config)
}

fn first_invalid(collected: &SlotValues) -> Option<SlotKey> {
    if !collected.amount.is_none_or(is_valid_amount) {
        return Some(SlotKey::Amount);
    }
    if !collected.phone.as_deref().is_none_or(is_valid_phone) {
        return Some(SlotKey::Phone);
    }
    None
}

/// Ask for the next missing slot, or for confirmation once all are present
fn advance(action: Action, collected: SlotValues, config: &DialogueConfig) -> TurnResult {
    let templates = &config.templates;

    if let Some(slot) = action.next_missing(&collected) {
        return TurnResult::new(
            templates.plain(ResponseKey::need(action, slot)),
            ConversationState::AwaitingSlot {
                action,
                slot,
                collected,
            },
            action.intent(),
        );
    }

    match action.complete(&collected) {
        Some(pending) => TurnResult::new(
            templates.confirmation(&pending),
            ConversationState::AwaitingConfirmation(pending),
            action.intent(),
        ),
        // next_missing found nothing, so every required slot is present
        None => TurnResult::new(
            templates.plain(ResponseKey::Unknown),
            ConversationState::Idle,
            Intent::Unknown,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> DialogueConfig {
        DialogueConfig::default()
    }

    fn run(state: &ConversationState, transcript: &str) -> TurnResult {
        transition(state, &config(), transcript)
    }

    fn awaiting_amount(action: Action) -> ConversationState {
        ConversationState::AwaitingSlot {
            action,
            slot: SlotKey::Amount,
            collected: SlotValues::default(),
        }
    }

    fn confirming_withdraw() -> ConversationState {
        ConversationState::AwaitingConfirmation(PendingAction::Withdraw { amount: 200 })
    }

    #[test]
    fn test_unknown_transcript_stays_idle() {
        let result = run(&ConversationState::Idle, "hello there");
        assert_eq!(result.intent, Intent::Unknown);
        assert_eq!(result.new_state, ConversationState::Idle);
        assert_eq!(result.response, config().templates.unknown);
    }

    #[test]
    fn test_empty_transcript_is_unknown() {
        for transcript in ["", "   "] {
            let result = run(&ConversationState::Idle, transcript);
            assert_eq!(result.intent, Intent::Unknown);
            assert!(result.new_state.is_idle());
        }
    }

    #[test]
    fn test_balance_is_single_turn() {
        let result = run(&ConversationState::Idle, "رصيدي please");
        assert_eq!(result.intent, Intent::Balance);
        assert!(result.new_state.is_idle());
        assert!(result.response.contains("5000"));
    }

    #[test]
    fn test_balance_uses_configured_amount() {
        let config = DialogueConfig {
            mock_balance: 750,
            ..DialogueConfig::default()
        };
        let result = transition(&ConversationState::Idle, &config, "الرصيد");
        assert!(result.response.contains("750"));
    }

    #[test]
    fn test_transfer_fast_path() {
        let result = run(&ConversationState::Idle, "حول 500 الى 12345678");
        assert_eq!(result.intent, Intent::Transfer);
        assert_eq!(
            result.new_state,
            ConversationState::AwaitingConfirmation(PendingAction::Transfer {
                amount: 500,
                phone: "12345678".to_string(),
            })
        );
        assert_eq!(
            result.response,
            "هل تؤكد تحويل 500 أوقية إلى الرقم 12345678؟"
        );
    }

    #[test]
    fn test_transfer_partial_then_phone() {
        let first = run(&ConversationState::Idle, "حول 500");
        assert_eq!(
            first.new_state,
            ConversationState::AwaitingSlot {
                action: Action::Transfer,
                slot: SlotKey::Phone,
                collected: SlotValues {
                    amount: Some(500),
                    phone: None,
                },
            }
        );
        assert_eq!(first.response, config().templates.transfer_need_phone);

        let second = run(&first.new_state, "12345678");
        assert_eq!(
            second.new_state,
            ConversationState::AwaitingConfirmation(PendingAction::Transfer {
                amount: 500,
                phone: "12345678".to_string(),
            })
        );
        assert_eq!(second.intent, Intent::Transfer);
    }

    #[test]
    fn test_transfer_with_long_digit_run_asks_for_phone() {
        // A nine-digit run is not a phone number, so only the amount is kept
        let result = run(&ConversationState::Idle, "حول 500 الى 123456789");
        assert_eq!(result.intent, Intent::Transfer);
        assert_eq!(
            result.new_state,
            ConversationState::AwaitingSlot {
                action: Action::Transfer,
                slot: SlotKey::Phone,
                collected: SlotValues {
                    amount: Some(500),
                    phone: None,
                },
            }
        );
        assert_eq!(result.response, config().templates.transfer_need_phone);
    }

    #[test]
    fn test_transfer_without_slots_asks_amount_first() {
        let result = run(&ConversationState::Idle, "ابغي احول فلوس");
        assert_eq!(result.new_state, awaiting_amount(Action::Transfer));
        assert_eq!(result.response, config().templates.transfer_need_amount);
    }

    #[test]
    fn test_transfer_amount_after_phone_goes_to_confirmation() {
        let state = ConversationState::AwaitingSlot {
            action: Action::Transfer,
            slot: SlotKey::Amount,
            collected: SlotValues {
                amount: None,
                phone: Some("22334455".to_string()),
            },
        };
        let result = run(&state, "300");
        assert_eq!(
            result.new_state,
            ConversationState::AwaitingConfirmation(PendingAction::Transfer {
                amount: 300,
                phone: "22334455".to_string(),
            })
        );
    }

    #[test]
    fn test_withdraw_with_amount_requests_confirmation() {
        let result = run(&ConversationState::Idle, "نسحب 200");
        assert_eq!(result.new_state, confirming_withdraw());
        assert_eq!(result.response, "هل تؤكد سحب 200 أوقية من حسابك؟");
    }

    #[test]
    fn test_recharge_without_amount_asks_for_it() {
        let result = run(&ConversationState::Idle, "زيني");
        assert_eq!(result.intent, Intent::Recharge);
        assert_eq!(result.new_state, awaiting_amount(Action::Recharge));
        assert_eq!(result.response, config().templates.recharge_need_amount);
    }

    #[test]
    fn test_invalid_amount_at_declaration_resets() {
        let result = run(&ConversationState::Idle, "اسحب صفر");
        assert_eq!(result.intent, Intent::Withdraw);
        assert!(result.new_state.is_idle());
        assert_eq!(result.response, config().templates.invalid_amount);
    }

    #[test]
    fn test_invalid_amount_while_awaiting_retries_in_place() {
        let state = awaiting_amount(Action::Withdraw);
        for transcript in ["-5", "ما ادري"] {
            let result = run(&state, transcript);
            assert_eq!(result.new_state, state);
            assert_eq!(result.intent, Intent::Withdraw);
            assert_eq!(result.response, config().templates.invalid_amount);
        }
    }

    #[test]
    fn test_invalid_phone_while_awaiting_retries_in_place() {
        let state = ConversationState::AwaitingSlot {
            action: Action::Transfer,
            slot: SlotKey::Phone,
            collected: SlotValues {
                amount: Some(500),
                phone: None,
            },
        };
        let result = run(&state, "123456789");
        assert_eq!(result.new_state, state);
        assert_eq!(result.response, config().templates.invalid_phone);
    }

    #[test]
    fn test_confirmation_yes_executes() {
        let result = run(&confirming_withdraw(), "نعم");
        assert_eq!(result.response, config().templates.withdraw_done);
        assert!(result.new_state.is_idle());
        assert_eq!(result.intent, Intent::Withdraw);
        assert_eq!(
            result.effects,
            vec![Effect::execute(PendingAction::Withdraw { amount: 200 })]
        );
    }

    #[test]
    fn test_confirmation_no_cancels() {
        let result = run(&confirming_withdraw(), "لا");
        assert_eq!(result.response, config().templates.confirm_cancelled);
        assert!(result.new_state.is_idle());
        assert_eq!(result.intent, Intent::Withdraw);
        assert_eq!(
            result.effects,
            vec![Effect::discard(PendingAction::Withdraw { amount: 200 })]
        );
    }

    #[test]
    fn test_confirmation_no_wins_over_yes() {
        let result = run(&confirming_withdraw(), "yes... no, cancel");
        assert_eq!(result.response, config().templates.confirm_cancelled);
    }

    #[test]
    fn test_ambiguous_confirmation_keeps_state() {
        let state = confirming_withdraw();
        let result = run(&state, "حول 500");
        assert_eq!(result.new_state, state);
        assert_eq!(result.response, config().templates.confirm_prompt);
        assert!(result.effects.is_empty());
    }

    #[test]
    fn test_recharge_done_template() {
        let state =
            ConversationState::AwaitingConfirmation(PendingAction::Recharge { amount: 100 });
        let result = run(&state, "تمام");
        assert_eq!(result.response, config().templates.recharge_done);
        assert_eq!(result.intent, Intent::Recharge);
    }

    #[test]
    fn test_transition_does_not_touch_input_state() {
        let state = awaiting_amount(Action::Transfer);
        let before = state.clone();
        let _ = run(&state, "500");
        assert_eq!(state, before);
    }
}
