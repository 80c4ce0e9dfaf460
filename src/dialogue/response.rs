//! Response templates and placeholder rendering

use super::state::{Action, PendingAction, SlotKey};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("placeholder pattern is valid")
});

/// Symbolic template names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResponseKey {
    TransferConfirm,
    TransferDone,
    TransferNeedPhone,
    TransferNeedAmount,
    WithdrawConfirm,
    WithdrawDone,
    WithdrawNeedAmount,
    BalanceShow,
    RechargeConfirm,
    RechargeDone,
    RechargeNeedAmount,
    Unknown,
    ConfirmCancelled,
    ConfirmPrompt,
    InvalidAmount,
    InvalidPhone,
}

impl ResponseKey {
    pub const ALL: [ResponseKey; 16] = [
        ResponseKey::TransferConfirm,
        ResponseKey::TransferDone,
        ResponseKey::TransferNeedPhone,
        ResponseKey::TransferNeedAmount,
        ResponseKey::WithdrawConfirm,
        ResponseKey::WithdrawDone,
        ResponseKey::WithdrawNeedAmount,
        ResponseKey::BalanceShow,
        ResponseKey::RechargeConfirm,
        ResponseKey::RechargeDone,
        ResponseKey::RechargeNeedAmount,
        ResponseKey::Unknown,
        ResponseKey::ConfirmCancelled,
        ResponseKey::ConfirmPrompt,
        ResponseKey::InvalidAmount,
        ResponseKey::InvalidPhone,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ResponseKey::TransferConfirm => "transfer_confirm",
            ResponseKey::TransferDone => "transfer_done",
            ResponseKey::TransferNeedPhone => "transfer_need_phone",
            ResponseKey::TransferNeedAmount => "transfer_need_amount",
            ResponseKey::WithdrawConfirm => "withdraw_confirm",
            ResponseKey::WithdrawDone => "withdraw_done",
            ResponseKey::WithdrawNeedAmount => "withdraw_need_amount",
            ResponseKey::BalanceShow => "balance_show",
            ResponseKey::RechargeConfirm => "recharge_confirm",
            ResponseKey::RechargeDone => "recharge_done",
            ResponseKey::RechargeNeedAmount => "recharge_need_amount",
            ResponseKey::Unknown => "unknown",
            ResponseKey::ConfirmCancelled => "confirm_cancelled",
            ResponseKey::ConfirmPrompt => "confirm_prompt",
            ResponseKey::InvalidAmount => "invalid_amount",
            ResponseKey::InvalidPhone => "invalid_phone",
        }
    }

    /// Placeholders the state machine fills for this template
    pub fn placeholders(self) -> &'static [&'static str] {
        match self {
            ResponseKey::TransferConfirm => &["amount", "phone"],
            ResponseKey::WithdrawConfirm | ResponseKey::RechargeConfirm => &["amount"],
            ResponseKey::BalanceShow => &["balance"],
            _ => &[],
        }
    }

    pub fn confirm(action: Action) -> Self {
        match action {
            Action::Transfer => ResponseKey::TransferConfirm,
            Action::Withdraw => ResponseKey::WithdrawConfirm,
            Action::Recharge => ResponseKey::RechargeConfirm,
        }
    }

    pub fn done(action: Action) -> Self {
        match action {
            Action::Transfer => ResponseKey::TransferDone,
            Action::Withdraw => ResponseKey::WithdrawDone,
            Action::Recharge => ResponseKey::RechargeDone,
        }
    }

    /// Prompt asking for a missing slot. Only transfer ever asks for a phone.
    pub fn need(action: Action, slot: SlotKey) -> Self {
        match (action, slot) {
            (Action::Transfer, SlotKey::Amount) => ResponseKey::TransferNeedAmount,
            (Action::Withdraw, SlotKey::Amount) => ResponseKey::WithdrawNeedAmount,
            (Action::Recharge, SlotKey::Amount) => ResponseKey::RechargeNeedAmount,
            (_, SlotKey::Phone) => ResponseKey::TransferNeedPhone,
        }
    }

    pub fn invalid(slot: SlotKey) -> Self {
        match slot {
            SlotKey::Amount => ResponseKey::InvalidAmount,
            SlotKey::Phone => ResponseKey::InvalidPhone,
        }
    }
}

/// Template text per key, authored in the spoken dialect
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResponseTemplates {
    pub transfer_confirm: String,
    pub transfer_done: String,
    pub transfer_need_phone: String,
    pub transfer_need_amount: String,
    pub withdraw_confirm: String,
    pub withdraw_done: String,
    pub withdraw_need_amount: String,
    pub balance_show: String,
    pub recharge_confirm: String,
    pub recharge_done: String,
    pub recharge_need_amount: String,
    pub unknown: String,
    pub confirm_cancelled: String,
    pub confirm_prompt: String,
    pub invalid_amount: String,
    pub invalid_phone: String,
}

impl Default for ResponseTemplates {
    fn default() -> Self {
        Self {
            transfer_confirm: "هل تؤكد تحويل {amount} أوقية إلى الرقم {phone}؟".into(),
            transfer_done: "تم تحويل المبلغ بنجاح ✅".into(),
            transfer_need_phone: "من فضلك، أدخل رقم الهاتف الذي تريد التحويل إليه.".into(),
            transfer_need_amount: "من فضلك، حدد المبلغ الذي تريد تحويله.".into(),
            withdraw_confirm: "هل تؤكد سحب {amount} أوقية من حسابك؟".into(),
            withdraw_done: "تم السحب بنجاح ✅".into(),
            withdraw_need_amount: "من فضلك، حدد المبلغ الذي تريد سحبه.".into(),
            balance_show: "رصيدك الحالي هو {balance} أوقية 💰".into(),
            recharge_confirm: "هل تريد تعبئة الإنترنت بمبلغ {amount} أوقية؟".into(),
            recharge_done: "تمت تعبئة الإنترنت بنجاح ✅".into(),
            recharge_need_amount: "من فضلك، حدد مبلغ التعبئة.".into(),
            unknown: "عذراً، لم أفهم طلبك. يمكنني مساعدتك في: تحويل الأموال، السحب، تعبئة الإنترنت، أو معرفة الرصيد.".into(),
            confirm_cancelled: "تم إلغاء العملية.".into(),
            confirm_prompt: "من فضلك قل نعم أو لا.".into(),
            invalid_amount: "المبلغ غير صحيح. من فضلك أدخل رقماً صحيحاً.".into(),
            invalid_phone: "رقم الهاتف غير صحيح. من فضلك أدخل رقماً صحيحاً (8 أرقام).".into(),
        }
    }
}

impl ResponseTemplates {
    pub fn get(&self, key: ResponseKey) -> &str {
        match key {
            ResponseKey::TransferConfirm => &self.transfer_confirm,
            ResponseKey::TransferDone => &self.transfer_done,
            ResponseKey::TransferNeedPhone => &self.transfer_need_phone,
            ResponseKey::TransferNeedAmount => &self.transfer_need_amount,
            ResponseKey::WithdrawConfirm => &self.withdraw_confirm,
            ResponseKey::WithdrawDone => &self.withdraw_done,
            ResponseKey::WithdrawNeedAmount => &self.withdraw_need_amount,
            ResponseKey::BalanceShow => &self.balance_show,
            ResponseKey::RechargeConfirm => &self.recharge_confirm,
            ResponseKey::RechargeDone => &self.recharge_done,
            ResponseKey::RechargeNeedAmount => &self.recharge_need_amount,
            ResponseKey::Unknown => &self.unknown,
            ResponseKey::ConfirmCancelled => &self.confirm_cancelled,
            ResponseKey::ConfirmPrompt => &self.confirm_prompt,
            ResponseKey::InvalidAmount => &self.invalid_amount,
            ResponseKey::InvalidPhone => &self.invalid_phone,
        }
    }

    /// Template text with no placeholders filled
    pub fn plain(&self, key: ResponseKey) -> String {
        self.get(key).to_string()
    }

    /// Confirmation question for a fully specified action
    pub fn confirmation(&self, pending: &PendingAction) -> String {
        let template = self.get(ResponseKey::confirm(pending.action()));
        match pending {
            PendingAction::Transfer { amount, phone } => render(
                template,
                &[("amount", amount.to_string()), ("phone", phone.clone())],
            ),
            PendingAction::Withdraw { amount } | PendingAction::Recharge { amount } => {
                render(template, &[("amount", amount.to_string())])
            }
        }
    }

    pub fn balance(&self, balance: i64) -> String {
        render(
            self.get(ResponseKey::BalanceShow),
            &[("balance", balance.to_string())],
        )
    }
}

/// Replace every `{name}` with its value. Unknown placeholders stay as-is.
pub fn render(template: &str, values: &[(&str, String)]) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &regex::Captures<'_>| {
            let name = &caps[1];
            values
                .iter()
                .find(|(key, _)| *key == name)
                .map_or_else(|| caps[0].to_string(), |(_, value)| value.clone())
        })
        .into_owned()
}

/// Placeholder names referenced by a template, in order of appearance
pub fn placeholders(template: &str) -> Vec<String> {
    PLACEHOLDER
        .captures_iter(template)
        .map(|caps| caps[1].to_string())
        .collect()
}
