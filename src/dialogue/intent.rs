//! Keyword-based intent classification

use serde::{Deserialize, Serialize};

/// Intent reported for a processed turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Transfer,
    Withdraw,
    Recharge,
    Balance,
    /// Transcript matched no intent keyword
    Unknown,
    /// No action in progress (idle session)
    #[default]
    None,
}

impl Intent {
    pub fn as_str(self) -> &'static str {
        match self {
            Intent::Transfer => "transfer",
            Intent::Withdraw => "withdraw",
            Intent::Recharge => "recharge",
            Intent::Balance => "balance",
            Intent::Unknown => "unknown",
            Intent::None => "none",
        }
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Keyword lists per intent. Field order is the classification priority.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntentKeywords {
    pub transfer: Vec<String>,
    pub withdraw: Vec<String>,
    pub recharge: Vec<String>,
    pub balance: Vec<String>,
}

impl Default for IntentKeywords {
    fn default() -> Self {
        Self {
            transfer: words(&["حول", "ارسل", "رسل", "احول"]),
            withdraw: words(&["سحب", "نسحب", "اسحب", "ابغ نسحب", "نبغ نسحب"]),
            recharge: words(&["زيني", "الإنترنت", "نت", "عبّي", "عبي"]),
            balance: words(&["رصيدي", "الرصيد", "شنه رصيدي", "كم عندي", "رصيد"]),
        }
    }
}

impl IntentKeywords {
    /// `(intent, keywords)` pairs in priority order
    pub fn ordered(&self) -> [(Intent, &[String]); 4] {
        [
            (Intent::Transfer, self.transfer.as_slice()),
            (Intent::Withdraw, self.withdraw.as_slice()),
            (Intent::Recharge, self.recharge.as_slice()),
            (Intent::Balance, self.balance.as_slice()),
        ]
    }

    /// First intent with any keyword contained in the case-folded transcript.
    /// Earlier intents win when several match.
    pub fn classify(&self, transcript: &str) -> Option<Intent> {
        let normalized = normalize(transcript);
        self.ordered()
            .into_iter()
            .find(|(_, keywords)| contains_any(&normalized, keywords))
            .map(|(intent, _)| intent)
    }
}

/// Yes/no word lists used while awaiting confirmation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfirmationKeywords {
    pub yes: Vec<String>,
    pub no: Vec<String>,
}

impl Default for ConfirmationKeywords {
    fn default() -> Self {
        Self {
            yes: words(&["نعم", "ايه", "تمام", "أكيد", "موافق", "صح", "yes", "ok"]),
            no: words(&["لا", "لأ", "إلغاء", "الغي", "no", "cancel"]),
        }
    }
}

/// Answer to a confirmation prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    Yes,
    No,
}

impl ConfirmationKeywords {
    /// "No" is checked before "yes".
    pub fn answer(&self, transcript: &str) -> Option<Answer> {
        let normalized = normalize(transcript);
        if contains_any(&normalized, &self.no) {
            Some(Answer::No)
        } else if contains_any(&normalized, &self.yes) {
            Some(Answer::Yes)
        } else {
            None
        }
    }
}

/// Case-fold a transcript before keyword matching
pub fn normalize(transcript: &str) -> String {
    transcript.to_lowercase()
}

fn contains_any(text: &str, keywords: &[String]) -> bool {
    keywords.iter().any(|k| text.contains(k.as_str()))
}

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|w| (*w).to_string()).collect()
}
