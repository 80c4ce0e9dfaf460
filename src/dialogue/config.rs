//! Dialogue configuration: keyword tables, number words, templates, mock balance
//!
//! Defaults reproduce the shipped Hassaniya/Arabic tables. A JSON file can
//! override any subset of fields.

use super::intent::{ConfirmationKeywords, IntentKeywords};
use super::response::{placeholders, ResponseKey, ResponseTemplates};
use super::slots::{default_number_words, NumberWord};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Balance reported by the balance intent
pub const DEFAULT_MOCK_BALANCE: i64 = 5000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read dialogue config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse dialogue config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Empty keyword in {0}")]
    EmptyKeyword(&'static str),
    #[error("Template {key} references unknown placeholder {{{placeholder}}}")]
    UnknownPlaceholder {
        key: &'static str,
        placeholder: String,
    },
}

/// Everything the state machine reads besides the transcript and state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DialogueConfig {
    pub keywords: IntentKeywords,
    pub confirmation: ConfirmationKeywords,
    /// Lookup order matters: the first listed word found in the text wins
    pub number_words: Vec<NumberWord>,
    pub templates: ResponseTemplates,
    pub mock_balance: i64,
}

impl Default for DialogueConfig {
    fn default() -> Self {
        Self {
            keywords: IntentKeywords::default(),
            confirmation: ConfirmationKeywords::default(),
            number_words: default_number_words(),
            templates: ResponseTemplates::default(),
            mock_balance: DEFAULT_MOCK_BALANCE,
        }
    }
}

impl DialogueConfig {
    /// Load overrides from a JSON file and validate the result
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// An empty keyword would match every transcript; a template placeholder
    /// nobody fills would leak braces to the user.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let keyword_lists: [(&'static str, &[String]); 6] = [
            ("keywords.transfer", self.keywords.transfer.as_slice()),
            ("keywords.withdraw", self.keywords.withdraw.as_slice()),
            ("keywords.recharge", self.keywords.recharge.as_slice()),
            ("keywords.balance", self.keywords.balance.as_slice()),
            ("confirmation.yes", self.confirmation.yes.as_slice()),
            ("confirmation.no", self.confirmation.no.as_slice()),
        ];
        for (name, list) in keyword_lists {
            if list.iter().any(|k| k.trim().is_empty()) {
                return Err(ConfigError::EmptyKeyword(name));
            }
        }

        if self.number_words.iter().any(|n| n.word.trim().is_empty()) {
            return Err(ConfigError::EmptyKeyword("number_words"));
        }

        for key in ResponseKey::ALL {
            let allowed = key.placeholders();
            if let Some(placeholder) = placeholders(self.templates.get(key))
                .into_iter()
                .find(|p| !allowed.contains(&p.as_str()))
            {
                return Err(ConfigError::UnknownPlaceholder {
                    key: key.name(),
                    placeholder,
                });
            }
        }

        Ok(())
    }
}
