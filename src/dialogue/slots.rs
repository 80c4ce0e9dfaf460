//! Amount and phone-number extraction from free text

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Signed decimal digit run. A `-` glued to the digits belongs to the number.
static AMOUNT_DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-?[0-9]+").expect("amount pattern is valid"));

static DIGIT_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+").expect("digit pattern is valid"));

/// Length of a local phone number
pub const PHONE_DIGITS: usize = 8;

/// A spoken number word and its value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberWord {
    pub word: String,
    pub value: i64,
}

impl NumberWord {
    fn new(word: &str, value: i64) -> Self {
        Self {
            word: word.to_string(),
            value,
        }
    }
}

/// Number words in lookup order. Lookup is first-listed-wins, not
/// first-in-text.
pub fn default_number_words() -> Vec<NumberWord> {
    [
        ("صفر", 0),
        ("واحد", 1),
        ("اثنين", 2),
        ("ثلاثة", 3),
        ("أربعة", 4),
        ("خمسة", 5),
        ("ستة", 6),
        ("سبعة", 7),
        ("ثمانية", 8),
        ("تسعة", 9),
        ("عشرة", 10),
        ("عشرين", 20),
        ("ثلاثين", 30),
        ("أربعين", 40),
        ("خمسين", 50),
        ("ستين", 60),
        ("سبعين", 70),
        ("ثمانين", 80),
        ("تسعين", 90),
        ("مئة", 100),
        ("مائة", 100),
        ("ألف", 1000),
        ("الف", 1000),
    ]
    .into_iter()
    .map(|(word, value)| NumberWord::new(word, value))
    .collect()
}

/// Extract an amount: the first listed number word contained in the text,
/// else the first digit run. Digit runs that overflow `i64` are ignored.
pub fn extract_amount(text: &str, number_words: &[NumberWord]) -> Option<i64> {
    if let Some(found) = number_words
        .iter()
        .find(|n| text.contains(n.word.as_str()))
    {
        return Some(found.value);
    }

    AMOUNT_DIGITS
        .find(text)
        .and_then(|m| m.as_str().parse::<i64>().ok())
}

/// Extract the first digit run that is exactly eight digits long.
/// Longer runs are skipped, not truncated.
pub fn extract_phone(text: &str) -> Option<String> {
    DIGIT_RUN
        .find_iter(text)
        .map(|m| m.as_str())
        .find(|run| run.len() == PHONE_DIGITS)
        .map(str::to_string)
}

pub fn is_valid_amount(amount: i64) -> bool {
    amount > 0
}

pub fn is_valid_phone(phone: &str) -> bool {
    phone.len() == PHONE_DIGITS && phone.bytes().all(|b| b.is_ascii_digit())
}
