// 🔢 Word-to-Number Converter
// "doscientos treinta y cinco" → 235, "dos mil quinientos" → 2500

use lazy_static::lazy_static;
use regex::Regex;

use crate::amount::Amount;
use crate::lexicon::{Lexicon, HUNDREDS_THRESHOLD, THOUSANDS_VALUE};
use crate::normalize::sanitize_words;

/// Connector between tens and units ("treinta y cinco")
pub const CONNECTOR: &str = "y";

lazy_static! {
    static ref PLAIN_NUMBER: Regex = Regex::new(r"^-?\d+(?:[.,]\d+)?$").unwrap();
    static ref TOKEN_SPLIT: Regex = Regex::new(r"[\s-]+").unwrap();
}

/// WordConverter - Convierte secuencias de palabras en números
///
/// `None` means "no match": callers try the next pattern. It is never
/// folded into zero, because "cero" is a perfectly good answer.
#[derive(Debug, Clone)]
pub struct WordConverter {
    lexicon: Lexicon,
}

impl WordConverter {
    pub fn new(lexicon: Lexicon) -> Self {
        WordConverter { lexicon }
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    /// Convert a word run (or a bare digit literal) into an amount
    ///
    /// Word runs always yield whole units; only a digit literal such as
    /// "2,50" can carry cents.
    pub fn convert(&self, text: &str) -> Option<Amount> {
        let raw = text.trim().to_lowercase();
        if raw.is_empty() {
            return None;
        }

        // Digits first: a literal is never reinterpreted as words
        if PLAIN_NUMBER.is_match(&raw) {
            return Amount::parse_literal(&raw);
        }

        let value = self.convert_words(&sanitize_words(&raw))?;
        Amount::from_major(i64::try_from(value).ok()?)
    }

    /// Word-only conversion to an integer
    pub fn convert_words(&self, text: &str) -> Option<u64> {
        let tokens: Vec<&str> = TOKEN_SPLIT
            .split(text)
            .filter(|t| !t.is_empty())
            .collect();
        if tokens.is_empty() {
            return None;
        }

        // "mil" splits the run into groups, rightmost group has multiplier 1
        let groups: Vec<&[&str]> = tokens
            .split(|t| self.lexicon.is_thousands(t))
            .collect();
        let group_count = groups.len();

        let mut total: u64 = 0;
        for (i, group) in groups.iter().enumerate() {
            let exponent = u32::try_from(group_count - 1 - i).ok()?;
            let multiplier = THOUSANDS_VALUE.checked_pow(exponent)?;

            let group_value = if group.is_empty() && multiplier >= THOUSANDS_VALUE {
                // bare "mil" means one thousand
                1
            } else {
                self.group_value(group, group_count > 1)?
            };

            total = total.checked_add(group_value.checked_mul(multiplier)?)?;
        }

        Some(total)
    }

    fn group_value(&self, tokens: &[&str], multi_group: bool) -> Option<u64> {
        // "un mil": a lone "un" ahead of "mil" still counts as one
        if multi_group && tokens == ["un"] {
            return Some(1);
        }

        let mut value: u64 = 0;
        let mut current: u64 = 0;

        for token in tokens {
            if *token == CONNECTOR {
                continue;
            }

            let word_value = self.lexicon.get(token)?;
            if word_value >= HUNDREDS_THRESHOLD {
                let base = if current > 0 { current } else { 1 };
                value = value.checked_add(base.checked_mul(word_value)?)?;
                current = 0;
            } else {
                current = current.checked_add(word_value)?;
            }
        }

        value.checked_add(current)
    }
}

impl Default for WordConverter {
    fn default() -> Self {
        WordConverter::new(Lexicon::spanish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(text: &str) -> Option<u64> {
        WordConverter::default().convert_words(text)
    }

    #[test]
    fn test_units_tens_hundreds() {
        assert_eq!(words("siete"), Some(7));
        assert_eq!(words("treinta y cinco"), Some(35));
        assert_eq!(words("cien"), Some(100));
        assert_eq!(words("ciento veinte"), Some(120));
        assert_eq!(words("doscientos treinta y cinco"), Some(235));
        assert_eq!(words("veinticinco"), Some(25));
    }

    #[test]
    fn test_thousands_groups() {
        assert_eq!(words("mil"), Some(1000));
        assert_eq!(words("dos mil"), Some(2000));
        assert_eq!(words("dos mil quinientos"), Some(2500));
        assert_eq!(words("mil doscientos"), Some(1200));
        assert_eq!(words("un mil"), Some(1000));
        assert_eq!(words("tres mil cuatrocientos cincuenta y seis"), Some(3456));
    }

    #[test]
    fn test_hyphen_separated_tokens() {
        assert_eq!(words("treinta-y-dos"), Some(32));
    }

    #[test]
    fn test_zero_is_not_failure() {
        assert_eq!(words("cero"), Some(0));
    }

    #[test]
    fn test_unknown_token_fails_whole_run() {
        assert_eq!(words("siete manzanas"), None);
        assert_eq!(words("euros"), None);
        assert_eq!(words(""), None);
    }

    #[test]
    fn test_convert_prefers_digits() {
        let converter = WordConverter::default();
        assert_eq!(converter.convert("25"), Some(Amount::from_cents(2500)));
        assert_eq!(converter.convert("2,5"), Some(Amount::from_cents(250)));
        assert_eq!(converter.convert("Dieciséis"), Some(Amount::from_cents(1600)));
        assert_eq!(converter.convert("   "), None);
    }

    #[test]
    fn test_overflow_is_failure() {
        let huge = vec!["mil"; 12].join(" ");
        assert_eq!(words(&huge), None);
    }
}
