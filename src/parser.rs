// 🗣️ Amount Phrase Parser
// Free-form spoken/typed Spanish → Amount, via an ordered list of rules

use lazy_static::lazy_static;
use regex::Regex;

use crate::amount::Amount;
use crate::config::ParserConfig;
use crate::error::ParseError;
use crate::lexicon::Lexicon;
use crate::normalize::normalize_phrase;
use crate::words::{WordConverter, CONNECTOR};

lazy_static! {
    static ref TIME_LIKE: Regex = Regex::new(r"(\d{1,2}):(\d{2})").unwrap();
    static ref DIGIT_LITERAL: Regex = Regex::new(r"-?\d+(?:[.,]\d*)?").unwrap();
    static ref EUROS_Y_CENTS: Regex =
        Regex::new(r"([\w\s-]+?)\s*(?:euros|euro)\s+y\s+([\w\s-]+?)\s*(?:centimos)?$").unwrap();
    static ref EUROS_CON_CENTS: Regex =
        Regex::new(r"([\w\s-]+?)\s*(?:euros|euro)?\s*con\s*([\w\s-]+?)\s*(?:centimos)?$").unwrap();
    static ref SPOKEN_DECIMAL: Regex =
        Regex::new(r"([\w\s-]+)\s*(?:coma|punto)\s*([\w\s-]+)").unwrap();
    static ref EUROS_ONLY: Regex = Regex::new(r"([\w\s-]+?)\s*(?:euros|euro)$").unwrap();
    static ref CENTS_ONLY: Regex = Regex::new(r"([\w\s-]+?)\s*centimos$").unwrap();
    static ref DEFAULT_PARSER: AmountParser = AmountParser::default();
}

/// Upper bound (exclusive) on the euros value for the two-word guess
const TWO_WORD_EUROS_LIMIT: i64 = 20;

// ============================================================================
// RULE TRAIT
// ============================================================================

/// AmountRule - One pattern in the cascade
///
/// `apply` gets the already-normalized phrase. Returning `None` means "not
/// mine, try the next rule"; it is not a verdict on the whole phrase.
pub trait AmountRule: Send + Sync {
    /// Short name for logs and API responses
    fn name(&self) -> &'static str;

    fn apply(&self, text: &str, words: &WordConverter) -> Option<Amount>;
}

/// euros + cents/100, where `cents` is a whole number of cents
fn euros_and_cents(euros: Amount, cents: Amount) -> Option<Amount> {
    euros.checked_add(Amount::from_cents(cents.cents() / 100))
}

// ============================================================================
// RULES (in priority order)
// ============================================================================

/// 1. "9:50" - recognizers sometimes hear amounts as clock times
pub struct TimeLikeRule;

impl AmountRule for TimeLikeRule {
    fn name(&self) -> &'static str {
        "time_like"
    }

    fn apply(&self, text: &str, _words: &WordConverter) -> Option<Amount> {
        let caps = TIME_LIKE.captures(text)?;
        Amount::parse_literal(&format!("{}.{}", &caps[1], &caps[2]))
    }
}

/// 2. Any digit literal in the phrase: "2,50", "2.50", "25 euros"
pub struct DigitLiteralRule;

impl AmountRule for DigitLiteralRule {
    fn name(&self) -> &'static str {
        "digit_literal"
    }

    fn apply(&self, text: &str, _words: &WordConverter) -> Option<Amount> {
        let found = DIGIT_LITERAL.find(text)?;
        Amount::parse_literal(found.as_str())
    }
}

/// 3. "dos euros y cincuenta [centimos]"
pub struct EurosYCentsRule;

impl AmountRule for EurosYCentsRule {
    fn name(&self) -> &'static str {
        "euros_y_cents"
    }

    fn apply(&self, text: &str, words: &WordConverter) -> Option<Amount> {
        let caps = EUROS_Y_CENTS.captures(text)?;
        let euros = words.convert(caps[1].trim())?;
        let cents = words.convert(caps[2].trim())?;
        euros_and_cents(euros, cents)
    }
}

/// 4. "siete [euros] con cincuenta [centimos]"
pub struct EurosConCentsRule;

impl AmountRule for EurosConCentsRule {
    fn name(&self) -> &'static str {
        "euros_con_cents"
    }

    fn apply(&self, text: &str, words: &WordConverter) -> Option<Amount> {
        let caps = EUROS_CON_CENTS.captures(text)?;
        let euros = words.convert(caps[1].trim())?;
        let cents = words.convert(caps[2].trim())?;
        euros_and_cents(euros, cents)
    }
}

/// 5. "siete coma cinco" → 7.05 (right side padded on the left to 2 digits)
pub struct SpokenDecimalRule;

impl AmountRule for SpokenDecimalRule {
    fn name(&self) -> &'static str {
        "spoken_decimal"
    }

    fn apply(&self, text: &str, words: &WordConverter) -> Option<Amount> {
        let caps = SPOKEN_DECIMAL.captures(text)?;
        let left = words.convert(caps[1].trim())?.whole_units()?;
        let right = words.convert(caps[2].trim())?.whole_units()?;
        if left < 0 || right < 0 {
            return None;
        }
        Amount::parse_literal(&format!("{}.{:02}", left, right))
    }
}

/// 6. "siete cincuenta" → 7.50
///
/// Heuristic, not grammar: only fires when the pair also reads as one
/// compound number (7 + 50 == "siete cincuenta") and euros < 20, so
/// "veinte cincuenta" stays a compound 70.
pub struct TwoWordRule;

impl AmountRule for TwoWordRule {
    fn name(&self) -> &'static str {
        "two_word"
    }

    fn apply(&self, text: &str, words: &WordConverter) -> Option<Amount> {
        let parts: Vec<&str> = text.split(' ').collect();
        if parts.len() != 2 || parts.contains(&CONNECTOR) {
            return None;
        }

        let euros = words.convert(parts[0])?;
        let cents = words.convert(parts[1])?;
        let cents_units = cents.whole_units()?;
        if !(1..100).contains(&cents_units) {
            return None;
        }

        let combined = words.convert(text)?;
        let euros_units = euros.whole_units()?;
        if Some(combined) == euros.checked_add(cents) && euros_units < TWO_WORD_EUROS_LIMIT {
            euros_and_cents(euros, cents)
        } else {
            None
        }
    }
}

/// 7. "veinte euros"
pub struct EurosOnlyRule;

impl AmountRule for EurosOnlyRule {
    fn name(&self) -> &'static str {
        "euros_only"
    }

    fn apply(&self, text: &str, words: &WordConverter) -> Option<Amount> {
        let caps = EUROS_ONLY.captures(text)?;
        words.convert(caps[1].trim())
    }
}

/// 8. "cincuenta centimos"
pub struct CentsOnlyRule;

impl AmountRule for CentsOnlyRule {
    fn name(&self) -> &'static str {
        "cents_only"
    }

    fn apply(&self, text: &str, words: &WordConverter) -> Option<Amount> {
        let caps = CENTS_ONLY.captures(text)?;
        let cents = words.convert(caps[1].trim())?;
        Some(Amount::from_cents(cents.cents() / 100))
    }
}

/// 9. Whole phrase as one number: "veinticinco"
pub struct WholeWordsRule;

impl AmountRule for WholeWordsRule {
    fn name(&self) -> &'static str {
        "whole_words"
    }

    fn apply(&self, text: &str, words: &WordConverter) -> Option<Amount> {
        words.convert(text)
    }
}

/// Rule cascade in priority order; first success wins
pub fn default_rules() -> Vec<Box<dyn AmountRule>> {
    vec![
        Box::new(TimeLikeRule),
        Box::new(DigitLiteralRule),
        Box::new(EurosYCentsRule),
        Box::new(EurosConCentsRule),
        Box::new(SpokenDecimalRule),
        Box::new(TwoWordRule),
        Box::new(EurosOnlyRule),
        Box::new(CentsOnlyRule),
        Box::new(WholeWordsRule),
    ]
}

// ============================================================================
// PARSER
// ============================================================================

/// AmountParser - Interpreta importes hablados
///
/// Stateless once built: safe to share behind an `Arc` across threads.
pub struct AmountParser {
    words: WordConverter,
    rules: Vec<Box<dyn AmountRule>>,
}

impl AmountParser {
    pub fn new(lexicon: Lexicon) -> Self {
        AmountParser {
            words: WordConverter::new(lexicon),
            rules: default_rules(),
        }
    }

    pub fn from_config(config: &ParserConfig) -> Self {
        AmountParser::new(config.lexicon.clone())
    }

    /// Swap in a custom rule list (order = priority)
    pub fn with_rules(mut self, rules: Vec<Box<dyn AmountRule>>) -> Self {
        self.rules = rules;
        self
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    pub fn words(&self) -> &WordConverter {
        &self.words
    }

    /// Parse a phrase into an amount
    pub fn parse(&self, phrase: &str) -> Result<Amount, ParseError> {
        self.parse_with_rule(phrase).map(|(amount, _)| amount)
    }

    /// Parse and report which rule produced the value
    pub fn parse_with_rule(&self, phrase: &str) -> Result<(Amount, &'static str), ParseError> {
        if phrase.trim().is_empty() {
            return Err(ParseError::Empty);
        }

        let normalized = normalize_phrase(phrase);

        for rule in &self.rules {
            if let Some(amount) = rule.apply(&normalized, &self.words) {
                tracing::debug!(phrase, rule = rule.name(), %amount, "amount recognized");
                return Ok((amount, rule.name()));
            }
        }

        tracing::debug!(phrase, "no rule matched");
        Err(ParseError::Unrecognized(phrase.to_string()))
    }
}

impl Default for AmountParser {
    fn default() -> Self {
        AmountParser::new(Lexicon::spanish())
    }
}

/// Parse with the built-in Spanish lexicon
pub fn parse_amount(phrase: &str) -> Result<Amount, ParseError> {
    DEFAULT_PARSER.parse(phrase)
}

// ============================================================================
// TESTS
// ============================================================================
