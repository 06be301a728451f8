// ✂️ Utterance Segmenter
// "diez paga con veinte" → total "diez", received "veinte"

use serde::{Deserialize, Serialize};

use crate::amount::Amount;
use crate::error::ConfigError;
use crate::normalize::fold_accents;
use crate::parser::AmountParser;

/// Spanish separators, most specific first
const SPANISH_KEYWORDS: &[&str] = &["paga con", "me da", "le doy", "recibido", "entrego", "pagan"];

/// SeparatorKeywords - Lista ordenada de separadores
///
/// Priority is list order, not position in the transcript: "paga con" wins
/// over an earlier "me da" because it is listed first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct SeparatorKeywords(Vec<String>);

impl SeparatorKeywords {
    pub fn new<I, S>(keywords: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keywords = SeparatorKeywords(
            keywords
                .into_iter()
                .map(|k| fold_accents(k.as_ref().trim()))
                .filter(|k| !k.is_empty())
                .collect(),
        );
        keywords.validate()?;
        Ok(keywords)
    }

    pub fn spanish() -> Self {
        SeparatorKeywords(SPANISH_KEYWORDS.iter().map(|k| k.to_string()).collect())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.0.iter().all(|k| k.trim().is_empty()) {
            return Err(ConfigError::NoKeywords);
        }
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|k| k.as_str())
    }

    /// First keyword (by list order) present in `text`, with its byte offset
    pub fn find_in<'a>(&'a self, text: &str) -> Option<(usize, &'a str)> {
        self.iter()
            .filter(|k| !k.is_empty())
            .find_map(|k| text.find(k).map(|pos| (pos, k)))
    }
}

impl Default for SeparatorKeywords {
    fn default() -> Self {
        SeparatorKeywords::spanish()
    }
}

impl TryFrom<Vec<String>> for SeparatorKeywords {
    type Error = ConfigError;

    fn try_from(keywords: Vec<String>) -> Result<Self, Self::Error> {
        SeparatorKeywords::new(keywords)
    }
}

impl From<SeparatorKeywords> for Vec<String> {
    fn from(keywords: SeparatorKeywords) -> Self {
        keywords.0
    }
}

// ============================================================================
// SEGMENTATION
// ============================================================================

/// Transcript split into its two phrases
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Segments {
    pub total: String,
    /// `None` when no separator was heard
    pub received: Option<String>,
    pub keyword: Option<String>,
}

/// Result of parsing both halves; either side may be missing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VoiceAmounts {
    pub total: Option<Amount>,
    pub received: Option<Amount>,
    pub keyword: Option<String>,
}

impl VoiceAmounts {
    /// Nothing usable: caller should ask the user to repeat
    pub fn is_unrecognized(&self) -> bool {
        self.total.is_none() && self.received.is_none()
    }

    pub fn is_complete(&self) -> bool {
        self.total.is_some() && self.received.is_some()
    }
}

pub struct Segmenter {
    keywords: SeparatorKeywords,
}

impl Segmenter {
    pub fn new(keywords: SeparatorKeywords) -> Self {
        Segmenter { keywords }
    }

    pub fn keywords(&self) -> &SeparatorKeywords {
        &self.keywords
    }

    pub fn segment(&self, transcript: &str) -> Segments {
        let text = fold_accents(transcript.trim());

        match self.keywords.find_in(&text) {
            Some((pos, keyword)) => Segments {
                total: text[..pos].trim().to_string(),
                received: Some(text[pos + keyword.len()..].trim().to_string()),
                keyword: Some(keyword.to_string()),
            },
            None => Segments {
                total: text,
                received: None,
                keyword: None,
            },
        }
    }

    /// Segment, then parse each half independently
    pub fn segment_and_parse(&self, parser: &AmountParser, transcript: &str) -> VoiceAmounts {
        let segments = self.segment(transcript);

        let total = parser.parse(&segments.total).ok();
        let received = segments
            .received
            .as_deref()
            .and_then(|phrase| parser.parse(phrase).ok());

        tracing::debug!(
            transcript,
            keyword = ?segments.keyword,
            total = ?total,
            received = ?received,
            "transcript segmented"
        );

        VoiceAmounts {
            total,
            received,
            keyword: segments.keyword,
        }
    }
}

impl Default for Segmenter {
    fn default() -> Self {
        Segmenter::new(SeparatorKeywords::spanish())
    }
}

/// One-shot helper: split `transcript` on `keywords` and parse both halves
pub fn segment_and_parse(
    parser: &AmountParser,
    transcript: &str,
    keywords: &SeparatorKeywords,
) -> VoiceAmounts {
    Segmenter::new(keywords.clone()).segment_and_parse(parser, transcript)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(transcript: &str) -> VoiceAmounts {
        segment_and_parse(
            &AmountParser::default(),
            transcript,
            &SeparatorKeywords::spanish(),
        )
    }

    #[test]
    fn test_split_on_paga_con() {
        let result = parse("diez paga con veinte");
        assert_eq!(result.total, Some(Amount::from_cents(1000)));
        assert_eq!(result.received, Some(Amount::from_cents(2000)));
        assert_eq!(result.keyword.as_deref(), Some("paga con"));
        assert!(result.is_complete());

        println!("✅ Segmentation test PASSED");
    }

    #[test]
    fn test_no_keyword_is_total_only() {
        let result = parse("quince");
        assert_eq!(result.total, Some(Amount::from_cents(1500)));
        assert_eq!(result.received, None);
        assert_eq!(result.keyword, None);
    }

    #[test]
    fn test_list_order_beats_text_position() {
        let segmenter = Segmenter::default();
        // "me da" appears first in the text, but "paga con" is higher priority
        let segments = segmenter.segment("me da algo, siete paga con diez");
        assert_eq!(segments.keyword.as_deref(), Some("paga con"));
        assert_eq!(segments.total, "me da algo, siete");
        assert_eq!(segments.received.as_deref(), Some("diez"));
    }

    #[test]
    fn test_mixed_phrases() {
        let result = parse("Siete con cincuenta me da diez euros");
        assert_eq!(result.total, Some(Amount::from_cents(750)));
        assert_eq!(result.received, Some(Amount::from_cents(1000)));
    }

    #[test]
    fn test_partial_recognition() {
        let result = parse("bla bla recibido veinte");
        assert_eq!(result.total, None);
        assert_eq!(result.received, Some(Amount::from_cents(2000)));
        assert!(!result.is_unrecognized());

        let nothing = parse("hola que tal");
        assert!(nothing.is_unrecognized());
    }

    #[test]
    fn test_keyword_at_end_leaves_received_empty() {
        let segments = Segmenter::default().segment("doce pagan");
        assert_eq!(segments.total, "doce");
        assert_eq!(segments.received.as_deref(), Some(""));

        let result = parse("doce pagan");
        assert_eq!(result.total, Some(Amount::from_cents(1200)));
        assert_eq!(result.received, None);
    }

    #[test]
    fn test_custom_keywords() {
        let keywords = SeparatorKeywords::new(vec!["Cóbrame"]).unwrap();
        let result = segment_and_parse(&AmountParser::default(), "cinco cobrame seis", &keywords);
        assert_eq!(result.total, Some(Amount::from_cents(500)));
        assert_eq!(result.received, Some(Amount::from_cents(600)));

        assert!(SeparatorKeywords::new(Vec::<String>::new()).is_err());
    }
}
