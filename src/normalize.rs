/// Text normalization for spoken/typed amount phrases
///
/// Speech recognizers return accented, mixed-case text with stray
/// punctuation. Everything downstream (lexicon lookups, rule regexes)
/// works on lowercase ASCII-folded text, so it all goes through here first.
use lazy_static::lazy_static;
use regex::Regex;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

lazy_static! {
    static ref CENTIMOS: Regex = Regex::new(r"centimos?").unwrap();
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
}

/// Lowercase and strip diacritics: "Dieciséis" → "dieciseis"
pub fn fold_accents(text: &str) -> String {
    text.to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect()
}

/// Prepare a word run for the lexicon
///
/// Folds accents, then keeps only alphanumerics, whitespace and hyphens.
pub fn sanitize_words(text: &str) -> String {
    fold_accents(text)
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || *c == '-')
        .collect::<String>()
        .trim()
        .to_string()
}

/// Canonical form of a full phrase before rule matching
///
/// - lowercase + accent folding
/// - "€" → " euros "
/// - "centimo"/"centimos" → " centimos "
/// - whitespace collapsed, ends trimmed
pub fn normalize_phrase(text: &str) -> String {
    let folded = fold_accents(text.trim());
    let with_currency = folded.replace('€', " euros ");
    let with_cents = CENTIMOS.replace_all(&with_currency, " centimos ");
    let collapsed = WHITESPACE.replace_all(&with_cents, " ");

    let normalized = collapsed.trim().to_string();
    tracing::trace!(input = text, normalized = %normalized, "normalized phrase");
    normalized
}
