// 📖 Number Lexicon - Spanish number words as data
// Loaded once per parser; never mutated after construction

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::ConfigError;
use crate::normalize::fold_accents;

/// Value of the word that splits groups ("mil")
pub const THOUSANDS_VALUE: u64 = 1000;

/// Values at or above this are multiplicative bases (cien, doscientos, ...)
pub const HUNDREDS_THRESHOLD: u64 = 100;

/// Spanish defaults: (palabra, valor)
const SPANISH_WORDS: &[(&str, u64)] = &[
    ("cero", 0),
    ("un", 1),
    ("una", 1),
    ("uno", 1),
    ("dos", 2),
    ("tres", 3),
    ("cuatro", 4),
    ("cinco", 5),
    ("seis", 6),
    ("siete", 7),
    ("ocho", 8),
    ("nueve", 9),
    ("diez", 10),
    ("once", 11),
    ("doce", 12),
    ("trece", 13),
    ("catorce", 14),
    ("quince", 15),
    ("dieciseis", 16),
    ("diecisiete", 17),
    ("dieciocho", 18),
    ("diecinueve", 19),
    ("veinte", 20),
    ("veintiun", 21),
    ("veintiuno", 21),
    ("veintidos", 22),
    ("veintitres", 23),
    ("veinticuatro", 24),
    ("veinticinco", 25),
    ("veintiseis", 26),
    ("veintisiete", 27),
    ("veintiocho", 28),
    ("veintinueve", 29),
    ("treinta", 30),
    ("cuarenta", 40),
    ("cincuenta", 50),
    ("sesenta", 60),
    ("setenta", 70),
    ("ochenta", 80),
    ("noventa", 90),
    ("cien", 100),
    ("ciento", 100),
    ("doscientos", 200),
    ("trescientos", 300),
    ("cuatrocientos", 400),
    ("quinientos", 500),
    ("seiscientos", 600),
    ("setecientos", 700),
    ("ochocientos", 800),
    ("novecientos", 900),
    ("mil", 1000),
];

/// Lexicon - Mapa palabra → valor
///
/// Keys are single, lowercase, accent-free tokens. Deserializing goes
/// through `from_pairs`, so JSON keys get the same folding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "HashMap<String, u64>", into = "HashMap<String, u64>")]
pub struct Lexicon {
    words: HashMap<String, u64>,
}

impl Lexicon {
    /// Build from arbitrary pairs, folding keys and rejecting multi-token ones
    pub fn from_pairs<I, S>(pairs: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (S, u64)>,
        S: AsRef<str>,
    {
        let mut words = HashMap::new();
        for (word, value) in pairs {
            let key = fold_accents(word.as_ref().trim());
            if key.is_empty() || key.chars().any(|c| c.is_whitespace() || c == '-') {
                return Err(ConfigError::MultiTokenKey(word.as_ref().to_string()));
            }
            words.insert(key, value);
        }

        let lexicon = Lexicon { words };
        lexicon.validate()?;
        Ok(lexicon)
    }

    pub fn spanish() -> Self {
        Lexicon {
            words: SPANISH_WORDS
                .iter()
                .map(|(word, value)| (word.to_string(), *value))
                .collect(),
        }
    }

    /// Check the invariants a deserialized lexicon may have broken
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(bad) = self
            .words
            .keys()
            .find(|k| k.is_empty() || k.chars().any(|c| c.is_whitespace() || c == '-'))
        {
            return Err(ConfigError::MultiTokenKey(bad.clone()));
        }

        if !self.words.values().any(|v| *v == THOUSANDS_VALUE) {
            return Err(ConfigError::MissingThousands);
        }

        Ok(())
    }

    pub fn get(&self, token: &str) -> Option<u64> {
        self.words.get(token).copied()
    }

    pub fn is_thousands(&self, token: &str) -> bool {
        self.get(token) == Some(THOUSANDS_VALUE)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl Default for Lexicon {
    fn default() -> Self {
        Lexicon::spanish()
    }
}

impl TryFrom<HashMap<String, u64>> for Lexicon {
    type Error = ConfigError;

    fn try_from(words: HashMap<String, u64>) -> Result<Self, Self::Error> {
        Lexicon::from_pairs(words)
    }
}

impl From<Lexicon> for HashMap<String, u64> {
    fn from(lexicon: Lexicon) -> Self {
        lexicon.words
    }
}
