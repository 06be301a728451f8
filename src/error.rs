// Error types for the library surface
// Binaries and the history store use anyhow on top of these

use thiserror::Error;

use crate::amount::Amount;

/// Phrase could not be interpreted as an amount
///
/// Never coerced to zero: `Amount::ZERO` is a valid result, this is not.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("empty input")]
    Empty,

    #[error("could not interpret '{0}' as an amount")]
    Unrecognized(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalcError {
    #[error("amounts cannot be negative (total {total}, received {received})")]
    NegativeAmount { total: Amount, received: Amount },

    #[error("insufficient funds: received {received} is less than total {total}")]
    InsufficientFunds { total: Amount, received: Amount },

    #[error("amount overflow")]
    Overflow,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("lexicon key '{0}' must be a single token")]
    MultiTokenKey(String),

    #[error("lexicon has no thousands word (value 1000)")]
    MissingThousands,

    #[error("separator keyword list is empty")]
    NoKeywords,
}

#[derive(Debug, Error)]
pub enum SerialError {
    #[error("invalid serial command: {0}")]
    InvalidCommand(String),

    #[error("serial write failed: {0}")]
    Io(#[from] std::io::Error),
}
