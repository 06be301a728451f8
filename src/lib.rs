// ONCE App - Core Library
// Spoken-amount parsing, change calculation and sale history for the CLI and API server

pub mod amount;
pub mod change;
pub mod config;
pub mod db;
pub mod error;
pub mod lexicon;
pub mod normalize;
pub mod parser;
pub mod segmenter;
pub mod serial;
pub mod speech;
pub mod words;

#[cfg(feature = "server")]
pub mod api;

// Re-export commonly used types
pub use amount::Amount;
pub use change::{calculate_change, Sale};
pub use config::{AppConfig, ParserConfig};
pub use db::{
    TransactionRecord,
    open_database, setup_database, insert_record, get_history,
    verify_count, clear_history, export_history_csv,
};
pub use error::{CalcError, ConfigError, ParseError, SerialError};
pub use lexicon::Lexicon;
pub use parser::{AmountParser, AmountRule, parse_amount, default_rules};
pub use segmenter::{
    Segmenter, SeparatorKeywords, Segments, VoiceAmounts, segment_and_parse,
};
pub use serial::{LineTransport, SerialCommand, SerialTransport};
pub use speech::{
    ConsoleSpeech, SpeechOutput, SpeechPhrases,
    announce_change, format_change_for_speech, speech_lang_tag,
};
pub use words::WordConverter;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
