// ⚙️ Configuration - parser data (lexicon, keywords, locale) + app settings
// Parser config travels explicitly; nothing here is a process-wide singleton

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::lexicon::Lexicon;
use crate::segmenter::SeparatorKeywords;

pub const DEFAULT_LOCALE: &str = "es-ES";
pub const DEFAULT_DB_PATH: &str = "once_app.sqlite";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_LOG_FILTER: &str = "once_app=info,once_server=info";

// ============================================================================
// PARSER CONFIG
// ============================================================================

/// ParserConfig - Datos estáticos del analizador
///
/// Every field is optional in JSON; missing ones fall back to Spanish.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParserConfig {
    #[serde(default)]
    pub lexicon: Lexicon,

    #[serde(default)]
    pub keywords: SeparatorKeywords,

    #[serde(default = "default_locale")]
    pub locale: String,
}

fn default_locale() -> String {
    DEFAULT_LOCALE.to_string()
}

impl Default for ParserConfig {
    fn default() -> Self {
        ParserConfig {
            lexicon: Lexicon::spanish(),
            keywords: SeparatorKeywords::spanish(),
            locale: default_locale(),
        }
    }
}

impl ParserConfig {
    /// Load from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;

        ParserConfig::from_json(&content)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: ParserConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.lexicon.validate()?;
        self.keywords.validate()?;
        Ok(())
    }
}

// ============================================================================
// APP CONFIG (binaries)
// ============================================================================

/// Runtime settings for the CLI and the server, read from the environment
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// SQLite history file (ONCE_DB_PATH)
    pub db_path: PathBuf,

    /// Server listen address (ONCE_BIND_ADDR)
    pub bind_addr: String,

    /// Optional parser JSON (ONCE_PARSER_CONFIG)
    pub parser_config_path: Option<PathBuf>,

    /// Default tracing filter when RUST_LOG is unset (ONCE_LOG)
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            parser_config_path: None,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl AppConfig {
    /// Load `.env` if present, then read ONCE_* variables
    pub fn from_env() -> Self {
        // Missing .env is fine
        let _ = dotenvy::dotenv();

        let mut config = AppConfig::default();

        if let Ok(path) = env::var("ONCE_DB_PATH") {
            config.db_path = PathBuf::from(path);
        }
        if let Ok(addr) = env::var("ONCE_BIND_ADDR") {
            config.bind_addr = addr;
        }
        if let Ok(path) = env::var("ONCE_PARSER_CONFIG") {
            config.parser_config_path = Some(PathBuf::from(path));
        }
        if let Ok(filter) = env::var("ONCE_LOG") {
            config.log_filter = filter;
        }

        config
    }

    /// Parser config from ONCE_PARSER_CONFIG, or the Spanish defaults
    pub fn parser_config(&self) -> Result<ParserConfig, ConfigError> {
        match &self.parser_config_path {
            Some(path) => ParserConfig::from_file(path),
            None => Ok(ParserConfig::default()),
        }
    }
}

/// Install the fmt subscriber used by both binaries
///
/// RUST_LOG wins over `default_filter`.
pub fn init_tracing(default_filter: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .with_target(false)
        .compact()
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amount::Amount;
    use crate::parser::AmountParser;
    use crate::segmenter::Segmenter;
    use std::io::Write;

    #[test]
    fn test_default_parser_config() {
        let config = ParserConfig::default();
        assert_eq!(config.locale, "es-ES");
        assert!(config.validate().is_ok());
        assert_eq!(config.keywords.iter().next(), Some("paga con"));
    }

    #[test]
    fn test_partial_json_falls_back_to_defaults() {
        let config = ParserConfig::from_json(r#"{"keywords": ["cobra", "entrega"]}"#).unwrap();
        assert_eq!(config.locale, "es-ES");
        assert_eq!(config.keywords.iter().collect::<Vec<_>>(), vec!["cobra", "entrega"]);
        assert_eq!(config.lexicon, Lexicon::spanish());
    }

    #[test]
    fn test_invalid_lexicon_rejected() {
        let err = ParserConfig::from_json(r#"{"lexicon": {"uno": 1}}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
        assert!(err.to_string().contains("no thousands word"));

        let err = ParserConfig::from_json(r#"{"lexicon": {"treinta y uno": 31, "mil": 1000}}"#)
            .unwrap_err();
        assert!(err.to_string().contains("single token"));
    }

    #[test]
    fn test_empty_keywords_rejected() {
        let err = ParserConfig::from_json(r#"{"keywords": []}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
        assert!(err.to_string().contains("keyword list is empty"));
    }

    #[test]
    fn test_json_keys_are_folded_like_constructors() {
        let config = ParserConfig::from_json(
            r#"{"lexicon": {"Dieciséis": 16, "MIL": 1000}, "keywords": ["Cóbrame"]}"#,
        )
        .unwrap();
        assert_eq!(config.lexicon.get("dieciseis"), Some(16));
        assert_eq!(config.keywords.iter().collect::<Vec<_>>(), vec!["cobrame"]);

        let parser = AmountParser::from_config(&config);
        assert_eq!(parser.parse("dieciséis"), Ok(Amount::from_cents(1600)));

        let segmenter = Segmenter::new(config.keywords.clone());
        let segments = segmenter.segment("dieciséis Cóbrame mil");
        assert_eq!(segments.keyword.as_deref(), Some("cobrame"));
        assert_eq!(segments.total, "dieciseis");

        let amounts = segmenter.segment_and_parse(&parser, "dieciséis Cóbrame mil");
        assert_eq!(amounts.total, Some(Amount::from_cents(1600)));
        assert_eq!(amounts.received, Some(Amount::from_cents(100_000)));

        println!("✅ Config keys folded on load PASSED");
    }

    #[test]
    fn test_config_serializes_back_to_json() {
        let json = serde_json::to_string(&ParserConfig::default()).unwrap();
        let back = ParserConfig::from_json(&json).unwrap();
        assert_eq!(back, ParserConfig::default());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"locale": "ca-ES"}}"#).unwrap();

        let config = ParserConfig::from_file(file.path()).unwrap();
        assert_eq!(config.locale, "ca-ES");

        let missing = ParserConfig::from_file("/nonexistent/once.json");
        assert!(matches!(missing, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_app_config_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.db_path, PathBuf::from("once_app.sqlite"));
        assert_eq!(config.bind_addr, "0.0.0.0:3000");
        assert!(config.parser_config().is_ok());
    }
}
