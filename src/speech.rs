// 🔊 Spoken change announcement
// Builds the sentence; the actual synthesizer sits behind SpeechOutput

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::amount::Amount;

/// Words used when speaking an amount (Spanish defaults)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechPhrases {
    pub intro: String,
    pub euro_singular: String,
    pub euro_plural: String,
    pub cent_singular: String,
    pub cent_plural: String,
    pub joiner: String,
    pub zero: String,
    pub one_euro: String,
    pub one_cent: String,
}

impl Default for SpeechPhrases {
    fn default() -> Self {
        SpeechPhrases {
            intro: "El cambio a devolver es:".to_string(),
            euro_singular: "euro".to_string(),
            euro_plural: "euros".to_string(),
            cent_singular: "céntimo".to_string(),
            cent_plural: "céntimos".to_string(),
            joiner: "con".to_string(),
            zero: "cero".to_string(),
            one_euro: "un euro".to_string(),
            one_cent: "un céntimo".to_string(),
        }
    }
}

/// "2 euros con 50 céntimos", "un euro con un céntimo", "cero euros"
pub fn format_change_for_speech(change: Amount, phrases: &SpeechPhrases) -> String {
    let euros = change.euros().abs();
    let cents = change.minor();

    if euros == 0 && cents == 0 {
        return format!("{} {}", phrases.zero, phrases.euro_plural);
    }

    let mut parts = Vec::new();
    if euros > 0 {
        parts.push(if euros == 1 {
            phrases.one_euro.clone()
        } else {
            format!("{} {}", euros, phrases.euro_plural)
        });
    }
    if cents > 0 {
        parts.push(if cents == 1 {
            phrases.one_cent.clone()
        } else {
            format!("{} {}", cents, phrases.cent_plural)
        });
    }

    parts.join(&format!(" {} ", phrases.joiner))
}

/// Full sentence: intro + spoken amount
pub fn announce_change(change: Amount, phrases: &SpeechPhrases) -> String {
    format!("{} {}", phrases.intro, format_change_for_speech(change, phrases))
}

/// UI language → speech engine language tag (es-ES fallback)
pub fn speech_lang_tag(ui_lang: &str) -> &'static str {
    match ui_lang.trim().to_lowercase().as_str() {
        "es" => "es-ES",
        "en" => "en-US",
        "gl" => "gl-ES",
        "ca" | "va" => "ca-ES",
        "eu" => "eu-ES",
        _ => "es-ES",
    }
}

// ============================================================================
// OUTPUT SEAM
// ============================================================================

/// SpeechOutput - Whatever actually talks (browser TTS, a device, stdout)
pub trait SpeechOutput {
    fn speak(&self, text: &str, lang: &str) -> Result<()>;
}

/// Prints the announcement; used by the CLI
pub struct ConsoleSpeech;

impl SpeechOutput for ConsoleSpeech {
    fn speak(&self, text: &str, lang: &str) -> Result<()> {
        tracing::info!(lang, text, "announcing");
        println!("🔊 [{}] {}", lang, text);
        Ok(())
    }
}
