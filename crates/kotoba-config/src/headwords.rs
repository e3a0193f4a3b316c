use serde::{Deserialize, Serialize};

fn default_enabled() -> bool {
    true
}

fn default_katakana_hint() -> String {
    "often spelled in katakana".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HeadwordConfig {
    /// Drop a katakana transcription that is a one-to-one conversion of a
    /// hiragana one (or the hiragana one, when usage notes prefer katakana).
    #[serde(default = "default_enabled")]
    pub remove_duplicate_katakana: bool,
    /// Usage-note phrase marking a word as preferring katakana.
    #[serde(default = "default_katakana_hint")]
    pub katakana_hint: String,
}

impl Default for HeadwordConfig {
    fn default() -> Self {
        Self {
            remove_duplicate_katakana: default_enabled(),
            katakana_hint: default_katakana_hint(),
        }
    }
}
