use serde::{Deserialize, Serialize};

fn default_accent_open() -> String {
    "⟨".to_string()
}

fn default_accent_close() -> String {
    "⟩".to_string()
}

fn default_ruby_open() -> String {
    "[".to_string()
}

fn default_ruby_close() -> String {
    "]".to_string()
}

/// Marker tokens embedded in rendered pitch strings. Consumers replace
/// them with their own markup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    #[serde(default = "default_accent_open")]
    pub accent_open: String,
    #[serde(default = "default_accent_close")]
    pub accent_close: String,
    #[serde(default = "default_ruby_open")]
    pub ruby_open: String,
    #[serde(default = "default_ruby_close")]
    pub ruby_close: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            accent_open: default_accent_open(),
            accent_close: default_accent_close(),
            ruby_open: default_ruby_open(),
            ruby_close: default_ruby_close(),
        }
    }
}
