use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::fields::CardFields;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardTemplate {
    pub deck: String,
    pub model: String,
    pub front_template: String,
    pub back_template: String,
}

impl CardTemplate {
    /// Create default Japanese vocabulary template
    pub fn default_japanese() -> Self {
        Self {
            deck: "Japanese".to_string(),
            model: "Basic".to_string(),
            front_template: "{key-term}".to_string(),
            back_template: "{pretty-kanji}\n{pretty-kana}\n{definitions}\n{usage-notes}".to_string(),
        }
    }

    /// Create custom template
    pub fn new(deck: String, model: String, front: String, back: String) -> Self {
        Self {
            deck,
            model,
            front_template: front,
            back_template: back,
        }
    }

    /// Load a template from its JSON form
    pub fn from_json(json: &str) -> Result<Self> {
        let template: Self =
            serde_json::from_str(json).context("Failed to parse card template")?;
        template.check_placeholders()?;
        Ok(template)
    }

    /// Format the front of the card
    pub fn format_front(&self, fields: &CardFields) -> String {
        fill(&self.front_template, fields)
    }

    /// Format the back of the card
    pub fn format_back(&self, fields: &CardFields) -> String {
        fill(&self.back_template, fields)
    }

    fn check_placeholders(&self) -> Result<()> {
        for (side, template) in [("front", &self.front_template), ("back", &self.back_template)] {
            for name in placeholders(template) {
                if !CardFields::NAMES.contains(&name) {
                    anyhow::bail!("Unknown field {{{name}}} in {side} template of deck {}", self.deck);
                }
            }
        }
        Ok(())
    }
}

/// Names between braces, e.g. `kana` in `{kana}`.
fn placeholders(template: &str) -> impl Iterator<Item = &str> {
    template
        .split('{')
        .skip(1)
        .filter_map(|rest| rest.split_once('}').map(|(name, _)| name))
}

fn fill(template: &str, fields: &CardFields) -> String {
    CardFields::NAMES
        .iter()
        .fold(template.to_string(), |text, name| {
            let value = fields.get(name).unwrap_or_default();
            text.replace(&format!("{{{name}}}"), value)
        })
}
