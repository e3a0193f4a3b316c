use serde::{Deserialize, Serialize};

fn default_parts_of_speech() -> Vec<String> {
    [
        "Noun",
        "Adjective",
        "Adnominal",
        "Verb",
        "Adverb",
        "Proper noun",
        "Interjection",
        "Particle",
        "Conjunction",
        "Phrase",
        "Proverb",
        "Pronoun",
        "Numeral",
    ]
    .map(String::from)
    .to_vec()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CardConfig {
    /// Parts of speech eligible for a card, matched by prefix.
    #[serde(default = "default_parts_of_speech")]
    pub desired_parts_of_speech: Vec<String>,
}

impl Default for CardConfig {
    fn default() -> Self {
        Self {
            desired_parts_of_speech: default_parts_of_speech(),
        }
    }
}
