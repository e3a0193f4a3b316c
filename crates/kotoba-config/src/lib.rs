use serde::{Deserialize, Serialize};

use self::card::CardConfig;
use self::definitions::DefinitionConfig;
use self::headwords::HeadwordConfig;
use self::pronunciation::PronunciationConfig;
use self::render::RenderConfig;

pub mod card;
pub mod definitions;
pub mod headwords;
pub mod pronunciation;
pub mod render;

/// Every tunable policy of the reconciliation pipeline.
///
/// Each section falls back to its defaults when missing, so a partial
/// JSON document (or none at all) is a valid configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub definitions: DefinitionConfig,
    pub headwords: HeadwordConfig,
    pub pronunciation: PronunciationConfig,
    pub render: RenderConfig,
    pub card: CardConfig,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }
}
