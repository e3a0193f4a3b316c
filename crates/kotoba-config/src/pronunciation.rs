use serde::{Deserialize, Serialize};

fn default_regions() -> Vec<String> {
    vec!["Tokyo".to_string(), "Osaka".to_string()]
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PronunciationConfig {
    /// Regions recognised in a leading "(Region)" of a pronunciation line.
    #[serde(default = "default_regions")]
    pub regions: Vec<String>,
}

impl Default for PronunciationConfig {
    fn default() -> Self {
        Self {
            regions: default_regions(),
        }
    }
}
