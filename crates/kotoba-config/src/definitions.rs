use serde::{Deserialize, Serialize};

fn default_enabled() -> bool {
    true
}

fn default_archaic_terms() -> Vec<String> {
    ["archaic", "classical japanese", "obsolete"]
        .map(String::from)
        .to_vec()
}

fn default_literary_terms() -> Vec<String> {
    vec!["literary".to_string()]
}

fn default_regional_terms() -> Vec<String> {
    ["regional", "dialect"].map(String::from).to_vec()
}

fn default_form_phrases() -> Vec<String> {
    [
        "alternative form of ",
        "alternative spelling of ",
        "stem or continuative form of ",
        "stem or continuative forms of ",
        "stem (or continuative) form of ",
        "stem (or continuative) forms of ",
        "stem form of ",
    ]
    .map(String::from)
    .to_vec()
}

fn default_given_name_phrases() -> Vec<String> {
    [
        "a female given name",
        "a surname",
        "a male given name",
        "a placename",
        "a place name",
        "a unisex given name",
    ]
    .map(String::from)
    .to_vec()
}

fn default_placeholder() -> String {
    "This term needs a translation to English.".to_string()
}

/// Which definitions survive cleanup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DefinitionConfig {
    #[serde(default = "default_enabled")]
    pub remove_archaic: bool,
    #[serde(default = "default_enabled")]
    pub remove_literary: bool,
    #[serde(default = "default_enabled")]
    pub remove_regional: bool,
    #[serde(default = "default_enabled")]
    pub remove_alternative_forms: bool,
    #[serde(default = "default_enabled")]
    pub skip_given_names: bool,
    #[serde(default = "default_enabled")]
    pub skip_short_for: bool,

    #[serde(default = "default_archaic_terms")]
    pub archaic_terms: Vec<String>,
    #[serde(default = "default_literary_terms")]
    pub literary_terms: Vec<String>,
    #[serde(default = "default_regional_terms")]
    pub regional_terms: Vec<String>,
    #[serde(default = "default_form_phrases")]
    pub alternative_form_phrases: Vec<String>,
    #[serde(default = "default_given_name_phrases")]
    pub given_name_phrases: Vec<String>,
    /// Text the source uses for definitions nobody has translated yet.
    #[serde(default = "default_placeholder")]
    pub untranslated_placeholder: String,
}

impl DefinitionConfig {
    /// Context words that disqualify a definition when they appear in its
    /// leading parenthesis, e.g. "(archaic) ...".
    pub fn forbidden_context_terms(&self) -> Vec<&str> {
        let mut terms = Vec::new();
        if self.remove_archaic {
            terms.extend(self.archaic_terms.iter().map(String::as_str));
        }
        if self.remove_literary {
            terms.extend(self.literary_terms.iter().map(String::as_str));
        }
        if self.remove_regional {
            terms.extend(self.regional_terms.iter().map(String::as_str));
        }
        terms
    }
}

impl Default for DefinitionConfig {
    fn default() -> Self {
        Self {
            remove_archaic: default_enabled(),
            remove_literary: default_enabled(),
            remove_regional: default_enabled(),
            remove_alternative_forms: default_enabled(),
            skip_given_names: default_enabled(),
            skip_short_for: default_enabled(),
            archaic_terms: default_archaic_terms(),
            literary_terms: default_literary_terms(),
            regional_terms: default_regional_terms(),
            alternative_form_phrases: default_form_phrases(),
            given_name_phrases: default_given_name_phrases(),
            untranslated_placeholder: default_placeholder(),
        }
    }
}
