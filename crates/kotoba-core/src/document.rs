use std::collections::{HashMap, HashSet};

use crate::error::ContractError;
use crate::types::{HeadingCategory, Position, PositionedHeading};

/// A definition list item as extracted from the page, markup removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawDefinition {
    pub text: String,
    /// Nested lines: synonyms, antonyms, example sentences.
    pub sublines: Vec<String>,
}

impl RawDefinition {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sublines: Vec::new(),
        }
    }

    pub fn with_sublines<I, S>(mut self, sublines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sublines = sublines.into_iter().map(Into::into).collect();
        self
    }
}

/// Content found under a heading, already classified by the fetcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionBody {
    Etymology {
        alternative_spellings: Vec<String>,
        /// Spellings whose page carries the actual entry for this origin.
        redirect_terms: Vec<String>,
    },
    Pronunciation {
        lines: Vec<String>,
    },
    PartOfSpeech {
        headword: Option<String>,
        counter: Option<String>,
        definitions: Vec<RawDefinition>,
    },
    UsageNotes {
        text: String,
    },
}

impl SectionBody {
    pub fn category(&self) -> HeadingCategory {
        match self {
            SectionBody::Etymology { .. } => HeadingCategory::Etymology,
            SectionBody::Pronunciation { .. } => HeadingCategory::Pronunciation,
            SectionBody::PartOfSpeech { .. } => HeadingCategory::PartOfSpeech,
            SectionBody::UsageNotes { .. } => HeadingCategory::UsageNotes,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub heading: PositionedHeading,
    pub body: SectionBody,
}

impl Section {
    pub fn new(position: u64, label: impl Into<String>, body: SectionBody) -> Self {
        Self {
            heading: PositionedHeading::new(body.category(), Position(position), label),
            body,
        }
    }
}

/// The target-language section of one dictionary page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pub term: String,
    pub sections: Vec<Section>,
}

impl Document {
    pub fn new(term: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            sections: Vec::new(),
        }
    }

    pub fn push(&mut self, section: Section) -> &mut Self {
        self.sections.push(section);
        self
    }

    /// Heading positions must identify sections uniquely.
    pub fn validate(&self) -> Result<(), ContractError> {
        let mut seen = HashSet::new();
        for section in &self.sections {
            if !seen.insert(section.heading.position) {
                return Err(ContractError::DuplicatePosition(
                    section.heading.position.to_string(),
                ));
            }
        }
        Ok(())
    }

    pub fn headings(&self) -> Vec<PositionedHeading> {
        self.sections.iter().map(|s| s.heading.clone()).collect()
    }

    /// Index from heading position to section body.
    pub fn bodies(&self) -> HashMap<Position, &SectionBody> {
        self.sections
            .iter()
            .map(|s| (s.heading.position, &s.body))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_positions_are_rejected() {
        let mut doc = Document::new("猫");
        doc.push(Section::new(
            1,
            "Noun",
            SectionBody::UsageNotes {
                text: String::new(),
            },
        ))
        .push(Section::new(
            1,
            "Pronunciation",
            SectionBody::Pronunciation { lines: vec![] },
        ));
        assert_eq!(
            doc.validate(),
            Err(ContractError::DuplicatePosition("@1".to_string()))
        );
    }

    #[test]
    fn test_section_category_follows_body() {
        let section = Section::new(4, "Verb", SectionBody::PartOfSpeech {
            headword: None,
            counter: None,
            definitions: vec![],
        });
        assert_eq!(section.heading.category, HeadingCategory::PartOfSpeech);
        assert_eq!(section.heading.position, Position(4));
    }
}
