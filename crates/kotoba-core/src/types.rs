use std::fmt;

use crate::error::ContractError;

/// Document-order key of a heading. Any totally ordered key works for
/// layout inference; this is the one the document model uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position(pub u64);

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeadingCategory {
    Etymology,
    Pronunciation,
    PartOfSpeech,
    UsageNotes,
}

impl HeadingCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            HeadingCategory::Etymology => "Etymology",
            HeadingCategory::Pronunciation => "Pronunciation",
            HeadingCategory::PartOfSpeech => "Part of speech",
            HeadingCategory::UsageNotes => "Usage notes",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionedHeading<P = Position> {
    pub category: HeadingCategory,
    pub position: P,
    pub label: String,
}

impl<P> PositionedHeading<P> {
    pub fn new(category: HeadingCategory, position: P, label: impl Into<String>) -> Self {
        Self {
            category,
            position,
            label: label.into(),
        }
    }
}

/// Headings sharing one word origin.
///
/// The bucket owns the half-open interval `[start, end)`; `None` on
/// either side means the start or end of the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EtymologyBucket<P = Position> {
    /// Ordinal of the etymology on the page, stable across deletions.
    pub index: usize,
    /// The Etymology heading itself; `None` for the implicit bucket.
    pub heading: Option<PositionedHeading<P>>,
    pub start: Option<P>,
    pub end: Option<P>,
    pub pronunciation_headings: Vec<PositionedHeading<P>>,
    pub pos_headings: Vec<PositionedHeading<P>>,
    pub usage_headings: Vec<PositionedHeading<P>>,
    /// For each part-of-speech heading, the index into `usage_headings`
    /// of the note it claimed.
    pub pos_usage: Vec<Option<usize>>,
}

impl<P> EtymologyBucket<P> {
    pub fn new(
        index: usize,
        heading: Option<PositionedHeading<P>>,
        start: Option<P>,
        end: Option<P>,
    ) -> Self {
        Self {
            index,
            heading,
            start,
            end,
            pronunciation_headings: Vec::new(),
            pos_headings: Vec::new(),
            usage_headings: Vec::new(),
            pos_usage: Vec::new(),
        }
    }
}

impl<P: Ord> EtymologyBucket<P> {
    pub fn contains(&self, position: &P) -> bool {
        let after_start = self.start.as_ref().is_none_or(|s| s <= position);
        let before_end = self.end.as_ref().is_none_or(|e| position < e);
        after_start && before_end
    }

    pub fn is_empty(&self) -> bool {
        self.pronunciation_headings.is_empty() && self.pos_headings.is_empty()
    }

    /// Usage-notes heading claimed by the `pos_index`-th part of speech.
    pub fn usage_for(&self, pos_index: usize) -> Option<&PositionedHeading<P>> {
        self.pos_usage
            .get(pos_index)
            .copied()
            .flatten()
            .and_then(|i| self.usage_headings.get(i))
    }
}

/// Phonetic data listed under a Pronunciation heading.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PronunciationRecord {
    pub kana: String,
    pub region: Option<String>,
    /// 1-based mora index of the pitch drop, 0 for unaccented.
    pub pitch_accent: Option<u8>,
    pub ipa: Option<String>,
}

impl PronunciationRecord {
    pub fn has_phonetic_data(&self) -> bool {
        self.region.is_some() || self.pitch_accent.is_some() || self.ipa.is_some()
    }
}

/// A reading spread over several characters of the term, used when no
/// per-character split can be justified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuriganaSpan {
    pub start: usize,
    pub len: usize,
    pub reading: String,
}

impl FuriganaSpan {
    pub fn end(&self) -> usize {
        self.start + self.len
    }
}

/// Ideographs that may carry a reading, including the repetition mark 々.
pub fn is_kanji(c: char) -> bool {
    ('\u{4E00}'..='\u{9FFF}').contains(&c)
        || ('\u{3400}'..='\u{4DBF}').contains(&c)
        || c == '々'
}

/// Reading annotation of a term: precise per character, or coarse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Furigana {
    /// One entry per term character; empty where no reading is needed.
    PerChar(Vec<String>),
    Span(FuriganaSpan),
}

impl Furigana {
    pub fn per_char(&self) -> Option<&[String]> {
        match self {
            Furigana::PerChar(readings) => Some(readings),
            Furigana::Span(_) => None,
        }
    }

    pub fn is_coarse(&self) -> bool {
        matches!(self, Furigana::Span(_))
    }

    /// Checks the shape of the annotation against `term`.
    pub fn check_shape(&self, term: &str) -> Result<(), ContractError> {
        let term_len = term.chars().count();
        match self {
            Furigana::PerChar(readings) if readings.len() != term_len => {
                Err(ContractError::FuriganaLength {
                    term: term.to_string(),
                    term_len,
                    furigana_len: readings.len(),
                })
            }
            Furigana::Span(span) if span.end() > term_len => Err(ContractError::SpanOutOfBounds {
                term: term.to_string(),
                start: span.start,
                end: span.end(),
            }),
            _ => Ok(()),
        }
    }

    /// Checks the shape, then that per-character readings sit only over
    /// kanji.
    pub fn check(&self, term: &str) -> Result<(), ContractError> {
        self.check_shape(term)?;
        if let Furigana::PerChar(readings) = self {
            for (index, (c, reading)) in term.chars().zip(readings).enumerate() {
                if !reading.is_empty() && !is_kanji(c) {
                    return Err(ContractError::ReadingOverNonKanji {
                        term: term.to_string(),
                        index,
                        reading: reading.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

/// One written form of a headword and its phonetic data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcription {
    pub kana: String,
    pub furigana: Option<Furigana>,
    pub region: Option<String>,
    pub pitch_accent: Option<u8>,
    pub ipa: Option<String>,
}

impl Transcription {
    pub fn new(kana: impl Into<String>) -> Self {
        Self {
            kana: kana.into(),
            ..Default::default()
        }
    }

    /// Attaches furigana after checking it against `term`.
    pub fn with_furigana(mut self, term: &str, furigana: Furigana) -> Result<Self, ContractError> {
        furigana.check(term)?;
        self.furigana = Some(furigana);
        Ok(self)
    }

    /// Copies phonetic fields from `record` that this transcription lacks.
    /// Returns whether anything changed.
    pub fn absorb(&mut self, record: &PronunciationRecord) -> bool {
        let mut changed = false;
        if self.region.is_none() && record.region.is_some() {
            self.region = record.region.clone();
            changed = true;
        }
        if self.pitch_accent.is_none() && record.pitch_accent.is_some() {
            self.pitch_accent = record.pitch_accent;
            changed = true;
        }
        if self.ipa.is_none() && record.ipa.is_some() {
            self.ipa = record.ipa.clone();
            changed = true;
        }
        changed
    }

    pub fn phonetics(&self) -> PronunciationRecord {
        PronunciationRecord {
            kana: self.kana.clone(),
            region: self.region.clone(),
            pitch_accent: self.pitch_accent,
            ipa: self.ipa.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Example {
    pub japanese: String,
    pub romaji: String,
    pub english: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Definition {
    pub text: String,
    pub synonyms: Vec<String>,
    pub antonyms: Vec<String>,
    pub examples: Vec<Example>,
}

impl Definition {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }
}

/// Everything known about one (etymology, part of speech) pair.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LexicalEntry {
    pub part_of_speech: String,
    pub term: String,
    pub counter: Option<String>,
    pub transcriptions: Vec<Transcription>,
    pub definitions: Vec<Definition>,
    pub usage_notes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EtymologyEntry {
    /// 0-based ordinal of the etymology on its page.
    pub index: usize,
    pub alternative_spellings: Vec<String>,
    pub entries: Vec<LexicalEntry>,
}

/// An etymology that only points at another page's spelling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    pub term: String,
    pub etymology_index: usize,
}

/// Reconciled contents of one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Lookup {
    pub term: String,
    pub etymologies: Vec<EtymologyEntry>,
    pub redirects: Vec<Redirect>,
}

impl Lookup {
    /// No structured data was found. A normal outcome, not an error.
    pub fn is_empty(&self) -> bool {
        self.etymologies.is_empty()
    }

    pub fn entry_count(&self) -> usize {
        self.etymologies.iter().map(|e| e.entries.len()).sum()
    }
}
