//! Pronunciation records and tolerant kana matching.

use kotoba_core::{PronunciationRecord, Transcription};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::script::{LONG_VOWEL_MARK, extract_japanese, kata_to_hira};

/// Downstep mark used inside pronunciation lines.
const DOWNSTEP: char = 'ꜜ';

static ACCENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"– \[(\d)\]\)").expect("valid accent regex"));
static IPA_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"IPA\(key\):[^\[]*\[([^\]]*)\]").expect("valid ipa regex"));

/// Parses one pronunciation list item such as
/// `(Tokyo) ねꜜこ [nèꜜko] (Atamadaka – [1])` or `IPA(key): [ne̞ko̞]`.
///
/// Returns `None` for lines that carry no usable phonetic data.
pub fn parse_pronunciation_line(line: &str, regions: &[String]) -> Option<PronunciationRecord> {
    let region = regions
        .iter()
        .find(|r| {
            line.strip_prefix('(')
                .and_then(|rest| rest.strip_prefix(r.as_str()))
                .is_some_and(|rest| rest.starts_with(')'))
        })
        .cloned();

    let unmarked: String = line.chars().filter(|&c| c != DOWNSTEP).collect();
    let kana = extract_japanese(&unmarked).into_iter().next()?;

    let pitch_accent = ACCENT_RE
        .captures(line)
        .and_then(|caps| caps[1].parse::<u8>().ok());
    let ipa = IPA_RE.captures(line).map(|caps| caps[1].to_string());

    let record = PronunciationRecord {
        kana,
        region,
        pitch_accent,
        ipa,
    };
    record.has_phonetic_data().then_some(record)
}

/// Pronunciations listed under one etymology, keyed by kana.
///
/// Iteration order is insertion order; on duplicate kana the first record
/// is kept.
#[derive(Debug, Clone, Default)]
pub struct PronunciationBank {
    records: Vec<PronunciationRecord>,
}

impl PronunciationBank {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_lines<S: AsRef<str>>(lines: &[S], regions: &[String]) -> Self {
        let mut bank = Self::new();
        bank.extend_from_list(lines, regions);
        bank
    }

    /// Adds the records of one pronunciation list. Lists with neither a
    /// downstep mark nor an IPA key hold something else and are skipped.
    pub fn extend_from_list<S: AsRef<str>>(&mut self, lines: &[S], regions: &[String]) {
        let is_pronunciation = lines
            .iter()
            .any(|l| l.as_ref().contains(DOWNSTEP) || l.as_ref().contains("IPA"));
        if !is_pronunciation {
            return;
        }
        for line in lines {
            if let Some(record) = parse_pronunciation_line(line.as_ref(), regions) {
                self.insert(record);
            }
        }
    }

    /// Returns `false` if a record with the same kana is already present.
    pub fn insert(&mut self, record: PronunciationRecord) -> bool {
        if self.records.iter().any(|r| r.kana == record.kana) {
            return false;
        }
        self.records.push(record);
        true
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PronunciationRecord> {
        self.records.iter()
    }

    /// First record whose kana matches `kana`.
    pub fn find_match(&self, kana: &str) -> Option<&PronunciationRecord> {
        self.records.iter().find(|r| kana_matches(&r.kana, kana))
    }

    /// Fills the missing phonetic fields of `transcription` from its
    /// match. Returns whether a match was found.
    pub fn apply(&self, transcription: &mut Transcription) -> bool {
        match self.find_match(&transcription.kana) {
            Some(record) => {
                transcription.absorb(record);
                true
            }
            None => {
                tracing::debug!(kana = %transcription.kana, "No pronunciation matches transcription");
                false
            }
        }
    }
}

/// Bank kana `bank` matches transcription kana `transcription` when both
/// have the same length and agree character by character in hiragana,
/// except that a long vowel mark in the bank may stand for い or う.
pub fn kana_matches(bank: &str, transcription: &str) -> bool {
    hiragana_matches(&kata_to_hira(bank), &kata_to_hira(transcription))
}

fn hiragana_matches(bank: &str, transcription: &str) -> bool {
    if bank.chars().count() != transcription.chars().count() {
        return false;
    }
    bank.chars()
        .zip(transcription.chars())
        .all(|(b, t)| b == t || (b == LONG_VOWEL_MARK && matches!(t, 'い' | 'う')))
}
