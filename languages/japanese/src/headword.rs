//! Headword lines: `食(た)べる or 喰(た)べる`.

use kotoba_core::{ContractError, Furigana, Transcription};

use crate::furigana::validate;
use crate::script::{hira_to_kata, is_hiragana, is_japanese_char, is_kana, is_katakana, is_kanji, percent_japanese};

/// Share of Japanese characters a counter must exceed to be kept.
const COUNTER_MIN_JAPANESE: f32 = 0.9;

/// One written form with a reading slot per character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Headword {
    pub term: String,
    pub readings: Vec<String>,
}

impl Headword {
    /// Kana of the term with kanji replaced by their readings.
    pub fn kana(&self) -> String {
        self.term
            .chars()
            .zip(&self.readings)
            .map(|(c, reading)| {
                if is_kana(c) {
                    c.to_string()
                } else {
                    reading.clone()
                }
            })
            .collect()
    }

    pub fn has_readings(&self) -> bool {
        self.readings.iter().any(|r| !r.is_empty())
    }

    /// Kanji are present but none of them carries a reading, so the
    /// derived kana would be missing whole characters.
    fn lacks_kana(&self) -> bool {
        self.term.chars().any(is_kanji) && !self.has_readings()
    }
}

/// Splits a single headword into term and per-character readings.
///
/// Japanese characters inside parentheses are appended to the reading of
/// the character before them. A kanji run whose joined reading is exactly
/// as long as the run is spread one kana per kanji.
pub fn parse_headword(text: &str) -> Headword {
    let mut term = String::new();
    let mut readings: Vec<String> = Vec::new();
    let mut in_parens = false;
    let mut uses_parens = false;

    for c in text.chars() {
        match c {
            '(' if !in_parens => {
                in_parens = true;
                uses_parens = true;
            }
            ')' if in_parens => in_parens = false,
            c if is_japanese_char(c) => {
                if in_parens {
                    if let Some(last) = readings.last_mut() {
                        last.push(c);
                    }
                } else {
                    term.push(c);
                    readings.push(String::new());
                }
            }
            _ => {}
        }
    }

    if uses_parens {
        let chars: Vec<char> = term.chars().collect();
        redistribute_runs(&chars, &mut readings);
    }

    Headword { term, readings }
}

fn redistribute_runs(chars: &[char], readings: &mut [String]) {
    let mut i = 0;
    while i < chars.len() {
        if !is_kanji(chars[i]) {
            i += 1;
            continue;
        }
        let start = i;
        while i < chars.len() && is_kanji(chars[i]) {
            i += 1;
        }
        if i - start < 2 {
            continue;
        }
        let joined: Vec<char> = readings[start..i].concat().chars().collect();
        if joined.len() == i - start {
            for (offset, c) in joined.into_iter().enumerate() {
                readings[start + offset] = c.to_string();
            }
        }
    }
}

/// Term and transcriptions of one part-of-speech headword line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedHeadword {
    pub term: String,
    pub transcriptions: Vec<Transcription>,
}

/// Parses a headword line holding one or more alternatives separated by
/// `or`. The first alternative names the term.
///
/// When `remove_duplicate_katakana` is set, a katakana transcription that
/// is a plain conversion of a hiragana one is dropped, or the hiragana one
/// when `prefers_katakana`.
pub fn extract_transcriptions(
    text: &str,
    prefers_katakana: bool,
    remove_duplicate_katakana: bool,
) -> Result<Option<ExtractedHeadword>, ContractError> {
    let alternatives: Vec<Headword> = text
        .split("or")
        .map(parse_headword)
        .filter(|h| !h.term.is_empty())
        .collect();
    let Some(first) = alternatives.first() else {
        return Ok(None);
    };
    let term = first.term.clone();

    if alternatives.iter().any(|h| h.term != term) {
        let terms: Vec<&str> = alternatives.iter().map(|h| h.term.as_str()).collect();
        tracing::warn!(?terms, "Headword alternatives disagree on their term");
    }

    let mut transcriptions = Vec::with_capacity(alternatives.len());
    for headword in &alternatives {
        if headword.lacks_kana() {
            tracing::debug!(term = %headword.term, "Headword has no readings for its kanji");
            continue;
        }
        let transcription = Transcription::new(headword.kana());
        let transcription = if headword.term == term && headword.has_readings() {
            validate(&term, &headword.readings)?;
            transcription.with_furigana(&term, Furigana::PerChar(headword.readings.clone()))?
        } else {
            transcription
        };
        transcriptions.push(transcription);
    }

    if remove_duplicate_katakana {
        remove_katakana_duplicates(&mut transcriptions, prefers_katakana);
    }

    Ok(Some(ExtractedHeadword {
        term,
        transcriptions,
    }))
}

fn remove_katakana_duplicates(transcriptions: &mut Vec<Transcription>, prefers_katakana: bool) {
    let starts_with = |t: &Transcription, f: fn(char) -> bool| t.kana.chars().next().is_some_and(f);

    let mut remove = vec![false; transcriptions.len()];
    for (k, kata) in transcriptions.iter().enumerate() {
        if !starts_with(kata, is_katakana) {
            continue;
        }
        for (h, hira) in transcriptions.iter().enumerate() {
            if starts_with(hira, is_hiragana) && kata.kana == hira_to_kata(&hira.kana) {
                remove[if prefers_katakana { h } else { k }] = true;
            }
        }
    }

    let mut flags = remove.into_iter();
    transcriptions.retain(|_| !flags.next().unwrap_or(false));
}

/// Keeps a counter word only when it is written in Japanese.
pub fn accept_counter(counter: Option<&str>) -> Option<String> {
    counter
        .map(str::trim)
        .filter(|c| percent_japanese(c) > COUNTER_MIN_JAPANESE)
        .map(str::to_string)
}
