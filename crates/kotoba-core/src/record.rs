//! Conversion between the typed lookup tree and the nested key-value
//! record the persistence layer stores:
//!
//! ```text
//! { "Etymology 1": { "Noun": { "term": ..., "pronunciations": [...], "definitions": [...] } } }
//! ```
//!
//! String keys exist only here; everything inside the crate works on
//! indices and typed fields.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::RecordError;
use crate::types::{
    Definition, EtymologyEntry, Example, Furigana, FuriganaSpan, LexicalEntry, Lookup,
    Transcription,
};

const ETYMOLOGY_PREFIX: &str = "Etymology ";

#[derive(Debug, Serialize, Deserialize)]
struct EntryRecord {
    term: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    counter: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pronunciations: Vec<TranscriptionRecord>,
    #[serde(default)]
    definitions: Vec<DefinitionRecord>,
    #[serde(rename = "usage-notes", default, skip_serializing_if = "Option::is_none")]
    usage_notes: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct TranscriptionRecord {
    kana: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    furigana: Option<Vec<String>>,
    #[serde(rename = "furigana-by-index", default, skip_serializing_if = "Option::is_none")]
    furigana_by_index: Option<Vec<(usize, usize, String)>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    region: Option<String>,
    #[serde(rename = "pitch-accent", default, skip_serializing_if = "Option::is_none")]
    pitch_accent: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    ipa: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct DefinitionRecord {
    definition: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    synonyms: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    antonyms: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    examples: Vec<ExampleRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ExampleRecord {
    japanese: String,
    romaji: String,
    english: String,
}

impl From<&Transcription> for TranscriptionRecord {
    fn from(t: &Transcription) -> Self {
        let (furigana, furigana_by_index) = match &t.furigana {
            Some(Furigana::PerChar(readings)) => (Some(readings.clone()), None),
            Some(Furigana::Span(span)) => (
                None,
                Some(vec![(span.start, span.len, span.reading.clone())]),
            ),
            None => (None, None),
        };
        Self {
            kana: t.kana.clone(),
            furigana,
            furigana_by_index,
            region: t.region.clone(),
            pitch_accent: t.pitch_accent,
            ipa: t.ipa.clone(),
        }
    }
}

impl TranscriptionRecord {
    fn into_transcription(self, term: &str) -> Result<Transcription, RecordError> {
        let furigana = match (self.furigana, self.furigana_by_index) {
            (Some(readings), _) => Some(Furigana::PerChar(readings)),
            (None, Some(spans)) => spans
                .into_iter()
                .next()
                .map(|(start, len, reading)| Furigana::Span(FuriganaSpan { start, len, reading })),
            (None, None) => None,
        };
        if let Some(furigana) = &furigana {
            furigana.check(term)?;
        }
        Ok(Transcription {
            kana: self.kana,
            furigana,
            region: self.region,
            pitch_accent: self.pitch_accent,
            ipa: self.ipa,
        })
    }
}

impl From<&Definition> for DefinitionRecord {
    fn from(d: &Definition) -> Self {
        Self {
            definition: d.text.clone(),
            synonyms: d.synonyms.clone(),
            antonyms: d.antonyms.clone(),
            examples: d
                .examples
                .iter()
                .map(|e| ExampleRecord {
                    japanese: e.japanese.clone(),
                    romaji: e.romaji.clone(),
                    english: e.english.clone(),
                })
                .collect(),
        }
    }
}

impl From<DefinitionRecord> for Definition {
    fn from(d: DefinitionRecord) -> Self {
        Self {
            text: d.definition,
            synonyms: d.synonyms,
            antonyms: d.antonyms,
            examples: d
                .examples
                .into_iter()
                .map(|e| Example {
                    japanese: e.japanese,
                    romaji: e.romaji,
                    english: e.english,
                })
                .collect(),
        }
    }
}

impl From<&LexicalEntry> for EntryRecord {
    fn from(e: &LexicalEntry) -> Self {
        Self {
            term: e.term.clone(),
            counter: e.counter.clone(),
            pronunciations: e.transcriptions.iter().map(Into::into).collect(),
            definitions: e.definitions.iter().map(Into::into).collect(),
            usage_notes: e.usage_notes.clone(),
        }
    }
}

/// Serializes the etymologies of `lookup`.
pub fn to_record(lookup: &Lookup) -> Result<Value, RecordError> {
    let mut root = Map::new();
    for etymology in &lookup.etymologies {
        root.insert(
            format!("{ETYMOLOGY_PREFIX}{}", etymology.index + 1),
            Value::Object(etymology_record(etymology)?),
        );
    }
    Ok(Value::Object(root))
}

fn etymology_record(etymology: &EtymologyEntry) -> Result<Map<String, Value>, RecordError> {
    let mut totals: HashMap<&str, usize> = HashMap::new();
    for entry in &etymology.entries {
        *totals.entry(entry.part_of_speech.as_str()).or_default() += 1;
    }

    let mut seen: HashMap<&str, usize> = HashMap::new();
    let mut parts = Map::new();
    for entry in &etymology.entries {
        let name = entry.part_of_speech.as_str();
        let key = if totals[name] > 1 {
            let n = seen.entry(name).or_default();
            *n += 1;
            format!("{name} {n}")
        } else {
            name.to_string()
        };
        parts.insert(key, serde_json::to_value(EntryRecord::from(entry))?);
    }
    Ok(parts)
}

/// Reads etymologies back, ordered by their number.
pub fn from_record(value: &Value) -> Result<Vec<EtymologyEntry>, RecordError> {
    let root = value
        .as_object()
        .ok_or_else(|| RecordError::NotAnObject("record root".to_string()))?;

    let mut etymologies = Vec::with_capacity(root.len());
    for (key, parts) in root {
        let index = parse_etymology_key(key)?;
        let parts = parts
            .as_object()
            .ok_or_else(|| RecordError::NotAnObject(key.clone()))?;

        let mut entries = Vec::with_capacity(parts.len());
        for (pos_key, entry) in parts {
            let record: EntryRecord = serde_json::from_value(entry.clone())?;
            let transcriptions = record
                .pronunciations
                .into_iter()
                .map(|t| t.into_transcription(&record.term))
                .collect::<Result<Vec<_>, _>>()?;
            entries.push(LexicalEntry {
                part_of_speech: strip_numbering(pos_key).to_string(),
                term: record.term,
                counter: record.counter,
                transcriptions,
                definitions: record.definitions.into_iter().map(Into::into).collect(),
                usage_notes: record.usage_notes,
            });
        }

        etymologies.push(EtymologyEntry {
            index,
            alternative_spellings: Vec::new(),
            entries,
        });
    }

    etymologies.sort_by_key(|e| e.index);
    Ok(etymologies)
}

fn parse_etymology_key(key: &str) -> Result<usize, RecordError> {
    key.strip_prefix(ETYMOLOGY_PREFIX)
        .and_then(|n| n.trim().parse::<usize>().ok())
        .filter(|&n| n > 0)
        .map(|n| n - 1)
        .ok_or_else(|| RecordError::EtymologyKey(key.to_string()))
}

/// "Noun 2" -> "Noun"; "Proper noun" stays as is.
fn strip_numbering(key: &str) -> &str {
    match key.rsplit_once(' ') {
        Some((name, n)) if !n.is_empty() && n.chars().all(|c| c.is_ascii_digit()) => name,
        _ => key,
    }
}
