use kotoba_config::Config;
use kotoba_core::{Definition, Furigana, LexicalEntry, Lookup, Transcription};
use kotoba_lang_japanese::script::{contains_kanji, is_katakana};
use kotoba_lang_japanese::{PitchPattern, PitchRenderer, mora_count};
use serde::Serialize;

/// Anki fields are HTML, so multi-line values are joined with breaks.
const LINE_BREAK: &str = "<br>";

/// Every field of one vocabulary card. Empty strings stand for missing
/// values so templates never see placeholders.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct CardFields {
    pub key_term: String,
    pub kana: String,
    pub kanji: String,
    pub definitions: String,
    pub ipa: String,
    pub pretty_kana: String,
    pub pretty_kanji: String,
    pub usage_notes: String,
    pub pitch_type: String,
    pub pitch_notation: String,
}

impl CardFields {
    pub const NAMES: [&'static str; 10] = [
        "key-term",
        "kana",
        "kanji",
        "definitions",
        "ipa",
        "pretty-kana",
        "pretty-kanji",
        "usage-notes",
        "pitch-type",
        "pitch-notation",
    ];

    pub fn get(&self, name: &str) -> Option<&str> {
        let value = match name {
            "key-term" => &self.key_term,
            "kana" => &self.kana,
            "kanji" => &self.kanji,
            "definitions" => &self.definitions,
            "ipa" => &self.ipa,
            "pretty-kana" => &self.pretty_kana,
            "pretty-kanji" => &self.pretty_kanji,
            "usage-notes" => &self.usage_notes,
            "pitch-type" => &self.pitch_type,
            "pitch-notation" => &self.pitch_notation,
            _ => return None,
        };
        Some(value)
    }
}

/// Picks the transcription with the richest phonetic data: IPA and pitch,
/// then pitch alone, then IPA alone, then plain kana.
pub fn best_transcription(transcriptions: &[Transcription]) -> Option<&Transcription> {
    let tiers: [fn(&Transcription) -> bool; 4] = [
        |t| t.ipa.is_some() && t.pitch_accent.is_some(),
        |t| t.pitch_accent.is_some(),
        |t| t.ipa.is_some(),
        |_| true,
    ];
    let candidates = || transcriptions.iter().filter(|t| !t.kana.is_empty());
    tiers
        .iter()
        .find_map(|tier| candidates().find(|&t| tier(t)))
}

/// One part of speech that made it onto the card.
struct CardPart<'a> {
    part_of_speech: &'a str,
    entry: &'a LexicalEntry,
    transcription: &'a Transcription,
}

/// Parts of speech sharing one name, merged.
struct MergedPart<'a> {
    part_of_speech: &'a str,
    definitions: Vec<&'a Definition>,
    usage_notes: Vec<&'a str>,
}

/// Builds card fields from reconciled lookups.
pub struct CardBuilder {
    desired_parts_of_speech: Vec<String>,
    renderer: PitchRenderer,
}

impl CardBuilder {
    pub fn new(config: &Config) -> Self {
        Self {
            desired_parts_of_speech: config.card.desired_parts_of_speech.clone(),
            renderer: PitchRenderer::new(config.render.clone()),
        }
    }

    /// Canonical name of a desired part of speech, matched by prefix so
    /// that "Noun 2" or "Proper noun phrase" still count.
    fn desired<'a>(&'a self, part_of_speech: &str) -> Option<&'a str> {
        self.desired_parts_of_speech
            .iter()
            .find(|d| part_of_speech.starts_with(d.as_str()))
            .map(String::as_str)
    }

    /// Returns `None` when no desired part of speech has a transcription.
    ///
    /// Parts of speech are grouped by the kana of their best transcription
    /// and the largest group (the earliest one on ties) becomes the card.
    pub fn assemble(&self, lookup: &Lookup) -> Option<CardFields> {
        let mut groups: Vec<(&str, Vec<CardPart>)> = Vec::new();
        for entry in lookup.etymologies.iter().flat_map(|e| e.entries.iter()) {
            let Some(transcription) = best_transcription(&entry.transcriptions) else {
                continue;
            };
            let Some(part_of_speech) = self.desired(&entry.part_of_speech) else {
                tracing::debug!(part_of_speech = %entry.part_of_speech, "Skipping part of speech");
                continue;
            };
            let part = CardPart {
                part_of_speech,
                entry,
                transcription,
            };
            match groups.iter().position(|(kana, _)| *kana == transcription.kana) {
                Some(i) => groups[i].1.push(part),
                None => groups.push((transcription.kana.as_str(), vec![part])),
            }
        }

        let mut best: Option<(&str, Vec<CardPart>)> = None;
        for group in groups {
            if best.as_ref().is_none_or(|(_, parts)| group.1.len() > parts.len()) {
                best = Some(group);
            }
        }
        let Some((_, parts)) = best else {
            tracing::debug!(term = %lookup.term, "No card could be created");
            return None;
        };

        Some(self.fields(&parts))
    }

    fn fields(&self, parts: &[CardPart]) -> CardFields {
        let first = &parts[0];
        let transcription = first.transcription;
        let term = first.entry.term.as_str();

        let mut kana = transcription.kana.clone();
        let mut kanji = String::new();
        let mut furigana: Option<&Furigana> = None;
        if term != kana {
            if contains_kanji(term) {
                kanji = term.to_string();
                furigana = transcription.furigana.as_ref();
            } else if term.chars().all(is_katakana) {
                kana = term.to_string();
            }
        }

        let merged = merge_parts(parts);
        let usage_notes = merged
            .iter()
            .flat_map(|m| m.usage_notes.iter().copied())
            .map(|note| note.trim().replace('\n', LINE_BREAK))
            .collect::<Vec<_>>()
            .join(LINE_BREAK);

        let pitch = transcription.pitch_accent;
        let pretty_kanji = if kanji.is_empty() {
            String::new()
        } else {
            self.renderer.render(&kanji, furigana, pitch)
        };
        let pattern = pitch.map(|p| PitchPattern::classify(p, mora_count(&kana)));
        let pitch_type = pattern
            .as_ref()
            .map(|p| p.type_name().to_string())
            .unwrap_or_default();
        let pitch_notation = pattern.as_ref().map(PitchPattern::to_notation).unwrap_or_default();

        CardFields {
            key_term: if kanji.is_empty() { kana.clone() } else { kanji.clone() },
            pretty_kana: self.renderer.render(&kana, None, pitch),
            definitions: definitions_html(&merged),
            ipa: transcription.ipa.clone().unwrap_or_default(),
            kana,
            kanji,
            pretty_kanji,
            usage_notes,
            pitch_type,
            pitch_notation,
        }
    }
}

/// Groups parts by name in order of first appearance. Within a name only
/// parts spelled like the first one are merged.
fn merge_parts<'a>(parts: &[CardPart<'a>]) -> Vec<MergedPart<'a>> {
    let mut merged: Vec<(&str, MergedPart<'a>)> = Vec::new();
    for part in parts {
        let index = match merged
            .iter()
            .position(|(_, m)| m.part_of_speech == part.part_of_speech)
        {
            Some(i) if merged[i].0 == part.entry.term => i,
            Some(_) => continue,
            None => {
                merged.push((
                    part.entry.term.as_str(),
                    MergedPart {
                        part_of_speech: part.part_of_speech,
                        definitions: Vec::new(),
                        usage_notes: Vec::new(),
                    },
                ));
                merged.len() - 1
            }
        };
        let target = &mut merged[index].1;
        target.definitions.extend(&part.entry.definitions);
        if let Some(notes) = part.entry.usage_notes.as_deref().filter(|n| !n.trim().is_empty()) {
            target.usage_notes.push(notes);
        }
    }
    merged.into_iter().map(|(_, m)| m).collect()
}

fn definitions_html(parts: &[MergedPart]) -> String {
    let mut html = String::new();
    for part in parts {
        html.push_str(&format!("<div class=\"part-of-speech\">{}</div>\n", part.part_of_speech));
        html.push_str("<ul class=\"word-definitions\">\n");
        for definition in &part.definitions {
            html.push_str(&format!("\t<li>\n\t\t{}\n", definition.text));
            for example in &definition.examples {
                html.push_str("\t\t<ul class=\"example-sentence\">\n");
                html.push_str(&format!(
                    "\t\t\t<li class=\"japanese-example\">{}</li>\n",
                    ruby_tags(&example.japanese)
                ));
                html.push_str(&format!(
                    "\t\t\t<li class=\"english-example\">{}</li>\n",
                    example.english
                ));
                html.push_str("\t\t</ul>\n");
            }
            html.push_str("\t</li>\n");
        }
        html.push_str("</ul>\n");
    }
    html
}

/// `猫(ねこ)が` becomes `<ruby>猫<rt>ねこ</rt></ruby>が`. The reading
/// belongs to the single character before the parenthesis.
pub fn ruby_tags(sentence: &str) -> String {
    let mut out = String::with_capacity(sentence.len());
    let mut pending: Option<char> = None;
    let mut reading: Option<String> = None;

    for c in sentence.chars() {
        match reading.take() {
            Some(mut r) if c != ')' => {
                r.push(c);
                reading = Some(r);
            }
            Some(r) => match pending.take() {
                Some(base) => out.push_str(&format!("<ruby>{base}<rt>{r}</rt></ruby>")),
                None => out.push_str(&r),
            },
            None if c == '(' => reading = Some(String::new()),
            None => {
                if let Some(previous) = pending.replace(c) {
                    out.push(previous);
                }
            }
        }
    }
    if let Some(previous) = pending {
        out.push(previous);
    }
    if let Some(unclosed) = reading {
        out.push('(');
        out.push_str(&unclosed);
    }
    out
}
