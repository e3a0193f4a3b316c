//! Filtering and enrichment of raw definition list items.

use kotoba_config::definitions::DefinitionConfig;
use kotoba_core::{Definition, Example, RawDefinition};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::script::{extract_japanese, is_kanji, percent_japanese, to_katakana};

static BRACKETED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[.*?\]").expect("valid bracket regex"));

const SHORT_FOR: &str = "Short for ";
const MISSING_TRANSLATION: &str = "(please add an English translation";
const EXAMPLE_SEPARATOR: char = '―';

/// Applies the configured definition policy to one part of speech.
pub struct DefinitionCleaner<'a> {
    config: &'a DefinitionConfig,
    forbidden: Vec<&'a str>,
}

impl<'a> DefinitionCleaner<'a> {
    pub fn new(config: &'a DefinitionConfig) -> Self {
        Self {
            forbidden: config.forbidden_context_terms(),
            config,
        }
    }

    /// Cleans `raw`, or returns `None` when the definition is dropped.
    ///
    /// `term` and `prefers_katakana` control whether readings of the term
    /// in example sentences are rewritten in katakana.
    pub fn clean(&self, raw: &RawDefinition, term: &str, prefers_katakana: bool) -> Option<Definition> {
        let text = raw.text.trim();
        if self.is_skipped(text) {
            tracing::debug!(definition = text, "Skipping definition");
            return None;
        }

        let text = BRACKETED.replace_all(text, "").trim().to_string();
        if self.is_irrelevant(&text) {
            tracing::debug!(definition = %text, "Dropping irrelevant definition");
            return None;
        }
        if text.is_empty() && raw.sublines.is_empty() {
            return None;
        }

        let mut definition = Definition::new(text);
        classify_sublines(&mut definition, &raw.sublines, term, prefers_katakana);
        Some(definition)
    }

    pub fn clean_all(
        &self,
        raw: &[RawDefinition],
        term: &str,
        prefers_katakana: bool,
    ) -> Vec<Definition> {
        raw.iter()
            .filter_map(|d| self.clean(d, term, prefers_katakana))
            .collect()
    }

    /// Given names, "Short for" notes and untranslated placeholders.
    fn is_skipped(&self, text: &str) -> bool {
        if self.config.skip_given_names
            && self
                .config
                .given_name_phrases
                .iter()
                .any(|p| text.starts_with(p.as_str()))
        {
            return true;
        }
        if self.config.skip_short_for && text.starts_with(SHORT_FOR) {
            return true;
        }

        let placeholder = self.config.untranslated_placeholder.as_str();
        if text.starts_with(placeholder) {
            return true;
        }
        if let Some((_, rest)) = text.split_once(':') {
            if rest.trim().starts_with(placeholder) {
                return true;
            }
        }
        text.starts_with('(')
            && text
                .split_once(") ")
                .is_some_and(|(_, rest)| rest.starts_with(placeholder))
    }

    /// Forbidden context in a leading parenthesis, or an alternative form.
    fn is_irrelevant(&self, text: &str) -> bool {
        let lower = text.to_lowercase();
        if let Some(context) = lower
            .strip_prefix('(')
            .and_then(|rest| rest.split_once(')'))
            .map(|(context, _)| context)
        {
            if self.forbidden.iter().any(|f| context.contains(f)) {
                return true;
            }
        }
        self.config.remove_alternative_forms
            && self
                .config
                .alternative_form_phrases
                .iter()
                .any(|p| lower.contains(p.as_str()))
    }
}

fn classify_sublines(definition: &mut Definition, sublines: &[String], term: &str, prefers_katakana: bool) {
    let lines: Vec<&str> = sublines.iter().map(|s| s.trim()).collect();
    let japanese_share: Vec<f32> = lines.iter().map(|l| percent_japanese(l)).collect();

    let mut i = 0;
    while i < lines.len() {
        let line = lines[i];

        if let Some(rest) = line.strip_prefix("Synonym") {
            definition.synonyms = extract_japanese(rest);
            i += 1;
            continue;
        }
        if let Some(rest) = line.strip_prefix("Antonym") {
            definition.antonyms = extract_japanese(rest);
            i += 1;
            continue;
        }
        if line.contains(EXAMPLE_SEPARATOR) {
            if let Some(example) = inline_example(line) {
                push_example(definition, example, term, prefers_katakana);
                i += 1;
                continue;
            }
        }

        // Japanese line followed by its romanization and translation.
        if i + 2 < lines.len()
            && japanese_share[i] > 0.5
            && japanese_share[i + 1] < 0.5
            && japanese_share[i + 2] < 0.5
        {
            let example = Example {
                japanese: line.to_string(),
                romaji: lines[i + 1].to_string(),
                english: lines[i + 2].to_string(),
            };
            push_example(definition, example, term, prefers_katakana);
            i += 3;
            continue;
        }

        i += 1;
    }
}

/// `日本語 ― nihongo ― Japanese` on a single line.
fn inline_example(line: &str) -> Option<Example> {
    let parts: Vec<&str> = line.split(EXAMPLE_SEPARATOR).map(str::trim).collect();
    match parts.as_slice() {
        [japanese, romaji, english]
            if percent_japanese(japanese) > 0.5
                && percent_japanese(romaji) < 0.5
                && percent_japanese(english) < 0.5 =>
        {
            Some(Example {
                japanese: japanese.to_string(),
                romaji: romaji.to_string(),
                english: english.to_string(),
            })
        }
        _ => None,
    }
}

fn push_example(definition: &mut Definition, mut example: Example, term: &str, prefers_katakana: bool) {
    if example.english.starts_with(MISSING_TRANSLATION) {
        return;
    }
    example.japanese = remove_spaces(&example.japanese);
    if prefers_katakana {
        example.japanese = readings_to_katakana(&example.japanese, term);
    }
    definition.examples.push(example);
}

/// Drops whitespace inside a Japanese sentence, except directly after
/// 。 or 、.
pub fn remove_spaces(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut previous = None;
    for c in text.chars() {
        if c.is_whitespace() && !matches!(previous, Some('。' | '、')) {
            continue;
        }
        out.push(c);
        previous = Some(c);
    }
    out
}

/// Rewrites the parenthesised readings following occurrences of `term` in
/// `sentence` in katakana, e.g. `猫(ねこ)が` becomes `猫(ネコ)が`.
pub fn readings_to_katakana(sentence: &str, term: &str) -> String {
    let mut chars: Vec<char> = sentence.chars().collect();
    let term: Vec<char> = term.chars().collect();
    if term.is_empty() {
        return sentence.to_string();
    }

    // Indices of term characters, matched outside parentheses.
    let mut matched = Vec::new();
    let mut current = Vec::new();
    let mut in_parens = false;
    for (i, &c) in chars.iter().enumerate() {
        match c {
            '(' => in_parens = true,
            ')' => in_parens = false,
            _ if in_parens => {}
            _ => {
                if c != term[current.len()] {
                    current.clear();
                }
                if c == term[current.len()] {
                    current.push(i);
                    if current.len() == term.len() {
                        matched.append(&mut current);
                    }
                }
            }
        }
    }

    let mut opens: Vec<usize> = Vec::new();
    for &i in matched.iter().filter(|&&i| is_kanji(chars[i])) {
        let Some(open) = chars[i + 1..].iter().position(|&c| c == '(').map(|p| p + i + 1) else {
            continue;
        };
        if opens.last() != Some(&open) {
            opens.push(open);
        }
    }

    for open in opens {
        if let Some(close) = chars[open + 1..].iter().position(|&c| c == ')') {
            for c in &mut chars[open + 1..open + 1 + close] {
                *c = to_katakana(*c);
            }
        }
    }

    chars.into_iter().collect()
}
