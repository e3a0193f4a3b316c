use std::collections::HashMap;

use kotoba_config::Config;
use kotoba_core::visitor::Tally;
use kotoba_core::{
    ContractError, Document, EtymologyBucket, EtymologyEntry, LexicalEntry, Lookup,
    LookupVisitor, Position, RawDefinition, Redirect, SectionBody, Transcription,
};

use crate::definitions::DefinitionCleaner;
use crate::furigana::{needs_reconstruction, reconstruct};
use crate::headword::{accept_counter, extract_transcriptions};
use crate::layout::{EmptyBucket, infer};
use crate::pronunciation::{PronunciationBank, kana_matches};
use crate::script::normalize;

/// Turns one document into a reconciled lookup
pub struct Reconciler {
    config: Config,
}

impl Reconciler {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Layout inference, pronunciation matching and furigana
    /// reconstruction for every part of speech of `document`.
    ///
    /// An empty lookup means nothing usable was found. Errors are reserved
    /// for input that breaks a data-model invariant.
    pub fn reconcile(&self, document: &Document) -> Result<Lookup, ContractError> {
        document.validate()?;

        let layout = infer(&document.headings());
        let bodies = document.bodies();

        let mut etymologies = Vec::with_capacity(layout.buckets.len());
        let mut emptied = layout.discarded.clone();
        for bucket in &layout.buckets {
            let etymology = self.reconcile_bucket(bucket, &bodies)?;
            if etymology.entries.is_empty() {
                tracing::debug!(index = bucket.index, "Etymology has no entries left");
                emptied.push(EmptyBucket::from(bucket.clone()));
                continue;
            }
            etymologies.push(etymology);
        }
        emptied.sort_by_key(|bucket| bucket.index);

        let redirects = collect_redirects(&emptied, &bodies, etymologies.is_empty());

        let mut lookup = Lookup {
            term: document.term.clone(),
            etymologies,
            redirects,
        };
        share_phonetic_info(&mut lookup);

        let mut tally = Tally::default();
        tally.visit_lookup(&mut lookup);
        tracing::info!(
            term = %lookup.term,
            etymologies = lookup.etymologies.len(),
            entries = lookup.entry_count(),
            transcriptions = tally.transcriptions,
            definitions = tally.definitions,
            redirects = lookup.redirects.len(),
            "Reconciled document"
        );

        Ok(lookup)
    }

    fn reconcile_bucket(
        &self,
        bucket: &EtymologyBucket,
        bodies: &HashMap<Position, &SectionBody>,
    ) -> Result<EtymologyEntry, ContractError> {
        let alternative_spellings = bucket
            .heading
            .as_ref()
            .and_then(|h| bodies.get(&h.position))
            .and_then(|body| match body {
                SectionBody::Etymology {
                    alternative_spellings,
                    ..
                } => Some(alternative_spellings.clone()),
                _ => None,
            })
            .unwrap_or_default();

        let mut bank = PronunciationBank::new();
        for heading in &bucket.pronunciation_headings {
            if let Some(SectionBody::Pronunciation { lines }) = bodies.get(&heading.position) {
                bank.extend_from_list(lines, &self.config.pronunciation.regions);
            }
        }

        let mut entries = Vec::with_capacity(bucket.pos_headings.len());
        for (i, heading) in bucket.pos_headings.iter().enumerate() {
            let Some(SectionBody::PartOfSpeech {
                headword,
                counter,
                definitions,
            }) = bodies.get(&heading.position)
            else {
                continue;
            };

            let usage_notes = bucket
                .usage_for(i)
                .and_then(|u| match bodies.get(&u.position) {
                    Some(SectionBody::UsageNotes { text }) => Some(text.trim().to_string()),
                    _ => None,
                })
                .filter(|text| !text.is_empty());

            let Some(headword) = headword else {
                tracing::debug!(part_of_speech = %heading.label, "Part of speech has no headword");
                continue;
            };

            let entry = self.reconcile_entry(
                &heading.label,
                headword,
                counter.as_deref(),
                definitions,
                usage_notes,
                &bank,
            )?;
            if let Some(entry) = entry {
                entries.push(entry);
            }
        }

        Ok(EtymologyEntry {
            index: bucket.index,
            alternative_spellings,
            entries,
        })
    }

    fn reconcile_entry(
        &self,
        part_of_speech: &str,
        headword: &str,
        counter: Option<&str>,
        definitions: &[RawDefinition],
        usage_notes: Option<String>,
        bank: &PronunciationBank,
    ) -> Result<Option<LexicalEntry>, ContractError> {
        let prefers_katakana = usage_notes
            .as_deref()
            .is_some_and(|notes| notes.contains(self.config.headwords.katakana_hint.as_str()));

        let Some(extracted) = extract_transcriptions(
            &normalize(headword),
            prefers_katakana,
            self.config.headwords.remove_duplicate_katakana,
        )?
        else {
            return Ok(None);
        };
        let term = extracted.term;

        let mut transcriptions = extracted.transcriptions;
        for transcription in &mut transcriptions {
            bank.apply(transcription);
            fill_furigana(&term, transcription);
        }

        let cleaner = DefinitionCleaner::new(&self.config.definitions);
        let definitions = cleaner.clean_all(definitions, &term, prefers_katakana);
        if definitions.is_empty() {
            tracing::debug!(%term, part_of_speech, "No definitions left");
            return Ok(None);
        }

        Ok(Some(LexicalEntry {
            part_of_speech: part_of_speech.to_string(),
            term,
            counter: accept_counter(counter),
            transcriptions,
            definitions,
            usage_notes,
        }))
    }
}

impl Default for Reconciler {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

fn fill_furigana(term: &str, transcription: &mut Transcription) {
    if transcription.kana.is_empty() || !needs_reconstruction(term, transcription.furigana.as_ref()) {
        return;
    }
    let furigana = reconstruct(term, &transcription.kana);
    if furigana.is_coarse() {
        tracing::debug!(term, kana = %transcription.kana, "Furigana reconstructed as a span");
    }
    transcription.furigana = Some(furigana);
}

/// Redirects of the buckets that ended up without entries, whether the
/// layout dropped them or every definition was cleaned away. Normally
/// only the first target of each bucket counts; when no etymology
/// survived, every target gets its own sequential etymology index.
fn collect_redirects(
    discarded: &[EmptyBucket],
    bodies: &HashMap<Position, &SectionBody>,
    nothing_survived: bool,
) -> Vec<Redirect> {
    let targets = discarded.iter().filter_map(|bucket| {
        let heading = bucket.heading.as_ref()?;
        match bodies.get(&heading.position) {
            Some(SectionBody::Etymology { redirect_terms, .. }) if !redirect_terms.is_empty() => {
                Some((bucket.index, redirect_terms))
            }
            _ => {
                tracing::warn!(index = bucket.index, "Empty etymology has no redirect target");
                None
            }
        }
    });

    if nothing_survived {
        targets
            .flat_map(|(_, terms)| terms.iter())
            .enumerate()
            .map(|(etymology_index, term)| Redirect {
                term: term.clone(),
                etymology_index,
            })
            .collect()
    } else {
        targets
            .map(|(etymology_index, terms)| Redirect {
                term: terms[0].clone(),
                etymology_index,
            })
            .collect()
    }
}

/// Snapshot of every transcription with kana, in tree order.
#[derive(Default)]
struct CollectTranscriptions {
    transcriptions: Vec<Transcription>,
}

impl LookupVisitor for CollectTranscriptions {
    fn visit_transcription(&mut self, transcription: &mut Transcription) {
        if !transcription.kana.is_empty() {
            self.transcriptions.push(transcription.clone());
        }
    }
}

/// Writes phonetic fields back in the order they were collected.
struct ApplyPhonetics {
    updated: std::vec::IntoIter<Transcription>,
}

impl LookupVisitor for ApplyPhonetics {
    fn visit_transcription(&mut self, transcription: &mut Transcription) {
        if transcription.kana.is_empty() {
            return;
        }
        if let Some(updated) = self.updated.next() {
            transcription.region = updated.region;
            transcription.pitch_accent = updated.pitch_accent;
            transcription.ipa = updated.ipa;
        }
    }
}

/// Lets transcriptions with matching kana fill each other's missing
/// region, pitch accent and IPA. A receiver that already has a pitch
/// accent only takes data from givers with the same one.
pub fn share_phonetic_info(lookup: &mut Lookup) {
    let mut collect = CollectTranscriptions::default();
    collect.visit_lookup(lookup);
    let mut all = collect.transcriptions;
    if all.len() <= 1 {
        return;
    }

    let mut needs_update = vec![true; all.len()];
    for i in (0..all.len()).rev() {
        if !needs_update[i] {
            continue;
        }
        for j in 0..all.len() {
            if i == j {
                continue;
            }
            let giver = all[j].phonetics();
            if all[i].pitch_accent.is_some() && all[i].pitch_accent != giver.pitch_accent {
                continue;
            }
            let receiver = &all[i].kana;
            if !kana_matches(receiver, &giver.kana) && !kana_matches(&giver.kana, receiver) {
                continue;
            }
            all[i].absorb(&giver);
            if giver.region.is_some() && giver.pitch_accent.is_some() && giver.ipa.is_some() {
                needs_update[j] = false;
            }
        }
    }

    ApplyPhonetics {
        updated: all.into_iter(),
    }
    .visit_lookup(lookup);
}
