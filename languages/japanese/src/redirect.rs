//! Merging etymologies that live on other pages back into the root lookup.

use kotoba_core::visitor::StripAlternativeSpellings;
use kotoba_core::{EtymologyEntry, Lookup, LookupVisitor};

use crate::script::{hira_to_kata, is_hiragana, is_japanese_char, is_kana};

/// Splits `漢字, 感じ: meaning` into its context spellings and the
/// meaning. Definitions not starting with Japanese text have no context.
pub fn split_context(definition: &str) -> Option<(Vec<&str>, &str)> {
    if !definition.chars().next().is_some_and(is_japanese_char) {
        return None;
    }
    let (context, rest) = definition.split_once(':')?;
    let terms = context.split(',').map(str::trim).collect();
    Some((terms, rest.trim()))
}

/// Removes context spellings from definitions. With `keep_only` set,
/// definitions whose context does not name that spelling are dropped.
fn strip_context(lookup: &mut Lookup, keep_only: Option<&str>) {
    for entry in lookup.etymologies.iter_mut().flat_map(|e| e.entries.iter_mut()) {
        entry.definitions.retain_mut(|definition| {
            let Some((terms, rest)) = split_context(&definition.text) else {
                return true;
            };
            let keep = keep_only.is_none_or(|term| terms.contains(&term));
            definition.text = rest.to_string();
            keep
        });
    }
}

/// Drops entries left without definitions, then etymologies left
/// without entries.
fn prune_empty(lookup: &mut Lookup) {
    for etymology in &mut lookup.etymologies {
        etymology.entries.retain(|entry| !entry.definitions.is_empty());
    }
    lookup.etymologies.retain(|etymology| !etymology.entries.is_empty());
}

/// Kana of every transcription, plus the katakana form of hiragana ones.
fn kana_spellings(etymology: &EtymologyEntry) -> Vec<String> {
    let mut spellings: Vec<String> = Vec::new();
    let transcriptions = etymology.entries.iter().flat_map(|e| e.transcriptions.iter());
    for transcription in transcriptions.filter(|t| !t.kana.is_empty()) {
        let mut candidates = vec![transcription.kana.clone()];
        if transcription.kana.chars().next().is_some_and(is_hiragana) {
            candidates.push(hira_to_kata(&transcription.kana));
        }
        for candidate in candidates {
            if !spellings.contains(&candidate) {
                spellings.push(candidate);
            }
        }
    }
    spellings
}

/// Embeds the etymologies that `root`'s redirects point at.
///
/// Each redirected page donates at most one etymology: the first whose
/// entry term is a redirect target and that either is the page's only
/// etymology or lists `original_term` among its spellings. Pages that
/// donated nothing are returned, cleaned, for the caller to keep or drop.
pub fn link_redirects(
    root: &mut Lookup,
    redirected: Vec<Lookup>,
    original_term: &str,
) -> Vec<Lookup> {
    strip_context(root, None);
    prune_empty(root);

    let mut remaining = Vec::new();
    for mut page in redirected {
        strip_context(&mut page, Some(original_term));
        prune_empty(&mut page);
        let single = page.etymologies.len() == 1;

        let target = page.etymologies.iter().enumerate().find_map(|(e, etymology)| {
            let by_alternative = etymology.alternative_spellings.iter().any(|s| s == original_term);
            let by_kana = kana_spellings(etymology).iter().any(|s| s == original_term);
            if !single && !by_alternative && !by_kana {
                return None;
            }
            etymology.entries.iter().enumerate().find_map(|(i, entry)| {
                root.redirects
                    .iter()
                    .position(|r| r.term == entry.term)
                    .map(|r| (e, i, r, by_alternative))
            })
        });

        let Some((e, i, r, by_alternative)) = target else {
            if !page.is_empty() {
                remaining.push(page);
            }
            continue;
        };

        let mut etymology = page.etymologies.swap_remove(e);
        let redirect = root.redirects.remove(r);
        if by_alternative && etymology.entries[i].term.chars().all(is_kana) {
            etymology.entries[i].term = original_term.to_string();
        }
        tracing::debug!(
            term = %redirect.term,
            index = redirect.etymology_index,
            "Embedding redirected etymology"
        );
        etymology.index = redirect.etymology_index;
        root.etymologies.retain(|existing| existing.index != etymology.index);
        root.etymologies.push(etymology);
    }

    root.etymologies.sort_by_key(|e| e.index);
    for redirect in &root.redirects {
        tracing::warn!(term = %redirect.term, index = redirect.etymology_index, "Redirect was not resolved");
    }

    StripAlternativeSpellings.visit_lookup(root);
    for page in &mut remaining {
        StripAlternativeSpellings.visit_lookup(page);
    }
    remaining
}
