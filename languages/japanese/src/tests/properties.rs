use kotoba_core::{Furigana, FuriganaSpan, HeadingCategory, PositionedHeading, PronunciationRecord};
use proptest::prelude::*;

use crate::furigana::validate;
use crate::script::is_kanji;
use crate::{PitchRenderer, PronunciationBank, infer, kana_matches, mora_count, reconstruct};

const CATEGORIES: [HeadingCategory; 4] = [
    HeadingCategory::Etymology,
    HeadingCategory::Pronunciation,
    HeadingCategory::PartOfSpeech,
    HeadingCategory::UsageNotes,
];

fn headings() -> impl Strategy<Value = Vec<PositionedHeading<u32>>> {
    prop::collection::vec(0..CATEGORIES.len(), 0..24).prop_map(|kinds| {
        kinds
            .into_iter()
            .enumerate()
            .map(|(i, k)| PositionedHeading::new(CATEGORIES[k], i as u32 * 3, CATEGORIES[k].as_str()))
            .rev()
            .collect()
    })
}

fn kana() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop::sample::select(vec!['か', 'き', 'ね', 'こ', 'う', 'い', 'ょ', 'ー', 'カ', 'ネ', 'ン']),
        1..8,
    )
    .prop_map(|chars| chars.into_iter().collect())
}

fn term() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop::sample::select(vec!['猫', '日', '本', '東', '京', '々', 'か', 'の', 'ね', 'ア', 'ー']),
        0..8,
    )
    .prop_map(|chars| chars.into_iter().collect())
}

/// A term with per-character readings over its kanji, or with one
/// reading spanning part of it.
fn annotated_term() -> impl Strategy<Value = (String, Furigana)> {
    let per_char = prop::collection::vec(
        (
            prop::sample::select(vec!['猫', '日', '本', '東', '京', 'か', 'の', 'ア', 'ー']),
            prop::sample::select(vec!["ね", "こう", "きょ", "じん", "い"]),
        ),
        1..6,
    )
    .prop_map(|pairs| {
        let term: String = pairs.iter().map(|(c, _)| *c).collect();
        let readings = pairs
            .iter()
            .map(|(c, r)| if is_kanji(*c) { r.to_string() } else { String::new() })
            .collect();
        (term, Furigana::PerChar(readings))
    });

    let span = (
        term().prop_filter("non-empty term", |t| !t.is_empty()),
        kana(),
        any::<prop::sample::Index>(),
        any::<prop::sample::Index>(),
    )
        .prop_map(|(term, reading, start, len)| {
            let chars = term.chars().count();
            let start = start.index(chars);
            let len = len.index(chars - start) + 1;
            (term, Furigana::Span(FuriganaSpan { start, len, reading }))
        });

    prop_oneof![per_char, span]
}

/// Drops every `[reading]` group, leaving the base text.
fn strip_ruby(text: &str) -> String {
    let mut depth = 0usize;
    text.chars()
        .filter(|&c| match c {
            '[' => {
                depth += 1;
                false
            }
            ']' => {
                depth = depth.saturating_sub(1);
                false
            }
            _ => depth == 0,
        })
        .collect()
}

proptest! {
    #[test]
    fn test_layout_partitions_every_etymology(headings in headings()) {
        let layout = infer(&headings);
        let etymologies = headings
            .iter()
            .filter(|h| h.category == HeadingCategory::Etymology)
            .count();

        let mut indices: Vec<usize> = layout
            .buckets
            .iter()
            .map(|b| b.index)
            .chain(layout.discarded.iter().map(|b| b.index))
            .collect();
        indices.sort_unstable();
        prop_assert_eq!(indices, (0..etymologies.max(1)).collect::<Vec<_>>());

        for window in layout.buckets.windows(2) {
            prop_assert!(window[0].index < window[1].index);
        }
        for bucket in &layout.buckets {
            prop_assert!(!bucket.is_empty());
            for heading in &bucket.pos_headings {
                prop_assert!(bucket.contains(&heading.position));
            }
        }
    }

    #[test]
    fn test_layout_places_each_heading_once(headings in headings()) {
        let layout = infer(&headings);
        for heading in headings.iter().filter(|h| h.category != HeadingCategory::Etymology) {
            let in_buckets = layout
                .buckets
                .iter()
                .flat_map(|b| {
                    b.pronunciation_headings
                        .iter()
                        .chain(&b.pos_headings)
                        .chain(&b.usage_headings)
                })
                .filter(|h| *h == heading)
                .count();
            let leading = layout.leading.iter().filter(|h| *h == heading).count();
            prop_assert!(in_buckets + leading <= 1);
            if heading.category != HeadingCategory::UsageNotes {
                prop_assert_eq!(in_buckets + leading, 1);
            }
        }
    }

    #[test]
    fn test_kana_always_matches_itself(kana in kana()) {
        prop_assert!(kana_matches(&kana, &kana));

        let mut bank = PronunciationBank::new();
        bank.insert(PronunciationRecord {
            kana: kana.clone(),
            pitch_accent: Some(1),
            ..Default::default()
        });
        prop_assert!(bank.find_match(&kana).is_some());
    }

    #[test]
    fn test_reconstruction_fits_the_term(term in term(), kana in kana()) {
        let furigana = reconstruct(&term, &kana);
        prop_assert!(furigana.check_shape(&term).is_ok());
        if let Furigana::PerChar(readings) = &furigana {
            prop_assert!(validate(&term, readings).is_ok());
        }
    }

    #[test]
    fn test_alternating_spelling_is_recovered(
        pairs in prop::collection::vec(
            (
                prop::sample::select(vec!['猫', '日', '本', '東', '京']),
                prop::sample::select(vec!['か', 'き', 'ね', 'こ', 'の']),
                prop::sample::select(vec!['か', 'に', 'ほ', 'と', 'ね']),
            ),
            1..5,
        )
    ) {
        let mut term = String::new();
        let mut kana = String::new();
        let mut expected = Vec::new();
        for (kanji, okurigana, reading) in pairs {
            term.push(kanji);
            term.push(okurigana);
            kana.push(reading);
            kana.push(okurigana);
            expected.push(reading.to_string());
            expected.push(String::new());
        }
        prop_assert_eq!(reconstruct(&term, &kana), Furigana::PerChar(expected));
    }

    #[test]
    fn test_unaccented_rendering_is_plain(kana in kana(), beyond in 1u8..10) {
        let renderer = PitchRenderer::default();
        let past_end = u8::try_from(mora_count(&kana)).unwrap_or(u8::MAX).saturating_add(beyond);
        for pitch in [None, Some(0), Some(past_end)] {
            let rendered = renderer.render_detailed(&kana, None, pitch);
            prop_assert_eq!(&rendered.text, &kana);
            prop_assert!(rendered.accent.is_none());
        }
    }

    #[test]
    fn test_unaccented_ruby_rendering_is_plain((term, furigana) in annotated_term()) {
        prop_assert!(furigana.check_shape(&term).is_ok());
        let renderer = PitchRenderer::default();
        for pitch in [None, Some(0), Some(u8::MAX)] {
            let rendered = renderer.render_detailed(&term, Some(&furigana), pitch);
            prop_assert!(!rendered.text.contains(['⟨', '⟩']));
            prop_assert!(rendered.accent.is_none());
            prop_assert_eq!(strip_ruby(&rendered.text), term.clone());
        }
    }

    #[test]
    fn test_accent_lands_on_requested_mora(kana in kana(), pick in any::<prop::sample::Index>()) {
        let count = mora_count(&kana);
        let pitch = pick.index(count) + 1;
        let rendered = PitchRenderer::default().render_detailed(&kana, None, u8::try_from(pitch).ok());
        let placement = rendered.accent.expect("accent within range");
        prop_assert_eq!(placement.mora, pitch);
        prop_assert_eq!(rendered.text.replace(['⟨', '⟩'], ""), kana);
    }
}
