mod properties;

use kotoba_core::record::{from_record, to_record};
use kotoba_core::{
    ContractError, Definition, Document, EtymologyEntry, Furigana, HeadingCategory, LexicalEntry,
    Lookup, Position, PositionedHeading, RawDefinition, Redirect, Section, SectionBody,
    Transcription,
};

use crate::pitch_accent::AccentPlacement;
use crate::{PitchRenderer, Reconciler, infer, link_redirects, reconstruct};

/// Logs go to the test writer; `RUST_LOG=debug` shows pipeline decisions.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn etymology(position: u64, alternatives: &[&str], redirects: &[&str]) -> Section {
    Section::new(
        position,
        "Etymology",
        SectionBody::Etymology {
            alternative_spellings: alternatives.iter().map(|s| s.to_string()).collect(),
            redirect_terms: redirects.iter().map(|s| s.to_string()).collect(),
        },
    )
}

fn pronunciation(position: u64, lines: &[&str]) -> Section {
    Section::new(
        position,
        "Pronunciation",
        SectionBody::Pronunciation {
            lines: lines.iter().map(|s| s.to_string()).collect(),
        },
    )
}

fn noun(position: u64, headword: &str, counter: Option<&str>, definitions: &[&str]) -> Section {
    Section::new(
        position,
        "Noun",
        SectionBody::PartOfSpeech {
            headword: Some(headword.to_string()),
            counter: counter.map(str::to_string),
            definitions: definitions.iter().map(|d| RawDefinition::new(*d)).collect(),
        },
    )
}

fn usage(position: u64, text: &str) -> Section {
    Section::new(
        position,
        "Usage notes",
        SectionBody::UsageNotes {
            text: text.to_string(),
        },
    )
}

fn cat_page() -> Document {
    let mut doc = Document::new("猫");
    doc.push(etymology(1, &["ネコ"], &[]))
        .push(pronunciation(2, &["(Tokyo) ねꜜこ [nèꜜko] (Atamadaka – [1])"]))
        .push(noun(3, "猫(ねこ)", Some("匹"), &["cat", "(archaic) a tiger", "a surname"]))
        .push(usage(4, "Usually written in kana in casual text."))
        .push(noun(5, "ネコ", None, &["(archaic) a geisha"]))
        .push(etymology(10, &[], &["寝子"]));
    doc
}

#[test]
fn test_scenario_single_kanji_without_shared_kana() {
    assert_eq!(reconstruct("猫", "ねこ"), Furigana::PerChar(vec!["ねこ".into()]));
}

#[test]
fn test_scenario_trailing_okurigana() {
    assert_eq!(
        reconstruct("食べる", "たべる"),
        Furigana::PerChar(vec!["た".into(), "".into(), "".into()])
    );
}

#[test]
fn test_scenario_two_etymology_buckets() {
    let headings = [
        PositionedHeading::new(HeadingCategory::Etymology, Position(10), "Etymology 1"),
        PositionedHeading::new(HeadingCategory::Pronunciation, Position(12), "Pronunciation"),
        PositionedHeading::new(HeadingCategory::PartOfSpeech, Position(15), "Noun"),
        PositionedHeading::new(HeadingCategory::Etymology, Position(30), "Etymology 2"),
        PositionedHeading::new(HeadingCategory::Pronunciation, Position(32), "Pronunciation"),
    ];
    let layout = infer(&headings);

    let spans: Vec<_> = layout.buckets.iter().map(|b| (b.start, b.end)).collect();
    assert_eq!(
        spans,
        [(Some(Position(10)), Some(Position(30))), (Some(Position(30)), None)]
    );
    assert_eq!(layout.buckets[0].pronunciation_headings[0].position, Position(12));
    assert_eq!(layout.buckets[0].pos_headings[0].position, Position(15));
    assert_eq!(layout.buckets[1].pronunciation_headings[0].position, Position(32));
}

#[test]
fn test_scenario_accent_inside_word() {
    let rendered = PitchRenderer::default().render_morae(&["と", "きょ", "う"], Some(2));
    assert_eq!(rendered.text, "と⟨きょ⟩う");
    assert_eq!(rendered.accent, Some(AccentPlacement { mora: 2, tail: 0 }));
}

#[test]
fn test_reconciles_a_full_page() {
    init_tracing();
    let lookup = Reconciler::default().reconcile(&cat_page()).unwrap();

    assert_eq!(lookup.term, "猫");
    assert_eq!(lookup.etymologies.len(), 1);
    let etymology = &lookup.etymologies[0];
    assert_eq!(etymology.index, 0);
    assert_eq!(etymology.alternative_spellings, ["ネコ"]);
    // The katakana entry loses its only definition and with it the entry.
    assert_eq!(etymology.entries.len(), 1);

    let entry = &etymology.entries[0];
    assert_eq!(entry.term, "猫");
    assert_eq!(entry.counter.as_deref(), Some("匹"));
    assert_eq!(
        entry.usage_notes.as_deref(),
        Some("Usually written in kana in casual text.")
    );
    let texts: Vec<&str> = entry.definitions.iter().map(|d| d.text.as_str()).collect();
    assert_eq!(texts, ["cat"]);

    let transcription = &entry.transcriptions[0];
    assert_eq!(transcription.kana, "ねこ");
    assert_eq!(transcription.furigana, Some(Furigana::PerChar(vec!["ねこ".into()])));
    assert_eq!(transcription.region.as_deref(), Some("Tokyo"));
    assert_eq!(transcription.pitch_accent, Some(1));

    assert_eq!(
        lookup.redirects,
        [Redirect {
            term: "寝子".into(),
            etymology_index: 1
        }]
    );
}

#[test]
fn test_redirected_page_is_linked_and_stored() {
    init_tracing();
    let mut lookup = Reconciler::default().reconcile(&cat_page()).unwrap();
    let page = Lookup {
        term: "寝子".into(),
        etymologies: vec![EtymologyEntry {
            index: 0,
            alternative_spellings: vec![],
            entries: vec![LexicalEntry {
                part_of_speech: "Noun".into(),
                term: "寝子".into(),
                transcriptions: vec![Transcription::new("ねこ")],
                definitions: vec![Definition::new("a sleeping child")],
                ..Default::default()
            }],
        }],
        redirects: vec![],
    };

    let remaining = link_redirects(&mut lookup, vec![page], "猫");
    assert!(remaining.is_empty());
    assert!(lookup.redirects.is_empty());
    let indices: Vec<usize> = lookup.etymologies.iter().map(|e| e.index).collect();
    assert_eq!(indices, [0, 1]);
    assert!(lookup.etymologies[0].alternative_spellings.is_empty());

    let value = to_record(&lookup).unwrap();
    assert_eq!(value["Etymology 1"]["Noun"]["pronunciations"][0]["pitch-accent"], 1);
    assert_eq!(value["Etymology 2"]["Noun"]["term"], "寝子");
    assert_eq!(from_record(&value).unwrap(), lookup.etymologies);
}

#[test]
fn test_page_without_usable_entries_keeps_every_redirect() {
    let mut doc = Document::new("かんじ");
    doc.push(etymology(1, &[], &["漢字"]))
        .push(etymology(2, &[], &["感じ", "幹事"]));
    let lookup = Reconciler::default().reconcile(&doc).unwrap();

    assert!(lookup.is_empty());
    let redirects: Vec<(&str, usize)> = lookup
        .redirects
        .iter()
        .map(|r| (r.term.as_str(), r.etymology_index))
        .collect();
    assert_eq!(redirects, [("漢字", 0), ("感じ", 1), ("幹事", 2)]);
}

#[test]
fn test_only_first_redirect_of_an_empty_bucket_counts_next_to_entries() {
    let mut doc = Document::new("かんじ");
    doc.push(etymology(1, &[], &["漢字", "感じ"]))
        .push(etymology(2, &[], &[]))
        .push(noun(3, "かんじ", None, &["a feeling"]));
    let lookup = Reconciler::default().reconcile(&doc).unwrap();

    assert_eq!(lookup.etymologies[0].index, 1);
    assert_eq!(
        lookup.redirects,
        [Redirect {
            term: "漢字".into(),
            etymology_index: 0
        }]
    );
}

#[test]
fn test_redirects_survive_cleaned_away_etymologies() {
    let mut doc = Document::new("ねこ");
    doc.push(etymology(1, &[], &["寝子", "猫子"]))
        .push(noun(2, "猫(ねこ)", None, &["a surname"]));
    let lookup = Reconciler::default().reconcile(&doc).unwrap();

    assert!(lookup.is_empty());
    let redirects: Vec<(&str, usize)> = lookup
        .redirects
        .iter()
        .map(|r| (r.term.as_str(), r.etymology_index))
        .collect();
    assert_eq!(redirects, [("寝子", 0), ("猫子", 1)]);

    doc.push(etymology(3, &[], &[]))
        .push(noun(4, "猫(ねこ)", None, &["cat"]));
    let lookup = Reconciler::default().reconcile(&doc).unwrap();

    assert_eq!(lookup.etymologies.len(), 1);
    assert_eq!(lookup.etymologies[0].index, 1);
    assert_eq!(
        lookup.redirects,
        [Redirect {
            term: "寝子".into(),
            etymology_index: 0
        }]
    );
}

#[test]
fn test_transcriptions_share_pitch_across_parts_of_speech() {
    init_tracing();
    let mut doc = Document::new("東京");
    doc.push(pronunciation(1, &["(Tokyo) とーきょー [tòókyóó] (Heiban – [0])", "IPA(key): [to̞ːkʲo̞ː]"]))
        .push(etymology(2, &[], &[]))
        .push(noun(3, "東京(とうきょう)", None, &["Tokyo"]))
        .push(etymology(4, &[], &[]))
        .push(noun(5, "東京(とうきょう)", None, &["the capital"]));
    let lookup = Reconciler::default().reconcile(&doc).unwrap();

    // The sole pronunciation above the first etymology belongs to it, and
    // the second etymology receives its data through sharing.
    assert_eq!(lookup.etymologies.len(), 2);
    for etymology in &lookup.etymologies {
        let transcription = &etymology.entries[0].transcriptions[0];
        assert_eq!(transcription.pitch_accent, Some(0));
        assert!(transcription.furigana.as_ref().is_some_and(Furigana::is_coarse));
    }
}

#[test]
fn test_contract_violations_are_errors() {
    let mut doc = Document::new("猫");
    doc.push(noun(1, "猫(ねこ)", None, &["cat"]))
        .push(usage(1, "clash"));
    assert!(matches!(
        Reconciler::default().reconcile(&doc),
        Err(ContractError::DuplicatePosition(_))
    ));

    let mut doc = Document::new("ねこ");
    doc.push(noun(1, "ね(ね)こ", None, &["cat"]));
    assert!(matches!(
        Reconciler::default().reconcile(&doc),
        Err(ContractError::ReadingOverNonKanji { .. })
    ));
}

#[test]
fn test_katakana_hint_in_usage_notes_keeps_katakana_spelling() {
    let mut doc = Document::new("猫");
    doc.push(noun(1, "猫(ねこ)or猫(ネコ)", None, &["cat"]))
        .push(usage(2, "This word is often spelled in katakana."));
    let lookup = Reconciler::default().reconcile(&doc).unwrap();

    let kana: Vec<&str> = lookup.etymologies[0].entries[0]
        .transcriptions
        .iter()
        .map(|t| t.kana.as_str())
        .collect();
    assert_eq!(kana, ["ネコ"]);
}
