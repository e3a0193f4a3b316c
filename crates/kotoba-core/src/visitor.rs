use crate::types::{Definition, EtymologyEntry, LexicalEntry, Lookup, Transcription};

/// Mutable traversal over a reconciled lookup.
///
/// Override the `visit_*` hooks you need; call the matching `walk_*`
/// function from an override to keep descending.
pub trait LookupVisitor {
    fn visit_lookup(&mut self, lookup: &mut Lookup) {
        walk_lookup(self, lookup);
    }

    fn visit_etymology(&mut self, etymology: &mut EtymologyEntry) {
        walk_etymology(self, etymology);
    }

    fn visit_entry(&mut self, entry: &mut LexicalEntry) {
        walk_entry(self, entry);
    }

    fn visit_transcription(&mut self, _transcription: &mut Transcription) {}

    fn visit_definition(&mut self, _definition: &mut Definition) {}
}

pub fn walk_lookup<V: LookupVisitor + ?Sized>(visitor: &mut V, lookup: &mut Lookup) {
    for etymology in &mut lookup.etymologies {
        visitor.visit_etymology(etymology);
    }
}

pub fn walk_etymology<V: LookupVisitor + ?Sized>(visitor: &mut V, etymology: &mut EtymologyEntry) {
    for entry in &mut etymology.entries {
        visitor.visit_entry(entry);
    }
}

pub fn walk_entry<V: LookupVisitor + ?Sized>(visitor: &mut V, entry: &mut LexicalEntry) {
    for transcription in &mut entry.transcriptions {
        visitor.visit_transcription(transcription);
    }
    for definition in &mut entry.definitions {
        visitor.visit_definition(definition);
    }
}

/// Drops alternative spellings once redirects have been linked; they
/// only exist to match redirected pages.
pub struct StripAlternativeSpellings;

impl LookupVisitor for StripAlternativeSpellings {
    fn visit_etymology(&mut self, etymology: &mut EtymologyEntry) {
        etymology.alternative_spellings.clear();
    }
}

/// Counts transcriptions and definitions.
#[derive(Debug, Default)]
pub struct Tally {
    pub transcriptions: usize,
    pub definitions: usize,
}

impl LookupVisitor for Tally {
    fn visit_transcription(&mut self, _transcription: &mut Transcription) {
        self.transcriptions += 1;
    }

    fn visit_definition(&mut self, _definition: &mut Definition) {
        self.definitions += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Lookup {
        Lookup {
            term: "猫".into(),
            etymologies: vec![EtymologyEntry {
                index: 0,
                alternative_spellings: vec!["ネコ".into()],
                entries: vec![LexicalEntry {
                    part_of_speech: "Noun".into(),
                    term: "猫".into(),
                    transcriptions: vec![Transcription::new("ねこ")],
                    definitions: vec![Definition::new("cat"), Definition::new("geisha")],
                    ..Default::default()
                }],
            }],
            redirects: vec![],
        }
    }

    #[test]
    fn test_strip_clears_every_etymology() {
        let mut lookup = sample();
        StripAlternativeSpellings.visit_lookup(&mut lookup);
        assert!(lookup.etymologies[0].alternative_spellings.is_empty());
        assert_eq!(lookup.etymologies[0].entries.len(), 1);
    }

    #[test]
    fn test_tally_reaches_leaves() {
        let mut lookup = sample();
        let mut tally = Tally::default();
        tally.visit_lookup(&mut lookup);
        assert_eq!(tally.transcriptions, 1);
        assert_eq!(tally.definitions, 2);
    }
}
