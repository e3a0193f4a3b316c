mod fields;
mod template;

pub use fields::{CardBuilder, CardFields, best_transcription, ruby_tags};
pub use template::CardTemplate;

use kotoba_core::Lookup;

/// A formatted note, ready to hand to whatever talks to Anki.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub deck: String,
    pub model: String,
    pub front: String,
    pub back: String,
}

/// Build a note for `lookup` using the provided builder and template
pub fn build_note(builder: &CardBuilder, template: &CardTemplate, lookup: &Lookup) -> Option<Note> {
    let fields = builder.assemble(lookup)?;
    tracing::debug!(term = %fields.key_term, deck = %template.deck, "Built card");
    Some(Note {
        deck: template.deck.clone(),
        model: template.model.clone(),
        front: template.format_front(&fields),
        back: template.format_back(&fields),
    })
}
