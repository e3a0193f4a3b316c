pub mod definitions;
pub mod furigana;
pub mod headword;
pub mod layout;
pub mod mora;
pub mod pitch_accent;
pub mod processor;
pub mod pronunciation;
pub mod redirect;
pub mod script;

#[cfg(test)]
mod tests;

pub use definitions::DefinitionCleaner;
pub use furigana::reconstruct;
pub use headword::{ExtractedHeadword, Headword, extract_transcriptions, parse_headword};
pub use layout::{EmptyBucket, Layout, infer};
pub use mora::{mora_count, to_morae};
pub use pitch_accent::{PatternType, PitchPattern, PitchRenderer, Rendered};
pub use processor::{Reconciler, share_phonetic_info};
pub use pronunciation::{PronunciationBank, kana_matches};
pub use redirect::link_redirects;
