pub mod document;
pub mod error;
pub mod record;
pub mod types;
pub mod visitor;

pub use document::{Document, RawDefinition, Section, SectionBody};
pub use error::{ContractError, RecordError};
pub use types::{
    Definition, EtymologyBucket, EtymologyEntry, Example, Furigana, FuriganaSpan, HeadingCategory,
    LexicalEntry, Lookup, Position, PositionedHeading, PronunciationRecord, Redirect,
    Transcription, is_kanji,
};
pub use visitor::LookupVisitor;
