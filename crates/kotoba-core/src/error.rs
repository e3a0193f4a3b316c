/// Input that breaks a data-model invariant. These indicate a bug in
/// whoever assembled the input and are reported at the boundary instead
/// of being repaired.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContractError {
    #[error("Furigana length mismatch: `{term}` has {term_len} characters, furigana has {furigana_len}")]
    FuriganaLength {
        term: String,
        term_len: usize,
        furigana_len: usize,
    },

    #[error("Reading `{reading}` at index {index} of `{term}` is not over a kanji")]
    ReadingOverNonKanji {
        term: String,
        index: usize,
        reading: String,
    },

    #[error("Furigana span {start}..{end} overruns `{term}`")]
    SpanOutOfBounds {
        term: String,
        start: usize,
        end: usize,
    },

    #[error("Duplicate heading position: {0}")]
    DuplicatePosition(String),
}

/// Failures at the nested-record boundary.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("Invalid record: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed etymology key: {0}")]
    EtymologyKey(String),

    #[error("Expected an object at {0}")]
    NotAnObject(String),

    #[error("Record breaks an invariant: {0}")]
    Contract(#[from] ContractError),
}
