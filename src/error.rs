use std::path::PathBuf;

/// Errors raised while reading, writing, or customizing a pronunciation dictionary.
///
/// Lookups never produce these: a missing entry is reported as an absent reading.
#[derive(Debug, thiserror::Error)]
pub enum DictionaryError {
    #[error("failed to read dictionary {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("unbalanced '}}' at byte {offset}")]
    UnbalancedClose { offset: usize },
    #[error("{open} scope(s) still open at end of input")]
    UnclosedScope { open: usize },
    #[error("unexpected character {ch:?} at byte {offset}")]
    UnexpectedChar { ch: char, offset: usize },
    #[error("pronunciation data at byte {offset} precedes any key character")]
    DataWithoutKey { offset: usize },
    #[error("incomplete candidate at byte {offset}")]
    IncompleteCandidate { offset: usize },
    #[error("syllable id {id} out of range at byte {offset}")]
    SyllableOutOfRange { id: u16, offset: usize },
    #[error("unknown syllable {syllable:?} in entry {key:?}")]
    UnknownSyllable { key: String, syllable: String },
    #[error("candidate {candidate:?} for {key:?} has {found} readings, expected {expected}")]
    ReadingCount {
        key: String,
        candidate: String,
        found: usize,
        expected: usize,
    },
    #[error("invalid customization mapping: {0}")]
    CustomMapping(#[from] serde_json::Error),
    #[error("dictionary source already initialized")]
    AlreadyInitialized,
}

pub type Result<T> = std::result::Result<T, DictionaryError>;
