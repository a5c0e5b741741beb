//! Cantonese Jyutping lookup: a compact pronunciation dictionary loaded into a
//! character trie, longest-match and all-candidate lookup over it, and
//! customization layers that override entries without touching the shared trie.

pub mod annotator;
pub mod codec;
pub mod customize;
pub mod encoder;
pub mod error;
pub mod loader;
pub mod lookup;
pub mod trie;

pub use customize::{parse_custom_mapping, CustomizedTrie, Dictionary, Override, Resolution};
pub use error::{DictionaryError, Result};
pub use lookup::{CharCandidates, CharReading};
pub use trie::{Lexicon, NodeId, Trie, TrieNode};

/// Longest-match readings for `text` from the shared dictionary.
pub fn get(text: &str) -> Vec<CharReading> {
    Trie::global().get(text)
}

/// Every candidate reading for each character of `text` from the shared dictionary.
pub fn get_all(text: &str) -> Vec<CharCandidates> {
    Trie::global().get_all(text)
}

/// A customized view of the bundled dictionary.
pub fn customize<K, V>(mapping: impl IntoIterator<Item = (K, V)>) -> Dictionary
where
    K: AsRef<str>,
    V: Into<Override>,
{
    Dictionary::global().customize(mapping)
}
