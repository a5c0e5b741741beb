//! Writes a trie back out in the compact stream format read by [`crate::loader`].

use crate::codec;
use crate::error::{DictionaryError, Result};
use crate::loader::CONTINUATION;
use crate::trie::{NodeId, Trie};
use regex::Regex;
use std::sync::OnceLock;

fn syllable_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[a-z]+[1-6]").expect("syllable pattern is valid"))
}

/// Split one character's reading into syllables, e.g. `"saa1aa6"` into `["saa1", "aa6"]`.
///
/// Returns `None` if the reading is not made up entirely of tone-marked syllables.
pub fn split_syllables(reading: &str) -> Option<Vec<&str>> {
    let mut syllables = Vec::new();
    let mut covered = 0;
    for found in syllable_pattern().find_iter(reading) {
        if found.start() != covered {
            return None;
        }
        covered = found.end();
        syllables.push(found.as_str());
    }
    (covered == reading.len() && !syllables.is_empty()).then_some(syllables)
}

/// Serialize `trie`. Top-level entries go on their own lines.
pub fn serialize(trie: &Trie) -> Result<String> {
    let mut out = String::new();
    let mut key = String::new();
    write_children(trie, NodeId::ROOT, &mut key, &mut out)?;
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
    Ok(out)
}

/// Every child but the last is wrapped in braces; the last one continues inline,
/// since nothing else at this level follows it.
fn write_children(trie: &Trie, node: NodeId, key: &mut String, out: &mut String) -> Result<()> {
    let Some(current) = trie.node(node) else {
        return Ok(());
    };
    let last = current.children.len().saturating_sub(1);
    for (index, (&ch, &child)) in current.children.iter().enumerate() {
        let braced = index < last;
        if braced {
            out.push('{');
        }
        out.push(ch);
        key.push(ch);
        write_candidates(trie, child, key, out)?;
        write_children(trie, child, key, out)?;
        key.pop();
        if braced {
            out.push('}');
            if node == NodeId::ROOT {
                out.push('\n');
            }
        }
    }
    Ok(())
}

fn write_candidates(trie: &Trie, node: NodeId, key: &str, out: &mut String) -> Result<()> {
    let Some(candidates) = trie.node(node).and_then(|n| n.candidates.as_ref()) else {
        return Ok(());
    };
    let expected = key.chars().count();
    for candidate in candidates {
        let readings: Vec<&str> = candidate.split(' ').collect();
        if readings.len() != expected {
            return Err(DictionaryError::ReadingCount {
                key: key.to_string(),
                candidate: candidate.clone(),
                found: readings.len(),
                expected,
            });
        }
        for reading in readings {
            let unknown = || DictionaryError::UnknownSyllable {
                key: key.to_string(),
                syllable: reading.to_string(),
            };
            let syllables = split_syllables(reading).ok_or_else(unknown)?;
            for (index, syllable) in syllables.into_iter().enumerate() {
                let id = codec::encode(syllable).ok_or_else(|| DictionaryError::UnknownSyllable {
                    key: key.to_string(),
                    syllable: syllable.to_string(),
                })?;
                if index > 0 {
                    out.push(CONTINUATION);
                }
                out.extend(codec::to_digits(id));
            }
        }
    }
    Ok(())
}
