//! Reader for the compact dictionary stream.
//!
//! Grammar, one character at a time:
//! - a character at or above U+0100 extends the current path by one node;
//! - `{` saves the current node and depth, `}` restores the last saved pair;
//! - characters `!`..=`z` are base-90 digits, two per syllable id (see [`codec`]);
//!   a node at depth `d` takes its candidates as consecutive runs of `d`
//!   character readings, first candidate preferred;
//! - `|` between two ids glues the second syllable onto the same character's reading;
//! - ASCII whitespace is ignored.

use crate::codec;
use crate::error::{DictionaryError, Result};
use crate::trie::{NodeId, Trie};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

pub const CONTINUATION: char = '|';
const OPEN: char = '{';
const CLOSE: char = '}';

/// Parse `source` into a fresh trie, failing on the first malformed construct.
pub fn parse(source: &str) -> Result<Trie> {
    let mut parser = Parser::new();
    for (offset, ch) in source.char_indices() {
        parser.feed(offset, ch)?;
    }
    parser.finish(source.len())
}

/// Parse `source`, degrading to an empty trie if it is malformed.
pub fn load(source: &str) -> Trie {
    match parse(source) {
        Ok(trie) => {
            debug!(
                nodes = trie.len(),
                entries = trie.entry_count(),
                "dictionary loaded"
            );
            trie
        }
        Err(err) => {
            warn!(error = %err, "dictionary data is malformed; continuing with an empty dictionary");
            Trie::new()
        }
    }
}

/// Read and parse the dictionary at `path`, degrading to an empty trie if it
/// cannot be read or parsed.
pub fn load_path(path: &Path) -> Trie {
    match fs::read_to_string(path) {
        Ok(source) => load(&source),
        Err(source) => {
            let err = DictionaryError::Io {
                path: path.to_path_buf(),
                source,
            };
            warn!(error = %err, "dictionary unavailable; continuing with an empty dictionary");
            Trie::new()
        }
    }
}

/// Strict variant of [`load_path`].
pub fn parse_path(path: &Path) -> Result<Trie> {
    let source = fs::read_to_string(path).map_err(|source| DictionaryError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&source)
}

struct Parser {
    trie: Trie,
    node: NodeId,
    depth: usize,
    scopes: Vec<(NodeId, usize)>,
    /// High digit of an id whose low digit has not arrived yet.
    high: Option<u16>,
    /// Character readings of the candidate being assembled.
    readings: Vec<String>,
    join: bool,
}

impl Parser {
    fn new() -> Self {
        Self {
            trie: Trie::new(),
            node: NodeId::ROOT,
            depth: 0,
            scopes: Vec::new(),
            high: None,
            readings: Vec::new(),
            join: false,
        }
    }

    fn feed(&mut self, offset: usize, ch: char) -> Result<()> {
        match ch {
            OPEN => {
                self.end_run(offset)?;
                self.scopes.push((self.node, self.depth));
            }
            CLOSE => {
                self.end_run(offset)?;
                (self.node, self.depth) = self
                    .scopes
                    .pop()
                    .ok_or(DictionaryError::UnbalancedClose { offset })?;
            }
            CONTINUATION => {
                if self.high.is_some() || self.join || self.readings.is_empty() {
                    return Err(DictionaryError::IncompleteCandidate { offset });
                }
                self.join = true;
            }
            c if c.is_ascii_whitespace() => {}
            c if u32::from(c) >= 256 => {
                self.end_run(offset)?;
                self.node = self.trie.child_or_insert(self.node, c);
                self.depth += 1;
            }
            c => {
                let value = codec::digit_value(c)
                    .ok_or(DictionaryError::UnexpectedChar { ch: c, offset })?;
                self.digit(offset, value)?;
            }
        }
        Ok(())
    }

    fn digit(&mut self, offset: usize, value: u16) -> Result<()> {
        if self.depth == 0 {
            return Err(DictionaryError::DataWithoutKey { offset });
        }
        let Some(high) = self.high.take() else {
            self.high = Some(value);
            return Ok(());
        };
        let id = high * codec::DIGIT_BASE + value;
        let syllable =
            codec::try_decode(id).ok_or(DictionaryError::SyllableOutOfRange { id, offset })?;

        if self.join {
            self.join = false;
            if let Some(reading) = self.readings.last_mut() {
                reading.push_str(&syllable);
            }
            return Ok(());
        }
        // A full candidate is only closed once the next id proves no `|` follows it.
        if self.readings.len() == self.depth {
            self.flush();
        }
        self.readings.push(syllable);
        Ok(())
    }

    fn flush(&mut self) {
        let candidate = self.readings.join(" ");
        self.readings.clear();
        self.trie.push_candidate(self.node, candidate);
    }

    fn end_run(&mut self, offset: usize) -> Result<()> {
        if self.high.is_some() || self.join {
            return Err(DictionaryError::IncompleteCandidate { offset });
        }
        if self.readings.is_empty() {
            return Ok(());
        }
        if self.readings.len() != self.depth {
            return Err(DictionaryError::IncompleteCandidate { offset });
        }
        self.flush();
        Ok(())
    }

    fn finish(mut self, offset: usize) -> Result<Trie> {
        self.end_run(offset)?;
        if !self.scopes.is_empty() {
            return Err(DictionaryError::UnclosedScope {
                open: self.scopes.len(),
            });
        }
        Ok(self.trie)
    }
}
