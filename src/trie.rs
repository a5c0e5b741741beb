use crate::error::{DictionaryError, Result};
use crate::loader;
use crate::lookup::{self, CharCandidates, CharReading};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

/// Compact dictionary bundled with the crate.
///
/// This is a small sample of a few dozen common characters and phrases, so
/// most real text reads as absent against it. Load a full table in the same
/// format with [`Trie::init_custom_path`], or `--dict` on the command line.
pub const DEFAULT_DICTIONARY: &str = include_str!("../data/jyutping.txt");

/// Where the shared trie comes from. `claimed` flips once construction has
/// started, after which the path can no longer change.
struct GlobalSource {
    path: Option<PathBuf>,
    claimed: bool,
}

static SOURCE: Mutex<GlobalSource> = Mutex::new(GlobalSource {
    path: None,
    claimed: false,
});
static GLOBAL: OnceLock<Arc<Trie>> = OnceLock::new();

fn lock_source() -> MutexGuard<'static, GlobalSource> {
    // the guarded state is two plain fields, still consistent after a panic
    SOURCE.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Identity of a node. There is exactly one node per distinct character path,
/// so an id stands for the key spelled by that path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    pub const ROOT: NodeId = NodeId(0);

    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Default)]
pub struct TrieNode {
    pub children: BTreeMap<char, NodeId>,
    /// Readings for the key ending here, preferred first. Each reading holds one
    /// space-separated syllable group per character of the key.
    pub candidates: Option<Vec<String>>,
}

/// Read access to a character trie: walking paths and resolving the candidates
/// stored (or overridden) at a node.
pub trait Lexicon {
    fn child(&self, node: NodeId, ch: char) -> Option<NodeId>;

    fn candidates(&self, node: NodeId) -> Option<&[String]>;

    /// Node reached by following every character of `key` from the root.
    fn find(&self, key: &str) -> Option<NodeId> {
        key.chars()
            .try_fold(NodeId::ROOT, |node, ch| self.child(node, ch))
    }

    /// Candidates stored for exactly `key`.
    fn entry(&self, key: &str) -> Option<&[String]> {
        self.find(key).and_then(|node| self.candidates(node))
    }

    /// Longest-match lookup: one preferred reading (or none) per character.
    fn get(&self, text: &str) -> Vec<CharReading> {
        lookup::longest_match(self, text)
    }

    /// Every reading any dictionary match assigns to each character.
    fn get_all(&self, text: &str) -> Vec<CharCandidates> {
        lookup::all_candidates(self, text)
    }
}

/// Arena-backed prefix tree. Node 0 is the root.
#[derive(Debug)]
pub struct Trie {
    nodes: Vec<TrieNode>,
}

impl Default for Trie {
    fn default() -> Self {
        Self::new()
    }
}

impl Trie {
    pub fn new() -> Self {
        Self {
            nodes: vec![TrieNode::default()],
        }
    }

    /// Select a dictionary file to build the shared trie from.
    ///
    /// Must be called once, before the first [`Trie::global`]. Fails with
    /// `AlreadyInitialized` if a path was already chosen or construction of the
    /// shared trie has begun, even when that happens on another thread.
    pub fn init_custom_path(path: impl Into<PathBuf>) -> Result<()> {
        let mut source = lock_source();
        if source.claimed || source.path.is_some() {
            return Err(DictionaryError::AlreadyInitialized);
        }
        source.path = Some(path.into());
        Ok(())
    }

    /// The process-wide dictionary, built on first use.
    ///
    /// Concurrent first callers block until the single construction finishes.
    pub fn global() -> &'static Arc<Trie> {
        GLOBAL.get_or_init(|| {
            let path = {
                let mut source = lock_source();
                source.claimed = true;
                source.path.clone()
            };
            let trie = match path {
                Some(path) => loader::load_path(&path),
                None => loader::load(DEFAULT_DICTIONARY),
            };
            Arc::new(trie)
        })
    }

    /// Build a trie from `(key, reading)` pairs; the first reading seen for a key is preferred.
    pub fn from_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut trie = Self::new();
        for (key, reading) in entries {
            trie.insert(key.as_ref(), reading);
        }
        trie
    }

    /// Add `reading` to `key`'s candidates unless it is already listed.
    pub fn insert(&mut self, key: &str, reading: impl Into<String>) {
        let node = key
            .chars()
            .fold(NodeId::ROOT, |node, ch| self.child_or_insert(node, ch));
        if node == NodeId::ROOT {
            return;
        }
        let reading = reading.into();
        let candidates = self.nodes[node.index()]
            .candidates
            .get_or_insert_with(Vec::new);
        if !candidates.contains(&reading) {
            candidates.push(reading);
        }
    }

    pub(crate) fn child_or_insert(&mut self, node: NodeId, ch: char) -> NodeId {
        if let Some(&child) = self.nodes[node.index()].children.get(&ch) {
            return child;
        }
        let child = NodeId(self.nodes.len() as u32);
        self.nodes.push(TrieNode::default());
        self.nodes[node.index()].children.insert(ch, child);
        child
    }

    pub(crate) fn push_candidate(&mut self, node: NodeId, reading: String) {
        self.nodes[node.index()]
            .candidates
            .get_or_insert_with(Vec::new)
            .push(reading);
    }

    pub fn node(&self, node: NodeId) -> Option<&TrieNode> {
        self.nodes.get(node.index())
    }

    /// Number of nodes, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    /// Number of keys carrying at least one candidate.
    pub fn entry_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|node| node.candidates.as_ref().is_some_and(|c| !c.is_empty()))
            .count()
    }

    /// Length in characters of the longest key with candidates.
    pub fn max_key_length(&self) -> usize {
        fn walk(trie: &Trie, node: NodeId, depth: usize) -> usize {
            let here = match &trie.nodes[node.index()].candidates {
                Some(candidates) if !candidates.is_empty() => depth,
                _ => 0,
            };
            trie.nodes[node.index()]
                .children
                .values()
                .map(|&child| walk(trie, child, depth + 1))
                .fold(here, usize::max)
        }
        walk(self, NodeId::ROOT, 0)
    }
}

impl Lexicon for Trie {
    fn child(&self, node: NodeId, ch: char) -> Option<NodeId> {
        self.nodes.get(node.index())?.children.get(&ch).copied()
    }

    fn candidates(&self, node: NodeId) -> Option<&[String]> {
        self.nodes.get(node.index())?.candidates.as_deref()
    }
}
