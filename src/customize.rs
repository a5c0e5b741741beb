//! Overlays that change what some keys read as without touching the trie they sit on.

use crate::error::Result;
use crate::trie::{Lexicon, NodeId, Trie};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::debug;

/// Replacement value for one key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Override {
    /// Use these readings instead, preferred first.
    Candidates(Vec<String>),
    /// Report the key as having no reading at all.
    Suppressed,
}

impl From<&str> for Override {
    fn from(reading: &str) -> Self {
        Override::Candidates(vec![reading.to_string()])
    }
}

impl From<String> for Override {
    fn from(reading: String) -> Self {
        Override::Candidates(vec![reading])
    }
}

impl From<Vec<String>> for Override {
    fn from(readings: Vec<String>) -> Self {
        Override::Candidates(readings)
    }
}

impl From<Option<Vec<String>>> for Override {
    fn from(readings: Option<Vec<String>>) -> Self {
        readings.map_or(Override::Suppressed, Override::Candidates)
    }
}

/// What a single layer says about a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution<'a> {
    /// No override here; ask the parent.
    Inherited,
    Values(&'a [String]),
    Suppressed,
}

/// Shared handle to either the base trie or a customization layer over it.
#[derive(Debug, Clone)]
pub enum Dictionary {
    Base(Arc<Trie>),
    Custom(Arc<CustomizedTrie>),
}

impl Dictionary {
    /// Handle to the process-wide bundled dictionary.
    pub fn global() -> Self {
        Dictionary::Base(Arc::clone(Trie::global()))
    }

    /// A new layer over `self` with `mapping` applied. `self` and every layer
    /// already derived from it are unaffected.
    pub fn customize<K, V>(&self, mapping: impl IntoIterator<Item = (K, V)>) -> Dictionary
    where
        K: AsRef<str>,
        V: Into<Override>,
    {
        let mut layer = CustomizedTrie::new(self.clone());
        layer.extend(mapping);
        Dictionary::Custom(Arc::new(layer))
    }

    /// Smallest node id no node reachable through this handle uses.
    fn node_limit(&self) -> u32 {
        match self {
            Dictionary::Base(trie) => trie.len() as u32,
            Dictionary::Custom(layer) => layer.next_id,
        }
    }
}

impl From<Trie> for Dictionary {
    fn from(trie: Trie) -> Self {
        Dictionary::Base(Arc::new(trie))
    }
}

impl From<Arc<Trie>> for Dictionary {
    fn from(trie: Arc<Trie>) -> Self {
        Dictionary::Base(trie)
    }
}

impl Lexicon for Dictionary {
    fn child(&self, node: NodeId, ch: char) -> Option<NodeId> {
        match self {
            Dictionary::Base(trie) => trie.child(node, ch),
            Dictionary::Custom(layer) => layer.child(node, ch),
        }
    }

    fn candidates(&self, node: NodeId) -> Option<&[String]> {
        match self {
            Dictionary::Base(trie) => trie.candidates(node),
            Dictionary::Custom(layer) => layer.candidates(node),
        }
    }
}

/// A writable view over a parent dictionary.
///
/// Overrides are keyed by node. Keys the parent has never seen get fresh nodes
/// numbered past everything the parent can reach, so ids stay unique along the chain.
#[derive(Debug)]
pub struct CustomizedTrie {
    parent: Dictionary,
    overlay: HashMap<NodeId, Override>,
    children: HashMap<NodeId, BTreeMap<char, NodeId>>,
    next_id: u32,
}

impl CustomizedTrie {
    pub fn new(parent: Dictionary) -> Self {
        let next_id = parent.node_limit();
        Self {
            parent,
            overlay: HashMap::new(),
            children: HashMap::new(),
            next_id,
        }
    }

    pub fn parent(&self) -> &Dictionary {
        &self.parent
    }

    /// Override `key`. An empty key is ignored.
    pub fn set(&mut self, key: &str, value: impl Into<Override>) {
        if key.is_empty() {
            return;
        }
        let node = key
            .chars()
            .fold(NodeId::ROOT, |node, ch| self.child_or_insert(node, ch));
        self.overlay.insert(node, value.into());
    }

    /// Drop this layer's override for `key`, deferring to the parent again.
    pub fn unset(&mut self, key: &str) -> Option<Override> {
        let node = self.find(key)?;
        self.overlay.remove(&node)
    }

    pub fn extend<K, V>(&mut self, mapping: impl IntoIterator<Item = (K, V)>)
    where
        K: AsRef<str>,
        V: Into<Override>,
    {
        for (key, value) in mapping {
            self.set(key.as_ref(), value);
        }
        debug!(
            overrides = self.overlay.len(),
            added_nodes = self.next_id - self.parent.node_limit(),
            "customization layer updated"
        );
    }

    /// This layer's own say about `node`, without consulting the parent.
    pub fn resolve(&self, node: NodeId) -> Resolution<'_> {
        match self.overlay.get(&node) {
            None => Resolution::Inherited,
            Some(Override::Candidates(readings)) => Resolution::Values(readings),
            Some(Override::Suppressed) => Resolution::Suppressed,
        }
    }

    pub fn override_count(&self) -> usize {
        self.overlay.len()
    }

    fn child_or_insert(&mut self, node: NodeId, ch: char) -> NodeId {
        if let Some(child) = self.child(node, ch) {
            return child;
        }
        let child = NodeId(self.next_id);
        self.next_id += 1;
        self.children.entry(node).or_default().insert(ch, child);
        child
    }
}

impl Lexicon for CustomizedTrie {
    fn child(&self, node: NodeId, ch: char) -> Option<NodeId> {
        self.children
            .get(&node)
            .and_then(|children| children.get(&ch))
            .copied()
            .or_else(|| self.parent.child(node, ch))
    }

    fn candidates(&self, node: NodeId) -> Option<&[String]> {
        match self.resolve(node) {
            Resolution::Values(readings) => Some(readings),
            Resolution::Suppressed => None,
            Resolution::Inherited => self.parent.candidates(node),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum MappingValue {
    One(String),
    Many(Vec<String>),
}

/// Parse a JSON customization mapping: `{"key": "reading" | ["r1", "r2"] | null}`,
/// where `null` suppresses the key.
pub fn parse_custom_mapping(json: &str) -> Result<Vec<(String, Override)>> {
    let raw: BTreeMap<String, Option<MappingValue>> = serde_json::from_str(json)?;
    Ok(raw
        .into_iter()
        .map(|(key, value)| {
            let value = match value {
                None => Override::Suppressed,
                Some(MappingValue::One(reading)) => Override::Candidates(vec![reading]),
                Some(MappingValue::Many(readings)) => Override::Candidates(readings),
            };
            (key, value)
        })
        .collect())
}
