//! Prefix tree over lowercase ASCII words, stored as a flat arena.
//!
//! Each node owns its children exclusively; a child is addressed by its index in
//! `nodes`, and index 0 is the root. Children are kept sorted by byte so lookups are a
//! binary search over at most 26 entries.

use crate::tile::{TileBytes, ALPHABET_SIZE};

pub(crate) type NodeId = u32;

pub(crate) const ROOT: NodeId = 0;

#[derive(Debug, Clone, Default)]
struct TrieNode {
    children: Vec<(u8, NodeId)>,
    terminal: bool,
}

#[derive(Debug, Clone)]
pub(crate) struct Trie {
    nodes: Vec<TrieNode>,
}

impl Default for Trie {
    fn default() -> Self {
        Self { nodes: vec![TrieNode::default()] }
    }
}

impl Trie {
    /// Insert a word of lowercase ASCII letters.
    pub(crate) fn insert(&mut self, word: &str) {
        let mut node = ROOT;
        for b in word.bytes() {
            debug_assert!(
                b.is_ascii_lowercase() && usize::from(b - b'a') < ALPHABET_SIZE,
                "trie words must be lowercase a-z, got {word:?}"
            );
            node = match self.step(node, b) {
                Some(child) => child,
                None => self.push_child(node, b),
            };
        }
        self.nodes[node as usize].terminal = true;
    }

    fn push_child(&mut self, parent: NodeId, b: u8) -> NodeId {
        let id = self.nodes.len() as NodeId;
        self.nodes.push(TrieNode::default());
        let children = &mut self.nodes[parent as usize].children;
        let slot = children.partition_point(|&(c, _)| c < b);
        children.insert(slot, (b, id));
        id
    }

    /// Follow one byte from `node`.
    pub(crate) fn step(&self, node: NodeId, b: u8) -> Option<NodeId> {
        let children = &self.nodes[node as usize].children;
        children
            .binary_search_by_key(&b, |&(c, _)| c)
            .ok()
            .map(|i| children[i].1)
    }

    /// Follow a whole tile; `QU` needs both the `q` and the `u` edge.
    pub(crate) fn step_tile(&self, node: NodeId, bytes: TileBytes) -> Option<NodeId> {
        match bytes {
            TileBytes::One(b) => self.step(node, b),
            TileBytes::Two(first, second) => self.step(self.step(node, first)?, second),
        }
    }

    pub(crate) fn is_terminal(&self, node: NodeId) -> bool {
        self.nodes[node as usize].terminal
    }

    fn walk(&self, s: &str) -> Option<NodeId> {
        s.bytes().try_fold(ROOT, |node, b| self.step(node, b))
    }

    #[cfg(test)]
    pub(crate) fn contains(&self, word: &str) -> bool {
        self.walk(word).is_some_and(|n| self.is_terminal(n))
    }

    pub(crate) fn has_prefix(&self, prefix: &str) -> bool {
        self.walk(prefix).is_some()
    }

    pub(crate) fn node_count(&self) -> usize {
        self.nodes.len()
    }
}
