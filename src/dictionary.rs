//! `dictionary` — load a plain word list and index it for validation and solving
//!
//! The input is plain text with one word per line (either read from disk, or handed over as
//! an in-memory string, which is what the browser build does after a `fetch()`).
//!
//! The parsing logic:
//! - Each line is trimmed and lowercased.
//! - Empty lines are skipped.
//! - Lines containing anything but `a-z` are skipped.
//! - Words shorter than [`MIN_WORD_LEN`] are skipped.
//!
//! Surviving words go into two structures: a `HashSet` for O(1) membership tests on
//! submissions, and a prefix tree the solver walks to prune dead branches.

use std::collections::HashSet;

use instant::Instant;
use log::info;

use crate::errors::DictionaryError;
use crate::tile::TileBytes;
use crate::trie::{NodeId, Trie, ROOT};

/// Shortest word the game accepts.
pub const MIN_WORD_LEN: usize = 4;

/// A ready-to-use word index.
#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    words: HashSet<String>,
    trie: Trie,
    rejected: usize,
}

/// Cursor into the dictionary's prefix tree, as handed out to the solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor(NodeId);

impl Dictionary {
    /// Parse a word list from an in-memory string.
    ///
    /// This never fails: malformed lines are counted in [`Dictionary::rejected`] and
    /// skipped. Callers that need at least one word should use [`Dictionary::load_from_str`].
    pub fn parse_from_str(contents: &str) -> Dictionary {
        let t_parse = Instant::now();
        let mut dict = Dictionary::default();

        for raw_line in contents.lines() {
            let word = raw_line.trim().to_lowercase();
            if word.is_empty() {
                continue;
            }
            if !word.bytes().all(|b| b.is_ascii_lowercase()) || word.len() < MIN_WORD_LEN {
                dict.rejected += 1;
                continue;
            }
            dict.trie.insert(&word);
            dict.words.insert(word);
        }

        info!(
            "Dictionary built: {} words ({} lines rejected, {} trie nodes) in {:.3}s",
            dict.words.len(),
            dict.rejected,
            dict.trie.node_count(),
            t_parse.elapsed().as_secs_f64()
        );
        dict
    }

    /// Parse, then insist on at least one usable word.
    ///
    /// # Errors
    ///
    /// Returns [`DictionaryError::NoValidWords`] if every line was discarded.
    pub fn load_from_str(contents: &str) -> Result<Dictionary, DictionaryError> {
        let dict = Self::parse_from_str(contents);
        if dict.is_empty() {
            return Err(DictionaryError::NoValidWords);
        }
        Ok(dict)
    }

    /// Native-only convenience method: read from a file path and parse.
    ///
    /// # Errors
    ///
    /// [`DictionaryError::Unreadable`] if the file cannot be read, or
    /// [`DictionaryError::NoValidWords`] if it holds nothing usable.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Dictionary, DictionaryError> {
        let path_ref = path.as_ref();
        let data = std::fs::read_to_string(path_ref).map_err(|source| DictionaryError::Unreadable {
            path: path_ref.to_path_buf(),
            source,
        })?;
        Self::load_from_str(&data)
    }

    /// Membership test; case-insensitive.
    pub fn contains(&self, word: &str) -> bool {
        if word.bytes().all(|b| b.is_ascii_lowercase()) {
            self.words.contains(word)
        } else {
            self.words.contains(&word.to_ascii_lowercase())
        }
    }

    /// `true` if some word starts with `prefix` (lowercase).
    pub fn has_prefix(&self, prefix: &str) -> bool {
        self.trie.has_prefix(&prefix.to_ascii_lowercase())
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Number of non-empty lines discarded while parsing.
    pub fn rejected(&self) -> usize {
        self.rejected
    }

    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }

    pub(crate) fn root(&self) -> Cursor {
        Cursor(ROOT)
    }

    pub(crate) fn advance(&self, cursor: Cursor, bytes: TileBytes) -> Option<Cursor> {
        self.trie.step_tile(cursor.0, bytes).map(Cursor)
    }

    pub(crate) fn is_word_end(&self, cursor: Cursor) -> bool {
        self.trie.is_terminal(cursor.0)
    }
}
