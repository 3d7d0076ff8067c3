use std::collections::HashSet;
use std::fmt;
use std::sync::LazyLock;

// Character-set constants
pub(crate) const ALPHABET_SIZE: usize = 26;
#[cfg(test)]
pub(crate) const UPPERCASE_ALPHABET: std::ops::RangeInclusive<u8> = b'A'..=b'Z';

pub const VOWELS: &str = "AEIOU";

static VOWEL_SET: LazyLock<HashSet<u8>> = LazyLock::new(|| VOWELS.bytes().collect());

/// One grid cell: a single uppercase letter, or the `QU` digraph that occupies one
/// cell but spells two letters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tile {
    /// Always an ASCII uppercase byte (`b'A'..=b'Z'`).
    Letter(u8),
    Qu,
}

impl Tile {
    /// Normalize a die face or bag entry.
    ///
    /// `"qu"` in any case becomes [`Tile::Qu`]; a single ASCII letter becomes its
    /// uppercase [`Tile::Letter`]. Anything else is not a tile.
    pub fn from_face(face: &str) -> Option<Tile> {
        let face = face.trim();
        if face.eq_ignore_ascii_case("qu") {
            return Some(Tile::Qu);
        }
        match face.as_bytes() {
            [b] => Tile::letter(char::from(*b)),
            _ => None,
        }
    }

    /// A single-letter tile from an ASCII letter in either case.
    pub fn letter(c: char) -> Option<Tile> {
        let b = u8::try_from(c).ok().filter(u8::is_ascii_alphabetic)?;
        Some(Tile::Letter(b.to_ascii_uppercase()))
    }

    /// The letters this tile contributes to a word, uppercase.
    ///
    /// A hand-built `Letter` holding a byte outside `A..=Z` renders as `"?"`.
    pub fn as_str(&self) -> &'static str {
        const LETTERS: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
        match *self {
            Tile::Qu => "QU",
            Tile::Letter(b) => b
                .to_ascii_uppercase()
                .checked_sub(b'A')
                .map(usize::from)
                .and_then(|i| LETTERS.get(i..=i))
                .unwrap_or("?"),
        }
    }

    /// Lowercase bytes this tile walks through in the dictionary trie.
    pub fn trie_bytes(&self) -> TileBytes {
        match *self {
            Tile::Qu => TileBytes::Two(b'q', b'u'),
            Tile::Letter(b) => TileBytes::One(b.to_ascii_lowercase()),
        }
    }

    pub fn is_vowel(&self) -> bool {
        match self {
            Tile::Letter(b) => VOWEL_SET.contains(&b.to_ascii_uppercase()),
            Tile::Qu => false,
        }
    }

    /// Label used when printing a grid (`Qu` keeps the board visually aligned).
    pub fn label(&self) -> &'static str {
        match self {
            Tile::Qu => "Qu",
            t => t.as_str(),
        }
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The one or two trie transitions a tile needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileBytes {
    One(u8),
    Two(u8, u8),
}

/// `true` if `face` names a vowel tile (used when scanning letter bags).
pub(crate) fn face_is_vowel(face: &str) -> bool {
    Tile::from_face(face).is_some_and(|t| t.is_vowel())
}
