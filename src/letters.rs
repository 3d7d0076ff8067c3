//! Letter sources: the classic dice table and the bag-based variants.
//!
//! A [`LetterSource`] is plain configuration data. It deserializes from JSON so a custom
//! table can be supplied at runtime:
//!
//! ```
//! use moggle::letters::{BagRule, LetterSource};
//!
//! let json = r#"{
//!     "kind": "bag",
//!     "faces": ["A", "E", "S", "T", "Qu"],
//!     "rules": [{ "kind": "duplicate_vowels", "probability": 0.6 }]
//! }"#;
//! let source: LetterSource = serde_json::from_str(json)?;
//! assert!(matches!(source, LetterSource::Bag { ref rules, .. }
//!     if rules == &[BagRule::DuplicateVowels { probability: 0.6 }]));
//! source.validate()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use serde::{Deserialize, Serialize};

use crate::board::CELL_COUNT;
use crate::errors::{BoardError, ConfigError};
use crate::tile::{Tile, VOWELS};

/// One die: its faces in a fixed order (the order matters for reproducibility).
pub type Die = Vec<String>;

/// Where the 16 tiles of a board come from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LetterSource {
    /// One die per cell; the dice are shuffled over the board, then each is rolled.
    Dice { dice: Vec<Die> },
    /// Every cell draws independently from a weighted bag (weights are repeated entries).
    Bag {
        faces: Vec<String>,
        #[serde(default)]
        rules: Vec<BagRule>,
    },
}

/// Extra policy applied to a bag draw.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BagRule {
    /// Before drawing, each vowel entry is duplicated once with this probability.
    DuplicateVowels { probability: f64 },
    /// After drawing, `count` distinct cells picked from `positions` get a random vowel.
    ForceVowels {
        positions: Vec<usize>,
        count: usize,
        #[serde(default = "default_vowels")]
        vowels: Vec<String>,
    },
}

fn default_vowels() -> Vec<String> {
    VOWELS.chars().map(String::from).collect()
}

/// The four cells in the middle of a 4x4 board, row-major.
pub const CENTRE_CELLS: [usize; 4] = [5, 6, 9, 10];

/// The 16 dice of the classic game.
pub const CLASSIC_DICE: [[&str; 6]; 16] = [
    ["A", "A", "E", "E", "G", "N"],
    ["E", "L", "R", "T", "T", "Y"],
    ["A", "O", "O", "T", "T", "W"],
    ["A", "B", "B", "J", "O", "O"],
    ["E", "H", "R", "T", "V", "W"],
    ["C", "I", "M", "O", "T", "U"],
    ["D", "I", "S", "T", "T", "Y"],
    ["E", "I", "O", "S", "S", "T"],
    ["D", "E", "L", "R", "V", "Y"],
    ["A", "C", "H", "O", "P", "S"],
    ["H", "I", "M", "N", "Qu", "U"],
    ["E", "E", "I", "N", "S", "U"],
    ["E", "E", "G", "H", "N", "W"],
    ["A", "F", "F", "K", "P", "S"],
    ["H", "L", "N", "N", "R", "Z"],
    ["D", "E", "I", "L", "R", "X"],
];

/// Letter counts for the bag variants (roughly English frequency, 98 entries including one `Qu`).
const ENGLISH_BAG: &[(&str, usize)] = &[
    ("A", 9), ("B", 2), ("C", 2), ("D", 4), ("E", 12), ("F", 2), ("G", 3), ("H", 2), ("I", 9),
    ("J", 1), ("K", 1), ("L", 4), ("M", 2), ("N", 6), ("O", 8), ("P", 2), ("Qu", 1), ("R", 6),
    ("S", 4), ("T", 6), ("U", 4), ("V", 2), ("W", 2), ("X", 1), ("Y", 2), ("Z", 1),
];

impl LetterSource {
    /// The classic 16-dice table.
    pub fn classic() -> LetterSource {
        LetterSource::Dice {
            dice: CLASSIC_DICE
                .iter()
                .map(|die| die.iter().map(|f| (*f).to_string()).collect())
                .collect(),
        }
    }

    /// The weighted English bag, with the given rules.
    pub fn english_bag(rules: Vec<BagRule>) -> LetterSource {
        let faces = ENGLISH_BAG
            .iter()
            .flat_map(|&(face, n)| std::iter::repeat(face.to_string()).take(n))
            .collect();
        LetterSource::Bag { faces, rules }
    }

    /// Parse a JSON letter-source description.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Malformed`] if the JSON does not describe a letter source.
    pub fn from_json(json: &str) -> Result<LetterSource, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Native-only: read a JSON letter-source description from disk.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Unreadable`] or [`ConfigError::Malformed`].
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<LetterSource, ConfigError> {
        let path_ref = path.as_ref();
        let data = std::fs::read_to_string(path_ref).map_err(|source| ConfigError::Unreadable {
            path: path_ref.to_path_buf(),
            source,
        })?;
        Self::from_json(&data)
    }

    /// Check the shape of the source before any randomness is spent.
    ///
    /// # Errors
    ///
    /// A [`BoardError`] naming the first structural problem found.
    pub fn validate(&self) -> Result<(), BoardError> {
        match self {
            LetterSource::Dice { dice } => {
                if dice.len() != CELL_COUNT {
                    return Err(BoardError::WrongDieCount { found: dice.len() });
                }
                for (index, die) in dice.iter().enumerate() {
                    if die.is_empty() {
                        return Err(BoardError::EmptyDie { index });
                    }
                    check_faces(die)?;
                }
            }
            LetterSource::Bag { faces, rules } => {
                if faces.is_empty() {
                    return Err(BoardError::EmptyBag);
                }
                check_faces(faces)?;
                for rule in rules {
                    rule.validate()?;
                }
            }
        }
        Ok(())
    }
}

impl BagRule {
    fn validate(&self) -> Result<(), BoardError> {
        match self {
            BagRule::DuplicateVowels { probability } => {
                if !(0.0..=1.0).contains(probability) {
                    return Err(BoardError::InvalidRule {
                        reason: format!("duplication probability {probability} is outside [0, 1]"),
                    });
                }
            }
            BagRule::ForceVowels { positions, count, vowels } => {
                if let Some(p) = positions.iter().find(|&&p| p >= CELL_COUNT) {
                    return Err(BoardError::InvalidRule {
                        reason: format!("position {p} is off the board"),
                    });
                }
                let mut distinct = positions.clone();
                distinct.sort_unstable();
                distinct.dedup();
                if distinct.len() != positions.len() {
                    return Err(BoardError::InvalidRule {
                        reason: "forced positions repeat a cell".to_string(),
                    });
                }
                if *count > positions.len() {
                    return Err(BoardError::InvalidRule {
                        reason: format!("cannot force {count} of {} positions", positions.len()),
                    });
                }
                if vowels.is_empty() {
                    return Err(BoardError::InvalidRule {
                        reason: "no vowels to force".to_string(),
                    });
                }
                check_faces(vowels)?;
            }
        }
        Ok(())
    }
}

fn check_faces(faces: &[String]) -> Result<(), BoardError> {
    match faces.iter().find(|f| Tile::from_face(f).is_none()) {
        Some(face) => Err(BoardError::InvalidFace { face: face.clone() }),
        None => Ok(()),
    }
}

/// A named letter source in the rotation.
#[derive(Debug, Clone, Copy)]
pub struct Variant {
    pub id: &'static str,
    pub label: &'static str,
    build: fn() -> LetterSource,
}

impl Variant {
    pub fn source(&self) -> LetterSource {
        (self.build)()
    }
}

/// Every registered variant, in rotation order.
pub const VARIANTS: &[Variant] = &[
    Variant { id: "classic", label: "Classic", build: LetterSource::classic },
    Variant { id: "big-bag", label: "Big Bag", build: || LetterSource::english_bag(Vec::new()) },
    Variant {
        id: "vowel-storm",
        label: "Vowel Storm",
        build: || LetterSource::english_bag(vec![BagRule::DuplicateVowels { probability: 0.6 }]),
    },
    Variant {
        id: "centre-vowels",
        label: "Centre Vowels",
        build: || {
            LetterSource::english_bag(vec![BagRule::ForceVowels {
                positions: CENTRE_CELLS.to_vec(),
                count: 2,
                vowels: default_vowels(),
            }])
        },
    },
];

/// Look up a variant by id (case-insensitive).
///
/// # Errors
///
/// [`BoardError::UnknownVariant`] if nothing is registered under `id`.
pub fn variant_by_id(id: &str) -> Result<&'static Variant, BoardError> {
    VARIANTS
        .iter()
        .find(|v| v.id.eq_ignore_ascii_case(id))
        .ok_or_else(|| BoardError::UnknownVariant { id: id.to_string() })
}
