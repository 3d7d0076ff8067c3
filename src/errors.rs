//! Error types with stable codes and helpful messages.
//!
//! # Error Codes
//!
//! - D001: `DictionaryError::Unreadable` (word list could not be read)
//! - D002: `DictionaryError::NoValidWords` (word list had no usable entries)
//! - B001: `BoardError::WrongDieCount`
//! - B002: `BoardError::EmptyDie`
//! - B003: `BoardError::EmptyBag`
//! - B004: `BoardError::InvalidFace`
//! - B005: `BoardError::InvalidRule`
//! - B006: `BoardError::MalformedGrid`
//! - B007: `BoardError::UnknownVariant`
//! - C001: `ConfigError::Unreadable`
//! - C002: `ConfigError::Malformed`
//!
//! Solve requests that cannot run (no dictionary yet, a solve already in flight) are not
//! errors; see [`crate::session::SolveSkipped`].
//!
//! # Examples
//!
//! ```
//! use moggle::errors::BoardError;
//!
//! let err = BoardError::WrongDieCount { found: 15 };
//! assert_eq!(err.code(), "B001");
//! assert!(err.display_detailed().contains("(B001)"));
//! ```

use std::io;
use std::path::PathBuf;

/// Failures while obtaining or building the dictionary.
///
/// Both variants leave the session without a dictionary; loading can be retried.
#[derive(Debug, thiserror::Error)]
pub enum DictionaryError {
    #[error("could not read word list '{}': {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("word list contains no usable words")]
    NoValidWords,
}

impl DictionaryError {
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            DictionaryError::Unreadable { .. } => "D001",
            DictionaryError::NoValidWords => "D002",
        }
    }

    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            DictionaryError::Unreadable { .. } => "Word list unavailable",
            DictionaryError::NoValidWords => "Word list is empty after filtering",
        }
    }

    #[must_use]
    pub fn details(&self) -> &'static str {
        match self {
            DictionaryError::Unreadable { .. } => "The word list file could not be opened or read. Word validation and solving stay disabled until a reload succeeds.",
            DictionaryError::NoValidWords => "Every line was discarded: entries must be alphabetic (a-z) and at least 4 letters long.",
        }
    }

    #[must_use]
    pub fn help(&self) -> Option<&'static str> {
        match self {
            DictionaryError::Unreadable { .. } => Some("Check the --dictionary path, then try again"),
            DictionaryError::NoValidWords => Some("Provide a plain-text list with one word per line"),
        }
    }

    #[must_use]
    pub fn display_detailed(&self) -> String {
        format_error_with_code_and_help(&self.to_string(), self.code(), self.help())
    }
}

/// A letter source (or a textual grid) that cannot produce a well-formed 4x4 board.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BoardError {
    #[error("expected 16 dice, found {found}")]
    WrongDieCount { found: usize },

    #[error("die #{index} has no faces")]
    EmptyDie { index: usize },

    #[error("letter bag is empty")]
    EmptyBag,

    #[error("invalid face \"{face}\" (expected a single letter or \"qu\")")]
    InvalidFace { face: String },

    #[error("invalid bag rule: {reason}")]
    InvalidRule { reason: String },

    #[error("malformed grid \"{input}\": {reason}")]
    MalformedGrid { input: String, reason: String },

    #[error("unknown variant \"{id}\"")]
    UnknownVariant { id: String },
}

impl BoardError {
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            BoardError::WrongDieCount { .. } => "B001",
            BoardError::EmptyDie { .. } => "B002",
            BoardError::EmptyBag => "B003",
            BoardError::InvalidFace { .. } => "B004",
            BoardError::InvalidRule { .. } => "B005",
            BoardError::MalformedGrid { .. } => "B006",
            BoardError::UnknownVariant { .. } => "B007",
        }
    }

    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            BoardError::WrongDieCount { .. } => "Wrong number of dice",
            BoardError::EmptyDie { .. } => "Die without faces",
            BoardError::EmptyBag => "Empty letter bag",
            BoardError::InvalidFace { .. } => "Invalid face",
            BoardError::InvalidRule { .. } => "Invalid bag rule",
            BoardError::MalformedGrid { .. } => "Malformed grid",
            BoardError::UnknownVariant { .. } => "Unknown variant",
        }
    }

    #[must_use]
    pub fn details(&self) -> &'static str {
        match self {
            BoardError::WrongDieCount { .. } => "Classic boards roll exactly one die per cell, so the dice table must contain 16 dice.",
            BoardError::EmptyDie { .. } => "Every die needs at least one face to roll.",
            BoardError::EmptyBag => "Bag variants draw every cell from the bag, so it needs at least one entry.",
            BoardError::InvalidFace { .. } => "Faces are single letters A-Z or the two-letter unit \"qu\" (any case).",
            BoardError::InvalidRule { .. } => "A post-draw or pre-draw rule references cells outside the board, asks for more cells than it lists, or has an impossible probability.",
            BoardError::MalformedGrid { .. } => "A textual grid must spell exactly 16 tiles; separators ('/', ',', spaces) are ignored and \"Qu\" counts as one tile.",
            BoardError::UnknownVariant { .. } => "The variant id does not name a registered letter source.",
        }
    }

    #[must_use]
    pub fn help(&self) -> Option<&'static str> {
        match self {
            BoardError::WrongDieCount { .. } => Some("List exactly 16 dice, e.g. [[\"A\",\"A\",\"E\",\"E\",\"G\",\"N\"], ...]"),
            BoardError::InvalidFace { .. } => Some("Use faces like \"A\" or \"Qu\""),
            BoardError::MalformedGrid { .. } => Some("Example: TAPE/RSLN/OIDM/CHUG"),
            BoardError::UnknownVariant { .. } => Some("Known variants: classic, big-bag, vowel-storm, centre-vowels"),
            _ => None,
        }
    }

    #[must_use]
    pub fn display_detailed(&self) -> String {
        format_error_with_code_and_help(&self.to_string(), self.code(), self.help())
    }
}

/// Problems with an external letter-source configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read letter configuration '{}': {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed letter configuration: {0}")]
    Malformed(#[from] serde_json::Error),
}

impl ConfigError {
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            ConfigError::Unreadable { .. } => "C001",
            ConfigError::Malformed(_) => "C002",
        }
    }

    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            ConfigError::Unreadable { .. } => "Letter configuration unavailable",
            ConfigError::Malformed(_) => "Letter configuration is not valid JSON",
        }
    }

    #[must_use]
    pub fn details(&self) -> &'static str {
        match self {
            ConfigError::Unreadable { .. } => "The file given with --letters could not be read.",
            ConfigError::Malformed(_) => "The file must hold a tagged letter source: {\"kind\":\"dice\",...} or {\"kind\":\"bag\",...}.",
        }
    }

    #[must_use]
    pub fn help(&self) -> Option<&'static str> {
        match self {
            ConfigError::Unreadable { .. } => None,
            ConfigError::Malformed(_) => Some("Example: {\"kind\":\"bag\",\"faces\":[\"A\",\"E\",\"S\",\"T\"],\"rules\":[]}"),
        }
    }

    #[must_use]
    pub fn display_detailed(&self) -> String {
        format_error_with_code_and_help(&self.to_string(), self.code(), self.help())
    }
}

/// Umbrella error for front ends that deal with every failure source at once.
#[derive(Debug, thiserror::Error)]
pub enum MoggleError {
    #[error(transparent)]
    Dictionary(#[from] DictionaryError),

    #[error(transparent)]
    Board(#[from] BoardError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl MoggleError {
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            MoggleError::Dictionary(e) => e.code(),
            MoggleError::Board(e) => e.code(),
            MoggleError::Config(e) => e.code(),
        }
    }

    #[must_use]
    pub fn help(&self) -> Option<&'static str> {
        match self {
            MoggleError::Dictionary(e) => e.help(),
            MoggleError::Board(e) => e.help(),
            MoggleError::Config(e) => e.help(),
        }
    }

    #[must_use]
    pub fn display_detailed(&self) -> String {
        match self {
            MoggleError::Dictionary(e) => e.display_detailed(),
            MoggleError::Board(e) => e.display_detailed(),
            MoggleError::Config(e) => e.display_detailed(),
        }
    }
}

/// Helper function to format error messages with code and optional help text
pub(crate) fn format_error_with_code_and_help(base_msg: &str, code: &str, help: Option<&str>) -> String {
    if let Some(help_text) = help {
        format!("{base_msg} ({code})\n{help_text}")
    } else {
        format!("{base_msg} ({code})")
    }
}
