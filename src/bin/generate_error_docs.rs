//! Generate error code documentation from the source of truth (error enums).
//!
//! This binary reads the error codes, descriptions, details, and help text directly from
//! `DictionaryError`, `BoardError` and `ConfigError` via their `code()`, `description()`,
//! `details()`, and `help()` methods.
//!
//! Run with:
//! ```bash
//! cargo run --bin generate_error_docs > docs/ERROR_CODES.md
//! ```

use std::fmt::Write;
use std::io;
use std::path::PathBuf;

use moggle::errors::{BoardError, ConfigError, DictionaryError};

/// Macro to render error documentation for any error type with `code()`, `description()`,
/// `details()`, `help()`, and `display_detailed()` methods
macro_rules! render_error_docs {
    ($out:expr, $errors:expr) => {
        for error in $errors {
            let _ = writeln!($out, "### {}: {}\n", error.code(), error.description());
            let _ = writeln!($out, "**Details:** {}\n", error.details());

            if let Some(help_text) = error.help() {
                let _ = writeln!($out, "**How to fix:**");
                let _ = writeln!($out, "```\n{help_text}\n```\n");
            }

            let _ = writeln!($out, "**Example error message:**");
            let _ = writeln!($out, "```\n{error}\n```\n");

            let _ = writeln!($out, "**Detailed format:**");
            let _ = writeln!($out, "```\n{}\n```\n", error.display_detailed());

            let _ = writeln!($out, "---\n");
        }
    };
}

fn all_dictionary_error_variants() -> Vec<DictionaryError> {
    vec![
        DictionaryError::Unreadable {
            path: PathBuf::from("data/words.txt"),
            source: io::Error::new(io::ErrorKind::NotFound, "No such file or directory"),
        },
        DictionaryError::NoValidWords,
    ]
}

fn all_board_error_variants() -> Vec<BoardError> {
    vec![
        BoardError::WrongDieCount { found: 15 },
        BoardError::EmptyDie { index: 3 },
        BoardError::EmptyBag,
        BoardError::InvalidFace { face: "th".to_string() },
        BoardError::InvalidRule { reason: "probability 1.5 is outside 0..=1".to_string() },
        BoardError::MalformedGrid {
            input: "TAPE/RSLN".to_string(),
            reason: "expected 16 tiles, found 8".to_string(),
        },
        BoardError::UnknownVariant { id: "blitz".to_string() },
    ]
}

fn all_config_error_variants() -> Vec<ConfigError> {
    let malformed = serde_json::from_str::<serde_json::Value>("{\"kind\": ").map_or_else(ConfigError::from, |_| {
        ConfigError::Unreadable {
            path: PathBuf::from("letters.json"),
            source: io::Error::new(io::ErrorKind::InvalidData, "unexpected end of input"),
        }
    });
    vec![
        ConfigError::Unreadable {
            path: PathBuf::from("letters.json"),
            source: io::Error::new(io::ErrorKind::NotFound, "No such file or directory"),
        },
        malformed,
    ]
}

fn render() -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# Error Code Reference\n");
    let _ = writeln!(out, "**⚠️ This document is auto-generated from the source code. Do not edit manually.**\n");

    let _ = writeln!(out, "## Table of Contents\n");
    let _ = writeln!(out, "- [Dictionary Errors (D001–D002)](#dictionary-errors)");
    let _ = writeln!(out, "- [Board Errors (B001–B007)](#board-errors)");
    let _ = writeln!(out, "- [Configuration Errors (C001–C002)](#configuration-errors)\n");

    let _ = writeln!(out, "## Dictionary Errors\n");
    let _ = writeln!(out, "The word list could not be loaded. The game stays usable, but words are not checked and boards are not solved until a load succeeds.\n");
    render_error_docs!(out, all_dictionary_error_variants());

    let _ = writeln!(out, "## Board Errors\n");
    let _ = writeln!(out, "A board could not be generated or parsed. No partial board is ever produced.\n");
    render_error_docs!(out, all_board_error_variants());

    let _ = writeln!(out, "## Configuration Errors\n");
    let _ = writeln!(out, "A letter-source file given with `--letters` could not be used.\n");
    render_error_docs!(out, all_config_error_variants());

    let _ = writeln!(out, "## Error Display Formats\n");
    let _ = writeln!(out, "### Simple Format");
    let _ = writeln!(out, "```\nError: <message>\n```\n");
    let _ = writeln!(out, "### Detailed Format (via `display_detailed()`)");
    let _ = writeln!(out, "```\n<message> (<code>)\n<help text if available>\n```");
    out
}

fn main() {
    print!("{}", render());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_code_is_documented() {
        let docs = render();
        let codes = ["D001", "D002", "B001", "B002", "B003", "B004", "B005", "B006", "B007", "C001", "C002"];
        for code in codes {
            assert!(docs.contains(&format!("### {code}: ")), "{code} missing");
        }
    }

    #[test]
    fn test_config_examples_have_distinct_codes() {
        let codes: Vec<&str> = all_config_error_variants().iter().map(ConfigError::code).collect();
        assert_eq!(codes, vec!["C001", "C002"]);
    }
}
