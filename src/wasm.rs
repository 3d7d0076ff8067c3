use crate::board::Grid;
use crate::dictionary::Dictionary;
use crate::errors::MoggleError;
use crate::log::init_logger;
use crate::modes::{GameMode, Round};
use crate::session::{Session, SubmitOutcome};
use wasm_bindgen::prelude::*;

use serde_wasm_bindgen::to_value;

/// Structured error information for JavaScript consumers
#[derive(serde::Serialize)]
struct WasmError {
    /// Error code (e.g., "D001", "B006")
    code: String,
    /// Display message
    message: String,
    /// Short description of error type
    description: String,
    /// Detailed explanation
    details: String,
    /// Optional helpful suggestion
    #[serde(skip_serializing_if = "Option::is_none")]
    help: Option<String>,
}

impl From<MoggleError> for WasmError {
    fn from(e: MoggleError) -> Self {
        let (description, details) = match &e {
            MoggleError::Dictionary(inner) => (inner.description(), inner.details()),
            MoggleError::Board(inner) => (inner.description(), inner.details()),
            MoggleError::Config(inner) => (inner.description(), inner.details()),
        };
        WasmError {
            code: e.code().to_string(),
            message: e.to_string(),
            description: description.to_string(),
            details: details.to_string(),
            help: e.help().map(ToString::to_string),
        }
    }
}

impl From<WasmError> for JsValue {
    fn from(e: WasmError) -> Self {
        let mut msg = format!("Error {}: {}", e.code, e.message);

        if !e.details.is_empty() {
            msg.push_str(&format!("\n\n{}", e.details));
        }

        if let Some(help) = e.help {
            msg.push_str(&format!("\n\nSuggestion: {help}"));
        }

        js_sys::Error::new(&msg).into()
    }
}

fn js_error(e: impl Into<MoggleError>) -> JsValue {
    WasmError::from(e.into()).into()
}

fn serialize<T: serde::Serialize>(value: &T) -> Result<JsValue, JsValue> {
    to_value(value).map_err(|e| {
        WasmError {
            code: "WASM002".to_string(),
            message: format!("serialization failed: {e}"),
            description: "Failed to serialize result".to_string(),
            details: "The game state could not be converted to JavaScript format.".to_string(),
            help: Some("This is an internal error. Please report this issue.".to_string()),
        }
        .into()
    })
}

/// Initialize Moggle logging with the specified debug setting.
///
/// This function must be called from JavaScript after the WASM module loads.
#[wasm_bindgen]
pub fn initialize(debug_enabled: bool) {
    console_error_panic_hook::set_once();
    init_logger(debug_enabled);

    log::info!("WASM module initialized");
    if !debug_enabled {
        log::info!("Debug logging disabled");
    }
}

#[derive(serde::Serialize)]
struct BoardView {
    mode: String,
    label: String,
    seed: Option<String>,
    rows: Vec<Vec<&'static str>>,
}

#[derive(serde::Serialize)]
struct SubmitView {
    accepted: bool,
    word: String,
    points: u32,
    message: &'static str,
    score: u32,
}

#[derive(serde::Serialize)]
struct RoundResults {
    results_text: Option<String>,
    score: u32,
    found: Vec<String>,
    /// `None` when the solve could not run (e.g. no dictionary yet).
    all: Option<Vec<String>>,
    missed: Option<Vec<String>>,
    longest_solution: Option<String>,
}

/// Two 32-bit values of browser randomness for `Random` seeds.
fn browser_entropy() -> [u32; 2] {
    let draw = || (js_sys::Math::random() * 4_294_967_296.0) as u32;
    [draw(), draw()]
}

/// One player's game, driven from JavaScript.
#[wasm_bindgen]
pub struct WasmGame {
    session: Session,
}

#[wasm_bindgen]
impl WasmGame {
    #[wasm_bindgen(constructor)]
    pub fn new() -> WasmGame {
        WasmGame { session: Session::new() }
    }

    /// Load the word list fetched by the page. Returns the number of words kept.
    ///
    /// # Errors
    /// A `D002` error if no line is a usable word; play stays disabled until a retry.
    pub fn load_dictionary(&mut self, text: &str) -> Result<usize, JsValue> {
        self.session.load_dictionary(Dictionary::load_from_str(text)).map_err(js_error)
    }

    pub fn dictionary_ready(&self) -> bool {
        self.session.is_dictionary_ready()
    }

    /// Start a round in `mode` ("random", "official", "longest" or "variant") at the
    /// current time.
    ///
    /// # Errors
    /// Unknown mode names, or a letter source that fails validation.
    pub fn start_mode(&mut self, mode: &str) -> Result<JsValue, JsValue> {
        let mode: GameMode = mode.parse().map_err(|msg: String| js_sys::Error::new(&msg))?;
        let now_ms = js_sys::Date::now() as u64;
        let round = Round::for_mode(mode, now_ms, browser_entropy());
        self.session.start(&round).map_err(js_error)?;
        self.board()
    }

    /// Start a round from a shared seed string.
    ///
    /// # Errors
    /// A `B007` error if the seed names an unknown variant.
    pub fn start_seed(&mut self, seed: &str) -> Result<JsValue, JsValue> {
        let round = Round::from_seed(seed).map_err(js_error)?;
        self.session.start(&round).map_err(js_error)?;
        self.board()
    }

    /// Start a round on a board typed in by the player, e.g. "TAPE/RSLN/OIDM/CHUG".
    ///
    /// # Errors
    /// A `B006` error unless the text is exactly 16 tiles.
    pub fn start_grid(&mut self, grid: &str) -> Result<JsValue, JsValue> {
        let grid = Grid::parse(grid).map_err(js_error)?;
        self.session.start_with_grid(GameMode::Random, grid);
        self.board()
    }

    /// The current board as `{ mode, label, seed, rows }`, or `null` before the first round.
    ///
    /// # Errors
    /// Only if serialization fails.
    pub fn board(&self) -> Result<JsValue, JsValue> {
        let view = self.session.grid().map(|grid| BoardView {
            mode: self.session.mode().map(|m| m.name().to_string()).unwrap_or_default(),
            label: self.session.label().unwrap_or_default().to_string(),
            seed: self.session.seed().map(ToString::to_string),
            rows: grid.rows(),
        });
        serialize(&view)
    }

    /// Submit a typed word.
    ///
    /// # Errors
    /// Only if serialization fails.
    pub fn submit_word(&mut self, word: &str) -> Result<JsValue, JsValue> {
        let outcome = self.session.submit_word(word);
        self.submit_view(outcome)
    }

    /// Submit the cells the player traced, row-major indices 0..16.
    ///
    /// # Errors
    /// Only if serialization fails.
    pub fn submit_path(&mut self, path: &[u32]) -> Result<JsValue, JsValue> {
        let path: Vec<usize> = path.iter().map(|&p| p as usize).collect();
        let outcome = self.session.submit_path(&path);
        self.submit_view(outcome)
    }

    pub fn display_score(&self) -> u32 {
        self.session.display_score()
    }

    pub fn is_over(&self) -> bool {
        self.session.is_over()
    }

    /// End the round (time's up) and solve the board.
    ///
    /// # Errors
    /// Only if serialization fails.
    pub fn end_round(&mut self) -> Result<JsValue, JsValue> {
        let solutions = self.session.end_round().ok().cloned();
        let results = RoundResults {
            results_text: self.session.results_text(),
            score: self.session.display_score(),
            found: self.session.found_words().to_vec(),
            longest_solution: solutions.as_ref().and_then(|s| s.longest().map(ToString::to_string)),
            all: solutions.as_ref().map(|s| s.all.clone()),
            missed: solutions.map(|s| s.missed),
        };
        serialize(&results)
    }
}

impl WasmGame {
    fn submit_view(&self, outcome: SubmitOutcome) -> Result<JsValue, JsValue> {
        let message = outcome.message();
        let view = match outcome {
            SubmitOutcome::Accepted { word, points } => {
                SubmitView { accepted: true, word, points, message, score: self.session.display_score() }
            }
            SubmitOutcome::Rejected { word, .. } => {
                SubmitView { accepted: false, word, points: 0, message, score: self.session.display_score() }
            }
        };
        serialize(&view)
    }
}

impl Default for WasmGame {
    fn default() -> Self {
        WasmGame::new()
    }
}

/// Generate a debug report for troubleshooting.
///
/// Users copy/paste this when reporting issues: the error shown, the round's seed and
/// label, and environment details.
#[wasm_bindgen]
pub fn get_debug_info(seed: &str, label: &str, error_message: &str, dictionary_size: usize) -> String {
    use std::fmt::Write;
    let mut report = String::new();

    // NB: writing to a String never fails
    let _ = writeln!(&mut report, "=== MOGGLE DEBUG REPORT ===");
    let _ = writeln!(&mut report, "Version: {} ({})", env!("CARGO_PKG_VERSION"), env!("GIT_HASH"));
    let _ = writeln!(
        &mut report,
        "Generated: {}",
        js_sys::Date::new_0().to_iso_string().as_string().unwrap_or_else(|| "unknown".to_string())
    );
    let _ = writeln!(&mut report);

    let _ = writeln!(&mut report, "## Error");
    let _ = writeln!(&mut report, "{error_message}");
    let _ = writeln!(&mut report);

    let _ = writeln!(&mut report, "## Round");
    let _ = writeln!(&mut report, "Seed: {seed}");
    let _ = writeln!(&mut report, "Label: {label}");
    let _ = writeln!(&mut report, "Dictionary Size: {dictionary_size}");
    let _ = writeln!(&mut report);

    let _ = writeln!(&mut report, "## Environment");
    if let Some(window) = web_sys::window() {
        if let Ok(user_agent) = window.navigator().user_agent() {
            let _ = writeln!(&mut report, "User Agent: {user_agent}");
        }
        let _ = writeln!(&mut report, "Location: {}", window.location().href().unwrap_or_else(|_| "unknown".to_string()));
    }
    let _ = writeln!(&mut report);

    let _ = writeln!(&mut report, "## Instructions");
    let _ = writeln!(&mut report, "Please copy this entire report and paste it when reporting the issue.");
    let _ = writeln!(&mut report);

    let _ = writeln!(&mut report, "=== END DEBUG REPORT ===");

    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_debug_info_structure() {
        let report = get_debug_info("moggle|official|2024-01-01 10:05Z", "Official 10:05", "B006 bad grid", 1000);

        let lines: Vec<&str> = report.lines().collect();

        assert_eq!(lines[0], "=== MOGGLE DEBUG REPORT ===");
        assert!(lines[1].starts_with(&format!("Version: {}", env!("CARGO_PKG_VERSION"))));
        assert!(lines[2].starts_with("Generated: "));
        assert_eq!(lines[3], "");
        assert_eq!(lines[4], "## Error");
        assert_eq!(lines[5], "B006 bad grid");
        assert_eq!(lines[6], "");
        assert_eq!(lines[7], "## Round");
        assert_eq!(lines[8], "Seed: moggle|official|2024-01-01 10:05Z");
        assert_eq!(lines[9], "Label: Official 10:05");
        assert_eq!(lines[10], "Dictionary Size: 1000");
        let end = lines.iter().position(|&l| l == "=== END DEBUG REPORT ===");
        assert!(end.is_some());
    }

    #[test]
    fn test_game_flow() {
        let mut game = WasmGame::new();
        assert!(!game.dictionary_ready());
        assert_eq!(game.load_dictionary("tape\nslid\nlids").ok(), Some(3));
        assert!(game.start_grid("TAPE/RSLN/OIDM/CHUG").is_ok());
        assert!(game.submit_word("tape").is_ok());
        assert_eq!(game.display_score(), 1);
        assert!(game.end_round().is_ok());
        assert!(game.is_over());
    }
}
