//! One player's game state: the dictionary, the current round and the solve in flight.
//!
//! The board generator and solver are pure functions; everything that changes over a game
//! lives here, in one explicit value owned by the caller (CLI loop, browser bindings, tests).
//!
//! # Solving off the main thread
//!
//! A solve is split in three so the caller can run the search wherever it likes:
//!
//! 1. [`Session::begin_solve`] checks the preconditions, raises the in-flight flag and
//!    hands back a [`SolveJob`] (a `Send` snapshot: shared dictionary, board, found words).
//! 2. [`SolveJob::run`] does the whole search; it touches no session state.
//! 3. [`Session::complete_solve`] publishes the results and lowers the flag.
//!
//! Results become visible only at step 3, after the search has finished.
//! [`Session::solve`] runs all three in place.

use std::fmt;
use std::sync::Arc;

use log::{debug, info, warn};

use crate::board::{generate, Grid};
use crate::dictionary::{Dictionary, MIN_WORD_LEN};
use crate::errors::{BoardError, DictionaryError};
use crate::letters::LetterSource;
use crate::modes::{GameMode, Round, CUSTOM_LABEL};
use crate::solver::{self, score_word, PathError};

/// Whether the word list is usable yet.
#[derive(Debug, Clone, Default)]
pub enum DictionaryState {
    #[default]
    Loading,
    Ready(Arc<Dictionary>),
    /// Loading failed; the notice is meant for the player. Loading can be retried.
    Unavailable(String),
}

/// Why a solve request was dropped. These are not errors: the caller just tries later.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveSkipped {
    DictionaryNotReady,
    AlreadySolving,
    NoBoard,
}

impl fmt::Display for SolveSkipped {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SolveSkipped::DictionaryNotReady => "dictionary not ready",
            SolveSkipped::AlreadySolving => "a solve is already running",
            SolveSkipped::NoBoard => "no board to solve",
        })
    }
}

/// Why a submission did not score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    DictionaryNotReady,
    NoRound,
    RoundOver,
    TooShort,
    AlreadyFound,
    NotInDictionary,
    NotOnBoard,
    InvalidPath(PathError),
}

impl Rejection {
    /// Short message for the player.
    pub fn message(&self) -> &'static str {
        match self {
            Rejection::DictionaryNotReady => "Dictionary not loaded.",
            Rejection::NoRound => "No game in progress.",
            Rejection::RoundOver => "Time’s up!",
            Rejection::TooShort => "Minimum 4 letters.",
            Rejection::AlreadyFound => "Already found.",
            Rejection::NotInDictionary => "Not in dictionary.",
            Rejection::NotOnBoard => "Not on the board.",
            Rejection::InvalidPath(_) => "Tiles must touch and can't repeat.",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The word (uppercase) was recorded.
    Accepted { word: String, points: u32 },
    Rejected { word: String, reason: Rejection },
}

impl SubmitOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, SubmitOutcome::Accepted { .. })
    }

    pub fn message(&self) -> &'static str {
        match self {
            SubmitOutcome::Accepted { .. } => "Nice!",
            SubmitOutcome::Rejected { reason, .. } => reason.message(),
        }
    }
}

/// Everything on the board, and what the player did not find.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Solutions {
    pub all: Vec<String>,
    pub missed: Vec<String>,
}

impl Solutions {
    /// The longest word on the board (first in solution order on ties).
    pub fn longest(&self) -> Option<&str> {
        longest_word(self.all.iter())
    }
}

/// A self-contained solve, ready to run on any thread.
#[derive(Debug, Clone)]
pub struct SolveJob {
    round_id: u64,
    dict: Arc<Dictionary>,
    grid: Grid,
    found: Vec<String>,
}

impl SolveJob {
    #[must_use]
    pub fn run(self) -> SolveOutput {
        let all = solver::solve(&self.grid, &self.dict);
        let missed = solver::missed(&all, &self.found);
        SolveOutput { round_id: self.round_id, solutions: Solutions { all, missed } }
    }
}

/// Result of a [`SolveJob`], to hand back to [`Session::complete_solve`].
#[derive(Debug, Clone)]
pub struct SolveOutput {
    round_id: u64,
    solutions: Solutions,
}

#[derive(Debug, Clone)]
struct ActiveRound {
    id: u64,
    mode: GameMode,
    label: String,
    seed: Option<String>,
    grid: Grid,
    found: Vec<String>,
    over: bool,
    solutions: Option<Solutions>,
}

#[derive(Debug, Default)]
pub struct Session {
    dictionary: DictionaryState,
    round: Option<ActiveRound>,
    rounds_started: u64,
    solving: bool,
}

impl Session {
    #[must_use]
    pub fn new() -> Session {
        Session::default()
    }

    /// Install a freshly loaded dictionary, or record why loading failed.
    ///
    /// On failure the previous state is replaced by [`DictionaryState::Unavailable`], so
    /// submissions and solves stay disabled until a later call succeeds.
    ///
    /// # Errors
    ///
    /// Hands the load error back so the caller can show it.
    pub fn load_dictionary(&mut self, result: Result<Dictionary, DictionaryError>) -> Result<usize, DictionaryError> {
        match result {
            Ok(dict) => {
                let count = dict.len();
                self.dictionary = DictionaryState::Ready(Arc::new(dict));
                Ok(count)
            }
            Err(e) => {
                warn!("Dictionary unavailable: {e}");
                self.dictionary = DictionaryState::Unavailable(e.display_detailed());
                Err(e)
            }
        }
    }

    pub fn dictionary_state(&self) -> &DictionaryState {
        &self.dictionary
    }

    pub fn dictionary(&self) -> Option<&Arc<Dictionary>> {
        match &self.dictionary {
            DictionaryState::Ready(dict) => Some(dict),
            _ => None,
        }
    }

    pub fn is_dictionary_ready(&self) -> bool {
        self.dictionary().is_some()
    }

    /// Generate a board for `round` from `source` and start playing it.
    ///
    /// Found words and solutions from the previous round are dropped. A solve still in
    /// flight for the old board will be discarded when it completes.
    ///
    /// # Errors
    ///
    /// A [`BoardError`] if `source` is invalid; the previous round is left untouched.
    pub fn start_round(&mut self, round: &Round, source: &LetterSource) -> Result<&Grid, BoardError> {
        let grid = generate(&round.seed, source)?;
        info!("Round started: {} ({})", round.label, round.seed);
        Ok(self.install(round.mode, round.label.clone(), Some(round.seed.clone()), grid))
    }

    /// [`Session::start_round`] with the round's own letter source.
    ///
    /// # Errors
    ///
    /// A [`BoardError`] if the letter source is invalid.
    pub fn start(&mut self, round: &Round) -> Result<&Grid, BoardError> {
        self.start_round(round, &round.variant.source())
    }

    /// Play a board given directly rather than generated from a seed.
    pub fn start_with_grid(&mut self, mode: GameMode, grid: Grid) -> &Grid {
        info!("Round started on a fixed board: {}", grid.to_compact());
        self.install(mode, CUSTOM_LABEL.to_string(), None, grid)
    }

    fn install(&mut self, mode: GameMode, label: String, seed: Option<String>, grid: Grid) -> &Grid {
        self.rounds_started += 1;
        let round = self.round.insert(ActiveRound {
            id: self.rounds_started,
            mode,
            label,
            seed,
            grid,
            found: Vec::new(),
            over: false,
            solutions: None,
        });
        &round.grid
    }

    pub fn grid(&self) -> Option<&Grid> {
        self.round.as_ref().map(|r| &r.grid)
    }

    pub fn mode(&self) -> Option<GameMode> {
        self.round.as_ref().map(|r| r.mode)
    }

    pub fn label(&self) -> Option<&str> {
        self.round.as_ref().map(|r| r.label.as_str())
    }

    pub fn seed(&self) -> Option<&str> {
        self.round.as_ref().and_then(|r| r.seed.as_deref())
    }

    /// Words accepted this round, uppercase, in the order they were found.
    pub fn found_words(&self) -> &[String] {
        self.round.as_ref().map_or(&[], |r| r.found.as_slice())
    }

    pub fn is_over(&self) -> bool {
        self.round.as_ref().is_some_and(|r| r.over)
    }

    pub fn is_solving(&self) -> bool {
        self.solving
    }

    /// Check a typed word and record it if it scores.
    pub fn submit_word(&mut self, word: &str) -> SubmitOutcome {
        let word = word.trim().to_ascii_uppercase();
        let on_board = |grid: &Grid, w: &str| solver::trace_word(grid, w).is_some();
        self.submit(word, on_board)
    }

    /// Spell the word along a path of cells and record it if it scores.
    pub fn submit_path(&mut self, path: &[usize]) -> SubmitOutcome {
        let Some(round) = &self.round else {
            return rejected(String::new(), Rejection::NoRound);
        };
        match solver::spell_path(&round.grid, path) {
            Ok(word) => self.submit(word, |_, _| true),
            Err(e) => rejected(String::new(), Rejection::InvalidPath(e)),
        }
    }

    fn submit(&mut self, word: String, on_board: impl Fn(&Grid, &str) -> bool) -> SubmitOutcome {
        let Some(dict) = self.dictionary().cloned() else {
            return rejected(word, Rejection::DictionaryNotReady);
        };
        let Some(round) = self.round.as_mut() else {
            return rejected(word, Rejection::NoRound);
        };
        if round.over {
            return rejected(word, Rejection::RoundOver);
        }
        if word.len() < MIN_WORD_LEN {
            return rejected(word, Rejection::TooShort);
        }
        if round.found.contains(&word) {
            return rejected(word, Rejection::AlreadyFound);
        }
        if !dict.contains(&word) {
            return rejected(word, Rejection::NotInDictionary);
        }
        if !on_board(&round.grid, &word) {
            return rejected(word, Rejection::NotOnBoard);
        }

        let points = score_word(word.len());
        debug!("Accepted {word} (+{points})");
        round.found.push(word.clone());
        SubmitOutcome::Accepted { word, points }
    }

    /// Total points for the words found so far.
    pub fn score(&self) -> u32 {
        self.found_words().iter().map(|w| score_word(w.len())).sum()
    }

    /// The longest word found so far; on a tie, the most recently found one.
    pub fn longest_found(&self) -> Option<&str> {
        longest_word(self.found_words().iter().rev())
    }

    /// The number shown as the score: points, or in `Longest` mode the length of the
    /// longest word found.
    pub fn display_score(&self) -> u32 {
        if self.mode() == Some(GameMode::Longest) {
            let longest = self.longest_found().map_or(0, str::len);
            return u32::try_from(longest).unwrap_or(u32::MAX);
        }
        self.score()
    }

    /// Freeze the found words and solve the board.
    ///
    /// Ending a round that is already over only re-attempts the solve.
    ///
    /// # Errors
    ///
    /// [`SolveSkipped`] if the solve could not run now; the round is over regardless.
    pub fn end_round(&mut self) -> Result<&Solutions, SolveSkipped> {
        let score = self.score();
        if let Some(round) = self.round.as_mut().filter(|r| !r.over) {
            round.over = true;
            info!("Round over: {} words, {score} pts", round.found.len());
        }
        self.solve()
    }

    /// One-line summary of a finished round, e.g. `"Official 10:05 · 7 pts · 4 words"`.
    pub fn results_text(&self) -> Option<String> {
        let round = self.round.as_ref().filter(|r| r.over)?;
        let label = &round.label;
        if round.mode == GameMode::Longest {
            return Some(match longest_word(round.found.iter().rev()) {
                Some(w) => format!("{label} · {w} · {} letters", w.len()),
                None => format!("{label} · No valid word"),
            });
        }
        Some(format!("{label} · {} pts · {} words", self.score(), round.found.len()))
    }

    /// Start a solve, unless one cannot run right now.
    ///
    /// # Errors
    ///
    /// [`SolveSkipped`] with the reason the request was dropped.
    pub fn begin_solve(&mut self) -> Result<SolveJob, SolveSkipped> {
        let job = self.prepare_solve();
        match &job {
            Ok(_) => self.solving = true,
            Err(reason) => debug!("Solve request dropped: {reason}"),
        }
        job
    }

    fn prepare_solve(&self) -> Result<SolveJob, SolveSkipped> {
        if self.solving {
            return Err(SolveSkipped::AlreadySolving);
        }
        let dict = self.dictionary().ok_or(SolveSkipped::DictionaryNotReady)?;
        let round = self.round.as_ref().ok_or(SolveSkipped::NoBoard)?;
        Ok(SolveJob {
            round_id: round.id,
            dict: Arc::clone(dict),
            grid: round.grid,
            found: round.found.clone(),
        })
    }

    /// Publish a finished solve and clear the in-flight flag.
    ///
    /// Returns `false` if a new round started meanwhile; the stale results are dropped.
    pub fn complete_solve(&mut self, output: SolveOutput) -> bool {
        self.solving = false;
        match self.round.as_mut() {
            Some(round) if round.id == output.round_id => {
                round.solutions = Some(output.solutions);
                true
            }
            _ => {
                debug!("Discarding solve results for an old board");
                false
            }
        }
    }

    /// Solve the current board in place.
    ///
    /// # Errors
    ///
    /// [`SolveSkipped`] if the solve could not run now.
    pub fn solve(&mut self) -> Result<&Solutions, SolveSkipped> {
        let output = self.begin_solve()?.run();
        self.complete_solve(output);
        self.solutions().ok_or(SolveSkipped::NoBoard)
    }

    /// Results of the last completed solve of this board.
    pub fn solutions(&self) -> Option<&Solutions> {
        self.round.as_ref().and_then(|r| r.solutions.as_ref())
    }
}

fn rejected(word: String, reason: Rejection) -> SubmitOutcome {
    SubmitOutcome::Rejected { word, reason }
}

/// First word of maximal length in iteration order.
fn longest_word<'a>(words: impl Iterator<Item = &'a String>) -> Option<&'a str> {
    words
        .fold(None, |best: Option<&String>, w| match best {
            Some(b) if b.len() >= w.len() => Some(b),
            _ => Some(w),
        })
        .map(String::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOARD: &str = "TAPE/RSLN/OIDM/CHUG";
    const WORDS: &str = "tape\npears\nslid\nlids\nsnit\ntapes\nzebra\nchug";

    fn ready_session() -> Session {
        let mut session = Session::new();
        session.load_dictionary(Dictionary::load_from_str(WORDS)).unwrap();
        session.start_with_grid(GameMode::Official, Grid::parse(BOARD).unwrap());
        session
    }

    fn accepted(word: &str, points: u32) -> SubmitOutcome {
        SubmitOutcome::Accepted { word: word.to_string(), points }
    }

    fn reason(outcome: SubmitOutcome) -> Rejection {
        match outcome {
            SubmitOutcome::Rejected { reason, .. } => reason,
            SubmitOutcome::Accepted { word, .. } => panic!("{word} was accepted"),
        }
    }

    #[test]
    fn test_submit_accepts_and_scores() {
        let mut s = ready_session();
        assert_eq!(s.submit_word(" tape "), accepted("TAPE", 1));
        assert_eq!(s.submit_word("Slid"), accepted("SLID", 1));
        assert_eq!(s.found_words(), &["TAPE".to_string(), "SLID".to_string()]);
        assert_eq!(s.score(), 2);
    }

    #[test]
    fn test_submit_rejections() {
        let mut s = ready_session();
        s.submit_word("tape");
        assert_eq!(reason(s.submit_word("tap")), Rejection::TooShort);
        assert_eq!(reason(s.submit_word("TAPE")), Rejection::AlreadyFound);
        assert_eq!(reason(s.submit_word("slim")), Rejection::NotInDictionary);
        // in the word list, but E and A do not touch
        assert_eq!(reason(s.submit_word("pears")), Rejection::NotOnBoard);
        assert_eq!(s.found_words().len(), 1);
    }

    #[test]
    fn test_submit_without_dictionary_or_round() {
        let mut s = Session::new();
        assert_eq!(reason(s.submit_word("tape")), Rejection::DictionaryNotReady);
        s.load_dictionary(Dictionary::load_from_str(WORDS)).unwrap();
        assert_eq!(reason(s.submit_word("tape")), Rejection::NoRound);
        assert_eq!(reason(s.submit_path(&[0, 1, 2, 3])), Rejection::NoRound);
    }

    #[test]
    fn test_submit_path() {
        let mut s = ready_session();
        assert_eq!(s.submit_path(&[0, 1, 2, 3]), accepted("TAPE", 1));
        assert_eq!(reason(s.submit_path(&[0, 2])), Rejection::InvalidPath(PathError::NotAdjacent(0, 2)));
        assert_eq!(reason(s.submit_path(&[0, 1, 2, 3])), Rejection::AlreadyFound);
    }

    #[test]
    fn test_failed_dictionary_load_disables_play() {
        let mut s = Session::new();
        assert!(s.load_dictionary(Dictionary::load_from_str("\n12\nab\n")).is_err());
        assert!(matches!(s.dictionary_state(), DictionaryState::Unavailable(msg) if msg.contains("D002")));
        s.start_with_grid(GameMode::Random, Grid::parse(BOARD).unwrap());
        assert_eq!(s.begin_solve().unwrap_err(), SolveSkipped::DictionaryNotReady);

        // retry succeeds
        s.load_dictionary(Dictionary::load_from_str(WORDS)).unwrap();
        assert!(s.submit_word("tape").is_accepted());
    }

    #[test]
    fn test_end_round_freezes_and_solves() {
        let mut s = ready_session();
        s.submit_word("tape");
        let solutions = s.end_round().unwrap().clone();
        assert_eq!(solutions.all, vec!["CHUG", "LIDS", "SLID", "TAPE"]);
        assert_eq!(solutions.missed, vec!["CHUG", "LIDS", "SLID"]);
        assert!(s.is_over());
        assert_eq!(reason(s.submit_word("slid")), Rejection::RoundOver);
        assert_eq!(s.results_text().unwrap(), "Game · 1 pts · 1 words");
    }

    #[test]
    fn test_found_words_are_subset_of_solutions() {
        let mut s = ready_session();
        for w in ["tape", "lids", "chug"] {
            s.submit_word(w);
        }
        let solutions = s.end_round().unwrap();
        for w in ["TAPE", "LIDS", "CHUG"] {
            assert!(solutions.all.iter().any(|x| x == w));
            assert!(!solutions.missed.iter().any(|x| x == w));
        }
    }

    #[test]
    fn test_longest_mode_scoring_and_results() {
        let mut s = Session::new();
        s.load_dictionary(Dictionary::load_from_str(WORDS)).unwrap();
        s.start_with_grid(GameMode::Longest, Grid::parse(BOARD).unwrap());
        assert_eq!(s.display_score(), 0);
        s.end_round().unwrap();
        assert_eq!(s.results_text().unwrap(), "Game · No valid word");

        s.start_with_grid(GameMode::Longest, Grid::parse("TAPE/RSLN/OIDM/CHUG").unwrap());
        s.submit_word("tape");
        s.submit_word("slid");
        assert_eq!(s.longest_found(), Some("SLID"));
        assert_eq!(s.display_score(), 4);
        s.end_round().unwrap();
        assert_eq!(s.results_text().unwrap(), "Game · SLID · 4 letters");
    }

    #[test]
    fn test_longest_tie_prefers_latest_found() {
        let mut s = Session::new();
        s.load_dictionary(Dictionary::load_from_str(WORDS)).unwrap();
        s.start_with_grid(GameMode::Longest, Grid::parse(BOARD).unwrap());
        s.submit_word("slid");
        s.submit_word("lids");
        assert_eq!(s.longest_found(), Some("LIDS"));
        s.submit_word("chug");
        assert_eq!(s.longest_found(), Some("CHUG"));

        let solutions = s.end_round().unwrap().clone();
        // solutions keep the first of equal-length words in sorted order
        assert_eq!(solutions.longest(), solutions.all.first().map(String::as_str));
        assert_eq!(s.results_text().unwrap(), "Game · CHUG · 4 letters");
    }

    #[test]
    fn test_results_text_only_after_round() {
        let mut s = ready_session();
        assert_eq!(s.results_text(), None);
        s.end_round().unwrap();
        assert!(s.results_text().is_some());
    }

    #[test]
    fn test_start_round_from_seed() {
        let mut s = Session::new();
        let round = Round::from_seed("moggle|official|2024-01-01 10:05Z").unwrap();
        let grid = *s.start(&round).unwrap();
        assert_eq!(grid.to_compact(), "KLUI/WYRC/ONHR/JEAG");
        assert_eq!(s.label(), Some("Official 10:05"));
        assert_eq!(s.seed(), Some("moggle|official|2024-01-01 10:05Z"));
    }

    #[test]
    fn test_invalid_source_keeps_previous_round() {
        let mut s = ready_session();
        s.submit_word("tape");
        let round = Round::from_seed("x").unwrap();
        let bad = LetterSource::Bag { faces: vec![], rules: vec![] };
        assert_eq!(s.start_round(&round, &bad).unwrap_err(), BoardError::EmptyBag);
        assert_eq!(s.found_words().len(), 1);
    }

    #[test]
    fn test_new_round_clears_state() {
        let mut s = ready_session();
        s.submit_word("tape");
        s.end_round().unwrap();
        s.start_with_grid(GameMode::Random, Grid::parse(BOARD).unwrap());
        assert!(s.found_words().is_empty());
        assert!(s.solutions().is_none());
        assert!(!s.is_over());
    }

    #[test]
    fn test_at_most_one_solve_in_flight() {
        let mut s = ready_session();
        let job = s.begin_solve().unwrap();
        assert!(s.is_solving());
        assert_eq!(s.begin_solve().unwrap_err(), SolveSkipped::AlreadySolving);
        assert!(s.solutions().is_none());

        assert!(s.complete_solve(job.run()));
        assert!(!s.is_solving());
        assert_eq!(s.solutions().unwrap().all.len(), 4);
    }

    #[test]
    fn test_solve_job_runs_on_another_thread() {
        let mut s = ready_session();
        let job = s.begin_solve().unwrap();
        let output = std::thread::spawn(move || job.run()).join().unwrap();
        assert!(s.complete_solve(output));
        assert_eq!(s.solutions().unwrap().longest(), Some("CHUG"));
    }

    #[test]
    fn test_stale_solve_is_discarded() {
        let mut s = ready_session();
        let job = s.begin_solve().unwrap();
        s.start_with_grid(GameMode::Random, Grid::parse("EEEE/EEEE/EEEE/EEEE").unwrap());
        assert!(!s.complete_solve(job.run()));
        assert!(!s.is_solving());
        assert!(s.solutions().is_none());
    }

    #[test]
    fn test_solve_without_board() {
        let mut s = Session::new();
        s.load_dictionary(Dictionary::load_from_str(WORDS)).unwrap();
        assert_eq!(s.solve().unwrap_err(), SolveSkipped::NoBoard);
        assert!(!s.is_solving());
    }
}
