//! Exhaustive word search over a board.
//!
//! [`solve`] starts a depth-first search from each of the 16 cells, walking the
//! dictionary trie in lockstep with the path. A branch dies as soon as the letters so far
//! are not a prefix of any dictionary word, which keeps the search small despite its
//! exponential worst case. Paths are simple: a cell is never reused within one word.
//!
//! # Examples
//!
//! ```
//! use moggle::{solver, Dictionary, Grid};
//!
//! let grid = Grid::parse("TAPE/RSLN/OIDM/CHUG")?;
//! let dict = Dictionary::parse_from_str("tape\npears\nslid\nzebra");
//! let words = solver::solve(&grid, &dict);
//! // PEARS is in the dictionary but its E and A are not adjacent.
//! assert_eq!(words, vec!["SLID", "TAPE"]);
//!
//! let missed = solver::missed(&words, &["tape".to_string()]);
//! assert_eq!(missed, vec!["SLID"]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::cmp::{Ordering, Reverse};
use std::collections::HashSet;

use instant::Instant;
use log::debug;

use crate::adjacency::{are_adjacent, neighbors};
use crate::board::{Grid, CELL_COUNT};
use crate::dictionary::{Cursor, Dictionary, MIN_WORD_LEN};

/// Points for a word of `len` letters: 4→1, 5→2, 6→3, 7→5, 8+→11, shorter→0.
pub fn score_word(len: usize) -> u32 {
    match len {
        4 => 1,
        5 => 2,
        6 => 3,
        7 => 5,
        l if l >= 8 => 11,
        _ => 0,
    }
}

/// Solution order: higher score first, then longer, then alphabetical.
pub fn compare_words(a: &str, b: &str) -> Ordering {
    let key = |w: &str| (Reverse(score_word(w.len())), Reverse(w.len()));
    key(a).cmp(&key(b)).then_with(|| a.cmp(b))
}

/// Sort words into solution order in place.
pub fn sort_words(words: &mut [String]) {
    words.sort_by(|a, b| compare_words(a, b));
}

/// Bitset of visited cells.
#[derive(Debug, Clone, Copy, Default)]
struct Visited(u16);

impl Visited {
    fn contains(self, pos: usize) -> bool {
        self.0 & (1 << pos) != 0
    }

    fn with(self, pos: usize) -> Visited {
        Visited(self.0 | (1 << pos))
    }
}

struct Search<'a> {
    grid: &'a Grid,
    dict: &'a Dictionary,
    word: Vec<u8>,
    found: HashSet<String>,
}

impl Search<'_> {
    fn dfs(&mut self, pos: usize, cursor: Cursor, visited: Visited) {
        let visited = visited.with(pos);

        if self.dict.is_word_end(cursor) && self.word.len() >= MIN_WORD_LEN {
            // bytes are uppercase ASCII pushed from tiles
            self.found.insert(String::from_utf8_lossy(&self.word).into_owned());
        }

        for &nb in neighbors(pos) {
            if visited.contains(nb) {
                continue;
            }
            let tile = self.grid.tile(nb);
            let Some(next) = self.dict.advance(cursor, tile.trie_bytes()) else {
                continue;
            };
            let len = self.word.len();
            self.word.extend_from_slice(tile.as_str().as_bytes());
            self.dfs(nb, next, visited);
            self.word.truncate(len);
        }
    }
}

/// Every dictionary word that can be traced on `grid`, uppercase, in solution order.
#[must_use]
pub fn solve(grid: &Grid, dict: &Dictionary) -> Vec<String> {
    let t_solve = Instant::now();
    let mut search = Search {
        grid,
        dict,
        word: Vec::with_capacity(2 * CELL_COUNT),
        found: HashSet::new(),
    };

    for start in 0..CELL_COUNT {
        let tile = grid.tile(start);
        let Some(cursor) = dict.advance(dict.root(), tile.trie_bytes()) else {
            continue;
        };
        search.word.clear();
        search.word.extend_from_slice(tile.as_str().as_bytes());
        search.dfs(start, cursor, Visited::default());
    }

    let mut words: Vec<String> = search.found.into_iter().collect();
    sort_words(&mut words);
    debug!("Solved {} in {:.3}s: {} words", grid.to_compact(), t_solve.elapsed().as_secs_f64(), words.len());
    words
}

/// The solutions the player did not find (case-insensitive), keeping solution order.
#[must_use]
pub fn missed(all: &[String], found: &[String]) -> Vec<String> {
    let found: HashSet<String> = found.iter().map(|w| w.to_ascii_uppercase()).collect();
    all.iter().filter(|w| !found.contains(&w.to_ascii_uppercase())).cloned().collect()
}

/// Find a simple adjacent path spelling `word` on `grid` (a `QU` cell matches "QU").
#[must_use]
pub fn trace_word(grid: &Grid, word: &str) -> Option<Vec<usize>> {
    fn walk(grid: &Grid, rest: &[u8], pos: usize, visited: Visited, path: &mut Vec<usize>) -> bool {
        let tile = grid.tile(pos).as_str().as_bytes();
        let Some(rest) = rest.strip_prefix(tile) else {
            return false;
        };
        path.push(pos);
        if rest.is_empty() {
            return true;
        }
        let visited = visited.with(pos);
        for &nb in neighbors(pos) {
            if !visited.contains(nb) && walk(grid, rest, nb, visited, path) {
                return true;
            }
        }
        path.pop();
        false
    }

    let upper = word.trim().to_ascii_uppercase();
    if upper.is_empty() {
        return None;
    }
    let mut path = Vec::new();
    (0..CELL_COUNT)
        .any(|start| walk(grid, upper.as_bytes(), start, Visited::default(), &mut path))
        .then_some(path)
}

/// Why a path of cells does not spell a word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    Empty,
    OffBoard(usize),
    NotAdjacent(usize, usize),
    Revisited(usize),
}

/// Spell the word along `path`, checking bounds, adjacency and no-reuse.
///
/// # Errors
///
/// A [`PathError`] describing the first problem along the path.
pub fn spell_path(grid: &Grid, path: &[usize]) -> Result<String, PathError> {
    if path.is_empty() {
        return Err(PathError::Empty);
    }
    let mut visited = Visited::default();
    let mut word = String::with_capacity(path.len() + 1);
    for (i, &pos) in path.iter().enumerate() {
        if pos >= CELL_COUNT {
            return Err(PathError::OffBoard(pos));
        }
        if visited.contains(pos) {
            return Err(PathError::Revisited(pos));
        }
        if i > 0 && !are_adjacent(path[i - 1], pos) {
            return Err(PathError::NotAdjacent(path[i - 1], pos));
        }
        visited = visited.with(pos);
        word.push_str(grid.tile(pos).as_str());
    }
    Ok(word)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(s: &str) -> Grid {
        Grid::parse(s).unwrap()
    }

    fn strings(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| (*w).to_string()).collect()
    }

    #[test]
    fn test_score_tiers() {
        let scores: Vec<u32> = (0..=10).map(score_word).collect();
        assert_eq!(scores, vec![0, 0, 0, 0, 1, 2, 3, 5, 11, 11, 11]);
    }

    #[test]
    fn test_sort_order() {
        let mut words = strings(&["ABCD", "ABCDE", "ABCDEFGH", "ABCE"]);
        sort_words(&mut words);
        assert_eq!(words, strings(&["ABCDEFGH", "ABCDE", "ABCD", "ABCE"]));
    }

    #[test]
    fn test_sort_length_breaks_score_ties() {
        let mut words = strings(&["ABCDEFGH", "ABCDEFGHIJ", "ABCDEFGHI"]);
        sort_words(&mut words);
        assert_eq!(words, strings(&["ABCDEFGHIJ", "ABCDEFGHI", "ABCDEFGH"]));
    }

    #[test]
    fn test_solve_small_dictionary() {
        let g = grid("TAPE/RSLN/OIDM/CHUG");
        let dict = Dictionary::parse_from_str("tape\npears\nslid\nzebra\ntapes");
        // PEARS is a word but E(3) and A(1) do not touch
        assert_eq!(solve(&g, &dict), strings(&["SLID", "TAPE"]));
    }

    #[test]
    fn test_solve_qu_tile() {
        // QU I D
        // X  X X X ...
        let g = grid("QUIDX/XXXX/XXXX/XXXX");
        let dict = Dictionary::parse_from_str("quid\nquids\nqid");
        assert_eq!(solve(&g, &dict), strings(&["QUID"]));
    }

    #[test]
    fn test_solve_qu_prunes_without_u_edge() {
        let g = grid("QUATX/XXXX/XXXX/XXXX");
        let dict = Dictionary::parse_from_str("qatx");
        assert!(solve(&g, &dict).is_empty());
    }

    #[test]
    fn test_solve_no_cell_reuse() {
        // "ABAB" would need to revisit the A and B cells.
        let g = grid("ABXX/XXXX/XXXX/XXXX");
        let dict = Dictionary::parse_from_str("abab\nxxxx");
        assert_eq!(solve(&g, &dict), strings(&["XXXX"]));
    }

    #[test]
    fn test_solve_dedupes_multiple_paths() {
        let g = grid("EEEE/EEEE/EEEE/EEEE");
        let dict = Dictionary::parse_from_str("eeee");
        assert_eq!(solve(&g, &dict), strings(&["EEEE"]));
    }

    #[test]
    fn test_solve_empty_dictionary() {
        let g = grid("TAPE/RSLN/OIDM/CHUG");
        assert!(solve(&g, &Dictionary::default()).is_empty());
    }

    #[test]
    fn test_solve_is_idempotent() {
        let g = grid("TAPE/RSLN/OIDM/CHUG");
        let dict = Dictionary::parse_from_str("tape\npears\nslid\nsnit\nlids\ndims\nhugs");
        assert_eq!(solve(&g, &dict), solve(&g, &dict));
    }

    #[test]
    fn test_missed_case_insensitive() {
        let all = strings(&["PEARS", "SLID", "TAPE"]);
        let found = strings(&["tape", "Slid"]);
        assert_eq!(missed(&all, &found), strings(&["PEARS"]));
        assert_eq!(missed(&all, &[]), all);
    }

    #[test]
    fn test_trace_word() {
        let g = grid("TAPE/RSLN/OIDM/CHUG");
        assert_eq!(trace_word(&g, "tape"), Some(vec![0, 1, 2, 3]));
        assert_eq!(trace_word(&g, "SLID"), Some(vec![5, 6, 9, 10]));
        assert_eq!(trace_word(&g, "TAPET"), None);
        assert_eq!(trace_word(&g, "ZZZZ"), None);
        assert_eq!(trace_word(&g, ""), None);
    }

    #[test]
    fn test_trace_word_qu_consumes_both_letters() {
        let g = grid("QUIDX/XXXX/XXXX/XXXX");
        assert_eq!(trace_word(&g, "quid"), Some(vec![0, 1, 2]));
        assert_eq!(trace_word(&g, "qid"), None);
    }

    #[test]
    fn test_spell_path() {
        let g = grid("QUAPE/RSLN/OIDM/CHUG");
        assert_eq!(spell_path(&g, &[0, 1, 2]), Ok("QUAP".to_string()));
        assert_eq!(spell_path(&g, &[]), Err(PathError::Empty));
        assert_eq!(spell_path(&g, &[0, 16]), Err(PathError::OffBoard(16)));
        assert_eq!(spell_path(&g, &[0, 2]), Err(PathError::NotAdjacent(0, 2)));
        assert_eq!(spell_path(&g, &[0, 1, 0]), Err(PathError::Revisited(0)));
    }
}
