use std::io::BufRead;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use clap::Parser;

use moggle::errors::MoggleError;
use moggle::letters::{variant_by_id, LetterSource};
use moggle::modes::{GameMode, Round};
use moggle::session::{Session, SubmitOutcome};
use moggle::solver::score_word;
use moggle::{Dictionary, Grid};

/// Moggle: a 4x4 word-finding game
#[derive(Parser, Debug)]
#[command(author, version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("GIT_HASH"), ")"), about, long_about = None)]
struct Cli {
    /// Path to the word list (one word per line)
    #[arg(
        short,
        long,
        default_value = concat!(env!("CARGO_MANIFEST_DIR"), "/data/words.txt")
    )]
    dictionary: PathBuf,

    /// Game mode: random, official, longest or variant
    #[arg(short, long, default_value = "random")]
    mode: GameMode,

    /// Seed string to replay (overrides --mode), e.g. "moggle|official|2024-01-01 10:05Z"
    #[arg(short, long)]
    seed: Option<String>,

    /// Letter source by variant id (classic, big-bag, vowel-storm, centre-vowels)
    #[arg(long, conflicts_with = "letters")]
    variant: Option<String>,

    /// Letter-source configuration file (JSON)
    #[arg(long)]
    letters: Option<PathBuf>,

    /// Play this board instead of generating one, e.g. "TAPE/RSLN/OIDM/CHUG"
    #[arg(short, long, conflicts_with_all = ["seed", "variant", "letters"])]
    grid: Option<String>,

    /// Words already found, comma-separated
    #[arg(short, long, value_delimiter = ',')]
    found: Vec<String>,

    /// Read words from stdin, one per line, until EOF
    #[arg(short, long)]
    play: bool,

    /// List every solution, not just the missed ones
    #[arg(short = 'a', long)]
    show_all: bool,
}

/// Entry point of the Moggle CLI.
///
/// Delegates to [`try_main`], printing any error with its code and help text before
/// exiting with code 1.
fn main() -> ExitCode {
    let debug_enabled = std::env::var("MOGGLE_DEBUG").is_ok();
    moggle::log::init_logger(debug_enabled);

    if let Err(e) = try_main() {
        eprintln!("Error: {}", e.display_detailed());
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// Core application logic.
///
/// Steps:
/// 1. Load the dictionary. A failure is reported but the board is still shown.
/// 2. Start a round: a given grid, a replayed seed, or a fresh seed for the mode.
/// 3. Submit the `--found` words, then stdin words with `--play`.
/// 4. End the round, solve, and print results and missed (or all) words.
fn try_main() -> Result<(), MoggleError> {
    let cli = Cli::parse();
    let mut session = Session::new();

    let t_load = Instant::now();
    match session.load_dictionary(Dictionary::load_from_path(&cli.dictionary)) {
        Ok(count) => eprintln!("Loaded {count} words in {:.3}s.", t_load.elapsed().as_secs_f64()),
        Err(e) => eprintln!("Warning: {}\nWord checking and solving are disabled.", e.display_detailed()),
    }

    if let Some(text) = &cli.grid {
        session.start_with_grid(cli.mode, Grid::parse(text)?);
    } else {
        let mut round = match &cli.seed {
            Some(seed) => Round::from_seed(seed)?,
            None => Round::for_mode(cli.mode, now_ms(), [rand::random(), rand::random()]),
        };
        let source = if let Some(path) = &cli.letters {
            LetterSource::load_from_path(path)?
        } else {
            if let Some(id) = &cli.variant {
                round.variant = variant_by_id(id)?;
            }
            round.variant.source()
        };
        session.start_round(&round, &source)?;
    }

    print_board(&session);

    for word in &cli.found {
        report(&session.submit_word(word));
    }
    if cli.play {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines().map_while(Result::ok) {
            if line.trim().is_empty() {
                continue;
            }
            report(&session.submit_word(&line));
        }
    }

    let t_solve = Instant::now();
    match session.end_round() {
        Ok(solutions) => {
            let solve_secs = t_solve.elapsed().as_secs_f64();
            let listed = if cli.show_all { &solutions.all } else { &solutions.missed };
            println!();
            println!("{} ({}):", if cli.show_all { "All words" } else { "Missed" }, listed.len());
            for word in listed {
                println!("{:>3}  {word}", score_word(word.len()));
            }
            eprintln!("Solved in {solve_secs:.3}s ({} words on the board).", solutions.all.len());
        }
        Err(reason) => eprintln!("Not solved: {reason}."),
    }

    if let Some(text) = session.results_text() {
        println!();
        println!("{text}");
    }
    Ok(())
}

fn print_board(session: &Session) {
    if let Some(label) = session.label() {
        println!("{label}");
    }
    if let Some(seed) = session.seed() {
        println!("Seed: {seed}");
    }
    if let Some(grid) = session.grid() {
        println!();
        println!("{grid}");
        println!();
    }
}

fn report(outcome: &SubmitOutcome) {
    match outcome {
        SubmitOutcome::Accepted { word, points } => println!("+{points}  {word}  {}", outcome.message()),
        SubmitOutcome::Rejected { word, .. } => println!("    {word}  {}", outcome.message()),
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
}
