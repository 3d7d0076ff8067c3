//! `bench_local.rs` — quick local timing runner for the solver (no Criterion)
//!
//! PURPOSE
//! -------
//! - Fast, ad-hoc timing of full-board solves on *your* machine.
//! - Loads the word list once, generates a fixed set of seeded boards per variant, then
//!   solves every board several times and reports the median.
//!
//! HOW TO RUN
//! ----------
//! - Optimized build:                `cargo run --bin bench_local --release`
//! - Multiple repeats:               `cargo run --bin bench_local --release -- -r 5`
//! - More boards per variant:        `cargo run --bin bench_local --release -- -b 1000`
//! - Print the top words per board:  `cargo run --bin bench_local --release -- -p 5`
//!
//! NOTES
//! -----
//! - Not statistically rigorous. Use the same machine and `--release` for comparable numbers.
//! - Board generation and I/O are kept outside the timed section.
//! - One warm-up pass per variant is done (not included in timing).

use clap::Parser;
use std::hint::black_box;
use std::time::Instant;
use moggle::board::generate;
use moggle::letters::VARIANTS;
use moggle::{solver, Dictionary, Grid};

/// Local benchmark runner: load the word list once, time solves over seeded boards.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the word list (one word per line)
    #[arg(
        short,
        long,
        default_value = concat!(env!("CARGO_MANIFEST_DIR"), "/data/words.txt")
    )]
    dictionary: String,

    /// Boards generated per variant
    #[arg(short = 'b', long = "boards", default_value_t = 200)]
    num_boards: usize,

    /// Number of repeats per variant (use >1 to reduce noise; median is reported)
    #[arg(short = 'r', long = "repeats", default_value_t = 1)]
    num_repeats: usize,

    /// Print up to this many words for the first board of each variant (0 = none)
    #[arg(short = 'p', long = "print", default_value_t = 0)]
    print_limit: usize,
}

/// Small helper: robust central tendency for small samples.
fn median(mut xs: Vec<f64>) -> f64 {
    if xs.is_empty() {
        return 0.0;
    }
    xs.sort_by(f64::total_cmp);
    let n = xs.len();
    if n % 2 == 1 {
        xs[n / 2]
    } else {
        0.5 * (xs[n / 2 - 1] + xs[n / 2])
    }
}

fn solve_all(boards: &[Grid], dict: &Dictionary) -> usize {
    boards.iter().map(|g| solver::solve(black_box(g), dict).len()).sum()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// One row in the summary: (variant id, median seconds per pass, words found per pass).
    type SummaryRow = (&'static str, f64, usize);

    let cli = Cli::parse();

    // Load the word list once. This I/O is *not* included in timing.
    eprintln!("Loading word list from: {}", cli.dictionary);
    let t_load = Instant::now();
    let dict = Dictionary::load_from_path(&cli.dictionary)?;
    eprintln!("Loaded {} words in {:.3}s", dict.len(), t_load.elapsed().as_secs_f64());

    let mut summary: Vec<SummaryRow> = Vec::with_capacity(VARIANTS.len());

    for (idx, variant) in VARIANTS.iter().enumerate() {
        eprintln!("\n[{:02}] {} ({} boards)", idx + 1, variant.id, cli.num_boards);

        let source = variant.source();
        let boards = (0..cli.num_boards)
            .map(|i| generate(&format!("bench|{}|{i}", variant.id), &source))
            .collect::<Result<Vec<_>, _>>()?;

        // warm-up, untimed
        let words_per_pass = solve_all(&boards, &dict);

        let mut times = Vec::with_capacity(cli.num_repeats);
        for rep in 0..cli.num_repeats {
            let t_solve = Instant::now();
            let found = solve_all(&boards, &dict);
            let solve_secs = t_solve.elapsed().as_secs_f64();
            black_box(found);
            times.push(solve_secs);
            eprintln!("  run {:>2}/{:>2}: {:.3}s", rep + 1, cli.num_repeats, solve_secs);
        }

        let med = median(times);
        let per_board_ms = if boards.is_empty() { 0.0 } else { med * 1000.0 / boards.len() as f64 };
        eprintln!(
            "  → median {med:.3}s over {} run(s) ({per_board_ms:.3} ms/board); {words_per_pass} {}",
            cli.num_repeats,
            pluralizer(words_per_pass, "word", None)
        );

        if cli.print_limit > 0 {
            if let Some(first) = boards.first() {
                println!("{}", first.to_compact());
                for word in solver::solve(first, &dict).iter().take(cli.print_limit) {
                    println!("  {word}");
                }
            }
        }

        summary.push((variant.id, med, words_per_pass));
    }

    eprintln!("\n==== Summary ====");
    eprintln!("{:<16} | {:>10} | {:>10}", "variant", "median (s)", "# words");
    eprintln!("{:-<16}-+-{:-<10}-+-{:-<10}", "", "", "");
    for (id, med, words) in &summary {
        eprintln!("{id:<16} | {med:>10.3} | {words:>10}");
    }

    Ok(())
}

fn pluralizer(count: usize, singular: &str, plural: Option<&str>) -> String {
    if count == 1 {
        singular.to_string()
    } else {
        plural.map_or_else(|| format!("{singular}s"), ToString::to_string)
    }
}
