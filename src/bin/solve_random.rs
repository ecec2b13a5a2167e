//! Batch solver for random bimatrix games.
//!
//! Generates a batch of seeded random games, runs Lemke-Howson from every
//! label of every game in parallel and reports how many runs reached a
//! valid equilibrium under each pivot rule.
//!
//! Usage:
//!   cargo run --release --bin solve_random -- --games 500 --rows 6 --cols 6

use std::error::Error;
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn, LevelFilter};
use rayon::prelude::*;
use serde::Serialize;

use lemke_howson::games::{random_games, BimatrixGame, RandomGameConfig};
use lemke_howson::pivot::{Outcome, PivotConfig};

#[derive(Parser, Debug)]
#[command(author, version, about = "Solve batches of random bimatrix games", long_about = None)]
struct Options {
    /// Number of games.
    #[arg(short = 'n', long = "games", default_value = "100")]
    games: usize,

    /// Row strategies per game.
    #[arg(short = 'r', long = "rows", default_value = "4")]
    rows: usize,

    /// Column strategies per game.
    #[arg(short = 'c', long = "cols", default_value = "4")]
    cols: usize,

    /// Lower payoff bound.
    #[arg(long = "low", default_value = "-5.0", allow_hyphen_values = true)]
    low: f64,

    /// Upper payoff bound.
    #[arg(long = "high", default_value = "5.0", allow_hyphen_values = true)]
    high: f64,

    /// Draw integer payoffs (produces degenerate games).
    #[arg(short = 'i', long = "integer")]
    integer: bool,

    /// Random seed.
    #[arg(short = 's', long = "seed", default_value = "42")]
    seed: u64,

    /// Number of threads (0 = auto).
    #[arg(short = 't', long = "threads", default_value = "0")]
    threads: usize,

    /// Output file.
    #[arg(short = 'o', long = "output", default_value = "random_results.json")]
    output: PathBuf,

    /// Log level (off, error, warn, info, debug, trace).
    #[arg(short = 'v', long = "log-level", default_value = "error")]
    log_level: LevelFilter,
}

/// Per-rule tallies over a batch.
#[derive(Debug, Clone, Default, Serialize)]
struct RuleSummary {
    runs: usize,
    valid: usize,
    malformed: usize,
    not_probability: usize,
    interrupted: usize,
    total_pivots: u64,
    max_pivots: u64,
}

impl RuleSummary {
    fn merge(mut self, other: RuleSummary) -> RuleSummary {
        self.runs += other.runs;
        self.valid += other.valid;
        self.malformed += other.malformed;
        self.not_probability += other.not_probability;
        self.interrupted += other.interrupted;
        self.total_pivots += other.total_pivots;
        self.max_pivots = self.max_pivots.max(other.max_pivots);
        self
    }
}

#[derive(Debug, Serialize)]
struct GameResult {
    name: String,
    distinct_equilibria: usize,
    lexicographic: RuleSummary,
    basic: RuleSummary,
}

#[derive(Serialize)]
struct BatchSummary<'a> {
    config: &'a RandomGameConfig,
    elapsed_seconds: f64,
    lexicographic: RuleSummary,
    basic: RuleSummary,
    games: Vec<GameResult>,
}

fn summarize(game: &BimatrixGame, config: PivotConfig) -> Result<RuleSummary, Box<dyn Error + Send + Sync>> {
    let mut summary = RuleSummary::default();
    for eq in game.lemke_howson_enumeration_with(config)? {
        summary.runs += 1;
        summary.total_pivots += eq.stats.pivots;
        summary.max_pivots = summary.max_pivots.max(eq.stats.pivots);
        match eq.outcome {
            Outcome::Equilibrium => summary.valid += 1,
            Outcome::Malformed { .. } => summary.malformed += 1,
            Outcome::NotProbability => summary.not_probability += 1,
            Outcome::Stalled { .. } | Outcome::Cycled { .. } | Outcome::PivotLimit { .. } => {
                summary.interrupted += 1
            }
        }
    }
    Ok(summary)
}

fn solve_game(game: &BimatrixGame) -> Result<GameResult, Box<dyn Error + Send + Sync>> {
    let lexicographic = summarize(game, PivotConfig::lexicographic())?;
    let basic = summarize(game, PivotConfig::basic())?;
    Ok(GameResult {
        name: game.name().unwrap_or("unnamed").to_string(),
        distinct_equilibria: game.equilibria(1e-9)?.len(),
        lexicographic,
        basic,
    })
}

fn main() -> Result<(), Box<dyn Error>> {
    let options = Options::parse();
    env_logger::Builder::new()
        .filter_level(options.log_level)
        .init();

    if options.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(options.threads)
            .build_global()?;
    }

    let config = RandomGameConfig::new(options.rows, options.cols)
        .with_range(options.low, options.high)
        .with_integer_payoffs(options.integer)
        .with_seed(options.seed);

    println!("=== Random Game Batch ===");
    println!("Games: {} ({}x{})", options.games, options.rows, options.cols);
    println!(
        "Payoffs: [{}, {}){}",
        options.low,
        options.high,
        if options.integer { ", integer" } else { "" }
    );
    println!("Seed: {}", options.seed);
    println!();

    let games = random_games(&config, options.games)?;
    info!("Generated {} games", games.len());

    let progress = ProgressBar::new(games.len() as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} games ({eta})")?
            .progress_chars("#>-"),
    );

    let start_time = Instant::now();
    let results: Vec<GameResult> = games
        .par_iter()
        .filter_map(|game| {
            let result = solve_game(game);
            progress.inc(1);
            match result {
                Ok(result) => Some(result),
                Err(e) => {
                    warn!("Skipping {}: {}", game.name().unwrap_or("unnamed"), e);
                    None
                }
            }
        })
        .collect();
    progress.finish_and_clear();
    let elapsed = start_time.elapsed().as_secs_f64();

    let (lexicographic, basic) = results.iter().fold(
        (RuleSummary::default(), RuleSummary::default()),
        |(lex, basic), result| {
            (
                lex.merge(result.lexicographic.clone()),
                basic.merge(result.basic.clone()),
            )
        },
    );

    println!("=== Summary ===");
    println!("Total time: {:.2}s", elapsed);
    for (name, summary) in [("lexicographic", &lexicographic), ("basic", &basic)] {
        let avg_pivots = if summary.runs > 0 {
            summary.total_pivots as f64 / summary.runs as f64
        } else {
            0.0
        };
        println!(
            "{:<14} valid {:>6}/{:<6} malformed {:>5} not-probability {:>5} interrupted {:>5} avg pivots {:>6.2} max {:>4}",
            name,
            summary.valid,
            summary.runs,
            summary.malformed,
            summary.not_probability,
            summary.interrupted,
            avg_pivots,
            summary.max_pivots
        );
    }

    let summary = BatchSummary {
        config: &config,
        elapsed_seconds: elapsed,
        lexicographic,
        basic,
        games: results,
    };
    let json = serde_json::to_string_pretty(&summary)?;
    let mut file = File::create(&options.output)?;
    file.write_all(json.as_bytes())?;
    println!("\nResults written to {}", options.output.display());

    Ok(())
}
