//! Solve a single bimatrix game.
//!
//! Usage:
//!   cargo run --release --bin solve -- [OPTIONS]
//!
//! Examples:
//!   solve --game matching_pennies
//!   solve --file game.json --label 3 --basic
//!   solve --game degenerate_three_by_three --all --output results.json

use std::error::Error;
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use log::{info, LevelFilter};
use serde::Serialize;

use lemke_howson::games::{classic, BimatrixGame};
use lemke_howson::pivot::{Equilibrium, PivotConfig};

#[derive(Parser, Debug)]
#[command(author, version, about = "Lemke-Howson solver for bimatrix games", long_about = None)]
struct Options {
    /// Game JSON file with `row_payoffs` and `col_payoffs`.
    #[arg(short = 'f', long = "file", conflicts_with = "game")]
    file: Option<PathBuf>,

    /// Named classic game.
    #[arg(short = 'g', long = "game")]
    game: Option<String>,

    /// Initial dropped label.
    #[arg(short = 'l', long = "label", default_value = "0")]
    label: usize,

    /// Solve from every label.
    #[arg(short = 'a', long = "all")]
    all: bool,

    /// Use the basic ratio test instead of lexicographic tie-breaking.
    #[arg(short = 'b', long = "basic")]
    basic: bool,

    /// Maximum number of pivots per run.
    #[arg(short = 'm', long = "max-pivots")]
    max_pivots: Option<u64>,

    /// Print every pivot.
    #[arg(short = 't', long = "trace")]
    trace: bool,

    /// Write results as JSON.
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// List the named games and exit.
    #[arg(long = "list")]
    list: bool,

    /// Log level (off, error, warn, info, debug, trace).
    #[arg(short = 'v', long = "log-level", default_value = "warn")]
    log_level: LevelFilter,
}

#[derive(Serialize)]
struct Report<'a> {
    game: Option<&'a str>,
    shape: (usize, usize),
    results: &'a [Equilibrium],
}

fn load_game(options: &Options) -> Result<BimatrixGame, Box<dyn Error>> {
    if let Some(path) = &options.file {
        info!("Loading game from {}", path.display());
        return Ok(BimatrixGame::from_json_file(path)?);
    }

    let name = options.game.as_deref().unwrap_or("matching_pennies");
    classic::by_name(name).ok_or_else(|| {
        format!(
            "unknown game '{}', expected one of: {}",
            name,
            classic::NAMES.join(", ")
        )
        .into()
    })
}

fn format_strategy(strategy: &[f64]) -> String {
    let entries: Vec<String> = strategy.iter().map(|p| format!("{:.4}", p)).collect();
    format!("[{}]", entries.join(", "))
}

fn print_result(game: &BimatrixGame, eq: &Equilibrium, show_trace: bool) {
    let status = if eq.is_valid() {
        "ok".to_string()
    } else {
        format!("{:?}", eq.outcome)
    };
    println!(
        "{:>5} | {:>6} | {:<32} | {:<32} | {}",
        eq.initial_dropped_label,
        eq.stats.pivots,
        format_strategy(&eq.row_strategy),
        format_strategy(&eq.col_strategy),
        status
    );

    if eq.is_valid() {
        let (row_value, col_value) = game.payoffs(&eq.row_strategy, &eq.col_strategy);
        println!("{:>5} | payoffs: row {:.6}, col {:.6}", "", row_value, col_value);
    }

    if show_trace {
        for step in eq.trace.steps() {
            println!(
                "{:>5} |   {} tableau: {} in, {} out (row {}{})",
                "",
                step.side,
                step.entering,
                step.dropped,
                step.pivot_row,
                if step.tie_broken { ", tie-break" } else { "" }
            );
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let options = Options::parse();
    env_logger::Builder::new()
        .filter_level(options.log_level)
        .init();

    if options.list {
        for name in classic::NAMES {
            println!("{}", name);
        }
        return Ok(());
    }

    let game = load_game(&options)?;
    let (m, n) = game.shape();

    let mut config = PivotConfig::new()
        .with_label(options.label)
        .with_lexicographic(!options.basic);
    if let Some(max_pivots) = options.max_pivots {
        config = config.with_max_pivots(max_pivots);
    }

    println!("=================================================");
    println!("  Lemke-Howson: {}", game.name().unwrap_or("unnamed game"));
    println!("=================================================");
    println!("Shape: {}x{} ({} labels)", m, n, game.num_labels());
    println!("Rule: {}", if options.basic { "basic" } else { "lexicographic" });
    println!();

    let start_time = Instant::now();
    let results = if options.all {
        game.lemke_howson_enumeration_with(config)?
    } else {
        vec![game.lemke_howson_with(config)?]
    };
    let elapsed = start_time.elapsed();

    println!(
        "{:>5} | {:>6} | {:<32} | {:<32} | status",
        "label", "pivots", "row strategy", "col strategy"
    );
    println!("{}", "-".repeat(100));
    for eq in &results {
        print_result(&game, eq, options.trace);
    }
    println!();

    let valid = results.iter().filter(|eq| eq.is_valid()).count();
    println!(
        "{} of {} runs reached a valid equilibrium in {:.2?}",
        valid,
        results.len(),
        elapsed
    );

    if let Some(path) = &options.output {
        let report = Report {
            game: game.name(),
            shape: (m, n),
            results: &results,
        };
        let json = serde_json::to_string_pretty(&report)?;
        let mut file = File::create(path)?;
        file.write_all(json.as_bytes())?;
        println!("Results written to {}", path.display());
    }

    Ok(())
}
