//! Floor duel playout simulator.
//!
//! Plays seeded games with random adjudication and reports who took the
//! floor. Useful for soak-testing the engine on large boards.

use std::process::ExitCode;

use clap::Parser;
use floor_duel::categories::CategoryCatalog;
use floor_duel::core::GameConfig;
use floor_duel::sim::{Playout, PlayoutConfig, PlayoutSummary};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "floor-sim")]
#[command(about = "Run random-adjudication playouts of the floor duel game", long_about = None)]
struct Args {
    /// Board rows
    #[arg(short, long, default_value = "3")]
    rows: u32,

    /// Board columns
    #[arg(short, long, default_value = "3")]
    cols: u32,

    /// Number of games to play
    #[arg(short, long, default_value = "1")]
    games: usize,

    /// Base seed; game N uses seed + N
    #[arg(short, long, default_value = "42")]
    seed: u64,

    /// Give up on a game after this many turns
    #[arg(long, default_value = "10000")]
    max_turns: usize,

    /// Probability that the challenger wins a duel
    #[arg(long, default_value = "0.5")]
    win_rate: f64,

    /// Comma-separated category names
    #[arg(long, default_value = "History,Science,Geography,Art,Music,Sports")]
    categories: String,

    /// Verbose output (overridden by RUST_LOG)
    #[arg(short, long)]
    verbose: bool,

    /// Print one JSON summary per game instead of log lines
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut catalog = CategoryCatalog::new();
    catalog.extend_from_csv(&args.categories);
    info!(
        rows = args.rows,
        cols = args.cols,
        games = args.games,
        categories = catalog.len(),
        "floor-sim starting"
    );

    let mut finished = 0;
    let mut total_turns = 0;

    for offset in 0..args.games {
        let seed = args.seed.wrapping_add(offset as u64);
        let game_config = GameConfig::new(args.rows, args.cols).with_seed(seed);
        let playout_config = PlayoutConfig::new()
            .with_max_turns(args.max_turns)
            .with_challenger_win_rate(args.win_rate)
            .with_seed(seed);

        let summary = match Playout::new(playout_config, &catalog).run_new(&game_config) {
            Ok((_, summary)) => summary,
            Err(err) => {
                error!(seed, %err, "playout failed");
                return ExitCode::FAILURE;
            }
        };

        total_turns += summary.turns;
        if summary.winner.is_some() {
            finished += 1;
        }
        report(seed, &summary, args.json);
    }

    info!(
        finished,
        games = args.games,
        avg_turns = total_turns as f64 / args.games.max(1) as f64,
        "floor-sim done"
    );
    ExitCode::SUCCESS
}

fn report(seed: u64, summary: &PlayoutSummary, json: bool) {
    if json {
        match serde_json::to_string(summary) {
            Ok(line) => println!("{}", line),
            Err(err) => error!(seed, %err, "could not encode summary"),
        }
        return;
    }

    match summary.winner {
        Some(winner) => info!(seed, %winner, turns = summary.turns, duels = summary.duels, "game won"),
        None => info!(seed, turns = summary.turns, "turn limit reached"),
    }
}
