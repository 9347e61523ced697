//! Standalone engine-vs-engine series runner.
//!
//! Run with:
//! `cargo run --release --bin engine_match_series`
//! `cargo run --release --bin engine_match_series -- --games 4 --p1 Algorithm=MiniMax --p2 Depth=4`
//!
//! `--p1`/`--p2` take `Name=Value` engine options and may be repeated. Set
//! `RUST_LOG=info` for per-game lines.

use mailbox_chess::engines::engine_config::{AlgorithmKind, EngineConfig};
use mailbox_chess::engines::engine_trait::Engine;
use mailbox_chess::engines::search_engine::SearchEngine;
use mailbox_chess::errors::{ChessError, ChessResult};
use mailbox_chess::tables::opening_book::OpeningBook;
use mailbox_chess::utils::engine_match_harness::{
    play_engine_match_series, MatchConfig, MatchSeriesConfig,
};

fn apply_option(config: &mut EngineConfig, pair: &str) -> ChessResult<()> {
    let (name, value) = pair.split_once('=').ok_or_else(|| ChessError::InvalidOption {
        name: pair.to_owned(),
        value: String::new(),
    })?;
    config.set_option(name.trim(), value.trim())
}

fn parse_number<T: std::str::FromStr>(flag: &str, value: &str) -> ChessResult<T> {
    value.parse().map_err(|_| ChessError::InvalidOption {
        name: flag.to_owned(),
        value: value.to_owned(),
    })
}

fn main() -> ChessResult<()> {
    env_logger::init();
    // Engines built below wait on the shared book if the preload is still running.
    OpeningBook::preload_in_background()?;

    let mut series = MatchSeriesConfig {
        games: 10,
        base_seed: 1234,
        per_game: MatchConfig {
            max_plies: 200,
            opening_plies: 2,
        },
    };
    let mut player1 = EngineConfig::with_algorithm(AlgorithmKind::AlphaBeta);
    let mut player2 = EngineConfig::with_algorithm(AlgorithmKind::NegaScout);

    let args: Vec<String> = std::env::args().collect();
    let mut i = 1usize;
    while i < args.len() {
        let flag = args[i].as_str();
        let value = args.get(i + 1).map(String::as_str).unwrap_or_default();
        match flag {
            "--games" => series.games = parse_number(flag, value)?,
            "--plies" => series.per_game.max_plies = parse_number(flag, value)?,
            "--opening" => series.per_game.opening_plies = parse_number(flag, value)?,
            "--seed" => series.base_seed = parse_number(flag, value)?,
            "--p1" => apply_option(&mut player1, value)?,
            "--p2" => apply_option(&mut player2, value)?,
            other => return Err(ChessError::UnknownOption(other.to_owned())),
        }
        i += 2;
    }

    if player1.seed.is_none() {
        player1.seed = Some(series.base_seed);
    }
    if player2.seed.is_none() {
        player2.seed = Some(series.base_seed.wrapping_add(1));
    }

    let mut engine1 = SearchEngine::from_config(&player1)?;
    let mut engine2 = SearchEngine::from_config(&player2)?;
    println!("player1: {}", engine1.name());
    println!("player2: {}", engine2.name());

    let stats = play_engine_match_series(&mut engine1, &mut engine2, &series)?;

    println!("{}", stats.report());
    println!("outcomes: {:?}", stats.outcomes);
    println!(
        "half-moves evaluated: player1={} player2={}",
        engine1.half_moves_evaluated(),
        engine2.half_moves_evaluated()
    );
    Ok(())
}
