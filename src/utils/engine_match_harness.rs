//! Head-to-head engine match harness for local testing.
//!
//! Runs two `Engine` implementations against each other with an optional
//! seeded random opening prefix, stopping when `game_status` reports a result
//! or the ply limit is reached.

use rand::{rngs::StdRng, Rng, SeedableRng};
use std::time::{Duration, Instant};

use crate::engines::engine_trait::Engine;
use crate::errors::{ChessError, ChessResult};
use crate::game_state::board::Board;
use crate::game_state::chess_types::Color;
use crate::game_state::game_status::{game_status, GameStatus};
use crate::utils::algebraic::move_to_long_algebraic;
use crate::utils::fen_generator::generate_fen;
use crate::utils::render_game_state::render_board;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome {
    WhiteWinCheckmate,
    BlackWinCheckmate,
    DrawStalemate,
    DrawRepetition,
    DrawFiftyMoveRule,
    DrawMaxPlies,
}

impl MatchOutcome {
    /// `None` while the game is still going.
    pub fn from_status(status: GameStatus) -> Option<Self> {
        match status {
            GameStatus::Ongoing => None,
            GameStatus::Checkmate {
                winner: Color::White,
            } => Some(MatchOutcome::WhiteWinCheckmate),
            GameStatus::Checkmate {
                winner: Color::Black,
            } => Some(MatchOutcome::BlackWinCheckmate),
            GameStatus::Stalemate => Some(MatchOutcome::DrawStalemate),
            GameStatus::FiftyMoveRule => Some(MatchOutcome::DrawFiftyMoveRule),
            GameStatus::ThreefoldRepetition => Some(MatchOutcome::DrawRepetition),
        }
    }

    pub fn winner(self) -> Option<Color> {
        match self {
            MatchOutcome::WhiteWinCheckmate => Some(Color::White),
            MatchOutcome::BlackWinCheckmate => Some(Color::Black),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MatchConfig {
    pub max_plies: u16,
    /// Uniformly random legal moves played before the engines take over.
    pub opening_plies: u8,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            max_plies: 200,
            opening_plies: 0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MatchResult {
    pub outcome: MatchOutcome,
    pub final_board: Board,
    pub opening_moves: Vec<String>,
    pub played_moves: Vec<String>,
    pub white_move_count: u32,
    pub black_move_count: u32,
    pub white_time: Duration,
    pub black_time: Duration,
}

/// Play a seeded match from the starting position.
///
/// `engine_white` is White, `engine_black` is Black.
pub fn play_engine_match(
    engine_white: &mut dyn Engine,
    engine_black: &mut dyn Engine,
    seed: u64,
    config: &MatchConfig,
) -> ChessResult<MatchResult> {
    play_engine_match_from_board(
        Board::starting_position(),
        engine_white,
        engine_black,
        seed,
        config,
    )
}

/// Play a seeded match from `start`. Both engines share one trait-object
/// lifetime so either can be picked as the mover.
pub fn play_engine_match_from_board<'e>(
    start: Board,
    engine_white: &mut (dyn Engine + 'e),
    engine_black: &mut (dyn Engine + 'e),
    seed: u64,
    config: &MatchConfig,
) -> ChessResult<MatchResult> {
    engine_white.new_game();
    engine_black.new_game();

    let mut history = Vec::new();
    let (mut board, opening_moves) =
        apply_seeded_random_opening(start, &mut history, seed, config.opening_plies);

    let mut played_moves = Vec::new();
    let mut white_move_count = 0u32;
    let mut black_move_count = 0u32;
    let mut white_time = Duration::ZERO;
    let mut black_time = Duration::ZERO;
    let mut plies = 0u16;

    let outcome = loop {
        if let Some(outcome) = MatchOutcome::from_status(game_status(&board, &history)) {
            break outcome;
        }
        if plies >= config.max_plies {
            break MatchOutcome::DrawMaxPlies;
        }

        let mover = board.side_to_move();
        let engine = match mover {
            Color::White => &mut *engine_white,
            Color::Black => &mut *engine_black,
        };
        let started = Instant::now();
        let chosen = engine.choose_move(&board);
        let spent = started.elapsed();

        if !board.valid_moves(mover).contains(&chosen) {
            return Err(ChessError::IllegalMove {
                engine: engine.name(),
                mv: move_to_long_algebraic(chosen),
            });
        }

        match mover {
            Color::White => {
                white_move_count += 1;
                white_time += spent;
            }
            Color::Black => {
                black_move_count += 1;
                black_time += spent;
            }
        }

        played_moves.push(move_to_long_algebraic(chosen));
        let next = board.derive(chosen, true);
        history.push(std::mem::replace(&mut board, next));
        plies += 1;
    };

    log::debug!(
        "match finished: {:?} after {} plies ({} opening), final FEN {}\n{}",
        outcome,
        played_moves.len(),
        opening_moves.len(),
        generate_fen(&board),
        render_board(&board)
    );

    Ok(MatchResult {
        outcome,
        final_board: board,
        opening_moves,
        played_moves,
        white_move_count,
        black_move_count,
        white_time,
        black_time,
    })
}

fn apply_seeded_random_opening(
    start: Board,
    history: &mut Vec<Board>,
    seed: u64,
    plies: u8,
) -> (Board, Vec<String>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut board = start;
    let mut moves = Vec::new();

    for _ in 0..plies {
        let legal = board.valid_moves(board.side_to_move());
        if legal.is_empty() {
            break;
        }
        let chosen = legal[rng.random_range(0..legal.len())];
        moves.push(move_to_long_algebraic(chosen));
        let next = board.derive(chosen, true);
        history.push(std::mem::replace(&mut board, next));
    }

    (board, moves)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerId {
    Player1,
    Player2,
}

#[derive(Debug, Clone)]
pub struct MatchSeriesConfig {
    pub games: u16,
    pub base_seed: u64,
    pub per_game: MatchConfig,
}

impl Default for MatchSeriesConfig {
    fn default() -> Self {
        Self {
            games: 10,
            base_seed: 0,
            per_game: MatchConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MatchSeriesStats {
    pub games: u16,
    pub player1_wins: u16,
    pub player2_wins: u16,
    pub draws: u16,
    pub outcomes: Vec<MatchOutcome>,
    pub player1_moves: u32,
    pub player2_moves: u32,
    pub player1_time: Duration,
    pub player2_time: Duration,
}

impl MatchSeriesStats {
    pub fn player1_avg_move_ms(&self) -> f64 {
        avg_move_ms(self.player1_time, self.player1_moves)
    }

    pub fn player2_avg_move_ms(&self) -> f64 {
        avg_move_ms(self.player2_time, self.player2_moves)
    }

    pub fn report(&self) -> String {
        format!(
            "games={} player1_wins={} player2_wins={} draws={} p1_avg_ms={:.3} p2_avg_ms={:.3}",
            self.games,
            self.player1_wins,
            self.player2_wins,
            self.draws,
            self.player1_avg_move_ms(),
            self.player2_avg_move_ms()
        )
    }
}

#[inline]
fn avg_move_ms(total: Duration, moves: u32) -> f64 {
    if moves == 0 {
        0.0
    } else {
        total.as_secs_f64() * 1000.0 / f64::from(moves)
    }
}

/// Play a series of matches and aggregate win/loss/draw statistics.
///
/// Player 1 takes White in even-numbered games and Black in odd ones. Game
/// `i` uses seed `base_seed + i` for its random opening.
pub fn play_engine_match_series(
    player1: &mut dyn Engine,
    player2: &mut dyn Engine,
    config: &MatchSeriesConfig,
) -> ChessResult<MatchSeriesStats> {
    let mut stats = MatchSeriesStats {
        games: config.games,
        ..MatchSeriesStats::default()
    };

    for game in 0..config.games {
        let player1_is_white = game % 2 == 0;
        let seed = config.base_seed.wrapping_add(u64::from(game));

        let result = if player1_is_white {
            play_engine_match(&mut *player1, &mut *player2, seed, &config.per_game)?
        } else {
            play_engine_match(&mut *player2, &mut *player1, seed, &config.per_game)?
        };

        let (p1_color, p1_moves, p1_time, p2_moves, p2_time) = if player1_is_white {
            (
                Color::White,
                result.white_move_count,
                result.white_time,
                result.black_move_count,
                result.black_time,
            )
        } else {
            (
                Color::Black,
                result.black_move_count,
                result.black_time,
                result.white_move_count,
                result.white_time,
            )
        };
        stats.player1_moves += p1_moves;
        stats.player1_time += p1_time;
        stats.player2_moves += p2_moves;
        stats.player2_time += p2_time;

        let winner = result.outcome.winner().map(|color| {
            if color == p1_color {
                PlayerId::Player1
            } else {
                PlayerId::Player2
            }
        });
        match winner {
            Some(PlayerId::Player1) => stats.player1_wins += 1,
            Some(PlayerId::Player2) => stats.player2_wins += 1,
            None => stats.draws += 1,
        }
        stats.outcomes.push(result.outcome);

        log::info!(
            "game {}/{} seed={} player1={:?} result={:?}",
            game + 1,
            config.games,
            seed,
            p1_color,
            result.outcome
        );
    }

    Ok(stats)
}
