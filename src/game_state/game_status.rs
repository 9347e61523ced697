//! Game-end classification for a position and the boards that led to it.
//!
//! The search never consults this; it exists for game loops such as the match
//! harness, which need to know when to stop asking engines for moves.

use crate::game_state::board::Board;
use crate::game_state::chess_rules::{FIFTY_MOVE_HALF_MOVES, REPETITION_LIMIT};
use crate::game_state::chess_types::Color;
use crate::move_generation::move_generator::MoveGenerator;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    Ongoing,
    Checkmate { winner: Color },
    Stalemate,
    FiftyMoveRule,
    ThreefoldRepetition,
}

impl GameStatus {
    pub const fn is_over(self) -> bool {
        !matches!(self, GameStatus::Ongoing)
    }

    pub const fn is_draw(self) -> bool {
        matches!(
            self,
            GameStatus::Stalemate | GameStatus::FiftyMoveRule | GameStatus::ThreefoldRepetition
        )
    }
}

/// Classify `board`. `history` holds the earlier boards of the game, oldest
/// first, and must not include `board` itself.
pub fn game_status(board: &Board, history: &[Board]) -> GameStatus {
    let mover = board.side_to_move();
    if !MoveGenerator::new().has_valid_move(board, mover) {
        return if board.is_in_check(mover) {
            GameStatus::Checkmate {
                winner: mover.opposite(),
            }
        } else {
            GameStatus::Stalemate
        };
    }

    if board.half_move_clock() >= FIFTY_MOVE_HALF_MOVES {
        return GameStatus::FiftyMoveRule;
    }

    if repetition_count(board, history) >= REPETITION_LIMIT {
        return GameStatus::ThreefoldRepetition;
    }

    GameStatus::Ongoing
}

/// Occurrences of `board`: itself plus every equal position in `history`,
/// which holds only the boards played before it.
pub fn repetition_count(board: &Board, history: &[Board]) -> usize {
    1 + history
        .iter()
        .filter(|past| past.hash() == board.hash() && *past == board)
        .count()
}
