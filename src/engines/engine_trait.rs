//! Engine abstraction used by game loops and the match harness.
//!
//! Callers hand an engine a position that still has legal moves and get one
//! of those moves back. Depth, heuristic, move ordering and book use can be
//! changed between calls.

use std::time::Duration;

use crate::errors::ChessResult;
use crate::game_state::board::Board;
use crate::moves::chess_move::Move;
use crate::search::board_scoring::Heuristic;
use crate::search::move_ordering::MoveSorter;

pub trait Engine: Send {
    fn name(&self) -> String;

    /// Reset per-game state such as learned move ordering and cached
    /// positions.
    fn new_game(&mut self) {}

    /// Apply a named option. Unknown names and bad values are errors.
    fn set_option(&mut self, name: &str, value: &str) -> ChessResult<()>;

    /// # Panics
    /// Panics when `board` has no legal move for the side to move.
    fn choose_move(&mut self, board: &Board) -> Move;

    fn search_depth(&self) -> u8;

    /// # Panics
    /// Panics when `depth` lies outside the engine's supported range.
    fn set_search_depth(&mut self, depth: u8);

    fn set_heuristic(&mut self, heuristic: Box<dyn Heuristic>);

    fn set_move_sorter(&mut self, sorter: Box<dyn MoveSorter>);

    fn openings_enabled(&self) -> bool;

    fn set_openings_enabled(&mut self, enabled: bool);

    /// Wall-clock time spent in `choose_move` since construction.
    fn elapsed(&self) -> Duration;

    /// Half-moves played on scratch boards since construction.
    fn half_moves_evaluated(&self) -> u64;
}
