//! Negamax search with alpha-beta pruning.
//!
//! Scores are always from the side to move. A node stops once its alpha rises
//! strictly above beta, and the move that caused the cutoff is handed to the
//! move sorter when it records cutoffs.

use crate::game_state::board::Board;
use crate::moves::chess_move::Move;
use crate::search::search_context::{SearchContext, SCORE_INFINITY};

pub const MIN_DEPTH: u8 = 3;
pub const MAX_DEPTH: u8 = 6;
pub const DEFAULT_DEPTH: u8 = 5;

pub fn search(ctx: &mut SearchContext, board: &Board) -> (Move, i32) {
    let depth = ctx.depth();
    ctx.search_root(board, |ctx, child, best| {
        -alpha_beta(ctx, child, depth - 1, -SCORE_INFINITY, -best)
    })
}

pub fn alpha_beta(ctx: &mut SearchContext, board: &Board, depth: u8, mut alpha: i32, beta: i32) -> i32 {
    if depth == 0 {
        return ctx.leaf_score(board);
    }

    let moves = ctx.ordered_moves(board);
    if moves.is_empty() {
        return ctx.leaf_score(board);
    }

    let mut best = -SCORE_INFINITY;
    for mv in moves {
        let child = ctx.child(board, mv);
        let score = -alpha_beta(ctx, &child, depth - 1, -beta, -alpha);
        best = best.max(score);
        alpha = alpha.max(score);
        if alpha > beta {
            ctx.record_cutoff(mv);
            break;
        }
    }
    best
}
