//! Minimax with a one-sided bound handed down from the parent.
//!
//! A node stops scanning as soon as its running result is strictly worse for
//! the parent than what the parent already holds. This prunes less than
//! alpha-beta but never changes the root score.

use crate::game_state::board::Board;
use crate::game_state::chess_types::Color;
use crate::moves::chess_move::Move;
use crate::search::search_context::{SearchContext, SCORE_INFINITY};

pub const MIN_DEPTH: u8 = 2;
pub const MAX_DEPTH: u8 = 5;
pub const DEFAULT_DEPTH: u8 = 4;

pub fn search(ctx: &mut SearchContext, board: &Board) -> (Move, i32) {
    let root = board.side_to_move();
    let depth = ctx.depth();
    ctx.search_root(board, |ctx, child, best| {
        enhanced_minimax(ctx, child, depth - 1, root, best)
    })
}

/// Score of `board` for `root`. `bound` is the parent's best result so far.
pub fn enhanced_minimax(ctx: &mut SearchContext, board: &Board, depth: u8, root: Color, bound: i32) -> i32 {
    if depth == 0 {
        return ctx.leaf_score_for(board, root);
    }

    let moves = ctx.ordered_moves(board);
    if moves.is_empty() {
        return ctx.leaf_score_for(board, root);
    }

    let maximizing = board.side_to_move() == root;
    let mut best = if maximizing { -SCORE_INFINITY } else { SCORE_INFINITY };
    for mv in moves {
        let child = ctx.child(board, mv);
        let score = enhanced_minimax(ctx, &child, depth - 1, root, best);
        if maximizing {
            best = best.max(score);
            if best > bound {
                break;
            }
        } else {
            best = best.min(score);
            if best < bound {
                break;
            }
        }
    }
    best
}
