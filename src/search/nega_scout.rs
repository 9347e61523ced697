//! Principal variation search (NegaScout) over a transposition table.
//!
//! The first move at a node is searched with the full window and the rest
//! with the null window `[-alpha - 1, -alpha]`; a null-window result that
//! lands inside the real window is searched again with the full window unless
//! fewer than two plies remain. Lines that reach the horizon through a
//! capture, into check, or from a node with at most three moves are searched
//! one ply deeper, once per line. Every node is looked up in the table before
//! it is searched and stored afterwards.

use crate::game_state::board::Board;
use crate::moves::chess_move::Move;
use crate::search::search_context::{SearchContext, SCORE_INFINITY};
use crate::search::transposition_table::TranspositionTable;

pub const MIN_DEPTH: u8 = 3;
pub const MAX_DEPTH: u8 = 6;
pub const DEFAULT_DEPTH: u8 = 5;

/// Nodes with this many legal moves or fewer extend the line at the horizon.
pub const FEW_MOVES: usize = 3;

/// Null-window results are trusted without a re-search this close to the
/// horizon.
pub const RESEARCH_MIN_REMAINING: i32 = 2;

pub fn search(ctx: &mut SearchContext, table: &mut TranspositionTable, board: &Board) -> (Move, i32) {
    let depth = i32::from(ctx.depth());
    ctx.search_root(board, |ctx, child, best| {
        -nega_scout(ctx, table, child, depth - 1, 0, -SCORE_INFINITY, -best)
    })
}

/// Score of `board` for its side to move. The search ends when `depth`
/// reaches `limit`; `limit` is `0` until a line has been extended.
pub fn nega_scout(
    ctx: &mut SearchContext,
    table: &mut TranspositionTable,
    board: &Board,
    depth: i32,
    limit: i32,
    mut alpha: i32,
    beta: i32,
) -> i32 {
    let remaining = (depth - limit).max(0) as u8;
    if let Some(cached) = table.get(board, remaining, alpha, beta) {
        return cached;
    }
    let window_alpha = alpha;

    if remaining == 0 {
        let score = ctx.leaf_score(board);
        table.put(board, 0, window_alpha, beta, score);
        return score;
    }

    let moves = ctx.ordered_moves(board);
    if moves.is_empty() {
        let score = ctx.leaf_score(board);
        table.put(board, remaining, window_alpha, beta, score);
        return score;
    }

    let few_moves = moves.len() <= FEW_MOVES;
    let mut best = -SCORE_INFINITY;
    for (index, mv) in moves.into_iter().enumerate() {
        let child = ctx.child(board, mv);
        let child_limit = horizon_limit(depth - 1, limit, few_moves, mv.is_capture(), &child);

        let score = if index == 0 {
            -nega_scout(ctx, table, &child, depth - 1, child_limit, -beta, -alpha)
        } else {
            let scout = -nega_scout(ctx, table, &child, depth - 1, child_limit, -alpha - 1, -alpha);
            let child_remaining = depth - 1 - child_limit;
            if scout > alpha && scout < beta && child_remaining >= RESEARCH_MIN_REMAINING {
                ctx.stats.researches += 1;
                -nega_scout(ctx, table, &child, depth - 1, child_limit, -beta, -alpha)
            } else {
                scout
            }
        };

        best = best.max(score);
        alpha = alpha.max(score);
        if alpha > beta {
            ctx.record_cutoff(mv);
            break;
        }
    }

    table.put(board, remaining, window_alpha, beta, best);
    best
}

/// Limit for a child searched at `child_depth`. A child that would sit on the
/// unextended horizon is pushed one ply further when the line is sharp.
fn horizon_limit(child_depth: i32, limit: i32, few_moves: bool, capture: bool, child: &Board) -> i32 {
    if limit != 0 || child_depth != limit {
        return limit;
    }
    if few_moves || capture || child.is_in_check(child.side_to_move()) {
        limit - 1
    } else {
        limit
    }
}
