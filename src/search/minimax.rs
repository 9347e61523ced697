//! Full-width fixed-depth minimax, scored from the root side's view.

use crate::game_state::board::Board;
use crate::game_state::chess_types::Color;
use crate::moves::chess_move::Move;
use crate::search::search_context::{SearchContext, SCORE_INFINITY};

pub const MIN_DEPTH: u8 = 1;
pub const MAX_DEPTH: u8 = 4;
pub const DEFAULT_DEPTH: u8 = 3;

pub fn search(ctx: &mut SearchContext, board: &Board) -> (Move, i32) {
    let root = board.side_to_move();
    let depth = ctx.depth();
    ctx.search_root(board, |ctx, child, _| minimax(ctx, child, depth - 1, root))
}

/// Score of `board` for `root`, looking `depth` plies ahead.
pub fn minimax(ctx: &mut SearchContext, board: &Board, depth: u8, root: Color) -> i32 {
    if depth == 0 {
        return ctx.leaf_score_for(board, root);
    }

    let mover = board.side_to_move();
    let moves = ctx.generator.valid_moves(board, mover);
    if moves.is_empty() {
        return ctx.leaf_score_for(board, root);
    }

    let maximizing = mover == root;
    let mut best = if maximizing { -SCORE_INFINITY } else { SCORE_INFINITY };
    for mv in moves {
        let child = ctx.child(board, mv);
        let score = minimax(ctx, &child, depth - 1, root);
        best = if maximizing { best.max(score) } else { best.min(score) };
    }
    best
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::game_state::chess_types::Piece;
    use crate::search::board_scoring::{Heuristic, MaterialHeuristic};
    use crate::search::move_ordering::StaticSorter;
    use crate::tables::opening_book::OpeningBook;
    use crate::utils::fen_parser::parse_fen;

    fn context(depth: u8, seed: u64) -> SearchContext {
        SearchContext::new(
            (MIN_DEPTH, MAX_DEPTH),
            depth,
            Box::new(MaterialHeuristic),
            Box::new(StaticSorter),
            Arc::new(OpeningBook::new()),
            StdRng::seed_from_u64(seed),
        )
    }

    #[test]
    fn depth_one_from_start_always_scores_zero() {
        let start = Board::starting_position();
        for seed in 0..8 {
            let mut ctx = context(1, seed);
            let (mv, score) = search(&mut ctx, &start);
            assert_eq!(score, 0);
            assert_eq!(MaterialHeuristic.evaluate(&start.derive(mv, true), true), 0);
        }
    }

    #[test]
    fn takes_the_hanging_queen() {
        let position = parse_fen("4k3/8/8/8/8/8/4q3/4KQ2 w - - 0 1").expect("FEN should parse");
        let mut ctx = context(2, 1);
        let (mv, score) = search(&mut ctx, &position);
        assert_eq!(mv.captured, Some(Piece::BLACK_QUEEN));
        assert_eq!(score, 1000);
    }

    #[test]
    fn counts_every_half_move() {
        let start = Board::starting_position();
        let mut ctx = context(2, 0);
        search(&mut ctx, &start);
        assert_eq!(ctx.stats.half_moves, 20 + 400);
    }
}
