//! State shared by every search algorithm.
//!
//! A `SearchContext` bundles what the algorithms need besides the position:
//! the configured depth and its legal range, the heuristic, the move sorter,
//! the opening book, the tie-break RNG, a move generator and the running
//! statistics. The algorithms themselves are free functions over it.

use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::Rng;

use crate::game_state::board::Board;
use crate::game_state::chess_rules::OPENING_BOOK_MOVE_LIMIT;
use crate::game_state::chess_types::Color;
use crate::move_generation::move_generator::MoveGenerator;
use crate::moves::chess_move::Move;
use crate::search::board_scoring::Heuristic;
use crate::search::move_ordering::MoveSorter;
use crate::tables::opening_book::OpeningBook;

/// Larger than any score a heuristic can produce.
pub const SCORE_INFINITY: i32 = 1_000_000;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub elapsed: Duration,
    pub half_moves: u64,
    /// Full-window re-searches after a null window failed high.
    pub researches: u64,
}

pub struct SearchContext {
    depth: u8,
    min_depth: u8,
    max_depth: u8,
    pub heuristic: Box<dyn Heuristic>,
    pub sorter: Box<dyn MoveSorter>,
    pub openings_enabled: bool,
    pub book: Arc<OpeningBook>,
    pub rng: StdRng,
    pub generator: MoveGenerator,
    pub stats: SearchStats,
}

impl SearchContext {
    pub fn new(
        (min_depth, max_depth): (u8, u8),
        depth: u8,
        heuristic: Box<dyn Heuristic>,
        sorter: Box<dyn MoveSorter>,
        book: Arc<OpeningBook>,
        rng: StdRng,
    ) -> Self {
        let mut ctx = Self {
            depth: min_depth,
            min_depth,
            max_depth,
            heuristic,
            sorter,
            openings_enabled: true,
            book,
            rng,
            generator: MoveGenerator::new(),
            stats: SearchStats::default(),
        };
        ctx.set_depth(depth);
        ctx
    }

    #[inline]
    pub fn depth(&self) -> u8 {
        self.depth
    }

    #[inline]
    pub fn depth_bounds(&self) -> (u8, u8) {
        (self.min_depth, self.max_depth)
    }

    /// # Panics
    /// Panics when `depth` lies outside the algorithm's range.
    pub fn set_depth(&mut self, depth: u8) {
        assert!(
            (self.min_depth..=self.max_depth).contains(&depth),
            "search depth {depth} outside {}..={}",
            self.min_depth,
            self.max_depth
        );
        self.depth = depth;
    }

    /// Switch to another algorithm's depth range, pulling the current depth
    /// into it.
    pub fn set_depth_bounds(&mut self, (min_depth, max_depth): (u8, u8)) {
        assert!(min_depth <= max_depth, "empty depth range {min_depth}..={max_depth}");
        self.min_depth = min_depth;
        self.max_depth = max_depth;
        self.depth = self.depth.clamp(min_depth, max_depth);
    }

    /// Play `mv` on `board`, counting the half-move.
    #[inline]
    pub fn child(&mut self, board: &Board, mv: Move) -> Board {
        self.stats.half_moves += 1;
        board.derive(mv, true)
    }

    /// Static score of `board` for its side to move.
    ///
    /// The heuristic is asked for the view of the side that just moved and the
    /// result negated, so a side to move that is mated sees the mate penalty.
    #[inline]
    pub fn leaf_score(&self, board: &Board) -> i32 {
        -self
            .heuristic
            .evaluate(board, board.side_to_move().opposite().is_white())
    }

    /// Static score of `board` for `color`.
    #[inline]
    pub fn leaf_score_for(&self, board: &Board, color: Color) -> i32 {
        let score = self.leaf_score(board);
        if board.side_to_move() == color {
            score
        } else {
            -score
        }
    }

    /// Legal moves for the side to move, best candidates first.
    pub fn ordered_moves(&mut self, board: &Board) -> Vec<Move> {
        let mut moves = self.generator.valid_moves(board, board.side_to_move());
        self.sorter.sort(&mut moves);
        moves
    }

    /// Tell the sorter about a beta cutoff, if it keeps track of them.
    #[inline]
    pub fn record_cutoff(&mut self, mv: Move) {
        if let Some(recorder) = self.sorter.cutoff_recorder() {
            recorder.record_cutoff(mv);
        }
    }

    /// A book move for `board`, if the book is enabled for this stage of the
    /// game and its candidate is legal here.
    pub fn book_move(&mut self, board: &Board) -> Option<Move> {
        if !self.openings_enabled || board.full_move_number() >= OPENING_BOOK_MOVE_LIMIT {
            return None;
        }

        let id = self.book.choose_candidate(board.hash(), &mut self.rng)?;
        let candidate = Move::from_id(id)?;
        let legal = self.generator.valid_moves(board, board.side_to_move());
        if legal.contains(&candidate) {
            Some(candidate)
        } else {
            log::trace!("discarding book move {candidate} for hash {:#010x}", board.hash());
            None
        }
    }

    /// Root loop shared by every algorithm.
    ///
    /// `evaluate` scores the position after one root move for the root side;
    /// its last argument is the best score found so far. A strictly better
    /// score takes over the best move and an equal one does so with
    /// probability one half.
    ///
    /// # Panics
    /// Panics when the side to move has no legal move.
    pub fn search_root<F>(&mut self, board: &Board, mut evaluate: F) -> (Move, i32)
    where
        F: FnMut(&mut SearchContext, &Board, i32) -> i32,
    {
        let moves = self.ordered_moves(board);
        assert!(!moves.is_empty(), "search called on a position without legal moves");

        let mut best_move = moves[0];
        let mut best_score = -SCORE_INFINITY;
        for mv in moves {
            let child = self.child(board, mv);
            let score = evaluate(self, &child, best_score);
            if score > best_score || (score == best_score && self.rng.random_bool(0.5)) {
                best_move = mv;
                best_score = score;
            }
        }

        (best_move, best_score)
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;
    use crate::game_state::chess_types::{Piece, Square};
    use crate::search::board_scoring::{BoardControlHeuristic, MaterialHeuristic};
    use crate::search::move_ordering::{KillerSorter, StaticSorter};
    use crate::utils::algebraic::long_algebraic_to_move;
    use crate::utils::fen_parser::parse_fen;

    fn context(depth: u8) -> SearchContext {
        SearchContext::new(
            (1, 4),
            depth,
            Box::new(MaterialHeuristic),
            Box::new(StaticSorter),
            Arc::new(OpeningBook::new()),
            StdRng::seed_from_u64(11),
        )
    }

    #[test]
    #[should_panic(expected = "outside 1..=4")]
    fn depth_outside_bounds_panics() {
        let mut ctx = context(2);
        ctx.set_depth(5);
    }

    #[test]
    #[should_panic(expected = "without legal moves")]
    fn root_search_without_moves_panics() {
        let mut ctx = context(1);
        let mated = parse_fen("R5k1/5ppp/8/8/8/8/8/6K1 b - - 0 1").expect("FEN should parse");
        ctx.search_root(&mated, |_, _, _| 0);
    }

    #[test]
    fn root_loop_keeps_strictly_better_move() {
        let mut ctx = context(1);
        let start = Board::starting_position();
        let target = long_algebraic_to_move("g1f3", &start).expect("legal move");
        let (best, score) = ctx.search_root(&start, |_, child, _| {
            if child.piece_at(target.to) == Some(Piece::WHITE_KNIGHT) {
                10
            } else {
                0
            }
        });
        assert_eq!(best, target);
        assert_eq!(score, 10);
        assert_eq!(ctx.stats.half_moves, 20);
    }

    #[test]
    fn all_ties_spread_the_choice_over_several_moves() {
        let start = Board::starting_position();
        let mut chosen = std::collections::HashSet::new();
        for seed in 0..32 {
            let mut ctx = context(1);
            ctx.rng = StdRng::seed_from_u64(seed);
            let (best, _) = ctx.search_root(&start, |_, _, _| 0);
            chosen.insert(best);
        }
        assert!(chosen.len() > 1, "tie-break should not always keep the same move");
    }

    #[test]
    fn leaf_score_sees_mate_for_side_to_move() {
        let mut ctx = context(1);
        ctx.heuristic = Box::new(BoardControlHeuristic);
        let mated = parse_fen("R5k1/5ppp/8/8/8/8/8/6K1 b - - 0 20").expect("FEN should parse");
        assert!(ctx.leaf_score(&mated) < -50_000);
    }

    #[test]
    fn cutoffs_reach_recording_sorters_only() {
        let mut ctx = context(1);
        let start = Board::starting_position();
        let mv = long_algebraic_to_move("e2e4", &start).expect("legal move");
        ctx.record_cutoff(mv);

        ctx.sorter = Box::new(KillerSorter::new());
        ctx.record_cutoff(mv);
        let moves = ctx.ordered_moves(&start);
        assert_eq!(moves[0], mv);
    }

    #[test]
    fn book_move_is_validated_and_gated() {
        let start = Board::starting_position();
        let e4 = long_algebraic_to_move("e2e4", &start).expect("legal move");
        let bogus = Move::quiet(Piece::WHITE_QUEEN, Square::D1, Square::D8);

        let mut book = OpeningBook::new();
        book.insert(start.hash(), [e4.id()]);
        let mut ctx = context(1);
        ctx.book = Arc::new(book);
        assert_eq!(ctx.book_move(&start), Some(e4));

        ctx.openings_enabled = false;
        assert_eq!(ctx.book_move(&start), None);
        ctx.openings_enabled = true;

        let late = parse_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 20")
            .expect("FEN should parse");
        assert_eq!(late.hash(), start.hash());
        assert_eq!(ctx.book_move(&late), None, "book is only used before move 20");

        let mut colliding = OpeningBook::new();
        colliding.insert(start.hash(), [bogus.id()]);
        ctx.book = Arc::new(colliding);
        assert_eq!(ctx.book_move(&start), None, "illegal book move is discarded");
    }
}
