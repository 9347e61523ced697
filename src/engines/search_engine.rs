//! The configurable search engine.
//!
//! `SearchEngine` pairs a `SearchContext` with one of the four search
//! algorithms. Each call first asks the opening book, then runs the selected
//! algorithm from the root.

use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::engines::engine_config::{AlgorithmKind, EngineConfig};
use crate::engines::engine_trait::Engine;
use crate::errors::ChessResult;
use crate::game_state::board::Board;
use crate::moves::chess_move::Move;
use crate::search::board_scoring::Heuristic;
use crate::search::move_ordering::MoveSorter;
use crate::search::search_context::SearchContext;
use crate::search::transposition_table::TranspositionTable;
use crate::search::{alpha_beta, enhanced_minimax, minimax, nega_scout};
use crate::tables::opening_book::OpeningBook;

pub enum SearchAlgorithm {
    MiniMax,
    EnhancedMiniMax,
    AlphaBeta,
    NegaScout(TranspositionTable),
}

impl SearchAlgorithm {
    pub fn from_kind(kind: AlgorithmKind, hash_capacity: usize) -> Self {
        match kind {
            AlgorithmKind::MiniMax => SearchAlgorithm::MiniMax,
            AlgorithmKind::EnhancedMiniMax => SearchAlgorithm::EnhancedMiniMax,
            AlgorithmKind::AlphaBeta => SearchAlgorithm::AlphaBeta,
            AlgorithmKind::NegaScout => SearchAlgorithm::NegaScout(TranspositionTable::new(hash_capacity)),
        }
    }

    pub fn kind(&self) -> AlgorithmKind {
        match self {
            SearchAlgorithm::MiniMax => AlgorithmKind::MiniMax,
            SearchAlgorithm::EnhancedMiniMax => AlgorithmKind::EnhancedMiniMax,
            SearchAlgorithm::AlphaBeta => AlgorithmKind::AlphaBeta,
            SearchAlgorithm::NegaScout(_) => AlgorithmKind::NegaScout,
        }
    }

    pub fn depth_bounds(&self) -> (u8, u8) {
        self.kind().depth_bounds()
    }

    pub fn default_depth(&self) -> u8 {
        self.kind().default_depth()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOutcome {
    pub best_move: Move,
    /// Root score for the side to move; `None` for book moves.
    pub score: Option<i32>,
    pub from_book: bool,
}

pub struct SearchEngine {
    ctx: SearchContext,
    algorithm: SearchAlgorithm,
    config: EngineConfig,
}

impl SearchEngine {
    /// Engine with the default configuration for `kind`.
    pub fn new(kind: AlgorithmKind) -> Self {
        let config = EngineConfig::with_algorithm(kind);
        Self::build(&config, OpeningBook::shared())
    }

    pub fn from_config(config: &EngineConfig) -> ChessResult<Self> {
        config.validate()?;
        Ok(Self::build(config, OpeningBook::shared()))
    }

    /// Like `from_config`, with an explicit opening book instead of the
    /// process-wide one.
    pub fn with_book(config: &EngineConfig, book: Arc<OpeningBook>) -> ChessResult<Self> {
        config.validate()?;
        Ok(Self::build(config, book))
    }

    fn build(config: &EngineConfig, book: Arc<OpeningBook>) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let mut ctx = SearchContext::new(
            config.algorithm.depth_bounds(),
            config.effective_depth(),
            config.heuristic.build(),
            config.sorter.build(),
            book,
            rng,
        );
        ctx.openings_enabled = config.own_book;

        Self {
            ctx,
            algorithm: SearchAlgorithm::from_kind(config.algorithm, config.hash_capacity),
            config: config.clone(),
        }
    }

    /// Settings the engine was built with, updated by `set_option`.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn algorithm(&self) -> AlgorithmKind {
        self.algorithm.kind()
    }

    pub fn depth_bounds(&self) -> (u8, u8) {
        self.algorithm.depth_bounds()
    }

    pub fn transposition_table(&self) -> Option<&TranspositionTable> {
        match &self.algorithm {
            SearchAlgorithm::NegaScout(table) => Some(table),
            _ => None,
        }
    }

    /// Pick a move for the side to move on `board`.
    ///
    /// # Panics
    /// Panics when the side to move has no legal move.
    pub fn search(&mut self, board: &Board) -> SearchOutcome {
        let started = Instant::now();
        let half_moves_before = self.ctx.stats.half_moves;
        let researches_before = self.ctx.stats.researches;

        let outcome = match self.ctx.book_move(board) {
            Some(best_move) => SearchOutcome {
                best_move,
                score: None,
                from_book: true,
            },
            None => {
                let (best_move, score) = match &mut self.algorithm {
                    SearchAlgorithm::MiniMax => minimax::search(&mut self.ctx, board),
                    SearchAlgorithm::EnhancedMiniMax => enhanced_minimax::search(&mut self.ctx, board),
                    SearchAlgorithm::AlphaBeta => alpha_beta::search(&mut self.ctx, board),
                    SearchAlgorithm::NegaScout(table) => nega_scout::search(&mut self.ctx, table, board),
                };
                SearchOutcome {
                    best_move,
                    score: Some(score),
                    from_book: false,
                }
            }
        };

        let took = started.elapsed();
        self.ctx.stats.elapsed += took;
        log::debug!(
            "{} depth {} chose {} score {:?} book {} half-moves {} re-searches {} in {:?}",
            self.algorithm.kind(),
            self.ctx.depth(),
            outcome.best_move,
            outcome.score,
            outcome.from_book,
            self.ctx.stats.half_moves - half_moves_before,
            self.ctx.stats.researches - researches_before,
            took
        );
        outcome
    }
}

impl Engine for SearchEngine {
    fn name(&self) -> String {
        format!(
            "{} d{} {}/{}",
            self.algorithm.kind(),
            self.ctx.depth(),
            self.ctx.heuristic.name(),
            self.ctx.sorter.name()
        )
    }

    fn new_game(&mut self) {
        self.ctx.sorter.clear();
        if let SearchAlgorithm::NegaScout(table) = &mut self.algorithm {
            table.clear();
        }
    }

    fn set_option(&mut self, name: &str, value: &str) -> ChessResult<()> {
        let mut next = self.config.clone();
        next.set_option(name, value)?;
        if next.algorithm != self.config.algorithm {
            next.depth = None;
        }
        next.validate()?;

        if next.algorithm != self.config.algorithm || next.hash_capacity != self.config.hash_capacity {
            self.algorithm = SearchAlgorithm::from_kind(next.algorithm, next.hash_capacity);
            self.ctx.set_depth_bounds(next.algorithm.depth_bounds());
        }
        self.ctx.set_depth(next.effective_depth());
        if name.trim().eq_ignore_ascii_case("Heuristic") {
            self.ctx.heuristic = next.heuristic.build();
        }
        if name.trim().eq_ignore_ascii_case("Sorter") {
            self.ctx.sorter = next.sorter.build();
        }
        if let (true, Some(seed)) = (name.trim().eq_ignore_ascii_case("Seed"), next.seed) {
            self.ctx.rng = StdRng::seed_from_u64(seed);
        }
        self.ctx.openings_enabled = next.own_book;
        self.config = next;
        Ok(())
    }

    fn choose_move(&mut self, board: &Board) -> Move {
        self.search(board).best_move
    }

    fn search_depth(&self) -> u8 {
        self.ctx.depth()
    }

    fn set_search_depth(&mut self, depth: u8) {
        self.ctx.set_depth(depth);
        self.config.depth = Some(depth);
    }

    fn set_heuristic(&mut self, heuristic: Box<dyn Heuristic>) {
        self.ctx.heuristic = heuristic;
    }

    fn set_move_sorter(&mut self, sorter: Box<dyn MoveSorter>) {
        self.ctx.sorter = sorter;
    }

    fn openings_enabled(&self) -> bool {
        self.ctx.openings_enabled
    }

    fn set_openings_enabled(&mut self, enabled: bool) {
        self.ctx.openings_enabled = enabled;
        self.config.own_book = enabled;
    }

    fn elapsed(&self) -> Duration {
        self.ctx.stats.elapsed
    }

    fn half_moves_evaluated(&self) -> u64 {
        self.ctx.stats.half_moves
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::engine_config::{HeuristicKind, SorterKind};
    use crate::game_state::chess_types::Piece;
    use crate::search::board_scoring::MaterialHeuristic;
    use crate::search::move_ordering::StaticSorter;
    use crate::utils::algebraic::long_algebraic_to_move;
    use crate::utils::fen_parser::parse_fen;

    fn config(algorithm: AlgorithmKind) -> EngineConfig {
        EngineConfig {
            algorithm,
            depth: Some(algorithm.depth_bounds().0),
            own_book: false,
            hash_capacity: 1 << 16,
            seed: Some(7),
            ..EngineConfig::default()
        }
    }

    fn engine(algorithm: AlgorithmKind) -> SearchEngine {
        SearchEngine::with_book(&config(algorithm), Arc::new(OpeningBook::new())).expect("valid config")
    }

    #[test]
    fn every_algorithm_returns_a_legal_move() {
        let position = parse_fen("r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3")
            .expect("FEN should parse");
        let legal = position.valid_moves(position.side_to_move());

        for kind in AlgorithmKind::ALL {
            let mut engine: Box<dyn Engine> = Box::new(engine(kind));
            let mv = engine.choose_move(&position);
            assert!(legal.contains(&mv), "{kind} returned illegal move {mv}");
            assert!(engine.half_moves_evaluated() > 0);
        }
    }

    #[test]
    fn every_algorithm_wins_the_hanging_queen() {
        let position = parse_fen("4k3/8/8/8/8/8/4q3/4KQ2 w - - 0 1").expect("FEN should parse");
        for kind in AlgorithmKind::ALL {
            let mut engine = engine(kind);
            engine.set_heuristic(Box::new(MaterialHeuristic));
            let outcome = engine.search(&position);
            assert_eq!(outcome.best_move.captured, Some(Piece::BLACK_QUEEN));
            assert_eq!(outcome.score, Some(1000), "{kind}");
            assert!(!outcome.from_book);
        }
    }

    #[test]
    fn invalid_depth_in_config_is_an_error() {
        let mut cfg = config(AlgorithmKind::MiniMax);
        cfg.depth = Some(5);
        assert!(SearchEngine::with_book(&cfg, Arc::new(OpeningBook::new())).is_err());
    }

    #[test]
    #[should_panic(expected = "outside 3..=6")]
    fn setting_depth_outside_range_panics() {
        let mut engine = engine(AlgorithmKind::AlphaBeta);
        engine.set_search_depth(2);
    }

    #[test]
    fn book_move_is_played_when_enabled() {
        let start = Board::starting_position();
        let e4 = long_algebraic_to_move("e2e4", &start).expect("legal move");
        let mut book = OpeningBook::new();
        book.insert(start.hash(), [e4.id()]);

        let mut cfg = config(AlgorithmKind::MiniMax);
        cfg.depth = Some(1);
        cfg.heuristic = HeuristicKind::Material;
        cfg.own_book = true;
        let mut engine = SearchEngine::with_book(&cfg, Arc::new(book)).expect("valid config");

        let outcome = engine.search(&start);
        assert_eq!(outcome, SearchOutcome { best_move: e4, score: None, from_book: true });

        engine.set_openings_enabled(false);
        assert!(!engine.openings_enabled());
        let outcome = engine.search(&start);
        assert!(!outcome.from_book);
        assert_eq!(outcome.score, Some(0));
    }

    #[test]
    fn options_reconfigure_a_live_engine() {
        let mut engine = engine(AlgorithmKind::NegaScout);
        assert_eq!(engine.transposition_table().map(|t| t.capacity()), Some(1 << 16));

        engine.set_option("Depth", "4").expect("depth in range");
        assert_eq!(engine.search_depth(), 4);
        assert!(engine.set_option("Depth", "9").is_err());
        assert_eq!(engine.search_depth(), 4);

        engine.set_option("Hash", "1024").expect("valid capacity");
        assert_eq!(engine.transposition_table().map(|t| t.capacity()), Some(1024));
        assert_eq!(engine.search_depth(), 4);

        engine.set_option("Algorithm", "MiniMax").expect("valid algorithm");
        assert_eq!(engine.algorithm(), AlgorithmKind::MiniMax);
        assert_eq!(engine.depth_bounds(), (1, 4));
        assert_eq!(engine.search_depth(), 3);
        assert!(engine.transposition_table().is_none());

        engine.set_option("Heuristic", "Material").expect("valid heuristic");
        engine.set_option("Sorter", "Static").expect("valid sorter");
        assert_eq!(engine.config().heuristic, HeuristicKind::Material);
        assert_eq!(engine.config().sorter, SorterKind::Static);
        assert!(engine.name().contains("Material/Static"));
    }

    #[test]
    fn new_game_clears_the_table() {
        let mut engine = engine(AlgorithmKind::NegaScout);
        engine.set_move_sorter(Box::new(StaticSorter));
        engine.search(&Board::starting_position());
        assert!(engine.transposition_table().is_some_and(|t| !t.is_empty()));

        engine.new_game();
        assert!(engine.transposition_table().is_some_and(|t| t.is_empty()));
    }
}
