//! Engine configuration and its named-option interface.
//!
//! `EngineConfig` is a plain value with defaults; `set_option` accepts the
//! case-insensitive names `Algorithm`, `Depth`, `Heuristic`, `Sorter`,
//! `OwnBook`, `Hash` and `Seed` so front ends can configure engines from
//! text.

use std::fmt;

use crate::errors::{ChessError, ChessResult};
use crate::search::board_scoring::{BoardControlHeuristic, Heuristic, MaterialHeuristic};
use crate::search::move_ordering::{HistorySorter, KillerSorter, MoveSorter, StaticSorter};
use crate::search::transposition_table::DEFAULT_CAPACITY;
use crate::search::{alpha_beta, enhanced_minimax, minimax, nega_scout};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlgorithmKind {
    MiniMax,
    EnhancedMiniMax,
    AlphaBeta,
    NegaScout,
}

impl AlgorithmKind {
    pub const ALL: [AlgorithmKind; 4] = [
        AlgorithmKind::MiniMax,
        AlgorithmKind::EnhancedMiniMax,
        AlgorithmKind::AlphaBeta,
        AlgorithmKind::NegaScout,
    ];

    /// Inclusive `(min, max)` search depth.
    pub const fn depth_bounds(self) -> (u8, u8) {
        match self {
            AlgorithmKind::MiniMax => (minimax::MIN_DEPTH, minimax::MAX_DEPTH),
            AlgorithmKind::EnhancedMiniMax => (enhanced_minimax::MIN_DEPTH, enhanced_minimax::MAX_DEPTH),
            AlgorithmKind::AlphaBeta => (alpha_beta::MIN_DEPTH, alpha_beta::MAX_DEPTH),
            AlgorithmKind::NegaScout => (nega_scout::MIN_DEPTH, nega_scout::MAX_DEPTH),
        }
    }

    pub const fn default_depth(self) -> u8 {
        match self {
            AlgorithmKind::MiniMax => minimax::DEFAULT_DEPTH,
            AlgorithmKind::EnhancedMiniMax => enhanced_minimax::DEFAULT_DEPTH,
            AlgorithmKind::AlphaBeta => alpha_beta::DEFAULT_DEPTH,
            AlgorithmKind::NegaScout => nega_scout::DEFAULT_DEPTH,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            AlgorithmKind::MiniMax => "MiniMax",
            AlgorithmKind::EnhancedMiniMax => "EnhancedMiniMax",
            AlgorithmKind::AlphaBeta => "AlphaBeta",
            AlgorithmKind::NegaScout => "NegaScout",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "minimax" => Some(AlgorithmKind::MiniMax),
            "enhancedminimax" | "enhanced" => Some(AlgorithmKind::EnhancedMiniMax),
            "alphabeta" | "negamax" => Some(AlgorithmKind::AlphaBeta),
            "negascout" | "pvs" => Some(AlgorithmKind::NegaScout),
            _ => None,
        }
    }
}

impl fmt::Display for AlgorithmKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeuristicKind {
    Material,
    BoardControl,
}

impl HeuristicKind {
    pub fn build(self) -> Box<dyn Heuristic> {
        match self {
            HeuristicKind::Material => Box::new(MaterialHeuristic),
            HeuristicKind::BoardControl => Box::new(BoardControlHeuristic),
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "material" | "minimal" => Some(HeuristicKind::Material),
            "boardcontrol" | "control" => Some(HeuristicKind::BoardControl),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SorterKind {
    Static,
    History,
    Killer,
}

impl SorterKind {
    pub fn build(self) -> Box<dyn MoveSorter> {
        match self {
            SorterKind::Static => Box::new(StaticSorter),
            SorterKind::History => Box::new(HistorySorter::new()),
            SorterKind::Killer => Box::new(KillerSorter::new()),
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "static" => Some(SorterKind::Static),
            "history" => Some(SorterKind::History),
            "killer" => Some(SorterKind::Killer),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub algorithm: AlgorithmKind,
    /// Search depth; the algorithm's default when `None`.
    pub depth: Option<u8>,
    pub heuristic: HeuristicKind,
    pub sorter: SorterKind,
    pub own_book: bool,
    /// Transposition table slots (NegaScout only).
    pub hash_capacity: usize,
    /// Tie-break and book RNG seed; drawn from the OS when `None`.
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            algorithm: AlgorithmKind::NegaScout,
            depth: None,
            heuristic: HeuristicKind::BoardControl,
            sorter: SorterKind::Killer,
            own_book: true,
            hash_capacity: DEFAULT_CAPACITY,
            seed: None,
        }
    }
}

impl EngineConfig {
    pub fn with_algorithm(algorithm: AlgorithmKind) -> Self {
        Self {
            algorithm,
            ..Self::default()
        }
    }

    /// Depth the engine will search at.
    pub fn effective_depth(&self) -> u8 {
        self.depth.unwrap_or_else(|| self.algorithm.default_depth())
    }

    /// Check the depth against the algorithm's range and the table size.
    pub fn validate(&self) -> ChessResult<()> {
        let (min, max) = self.algorithm.depth_bounds();
        let depth = self.effective_depth();
        if !(min..=max).contains(&depth) {
            return Err(invalid("Depth", &depth.to_string()));
        }
        if self.hash_capacity == 0 {
            return Err(invalid("Hash", "0"));
        }
        Ok(())
    }

    pub fn set_option(&mut self, name: &str, value: &str) -> ChessResult<()> {
        let name = name.trim();
        if name.eq_ignore_ascii_case("Algorithm") {
            self.algorithm = AlgorithmKind::parse(value).ok_or_else(|| invalid(name, value))?;
            return Ok(());
        }
        if name.eq_ignore_ascii_case("Depth") {
            self.depth = Some(value.trim().parse::<u8>().map_err(|_| invalid(name, value))?);
            return Ok(());
        }
        if name.eq_ignore_ascii_case("Heuristic") {
            self.heuristic = HeuristicKind::parse(value).ok_or_else(|| invalid(name, value))?;
            return Ok(());
        }
        if name.eq_ignore_ascii_case("Sorter") {
            self.sorter = SorterKind::parse(value).ok_or_else(|| invalid(name, value))?;
            return Ok(());
        }
        if name.eq_ignore_ascii_case("OwnBook") {
            self.own_book = parse_flag(value).ok_or_else(|| invalid(name, value))?;
            return Ok(());
        }
        if name.eq_ignore_ascii_case("Hash") {
            let parsed = value.trim().parse::<usize>().map_err(|_| invalid(name, value))?;
            if parsed == 0 {
                return Err(invalid(name, value));
            }
            self.hash_capacity = parsed;
            return Ok(());
        }
        if name.eq_ignore_ascii_case("Seed") {
            self.seed = Some(value.trim().parse::<u64>().map_err(|_| invalid(name, value))?);
            return Ok(());
        }
        Err(ChessError::UnknownOption(name.to_owned()))
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn invalid(name: &str, value: &str) -> ChessError {
    ChessError::InvalidOption {
        name: name.to_owned(),
        value: value.to_owned(),
    }
}
