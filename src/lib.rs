//! Crate root module declarations for the mailbox chess engine.
//!
//! This file exposes the board model, move generation, search algorithms,
//! engines and utility helpers so binaries, benches and tests can import
//! stable module paths.

pub mod errors;

pub mod game_state {
    pub mod board;
    pub mod chess_rules;
    pub mod chess_types;
    pub mod game_status;
}

pub mod moves {
    pub mod chess_move;
    pub mod mailbox;
}

pub mod move_generation {
    pub mod attacks;
    pub mod move_generator;
    pub mod perft;
}

pub mod search {
    pub mod alpha_beta;
    pub mod board_scoring;
    pub mod enhanced_minimax;
    pub mod minimax;
    pub mod move_ordering;
    pub mod nega_scout;
    pub mod search_context;
    pub mod transposition_table;
    pub mod zobrist;
}

pub mod tables {
    pub mod opening_book;
}

pub mod engines {
    pub mod engine_config;
    pub mod engine_trait;
    pub mod search_engine;
}

pub mod utils {
    pub mod algebraic;
    pub mod engine_match_harness;
    pub mod fen_generator;
    pub mod fen_parser;
    pub mod render_game_state;
}
