//! Canonical chess-rule constants.
//!
//! Stores the standard starting position and the thresholds the rest of the
//! crate uses for draw detection and opening-book gating.

use crate::game_state::chess_types::PieceType;

/// Standard chess starting position in Forsyth-Edwards Notation (FEN).
pub const STARTING_POSITION_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Back-rank layout from the a-file to the h-file.
pub const BACK_RANK: [PieceType; 8] = [
    PieceType::Rook,
    PieceType::Knight,
    PieceType::Bishop,
    PieceType::Queen,
    PieceType::King,
    PieceType::Bishop,
    PieceType::Knight,
    PieceType::Rook,
];

/// Half-moves without capture or pawn move after which the game is drawn.
pub const FIFTY_MOVE_HALF_MOVES: u16 = 100;

/// Occurrences of the same position that end the game.
pub const REPETITION_LIMIT: usize = 3;

/// The opening book is only consulted before this full-move number.
pub const OPENING_BOOK_MOVE_LIMIT: u16 = 20;
