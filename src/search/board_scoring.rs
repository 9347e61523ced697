//! Pluggable board evaluation interfaces and baseline implementations.
//!
//! Search remains modular by delegating static position scoring to this trait,
//! allowing alternate heuristics to be swapped without altering search code.

use crate::game_state::board::Board;
use crate::game_state::chess_types::*;
use crate::move_generation::move_generator::MoveGenerator;

/// Score that dominates any material balance.
pub const MATE_PENALTY: i32 = 100_000;

/// Positional value of an opponent king that is in check but can still move.
pub const CHECK_PENALTY: i32 = 250;

/// The king-safety term only kicks in after this full-move number.
pub const KING_SAFETY_FROM_MOVE: u16 = 10;

pub trait Heuristic: Send + Sync {
    /// Score `board`; larger is better for White when `from_white_perspective`
    /// is set and better for Black otherwise.
    fn evaluate(&self, board: &Board, from_white_perspective: bool) -> i32;

    fn name(&self) -> &'static str;
}

#[inline]
fn perspective_sign(color: Color, from_white_perspective: bool) -> i32 {
    if color.is_white() == from_white_perspective {
        1
    } else {
        -1
    }
}

/// Signed sum of material values.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaterialHeuristic;

impl Heuristic for MaterialHeuristic {
    fn evaluate(&self, board: &Board, from_white_perspective: bool) -> i32 {
        board
            .pieces()
            .map(|(_, piece)| perspective_sign(piece.color, from_white_perspective) * piece.value())
            .sum()
    }

    fn name(&self) -> &'static str {
        "Material"
    }
}

#[rustfmt::skip]
const PAWN_TABLE: [i32; 64] = [
     0,   0,   0,   0,   0,   0,   0,   0,
     5,  10,  10, -20, -20,  10,  10,   5,
     5,  -5, -10,   0,   0, -10,  -5,   5,
     0,   0,   0,  20,  20,   0,   0,   0,
     5,   5,  10,  25,  25,  10,   5,   5,
    10,  10,  20,  30,  30,  20,  10,  10,
    50,  50,  50,  50,  50,  50,  50,  50,
     0,   0,   0,   0,   0,   0,   0,   0,
];

#[rustfmt::skip]
const KNIGHT_TABLE: [i32; 64] = [
   -50, -40, -30, -30, -30, -30, -40, -50,
   -40, -20,   0,   5,   5,   0, -20, -40,
   -30,   5,  10,  15,  15,  10,   5, -30,
   -30,   0,  15,  20,  20,  15,   0, -30,
   -30,   5,  15,  20,  20,  15,   5, -30,
   -30,   0,  10,  15,  15,  10,   0, -30,
   -40, -20,   0,   0,   0,   0, -20, -40,
   -50, -40, -30, -30, -30, -30, -40, -50,
];

// Symmetric in both axes, so it needs no mirroring for Black.
#[rustfmt::skip]
const CONTROL_TABLE: [i32; 64] = [
   -20, -10, -10, -10, -10, -10, -10, -20,
   -10,   0,   0,   0,   0,   0,   0, -10,
   -10,   0,   5,  10,  10,   5,   0, -10,
   -10,   5,  10,  15,  15,  10,   5, -10,
   -10,   5,  10,  15,  15,  10,   5, -10,
   -10,   0,   5,  10,  10,   5,   0, -10,
   -10,   0,   0,   0,   0,   0,   0, -10,
   -20, -10, -10, -10, -10, -10, -10, -20,
];

/// Material plus square tables for pawns, knights and the sliders, a king
/// safety term for the opponent king, and a small penalty for the half-move
/// clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoardControlHeuristic;

impl BoardControlHeuristic {
    fn positional_value(board: &Board, square: Square, piece: Piece, from_white_perspective: bool) -> i32 {
        let relative = if piece.is_white() { square } else { square.mirrored() };
        match piece.kind {
            PieceType::Pawn => PAWN_TABLE[relative.index()],
            PieceType::Knight => KNIGHT_TABLE[relative.index()],
            PieceType::Bishop | PieceType::Rook | PieceType::Queen => CONTROL_TABLE[square.index()],
            PieceType::King => Self::king_safety(board, piece.color, from_white_perspective),
        }
    }

    fn king_safety(board: &Board, color: Color, from_white_perspective: bool) -> i32 {
        if color.is_white() == from_white_perspective
            || board.full_move_number() <= KING_SAFETY_FROM_MOVE
            || !board.is_in_check(color)
        {
            return 0;
        }

        if MoveGenerator::new().has_valid_move(board, color) {
            -CHECK_PENALTY
        } else {
            -MATE_PENALTY
        }
    }
}

impl Heuristic for BoardControlHeuristic {
    fn evaluate(&self, board: &Board, from_white_perspective: bool) -> i32 {
        let placed: i32 = board
            .pieces()
            .map(|(square, piece)| {
                let value = piece.value() + Self::positional_value(board, square, piece, from_white_perspective);
                perspective_sign(piece.color, from_white_perspective) * value
            })
            .sum();

        placed - i32::from(board.half_move_clock())
    }

    fn name(&self) -> &'static str {
        "BoardControl"
    }
}
