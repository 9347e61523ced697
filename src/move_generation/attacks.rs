//! Attack and check detection on the mailbox board.

use crate::game_state::board::Board;
use crate::game_state::chess_types::*;
use crate::moves::mailbox::{
    step, BISHOP_DIRECTIONS, KING_OFFSETS, KNIGHT_OFFSETS, PAWN_CAPTURES, ROOK_DIRECTIONS,
};

#[inline]
pub fn is_in_check(board: &Board, color: Color) -> bool {
    let Some(king) = board.king_square(color) else {
        return false;
    };
    is_attacked(board, king, color.opposite())
}

/// Whether any piece of color `by` attacks `square`.
pub fn is_attacked(board: &Board, square: Square, by: Color) -> bool {
    if slider_attacks(board, square, by, &BISHOP_DIRECTIONS, PieceType::Bishop)
        || slider_attacks(board, square, by, &ROOK_DIRECTIONS, PieceType::Rook)
    {
        return true;
    }

    let knight = Piece::new(by, PieceType::Knight);
    if KNIGHT_OFFSETS
        .iter()
        .any(|&offset| step(square, offset).and_then(|sq| board.piece_at(sq)) == Some(knight))
    {
        return true;
    }

    let king = Piece::new(by, PieceType::King);
    if KING_OFFSETS
        .iter()
        .any(|&offset| step(square, offset).and_then(|sq| board.piece_at(sq)) == Some(king))
    {
        return true;
    }

    // A white pawn attacks upwards, so it sits below the square it hits.
    let pawn = Piece::new(by, PieceType::Pawn);
    let toward_pawn: i8 = if by.is_white() { -1 } else { 1 };
    PAWN_CAPTURES
        .iter()
        .any(|&offset| step(square, offset * toward_pawn).and_then(|sq| board.piece_at(sq)) == Some(pawn))
}

/// Walk each ray to the first occupied cell and test it against `slider` and
/// the queen.
fn slider_attacks(
    board: &Board,
    square: Square,
    by: Color,
    directions: &[i8],
    slider: PieceType,
) -> bool {
    for &direction in directions {
        let mut cursor = square;
        while let Some(next) = step(cursor, direction) {
            if let Some(piece) = board.piece_at(next) {
                if piece.color == by && (piece.kind == slider || piece.kind == PieceType::Queen) {
                    return true;
                }
                break;
            }
            cursor = next;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::fen_parser::parse_fen;

    fn sq(name: &str) -> Square {
        Square::from_notation(name).expect("test square should parse")
    }

    #[test]
    fn sliders_are_blocked_by_first_piece() {
        let board = parse_fen("4k3/8/8/8/8/8/4P3/4R1K1 w - - 0 1").expect("FEN");
        assert!(is_attacked(&board, sq("e2"), Color::White));
        assert!(!is_attacked(&board, sq("e3"), Color::White));
        assert!(is_attacked(&board, sq("a1"), Color::White));
        assert!(!is_attacked(&board, sq("e8"), Color::White));
    }

    #[test]
    fn pawn_attacks_depend_on_color() {
        let board = parse_fen("4k3/8/8/3p4/8/8/8/4K3 w - - 0 1").expect("FEN");
        assert!(is_attacked(&board, sq("c4"), Color::Black));
        assert!(is_attacked(&board, sq("e4"), Color::Black));
        assert!(!is_attacked(&board, sq("c6"), Color::Black));
        assert!(!is_attacked(&board, sq("d4"), Color::Black));
    }

    #[test]
    fn knight_and_king_offsets() {
        let board = parse_fen("4k3/8/8/8/8/5n2/8/4K3 w - - 0 1").expect("FEN");
        assert!(is_attacked(&board, sq("e1"), Color::Black));
        assert!(is_in_check(&board, Color::White));
        assert!(!is_in_check(&board, Color::Black));
        assert!(is_attacked(&board, sq("d7"), Color::Black));
        assert!(is_attacked(&board, sq("d2"), Color::White));
    }

    #[test]
    fn queen_attacks_diagonally_and_orthogonally() {
        let board = parse_fen("7k/8/8/8/3q4/8/8/K7 w - - 0 1").expect("FEN");
        assert!(is_attacked(&board, sq("a1"), Color::Black));
        assert!(is_attacked(&board, sq("d8"), Color::Black));
        assert!(is_attacked(&board, sq("h4"), Color::Black));
        assert!(!is_attacked(&board, sq("e6"), Color::Black));
    }
}
