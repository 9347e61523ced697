//! Long algebraic move notation (`e2e4`, `e7e8q`).
//!
//! Parsing resolves the text against the legal moves of a board, so the
//! returned `Move` carries the right piece and captured piece.

use crate::errors::{ChessError, ChessResult};
use crate::game_state::board::Board;
use crate::game_state::chess_types::Square;
use crate::moves::chess_move::Move;

/// Find the legal move on `board` written as `text`.
pub fn long_algebraic_to_move(text: &str, board: &Board) -> ChessResult<Move> {
    let text = text.trim();
    if !(4..=5).contains(&text.len()) || !text.is_ascii() {
        return Err(ChessError::InvalidSquare(text.to_owned()));
    }
    let from = Square::from_notation(&text[0..2])?;
    let to = Square::from_notation(&text[2..4])?;

    board
        .valid_moves(board.side_to_move())
        .into_iter()
        .find(|mv| mv.from == from && mv.to == to)
        .ok_or_else(|| ChessError::NotLegal(text.to_owned()))
}

pub fn move_to_long_algebraic(mv: Move) -> String {
    mv.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_state::chess_types::Piece;

    #[test]
    fn parses_legal_move_text() {
        let board = Board::starting_position();
        let mv = long_algebraic_to_move("g1f3", &board).expect("g1f3 should be legal");
        assert_eq!(mv.piece, Piece::WHITE_KNIGHT);
        assert_eq!(move_to_long_algebraic(mv), "g1f3");
    }

    #[test]
    fn rejects_illegal_or_malformed_text() {
        let board = Board::starting_position();
        assert!(matches!(
            long_algebraic_to_move("e2e5", &board),
            Err(ChessError::NotLegal(_))
        ));
        assert!(long_algebraic_to_move("e2", &board).is_err());
        assert!(long_algebraic_to_move("z9e4", &board).is_err());
    }
}
