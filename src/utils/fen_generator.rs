//! Board-to-FEN generator; the inverse of `fen_parser`.

use crate::game_state::board::{Board, BoardFields};
use crate::game_state::chess_types::*;

pub fn generate_fen(board: &Board) -> String {
    generate_fen_fields(&board.fields())
}

pub fn generate_fen_fields(fields: &BoardFields) -> String {
    let side_to_move = match fields.side_to_move {
        Color::White => "w",
        Color::Black => "b",
    };
    let en_passant = fields
        .en_passant_target
        .map(|sq| sq.notation())
        .unwrap_or_else(|| "-".to_owned());

    format!(
        "{} {} {} {} {} {}",
        generate_placement_field(&fields.placement),
        side_to_move,
        generate_castling_field(fields.castling_rights),
        en_passant,
        fields.half_move_clock,
        fields.full_move_number
    )
}

fn generate_placement_field(placement: &[Option<Piece>; 64]) -> String {
    let mut out = String::new();

    for rank in (0..8u8).rev() {
        let mut empty_count = 0u8;

        for file in 0..8u8 {
            match placement[usize::from(rank * 8 + file)] {
                Some(piece) => {
                    if empty_count > 0 {
                        out.push(char::from(b'0' + empty_count));
                        empty_count = 0;
                    }
                    out.push(piece.notation());
                }
                None => empty_count += 1,
            }
        }

        if empty_count > 0 {
            out.push(char::from(b'0' + empty_count));
        }
        if rank > 0 {
            out.push('/');
        }
    }

    out
}

fn generate_castling_field(rights: CastlingRights) -> String {
    let out: String = rights.iter().map(CastlingSide::letter).collect();
    if out.is_empty() {
        "-".to_owned()
    } else {
        out
    }
}

#[cfg(test)]
mod tests {
    use super::generate_fen;
    use crate::game_state::chess_rules::STARTING_POSITION_FEN;
    use crate::game_state::chess_types::{CastlingSide, Color};
    use crate::utils::fen_parser::parse_fen;

    #[test]
    fn round_trip_starting_position_fen() {
        let parsed = parse_fen(STARTING_POSITION_FEN).expect("starting FEN should parse");
        assert_eq!(generate_fen(&parsed), STARTING_POSITION_FEN);
    }

    #[test]
    fn round_trip_custom_position_fen() {
        let fen = "r1bqk2r/pppp1ppp/2n2n2/2b1p3/2B1P3/2N2N2/PPPP1PPP/R1BQ1RK1 b kq - 4 6";
        let parsed = parse_fen(fen).expect("custom FEN should parse");
        let generated = generate_fen(&parsed);
        assert_eq!(generated, fen);

        let reparsed = parse_fen(&generated).expect("generated FEN should parse");
        assert_eq!(reparsed, parsed);
        assert_eq!(reparsed.side_to_move(), Color::Black);
        assert!(reparsed.castling_rights().has(CastlingSide::BlackKingSide));
        assert!(!reparsed.castling_rights().has(CastlingSide::WhiteKingSide));
        assert_eq!(reparsed.half_move_clock(), 4);
        assert_eq!(reparsed.full_move_number(), 6);
    }

    #[test]
    fn en_passant_target_is_written() {
        let fen = "rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR w KQkq e6 0 2";
        let parsed = parse_fen(fen).expect("FEN should parse");
        assert_eq!(generate_fen(&parsed), fen);
    }
}
