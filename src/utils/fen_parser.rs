//! FEN-to-Board parser.
//!
//! Fills a `BoardFields` from a Forsyth-Edwards Notation string and builds the
//! board from it. The half-move clock and full-move number may be omitted and
//! default to `0` and `1`.

use crate::errors::{ChessError, ChessResult};
use crate::game_state::board::{Board, BoardFields};
use crate::game_state::chess_types::*;

pub fn parse_fen(fen: &str) -> ChessResult<Board> {
    parse_fen_fields(fen).map(Board::from_fields)
}

pub fn parse_fen_fields(fen: &str) -> ChessResult<BoardFields> {
    let mut parts = fen.split_whitespace();

    let board_part = parts.next().ok_or_else(|| invalid("missing board layout"))?;
    let side_part = parts.next().ok_or_else(|| invalid("missing side to move"))?;
    let castling_part = parts.next().ok_or_else(|| invalid("missing castling rights"))?;
    let en_passant_part = parts.next().ok_or_else(|| invalid("missing en-passant square"))?;
    let halfmove_part = parts.next().unwrap_or("0");
    let fullmove_part = parts.next().unwrap_or("1");

    if parts.next().is_some() {
        return Err(invalid("extra trailing fields"));
    }

    let mut fields = BoardFields::default();
    parse_placement(board_part, &mut fields.placement)?;
    fields.side_to_move = parse_side_to_move(side_part)?;
    fields.castling_rights = parse_castling_rights(castling_part)?;
    fields.en_passant_target = parse_en_passant_square(en_passant_part)?;
    fields.half_move_clock = halfmove_part
        .parse::<u16>()
        .map_err(|_| invalid(&format!("invalid halfmove clock: {halfmove_part}")))?;
    fields.full_move_number = fullmove_part
        .parse::<u16>()
        .map_err(|_| invalid(&format!("invalid fullmove number: {fullmove_part}")))?;

    Ok(fields)
}

fn invalid(msg: &str) -> ChessError {
    ChessError::InvalidFen(msg.to_owned())
}

fn parse_placement(board_part: &str, placement: &mut [Option<Piece>; 64]) -> ChessResult<()> {
    let ranks: Vec<&str> = board_part.split('/').collect();
    if ranks.len() != 8 {
        return Err(invalid("board layout must contain 8 ranks"));
    }

    for (fen_rank_idx, rank_str) in ranks.iter().enumerate() {
        let board_rank = 7 - fen_rank_idx as u8;
        let mut file = 0u8;

        for ch in rank_str.chars() {
            if let Some(empty_count) = ch.to_digit(10) {
                if !(1..=8).contains(&empty_count) {
                    return Err(invalid(&format!("invalid empty-square count '{ch}'")));
                }
                file += empty_count as u8;
                if file > 8 {
                    return Err(invalid("board rank has too many files"));
                }
                continue;
            }

            let piece = Piece::from_notation(ch)
                .ok_or_else(|| invalid(&format!("invalid piece character '{ch}'")))?;
            let sq = Square::from_file_rank(file, board_rank)
                .ok_or_else(|| invalid("board rank has too many files"))?;
            placement[sq.index()] = Some(piece);
            file += 1;
        }

        if file != 8 {
            return Err(invalid("board rank does not sum to 8 files"));
        }
    }

    Ok(())
}

fn parse_side_to_move(side_part: &str) -> ChessResult<Color> {
    match side_part {
        "w" => Ok(Color::White),
        "b" => Ok(Color::Black),
        _ => Err(invalid(&format!("invalid side-to-move field: {side_part}"))),
    }
}

fn parse_castling_rights(castling_part: &str) -> ChessResult<CastlingRights> {
    let mut rights = CastlingRights::NONE;
    if castling_part == "-" {
        return Ok(rights);
    }

    for ch in castling_part.chars() {
        let side = CastlingSide::ALL
            .into_iter()
            .find(|side| side.letter() == ch)
            .ok_or_else(|| invalid(&format!("invalid castling rights character: {ch}")))?;
        rights.grant(side);
    }

    Ok(rights)
}

fn parse_en_passant_square(en_passant_part: &str) -> ChessResult<Option<Square>> {
    if en_passant_part == "-" {
        return Ok(None);
    }
    Square::from_notation(en_passant_part).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_state::chess_rules::STARTING_POSITION_FEN;

    #[test]
    fn parse_starting_fen_matches_built_in_layout() {
        let board = parse_fen(STARTING_POSITION_FEN).expect("starting FEN should parse");
        assert_eq!(board, Board::starting_position());
        assert_eq!(board.side_to_move(), Color::White);
        assert_eq!(board.full_move_number(), 1);
        assert_eq!(board.half_move_clock(), 0);
    }

    #[test]
    fn clocks_are_optional() {
        let board = parse_fen("4k3/8/8/8/8/8/8/4K3 b -  -").expect("short FEN should parse");
        assert_eq!(board.half_move_clock(), 0);
        assert_eq!(board.full_move_number(), 1);
        assert_eq!(board.side_to_move(), Color::Black);
    }

    #[test]
    fn malformed_fields_are_rejected() {
        for fen in [
            "",
            "8/8/8/8/8/8/8 w - - 0 1",
            "9/8/8/8/8/8/8/8 w - - 0 1",
            "4k3/8/8/8/8/8/8/4K3 x - - 0 1",
            "4k3/8/8/8/8/8/8/4K3 w X - 0 1",
            "4k3/8/8/8/8/8/8/4K3 w - e9 0 1",
            "4k3/8/8/8/8/8/8/4K3 w - - zero 1",
            "4k3/8/8/8/8/8/8/4K3 w - - 0 1 extra",
            "4k3/8/8/8/8/8/8/4K2X w - - 0 1",
        ] {
            assert!(parse_fen(fen).is_err(), "{fen:?} should be rejected");
        }
    }
}
