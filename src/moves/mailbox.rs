//! 10x12 mailbox geometry.
//!
//! The 8x8 board sits inside a 10-wide, 12-high frame. Every cell of the frame
//! outside the real board holds `OFF_BOARD`, so a ray walk or a knight jump can
//! step by a fixed offset and stop on the sentinel without any file or rank
//! bounds checks. Rows grow with rank, so `+10` is one rank up.

use crate::game_state::chess_types::Square;

pub const OFF_BOARD: i8 = -1;

/// Frame cell -> square index, or `OFF_BOARD`.
pub const MAILBOX: [i8; 120] = build_mailbox();

/// Square index -> frame cell.
pub const MAILBOX64: [u8; 64] = build_mailbox64();

pub const KNIGHT_OFFSETS: [i8; 8] = [-21, -19, -12, -8, 8, 12, 19, 21];
pub const KING_OFFSETS: [i8; 8] = [-11, -10, -9, -1, 1, 9, 10, 11];
pub const BISHOP_DIRECTIONS: [i8; 4] = [-11, -9, 9, 11];
pub const ROOK_DIRECTIONS: [i8; 4] = [-10, -1, 1, 10];

/// Pawn push direction for white; black uses the negation.
pub const PAWN_PUSH: i8 = 10;
/// Pawn capture directions for white; black uses the negations.
pub const PAWN_CAPTURES: [i8; 2] = [9, 11];

const fn build_mailbox() -> [i8; 120] {
    let mut mailbox = [OFF_BOARD; 120];
    let mut sq = 0;
    while sq < 64 {
        mailbox[21 + (sq / 8) * 10 + sq % 8] = sq as i8;
        sq += 1;
    }
    mailbox
}

const fn build_mailbox64() -> [u8; 64] {
    let mut out = [0u8; 64];
    let mut sq = 0;
    while sq < 64 {
        out[sq] = (21 + (sq / 8) * 10 + sq % 8) as u8;
        sq += 1;
    }
    out
}

/// Square reached from `square` by one step of `offset`, if still on the board.
#[inline]
pub fn step(square: Square, offset: i8) -> Option<Square> {
    let cell = MAILBOX64[square.index()] as i16 + offset as i16;
    match MAILBOX[cell as usize] {
        OFF_BOARD => None,
        index => Square::new(index as u8),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_border_is_sentinel() {
        let on_board = MAILBOX.iter().filter(|&&cell| cell != OFF_BOARD).count();
        assert_eq!(on_board, 64);
        for sq in Square::ALL {
            assert_eq!(MAILBOX[MAILBOX64[sq.index()] as usize], sq.index() as i8);
        }
    }

    #[test]
    fn steps_stop_at_edges() {
        assert_eq!(step(Square::A1, -1), None);
        assert_eq!(step(Square::A1, -10), None);
        assert_eq!(step(Square::H8, 11), None);
        assert_eq!(step(Square::A1, 11).map(|s| s.notation()), Some("b2".to_owned()));
        assert_eq!(step(Square::G1, 12), None);
        assert_eq!(step(Square::B1, 21).map(|s| s.notation()), Some("c3".to_owned()));
    }
}
