//! Move record and its packed 32-bit identifier.
//!
//! Layout of the id (bit 0 is the least significant):
//!
//! ```text
//! 20..=23  moving piece ordinal
//! 14..=19  from-square index
//!  8..=13  to-square index
//!  4..=7   captured piece ordinal + 1 (0 = no capture)
//! ```
//!
//! The same layout is used by the opening-book format, whose records only
//! carry the low 24 bits.

use std::fmt;

use crate::game_state::chess_types::{Piece, PieceType, Square};

const PIECE_SHIFT: u32 = 20;
const FROM_SHIFT: u32 = 14;
const TO_SHIFT: u32 = 8;
const CAPTURED_SHIFT: u32 = 4;

const PIECE_MASK: u32 = 0xF;
const SQUARE_MASK: u32 = 0x3F;
const CAPTURED_MASK: u32 = 0xF;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub piece: Piece,
    pub from: Square,
    pub to: Square,
    pub captured: Option<Piece>,
}

impl Move {
    #[inline]
    pub const fn new(piece: Piece, from: Square, to: Square, captured: Option<Piece>) -> Self {
        Self {
            piece,
            from,
            to,
            captured,
        }
    }

    #[inline]
    pub const fn quiet(piece: Piece, from: Square, to: Square) -> Self {
        Self::new(piece, from, to, None)
    }

    #[inline]
    pub const fn is_capture(&self) -> bool {
        self.captured.is_some()
    }

    /// A king stepping two files sideways.
    #[inline]
    pub fn is_castling(&self) -> bool {
        matches!(self.piece.kind, PieceType::King) && self.from.file().abs_diff(self.to.file()) == 2
    }

    #[inline]
    pub fn is_promotion(&self) -> bool {
        matches!(self.piece.kind, PieceType::Pawn) && self.to.rank() == self.piece.color.promotion_rank()
    }

    /// Canonical packed identifier.
    #[inline]
    pub fn id(&self) -> u32 {
        let captured = self.captured.map(|p| p.ordinal() as u32 + 1).unwrap_or(0);
        ((self.piece.ordinal() as u32) << PIECE_SHIFT)
            | ((self.from.index() as u32) << FROM_SHIFT)
            | ((self.to.index() as u32) << TO_SHIFT)
            | (captured << CAPTURED_SHIFT)
    }

    /// Rebuild a move from its packed id. Returns `None` when a field does
    /// not name a real piece.
    pub fn from_id(id: u32) -> Option<Self> {
        let piece = Piece::from_ordinal(((id >> PIECE_SHIFT) & PIECE_MASK) as usize)?;
        let from = Square::new(((id >> FROM_SHIFT) & SQUARE_MASK) as u8)?;
        let to = Square::new(((id >> TO_SHIFT) & SQUARE_MASK) as u8)?;
        let captured = match (id >> CAPTURED_SHIFT) & CAPTURED_MASK {
            0 => None,
            code => Some(Piece::from_ordinal(code as usize - 1)?),
        };
        Some(Self::new(piece, from, to, captured))
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if self.is_promotion() {
            write!(f, "q")?;
        }
        Ok(())
    }
}
