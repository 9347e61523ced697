//! Value types for the board: colors, piece kinds, pieces, squares and
//! castling rights.
//!
//! All of these are small `Copy` values. A `Piece` or `Square` compares and
//! hashes by value, so there is never more than one distinguishable instance
//! of "white knight" or "e4" in the program.

use std::cmp::Ordering;
use std::fmt;

use crate::errors::{ChessError, ChessResult};

/// Side to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    White,
    Black,
}

impl Color {
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Color::White => 0,
            Color::Black => 1,
        }
    }

    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    #[inline]
    pub const fn is_white(self) -> bool {
        matches!(self, Color::White)
    }

    /// Rank a pawn of this color starts on (0-based).
    #[inline]
    pub const fn pawn_rank(self) -> u8 {
        match self {
            Color::White => 1,
            Color::Black => 6,
        }
    }

    /// Rank on which a pawn of this color promotes.
    #[inline]
    pub const fn promotion_rank(self) -> u8 {
        match self {
            Color::White => 7,
            Color::Black => 0,
        }
    }

    /// Rank the king and rooks start on.
    #[inline]
    pub const fn home_rank(self) -> u8 {
        match self {
            Color::White => 0,
            Color::Black => 7,
        }
    }
}

/// Piece kind; color is carried separately by `Piece`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceType {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceType {
    pub const ALL: [PieceType; 6] = [
        PieceType::Pawn,
        PieceType::Knight,
        PieceType::Bishop,
        PieceType::Rook,
        PieceType::Queen,
        PieceType::King,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        match self {
            PieceType::Pawn => 0,
            PieceType::Knight => 1,
            PieceType::Bishop => 2,
            PieceType::Rook => 3,
            PieceType::Queen => 4,
            PieceType::King => 5,
        }
    }

    /// Theoretical material value in centipawns. The king is priceless and
    /// therefore counts for nothing in material sums.
    #[inline]
    pub const fn value(self) -> i32 {
        match self {
            PieceType::Pawn => 100,
            PieceType::Knight => 300,
            PieceType::Bishop => 325,
            PieceType::Rook => 500,
            PieceType::Queen => 1000,
            PieceType::King => 0,
        }
    }

    #[inline]
    pub const fn letter(self) -> char {
        match self {
            PieceType::Pawn => 'P',
            PieceType::Knight => 'N',
            PieceType::Bishop => 'B',
            PieceType::Rook => 'R',
            PieceType::Queen => 'Q',
            PieceType::King => 'K',
        }
    }
}

/// A chessman: color crossed with kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub color: Color,
    pub kind: PieceType,
}

impl Piece {
    pub const WHITE_PAWN: Piece = Piece::new(Color::White, PieceType::Pawn);
    pub const WHITE_KNIGHT: Piece = Piece::new(Color::White, PieceType::Knight);
    pub const WHITE_BISHOP: Piece = Piece::new(Color::White, PieceType::Bishop);
    pub const WHITE_ROOK: Piece = Piece::new(Color::White, PieceType::Rook);
    pub const WHITE_QUEEN: Piece = Piece::new(Color::White, PieceType::Queen);
    pub const WHITE_KING: Piece = Piece::new(Color::White, PieceType::King);
    pub const BLACK_PAWN: Piece = Piece::new(Color::Black, PieceType::Pawn);
    pub const BLACK_KNIGHT: Piece = Piece::new(Color::Black, PieceType::Knight);
    pub const BLACK_BISHOP: Piece = Piece::new(Color::Black, PieceType::Bishop);
    pub const BLACK_ROOK: Piece = Piece::new(Color::Black, PieceType::Rook);
    pub const BLACK_QUEEN: Piece = Piece::new(Color::Black, PieceType::Queen);
    pub const BLACK_KING: Piece = Piece::new(Color::Black, PieceType::King);

    /// Every piece in ordinal order.
    pub const ALL: [Piece; 12] = [
        Piece::WHITE_PAWN,
        Piece::WHITE_KNIGHT,
        Piece::WHITE_BISHOP,
        Piece::WHITE_ROOK,
        Piece::WHITE_QUEEN,
        Piece::WHITE_KING,
        Piece::BLACK_PAWN,
        Piece::BLACK_KNIGHT,
        Piece::BLACK_BISHOP,
        Piece::BLACK_ROOK,
        Piece::BLACK_QUEEN,
        Piece::BLACK_KING,
    ];

    #[inline]
    pub const fn new(color: Color, kind: PieceType) -> Self {
        Self { color, kind }
    }

    /// Position in `Piece::ALL`; this is the value packed into move ids.
    #[inline]
    pub const fn ordinal(self) -> usize {
        self.color.index() * 6 + self.kind.index()
    }

    #[inline]
    pub fn from_ordinal(ordinal: usize) -> Option<Self> {
        Self::ALL.get(ordinal).copied()
    }

    #[inline]
    pub const fn is_white(self) -> bool {
        self.color.is_white()
    }

    #[inline]
    pub const fn value(self) -> i32 {
        self.kind.value()
    }

    /// FEN letter: upper case for white, lower case for black.
    #[inline]
    pub fn notation(self) -> char {
        let letter = self.kind.letter();
        if self.is_white() {
            letter
        } else {
            letter.to_ascii_lowercase()
        }
    }

    pub fn from_notation(ch: char) -> Option<Self> {
        let color = if ch.is_ascii_uppercase() {
            Color::White
        } else if ch.is_ascii_lowercase() {
            Color::Black
        } else {
            return None;
        };

        let kind = match ch.to_ascii_uppercase() {
            'P' => PieceType::Pawn,
            'N' => PieceType::Knight,
            'B' => PieceType::Bishop,
            'R' => PieceType::Rook,
            'Q' => PieceType::Queen,
            'K' => PieceType::King,
            _ => return None,
        };

        Some(Piece::new(color, kind))
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.notation())
    }
}

/// Board cell, indexed `0 == a1`, `7 == h1`, `63 == h8`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Square(u8);

impl Square {
    pub const A1: Square = Square(0);
    pub const B1: Square = Square(1);
    pub const C1: Square = Square(2);
    pub const D1: Square = Square(3);
    pub const E1: Square = Square(4);
    pub const F1: Square = Square(5);
    pub const G1: Square = Square(6);
    pub const H1: Square = Square(7);
    pub const A8: Square = Square(56);
    pub const B8: Square = Square(57);
    pub const C8: Square = Square(58);
    pub const D8: Square = Square(59);
    pub const E8: Square = Square(60);
    pub const F8: Square = Square(61);
    pub const G8: Square = Square(62);
    pub const H8: Square = Square(63);

    pub const ALL: [Square; 64] = {
        let mut all = [Square(0); 64];
        let mut i = 0;
        while i < 64 {
            all[i] = Square(i as u8);
            i += 1;
        }
        all
    };

    #[inline]
    pub const fn new(index: u8) -> Option<Self> {
        if index < 64 {
            Some(Square(index))
        } else {
            None
        }
    }

    #[inline]
    pub const fn from_file_rank(file: u8, rank: u8) -> Option<Self> {
        if file < 8 && rank < 8 {
            Some(Square(rank * 8 + file))
        } else {
            None
        }
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub const fn file(self) -> u8 {
        self.0 % 8
    }

    #[inline]
    pub const fn rank(self) -> u8 {
        self.0 / 8
    }

    /// Same file, rank reflected (a1 <-> a8). Used to read white-oriented
    /// tables for black.
    #[inline]
    pub const fn mirrored(self) -> Self {
        Square((7 - self.rank()) * 8 + self.file())
    }

    pub fn notation(self) -> String {
        let mut out = String::with_capacity(2);
        out.push(char::from(b'a' + self.file()));
        out.push(char::from(b'1' + self.rank()));
        out
    }

    pub fn from_notation(text: &str) -> ChessResult<Self> {
        let bytes = text.as_bytes();
        if bytes.len() != 2 {
            return Err(ChessError::InvalidSquare(text.to_owned()));
        }
        let file = bytes[0].wrapping_sub(b'a');
        let rank = bytes[1].wrapping_sub(b'1');
        Square::from_file_rank(file, rank).ok_or_else(|| ChessError::InvalidSquare(text.to_owned()))
    }
}

// Notation order: "a1" < "a2" < ... < "a8" < "b1".
impl Ord for Square {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.file(), self.rank()).cmp(&(other.file(), other.rank()))
    }
}

impl PartialOrd for Square {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", char::from(b'a' + self.file()), char::from(b'1' + self.rank()))
    }
}

/// Which side may still castle to which wing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct CastlingRights {
    flags: u8,
}

/// One of the four castling options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CastlingSide {
    WhiteKingSide,
    WhiteQueenSide,
    BlackKingSide,
    BlackQueenSide,
}

impl CastlingSide {
    pub const ALL: [CastlingSide; 4] = [
        CastlingSide::WhiteKingSide,
        CastlingSide::WhiteQueenSide,
        CastlingSide::BlackKingSide,
        CastlingSide::BlackQueenSide,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        match self {
            CastlingSide::WhiteKingSide => 0,
            CastlingSide::WhiteQueenSide => 1,
            CastlingSide::BlackKingSide => 2,
            CastlingSide::BlackQueenSide => 3,
        }
    }

    #[inline]
    pub const fn color(self) -> Color {
        match self {
            CastlingSide::WhiteKingSide | CastlingSide::WhiteQueenSide => Color::White,
            CastlingSide::BlackKingSide | CastlingSide::BlackQueenSide => Color::Black,
        }
    }

    #[inline]
    pub const fn is_king_side(self) -> bool {
        matches!(self, CastlingSide::WhiteKingSide | CastlingSide::BlackKingSide)
    }

    /// Corner the rook for this option starts on.
    #[inline]
    pub const fn rook_square(self) -> Square {
        match self {
            CastlingSide::WhiteKingSide => Square::H1,
            CastlingSide::WhiteQueenSide => Square::A1,
            CastlingSide::BlackKingSide => Square::H8,
            CastlingSide::BlackQueenSide => Square::A8,
        }
    }

    /// Where the king lands.
    #[inline]
    pub const fn king_target(self) -> Square {
        match self {
            CastlingSide::WhiteKingSide => Square::G1,
            CastlingSide::WhiteQueenSide => Square::C1,
            CastlingSide::BlackKingSide => Square::G8,
            CastlingSide::BlackQueenSide => Square::C8,
        }
    }

    /// Where the rook lands.
    #[inline]
    pub const fn rook_target(self) -> Square {
        match self {
            CastlingSide::WhiteKingSide => Square::F1,
            CastlingSide::WhiteQueenSide => Square::D1,
            CastlingSide::BlackKingSide => Square::F8,
            CastlingSide::BlackQueenSide => Square::D8,
        }
    }

    #[inline]
    pub const fn sides_for(color: Color) -> [CastlingSide; 2] {
        match color {
            Color::White => [CastlingSide::WhiteKingSide, CastlingSide::WhiteQueenSide],
            Color::Black => [CastlingSide::BlackKingSide, CastlingSide::BlackQueenSide],
        }
    }

    pub fn for_rook_square(square: Square) -> Option<CastlingSide> {
        Self::ALL.into_iter().find(|side| side.rook_square() == square)
    }

    #[inline]
    const fn bit(self) -> u8 {
        1 << self.index()
    }

    /// FEN letter (`K`, `Q`, `k`, `q`).
    #[inline]
    pub const fn letter(self) -> char {
        match self {
            CastlingSide::WhiteKingSide => 'K',
            CastlingSide::WhiteQueenSide => 'Q',
            CastlingSide::BlackKingSide => 'k',
            CastlingSide::BlackQueenSide => 'q',
        }
    }
}

impl CastlingRights {
    pub const NONE: CastlingRights = CastlingRights { flags: 0 };
    pub const ALL: CastlingRights = CastlingRights { flags: 0x0F };

    #[inline]
    pub const fn has(self, side: CastlingSide) -> bool {
        self.flags & side.bit() != 0
    }

    #[inline]
    pub fn grant(&mut self, side: CastlingSide) {
        self.flags |= side.bit();
    }

    #[inline]
    pub fn revoke(&mut self, side: CastlingSide) {
        self.flags &= !side.bit();
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.flags == 0
    }

    /// Rights currently held, in `CastlingSide::ALL` order.
    pub fn iter(self) -> impl Iterator<Item = CastlingSide> {
        CastlingSide::ALL.into_iter().filter(move |side| self.has(*side))
    }
}
