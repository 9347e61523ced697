//! Copy-on-write board snapshot with an incrementally maintained Zobrist hash.
//!
//! A `Board` is never changed once a caller can see it: `derive` clones the
//! position, applies one move to the private copy and hands the copy back.
//! Every field change inside `derive` goes through a helper that also xors the
//! matching Zobrist key, so `hash()` is always equal to `recompute_hash()`.

use std::hash::{Hash, Hasher};

use crate::game_state::chess_rules::BACK_RANK;
use crate::game_state::chess_types::*;
use crate::move_generation::attacks;
use crate::move_generation::move_generator::MoveGenerator;
use crate::moves::chess_move::Move;
use crate::search::zobrist;

/// The FEN-equivalent field set a board is built from and exported to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardFields {
    pub placement: [Option<Piece>; 64],
    pub side_to_move: Color,
    pub castling_rights: CastlingRights,
    pub en_passant_target: Option<Square>,
    pub half_move_clock: u16,
    pub full_move_number: u16,
}

impl Default for BoardFields {
    fn default() -> Self {
        Self {
            placement: [None; 64],
            side_to_move: Color::White,
            castling_rights: CastlingRights::NONE,
            en_passant_target: None,
            half_move_clock: 0,
            full_move_number: 1,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Board {
    squares: [Option<Piece>; 64],
    castling_rights: CastlingRights,
    en_passant_target: Option<Square>,
    side_to_move: Color,
    half_move_clock: u16,
    full_move_number: u16,
    hash: u32,
}

impl Board {
    pub fn from_fields(fields: BoardFields) -> Self {
        let mut board = Self {
            squares: fields.placement,
            castling_rights: fields.castling_rights,
            en_passant_target: fields.en_passant_target,
            side_to_move: fields.side_to_move,
            half_move_clock: fields.half_move_clock,
            full_move_number: fields.full_move_number.max(1),
            hash: 0,
        };
        board.hash = board.recompute_hash();
        board
    }

    pub fn starting_position() -> Self {
        let mut fields = BoardFields {
            castling_rights: CastlingRights::ALL,
            ..BoardFields::default()
        };

        for (file, kind) in (0u8..).zip(BACK_RANK) {
            for (color, back, pawns) in [(Color::White, 0u8, 1u8), (Color::Black, 7, 6)] {
                if let Some(sq) = Square::from_file_rank(file, back) {
                    fields.placement[sq.index()] = Some(Piece::new(color, kind));
                }
                if let Some(sq) = Square::from_file_rank(file, pawns) {
                    fields.placement[sq.index()] = Some(Piece::new(color, PieceType::Pawn));
                }
            }
        }

        Self::from_fields(fields)
    }

    /// Export the fields this board was built from (plus whatever the moves
    /// since then changed).
    pub fn fields(&self) -> BoardFields {
        BoardFields {
            placement: self.squares,
            side_to_move: self.side_to_move,
            castling_rights: self.castling_rights,
            en_passant_target: self.en_passant_target,
            half_move_clock: self.half_move_clock,
            full_move_number: self.full_move_number,
        }
    }

    #[inline]
    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.squares[square.index()]
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline]
    pub fn castling_rights(&self) -> CastlingRights {
        self.castling_rights
    }

    #[inline]
    pub fn en_passant_target(&self) -> Option<Square> {
        self.en_passant_target
    }

    #[inline]
    pub fn half_move_clock(&self) -> u16 {
        self.half_move_clock
    }

    #[inline]
    pub fn full_move_number(&self) -> u16 {
        self.full_move_number
    }

    /// Incrementally maintained Zobrist hash.
    #[inline]
    pub fn hash(&self) -> u32 {
        self.hash
    }

    /// Occupied squares with their pieces, a1 first.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::ALL
            .into_iter()
            .filter_map(move |sq| self.squares[sq.index()].map(|piece| (sq, piece)))
    }

    pub fn king_square(&self, color: Color) -> Option<Square> {
        let king = Piece::new(color, PieceType::King);
        self.pieces().find(|(_, piece)| *piece == king).map(|(sq, _)| sq)
    }

    /// Hash computed from scratch. Only used at construction and to verify
    /// the incremental path.
    pub fn recompute_hash(&self) -> u32 {
        let mut hash = 0u32;
        for (sq, piece) in self.pieces() {
            hash ^= zobrist::piece_square_key(piece, sq);
        }
        if self.side_to_move == Color::Black {
            hash ^= zobrist::side_to_move_key();
        }
        for side in self.castling_rights.iter() {
            hash ^= zobrist::castling_key(side);
        }
        if let Some(target) = self.en_passant_target {
            hash ^= zobrist::en_passant_file_key(target.file());
        }
        hash
    }

    /// Board after `mv`. With `advance_turn == false` the side to move and the
    /// move counters are left alone, which is what legality probes want.
    pub fn derive(&self, mv: Move, advance_turn: bool) -> Board {
        let mut next = self.clone();
        let mover = self.squares[mv.from.index()].unwrap_or(mv.piece);
        let color = mover.color;
        let mut captured_something = false;

        if let Some(victim) = next.squares[mv.to.index()] {
            next.remove_piece(victim, mv.to);
            captured_something = true;
        }

        if mover.kind == PieceType::Pawn
            && Some(mv.to) == self.en_passant_target
            && mv.to.file() != mv.from.file()
        {
            if let Some(passed) = Square::from_file_rank(mv.to.file(), mv.from.rank()) {
                if let Some(victim) = next.squares[passed.index()] {
                    next.remove_piece(victim, passed);
                    captured_something = true;
                }
            }
        }

        next.remove_piece(mover, mv.from);
        let placed = if mover.kind == PieceType::Pawn && mv.to.rank() == color.promotion_rank() {
            Piece::new(color, PieceType::Queen)
        } else {
            mover
        };
        next.place_piece(placed, mv.to);

        if mover.kind == PieceType::King
            && mv.from.rank() == color.home_rank()
            && mv.from.file() == 4
            && mv.from.file().abs_diff(mv.to.file()) == 2
        {
            let side = CastlingSide::sides_for(color)
                .into_iter()
                .find(|side| side.king_target() == mv.to);
            if let Some(side) = side {
                let rook = Piece::new(color, PieceType::Rook);
                if next.squares[side.rook_square().index()] == Some(rook) {
                    next.remove_piece(rook, side.rook_square());
                    next.place_piece(rook, side.rook_target());
                }
            }
        }

        let mut rights = next.castling_rights;
        if mover.kind == PieceType::King {
            for side in CastlingSide::sides_for(color) {
                rights.revoke(side);
            }
        }
        for sq in [mv.from, mv.to] {
            if let Some(side) = CastlingSide::for_rook_square(sq) {
                rights.revoke(side);
            }
        }
        next.set_castling_rights(rights);

        let en_passant = if mover.kind == PieceType::Pawn && mv.from.rank().abs_diff(mv.to.rank()) == 2 {
            Square::from_file_rank(mv.from.file(), (mv.from.rank() + mv.to.rank()) / 2)
        } else {
            None
        };
        next.set_en_passant_target(en_passant);

        if advance_turn {
            if mover.kind == PieceType::Pawn || captured_something {
                next.half_move_clock = 0;
            } else {
                next.half_move_clock = next.half_move_clock.saturating_add(1);
            }
            if self.side_to_move == Color::Black {
                next.full_move_number = next.full_move_number.saturating_add(1);
            }
            next.side_to_move = self.side_to_move.opposite();
            next.hash ^= zobrist::side_to_move_key();
        }

        next
    }

    /// Legal moves for `color`.
    pub fn valid_moves(&self, color: Color) -> Vec<Move> {
        MoveGenerator::new().valid_moves(self, color)
    }

    pub fn is_in_check(&self, color: Color) -> bool {
        attacks::is_in_check(self, color)
    }

    pub fn is_attacked(&self, square: Square, by: Color) -> bool {
        attacks::is_attacked(self, square, by)
    }

    #[inline]
    fn remove_piece(&mut self, piece: Piece, square: Square) {
        self.squares[square.index()] = None;
        self.hash ^= zobrist::piece_square_key(piece, square);
    }

    #[inline]
    fn place_piece(&mut self, piece: Piece, square: Square) {
        self.squares[square.index()] = Some(piece);
        self.hash ^= zobrist::piece_square_key(piece, square);
    }

    fn set_castling_rights(&mut self, rights: CastlingRights) {
        for side in CastlingSide::ALL {
            if self.castling_rights.has(side) != rights.has(side) {
                self.hash ^= zobrist::castling_key(side);
            }
        }
        self.castling_rights = rights;
    }

    fn set_en_passant_target(&mut self, target: Option<Square>) {
        if self.en_passant_target == target {
            return;
        }
        if let Some(old) = self.en_passant_target {
            self.hash ^= zobrist::en_passant_file_key(old.file());
        }
        if let Some(new) = target {
            self.hash ^= zobrist::en_passant_file_key(new.file());
        }
        self.en_passant_target = target;
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::starting_position()
    }
}

// Move clocks are not part of a position's identity.
impl PartialEq for Board {
    fn eq(&self, other: &Self) -> bool {
        self.squares == other.squares
            && self.side_to_move == other.side_to_move
            && self.castling_rights == other.castling_rights
            && self.en_passant_target == other.en_passant_target
    }
}

impl Eq for Board {}

impl Hash for Board {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u32(self.hash);
    }
}
