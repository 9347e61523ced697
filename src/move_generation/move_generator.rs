//! Legal move generation on the 10x12 mailbox.
//!
//! Generation runs in two stages. `pseudo_legal_targets` fills the
//! generator's fixed scratch buffer with every square the piece on a square
//! could reach ignoring king safety; `valid_moves_from` then turns each target
//! into a `Move` and keeps it only if a non-turn-advancing `derive` leaves the
//! mover's king out of check.
//!
//! The scratch buffer belongs to the generator instance and every method that
//! touches it takes `&mut self`, so the borrow checker serializes access. A
//! generator shared between threads has to sit behind a `Mutex`.

use crate::game_state::board::Board;
use crate::game_state::chess_types::*;
use crate::move_generation::attacks::{is_attacked, is_in_check};
use crate::moves::chess_move::Move;
use crate::moves::mailbox::{
    step, BISHOP_DIRECTIONS, KING_OFFSETS, KNIGHT_OFFSETS, PAWN_CAPTURES, PAWN_PUSH,
    ROOK_DIRECTIONS,
};

/// Most squares a single piece can reach: a queen in the centre of an empty
/// board.
pub const MAX_TARGETS: usize = 27;

/// Fixed-capacity target list reused across scans.
#[derive(Debug, Clone)]
pub struct TargetBuffer {
    squares: [Square; MAX_TARGETS],
    len: usize,
}

impl TargetBuffer {
    pub const fn new() -> Self {
        Self {
            squares: [Square::A1; MAX_TARGETS],
            len: 0,
        }
    }

    #[inline]
    fn clear(&mut self) {
        self.len = 0;
    }

    #[inline]
    fn push(&mut self, square: Square) {
        debug_assert!(self.len < MAX_TARGETS, "target buffer overflow");
        if self.len < MAX_TARGETS {
            self.squares[self.len] = square;
            self.len += 1;
        }
    }

    #[inline]
    pub fn as_slice(&self) -> &[Square] {
        &self.squares[..self.len]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Default for TargetBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Default)]
pub struct MoveGenerator {
    targets: TargetBuffer,
}

impl MoveGenerator {
    pub const fn new() -> Self {
        Self {
            targets: TargetBuffer::new(),
        }
    }

    /// All legal moves for `color`, in board order (a1 first).
    pub fn valid_moves(&mut self, board: &Board, color: Color) -> Vec<Move> {
        let mut moves = Vec::with_capacity(48);
        for square in Square::ALL {
            if board.piece_at(square).is_some_and(|p| p.color == color) {
                self.collect_from(board, square, true, &mut moves);
            }
        }
        moves
    }

    /// Legal moves of the piece standing on `from`.
    pub fn valid_moves_from(&mut self, board: &Board, from: Square) -> Vec<Move> {
        let mut moves = Vec::with_capacity(MAX_TARGETS);
        self.collect_from(board, from, true, &mut moves);
        moves
    }

    /// Moves for `color` that may still leave its own king in check.
    pub fn pseudo_legal_moves(&mut self, board: &Board, color: Color) -> Vec<Move> {
        let mut moves = Vec::with_capacity(64);
        for square in Square::ALL {
            if board.piece_at(square).is_some_and(|p| p.color == color) {
                self.collect_from(board, square, false, &mut moves);
            }
        }
        moves
    }

    /// Whether `color` has at least one legal move. Stops at the first one.
    pub fn has_valid_move(&mut self, board: &Board, color: Color) -> bool {
        for from in Square::ALL {
            let Some(piece) = board.piece_at(from) else {
                continue;
            };
            if piece.color != color {
                continue;
            }
            self.scan_targets(board, from, piece);
            if self
                .targets
                .as_slice()
                .iter()
                .any(|&to| is_legal(board, make_move(board, piece, from, to)))
            {
                return true;
            }
        }
        false
    }

    /// Squares the piece on `from` could move to, ignoring king safety.
    /// Castling destinations are included when the right is held, the path is
    /// empty and the rook is home; check safety is left to the legal filter.
    pub fn pseudo_legal_targets(&mut self, board: &Board, from: Square) -> &[Square] {
        match board.piece_at(from) {
            Some(piece) => self.scan_targets(board, from, piece),
            None => self.targets.clear(),
        }
        self.targets.as_slice()
    }

    fn collect_from(&mut self, board: &Board, from: Square, legal_only: bool, out: &mut Vec<Move>) {
        let Some(piece) = board.piece_at(from) else {
            return;
        };
        self.scan_targets(board, from, piece);
        for &to in self.targets.as_slice() {
            let mv = make_move(board, piece, from, to);
            if !legal_only || is_legal(board, mv) {
                out.push(mv);
            }
        }
    }

    fn scan_targets(&mut self, board: &Board, from: Square, piece: Piece) {
        self.targets.clear();
        match piece.kind {
            PieceType::Pawn => self.scan_pawn(board, from, piece.color),
            PieceType::Knight => self.scan_steps(board, from, piece.color, &KNIGHT_OFFSETS),
            PieceType::Bishop => self.scan_rays(board, from, piece.color, &BISHOP_DIRECTIONS),
            PieceType::Rook => self.scan_rays(board, from, piece.color, &ROOK_DIRECTIONS),
            PieceType::Queen => {
                self.scan_rays(board, from, piece.color, &BISHOP_DIRECTIONS);
                self.scan_rays(board, from, piece.color, &ROOK_DIRECTIONS);
            }
            PieceType::King => {
                self.scan_steps(board, from, piece.color, &KING_OFFSETS);
                self.scan_castling(board, from, piece.color);
            }
        }
    }

    fn scan_pawn(&mut self, board: &Board, from: Square, color: Color) {
        let forward: i8 = if color.is_white() { 1 } else { -1 };

        if let Some(one) = step(from, PAWN_PUSH * forward) {
            if board.piece_at(one).is_none() {
                self.targets.push(one);
                if from.rank() == color.pawn_rank() {
                    if let Some(two) = step(one, PAWN_PUSH * forward) {
                        if board.piece_at(two).is_none() {
                            self.targets.push(two);
                        }
                    }
                }
            }
        }

        for offset in PAWN_CAPTURES {
            let Some(target) = step(from, offset * forward) else {
                continue;
            };
            let enemy = board.piece_at(target).is_some_and(|p| p.color != color);
            if enemy || board.en_passant_target() == Some(target) {
                self.targets.push(target);
            }
        }
    }

    fn scan_steps(&mut self, board: &Board, from: Square, color: Color, offsets: &[i8]) {
        for &offset in offsets {
            if let Some(target) = step(from, offset) {
                if !matches!(board.piece_at(target), Some(p) if p.color == color) {
                    self.targets.push(target);
                }
            }
        }
    }

    fn scan_rays(&mut self, board: &Board, from: Square, color: Color, directions: &[i8]) {
        for &direction in directions {
            let mut cursor = from;
            while let Some(target) = step(cursor, direction) {
                match board.piece_at(target) {
                    None => self.targets.push(target),
                    Some(p) => {
                        if p.color != color {
                            self.targets.push(target);
                        }
                        break;
                    }
                }
                cursor = target;
            }
        }
    }

    fn scan_castling(&mut self, board: &Board, from: Square, color: Color) {
        let rook = Piece::new(color, PieceType::Rook);
        for side in CastlingSide::sides_for(color) {
            if !board.castling_rights().has(side) {
                continue;
            }
            if from.rank() != color.home_rank() || from.file() != 4 {
                continue;
            }
            let corner = side.rook_square();
            if board.piece_at(corner) != Some(rook) {
                continue;
            }
            let (low, high) = if corner.file() < from.file() {
                (corner.file() + 1, from.file())
            } else {
                (from.file() + 1, corner.file())
            };
            let path_clear = (low..high).all(|file| {
                Square::from_file_rank(file, from.rank()).is_some_and(|sq| board.piece_at(sq).is_none())
            });
            if path_clear {
                self.targets.push(side.king_target());
            }
        }
    }
}

/// Build the move record for `piece` going `from -> to`, filling in the
/// victim of an en-passant capture.
fn make_move(board: &Board, piece: Piece, from: Square, to: Square) -> Move {
    let mut captured = board.piece_at(to);
    if captured.is_none()
        && piece.kind == PieceType::Pawn
        && from.file() != to.file()
        && board.en_passant_target() == Some(to)
    {
        captured = Square::from_file_rank(to.file(), from.rank()).and_then(|sq| board.piece_at(sq));
    }
    Move::new(piece, from, to, captured)
}

fn is_legal(board: &Board, mv: Move) -> bool {
    let color = mv.piece.color;
    if mv.is_castling() {
        if is_in_check(board, color) {
            return false;
        }
        let passing_file = (mv.from.file() + mv.to.file()) / 2;
        let passing = Square::from_file_rank(passing_file, mv.from.rank());
        if passing.is_some_and(|sq| is_attacked(board, sq, color.opposite())) {
            return false;
        }
    }
    !is_in_check(&board.derive(mv, false), color)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::fen_parser::parse_fen;

    fn sq(name: &str) -> Square {
        Square::from_notation(name).expect("test square should parse")
    }

    fn targets_of(fen: &str, from: &str) -> Vec<String> {
        let board = parse_fen(fen).expect("FEN");
        let mut generator = MoveGenerator::new();
        let mut names: Vec<String> = generator
            .pseudo_legal_targets(&board, sq(from))
            .iter()
            .map(|s| s.notation())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn starting_position_has_twenty_moves() {
        let board = Board::starting_position();
        let mut generator = MoveGenerator::new();
        assert_eq!(generator.valid_moves(&board, Color::White).len(), 20);
        assert_eq!(generator.valid_moves(&board, Color::Black).len(), 20);
    }

    #[test]
    fn queen_in_open_centre_fills_buffer() {
        let targets = targets_of("k7/8/8/8/3Q4/8/8/7K w - - 0 1", "d4");
        assert_eq!(targets.len(), MAX_TARGETS);
    }

    #[test]
    fn rook_ray_stops_at_first_piece() {
        let targets = targets_of("4k3/8/8/8/R2p4/8/8/4K3 w - - 0 1", "a4");
        assert!(targets.contains(&"d4".to_owned()));
        assert!(!targets.contains(&"e4".to_owned()));
        assert!(targets.contains(&"a1".to_owned()));
        assert!(targets.contains(&"a8".to_owned()));
        assert_eq!(targets.len(), 10);
    }

    #[test]
    fn pawn_pushes_captures_and_en_passant() {
        let targets = targets_of("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 2", "e5");
        assert_eq!(targets, vec!["d6".to_owned(), "e6".to_owned()]);

        let board = parse_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 2").expect("FEN");
        let mut generator = MoveGenerator::new();
        let ep = generator
            .valid_moves_from(&board, sq("e5"))
            .into_iter()
            .find(|m| m.to == sq("d6"))
            .expect("en passant should be legal");
        assert_eq!(ep.captured, Some(Piece::BLACK_PAWN));

        let start = targets_of(crate::game_state::chess_rules::STARTING_POSITION_FEN, "b7");
        assert_eq!(start, vec!["b5".to_owned(), "b6".to_owned()]);
    }

    #[test]
    fn blocked_pawn_cannot_double_push() {
        let targets = targets_of("4k3/8/8/8/8/4n3/4P3/4K3 w - - 0 1", "e2");
        assert!(targets.is_empty());
    }

    #[test]
    fn castling_requires_empty_path_and_home_rook() {
        let both = targets_of("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1", "e1");
        assert!(both.contains(&"g1".to_owned()));
        assert!(both.contains(&"c1".to_owned()));

        let blocked = targets_of("r3k2r/8/8/8/8/8/8/RN2K1NR w KQkq - 0 1", "e1");
        assert!(!blocked.contains(&"g1".to_owned()));
        assert!(!blocked.contains(&"c1".to_owned()));

        let no_rook = targets_of("r3k2r/8/8/8/8/8/8/4K3 w KQkq - 0 1", "e1");
        assert!(!no_rook.contains(&"g1".to_owned()));
    }

    #[test]
    fn castling_rejected_out_of_and_through_check() {
        let mut generator = MoveGenerator::new();

        let in_check = parse_fen("4k3/4r3/8/8/8/8/8/R3K2R w KQ - 0 1").expect("FEN");
        let moves = generator.valid_moves_from(&in_check, sq("e1"));
        assert!(moves.iter().all(|m| !m.is_castling()));

        let through_check = parse_fen("4k3/5r2/8/8/8/8/8/R3K2R w KQ - 0 1").expect("FEN");
        let moves = generator.valid_moves_from(&through_check, sq("e1"));
        assert!(!moves.iter().any(|m| m.to == sq("g1")));
        assert!(moves.iter().any(|m| m.to == sq("c1")));
    }

    #[test]
    fn pinned_piece_cannot_leave_the_line() {
        let board = parse_fen("4k3/4r3/8/8/8/8/4B3/4K3 w - - 0 1").expect("FEN");
        let mut generator = MoveGenerator::new();
        assert!(generator.valid_moves_from(&board, sq("e2")).is_empty());
        let pseudo = generator.pseudo_legal_moves(&board, Color::White);
        assert_eq!(pseudo.iter().filter(|m| m.from == sq("e2")).count(), 9);
    }

    #[test]
    fn legal_moves_never_leave_own_king_in_check() {
        let fens = [
            crate::game_state::chess_rules::STARTING_POSITION_FEN,
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
            "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8",
        ];
        let mut generator = MoveGenerator::new();
        for fen in fens {
            let board = parse_fen(fen).expect("FEN");
            for color in [Color::White, Color::Black] {
                for mv in generator.valid_moves(&board, color) {
                    let after = board.derive(mv, true);
                    assert!(!after.is_in_check(color), "{fen}: {mv} leaves king in check");
                }
            }
        }
    }

    #[test]
    fn has_valid_move_detects_mate_and_stalemate() {
        let mut generator = MoveGenerator::new();
        let mate = parse_fen("R5k1/5ppp/8/8/8/8/8/6K1 b - - 0 1").expect("FEN");
        assert!(!generator.has_valid_move(&mate, Color::Black));
        let stalemate = parse_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").expect("FEN");
        assert!(!generator.has_valid_move(&stalemate, Color::Black));
        assert!(!stalemate.is_in_check(Color::Black));
        assert!(generator.has_valid_move(&Board::starting_position(), Color::White));
    }
}
