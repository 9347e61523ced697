//! Zobrist hashing support for fast position identity and repetition tracking.
//!
//! The keys are 32-bit and generated once per process from a fixed seed with
//! an inline splitmix64 stream, so hashes do not change across runs or
//! dependency upgrades; opening-book files depend on that.
//! Boards XOR keys in and out as pieces move and never rebuild the hash on the
//! search path.

use std::sync::OnceLock;

use crate::game_state::chess_types::{CastlingSide, Piece, Square};

const ZOBRIST_SEED: u64 = 0x9E37_79B9_7F4A_7C15;

#[derive(Debug)]
struct ZobristTables {
    piece_square: [[u32; 64]; 12],
    black_to_move: u32,
    castling: [u32; 4],
    en_passant_file: [u32; 8],
}

static TABLES: OnceLock<ZobristTables> = OnceLock::new();

#[inline]
fn tables() -> &'static ZobristTables {
    TABLES.get_or_init(build_tables)
}

fn build_tables() -> ZobristTables {
    let mut state = ZOBRIST_SEED;

    let mut piece_square = [[0u32; 64]; 12];
    for piece in &mut piece_square {
        for key in piece.iter_mut() {
            *key = next_key(&mut state);
        }
    }

    let black_to_move = next_key(&mut state);

    let mut castling = [0u32; 4];
    for key in &mut castling {
        *key = next_key(&mut state);
    }

    let mut en_passant_file = [0u32; 8];
    for key in &mut en_passant_file {
        *key = next_key(&mut state);
    }

    ZobristTables {
        piece_square,
        black_to_move,
        castling,
        en_passant_file,
    }
}

#[inline]
fn next_random_u64(state: &mut u64) -> u64 {
    // splitmix64
    *state = state.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// High half of the next splitmix64 output.
#[inline]
fn next_key(state: &mut u64) -> u32 {
    (next_random_u64(state) >> 32) as u32
}

/// Key for `piece` standing on `square`.
#[inline]
pub fn piece_square_key(piece: Piece, square: Square) -> u32 {
    tables().piece_square[piece.ordinal()][square.index()]
}

/// Key xor'ed in while black is to move.
#[inline]
pub fn side_to_move_key() -> u32 {
    tables().black_to_move
}

#[inline]
pub fn castling_key(side: CastlingSide) -> u32 {
    tables().castling[side.index()]
}

/// Key for an en-passant target on `file` (0..=7).
#[inline]
pub fn en_passant_file_key(file: u8) -> u32 {
    tables().en_passant_file[usize::from(file)]
}
