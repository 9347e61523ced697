//! Perft node counting for move-generator verification.
//!
//! Promotions always produce a queen in this crate, so published perft
//! numbers only apply to positions and depths where no pawn promotes.

use crate::game_state::board::Board;
use crate::move_generation::move_generator::MoveGenerator;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PerftCounts {
    pub nodes: usize,
    pub captures: usize,
    pub en_passant: usize,
    pub castles: usize,
    pub promotions: usize,
    pub checks: usize,
    pub checkmates: usize,
}

pub fn perft(board: &Board, depth: u8) -> PerftCounts {
    let mut generator = MoveGenerator::new();
    let mut counts = PerftCounts::default();
    if depth == 0 {
        counts.nodes = 1;
        return counts;
    }
    perft_recurse(&mut generator, board, depth, &mut counts);
    counts
}

/// Leaf count only; skips the per-leaf classification work.
pub fn perft_nodes(board: &Board, depth: u8) -> u64 {
    fn recurse(generator: &mut MoveGenerator, board: &Board, depth: u8) -> u64 {
        let moves = generator.valid_moves(board, board.side_to_move());
        if depth == 1 {
            return moves.len() as u64;
        }
        moves
            .into_iter()
            .map(|mv| recurse(generator, &board.derive(mv, true), depth - 1))
            .sum()
    }

    if depth == 0 {
        return 1;
    }
    recurse(&mut MoveGenerator::new(), board, depth)
}

fn perft_recurse(generator: &mut MoveGenerator, board: &Board, depth: u8, counts: &mut PerftCounts) {
    let mover = board.side_to_move();
    for mv in generator.valid_moves(board, mover) {
        let next = board.derive(mv, true);
        if depth > 1 {
            perft_recurse(generator, &next, depth - 1, counts);
            continue;
        }

        counts.nodes += 1;
        if mv.is_capture() {
            counts.captures += 1;
            if board.piece_at(mv.to).is_none() {
                counts.en_passant += 1;
            }
        }
        if mv.is_castling() {
            counts.castles += 1;
        }
        if mv.is_promotion() {
            counts.promotions += 1;
        }
        if next.is_in_check(mover.opposite()) {
            counts.checks += 1;
            if !generator.has_valid_move(&next, mover.opposite()) {
                counts.checkmates += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_state::chess_rules::STARTING_POSITION_FEN;
    use crate::utils::fen_parser::parse_fen;

    const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
    const ENDGAME: &str = "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1";

    #[test]
    fn perft_depth_zero_counts_single_node() {
        let counts = perft(&Board::starting_position(), 0);
        assert_eq!(
            counts,
            PerftCounts {
                nodes: 1,
                ..PerftCounts::default()
            }
        );
    }

    #[test]
    fn starting_position_node_counts() {
        let board = parse_fen(STARTING_POSITION_FEN).expect("FEN");
        assert_eq!(perft_nodes(&board, 1), 20);
        assert_eq!(perft_nodes(&board, 2), 400);
        assert_eq!(perft_nodes(&board, 3), 8902);
    }

    #[test]
    fn kiwipete_counts_castles_and_en_passant() {
        let board = parse_fen(KIWIPETE).expect("FEN");
        let d1 = perft(&board, 1);
        assert_eq!(d1.nodes, 48);
        assert_eq!(d1.captures, 8);
        assert_eq!(d1.castles, 2);

        let d2 = perft(&board, 2);
        assert_eq!(d2.nodes, 2039);
        assert_eq!(d2.captures, 351);
        assert_eq!(d2.en_passant, 1);
        assert_eq!(d2.castles, 91);
        assert_eq!(d2.checks, 3);
    }

    #[test]
    fn endgame_position_counts() {
        let board = parse_fen(ENDGAME).expect("FEN");
        assert_eq!(perft_nodes(&board, 1), 14);
        assert_eq!(perft_nodes(&board, 2), 191);
        let d3 = perft(&board, 3);
        assert_eq!(d3.nodes, 2812);
        assert_eq!(d3.captures, 209);
        assert_eq!(d3.en_passant, 2);
        assert_eq!(d3.checks, 267);
    }
}
