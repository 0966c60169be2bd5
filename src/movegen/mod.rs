//! Pseudo-legal move generation, specialized per `GenKind`, plus a
//! `Legal` wrapper that filters through `Position::is_legal`.

mod pawns;

use crate::bitboards::{
    between, bishop_attacks, king_attacks_from, knight_attacks_from, queen_attacks, rook_attacks,
};
use crate::position::Position;
use crate::types::{CastleSide, Move, MoveList, PieceType};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum GenKind {
    All,
    Captures,
    Quiets,
    QuietChecks,
    Evasions,
    Legal,
}

#[must_use]
pub fn generate(pos: &Position, kind: GenKind) -> MoveList {
    let mut list = MoveList::new();
    if kind == GenKind::Legal {
        let pseudo = generate(pos, GenKind::All);
        for &mv in pseudo.iter() {
            if pos.is_legal(mv) {
                list.push(mv);
            }
        }
        return list;
    }
    if kind == GenKind::Evasions {
        generate_evasions(pos, &mut list);
        return list;
    }

    pawns::generate(pos, kind, &mut list);
    generate_piece_moves(pos, kind, &mut list);
    if matches!(kind, GenKind::All | GenKind::Quiets) {
        generate_castles(pos, &mut list);
    }
    list
}

fn generate_piece_moves(pos: &Position, kind: GenKind, list: &mut MoveList) {
    let us = pos.side_to_move();
    let occ = pos.occupied();
    let our_pieces = pos.occupied_by(us);
    let their_pieces = pos.occupied_by(us.opponent());

    let want_quiets = matches!(kind, GenKind::All | GenKind::Quiets | GenKind::QuietChecks);
    let want_captures = matches!(kind, GenKind::All | GenKind::Captures);

    for (piece, attacks_fn) in [
        (PieceType::Knight, knight_attacks_from as fn(crate::types::Square) -> crate::types::Bitboard),
    ] {
        for from in pos.pieces_colored(us, piece).iter() {
            let targets = attacks_fn(from) & !our_pieces;
            emit(from, targets, their_pieces, want_quiets, want_captures, list);
        }
    }
    for from in pos.pieces_colored(us, PieceType::King).iter() {
        let targets = king_attacks_from(from) & !our_pieces;
        emit(from, targets, their_pieces, want_quiets, want_captures, list);
    }
    for from in pos.pieces_colored(us, PieceType::Bishop).iter() {
        let targets = bishop_attacks(from, occ) & !our_pieces;
        emit(from, targets, their_pieces, want_quiets, want_captures, list);
    }
    for from in pos.pieces_colored(us, PieceType::Rook).iter() {
        let targets = rook_attacks(from, occ) & !our_pieces;
        emit(from, targets, their_pieces, want_quiets, want_captures, list);
    }
    for from in pos.pieces_colored(us, PieceType::Queen).iter() {
        let targets = queen_attacks(from, occ) & !our_pieces;
        emit(from, targets, their_pieces, want_quiets, want_captures, list);
    }
}

fn emit(
    from: crate::types::Square,
    targets: crate::types::Bitboard,
    their_pieces: crate::types::Bitboard,
    want_quiets: bool,
    want_captures: bool,
    list: &mut MoveList,
) {
    for to in targets.iter() {
        let is_capture = their_pieces.contains(to);
        if (is_capture && want_captures) || (!is_capture && want_quiets) {
            list.push(Move::simple(from, to));
        }
    }
}

fn generate_castles(pos: &Position, list: &mut MoveList) {
    let us = pos.side_to_move();
    let king = pos.king_square(us);
    for side in [CastleSide::King, CastleSide::Queen] {
        if let Some(rook) = pos.rook_origin(us, side) {
            let bit = crate::position::fen_castling_bit(us, side);
            if pos.castling_rights().as_u8() & bit != 0 {
                let mv = Move::castle(king, rook);
                if pos.pseudo_legal(mv) {
                    list.push(mv);
                }
            }
        }
    }
}

/// Evasions: when in check, only moves that block, capture the checker,
/// or move the king are pseudo-legal candidates. The checker count and
/// identity drive which of those apply.
fn generate_evasions(pos: &Position, list: &mut MoveList) {
    let us = pos.side_to_move();
    let king = pos.king_square(us);
    let checkers = pos.checkers();
    let our_pieces = pos.occupied_by(us);

    let king_targets = king_attacks_from(king) & !our_pieces;
    for to in king_targets.iter() {
        list.push(Move::simple(king, to));
    }

    if checkers.more_than_one() {
        // Double check: only king moves escape.
        return;
    }

    let checker_sq = checkers.lsb();
    let block_mask = between(king, checker_sq);
    let target_mask = block_mask | checkers;

    let all = generate(pos, GenKind::All);
    for &mv in all.iter() {
        if mv.from() == king || mv.is_castle() {
            continue;
        }
        if mv.is_en_passant() {
            let cap_sq = crate::types::Square::new(mv.from().rank(), mv.to().file());
            if checkers.contains(cap_sq) {
                list.push(mv);
            }
            continue;
        }
        if target_mask.contains(mv.to()) {
            list.push(mv);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::Position;

    #[test]
    fn startpos_has_twenty_legal_moves() {
        let pos = Position::startpos();
        let moves = generate(&pos, GenKind::Legal);
        assert_eq!(moves.len(), 20);
    }

    #[test]
    fn kiwipete_move_count() {
        let pos = Position::from_fen(
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        )
        .unwrap();
        let moves = generate(&pos, GenKind::Legal);
        assert_eq!(moves.len(), 48);
    }
}
