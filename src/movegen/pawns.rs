//! Pawn move generation: single/double pushes, captures, en passant and
//! promotions all need distinct handling, unlike every other piece type.

use crate::bitboards::pawn_attacks_from;
use crate::position::Position;
use crate::types::{Move, MoveList, PieceType, Square, PROMOTION_PIECES};

use super::GenKind;

pub fn generate(pos: &Position, kind: GenKind, list: &mut MoveList) {
    let us = pos.side_to_move();
    let them = us.opponent();
    let pawns = pos.pieces_colored(us, PieceType::Pawn);
    let occ = pos.occupied();
    let their_pieces = pos.occupied_by(them);
    let promo_rank = if us.is_white() { 6u8 } else { 1u8 };

    let want_quiets = matches!(kind, GenKind::All | GenKind::Quiets | GenKind::QuietChecks);
    let want_captures = matches!(kind, GenKind::All | GenKind::Captures);

    for from in pawns.iter() {
        let on_promo_rank = from.rank() == promo_rank;

        if want_quiets || want_captures {
            if let Some(single) = from.forward(us.is_white()) {
                if !occ.contains(single) {
                    if want_quiets && !on_promo_rank {
                        list.push(Move::simple(from, single));
                    } else if want_captures && on_promo_rank {
                        push_promotions(from, single, list);
                    }
                    if want_quiets && from.relative_rank(us.is_white()) == 1 {
                        if let Some(double) = single.forward(us.is_white()) {
                            if !occ.contains(double) {
                                list.push(Move::simple(from, double));
                            }
                        }
                    }
                }
            }
        }

        if want_captures {
            let targets = pawn_attacks_from(us, from) & their_pieces;
            for to in targets.iter() {
                if on_promo_rank {
                    push_promotions(from, to, list);
                } else {
                    list.push(Move::simple(from, to));
                }
            }
            if let Some(ep) = pos.en_passant_square() {
                if pawn_attacks_from(us, from).contains(ep) {
                    list.push(Move::en_passant(from, ep));
                }
            }
        }
    }
}

fn push_promotions(from: Square, to: Square, list: &mut MoveList) {
    for piece in PROMOTION_PIECES {
        list.push(Move::promote(from, to, piece));
    }
}
