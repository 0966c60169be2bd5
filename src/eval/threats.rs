//! Threat evaluation: bonuses for attacking undefended or more valuable
//! enemy pieces.

use crate::bitboards::{bishop_attacks, king_attacks_from, knight_attacks_from, pawn_attacks_from, rook_attacks};
use crate::position::Position;
use crate::types::{Bitboard, Color, PieceType};

#[must_use]
pub fn evaluate(pos: &Position, color: Color) -> (i32, i32) {
    let occ = pos.occupied();
    let them = color.opponent();
    let their_pieces = pos.occupied_by(them);

    let mut our_attacks = Bitboard::EMPTY;
    for sq in pos.occupied_by(color).iter() {
        our_attacks |= attacks_from(pos, sq, occ);
    }
    let mut their_defends = Bitboard::EMPTY;
    for sq in their_pieces.iter() {
        their_defends |= attacks_from(pos, sq, occ);
    }

    let mut mg = 0i32;
    let mut eg = 0i32;
    let weak = their_pieces & our_attacks & !their_defends;
    for sq in weak.iter() {
        let value = pos.piece_at(sq).see_value() / 64;
        mg += value;
        eg += value;
    }

    let hanging_minor_or_major = their_pieces
        & our_attacks
        & (pos.pieces(PieceType::Knight)
            | pos.pieces(PieceType::Bishop)
            | pos.pieces(PieceType::Rook)
            | pos.pieces(PieceType::Queen));
    mg += hanging_minor_or_major.popcount() as i32 * 3;

    (mg, eg)
}

fn attacks_from(pos: &Position, sq: crate::types::Square, occ: Bitboard) -> Bitboard {
    let piece = pos.piece_at(sq);
    let color = pos.color_at(sq).unwrap_or(Color::White);
    match piece {
        PieceType::Pawn => pawn_attacks_from(color, sq),
        PieceType::Knight => knight_attacks_from(sq),
        PieceType::Bishop => bishop_attacks(sq, occ),
        PieceType::Rook => rook_attacks(sq, occ),
        PieceType::Queen => bishop_attacks(sq, occ) | rook_attacks(sq, occ),
        PieceType::King => king_attacks_from(sq),
        PieceType::None => Bitboard::EMPTY,
    }
}

