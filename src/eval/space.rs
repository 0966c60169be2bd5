//! Space bonus: reward controlling squares in one's own camp when there
//! are enough pieces left on the board for it to matter.

use crate::bitboards::{bishop_attacks, king_attacks_from, knight_attacks_from, pawn_attacks_from, rook_attacks};
use crate::position::Position;
use crate::types::{Bitboard, Color, PieceType};

#[must_use]
pub fn evaluate(pos: &Position, color: Color) -> i32 {
    let total_pieces = pos.occupied().popcount();
    if total_pieces < 12 {
        return 0;
    }

    let camp = if color.is_white() {
        Bitboard::RANK_2 | Bitboard::RANK_4 | Bitboard::rank(2)
    } else {
        Bitboard::RANK_7 | Bitboard::RANK_5 | Bitboard::rank(5)
    };
    let camp = camp & Bitboard::CENTER_FILES;

    let occ = pos.occupied();
    let mut controlled = Bitboard::EMPTY;
    for sq in pos.occupied_by(color).iter() {
        controlled |= match pos.piece_at(sq) {
            PieceType::Pawn => pawn_attacks_from(color, sq),
            PieceType::Knight => knight_attacks_from(sq),
            PieceType::Bishop => bishop_attacks(sq, occ),
            PieceType::Rook => rook_attacks(sq, occ),
            PieceType::Queen => bishop_attacks(sq, occ) | rook_attacks(sq, occ),
            PieceType::King => king_attacks_from(sq),
            PieceType::None => Bitboard::EMPTY,
        };
    }

    let blocked_bonus = (camp & controlled & !pos.occupied_by(color.opponent())).popcount() as i32;
    blocked_bonus * 2
}
