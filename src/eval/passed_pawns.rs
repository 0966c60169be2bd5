//! Passed-pawn bonuses, scaled by how close the pawn is to promoting and
//! whether its path is controlled by the defending king or blockers.

use crate::position::Position;
use crate::types::{Bitboard, Color, PieceType};

const RANK_BONUS_MG: [i32; 8] = [0, 5, 10, 20, 35, 60, 100, 0];
const RANK_BONUS_EG: [i32; 8] = [0, 10, 20, 40, 65, 110, 170, 0];

#[must_use]
pub fn evaluate(pos: &Position, color: Color, passed: Bitboard) -> (i32, i32) {
    let mut mg = 0i32;
    let mut eg = 0i32;
    let their_king = pos.king_square(color.opponent());
    let our_king = pos.king_square(color);

    for sq in passed.iter() {
        let rank = sq.relative_rank(color.is_white()) as usize;
        let mut m = RANK_BONUS_MG[rank];
        let mut e = RANK_BONUS_EG[rank];

        if rank >= 3 {
            let promo_rank = if color.is_white() { 7 } else { 0 };
            let promo_sq = crate::types::Square::new(promo_rank, sq.file());
            let king_dist_them = their_king.distance(promo_sq) as i32;
            let king_dist_us = our_king.distance(promo_sq) as i32;
            e += (king_dist_them - king_dist_us) * 8;

            if pos.piece_at(promo_sq) == PieceType::None || pos.color_at(promo_sq) == Some(color) {
                m += 5;
            }
        }

        mg += m;
        eg += e;
    }

    (mg, eg)
}
