//! Piece mobility and outpost bonuses.

use crate::bitboards::{bishop_attacks, knight_attacks_from, pawn_attacks_from, rook_attacks};
use crate::position::Position;
use crate::types::{Color, PieceType};

const MOBILITY_MG: [i32; 6] = [0, 4, 5, 3, 2, 0];
const MOBILITY_EG: [i32; 6] = [0, 4, 4, 4, 6, 0];

#[must_use]
pub fn evaluate(pos: &Position, color: Color) -> (i32, i32) {
    let occ = pos.occupied();
    let own = pos.occupied_by(color);
    let mut mg = 0i32;
    let mut eg = 0i32;

    for piece in [PieceType::Knight, PieceType::Bishop, PieceType::Rook, PieceType::Queen] {
        for sq in pos.pieces_colored(color, piece).iter() {
            let attacks = match piece {
                PieceType::Knight => knight_attacks_from(sq),
                PieceType::Bishop => bishop_attacks(sq, occ),
                PieceType::Rook => rook_attacks(sq, occ),
                PieceType::Queen => bishop_attacks(sq, occ) | rook_attacks(sq, occ),
                _ => unreachable!(),
            };
            let count = (attacks & !own).popcount() as i32;
            mg += count * MOBILITY_MG[piece.index()];
            eg += count * MOBILITY_EG[piece.index()];
        }
    }

    mg += outposts(pos, color);

    (mg, eg)
}

fn outposts(pos: &Position, color: Color) -> i32 {
    let mut bonus = 0;
    let their_pawns = pos.pieces_colored(color.opponent(), PieceType::Pawn);
    for piece in [PieceType::Knight, PieceType::Bishop] {
        for sq in pos.pieces_colored(color, piece).iter() {
            let rank = sq.relative_rank(color.is_white());
            if !(3..=5).contains(&rank) {
                continue;
            }
            let defended = pawn_attacks_from(color.opponent(), sq).intersects(
                pos.pieces_colored(color, PieceType::Pawn),
            );
            let attackable = pawn_attacks_from(color, sq).intersects(their_pawns);
            if defended && !attackable {
                bonus += 18;
            }
        }
    }
    bonus
}
