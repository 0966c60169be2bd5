//! Initiative: a small correction favoring the side better placed to
//! create complications, derived from pawn spread and piece count —
//! independent of whose favor the raw score currently reads.

use crate::position::Position;
use crate::types::{Bitboard, PieceType};

#[must_use]
pub fn evaluate(pos: &Position, eg_score: i32) -> i32 {
    let pawns = pos.pieces(PieceType::Pawn);
    let pawn_count = pawns.popcount() as i32;

    let files_occupied = (0..8).filter(|&f| (pawns & Bitboard::file(f)).popcount() > 0).count() as i32;
    let both_flanks = files_occupied >= 6;

    let total_material = pos.occupied().popcount() as i32;
    let outcome_unclear = total_material <= 14;

    let bonus =
        pawn_count * 2 + if both_flanks { 10 } else { 0 } + if outcome_unclear { 8 } else { 0 } - 28;

    // Push the score further toward whichever side already stands better,
    // but never flip its sign.
    eg_score.signum() * bonus.max(-eg_score.abs())
}
