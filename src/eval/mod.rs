//! Tapered, multi-term static evaluation.
//!
//! Every term is computed in (middlegame, endgame) pairs and interpolated
//! by the current game phase. `TRACE` is a const generic rather than a
//! runtime flag so the hot, non-traced search path pays nothing for the
//! tracer's bookkeeping; the `uci debug` "eval" report is the only caller
//! that sets it.

pub mod initiative;
pub mod king_safety;
pub mod material;
pub mod mobility;
pub mod passed_pawns;
pub mod pawns;
pub mod scale;
pub mod space;
pub mod tables;
pub mod threats;

use crate::position::Position;
use crate::types::{Color, PieceType, PIECE_TYPES};

pub use material::MaterialHashTable;
pub use pawns::PawnHashTable;

/// Score is large enough that search code can distinguish "lazy-exited
/// eval" from genuine near-mate scores.
pub const LAZY_THRESHOLD: i32 = 1500;

#[derive(Default, Debug, Clone, Copy)]
pub struct EvalTrace {
    pub material_mg: i32,
    pub material_eg: i32,
    pub pawns_mg: i32,
    pub pawns_eg: i32,
    pub king_safety_mg: i32,
    pub king_safety_eg: i32,
    pub mobility_mg: i32,
    pub mobility_eg: i32,
    pub threats_mg: i32,
    pub threats_eg: i32,
    pub passed_mg: i32,
    pub passed_eg: i32,
    pub space_mg: i32,
    pub initiative: i32,
    pub scale: i32,
    pub total: i32,
}

fn material_and_psq(pos: &Position) -> (i32, i32) {
    let mut mg = 0;
    let mut eg = 0;
    for color in [Color::White, Color::Black] {
        let sign = if color.is_white() { 1 } else { -1 };
        for piece in PIECE_TYPES {
            for sq in pos.pieces_colored(color, piece).iter() {
                mg += sign
                    * (tables::MG_VALUE[piece.index()] + tables::psq_mg(piece, color.is_white(), sq));
                eg += sign
                    * (tables::EG_VALUE[piece.index()] + tables::psq_eg(piece, color.is_white(), sq));
            }
        }
    }
    (mg, eg)
}

fn game_phase(pos: &Position) -> i32 {
    let mut phase = 0;
    for piece in [PieceType::Knight, PieceType::Bishop, PieceType::Rook, PieceType::Queen] {
        phase += tables::PHASE_WEIGHT[piece.index()] * pos.pieces(piece).popcount() as i32;
    }
    phase.min(tables::TOTAL_PHASE)
}

/// Evaluate `pos` from the side-to-move's perspective, in centipawns.
#[must_use]
pub fn evaluate(pos: &Position, pawn_table: &mut PawnHashTable, material_table: &mut MaterialHashTable) -> i32 {
    evaluate_traced::<false>(pos, pawn_table, material_table, &mut EvalTrace::default())
}

#[must_use]
pub fn evaluate_traced<const TRACE: bool>(
    pos: &Position,
    pawn_table: &mut PawnHashTable,
    material_table: &mut MaterialHashTable,
    trace: &mut EvalTrace,
) -> i32 {
    if !TRACE {
        if let Some(special) = material_table.probe(pos) {
            if let Some(score) = material::evaluate_special(pos, special) {
                return score;
            }
        }
    }

    let (mat_mg, mat_eg) = material_and_psq(pos);
    if TRACE {
        trace.material_mg = mat_mg;
        trace.material_eg = mat_eg;
    }

    if !TRACE && (mat_mg.abs() > LAZY_THRESHOLD && mat_eg.abs() > LAZY_THRESHOLD) {
        let phase = game_phase(pos);
        let tapered = taper(mat_mg, mat_eg, phase);
        return if pos.side_to_move().is_white() { tapered } else { -tapered };
    }

    let pawn_entry = pawn_table.probe(pos);

    let (ks_w_mg, ks_w_eg) = king_safety::evaluate(pos, Color::White);
    let (ks_b_mg, ks_b_eg) = king_safety::evaluate(pos, Color::Black);
    let king_mg = ks_w_mg - ks_b_mg;
    let king_eg = ks_w_eg - ks_b_eg;

    let (mob_w_mg, mob_w_eg) = mobility::evaluate(pos, Color::White);
    let (mob_b_mg, mob_b_eg) = mobility::evaluate(pos, Color::Black);
    let mob_mg = mob_w_mg - mob_b_mg;
    let mob_eg = mob_w_eg - mob_b_eg;

    let (thr_w_mg, thr_w_eg) = threats::evaluate(pos, Color::White);
    let (thr_b_mg, thr_b_eg) = threats::evaluate(pos, Color::Black);
    let threats_mg = thr_w_mg - thr_b_mg;
    let threats_eg = thr_w_eg - thr_b_eg;

    let (pp_w_mg, pp_w_eg) = passed_pawns::evaluate(pos, Color::White, pawn_entry.passed[0]);
    let (pp_b_mg, pp_b_eg) = passed_pawns::evaluate(pos, Color::Black, pawn_entry.passed[1]);
    let passed_mg = pp_w_mg - pp_b_mg;
    let passed_eg = pp_w_eg - pp_b_eg;

    let space_mg = space::evaluate(pos, Color::White) - space::evaluate(pos, Color::Black);

    let mut mg = mat_mg + pawn_entry.mg + king_mg + mob_mg + threats_mg + passed_mg + space_mg;
    let mut eg = mat_eg + pawn_entry.eg + king_eg + mob_eg + threats_eg + passed_eg;

    let init = initiative::evaluate(pos, eg);
    mg += init;
    eg += init;

    let phase = game_phase(pos);
    let sf = scale::scale_factor(pos, eg);
    eg = eg * sf / scale::NORMAL;

    if TRACE {
        trace.pawns_mg = pawn_entry.mg;
        trace.pawns_eg = pawn_entry.eg;
        trace.king_safety_mg = king_mg;
        trace.king_safety_eg = king_eg;
        trace.mobility_mg = mob_mg;
        trace.mobility_eg = mob_eg;
        trace.threats_mg = threats_mg;
        trace.threats_eg = threats_eg;
        trace.passed_mg = passed_mg;
        trace.passed_eg = passed_eg;
        trace.space_mg = space_mg;
        trace.initiative = init;
        trace.scale = sf;
    }

    let tapered = taper(mg, eg, phase);
    let total = if pos.side_to_move().is_white() { tapered } else { -tapered };
    if TRACE {
        trace.total = total;
    }
    total
}

fn taper(mg: i32, eg: i32, phase: i32) -> i32 {
    (mg * phase + eg * (tables::TOTAL_PHASE - phase)) / tables::TOTAL_PHASE
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::Position;

    #[test]
    fn startpos_is_roughly_balanced() {
        let pos = Position::startpos();
        let mut pawn_table = PawnHashTable::new();
        let mut material_table = MaterialHashTable::new();
        let score = evaluate(&pos, &mut pawn_table, &mut material_table);
        assert!(score.abs() < 50, "startpos eval should be near zero, got {score}");
    }

    #[test]
    fn material_advantage_is_reflected() {
        let pos = Position::from_fen("4k3/8/8/8/8/8/8/3QK3 w - - 0 1").unwrap();
        let mut pawn_table = PawnHashTable::new();
        let mut material_table = MaterialHashTable::new();
        let score = evaluate(&pos, &mut pawn_table, &mut material_table);
        assert!(score > 500);
    }
}
