//! Pawn-structure evaluation, cached by pawn key since pawn structure
//! changes far less often than the rest of the position.

use std::collections::HashMap;

use crate::bitboards::pawn_attacks_from;
use crate::position::Position;
use crate::types::{Bitboard, Color, PieceType};

#[derive(Clone, Copy, Default)]
pub struct PawnEntry {
    pub mg: i32,
    pub eg: i32,
    pub passed: [Bitboard; 2],
}

#[derive(Default)]
pub struct PawnHashTable {
    table: HashMap<u64, PawnEntry>,
}

impl PawnHashTable {
    #[must_use]
    pub fn new() -> Self {
        PawnHashTable::default()
    }

    pub fn probe(&mut self, pos: &Position) -> PawnEntry {
        if let Some(entry) = self.table.get(&pos.pawn_key()) {
            return *entry;
        }
        let entry = compute(pos);
        self.table.insert(pos.pawn_key(), entry);
        entry
    }

    pub fn clear(&mut self) {
        self.table.clear();
    }
}

fn compute(pos: &Position) -> PawnEntry {
    let mut entry = PawnEntry::default();
    for color in [Color::White, Color::Black] {
        let sign = if color.is_white() { 1 } else { -1 };
        let ours = pos.pieces_colored(color, PieceType::Pawn);
        let theirs = pos.pieces_colored(color.opponent(), PieceType::Pawn);

        for sq in ours.iter() {
            let file = sq.file();
            let file_bb = Bitboard::file(file);
            let adjacent = Bitboard::adjacent_files(file);

            let doubled = (ours & file_bb).popcount() > 1;
            let is_isolated = (adjacent & ours).is_empty();

            let ahead_mask = forward_mask(sq, color, file_bb | adjacent);
            let passed = (theirs & ahead_mask).is_empty();

            if passed {
                entry.passed[color.index()].set(sq);
            }
            if doubled {
                entry.mg -= 8 * sign;
                entry.eg -= 16 * sign;
            }
            if is_isolated {
                entry.mg -= 12 * sign;
                entry.eg -= 10 * sign;
            }

            let support = pawn_attacks_from(color.opponent(), sq) & ours;
            if !support.is_empty() {
                entry.mg += 6 * sign;
                entry.eg += 4 * sign;
            }
        }
    }
    entry
}

fn forward_mask(sq: crate::types::Square, color: Color, files: Bitboard) -> Bitboard {
    let mut mask = Bitboard::EMPTY;
    let mut rank = sq.rank() as i32;
    loop {
        rank += if color.is_white() { 1 } else { -1 };
        if !(0..8).contains(&rank) {
            break;
        }
        mask |= files & Bitboard::rank(rank as u8);
    }
    mask
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::Position;

    #[test]
    fn startpos_has_no_structural_penalties() {
        let pos = Position::startpos();
        let entry = compute(&pos);
        assert_eq!(entry.mg, 0);
        assert_eq!(entry.eg, 0);
    }

    #[test]
    fn isolated_pawn_is_penalized() {
        let pos = Position::from_fen("4k3/8/8/8/8/8/4P3/4K3 w - - 0 1").unwrap();
        let entry = compute(&pos);
        assert!(entry.mg < 0);
    }
}
