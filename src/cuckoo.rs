//! Cuckoo hash table for upcoming-repetition detection.
//!
//! For every pair of squares reachable by the same non-pawn piece in one
//! move, the XOR of their Zobrist piece keys (plus the side key) is
//! inserted into a small cuckoo table. A position's key XORed against an
//! opponent's key differing by exactly one reversible move will then land
//! in the table, letting `cycled` detect a repetition is reachable without
//! walking the full game history.

use once_cell::sync::Lazy;

use crate::bitboards::{bishop_attacks, king_attacks_from, knight_attacks_from, rook_attacks};
use crate::types::{Bitboard, Color, Move, PieceType, Square, PIECE_TYPES};
use crate::zobrist::ZOBRIST;

pub const CUCKOO_SIZE: usize = 0x2000;
const MASK: usize = CUCKOO_SIZE - 1;

#[inline]
fn h1(key: u64) -> usize {
    (key as usize) & MASK
}

#[inline]
fn h2(key: u64) -> usize {
    ((key >> 16) as usize) & MASK
}

fn attacks_on_empty_board(piece: PieceType, sq: Square) -> Bitboard {
    match piece {
        PieceType::Knight => knight_attacks_from(sq),
        PieceType::Bishop => bishop_attacks(sq, Bitboard::EMPTY),
        PieceType::Rook => rook_attacks(sq, Bitboard::EMPTY),
        PieceType::Queen => bishop_attacks(sq, Bitboard::EMPTY) | rook_attacks(sq, Bitboard::EMPTY),
        PieceType::King => king_attacks_from(sq),
        PieceType::Pawn | PieceType::None => Bitboard::EMPTY,
    }
}

pub struct CuckooTable {
    keys: Vec<u64>,
    moves: Vec<Move>,
}

impl CuckooTable {
    /// Look up whether `key` corresponds to a single reversible move,
    /// returning that move if so.
    #[must_use]
    pub fn lookup(&self, key: u64) -> Option<Move> {
        let i1 = h1(key);
        if self.keys[i1] == key && !self.moves[i1].is_none() {
            return Some(self.moves[i1]);
        }
        let i2 = h2(key);
        if self.keys[i2] == key && !self.moves[i2].is_none() {
            return Some(self.moves[i2]);
        }
        None
    }
}

fn build() -> CuckooTable {
    let mut keys = vec![0u64; CUCKOO_SIZE];
    let mut moves = vec![Move::NONE; CUCKOO_SIZE];

    for &piece in PIECE_TYPES.iter() {
        if piece == PieceType::Pawn {
            continue;
        }
        for color in [Color::White, Color::Black] {
            for from_idx in 0..64 {
                let from = Square::from_index(from_idx);
                let targets = attacks_on_empty_board(piece, from);
                for to in targets.iter() {
                    if to.index() <= from.index() {
                        continue;
                    }
                    let mut key = ZOBRIST.piece(color, piece, from)
                        ^ ZOBRIST.piece(color, piece, to)
                        ^ ZOBRIST.side;
                    let mut mv = Move::simple(from, to);
                    let mut slot = h1(key);
                    loop {
                        std::mem::swap(&mut keys[slot], &mut key);
                        std::mem::swap(&mut moves[slot], &mut mv);
                        if mv.is_none() {
                            break;
                        }
                        slot = if slot == h1(key) { h2(key) } else { h1(key) };
                    }
                }
            }
        }
    }

    CuckooTable { keys, moves }
}

pub static CUCKOO: Lazy<CuckooTable> = Lazy::new(build);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reversible_knight_hop_is_found() {
        let key = ZOBRIST.piece(Color::White, PieceType::Knight, Square::B1)
            ^ ZOBRIST.piece(Color::White, PieceType::Knight, Square::C3)
            ^ ZOBRIST.side;
        let found = CUCKOO.lookup(key);
        assert!(found.is_some());
    }

    #[test]
    fn unrelated_key_is_absent() {
        assert!(CUCKOO.lookup(0xDEAD_BEEF_0000_0001).is_none());
    }
}
