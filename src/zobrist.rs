//! Zobrist hash keys, seeded once from a fixed-seed PRNG so the resulting
//! position keys are stable and reproducible across runs (and across
//! engine versions, which matters for the on-disk TT format).

use once_cell::sync::Lazy;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::types::{Color, PieceType, Square};

pub struct ZobristKeys {
    /// Indexed `[color][piece_type][square]`.
    pub psq: [[[u64; 64]; 6]; 2],
    /// Indexed by the 4-bit castling-rights mask, 0..16.
    pub castling: [u64; 16],
    /// Indexed by en passant file, 0..8.
    pub en_passant: [u64; 8],
    pub side: u64,
}

impl ZobristKeys {
    #[inline]
    #[must_use]
    pub fn piece(&self, color: Color, piece: PieceType, sq: Square) -> u64 {
        self.psq[color.index()][piece.index()][sq.index()]
    }
}

pub static ZOBRIST: Lazy<ZobristKeys> = Lazy::new(|| {
    let mut rng = StdRng::seed_from_u64(0x5A3F_B1E2_2941_70AB);
    let mut psq = [[[0u64; 64]; 6]; 2];
    for color in psq.iter_mut() {
        for piece in color.iter_mut() {
            for key in piece.iter_mut() {
                *key = rng.gen();
            }
        }
    }
    let mut castling = [0u64; 16];
    for key in castling.iter_mut().skip(1) {
        *key = rng.gen();
    }
    let mut en_passant = [0u64; 8];
    for key in en_passant.iter_mut() {
        *key = rng.gen();
    }
    ZobristKeys { psq, castling, en_passant, side: rng.gen() }
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_deterministic_across_access() {
        let a = ZOBRIST.piece(Color::White, PieceType::Pawn, Square::E2);
        let b = ZOBRIST.piece(Color::White, PieceType::Pawn, Square::E2);
        assert_eq!(a, b);
    }

    #[test]
    fn distinct_squares_have_distinct_keys() {
        let a = ZOBRIST.piece(Color::White, PieceType::Pawn, Square::E2);
        let b = ZOBRIST.piece(Color::White, PieceType::Pawn, Square::E4);
        assert_ne!(a, b);
    }

    #[test]
    fn no_castling_rights_has_zero_key() {
        assert_eq!(ZOBRIST.castling[0], 0);
    }
}
