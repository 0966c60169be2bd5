//! Attack tables: non-sliding lookups and magic-bitboard sliding attacks.

pub mod attacks;
pub mod magic;

pub use attacks::{
    aligned, between, king_attacks_from, knight_attacks_from, line, pawn_attacks_from,
    KING_ATTACKS, KNIGHT_ATTACKS, PAWN_ATTACKS,
};
pub use magic::{bishop_attacks, queen_attacks, rook_attacks};
