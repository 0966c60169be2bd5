//! Per-ply state record, pushed on `do_move` and popped on `undo_move`.

use crate::types::{Bitboard, CastlingRights, Move, PieceType, Square};

/// Snapshot of everything a move changes that cannot be derived from the
/// move itself, so `undo_move` can restore the position exactly.
#[derive(Clone, Copy, Debug)]
pub struct StateInfo {
    pub mv: Move,
    pub moved_piece: PieceType,
    pub captured: PieceType,
    pub capture_square: Square,
    pub castling: CastlingRights,
    pub en_passant: Option<Square>,
    pub halfmove_clock: u16,
    pub key: u64,
    pub pawn_key: u64,
    pub material_key: u64,
    pub checkers: Bitboard,
    pub repetition: i32,
}

impl StateInfo {
    pub const fn blank() -> Self {
        StateInfo {
            mv: Move::NONE,
            moved_piece: PieceType::None,
            captured: PieceType::None,
            capture_square: Square::A1,
            castling: CastlingRights(0),
            en_passant: None,
            halfmove_clock: 0,
            key: 0,
            pawn_key: 0,
            material_key: 0,
            checkers: Bitboard::EMPTY,
            repetition: 0,
        }
    }
}
