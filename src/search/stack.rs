//! Per-ply search stack frame, indexed by ply rather than chained C-style
//! pointers: frame `ss[ply - 2]` replaces what a Stockfish-style port
//! would reach via `(ss-2)->...`.

use crate::types::{Move, PieceType, MAX_PLY};

#[derive(Clone, Copy)]
pub struct StackFrame {
    pub static_eval: i32,
    pub current_move: Move,
    /// Piece that made `current_move`, captured pre-move so continuation
    /// history can be indexed after the move is undone.
    pub moved_piece: PieceType,
    pub ply: usize,
}

impl StackFrame {
    const fn blank(ply: usize) -> Self {
        StackFrame {
            static_eval: 0,
            current_move: Move::NONE,
            moved_piece: PieceType::None,
            ply,
        }
    }
}

pub struct SearchStack {
    frames: Vec<StackFrame>,
}

impl SearchStack {
    #[must_use]
    pub fn new() -> Self {
        let frames = (0..MAX_PLY + 8).map(StackFrame::blank).collect();
        SearchStack { frames }
    }

    #[inline]
    pub fn at(&self, ply: usize) -> &StackFrame {
        &self.frames[ply]
    }

    #[inline]
    pub fn at_mut(&mut self, ply: usize) -> &mut StackFrame {
        &mut self.frames[ply]
    }

    #[inline]
    #[must_use]
    pub fn move_at(&self, ply: usize) -> Move {
        if ply == 0 {
            Move::NONE
        } else {
            self.frames[ply - 1].current_move
        }
    }

    /// The (piece, destination-square) key of the move played `back`
    /// plies before `ply`, for continuation-history lookups. `None` when
    /// there's no such ply (too close to the search root) or that ply's
    /// move slot was never filled.
    #[inline]
    #[must_use]
    pub fn continuation_key(&self, ply: usize, back: usize) -> Option<(PieceType, usize)> {
        if ply < back {
            return None;
        }
        let frame = &self.frames[ply - back];
        if frame.current_move.is_none() {
            None
        } else {
            Some((frame.moved_piece, frame.current_move.to().index()))
        }
    }
}

impl Default for SearchStack {
    fn default() -> Self {
        SearchStack::new()
    }
}
