//! Staged move ordering: try the transposition-table move first, then
//! good captures, then quiets ranked by history heuristics, then losing
//! captures last.

use crate::movegen::{generate, GenKind};
use crate::position::Position;
use crate::see::see;
use crate::types::{Move, MoveList, PieceType, ScoredMove};

pub const MAX_HISTORY: i32 = 1 << 14;

/// A 2D continuation-history table: indexed by the piece and destination
/// square of a move played `N` plies back, plus the piece and destination
/// square of the quiet move being scored now. Mirrors the plain history
/// table's depth-squared bonus and magnitude-decay update.
pub struct ContinuationTable {
    table: Vec<i32>,
}

impl ContinuationTable {
    fn new() -> Self {
        ContinuationTable { table: vec![0; 7 * 64 * 7 * 64] }
    }

    #[inline]
    fn index(prev_piece: PieceType, prev_to: usize, piece: PieceType, to: usize) -> usize {
        ((prev_piece.index() * 64 + prev_to) * 7 + piece.index()) * 64 + to
    }

    fn score(&self, prev_piece: PieceType, prev_to: usize, piece: PieceType, to: usize) -> i32 {
        self.table[Self::index(prev_piece, prev_to, piece, to)]
    }

    fn update(&mut self, prev_piece: PieceType, prev_to: usize, piece: PieceType, to: usize, depth: i32, bonus_sign: i32) {
        let bonus = bonus_sign * (depth * (depth + 2) - 2).max(0);
        let idx = Self::index(prev_piece, prev_to, piece, to);
        let clamped = bonus.clamp(-MAX_HISTORY, MAX_HISTORY);
        self.table[idx] += clamped - self.table[idx] * clamped.abs() / MAX_HISTORY;
    }

    fn clear(&mut self) {
        self.table.iter_mut().for_each(|v| *v = 0);
    }
}

/// Thread-local move-ordering heuristics, reset between searches on the
/// same thread but shared across the whole iterative-deepening run.
pub struct OrderingTables {
    pub history: Vec<i32>,
    pub killers: Vec<[Move; 2]>,
    pub counter_moves: Vec<Move>,
    /// 1-ply-back continuation history (reply to the opponent's last move).
    pub cont1: ContinuationTable,
    /// 2-ply-back "follow-up" history (reply to our own previous move).
    pub cont2: ContinuationTable,
}

impl OrderingTables {
    #[must_use]
    pub fn new(max_ply: usize) -> Self {
        OrderingTables {
            history: vec![0; 2 * 64 * 64],
            killers: vec![[Move::NONE; 2]; max_ply],
            counter_moves: vec![Move::NONE; 64 * 64],
            cont1: ContinuationTable::new(),
            cont2: ContinuationTable::new(),
        }
    }

    pub fn clear(&mut self) {
        self.history.iter_mut().for_each(|h| *h = 0);
        self.killers.iter_mut().for_each(|k| *k = [Move::NONE; 2]);
        self.counter_moves.iter_mut().for_each(|m| *m = Move::NONE);
        self.cont1.clear();
        self.cont2.clear();
    }

    /// Combined continuation-history contribution for a quiet move, summed
    /// over whichever of the 1-ply-back/2-ply-back slots actually exist.
    #[must_use]
    pub fn continuation_score(
        &self,
        prev1: Option<(PieceType, usize)>,
        prev2: Option<(PieceType, usize)>,
        piece: PieceType,
        to: usize,
    ) -> i32 {
        let mut score = 0;
        if let Some((pp, pt)) = prev1 {
            score += self.cont1.score(pp, pt, piece, to);
        }
        if let Some((pp, pt)) = prev2 {
            score += self.cont2.score(pp, pt, piece, to);
        }
        score
    }

    pub fn update_continuation(
        &mut self,
        prev1: Option<(PieceType, usize)>,
        prev2: Option<(PieceType, usize)>,
        piece: PieceType,
        to: usize,
        depth: i32,
        bonus_sign: i32,
    ) {
        if let Some((pp, pt)) = prev1 {
            self.cont1.update(pp, pt, piece, to, depth, bonus_sign);
        }
        if let Some((pp, pt)) = prev2 {
            self.cont2.update(pp, pt, piece, to, depth, bonus_sign);
        }
    }

    /// True when every continuation-history slot that exists for this
    /// quiet move is negative — used to prune quiets at shallow depth that
    /// have consistently failed to follow up recent moves well.
    #[must_use]
    pub fn continuation_all_negative(
        &self,
        prev1: Option<(PieceType, usize)>,
        prev2: Option<(PieceType, usize)>,
        piece: PieceType,
        to: usize,
    ) -> bool {
        let mut any = false;
        let mut all_negative = true;
        if let Some((pp, pt)) = prev1 {
            any = true;
            if self.cont1.score(pp, pt, piece, to) >= 0 {
                all_negative = false;
            }
        }
        if let Some((pp, pt)) = prev2 {
            any = true;
            if self.cont2.score(pp, pt, piece, to) >= 0 {
                all_negative = false;
            }
        }
        any && all_negative
    }

    #[inline]
    fn history_index(white: bool, mv: Move) -> usize {
        let color = usize::from(!white);
        color * 4096 + mv.from().index() * 64 + mv.to().index()
    }

    #[must_use]
    pub fn history_score(&self, white: bool, mv: Move) -> i32 {
        self.history[Self::history_index(white, mv)]
    }

    pub fn update_history(&mut self, white: bool, mv: Move, depth: i32, bonus_sign: i32) {
        let bonus = bonus_sign * (depth * (depth + 2) - 2).max(0);
        let idx = Self::history_index(white, mv);
        let clamped = bonus.clamp(-MAX_HISTORY, MAX_HISTORY);
        self.history[idx] += clamped - self.history[idx] * clamped.abs() / MAX_HISTORY;
    }

    pub fn push_killer(&mut self, ply: usize, mv: Move) {
        if ply >= self.killers.len() {
            return;
        }
        if self.killers[ply][0] != mv {
            self.killers[ply][1] = self.killers[ply][0];
            self.killers[ply][0] = mv;
        }
    }

    #[must_use]
    pub fn is_killer(&self, ply: usize, mv: Move) -> bool {
        ply < self.killers.len() && (self.killers[ply][0] == mv || self.killers[ply][1] == mv)
    }

    pub fn set_counter(&mut self, prev: Move, reply: Move) {
        if prev.is_none() {
            return;
        }
        self.counter_moves[prev.from().index() * 64 + prev.to().index()] = reply;
    }

    #[must_use]
    pub fn counter_move(&self, prev: Move) -> Move {
        if prev.is_none() {
            Move::NONE
        } else {
            self.counter_moves[prev.from().index() * 64 + prev.to().index()]
        }
    }
}

#[inline]
fn mvv_lva(pos: &Position, mv: Move) -> i32 {
    let victim = if mv.is_en_passant() { PieceType::Pawn } else { pos.piece_at(mv.to()) };
    let attacker = pos.piece_at(mv.from());
    victim.see_value() * 16 - attacker.see_value() / 16
}

/// Build a fully-scored, partially-sorted candidate list for the main
/// search: captures with SEE >= 0 sorted by MVV/LVA, then quiets sorted
/// by history/killer/counter-move heuristics, then losing captures last.
#[must_use]
pub fn order_moves(
    pos: &Position,
    tables: &OrderingTables,
    tt_move: Move,
    ply: usize,
    prev_move: Move,
    prev1: Option<(PieceType, usize)>,
    prev2: Option<(PieceType, usize)>,
) -> Vec<ScoredMove> {
    let pseudo = generate(pos, GenKind::All);
    let white = pos.side_to_move().is_white();
    let counter = tables.counter_move(prev_move);

    let mut good = Vec::with_capacity(pseudo.len());
    let mut bad_captures = Vec::new();

    for &mv in pseudo.iter() {
        if mv == tt_move {
            continue;
        }
        let is_capture = pos.piece_at(mv.to()) != PieceType::None || mv.is_en_passant();
        let score = if is_capture {
            if see(pos, mv, 0) {
                2_000_000 + mvv_lva(pos, mv)
            } else {
                -2_000_000 + mvv_lva(pos, mv)
            }
        } else if tables.is_killer(ply, mv) {
            1_500_000
        } else if mv == counter {
            1_400_000
        } else {
            let piece = pos.piece_at(mv.from());
            tables.history_score(white, mv) + tables.continuation_score(prev1, prev2, piece, mv.to().index())
        };

        if is_capture && score < 0 {
            bad_captures.push(ScoredMove { mv, score });
        } else {
            good.push(ScoredMove { mv, score });
        }
    }

    let mut list = Vec::with_capacity(good.len() + bad_captures.len() + 1);
    if !tt_move.is_none() && pos.pseudo_legal(tt_move) {
        list.push(ScoredMove { mv: tt_move, score: i32::MAX });
    }
    list.extend(good);
    list.extend(bad_captures);
    list
}

/// Best-first partial selection sort: swap the highest-scoring remaining
/// move into `from`, leaving the rest unsorted until asked for.
pub fn pick_best(moves: &mut [ScoredMove], from: usize) -> ScoredMove {
    let mut best = from;
    for i in (from + 1)..moves.len() {
        if moves[i].score > moves[best].score {
            best = i;
        }
    }
    moves.swap(from, best);
    moves[from]
}

/// Tactical-only generation for quiescence search: captures, promotions,
/// and (when in check) evasions.
#[must_use]
pub fn quiescence_moves(pos: &Position, include_checks: bool) -> MoveList {
    if pos.in_check() {
        return generate(pos, GenKind::Evasions);
    }
    let mut list = generate(pos, GenKind::Captures);
    if include_checks {
        let quiet_checks = generate(pos, GenKind::QuietChecks);
        for &mv in quiet_checks.iter() {
            list.push(mv);
        }
    }
    list
}

