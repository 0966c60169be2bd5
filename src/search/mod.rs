//! Principal-variation search: negamax with alpha-beta pruning, templated
//! on PV-ness via a const generic so the non-PV hot path never pays for
//! PV-only bookkeeping.

pub mod iterative;
pub mod quiescence;
pub mod stack;

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Instant;

use crate::eval::{self, MaterialHashTable, PawnHashTable};
use crate::movegen::{generate, GenKind};
use crate::ordering::{order_moves, pick_best, OrderingTables};
use crate::position::Position;
use crate::see::see;
use crate::tt::{Bound, TranspositionTable};
use crate::types::{Move, PieceType, MAX_PLY};

use stack::SearchStack;

pub const MATE_VALUE: i32 = 32_000;
pub const MATE_IN_MAX: i32 = MATE_VALUE - MAX_PLY as i32;
pub const DRAW_VALUE: i32 = 0;

/// `search_moves`/`multi_pv` make this non-`Copy`; every multi-use call
/// site (`threads.rs`'s helper-thread closures and main-thread call)
/// clones instead.
#[derive(Clone, Debug, Default)]
pub struct Limits {
    pub depth: Option<i32>,
    pub nodes: Option<u64>,
    pub movetime_ms: Option<u64>,
    pub soft_time_ms: Option<u64>,
    pub infinite: bool,
    /// Number of PV lines to report (UCI `MultiPV`); 1 when unset.
    pub multi_pv: usize,
    /// Restrict the root move loop to this set (UCI `go searchmoves`);
    /// empty means "every legal root move".
    pub search_moves: Vec<Move>,
}

pub struct SharedState {
    pub tt: TranspositionTable,
    pub stop: AtomicBool,
    pub nodes: AtomicU64,
    pub seldepth: AtomicU64,
}

impl SharedState {
    #[must_use]
    pub fn new(hash_mb: usize) -> Self {
        SharedState {
            tt: TranspositionTable::new(hash_mb),
            stop: AtomicBool::new(false),
            nodes: AtomicU64::new(0),
            seldepth: AtomicU64::new(0),
        }
    }
}

pub struct Searcher<'a> {
    pub pos: &'a mut Position,
    pub tt: &'a TranspositionTable,
    pub pawn_table: PawnHashTable,
    pub material_table: MaterialHashTable,
    pub ordering: OrderingTables,
    pub stack: SearchStack,
    pub nodes: u64,
    pub seldepth: usize,
    pub shared_nodes: &'a AtomicU64,
    pub shared_stop: &'a AtomicBool,
    pub start: Instant,
    pub limits: Limits,
    pub root_ply: u32,
    /// Root moves excluded from this MultiPV slot's search (already
    /// reported by an earlier, better-scoring slot at the same depth).
    /// Only ever consulted at ply 0.
    pub root_exclude: Vec<Move>,
}

impl<'a> Searcher<'a> {
    pub fn new(
        pos: &'a mut Position,
        tt: &'a TranspositionTable,
        shared_nodes: &'a AtomicU64,
        shared_stop: &'a AtomicBool,
        limits: Limits,
    ) -> Self {
        let root_ply = pos.ply();
        Searcher {
            pos,
            tt,
            pawn_table: PawnHashTable::new(),
            material_table: MaterialHashTable::new(),
            ordering: OrderingTables::new(MAX_PLY + 8),
            stack: SearchStack::new(),
            nodes: 0,
            seldepth: 0,
            shared_nodes,
            shared_stop,
            start: Instant::now(),
            limits,
            root_ply,
            root_exclude: Vec::new(),
        }
    }

    #[inline]
    pub fn should_stop(&mut self) -> bool {
        if self.shared_stop.load(Ordering::Relaxed) {
            return true;
        }
        if self.nodes % 4096 == 0 && self.nodes > 0 {
            if let Some(ms) = self.limits.movetime_ms {
                if self.start.elapsed().as_millis() as u64 >= ms {
                    self.shared_stop.store(true, Ordering::Relaxed);
                    return true;
                }
            }
            if let Some(n) = self.limits.nodes {
                if self.nodes >= n {
                    self.shared_stop.store(true, Ordering::Relaxed);
                    return true;
                }
            }
        }
        false
    }

    #[inline]
    fn ply(&self) -> usize {
        (self.pos.ply() - self.root_ply) as usize
    }

    pub fn score_to_tt(&self, score: i32) -> i32 {
        let ply = self.ply() as i32;
        if score >= MATE_IN_MAX {
            score + ply
        } else if score <= -MATE_IN_MAX {
            score - ply
        } else {
            score
        }
    }

    pub fn score_from_tt(&self, score: i32) -> i32 {
        let ply = self.ply() as i32;
        if score >= MATE_IN_MAX {
            score - ply
        } else if score <= -MATE_IN_MAX {
            score + ply
        } else {
            score
        }
    }

    fn static_eval(&mut self) -> i32 {
        if self.pos.in_check() {
            return -MATE_VALUE + self.ply() as i32;
        }
        eval::evaluate(self.pos, &mut self.pawn_table, &mut self.material_table)
    }

    /// PVS/negamax. `PV` marks a node on the principal variation, where
    /// the full window stays open and null-move-style shortcuts are
    /// skipped. `cut_node` hints that this node is expected to fail high,
    /// loosening reduction and pruning decisions.
    pub fn depth_search<const PV: bool>(
        &mut self,
        mut alpha: i32,
        beta: i32,
        depth: i32,
        cut_node: bool,
        excluded_move: Move,
    ) -> i32 {
        if depth <= 0 {
            return self.quiescence(alpha, beta, 0);
        }

        self.nodes += 1;
        self.shared_nodes.fetch_add(1, Ordering::Relaxed);
        if self.should_stop() {
            return 0;
        }

        let ply = self.ply();
        if ply > self.seldepth {
            self.seldepth = ply;
        }

        if ply > 0 {
            if self.pos.is_draw() || self.pos.upcoming_repetition() {
                return DRAW_VALUE;
            }
            // Mate distance pruning: no line from here can beat a mate
            // already found closer to the root.
            let mate_alpha = (-MATE_VALUE + ply as i32).max(alpha);
            let mate_beta = (MATE_VALUE - ply as i32 - 1).min(beta);
            if mate_alpha >= mate_beta {
                return mate_alpha;
            }
            alpha = mate_alpha;
        }

        let excluding = !excluded_move.is_none();
        let in_check = self.pos.in_check();
        let tt_probe = self.tt.probe(self.pos.key());
        let mut tt_move = if excluding { Move::NONE } else { tt_probe.mv };
        if tt_probe.found && !excluding && !PV && tt_probe.depth >= depth {
            let v = self.score_from_tt(tt_probe.value);
            match tt_probe.bound {
                Bound::Exact => return v,
                Bound::Lower if v >= beta => return v,
                Bound::Upper if v <= alpha => return v,
                _ => {}
            }
        }

        let static_eval = if in_check { -MATE_VALUE + ply as i32 } else { self.static_eval() };
        self.stack.at_mut(ply).static_eval = static_eval;
        let improving = if ply >= 2 && !in_check {
            static_eval > self.stack.at(ply - 2).static_eval
        } else {
            true
        };

        if !PV && !in_check && !excluding {
            // Razoring: hopeless positions drop straight to quiescence.
            if depth <= 3 && static_eval + 200 * depth < alpha {
                let v = self.quiescence(alpha, beta, 0);
                if v < alpha {
                    return v;
                }
            }

            // Futility pruning.
            if depth <= 6 && static_eval - 80 * depth >= beta && static_eval < MATE_IN_MAX {
                return static_eval;
            }

            // Null-move pruning, reduction R = (67*depth + 823)/256 plus a
            // static-margin term, verified with a non-null re-search
            // before a fail-high away from mate scores is trusted.
            if depth >= 3 && static_eval >= beta && self.has_non_pawn_material() {
                let pawn_mg = eval::tables::MG_VALUE[PieceType::Pawn.index()].max(1);
                let r = ((67 * depth + 823) / 256 + ((static_eval - beta) / pawn_mg).min(3)).max(1);
                let ep = self.pos.do_null();
                let null_score =
                    -self.depth_search::<false>(-beta, -beta + 1, depth - r, !cut_node, Move::NONE);
                self.pos.undo_null(ep);
                if self.shared_stop.load(Ordering::Relaxed) {
                    return 0;
                }
                if null_score >= beta {
                    if beta.abs() >= MATE_IN_MAX {
                        return beta;
                    }
                    let verified =
                        self.depth_search::<false>(beta - 1, beta, depth - r, cut_node, Move::NONE);
                    if verified >= beta {
                        return null_score;
                    }
                }
            }

            // ProbCut: a reduced-depth null-window search on good captures
            // that, if it confirms a score well above beta, lets the whole
            // move loop be skipped.
            if depth > 4 {
                let probcut_beta = beta + 200;
                if static_eval < MATE_IN_MAX {
                    let see_threshold = probcut_beta - static_eval;
                    let captures = generate(self.pos, GenKind::Captures);
                    for &mv in captures.iter() {
                        if !self.pos.is_legal(mv) || !see(self.pos, mv, see_threshold) {
                            continue;
                        }
                        self.pos.do_move(mv);
                        let score = -self.depth_search::<false>(
                            -probcut_beta,
                            -probcut_beta + 1,
                            depth - 4,
                            !cut_node,
                            Move::NONE,
                        );
                        self.pos.undo_move(mv);
                        if self.shared_stop.load(Ordering::Relaxed) {
                            return 0;
                        }
                        if score >= probcut_beta {
                            return score;
                        }
                    }
                }
            }
        }

        // Internal iterative deepening: no TT move to order by, so recurse
        // at a reduced depth purely to populate one.
        if tt_move.is_none() && !excluding && depth >= 4 {
            self.depth_search::<PV>(alpha, beta, depth - 2, cut_node, Move::NONE);
            let refreshed = self.tt.probe(self.pos.key());
            if refreshed.found {
                tt_move = refreshed.mv;
            }
        }

        let prev_move = self.stack.move_at(ply);
        let prev1 = self.stack.continuation_key(ply, 1);
        let prev2 = self.stack.continuation_key(ply, 2);
        let mut scored = order_moves(self.pos, &self.ordering, tt_move, ply, prev_move, prev1, prev2);

        let mut best_score = -MATE_VALUE + ply as i32;
        let mut best_move = Move::NONE;
        let mut moves_played = 0;
        let original_alpha = alpha;

        for i in 0..scored.len() {
            let sm = pick_best(&mut scored, i);
            let mv = sm.mv;
            if !self.pos.is_legal(mv) || mv == excluded_move {
                continue;
            }
            if ply == 0 {
                if self.root_exclude.contains(&mv) {
                    continue;
                }
                if !self.limits.search_moves.is_empty() && !self.limits.search_moves.contains(&mv) {
                    continue;
                }
            }

            let gives_check = self.pos.gives_check(mv);
            let is_capture = self.pos.piece_at(mv.to()) != PieceType::None;
            let is_quiet = !is_capture && !mv.is_en_passant() && !mv.is_promotion();

            // Shallow-depth pruning: late quiets by move count, any move
            // whose SEE falls below a depth-squared margin, and quiets
            // whose recent continuation history is uniformly negative.
            if !PV
                && !in_check
                && moves_played > 0
                && best_score > -MATE_IN_MAX
                && depth <= 8
            {
                let lmp_limit = (3 + depth * depth) / if improving { 1 } else { 2 };
                if is_quiet && moves_played as i32 > lmp_limit {
                    continue;
                }
                let see_margin = if is_quiet { -80 * depth * depth } else { -30 * depth * depth };
                if !see(self.pos, mv, see_margin) {
                    continue;
                }
                if is_quiet && depth <= 4 {
                    let piece = self.pos.piece_at(mv.from());
                    if self.ordering.continuation_all_negative(prev1, prev2, piece, mv.to().index()) {
                        continue;
                    }
                }
            }

            moves_played += 1;

            let mut extension = if gives_check { 1 } else { 0 };

            // Singular extension: if the TT move is the only move that
            // doesn't fall well short of the TT's own bound, it's worth
            // searching one ply deeper.
            if !excluding
                && mv == tt_move
                && depth >= 8
                && tt_probe.found
                && tt_probe.depth >= depth - 3
                && matches!(tt_probe.bound, Bound::Lower | Bound::Exact)
            {
                let tt_value = self.score_from_tt(tt_probe.value);
                if tt_value.abs() < MATE_IN_MAX {
                    let singular_beta = tt_value - 2 * depth;
                    let singular_depth = (depth - 1) / 2;
                    let score = self.depth_search::<false>(
                        singular_beta - 1,
                        singular_beta,
                        singular_depth,
                        cut_node,
                        mv,
                    );
                    if score < singular_beta {
                        extension = extension.max(1);
                    }
                }
            }

            self.stack.at_mut(ply).current_move = mv;
            self.stack.at_mut(ply).moved_piece = self.pos.piece_at(mv.from());
            self.pos.do_move(mv);

            let mut score;
            if moves_played == 1 {
                score = -self.depth_search::<PV>(-beta, -alpha, depth - 1 + extension, false, Move::NONE);
            } else {
                let mut reduction = 0;
                if depth >= 3 && is_quiet && moves_played > 3 && !in_check {
                    reduction = ((depth as f64).ln() * (moves_played as f64).ln() / 2.2) as i32;
                    if cut_node {
                        reduction += 1;
                    }
                    reduction = reduction.clamp(0, depth - 1);
                }
                score = -self.depth_search::<false>(
                    -alpha - 1,
                    -alpha,
                    depth - 1 - reduction + extension,
                    true,
                    Move::NONE,
                );
                if score > alpha && (reduction > 0 || PV) {
                    score = -self.depth_search::<PV>(-beta, -alpha, depth - 1 + extension, false, Move::NONE);
                }
            }

            self.pos.undo_move(mv);

            if self.shared_stop.load(Ordering::Relaxed) {
                return 0;
            }

            if score > best_score {
                best_score = score;
                best_move = mv;
                if score > alpha {
                    alpha = score;
                    if alpha >= beta {
                        if is_quiet {
                            self.ordering.push_killer(ply, mv);
                            self.ordering.update_history(self.pos.side_to_move().is_white(), mv, depth, 1);
                            self.ordering.set_counter(prev_move, mv);
                            let piece = self.pos.piece_at(mv.from());
                            self.ordering.update_continuation(prev1, prev2, piece, mv.to().index(), depth, 1);
                        }
                        break;
                    }
                }
            } else if is_quiet {
                self.ordering.update_history(self.pos.side_to_move().is_white(), mv, depth, -1);
                let piece = self.pos.piece_at(mv.from());
                self.ordering.update_continuation(prev1, prev2, piece, mv.to().index(), depth, -1);
            }
        }

        if moves_played == 0 {
            if excluding {
                return alpha;
            }
            return if in_check { -MATE_VALUE + ply as i32 } else { DRAW_VALUE };
        }

        if excluding {
            return best_score;
        }

        let bound = if best_score >= beta {
            Bound::Lower
        } else if best_score > original_alpha {
            Bound::Exact
        } else {
            Bound::Upper
        };
        self.tt.store(
            self.pos.key(),
            best_move,
            self.score_to_tt(best_score),
            static_eval,
            depth,
            bound,
            PV,
        );

        best_score
    }

    fn has_non_pawn_material(&self) -> bool {
        let us = self.pos.side_to_move();
        use crate::types::PieceType;
        [PieceType::Knight, PieceType::Bishop, PieceType::Rook, PieceType::Queen]
            .iter()
            .any(|&p| !self.pos.pieces_colored(us, p).is_empty())
    }
}

/// Convenience wrapper used by `perft`-style callers that only want move
/// counts through the legal generator, not a search.
#[must_use]
pub fn perft(pos: &mut Position, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }
    let moves = generate(pos, GenKind::Legal);
    if depth == 1 {
        return moves.len() as u64;
    }
    let mut count = 0;
    for &mv in moves.iter() {
        pos.do_move(mv);
        count += perft(pos, depth - 1);
        pos.undo_move(mv);
    }
    count
}
