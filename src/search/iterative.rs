//! Root iterative deepening with aspiration windows.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Instant;

use crate::movegen::{generate, GenKind};
use crate::position::Position;
use crate::tt::TranspositionTable;
use crate::types::{Move, MAX_PLY};

use super::{Limits, Searcher, DRAW_VALUE, MATE_VALUE};

#[derive(Clone, Debug)]
pub struct IterationResult {
    pub depth: i32,
    pub score: i32,
    pub best_move: Move,
    pub nodes: u64,
    pub seldepth: usize,
    pub elapsed: std::time::Duration,
    /// 1-based MultiPV slot this result reports (1 is the primary line).
    pub multipv: usize,
}

/// Run iterative deepening from the current position until `limits` or
/// `stop` ends the search, returning the result of the last fully
/// completed iteration (a partial iteration's move is never trusted).
pub fn iterative_deepening(
    pos: &mut Position,
    tt: &TranspositionTable,
    shared_nodes: &AtomicU64,
    shared_stop: &AtomicBool,
    limits: Limits,
    mut on_iteration: impl FnMut(&IterationResult),
) -> IterationResult {
    let start = Instant::now();
    let max_depth = limits.depth.unwrap_or(MAX_PLY as i32 - 1);

    let candidate_count = {
        let legal = generate(pos, GenKind::Legal);
        if limits.search_moves.is_empty() {
            legal.len()
        } else {
            legal.iter().filter(|mv| limits.search_moves.contains(mv)).count()
        }
    };
    let multi_pv = limits.multi_pv.max(1).min(candidate_count.max(1));

    let mut last = IterationResult {
        depth: 0,
        score: DRAW_VALUE,
        best_move: Move::NONE,
        nodes: 0,
        seldepth: 0,
        elapsed: std::time::Duration::ZERO,
        multipv: 1,
    };

    let mut searcher = Searcher::new(pos, tt, shared_nodes, shared_stop, limits);
    let mut prev_scores = vec![DRAW_VALUE; multi_pv];

    'depths: for depth in 1..=max_depth {
        searcher.root_exclude.clear();

        for slot in 0..multi_pv {
            let prev_score = prev_scores[slot];
            let mut window = if depth <= 4 { MATE_VALUE } else { 18 };
            let mut alpha = (prev_score - window).max(-MATE_VALUE);
            let mut beta = (prev_score + window).min(MATE_VALUE);

            let score = loop {
                let s = searcher.depth_search::<true>(alpha, beta, depth, false, Move::NONE);
                if shared_stop.load(Ordering::Relaxed) {
                    break s;
                }
                if s <= alpha {
                    alpha = (alpha - window).max(-MATE_VALUE);
                    window += window / 3 + 5;
                } else if s >= beta {
                    beta = (beta + window).min(MATE_VALUE);
                    window += window / 3 + 5;
                } else {
                    break s;
                }
            };

            // A partial iteration's move is never trusted, except the
            // very first slot of the very first depth: something has to
            // be returned even if the search is stopped immediately.
            if shared_stop.load(Ordering::Relaxed) && !(depth == 1 && slot == 0) {
                break 'depths;
            }

            let probe = tt.probe(searcher.pos.key());
            let best_move = if probe.found { probe.mv } else { last.best_move };

            let result = IterationResult {
                depth,
                score,
                best_move,
                nodes: searcher.nodes,
                seldepth: searcher.seldepth,
                elapsed: start.elapsed(),
                multipv: slot + 1,
            };
            on_iteration(&result);
            prev_scores[slot] = score;
            if slot == 0 {
                last = result;
            }

            if !best_move.is_none() {
                searcher.root_exclude.push(best_move);
            }

            if shared_stop.load(Ordering::Relaxed) {
                break 'depths;
            }
        }

        if last.score.abs() >= MATE_VALUE - MAX_PLY as i32 {
            break;
        }
    }

    last
}
