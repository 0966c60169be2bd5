//! Owns the live position, the shared search state, and the worker pool;
//! the UCI front end is the only thing that talks to this directly.

use std::sync::atomic::Ordering;
use std::sync::Arc;

use crate::position::Position;
use crate::search::Limits;
use crate::search::SharedState;
use crate::threads::ThreadPool;
use crate::time_management::{compute_budget, TimeConfig, TimeControl};
use crate::uci::options::EngineOptions;
use crate::uci::protocol::{parse_uci_move, GoParams};

pub struct Engine {
    pos: Position,
    pub options: EngineOptions,
    shared: Arc<SharedState>,
    pool: ThreadPool,
}

impl Engine {
    #[must_use]
    pub fn new() -> Self {
        let options = EngineOptions::default();
        Engine {
            pos: Position::startpos(),
            shared: Arc::new(SharedState::new(options.hash_mb)),
            pool: ThreadPool::new(options.threads),
            options,
        }
    }

    #[must_use]
    pub fn position(&self) -> &Position {
        &self.pos
    }

    #[must_use]
    pub fn shared(&self) -> &Arc<SharedState> {
        &self.shared
    }

    pub fn new_game(&mut self) {
        self.pos = Position::startpos();
        self.shared.tt.clear();
    }

    /// Applies `position startpos|fen F [moves ...]`.
    pub fn set_position(&mut self, startpos: bool, fen: Option<&str>, moves: &[&str]) -> Result<(), crate::error::FenError> {
        self.pos = if startpos {
            Position::startpos()
        } else {
            Position::from_fen(fen.unwrap_or_default())?
        };
        for mv_text in moves {
            match parse_uci_move(&self.pos, mv_text) {
                Some(mv) => self.pos.do_move(mv),
                None => {
                    #[cfg(feature = "logging")]
                    log::warn!("ignoring illegal move in position command: {mv_text}");
                    break;
                }
            }
        }
        Ok(())
    }

    /// Applies a `setoption` pair, resizing the TT or thread pool if
    /// needed. Both resizes require no search to be in progress, which
    /// the caller (the UCI loop) guarantees by handling commands
    /// sequentially.
    pub fn set_option(&mut self, name: &str, value: &str) {
        self.options.apply(name, value);
        match name.to_ascii_lowercase().as_str() {
            "hash" => {
                self.shared = Arc::new(SharedState::new(self.options.hash_mb));
            }
            "threads" => {
                self.pool = ThreadPool::new(self.options.threads);
            }
            _ => {}
        }
    }

    pub fn stop(&self) {
        self.shared.stop.store(true, Ordering::Relaxed);
    }

    /// Snapshots everything a search needs (position, shared state,
    /// resolved time limits, pool size) under the caller's lock, then
    /// releases it. The actual search runs unlocked so `stop` can still
    /// reach `SharedState::stop` while a search is in flight.
    #[must_use]
    pub fn prepare_search(&self, params: &GoParams) -> (Position, Arc<SharedState>, Limits, usize) {
        let limits = self.build_limits(params);
        (self.pos.clone(), Arc::clone(&self.shared), limits, self.pool.size())
    }

    fn build_limits(&self, params: &GoParams) -> Limits {
        let multi_pv = self.options.multi_pv;
        let search_moves: Vec<crate::types::Move> = params
            .search_moves
            .iter()
            .filter_map(|text| parse_uci_move(&self.pos, text))
            .collect();

        if let Some(depth) = params.depth {
            return Limits {
                depth: Some(depth),
                infinite: params.infinite,
                multi_pv,
                search_moves,
                ..Default::default()
            };
        }
        if params.infinite {
            return Limits { infinite: true, multi_pv, search_moves, ..Default::default() };
        }
        let control = if let Some(mt) = params.movetime {
            TimeControl::MoveTime { time_ms: mt }
        } else {
            let white = self.pos.side_to_move().is_white();
            let (time_left, inc) = if white {
                (params.wtime.unwrap_or(0), params.winc.unwrap_or(0))
            } else {
                (params.btime.unwrap_or(0), params.binc.unwrap_or(0))
            };
            if time_left == 0 {
                return Limits {
                    depth: params.depth,
                    nodes: params.nodes,
                    multi_pv,
                    search_moves,
                    ..Default::default()
                };
            }
            TimeControl::Incremental {
                time_left_ms: time_left,
                inc_ms: inc,
                moves_to_go: params.moves_to_go,
            }
        };
        let config = TimeConfig { move_overhead_ms: self.options.move_overhead_ms };
        let budget = compute_budget(self.pos.ply(), config, control);
        Limits {
            nodes: params.nodes,
            movetime_ms: budget.hard_ms,
            soft_time_ms: budget.soft_ms,
            infinite: false,
            depth: None,
            multi_pv,
            search_moves,
        }
    }
}

impl Default for Engine {
    fn default() -> Self {
        Engine::new()
    }
}
