//! The control-protocol command loop: reads UCI commands and drives an
//! [`Engine`](crate::engine::Engine), emitting `info`/`bestmove` lines.

pub mod options;
pub mod protocol;
pub mod report;

use std::io::{BufRead, Write};
use std::sync::{Arc, Mutex};
use std::thread;

use crate::engine::Engine;
use crate::uci::protocol::{move_to_uci, parse_go};

pub struct Orchestrator {
    engine: Arc<Mutex<Engine>>,
}

impl Orchestrator {
    #[must_use]
    pub fn new() -> Self {
        Orchestrator { engine: Arc::new(Mutex::new(Engine::new())) }
    }

    /// Runs the loop to completion: `quit` or EOF on `input` both return
    /// normally. `output` is shared with the background search thread so
    /// `info`/`bestmove` lines can be written while the main loop keeps
    /// polling for `stop`.
    pub fn run<R, W>(&self, input: R, output: Arc<Mutex<W>>)
    where
        R: BufRead,
        W: Write + Send + 'static,
    {
        for line in input.lines() {
            let line = match line {
                Ok(l) => l,
                Err(_) => break,
            };
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            let mut tokens = trimmed.split_whitespace();
            let cmd = match tokens.next() {
                Some(c) => c,
                None => continue,
            };
            let rest: Vec<&str> = tokens.collect();

            match cmd {
                "uci" => self.handle_uci(&output),
                "isready" => writeln(&output, "readyok"),
                "ucinewgame" => self.engine.lock().unwrap().new_game(),
                "setoption" => self.handle_setoption(&rest),
                "position" => self.handle_position(&rest),
                "go" => self.handle_go(&rest, Arc::clone(&output)),
                "stop" => self.engine.lock().unwrap().stop(),
                "ponderhit" => {}
                "quit" => break,
                _ => {
                    #[cfg(feature = "logging")]
                    log::warn!("unknown command: {cmd}");
                }
            }
        }
    }

    fn handle_uci<W: Write>(&self, output: &Arc<Mutex<W>>) {
        writeln(output, "id name Corvid");
        writeln(output, "id author the corvid authors");
        for spec in options::OPTION_SPECS {
            let mut line = format!("option name {} type {} default {}", spec.name, spec.kind, spec.default);
            if let (Some(min), Some(max)) = (spec.min, spec.max) {
                line.push_str(&format!(" min {min} max {max}"));
            }
            writeln(output, &line);
        }
        writeln(output, "uciok");
    }

    fn handle_setoption(&self, rest: &[&str]) {
        // `name <words...> value <words...>`
        if let Some(name_idx) = rest.iter().position(|&t| t == "name") {
            let value_idx = rest.iter().position(|&t| t == "value");
            let name_end = value_idx.unwrap_or(rest.len());
            let name = rest[name_idx + 1..name_end].join(" ");
            let value = match value_idx {
                Some(vi) => rest[vi + 1..].join(" "),
                None => String::new(),
            };
            self.engine.lock().unwrap().set_option(&name, &value);
        }
    }

    fn handle_position(&self, rest: &[&str]) {
        if rest.is_empty() {
            return;
        }
        let moves_idx = rest.iter().position(|&t| t == "moves");
        let (head, moves) = match moves_idx {
            Some(mi) => (&rest[..mi], &rest[mi + 1..]),
            None => (rest, &rest[rest.len()..]),
        };

        let mut engine = self.engine.lock().unwrap();
        let result = if head.first() == Some(&"startpos") {
            engine.set_position(true, None, moves)
        } else if head.first() == Some(&"fen") {
            let fen = head[1..].join(" ");
            engine.set_position(false, Some(&fen), moves)
        } else {
            return;
        };
        if result.is_err() {
            #[cfg(feature = "logging")]
            log::warn!("rejecting malformed position command, keeping prior position");
        }
    }

    fn handle_go<W>(&self, rest: &[&str], output: Arc<Mutex<W>>)
    where
        W: Write + Send + 'static,
    {
        let params = parse_go(rest);
        let chess960;
        let pos;
        let shared;
        let limits;
        let pool_size;
        {
            let guard = self.engine.lock().unwrap();
            chess960 = guard.options.chess960;
            (pos, shared, limits, pool_size) = guard.prepare_search(&params);
        }

        thread::spawn(move || {
            let report_pos = pos.clone();
            let report_tt = Arc::clone(&shared);
            let pool = crate::threads::ThreadPool::new(pool_size);
            let result = pool.search(&pos, &shared, limits, |iter| {
                let line = report::info_line(&report_pos, &report_tt.tt, iter, chess960);
                writeln(&output, &line);
            });
            let best = if result.best_move.is_none() {
                "0000".to_string()
            } else {
                move_to_uci(&report_pos, result.best_move, chess960)
            };
            writeln(&output, &report::bestmove_line(&best, None));
        });
    }
}

impl Default for Orchestrator {
    fn default() -> Self {
        Orchestrator::new()
    }
}

fn writeln<W: Write>(output: &Arc<Mutex<W>>, line: &str) {
    let mut guard = output.lock().unwrap();
    let _ = writeln!(guard, "{line}");
    let _ = guard.flush();
}
