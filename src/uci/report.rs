//! `info` line formatting.

use crate::position::Position;
use crate::search::iterative::IterationResult;
use crate::search::MATE_VALUE;
use crate::tt::TranspositionTable;

use super::protocol::move_to_uci;

/// Formats one `info depth ... score ... pv ...` line. `pv` is just the
/// best move followed by a TT-walked continuation, since this engine
/// doesn't keep a separate triangular PV table.
#[must_use]
pub fn info_line(
    pos: &Position,
    tt: &TranspositionTable,
    result: &IterationResult,
    chess960: bool,
) -> String {
    let score_str = if result.score.abs() >= MATE_VALUE - 128 {
        let plies_to_mate = MATE_VALUE - result.score.abs();
        let moves_to_mate = (plies_to_mate + 1) / 2;
        let signed = if result.score > 0 { moves_to_mate } else { -moves_to_mate };
        format!("mate {signed}")
    } else {
        format!("cp {}", result.score)
    };

    let nps = if result.elapsed.as_millis() > 0 {
        (result.nodes as u128 * 1000 / result.elapsed.as_millis()) as u64
    } else {
        0
    };

    let pv = walk_pv(pos, tt, result.best_move, chess960, result.depth as usize);

    format!(
        "info depth {} seldepth {} multipv {} score {} nodes {} nps {} hashfull {} time {} pv {}",
        result.depth,
        result.seldepth,
        result.multipv,
        score_str,
        result.nodes,
        nps,
        tt.hashfull_permille(),
        result.elapsed.as_millis(),
        pv,
    )
}

#[must_use]
pub fn bestmove_line(best: &str, ponder: Option<&str>) -> String {
    match ponder {
        Some(p) => format!("bestmove {best} ponder {p}"),
        None => format!("bestmove {best}"),
    }
}

fn walk_pv(
    pos: &Position,
    tt: &TranspositionTable,
    first: crate::types::Move,
    chess960: bool,
    max_len: usize,
) -> String {
    let mut words = Vec::new();
    if first.is_none() {
        return String::new();
    }
    let mut walker = pos.clone();
    let mut mv = first;
    for _ in 0..max_len.max(1) {
        if mv.is_none() || !walker.pseudo_legal(mv) || !walker.is_legal(mv) {
            break;
        }
        words.push(move_to_uci(&walker, mv, chess960));
        walker.do_move(mv);
        let probe = tt.probe(walker.key());
        if !probe.found {
            break;
        }
        mv = probe.mv;
    }
    words.join(" ")
}
