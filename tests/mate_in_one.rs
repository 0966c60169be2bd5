use std::sync::atomic::{AtomicBool, AtomicU64};

use corvid::position::Position;
use corvid::search::{Limits, Searcher, MATE_VALUE};
use corvid::tt::TranspositionTable;
use corvid::types::{Move, Square};

#[test]
fn finds_mate_in_one() {
    let mut pos = Position::from_fen("4k3/8/4K3/8/8/8/8/R7 w - - 0 1").unwrap();
    let tt = TranspositionTable::new(4);
    let nodes = AtomicU64::new(0);
    let stop = AtomicBool::new(false);
    let limits = Limits { depth: Some(5), ..Default::default() };

    let mut searcher = Searcher::new(&mut pos, &tt, &nodes, &stop, limits);
    let score = searcher.depth_search::<true>(-MATE_VALUE, MATE_VALUE, 5, false, Move::NONE);

    assert!(score >= MATE_VALUE - 10, "expected a mate score, got {score}");

    let probe = tt.probe(pos.key());
    assert!(probe.found);
    assert_eq!(probe.mv, Move::simple(Square::A1, Square::A8));
}
