//! Hammers a small shared transposition table from many threads and
//! checks that every move handed back by `probe` is legal on the
//! position the probing thread intended it for — the validation the
//! control protocol relies on instead of synchronizing TT access.

use std::sync::Arc;
use std::thread;

use corvid::movegen::{generate, GenKind};
use corvid::position::Position;
use corvid::tt::{Bound, TranspositionTable};

#[test]
fn torn_reads_are_filtered_by_legality_check() {
    let tt = Arc::new(TranspositionTable::new(1));
    let positions: Vec<Position> = [
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
    ]
    .iter()
    .map(|fen| Position::from_fen(fen).unwrap())
    .collect();

    let mut handles = Vec::new();
    for t in 0..8 {
        let tt = Arc::clone(&tt);
        let pos = positions[t % positions.len()].clone();
        handles.push(thread::spawn(move || {
            let legal = generate(&pos, GenKind::Legal);
            let mut own_writes_validated = 0u32;
            for i in 0..20_000u64 {
                let mv = legal.as_slice()[(i as usize) % legal.len().max(1)];
                // Every write this thread makes uses its own position's key,
                // so a probe hitting one of them must decode to a move this
                // exact position accepts as pseudo-legal and legal.
                tt.store(pos.key(), mv, 10, 10, 4, Bound::Exact, false);
                let probe = tt.probe(pos.key());
                if probe.found && !probe.mv.is_none() {
                    assert!(
                        pos.pseudo_legal(probe.mv) && pos.is_legal(probe.mv),
                        "probe returned a move that is not legal on the position it was stored for"
                    );
                    own_writes_validated += 1;
                }
            }
            assert!(own_writes_validated > 0, "no probe ever hit under contention");
        }));
    }
    for h in handles {
        h.join().unwrap();
    }
}
