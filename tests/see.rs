use corvid::movegen::{generate, GenKind};
use corvid::position::Position;
use corvid::see::see;

fn find_move(pos: &Position, uci: &str) -> corvid::types::Move {
    generate(pos, GenKind::Legal)
        .iter()
        .copied()
        .find(|&mv| corvid::uci::protocol::move_to_uci(pos, mv, false) == uci)
        .unwrap_or_else(|| panic!("{uci} is not legal"))
}

#[test]
fn en_passant_discovered_check_is_illegal() {
    let pos = Position::from_fen("8/8/8/2k5/2pP4/8/B7/4K3 b - d3 0 1").unwrap();
    let legal = generate(&pos, GenKind::Legal);
    let has_ep = legal
        .iter()
        .any(|&mv| mv.is_en_passant() && corvid::uci::protocol::move_to_uci(&pos, mv, false) == "c4d3");
    assert!(!has_ep, "c4d3 en passant must be illegal: it discovers check on the king");
}

#[test]
fn see_accepts_favorable_exchange_rejects_unfavorable_threshold() {
    let pos = Position::from_fen("1k1r3q/1ppn3p/p4b2/4p3/8/P2N2P1/1PP1R1BP/2K1Q3 w - - 0 1").unwrap();
    let mv = find_move(&pos, "d3e5");
    assert!(see(&pos, mv, 0));
    assert!(!see(&pos, mv, 100));
}
