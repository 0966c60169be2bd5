use corvid::movegen::{generate, GenKind};
use corvid::position::Position;

fn play(pos: &mut Position, uci: &str) {
    let legal = generate(pos, GenKind::Legal);
    let mv = legal
        .iter()
        .copied()
        .find(|&mv| corvid::uci::protocol::move_to_uci(pos, mv, false) == uci)
        .unwrap_or_else(|| panic!("{uci} is not legal"));
    pos.do_move(mv);
}

#[test]
fn threefold_repetition_is_a_draw() {
    let mut pos = Position::startpos();
    for mv in ["g1f3", "g8f6", "f3g1", "f6g8", "g1f3", "g8f6", "f3g1", "f6g8"] {
        play(&mut pos, mv);
    }
    assert!(pos.is_draw());
}
