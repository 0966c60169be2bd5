use proptest::prelude::*;

use corvid::movegen::{generate, GenKind};
use corvid::position::Position;

fn random_legal_walk(pos: &mut Position, choices: &[u32], max_plies: usize) {
    for &choice in choices.iter().take(max_plies) {
        let legal = generate(pos, GenKind::Legal);
        if legal.is_empty() {
            return;
        }
        let mv = legal.as_slice()[choice as usize % legal.len()];
        let before_key = pos.key();
        let before_pawn_key = pos.pawn_key();
        let before_material_key = pos.material_key();
        let before_fen = pos.to_fen();

        pos.do_move(mv);
        pos.undo_move(mv);

        assert_eq!(pos.key(), before_key, "key not restored by undo_move");
        assert_eq!(pos.pawn_key(), before_pawn_key, "pawn key not restored by undo_move");
        assert_eq!(pos.material_key(), before_material_key, "material key not restored by undo_move");
        assert_eq!(pos.to_fen(), before_fen, "fen not restored by undo_move");

        pos.do_move(mv);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn do_undo_restores_position_at_every_ply(choices in prop::collection::vec(0u32..64, 1..24)) {
        let mut pos = Position::startpos();
        random_legal_walk(&mut pos, &choices, 24);
    }

    #[test]
    fn zobrist_keys_match_recompute_from_scratch(choices in prop::collection::vec(0u32..64, 1..24)) {
        let mut pos = Position::startpos();
        for &choice in choices.iter() {
            let legal = generate(&pos, GenKind::Legal);
            if legal.is_empty() {
                break;
            }
            let mv = legal.as_slice()[choice as usize % legal.len()];
            pos.do_move(mv);

            let rebuilt = Position::from_fen(&pos.to_fen()).unwrap();
            prop_assert_eq!(pos.key(), rebuilt.key());
            prop_assert_eq!(pos.pawn_key(), rebuilt.pawn_key());
            prop_assert_eq!(pos.material_key(), rebuilt.material_key());
        }
    }
}
