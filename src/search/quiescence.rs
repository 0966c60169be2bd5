//! Quiescence search: resolve captures and checks past the main search's
//! horizon so the static evaluator never scores a position mid-exchange.

use crate::eval;
use crate::ordering::quiescence_moves;
use crate::position::Position;
use crate::see::see;
use crate::tt::Bound;
use crate::types::PieceType;

use super::Searcher;

const MATE_VALUE: i32 = 32_000;

impl<'a> Searcher<'a> {
    pub fn quiescence(&mut self, mut alpha: i32, beta: i32, depth: i32) -> i32 {
        self.nodes += 1;
        if self.should_stop() {
            return 0;
        }

        let in_check = self.pos.in_check();
        let tt_probe = self.tt.probe(self.pos.key());
        if tt_probe.found {
            let v = self.score_from_tt(tt_probe.value);
            match tt_probe.bound {
                Bound::Exact => return v,
                Bound::Lower if v >= beta => return v,
                Bound::Upper if v <= alpha => return v,
                _ => {}
            }
        }

        let stand_pat = if in_check {
            -MATE_VALUE + self.pos.ply() as i32
        } else if tt_probe.found && tt_probe.eval != 0 {
            tt_probe.eval
        } else {
            eval::evaluate(self.pos, &mut self.pawn_table, &mut self.material_table)
        };

        if !in_check {
            if stand_pat >= beta {
                return stand_pat;
            }
            if stand_pat > alpha {
                alpha = stand_pat;
            }
        }

        let moves = quiescence_moves(self.pos, depth >= 0);
        let mut best = if in_check { -MATE_VALUE + self.pos.ply() as i32 } else { stand_pat };
        let mut any_legal = false;

        let mut scored: Vec<_> = moves
            .iter()
            .copied()
            .filter(|&mv| self.pos.is_legal(mv))
            .map(|mv| (mv, self.qs_score(mv)))
            .collect();
        scored.sort_by(|a, b| b.1.cmp(&a.1));

        for (mv, _) in scored {
            any_legal = true;
            if !in_check {
                let is_capture = self.pos.piece_at(mv.to()) != PieceType::None || mv.is_en_passant();
                if is_capture && !see(self.pos, mv, -50) {
                    continue;
                }
                if stand_pat + captured_value(self.pos, mv) + 200 < alpha && !mv.is_promotion() {
                    continue;
                }
            }

            self.pos.do_move(mv);
            let score = -self.quiescence(-beta, -alpha, depth - 1);
            self.pos.undo_move(mv);

            if score > best {
                best = score;
                if score > alpha {
                    alpha = score;
                    if alpha >= beta {
                        self.tt.store(
                            self.pos.key(),
                            mv,
                            self.score_to_tt(best),
                            stand_pat,
                            0,
                            Bound::Lower,
                            false,
                        );
                        return best;
                    }
                }
            }
        }

        if in_check && !any_legal {
            return -MATE_VALUE + self.pos.ply() as i32;
        }

        let bound = if best >= beta { Bound::Lower } else { Bound::Upper };
        self.tt.store(self.pos.key(), crate::types::Move::NONE, self.score_to_tt(best), stand_pat, 0, bound, false);
        best
    }

    fn qs_score(&self, mv: crate::types::Move) -> i32 {
        let victim = if mv.is_en_passant() { PieceType::Pawn } else { self.pos.piece_at(mv.to()) };
        victim.see_value() * 16 - self.pos.piece_at(mv.from()).see_value() / 16
    }
}

fn captured_value(pos: &Position, mv: crate::types::Move) -> i32 {
    let victim = if mv.is_en_passant() { PieceType::Pawn } else { pos.piece_at(mv.to()) };
    victim.see_value()
}

