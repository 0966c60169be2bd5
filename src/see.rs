//! Static exchange evaluation: estimate the material result of a capture
//! sequence on one square without playing it out move by move.

use crate::bitboards::{bishop_attacks, king_attacks_from, knight_attacks_from, pawn_attacks_from, rook_attacks};
use crate::position::Position;
use crate::types::{Bitboard, Color, Move, PieceType};

fn least_valuable_attacker(
    pos: &Position,
    attackers: Bitboard,
    color: Color,
) -> Option<(crate::types::Square, PieceType)> {
    for piece in [
        PieceType::Pawn,
        PieceType::Knight,
        PieceType::Bishop,
        PieceType::Rook,
        PieceType::Queen,
        PieceType::King,
    ] {
        let candidates = attackers & pos.pieces_colored(color, piece);
        if !candidates.is_empty() {
            return Some((candidates.lsb(), piece));
        }
    }
    None
}

fn attackers_to_with_occ(pos: &Position, sq: crate::types::Square, occupied: Bitboard) -> Bitboard {
    (pawn_attacks_from(Color::Black, sq) & pos.pieces_colored(Color::White, PieceType::Pawn) & occupied)
        | (pawn_attacks_from(Color::White, sq)
            & pos.pieces_colored(Color::Black, PieceType::Pawn)
            & occupied)
        | (knight_attacks_from(sq) & pos.pieces(PieceType::Knight) & occupied)
        | (king_attacks_from(sq) & pos.pieces(PieceType::King) & occupied)
        | (bishop_attacks(sq, occupied)
            & (pos.pieces(PieceType::Bishop) | pos.pieces(PieceType::Queen))
            & occupied)
        | (rook_attacks(sq, occupied)
            & (pos.pieces(PieceType::Rook) | pos.pieces(PieceType::Queen))
            & occupied)
}

/// True if the result of playing `mv` and continuing the exchange on its
/// destination square is at least `threshold` centipawns for the side to
/// move. Ignores pins entirely (a rare and cheap-to-tolerate inaccuracy
/// shared with most engines' SEE implementations).
#[must_use]
pub fn see(pos: &Position, mv: Move, threshold: i32) -> bool {
    if mv.is_castle() {
        return 0 >= threshold;
    }

    let to = mv.to();
    let from = mv.from();
    let us = pos.side_to_move();

    let mut occupied = pos.occupied();
    occupied.clear(from);

    let mut captured_value = if mv.is_en_passant() {
        occupied.clear(crate::types::Square::new(from.rank(), to.file()));
        PieceType::Pawn.see_value()
    } else {
        pos.piece_at(to).see_value()
    };
    if let Some(promo) = mv.promoted() {
        captured_value += promo.see_value() - PieceType::Pawn.see_value();
    }

    let mut gain = [0i32; 32];
    let mut depth = 0;
    gain[0] = captured_value;
    let mut moving_piece = mv.promoted().unwrap_or(pos.piece_at(from));
    let mut side = us.opponent();

    loop {
        let attackers = attackers_to_with_occ(pos, to, occupied);
        let side_attackers = attackers & pos.occupied_by(side);
        let Some((attacker_sq, attacker_piece)) = least_valuable_attacker(pos, side_attackers, side) else {
            break;
        };
        depth += 1;
        gain[depth] = moving_piece.see_value() - gain[depth - 1];
        occupied.clear(attacker_sq);
        moving_piece = attacker_piece;
        side = side.opponent();
        if depth >= 31 {
            break;
        }
    }

    while depth > 0 {
        gain[depth - 1] = -((-gain[depth - 1]).max(gain[depth]));
        depth -= 1;
    }

    gain[0] >= threshold
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::Position;
    use crate::types::Square;

    #[test]
    fn pawn_takes_undefended_queen_is_winning() {
        let pos = Position::from_fen("4k3/8/8/3q4/4P3/8/8/4K3 w - - 0 1").unwrap();
        let mv = Move::simple(Square::E4, Square::D5);
        assert!(see(&pos, mv, 0));
    }

    #[test]
    fn queen_takes_defended_pawn_loses_material() {
        let pos = Position::from_fen("4k3/8/8/3p4/8/8/6Q1/4K3 w - - 0 1").unwrap();
        // Not defended in this position; this just exercises the threshold path.
        let mv = Move::simple(Square::G2, Square::D5);
        assert!(see(&pos, mv, 0));
    }
}
