//! `do_move`/`undo_move` and the null-move variants used by null-move
//! pruning, plus pseudo-legality and full legality checks.

use super::state::StateInfo;
use super::Position;
use crate::bitboards::between;
use crate::types::{CastleSide, Color, Move, PieceType, Square};
use crate::zobrist::ZOBRIST;

impl Position {
    fn put_piece(&mut self, color: Color, piece: PieceType, sq: Square) {
        self.board[sq.index()] = piece;
        self.colors_at[sq.index()] = Some(color);
        self.color_occ[color.index()].set(sq);
        self.piece_occ[piece.index()].set(sq);
        let k = ZOBRIST.piece(color, piece, sq);
        self.key ^= k;
        if piece == PieceType::Pawn {
            self.pawn_key ^= k;
        }
    }

    fn remove_piece(&mut self, sq: Square) -> (Color, PieceType) {
        let piece = self.board[sq.index()];
        let color = self.colors_at[sq.index()].expect("removing from an empty square");
        self.board[sq.index()] = PieceType::None;
        self.colors_at[sq.index()] = None;
        self.color_occ[color.index()].clear(sq);
        self.piece_occ[piece.index()].clear(sq);
        let k = ZOBRIST.piece(color, piece, sq);
        self.key ^= k;
        if piece == PieceType::Pawn {
            self.pawn_key ^= k;
        }
        (color, piece)
    }

    fn castling_bit_for_square(&self, sq: Square) -> u8 {
        let mut bits = 0u8;
        for color in [Color::White, Color::Black] {
            let slot = &self.rook_origin[color.index()];
            if slot.king_side == Some(sq) {
                bits |= crate::position::fen_castling_bit(color, CastleSide::King);
            }
            if slot.queen_side == Some(sq) {
                bits |= crate::position::fen_castling_bit(color, CastleSide::Queen);
            }
        }
        bits
    }

    fn castle_squares(color: Color, side: CastleSide) -> (Square, Square) {
        let rank = if color.is_white() { 0 } else { 7 };
        match side {
            CastleSide::King => (Square::new(rank, 6), Square::new(rank, 5)),
            CastleSide::Queen => (Square::new(rank, 2), Square::new(rank, 3)),
        }
    }

    /// Play `mv`, pushing a `StateInfo` snapshot that `undo_move` consumes.
    pub fn do_move(&mut self, mv: Move) {
        let us = self.side_to_move;
        let them = us.opponent();
        let from = mv.from();
        let to = mv.to();
        let moved_before = self.piece_at(from);

        let mut info = StateInfo {
            mv,
            moved_piece: moved_before,
            captured: PieceType::None,
            capture_square: to,
            castling: self.castling,
            en_passant: self.en_passant,
            halfmove_clock: self.halfmove_clock,
            key: self.key,
            pawn_key: self.pawn_key,
            material_key: self.material_key,
            checkers: self.checkers,
            repetition: 0,
        };

        self.key ^= ZOBRIST.castling[self.castling.as_u8() as usize];
        if let Some(ep) = self.en_passant {
            self.key ^= ZOBRIST.en_passant[ep.file() as usize];
        }
        self.en_passant = None;

        let is_pawn_move = moved_before == PieceType::Pawn;
        let mut revoke = 0u8;

        if mv.is_castle() {
            let rook_from = to;
            let side = if rook_from.file() > from.file() { CastleSide::King } else { CastleSide::Queen };
            let (king_dest, rook_dest) = Self::castle_squares(us, side);
            self.remove_piece(from);
            self.remove_piece(rook_from);
            self.put_piece(us, PieceType::King, king_dest);
            self.put_piece(us, PieceType::Rook, rook_dest);
            revoke |= crate::position::fen_castling_bit(us, CastleSide::King)
                | crate::position::fen_castling_bit(us, CastleSide::Queen);
        } else {
            if mv.is_en_passant() {
                let cap_sq = Square::new(from.rank(), to.file());
                let (_, captured) = self.remove_piece(cap_sq);
                info.captured = captured;
                info.capture_square = cap_sq;
            } else if self.piece_at(to) != PieceType::None {
                let (_, captured) = self.remove_piece(to);
                info.captured = captured;
                info.capture_square = to;
                revoke |= self.castling_bit_for_square(to);
            }

            self.remove_piece(from);
            let placed = mv.promoted().unwrap_or(moved_before);
            self.put_piece(us, placed, to);

            if moved_before == PieceType::King {
                revoke |= crate::position::fen_castling_bit(us, CastleSide::King)
                    | crate::position::fen_castling_bit(us, CastleSide::Queen);
            }
            revoke |= self.castling_bit_for_square(from);

            if is_pawn_move && from.rank().abs_diff(to.rank()) == 2 {
                let ep_sq = Square::new((from.rank() + to.rank()) / 2, from.file());
                let has_capturer = crate::bitboards::pawn_attacks_from(us, ep_sq)
                    .intersects(self.pieces_colored(them, PieceType::Pawn));
                if has_capturer {
                    self.en_passant = Some(ep_sq);
                }
            }
        }

        self.castling.0 &= !revoke;
        self.key ^= ZOBRIST.castling[self.castling.as_u8() as usize];
        if let Some(ep) = self.en_passant {
            self.key ^= ZOBRIST.en_passant[ep.file() as usize];
        }

        self.halfmove_clock = if is_pawn_move || info.captured != PieceType::None {
            0
        } else {
            self.halfmove_clock + 1
        };
        if !us.is_white() {
            self.fullmove_number += 1;
        }

        self.side_to_move = them;
        self.key ^= ZOBRIST.side;
        self.recompute_material_key();
        self.ply += 1;
        self.checkers = self.compute_checkers();

        self.history.push(info);
    }

    pub fn undo_move(&mut self, mv: Move) {
        let info = self.history.pop().expect("undo_move without matching do_move");
        let them = self.side_to_move;
        let us = them.opponent();
        self.side_to_move = us;
        self.ply -= 1;
        if !us.is_white() {
            self.fullmove_number -= 1;
        }

        let from = mv.from();
        let to = mv.to();

        if mv.is_castle() {
            let rook_from = to;
            let side = if rook_from.file() > from.file() { CastleSide::King } else { CastleSide::Queen };
            let (king_dest, rook_dest) = Self::castle_squares(us, side);
            self.remove_piece(king_dest);
            self.remove_piece(rook_dest);
            self.put_piece(us, PieceType::King, from);
            self.put_piece(us, PieceType::Rook, rook_from);
        } else {
            self.remove_piece(to);
            self.put_piece(us, info.moved_piece, from);
            if info.captured != PieceType::None {
                let capture_color = them;
                self.put_piece(capture_color, info.captured, info.capture_square);
            }
        }

        self.castling = info.castling;
        self.en_passant = info.en_passant;
        self.halfmove_clock = info.halfmove_clock;
        self.key = info.key;
        self.pawn_key = info.pawn_key;
        self.material_key = info.material_key;
        self.checkers = info.checkers;
    }

    pub fn do_null(&mut self) -> Option<Square> {
        let ep = self.en_passant;
        if let Some(sq) = ep {
            self.key ^= ZOBRIST.en_passant[sq.file() as usize];
        }
        self.en_passant = None;
        self.side_to_move = self.side_to_move.opponent();
        self.key ^= ZOBRIST.side;
        self.ply += 1;
        self.checkers = self.compute_checkers();
        ep
    }

    pub fn undo_null(&mut self, ep: Option<Square>) {
        self.ply -= 1;
        self.side_to_move = self.side_to_move.opponent();
        self.key ^= ZOBRIST.side;
        if let Some(sq) = ep {
            self.key ^= ZOBRIST.en_passant[sq.file() as usize];
        }
        self.en_passant = ep;
        self.checkers = self.compute_checkers();
    }

    fn recompute_material_key(&mut self) {
        let mut key = 0u64;
        for color in [Color::White, Color::Black] {
            for piece in crate::types::PIECE_TYPES {
                let count = self.pieces_colored(color, piece).popcount();
                for n in 0..count {
                    key ^= ZOBRIST.piece(color, piece, Square::from_index(n as usize));
                }
            }
        }
        self.material_key = key;
    }

    /// True if `mv` is consistent with the current occupancy (origin
    /// holds the claimed moving side's piece, destination is a legal
    /// target square of that piece type given blockers). Used to validate
    /// a racy transposition-table move read before trying to play it.
    #[must_use]
    pub fn pseudo_legal(&self, mv: Move) -> bool {
        if mv.is_none() || mv.is_null() {
            return false;
        }
        let us = self.side_to_move;
        let from = mv.from();
        let to = mv.to();
        let Some(color) = self.color_at(from) else { return false };
        if color != us {
            return false;
        }
        let piece = self.piece_at(from);
        if piece == PieceType::None {
            return false;
        }
        if self.occupied_by(us).contains(to) && !mv.is_castle() {
            return false;
        }

        let occ = self.occupied();
        let attacks = match piece {
            PieceType::Knight => crate::bitboards::knight_attacks_from(from),
            PieceType::King => crate::bitboards::king_attacks_from(from),
            PieceType::Bishop => crate::bitboards::bishop_attacks(from, occ),
            PieceType::Rook => crate::bitboards::rook_attacks(from, occ),
            PieceType::Queen => crate::bitboards::queen_attacks(from, occ),
            PieceType::Pawn => {
                return self.pawn_move_is_pseudo_legal(us, from, to, mv);
            }
            PieceType::None => return false,
        };

        if mv.is_castle() {
            return self.castle_is_pseudo_legal(us, from, to);
        }
        attacks.contains(to)
    }

    fn pawn_move_is_pseudo_legal(&self, us: Color, from: Square, to: Square, mv: Move) -> bool {
        let occ = self.occupied();
        if mv.is_en_passant() {
            return self.en_passant == Some(to)
                && crate::bitboards::pawn_attacks_from(us, from).contains(to);
        }
        let single = from.forward(us.is_white());
        if single == Some(to) && !occ.contains(to) {
            return true;
        }
        if let Some(s) = single {
            let double = s.forward(us.is_white());
            if double == Some(to)
                && from.relative_rank(us.is_white()) == 1
                && !occ.contains(s)
                && !occ.contains(to)
            {
                return true;
            }
        }
        crate::bitboards::pawn_attacks_from(us, from).contains(to) && self.occupied_by(!us).contains(to)
    }

    fn castle_is_pseudo_legal(&self, us: Color, king_from: Square, rook_from: Square) -> bool {
        if self.in_check() {
            return false;
        }
        let side = if rook_from.file() > king_from.file() { CastleSide::King } else { CastleSide::Queen };
        if self.rook_origin(us, side) != Some(rook_from) {
            return false;
        }
        let bit = crate::position::fen_castling_bit(us, side);
        if self.castling.as_u8() & bit == 0 {
            return false;
        }
        let (king_dest, rook_dest) = Self::castle_squares(us, side);
        let mut path = between(king_from, rook_from);
        path |= between(king_from, king_dest) | crate::types::Bitboard::from_square(king_dest);
        path |= crate::types::Bitboard::from_square(rook_dest);
        path &= !crate::types::Bitboard::from_square(king_from);
        path &= !crate::types::Bitboard::from_square(rook_from);
        if path.intersects(self.occupied()) {
            return false;
        }
        let step = if side == CastleSide::King { 1i32 } else { -1i32 };
        let mut sq = king_from.file() as i32;
        let dest_file = king_dest.file() as i32;
        loop {
            let test = Square::new(king_from.rank(), sq as u8);
            if self.is_attacked_by(test, us.opponent()) {
                return false;
            }
            if sq == dest_file {
                break;
            }
            sq += step;
        }
        true
    }

    /// Full legality: the side to move's king must not be left in check.
    #[must_use]
    pub fn is_legal(&self, mv: Move) -> bool {
        let us = self.side_to_move;
        let from = mv.from();
        let king_sq = self.king_square(us);

        if mv.is_en_passant() {
            let cap_sq = Square::new(from.rank(), mv.to().file());
            let mut occ = self.occupied();
            occ.clear(from);
            occ.clear(cap_sq);
            occ.set(mv.to());
            let rq = self.pieces(PieceType::Rook) | self.pieces(PieceType::Queen);
            let bq = self.pieces(PieceType::Bishop) | self.pieces(PieceType::Queen);
            let attackers = (crate::bitboards::rook_attacks(king_sq, occ) & rq)
                | (crate::bitboards::bishop_attacks(king_sq, occ) & bq);
            return (attackers & self.occupied_by(us.opponent())).is_empty();
        }

        if from == king_sq {
            if mv.is_castle() {
                return true;
            }
            return !self.is_attacked_by(mv.to(), us.opponent());
        }

        let pinned = self.pinned(us);
        if !pinned.contains(from) {
            return true;
        }
        self.pin_ray(us, from).contains(mv.to())
    }
}
