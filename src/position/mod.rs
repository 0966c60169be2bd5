//! Bitboard position representation: piece placement, castling and en
//! passant state, and the queries move generation and search need
//! (attackers, pins, checks, static exchange evaluation support).

mod fen;
mod make_unmake;
pub mod state;

pub use state::StateInfo;

use crate::bitboards::{
    between, bishop_attacks, king_attacks_from, knight_attacks_from, line, pawn_attacks_from,
    queen_attacks, rook_attacks,
};
use crate::types::{Bitboard, CastleSide, CastlingRights, Color, Move, PieceType, Square};
use crate::zobrist::ZOBRIST;

/// Per-color castling rook origin squares, indexed by `CastleSide`.
#[derive(Clone, Copy, Debug, Default)]
pub struct CastlingRookSquares {
    pub king_side: Option<Square>,
    pub queen_side: Option<Square>,
}

#[derive(Clone)]
pub struct Position {
    board: [PieceType; 64],
    colors_at: [Option<Color>; 64],
    color_occ: [Bitboard; 2],
    piece_occ: [Bitboard; 6],
    side_to_move: Color,
    castling: CastlingRights,
    rook_origin: [CastlingRookSquares; 2],
    en_passant: Option<Square>,
    halfmove_clock: u16,
    fullmove_number: u16,
    ply: u32,
    key: u64,
    pawn_key: u64,
    material_key: u64,
    checkers: Bitboard,
    history: Vec<StateInfo>,
}

impl Position {
    #[must_use]
    pub fn startpos() -> Self {
        Self::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1")
            .expect("startpos FEN is well-formed")
    }

    #[inline]
    #[must_use]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline]
    #[must_use]
    pub fn piece_at(&self, sq: Square) -> PieceType {
        self.board[sq.index()]
    }

    #[inline]
    #[must_use]
    pub fn color_at(&self, sq: Square) -> Option<Color> {
        self.colors_at[sq.index()]
    }

    #[inline]
    #[must_use]
    pub fn occupied(&self) -> Bitboard {
        self.color_occ[0] | self.color_occ[1]
    }

    #[inline]
    #[must_use]
    pub fn occupied_by(&self, color: Color) -> Bitboard {
        self.color_occ[color.index()]
    }

    #[inline]
    #[must_use]
    pub fn pieces(&self, piece: PieceType) -> Bitboard {
        self.piece_occ[piece.index()]
    }

    #[inline]
    #[must_use]
    pub fn pieces_colored(&self, color: Color, piece: PieceType) -> Bitboard {
        self.piece_occ[piece.index()] & self.color_occ[color.index()]
    }

    #[must_use]
    pub fn king_square(&self, color: Color) -> Square {
        self.pieces_colored(color, PieceType::King).lsb()
    }

    #[inline]
    #[must_use]
    pub fn castling_rights(&self) -> CastlingRights {
        self.castling
    }

    #[inline]
    #[must_use]
    pub fn en_passant_square(&self) -> Option<Square> {
        self.en_passant
    }

    #[inline]
    #[must_use]
    pub fn halfmove_clock(&self) -> u16 {
        self.halfmove_clock
    }

    #[inline]
    #[must_use]
    pub fn fullmove_number(&self) -> u16 {
        self.fullmove_number
    }

    #[inline]
    #[must_use]
    pub fn ply(&self) -> u32 {
        self.ply
    }

    #[inline]
    #[must_use]
    pub fn key(&self) -> u64 {
        self.key
    }

    #[inline]
    #[must_use]
    pub fn pawn_key(&self) -> u64 {
        self.pawn_key
    }

    #[inline]
    #[must_use]
    pub fn material_key(&self) -> u64 {
        self.material_key
    }

    #[inline]
    #[must_use]
    pub fn checkers(&self) -> Bitboard {
        self.checkers
    }

    #[inline]
    #[must_use]
    pub fn in_check(&self) -> bool {
        !self.checkers.is_empty()
    }

    #[must_use]
    pub fn rook_origin(&self, color: Color, side: CastleSide) -> Option<Square> {
        let slot = &self.rook_origin[color.index()];
        match side {
            CastleSide::King => slot.king_side,
            CastleSide::Queen => slot.queen_side,
        }
    }

    /// All pieces of either color attacking `sq`, given the current
    /// occupancy (or a caller-supplied hypothetical occupancy for x-ray
    /// attacker scans in SEE).
    #[must_use]
    pub fn attackers_to(&self, sq: Square, occupied: Bitboard) -> Bitboard {
        (pawn_attacks_from(Color::Black, sq) & self.pieces_colored(Color::White, PieceType::Pawn))
            | (pawn_attacks_from(Color::White, sq)
                & self.pieces_colored(Color::Black, PieceType::Pawn))
            | (knight_attacks_from(sq) & self.pieces(PieceType::Knight))
            | (king_attacks_from(sq) & self.pieces(PieceType::King))
            | (bishop_attacks(sq, occupied)
                & (self.pieces(PieceType::Bishop) | self.pieces(PieceType::Queen)))
            | (rook_attacks(sq, occupied)
                & (self.pieces(PieceType::Rook) | self.pieces(PieceType::Queen)))
    }

    #[must_use]
    pub fn is_attacked_by(&self, sq: Square, by: Color) -> bool {
        self.attackers_to(sq, self.occupied()).intersects(self.occupied_by(by))
    }

    fn compute_checkers(&self) -> Bitboard {
        let us = self.side_to_move;
        let king = self.king_square(us);
        self.attackers_to(king, self.occupied()) & self.occupied_by(us.opponent())
    }

    /// Squares occupied by pieces of `color` that are pinned against their
    /// own king, along with the direction they are pinned on (used by move
    /// generation to restrict pinned-piece moves to the pin line).
    #[must_use]
    pub fn pinned(&self, color: Color) -> Bitboard {
        let king = self.king_square(color);
        let occ = self.occupied();
        let their = self.occupied_by(color.opponent());
        let mut pinned = Bitboard::EMPTY;

        let mut candidates = (rook_attacks(king, Bitboard::EMPTY)
            & (self.pieces(PieceType::Rook) | self.pieces(PieceType::Queen)))
            | (bishop_attacks(king, Bitboard::EMPTY)
                & (self.pieces(PieceType::Bishop) | self.pieces(PieceType::Queen)));
        candidates &= their;

        for pinner in candidates.iter() {
            let between_bb = between(king, pinner) & occ;
            if between_bb.popcount() == 1 {
                let blocker = between_bb.lsb();
                if self.occupied_by(color).contains(blocker) {
                    pinned.set(blocker);
                }
            }
        }
        pinned
    }

    #[must_use]
    pub fn pin_ray(&self, color: Color, sq: Square) -> Bitboard {
        line(self.king_square(color), sq)
    }

    /// Whether `mv` gives check when played in this position (used for
    /// quiet-check generation and extension decisions).
    #[must_use]
    pub fn gives_check(&self, mv: Move) -> bool {
        let us = self.side_to_move;
        let them = us.opponent();
        let their_king = self.king_square(them);
        let to = mv.to();
        let moved = if mv.is_castle() {
            PieceType::King
        } else {
            self.piece_at(mv.from())
        };
        let piece = mv.promoted().unwrap_or(moved);

        let direct = match piece {
            PieceType::Pawn => pawn_attacks_from(us, to).contains(their_king),
            PieceType::Knight => knight_attacks_from(to).contains(their_king),
            PieceType::King => false,
            PieceType::Bishop => bishop_attacks(to, self.occupied()).contains(their_king),
            PieceType::Rook => rook_attacks(to, self.occupied()).contains(their_king),
            PieceType::Queen => queen_attacks(to, self.occupied()).contains(their_king),
            PieceType::None => false,
        };
        if direct {
            return true;
        }

        // Discovered check: a piece other than the moved one attacks the
        // king once `from` clears and, for castling, once the rook lands.
        let from = mv.from();
        let mut occ = self.occupied();
        occ.clear(from);
        occ.set(to);
        if mv.is_en_passant() {
            let cap_sq = Square::new(from.rank(), to.file());
            occ.clear(cap_sq);
        }
        let our_rook_like =
            (self.pieces(PieceType::Rook) | self.pieces(PieceType::Queen)) & self.occupied_by(us)
                & !Bitboard::from_square(from);
        let our_bishop_like = (self.pieces(PieceType::Bishop) | self.pieces(PieceType::Queen))
            & self.occupied_by(us)
            & !Bitboard::from_square(from);
        rook_attacks(their_king, occ).intersects(our_rook_like)
            || bishop_attacks(their_king, occ).intersects(our_bishop_like)
    }

    /// A draw by the 50-move rule or by threefold repetition, checked
    /// against the recorded history back to the last irreversible move.
    #[must_use]
    pub fn is_draw(&self) -> bool {
        if self.halfmove_clock >= 100 {
            return true;
        }
        let mut count = 0;
        let limit = self.halfmove_clock as usize;
        for back in (2..=limit.min(self.history.len())).step_by(2) {
            let idx = self.history.len() - back;
            if self.history[idx].key == self.key {
                count += 1;
                if count >= 2 || back < limit {
                    return true;
                }
            }
        }
        false
    }

    /// Upcoming-repetition test using the cuckoo table: true if some
    /// reversible move, played now, would repeat a position already on
    /// the path back to the last irreversible move.
    #[must_use]
    pub fn upcoming_repetition(&self) -> bool {
        let limit = self.halfmove_clock as usize;
        if limit < 3 || self.history.len() < 3 {
            return false;
        }
        let original = self.key;
        for back in (3..=limit.min(self.history.len())).step_by(2) {
            let other = self.history[self.history.len() - back].key;
            let move_key = original ^ other ^ ZOBRIST.side;
            if crate::cuckoo::CUCKOO.lookup(move_key).is_some() {
                return true;
            }
        }
        false
    }

    /// Color-flip: mirrors the board vertically and swaps every piece's
    /// color, so a white-to-move position becomes the equivalent
    /// black-to-move position. Used to check the evaluator's color
    /// symmetry (`evaluate(pos) == -evaluate(pos.flip())`).
    #[must_use]
    pub fn flip(&self) -> Position {
        let fen = self.to_fen();
        let fields: Vec<&str> = fen.split_whitespace().collect();
        let flipped_ranks: Vec<String> = fields[0]
            .split('/')
            .rev()
            .map(|rank| rank.chars().map(swap_piece_case).collect())
            .collect();
        let placement = flipped_ranks.join("/");
        let side = if fields[1] == "w" { "b" } else { "w" };
        let castling = swap_castling_case(fields[2]);
        let en_passant = flip_square_rank(fields[3]);
        let flipped_fen =
            format!("{placement} {side} {castling} {en_passant} {} {}", fields[4], fields[5]);
        Position::from_fen(&flipped_fen).expect("flipping a valid position yields a valid FEN")
    }

    /// Horizontal mirror: reflects every piece across the a/h files,
    /// leaving colors and side to move unchanged.
    #[must_use]
    pub fn mirror(&self) -> Position {
        let fen = self.to_fen();
        let fields: Vec<&str> = fen.split_whitespace().collect();
        let mirrored_ranks: Vec<String> = fields[0]
            .split('/')
            .map(|rank| mirror_rank(rank))
            .collect();
        let placement = mirrored_ranks.join("/");
        let en_passant = mirror_square_file(fields[3]);
        let mirrored_fen =
            format!("{placement} {} - {en_passant} {} {}", fields[1], fields[4], fields[5]);
        Position::from_fen(&mirrored_fen).expect("mirroring a valid position yields a valid FEN")
    }
}

fn swap_piece_case(c: char) -> char {
    if c.is_ascii_uppercase() {
        c.to_ascii_lowercase()
    } else if c.is_ascii_lowercase() {
        c.to_ascii_uppercase()
    } else {
        c
    }
}

fn swap_castling_case(rights: &str) -> String {
    if rights == "-" {
        return "-".to_string();
    }
    let mut swapped: String = rights.chars().map(swap_piece_case).collect();
    let order = ['K', 'Q', 'k', 'q'];
    swapped.retain(|c| order.contains(&c));
    if swapped.is_empty() {
        "-".to_string()
    } else {
        swapped
    }
}

fn flip_square_rank(sq: &str) -> String {
    if sq == "-" || sq.len() != 2 {
        return "-".to_string();
    }
    let file = sq.as_bytes()[0] as char;
    let rank = sq.as_bytes()[1];
    let flipped_rank = b'1' + (b'8' - rank);
    format!("{file}{}", flipped_rank as char)
}

fn mirror_rank(rank: &str) -> String {
    rank.chars().rev().collect()
}

fn mirror_square_file(sq: &str) -> String {
    if sq == "-" || sq.len() != 2 {
        return "-".to_string();
    }
    let file = sq.as_bytes()[0];
    let rank = sq.as_bytes()[1] as char;
    let mirrored_file = b'a' + (b'h' - file);
    format!("{}{rank}", mirrored_file as char)
}

#[must_use]
pub(crate) fn fen_castling_bit(color: Color, side: CastleSide) -> u8 {
    use crate::types::castling::*;
    match (color, side) {
        (Color::White, CastleSide::King) => WHITE_KING_SIDE,
        (Color::White, CastleSide::Queen) => WHITE_QUEEN_SIDE,
        (Color::Black, CastleSide::King) => BLACK_KING_SIDE,
        (Color::Black, CastleSide::Queen) => BLACK_QUEEN_SIDE,
    }
}

impl std::fmt::Debug for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Position(fen={})", self.to_fen())?;
        for rank in (0..8).rev() {
            for file in 0..8 {
                let sq = Square::new(rank, file);
                let piece = self.piece_at(sq);
                let c = match self.color_at(sq) {
                    Some(color) => piece.to_fen_char(color),
                    None => '.',
                };
                write!(f, "{c} ")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
