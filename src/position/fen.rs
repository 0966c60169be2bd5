//! FEN parsing and emission.

use super::{CastlingRookSquares, Position};
use crate::error::FenError;
use crate::types::{Bitboard, CastleSide, CastlingRights, Color, PieceType, Square};
use crate::zobrist::ZOBRIST;

impl Position {
    pub fn from_fen(fen: &str) -> Result<Position, FenError> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        if fields.len() != 6 {
            return Err(FenError::WrongFieldCount { found: fields.len() });
        }

        let mut board = [PieceType::None; 64];
        let mut colors_at = [None; 64];
        let mut color_occ = [Bitboard::EMPTY; 2];
        let mut piece_occ = [Bitboard::EMPTY; 6];

        let ranks: Vec<&str> = fields[0].split('/').collect();
        if ranks.len() != 8 {
            return Err(FenError::BadPlacement { reason: "expected 8 ranks".into() });
        }
        for (rank_idx, rank_str) in ranks.iter().enumerate() {
            let rank = 7 - rank_idx as u8;
            let mut file = 0u8;
            for c in rank_str.chars() {
                if let Some(skip) = c.to_digit(10) {
                    file += skip as u8;
                    if file > 8 {
                        return Err(FenError::BadPlacement { reason: "file overflow".into() });
                    }
                    continue;
                }
                if file >= 8 {
                    return Err(FenError::BadPlacement { reason: "file overflow".into() });
                }
                let color = if c.is_ascii_uppercase() { Color::White } else { Color::Black };
                let piece = PieceType::from_char(c)
                    .ok_or_else(|| FenError::BadPlacement { reason: format!("bad piece char '{c}'") })?;
                let sq = Square::new(rank, file);
                board[sq.index()] = piece;
                colors_at[sq.index()] = Some(color);
                color_occ[color.index()].set(sq);
                piece_occ[piece.index()].set(sq);
                file += 1;
            }
            if file != 8 {
                return Err(FenError::BadPlacement { reason: "rank does not sum to 8".into() });
            }
        }

        let side_to_move = match fields[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(FenError::BadSideToMove { text: other.to_string() }),
        };

        let mut castling = CastlingRights::none();
        let mut rook_origin = [CastlingRookSquares::default(); 2];
        if fields[2] != "-" {
            for c in fields[2].chars() {
                let (color, side, default_file) = match c {
                    'K' => (Color::White, CastleSide::King, 7u8),
                    'Q' => (Color::White, CastleSide::Queen, 0u8),
                    'k' => (Color::Black, CastleSide::King, 7u8),
                    'q' => (Color::Black, CastleSide::Queen, 0u8),
                    _ => {
                        return Err(FenError::BadCastlingRights { text: fields[2].to_string() })
                    }
                };
                let back_rank = if color.is_white() { 0 } else { 7 };
                let sq = Square::new(back_rank, default_file);
                castling.0 |= super::fen_castling_bit(color, side);
                let slot = &mut rook_origin[color.index()];
                match side {
                    CastleSide::King => slot.king_side = Some(sq),
                    CastleSide::Queen => slot.queen_side = Some(sq),
                }
            }
        }

        let en_passant = if fields[3] == "-" {
            None
        } else {
            Some(fields[3].parse::<Square>().map_err(|_| FenError::BadEnPassant {
                text: fields[3].to_string(),
            })?)
        };

        let halfmove_clock: u16 = fields[4]
            .parse()
            .map_err(|_| FenError::BadHalfmoveClock { text: fields[4].to_string() })?;
        let fullmove_number: u16 = fields[5]
            .parse()
            .map_err(|_| FenError::BadFullmoveNumber { text: fields[5].to_string() })?;

        for color in [Color::White, Color::Black] {
            let count = (piece_occ[PieceType::King.index()] & color_occ[color.index()]).popcount();
            if count != 1 {
                return Err(FenError::KingCountInvalid {
                    color_white: color.is_white(),
                    count: count as usize,
                });
            }
        }

        let mut pos = Position {
            board,
            colors_at,
            color_occ,
            piece_occ,
            side_to_move,
            castling,
            rook_origin,
            en_passant,
            halfmove_clock,
            fullmove_number,
            ply: 0,
            key: 0,
            pawn_key: 0,
            material_key: 0,
            checkers: Bitboard::EMPTY,
            history: Vec::with_capacity(64),
        };
        pos.recompute_keys_from_scratch();
        pos.checkers = pos.compute_checkers();

        let not_to_move = side_to_move.opponent();
        if pos.is_attacked_by(pos.king_square(not_to_move), side_to_move) {
            return Err(FenError::SideNotToMoveInCheck);
        }

        Ok(pos)
    }

    pub(super) fn recompute_keys_from_scratch(&mut self) {
        let mut key = 0u64;
        let mut pawn_key = 0u64;
        let mut material_key = 0u64;
        for idx in 0..64 {
            let piece = self.board[idx];
            if piece == PieceType::None {
                continue;
            }
            let color = self.colors_at[idx].expect("occupied square has a color");
            let sq = Square::from_index(idx);
            let k = ZOBRIST.piece(color, piece, sq);
            key ^= k;
            if piece == PieceType::Pawn {
                pawn_key ^= k;
            }
        }
        for color in [Color::White, Color::Black] {
            for piece in crate::types::PIECE_TYPES {
                let count = self.pieces_colored(color, piece).popcount();
                for n in 0..count {
                    material_key ^= ZOBRIST.piece(color, piece, Square::from_index(n as usize));
                }
            }
        }
        key ^= ZOBRIST.castling[self.castling.as_u8() as usize];
        if let Some(ep) = self.en_passant {
            key ^= ZOBRIST.en_passant[ep.file() as usize];
        }
        if self.side_to_move.is_white() {
            key ^= ZOBRIST.side;
        }
        self.key = key;
        self.pawn_key = pawn_key;
        self.material_key = material_key;
    }

    #[must_use]
    pub fn to_fen(&self) -> String {
        let mut s = String::new();
        for rank in (0..8).rev() {
            let mut empty = 0;
            for file in 0..8 {
                let sq = Square::new(rank, file);
                let piece = self.piece_at(sq);
                if piece == PieceType::None {
                    empty += 1;
                    continue;
                }
                if empty > 0 {
                    s.push_str(&empty.to_string());
                    empty = 0;
                }
                let color = self.color_at(sq).expect("occupied square has a color");
                s.push(piece.to_fen_char(color));
            }
            if empty > 0 {
                s.push_str(&empty.to_string());
            }
            if rank > 0 {
                s.push('/');
            }
        }
        s.push(' ');
        s.push(if self.side_to_move.is_white() { 'w' } else { 'b' });
        s.push(' ');
        let rights = self.castling.as_u8();
        if rights == 0 {
            s.push('-');
        } else {
            if rights & crate::types::castling::WHITE_KING_SIDE != 0 {
                s.push('K');
            }
            if rights & crate::types::castling::WHITE_QUEEN_SIDE != 0 {
                s.push('Q');
            }
            if rights & crate::types::castling::BLACK_KING_SIDE != 0 {
                s.push('k');
            }
            if rights & crate::types::castling::BLACK_QUEEN_SIDE != 0 {
                s.push('q');
            }
        }
        s.push(' ');
        match self.en_passant {
            Some(sq) => s.push_str(&sq.to_string()),
            None => s.push('-'),
        }
        s.push(' ');
        s.push_str(&self.halfmove_clock.to_string());
        s.push(' ');
        s.push_str(&self.fullmove_number.to_string());
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn startpos_roundtrips() {
        let pos = Position::startpos();
        assert_eq!(
            pos.to_fen(),
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"
        );
    }

    #[test]
    fn rejects_wrong_field_count() {
        assert!(Position::from_fen("8/8/8/8/8/8/8/8 w - -").is_err());
    }

    #[test]
    fn rejects_missing_king() {
        assert!(Position::from_fen("8/8/8/8/8/8/8/K7 w - - 0 1").is_err());
    }

    #[test]
    fn kiwipete_roundtrips() {
        let fen = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
        let pos = Position::from_fen(fen).unwrap();
        assert_eq!(pos.to_fen(), fen);
    }
}
