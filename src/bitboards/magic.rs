//! Magic bitboard sliding-piece attack tables.
//!
//! Magic numbers are not vendored: each square's multiplier is discovered
//! by deterministic brute-force search the first time the tables are
//! built, using a fixed-seed PRNG so the search (and therefore the final
//! tables) is reproducible across runs.

use once_cell::sync::Lazy;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::types::{Bitboard, Square};

const ROOK_DIRS: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
const BISHOP_DIRS: [(i32, i32); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

#[derive(Clone, Copy)]
struct Magic {
    mask: Bitboard,
    magic: u64,
    shift: u32,
    offset: usize,
}

fn slide(sq: Square, dirs: &[(i32, i32); 4], occupied: Bitboard) -> Bitboard {
    let mut attacks = Bitboard::EMPTY;
    for &(dr, df) in dirs {
        let mut rank = sq.rank() as i32;
        let mut file = sq.file() as i32;
        loop {
            rank += dr;
            file += df;
            let Some(t) = Square::try_new(rank, file) else { break };
            attacks.set(t);
            if occupied.contains(t) {
                break;
            }
        }
    }
    attacks
}

/// Relevant-occupancy mask: the full ray, excluding the board edge (a
/// piece on the edge square still blocks, but never needs to appear as a
/// mask bit since it is always occupied from the board's perspective).
fn relevant_mask(sq: Square, dirs: &[(i32, i32); 4]) -> Bitboard {
    let mut mask = Bitboard::EMPTY;
    for &(dr, df) in dirs {
        let mut rank = sq.rank() as i32;
        let mut file = sq.file() as i32;
        loop {
            let next_rank = rank + dr;
            let next_file = file + df;
            let Some(t) = Square::try_new(next_rank, next_file) else { break };
            let at_edge = match dr {
                1 => next_rank == 7,
                -1 => next_rank == 0,
                _ => false,
            } || match df {
                1 => next_file == 7,
                -1 => next_file == 0,
                _ => false,
            };
            rank = next_rank;
            file = next_file;
            if at_edge {
                break;
            }
            mask.set(t);
        }
    }
    mask
}

fn subsets(mask: Bitboard) -> Vec<Bitboard> {
    let bits: Vec<Square> = mask.iter().collect();
    let n = bits.len();
    let mut out = Vec::with_capacity(1 << n);
    for subset in 0..(1u32 << n) {
        let mut bb = Bitboard::EMPTY;
        for (i, &sq) in bits.iter().enumerate() {
            if subset & (1 << i) != 0 {
                bb.set(sq);
            }
        }
        out.push(bb);
    }
    out
}

fn sparse_random(rng: &mut StdRng) -> u64 {
    rng.gen::<u64>() & rng.gen::<u64>() & rng.gen::<u64>()
}

/// Search for a magic multiplier that injectively maps every occupancy
/// subset of `mask` into `1 << bits` buckets, then fill `table[offset..]`
/// with the corresponding attack sets.
fn find_magic(
    sq: Square,
    dirs: &[(i32, i32); 4],
    rng: &mut StdRng,
    table: &mut Vec<Bitboard>,
) -> Magic {
    let mask = relevant_mask(sq, dirs);
    let bits = mask.popcount();
    let shift = 64 - bits;
    let occupancies = subsets(mask);
    let reference: Vec<Bitboard> =
        occupancies.iter().map(|&occ| slide(sq, dirs, occ)).collect();

    let size = 1usize << bits;
    let offset = table.len();
    table.resize(offset + size, Bitboard::EMPTY);

    loop {
        let magic = sparse_random(rng);
        // A good magic candidate should spread high bits; reject obviously
        // poor ones before doing the full fill attempt.
        if (magic.wrapping_mul(mask.0) >> 56).count_ones() < 6 {
            continue;
        }
        let slots = &mut table[offset..offset + size];
        slots.fill(Bitboard::EMPTY);
        let mut seen = vec![false; size];
        let mut ok = true;
        for (occ, &attacks) in occupancies.iter().zip(reference.iter()) {
            let index = ((occ.0.wrapping_mul(magic)) >> shift) as usize;
            if seen[index] {
                if slots[index] != attacks {
                    ok = false;
                    break;
                }
            } else {
                seen[index] = true;
                slots[index] = attacks;
            }
        }
        if ok {
            return Magic { mask, magic, shift, offset };
        }
    }
}

struct SlidingTable {
    magics: [Magic; 64],
    attacks: Vec<Bitboard>,
}

impl SlidingTable {
    #[inline]
    fn attacks(&self, sq: Square, occupied: Bitboard) -> Bitboard {
        let m = &self.magics[sq.index()];
        let occ = occupied & m.mask;
        let index = (occ.0.wrapping_mul(m.magic)) >> m.shift;
        self.attacks[m.offset + index as usize]
    }
}

fn build_table(dirs: &[(i32, i32); 4], seed: u64) -> SlidingTable {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut attacks = Vec::new();
    let mut magics = [Magic { mask: Bitboard::EMPTY, magic: 0, shift: 0, offset: 0 }; 64];
    for i in 0..64 {
        magics[i] = find_magic(Square::from_index(i), dirs, &mut rng, &mut attacks);
    }
    SlidingTable { magics, attacks }
}

static ROOK_TABLE: Lazy<SlidingTable> = Lazy::new(|| build_table(&ROOK_DIRS, 0x726F_6F6B));
static BISHOP_TABLE: Lazy<SlidingTable> = Lazy::new(|| build_table(&BISHOP_DIRS, 0x6269_736F));

#[must_use]
pub fn rook_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    ROOK_TABLE.attacks(sq, occupied)
}

#[must_use]
pub fn bishop_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    BISHOP_TABLE.attacks(sq, occupied)
}

#[must_use]
pub fn queen_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    rook_attacks(sq, occupied) | bishop_attacks(sq, occupied)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rook_on_empty_board_from_a1() {
        let attacks = rook_attacks(Square::A1, Bitboard::EMPTY);
        assert_eq!(attacks.popcount(), 14);
    }

    #[test]
    fn bishop_on_empty_board_from_a1() {
        let attacks = bishop_attacks(Square::A1, Bitboard::EMPTY);
        assert_eq!(attacks.popcount(), 7);
    }

    #[test]
    fn rook_attacks_stop_at_blocker() {
        let occ = Bitboard::from_square(Square::A4);
        let attacks = rook_attacks(Square::A1, occ);
        assert!(attacks.contains(Square::A4));
        assert!(!attacks.contains(Square::A5));
    }

    #[test]
    fn matches_brute_force_for_random_occupancy() {
        let sq = Square::new(3, 3);
        let occ = Bitboard(0x0000_2400_0042_0000);
        assert_eq!(rook_attacks(sq, occ), slide(sq, &ROOK_DIRS, occ));
        assert_eq!(bishop_attacks(sq, occ), slide(sq, &BISHOP_DIRS, occ));
    }
}
