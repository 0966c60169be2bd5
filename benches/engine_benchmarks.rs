//! Benchmarks for engine performance.

use std::sync::atomic::{AtomicBool, AtomicU64};

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use corvid::eval::{self, MaterialHashTable, PawnHashTable};
use corvid::movegen::{generate, GenKind};
use corvid::position::Position;
use corvid::search::{perft, Limits, Searcher, MATE_VALUE};
use corvid::tt::TranspositionTable;
use corvid::types::Move;

fn bench_perft(c: &mut Criterion) {
    let mut group = c.benchmark_group("perft");

    let mut startpos = Position::startpos();
    for depth in 1..=4 {
        group.bench_with_input(BenchmarkId::new("startpos", depth), &depth, |b, &depth| {
            b.iter(|| perft(black_box(&mut startpos), black_box(depth)))
        });
    }

    let mut kiwipete =
        Position::from_fen("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1").unwrap();
    for depth in 1..=3 {
        group.bench_with_input(BenchmarkId::new("kiwipete", depth), &depth, |b, &depth| {
            b.iter(|| perft(black_box(&mut kiwipete), black_box(depth)))
        });
    }

    group.finish();
}

fn bench_movegen(c: &mut Criterion) {
    let mut group = c.benchmark_group("movegen");

    let startpos = Position::startpos();
    group.bench_function("startpos", |b| b.iter(|| black_box(generate(&startpos, GenKind::Legal))));

    let middlegame =
        Position::from_fen("r1bqkb1r/pppp1ppp/2n2n2/4p3/2B1P3/5N2/PPPP1PPP/RNBQK2R w KQkq - 4 4").unwrap();
    group.bench_function("middlegame", |b| b.iter(|| black_box(generate(&middlegame, GenKind::Legal))));

    let kiwipete =
        Position::from_fen("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1").unwrap();
    group.bench_function("kiwipete", |b| b.iter(|| black_box(generate(&kiwipete, GenKind::Legal))));

    group.finish();
}

fn bench_evaluate(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluate");

    let startpos = Position::startpos();
    let kiwipete =
        Position::from_fen("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1").unwrap();

    group.bench_function("startpos", |b| {
        let mut pawn_table = PawnHashTable::new();
        let mut material_table = MaterialHashTable::new();
        b.iter(|| eval::evaluate(black_box(&startpos), &mut pawn_table, &mut material_table))
    });
    group.bench_function("kiwipete", |b| {
        let mut pawn_table = PawnHashTable::new();
        let mut material_table = MaterialHashTable::new();
        b.iter(|| eval::evaluate(black_box(&kiwipete), &mut pawn_table, &mut material_table))
    });

    group.finish();
}

fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("search");
    group.sample_size(10);

    for depth in [3, 4, 5] {
        group.bench_with_input(BenchmarkId::new("startpos", depth), &depth, |b, &depth| {
            b.iter(|| {
                let mut pos = Position::startpos();
                let tt = TranspositionTable::new(16);
                let nodes = AtomicU64::new(0);
                let stop = AtomicBool::new(false);
                let limits = Limits { depth: Some(depth), ..Default::default() };
                let mut searcher = Searcher::new(&mut pos, &tt, &nodes, &stop, limits);
                searcher.depth_search::<true>(-MATE_VALUE, MATE_VALUE, depth, false, Move::NONE)
            })
        });
    }

    for depth in [3, 4] {
        group.bench_with_input(BenchmarkId::new("kiwipete", depth), &depth, |b, &depth| {
            b.iter(|| {
                let mut pos = Position::from_fen(
                    "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
                )
                .unwrap();
                let tt = TranspositionTable::new(16);
                let nodes = AtomicU64::new(0);
                let stop = AtomicBool::new(false);
                let limits = Limits { depth: Some(depth), ..Default::default() };
                let mut searcher = Searcher::new(&mut pos, &tt, &nodes, &stop, limits);
                searcher.depth_search::<true>(-MATE_VALUE, MATE_VALUE, depth, false, Move::NONE)
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_perft, bench_movegen, bench_evaluate, bench_search);
criterion_main!(benches);
