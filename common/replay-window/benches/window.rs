// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use antireplay_window::{ReplayBitmap, ReplayWindow, SharedSessionTable, WindowConfig};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

fn in_order<B: ReplayBitmap>(window: &mut ReplayWindow<B>, next: &mut u64) {
    *next += 1;
    black_box(window.check_and_record(*next));
}

fn bench_in_order(c: &mut Criterion) {
    let mut group = c.benchmark_group("in-order");

    let mut flat = ReplayWindow::new_flat(2048).unwrap();
    let mut next = 0;
    group.bench_function("flat_2048", |b| b.iter(|| in_order(&mut flat, &mut next)));

    let mut blocked = ReplayWindow::new_blocked(32, 64).unwrap();
    let mut next = 0;
    group.bench_function("blocked_32x64", |b| {
        b.iter(|| in_order(&mut blocked, &mut next))
    });

    group.finish();
}

fn bench_forward_jumps(c: &mut Criterion) {
    let mut group = c.benchmark_group("forward-jumps");

    for gap in [7u64, 1000, 1 << 20, 1 << 40] {
        let mut flat = ReplayWindow::new_flat(2048).unwrap();
        let mut seq = 1u64;
        group.bench_with_input(BenchmarkId::new("flat_2048", gap), &gap, |b, &gap| {
            b.iter(|| {
                seq = seq.wrapping_add(gap).max(1);
                black_box(flat.check_and_record(seq))
            })
        });

        let mut blocked = ReplayWindow::new_blocked(32, 64).unwrap();
        let mut seq = 1u64;
        group.bench_with_input(BenchmarkId::new("blocked_32x64", gap), &gap, |b, &gap| {
            b.iter(|| {
                seq = seq.wrapping_add(gap).max(1);
                black_box(blocked.check_and_record(seq))
            })
        });
    }

    group.finish();
}

fn bench_reordered(c: &mut Criterion) {
    let mut rng = ChaCha20Rng::seed_from_u64(42);
    let seqs: Vec<u64> = (0..1 << 16)
        .map(|i| (i as u64 + 2048).saturating_sub(rng.gen_range(0..2048)))
        .collect();

    c.bench_function("reordered_flat_2048", |b| {
        b.iter(|| {
            let mut window = ReplayWindow::new_flat(2048).unwrap();
            for &seq in &seqs {
                black_box(window.check_and_record(seq));
            }
        })
    });
}

fn bench_shared_table(c: &mut Criterion) {
    let table = SharedSessionTable::new(&WindowConfig::new(1024)).unwrap();
    let mut seq = 0u64;
    c.bench_function("shared_table_64_sessions", |b| {
        b.iter(|| {
            seq += 1;
            black_box(table.check_and_record(seq % 64, seq))
        })
    });
}

criterion_group!(
    benches,
    bench_in_order,
    bench_forward_jumps,
    bench_reordered,
    bench_shared_table
);
criterion_main!(benches);
