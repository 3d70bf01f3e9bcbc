// Copyright (c) 2026 Adrian Robinson. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.

use criterion::{criterion_group, criterion_main, Criterion};
use probabilistic_sets::*;
use std::hint::black_box;

const N: u64 = 100_000;

fn bench_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("Query");

    let mut bloom = BloomFilter::new(N as usize, 0.01).unwrap();
    let mut cbf = CountingBloomFilter::new(N as usize, 0.01).unwrap();
    let mut cms = CountMinSketch::with_error_bounds(0.001, 0.01, 0).unwrap();
    let mut cf = CuckooFilter::new(N as usize / 2, 4, 4).unwrap();
    let mut hll = HyperLogLog::default();
    for i in 0..N {
        bloom.add(&i);
        cbf.add(&i);
        cms.increment(&i);
        cf.insert(&i);
        hll.add(&i);
    }

    let mut i = 0u64;
    let mut next = move || {
        i = (i + 7_919) % (2 * N);
        i
    };

    group.bench_function("BloomFilter contains", |b| b.iter(|| bloom.contains(black_box(&next()))));
    group.bench_function("CountingBloomFilter contains", |b| b.iter(|| cbf.contains(black_box(&next()))));
    group.bench_function("CountMinSketch estimate", |b| b.iter(|| cms.estimate(black_box(&next()))));
    group.bench_function("CuckooFilter lookup", |b| b.iter(|| cf.lookup(black_box(&next()))));
    group.bench_function("HyperLogLog estimate", |b| b.iter(|| black_box(&hll).estimate()));

    group.finish();
}

criterion_group!(benches, bench_query);
criterion_main!(benches);
