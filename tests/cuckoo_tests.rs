// Copyright (c) 2026 Adrian Robinson. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.

use probabilistic_sets::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Reads the item as a little-endian integer. Under salt 0 (items) that
/// integer is the hash; under any other salt (fingerprints) the hash is the
/// integer shifted right by 8. With 16-digit fingerprints an item `v` then
/// has fingerprint `v`, first bucket `v & mask` and alternate buckets
/// `i ^ (v >> 8)`.
struct IntegerHash;

impl HashFamily for IntegerHash {
    fn hash(&self, item: &[u8], salt: u64) -> u64 {
        let mut buf = [0u8; 8];
        let n = item.len().min(8);
        buf[..n].copy_from_slice(&item[..n]);
        let value = u64::from_le_bytes(buf);
        if salt == 0 {
            value
        } else {
            value >> 8
        }
    }
}

fn stub_filter(seed: u64) -> CuckooFilter<IntegerHash, StdRng> {
    CuckooFilter::with_hasher_and_rng(4, 1, 16, 8, IntegerHash, StdRng::seed_from_u64(seed)).unwrap()
}

#[test]
fn test_indices_follow_partial_key_relation() {
    let cf = stub_filter(0);
    assert_eq!(cf.indices(&0x0301u64), (0x0301, 1, 2));
    assert_eq!(cf.indices(&0x0100u64), (0x0100, 0, 1));
}

#[test]
fn test_relocation_moves_victim_to_alternate_bucket() {
    for seed in 0..16 {
        let mut cf = stub_filter(seed);
        // Buckets 0 and 3.
        assert!(cf.insert(&0x0300u64));
        // Buckets 0 and 1; bucket 0 is taken.
        assert!(cf.insert(&0x0100u64));
        assert_eq!(cf.bucket(1), Some(&[0x0100u64][..]));

        // Buckets 1 and 0, both full. Whichever side the chain starts on,
        // 0x0300 ends up evicted to bucket 3.
        assert!(cf.insert(&0x0101u64));
        assert_eq!(cf.bucket(3), Some(&[0x0300u64][..]));

        for item in [0x0300u64, 0x0100, 0x0101] {
            assert!(cf.lookup(&item), "seed {} lost {:#x}", seed, item);
        }
        assert_eq!(cf.len(), 3);
        cf.validate().unwrap();
    }
}

#[test]
fn test_failed_insert_keeps_resident_fingerprints() {
    for seed in 0..16 {
        let mut cf = stub_filter(seed);
        // Buckets 0 and 0.
        assert!(cf.insert(&0x0000u64));
        // Buckets 0 and 1.
        assert!(cf.insert(&0x0100u64));

        // Buckets 1 and 1: every chain cycles between buckets 0 and 1.
        assert!(!cf.insert(&0x0001u64));

        assert_eq!(cf.bucket(0), Some(&[0x0000u64][..]));
        assert_eq!(cf.bucket(1), Some(&[0x0100u64][..]));
        assert!(cf.lookup(&0x0000u64));
        assert!(cf.lookup(&0x0100u64));
        assert!(!cf.lookup(&0x0001u64));
        assert_eq!(cf.len(), 2);
        cf.validate().unwrap();
    }
}

#[test]
fn test_seeded_rng_gives_reproducible_tables() {
    let build = || {
        let mut cf = CuckooFilter::with_rng(8, 2, 8, 100, StdRng::seed_from_u64(99)).unwrap();
        let outcomes: Vec<bool> = (0..24u32).map(|i| cf.insert(&i)).collect();
        (cf, outcomes)
    };
    let (a, outcomes_a) = build();
    let (b, outcomes_b) = build();

    assert_eq!(outcomes_a, outcomes_b);
    for idx in 0..a.num_buckets() {
        assert_eq!(a.bucket(idx), b.bucket(idx));
    }
}

#[test]
fn test_overfull_filter_never_loses_inserted_items() {
    let mut cf = CuckooFilter::with_rng(4, 2, 16, 20, StdRng::seed_from_u64(5)).unwrap();
    let mut inserted = Vec::new();
    let mut failures = 0;

    for i in 0..64u64 {
        if cf.insert(&i) {
            inserted.push(i);
        } else {
            failures += 1;
        }
    }

    assert!(failures > 0);
    assert_eq!(inserted.len(), cf.len());
    assert!(cf.len() <= cf.capacity());
    for item in &inserted {
        assert!(cf.lookup(item), "lost {}", item);
    }
    cf.validate().unwrap();
}

#[test]
fn test_delete_prefers_first_bucket() {
    let mut cf = stub_filter(0);
    // Same fingerprint can only repeat for the same item; place two copies.
    assert!(cf.insert(&0x0100u64));
    assert!(cf.insert(&0x0100u64));
    assert_eq!(cf.bucket(0), Some(&[0x0100u64][..]));
    assert_eq!(cf.bucket(1), Some(&[0x0100u64][..]));

    assert!(cf.delete(&0x0100u64));
    assert_eq!(cf.bucket(0), Some(&[][..]));
    assert_eq!(cf.bucket(1), Some(&[0x0100u64][..]));
}

#[test]
fn test_false_positive_rate() {
    let mut cf = CuckooFilter::new(2048, 4, 4).unwrap();

    for i in 0..4000u32 {
        assert!(cf.insert(&i));
    }

    let false_positives = (4000..104_000u32).filter(|i| cf.lookup(i)).count();

    // 16-bit fingerprints, two buckets of four: about 8 / 65536.
    let fpr = false_positives as f64 / 100_000.0;
    assert!(fpr < 0.001, "FPR too high: {}", fpr);
}
