// Copyright (c) 2026 Adrian Robinson. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.

use probabilistic_sets::*;
use serde_json::json;

#[test]
fn test_bloom_filter_snapshot_roundtrip() {
    let mut bloom = BloomFilter::new(100, 0.01).unwrap();
    bloom.add("apple");
    bloom.add("banana");

    let value = SnapshotBridge::to_json(&bloom).unwrap();
    SnapshotBridge::validate_json(SketchKind::BloomFilter, value.clone()).unwrap();

    let restored: BloomFilter = SnapshotBridge::from_json(value).unwrap();
    assert_eq!(restored, bloom);
    assert!(restored.contains("apple"));
    assert!(restored.contains("banana"));
}

#[test]
fn test_validate_json_rejects_truncated_registers() {
    let hll = HyperLogLog::new(8).unwrap();
    let mut value = SnapshotBridge::to_json(&hll).unwrap();
    value["registers"] = json!([0, 1, 2]);

    let result = SnapshotBridge::validate_json(SketchKind::HyperLogLog, value);
    assert!(matches!(result, Err(SketchError::Validation(_))));
}

#[test]
fn test_validate_json_rejects_truncated_bit_storage() {
    let bloom = BloomFilter::new(100, 0.01).unwrap();
    let mut value = SnapshotBridge::to_json(&bloom).unwrap();
    value["bits"]["storage"] = json!([]);

    let result = SnapshotBridge::from_json::<BloomFilter>(value);
    assert!(matches!(result, Err(SketchError::Validation(_))));
}

#[test]
fn test_validate_json_rejects_bits_past_the_end() {
    // 959 bits fill 30 blocks with one unused bit at the top of the last.
    let bloom = BloomFilter::new(100, 0.01).unwrap();
    assert_eq!(bloom.num_bits(), 959);
    let mut value = SnapshotBridge::to_json(&bloom).unwrap();
    value["bits"]["storage"][29] = json!(u32::MAX);

    let result = SnapshotBridge::validate_json(SketchKind::BloomFilter, value);
    assert!(matches!(result, Err(SketchError::Validation(_))));
}

#[test]
fn test_validate_json_rejects_oversized_register() {
    let hll = HyperLogLog::new(8).unwrap();
    let mut value = SnapshotBridge::to_json(&hll).unwrap();
    // 128 - 8 + 1 = 121 is the largest legal register value.
    value["registers"][0] = json!(122);

    let result = SnapshotBridge::from_json::<HyperLogLog>(value);
    assert!(matches!(result, Err(SketchError::Validation(_))));
}

#[test]
fn test_validate_json_rejects_ragged_count_min_table() {
    let cms = CountMinSketch::new(4, 2, 0).unwrap();
    let mut value = SnapshotBridge::to_json(&cms).unwrap();
    value["table"][1] = json!([0, 0]);

    let result = SnapshotBridge::validate_json(SketchKind::CountMinSketch, value);
    assert!(matches!(result, Err(SketchError::Validation(_))));
}

#[test]
fn test_validate_json_rejects_wrong_shape() {
    let result = SnapshotBridge::validate_json(SketchKind::CountingBloomFilter, json!({"counters": "nope"}));
    assert!(matches!(result, Err(SketchError::Deserialization(_))));
}

#[test]
fn test_merge_json_count_min_sketches() {
    let mut a = CountMinSketch::new(200, 4, 3).unwrap();
    a.add("apple", 2);
    let mut b = CountMinSketch::new(200, 4, 3).unwrap();
    b.add("apple", 5);
    b.add("pear", 1);

    let values = [SnapshotBridge::to_json(&a).unwrap(), SnapshotBridge::to_json(&b).unwrap()];
    let merged = SnapshotBridge::merge_json_values(SketchKind::CountMinSketch, &values).unwrap();
    let merged: CountMinSketch = SnapshotBridge::from_json(merged).unwrap();

    assert!(merged.estimate("apple") >= 7);
    assert!(merged.estimate("pear") >= 1);
    assert_eq!(merged.total_count(), 8);
}

#[test]
fn test_merge_json_counting_bloom_filters() {
    let mut a = CountingBloomFilter::new(10, 0.05).unwrap();
    a.add("apple");
    let mut b = CountingBloomFilter::new(10, 0.05).unwrap();
    b.add("apple");

    let values = [SnapshotBridge::to_json(&a).unwrap(), SnapshotBridge::to_json(&b).unwrap()];
    let merged = SnapshotBridge::merge_json_values(SketchKind::CountingBloomFilter, &values).unwrap();
    let mut merged: CountingBloomFilter = SnapshotBridge::from_json(merged).unwrap();

    merged.remove("apple").unwrap();
    assert!(merged.contains("apple"));
}

#[test]
fn test_merge_json_rejects_mismatched_dimensions() {
    let a = BloomFilter::new(10, 0.01).unwrap();
    let b = BloomFilter::new(1000, 0.01).unwrap();
    let values = [SnapshotBridge::to_json(&a).unwrap(), SnapshotBridge::to_json(&b).unwrap()];

    let result = SnapshotBridge::merge_json_values(SketchKind::BloomFilter, &values);
    assert!(matches!(result, Err(SketchError::DimensionMismatch(_))));
}

#[test]
fn test_merge_json_rejects_empty_input() {
    let result = SnapshotBridge::merge_json_values(SketchKind::HyperLogLog, &[]);
    assert!(matches!(result, Err(SketchError::InvalidInput(_))));
}

#[test]
fn test_sketch_kind_parsing() {
    assert_eq!("count_min_sketch".parse::<SketchKind>().unwrap(), SketchKind::CountMinSketch);
    assert_eq!("HLL".parse::<SketchKind>().unwrap(), SketchKind::HyperLogLog);
    assert_eq!("Counting-Bloom".parse::<SketchKind>().unwrap(), SketchKind::CountingBloomFilter);

    for kind in [
        SketchKind::BloomFilter,
        SketchKind::CountingBloomFilter,
        SketchKind::CountMinSketch,
        SketchKind::HyperLogLog,
    ] {
        assert_eq!(kind.to_string().parse::<SketchKind>().unwrap(), kind);
    }

    assert!(matches!("trie".parse::<SketchKind>(), Err(SketchError::InvalidInput(_))));
}

#[test]
fn test_merge_json_rejects_different_hash_keys() {
    let mut a = CountMinSketch::with_hasher(64, 3, 0, SipHashFamily::with_keys(1, 2)).unwrap();
    a.add("apple", 1);
    let mut b = CountMinSketch::with_hasher(64, 3, 0, SipHashFamily::with_keys(3, 4)).unwrap();
    b.add("pear", 10);
    let values = [SnapshotBridge::to_json(&a).unwrap(), SnapshotBridge::to_json(&b).unwrap()];

    let result = SnapshotBridge::merge_json_values(SketchKind::CountMinSketch, &values);
    assert!(matches!(result, Err(SketchError::DimensionMismatch(_))));
}
