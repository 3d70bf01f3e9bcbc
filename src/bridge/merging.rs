use crate::bridge::serialization::{from_json, to_json};
use crate::enums::SketchKind;
use crate::traits::{Mergeable, SketchError};
use crate::{BloomFilter, CountMinSketch, CountingBloomFilter, HyperLogLog};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

/// Merges multiple JSON values representing sketch states into a single JSON value.
pub fn merge_json_values(kind: SketchKind, values: &[Value]) -> Result<Value, SketchError> {
    if values.is_empty() {
        return Err(SketchError::InvalidInput(format!("No {} snapshots to merge", kind)));
    }

    match kind {
        SketchKind::BloomFilter => merge_all::<BloomFilter>(values),
        SketchKind::CountingBloomFilter => merge_all::<CountingBloomFilter>(values),
        SketchKind::CountMinSketch => merge_all::<CountMinSketch>(values),
        SketchKind::HyperLogLog => merge_all::<HyperLogLog>(values),
    }
}

fn merge_all<S: Mergeable + Serialize + DeserializeOwned>(values: &[Value]) -> Result<Value, SketchError> {
    let mut base: S = from_json(values[0].clone())?;
    for val in &values[1..] {
        let other: S = from_json(val.clone())?;
        base.merge(&other)?;
    }
    to_json(&base)
}
