use crate::enums::SketchKind;
use crate::traits::{Sketch, SketchError};
use crate::{BloomFilter, CountMinSketch, CountingBloomFilter, HyperLogLog};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

/// Serializes any serde-enabled sketch to a JSON value.
pub fn to_json<S: Serialize>(sketch: &S) -> Result<Value, SketchError> {
    serde_json::to_value(sketch).map_err(|e| SketchError::Serialization(e.to_string()))
}

/// Parses a JSON value into a sketch and checks its invariants.
pub fn from_json<S: Sketch + DeserializeOwned>(value: Value) -> Result<S, SketchError> {
    let sketch: S = serde_json::from_value(value)
        .map_err(|e| SketchError::Deserialization(format!("JSON parse error: {}", e)))?;
    if let Err(e) = sketch.validate() {
        tracing::debug!(error = %e, "rejected sketch snapshot");
        return Err(e);
    }
    Ok(sketch)
}

/// Validates a JSON value against a specific sketch's internal rules.
pub fn validate_json(kind: SketchKind, value: Value) -> Result<(), SketchError> {
    match kind {
        SketchKind::BloomFilter => from_json::<BloomFilter>(value).map(|_| ()),
        SketchKind::CountingBloomFilter => from_json::<CountingBloomFilter>(value).map(|_| ()),
        SketchKind::CountMinSketch => from_json::<CountMinSketch>(value).map(|_| ()),
        SketchKind::HyperLogLog => from_json::<HyperLogLog>(value).map(|_| ()),
    }
}
