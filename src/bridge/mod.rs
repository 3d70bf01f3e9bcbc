// Copyright (c) 2026 Adrian Robinson. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.

pub mod merging;
pub mod serialization;

use crate::enums::SketchKind;
use crate::traits::{Sketch, SketchError};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

/// A bridge for exporting sketch state to JSON and importing it back with
/// validation.
///
/// This module lets separate processes exchange sketches: one side exports a
/// snapshot, the other validates it and merges it into its own state. Nothing
/// is written to disk.
///
/// # Example
///
/// ```
/// use probabilistic_sets::{HyperLogLog, SketchKind, SnapshotBridge};
///
/// let mut a = HyperLogLog::new(10).unwrap();
/// a.add("user1");
/// let mut b = HyperLogLog::new(10).unwrap();
/// b.add("user2");
///
/// let snapshots = [
///     SnapshotBridge::to_json(&a).unwrap(),
///     SnapshotBridge::to_json(&b).unwrap(),
/// ];
/// let merged = SnapshotBridge::merge_json_values(SketchKind::HyperLogLog, &snapshots).unwrap();
/// let merged: HyperLogLog = SnapshotBridge::from_json(merged).unwrap();
/// assert!((1..=2).contains(&merged.cardinality()));
/// ```
pub struct SnapshotBridge;

impl SnapshotBridge {
    /// Serializes a sketch to a JSON value.
    pub fn to_json<S: Serialize>(sketch: &S) -> Result<Value, SketchError> {
        serialization::to_json(sketch)
    }

    /// Deserializes a sketch from a JSON value and validates it.
    pub fn from_json<S: Sketch + DeserializeOwned>(value: Value) -> Result<S, SketchError> {
        serialization::from_json(value)
    }

    /// Validates a JSON value against a specific sketch's internal rules.
    pub fn validate_json(kind: SketchKind, value: Value) -> Result<(), SketchError> {
        serialization::validate_json(kind, value)
    }

    /// Merges multiple JSON snapshots of the same sketch kind into one.
    pub fn merge_json_values(kind: SketchKind, values: &[Value]) -> Result<Value, SketchError> {
        merging::merge_json_values(kind, values)
    }
}
