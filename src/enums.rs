// Copyright (c) 2026 Adrian Robinson. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.

use crate::traits::SketchError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Enumeration of sketch types that can be exchanged as JSON snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SketchKind {
    BloomFilter,
    CountingBloomFilter,
    CountMinSketch,
    HyperLogLog,
}

impl fmt::Display for SketchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SketchKind::BloomFilter => write!(f, "BloomFilter"),
            SketchKind::CountingBloomFilter => write!(f, "CountingBloomFilter"),
            SketchKind::CountMinSketch => write!(f, "CountMinSketch"),
            SketchKind::HyperLogLog => write!(f, "HyperLogLog"),
        }
    }
}

impl FromStr for SketchKind {
    type Err = SketchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.replace(['_', '-'], "").to_lowercase().as_str() {
            "bloomfilter" | "bloom" => Ok(SketchKind::BloomFilter),
            "countingbloomfilter" | "countingbloom" => Ok(SketchKind::CountingBloomFilter),
            "countminsketch" | "countmin" => Ok(SketchKind::CountMinSketch),
            "hyperloglog" | "hll" => Ok(SketchKind::HyperLogLog),
            _ => Err(SketchError::InvalidInput(format!("Unknown sketch type: {}", s))),
        }
    }
}
