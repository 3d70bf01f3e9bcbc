// Copyright (c) 2026 Adrian Robinson. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.

use crate::hash::{HashFamily, HashKey, SipHashFamily};
use crate::traits::{Mergeable, Sketch, SketchError};
use serde::{Deserialize, Serialize};

/// Count-Min Sketch - Frequency Estimation
///
/// A probabilistic data structure for estimating the frequency of events in a stream of data.
/// It uses a matrix of counters and one salted hash per row to map events to counters.
///
/// # Key Properties
///
/// - **Fixed Memory**: Uses a fixed size matrix (`width` × `depth` × 8 bytes), regardless of the number of unique items.
/// - **Conservative**: Frequencies are never underestimated, but may be overestimated due to collisions.
/// - **Mergeable**: Sketches with equal `width`, `depth` and `seed` merge by summing the corresponding counters.
///
/// # Algebraic Properties
///
/// - **Commutativity**: Yes (Matrix addition is commutative).
/// - **Associativity**: Yes (Matrix addition is associative).
/// - **Idempotence**: **NO**. Merging the same sketch twice doubles the counts.
///
/// # Example
///
/// ```
/// use probabilistic_sets::CountMinSketch;
///
/// let mut cms = CountMinSketch::new(100, 5, 0).unwrap();
/// cms.add("apple", 1);
/// cms.add("apple", 1);
/// cms.add("banana", 1);
///
/// assert!(cms.estimate("apple") >= 2);
/// assert!(cms.estimate("banana") >= 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountMinSketch<H = SipHashFamily> {
    /// Number of counters per row
    width: usize,
    /// Number of hash functions (rows)
    depth: usize,
    /// Row `i` hashes with salt `seed + i`
    seed: u64,
    /// The matrix of counters, row-major
    table: Vec<Vec<u64>>,
    hasher: H,
}

impl CountMinSketch<SipHashFamily> {
    pub fn new(width: usize, depth: usize, seed: u64) -> Result<Self, SketchError> {
        Self::with_hasher(width, depth, seed, SipHashFamily::default())
    }

    /// Sizes the sketch so that, with probability at least `1 - delta`, an
    /// estimate exceeds the true count by at most `epsilon` times the total
    /// count of the stream.
    pub fn with_error_bounds(epsilon: f64, delta: f64, seed: u64) -> Result<Self, SketchError> {
        if !(epsilon > 0.0 && epsilon < 1.0) {
            return Err(SketchError::InvalidConfig(format!(
                "epsilon must be in (0, 1), got {}",
                epsilon
            )));
        }
        if !(delta > 0.0 && delta < 1.0) {
            return Err(SketchError::InvalidConfig(format!(
                "delta must be in (0, 1), got {}",
                delta
            )));
        }
        let width = (std::f64::consts::E / epsilon).ceil() as usize;
        let depth = ((1.0 / delta).ln().ceil() as usize).max(1);
        Self::new(width, depth, seed)
    }
}

impl<H: HashFamily> CountMinSketch<H> {
    pub fn with_hasher(width: usize, depth: usize, seed: u64, hasher: H) -> Result<Self, SketchError> {
        if width == 0 {
            return Err(SketchError::InvalidConfig("width must be positive".into()));
        }
        if depth == 0 {
            return Err(SketchError::InvalidConfig("depth must be positive".into()));
        }
        tracing::debug!(width, depth, seed, "created count-min sketch");
        Ok(Self {
            width,
            depth,
            seed,
            table: vec![vec![0; width]; depth],
            hasher,
        })
    }

    fn column(&self, key: &[u8], row: usize) -> usize {
        let salt = self.seed.wrapping_add(row as u64);
        (self.hasher.hash(key, salt) % self.width as u64) as usize
    }

    /// Records `count` more occurrences of `item`.
    pub fn add<T: HashKey + ?Sized>(&mut self, item: &T, count: u64) {
        let key = item.key_bytes();
        for row in 0..self.depth {
            let col = self.column(&key, row);
            self.table[row][col] = self.table[row][col].saturating_add(count);
        }
    }

    /// Records one occurrence of `item`.
    pub fn increment<T: HashKey + ?Sized>(&mut self, item: &T) {
        self.add(item, 1);
    }

    /// Estimated number of occurrences of `item`; never below the true count.
    pub fn estimate<T: HashKey + ?Sized>(&self, item: &T) -> u64 {
        let key = item.key_bytes();
        let estimate = (0..self.depth)
            .map(|row| self.table[row][self.column(&key, row)])
            .min()
            .unwrap_or(0);
        estimate
    }

    /// Total of all counts added. Every row sums to the same value.
    pub fn total_count(&self) -> u64 {
        self.table
            .first()
            .map(|row| row.iter().fold(0u64, |acc, &c| acc.saturating_add(c)))
            .unwrap_or(0)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl<H: HashFamily> Sketch for CountMinSketch<H> {
    fn validate(&self) -> Result<(), SketchError> {
        if self.width == 0 || self.depth == 0 {
            return Err(SketchError::Validation("width and depth must be positive".into()));
        }
        if self.table.len() != self.depth {
            return Err(SketchError::Validation("Matrix depth mismatch".into()));
        }
        for row in &self.table {
            if row.len() != self.width {
                return Err(SketchError::Validation("Matrix width mismatch".into()));
            }
        }
        Ok(())
    }

    fn is_empty(&self) -> bool {
        self.table.iter().all(|row| row.iter().all(|&x| x == 0))
    }

    fn clear(&mut self) {
        for row in &mut self.table {
            row.iter_mut().for_each(|c| *c = 0);
        }
    }
}

impl<H: HashFamily + PartialEq> Mergeable for CountMinSketch<H> {
    fn merge(&mut self, other: &Self) -> Result<(), SketchError> {
        if self.width != other.width || self.depth != other.depth || self.seed != other.seed {
            return Err(SketchError::DimensionMismatch(format!(
                "CountMinSketch (w={}, d={}, seed={}) vs (w={}, d={}, seed={})",
                self.width, self.depth, self.seed, other.width, other.depth, other.seed
            )));
        }
        if self.hasher != other.hasher {
            return Err(SketchError::DimensionMismatch(
                "CountMinSketch hash families differ".into(),
            ));
        }
        for (row, other_row) in self.table.iter_mut().zip(&other.table) {
            for (c, &o) in row.iter_mut().zip(other_row) {
                *c = c.saturating_add(o);
            }
        }
        Ok(())
    }
}
