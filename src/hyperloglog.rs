// Copyright (c) 2026 Adrian Robinson. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.

use crate::hash::{HashFamily, HashKey, SipHashFamily};
use crate::traits::{Mergeable, Sketch, SketchError};
use serde::{Deserialize, Serialize};

/// Default precision (number of bits for register index)
pub const DEFAULT_PRECISION: u8 = 14;

/// Smallest supported precision
pub const MIN_PRECISION: u8 = 4;

/// Largest supported precision
pub const MAX_PRECISION: u8 = 18;

/// Width in bits of the hash feeding the registers
const HASH_BITS: u32 = 128;

/// HyperLogLog - Cardinality Estimation
///
/// A probabilistic data structure for estimating the number of unique elements (cardinality)
/// in a set. It uses significantly less memory than storing the elements themselves.
///
/// # Key Properties
///
/// - **Fixed Memory**: `2^p` one-byte registers regardless of the number of elements.
/// - **Accuracy**: Standard error is approximately `1.04 / sqrt(2^p)`, about 0.81% at the default precision (p=14).
/// - **Mergeable**: Can be merged by taking the element-wise maximum of the registers.
/// - **Idempotent**: Adding the same element multiple times does not change the estimate.
///
/// Large-range correction for hash saturation is not applied: with a 128-bit hash
/// it only matters for cardinalities far beyond anything countable in memory.
///
/// # Example
///
/// ```
/// use probabilistic_sets::HyperLogLog;
///
/// let mut hll = HyperLogLog::default();
/// hll.add("user1");
/// hll.add("user2");
/// hll.add("user3");
/// hll.add("user1"); // Duplicate
///
/// let count = hll.cardinality();
/// assert!(count >= 2 && count <= 4); // Approximate count
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HyperLogLog<H = SipHashFamily> {
    precision: u8,
    /// `2^precision` registers (each stores max leading zeros + 1)
    registers: Vec<u8>,
    hasher: H,
}

impl Default for HyperLogLog<SipHashFamily> {
    fn default() -> Self {
        Self::build(DEFAULT_PRECISION, SipHashFamily::default())
    }
}

impl HyperLogLog<SipHashFamily> {
    /// Create a new empty HyperLogLog with `2^precision_bits` registers
    pub fn new(precision_bits: u8) -> Result<Self, SketchError> {
        Self::with_hasher(precision_bits, SipHashFamily::default())
    }
}

impl<H: HashFamily> HyperLogLog<H> {
    pub fn with_hasher(precision_bits: u8, hasher: H) -> Result<Self, SketchError> {
        if !(MIN_PRECISION..=MAX_PRECISION).contains(&precision_bits) {
            return Err(SketchError::InvalidConfig(format!(
                "precision_bits must be in {}..={}, got {}",
                MIN_PRECISION, MAX_PRECISION, precision_bits
            )));
        }
        Ok(Self::build(precision_bits, hasher))
    }

    /// Caller guarantees `precision_bits` is in range.
    fn build(precision_bits: u8, hasher: H) -> Self {
        tracing::debug!(precision_bits, registers = 1usize << precision_bits, "created hyperloglog");
        Self {
            precision: precision_bits,
            registers: vec![0u8; 1 << precision_bits],
            hasher,
        }
    }

    /// Add an element to the HyperLogLog
    ///
    /// Returns `true` if the internal state changed.
    pub fn add<T: HashKey + ?Sized>(&mut self, element: &T) -> bool {
        let hash = self.hasher.hash_wide(&element.key_bytes(), 0);
        let p = self.precision as u32;

        // Top `p` bits pick the register
        let register_idx = (hash >> (HASH_BITS - p)) as usize;

        // Leading zeros + 1 of the remaining bits (HLL convention)
        let remaining_bits = hash << p;
        let rank = (if remaining_bits == 0 {
            HASH_BITS - p + 1
        } else {
            remaining_bits.leading_zeros() + 1
        }) as u8;

        let old_value = self.registers[register_idx];
        if rank > old_value {
            self.registers[register_idx] = rank;
            true
        } else {
            false
        }
    }

    /// Estimate the cardinality (number of unique elements)
    pub fn estimate(&self) -> f64 {
        let m = self.registers.len() as f64;
        let mut sum = 0.0;
        let mut zeros = 0usize;

        for &val in &self.registers {
            if val == 0 {
                zeros += 1;
            }
            sum += 2f64.powi(-(val as i32));
        }

        if zeros == self.registers.len() {
            return 0.0;
        }

        let alpha = 0.7213 / (1.0 + 1.079 / m);
        let raw = alpha * m * m / sum;

        // Small range correction (LinearCounting)
        if raw <= 2.5 * m && zeros > 0 {
            return m * (m / zeros as f64).ln();
        }
        raw
    }

    /// The estimate rounded to the nearest integer
    pub fn cardinality(&self) -> u64 {
        self.estimate().round() as u64
    }

    pub fn precision(&self) -> u8 {
        self.precision
    }

    pub fn registers(&self) -> &[u8] {
        &self.registers
    }

    /// Largest value a register can legally hold
    fn max_rank(&self) -> u8 {
        (HASH_BITS - self.precision as u32 + 1) as u8
    }
}

impl<H: HashFamily> Sketch for HyperLogLog<H> {
    fn validate(&self) -> Result<(), SketchError> {
        if !(MIN_PRECISION..=MAX_PRECISION).contains(&self.precision) {
            return Err(SketchError::Validation(format!(
                "Invalid precision: {}",
                self.precision
            )));
        }
        let expected = 1usize << self.precision;
        if self.registers.len() != expected {
            return Err(SketchError::Validation(format!(
                "Invalid register count: expected {}, got {}",
                expected,
                self.registers.len()
            )));
        }
        let max_rank = self.max_rank();
        if let Some(bad) = self.registers.iter().find(|&&r| r > max_rank) {
            return Err(SketchError::Validation(format!(
                "Register value {} exceeds maximum {}",
                bad, max_rank
            )));
        }
        Ok(())
    }

    fn is_empty(&self) -> bool {
        self.registers.iter().all(|&x| x == 0)
    }

    fn clear(&mut self) {
        self.registers.iter_mut().for_each(|r| *r = 0);
    }
}

impl<H: HashFamily + PartialEq> Mergeable for HyperLogLog<H> {
    fn merge(&mut self, other: &Self) -> Result<(), SketchError> {
        if self.precision != other.precision {
            return Err(SketchError::DimensionMismatch(format!(
                "HyperLogLog precision {} vs {}",
                self.precision, other.precision
            )));
        }
        if self.hasher != other.hasher {
            return Err(SketchError::DimensionMismatch(
                "HyperLogLog hash families differ".into(),
            ));
        }
        for (mine, &theirs) in self.registers.iter_mut().zip(&other.registers) {
            if theirs > *mine {
                *mine = theirs;
            }
        }
        Ok(())
    }
}
