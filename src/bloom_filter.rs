// Copyright (c) 2026 Adrian Robinson. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.

use crate::hash::{slot_indices, HashFamily, HashKey, SipHashFamily};
use crate::traits::{Mergeable, Sketch, SketchError};
use bit_vec::BitVec;
use serde::{Deserialize, Serialize};
use std::f64::consts::LN_2;

/// Bloom Filter - Approximate Set Membership
///
/// A bit array of `m` bits probed by `k` salted hashes. Inserting sets the
/// `k` bits of an item; a query answers "present" only if all `k` bits are set.
///
/// # Key Properties
///
/// - **No False Negatives**: An inserted item is always reported present.
/// - **Bounded False Positives**: Sized from `(n, p)` so that after `n`
///   insertions roughly a fraction `p` of absent items are reported present.
/// - **Insert-only**: Bits are never cleared by an insertion, so items cannot
///   be removed. See [`CountingBloomFilter`](crate::CountingBloomFilter).
/// - **Mergeable**: Two filters with equal dimensions merge by bitwise OR.
///
/// # Example
///
/// ```
/// use probabilistic_sets::BloomFilter;
///
/// let mut bloom = BloomFilter::new(100, 0.01).unwrap();
/// bloom.add("apple");
/// bloom.add("banana");
///
/// assert!(bloom.contains("apple"));
/// assert!(bloom.contains("banana"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BloomFilter<H = SipHashFamily> {
    bits: BitVec,
    num_hashes: u32,
    hasher: H,
}

impl BloomFilter<SipHashFamily> {
    /// Creates a filter expecting `expected_items` insertions at a target
    /// false positive rate of `false_positive_rate`.
    pub fn new(expected_items: usize, false_positive_rate: f64) -> Result<Self, SketchError> {
        Self::with_hasher(expected_items, false_positive_rate, SipHashFamily::default())
    }

    /// Creates a filter with exactly `num_bits` bits and `num_hashes` hashes.
    pub fn with_size(num_bits: usize, num_hashes: u32) -> Result<Self, SketchError> {
        Self::with_size_and_hasher(num_bits, num_hashes, SipHashFamily::default())
    }
}

impl<H: HashFamily> BloomFilter<H> {
    pub fn with_hasher(
        expected_items: usize,
        false_positive_rate: f64,
        hasher: H,
    ) -> Result<Self, SketchError> {
        let num_bits = optimal_num_bits(expected_items, false_positive_rate)?;
        let num_hashes = optimal_num_hashes(num_bits, expected_items);
        tracing::debug!(
            expected_items,
            false_positive_rate,
            num_bits,
            num_hashes,
            "sized bloom filter"
        );
        Self::with_size_and_hasher(num_bits, num_hashes, hasher)
    }

    pub fn with_size_and_hasher(
        num_bits: usize,
        num_hashes: u32,
        hasher: H,
    ) -> Result<Self, SketchError> {
        if num_bits == 0 {
            return Err(SketchError::InvalidConfig("num_bits must be positive".into()));
        }
        if num_hashes == 0 {
            return Err(SketchError::InvalidConfig("num_hashes must be positive".into()));
        }
        Ok(Self {
            bits: BitVec::from_elem(num_bits, false),
            num_hashes,
            hasher,
        })
    }

    /// Adds an item. Adding the same item twice has no further effect.
    pub fn add<T: HashKey + ?Sized>(&mut self, item: &T) {
        let key = item.key_bytes();
        let num_bits = self.bits.len();
        for idx in slot_indices(&self.hasher, &key, self.num_hashes, num_bits) {
            self.bits.set(idx, true);
        }
    }

    /// Returns `true` if the item may have been added, `false` if it
    /// definitely has not.
    pub fn contains<T: HashKey + ?Sized>(&self, item: &T) -> bool {
        let key = item.key_bytes();
        let present = slot_indices(&self.hasher, &key, self.num_hashes, self.bits.len())
            .all(|idx| matches!(self.bits.get(idx), Some(true)));
        present
    }

    /// Number of bits (`m`).
    pub fn num_bits(&self) -> usize {
        self.bits.len()
    }

    /// Number of hash functions (`k`).
    pub fn num_hashes(&self) -> u32 {
        self.num_hashes
    }

    /// Number of bits currently set.
    pub fn count_ones(&self) -> usize {
        self.bits.iter().filter(|bit| *bit).count()
    }

    /// Estimates the current false positive rate from the fraction of set
    /// bits: `(ones / m)^k`.
    pub fn estimated_fpr(&self) -> f64 {
        let fill = self.count_ones() as f64 / self.num_bits() as f64;
        fill.powi(self.num_hashes as i32)
    }

    pub fn hasher(&self) -> &H {
        &self.hasher
    }
}

impl<H: HashFamily> Sketch for BloomFilter<H> {
    fn validate(&self) -> Result<(), SketchError> {
        if self.bits.is_empty() {
            return Err(SketchError::Validation("Bit array is empty".into()));
        }
        if self.num_hashes == 0 {
            return Err(SketchError::Validation("num_hashes must be positive".into()));
        }
        let nbits = self.bits.len();
        let storage = self.bits.storage();
        if storage.len() != nbits.div_ceil(32) {
            return Err(SketchError::Validation(format!(
                "Bit storage holds {} blocks, {} bits need {}",
                storage.len(),
                nbits,
                nbits.div_ceil(32)
            )));
        }
        let tail = nbits % 32;
        if tail != 0 && storage.last().is_some_and(|&block| block >> tail != 0) {
            return Err(SketchError::Validation("Bits set beyond num_bits".into()));
        }
        Ok(())
    }

    fn is_empty(&self) -> bool {
        self.bits.none()
    }

    fn clear(&mut self) {
        self.bits = BitVec::from_elem(self.bits.len(), false);
    }
}

impl<H: HashFamily + PartialEq> Mergeable for BloomFilter<H> {
    /// Bitwise union. Both filters must use the same number of bits and
    /// hashes, and the same hash family.
    fn merge(&mut self, other: &Self) -> Result<(), SketchError> {
        if self.bits.len() != other.bits.len() || self.num_hashes != other.num_hashes {
            return Err(SketchError::DimensionMismatch(format!(
                "BloomFilter (m={}, k={}) vs (m={}, k={})",
                self.bits.len(),
                self.num_hashes,
                other.bits.len(),
                other.num_hashes
            )));
        }
        if self.hasher != other.hasher {
            return Err(SketchError::DimensionMismatch(
                "BloomFilter hash families differ".into(),
            ));
        }
        self.bits.or(&other.bits);
        Ok(())
    }
}

/// Returns the number of bits needed to hold `expected_items` at
/// `false_positive_rate`: `ceil(-n·ln(p) / ln(2)²)`.
pub fn optimal_num_bits(expected_items: usize, false_positive_rate: f64) -> Result<usize, SketchError> {
    if expected_items == 0 {
        return Err(SketchError::InvalidConfig("expected_items must be positive".into()));
    }
    if !(false_positive_rate > 0.0 && false_positive_rate < 1.0) {
        return Err(SketchError::InvalidConfig(format!(
            "false_positive_rate must be in (0, 1), got {}",
            false_positive_rate
        )));
    }
    let bits = -(expected_items as f64) * false_positive_rate.ln() / (LN_2 * LN_2);
    Ok((bits.ceil() as usize).max(1))
}

/// Returns the optimal number of hashes for `num_bits` bits holding
/// `expected_items` items: `round((m/n)·ln 2)`, at least 1.
pub fn optimal_num_hashes(num_bits: usize, expected_items: usize) -> u32 {
    let hashes = (num_bits as f64 / expected_items.max(1) as f64 * LN_2).round();
    (hashes as u32).max(1)
}
