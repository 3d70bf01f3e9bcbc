// Copyright (c) 2026 Adrian Robinson. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.

use crate::bloom_filter::{optimal_num_bits, optimal_num_hashes};
use crate::hash::{slot_indices, HashFamily, HashKey, SipHashFamily};
use crate::traits::{Mergeable, Sketch, SketchError};
use serde::{Deserialize, Serialize};

/// Counting Bloom Filter - Approximate Multiset Membership with Deletion
///
/// A Bloom filter whose bits are replaced by `u64` counters. Adding an item
/// increments its `k` counters and removing it decrements them, so items can
/// be deleted.
///
/// # Key Properties
///
/// - **No False Negatives**: An item added and never removed is always
///   reported present.
/// - **Checked Removal**: [`remove`](Self::remove) fails with
///   [`SketchError::NotPresent`] for an item that is not reported present and
///   leaves every counter untouched.
/// - **Shared Slots**: Removing an item decrements counters it may share with
///   colliding items, which can make those items disappear. This is inherent
///   to the structure.
///
/// # Example
///
/// ```
/// use probabilistic_sets::{CountingBloomFilter, SketchError};
///
/// let mut cbf = CountingBloomFilter::new(100, 0.01).unwrap();
/// cbf.add("apple");
/// cbf.add("apple");
///
/// cbf.remove("apple").unwrap();
/// assert!(cbf.contains("apple"));
/// cbf.remove("apple").unwrap();
/// assert!(!cbf.contains("apple"));
/// assert_eq!(cbf.remove("apple"), Err(SketchError::NotPresent));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountingBloomFilter<H = SipHashFamily> {
    counters: Vec<u64>,
    num_hashes: u32,
    hasher: H,
}

impl CountingBloomFilter<SipHashFamily> {
    pub fn new(expected_items: usize, false_positive_rate: f64) -> Result<Self, SketchError> {
        Self::with_hasher(expected_items, false_positive_rate, SipHashFamily::default())
    }
}

impl<H: HashFamily> CountingBloomFilter<H> {
    pub fn with_hasher(
        expected_items: usize,
        false_positive_rate: f64,
        hasher: H,
    ) -> Result<Self, SketchError> {
        let num_counters = optimal_num_bits(expected_items, false_positive_rate)?;
        let num_hashes = optimal_num_hashes(num_counters, expected_items);
        tracing::debug!(
            expected_items,
            false_positive_rate,
            num_counters,
            num_hashes,
            "sized counting bloom filter"
        );
        Ok(Self {
            counters: vec![0; num_counters],
            num_hashes,
            hasher,
        })
    }

    pub fn add<T: HashKey + ?Sized>(&mut self, item: &T) {
        let key = item.key_bytes();
        let num_counters = self.counters.len();
        for idx in slot_indices(&self.hasher, &key, self.num_hashes, num_counters) {
            self.counters[idx] = self.counters[idx].saturating_add(1);
        }
    }

    /// Returns `true` if all of the item's counters are non-zero.
    pub fn contains<T: HashKey + ?Sized>(&self, item: &T) -> bool {
        self.count_estimate(item) > 0
    }

    /// Removes one occurrence of `item`.
    ///
    /// Fails with [`SketchError::NotPresent`] if the item is not currently
    /// reported present; in that case nothing is modified.
    pub fn remove<T: HashKey + ?Sized>(&mut self, item: &T) -> Result<(), SketchError> {
        if !self.contains(item) {
            return Err(SketchError::NotPresent);
        }
        let key = item.key_bytes();
        let num_counters = self.counters.len();
        for idx in slot_indices(&self.hasher, &key, self.num_hashes, num_counters) {
            // Two salts of the same item can land on one counter.
            match self.counters[idx].checked_sub(1) {
                Some(count) => self.counters[idx] = count,
                None => tracing::warn!(idx, "counter already at zero during remove"),
            }
        }
        Ok(())
    }

    /// Upper bound on how many times `item` is currently in the filter: the
    /// minimum of its counters.
    pub fn count_estimate<T: HashKey + ?Sized>(&self, item: &T) -> u64 {
        let key = item.key_bytes();
        let estimate = slot_indices(&self.hasher, &key, self.num_hashes, self.counters.len())
            .map(|idx| self.counters[idx])
            .min()
            .unwrap_or(0);
        estimate
    }

    /// Number of counters (`m`).
    pub fn num_counters(&self) -> usize {
        self.counters.len()
    }

    /// Number of hash functions (`k`).
    pub fn num_hashes(&self) -> u32 {
        self.num_hashes
    }

    pub fn counters(&self) -> &[u64] {
        &self.counters
    }
}

impl<H: HashFamily> Sketch for CountingBloomFilter<H> {
    fn validate(&self) -> Result<(), SketchError> {
        if self.counters.is_empty() {
            return Err(SketchError::Validation("Counter array is empty".into()));
        }
        if self.num_hashes == 0 {
            return Err(SketchError::Validation("num_hashes must be positive".into()));
        }
        Ok(())
    }

    fn is_empty(&self) -> bool {
        self.counters.iter().all(|&c| c == 0)
    }

    fn clear(&mut self) {
        self.counters.iter_mut().for_each(|c| *c = 0);
    }
}

impl<H: HashFamily + PartialEq> Mergeable for CountingBloomFilter<H> {
    /// Counter-wise sum. Not idempotent: merging the same filter twice
    /// counts its items twice.
    fn merge(&mut self, other: &Self) -> Result<(), SketchError> {
        if self.counters.len() != other.counters.len() || self.num_hashes != other.num_hashes {
            return Err(SketchError::DimensionMismatch(format!(
                "CountingBloomFilter (m={}, k={}) vs (m={}, k={})",
                self.counters.len(),
                self.num_hashes,
                other.counters.len(),
                other.num_hashes
            )));
        }
        if self.hasher != other.hasher {
            return Err(SketchError::DimensionMismatch(
                "CountingBloomFilter hash families differ".into(),
            ));
        }
        for (mine, theirs) in self.counters.iter_mut().zip(&other.counters) {
            *mine = mine.saturating_add(*theirs);
        }
        Ok(())
    }
}
