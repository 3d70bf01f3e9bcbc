// Copyright (c) 2026 Adrian Robinson. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.

//! # Cuckoo Filter
//!
//! Approximate set membership with true deletion.
//!
//! Every item is reduced to a short fingerprint that may live in one of two
//! buckets. The second bucket is derived from the first and the fingerprint
//! alone (`index2 = index1 XOR hash(fingerprint)`), so a stored fingerprint
//! can be moved to its alternate bucket without knowing the original item.
//!
//! An insertion first tries both candidate buckets. If both are full it
//! relocates ("kicks") resident fingerprints to their alternate buckets, up to
//! `max_relocations` times, before giving up.

use crate::hash::{HashFamily, HashKey, SipHashFamily};
use crate::traits::{Sketch, SketchError};
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

/// Number of kicks attempted by [`CuckooFilter::new`] before an insertion fails.
pub const DEFAULT_MAX_RELOCATIONS: usize = 500;

/// Longest supported fingerprint, in hex digits (64 bits).
pub const MAX_FINGERPRINT_LENGTH: usize = 16;

/// Salt used when hashing a fingerprint to find its alternate bucket.
const FINGERPRINT_SALT: u64 = 0x0063_7563_6b6f_6f21;

/// Fingerprint stored in a bucket slot.
pub type Fingerprint = u64;

/// Cuckoo filter for probabilistic membership testing with deletion.
///
/// # Key Properties
///
/// - **No False Negatives**: An item that was inserted successfully and not
///   deleted is always found.
/// - **True Deletion**: [`delete`](Self::delete) removes one copy of the item's
///   fingerprint. Deleting an absent item returns `false` and changes nothing.
/// - **Bounded Work**: An insertion performs at most `max_relocations` kicks.
///   When they run out, `insert` returns `false` and the filter holds exactly
///   the fingerprints it held before the call.
///
/// The requested `size` is rounded up to a power of two buckets so that the
/// XOR relation between a fingerprint's two buckets is its own inverse.
///
/// # Example
///
/// ```
/// use probabilistic_sets::CuckooFilter;
///
/// let mut cf = CuckooFilter::new(11, 2, 4).unwrap();
/// for word in ["dog", "cat", "fish", "horse"] {
///     assert!(cf.insert(word));
/// }
///
/// assert!(cf.lookup("cat"));
/// assert!(cf.delete("dog"));
/// assert!(!cf.lookup("dog"));
/// ```
#[derive(Debug, Clone)]
pub struct CuckooFilter<H = SipHashFamily, R = StdRng> {
    buckets: Vec<Vec<Fingerprint>>,
    bucket_capacity: usize,
    fingerprint_length: usize,
    max_relocations: usize,
    count: usize,
    hasher: H,
    rng: R,
}

impl CuckooFilter<SipHashFamily, StdRng> {
    /// Creates a filter with at least `size` buckets. The bucket count is
    /// `size` rounded up to a power of two; see [`num_buckets`](Self::num_buckets).
    pub fn new(
        size: usize,
        bucket_capacity: usize,
        fingerprint_length: usize,
    ) -> Result<Self, SketchError> {
        Self::with_max_relocations(size, bucket_capacity, fingerprint_length, DEFAULT_MAX_RELOCATIONS)
    }

    pub fn with_max_relocations(
        size: usize,
        bucket_capacity: usize,
        fingerprint_length: usize,
        max_relocations: usize,
    ) -> Result<Self, SketchError> {
        Self::with_rng(
            size,
            bucket_capacity,
            fingerprint_length,
            max_relocations,
            StdRng::from_os_rng(),
        )
    }
}

impl<R: RngCore> CuckooFilter<SipHashFamily, R> {
    /// Uses `rng` for choosing relocation buckets and victims. Pass a seeded
    /// generator for reproducible relocation chains.
    pub fn with_rng(
        size: usize,
        bucket_capacity: usize,
        fingerprint_length: usize,
        max_relocations: usize,
        rng: R,
    ) -> Result<Self, SketchError> {
        Self::with_hasher_and_rng(
            size,
            bucket_capacity,
            fingerprint_length,
            max_relocations,
            SipHashFamily::default(),
            rng,
        )
    }
}

impl<H: HashFamily, R: RngCore> CuckooFilter<H, R> {
    /// Fully configured constructor. Allocates `size.next_power_of_two()`
    /// buckets.
    pub fn with_hasher_and_rng(
        size: usize,
        bucket_capacity: usize,
        fingerprint_length: usize,
        max_relocations: usize,
        hasher: H,
        rng: R,
    ) -> Result<Self, SketchError> {
        if size == 0 {
            return Err(SketchError::InvalidConfig("size must be positive".into()));
        }
        if bucket_capacity == 0 {
            return Err(SketchError::InvalidConfig("bucket_capacity must be positive".into()));
        }
        if !(1..=MAX_FINGERPRINT_LENGTH).contains(&fingerprint_length) {
            return Err(SketchError::InvalidConfig(format!(
                "fingerprint_length must be in 1..={}, got {}",
                MAX_FINGERPRINT_LENGTH, fingerprint_length
            )));
        }
        if max_relocations == 0 {
            return Err(SketchError::InvalidConfig("max_relocations must be positive".into()));
        }
        let num_buckets = size.checked_next_power_of_two().ok_or_else(|| {
            SketchError::InvalidConfig(format!("size {} is too large", size))
        })?;
        tracing::debug!(
            size,
            num_buckets,
            bucket_capacity,
            fingerprint_length,
            max_relocations,
            "created cuckoo filter"
        );
        Ok(Self {
            buckets: vec![Vec::new(); num_buckets],
            bucket_capacity,
            fingerprint_length,
            max_relocations,
            count: 0,
            hasher,
            rng,
        })
    }

    /// Inserts an item.
    ///
    /// Returns `true` if inserted, `false` if no room was found within
    /// `max_relocations` kicks. A `false` return is an expected outcome for a
    /// full table, not an error; the caller may grow the table or reject the
    /// item.
    pub fn insert<T: HashKey + ?Sized>(&mut self, item: &T) -> bool {
        let (fp, i1, i2) = self.indices(item);

        for idx in [i1, i2] {
            if self.has_room(idx) {
                self.buckets[idx].push(fp);
                self.count += 1;
                return true;
            }
        }

        let start = if self.rng.random_bool(0.5) { i1 } else { i2 };
        self.relocate(fp, start)
    }

    /// Kicks fingerprints out of full buckets until one lands in a bucket
    /// with room. On failure the chain is unwound so no resident fingerprint
    /// is lost.
    fn relocate(&mut self, fp: Fingerprint, start: usize) -> bool {
        let mut idx = start;
        let mut carried = fp;
        let mut path: Vec<(usize, usize)> = Vec::new();

        for kick in 0..self.max_relocations {
            let slot = self.rng.random_range(0..self.buckets[idx].len());
            carried = std::mem::replace(&mut self.buckets[idx][slot], carried);
            path.push((idx, slot));
            idx = self.alt_index(idx, carried);
            tracing::trace!(kick, bucket = idx, fingerprint = carried, "relocating fingerprint");

            if self.has_room(idx) {
                self.buckets[idx].push(carried);
                self.count += 1;
                tracing::debug!(kicks = kick + 1, "inserted after relocation");
                return true;
            }
        }

        for (bucket, slot) in path.into_iter().rev() {
            carried = std::mem::replace(&mut self.buckets[bucket][slot], carried);
        }
        debug_assert_eq!(carried, fp);
        tracing::debug!(
            max_relocations = self.max_relocations,
            load_factor = self.load_factor(),
            "cuckoo filter full, insertion failed"
        );
        false
    }

    /// Check if item might be in the filter.
    pub fn lookup<T: HashKey + ?Sized>(&self, item: &T) -> bool {
        let (fp, i1, i2) = self.indices(item);
        self.buckets[i1].contains(&fp) || self.buckets[i2].contains(&fp)
    }

    /// Delete one copy of an item from the filter.
    ///
    /// Returns `true` if deleted, `false` if not found.
    pub fn delete<T: HashKey + ?Sized>(&mut self, item: &T) -> bool {
        let (fp, i1, i2) = self.indices(item);

        for idx in [i1, i2] {
            if let Some(pos) = self.buckets[idx].iter().position(|&e| e == fp) {
                self.buckets[idx].swap_remove(pos);
                self.count -= 1;
                return true;
            }
        }
        false
    }

    /// Number of fingerprints stored.
    pub fn len(&self) -> usize {
        self.count
    }

    /// Total number of slots.
    pub fn capacity(&self) -> usize {
        self.buckets.len() * self.bucket_capacity
    }

    /// Number of buckets actually allocated: the requested size rounded up
    /// to a power of two.
    pub fn num_buckets(&self) -> usize {
        self.buckets.len()
    }

    pub fn bucket_capacity(&self) -> usize {
        self.bucket_capacity
    }

    pub fn fingerprint_length(&self) -> usize {
        self.fingerprint_length
    }

    pub fn max_relocations(&self) -> usize {
        self.max_relocations
    }

    /// Fraction of slots in use.
    pub fn load_factor(&self) -> f64 {
        self.count as f64 / self.capacity() as f64
    }

    /// Fingerprints currently stored in bucket `idx`.
    pub fn bucket(&self, idx: usize) -> Option<&[Fingerprint]> {
        self.buckets.get(idx).map(Vec::as_slice)
    }

    /// Fingerprint and candidate buckets of `item`.
    pub fn indices<T: HashKey + ?Sized>(&self, item: &T) -> (Fingerprint, usize, usize) {
        let hash = self.hasher.hash(&item.key_bytes(), 0);
        let fp = hash >> (64 - 4 * self.fingerprint_length as u32);
        let i1 = (hash as usize) & self.bucket_mask();
        let i2 = self.alt_index(i1, fp);
        (fp, i1, i2)
    }

    /// Partial-key cuckoo hashing: the other bucket `fp` may live in.
    fn alt_index(&self, idx: usize, fp: Fingerprint) -> usize {
        let fp_hash = self.hasher.hash(&fp.to_le_bytes(), FINGERPRINT_SALT);
        (idx ^ fp_hash as usize) & self.bucket_mask()
    }

    fn bucket_mask(&self) -> usize {
        self.buckets.len() - 1
    }

    fn has_room(&self, idx: usize) -> bool {
        self.buckets[idx].len() < self.bucket_capacity
    }
}

impl<H: HashFamily, R: RngCore> Sketch for CuckooFilter<H, R> {
    fn validate(&self) -> Result<(), SketchError> {
        if !self.buckets.len().is_power_of_two() {
            return Err(SketchError::Validation(format!(
                "Bucket count {} is not a power of two",
                self.buckets.len()
            )));
        }
        let fp_bits = 4 * self.fingerprint_length as u32;
        let mut stored = 0;
        for (idx, bucket) in self.buckets.iter().enumerate() {
            if bucket.len() > self.bucket_capacity {
                return Err(SketchError::Validation(format!(
                    "Bucket {} holds {} fingerprints, capacity is {}",
                    idx,
                    bucket.len(),
                    self.bucket_capacity
                )));
            }
            if fp_bits < 64 && bucket.iter().any(|&fp| fp >> fp_bits != 0) {
                return Err(SketchError::Validation(format!(
                    "Bucket {} holds a fingerprint wider than {} bits",
                    idx, fp_bits
                )));
            }
            stored += bucket.len();
        }
        if stored != self.count {
            return Err(SketchError::Validation(format!(
                "Count {} does not match {} stored fingerprints",
                self.count, stored
            )));
        }
        Ok(())
    }

    fn is_empty(&self) -> bool {
        self.count == 0
    }

    fn clear(&mut self) {
        self.buckets.iter_mut().for_each(Vec::clear);
        self.count = 0;
    }
}
