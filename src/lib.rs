//! # probabilistic-sets
//!
//! Approximate membership and cardinality estimation with bounded memory.
//!
//! | Structure | Answers | Deletes |
//! |-----------|---------|---------|
//! | [`BloomFilter`] | "maybe present" / "definitely absent" | no |
//! | [`CountingBloomFilter`] | same, plus a multiplicity bound | yes, fails if absent |
//! | [`CuckooFilter`] | same | yes, `false` if absent |
//! | [`CountMinSketch`] | frequency upper bound | no |
//! | [`HyperLogLog`] | distinct count estimate | no |
//!
//! Every structure derives its slot indices from one [`HashFamily`], salted
//! per hash function, and is a plain single-owner value: wrap it in a lock to
//! share mutation across threads.

pub mod bloom_filter;
pub mod bridge;
pub mod count_min_sketch;
pub mod counting_bloom_filter;
pub mod cuckoo_filter;
pub mod enums;
pub mod hash;
pub mod hyperloglog;
pub mod traits;

// Re-export core traits
pub use traits::{Mergeable, Sketch, SketchError};

pub use bloom_filter::{optimal_num_bits, optimal_num_hashes, BloomFilter};
pub use bridge::SnapshotBridge;
pub use count_min_sketch::CountMinSketch;
pub use counting_bloom_filter::CountingBloomFilter;
pub use cuckoo_filter::{CuckooFilter, Fingerprint, DEFAULT_MAX_RELOCATIONS};
pub use enums::SketchKind;
pub use hash::{HashFamily, HashKey, SipHashFamily};
pub use hyperloglog::{HyperLogLog, DEFAULT_PRECISION};
