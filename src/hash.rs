// Copyright (c) 2026 Adrian Robinson. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.

//! The hashing primitive shared by every structure in this crate.
//!
//! A [`HashFamily`] maps `(bytes, salt)` to an integer. Structures that need
//! `k` "independent" hash functions call the same family with `k` different
//! salts rather than using `k` different algorithms.

use serde::{Deserialize, Serialize};
use siphasher::sip::SipHasher13;
use siphasher::sip128::{Hasher128, SipHasher13 as SipHasher13Wide};
use std::borrow::Cow;
use std::hash::Hasher;

/// Keys used by [`SipHashFamily::default`]. Fixed so that hashes are stable
/// across process restarts.
pub const DEFAULT_SIP_KEYS: (u64, u64) = (0x0706_0504_0302_0100, 0x0f0e_0d0c_0b0a_0908);

/// Salt mixed into the second half of the default [`HashFamily::hash_wide`].
const WIDE_SALT_OFFSET: u64 = 0x9e37_79b9_7f4a_7c15;

/// A deterministic, salt-parameterised hash-to-integer function.
pub trait HashFamily {
    /// Hashes `item` under `salt`. Must return the same value for the same
    /// inputs on every call and in every process.
    fn hash(&self, item: &[u8], salt: u64) -> u64;

    /// A 128-bit hash of `item` under `salt`, for structures that need more
    /// bits than one `u64` provides.
    fn hash_wide(&self, item: &[u8], salt: u64) -> u128 {
        let high = self.hash(item, salt) as u128;
        let low = self.hash(item, salt ^ WIDE_SALT_OFFSET) as u128;
        (high << 64) | low
    }
}

impl<H: HashFamily + ?Sized> HashFamily for &H {
    fn hash(&self, item: &[u8], salt: u64) -> u64 {
        (**self).hash(item, salt)
    }

    fn hash_wide(&self, item: &[u8], salt: u64) -> u128 {
        (**self).hash_wide(item, salt)
    }
}

/// SipHash-1-3 with fixed keys. The default family for every structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SipHashFamily {
    k0: u64,
    k1: u64,
}

impl Default for SipHashFamily {
    fn default() -> Self {
        Self::with_keys(DEFAULT_SIP_KEYS.0, DEFAULT_SIP_KEYS.1)
    }
}

impl SipHashFamily {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_keys(k0: u64, k1: u64) -> Self {
        Self { k0, k1 }
    }

    pub fn keys(&self) -> (u64, u64) {
        (self.k0, self.k1)
    }
}

impl HashFamily for SipHashFamily {
    fn hash(&self, item: &[u8], salt: u64) -> u64 {
        let mut hasher = SipHasher13::new_with_keys(self.k0, self.k1);
        hasher.write(item);
        hasher.write(&salt.to_le_bytes());
        hasher.finish()
    }

    fn hash_wide(&self, item: &[u8], salt: u64) -> u128 {
        let mut hasher = SipHasher13Wide::new_with_keys(self.k0, self.k1);
        hasher.write(item);
        hasher.write(&salt.to_le_bytes());
        hasher.finish128().as_u128()
    }
}

/// Yields the `num_hashes` slot indices of `item` in a table of `modulus`
/// slots, using salts `0..num_hashes`.
pub(crate) fn slot_indices<'a, H: HashFamily + ?Sized>(
    hasher: &'a H,
    item: &'a [u8],
    num_hashes: u32,
    modulus: usize,
) -> impl Iterator<Item = usize> + 'a {
    (0..num_hashes as u64).map(move |salt| (hasher.hash(item, salt) % modulus as u64) as usize)
}

/// Items that can be fed to a [`HashFamily`].
///
/// Strings hash as their UTF-8 bytes, integers as their little-endian bytes.
pub trait HashKey {
    fn key_bytes(&self) -> Cow<'_, [u8]>;
}

impl<T: HashKey + ?Sized> HashKey for &T {
    fn key_bytes(&self) -> Cow<'_, [u8]> {
        (**self).key_bytes()
    }
}

impl HashKey for str {
    fn key_bytes(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(self.as_bytes())
    }
}

impl HashKey for String {
    fn key_bytes(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(self.as_bytes())
    }
}

impl HashKey for [u8] {
    fn key_bytes(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(self)
    }
}

impl HashKey for Vec<u8> {
    fn key_bytes(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(self.as_slice())
    }
}

impl<const N: usize> HashKey for [u8; N] {
    fn key_bytes(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(self.as_slice())
    }
}

impl HashKey for bool {
    fn key_bytes(&self) -> Cow<'_, [u8]> {
        Cow::Owned(vec![*self as u8])
    }
}

impl HashKey for char {
    fn key_bytes(&self) -> Cow<'_, [u8]> {
        Cow::Owned((*self as u32).to_le_bytes().to_vec())
    }
}

macro_rules! impl_hash_key_for_int {
    ($($t:ty),*) => {
        $(
            impl HashKey for $t {
                fn key_bytes(&self) -> Cow<'_, [u8]> {
                    Cow::Owned(self.to_le_bytes().to_vec())
                }
            }
        )*
    };
}

impl_hash_key_for_int!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize);
