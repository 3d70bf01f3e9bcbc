// Copyright (c) 2026 Adrian Robinson. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.

use thiserror::Error;

/// Error type for sketch operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SketchError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Item not present")]
    NotPresent,
    #[error("Dimension mismatch: {0}")]
    DimensionMismatch(String),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Deserialization error: {0}")]
    Deserialization(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Core sketch trait, implemented by every structure in this crate.
pub trait Sketch {
    /// Validates the internal consistency of the sketch state.
    ///
    /// Buffers must match the configured dimensions and every cell must be
    /// within its structure's bounds. Typically called after deserializing a
    /// snapshot.
    fn validate(&self) -> Result<(), SketchError>;

    /// Returns true if nothing has been recorded since construction or the
    /// last [`Sketch::clear`].
    fn is_empty(&self) -> bool;

    /// Resets the sketch to its freshly constructed state, keeping its
    /// configuration.
    fn clear(&mut self);
}

/// Sketches that can absorb the state of another sketch built with the same
/// configuration.
///
/// # Requirements
///
/// - **Commutativity**: merging A into B yields the same answers as B into A.
/// - **Associativity**: merge order across three or more sketches is irrelevant.
///
/// Idempotence holds for Bloom filters and HyperLogLog but not for counter
/// based sketches, where merging twice doubles the counts.
pub trait Mergeable: Sketch {
    fn merge(&mut self, other: &Self) -> Result<(), SketchError>;
}
