//! Resize policy: capacity floor and load-factor bounds.
//!
//! A `BucketHashMap` checks its policy after every insert or erase that
//! changed its size. The policy answers with at most one doubling or
//! halving step; the map keeps asking until the answer is `None`, so a
//! bulk load converges through the same single steps as incremental
//! growth would.

use crate::error::{Error, Result};

/// Capacity a fresh map starts with, and the floor it never shrinks below.
pub const START_CAPACITY: usize = 16;
/// Shrink when `len / capacity` drops under this bound.
pub const LOWER_LOAD_FACTOR: f64 = 0.25;
/// Grow when `len / capacity` exceeds this bound.
pub const UPPER_LOAD_FACTOR: f64 = 0.75;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ResizePolicy {
    min_capacity: usize,
    lower: f64,
    upper: f64,
}

impl ResizePolicy {
    /// Validate and build a policy.
    ///
    /// `lower * 2 <= upper` is required: a single doubling halves the load
    /// factor, so a looser pair could bounce between growing and shrinking.
    pub fn new(min_capacity: usize, lower: f64, upper: f64) -> Result<Self> {
        if !min_capacity.is_power_of_two() {
            return Err(Error::InvalidPolicy {
                reason: "minimum capacity must be a non-zero power of two",
            });
        }
        if !upper.is_finite() || upper <= 0.0 {
            return Err(Error::InvalidPolicy {
                reason: "upper load factor must be finite and positive",
            });
        }
        if lower.is_nan() || lower < 0.0 {
            return Err(Error::InvalidPolicy {
                reason: "lower load factor must be non-negative",
            });
        }
        if lower * 2.0 > upper {
            return Err(Error::InvalidPolicy {
                reason: "lower load factor must be at most half the upper load factor",
            });
        }
        Ok(Self {
            min_capacity,
            lower,
            upper,
        })
    }

    pub const fn min_capacity(&self) -> usize {
        self.min_capacity
    }
    pub const fn lower(&self) -> f64 {
        self.lower
    }
    pub const fn upper(&self) -> f64 {
        self.upper
    }

    /// The next capacity for a map holding `len` entries in `capacity`
    /// buckets, or `None` when the load factor is within bounds.
    ///
    /// Returns a single step (double or half), never the final size.
    pub fn next_capacity(&self, len: usize, capacity: usize) -> Option<usize> {
        let load = len as f64 / capacity as f64;
        if load > self.upper {
            capacity.checked_mul(2)
        } else if load < self.lower && capacity > self.min_capacity {
            Some((capacity / 2).max(self.min_capacity))
        } else {
            None
        }
    }
}

impl Default for ResizePolicy {
    fn default() -> Self {
        Self {
            min_capacity: START_CAPACITY,
            lower: LOWER_LOAD_FACTOR,
            upper: UPPER_LOAD_FACTOR,
        }
    }
}
