//! Bucketing of continuous values into table indices

use serde::{Deserialize, Serialize};

use crate::{Error, Result, types::Bounds};

/// Map `value` into one of `buckets` ordered intervals.
///
/// `buckets - 2` equal-width interior buckets cover `[lo, hi)`; bucket `0`
/// takes everything below `lo` and bucket `buckets - 1` everything at or
/// above `hi`. A value exactly at `lo` lands in bucket 1.
pub fn digitize(bounds: &Bounds, buckets: usize, value: f64) -> usize {
    debug_assert!(buckets >= 3, "need at least one interior bucket");
    if value < bounds.lo() {
        0
    } else if value >= bounds.hi() {
        buckets - 1
    } else {
        let width = (bounds.hi() - bounds.lo()) / (buckets - 2) as f64;
        let interior = ((value - bounds.lo()) / width) as usize + 1;
        interior.min(buckets - 1)
    }
}

/// One discretised dimension of a continuous state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimension {
    pub bounds: Bounds,
    pub buckets: usize,
}

impl Dimension {
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] when fewer than 3 buckets are requested.
    pub fn new(bounds: Bounds, buckets: usize) -> Result<Self> {
        let dimension = Self { bounds, buckets };
        dimension.validate()?;
        Ok(dimension)
    }

    /// Check a dimension built from its public fields
    pub fn validate(&self) -> Result<()> {
        if self.buckets < 3 {
            return Err(Error::invalid_parameter(
                "buckets",
                format!("{} leaves no interior bucket (need at least 3)", self.buckets),
            ));
        }
        Bounds::new(self.bounds.lo(), self.bounds.hi()).map(|_| ())
    }

    pub fn bucket(&self, value: f64) -> usize {
        digitize(&self.bounds, self.buckets, value)
    }
}

/// Mixed-radix encoding of per-dimension buckets, most significant first
///
/// `((b0 * n1 + b1) * n2 + b2) * n3 + b3` for four dimensions.
pub fn encode(dimensions: &[Dimension], values: &[f64]) -> usize {
    debug_assert_eq!(dimensions.len(), values.len());
    dimensions
        .iter()
        .zip(values)
        .fold(0, |index, (dimension, &value)| {
            index * dimension.buckets + dimension.bucket(value)
        })
}

/// Number of distinct indices [`encode`] can produce
pub fn encoded_size(dimensions: &[Dimension]) -> usize {
    dimensions.iter().map(|dimension| dimension.buckets).product()
}
