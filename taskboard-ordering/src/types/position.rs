//! Position keys for task ordering using fractional indexing.
//!
//! A position is an `f64` whose only meaning is its order relative to the
//! other positions in the same lane. New keys are placed at a fixed spacing
//! past either end of the lane, or at the midpoint between two neighbors.
//! When a midpoint can no longer be told apart from its neighbors the
//! allocator reports [`Allocation::NeedsRebalance`] instead of handing out a
//! duplicate or out-of-order key.

use crate::error::{BoardError, Result};
use taskboard_config::{OrderingConfig, DEFAULT_BASE, DEFAULT_MIN_GAP, DEFAULT_SPACING};

/// Outcome of a key allocation
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Allocation {
    /// A key strictly between the neighbors
    Key(f64),
    /// The gap is exhausted; the lane must be renumbered first
    NeedsRebalance,
}

impl Allocation {
    /// The key, if one was allocated
    pub fn key(self) -> Option<f64> {
        match self {
            Allocation::Key(k) => Some(k),
            Allocation::NeedsRebalance => None,
        }
    }
}

/// Pure key allocator parameterized by the board's ordering constants
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionAllocator {
    base: f64,
    spacing: f64,
    min_gap: f64,
}

impl PositionAllocator {
    /// Create an allocator. Constants are taken as-is; validated
    /// configuration should come through [`PositionAllocator::from_config`].
    pub const fn new(base: f64, spacing: f64, min_gap: f64) -> Self {
        Self {
            base,
            spacing,
            min_gap,
        }
    }

    /// Create an allocator from loaded configuration
    pub fn from_config(config: &OrderingConfig) -> Self {
        Self::new(config.base, config.spacing, config.min_gap)
    }

    /// Key for the first task of an empty lane; also the renumbering step
    pub fn base(&self) -> f64 {
        self.base
    }

    pub fn spacing(&self) -> f64 {
        self.spacing
    }

    pub fn min_gap(&self) -> f64 {
        self.min_gap
    }

    /// Compute a key strictly between `left` and `right`.
    ///
    /// Either neighbor may be absent (lane head, lane tail, empty lane).
    /// `left >= right` or a non-finite neighbor is a caller bug and is
    /// rejected with [`BoardError::InvalidNeighbors`].
    pub fn allocate(&self, left: Option<f64>, right: Option<f64>) -> Result<Allocation> {
        for key in [left, right].into_iter().flatten() {
            if !key.is_finite() {
                return Err(BoardError::InvalidNeighbors {
                    left: left.unwrap_or(f64::NEG_INFINITY),
                    right: right.unwrap_or(f64::INFINITY),
                });
            }
        }

        let allocation = match (left, right) {
            (None, None) => Allocation::Key(self.base),
            (None, Some(r)) => Self::checked(r - self.spacing, |k| k < r),
            (Some(l), None) => Self::checked(l + self.spacing, |k| k > l),
            (Some(l), Some(r)) => {
                if l >= r {
                    return Err(BoardError::InvalidNeighbors { left: l, right: r });
                }
                if r - l < self.min_gap {
                    Allocation::NeedsRebalance
                } else {
                    // l/2 + r/2 cannot overflow where (l + r)/2 can
                    Self::checked(l / 2.0 + r / 2.0, |k| l < k && k < r)
                }
            }
        };

        tracing::trace!(?left, ?right, ?allocation, "allocated position");
        Ok(allocation)
    }

    /// Key for the `i`-th task of a renumbered lane: `0, B, 2B, ...`
    pub fn renumbered(&self, index: usize) -> f64 {
        index as f64 * self.base
    }

    fn checked(key: f64, in_bounds: impl Fn(f64) -> bool) -> Allocation {
        if key.is_finite() && in_bounds(key) {
            Allocation::Key(key)
        } else {
            Allocation::NeedsRebalance
        }
    }
}

impl Default for PositionAllocator {
    fn default() -> Self {
        Self::new(DEFAULT_BASE, DEFAULT_SPACING, DEFAULT_MIN_GAP)
    }
}
