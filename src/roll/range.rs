//! Roll ranges and the integer/real numeric kinds.
//!
//! # Working Interval
//!
//! Distributions sample a half-open interval `[lower, upper)`. A caller-visible
//! range is closed, so each numeric kind maps it onto a working interval:
//!
//! | Kind | Caller range | Working interval | Sample → value |
//! |---|---|---|---|
//! | `i64` | `[a, b]` | `[a, b+1)` | `floor` |
//! | `f64` | `[a, b]` | `[a, next_up(b))` | identity |
//!
//! Every integer in `[a, b]` owns a unit-width slice of the working interval,
//! and the real upper bound stays reachable.
//!
//! Integer ranges must fit in `[-2^53, 2^53)` so that every bound of the
//! working interval is an exact `f64`. Rolls and odds over wider ranges fail
//! with [`DistributionError`].

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt::Debug;
use std::ops::{Add, Div, Sub};

use crate::error::DistributionError;
use crate::math;

/// Largest magnitude an integer range bound may have, `2^53`.
pub const MAX_EXACT_INT: i64 = 1 << 53;

mod sealed {
    pub trait Sealed {}
    impl Sealed for i64 {}
    impl Sealed for f64 {}
}

/// Numeric kind a roll can produce. Implemented for `i64` and `f64` only.
pub trait Numeric:
    sealed::Sealed
    + Copy
    + Debug
    + Default
    + PartialEq
    + PartialOrd
    + Add<Output = Self>
    + Sub<Output = Self>
    + Div<Output = Self>
    + Serialize
    + DeserializeOwned
    + Send
    + Sync
    + 'static
{
    /// Kind name used in log output.
    const KIND: &'static str;

    /// Maps a closed caller range onto the half-open working interval.
    fn working_range(range: &Range<Self>) -> Range<f64>;

    /// Rejects ranges whose working interval cannot be represented exactly.
    fn check_range(range: &Range<Self>) -> Result<(), DistributionError>;

    /// Converts a working-interval sample into a roll value.
    fn from_sample(x: f64) -> Self;

    fn to_f64(self) -> f64;

    fn from_i64(v: i64) -> Self;

    /// Integer odds bucket containing this value (`floor`, saturating).
    fn bucket(self) -> i64;

    /// Total order used to sort ticket tables.
    fn total_cmp(&self, other: &Self) -> Ordering;
}

impl Numeric for i64 {
    const KIND: &'static str = "int";

    fn working_range(range: &Range<Self>) -> Range<f64> {
        Range::new(range.lower as f64, range.upper as f64 + 1.0)
    }

    fn check_range(range: &Range<Self>) -> Result<(), DistributionError> {
        if range.lower < -MAX_EXACT_INT || range.upper >= MAX_EXACT_INT {
            return Err(DistributionError::InvalidParameters(format!(
                "integer range [{}, {}] exceeds the exact f64 interval [-2^53, 2^53)",
                range.lower, range.upper
            )));
        }
        Ok(())
    }

    fn from_sample(x: f64) -> Self {
        x.floor() as i64
    }

    fn to_f64(self) -> f64 {
        self as f64
    }

    fn from_i64(v: i64) -> Self {
        v
    }

    fn bucket(self) -> i64 {
        self
    }

    fn total_cmp(&self, other: &Self) -> Ordering {
        self.cmp(other)
    }
}

impl Numeric for f64 {
    const KIND: &'static str = "float";

    fn working_range(range: &Range<Self>) -> Range<f64> {
        Range::new(range.lower, math::next_up(range.upper))
    }

    fn check_range(_: &Range<Self>) -> Result<(), DistributionError> {
        Ok(())
    }

    fn from_sample(x: f64) -> Self {
        x
    }

    fn to_f64(self) -> f64 {
        self
    }

    fn from_i64(v: i64) -> Self {
        v as f64
    }

    fn bucket(self) -> i64 {
        self.floor() as i64
    }

    fn total_cmp(&self, other: &Self) -> Ordering {
        f64::total_cmp(self, other)
    }
}

/// Closed range `[lower, upper]`.
///
/// `lower <= upper` is the caller's responsibility; an inverted range is
/// reported by the distribution that receives it.
///
/// # Examples
/// ```
/// use u_roll::roll::Range;
/// let r = Range::new(2_i64, 12);
/// assert_eq!(r.width(), 10);
/// assert_eq!(r.sum(), 14);
/// assert_eq!(r.midpoint(), 7);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range<T> {
    pub lower: T,
    pub upper: T,
}

/// Integer range.
pub type IntRange = Range<i64>;
/// Real range.
pub type FloatRange = Range<f64>;

impl<T> Range<T> {
    pub const fn new(lower: T, upper: T) -> Self {
        Self { lower, upper }
    }
}

impl<T: Numeric> Range<T> {
    pub fn width(&self) -> T {
        self.upper - self.lower
    }

    pub fn sum(&self) -> T {
        self.lower + self.upper
    }

    /// `(lower + upper) / 2`, integer division for `i64`.
    pub fn midpoint(&self) -> T {
        self.sum() / T::from_i64(2)
    }

    /// Half-open interval the distributions sample from.
    pub fn working(&self) -> Range<f64> {
        T::working_range(self)
    }
}

impl<T: Numeric> Default for Range<T> {
    /// `[1, 100]`.
    fn default() -> Self {
        Self::new(T::from_i64(1), T::from_i64(100))
    }
}

// ============================================================================
// Dice presets
// ============================================================================

pub fn d4() -> IntRange {
    dice(4)
}

pub fn d6() -> IntRange {
    dice(6)
}

pub fn d8() -> IntRange {
    dice(8)
}

pub fn d10() -> IntRange {
    dice(10)
}

pub fn d20() -> IntRange {
    dice(20)
}

pub fn d100() -> IntRange {
    dice(100)
}

/// A die with `x` faces: `[1, x]`.
pub fn dice(x: i64) -> IntRange {
    Range::new(1, x)
}
