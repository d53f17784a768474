//! Game distributions over a working interval.
//!
//! Each adapter maps a `weight ∈ [0, 1]` knob onto the shape of a base
//! distribution on `[0, 1]`, then scales draws onto the working interval
//! `[lower, upper)` and normalizes CDF queries back.
//!
//! | [`Dist`] | Base | Weight effect |
//! |---|---|---|
//! | `Uniform` | uniform | ignored |
//! | `Normal` | TruncatedNormal(0.5, 0.25·(1−0.8w), 0, 1) | tighter bell |
//! | `Skewed` | Beta(1−0.8w, 1−0.8w) | stronger U-shape |
//! | `WeightedLow` | Beta(1, 1+4w) | pulls toward lower |
//! | `WeightedHigh` | Beta(1+4w, 1) | pulls toward upper |
//! | `WeightedMin` | w·δ(lower) + (1−w)·Beta(1, 2) | point mass at lower |
//! | `WeightedMax` | w·δ(upper) + (1−w)·Beta(2, 1) | point mass at upper |
//!
//! All adapters report CDF 0 at or below `lower` and 1 at or above `upper`.

use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::range::Range;
use crate::distributions::{Beta, TruncatedNormal, Uniform};
use crate::error::{DistributionError, RollError};
use crate::math;

/// Working interval and shape weight handed to a [`Distribution`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistParams {
    pub range: Range<f64>,
    pub weight: f64,
}

impl DistParams {
    pub fn new(range: Range<f64>, weight: f64) -> Self {
        Self { range, weight }
    }

    pub fn lower(&self) -> f64 {
        self.range.lower
    }

    pub fn upper(&self) -> f64 {
        self.range.upper
    }

    fn normalize(&self, x: f64) -> f64 {
        math::normalize(x, self.range.lower, self.range.upper)
    }

    fn scale(&self, y: f64) -> f64 {
        math::scale(y, self.range.lower, self.range.upper)
    }

    /// CDF value at or beyond the interval edges.
    fn edge_cdf(&self, x: f64) -> Option<f64> {
        if x <= self.range.lower {
            Some(0.0)
        } else if x >= self.range.upper {
            Some(1.0)
        } else {
            None
        }
    }
}

/// A distribution over the working interval `[lower, upper)`.
///
/// `cdf` never receives a random stream, so odds computation cannot consume
/// randomness.
pub trait Distribution: fmt::Debug + Send + Sync {
    /// Draws a value in `[lower, upper)` (before boundary clamping).
    fn sample(&self, params: &DistParams, rng: &mut dyn RngCore) -> Result<f64, DistributionError>;

    /// P(X < x).
    fn cdf(&self, x: f64, params: &DistParams) -> Result<f64, DistributionError>;
}

/// Draws from `dist` and clamps into `[lower, upper)`.
///
/// Draws at or past `upper` become the representable value just below it;
/// draws below `lower` become `lower`.
pub fn roll_float(
    dist: &dyn Distribution,
    params: &DistParams,
    rng: &mut dyn RngCore,
) -> Result<f64, DistributionError> {
    let value = dist.sample(params, rng)?;
    if value >= params.upper() {
        return Ok(math::next_down(params.upper()));
    }
    if value < params.lower() {
        return Ok(params.lower());
    }
    Ok(value)
}

// ============================================================================
// Adapters
// ============================================================================

/// Flat distribution over the working interval.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniformDist;

impl UniformDist {
    fn base(params: &DistParams) -> Result<Uniform, DistributionError> {
        Uniform::new(params.lower(), params.upper())
    }
}

impl Distribution for UniformDist {
    fn sample(&self, params: &DistParams, rng: &mut dyn RngCore) -> Result<f64, DistributionError> {
        Ok(Self::base(params)?.sample(rng))
    }

    fn cdf(&self, x: f64, params: &DistParams) -> Result<f64, DistributionError> {
        if let Some(edge) = params.edge_cdf(x) {
            return Ok(edge);
        }
        Ok(Self::base(params)?.cdf(x))
    }
}

/// Bell curve centred in the working interval.
#[derive(Debug, Clone, Copy, Default)]
pub struct NormalDist;

impl NormalDist {
    fn base(params: &DistParams) -> Result<TruncatedNormal, DistributionError> {
        let sigma = 0.25 * (1.0 - params.weight * 0.8);
        TruncatedNormal::new(0.5, sigma, 0.0, 1.0)
    }
}

impl Distribution for NormalDist {
    fn sample(&self, params: &DistParams, rng: &mut dyn RngCore) -> Result<f64, DistributionError> {
        Ok(params.scale(Self::base(params)?.sample(rng)))
    }

    fn cdf(&self, x: f64, params: &DistParams) -> Result<f64, DistributionError> {
        if let Some(edge) = params.edge_cdf(x) {
            return Ok(edge);
        }
        Ok(Self::base(params)?.cdf(params.normalize(x)))
    }
}

/// Maps a weight onto Beta shape parameters `(alpha, beta)`.
pub type BetaShape = fn(f64) -> (f64, f64);

/// Beta-shaped distribution whose shape is a function of the weight.
///
/// # Examples
/// ```
/// use u_roll::roll::{BetaDist, DistParams, Distribution, Range};
///
/// let steep = BetaDist::new(|w| (1.0, 1.0 + 9.0 * w));
/// let params = DistParams::new(Range::new(0.0, 10.0), 1.0);
/// let p = steep.cdf(5.0, &params).unwrap();
/// assert!(p > 0.99);
/// ```
#[derive(Clone, Copy)]
pub struct BetaDist {
    shape: BetaShape,
}

impl BetaDist {
    pub const fn new(shape: BetaShape) -> Self {
        Self { shape }
    }

    /// Base Beta distribution for the params' weight.
    pub fn beta(&self, params: &DistParams) -> Result<Beta, DistributionError> {
        let (alpha, beta) = (self.shape)(params.weight);
        Beta::new(alpha, beta)
    }
}

impl fmt::Debug for BetaDist {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (a0, b0) = (self.shape)(0.0);
        let (a1, b1) = (self.shape)(1.0);
        f.debug_struct("BetaDist")
            .field("shape_at_0", &(a0, b0))
            .field("shape_at_1", &(a1, b1))
            .finish()
    }
}

impl Distribution for BetaDist {
    fn sample(&self, params: &DistParams, rng: &mut dyn RngCore) -> Result<f64, DistributionError> {
        Ok(params.scale(self.beta(params)?.sample(rng)))
    }

    fn cdf(&self, x: f64, params: &DistParams) -> Result<f64, DistributionError> {
        if let Some(edge) = params.edge_cdf(x) {
            return Ok(edge);
        }
        Ok(self.beta(params)?.cdf(params.normalize(x)))
    }
}

/// Point mass at `lower` with probability `weight`, otherwise Beta(1, 2).
#[derive(Debug, Clone, Copy)]
pub struct WeightedMinDist {
    soft: BetaDist,
}

impl Distribution for WeightedMinDist {
    fn sample(&self, params: &DistParams, rng: &mut dyn RngCore) -> Result<f64, DistributionError> {
        if rng.random::<f64>() < params.weight {
            return Ok(params.lower());
        }
        self.soft.sample(params, rng)
    }

    fn cdf(&self, x: f64, params: &DistParams) -> Result<f64, DistributionError> {
        if let Some(edge) = params.edge_cdf(x) {
            return Ok(edge);
        }
        let soft = self.soft.beta(params)?.cdf(params.normalize(x));
        Ok(params.weight + (1.0 - params.weight) * soft)
    }
}

/// Point mass at `upper` with probability `weight`, otherwise Beta(2, 1).
///
/// The mass sits on the exclusive bound itself, so it only enters the CDF at
/// `upper`, where the CDF is already 1.
#[derive(Debug, Clone, Copy)]
pub struct WeightedMaxDist {
    soft: BetaDist,
}

impl Distribution for WeightedMaxDist {
    fn sample(&self, params: &DistParams, rng: &mut dyn RngCore) -> Result<f64, DistributionError> {
        if rng.random::<f64>() < params.weight {
            return Ok(params.upper());
        }
        self.soft.sample(params, rng)
    }

    fn cdf(&self, x: f64, params: &DistParams) -> Result<f64, DistributionError> {
        if let Some(edge) = params.edge_cdf(x) {
            return Ok(edge);
        }
        let soft = self.soft.beta(params)?.cdf(params.normalize(x));
        Ok((1.0 - params.weight) * soft)
    }
}

fn skewed_shape(w: f64) -> (f64, f64) {
    let s = 1.0 - 0.8 * w;
    (s, s)
}

fn low_shape(w: f64) -> (f64, f64) {
    (1.0, 1.0 + 4.0 * w)
}

fn high_shape(w: f64) -> (f64, f64) {
    (1.0 + 4.0 * w, 1.0)
}

fn min_shape(_: f64) -> (f64, f64) {
    (1.0, 2.0)
}

fn max_shape(_: f64) -> (f64, f64) {
    (2.0, 1.0)
}

static UNIFORM: UniformDist = UniformDist;
static NORMAL: NormalDist = NormalDist;
static SKEWED: BetaDist = BetaDist::new(skewed_shape);
static WEIGHTED_LOW: BetaDist = BetaDist::new(low_shape);
static WEIGHTED_HIGH: BetaDist = BetaDist::new(high_shape);
static WEIGHTED_MIN: WeightedMinDist = WeightedMinDist {
    soft: BetaDist::new(min_shape),
};
static WEIGHTED_MAX: WeightedMaxDist = WeightedMaxDist {
    soft: BetaDist::new(max_shape),
};

// ============================================================================
// Built-in selector
// ============================================================================

/// Built-in distributions, selectable by name in options documents.
///
/// # Examples
/// ```
/// use u_roll::roll::Dist;
/// let d: Dist = "weighted_high".parse().unwrap();
/// assert_eq!(d, Dist::WeightedHigh);
/// assert_eq!(d.to_string(), "weighted_high");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dist {
    #[default]
    Uniform,
    Normal,
    Skewed,
    WeightedLow,
    WeightedHigh,
    WeightedMin,
    WeightedMax,
}

impl Dist {
    pub const ALL: [Dist; 7] = [
        Dist::Uniform,
        Dist::Normal,
        Dist::Skewed,
        Dist::WeightedLow,
        Dist::WeightedHigh,
        Dist::WeightedMin,
        Dist::WeightedMax,
    ];

    /// The adapter implementing this distribution.
    pub fn distribution(self) -> &'static dyn Distribution {
        match self {
            Dist::Uniform => &UNIFORM,
            Dist::Normal => &NORMAL,
            Dist::Skewed => &SKEWED,
            Dist::WeightedLow => &WEIGHTED_LOW,
            Dist::WeightedHigh => &WEIGHTED_HIGH,
            Dist::WeightedMin => &WEIGHTED_MIN,
            Dist::WeightedMax => &WEIGHTED_MAX,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Dist::Uniform => "uniform",
            Dist::Normal => "normal",
            Dist::Skewed => "skewed",
            Dist::WeightedLow => "weighted_low",
            Dist::WeightedHigh => "weighted_high",
            Dist::WeightedMin => "weighted_min",
            Dist::WeightedMax => "weighted_max",
        }
    }
}

impl Distribution for Dist {
    fn sample(&self, params: &DistParams, rng: &mut dyn RngCore) -> Result<f64, DistributionError> {
        self.distribution().sample(params, rng)
    }

    fn cdf(&self, x: f64, params: &DistParams) -> Result<f64, DistributionError> {
        self.distribution().cdf(x, params)
    }
}

impl fmt::Display for Dist {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Dist {
    type Err = RollError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Dist::ALL
            .into_iter()
            .find(|d| d.name() == s)
            .ok_or_else(|| RollError::Config(format!("unknown distribution `{s}`")))
    }
}
