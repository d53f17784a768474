//! # u-roll
//!
//! Deterministic, seed-derived probabilistic rolling.
//!
//! A root seed and a salt label give a reproducible, independent random
//! stream. Casters draw from shaped distributions over integer or real
//! ranges, chain rerolls ("explosions"), and report exact odds straight from
//! the distribution CDFs.
//!
//! ## Modules
//!
//! - [`special`]: Error function family, normal quantile, incomplete beta and gamma
//! - [`math`]: Clamp, normalize/scale, float neighbours
//! - [`distributions`]: Uniform, Normal, TruncatedNormal, Gamma, Beta
//! - [`random`]: Salted ChaCha streams, OS seeds, weighted sampling
//! - [`roll`]: Sources, casters, options, odds
//! - [`error`]: Error types
//!
//! ## Example
//!
//! ```
//! use u_roll::roll::{d6, Caster, Dist, IntSource};
//!
//! let source = IntSource::new("my-campaign").dist(Dist::Normal).weight(0.6);
//! let mut attack = source.salt_dist("orc-1/attack").reroll_above(5).upper_explosions(2);
//!
//! let roll = attack.one(d6()).unwrap();
//! assert!((1..=6).contains(&roll.first));
//! assert_eq!(roll.rolls.len(), 1 + roll.upper_explosions);
//! ```
//!
//! ## Design Philosophy
//!
//! - **Reproducible**: same seed, salt and call order, same rolls
//! - **Exact odds**: probabilities come from CDFs, never from simulation
//! - **Property-based testing**: sampling and CDF agreement verified via proptest

pub mod distributions;
pub mod error;
pub mod math;
pub mod random;
pub mod roll;
pub mod special;

pub use error::{DistributionError, RollError};
