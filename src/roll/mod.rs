//! Roll orchestration: sources, casters, options and odds.
//!
//! ```text
//! Source (seed + Config template)
//!   ├── salt_dist(salt)            → DistCaster     (own stream, DistConfig)
//!   └── salt_weighted(salt)        → WeightedCaster (own stream, WeightedConfig)
//!
//! DistCaster::one   → roll_float(Dist, working range) → floor/identity → explosions
//! DistCaster::odds  → cdf(v+1) − cdf(v) per bucket, no randomness
//! ```

pub mod caster;
pub mod config;
pub mod dist;
pub mod options;
pub mod range;
pub mod result;
pub mod source;
pub mod weighted;

pub use caster::{Caster, DistCaster, FloatDistCaster, IntDistCaster};
pub use config::{tickets_from_weights, Config, DistConfig, ExplosionRules, Ticket, WeightedConfig};
pub use dist::{
    roll_float, BetaDist, BetaShape, Dist, DistParams, Distribution, NormalDist, UniformDist,
    WeightedMaxDist, WeightedMinDist,
};
pub use options::{merge_options, FloatOptions, FloatWeights, IntOptions, IntWeights, Options, Weights};
pub use range::{d10, d100, d20, d4, d6, d8, dice, FloatRange, IntRange, Numeric, Range, MAX_EXACT_INT};
pub use result::{FloatResult, IntResult, Odds, RollResult};
pub use source::{FloatSource, IntSource, Source};
pub use weighted::{FloatWeightedCaster, IntWeightedCaster, WeightedCaster};
