//! Seeded caster factory.

use std::fmt;
use std::sync::Arc;
use tracing::debug;

use super::caster::DistCaster;
use super::config::{Config, DistConfig, WeightedConfig};
use super::dist::{Dist, Distribution};
use super::options::{Options, Weights};
use super::range::{Numeric, Range};
use super::weighted::WeightedCaster;
use crate::error::RollError;
use crate::random::{self, derive_stream};

/// A root seed plus a default configuration template.
///
/// A source owns no random stream. Each `salt_*` call derives a caster with
/// its own stream keyed by `(seed, salt)` and a private copy of the template,
/// so the same seed and salt always replay the same rolls.
///
/// # Examples
/// ```
/// use u_roll::roll::{d20, Caster, Dist, IntSource};
///
/// let source = IntSource::new("session-42").dist(Dist::WeightedHigh).weight(0.8);
/// let mut a = source.salt_dist("alice");
/// let mut b = source.salt_dist("alice");
/// assert_eq!(a.one(d20()).unwrap(), b.one(d20()).unwrap());
/// ```
#[derive(Clone)]
pub struct Source<T> {
    seed: String,
    root_key: [u8; 32],
    cfg: Config<T>,
}

pub type IntSource = Source<i64>;
pub type FloatSource = Source<f64>;

impl<T: Numeric> Source<T> {
    /// Creates a source with a caller-supplied seed and default settings.
    ///
    /// The seed is used verbatim, so `""` is a valid and replayable seed.
    /// Use [`Source::random`] or [`Source::from_seed`] for a generated one.
    pub fn new(seed: impl Into<String>) -> Self {
        let seed = seed.into();
        debug!(kind = T::KIND, generated = false, "source created");
        Self::with_seed(seed)
    }

    /// Creates a source whose seed comes from the OS entropy source.
    ///
    /// # Errors
    /// Returns [`RollError::Entropy`] if no entropy could be read.
    pub fn random() -> Result<Self, RollError> {
        let seed = random::random_seed()?;
        debug!(kind = T::KIND, generated = true, "source created");
        Ok(Self::with_seed(seed))
    }

    /// Uses `seed` when it is present and non-empty, otherwise generates one
    /// like [`Source::random`].
    ///
    /// # Errors
    /// Returns [`RollError::Entropy`] if a seed had to be generated and no
    /// entropy could be read.
    pub fn from_seed(seed: Option<&str>) -> Result<Self, RollError> {
        match seed {
            Some(s) if !s.is_empty() => Ok(Self::new(s)),
            _ => Self::random(),
        }
    }

    fn with_seed(seed: String) -> Self {
        let root_key = random::root_key(&seed);
        Self {
            seed,
            root_key,
            cfg: Config::default(),
        }
    }

    /// The seed, for replaying this source later.
    pub fn seed(&self) -> &str {
        &self.seed
    }

    pub fn config(&self) -> &Config<T> {
        &self.cfg
    }

    /// Selects a built-in distribution for derived casters.
    pub fn dist(mut self, dist: Dist) -> Self {
        self.cfg.dist = Arc::new(dist);
        self
    }

    /// Any [`Distribution`] implementation; derived casters share it.
    pub fn distribution<D: Distribution + 'static>(mut self, dist: D) -> Self {
        self.cfg.dist = Arc::new(dist);
        self
    }

    pub fn weight(mut self, weight: f64) -> Self {
        self.cfg.weight = weight;
        self
    }

    /// Default ticket table for weighted casters.
    pub fn custom(mut self, weights: Weights<T>) -> Self {
        self.cfg.custom = weights;
        self
    }

    pub fn range(mut self, range: Range<T>) -> Self {
        self.cfg.range = range;
        self
    }

    pub fn reroll_below(mut self, value: T) -> Self {
        self.cfg.explosions.reroll_below = value;
        self
    }

    pub fn lower_explosions(mut self, max: u32) -> Self {
        self.cfg.explosions.max_lower_explosions = max;
        self
    }

    pub fn reroll_above(mut self, value: T) -> Self {
        self.cfg.explosions.reroll_above = value;
        self
    }

    pub fn upper_explosions(mut self, max: u32) -> Self {
        self.cfg.explosions.max_upper_explosions = max;
        self
    }

    /// Applies every field the options set.
    pub fn with(mut self, opts: Options<T>) -> Self {
        self.cfg.apply(opts);
        self
    }

    /// Independent copy of this source and its template.
    pub fn fork(&self) -> Self {
        self.clone()
    }

    /// Derives a distribution caster for `salt`.
    pub fn salt_dist(&self, salt: &str) -> DistCaster<T> {
        debug!(salt, kind = T::KIND, caster = "dist", "caster derived");
        DistCaster::new(derive_stream(&self.root_key, salt), DistConfig::from(&self.cfg))
    }

    /// Derives a weighted caster for `salt` using the template's table.
    pub fn salt_weighted(&self, salt: &str) -> WeightedCaster<T> {
        debug!(salt, kind = T::KIND, caster = "weighted", "caster derived");
        WeightedCaster::new(derive_stream(&self.root_key, salt), WeightedConfig::from(&self.cfg))
    }

    /// Derives a weighted caster for `salt`; a non-empty `weights` replaces
    /// the template's table.
    pub fn salt_custom_weighted(&self, salt: &str, weights: &[(T, f64)]) -> WeightedCaster<T> {
        debug!(
            salt,
            kind = T::KIND,
            caster = "weighted",
            tickets = weights.len(),
            "caster derived"
        );
        let mut cfg = WeightedConfig::from(&self.cfg);
        cfg.set_custom(weights);
        WeightedCaster::new(derive_stream(&self.root_key, salt), cfg)
    }
}

impl<T: fmt::Debug> fmt::Debug for Source<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Source")
            .field("cfg", &self.cfg)
            .finish_non_exhaustive()
    }
}
