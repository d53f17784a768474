//! Resolved caster configuration.
//!
//! [`Config`] is the fully-populated template a `Source` carries. Casters
//! snapshot it into a [`DistConfig`] or a [`WeightedConfig`] at derivation
//! time and never share it afterwards.

use std::sync::Arc;

use super::dist::{Dist, Distribution};
use super::options::{Options, Weights};
use super::range::{Numeric, Range};

/// Reroll thresholds and explosion caps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExplosionRules<T> {
    pub reroll_below: T,
    pub max_lower_explosions: u32,
    pub reroll_above: T,
    pub max_upper_explosions: u32,
}

impl<T: Numeric> Default for ExplosionRules<T> {
    fn default() -> Self {
        Self {
            reroll_below: T::default(),
            max_lower_explosions: 0,
            reroll_above: T::default(),
            max_upper_explosions: 0,
        }
    }
}

impl<T: Numeric> ExplosionRules<T> {
    /// Another lower roll is due after `count` lower explosions so far.
    pub fn should_explode_lower(&self, value: T, count: usize) -> bool {
        count < self.max_lower_explosions as usize && value < self.reroll_below
    }

    /// Another upper roll is due after `count` upper explosions so far.
    pub fn should_explode_upper(&self, value: T, count: usize) -> bool {
        count < self.max_upper_explosions as usize && value > self.reroll_above
    }

    /// The reroll thresholds as a range: `[reroll_below, reroll_above]`.
    pub fn thresholds(&self) -> Range<T> {
        Range::new(self.reroll_below, self.reroll_above)
    }

    fn apply(&mut self, opts: &Options<T>) {
        if let Some(v) = opts.reroll_below {
            self.reroll_below = v;
        }
        if let Some(n) = opts.max_lower_explosions {
            self.max_lower_explosions = n;
        }
        if let Some(v) = opts.reroll_above {
            self.reroll_above = v;
        }
        if let Some(n) = opts.max_upper_explosions {
            self.max_upper_explosions = n;
        }
    }
}

/// Fully resolved template held by a source.
///
/// The distribution is shared, so cloning a template or deriving a caster
/// never copies a user-supplied [`Distribution`].
#[derive(Debug, Clone)]
pub struct Config<T> {
    pub dist: Arc<dyn Distribution>,
    pub weight: f64,
    pub custom: Weights<T>,
    pub range: Range<T>,
    pub explosions: ExplosionRules<T>,
}

impl<T: Numeric> Default for Config<T> {
    /// Uniform, weight `0.5`, no custom table, range `[1, 100]`, no explosions.
    fn default() -> Self {
        Self {
            dist: Arc::new(Dist::Uniform),
            weight: 0.5,
            custom: Vec::new(),
            range: Range::default(),
            explosions: ExplosionRules::default(),
        }
    }
}

impl<T: Numeric> Config<T> {
    /// Overwrites every field the options set.
    pub fn apply(&mut self, opts: Options<T>) {
        if let Some(d) = opts.dist {
            self.dist = Arc::new(d);
        }
        if let Some(w) = opts.weight {
            self.weight = w;
        }
        if let Some(r) = opts.range {
            self.range = r;
        }
        self.explosions.apply(&opts);
        if let Some(c) = opts.custom {
            self.custom = c;
        }
    }

    pub fn from_options(opts: Options<T>) -> Self {
        let mut cfg = Self::default();
        cfg.apply(opts);
        cfg
    }
}

// ============================================================================
// Distribution caster config
// ============================================================================

/// Snapshot used by a distribution caster.
#[derive(Debug, Clone)]
pub struct DistConfig<T> {
    pub dist: Arc<dyn Distribution>,
    pub weight: f64,
    pub range: Range<T>,
    pub explosions: ExplosionRules<T>,
}

impl<T: Numeric> DistConfig<T> {
    pub fn apply(&mut self, opts: &Options<T>) {
        if let Some(d) = opts.dist {
            self.dist = Arc::new(d);
        }
        if let Some(w) = opts.weight {
            self.weight = w;
        }
        if let Some(r) = opts.range {
            self.range = r;
        }
        self.explosions.apply(opts);
    }
}

impl<T: Numeric> From<&Config<T>> for DistConfig<T> {
    fn from(cfg: &Config<T>) -> Self {
        Self {
            dist: Arc::clone(&cfg.dist),
            weight: cfg.weight,
            range: cfg.range,
            explosions: cfg.explosions,
        }
    }
}

// ============================================================================
// Weighted caster config
// ============================================================================

/// One `(value, weight)` entry in a ticket table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ticket<T> {
    pub value: T,
    pub weight: f64,
}

/// Builds a ticket table sorted by ascending value.
///
/// The order fixes which ticket a given uniform draw selects, whatever order
/// the weights were supplied in.
///
/// # Examples
/// ```
/// use u_roll::roll::tickets_from_weights;
/// let t = tickets_from_weights(&[(3_i64, 30.0), (1, 10.0)]);
/// assert_eq!(t[0].value, 1);
/// assert_eq!(t[1].value, 3);
/// ```
pub fn tickets_from_weights<T: Numeric>(weights: &[(T, f64)]) -> Vec<Ticket<T>> {
    let mut tickets: Vec<Ticket<T>> = weights
        .iter()
        .map(|&(value, weight)| Ticket { value, weight })
        .collect();
    tickets.sort_by(|a, b| a.value.total_cmp(&b.value));
    tickets
}

/// Snapshot used by a weighted caster. Cloning deep-copies the ticket table.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedConfig<T> {
    pub tickets: Vec<Ticket<T>>,
    pub explosions: ExplosionRules<T>,
}

impl<T: Numeric> WeightedConfig<T> {
    /// Replaces the table when `weights` is non-empty.
    pub fn set_custom(&mut self, weights: &[(T, f64)]) {
        if !weights.is_empty() {
            self.tickets = tickets_from_weights(weights);
        }
    }

    pub fn apply(&mut self, opts: &Options<T>) {
        if let Some(custom) = &opts.custom {
            self.set_custom(custom);
        }
        self.explosions.apply(opts);
    }

    /// Sum of positive ticket weights.
    pub fn total_weight(&self) -> f64 {
        self.tickets.iter().map(|t| t.weight.max(0.0)).sum()
    }
}

impl<T: Numeric> From<&Config<T>> for WeightedConfig<T> {
    fn from(cfg: &Config<T>) -> Self {
        Self {
            tickets: tickets_from_weights(&cfg.custom),
            explosions: cfg.explosions,
        }
    }
}
